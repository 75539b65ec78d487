//! 客户端配置
//!
//! 默认值在编译期确定，原生环境下可在运行时用环境变量覆盖后端地址。

use std::time::Duration;

/// 编译期未指定 `ACCOUNTDESK_API_BASE` 时使用的后端地址
pub const DEFAULT_API_BASE: &str = "http://localhost:8080";

/// 运行时覆盖后端地址的环境变量名
pub const API_BASE_VAR: &str = "ACCOUNTDESK_API_BASE";

/// 成功提示横幅的自动消失时间
pub const DEFAULT_BANNER_DISMISS: Duration = Duration::from_secs(3);

/// 服务端用来标识成功的消息文本
///
/// 视图层只看类型化结果，不直接比较这些字符串。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessMessages {
    pub registered: String,
    pub profile_retrieved: String,
    pub profile_updated: String,
    pub users_retrieved: String,
}

impl Default for SuccessMessages {
    fn default() -> Self {
        Self {
            registered: "User registered successfully".into(),
            profile_retrieved: "User profile retrieved successfully".into(),
            profile_updated: "Profile updated successfully".into(),
            users_retrieved: "Users retrieved successfully".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API 根地址，不带结尾斜杠
    pub base_url: String,
    pub messages: SuccessMessages,
    pub banner_dismiss: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(option_env!("ACCOUNTDESK_API_BASE").unwrap_or(DEFAULT_API_BASE))
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            messages: SuccessMessages::default(),
            banner_dismiss: DEFAULT_BANNER_DISMISS,
        }
    }

    /// 读取环境变量，读不到就用编译期默认值
    pub fn from_env() -> Self {
        match std::env::var(API_BASE_VAR) {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::default(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

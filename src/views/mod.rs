//! 表单视图控制器
//!
//! 每个控制器持有自己的草稿、加载标志和提示横幅，不依赖任何 UI 框架。
//! 提交分成两步：`begin_submit` 校验并产出请求，`finish_submit` 映射结果，
//! 响应式 UI 在两步之间 await 请求；`submit` 把两步合在一起，供原生调用与测试使用。

use std::time::Duration;

pub mod login;
pub mod profile;
pub mod register;

pub use login::{LoginDraft, LoginForm};
pub use profile::{EditDraft, ProfileTab, ProfileView};
pub use register::{RegisterDraft, RegisterForm};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

/// 可关闭的提示横幅
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
    /// 设置后由 UI 在该延迟后自动关闭
    pub auto_dismiss: Option<Duration>,
}

impl Banner {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Success,
            message: message.into(),
            auto_dismiss: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Error,
            message: message.into(),
            auto_dismiss: None,
        }
    }

    pub fn dismiss_after(mut self, delay: Duration) -> Self {
        self.auto_dismiss = Some(delay);
        self
    }

    pub fn is_error(&self) -> bool {
        self.kind == BannerKind::Error
    }
}

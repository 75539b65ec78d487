use thiserror::Error;

use crate::validate::ValidationErrors;

/// 传输失败或响应不可解析时展示给用户的通用提示
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

// =========================================================
// 核心错误类型
// =========================================================

/// 客户端操作失败的原因
///
/// 对应三类可见错误：
/// - 校验错误：请求发出前在本地拦截
/// - 应用错误：HTTP 已完成，但状态码或服务端消息表示失败
/// - 传输错误：网络不可达或响应不是 JSON
///
/// 另有存储、会话缺失与取消三种客户端内部原因。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("request rejected with status {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    #[error("network error: {0}")]
    Transport(String),

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("no active session")]
    Unauthenticated,

    #[error("storage error: {0}")]
    Storage(String),

    #[error("request cancelled")]
    Cancelled,
}

impl ClientError {
    pub fn rejected(status: u16, message: Option<String>) -> Self {
        Self::Rejected { status, message }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// 机器可读的错误代码，用于日志
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Validation(_) => "INVALID_INPUT",
            ClientError::Rejected { .. } => "REJECTED",
            ClientError::Transport(_) => "NETWORK_ERROR",
            ClientError::Decode(_) => "DECODE_ERROR",
            ClientError::Unauthenticated => "UNAUTHENTICATED",
            ClientError::Storage(_) => "STORAGE_ERROR",
            ClientError::Cancelled => "CANCELLED",
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClientError::Cancelled)
    }

    /// HTTP 状态码（仅应用错误携带）
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 映射为横幅文本
    ///
    /// 服务端给了消息就原样展示，否则使用调用方提供的默认文案；
    /// 传输类错误统一为通用网络提示。
    pub fn user_message(&self, default: &str) -> String {
        match self {
            ClientError::Rejected {
                message: Some(message),
                ..
            } if !message.is_empty() => message.clone(),
            ClientError::Rejected { .. } | ClientError::Storage(_) | ClientError::Cancelled => {
                default.to_string()
            }
            ClientError::Transport(_) | ClientError::Decode(_) => NETWORK_ERROR_MESSAGE.to_string(),
            ClientError::Unauthenticated => "Your session has ended. Please log in again.".to_string(),
            ClientError::Validation(errors) => errors.to_string(),
        }
    }
}

impl From<ValidationErrors> for ClientError {
    fn from(errors: ValidationErrors) -> Self {
        ClientError::Validation(errors)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::decode(e.to_string())
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_wins_over_default() {
        let err = ClientError::rejected(400, Some("Email already exists".into()));
        assert_eq!(err.user_message("Registration failed"), "Email already exists");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn missing_or_empty_message_falls_back() {
        let err = ClientError::rejected(500, None);
        assert_eq!(err.user_message("Registration failed"), "Registration failed");
        let err = ClientError::rejected(500, Some(String::new()));
        assert_eq!(err.user_message("Registration failed"), "Registration failed");
    }

    #[test]
    fn transport_and_decode_share_the_network_message() {
        assert_eq!(
            ClientError::transport("connection refused").user_message("x"),
            NETWORK_ERROR_MESSAGE
        );
        assert_eq!(
            ClientError::decode("expected value at line 1").user_message("x"),
            NETWORK_ERROR_MESSAGE
        );
    }

    #[test]
    fn display_includes_status_and_message() {
        let err = ClientError::rejected(401, Some("Unauthorized".into()));
        assert_eq!(
            err.to_string(),
            "request rejected with status 401: Unauthorized"
        );
        assert_eq!(err.error_code(), "REJECTED");
    }
}

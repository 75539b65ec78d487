//! 视图级取消令牌
//!
//! 视图挂载时创建，卸载时取消。传入每个请求：
//! 发出前已取消则不发请求，返回时已取消则丢弃结果，调用方拿到 `ClientError::Cancelled`。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取消后不可恢复，所有克隆同时生效
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub fn check(&self) -> ClientResult<()> {
        if self.is_cancelled() {
            Err(ClientError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancellation_is_shared_between_clones() {
        let token = CancelToken::new();
        let view_copy = token.clone();
        assert!(token.check().is_ok());

        view_copy.cancel();
        assert!(token.is_cancelled());
        assert_eq!(token.check(), Err(ClientError::Cancelled));
    }
}

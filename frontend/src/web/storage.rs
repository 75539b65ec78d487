//! LocalStorage 封装模块
//!
//! 使用 `web_sys::Storage` 实现会话存储后端。
//! 不缓存 `Storage` 句柄（它不是 `Send` 的），每次操作重新从 window 获取。

use accountdesk::{ClientError, ClientResult, SessionStorage};

/// 浏览器 LocalStorage
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    /// 获取 LocalStorage 实例
    fn storage() -> ClientResult<web_sys::Storage> {
        web_sys::window()
            .ok_or_else(|| ClientError::storage("无法获取 window 对象"))?
            .local_storage()
            .map_err(|e| ClientError::storage(format!("{:?}", e)))?
            .ok_or_else(|| ClientError::storage("LocalStorage 不可用"))
    }
}

impl SessionStorage for LocalStorage {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| ClientError::storage(format!("读取 {} 失败: {:?}", key, e)))
    }

    /// 配额满或隐私模式下写入会失败
    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| ClientError::storage(format!("写入 {} 失败: {:?}", key, e)))
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        Self::storage()?
            .remove_item(key)
            .map_err(|e| ClientError::storage(format!("删除 {} 失败: {:?}", key, e)))
    }
}

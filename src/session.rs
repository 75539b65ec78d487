//! 会话存储
//!
//! 会话 = token + 用户 id + 角色，三者同时写入、同时清除。
//! 底层键值存储通过 `SessionStorage` 注入：浏览器里是 LocalStorage，测试和原生环境用内存实现。

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use accountdesk_shared::Role;
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};

pub const TOKEN_KEY: &str = "token";
pub const USER_ID_KEY: &str = "userId";
pub const ROLE_KEY: &str = "role";

// =========================================================
// 存储抽象 (Storage Interface Abstraction)
// =========================================================

/// 持久化键值存储
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> ClientResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> ClientResult<()>;
    fn remove(&self, key: &str) -> ClientResult<()>;
}

/// 进程内存储
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> ClientResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| ClientError::storage("memory storage lock poisoned"))
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

// =========================================================
// 会话模型
// =========================================================

#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub role: Role,
}

impl Session {
    pub fn new(token: impl Into<String>, user_id: impl Into<String>, role: Role) -> Self {
        Self {
            token: token.into(),
            user_id: user_id.into(),
            role,
        }
    }
}

// token 不进日志
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("role", &self.role)
            .finish()
    }
}

// =========================================================
// 会话上下文
// =========================================================

/// 显式注入到 API 客户端与路由守卫的会话上下文
///
/// 克隆共享同一个底层存储。
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl SessionStore {
    pub fn new(storage: impl SessionStorage + 'static) -> Self {
        Self {
            storage: Arc::new(storage),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    /// 写入完整会话
    ///
    /// 任一键写入失败时清除全部三个键后返回错误，读者不会看到半个会话。
    pub fn set_session(&self, token: &str, user_id: &str, role: Role) -> ClientResult<()> {
        let result = self
            .storage
            .set(TOKEN_KEY, token)
            .and_then(|_| self.storage.set(USER_ID_KEY, user_id))
            .and_then(|_| self.storage.set(ROLE_KEY, role.as_str()));

        if let Err(e) = result {
            warn!(error = %e, "session write failed, rolling back");
            // 回滚失败时保留原始错误
            let _ = self.clear_session();
            return Err(e);
        }
        debug!(user_id, %role, "session stored");
        Ok(())
    }

    /// 清除会话，重复调用是安全的
    pub fn clear_session(&self) -> ClientResult<()> {
        let results = [
            self.storage.remove(TOKEN_KEY),
            self.storage.remove(USER_ID_KEY),
            self.storage.remove(ROLE_KEY),
        ];
        for result in results {
            result?;
        }
        debug!("session cleared");
        Ok(())
    }

    pub fn create(&self, session: &Session) -> ClientResult<()> {
        self.set_session(&session.token, &session.user_id, session.role)
    }

    pub fn destroy(&self) -> ClientResult<()> {
        self.clear_session()
    }

    /// 存储读取失败按“不存在”处理
    pub fn token(&self) -> Option<String> {
        self.read(TOKEN_KEY)
    }

    pub fn user_id(&self) -> Option<String> {
        self.read(USER_ID_KEY)
    }

    /// 存储里的角色值无法识别时视为不存在
    pub fn role(&self) -> Option<Role> {
        self.read(ROLE_KEY).and_then(|r| r.parse().ok())
    }

    /// 三项齐全才返回会话
    pub fn current(&self) -> Option<Session> {
        Some(Session {
            token: self.token()?,
            user_id: self.user_id()?,
            role: self.role()?,
        })
    }

    /// 仅检查 token 是否存在，不校验格式或过期
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.role().is_some_and(|r| r.is_admin())
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                warn!(key, error = %e, "session read failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 对指定键的写入返回错误
    struct FailingStorage {
        inner: MemoryStorage,
        fail_on: &'static str,
    }

    impl SessionStorage for FailingStorage {
        fn get(&self, key: &str) -> ClientResult<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> ClientResult<()> {
            if key == self.fail_on {
                return Err(ClientError::storage("quota exceeded"));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> ClientResult<()> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn set_then_clear() {
        let store = SessionStore::in_memory();
        assert!(!store.is_authenticated());

        store.set_session("t-1", "u-1", Role::Admin).unwrap();
        assert!(store.is_authenticated());
        assert_eq!(store.role(), Some(Role::Admin));
        assert_eq!(store.token().as_deref(), Some("t-1"));
        assert_eq!(store.current(), Some(Session::new("t-1", "u-1", Role::Admin)));

        store.clear_session().unwrap();
        assert!(!store.is_authenticated());
        assert_eq!(store.token(), None);
        assert_eq!(store.role(), None);
        assert_eq!(store.current(), None);
    }

    #[test]
    fn clearing_twice_is_safe() {
        let store = SessionStore::in_memory();
        store.set_session("t", "u", Role::User).unwrap();
        store.clear_session().unwrap();
        store.clear_session().unwrap();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn failed_write_leaves_no_partial_session() {
        let store = SessionStore::new(FailingStorage {
            inner: MemoryStorage::new(),
            fail_on: ROLE_KEY,
        });

        let err = store.set_session("t", "u", Role::User).unwrap_err();
        assert_eq!(err, ClientError::storage("quota exceeded"));
        assert_eq!(store.token(), None);
        assert_eq!(store.user_id(), None);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn clones_share_the_same_storage() {
        let store = SessionStore::in_memory();
        let other = store.clone();
        store
            .create(&Session::new("t", "u", Role::User))
            .unwrap();
        assert!(other.is_authenticated());
        other.destroy().unwrap();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn unknown_role_value_reads_as_absent() {
        let storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "t").unwrap();
        storage.set(USER_ID_KEY, "u").unwrap();
        storage.set(ROLE_KEY, "SUPERUSER").unwrap();
        let store = SessionStore::new(storage);

        assert!(store.is_authenticated());
        assert_eq!(store.role(), None);
        assert!(!store.is_admin());
        assert_eq!(store.current(), None);
    }

    #[test]
    fn debug_output_hides_the_token() {
        let session = Session::new("very-secret", "u", Role::User);
        assert!(!format!("{:?}", session).contains("very-secret"));
    }
}

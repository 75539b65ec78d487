//! 认证模块
//!
//! 持有 API 网关和路由守卫状态，与路由系统解耦。
//! 路由服务通过注入的守卫信号判定导航，不直接读会话存储。

use accountdesk::{
    AccountApi, CancelToken, ClientConfig, RouteGuard, SessionStore,
};
use leptos::prelude::*;

use crate::web::{FetchClient, LocalStorage};

pub type Api = AccountApi<FetchClient>;

/// 认证上下文
///
/// 通过 Context 在组件间共享，`Copy` 便于移入闭包。
#[derive(Clone, Copy)]
pub struct AuthContext {
    api: StoredValue<Api>,
    /// 守卫状态，只在登录成功和登出时写入
    pub guard: RwSignal<RouteGuard>,
}

impl AuthContext {
    /// 创建认证上下文，并从 LocalStorage 推导一次初始认证状态
    pub fn new() -> Self {
        let session = SessionStore::new(LocalStorage);
        let guard = RouteGuard::from_session(&session);
        let api = AccountApi::new(FetchClient, session, ClientConfig::default());
        tracing::info!(
            base_url = %api.config().base_url,
            authenticated = guard.is_authenticated(),
            "auth context ready"
        );

        Self {
            api: StoredValue::new(api),
            guard: RwSignal::new(guard),
        }
    }

    pub fn api(&self) -> Api {
        self.api.get_value()
    }

    /// 获取守卫信号（用于路由服务注入）
    pub fn guard_signal(&self) -> Signal<RouteGuard> {
        self.guard.into()
    }

    /// 登录成功或登出后写回守卫
    pub fn set_guard(&self, guard: RouteGuard) {
        self.guard.set(guard);
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 视图级取消令牌，组件卸载时自动取消
pub fn use_cancel_token() -> CancelToken {
    let token = CancelToken::new();
    let on_drop = token.clone();
    on_cleanup(move || on_drop.cancel());
    token
}

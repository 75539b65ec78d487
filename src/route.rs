//! 路由定义与守卫 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 守卫只持有一个布尔状态：挂载时从会话存储推导一次，之后只在登录成功或主动登出时改变。

use std::fmt::Display;

use tracing::info;

use crate::error::ClientResult;
use crate::session::SessionStore;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppRoute {
    /// 根路径，总是重定向
    #[default]
    Root,
    /// 登录页面
    Login,
    /// 注册页面
    Register,
    /// 个人资料 (需要认证)
    Profile,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    pub const ALL: [AppRoute; 4] = [
        AppRoute::Root,
        AppRoute::Login,
        AppRoute::Register,
        AppRoute::Profile,
    ];

    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Self::Root,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/profile" => Self::Profile,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Root => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Profile => "/profile",
            Self::NotFound => "/404",
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::Profile)
    }

    /// 定义已认证用户是否应该离开此路由（登录页、注册页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取认证成功时的重定向目标
    pub fn auth_success_redirect() -> Self {
        Self::Profile
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

/// 一次导航的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// 直接渲染该路由
    Render(AppRoute),
    /// 以替换历史记录的方式跳转到该路由
    Redirect(AppRoute),
}

impl Navigation {
    /// 最终会被渲染的路由
    pub fn target(&self) -> AppRoute {
        match self {
            Navigation::Render(r) | Navigation::Redirect(r) => *r,
        }
    }
}

/// 路由守卫
///
/// 状态不会在每次导航时重新读取存储，因此会话存储的外部修改在本次会话内不可见。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteGuard {
    authenticated: bool,
}

impl RouteGuard {
    /// 挂载时从会话存储推导初始状态
    pub fn from_session(session: &SessionStore) -> Self {
        Self {
            authenticated: session.is_authenticated(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// 登录视图内登录成功后调用
    pub fn on_login_success(&mut self) {
        if !self.authenticated {
            info!("route guard: logged in");
        }
        self.authenticated = true;
    }

    /// 主动登出：先清除会话存储，再翻转状态
    ///
    /// 存储清除失败时状态保持不变并返回错误。
    pub fn logout(&mut self, session: &SessionStore) -> ClientResult<()> {
        session.clear_session()?;
        self.authenticated = false;
        info!("route guard: logged out");
        Ok(())
    }

    /// **核心方法：导航守卫**
    pub fn resolve(&self, route: AppRoute) -> Navigation {
        match route {
            AppRoute::Root if self.authenticated => {
                Navigation::Redirect(AppRoute::auth_success_redirect())
            }
            AppRoute::Root => Navigation::Redirect(AppRoute::auth_failure_redirect()),
            r if r.requires_auth() && !self.authenticated => {
                Navigation::Redirect(AppRoute::auth_failure_redirect())
            }
            r if r.should_redirect_when_authenticated() && self.authenticated => {
                Navigation::Redirect(AppRoute::auth_success_redirect())
            }
            r => Navigation::Render(r),
        }
    }

    pub fn resolve_path(&self, path: &str) -> Navigation {
        self.resolve(AppRoute::from_path(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accountdesk_shared::Role;

    fn guard(authenticated: bool) -> RouteGuard {
        RouteGuard { authenticated }
    }

    #[test]
    fn navigation_table() {
        use AppRoute::*;
        use Navigation::*;

        let cases = [
            (Root, true, Redirect(Profile)),
            (Root, false, Redirect(Login)),
            (Login, true, Redirect(Profile)),
            (Login, false, Render(Login)),
            (Register, true, Redirect(Profile)),
            (Register, false, Render(Register)),
            (Profile, true, Render(Profile)),
            (Profile, false, Redirect(Login)),
        ];

        for (route, authenticated, expected) in cases {
            assert_eq!(
                guard(authenticated).resolve(route),
                expected,
                "route {route} authenticated={authenticated}"
            );
        }
    }

    #[test]
    fn unknown_paths_render_not_found() {
        assert_eq!(
            guard(false).resolve_path("/settings"),
            Navigation::Render(AppRoute::NotFound)
        );
        assert_eq!(
            guard(true).resolve_path("/settings"),
            Navigation::Render(AppRoute::NotFound)
        );
    }

    #[test]
    fn path_parsing_ignores_query_and_trailing_slash() {
        assert_eq!(AppRoute::from_path("/profile/"), AppRoute::Profile);
        assert_eq!(AppRoute::from_path("/login?next=x"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/"), AppRoute::Root);
        assert_eq!(AppRoute::from_path(""), AppRoute::Root);
        for route in AppRoute::ALL {
            assert_eq!(AppRoute::from_path(route.to_path()), route);
        }
    }

    #[test]
    fn state_is_not_rederived_from_storage() {
        let session = SessionStore::in_memory();
        let mut g = RouteGuard::from_session(&session);
        assert!(!g.is_authenticated());

        // 外部写入不会被已挂载的守卫观察到
        session.set_session("t", "u", Role::User).unwrap();
        assert_eq!(g.resolve(AppRoute::Profile), Navigation::Redirect(AppRoute::Login));

        g.on_login_success();
        assert_eq!(g.resolve(AppRoute::Profile), Navigation::Render(AppRoute::Profile));
    }

    #[test]
    fn logout_clears_storage_before_flipping() {
        let session = SessionStore::in_memory();
        session.set_session("t", "u", Role::Admin).unwrap();
        let mut g = RouteGuard::from_session(&session);
        assert!(g.is_authenticated());

        g.logout(&session).unwrap();
        assert!(!g.is_authenticated());
        assert!(!session.is_authenticated());
        assert_eq!(g.resolve(AppRoute::Root), Navigation::Redirect(AppRoute::Login));
    }
}

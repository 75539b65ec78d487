//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，所有对 window.history 的操作都集中在此模块。
//! 守卫判定交给核心库的 `RouteGuard`，这里只负责"监听 -> 判定 -> 写历史 -> 渲染"。
//! 重定向一律替换当前历史记录，后退不会回到被拦截的地址。

use accountdesk::{AppRoute, Navigation, RouteGuard};
use leptos::prelude::*;
use tracing::debug;
use wasm_bindgen::prelude::*;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 把守卫结果写入历史记录，返回应渲染的路由
///
/// `push` 只对直接渲染生效；重定向总是 replace。
fn apply(nav: Navigation, requested: &str, push: bool) -> AppRoute {
    match nav {
        Navigation::Render(route) => {
            if push {
                push_history_state(requested);
            }
            route
        }
        Navigation::Redirect(route) => {
            debug!(from = requested, to = %route, "route guard redirect");
            replace_history_state(route.to_path());
            route
        }
    }
}

/// 路由器服务
///
/// 通过 Signal 驱动界面更新，守卫状态由外部注入。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    guard: Signal<RouteGuard>,
}

impl RouterService {
    fn new(guard: Signal<RouteGuard>) -> Self {
        // 首次加载：对地址栏路径执行一次守卫
        let path = current_path();
        let initial = apply(guard.get_untracked().resolve_path(&path), &path, false);
        let (current_route, set_route) = signal(initial);

        Self {
            current_route,
            set_route,
            guard,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    pub fn navigate(&self, path: &str) {
        let nav = self.guard.get_untracked().resolve_path(path);
        if let Navigation::Redirect(_) = nav {
            // 先记下用户请求的地址，再用重定向目标替换它
            push_history_state(path);
        }
        self.set_route.set(apply(nav, path, true));
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let guard = self.guard;

        let closure = Closure::<dyn Fn()>::new(move || {
            let path = current_path();
            let nav = guard.get_untracked().resolve_path(&path);
            set_route.set(apply(nav, &path, false));
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 守卫状态变化（登录成功、登出）时对当前路由重新判定
    fn setup_auth_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let guard = self.guard;

        Effect::new(move |_| {
            let guard = guard.get();
            let route = current_route.get_untracked();
            if let Navigation::Redirect(target) = guard.resolve(route) {
                debug!(authenticated = guard.is_authenticated(), to = %target, "auth state changed");
                replace_history_state(target.to_path());
                set_route.set(target);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(guard: Signal<RouteGuard>) -> RouterService {
    let router = RouterService::new(guard);

    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
#[component]
pub fn Router(
    /// 守卫状态信号
    guard: Signal<RouteGuard>,
    children: Children,
) -> impl IntoView {
    provide_router(guard);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 站内链接，点击时走路由服务而不是整页跳转
#[component]
pub fn Link(
    to: AppRoute,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate(to.to_path());
    };

    view! {
        <a href=to.to_path() class=class on:click=on_click>
            {children()}
        </a>
    }
}

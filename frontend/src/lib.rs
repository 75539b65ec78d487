//! accountdesk 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `accountdesk::route`: 路由定义与守卫（核心库，领域模型）
//! - `web::router`: 路由服务（History 引擎）
//! - `auth`: API 网关与守卫状态
//! - `components`: UI 组件层，表单状态来自核心库的视图控制器

mod auth;
mod components {
    pub mod banner;
    pub mod login;
    pub mod profile;
    pub mod register;
}

use crate::auth::AuthContext;
use crate::components::login::LoginPage;
use crate::components::profile::ProfilePage;
use crate::components::register::RegisterPage;

use accountdesk::AppRoute;
use leptos::prelude::*;

// 原生 Web API 封装模块
// 直接基于 web_sys 实现核心库的存储与 HTTP 抽象，以及日志输出。
pub(crate) mod web {
    pub mod console;
    mod http;
    pub mod router;
    mod storage;

    pub use http::FetchClient;
    pub use storage::LocalStorage;
}

pub use web::console::init_logging;

use web::router::{Link, Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。根路径总会被守卫重定向，不会渲染。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Profile => view! { <ProfilePage /> }.into_any(),
        AppRoute::Root => ().into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                    <Link to=AppRoute::Root class="link link-primary mt-4 inline-block">
                        "Back to home"
                    </Link>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建认证上下文（挂载时从 LocalStorage 推导一次认证状态）
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);

    // 2. 守卫信号注入路由服务
    let guard = auth_ctx.guard_signal();

    view! {
        <Router guard=guard>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}

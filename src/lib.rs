//! accountdesk 客户端核心
//!
//! 与平台无关的账户服务客户端：
//! - `session`: 会话存储（token / 用户 id / 角色）
//! - `api` + `request`: API 网关与 HTTP 抽象
//! - `route`: 路由定义与守卫
//! - `views`: 注册、登录、资料页的表单控制器
//!
//! 浏览器端的存储、HTTP 传输与渲染在 `accountdesk-frontend` 中实现。

pub mod api;
pub mod cancel;
pub mod config;
pub mod error;
pub mod request;
pub mod route;
pub mod session;
pub mod validate;
pub mod views;

pub use accountdesk_shared as shared;
pub use accountdesk_shared::{Role, UserListEntry, UserProfile};

pub use api::AccountApi;
pub use cancel::CancelToken;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use request::{HttpClient, HttpRequest, HttpResponse, RequestBody, UploadFile};
pub use route::{AppRoute, Navigation, RouteGuard};
pub use session::{MemoryStorage, Session, SessionStorage, SessionStore};

#[cfg(feature = "native")]
pub use request::ReqwestHttpClient;

//! 端到端流程：表单控制器 + API 网关 + 会话存储 + 路由守卫

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use accountdesk::shared::protocol::HttpMethod;
use accountdesk::validate::Field;
use accountdesk::views::{BannerKind, LoginForm, ProfileTab, ProfileView, RegisterForm};
use accountdesk::{
    AccountApi, AppRoute, CancelToken, ClientConfig, ClientResult, HttpClient, HttpRequest,
    HttpResponse, Navigation, Role, RouteGuard, SessionStore,
};
use serde_json::{Value, json};

const BASE: &str = "http://accounts.test";

/// 按 (方法, 路径) 回放预设响应并记录请求
#[derive(Default)]
struct ScriptedClient {
    routes: RefCell<HashMap<(HttpMethod, String), (u16, String)>>,
    log: RefCell<Vec<(HttpMethod, String)>>,
}

impl ScriptedClient {
    fn on(&self, method: HttpMethod, path: &str, status: u16, body: Value) {
        self.routes
            .borrow_mut()
            .insert((method, format!("{}{}", BASE, path)), (status, body.to_string()));
    }

    fn hit(&self, method: HttpMethod, path: &str) -> bool {
        let url = format!("{}{}", BASE, path);
        self.log.borrow().iter().any(|(m, u)| *m == method && *u == url)
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for ScriptedClient {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse> {
        self.log.borrow_mut().push((req.method, req.url.clone()));
        let routes = self.routes.borrow();
        let (status, body) = routes
            .get(&(req.method, req.url))
            .cloned()
            .unwrap_or((404, "{}".to_string()));
        Ok(HttpResponse { status, body })
    }
}

fn setup() -> AccountApi<ScriptedClient> {
    AccountApi::new(
        ScriptedClient::default(),
        SessionStore::in_memory(),
        ClientConfig::new(BASE),
    )
}

fn profile(role: &str) -> Value {
    json!({"id": 1, "name": "Ada", "email": "ada@example.com", "role": role})
}

fn filled_register_form() -> RegisterForm {
    let mut form = RegisterForm::new();
    form.draft.set(Field::Name, "Ada Lovelace".into());
    form.draft.set(Field::Phone, "+1234567890".into());
    form.draft.set(Field::Email, "ada@example.com".into());
    form.draft.set(Field::Password, "analytical".into());
    form.draft.set(Field::Dob, "1990-01-15".into());
    form.draft.set(Field::ProfilePic, "https://x.com/a.png".into());
    form
}

#[tokio::test]
async fn registration_success_clears_form() {
    let api = setup();
    api.client().on(
        HttpMethod::Post,
        "/user/register",
        200,
        json!({"message": "User registered successfully"}),
    );

    let mut form = filled_register_form();
    form.submit(&api, &CancelToken::new()).await;

    let banner = form.banner.expect("banner shown");
    assert_eq!(banner.kind, BannerKind::Success);
    assert!(form.draft.name.is_empty());
    assert!(form.draft.profile_pic.is_empty());
}

#[tokio::test]
async fn registration_other_message_keeps_form() {
    let api = setup();
    api.client().on(
        HttpMethod::Post,
        "/user/register",
        200,
        json!({"message": "Phone already registered"}),
    );

    let mut form = filled_register_form();
    form.submit(&api, &CancelToken::new()).await;

    let banner = form.banner.expect("banner shown");
    assert_eq!(banner.kind, BannerKind::Error);
    assert_eq!(banner.message, "Phone already registered");
    assert_eq!(form.draft.dob, "1990-01-15");
    assert_eq!(form.draft.name, "Ada Lovelace");
}

#[tokio::test]
async fn admin_login_then_root_redirects_to_profile() {
    let api = setup();
    api.client().on(
        HttpMethod::Post,
        "/user/login",
        200,
        json!({"message": "Login successful", "data": {"token": "abc", "id": "1"}}),
    );

    let mut guard = RouteGuard::from_session(api.session());
    assert_eq!(guard.resolve(AppRoute::Root), Navigation::Redirect(AppRoute::Login));

    let mut form = LoginForm::new();
    form.draft.identifier = "ada@example.com".into();
    form.draft.password = "analytical".into();
    form.draft.role = Role::Admin;

    assert!(form.submit(&api, &CancelToken::new(), &mut guard).await);
    assert!(api.session().is_authenticated());
    assert_eq!(api.session().role(), Some(Role::Admin));
    assert_eq!(guard.resolve(AppRoute::Root), Navigation::Redirect(AppRoute::Profile));
    assert_eq!(guard.resolve(AppRoute::Login), Navigation::Redirect(AppRoute::Profile));
}

#[tokio::test]
async fn profile_fetch_failure_shows_error_without_data() {
    let api = setup();
    api.session().set_session("abc", "1", Role::User).unwrap();
    api.client().on(HttpMethod::Get, "/user/me", 500, json!({}));

    let mut view = ProfileView::new(api.session(), Duration::from_secs(3));
    view.load(&api, &CancelToken::new()).await;

    assert!(!view.loading);
    assert!(view.profile.is_none());
    assert!(view.banner.expect("error banner").is_error());
}

#[tokio::test]
async fn non_admin_never_lists_users() {
    let api = setup();
    api.session().set_session("abc", "1", Role::User).unwrap();
    api.client().on(
        HttpMethod::Get,
        "/user/me",
        200,
        json!({"message": "User profile retrieved successfully", "data": profile("USER")}),
    );

    let mut view = ProfileView::new(api.session(), Duration::from_secs(3));
    view.load(&api, &CancelToken::new()).await;

    assert!(view.profile.is_some());
    assert!(api.client().hit(HttpMethod::Get, "/user/me"));
    assert!(!api.client().hit(HttpMethod::Get, "/api/admin/users"));
    assert!(!view.visible_tabs().contains(&ProfileTab::Users));
}

#[tokio::test]
async fn admin_loads_profile_and_users() {
    let api = setup();
    api.session().set_session("abc", "1", Role::Admin).unwrap();
    api.client().on(
        HttpMethod::Get,
        "/user/me",
        200,
        json!({"message": "User profile retrieved successfully", "data": profile("ADMIN")}),
    );
    api.client().on(
        HttpMethod::Get,
        "/api/admin/users",
        200,
        json!({"message": "Users retrieved successfully", "data": [profile("ADMIN"), profile("USER")]}),
    );

    let mut view = ProfileView::new(api.session(), Duration::from_secs(3));
    view.load(&api, &CancelToken::new()).await;

    assert_eq!(view.users.len(), 2);
    assert!(view.banner.is_none());
    assert!(view.select_tab(ProfileTab::Users));
}

#[tokio::test]
async fn unmounted_view_ignores_late_results() {
    let api = setup();
    api.session().set_session("abc", "1", Role::User).unwrap();
    let cancel = CancelToken::new();
    cancel.cancel();

    let mut view = ProfileView::new(api.session(), Duration::from_secs(3));
    view.load(&api, &cancel).await;

    assert!(view.banner.is_none());
    assert!(view.profile.is_none());
    assert!(!api.client().hit(HttpMethod::Get, "/user/me"));
}

#[tokio::test]
async fn logout_returns_to_login() {
    let api = setup();
    api.session().set_session("abc", "1", Role::User).unwrap();
    let mut guard = RouteGuard::from_session(api.session());
    let mut view = ProfileView::new(api.session(), Duration::from_secs(3));

    view.logout(&mut guard, api.session()).unwrap();

    assert!(!api.session().is_authenticated());
    assert_eq!(guard.resolve(AppRoute::Profile), Navigation::Redirect(AppRoute::Login));
    assert_eq!(guard.resolve(AppRoute::Register), Navigation::Render(AppRoute::Register));
}

//! 账户服务 API 网关
//!
//! 把领域操作翻译成 HTTP 调用，按需附加 Bearer 认证头，并返回类型化结果。
//! 成功与否同时取决于 HTTP 状态码和服务端消息，判定逻辑集中在这里，视图层不比较字符串。

use std::sync::Arc;

use accountdesk_shared::protocol::{
    ApiRequest, FetchProfileRequest, ListUsersRequest, UploadPictureRequest,
};
use accountdesk_shared::{
    ApiEnvelope, CONTENT_TYPE_JSON, HEADER_AUTHORIZATION, HEADER_CONTENT_TYPE,
    LoginRequest, RegisterRequest, UPLOAD_FIELD_NAME, UpdateProfileRequest, UserListEntry,
    UserProfile,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cancel::CancelToken;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::request::{HttpClient, HttpRequest, HttpResponse, UploadFile};
use crate::session::{Session, SessionStore};

#[derive(Clone)]
pub struct AccountApi<C> {
    client: C,
    session: SessionStore,
    config: Arc<ClientConfig>,
}

impl<C> AccountApi<C> {
    pub fn new(client: C, session: SessionStore, config: ClientConfig) -> Self {
        Self {
            client,
            session,
            config: Arc::new(config),
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn client(&self) -> &C {
        &self.client
    }
}

impl<C: HttpClient> AccountApi<C> {
    /// 注册新账户
    pub async fn register(&self, req: &RegisterRequest, cancel: &CancelToken) -> ClientResult<()> {
        let http = self.json_request::<RegisterRequest, _>(req)?;
        let resp = self.dispatch("register", http, cancel).await?;
        expect_message::<RegisterRequest>(&resp, &self.config.messages.registered)
            .inspect_err(|e| log_failure("register", e))?;
        info!("registration accepted");
        Ok(())
    }

    /// 登录并写入会话
    ///
    /// 持久化的角色优先取服务端回传值，缺省时使用客户端提交的角色。
    /// 请求在途中被取消时不写会话。
    pub async fn login(&self, req: &LoginRequest, cancel: &CancelToken) -> ClientResult<Session> {
        let http = self.json_request::<LoginRequest, _>(req)?;
        let resp = self.dispatch("login", http, cancel).await?;
        let session = login_session(&resp, req).inspect_err(|e| log_failure("login", e))?;

        cancel.check()?;
        self.session.create(&session)?;
        info!(user_id = %session.user_id, role = %session.role, "logged in");
        Ok(session)
    }

    /// 获取当前用户资料
    pub async fn fetch_profile(&self, cancel: &CancelToken) -> ClientResult<UserProfile> {
        let http = self.request::<FetchProfileRequest>()?;
        let resp = self.dispatch("fetch_profile", http, cancel).await?;
        expect_message::<FetchProfileRequest>(&resp, &self.config.messages.profile_retrieved)
            .and_then(|data| data.ok_or_else(|| ClientError::decode("response has no profile")))
            .inspect_err(|e| log_failure("fetch_profile", e))
    }

    /// 整体提交编辑草稿，返回服务端更新后的资料
    pub async fn update_profile(
        &self,
        draft: &UpdateProfileRequest,
        cancel: &CancelToken,
    ) -> ClientResult<UserProfile> {
        let http = self.json_request::<UpdateProfileRequest, _>(draft)?;
        let resp = self.dispatch("update_profile", http, cancel).await?;
        expect_message::<UpdateProfileRequest>(&resp, &self.config.messages.profile_updated)
            .and_then(|data| data.ok_or_else(|| ClientError::decode("response has no profile")))
            .inspect_err(|e| log_failure("update_profile", e))
    }

    /// 列出所有用户（管理员）
    pub async fn list_users(&self, cancel: &CancelToken) -> ClientResult<Vec<UserListEntry>> {
        let http = self.request::<ListUsersRequest>()?;
        let resp = self.dispatch("list_users", http, cancel).await?;
        expect_message::<ListUsersRequest>(&resp, &self.config.messages.users_retrieved)
            .map(Option::unwrap_or_default)
            .inspect_err(|e| log_failure("list_users", e))
    }

    /// 上传头像，返回服务端原始 JSON
    ///
    /// 只携带 Authorization 头，Content-Type 由传输层按 multipart 设置。
    pub async fn upload_profile_picture(
        &self,
        file: UploadFile,
        cancel: &CancelToken,
    ) -> ClientResult<serde_json::Value> {
        let http = self
            .request::<UploadPictureRequest>()?
            .with_file(UPLOAD_FIELD_NAME, file);
        let resp = self.dispatch("upload_profile_picture", http, cancel).await?;
        if !resp.ok() {
            let err = ClientError::rejected(resp.status, server_message(&resp));
            log_failure("upload_profile_picture", &err);
            return Err(err);
        }
        resp.json::<<UploadPictureRequest as ApiRequest>::Data>()
            .inspect_err(|e| log_failure("upload_profile_picture", e))
    }

    // =========================================================
    // 内部工具
    // =========================================================

    /// 构建请求；需要认证的接口在没有 token 时直接失败，不发出请求
    fn request<R: ApiRequest>(&self) -> ClientResult<HttpRequest> {
        let req = HttpRequest::new(&self.config.url(R::PATH), R::METHOD);
        if !R::AUTHENTICATED {
            return Ok(req);
        }
        match self.session.token() {
            Some(token) => Ok(req.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token))),
            None => {
                warn!(path = R::PATH, "authenticated request without a session");
                Err(ClientError::Unauthenticated)
            }
        }
    }

    fn json_request<R: ApiRequest, B: Serialize>(&self, body: &B) -> ClientResult<HttpRequest> {
        let body = serde_json::to_string(body)?;
        Ok(self
            .request::<R>()?
            .with_header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON)
            .with_json(body))
    }

    async fn dispatch(
        &self,
        op: &'static str,
        req: HttpRequest,
        cancel: &CancelToken,
    ) -> ClientResult<HttpResponse> {
        cancel.check()?;
        debug!(op, method = req.method.as_str(), url = %req.url, "dispatching request");

        let resp = self
            .client
            .send(req)
            .await
            .inspect_err(|e| log_failure(op, e))?;

        if cancel.is_cancelled() {
            debug!(op, "response arrived after cancellation, discarded");
            return Err(ClientError::Cancelled);
        }
        debug!(op, status = resp.status, "response received");
        Ok(resp)
    }
}

// =========================================================
// 响应判定
// =========================================================

/// 尽力从任意响应体里取出服务端消息
fn server_message(resp: &HttpResponse) -> Option<String> {
    serde_json::from_str::<ApiEnvelope<serde_json::Value>>(&resp.body)
        .ok()
        .and_then(|env| env.message)
}

/// 2xx 且消息与期望一致才算成功，返回该接口的 `data`
fn expect_message<R: ApiRequest>(
    resp: &HttpResponse,
    expected: &str,
) -> ClientResult<Option<R::Data>> {
    if !resp.ok() {
        return Err(ClientError::rejected(resp.status, server_message(resp)));
    }
    let envelope: ApiEnvelope<R::Data> = resp.json()?;
    if !envelope.message_is(expected) {
        return Err(ClientError::rejected(resp.status, envelope.message));
    }
    Ok(envelope.data)
}

/// 2xx 且 `data.token` 存在才算登录成功
fn login_session(resp: &HttpResponse, req: &LoginRequest) -> ClientResult<Session> {
    if !resp.ok() {
        return Err(ClientError::rejected(resp.status, server_message(resp)));
    }
    let envelope: ApiEnvelope<<LoginRequest as ApiRequest>::Data> = resp.json()?;
    let Some(data) = envelope.data else {
        return Err(ClientError::rejected(resp.status, envelope.message));
    };
    let Some(token) = data.token.filter(|t| !t.is_empty()) else {
        return Err(ClientError::rejected(resp.status, envelope.message));
    };
    let user_id = data
        .id
        .ok_or_else(|| ClientError::decode("login response has no user id"))?;

    let role = match data.role {
        Some(server_role) => {
            if server_role != req.role {
                info!(submitted = %req.role, server = %server_role, "using server-asserted role");
            }
            server_role
        }
        None => req.role,
    };

    Ok(Session::new(token, user_id, role))
}

fn log_failure(op: &str, e: &ClientError) {
    if !e.is_cancelled() {
        warn!(op, code = e.error_code(), error = %e, "request failed");
    }
}

use accountdesk_shared::{RegisterRequest, Role};
use tracing::debug;

use super::Banner;
use crate::api::AccountApi;
use crate::cancel::CancelToken;
use crate::error::{ClientError, ClientResult};
use crate::request::HttpClient;
use crate::validate::{
    Field, ValidationErrors, Validator, check_dob, check_email, check_image_url, check_name,
    check_password, check_phone,
};

pub const REGISTER_SUCCESS: &str = "Registration successful! You can now login.";
pub const REGISTER_STATUS_NOTE: &str =
    "Registration completed successfully. Please use your credentials to login.";
pub const REGISTER_FAILED: &str = "Registration failed";

/// 注册表单草稿
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegisterDraft {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub dob: String,
    pub profile_pic: String,
}

impl RegisterDraft {
    /// 单个文本字段的按键更新，非本表单字段忽略
    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.name = value,
            Field::Phone => self.phone = value,
            Field::Email => self.email = value,
            Field::Password => self.password = value,
            Field::Dob => self.dob = value,
            Field::ProfilePic => self.profile_pic = value,
            Field::Identifier | Field::File => {}
        }
    }

    pub fn validate(&self) -> Result<RegisterRequest, ValidationErrors> {
        Validator::new()
            .check(Field::Name, check_name(&self.name))
            .check(Field::Phone, check_phone(&self.phone))
            .check(Field::Email, check_email(&self.email))
            .check(Field::Password, check_password(&self.password))
            .check(Field::Dob, check_dob(&self.dob))
            .check(Field::ProfilePic, check_image_url(&self.profile_pic))
            .finish()?;

        Ok(RegisterRequest {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            role: self.role,
            dob: self.dob.trim().to_string(),
            profile_pic: self.profile_pic.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegisterForm {
    pub draft: RegisterDraft,
    pub loading: bool,
    pub banner: Option<Banner>,
    /// 成功后显示的补充说明
    pub status_note: Option<String>,
    pub field_errors: ValidationErrors,
}

impl RegisterForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// 校验草稿并进入加载状态
    ///
    /// 正在提交或校验失败时返回 `None`，不应发出请求。
    pub fn begin_submit(&mut self) -> Option<RegisterRequest> {
        if self.loading {
            return None;
        }
        self.banner = None;
        self.status_note = None;
        match self.draft.validate() {
            Ok(req) => {
                self.field_errors = ValidationErrors::default();
                self.loading = true;
                Some(req)
            }
            Err(errors) => {
                debug!(errors = %errors, "registration form invalid");
                self.field_errors = errors;
                None
            }
        }
    }

    /// 成功时清空表单；失败时保留用户输入
    pub fn finish_submit(&mut self, result: ClientResult<()>) {
        self.loading = false;
        match result {
            Ok(()) => {
                self.banner = Some(Banner::success(REGISTER_SUCCESS));
                self.status_note = Some(REGISTER_STATUS_NOTE.to_string());
                self.draft = RegisterDraft::default();
            }
            Err(ClientError::Cancelled) => {}
            Err(e) => {
                self.banner = Some(Banner::error(e.user_message(REGISTER_FAILED)));
            }
        }
    }

    pub async fn submit<C: HttpClient>(&mut self, api: &AccountApi<C>, cancel: &CancelToken) {
        if let Some(req) = self.begin_submit() {
            let result = api.register(&req, cancel).await;
            self.finish_submit(result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NETWORK_ERROR_MESSAGE;
    use crate::views::BannerKind;

    fn filled() -> RegisterForm {
        let mut form = RegisterForm::new();
        form.draft.set(Field::Name, "Ada Lovelace".into());
        form.draft.set(Field::Phone, "+1234567890".into());
        form.draft.set(Field::Email, "ada@example.com".into());
        form.draft.set(Field::Password, "analytical".into());
        form.draft.set(Field::Dob, "1990-01-15".into());
        form.draft.set(Field::ProfilePic, "https://x.com/a.png".into());
        form
    }

    #[test]
    fn invalid_draft_sends_nothing() {
        let mut form = filled();
        form.draft.set(Field::Password, "short".into());
        assert!(form.begin_submit().is_none());
        assert!(!form.loading);
        assert!(form.field_errors.for_field(Field::Password).is_some());
    }

    #[test]
    fn success_resets_draft_and_shows_banner() {
        let mut form = filled();
        form.draft.role = Role::Admin;
        let req = form.begin_submit().unwrap();
        assert_eq!(req.role, Role::Admin);
        assert!(form.loading);
        assert!(form.begin_submit().is_none(), "double submit is ignored");

        form.finish_submit(Ok(()));
        assert!(!form.loading);
        assert_eq!(form.draft, RegisterDraft::default());
        assert_eq!(form.draft.role, Role::User);
        assert_eq!(form.banner, Some(Banner::success(REGISTER_SUCCESS)));
        assert!(form.status_note.is_some());
    }

    #[test]
    fn rejection_keeps_draft() {
        let mut form = filled();
        form.begin_submit().unwrap();
        form.finish_submit(Err(ClientError::rejected(400, Some("Email already exists".into()))));

        let banner = form.banner.clone().unwrap();
        assert_eq!(banner.kind, BannerKind::Error);
        assert_eq!(banner.message, "Email already exists");
        assert_eq!(form.draft, filled().draft);
    }

    #[test]
    fn network_failure_uses_generic_message() {
        let mut form = filled();
        form.begin_submit().unwrap();
        form.finish_submit(Err(ClientError::transport("offline")));
        assert_eq!(form.banner.unwrap().message, NETWORK_ERROR_MESSAGE);
    }

    #[test]
    fn cancelled_submit_is_silent() {
        let mut form = filled();
        form.begin_submit().unwrap();
        form.finish_submit(Err(ClientError::Cancelled));
        assert!(form.banner.is_none());
        assert!(!form.loading);
    }
}

use accountdesk_shared::{LoginRequest, Role};

use super::Banner;
use crate::api::AccountApi;
use crate::cancel::CancelToken;
use crate::error::{ClientError, ClientResult};
use crate::request::HttpClient;
use crate::route::RouteGuard;
use crate::session::Session;
use crate::validate::{Field, ValidationErrors, Validator, check_identifier};

pub const LOGIN_FAILED: &str = "Login failed";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoginDraft {
    /// 邮箱或手机号
    pub identifier: String,
    pub password: String,
    pub role: Role,
}

impl LoginDraft {
    pub fn validate(&self) -> Result<LoginRequest, ValidationErrors> {
        Validator::new()
            .check(Field::Identifier, check_identifier(&self.identifier))
            .check(
                Field::Password,
                if self.password.is_empty() {
                    Err("Password is required".to_string())
                } else {
                    Ok(())
                },
            )
            .finish()?;

        Ok(LoginRequest::from_identifier(
            &self.identifier,
            self.password.clone(),
            self.role,
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoginForm {
    pub draft: LoginDraft,
    pub loading: bool,
    pub banner: Option<Banner>,
    pub field_errors: ValidationErrors,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_submit(&mut self) -> Option<LoginRequest> {
        if self.loading {
            return None;
        }
        self.banner = None;
        match self.draft.validate() {
            Ok(req) => {
                self.field_errors = ValidationErrors::default();
                self.loading = true;
                Some(req)
            }
            Err(errors) => {
                self.field_errors = errors;
                None
            }
        }
    }

    /// 登录成功时翻转守卫状态，这是进入已认证状态的唯一入口
    ///
    /// 返回是否已认证。任何失败都会清空密码框。
    pub fn finish_submit(&mut self, result: ClientResult<Session>, guard: &mut RouteGuard) -> bool {
        self.loading = false;
        match result {
            Ok(_) => {
                self.draft.password.clear();
                guard.on_login_success();
                true
            }
            Err(ClientError::Cancelled) => false,
            Err(e) => {
                self.draft.password.clear();
                self.banner = Some(Banner::error(e.user_message(LOGIN_FAILED)));
                false
            }
        }
    }

    pub async fn submit<C: HttpClient>(
        &mut self,
        api: &AccountApi<C>,
        cancel: &CancelToken,
        guard: &mut RouteGuard,
    ) -> bool {
        match self.begin_submit() {
            Some(req) => {
                let result = api.login(&req, cancel).await;
                self.finish_submit(result, guard)
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::{AppRoute, Navigation};

    fn form(identifier: &str, password: &str) -> LoginForm {
        LoginForm {
            draft: LoginDraft {
                identifier: identifier.into(),
                password: password.into(),
                role: Role::Admin,
            },
            ..LoginForm::default()
        }
    }

    #[test]
    fn missing_fields_are_reported() {
        let mut f = form("", "");
        assert!(f.begin_submit().is_none());
        assert!(f.field_errors.for_field(Field::Identifier).is_some());
        assert!(f.field_errors.for_field(Field::Password).is_some());
    }

    #[test]
    fn success_flips_the_guard() {
        let mut f = form("ada@example.com", "password1");
        let mut guard = RouteGuard::default();
        let req = f.begin_submit().unwrap();
        assert_eq!(req.email.as_deref(), Some("ada@example.com"));
        assert_eq!(req.role, Role::Admin);

        let authed = f.finish_submit(Ok(Session::new("abc", "1", Role::Admin)), &mut guard);
        assert!(authed);
        assert_eq!(guard.resolve(AppRoute::Root), Navigation::Redirect(AppRoute::Profile));
    }

    #[test]
    fn failure_shows_server_message_and_clears_password() {
        let mut f = form("+1234567890", "password1");
        let mut guard = RouteGuard::default();
        f.begin_submit().unwrap();

        let authed = f.finish_submit(
            Err(ClientError::rejected(401, Some("Invalid credentials".into()))),
            &mut guard,
        );
        assert!(!authed);
        assert!(!guard.is_authenticated());
        assert_eq!(f.banner.unwrap().message, "Invalid credentials");
        assert!(f.draft.password.is_empty());
        assert_eq!(f.draft.identifier, "+1234567890");
    }
}

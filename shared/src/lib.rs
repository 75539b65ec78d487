//! 账户服务的共享线上模型
//!
//! 前端与核心客户端共用的请求/响应类型，字段命名与服务端 JSON 保持一致。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod date;
pub mod protocol;
pub mod serde_helper;

pub use date::BirthDate;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// 上传头像时 multipart 表单中的字段名
pub const UPLOAD_FIELD_NAME: &str = "file";

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 账户角色，线上格式为大写字符串
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// 服务端持有的用户资料
///
/// 客户端只保存一份临时副本，每次获取/更新成功后整体替换。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(deserialize_with = "serde_helper::string_or_number")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default)]
    pub profile_pic: Option<String>,
}

/// 管理员列表中的一行，与 `UserProfile` 同构但只读
pub type UserListEntry = UserProfile;

/// 所有响应体的统一外壳 `{ message, data }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// 服务端消息是否与期望值完全一致
    pub fn message_is(&self, expected: &str) -> bool {
        self.message.as_deref() == Some(expected)
    }
}

// =========================================================
// 请求体 (Request Bodies)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub dob: String,
    pub profile_pic: String,
}

/// 登录凭据：邮箱与手机号二选一
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub password: String,
    pub role: Role,
}

impl LoginRequest {
    /// 根据标识符形态决定作为邮箱还是手机号发送
    pub fn from_identifier(identifier: &str, password: String, role: Role) -> Self {
        let identifier = identifier.trim().to_string();
        let (email, phone) = if identifier.contains('@') {
            (Some(identifier), None)
        } else {
            (None, Some(identifier))
        };
        Self {
            email,
            phone,
            password,
            role,
        }
    }
}

/// 登录成功后服务端返回的 `data`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginData {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default, deserialize_with = "serde_helper::opt_string_or_number")]
    pub id: Option<String>,
    /// 部分服务端版本会回传实际角色
    #[serde(default)]
    pub role: Option<Role>,
}

/// `PUT /user/me` 的请求体，对应可编辑的资料子集
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: String,
    pub phone: String,
    pub dob: String,
    pub profile_pic: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn profile_accepts_numeric_id_and_missing_optionals() {
        let profile: UserProfile = serde_json::from_value(json!({
            "id": 42,
            "name": "Ada",
            "email": "ada@example.com",
            "role": "ADMIN"
        }))
        .unwrap();

        assert_eq!(profile.id, "42");
        assert_eq!(profile.role, Role::Admin);
        assert!(profile.phone.is_none());
        assert!(profile.profile_pic.is_none());
    }

    #[test]
    fn register_request_uses_camel_case_wire_names() {
        let req = RegisterRequest {
            name: "Ada".into(),
            phone: "+1234567890".into(),
            email: "ada@example.com".into(),
            password: "secret-pass".into(),
            role: Role::User,
            dob: "1990-01-15".into(),
            profile_pic: "https://x.com/a.png".into(),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["profilePic"], "https://x.com/a.png");
        assert_eq!(value["role"], "USER");
    }

    #[test]
    fn login_identifier_selects_email_or_phone() {
        let by_mail = LoginRequest::from_identifier(" ada@example.com ", "pw".into(), Role::Admin);
        assert_eq!(by_mail.email.as_deref(), Some("ada@example.com"));
        assert!(by_mail.phone.is_none());

        let by_phone = LoginRequest::from_identifier("+1234567890", "pw".into(), Role::User);
        let value = serde_json::to_value(&by_phone).unwrap();
        assert_eq!(value["phone"], "+1234567890");
        assert!(value.get("email").is_none());
    }

    #[test]
    fn envelope_tolerates_missing_fields() {
        let env: ApiEnvelope<LoginData> = serde_json::from_str("{}").unwrap();
        assert!(env.message.is_none());
        assert!(env.data.is_none());
        assert!(!env.message_is("anything"));
    }

    #[test]
    fn envelope_data_needs_no_default() {
        #[derive(Debug, Deserialize)]
        struct Rows(Vec<u32>);

        fn parse<T: serde::de::DeserializeOwned>(body: &str) -> ApiEnvelope<T> {
            serde_json::from_str(body).unwrap()
        }

        let env = parse::<Rows>(r#"{"message":"ok"}"#);
        assert!(env.message_is("ok"));
        assert!(env.data.is_none());
        let env = parse::<Rows>(r#"{"data":[1,2]}"#);
        assert_eq!(env.data.unwrap().0, vec![1, 2]);
    }

    #[test]
    fn role_parses_only_wire_spelling() {
        assert_eq!("ADMIN".parse::<Role>(), Ok(Role::Admin));
        assert!("admin".parse::<Role>().is_err());
    }
}

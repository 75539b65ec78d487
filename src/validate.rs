//! 表单字段校验
//!
//! 规则与服务端约束保持一致，在请求发出前拦截明显无效的输入。

use std::fmt;

use accountdesk_shared::BirthDate;

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 50;
pub const PASSWORD_MIN_CHARS: usize = 8;

/// 头像 URL 允许的扩展名（大小写不敏感）
pub const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// 表单字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Phone,
    Email,
    Identifier,
    Password,
    Dob,
    ProfilePic,
    File,
}

impl Field {
    /// 线上字段名，同时作为表单控件的 `name`
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Phone => "phone",
            Field::Email => "email",
            Field::Identifier => "identifier",
            Field::Password => "password",
            Field::Dob => "dob",
            Field::ProfilePic => "profilePic",
            Field::File => "file",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// 一次提交中收集到的全部字段错误
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn push(&mut self, field: Field, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// 指定字段的第一条错误，供内联展示
    pub fn for_field(&self, field: Field) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", err.field.as_str(), err.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

// =========================================================
// 单字段规则
// =========================================================

pub fn check_name(value: &str) -> Result<(), String> {
    let len = value.trim().chars().count();
    if len == 0 {
        return Err("Name is required".into());
    }
    if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&len) {
        return Err(format!(
            "Name must be between {} and {} characters",
            NAME_MIN_CHARS, NAME_MAX_CHARS
        ));
    }
    Ok(())
}

pub fn check_password(value: &str) -> Result<(), String> {
    if value.chars().count() < PASSWORD_MIN_CHARS {
        return Err(format!(
            "Password must be at least {} characters",
            PASSWORD_MIN_CHARS
        ));
    }
    Ok(())
}

pub fn check_email(value: &str) -> Result<(), String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("Email is required".into());
    }
    match value.split_once('@') {
        Some((local, domain))
            if !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !value.contains(char::is_whitespace) =>
        {
            Ok(())
        }
        _ => Err("Enter a valid email address".into()),
    }
}

pub fn check_phone(value: &str) -> Result<(), String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("Phone is required".into());
    }
    let allowed = value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'));
    if !allowed || !value.chars().any(|c| c.is_ascii_digit()) {
        return Err("Enter a valid phone number".into());
    }
    Ok(())
}

pub fn check_identifier(value: &str) -> Result<(), String> {
    if value.trim().contains('@') {
        check_email(value)
    } else {
        check_phone(value).map_err(|_| "Enter your email or phone number".to_string())
    }
}

pub fn check_dob(value: &str) -> Result<(), String> {
    BirthDate::parse(value.trim())
        .map(|_| ())
        .map_err(|e| format!("Date of birth: {}", e))
}

pub fn check_image_url(value: &str) -> Result<(), String> {
    let value = value.trim();
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
        .ok_or_else(|| "Profile picture must be an http(s) URL".to_string())?;

    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() {
        return Err("Profile picture URL has no host".into());
    }

    let path = rest.split(['?', '#']).next().unwrap_or_default();
    let ext = path
        .rsplit_once('.')
        .filter(|(stem, _)| stem.contains('/'))
        .map(|(_, ext)| ext.to_ascii_lowercase());
    match ext {
        Some(ext) if IMAGE_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(format!(
            "Must be a valid image URL ending with {}",
            IMAGE_EXTENSIONS.join(", ")
        )),
    }
}

// =========================================================
// 组合校验器
// =========================================================

/// 按字段累积错误，最后一次性返回
#[derive(Debug, Default)]
pub struct Validator {
    errors: ValidationErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(mut self, field: Field, result: Result<(), String>) -> Self {
        if let Err(message) = result {
            self.errors.push(field, message);
        }
        self
    }

    /// 可选字段：为空时跳过规则
    pub fn optional(self, field: Field, value: &str, rule: fn(&str) -> Result<(), String>) -> Self {
        if value.trim().is_empty() {
            self
        } else {
            self.check(field, rule(value))
        }
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_length_bounds() {
        assert!(check_name("A").is_err());
        assert!(check_name("Al").is_ok());
        assert!(check_name(&"x".repeat(50)).is_ok());
        assert!(check_name(&"x".repeat(51)).is_err());
        assert!(check_name("   ").is_err());
    }

    #[test]
    fn password_needs_eight_chars() {
        assert!(check_password("short").is_err());
        assert!(check_password("12345678").is_ok());
    }

    #[test]
    fn image_url_allow_list() {
        assert!(check_image_url("https://x.com/a.png").is_ok());
        assert!(check_image_url("http://cdn.example.com/p/me.JPEG?v=2").is_ok());
        assert!(check_image_url("https://x.com/a.webp#frag").is_ok());
        assert!(check_image_url("https://x.com/a.svg").is_err());
        assert!(check_image_url("https://x.com/png").is_err());
        assert!(check_image_url("https://x.png").is_err());
        assert!(check_image_url("ftp://x.com/a.png").is_err());
        assert!(check_image_url("https:///a.png").is_err());
    }

    #[test]
    fn email_and_phone_shapes() {
        assert!(check_email("ada@example.com").is_ok());
        assert!(check_email("ada@").is_err());
        assert!(check_email("a b@example.com").is_err());
        assert!(check_phone("+1 (234) 567-890").is_ok());
        assert!(check_phone("call me").is_err());
        assert!(check_identifier("+1234567890").is_ok());
        assert!(check_identifier("ada@example.com").is_ok());
        assert!(check_identifier("ada").is_err());
    }

    #[test]
    fn validator_collects_every_failure() {
        let result = Validator::new()
            .check(Field::Name, check_name("A"))
            .check(Field::Password, check_password("123"))
            .optional(Field::Dob, "", check_dob)
            .optional(Field::ProfilePic, "https://x.com/a.png", check_image_url)
            .finish();

        let errors = result.unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.for_field(Field::Name).is_some());
        assert!(errors.for_field(Field::Password).is_some());
        assert!(errors.for_field(Field::Dob).is_none());
        assert!(errors.to_string().starts_with("name: "));
    }
}

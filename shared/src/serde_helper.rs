//! 宽松的 id 反序列化
//!
//! 服务端有的版本把 id 作为数字返回，有的作为字符串返回；客户端统一保存为字符串。

use serde::{Deserialize, Deserializer, de};

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Unsigned(u64),
    Signed(i64),
}

impl From<StringOrNumber> for String {
    fn from(v: StringOrNumber) -> Self {
        match v {
            StringOrNumber::String(s) => s,
            StringOrNumber::Unsigned(n) => n.to_string(),
            StringOrNumber::Signed(n) => n.to_string(),
        }
    }
}

pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = StringOrNumber::deserialize(deserializer)
        .map_err(|_| de::Error::custom("expected a string or integer id"))?;
    Ok(value.into())
}

pub fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<StringOrNumber>::deserialize(deserializer)
        .map_err(|_| de::Error::custom("expected a string or integer id"))?;
    Ok(value.map(Into::into))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "opt_string_or_number")]
        id: Option<String>,
    }

    #[test]
    fn accepts_all_id_shapes() {
        let h: Holder = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        assert_eq!(h.id.as_deref(), Some("7"));
        let h: Holder = serde_json::from_str(r#"{"id": "u-7"}"#).unwrap();
        assert_eq!(h.id.as_deref(), Some("u-7"));
        let h: Holder = serde_json::from_str(r#"{"id": null}"#).unwrap();
        assert!(h.id.is_none());
        let h: Holder = serde_json::from_str(r#"{}"#).unwrap();
        assert!(h.id.is_none());
    }

    #[test]
    fn rejects_non_scalar_ids() {
        assert!(serde_json::from_str::<Holder>(r#"{"id": [1]}"#).is_err());
    }
}

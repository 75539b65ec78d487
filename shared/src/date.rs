//! 出生日期类型
//!
//! 表单里的日期以 `YYYY-MM-DD` 文本传输。`BirthDate` 在形态校验之外还要求是真实存在的日历日期。

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// 日期解析失败的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BirthDateError {
    /// 不符合 `YYYY-MM-DD` 形态
    Pattern,
    /// 形态正确但日期不存在（如 2月30日）
    Calendar,
}

impl fmt::Display for BirthDateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BirthDateError::Pattern => f.write_str("date must use the YYYY-MM-DD format"),
            BirthDateError::Calendar => f.write_str("date does not exist"),
        }
    }
}

impl std::error::Error for BirthDateError {}

/// 校验过的出生日期
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BirthDate(NaiveDate);

impl BirthDate {
    /// 与 `^\d{4}-\d{2}-\d{2}$` 等价的形态检查
    pub fn matches_pattern(s: &str) -> bool {
        let bytes = s.as_bytes();
        bytes.len() == 10
            && bytes.iter().enumerate().all(|(i, b)| match i {
                4 | 7 => *b == b'-',
                _ => b.is_ascii_digit(),
            })
    }

    pub fn parse(s: &str) -> Result<Self, BirthDateError> {
        if !Self::matches_pattern(s) {
            return Err(BirthDateError::Pattern);
        }
        NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(Self)
            .map_err(|_| BirthDateError::Calendar)
    }
}

impl FromStr for BirthDate {
    type Err = BirthDateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for BirthDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_dates() {
        let d = BirthDate::parse("1990-01-15").unwrap();
        assert_eq!(d.to_string(), "1990-01-15");
    }

    #[test]
    fn pattern_is_strict() {
        assert_eq!(BirthDate::parse("1990-1-15"), Err(BirthDateError::Pattern));
        assert_eq!(BirthDate::parse("15/01/1990"), Err(BirthDateError::Pattern));
        assert_eq!(BirthDate::parse(" 1990-01-15"), Err(BirthDateError::Pattern));
    }

    #[test]
    fn rejects_impossible_days() {
        assert_eq!(BirthDate::parse("1990-02-30"), Err(BirthDateError::Calendar));
        assert_eq!(BirthDate::parse("1990-13-01"), Err(BirthDateError::Calendar));
    }
}

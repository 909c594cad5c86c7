//! KQL literal serialization.
//!
//! Query builders splice caller data (resource-id lists, datetimes) into KQL
//! source; these helpers produce the literal forms the backend parses back
//! out: single-quoted strings, `dynamic([...])` arrays, `datetime(...)`
//! stamps, and `dynamic(null)`.

use chrono::{DateTime, NaiveDate, Utc};

/// A value that has a KQL literal representation.
pub trait KqlLiteral {
    /// Render this value as KQL literal source.
    fn to_kql(&self) -> String;
}

/// Single-quoted KQL string literal with backslash escaping.
pub fn str_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}

impl KqlLiteral for str {
    fn to_kql(&self) -> String {
        str_literal(self)
    }
}

impl KqlLiteral for String {
    fn to_kql(&self) -> String {
        str_literal(self)
    }
}

impl<S: AsRef<str>> KqlLiteral for [S] {
    /// Lists render as `dynamic([...])`, which `in (...)` accepts directly.
    fn to_kql(&self) -> String {
        let items: Vec<&str> = self.iter().map(AsRef::as_ref).collect();
        format!("dynamic({})", serde_json::Value::from(items))
    }
}

impl<S: AsRef<str>> KqlLiteral for Vec<S> {
    fn to_kql(&self) -> String {
        self.as_slice().to_kql()
    }
}

impl KqlLiteral for DateTime<Utc> {
    fn to_kql(&self) -> String {
        format!("datetime({})", self.to_rfc3339())
    }
}

impl KqlLiteral for NaiveDate {
    fn to_kql(&self) -> String {
        format!("datetime({self})")
    }
}

impl<T: KqlLiteral> KqlLiteral for Option<T> {
    /// `None` renders as the KQL null literal.
    fn to_kql(&self) -> String {
        match self {
            Some(value) => value.to_kql(),
            None => "dynamic(null)".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn strings_are_single_quoted_and_escaped() {
        assert_eq!("plain".to_kql(), "'plain'");
        assert_eq!("it's".to_kql(), r"'it\'s'");
        assert_eq!(r"c:\tmp".to_kql(), r"'c:\\tmp'");
        assert_eq!("a\nb".to_kql(), r"'a\nb'");
    }

    #[test]
    fn lists_render_as_dynamic_json() {
        let ids = vec!["/subscriptions/a/vm1", "/subscriptions/b/vm2"];
        assert_eq!(
            ids.to_kql(),
            r#"dynamic(["/subscriptions/a/vm1","/subscriptions/b/vm2"])"#
        );
    }

    #[test]
    fn empty_list_renders_as_empty_dynamic() {
        let ids: Vec<String> = vec![];
        assert_eq!(ids.to_kql(), "dynamic([])");
    }

    #[test]
    fn datetimes_render_as_datetime_literals() {
        let stamp = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(stamp.to_kql(), "datetime(2024-03-01T12:30:00+00:00)");

        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(day.to_kql(), "datetime(2024-03-01)");
    }

    #[test]
    fn none_renders_as_dynamic_null() {
        let missing: Option<String> = None;
        assert_eq!(missing.to_kql(), "dynamic(null)");
        assert_eq!(Some("x".to_string()).to_kql(), "'x'");
    }
}

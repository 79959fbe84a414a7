use std::backtrace::BacktraceStatus;
use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt::Write;

use serde::Serialize;

use crate::common::constants::STRINGIFY_FAILED;

/// One value handed to a logging call.
///
/// Conversion to text is decided by a closed check rather than by runtime type
/// inspection: errors render their trace (or message), text is used as is,
/// and everything else goes through serde_json, falling back to
/// [`STRINGIFY_FAILED`] when serialization fails.
#[derive(Debug, Clone, PartialEq)]
pub enum LogValue {
    Text(String),
    Error {
        message: String,
        trace: Option<String>,
    },
    /// Serialized JSON, or `None` if serialization failed.
    Structured(Option<String>),
}

impl LogValue {
    pub fn text(text: impl Into<String>) -> Self {
        LogValue::Text(text.into())
    }

    /// Any `std::error::Error`. The trace is the `Caused by` chain when the error has sources.
    pub fn error<E>(err: &E) -> Self
    where
        E: StdError + ?Sized,
    {
        let message = err.to_string();
        let mut source = err.source();
        if source.is_none() {
            return LogValue::Error {
                message,
                trace: None,
            };
        }

        let mut trace = format!("{}\n\nCaused by:", message);
        let mut depth = 0;
        while let Some(cause) = source {
            let _ = write!(trace, "\n    {}: {}", depth, cause);
            depth += 1;
            source = cause.source();
        }

        LogValue::Error {
            message,
            trace: Some(trace),
        }
    }

    pub fn json<T>(value: &T) -> Self
    where
        T: Serialize + ?Sized,
    {
        LogValue::Structured(serde_json::to_string(value).ok())
    }

    pub fn render(&self) -> Cow<'_, str> {
        match self {
            LogValue::Text(text) => Cow::Borrowed(text),
            LogValue::Error { message, trace } => {
                Cow::Borrowed(trace.as_deref().unwrap_or(message.as_str()))
            }
            LogValue::Structured(Some(json)) => Cow::Borrowed(json),
            LogValue::Structured(None) => Cow::Borrowed(STRINGIFY_FAILED),
        }
    }
}

impl From<&str> for LogValue {
    fn from(s: &str) -> Self {
        LogValue::Text(s.to_string())
    }
}

impl From<String> for LogValue {
    fn from(s: String) -> Self {
        LogValue::Text(s)
    }
}

impl From<&String> for LogValue {
    fn from(s: &String) -> Self {
        LogValue::Text(s.clone())
    }
}

impl From<Cow<'_, str>> for LogValue {
    fn from(s: Cow<'_, str>) -> Self {
        LogValue::Text(s.into_owned())
    }
}

impl From<char> for LogValue {
    fn from(c: char) -> Self {
        LogValue::Text(c.to_string())
    }
}

impl From<serde_json::Value> for LogValue {
    fn from(value: serde_json::Value) -> Self {
        LogValue::Structured(Some(value.to_string()))
    }
}

impl From<&serde_json::Value> for LogValue {
    fn from(value: &serde_json::Value) -> Self {
        LogValue::Structured(Some(value.to_string()))
    }
}

impl From<&anyhow::Error> for LogValue {
    fn from(err: &anyhow::Error) -> Self {
        let trace = match err.backtrace().status() {
            BacktraceStatus::Captured => Some(format!("{:?}", err)),
            _ => None,
        };
        LogValue::Error {
            message: format!("{:#}", err),
            trace,
        }
    }
}

impl From<anyhow::Error> for LogValue {
    fn from(err: anyhow::Error) -> Self {
        LogValue::from(&err)
    }
}

macro_rules! structured_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for LogValue {
                fn from(value: $ty) -> Self {
                    LogValue::json(&value)
                }
            }
        )*
    };
}

structured_from!(bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::{Error as _, Serializer};
    use serde_json::json;
    use std::fmt;

    #[derive(Debug)]
    struct Timeout;

    impl fmt::Display for Timeout {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("timeout")
        }
    }

    impl StdError for Timeout {}

    #[derive(Debug)]
    struct PaymentFailed(Timeout);

    impl fmt::Display for PaymentFailed {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("payment failed")
        }
    }

    impl StdError for PaymentFailed {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    struct Cyclic;

    impl Serialize for Cyclic {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("cycle detected"))
        }
    }

    #[test]
    fn text_is_unchanged() {
        assert_eq!(LogValue::from("plain \"quoted\"").render(), "plain \"quoted\"");
        assert_eq!(LogValue::from(String::from("owned")).render(), "owned");
    }

    #[test]
    fn error_without_source_uses_message() {
        assert_eq!(LogValue::error(&Timeout).render(), "timeout");
    }

    #[test]
    fn error_with_source_uses_trace() {
        let value = LogValue::error(&PaymentFailed(Timeout));
        assert_eq!(
            value.render(),
            "payment failed\n\nCaused by:\n    0: timeout"
        );
    }

    #[test]
    fn anyhow_error_renders_context_chain() {
        let err = anyhow::anyhow!("timeout").context("charging card");
        let value = LogValue::from(&err);
        match &value {
            LogValue::Error { message, .. } => assert_eq!(message, "charging card: timeout"),
            other => panic!("unexpected value {:?}", other),
        }
        assert!(value.render().contains("charging card"));
    }

    #[test]
    fn structured_values_serialize_compactly() {
        assert_eq!(LogValue::from(json!({"id": 7, "ok": true})).render(), r#"{"id":7,"ok":true}"#);
        assert_eq!(LogValue::from(42_u32).render(), "42");
        assert_eq!(LogValue::from(false).render(), "false");
        assert_eq!(LogValue::json(&vec!["a", "b"]).render(), r#"["a","b"]"#);
    }

    #[test]
    fn failed_serialization_yields_sentinel() {
        assert_eq!(LogValue::json(&Cyclic).render(), STRINGIFY_FAILED);
    }
}

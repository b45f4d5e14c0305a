//! Engine-facing service adapters.
//!
//! Each adapter exposes one domain service of the external BPM engine as a
//! [`crate::dispatch::ServiceHandler`]: a fixed method table whose entries
//! decode the positional wire arguments and delegate to an injected engine
//! trait object. Method names and arities mirror the remote facade's
//! service surface, including the trailing payload/marshalling-type slots.
//!
//! Further services (user tasks, documents, admin) follow the same pattern
//! and are installed by the embedder.

pub mod jobs;
pub mod process;
pub mod query;

pub use jobs::{ExecutorService, JobCommands};
pub use process::{ProcessCommands, ProcessService};
pub use query::{QueryCommands, QueryService};

use serde_json::Value;

use crate::dispatch::handler::HandlerError;

/// Failure reported by the external engine.
///
/// The message travels verbatim into the FAILURE response envelope.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("{0}")]
    Execution(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),
}

impl From<EngineError> for HandlerError {
    fn from(error: EngineError) -> Self {
        HandlerError::Failed(error.to_string())
    }
}

fn invalid_argument(method: &str, position: usize, expected: &str) -> HandlerError {
    HandlerError::InvalidArgument {
        method: method.to_string(),
        position,
        expected: expected.to_string(),
    }
}

/// Decode a required string argument.
pub(crate) fn require_str<'a>(
    method: &str,
    args: &'a [Value],
    position: usize,
) -> Result<&'a str, HandlerError> {
    args.get(position)
        .and_then(Value::as_str)
        .ok_or_else(|| invalid_argument(method, position, "string"))
}

/// Decode a required integer argument.
pub(crate) fn require_i64(
    method: &str,
    args: &[Value],
    position: usize,
) -> Result<i64, HandlerError> {
    args.get(position)
        .and_then(Value::as_i64)
        .ok_or_else(|| invalid_argument(method, position, "integer"))
}

/// Decode a required boolean argument.
pub(crate) fn require_bool(
    method: &str,
    args: &[Value],
    position: usize,
) -> Result<bool, HandlerError> {
    args.get(position)
        .and_then(Value::as_bool)
        .ok_or_else(|| invalid_argument(method, position, "boolean"))
}

/// Decode a string-or-null argument.
pub(crate) fn nullable_str<'a>(
    method: &str,
    args: &'a [Value],
    position: usize,
) -> Result<Option<&'a str>, HandlerError> {
    match args.get(position) {
        Some(Value::Null) | None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(invalid_argument(method, position, "string or null")),
    }
}

/// Decode a required list-of-strings argument.
pub(crate) fn require_string_list(
    method: &str,
    args: &[Value],
    position: usize,
) -> Result<Vec<String>, HandlerError> {
    let items = args
        .get(position)
        .and_then(Value::as_array)
        .ok_or_else(|| invalid_argument(method, position, "list of strings"))?;
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| invalid_argument(method, position, "list of strings"))
        })
        .collect()
}

/// Parse a marshalled payload argument into a JSON value.
///
/// The in-crate adapters consume JSON payloads; other marshalled formats
/// are decoded by the transport layer before dispatch.
pub(crate) fn parse_payload(
    method: &str,
    position: usize,
    raw: &str,
) -> Result<Value, HandlerError> {
    serde_json::from_str(raw).map_err(|_| invalid_argument(method, position, "marshalled payload"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_require_str_rejects_wrong_shape() {
        let args = vec![json!(5)];
        let err = require_str("startProcess", &args, 0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid argument at position 0 of 'startProcess': expected string"
        );
    }

    #[test]
    fn test_nullable_str_accepts_null_and_missing() {
        let args = vec![json!("x"), Value::Null];
        assert_eq!(nullable_str("query", &args, 0).unwrap(), Some("x"));
        assert_eq!(nullable_str("query", &args, 1).unwrap(), None);
        assert_eq!(nullable_str("query", &args, 2).unwrap(), None);
        assert!(nullable_str("query", &[json!(1)], 0).is_err());
    }

    #[test]
    fn test_require_string_list() {
        let args = vec![json!(["QUEUED", "RUNNING"])];
        assert_eq!(
            require_string_list("getRequestsByStatus", &args, 0).unwrap(),
            vec!["QUEUED".to_string(), "RUNNING".to_string()]
        );
        assert!(require_string_list("getRequestsByStatus", &[json!([1])], 0).is_err());
    }

    #[test]
    fn test_engine_error_message_travels_verbatim() {
        let handler_error: HandlerError =
            EngineError::NotFound("process instance 99".to_string()).into();
        assert_eq!(handler_error.to_string(), "not found: process instance 99");
    }

    #[test]
    fn test_parse_payload_rejects_malformed_input() {
        assert!(parse_payload("startProcess", 2, "{\"a\":1}").is_ok());
        assert!(parse_payload("startProcess", 2, "not json").is_err());
    }
}

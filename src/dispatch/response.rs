//! Response envelopes and the result wrap policy.
//!
//! Every recognized command produces exactly one [`ServiceResponse`]; the
//! ordered collection returned to the transport layer is a
//! [`ServiceResponsesList`]. [`WrapPolicy`] decides the narrow case where a
//! successful result needs an extra type-carrying envelope before
//! marshalling.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashSet;

use crate::dispatch::command::{KnownService, MarshallingFormat};

/// Outcome discriminant of a single command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResponseType {
    Success,
    Failure,
}

/// Per-command success/failure envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,

    /// Human-readable message; empty on success, the failure cause otherwise.
    pub msg: String,

    /// Returned value for SUCCESS; absent for void returns and failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl ServiceResponse {
    /// Successful outcome. `result` is `None` for void-returning methods.
    pub fn success(result: Option<Value>) -> Self {
        Self {
            response_type: ResponseType::Success,
            msg: String::new(),
            result,
        }
    }

    /// Failed outcome carrying the failure cause.
    pub fn failure(msg: impl Into<String>) -> Self {
        Self {
            response_type: ResponseType::Failure,
            msg: msg.into(),
            result: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.response_type == ResponseType::Success
    }
}

/// Ordered responses for one batch, mirroring recognized-command order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceResponsesList {
    pub responses: Vec<ServiceResponse>,
}

impl ServiceResponsesList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, response: ServiceResponse) {
        self.responses.push(response);
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ServiceResponse> {
        self.responses.iter()
    }
}

impl IntoIterator for ServiceResponsesList {
    type Item = ServiceResponse;
    type IntoIter = std::vec::IntoIter<ServiceResponse>;

    fn into_iter(self) -> Self::IntoIter {
        self.responses.into_iter()
    }
}

impl From<Vec<ServiceResponse>> for ServiceResponsesList {
    fn from(responses: Vec<ServiceResponse>) -> Self {
        Self { responses }
    }
}

/// Type-carrying envelope for results that non-self-describing formats
/// cannot round-trip as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrappedValue {
    #[serde(rename = "type")]
    pub type_tag: String,
    pub value: Value,
}

impl WrappedValue {
    pub fn new(value: Value) -> Self {
        Self {
            type_tag: type_tag(&value).to_string(),
            value,
        }
    }

    /// Convert into a plain JSON value for the response envelope.
    pub fn into_value(self) -> Value {
        json!({ "type": self.type_tag, "value": self.value })
    }
}

/// Wire-level type tag for a JSON value, matching the element names the
/// typed formats use for primitive wrappers.
fn type_tag(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean-type",
        Value::Number(n) if n.is_i64() || n.is_u64() => "long-type",
        Value::Number(_) => "double-type",
        Value::String(_) => "string-type",
        Value::Array(_) => "list-type",
        Value::Object(_) => "map-type",
    }
}

/// Policy deciding when a successful result gets the [`WrappedValue`]
/// treatment.
///
/// The decision is a pure function of (service, format). The default set
/// contains the single combination the protocol requires: query results
/// marshalled with JAXB, which cannot represent loosely-typed collections
/// without explicit type metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapPolicy {
    rules: HashSet<(KnownService, MarshallingFormat)>,
}

impl WrapPolicy {
    /// Policy that never wraps.
    pub fn none() -> Self {
        Self {
            rules: HashSet::new(),
        }
    }

    /// Build a policy from explicit (service, format) combinations.
    pub fn from_rules<I>(rules: I) -> Self
    where
        I: IntoIterator<Item = (KnownService, MarshallingFormat)>,
    {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    pub fn should_wrap(&self, service: KnownService, format: MarshallingFormat) -> bool {
        self.rules.contains(&(service, format))
    }
}

impl Default for WrapPolicy {
    fn default() -> Self {
        Self::from_rules([(KnownService::QueryDataService, MarshallingFormat::Jaxb)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response_has_empty_message() {
        let response = ServiceResponse::success(Some(json!(42)));
        assert!(response.is_success());
        assert!(response.msg.is_empty());
        assert_eq!(response.result, Some(json!(42)));
    }

    #[test]
    fn test_void_success_has_no_result() {
        let response = ServiceResponse::success(None);
        assert!(response.is_success());
        assert!(response.result.is_none());
    }

    #[test]
    fn test_failure_response_carries_message() {
        let response = ServiceResponse::failure("no such process instance 99");
        assert!(!response.is_success());
        assert_eq!(response.msg, "no such process instance 99");
        assert!(response.result.is_none());
    }

    #[test]
    fn test_response_serialization_shape() {
        let response = ServiceResponse::success(Some(json!({"id": 7})));
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["type"], "SUCCESS");
        assert_eq!(value["msg"], "");
        assert_eq!(value["result"]["id"], 7);
    }

    #[test]
    fn test_wrapped_value_type_tags() {
        assert_eq!(WrappedValue::new(json!("x")).type_tag, "string-type");
        assert_eq!(WrappedValue::new(json!(5)).type_tag, "long-type");
        assert_eq!(WrappedValue::new(json!(1.5)).type_tag, "double-type");
        assert_eq!(WrappedValue::new(json!(true)).type_tag, "boolean-type");
        assert_eq!(WrappedValue::new(json!([1])).type_tag, "list-type");
        assert_eq!(WrappedValue::new(json!({"a": 1})).type_tag, "map-type");
    }

    #[test]
    fn test_default_wrap_policy_is_query_jaxb_only() {
        let policy = WrapPolicy::default();
        for service in KnownService::ALL {
            for format in MarshallingFormat::ALL {
                let expected = service == KnownService::QueryDataService
                    && format == MarshallingFormat::Jaxb;
                assert_eq!(
                    policy.should_wrap(service, format),
                    expected,
                    "unexpected wrap decision for {service}/{format}"
                );
            }
        }
    }

    #[test]
    fn test_wrap_policy_is_extensible() {
        let policy = WrapPolicy::from_rules([
            (KnownService::QueryDataService, MarshallingFormat::Jaxb),
            (KnownService::JobService, MarshallingFormat::Xstream),
        ]);
        assert!(policy.should_wrap(KnownService::JobService, MarshallingFormat::Xstream));
        assert!(!policy.should_wrap(KnownService::JobService, MarshallingFormat::Json));
    }
}

//! Command model for the batch dispatch protocol.
//!
//! A [`CommandScript`] carries an ordered list of [`ServerCommand`]s from the
//! transport layer to the dispatcher. Only [`ServerCommand::Descriptor`]
//! commands are dispatchable here; the other kinds belong to the server
//! management surface and are skipped by the batch loop.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::DispatchError;

/// Ordered batch of commands submitted in one dispatch call.
///
/// # Examples
///
/// ```rust
/// use bpmgate_core::dispatch::{CommandScript, DescriptorCommand, ServerCommand};
///
/// let script = CommandScript::new(vec![ServerCommand::Descriptor(
///     DescriptorCommand::new("JobService", "cancelRequest").with_plain_argument(42.into()),
/// )]);
/// assert_eq!(script.commands.len(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandScript {
    pub commands: Vec<ServerCommand>,
}

impl CommandScript {
    pub fn new(commands: Vec<ServerCommand>) -> Self {
        Self { commands }
    }
}

/// One element of a command script.
///
/// `Descriptor` is the generic service invocation handled by this crate.
/// The remaining kinds are owned by the transport/server layer and pass
/// through the batch loop without producing a response entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerCommand {
    Descriptor(DescriptorCommand),
    GetServerInfo,
    ListContainers,
}

/// A named service invocation: target service, method, positional arguments,
/// plus the optional marshalled payload and format token appended as trailing
/// arguments at dispatch time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptorCommand {
    /// Service name token, e.g. `"ProcessService"`.
    pub service: String,

    /// Method name on the target service.
    pub method: String,

    /// Declared positional arguments.
    #[serde(default)]
    pub arguments: Vec<CommandArgument>,

    /// Optional marshalled payload, appended after the declared arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,

    /// Optional marshaller format token, appended after the payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marshaller_format: Option<String>,
}

impl DescriptorCommand {
    /// Create a command with no arguments.
    pub fn new(service: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            method: method.into(),
            arguments: Vec::new(),
            payload: None,
            marshaller_format: None,
        }
    }

    /// Append a plain positional argument.
    pub fn with_plain_argument(mut self, value: Value) -> Self {
        self.arguments.push(CommandArgument::Plain(value));
        self
    }

    /// Append a wrapped positional argument.
    pub fn with_wrapped_argument(mut self, value: Value) -> Self {
        self.arguments.push(CommandArgument::Wrapped(value));
        self
    }

    /// Set the marshalled payload.
    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Set the marshaller format token.
    pub fn with_marshaller_format(mut self, format: impl Into<String>) -> Self {
        self.marshaller_format = Some(format.into());
        self
    }
}

/// One declared argument of a [`DescriptorCommand`].
///
/// `Wrapped` carries the extra type metadata some wire formats need for
/// polymorphic values; the dispatcher substitutes the inner value before the
/// call. A `Plain(Value::Null)` is a legitimate null argument and passes
/// through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CommandArgument {
    Plain(Value),
    Wrapped(Value),
}

impl CommandArgument {
    /// Resolve the call-ready value, discarding any wrapper.
    pub fn unwrap_value(self) -> Value {
        match self {
            CommandArgument::Plain(value) | CommandArgument::Wrapped(value) => value,
        }
    }

    pub fn is_wrapped(&self) -> bool {
        matches!(self, CommandArgument::Wrapped(_))
    }
}

/// Closed set of service name tokens recognized by the dispatcher.
///
/// Variant names double as the wire tokens, so serde round-trips them
/// without rename attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownService {
    ProcessService,
    UserTaskService,
    QueryDataService,
    JobService,
    DocumentService,
    ProcessAdminService,
    UserTaskAdminService,
}

impl KnownService {
    /// All recognized services, useful for exhaustive policy checks.
    pub const ALL: [KnownService; 7] = [
        KnownService::ProcessService,
        KnownService::UserTaskService,
        KnownService::QueryDataService,
        KnownService::JobService,
        KnownService::DocumentService,
        KnownService::ProcessAdminService,
        KnownService::UserTaskAdminService,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            KnownService::ProcessService => "ProcessService",
            KnownService::UserTaskService => "UserTaskService",
            KnownService::QueryDataService => "QueryDataService",
            KnownService::JobService => "JobService",
            KnownService::DocumentService => "DocumentService",
            KnownService::ProcessAdminService => "ProcessAdminService",
            KnownService::UserTaskAdminService => "UserTaskAdminService",
        }
    }
}

impl fmt::Display for KnownService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KnownService {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KnownService::ALL
            .iter()
            .find(|service| service.as_str() == s)
            .copied()
            .ok_or_else(|| DispatchError::UnknownService {
                service: s.to_string(),
            })
    }
}

/// Wire serialization in effect for a dispatch call.
///
/// Dispatch logic itself is format-agnostic; the format only feeds the
/// response wrap policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarshallingFormat {
    Json,
    Jaxb,
    Xstream,
}

impl MarshallingFormat {
    pub const ALL: [MarshallingFormat; 3] = [
        MarshallingFormat::Json,
        MarshallingFormat::Jaxb,
        MarshallingFormat::Xstream,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MarshallingFormat::Json => "JSON",
            MarshallingFormat::Jaxb => "JAXB",
            MarshallingFormat::Xstream => "XSTREAM",
        }
    }
}

impl fmt::Display for MarshallingFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarshallingFormat {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "JSON" => Ok(MarshallingFormat::Json),
            "JAXB" => Ok(MarshallingFormat::Jaxb),
            "XSTREAM" => Ok(MarshallingFormat::Xstream),
            _ => Err(DispatchError::UnknownFormat {
                format: s.to_string(),
            }),
        }
    }
}

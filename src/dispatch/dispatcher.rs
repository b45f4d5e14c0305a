//! Batch orchestration: the single entry point of the dispatch protocol.
//!
//! [`BatchDispatcher::execute_batch`] walks the command script in order,
//! skips command kinds this core does not own, and converts every other
//! outcome (success, unknown service, unresolvable method, engine failure)
//! into exactly one response envelope. It never returns an error for
//! well-formed input and never stops early: a FAILURE entry for one command
//! leaves the rest of the batch untouched.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::DispatcherConfig;
use crate::dispatch::command::{
    CommandArgument, CommandScript, DescriptorCommand, MarshallingFormat, ServerCommand,
};
use crate::dispatch::registry::HandlerRegistry;
use crate::dispatch::response::{ServiceResponse, ServiceResponsesList, WrapPolicy, WrappedValue};
use crate::error::DispatchError;

/// Serial, per-batch command dispatcher over an immutable handler registry.
///
/// A single dispatcher instance is shared across concurrent transport
/// requests; each `execute_batch` call runs its commands serially on the
/// calling task.
pub struct BatchDispatcher {
    registry: Arc<HandlerRegistry>,
    wrap_policy: WrapPolicy,
    log_skipped_commands: bool,
}

impl BatchDispatcher {
    /// Dispatcher with default configuration.
    pub fn new(registry: Arc<HandlerRegistry>) -> Self {
        Self::with_config(registry, &DispatcherConfig::default())
    }

    /// Dispatcher with explicit configuration.
    pub fn with_config(registry: Arc<HandlerRegistry>, config: &DispatcherConfig) -> Self {
        Self {
            registry,
            wrap_policy: config.wrap_policy(),
            log_skipped_commands: config.log_skipped_commands,
        }
    }

    /// Execute a command script and collect one response per recognized
    /// command, in input order.
    ///
    /// `format` selects the wire serialization in effect for this call; it
    /// feeds only the response wrap policy. `result_type` is the transport
    /// layer's marshalling hint and is deliberately unused here.
    pub async fn execute_batch(
        &self,
        script: &CommandScript,
        format: MarshallingFormat,
        result_type: Option<&str>,
    ) -> ServiceResponsesList {
        // The result type hint belongs to the transport's marshaller.
        let _ = result_type;

        let batch_id = Uuid::new_v4();
        debug!(
            %batch_id,
            commands = script.commands.len(),
            %format,
            "executing command script"
        );

        let mut responses = ServiceResponsesList::new();
        for command in &script.commands {
            let descriptor = match command {
                ServerCommand::Descriptor(descriptor) => descriptor,
                other => {
                    if self.log_skipped_commands {
                        debug!(%batch_id, command = ?other, "skipping non-dispatchable command kind");
                    }
                    continue;
                }
            };

            responses.push(self.dispatch_one(batch_id, descriptor, format).await);
        }

        debug!(%batch_id, responses = responses.len(), "command script completed");
        responses
    }

    async fn dispatch_one(
        &self,
        batch_id: Uuid,
        descriptor: &DescriptorCommand,
        format: MarshallingFormat,
    ) -> ServiceResponse {
        match self.try_dispatch(descriptor, format).await {
            Ok(result) => {
                debug!(
                    %batch_id,
                    service = %descriptor.service,
                    method = %descriptor.method,
                    "command succeeded"
                );
                ServiceResponse::success(result)
            }
            Err(error) => {
                warn!(
                    %batch_id,
                    service = %descriptor.service,
                    method = %descriptor.method,
                    %error,
                    "command failed"
                );
                ServiceResponse::failure(error.to_string())
            }
        }
    }

    async fn try_dispatch(
        &self,
        descriptor: &DescriptorCommand,
        format: MarshallingFormat,
    ) -> Result<Option<Value>, DispatchError> {
        let handler = self.registry.lookup(&descriptor.service)?;
        let arguments = prepare_arguments(descriptor);

        debug!(
            service = %descriptor.service,
            method = %descriptor.method,
            arity = arguments.len(),
            "invoking handler method"
        );

        let result = handler.invoke(&descriptor.method, arguments).await?;
        match result {
            Some(value) if self.wrap_policy.should_wrap(handler.service(), format) => {
                Ok(Some(WrappedValue::new(value).into_value()))
            }
            other => Ok(other),
        }
    }
}

impl std::fmt::Debug for BatchDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchDispatcher")
            .field("registry", &self.registry)
            .field("wrap_policy", &self.wrap_policy)
            .field("log_skipped_commands", &self.log_skipped_commands)
            .finish()
    }
}

/// Build the call-ready positional argument list for a command.
///
/// Order is fixed: declared arguments (wrapped ones resolved to their inner
/// value), then the payload when present and non-empty, then the marshaller
/// format token when present and non-empty. Each optional slot is appended
/// independently of the other.
pub fn prepare_arguments(command: &DescriptorCommand) -> Vec<Value> {
    let mut arguments: Vec<Value> = command
        .arguments
        .iter()
        .cloned()
        .map(CommandArgument::unwrap_value)
        .collect();

    if let Some(payload) = &command.payload {
        if !payload.is_empty() {
            arguments.push(Value::String(payload.clone()));
        }
    }
    if let Some(format) = &command.marshaller_format {
        if !format.is_empty() {
            arguments.push(Value::String(format.clone()));
        }
    }

    arguments
}

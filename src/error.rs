//! Dispatch-level error classification.
//!
//! Errors here are internal: the dispatcher converts every one of them into a
//! FAILURE [`crate::dispatch::ServiceResponse`] at the per-command boundary,
//! so callers of `execute_batch` never see them as `Err`.

use crate::dispatch::handler::HandlerError;

/// Why a single command could not produce a SUCCESS response.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The command's service token does not name a registered service.
    #[error("Unable to find service '{service}'")]
    UnknownService { service: String },

    /// The command's marshaller format token is not a known wire format.
    #[error("Unknown marshalling format '{format}'")]
    UnknownFormat { format: String },

    /// The resolved handler rejected or failed the invocation.
    #[error(transparent)]
    Handler(#[from] HandlerError),
}

//! The generic command dispatch protocol.
//!
//! One entry point ([`BatchDispatcher::execute_batch`]) accepts a batch of
//! named service invocations and executes them against a fixed
//! [`HandlerRegistry`], producing an ordered [`ServiceResponsesList`] that
//! preserves success/failure independently per command.

pub mod command;
pub mod dispatcher;
pub mod handler;
pub mod registry;
pub mod response;

pub use command::{
    CommandArgument, CommandScript, DescriptorCommand, KnownService, MarshallingFormat,
    ServerCommand,
};
pub use dispatcher::{prepare_arguments, BatchDispatcher};
pub use handler::{HandlerError, MethodResult, MethodTable, ServiceHandler};
pub use registry::{HandlerRegistry, HandlerRegistryBuilder};
pub use response::{
    ResponseType, ServiceResponse, ServiceResponsesList, WrapPolicy, WrappedValue,
};

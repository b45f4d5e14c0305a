#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # BPMGate Core
//!
//! Command dispatch core for remote BPM engine facades.
//!
//! ## Overview
//!
//! BPMGate Core implements the generic command dispatch protocol used by
//! REST/remote facades in front of an external business-process-management
//! engine. A caller submits a batch of named service invocations (a
//! [`dispatch::CommandScript`]); the dispatcher executes each recognized
//! command against a fixed registry of service handlers and returns an
//! ordered list of per-command success/failure envelopes.
//!
//! The engine itself (process execution, task life cycle, persistence) is an
//! external collaborator reached through injected trait objects; this crate
//! owns only the dispatch protocol.
//!
//! ## Key Guarantees
//!
//! - **Per-command isolation**: a failing command becomes a FAILURE envelope;
//!   the batch never short-circuits and [`dispatch::BatchDispatcher::execute_batch`]
//!   never returns an error for well-formed input.
//! - **Order preservation**: responses mirror the order of the recognized
//!   input commands, one entry each.
//! - **Immutable registry**: the handler set is fixed at construction and
//!   shared freely across concurrent batches.
//!
//! ## Module Organization
//!
//! - [`dispatch`] - Command model, handler registry, and batch dispatcher
//! - [`services`] - Engine-facing service adapters (process, query, jobs)
//! - [`config`] - Dispatcher configuration
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging bootstrap
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bpmgate_core::dispatch::{
//!     BatchDispatcher, CommandScript, DescriptorCommand, HandlerRegistry,
//!     MarshallingFormat, ServerCommand,
//! };
//! use std::sync::Arc;
//!
//! # async fn example(registry: HandlerRegistry) {
//! let dispatcher = BatchDispatcher::new(Arc::new(registry));
//!
//! let script = CommandScript::new(vec![ServerCommand::Descriptor(
//!     DescriptorCommand::new("ProcessService", "startProcess")
//!         .with_plain_argument("my-container".into())
//!         .with_plain_argument("evaluation.process".into())
//!         .with_plain_argument("JSON".into()),
//! )]);
//!
//! let responses = dispatcher
//!     .execute_batch(&script, MarshallingFormat::Json, None)
//!     .await;
//! assert_eq!(responses.len(), 1);
//! # }
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod services;

pub use config::DispatcherConfig;
pub use error::DispatchError;

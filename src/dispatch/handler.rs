//! Handler trait and the closed method table replacing reflective dispatch.
//!
//! Instead of resolving methods by reflection at call time, each service
//! handler declares its invocable surface up front as a [`MethodTable`]:
//! a fixed map from `(method name, arity)` to an async closure over the
//! prepared argument list. Overloads are distinguished by arity, matching
//! the service surface where same-named methods differ only in parameter
//! count.

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::dispatch::command::KnownService;

/// Outcome of one method invocation. `Ok(None)` is a void return.
pub type MethodResult = Result<Option<Value>, HandlerError>;

type MethodFn = Arc<dyn Fn(Vec<Value>) -> BoxFuture<'static, MethodResult> + Send + Sync>;

/// Why a handler refused or failed an invocation.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// No method with a matching name and argument count.
    #[error("no method '{method}' taking {arity} arguments")]
    NoSuchMethod { method: String, arity: usize },

    /// An argument was present but had the wrong shape for the method.
    #[error("invalid argument at position {position} of '{method}': expected {expected}")]
    InvalidArgument {
        method: String,
        position: usize,
        expected: String,
    },

    /// The underlying engine call failed; carries the engine's message.
    #[error("{0}")]
    Failed(String),
}

/// Fixed map of invocable methods for one service handler.
#[derive(Clone, Default)]
pub struct MethodTable {
    methods: HashMap<(String, usize), MethodFn>,
}

impl MethodTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a method under `(name, arity)`.
    ///
    /// Registering the same pair twice replaces the earlier entry; service
    /// adapters build their table once at construction so this only matters
    /// for tests.
    pub fn register<F>(mut self, method: &str, arity: usize, function: F) -> Self
    where
        F: Fn(Vec<Value>) -> BoxFuture<'static, MethodResult> + Send + Sync + 'static,
    {
        self.methods
            .insert((method.to_string(), arity), Arc::new(function));
        self
    }

    /// Resolve and invoke `method` with the prepared argument list.
    pub async fn invoke(&self, method: &str, arguments: Vec<Value>) -> MethodResult {
        let key = (method.to_string(), arguments.len());
        match self.methods.get(&key) {
            Some(function) => function(arguments).await,
            None => Err(HandlerError::NoSuchMethod {
                method: method.to_string(),
                arity: key.1,
            }),
        }
    }

    pub fn contains(&self, method: &str, arity: usize) -> bool {
        self.methods.contains_key(&(method.to_string(), arity))
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl std::fmt::Debug for MethodTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<_> = self.methods.keys().collect();
        keys.sort();
        f.debug_struct("MethodTable").field("methods", &keys).finish()
    }
}

/// A dispatchable service: a name token plus an invocable method surface.
///
/// Handlers are externally owned, assumed internally thread-safe, and shared
/// across concurrent batches behind `Arc`.
#[async_trait]
pub trait ServiceHandler: Send + Sync {
    /// The service name token this handler answers for.
    fn service(&self) -> KnownService;

    /// The handler's invocable surface.
    fn methods(&self) -> &MethodTable;

    /// Invoke `method` with the prepared arguments.
    async fn invoke(&self, method: &str, arguments: Vec<Value>) -> MethodResult {
        self.methods().invoke(method, arguments).await
    }
}

impl std::fmt::Debug for dyn ServiceHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ServiceHandler").field(&self.service()).finish()
    }
}

//! Immutable handler registry.
//!
//! The registry maps service name tokens to their one handler object. It is
//! built once at construction from the injected handler set and never
//! mutated afterwards, so concurrent batches share it without locks.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::dispatch::command::KnownService;
use crate::dispatch::handler::ServiceHandler;
use crate::error::DispatchError;

/// Fixed map from [`KnownService`] to its handler.
pub struct HandlerRegistry {
    handlers: HashMap<KnownService, Arc<dyn ServiceHandler>>,
}

impl HandlerRegistry {
    pub fn builder() -> HandlerRegistryBuilder {
        HandlerRegistryBuilder::default()
    }

    /// Resolve a service name token to its handler.
    ///
    /// Fails with [`DispatchError::UnknownService`] both for tokens outside
    /// the known set and for known services with no handler installed; the
    /// dispatcher turns either into a per-command FAILURE response.
    pub fn lookup(&self, token: &str) -> Result<Arc<dyn ServiceHandler>, DispatchError> {
        let service: KnownService = token.parse()?;
        self.handlers
            .get(&service)
            .cloned()
            .ok_or_else(|| DispatchError::UnknownService {
                service: token.to_string(),
            })
    }

    pub fn contains(&self, service: KnownService) -> bool {
        self.handlers.contains_key(&service)
    }

    pub fn registered_services(&self) -> Vec<KnownService> {
        self.handlers.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("services", &self.registered_services())
            .finish()
    }
}

/// Construction-time registration; consumed by [`HandlerRegistryBuilder::build`].
#[derive(Default)]
pub struct HandlerRegistryBuilder {
    handlers: HashMap<KnownService, Arc<dyn ServiceHandler>>,
}

impl HandlerRegistryBuilder {
    /// Install a handler under its own service token.
    pub fn register(mut self, handler: Arc<dyn ServiceHandler>) -> Self {
        let service = handler.service();
        if self.handlers.insert(service, handler).is_some() {
            warn!(%service, "replacing previously registered handler");
        }
        self
    }

    pub fn build(self) -> HandlerRegistry {
        info!(
            services = self.handlers.len(),
            "handler registry built"
        );
        HandlerRegistry {
            handlers: self.handlers,
        }
    }
}

//! Query service adapter.
//!
//! Exposes ad-hoc query registration and execution under the
//! `QueryDataService` token. Results of this service are the canonical
//! consumers of the response wrap policy when marshalled with JAXB.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::dispatch::command::KnownService;
use crate::dispatch::handler::{MethodTable, ServiceHandler};
use crate::services::{nullable_str, parse_payload, require_i64, require_str, EngineError};

/// Query operations of the external engine.
#[async_trait]
pub trait QueryService: Send + Sync {
    async fn register_query(&self, name: &str, definition: Value) -> Result<(), EngineError>;

    async fn replace_query(&self, name: &str, definition: Value) -> Result<(), EngineError>;

    async fn unregister_query(&self, name: &str) -> Result<(), EngineError>;

    async fn query_definition(&self, name: &str) -> Result<Value, EngineError>;

    async fn query_definitions(&self, page: i64, page_size: i64) -> Result<Value, EngineError>;

    /// Run a registered query with the given result mapper and paging.
    async fn query(
        &self,
        name: &str,
        mapper: &str,
        order_by: Option<&str>,
        page: i64,
        page_size: i64,
    ) -> Result<Value, EngineError>;
}

/// `QueryDataService` handler over an injected engine service.
pub struct QueryCommands {
    methods: MethodTable,
}

impl QueryCommands {
    pub fn new(service: Arc<dyn QueryService>) -> Self {
        let mut methods = MethodTable::new();

        // registerQuery(queryName, payload, marshallingType)
        let svc = Arc::clone(&service);
        methods = methods.register("registerQuery", 3, move |args| {
            let svc = Arc::clone(&svc);
            Box::pin(async move {
                let name = require_str("registerQuery", &args, 0)?;
                let payload = require_str("registerQuery", &args, 1)?;
                let _marshalling_type = require_str("registerQuery", &args, 2)?;
                let definition = parse_payload("registerQuery", 1, payload)?;
                svc.register_query(name, definition).await?;
                Ok(None)
            })
        });

        // replaceQuery(queryName, payload, marshallingType)
        let svc = Arc::clone(&service);
        methods = methods.register("replaceQuery", 3, move |args| {
            let svc = Arc::clone(&svc);
            Box::pin(async move {
                let name = require_str("replaceQuery", &args, 0)?;
                let payload = require_str("replaceQuery", &args, 1)?;
                let _marshalling_type = require_str("replaceQuery", &args, 2)?;
                let definition = parse_payload("replaceQuery", 1, payload)?;
                svc.replace_query(name, definition).await?;
                Ok(None)
            })
        });

        // unregisterQuery(queryName)
        let svc = Arc::clone(&service);
        methods = methods.register("unregisterQuery", 1, move |args| {
            let svc = Arc::clone(&svc);
            Box::pin(async move {
                let name = require_str("unregisterQuery", &args, 0)?;
                svc.unregister_query(name).await?;
                Ok(None)
            })
        });

        // getQuery(queryName)
        let svc = Arc::clone(&service);
        methods = methods.register("getQuery", 1, move |args| {
            let svc = Arc::clone(&svc);
            Box::pin(async move {
                let name = require_str("getQuery", &args, 0)?;
                let definition = svc.query_definition(name).await?;
                Ok(Some(definition))
            })
        });

        // getQueries(page, pageSize)
        let svc = Arc::clone(&service);
        methods = methods.register("getQueries", 2, move |args| {
            let svc = Arc::clone(&svc);
            Box::pin(async move {
                let page = require_i64("getQueries", &args, 0)?;
                let page_size = require_i64("getQueries", &args, 1)?;
                let definitions = svc.query_definitions(page, page_size).await?;
                Ok(Some(definitions))
            })
        });

        // query(queryName, mapper, orderBy, page, pageSize)
        let svc = Arc::clone(&service);
        methods = methods.register("query", 5, move |args| {
            let svc = Arc::clone(&svc);
            Box::pin(async move {
                let name = require_str("query", &args, 0)?;
                let mapper = require_str("query", &args, 1)?;
                let order_by = nullable_str("query", &args, 2)?;
                let page = require_i64("query", &args, 3)?;
                let page_size = require_i64("query", &args, 4)?;
                let result = svc.query(name, mapper, order_by, page, page_size).await?;
                Ok(Some(result))
            })
        });

        Self { methods }
    }
}

impl ServiceHandler for QueryCommands {
    fn service(&self) -> KnownService {
        KnownService::QueryDataService
    }

    fn methods(&self) -> &MethodTable {
        &self.methods
    }
}

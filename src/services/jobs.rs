//! Job service adapter.
//!
//! Exposes the engine's async-executor operations under the `JobService`
//! token: scheduling, cancelling, requeueing, and inspecting job requests.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::dispatch::command::KnownService;
use crate::dispatch::handler::{MethodTable, ServiceHandler};
use crate::services::{
    parse_payload, require_bool, require_i64, require_str, require_string_list, EngineError,
};

/// Async-executor operations of the external engine.
#[async_trait]
pub trait ExecutorService: Send + Sync {
    /// Schedule a job request, returning its id.
    async fn schedule_request(&self, container_id: &str, request: Value)
        -> Result<i64, EngineError>;

    async fn cancel_request(&self, request_id: i64) -> Result<(), EngineError>;

    async fn requeue_request(&self, request_id: i64) -> Result<(), EngineError>;

    async fn request_by_id(
        &self,
        request_id: i64,
        with_errors: bool,
        with_data: bool,
    ) -> Result<Value, EngineError>;

    async fn requests_by_status(
        &self,
        statuses: Vec<String>,
        page: i64,
        page_size: i64,
    ) -> Result<Value, EngineError>;

    async fn requests_by_business_key(
        &self,
        business_key: &str,
        page: i64,
        page_size: i64,
    ) -> Result<Value, EngineError>;
}

/// `JobService` handler over an injected engine service.
pub struct JobCommands {
    methods: MethodTable,
}

impl JobCommands {
    pub fn new(service: Arc<dyn ExecutorService>) -> Self {
        let mut methods = MethodTable::new();

        // scheduleRequest(containerId, payload, marshallingType)
        let svc = Arc::clone(&service);
        methods = methods.register("scheduleRequest", 3, move |args| {
            let svc = Arc::clone(&svc);
            Box::pin(async move {
                let container_id = require_str("scheduleRequest", &args, 0)?;
                let payload = require_str("scheduleRequest", &args, 1)?;
                let _marshalling_type = require_str("scheduleRequest", &args, 2)?;
                let request = parse_payload("scheduleRequest", 1, payload)?;
                let request_id = svc.schedule_request(container_id, request).await?;
                Ok(Some(Value::from(request_id)))
            })
        });

        // cancelRequest(requestId)
        let svc = Arc::clone(&service);
        methods = methods.register("cancelRequest", 1, move |args| {
            let svc = Arc::clone(&svc);
            Box::pin(async move {
                let request_id = require_i64("cancelRequest", &args, 0)?;
                svc.cancel_request(request_id).await?;
                Ok(None)
            })
        });

        // requeueRequest(requestId)
        let svc = Arc::clone(&service);
        methods = methods.register("requeueRequest", 1, move |args| {
            let svc = Arc::clone(&svc);
            Box::pin(async move {
                let request_id = require_i64("requeueRequest", &args, 0)?;
                svc.requeue_request(request_id).await?;
                Ok(None)
            })
        });

        // getRequestById(requestId, withErrors, withData, marshallingType)
        let svc = Arc::clone(&service);
        methods = methods.register("getRequestById", 4, move |args| {
            let svc = Arc::clone(&svc);
            Box::pin(async move {
                let request_id = require_i64("getRequestById", &args, 0)?;
                let with_errors = require_bool("getRequestById", &args, 1)?;
                let with_data = require_bool("getRequestById", &args, 2)?;
                let _marshalling_type = require_str("getRequestById", &args, 3)?;
                let request = svc.request_by_id(request_id, with_errors, with_data).await?;
                Ok(Some(request))
            })
        });

        // getRequestsByStatus(statuses, page, pageSize)
        let svc = Arc::clone(&service);
        methods = methods.register("getRequestsByStatus", 3, move |args| {
            let svc = Arc::clone(&svc);
            Box::pin(async move {
                let statuses = require_string_list("getRequestsByStatus", &args, 0)?;
                let page = require_i64("getRequestsByStatus", &args, 1)?;
                let page_size = require_i64("getRequestsByStatus", &args, 2)?;
                let requests = svc.requests_by_status(statuses, page, page_size).await?;
                Ok(Some(requests))
            })
        });

        // getRequestsByBusinessKey(businessKey, page, pageSize)
        let svc = Arc::clone(&service);
        methods = methods.register("getRequestsByBusinessKey", 3, move |args| {
            let svc = Arc::clone(&svc);
            Box::pin(async move {
                let business_key = require_str("getRequestsByBusinessKey", &args, 0)?;
                let page = require_i64("getRequestsByBusinessKey", &args, 1)?;
                let page_size = require_i64("getRequestsByBusinessKey", &args, 2)?;
                let requests = svc
                    .requests_by_business_key(business_key, page, page_size)
                    .await?;
                Ok(Some(requests))
            })
        });

        Self { methods }
    }
}

impl ServiceHandler for JobCommands {
    fn service(&self) -> KnownService {
        KnownService::JobService
    }

    fn methods(&self) -> &MethodTable {
        &self.methods
    }
}

//! Process service adapter.
//!
//! Exposes the engine's process operations under the `ProcessService` token.
//! Overloads differ by whether the caller attached a marshalled payload
//! (process variables, signal event), which arrives as a trailing argument
//! before the marshalling-type token.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::dispatch::command::KnownService;
use crate::dispatch::handler::{MethodTable, ServiceHandler};
use crate::services::{parse_payload, require_bool, require_i64, require_str, EngineError};

/// Process operations of the external engine.
#[async_trait]
pub trait ProcessService: Send + Sync {
    /// Start a process instance, returning its id.
    async fn start_process(
        &self,
        container_id: &str,
        process_id: &str,
        variables: Option<Value>,
    ) -> Result<i64, EngineError>;

    /// Abort an active process instance.
    async fn abort_process_instance(
        &self,
        container_id: &str,
        process_instance_id: i64,
    ) -> Result<(), EngineError>;

    /// Deliver a signal to a process instance.
    async fn signal_process_instance(
        &self,
        container_id: &str,
        process_instance_id: i64,
        signal_name: &str,
        event: Option<Value>,
    ) -> Result<(), EngineError>;

    /// Fetch a process instance description, optionally with variables.
    async fn process_instance(
        &self,
        container_id: &str,
        process_instance_id: i64,
        with_vars: bool,
    ) -> Result<Value, EngineError>;

    /// Fetch the variables of a process instance.
    async fn process_instance_variables(
        &self,
        container_id: &str,
        process_instance_id: i64,
    ) -> Result<Value, EngineError>;
}

/// `ProcessService` handler over an injected engine service.
pub struct ProcessCommands {
    methods: MethodTable,
}

impl ProcessCommands {
    pub fn new(service: Arc<dyn ProcessService>) -> Self {
        let mut methods = MethodTable::new();

        // startProcess(containerId, processId, marshallingType)
        let svc = Arc::clone(&service);
        methods = methods.register("startProcess", 3, move |args| {
            let svc = Arc::clone(&svc);
            Box::pin(async move {
                let container_id = require_str("startProcess", &args, 0)?;
                let process_id = require_str("startProcess", &args, 1)?;
                let _marshalling_type = require_str("startProcess", &args, 2)?;
                let instance_id = svc.start_process(container_id, process_id, None).await?;
                Ok(Some(Value::from(instance_id)))
            })
        });

        // startProcess(containerId, processId, payload, marshallingType)
        let svc = Arc::clone(&service);
        methods = methods.register("startProcess", 4, move |args| {
            let svc = Arc::clone(&svc);
            Box::pin(async move {
                let container_id = require_str("startProcess", &args, 0)?;
                let process_id = require_str("startProcess", &args, 1)?;
                let payload = require_str("startProcess", &args, 2)?;
                let _marshalling_type = require_str("startProcess", &args, 3)?;
                let variables = parse_payload("startProcess", 2, payload)?;
                let instance_id = svc
                    .start_process(container_id, process_id, Some(variables))
                    .await?;
                Ok(Some(Value::from(instance_id)))
            })
        });

        // abortProcessInstance(containerId, processInstanceId)
        let svc = Arc::clone(&service);
        methods = methods.register("abortProcessInstance", 2, move |args| {
            let svc = Arc::clone(&svc);
            Box::pin(async move {
                let container_id = require_str("abortProcessInstance", &args, 0)?;
                let instance_id = require_i64("abortProcessInstance", &args, 1)?;
                svc.abort_process_instance(container_id, instance_id).await?;
                Ok(None)
            })
        });

        // signalProcessInstance(containerId, processInstanceId, signalName, marshallingType)
        let svc = Arc::clone(&service);
        methods = methods.register("signalProcessInstance", 4, move |args| {
            let svc = Arc::clone(&svc);
            Box::pin(async move {
                let container_id = require_str("signalProcessInstance", &args, 0)?;
                let instance_id = require_i64("signalProcessInstance", &args, 1)?;
                let signal_name = require_str("signalProcessInstance", &args, 2)?;
                let _marshalling_type = require_str("signalProcessInstance", &args, 3)?;
                svc.signal_process_instance(container_id, instance_id, signal_name, None)
                    .await?;
                Ok(None)
            })
        });

        // signalProcessInstance(containerId, processInstanceId, signalName, eventPayload, marshallingType)
        let svc = Arc::clone(&service);
        methods = methods.register("signalProcessInstance", 5, move |args| {
            let svc = Arc::clone(&svc);
            Box::pin(async move {
                let container_id = require_str("signalProcessInstance", &args, 0)?;
                let instance_id = require_i64("signalProcessInstance", &args, 1)?;
                let signal_name = require_str("signalProcessInstance", &args, 2)?;
                let payload = require_str("signalProcessInstance", &args, 3)?;
                let _marshalling_type = require_str("signalProcessInstance", &args, 4)?;
                let event = parse_payload("signalProcessInstance", 3, payload)?;
                svc.signal_process_instance(container_id, instance_id, signal_name, Some(event))
                    .await?;
                Ok(None)
            })
        });

        // getProcessInstance(containerId, processInstanceId, withVars, marshallingType)
        let svc = Arc::clone(&service);
        methods = methods.register("getProcessInstance", 4, move |args| {
            let svc = Arc::clone(&svc);
            Box::pin(async move {
                let container_id = require_str("getProcessInstance", &args, 0)?;
                let instance_id = require_i64("getProcessInstance", &args, 1)?;
                let with_vars = require_bool("getProcessInstance", &args, 2)?;
                let _marshalling_type = require_str("getProcessInstance", &args, 3)?;
                let instance = svc
                    .process_instance(container_id, instance_id, with_vars)
                    .await?;
                Ok(Some(instance))
            })
        });

        // getProcessInstanceVariables(containerId, processInstanceId, marshallingType)
        let svc = Arc::clone(&service);
        methods = methods.register("getProcessInstanceVariables", 3, move |args| {
            let svc = Arc::clone(&svc);
            Box::pin(async move {
                let container_id = require_str("getProcessInstanceVariables", &args, 0)?;
                let instance_id = require_i64("getProcessInstanceVariables", &args, 1)?;
                let _marshalling_type = require_str("getProcessInstanceVariables", &args, 2)?;
                let variables = svc
                    .process_instance_variables(container_id, instance_id)
                    .await?;
                Ok(Some(variables))
            })
        });

        Self { methods }
    }
}

impl ServiceHandler for ProcessCommands {
    fn service(&self) -> KnownService {
        KnownService::ProcessService
    }

    fn methods(&self) -> &MethodTable {
        &self.methods
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeEngine {
        started: Mutex<Vec<(String, String, Option<Value>)>>,
        signals: Mutex<Vec<(i64, String, Option<Value>)>>,
    }

    #[async_trait]
    impl ProcessService for FakeEngine {
        async fn start_process(
            &self,
            container_id: &str,
            process_id: &str,
            variables: Option<Value>,
        ) -> Result<i64, EngineError> {
            let mut started = self.started.lock().unwrap();
            started.push((container_id.to_string(), process_id.to_string(), variables));
            Ok(started.len() as i64)
        }

        async fn abort_process_instance(
            &self,
            _container_id: &str,
            process_instance_id: i64,
        ) -> Result<(), EngineError> {
            if process_instance_id == 99 {
                return Err(EngineError::NotFound(format!(
                    "process instance {process_instance_id}"
                )));
            }
            Ok(())
        }

        async fn signal_process_instance(
            &self,
            _container_id: &str,
            process_instance_id: i64,
            signal_name: &str,
            event: Option<Value>,
        ) -> Result<(), EngineError> {
            self.signals.lock().unwrap().push((
                process_instance_id,
                signal_name.to_string(),
                event,
            ));
            Ok(())
        }

        async fn process_instance(
            &self,
            container_id: &str,
            process_instance_id: i64,
            with_vars: bool,
        ) -> Result<Value, EngineError> {
            Ok(json!({
                "container-id": container_id,
                "process-instance-id": process_instance_id,
                "with-vars": with_vars,
            }))
        }

        async fn process_instance_variables(
            &self,
            _container_id: &str,
            _process_instance_id: i64,
        ) -> Result<Value, EngineError> {
            Ok(json!({"approved": true}))
        }
    }

    fn handler() -> (Arc<FakeEngine>, ProcessCommands) {
        let engine = Arc::new(FakeEngine::default());
        let commands = ProcessCommands::new(engine.clone());
        (engine, commands)
    }

    #[tokio::test]
    async fn test_start_process_without_payload() {
        let (engine, commands) = handler();
        let result = commands
            .invoke(
                "startProcess",
                vec![json!("hr"), json!("evaluation"), json!("JSON")],
            )
            .await
            .unwrap();
        assert_eq!(result, Some(json!(1)));
        assert_eq!(engine.started.lock().unwrap()[0].2, None);
    }

    #[tokio::test]
    async fn test_start_process_with_payload_parses_variables() {
        let (engine, commands) = handler();
        commands
            .invoke(
                "startProcess",
                vec![
                    json!("hr"),
                    json!("evaluation"),
                    json!("{\"initiator\":\"john\"}"),
                    json!("JSON"),
                ],
            )
            .await
            .unwrap();
        assert_eq!(
            engine.started.lock().unwrap()[0].2,
            Some(json!({"initiator": "john"}))
        );
    }

    #[tokio::test]
    async fn test_abort_propagates_engine_failure_message() {
        let (_engine, commands) = handler();
        let err = commands
            .invoke("abortProcessInstance", vec![json!("hr"), json!(99)])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "not found: process instance 99");
    }

    #[tokio::test]
    async fn test_signal_overloads() {
        let (engine, commands) = handler();

        commands
            .invoke(
                "signalProcessInstance",
                vec![json!("hr"), json!(5), json!("approve"), json!("JSON")],
            )
            .await
            .unwrap();
        commands
            .invoke(
                "signalProcessInstance",
                vec![
                    json!("hr"),
                    json!(5),
                    json!("approve"),
                    json!("{\"level\":2}"),
                    json!("JSON"),
                ],
            )
            .await
            .unwrap();

        let signals = engine.signals.lock().unwrap();
        assert_eq!(signals[0].2, None);
        assert_eq!(signals[1].2, Some(json!({"level": 2})));
    }

    #[tokio::test]
    async fn test_bad_argument_shape_is_invalid_argument() {
        let (_engine, commands) = handler();
        let err = commands
            .invoke(
                "getProcessInstance",
                vec![json!("hr"), json!("not-a-number"), json!(true), json!("JSON")],
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("expected integer"));
    }
}

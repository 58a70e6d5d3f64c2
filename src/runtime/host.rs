//! The runtime facade wiring all components together.

use crate::error::FaunResult;
use crate::function::handler::FaunHandler;
use crate::function::hooks::{ErrorHook, ErrorHookRegistry};
use crate::function::registry::{FunctionInfo, FunctionRecord, FunctionRegistry};
use crate::invoke::Invoker;
use crate::logs::{LogEntry, LogStore};
use crate::runtime::config::FaunConfig;
use crate::runtime::tracker::{RequestStatus, RequestTracker};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// The invocation core: registry, log store, invoker, retry, async request
/// tracking, and error hooks behind one object.
///
/// Cloning is cheap; clones share the same underlying state.
#[derive(Clone)]
pub struct FaunRuntime {
    config: FaunConfig,
    registry: Arc<FunctionRegistry>,
    logs: Arc<LogStore>,
    hooks: Arc<ErrorHookRegistry>,
    invoker: Invoker,
    tracker: RequestTracker,
}

impl FaunRuntime {
    /// Create a runtime from a configuration.
    pub fn new(config: FaunConfig) -> Self {
        let registry = Arc::new(FunctionRegistry::with_env(config.env.clone()));
        let logs = Arc::new(LogStore::new());
        let hooks = Arc::new(ErrorHookRegistry::new());
        let invoker = Invoker::new(registry.clone(), logs.clone(), hooks.clone());
        let tracker = RequestTracker::new(
            invoker.clone(),
            Duration::from_millis(config.result_poll_interval_ms),
        );

        Self {
            config,
            registry,
            logs,
            hooks,
            invoker,
            tracker,
        }
    }

    /// Create a runtime with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(FaunConfig::default())
    }

    /// The runtime configuration.
    pub fn config(&self) -> &FaunConfig {
        &self.config
    }

    /// Shared handle to the function registry.
    pub fn registry(&self) -> Arc<FunctionRegistry> {
        self.registry.clone()
    }

    /// Shared handle to the log store.
    pub fn log_store(&self) -> Arc<LogStore> {
        self.logs.clone()
    }

    /// Register a function under a unique name with a runtime label.
    pub async fn register_function(
        &self,
        name: impl Into<String>,
        handler: Box<dyn FaunHandler>,
        runtime: impl Into<String>,
    ) -> FaunResult<()> {
        self.registry.register(name, handler, runtime).await
    }

    /// Remove a function; its logs are retained for audit.
    pub async fn deregister_function(&self, name: &str) -> FaunResult<()> {
        self.registry.deregister(name).await
    }

    /// Set a function's execution budget in milliseconds.
    pub async fn set_timeout(&self, name: &str, timeout_ms: u64) -> FaunResult<()> {
        self.registry.set_timeout(name, timeout_ms).await
    }

    /// Merge environment variables into a function's record.
    pub async fn set_env(&self, name: &str, vars: HashMap<String, String>) -> FaunResult<()> {
        self.registry.set_env(name, vars).await
    }

    /// Look up a function's record by name.
    pub async fn lookup(&self, name: &str) -> Option<FunctionRecord> {
        self.registry.lookup(name).await
    }

    /// List metadata for all registered functions.
    pub async fn list_functions(&self) -> Vec<FunctionInfo> {
        self.registry.list().await
    }

    /// Invoke a function synchronously with positional arguments.
    pub async fn invoke(&self, name: &str, args: Vec<Value>) -> FaunResult<Value> {
        self.invoker.invoke(name, args).await
    }

    /// Invoke a function, retrying handler faults and timeouts up to
    /// `retries` total attempts.
    pub async fn invoke_with_retry(
        &self,
        name: &str,
        args: Vec<Value>,
        retries: u32,
    ) -> FaunResult<Value> {
        self.invoker.invoke_with_retry(name, args, retries).await
    }

    /// Submit an asynchronous invocation; returns immediately with its id.
    pub async fn submit(&self, name: &str, input: Vec<(String, Value)>) -> Uuid {
        self.tracker.submit(name, input).await
    }

    /// Status of an asynchronous request.
    pub async fn check_status(&self, request_id: Uuid) -> RequestStatus {
        self.tracker.check_status(request_id).await
    }

    /// Wait for an asynchronous request's terminal state and return its
    /// result or stored error.
    pub async fn get_result(&self, request_id: Uuid) -> FaunResult<Value> {
        self.tracker.get_result(request_id).await
    }

    /// Fetch a function's log entries, oldest first. With no explicit limit
    /// the configured default applies.
    pub async fn logs(&self, name: &str, limit: Option<usize>) -> Vec<LogEntry> {
        let limit = limit.unwrap_or(self.config.default_log_limit);
        self.logs.get_logs(name, Some(limit)).await
    }

    /// Bind an error hook to a function name, overwriting any previous one.
    pub async fn set_error_hook(&self, name: impl Into<String>, hook: Arc<dyn ErrorHook>) {
        self.hooks.set_hook(name, hook).await
    }

    /// Remove the error hook bound to a function name.
    pub async fn remove_error_hook(&self, name: &str) -> bool {
        self.hooks.remove_hook(name).await
    }
}

impl Default for FaunRuntime {
    fn default() -> Self {
        Self::with_defaults()
    }
}

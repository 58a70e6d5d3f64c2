//! Synchronous invocation path: lookup, log capture, timeout enforcement.

use crate::error::{FaunError, FaunResult};
use crate::function::handler::FunctionContext;
use crate::function::hooks::ErrorHookRegistry;
use crate::function::registry::FunctionRegistry;
use crate::logs::LogStore;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};
use uuid::Uuid;

/// Executes registered functions with timeout enforcement, log capture, and
/// error-hook dispatch.
///
/// Invocations of the same function name are serialized through the record's
/// gate, so each invocation's start and outcome entries stay adjacent in that
/// function's log sequence.
#[derive(Clone)]
pub struct Invoker {
    registry: Arc<FunctionRegistry>,
    logs: Arc<LogStore>,
    hooks: Arc<ErrorHookRegistry>,
}

impl Invoker {
    /// Create a new invoker over the given registry, log store, and hooks.
    pub fn new(
        registry: Arc<FunctionRegistry>,
        logs: Arc<LogStore>,
        hooks: Arc<ErrorHookRegistry>,
    ) -> Self {
        Self {
            registry,
            logs,
            hooks,
        }
    }

    /// Invoke a registered function with positional arguments.
    ///
    /// Every call appends a start entry and an outcome entry to the
    /// function's log sequence, success or failure. The handler runs on its
    /// own task; a configured timeout bounds the wait and aborts the task on
    /// overrun, surfacing [`FaunError::Timeout`] rather than a handler fault.
    pub async fn invoke(&self, name: &str, args: Vec<Value>) -> FaunResult<Value> {
        let record = match self.registry.lookup(name).await {
            Some(record) => record,
            None => {
                self.logs
                    .append(
                        name,
                        format!("invoking '{}' with args: {}", name, render_args(&args)),
                    )
                    .await;
                let err = FaunError::NotRegistered(name.to_string());
                self.logs
                    .append(name, format!("invocation failed: {}", err))
                    .await;
                self.dispatch_hook(name, &err).await;
                return Err(err);
            }
        };

        // Serialize invocations of this function name; the start entry is
        // appended under the gate so each invocation's start/outcome pair
        // stays adjacent in the log sequence.
        let _gate = record.gate.lock().await;

        self.logs
            .append(
                name,
                format!("invoking '{}' with args: {}", name, render_args(&args)),
            )
            .await;

        let invocation_id = Uuid::new_v4().to_string();
        let mut ctx = FunctionContext::new(name, invocation_id.clone());
        ctx.env = record.env.clone();

        debug!(function = name, invocation_id = %invocation_id, "Executing handler");

        let handler = record.handler.clone();
        let started = Instant::now();
        let mut handle = tokio::spawn(async move { handler.call(args, &ctx).await });

        let joined = match record.timeout_ms {
            Some(timeout_ms) => {
                match tokio::time::timeout(Duration::from_millis(timeout_ms), &mut handle).await {
                    Ok(joined) => joined,
                    Err(_) => {
                        handle.abort();
                        let err = FaunError::Timeout {
                            function: name.to_string(),
                            timeout_ms,
                        };
                        error!(function = name, timeout_ms, "Handler exceeded its timeout");
                        self.logs
                            .append(name, format!("invocation failed: {}", err))
                            .await;
                        self.dispatch_hook(name, &err).await;
                        return Err(err);
                    }
                }
            }
            None => handle.await,
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;

        // A join error means the handler task panicked or died; report it as
        // a handler fault rather than letting it tear down the caller.
        let outcome = match joined {
            Ok(outcome) => outcome,
            Err(join_err) => Err(FaunError::handler(
                name,
                format!("handler task failed: {}", join_err),
            )),
        };

        match outcome {
            Ok(value) => {
                self.logs
                    .append(name, format!("'{}' returned: {}", name, render_value(&value)))
                    .await;
                debug!(function = name, elapsed_ms, "Handler returned");
                Ok(value)
            }
            Err(fault) => {
                let message = match fault {
                    FaunError::Handler { message, .. } => message,
                    other => other.to_string(),
                };
                let err = FaunError::handler(name, message);
                error!(function = name, elapsed_ms, %err, "Handler failed");
                self.logs
                    .append(name, format!("invocation failed: {}", err))
                    .await;
                self.dispatch_hook(name, &err).await;
                Err(err)
            }
        }
    }

    /// Call the error hook bound to `name`, if any.
    ///
    /// A hook's own failure is reported and discarded; it never replaces the
    /// failure being propagated.
    async fn dispatch_hook(&self, name: &str, fault: &FaunError) {
        if let Some(hook) = self.hooks.get(name).await {
            if let Err(hook_err) = hook.on_failure(fault) {
                warn!(function = name, %hook_err, "Error hook failed");
            }
        }
    }
}

/// Stringify arguments for log entries, comma-joined.
fn render_args(args: &[Value]) -> String {
    args.iter()
        .map(render_value)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Stringify one value for log entries; strings log bare, everything else as
/// compact JSON.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

//! Faun demo binary.
//!
//! Registers a few sample handlers and walks through the synchronous, retry,
//! and asynchronous invocation paths.

use faun::prelude::*;
use serde_json::json;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing_subscriber::EnvFilter;

/// Handler that fails a fixed number of times before succeeding.
struct FlakyHandler {
    failures_left: AtomicU32,
}

impl FlakyHandler {
    fn new(failures: u32) -> Self {
        Self {
            failures_left: AtomicU32::new(failures),
        }
    }
}

#[async_trait]
impl FaunHandler for FlakyHandler {
    async fn call(
        &self,
        _args: Vec<serde_json::Value>,
        ctx: &FunctionContext,
    ) -> Result<serde_json::Value, FaunError> {
        let remaining = self.failures_left.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_left.fetch_sub(1, Ordering::SeqCst);
            return Err(FaunError::handler(
                &ctx.function_name,
                format!("transient failure ({} left)", remaining - 1),
            ));
        }
        Ok(json!("recovered"))
    }
}

#[tokio::main]
async fn main() -> Result<(), FaunError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting Faun demo...");

    let config = FaunConfig::new()
        .env("ENVIRONMENT", "development")
        .result_poll_interval_ms(100);
    let runtime = FaunRuntime::new(config);

    // Register sample functions.
    runtime
        .register_function(
            "sum",
            handler_fn(|args| {
                let total: i64 = args.iter().filter_map(|v| v.as_i64()).sum();
                Ok(json!(total))
            }),
            "rust",
        )
        .await?;

    runtime
        .register_function(
            "greet",
            handler_fn(|args| {
                let name = args
                    .first()
                    .and_then(|v| v.as_str())
                    .unwrap_or("world")
                    .to_string();
                Ok(json!(format!("Hello, {}!", name)))
            }),
            "rust",
        )
        .await?;

    runtime
        .register_function("flaky", Box::new(FlakyHandler::new(2)), "rust")
        .await?;

    // Observe failures of the flaky function.
    runtime
        .set_error_hook(
            "flaky",
            hook_fn(|fault| {
                tracing::info!("error hook observed: {}", fault);
                Ok(())
            }),
        )
        .await;

    // Synchronous invocation.
    let result = runtime.invoke("sum", vec![json!(3), json!(5)]).await?;
    tracing::info!("sum(3, 5) = {}", result);

    // Retry until the flaky handler recovers.
    let result = runtime.invoke_with_retry("flaky", Vec::new(), 3).await?;
    tracing::info!("flaky recovered with: {}", result);

    // Asynchronous invocation: submit, poll, fetch.
    let request_id = runtime
        .submit("greet", vec![("name".to_string(), json!("faun"))])
        .await;
    tracing::info!(
        "submitted request {} (status: {:?})",
        request_id,
        runtime.check_status(request_id).await
    );

    let greeting = runtime.get_result(request_id).await?;
    tracing::info!("async result: {}", greeting);

    // Read back invocation logs.
    for entry in runtime.logs("flaky", Some(10)).await {
        tracing::info!("flaky log: {}", entry.message);
    }

    let functions = runtime.list_functions().await;
    tracing::info!(
        "registered functions: {}",
        serde_json::to_string(&functions).unwrap_or_default()
    );

    Ok(())
}

//! Integration tests for the faun invocation core.

use faun::prelude::*;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Runtime with a fast poll interval for async tests.
fn test_runtime() -> FaunRuntime {
    FaunRuntime::new(FaunConfig::new().result_poll_interval_ms(10))
}

/// Boxed handler summing integer arguments.
fn sum_handler() -> Box<dyn FaunHandler> {
    handler_fn(|args| {
        let total: i64 = args.iter().filter_map(Value::as_i64).sum();
        Ok(json!(total))
    })
}

/// Handler that sleeps before returning.
struct SleepyHandler {
    sleep_ms: u64,
}

#[async_trait]
impl FaunHandler for SleepyHandler {
    async fn call(&self, _args: Vec<Value>, _ctx: &FunctionContext) -> Result<Value, FaunError> {
        tokio::time::sleep(Duration::from_millis(self.sleep_ms)).await;
        Ok(json!("done"))
    }
}

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
    async fn call(&self, _args: Vec<Value>, ctx: &FunctionContext) -> Result<Value, FaunError> {
        if self.failures_left.load(Ordering::SeqCst) > 0 {
            self.failures_left.fetch_sub(1, Ordering::SeqCst);
            return Err(FaunError::handler(&ctx.function_name, "transient failure"));
        }
        Ok(json!("recovered"))
    }
}

#[tokio::test]
async fn test_duplicate_registration_keeps_first_handler() {
    let runtime = test_runtime();

    runtime
        .register_function("sum", sum_handler(), "rust")
        .await
        .unwrap();

    let second = runtime
        .register_function(
            "sum",
            handler_fn(|_| Ok(json!("impostor"))),
            "node",
        )
        .await;
    assert!(matches!(second, Err(FaunError::AlreadyRegistered(_))));

    // The first registration's handler still answers.
    let result = runtime.invoke("sum", vec![json!(1), json!(2)]).await.unwrap();
    assert_eq!(result, json!(3));
}

#[tokio::test]
async fn test_deregister_unknown_name_fails() {
    let runtime = test_runtime();
    assert!(matches!(
        runtime.deregister_function("ghost").await,
        Err(FaunError::NotRegistered(_))
    ));
}

#[tokio::test]
async fn test_deregister_then_invoke_is_not_registered() {
    let runtime = test_runtime();
    runtime
        .register_function("sum", sum_handler(), "rust")
        .await
        .unwrap();

    runtime.deregister_function("sum").await.unwrap();

    let err = runtime.invoke("sum", vec![json!(1)]).await.unwrap_err();
    assert_eq!(err, FaunError::NotRegistered("sum".to_string()));
}

#[tokio::test]
async fn test_invoke_sum_records_start_and_outcome_logs() {
    let runtime = test_runtime();
    runtime
        .register_function("sum", sum_handler(), "rust")
        .await
        .unwrap();

    let result = runtime.invoke("sum", vec![json!(3), json!(5)]).await.unwrap();
    assert_eq!(result, json!(8));

    let logs = runtime.logs("sum", Some(10)).await;
    assert!(logs.len() >= 2);
    assert!(logs[0].message.contains("3, 5"));
    assert!(logs[1].message.contains('8'));
}

#[tokio::test]
async fn test_timeout_is_distinct_from_handler_error() {
    let runtime = test_runtime();
    runtime
        .register_function("sleepy", Box::new(SleepyHandler { sleep_ms: 50 }), "rust")
        .await
        .unwrap();
    runtime.set_timeout("sleepy", 1).await.unwrap();

    let err = runtime.invoke("sleepy", Vec::new()).await.unwrap_err();
    assert!(matches!(err, FaunError::Timeout { timeout_ms: 1, .. }));
    assert!(!matches!(err, FaunError::Handler { .. }));

    // The overrun itself is logged as the outcome entry.
    let logs = runtime.logs("sleepy", None).await;
    assert_eq!(logs.len(), 2);
    assert!(logs[1].message.contains("timed out"));
}

#[tokio::test]
async fn test_unbounded_when_no_timeout_configured() {
    let runtime = test_runtime();
    runtime
        .register_function("sleepy", Box::new(SleepyHandler { sleep_ms: 30 }), "rust")
        .await
        .unwrap();

    let result = runtime.invoke("sleepy", Vec::new()).await.unwrap();
    assert_eq!(result, json!("done"));
}

#[tokio::test]
async fn test_retry_recovers_and_logs_every_attempt() {
    let runtime = test_runtime();
    runtime
        .register_function("flaky", Box::new(FlakyHandler::new(2)), "rust")
        .await
        .unwrap();

    let result = runtime
        .invoke_with_retry("flaky", Vec::new(), 3)
        .await
        .unwrap();
    assert_eq!(result, json!("recovered"));

    // Three attempts, each with its own start/outcome pair.
    let logs = runtime.logs("flaky", None).await;
    assert_eq!(logs.len(), 6);
    assert!(logs[1].message.contains("failed"));
    assert!(logs[3].message.contains("failed"));
    assert!(logs[5].message.contains("recovered"));
}

#[tokio::test]
async fn test_retry_exhaustion_propagates_last_failure() {
    let runtime = test_runtime();
    runtime
        .register_function("flaky", Box::new(FlakyHandler::new(10)), "rust")
        .await
        .unwrap();

    let err = runtime
        .invoke_with_retry("flaky", Vec::new(), 2)
        .await
        .unwrap_err();
    assert!(matches!(err, FaunError::Handler { .. }));

    // Exactly two attempts were made.
    let logs = runtime.logs("flaky", None).await;
    assert_eq!(logs.len(), 4);
}

#[tokio::test]
async fn test_retry_of_zero_means_single_attempt() {
    let runtime = test_runtime();
    runtime
        .register_function("flaky", Box::new(FlakyHandler::new(1)), "rust")
        .await
        .unwrap();

    let err = runtime
        .invoke_with_retry("flaky", Vec::new(), 0)
        .await
        .unwrap_err();
    assert!(matches!(err, FaunError::Handler { .. }));
    assert_eq!(runtime.logs("flaky", None).await.len(), 2);
}

#[tokio::test]
async fn test_not_registered_is_never_retried() {
    let runtime = test_runtime();

    let err = runtime
        .invoke_with_retry("ghost", Vec::new(), 3)
        .await
        .unwrap_err();
    assert_eq!(err, FaunError::NotRegistered("ghost".to_string()));

    // A single start/failure pair, no retry attempts.
    assert_eq!(runtime.logs("ghost", None).await.len(), 2);
}

#[tokio::test]
async fn test_async_request_lifecycle() {
    let runtime = test_runtime();
    runtime
        .register_function("sum", sum_handler(), "rust")
        .await
        .unwrap();

    let id = runtime
        .submit(
            "sum",
            vec![("a".to_string(), json!(3)), ("b".to_string(), json!(5))],
        )
        .await;

    // Immediately after submission the request has not completed yet.
    let status = runtime.check_status(id).await;
    assert!(matches!(
        status,
        RequestStatus::Pending | RequestStatus::Running
    ));

    let result = runtime.get_result(id).await.unwrap();
    assert_eq!(result, json!(8));
    assert_eq!(runtime.check_status(id).await, RequestStatus::Completed);
}

#[tokio::test]
async fn test_async_failure_is_stored_and_surfaced() {
    let runtime = test_runtime();
    runtime
        .register_function(
            "always-fails",
            handler_fn(|_| Err(FaunError::handler("always-fails", "nope"))),
            "rust",
        )
        .await
        .unwrap();

    let id = runtime.submit("always-fails", Vec::new()).await;

    let err = runtime.get_result(id).await.unwrap_err();
    assert!(matches!(err, FaunError::Handler { .. }));
    assert_eq!(runtime.check_status(id).await, RequestStatus::Failed);
}

#[tokio::test]
async fn test_check_status_unrecognized_for_unknown_id() {
    let runtime = test_runtime();
    let bogus = uuid::Uuid::new_v4();
    assert_eq!(
        runtime.check_status(bogus).await,
        RequestStatus::Unrecognized
    );
}

#[tokio::test]
async fn test_log_limit_returns_first_entries_in_order() {
    let runtime = test_runtime();
    runtime
        .register_function("sum", sum_handler(), "rust")
        .await
        .unwrap();

    for i in 0..4 {
        runtime
            .invoke("sum", vec![json!(i), json!(i)])
            .await
            .unwrap();
    }

    // 8 entries stored; a limit of 3 returns exactly the oldest 3.
    let all = runtime.logs("sum", None).await;
    assert_eq!(all.len(), 8);

    let logs = runtime.logs("sum", Some(3)).await;
    assert_eq!(logs.len(), 3);
    assert_eq!(logs[0].message, all[0].message);
    assert_eq!(logs[1].message, all[1].message);
    assert_eq!(logs[2].message, all[2].message);
    assert!(logs[0].message.contains("0, 0"));
}

#[tokio::test]
async fn test_set_env_merges_key_wise() {
    let runtime = test_runtime();
    runtime
        .register_function("envy", sum_handler(), "rust")
        .await
        .unwrap();

    let first: HashMap<String, String> = [("a", "1"), ("b", "2")]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let second: HashMap<String, String> = [("b", "1"), ("c", "2")]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    runtime.set_env("envy", first).await.unwrap();
    runtime.set_env("envy", second).await.unwrap();

    let env = runtime.lookup("envy").await.unwrap().env;
    assert_eq!(env.len(), 3);
    assert_eq!(env.get("a"), Some(&"1".to_string()));
    assert_eq!(env.get("b"), Some(&"1".to_string()));
    assert_eq!(env.get("c"), Some(&"2".to_string()));
}

#[tokio::test]
async fn test_handler_sees_configured_env() {
    let runtime = FaunRuntime::new(
        FaunConfig::new()
            .env("STAGE", "test")
            .result_poll_interval_ms(10),
    );

    struct EnvEcho;

    #[async_trait]
    impl FaunHandler for EnvEcho {
        async fn call(&self, _args: Vec<Value>, ctx: &FunctionContext) -> Result<Value, FaunError> {
            Ok(json!(ctx.get_env("STAGE").cloned().unwrap_or_default()))
        }
    }

    runtime
        .register_function("env-echo", Box::new(EnvEcho), "rust")
        .await
        .unwrap();

    let result = runtime.invoke("env-echo", Vec::new()).await.unwrap();
    assert_eq!(result, json!("test"));
}

#[tokio::test]
async fn test_error_hook_observes_failures_without_masking() {
    let runtime = test_runtime();
    runtime
        .register_function(
            "doomed",
            handler_fn(|_| Err(FaunError::handler("doomed", "boom"))),
            "rust",
        )
        .await
        .unwrap();

    let observed = Arc::new(AtomicU32::new(0));
    let seen = observed.clone();
    runtime
        .set_error_hook(
            "doomed",
            hook_fn(move |fault| {
                assert!(matches!(fault, FaunError::Handler { .. }));
                seen.fetch_add(1, Ordering::SeqCst);
                // A failing hook must not replace the original failure.
                Err(FaunError::handler("doomed", "hook itself broke"))
            }),
        )
        .await;

    let err = runtime.invoke("doomed", Vec::new()).await.unwrap_err();
    assert_eq!(
        err,
        FaunError::handler("doomed", "boom"),
        "hook failure must not mask the handler failure"
    );
    assert_eq!(observed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_error_hook_rebinding_overwrites() {
    let runtime = test_runtime();
    runtime
        .register_function(
            "doomed",
            handler_fn(|_| Err(FaunError::handler("doomed", "boom"))),
            "rust",
        )
        .await
        .unwrap();

    let first_hits = Arc::new(AtomicU32::new(0));
    let second_hits = Arc::new(AtomicU32::new(0));

    let hits = first_hits.clone();
    runtime
        .set_error_hook(
            "doomed",
            hook_fn(move |_| {
                hits.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        )
        .await;

    let hits = second_hits.clone();
    runtime
        .set_error_hook(
            "doomed",
            hook_fn(move |_| {
                hits.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        )
        .await;

    let _ = runtime.invoke("doomed", Vec::new()).await;
    assert_eq!(first_hits.load(Ordering::SeqCst), 0);
    assert_eq!(second_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_logs_survive_deregistration() {
    let runtime = test_runtime();
    runtime
        .register_function("sum", sum_handler(), "rust")
        .await
        .unwrap();

    runtime.invoke("sum", vec![json!(1), json!(1)]).await.unwrap();
    runtime.deregister_function("sum").await.unwrap();

    // Records go away, audit history does not.
    assert!(runtime.lookup("sum").await.is_none());
    assert_eq!(runtime.logs("sum", None).await.len(), 2);
}

#[tokio::test]
async fn test_handler_panic_surfaces_as_handler_error() {
    let runtime = test_runtime();
    runtime
        .register_function(
            "panicky",
            handler_fn(|_| panic!("handler exploded")),
            "rust",
        )
        .await
        .unwrap();

    let err = runtime.invoke("panicky", Vec::new()).await.unwrap_err();
    assert!(matches!(err, FaunError::Handler { .. }));
}

//! Handler trait and per-invocation context.

use crate::error::FaunError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

/// Execution context handed to a handler for one invocation.
#[derive(Debug, Clone, Default)]
pub struct FunctionContext {
    /// Environment variables configured for the function.
    pub env: HashMap<String, String>,
    /// Name the function was registered under.
    pub function_name: String,
    /// Correlation id for this invocation.
    pub invocation_id: String,
}

impl FunctionContext {
    /// Create a new function context.
    pub fn new(function_name: impl Into<String>, invocation_id: impl Into<String>) -> Self {
        Self {
            env: HashMap::new(),
            function_name: function_name.into(),
            invocation_id: invocation_id.into(),
        }
    }

    /// Add an environment variable.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Get an environment variable.
    pub fn get_env(&self, key: &str) -> Option<&String> {
        self.env.get(key)
    }
}

/// The unit of logic registered under a function name.
///
/// The core imposes no schema on arguments or return value beyond being
/// representable as a logged string; both sides of the boundary are
/// `serde_json::Value`. Arguments arrive as a flat ordered list.
#[async_trait]
pub trait FaunHandler: Send + Sync {
    /// Execute the handler with the supplied positional arguments.
    async fn call(&self, args: Vec<Value>, ctx: &FunctionContext) -> Result<Value, FaunError>;
}

/// Adapter turning a plain closure into a [`FaunHandler`].
pub struct HandlerFn<F> {
    func: F,
}

#[async_trait]
impl<F> FaunHandler for HandlerFn<F>
where
    F: Fn(Vec<Value>) -> Result<Value, FaunError> + Send + Sync,
{
    async fn call(&self, args: Vec<Value>, _ctx: &FunctionContext) -> Result<Value, FaunError> {
        (self.func)(args)
    }
}

/// Wrap a closure as a boxed handler, ready for registration.
pub fn handler_fn<F>(func: F) -> Box<dyn FaunHandler>
where
    F: Fn(Vec<Value>) -> Result<Value, FaunError> + Send + Sync + 'static,
{
    Box::new(HandlerFn { func })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_handler_fn_adapter() {
        let handler = handler_fn(|args| {
            let total: i64 = args.iter().filter_map(Value::as_i64).sum();
            Ok(json!(total))
        });

        let ctx = FunctionContext::new("sum", "inv-1");
        let result = handler.call(vec![json!(3), json!(5)], &ctx).await.unwrap();
        assert_eq!(result, json!(8));
    }

    #[test]
    fn test_context_env() {
        let ctx = FunctionContext::new("test-fn", "inv-42")
            .with_env("API_KEY", "secret123")
            .with_env("STAGE", "test");

        assert_eq!(ctx.function_name, "test-fn");
        assert_eq!(ctx.invocation_id, "inv-42");
        assert_eq!(ctx.get_env("API_KEY"), Some(&"secret123".to_string()));
        assert_eq!(ctx.get_env("MISSING"), None);
    }
}

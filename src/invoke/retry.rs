//! Bounded retry on top of the invocation path.

use crate::error::{FaunError, FaunResult};
use crate::invoke::invoker::Invoker;
use serde_json::Value;
use tracing::warn;

impl Invoker {
    /// Invoke a function, retrying on handler faults and timeouts up to
    /// `retries` total attempts.
    ///
    /// The first attempt counts as attempt 1, and `retries == 0` is treated
    /// the same as a single attempt. Registry-level faults such as
    /// [`FaunError::NotRegistered`] are never retried. The final attempt's
    /// failure propagates unchanged, and every attempt leaves its own
    /// start/outcome pair in the function's log sequence.
    pub async fn invoke_with_retry(
        &self,
        name: &str,
        args: Vec<Value>,
        retries: u32,
    ) -> FaunResult<Value> {
        let attempts = retries.max(1);
        let mut last_err: Option<FaunError> = None;

        for attempt in 1..=attempts {
            match self.invoke(name, args.clone()).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < attempts => {
                    warn!(
                        function = name,
                        attempt,
                        attempts,
                        error = %err,
                        "Invocation failed, retrying"
                    );
                    last_err = Some(err);
                }
                Err(err) => return Err(err),
            }
        }

        Err(last_err.unwrap_or_else(|| FaunError::handler(name, "no attempts were made")))
    }
}

//! Asynchronous request lifecycle tracking.
//!
//! Each submitted request runs on its own tokio task whose only channel back
//! is the shared request map: `pending` → `running` → `completed`/`failed`.
//! Terminal states are immutable and no fault ever escapes the task.

use crate::error::{FaunError, FaunResult};
use crate::invoke::Invoker;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Observable status of an asynchronous request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Submitted, execution task not yet started.
    Pending,
    /// Execution task is running the invocation.
    Running,
    /// Finished successfully; the result is stored.
    Completed,
    /// Finished with a failure; the error is stored.
    Failed,
    /// The queried id was never issued.
    Unrecognized,
}

/// Stored state of one request. Only the execution task writes transitions.
enum RequestState {
    Pending,
    Running,
    Completed(Value),
    Failed(FaunError),
}

impl RequestState {
    fn status(&self) -> RequestStatus {
        match self {
            RequestState::Pending => RequestStatus::Pending,
            RequestState::Running => RequestStatus::Running,
            RequestState::Completed(_) => RequestStatus::Completed,
            RequestState::Failed(_) => RequestStatus::Failed,
        }
    }
}

/// Tracks asynchronous invocation requests from submission to terminal state.
#[derive(Clone)]
pub struct RequestTracker {
    requests: Arc<RwLock<HashMap<Uuid, RequestState>>>,
    invoker: Invoker,
    poll_interval: Duration,
}

impl RequestTracker {
    /// Create a tracker that executes requests through the given invoker and
    /// polls results at the given fixed interval.
    pub fn new(invoker: Invoker, poll_interval: Duration) -> Self {
        Self {
            requests: Arc::new(RwLock::new(HashMap::new())),
            invoker,
            poll_interval,
        }
    }

    /// Submit an asynchronous invocation and return its request id.
    ///
    /// `input` is an ordered list of parameter-name/value pairs; the values,
    /// in order, become the positional arguments passed to the handler. The
    /// invocation runs on its own task and this method returns without
    /// awaiting any of its transitions.
    pub async fn submit(&self, name: &str, input: Vec<(String, Value)>) -> Uuid {
        let request_id = Uuid::new_v4();

        {
            let mut requests = self.requests.write().await;
            requests.insert(request_id, RequestState::Pending);
        }

        debug!(function = name, request_id = %request_id, "Submitted async invocation");

        let requests = self.requests.clone();
        let invoker = self.invoker.clone();
        let name = name.to_string();

        tokio::spawn(async move {
            {
                let mut requests = requests.write().await;
                requests.insert(request_id, RequestState::Running);
            }

            let args: Vec<Value> = input.into_iter().map(|(_, value)| value).collect();
            let outcome = invoker.invoke(&name, args).await;

            let mut requests = requests.write().await;
            match outcome {
                Ok(value) => {
                    requests.insert(request_id, RequestState::Completed(value));
                }
                Err(err) => {
                    requests.insert(request_id, RequestState::Failed(err));
                }
            }
        });

        request_id
    }

    /// Current status of a request; `Unrecognized` for ids never issued.
    pub async fn check_status(&self, request_id: Uuid) -> RequestStatus {
        let requests = self.requests.read().await;
        requests
            .get(&request_id)
            .map(RequestState::status)
            .unwrap_or(RequestStatus::Unrecognized)
    }

    /// Wait for a request to reach a terminal state and return its outcome.
    ///
    /// Polls the request map at the configured interval. A `completed`
    /// request yields the stored result, a `failed` request yields the
    /// stored error, and an id that was never issued yields
    /// [`FaunError::UnknownRequest`] rather than polling forever.
    pub async fn get_result(&self, request_id: Uuid) -> FaunResult<Value> {
        loop {
            {
                let requests = self.requests.read().await;
                match requests.get(&request_id) {
                    None => return Err(FaunError::UnknownRequest(request_id.to_string())),
                    Some(RequestState::Completed(value)) => return Ok(value.clone()),
                    Some(RequestState::Failed(err)) => return Err(err.clone()),
                    Some(_) => {}
                }
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

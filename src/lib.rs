//! # Faun - Function Invocation Core
//!
//! Faun is a lightweight function-as-a-service core: developers register
//! named handlers with a runtime tag, invoke them synchronously or
//! asynchronously, bound their execution time, retry on failure, and read
//! back per-invocation logs and results.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                           FaunRuntime                               │
//! │                                                                     │
//! │  ┌──────────────────┐   ┌───────────────┐   ┌───────────────────┐  │
//! │  │ FunctionRegistry │◄──┤    Invoker    ├──►│     LogStore      │  │
//! │  │ (records + env)  │   │ (timeouts,    │   │ (per-function     │  │
//! │  └──────────────────┘   │  retries)     │   │  log sequences)   │  │
//! │                         └──────┬────────┘   └───────────────────┘  │
//! │  ┌──────────────────┐          │            ┌───────────────────┐  │
//! │  │ ErrorHookRegistry│◄─────────┴───────────►│  RequestTracker   │  │
//! │  │ (failure hooks)  │                       │ (async lifecycle) │  │
//! │  └──────────────────┘                       └───────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use faun::prelude::*;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), FaunError> {
//!     let runtime = FaunRuntime::with_defaults();
//!
//!     runtime
//!         .register_function(
//!             "sum",
//!             handler_fn(|args| {
//!                 let total: i64 = args.iter().filter_map(|v| v.as_i64()).sum();
//!                 Ok(json!(total))
//!             }),
//!             "rust",
//!         )
//!         .await?;
//!
//!     let result = runtime.invoke("sum", vec![json!(3), json!(5)]).await?;
//!     assert_eq!(result, json!(8));
//!
//!     // Asynchronous path: submit, poll, fetch.
//!     let id = runtime.submit("sum", vec![("a".into(), json!(1)), ("b".into(), json!(2))]).await;
//!     let result = runtime.get_result(id).await?;
//!     assert_eq!(result, json!(3));
//!     Ok(())
//! }
//! ```
//!
//! ## Invocation lifecycle
//!
//! Every invocation appends a start entry (the stringified arguments) and an
//! outcome entry (result or failure) to the function's log sequence. A
//! configured timeout bounds the handler's execution on a cancellable task;
//! overruns surface as [`FaunError::Timeout`], distinct from handler faults.
//! Asynchronous requests move `pending` → `running` → `completed`/`failed`,
//! and terminal states are immutable.

pub mod error;
pub mod function;
pub mod invoke;
pub mod logs;
pub mod runtime;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::error::{FaunError, FaunResult};
    pub use crate::function::{
        handler_fn, hook_fn, ErrorHook, FaunHandler, FunctionContext, FunctionRegistry,
    };
    pub use crate::invoke::Invoker;
    pub use crate::logs::{LogEntry, LogStore};
    pub use crate::runtime::{FaunConfig, FaunRuntime, RequestStatus};
    pub use async_trait::async_trait;
}

// Re-export for convenience
pub use error::{FaunError, FaunResult};
pub use function::{handler_fn, FaunHandler, FunctionContext, FunctionRegistry};
pub use invoke::Invoker;
pub use logs::{LogEntry, LogStore};
pub use runtime::{FaunConfig, FaunRuntime, RequestStatus};

//! Function registration: handler trait, registry, and error hooks.

pub mod handler;
pub mod hooks;
pub mod registry;

pub use handler::{handler_fn, FaunHandler, FunctionContext, HandlerFn};
pub use hooks::{hook_fn, ErrorHook, ErrorHookRegistry};
pub use registry::{FunctionInfo, FunctionRecord, FunctionRegistry};

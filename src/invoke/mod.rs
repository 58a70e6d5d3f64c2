//! Invocation path: synchronous execution and bounded retry.

pub mod invoker;
mod retry;

pub use invoker::Invoker;

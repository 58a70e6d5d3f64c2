//! Error hook registry.
//!
//! A hook is an advisory callback bound to a function name and invoked by the
//! invoker right after it records an execution failure, before the failure
//! propagates to the caller. At most one hook is bound per name; binding
//! again overwrites the previous hook.

use crate::error::FaunError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Callback observing execution failures of one function.
///
/// The return value is advisory: the invoker reports hook errors but never
/// lets them replace the original failure.
pub trait ErrorHook: Send + Sync {
    /// Called with the failure that is about to propagate.
    fn on_failure(&self, fault: &FaunError) -> Result<(), FaunError>;
}

/// Adapter turning a plain closure into an [`ErrorHook`].
pub struct HookFn<F> {
    func: F,
}

impl<F> ErrorHook for HookFn<F>
where
    F: Fn(&FaunError) -> Result<(), FaunError> + Send + Sync,
{
    fn on_failure(&self, fault: &FaunError) -> Result<(), FaunError> {
        (self.func)(fault)
    }
}

/// Wrap a closure as a shareable error hook.
pub fn hook_fn<F>(func: F) -> Arc<dyn ErrorHook>
where
    F: Fn(&FaunError) -> Result<(), FaunError> + Send + Sync + 'static,
{
    Arc::new(HookFn { func })
}

/// Registry binding function names to error hooks, last write wins.
#[derive(Default)]
pub struct ErrorHookRegistry {
    hooks: RwLock<HashMap<String, Arc<dyn ErrorHook>>>,
}

impl ErrorHookRegistry {
    /// Create an empty hook registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a hook to a function name, overwriting any previous binding.
    pub async fn set_hook(&self, name: impl Into<String>, hook: Arc<dyn ErrorHook>) {
        let name = name.into();
        let mut hooks = self.hooks.write().await;
        if hooks.insert(name.clone(), hook).is_some() {
            debug!("Replaced error hook for '{}'", name);
        }
    }

    /// Remove the hook bound to a function name, if any.
    pub async fn remove_hook(&self, name: &str) -> bool {
        self.hooks.write().await.remove(name).is_some()
    }

    /// Get the hook bound to a function name.
    pub async fn get(&self, name: &str) -> Option<Arc<dyn ErrorHook>> {
        self.hooks.read().await.get(name).cloned()
    }
}

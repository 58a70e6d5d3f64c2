//! Function registry for managing registered handlers and their metadata.

use crate::error::{FaunError, FaunResult};
use crate::function::handler::FaunHandler;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

/// Function entry in the registry.
struct FunctionEntry {
    /// The handler implementation.
    handler: Arc<dyn FaunHandler>,
    /// Runtime label (informational only).
    runtime: String,
    /// Execution budget in milliseconds; `None` means unbounded.
    timeout_ms: Option<u64>,
    /// Environment variables, merged key-wise on update.
    env: HashMap<String, String>,
    /// Gate serializing invocations of this function.
    gate: Arc<Mutex<()>>,
}

/// Snapshot of one registered function, as returned by [`FunctionRegistry::lookup`].
#[derive(Clone)]
pub struct FunctionRecord {
    /// Name the function was registered under.
    pub name: String,
    /// Runtime label.
    pub runtime: String,
    /// Execution budget in milliseconds; `None` means unbounded.
    pub timeout_ms: Option<u64>,
    /// Environment variables configured for the function.
    pub env: HashMap<String, String>,
    pub(crate) handler: Arc<dyn FaunHandler>,
    pub(crate) gate: Arc<Mutex<()>>,
}

/// Serializable metadata row for listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionInfo {
    /// Function name.
    pub name: String,
    /// Runtime label.
    pub runtime: String,
    /// Configured timeout, if any.
    pub timeout_ms: Option<u64>,
}

/// Registry of named functions.
///
/// The registry exclusively owns its records; other components see snapshots
/// produced by [`lookup`](Self::lookup). All operations are internally
/// synchronized.
pub struct FunctionRegistry {
    /// Registered functions.
    functions: RwLock<HashMap<String, FunctionEntry>>,
    /// Environment variables seeded into every new record.
    global_env: HashMap<String, String>,
}

impl FunctionRegistry {
    /// Create a new function registry.
    pub fn new() -> Self {
        Self {
            functions: RwLock::new(HashMap::new()),
            global_env: HashMap::new(),
        }
    }

    /// Create a registry whose records start with the given environment.
    pub fn with_env(env: HashMap<String, String>) -> Self {
        Self {
            functions: RwLock::new(HashMap::new()),
            global_env: env,
        }
    }

    /// Register a new function under a unique name.
    pub async fn register(
        &self,
        name: impl Into<String>,
        handler: Box<dyn FaunHandler>,
        runtime: impl Into<String>,
    ) -> FaunResult<()> {
        let name = name.into();
        let mut functions = self.functions.write().await;

        if functions.contains_key(&name) {
            return Err(FaunError::AlreadyRegistered(name));
        }

        let entry = FunctionEntry {
            handler: Arc::from(handler),
            runtime: runtime.into(),
            timeout_ms: None,
            env: self.global_env.clone(),
            gate: Arc::new(Mutex::new(())),
        };

        functions.insert(name.clone(), entry);
        info!("Registered function: {}", name);
        Ok(())
    }

    /// Remove a function from the registry.
    ///
    /// Log sequences recorded for the function are retained for audit; only
    /// the record goes away, so later invocations fail as not registered.
    pub async fn deregister(&self, name: &str) -> FaunResult<()> {
        let mut functions = self.functions.write().await;
        functions
            .remove(name)
            .ok_or_else(|| FaunError::NotRegistered(name.to_string()))?;

        info!("Deregistered function: {}", name);
        Ok(())
    }

    /// Set the execution budget for a function, overwriting any prior value.
    pub async fn set_timeout(&self, name: &str, timeout_ms: u64) -> FaunResult<()> {
        if timeout_ms == 0 {
            return Err(FaunError::InvalidArgument(
                "timeout must be a positive number of milliseconds".to_string(),
            ));
        }

        let mut functions = self.functions.write().await;
        let entry = functions
            .get_mut(name)
            .ok_or_else(|| FaunError::NotRegistered(name.to_string()))?;

        entry.timeout_ms = Some(timeout_ms);
        debug!("Set timeout for '{}' to {}ms", name, timeout_ms);
        Ok(())
    }

    /// Merge environment variables into a function's record.
    ///
    /// Existing keys are overwritten, all others are kept; the map is never
    /// wholesale-replaced.
    pub async fn set_env(&self, name: &str, vars: HashMap<String, String>) -> FaunResult<()> {
        let mut functions = self.functions.write().await;
        let entry = functions
            .get_mut(name)
            .ok_or_else(|| FaunError::NotRegistered(name.to_string()))?;

        entry.env.extend(vars);
        Ok(())
    }

    /// Look up a function by name, returning a snapshot of its record.
    pub async fn lookup(&self, name: &str) -> Option<FunctionRecord> {
        let functions = self.functions.read().await;
        functions.get(name).map(|entry| FunctionRecord {
            name: name.to_string(),
            runtime: entry.runtime.clone(),
            timeout_ms: entry.timeout_ms,
            env: entry.env.clone(),
            handler: entry.handler.clone(),
            gate: entry.gate.clone(),
        })
    }

    /// List metadata for all registered functions.
    pub async fn list(&self) -> Vec<FunctionInfo> {
        let functions = self.functions.read().await;
        functions
            .iter()
            .map(|(name, entry)| FunctionInfo {
                name: name.clone(),
                runtime: entry.runtime.clone(),
                timeout_ms: entry.timeout_ms,
            })
            .collect()
    }

    /// Number of registered functions.
    pub async fn len(&self) -> usize {
        self.functions.read().await.len()
    }

    /// Whether the registry is empty.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

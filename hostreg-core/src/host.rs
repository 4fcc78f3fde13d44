//! The virtual host record.
//!
//! A [`VirtualHost`] is a hostname plus an open configuration bag. The bag
//! has no fixed schema; consumers agree on keys by convention:
//!
//! | key        | read by                   |
//! |------------|---------------------------|
//! | `database` | activation, alias lookup  |
//! | `dbuser`   | activation                |
//! | `password` | activation                |
//! | `dbhost`   | activation (optional)     |
//! | `prefix`   | alias lookup              |
//! | `newhost`  | installation handler      |

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The free-form configuration bag attached to a host.
pub type Context = Map<String, Value>;

/// A tenant configuration keyed by hostname.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualHost {
    hostname: String,
    #[serde(default)]
    context: Context,
}

impl VirtualHost {
    /// Create a host with an empty context.
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            context: Context::new(),
        }
    }

    /// Create a host with the given context.
    pub fn with_context(hostname: impl Into<String>, context: Context) -> Self {
        Self {
            hostname: hostname.into(),
            context,
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// The hostname, unique within a registry.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// The host's context entries.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Mutable access to the context entries.
    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }

    /// Replace the whole context, returning the previous one.
    pub fn set_context(&mut self, context: Context) -> Context {
        std::mem::replace(&mut self.context, context)
    }

    /// Raw context value for `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.context.get(key)
    }

    /// Returns the value under `key` if it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.context.get(key).and_then(Value::as_str)
    }

    /// Returns the boolean under `key`, or `default` if absent or not a bool.
    pub fn flag(&self, key: &str, default: bool) -> bool {
        self.context
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(default)
    }

    /// Set a context entry, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.context.insert(key.into(), value.into())
    }

    /// Drop a context entry.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.context.remove(key)
    }
}

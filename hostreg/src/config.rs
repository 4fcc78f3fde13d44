//! Registry configuration.

use serde::{Deserialize, Deserializer};
use std::time::Duration;

/// Store namespace used when none is configured.
pub const DEFAULT_MASTER_SCOPE: &str = "master";

/// What `add` does with a host whose activation fails.
///
/// Batch passes ignore the policy: they report the failure and keep the
/// host, since the in-memory set has to mirror the stored records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivationPolicy {
    /// `add` fails and the host is neither registered nor announced.
    ///
    /// Its record stays persisted, so the next reconciliation picks it up.
    #[default]
    Strict,
    /// The failure is reported and the host is still added and announced.
    Lenient,
}

/// Configuration for a [`Registry`](crate::Registry).
///
/// Deserializable from any serde format:
///
/// ```rust,ignore
/// let config: RegistryConfig = serde_json::from_str(r#"{
///     "master_scope": "core9",
///     "activation_policy": "lenient",
///     "observer_timeout_ms": 2000
/// }"#)?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Store namespace holding host records.
    pub master_scope: String,
    /// Activation failure handling.
    pub activation_policy: ActivationPolicy,
    /// Upper bound on a single observer notification.
    #[serde(rename = "observer_timeout_ms", deserialize_with = "millis")]
    pub observer_timeout: Option<Duration>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            master_scope: DEFAULT_MASTER_SCOPE.to_owned(),
            activation_policy: ActivationPolicy::default(),
            observer_timeout: None,
        }
    }
}

impl RegistryConfig {
    /// Set the store scope holding host records.
    pub fn with_master_scope(mut self, scope: impl Into<String>) -> Self {
        self.master_scope = scope.into();
        self
    }

    /// Set how activation failures on `add` are handled.
    pub fn with_activation_policy(mut self, policy: ActivationPolicy) -> Self {
        self.activation_policy = policy;
        self
    }

    /// Bound every observer call by `timeout`.
    pub fn with_observer_timeout(mut self, timeout: Duration) -> Self {
        self.observer_timeout = Some(timeout);
        self
    }
}

fn millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
    Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
}

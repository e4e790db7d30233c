//! Calculator configuration.

use std::time::Duration;

use serde::Deserialize;

const DEFAULT_PROVIDER_TIMEOUT_MS: u64 = 250;

/// Calculator tuning from the `[calculator]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Per-provider budget (ms) for bounded evaluation.
    pub provider_timeout_ms: u64,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            provider_timeout_ms: DEFAULT_PROVIDER_TIMEOUT_MS,
        }
    }
}

impl CalculatorConfig {
    /// Returns the provider budget, clamping zero to one millisecond.
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider_timeout_ms.max(1))
    }
}

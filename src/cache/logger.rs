//! Warning sink for factor failures.

use tracing::warn;

/// Receives one message per failed factor provider.
pub trait WarningLogger: Send + Sync {
    fn warning(&self, message: &str);
}

/// Forwards warnings to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl WarningLogger for TracingLogger {
    fn warning(&self, message: &str) {
        warn!(target: "resolver_cache_key::calculator", "{message}");
    }
}

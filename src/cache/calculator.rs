//! Resolver result cache key calculator.
//!
//! Every registered provider is asked for its factor; failing providers are
//! reported through the [`WarningLogger`] and left out. The survivors are
//! composed into a key by [`keys::compose`].

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use metrics::counter;
use serde_json::Value;
use tokio::{task, time::timeout};
use tracing::{debug, instrument};

use super::context::ContextFactory;
use super::factor::{FactorError, FactorResult};
use super::keys::{self, ResolverCacheKey};
use super::logger::{TracingLogger, WarningLogger};
use super::registry::FactorRegistry;

/// Prefix of the warning emitted for every failed provider.
pub const FAILURE_MESSAGE_PREFIX: &str = "Unable to obtain cache key for resolver results. ";

pub(crate) const METRIC_CALCULATIONS_TOTAL: &str = "resolver_cache_key_calculations_total";
pub(crate) const METRIC_FACTOR_FAILURES_TOTAL: &str = "resolver_cache_key_factor_failures_total";

const SOURCE: &str = "resolver_cache_key::calculator";

/// Derives cache keys for resolver results from a fixed set of factor providers.
pub struct KeyCalculator<F: ContextFactory> {
    registry: FactorRegistry<F::Context>,
    context_factory: F,
    logger: Arc<dyn WarningLogger>,
}

impl<F: ContextFactory> KeyCalculator<F> {
    /// Create a calculator that reports provider failures through `tracing`.
    pub fn new(registry: FactorRegistry<F::Context>, context_factory: F) -> Self {
        Self {
            registry,
            context_factory,
            logger: Arc::new(TracingLogger),
        }
    }

    /// Replace the warning sink.
    pub fn with_logger(mut self, logger: Arc<dyn WarningLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn registry(&self) -> &FactorRegistry<F::Context> {
        &self.registry
    }

    /// Calculate the key for the current context and optional parent resolver data.
    ///
    /// Returns `None` when no provider is registered or none of them produced
    /// a factor. Provider failures never propagate to the caller.
    #[instrument(level = "debug", skip_all, fields(providers = self.registry.len()))]
    pub fn calculate_cache_key(
        &self,
        parent_resolver_data: Option<&Value>,
    ) -> Option<ResolverCacheKey> {
        if self.registry.is_empty() {
            record_outcome(false);
            return None;
        }

        let context = self.context_factory.get();
        let results = self
            .registry
            .providers()
            .map(|provider| provider.resolve(&context, parent_resolver_data));

        self.compose(results)
    }

    fn compose(
        &self,
        results: impl IntoIterator<Item = Result<FactorResult, FactorError>>,
    ) -> Option<ResolverCacheKey> {
        let mut factors = Vec::with_capacity(self.registry.len());
        for result in results {
            match result {
                Ok(factor) => factors.push(factor),
                Err(error) => self.report_failure(&error),
            }
        }

        let resolved = factors.len();
        let key = keys::compose(factors);
        record_outcome(key.is_some());
        debug!(
            target: SOURCE,
            resolved,
            computed = key.is_some(),
            "Resolver cache key calculated"
        );
        key
    }

    fn report_failure(&self, error: &FactorError) {
        counter!(METRIC_FACTOR_FAILURES_TOTAL, "reason" => error.reason()).increment(1);
        self.logger.warning(&format!("{FAILURE_MESSAGE_PREFIX}{error}"));
    }
}

impl<F> KeyCalculator<F>
where
    F: ContextFactory,
    F::Context: Send + Sync + 'static,
{
    /// Calculate the key, giving each provider at most `budget` to answer.
    ///
    /// Providers run concurrently on the blocking pool. A provider that
    /// exceeds the budget is reported and dropped like any other failure; its
    /// task is detached rather than interrupted. Requires a Tokio runtime.
    #[instrument(
        level = "debug",
        skip_all,
        fields(providers = self.registry.len(), budget_ms = budget.as_millis() as u64)
    )]
    pub async fn calculate_cache_key_within(
        &self,
        parent_resolver_data: Option<&Value>,
        budget: Duration,
    ) -> Option<ResolverCacheKey> {
        if self.registry.is_empty() {
            record_outcome(false);
            return None;
        }

        let context = Arc::new(self.context_factory.get());
        let parent = Arc::new(parent_resolver_data.cloned());

        let pending = self.registry.providers().cloned().map(|provider| {
            let context = Arc::clone(&context);
            let parent = Arc::clone(&parent);
            async move {
                let handle =
                    task::spawn_blocking(move || provider.resolve(&context, (*parent).as_ref()));
                match timeout(budget, handle).await {
                    Ok(Ok(result)) => result,
                    Ok(Err(join_error)) if join_error.is_panic() => {
                        Err(FactorError::panicked(join_error.into_panic().as_ref()))
                    }
                    Ok(Err(join_error)) => Err(FactorError::new(join_error.to_string())),
                    Err(_) => Err(FactorError::TimedOut { budget }),
                }
            }
        });

        let results = join_all(pending).await;
        self.compose(results)
    }
}

fn record_outcome(computed: bool) {
    let outcome = if computed { "computed" } else { "empty" };
    counter!(METRIC_CALCULATIONS_TOTAL, "outcome" => outcome).increment(1);
}

//! Resolver result cache keys.
//!
//! Derives a deterministic key for the output of a resolver from a set of
//! pluggable key factors:
//!
//! - **Basic factors** contribute a value that needs no input.
//! - **Parent-dependent factors** derive their value from the request context
//!   and the data returned by the parent resolver.
//!
//! Values are ordered by factor name, joined with `|`, upper-cased and hashed
//! with SHA-256. Failing providers are logged and skipped.
//!
//! ## Configuration
//!
//! ```toml
//! [calculator]
//! provider_timeout_ms = 250
//! ```

mod calculator;
mod config;
mod context;
mod factor;
mod keys;
mod logger;
mod registry;

pub use calculator::{FAILURE_MESSAGE_PREFIX, KeyCalculator};
pub use config::CalculatorConfig;
pub use context::{ContextFactory, ResolverContext, StaticContextFactory};
pub use factor::{BasicFactor, FactorError, FactorResult, KeyFactorProvider, ParentDependentFactor};
pub use keys::{FACTOR_SEPARATOR, ResolverCacheKey, canonicalize, compose};
pub use logger::{TracingLogger, WarningLogger};
pub use registry::FactorRegistry;

pub(crate) use calculator::{METRIC_CALCULATIONS_TOTAL, METRIC_FACTOR_FAILURES_TOTAL};

//! Key factor capabilities.
//!
//! A factor provider contributes one named value to a resolver cache key.
//! Providers come in two flavours:
//!
//! - [`BasicFactor`]: name and value need no input.
//! - [`ParentDependentFactor`]: the value is derived from the request context
//!   and the data returned by the parent resolver.
//!
//! [`KeyFactorProvider`] closes over both so the calculator dispatches with a
//! `match` instead of probing capabilities at runtime.

use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

/// Failure raised while obtaining a factor's name or value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FactorError {
    #[error("{message}")]
    Provider { message: String },
    #[error("parent resolver data is required but was not supplied")]
    MissingParentData,
    #[error("parent resolver data has no scalar field `{field}`")]
    MissingParentField { field: String },
    #[error("context attribute `{attribute}` is not set")]
    MissingContextAttribute { attribute: String },
    #[error("factor provider panicked: {message}")]
    Panicked { message: String },
    #[error("factor provider did not respond within {}ms", .budget.as_millis())]
    TimedOut { budget: Duration },
}

impl FactorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }

    pub fn missing_parent_field(field: impl Into<String>) -> Self {
        Self::MissingParentField {
            field: field.into(),
        }
    }

    pub fn missing_context_attribute(attribute: impl Into<String>) -> Self {
        Self::MissingContextAttribute {
            attribute: attribute.into(),
        }
    }

    pub(crate) fn panicked(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(text) = payload.downcast_ref::<&str>() {
            (*text).to_string()
        } else if let Some(text) = payload.downcast_ref::<String>() {
            text.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self::Panicked { message }
    }

    /// Metric label describing the failure class.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Panicked { .. } => "panic",
            Self::TimedOut { .. } => "timeout",
            _ => "error",
        }
    }
}

/// A factor whose name and value need no input.
pub trait BasicFactor: Send + Sync {
    /// Name used to order this factor among the others.
    fn factor_name(&self) -> Result<String, FactorError>;

    fn factor_value(&self) -> Result<String, FactorError>;
}

/// A factor whose value depends on the context and the parent resolver's result.
///
/// The calculator never calls [`BasicFactor::factor_value`] on these providers;
/// it calls [`ParentDependentFactor::factor_value_for_parent`] instead, even
/// when no parent data is available.
pub trait ParentDependentFactor<C>: BasicFactor {
    fn factor_value_for_parent(
        &self,
        context: &C,
        parent_resolver_data: Option<&Value>,
    ) -> Result<String, FactorError>;
}

/// A registered provider tagged with its capability.
pub enum KeyFactorProvider<C> {
    Basic(Arc<dyn BasicFactor>),
    ParentDependent(Arc<dyn ParentDependentFactor<C>>),
}

impl<C> KeyFactorProvider<C> {
    pub fn basic(factor: impl BasicFactor + 'static) -> Self {
        Self::Basic(Arc::new(factor))
    }

    pub fn parent_dependent(factor: impl ParentDependentFactor<C> + 'static) -> Self {
        Self::ParentDependent(Arc::new(factor))
    }

    pub fn is_parent_dependent(&self) -> bool {
        matches!(self, Self::ParentDependent(_))
    }

    /// Resolve this provider's factor, converting panics into [`FactorError::Panicked`].
    ///
    /// The name is requested first; when it fails the value accessor is not called.
    pub fn resolve(
        &self,
        context: &C,
        parent_resolver_data: Option<&Value>,
    ) -> Result<FactorResult, FactorError> {
        catch_unwind(AssertUnwindSafe(|| {
            self.resolve_unguarded(context, parent_resolver_data)
        }))
        .unwrap_or_else(|payload| Err(FactorError::panicked(payload.as_ref())))
    }

    fn resolve_unguarded(
        &self,
        context: &C,
        parent_resolver_data: Option<&Value>,
    ) -> Result<FactorResult, FactorError> {
        match self {
            Self::Basic(factor) => {
                let name = factor.factor_name()?;
                let value = factor.factor_value()?;
                Ok(FactorResult { name, value })
            }
            Self::ParentDependent(factor) => {
                let name = factor.factor_name()?;
                let value = factor.factor_value_for_parent(context, parent_resolver_data)?;
                Ok(FactorResult { name, value })
            }
        }
    }
}

impl<C> Clone for KeyFactorProvider<C> {
    fn clone(&self) -> Self {
        match self {
            Self::Basic(factor) => Self::Basic(Arc::clone(factor)),
            Self::ParentDependent(factor) => Self::ParentDependent(Arc::clone(factor)),
        }
    }
}

impl<C> fmt::Debug for KeyFactorProvider<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic(_) => f.write_str("KeyFactorProvider::Basic"),
            Self::ParentDependent(_) => f.write_str("KeyFactorProvider::ParentDependent"),
        }
    }
}

/// A factor name and value obtained during one calculation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FactorResult {
    pub name: String,
    pub value: String,
}

impl FactorResult {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

use serde_json::Value;

use crate::cache::{BasicFactor, FactorError, ParentDependentFactor, ResolverContext};

/// Reads a request attribute such as `store`, `currency` or `customer_group`.
///
/// Parent resolver data is ignored; the factor only needs the context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextAttributeFactor {
    name: String,
    attribute: String,
}

impl ContextAttributeFactor {
    pub fn new(name: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attribute: attribute.into(),
        }
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }
}

impl BasicFactor for ContextAttributeFactor {
    fn factor_name(&self) -> Result<String, FactorError> {
        Ok(self.name.clone())
    }

    fn factor_value(&self) -> Result<String, FactorError> {
        Err(FactorError::missing_context_attribute(&self.attribute))
    }
}

impl ParentDependentFactor<ResolverContext> for ContextAttributeFactor {
    fn factor_value_for_parent(
        &self,
        context: &ResolverContext,
        _parent_resolver_data: Option<&Value>,
    ) -> Result<String, FactorError> {
        context
            .attribute(&self.attribute)
            .map(str::to_string)
            .ok_or_else(|| FactorError::missing_context_attribute(&self.attribute))
    }
}

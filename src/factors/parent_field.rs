use serde_json::Value;

use crate::cache::{BasicFactor, FactorError, ParentDependentFactor};

/// Reads a top-level scalar field of the parent resolver's result.
///
/// Typical fields are entity identifiers such as `model_id`, so that a child
/// resolver's cached result is scoped to the entity it was resolved for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentFieldFactor {
    name: String,
    field: String,
    prefix: String,
}

impl ParentFieldFactor {
    pub fn new(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field: field.into(),
            prefix: String::new(),
        }
    }

    /// Prepend `prefix` to the field value, e.g. `object_` + `123`.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }
}

impl BasicFactor for ParentFieldFactor {
    fn factor_name(&self) -> Result<String, FactorError> {
        Ok(self.name.clone())
    }

    fn factor_value(&self) -> Result<String, FactorError> {
        Err(FactorError::MissingParentData)
    }
}

impl<C> ParentDependentFactor<C> for ParentFieldFactor {
    fn factor_value_for_parent(
        &self,
        _context: &C,
        parent_resolver_data: Option<&Value>,
    ) -> Result<String, FactorError> {
        let parent = parent_resolver_data.ok_or(FactorError::MissingParentData)?;
        let value = match parent.get(&self.field) {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Number(number)) => number.to_string(),
            Some(Value::Bool(flag)) => flag.to_string(),
            _ => return Err(FactorError::missing_parent_field(&self.field)),
        };
        Ok(format!("{}{value}", self.prefix))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn resolve(factor: &ParentFieldFactor, parent: Option<&Value>) -> Result<String, FactorError> {
        ParentDependentFactor::<()>::factor_value_for_parent(factor, &(), parent)
    }

    #[test]
    fn formats_scalar_fields() {
        let factor = ParentFieldFactor::new("parent_id", "object_id").with_prefix("object_");
        assert_eq!(
            resolve(&factor, Some(&json!({"object_id": 123}))).unwrap(),
            "object_123"
        );

        let factor = ParentFieldFactor::new("sku", "sku");
        assert_eq!(
            resolve(&factor, Some(&json!({"sku": "MB-01"}))).unwrap(),
            "MB-01"
        );
    }

    #[test]
    fn absent_parent_data_is_an_error() {
        let factor = ParentFieldFactor::new("parent_id", "model_id");
        assert_eq!(
            resolve(&factor, None).unwrap_err(),
            FactorError::MissingParentData
        );
    }

    #[test]
    fn non_scalar_or_missing_fields_are_errors() {
        let factor = ParentFieldFactor::new("parent_id", "model_id");
        let expected = FactorError::missing_parent_field("model_id");

        assert_eq!(
            resolve(&factor, Some(&json!({"model_id": {"nested": 1}}))).unwrap_err(),
            expected
        );
        assert_eq!(
            resolve(&factor, Some(&json!({"model_id": null}))).unwrap_err(),
            expected
        );
        assert_eq!(resolve(&factor, Some(&json!([1, 2]))).unwrap_err(), expected);
    }
}

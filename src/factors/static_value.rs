use crate::cache::{BasicFactor, FactorError};

/// A factor with a value fixed at construction, e.g. a deployment scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticFactor {
    name: String,
    value: String,
}

impl StaticFactor {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl BasicFactor for StaticFactor {
    fn factor_name(&self) -> Result<String, FactorError> {
        Ok(self.name.clone())
    }

    fn factor_value(&self) -> Result<String, FactorError> {
        Ok(self.value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_configured_pair() {
        let factor = StaticFactor::new("scope", "website_1");
        assert_eq!(factor.factor_name().unwrap(), "scope");
        assert_eq!(factor.factor_value().unwrap(), "website_1");
    }
}

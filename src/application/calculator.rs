//! Assembles a calculator from command-line settings.

use crate::cache::{FactorRegistry, KeyCalculator, ResolverContext, StaticContextFactory};
use crate::config::FactorSettings;
use crate::factors::{ContextAttributeFactor, ParentFieldFactor, StaticFactor};

/// Build a registry holding one provider per configured factor.
///
/// Factors are registered under their factor name.
pub fn build_registry(settings: &FactorSettings) -> FactorRegistry<ResolverContext> {
    let mut registry = FactorRegistry::new();

    for (name, value) in &settings.static_values {
        registry = registry.with_basic(name.as_str(), StaticFactor::new(name, value));
    }
    for (name, attribute) in &settings.context_attributes {
        registry = registry.with_parent_dependent(
            name.as_str(),
            ContextAttributeFactor::new(name, attribute),
        );
    }
    for (name, field) in &settings.parent_fields {
        registry =
            registry.with_parent_dependent(name.as_str(), ParentFieldFactor::new(name, field));
    }

    registry
}

/// Build a calculator whose context carries the configured attributes.
pub fn build_calculator(settings: &FactorSettings) -> KeyCalculator<StaticContextFactory> {
    let context: ResolverContext = settings.context.iter().collect();
    KeyCalculator::new(build_registry(settings), StaticContextFactory::new(context))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::cache::ResolverCacheKey;

    fn settings() -> FactorSettings {
        let mut settings = FactorSettings::default();
        settings
            .static_values
            .insert("atest".to_string(), "a_testValue".to_string());
        settings
            .context
            .insert("currency_code".to_string(), "eur".to_string());
        settings
            .context_attributes
            .insert("currency".to_string(), "currency_code".to_string());
        settings
            .parent_fields
            .insert("parent".to_string(), "object_id".to_string());
        settings
    }

    #[test]
    fn registers_every_configured_factor() {
        let registry = build_registry(&settings());
        assert_eq!(registry.len(), 3);
        assert!(!registry.get("atest").expect("static").is_parent_dependent());
        assert!(registry.get("currency").expect("context").is_parent_dependent());
        assert!(registry.get("parent").expect("parent").is_parent_dependent());
    }

    #[test]
    fn calculator_combines_all_factor_kinds() {
        let calculator = build_calculator(&settings());
        let key = calculator.calculate_cache_key(Some(&json!({"object_id": 123})));

        assert_eq!(
            key,
            Some(ResolverCacheKey::from_canonical("A_TESTVALUE|EUR|123"))
        );
    }

    #[test]
    fn empty_settings_yield_no_key() {
        let calculator = build_calculator(&FactorSettings::default());
        assert!(calculator.calculate_cache_key(None).is_none());
    }
}

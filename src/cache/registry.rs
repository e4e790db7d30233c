//! Factor provider registry.
//!
//! A plain mapping from registry name to provider, handed to the calculator at
//! construction. Registry names only identify entries; the factor name each
//! provider reports decides ordering in the key.

use std::collections::HashMap;
use std::collections::hash_map::Iter;

use super::factor::{BasicFactor, KeyFactorProvider, ParentDependentFactor};

pub struct FactorRegistry<C> {
    providers: HashMap<String, KeyFactorProvider<C>>,
}

impl<C> FactorRegistry<C> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Insert a provider, returning the one previously stored under `name`.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        provider: KeyFactorProvider<C>,
    ) -> Option<KeyFactorProvider<C>> {
        self.providers.insert(name.into(), provider)
    }

    pub fn with(mut self, name: impl Into<String>, provider: KeyFactorProvider<C>) -> Self {
        self.insert(name, provider);
        self
    }

    pub fn with_basic(self, name: impl Into<String>, factor: impl BasicFactor + 'static) -> Self {
        self.with(name, KeyFactorProvider::basic(factor))
    }

    pub fn with_parent_dependent(
        self,
        name: impl Into<String>,
        factor: impl ParentDependentFactor<C> + 'static,
    ) -> Self {
        self.with(name, KeyFactorProvider::parent_dependent(factor))
    }

    pub fn get(&self, name: &str) -> Option<&KeyFactorProvider<C>> {
        self.providers.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<KeyFactorProvider<C>> {
        self.providers.remove(name)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, String, KeyFactorProvider<C>> {
        self.providers.iter()
    }

    pub fn providers(&self) -> impl Iterator<Item = &KeyFactorProvider<C>> {
        self.providers.values()
    }
}

impl<C> Default for FactorRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for FactorRegistry<C> {
    fn clone(&self) -> Self {
        Self {
            providers: self.providers.clone(),
        }
    }
}

impl<C> std::fmt::Debug for FactorRegistry<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.providers.iter()).finish()
    }
}

impl<C> From<HashMap<String, KeyFactorProvider<C>>> for FactorRegistry<C> {
    fn from(providers: HashMap<String, KeyFactorProvider<C>>) -> Self {
        Self { providers }
    }
}

impl<C, K> FromIterator<(K, KeyFactorProvider<C>)> for FactorRegistry<C>
where
    K: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, KeyFactorProvider<C>)>>(iter: I) -> Self {
        Self {
            providers: iter
                .into_iter()
                .map(|(name, provider)| (name.into(), provider))
                .collect(),
        }
    }
}

impl<'a, C> IntoIterator for &'a FactorRegistry<C> {
    type Item = (&'a String, &'a KeyFactorProvider<C>);
    type IntoIter = Iter<'a, String, KeyFactorProvider<C>>;

    fn into_iter(self) -> Self::IntoIter {
        self.providers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::factor::FactorError;

    struct Named(&'static str);

    impl BasicFactor for Named {
        fn factor_name(&self) -> Result<String, FactorError> {
            Ok(self.0.to_string())
        }

        fn factor_value(&self) -> Result<String, FactorError> {
            Ok(format!("{}_value", self.0))
        }
    }

    #[test]
    fn insert_and_lookup() {
        let mut registry = FactorRegistry::<()>::new();
        assert!(registry.is_empty());

        assert!(registry.insert("store", KeyFactorProvider::basic(Named("store"))).is_none());
        assert_eq!(registry.len(), 1);
        assert!(registry.get("store").is_some());
        assert!(registry.get("currency").is_none());
    }

    #[test]
    fn reinserting_a_name_replaces_the_provider() {
        let mut registry = FactorRegistry::<()>::new().with_basic("store", Named("store"));
        let previous = registry.insert("store", KeyFactorProvider::basic(Named("other")));

        assert!(previous.is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn collects_from_pairs() {
        let registry: FactorRegistry<()> = [
            ("a", KeyFactorProvider::basic(Named("a"))),
            ("b", KeyFactorProvider::basic(Named("b"))),
        ]
        .into_iter()
        .collect();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.providers().count(), 2);

        let mut names: Vec<_> = registry.iter().map(|(name, _)| name.as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn remove_drops_the_entry() {
        let mut registry = FactorRegistry::<()>::new().with_basic("store", Named("store"));
        assert!(registry.remove("store").is_some());
        assert!(registry.is_empty());
    }
}

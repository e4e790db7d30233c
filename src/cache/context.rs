//! Context collaborators.
//!
//! The calculator treats the context as opaque. It asks a [`ContextFactory`]
//! for one value per calculation and hands it to parent-dependent factors.

use std::collections::BTreeMap;

/// Produces the ambient context for one key calculation.
pub trait ContextFactory: Send + Sync {
    type Context;

    fn get(&self) -> Self::Context;
}

impl<C, F> ContextFactory for F
where
    F: Fn() -> C + Send + Sync,
{
    type Context = C;

    fn get(&self) -> C {
        self()
    }
}

/// Request-scoped attributes such as store code, currency or customer group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolverContext {
    attributes: BTreeMap<String, String>,
}

impl ResolverContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ResolverContext
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            attributes: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

/// Hands out a clone of a fixed context on every call.
#[derive(Debug, Clone, Default)]
pub struct StaticContextFactory {
    context: ResolverContext,
}

impl StaticContextFactory {
    pub fn new(context: ResolverContext) -> Self {
        Self { context }
    }
}

impl ContextFactory for StaticContextFactory {
    type Context = ResolverContext;

    fn get(&self) -> ResolverContext {
        self.context.clone()
    }
}

//! Built-in key factor providers.
//!
//! - [`StaticFactor`]: a fixed name/value pair.
//! - [`ContextAttributeFactor`]: reads an attribute of the [`ResolverContext`].
//! - [`ParentFieldFactor`]: reads a field of the parent resolver's result.
//!
//! [`ResolverContext`]: crate::cache::ResolverContext

mod context_attribute;
mod parent_field;
mod static_value;

pub use context_attribute::ContextAttributeFactor;
pub use parent_field::ParentFieldFactor;
pub use static_value::StaticFactor;

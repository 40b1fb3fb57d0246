//! Shared domain constants

/// Separator between a resource namespace and a logical key in the
/// physical key written to a provider.
pub const NAMESPACE_SEPARATOR: &str = ":";

/// Separator between a tag kind and its value in the canonical
/// `kind:value` rendering.
pub const TAG_SEPARATOR: &str = ":";

/// Separator between tags in the canonical rendering of a tag set.
pub const TAG_SET_SEPARATOR: &str = ",";

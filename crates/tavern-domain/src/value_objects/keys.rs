//! Namespace-qualified cache keys
//!
//! Every logical key is scoped by a resource namespace before it reaches
//! a provider, so two namespaces can never alias the same physical key.

use crate::constants::NAMESPACE_SEPARATOR;

/// Build the physical key for a logical key under a namespace
pub fn physical_key(namespace: &str, key: &str) -> String {
    format!("{namespace}{NAMESPACE_SEPARATOR}{key}")
}

/// Recover the logical key from a physical key, if it belongs to the
/// given namespace
pub fn logical_key<'a>(namespace: &str, physical: &'a str) -> Option<&'a str> {
    physical
        .strip_prefix(namespace)
        .and_then(|rest| rest.strip_prefix(NAMESPACE_SEPARATOR))
}

//! Runtime context tags
//!
//! A tag is one typed dimension of the runtime context (environment,
//! tenant, runtime kind, locale, ...). Tag sets identify which override
//! candidates apply to a context; their canonical rendering doubles as a
//! stable serialization key.

use crate::constants::{TAG_SEPARATOR, TAG_SET_SEPARATOR};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// One typed context dimension, rendered canonically as `kind:value`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tag {
    /// The dimension this tag belongs to (e.g. `env`, `tenant`)
    pub kind: String,
    /// The dimension's value (e.g. `prod`, `acme`)
    pub value: String,
}

impl Tag {
    /// Create a tag from a kind and value
    pub fn new<K: Into<String>, V: Into<String>>(kind: K, value: V) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }

    /// Parse the canonical `kind:value` rendering
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.split_once(TAG_SEPARATOR) {
            Some((kind, value)) if !kind.is_empty() && !value.is_empty() => {
                Ok(Self::new(kind, value))
            }
            _ => Err(Error::invalid_argument(format!(
                "invalid tag '{raw}': expected 'kind{TAG_SEPARATOR}value'"
            ))),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.kind, TAG_SEPARATOR, self.value)
    }
}

impl TryFrom<String> for Tag {
    type Error = Error;

    fn try_from(raw: String) -> Result<Self> {
        Tag::parse(&raw)
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        tag.to_string()
    }
}

/// An ordered set of tags with a canonical rendering.
///
/// Ordering makes equality, subset checks and the serialized key
/// independent of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct TagSet {
    tags: BTreeSet<Tag>,
}

impl TagSet {
    /// The empty tag set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a list of `kind:value` strings
    pub fn parse_all(raw: &[String]) -> Result<Self> {
        raw.iter().map(|tag| Tag::parse(tag)).collect()
    }

    /// Add a tag to the set
    pub fn insert(&mut self, tag: Tag) {
        self.tags.insert(tag);
    }

    /// True iff the set contains the tag
    pub fn contains(&self, tag: &Tag) -> bool {
        self.tags.contains(tag)
    }

    /// True iff every tag in this set is present in `other`
    pub fn is_subset(&self, other: &TagSet) -> bool {
        self.tags.is_subset(&other.tags)
    }

    /// Number of tags in the set
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// True iff the set holds no tags
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Iterate the tags in canonical order
    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter()
    }

    /// Canonical serialization key: sorted tags joined by a comma.
    /// Identical sets always produce identical keys.
    pub fn serialize_key(&self) -> String {
        self.tags
            .iter()
            .map(Tag::to_string)
            .collect::<Vec<_>>()
            .join(TAG_SET_SEPARATOR)
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize_key())
    }
}

impl FromIterator<Tag> for TagSet {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        Self {
            tags: iter.into_iter().collect(),
        }
    }
}

impl TryFrom<Vec<String>> for TagSet {
    type Error = Error;

    fn try_from(raw: Vec<String>) -> Result<Self> {
        Self::parse_all(&raw)
    }
}

impl From<TagSet> for Vec<String> {
    fn from(set: TagSet) -> Self {
        set.tags.iter().map(Tag::to_string).collect()
    }
}

//! Glob targeting
//!
//! Bulk operations address caches and keys by glob patterns instead of
//! enumerating them: a [`GlobMatcher`] selects cache names, a
//! [`CacheSector`] partitions a keyspace for bulk eviction.

use crate::error::{Error, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

/// Matches a candidate string against one or more glob patterns
#[derive(Debug, Clone)]
pub struct GlobMatcher {
    patterns: Vec<String>,
    set: GlobSet,
}

impl GlobMatcher {
    /// Compile a matcher from glob patterns.
    ///
    /// Fails with an invalid-argument error when any pattern does not
    /// compile, naming the offending pattern.
    pub fn new(patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|e| {
                Error::invalid_argument(format!("invalid glob pattern '{pattern}': {e}"))
            })?;
            builder.add(glob);
        }
        let set = builder
            .build()
            .map_err(|e| Error::invalid_argument(format!("failed to compile glob set: {e}")))?;
        Ok(Self {
            patterns: patterns.to_vec(),
            set,
        })
    }

    /// True iff the candidate matches any pattern
    pub fn matches(&self, candidate: &str) -> bool {
        self.set.is_match(candidate)
    }

    /// The source patterns this matcher was compiled from
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

/// A glob-defined partition of a cache's keyspace.
///
/// Sector patterns are matched against physical keys. The sector is
/// `Clone` so in-process providers can move it into invalidation
/// closures.
#[derive(Debug, Clone)]
pub struct CacheSector {
    matcher: GlobMatcher,
}

impl CacheSector {
    /// Build a sector from glob patterns
    pub fn new(patterns: &[String]) -> Result<Self> {
        Ok(Self {
            matcher: GlobMatcher::new(patterns)?,
        })
    }

    /// True iff the physical key falls inside this sector
    pub fn matches(&self, physical_key: &str) -> bool {
        self.matcher.matches(physical_key)
    }

    /// The glob patterns defining this sector
    pub fn patterns(&self) -> &[String] {
        self.matcher.patterns()
    }
}

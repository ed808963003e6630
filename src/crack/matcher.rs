//! Target matcher - check if a candidate hashes to the target digest.

use crate::hash::{sha256, Digest};

/// Compares candidate hashes against one target digest
///
/// Holds no mutable state, so a single instance is shared by every consumer.
#[derive(Debug, Clone, Copy)]
pub struct Matcher {
    target: Digest,
}

impl Matcher {
    /// Create a matcher for a target digest
    pub fn new(target: Digest) -> Self {
        Self { target }
    }

    /// Check whether a candidate hashes to the target
    pub fn matches(&self, candidate: &[u8]) -> bool {
        sha256(candidate) == self.target
    }

    /// Hash candidates in order, stopping at the first match
    ///
    /// Returns the index and bytes of the matching candidate. Candidates after
    /// it are never hashed.
    pub fn find<'a>(&self, candidates: &'a [Vec<u8>]) -> Option<(usize, &'a [u8])> {
        candidates
            .iter()
            .enumerate()
            .find(|(_, candidate)| self.matches(candidate))
            .map(|(index, candidate)| (index, candidate.as_slice()))
    }

    /// The target digest
    pub fn target(&self) -> &Digest {
        &self.target
    }
}

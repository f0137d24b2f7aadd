//! Cache Key Module
//!
//! Keys must be hashable and must be able to report whether they are blank.

use std::hash::Hash;
use std::sync::Arc;

// == Cache Key ==
/// A type usable as an eviction cache key.
///
/// Blank keys (empty or whitespace-only strings) are rejected by every
/// mutating or counted cache operation.
pub trait CacheKey: Hash + Eq {
    /// Whether this key is blank and therefore invalid.
    fn is_blank(&self) -> bool {
        false
    }
}

impl CacheKey for str {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl CacheKey for String {
    fn is_blank(&self) -> bool {
        self.as_str().is_blank()
    }
}

impl CacheKey for Arc<str> {
    fn is_blank(&self) -> bool {
        self.as_ref().is_blank()
    }
}

impl CacheKey for Box<str> {
    fn is_blank(&self) -> bool {
        self.as_ref().is_blank()
    }
}

impl CacheKey for &'static str {
    fn is_blank(&self) -> bool {
        (**self).is_blank()
    }
}

impl CacheKey for u32 {}
impl CacheKey for u64 {}
impl CacheKey for usize {}
impl CacheKey for i64 {}

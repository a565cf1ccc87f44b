//! Condition parsing cache - shared trees keyed by condition text

use std::sync::Arc;

use crate::condition::ast::ConditionTree;
use crate::condition::evaluator::{check, FieldLookup};
use crate::condition::parser;
use crate::error::Result;
use ahash::AHashMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;

/// Distinct condition texts kept before the cache starts over
pub const MAX_CACHED_CONDITIONS: usize = 4096;

type TreeMap = AHashMap<String, Arc<ConditionTree>>;

/// Global condition cache with fast hashing (ahash)
static CONDITION_CACHE: Lazy<RwLock<TreeMap>> = Lazy::new(|| {
    let map = AHashMap::with_capacity(256);
    RwLock::new(map)
});

/// Get or parse a condition string, sharing the tree between identical rules
#[inline]
pub fn get_or_parse(condition: &str) -> Result<Arc<ConditionTree>> {
    // Fast path: check read lock first
    {
        let cache = CONDITION_CACHE.read();
        if let Some(tree) = cache.get(condition) {
            return Ok(Arc::clone(tree));
        }
    }

    // Slow path: parse and cache; failures are not cached
    let tree = Arc::new(parser::parse(condition)?);
    log::trace!("caching condition {:?}", condition);

    {
        let mut cache = CONDITION_CACHE.write();
        insert_bounded(&mut cache, condition, Arc::clone(&tree), MAX_CACHED_CONDITIONS);
    }

    Ok(tree)
}

/// Insert, dropping every entry first once `limit` texts are held.
/// Rules keep their own `Arc`, so only later lookups pay for a reparse.
fn insert_bounded(cache: &mut TreeMap, condition: &str, tree: Arc<ConditionTree>, limit: usize) {
    if cache.len() >= limit && !cache.contains_key(condition) {
        log::debug!("condition cache reached {} entries, clearing", cache.len());
        cache.clear();
    }
    cache.insert(condition.to_string(), tree);
}

/// Check a condition against a record, using the cached tree.
///
/// An empty (or blank) condition places no restriction and is always true.
#[inline]
pub fn check_condition<L: FieldLookup + ?Sized>(condition: &str, lookup: &L) -> Result<bool> {
    if condition.trim().is_empty() {
        return Ok(true);
    }

    let tree = get_or_parse(condition)?;
    Ok(check(&tree, lookup))
}

/// Clear the condition cache (useful for testing)
pub fn clear_cache() {
    let mut cache = CONDITION_CACHE.write();
    cache.clear();
}

/// Get cache statistics
pub fn cache_size() -> usize {
    let cache = CONDITION_CACHE.read();
    cache.len()
}

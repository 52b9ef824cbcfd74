//! Optimized collection types for metaui.
//!
//! Re-exports of hash collections using AHash. Ordered collections come from
//! `indexmap` in the crates that need insertion order.

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};

/// Type alias for the standard HashMap with AHash for better performance.
pub type AHashMap<K, V> = ahash::AHashMap<K, V>;

/// Type alias for the standard HashSet with AHash for better performance.
pub type AHashSet<T> = ahash::AHashSet<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashmap_ahash() {
        let mut map = HashMap::new();
        map.insert("ORDER", 3);
        assert_eq!(map.get("ORDER"), Some(&3));
    }

    #[test]
    fn test_hashset_ahash() {
        let mut set = HashSet::new();
        assert!(set.insert("CUSTOMER__NAME"));
        assert!(!set.insert("CUSTOMER__NAME"));
    }
}

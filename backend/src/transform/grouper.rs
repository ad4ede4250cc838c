//! Stable grouping of flat rows by grouping key.
//!
//! ```text
//! Sheet rows (flat)              →  Groups (one per product)
//! ┌──────────────────────┐         ┌──────────────────────┐
//! │ G1, Shirt, P, 5      │         │ G1: [row 2, row 4]   │
//! │ G2, Mug,   U, 9      │    →    ├──────────────────────┤
//! │ G1, Shirt, M, 3      │         │ G2: [row 3]          │
//! └──────────────────────┘         └──────────────────────┘
//! ```
//!
//! Groups come out in first-seen order and rows keep their input order
//! inside each group. Nothing is dropped or merged.

use std::collections::HashMap;
use std::hash::Hash;

/// Ordered map from key to the items sharing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Groups<K, T> {
    entries: Vec<(K, Vec<T>)>,
}

impl<K, T> Groups<K, T> {
    /// Number of groups.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Groups in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &[T])> {
        self.entries.iter().map(|(k, items)| (k, items.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Items of the group with the given key.
    pub fn get(&self, key: &K) -> Option<&[T]>
    where
        K: PartialEq,
    {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, items)| items.as_slice())
    }
}

impl<K, T> IntoIterator for Groups<K, T> {
    type Item = (K, Vec<T>);
    type IntoIter = std::vec::IntoIter<(K, Vec<T>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Partition `items` by `key_fn`, keeping first-seen group order and input
/// order within each group.
///
/// With `K = Option<_>`, items without a key share the `None` group.
pub fn group_by<T, K, I, F>(items: I, key_fn: F) -> Groups<K, T>
where
    I: IntoIterator<Item = T>,
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    let mut positions: HashMap<K, usize> = HashMap::new();
    let mut entries: Vec<(K, Vec<T>)> = Vec::new();

    for item in items {
        let key = key_fn(&item);
        match positions.get(&key) {
            Some(&idx) => entries[idx].1.push(item),
            None => {
                positions.insert(key.clone(), entries.len());
                entries.push((key, vec![item]));
            }
        }
    }

    Groups { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::{Column, ImportRow};

    #[test]
    fn test_first_seen_order_and_row_order() {
        let items = vec![("G2", 1), ("G1", 2), ("G2", 3), ("G3", 4), ("G1", 5)];
        let groups = group_by(items, |(k, _)| *k);

        let keys: Vec<&str> = groups.keys().copied().collect();
        assert_eq!(keys, vec!["G2", "G1", "G3"]);
        assert_eq!(groups.get(&"G2").unwrap(), &[("G2", 1), ("G2", 3)]);
        assert_eq!(groups.get(&"G1").unwrap(), &[("G1", 2), ("G1", 5)]);
        assert_eq!(groups.get(&"G3").unwrap(), &[("G3", 4)]);
    }

    #[test]
    fn test_nothing_dropped_or_deduplicated() {
        let items = vec![7, 7, 7, 8];
        let groups = group_by(items, |n| *n);
        let total: usize = groups.iter().map(|(_, g)| g.len()).sum();
        assert_eq!(total, 4);
        assert_eq!(groups.get(&7).unwrap(), &[7, 7, 7]);
    }

    #[test]
    fn test_grouping_is_repeatable() {
        let items = vec![("b", 1), ("a", 2), ("b", 3)];
        let first = group_by(items.clone(), |(k, _)| *k);
        let second = group_by(items, |(k, _)| *k);
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_keys_share_a_group() {
        let rows = vec![
            ImportRow::new(2),
            ImportRow::new(3).with(Column::GrouperId, "G1"),
            ImportRow::new(4),
        ];
        let groups = group_by(rows, |r| r.grouping_key());
        assert_eq!(groups.len(), 2);
        let unkeyed: Vec<usize> = groups.get(&None).unwrap().iter().map(|r| r.row_number).collect();
        assert_eq!(unkeyed, vec![2, 4]);
    }

    #[test]
    fn test_empty_input() {
        let groups = group_by(Vec::<u8>::new(), |n| *n);
        assert!(groups.is_empty());
    }
}

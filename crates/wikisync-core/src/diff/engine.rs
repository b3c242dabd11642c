//! Delta computation engine.

use crate::model::{Delta, Snapshot};
use std::collections::BTreeMap;

/// Entries of `new` whose value differs from, or is absent in, `old`.
fn changed_entries<K, V>(new: &BTreeMap<K, V>, old: &BTreeMap<K, V>) -> BTreeMap<K, V>
where
    K: Ord + Clone,
    V: PartialEq + Clone,
{
    new.iter()
        .filter(|(key, value)| old.get(*key) != Some(*value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Compute the delta between a new snapshot and a baseline.
///
/// Per category, returns exactly the entries whose key exists in `new` with
/// a value not equal to the value for that key in `old`.
pub fn compute_delta(new: &Snapshot, old: &Snapshot) -> Delta {
    Delta {
        varb: changed_entries(&new.varb, &old.varb),
        varp: changed_entries(&new.varp, &old.varp),
        level: changed_entries(&new.level, &old.level),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changed_value_is_included() {
        let old = Snapshot::empty().with_varp(281, 1);
        let new = Snapshot::empty().with_varp(281, 2);
        let delta = compute_delta(&new, &old);
        assert_eq!(delta.varp.get(&281), Some(&2));
        assert_eq!(delta.len(), 1);
    }

    #[test]
    fn test_unchanged_value_is_excluded() {
        let old = Snapshot::empty().with_varbit(10, 3).with_level("Attack", 40);
        let new = Snapshot::empty().with_varbit(10, 3).with_level("Attack", 41);
        let delta = compute_delta(&new, &old);
        assert!(delta.varb.is_empty());
        assert_eq!(delta.level.get("Attack"), Some(&41));
    }

    #[test]
    fn test_keys_only_in_old_are_dropped() {
        let old = Snapshot::empty().with_varbit(10, 3).with_varbit(11, 4);
        let new = Snapshot::empty().with_varbit(10, 3);
        assert!(compute_delta(&new, &old).is_empty());
    }

    #[test]
    fn test_same_id_in_different_categories_is_independent() {
        let old = Snapshot::empty().with_varbit(5, 1);
        let new = Snapshot::empty().with_varbit(5, 1).with_varp(5, 1);
        let delta = compute_delta(&new, &old);
        assert!(delta.varb.is_empty());
        assert_eq!(delta.varp.get(&5), Some(&1));
    }
}

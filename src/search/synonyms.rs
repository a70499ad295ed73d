//! Synonym Table
//!
//! Bidirectional word equivalence classes for the aligner. A base word and
//! its synonyms form one class; two tokens are equivalent when they sit in
//! the same class. The table is replaceable at runtime through the admin
//! API.

use std::collections::{BTreeMap, HashMap};

/// Lowercased equivalence classes with an O(1) membership index.
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    /// Normalized registration view, kept for `get_synonyms`.
    map: BTreeMap<String, Vec<String>>,
    /// token → class id. A token registered under several bases belongs to
    /// the last class that claimed it.
    index: HashMap<String, usize>,
}

impl SynonymTable {
    pub fn from_map(map: BTreeMap<String, Vec<String>>) -> Self {
        let mut table = Self::default();
        table.replace(map);
        table
    }

    /// Replace the whole table. Bases and members are lowercased and
    /// deduplicated; classes are indexed in sorted base order.
    pub fn replace(&mut self, map: BTreeMap<String, Vec<String>>) {
        let mut normalized: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (base, members) in map {
            let base = base.to_lowercase();
            let mut seen: Vec<String> = Vec::with_capacity(members.len());
            for member in members {
                let member = member.to_lowercase();
                if member != base && !seen.contains(&member) {
                    seen.push(member);
                }
            }
            normalized.insert(base, seen);
        }

        let mut index = HashMap::new();
        for (class_id, (base, members)) in normalized.iter().enumerate() {
            index.insert(base.clone(), class_id);
            for member in members {
                index.insert(member.clone(), class_id);
            }
        }

        self.map = normalized;
        self.index = index;
    }

    /// Whether two lowercased tokens belong to the same equivalence class.
    pub fn same_class(&self, a: &str, b: &str) -> bool {
        match (self.index.get(a), self.index.get(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    /// The normalized registration view.
    pub fn to_map(&self) -> BTreeMap<String, Vec<String>> {
        self.map.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, &[&str])]) -> SynonymTable {
        let map = entries
            .iter()
            .map(|(base, members)| {
                (
                    base.to_string(),
                    members.iter().map(|m| m.to_string()).collect(),
                )
            })
            .collect();
        SynonymTable::from_map(map)
    }

    #[test]
    fn class_membership_is_symmetric() {
        let t = table(&[("resto", &["restaurant", "brasserie"])]);
        for a in ["resto", "restaurant", "brasserie"] {
            for b in ["resto", "restaurant", "brasserie"] {
                assert!(t.same_class(a, b), "{a} / {b} should be equivalent");
            }
        }
    }

    #[test]
    fn distinct_classes_do_not_mix() {
        let t = table(&[("resto", &["restaurant"]), ("bar", &["pub"])]);
        assert!(!t.same_class("resto", "bar"));
        assert!(!t.same_class("restaurant", "pub"));
        assert!(!t.same_class("resto", "inconnu"));
        assert!(!t.same_class("inconnu", "inconnu"));
    }

    #[test]
    fn registration_lowercases_and_deduplicates() {
        let t = table(&[("Resto", &["RESTAURANT", "restaurant", "Resto"])]);
        assert!(t.same_class("resto", "restaurant"));
        assert_eq!(
            t.to_map().get("resto"),
            Some(&vec!["restaurant".to_string()])
        );
    }

    #[test]
    fn shared_member_goes_to_the_last_class() {
        // Sorted base order: "bistrot" then "cafe"; "troquet" ends up with
        // "cafe".
        let t = table(&[("bistrot", &["troquet"]), ("cafe", &["troquet"])]);
        assert!(t.same_class("cafe", "troquet"));
        assert!(!t.same_class("bistrot", "troquet"));
    }

    #[test]
    fn replace_swaps_the_table() {
        let mut t = table(&[("resto", &["restaurant"])]);
        t.replace(BTreeMap::new());
        assert!(t.is_empty());
        assert!(!t.same_class("resto", "restaurant"));
    }
}

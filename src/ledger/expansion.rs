use std::collections::BTreeSet;

/// Tax groups currently expanded in the detail view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionSet {
    expanded: BTreeSet<String>,
}

impl ExpansionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new set with `key` flipped; `self` is left untouched.
    pub fn toggle(&self, key: &str) -> Self {
        let mut expanded = self.expanded.clone();
        if !expanded.remove(key) {
            expanded.insert(key.to_string());
        }
        Self { expanded }
    }

    pub fn is_expanded(&self, key: &str) -> bool {
        self.expanded.contains(key)
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }
}

//! Hash collections used for the index lookups of the numeric hot loops.

pub use rustc_hash::{FxHashMap, FxHashSet};

/// Maps names to dense indices in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct NameIndex<'a> {
    names: Vec<&'a str>,
    indices: FxHashMap<&'a str, usize>,
}

impl<'a> NameIndex<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index of `name`, inserting it if unseen.
    pub fn intern(&mut self, name: &'a str) -> usize {
        if let Some(&index) = self.indices.get(name) {
            return index;
        }
        let index = self.names.len();
        self.names.push(name);
        self.indices.insert(name, index);
        index
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    pub fn name(&self, index: usize) -> &'a str {
        self.names[index]
    }

    pub fn names(&self) -> &[&'a str] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

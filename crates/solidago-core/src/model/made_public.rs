//! Public/private status of `(user, entity)` pairs.

use std::collections::BTreeMap;

/// Which `(user, entity)` judgments are public.
///
/// Absent pairs are private, unless the table is in all-public mode.
/// The privacy penalty only ever scales weights, never raw values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MadePublic {
    all_public: bool,
    flags: BTreeMap<(String, String), bool>,
}

impl MadePublic {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every pair is treated as public.
    pub fn all_public() -> Self {
        Self {
            all_public: true,
            flags: BTreeMap::new(),
        }
    }

    pub fn is_all_public(&self) -> bool {
        self.all_public
    }

    pub fn set(&mut self, user: &str, entity: &str, public: bool) {
        self.flags
            .insert((user.to_string(), entity.to_string()), public);
    }

    pub fn is_public(&self, user: &str, entity: &str) -> bool {
        self.all_public
            || self
                .flags
                .get(&(user.to_string(), entity.to_string()))
                .copied()
                .unwrap_or(false)
    }

    /// 1 for public pairs, `privacy_penalty` for private ones.
    pub fn penalty(&self, privacy_penalty: f64, user: &str, entity: &str) -> f64 {
        if self.is_public(user, entity) {
            1.0
        } else {
            privacy_penalty
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, bool)> {
        self.flags
            .iter()
            .map(|((user, entity), public)| (user.as_str(), entity.as_str(), *public))
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

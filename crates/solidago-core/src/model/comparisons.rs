//! Pairwise comparisons between entities.
//!
//! Positive values mean `right` is preferred over `left`. Comparisons are
//! antisymmetric: `(left, right, value)` and `(right, left, -value)` are the
//! same judgment, so every comparison is stored under a canonical
//! orientation with the lexicographically smaller entity on the left.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::errors::DataError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub value: f64,
    pub max: f64,
}

impl Comparison {
    /// The value rescaled to `[-1, 1]`.
    pub fn normalized(&self) -> f64 {
        self.value / self.max
    }

    pub fn reversed(&self) -> Self {
        Self {
            value: -self.value,
            max: self.max,
        }
    }
}

/// A comparison with its key, as yielded by the table iterators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonRecord<'a> {
    pub user: &'a str,
    pub criterion: &'a str,
    pub left: &'a str,
    pub right: &'a str,
    pub comparison: Comparison,
}

type Key = (String, String, String, String);

/// Comparisons keyed by `(criterion, user, left, right)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Comparisons {
    entries: BTreeMap<Key, Comparison>,
}

impl Comparisons {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and inserts a comparison.
    ///
    /// The value is clipped into `[-max, max]`. A duplicate of an existing
    /// comparison (in either orientation) replaces it, unless it disagrees
    /// on `max`.
    pub fn insert(
        &mut self,
        user: &str,
        criterion: &str,
        left: &str,
        right: &str,
        value: f64,
        max: f64,
    ) -> Result<(), DataError> {
        if left == right {
            return Err(DataError::SelfComparison {
                user: user.to_string(),
                criterion: criterion.to_string(),
                entity: left.to_string(),
            });
        }
        if !max.is_finite() || max <= 0.0 {
            return Err(DataError::invalid(
                "comparisons",
                "max",
                format!("{user} ({left}, {right}) on {criterion}: max must be > 0, got {max}"),
            ));
        }
        if !value.is_finite() {
            return Err(DataError::invalid(
                "comparisons",
                "value",
                format!("{user} ({left}, {right}) on {criterion}: value is {value}"),
            ));
        }

        let value = value.clamp(-max, max);
        let (left, right, value) = if left <= right {
            (left, right, value)
        } else {
            (right, left, -value)
        };
        let key = (
            criterion.to_string(),
            user.to_string(),
            left.to_string(),
            right.to_string(),
        );
        if let Some(previous) = self.entries.get(&key) {
            if previous.max != max {
                return Err(DataError::ConflictingComparison {
                    user: user.to_string(),
                    criterion: criterion.to_string(),
                    left: left.to_string(),
                    right: right.to_string(),
                    previous: previous.max,
                    max,
                });
            }
        }
        self.entries.insert(key, Comparison { value, max });
        Ok(())
    }

    /// The comparison of `left` against `right`, oriented as requested.
    pub fn get(&self, user: &str, criterion: &str, left: &str, right: &str) -> Option<Comparison> {
        let (first, second, reversed) = if left <= right {
            (left, right, false)
        } else {
            (right, left, true)
        };
        let key = (
            criterion.to_string(),
            user.to_string(),
            first.to_string(),
            second.to_string(),
        );
        self.entries
            .get(&key)
            .map(|c| if reversed { c.reversed() } else { *c })
    }

    pub fn iter(&self) -> impl Iterator<Item = ComparisonRecord<'_>> {
        self.entries.iter().map(record)
    }

    pub fn criteria(&self) -> BTreeSet<&str> {
        self.entries.keys().map(|k| k.0.as_str()).collect()
    }

    /// All comparisons on `criterion`, sorted by user.
    pub fn for_criterion<'a>(
        &'a self,
        criterion: &'a str,
    ) -> impl Iterator<Item = ComparisonRecord<'a>> + 'a {
        let start = (
            criterion.to_string(),
            String::new(),
            String::new(),
            String::new(),
        );
        self.entries
            .range(start..)
            .take_while(move |(key, _)| key.0 == criterion)
            .map(record)
    }

    /// Comparisons on `criterion` grouped by user.
    pub fn by_user<'a>(&'a self, criterion: &'a str) -> BTreeMap<&'a str, Vec<ComparisonRecord<'a>>> {
        let mut grouped: BTreeMap<&str, Vec<ComparisonRecord<'_>>> = BTreeMap::new();
        for record in self.for_criterion(criterion) {
            grouped.entry(record.user).or_default().push(record);
        }
        grouped
    }

    /// For each entity compared on `criterion`, the users who compared it.
    pub fn evaluators<'a>(&'a self, criterion: &'a str) -> BTreeMap<&'a str, BTreeSet<&'a str>> {
        let mut evaluators: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for record in self.for_criterion(criterion) {
            evaluators.entry(record.left).or_default().insert(record.user);
            evaluators.entry(record.right).or_default().insert(record.user);
        }
        evaluators
    }

    pub fn users(&self) -> BTreeSet<&str> {
        self.entries.keys().map(|k| k.1.as_str()).collect()
    }

    pub fn entities(&self) -> BTreeSet<&str> {
        self.entries
            .keys()
            .flat_map(|k| [k.2.as_str(), k.3.as_str()])
            .collect()
    }

    /// Keeps only the comparisons on the given criteria.
    pub fn restricted_to(&self, criteria: &BTreeSet<String>) -> Comparisons {
        Comparisons {
            entries: self
                .entries
                .iter()
                .filter(|(key, _)| criteria.contains(&key.0))
                .map(|(key, c)| (key.clone(), *c))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn record<'a>((key, comparison): (&'a Key, &'a Comparison)) -> ComparisonRecord<'a> {
    ComparisonRecord {
        user: &key.1,
        criterion: &key.0,
        left: &key.2,
        right: &key.3,
        comparison: *comparison,
    }
}

//! Voting rights per `(user, entity, criterion)` and their per-entity statistics.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VotingRightRecord<'a> {
    pub user: &'a str,
    pub entity: &'a str,
    pub criterion: &'a str,
    pub voting_right: f64,
}

/// Voting rights keyed by `(criterion, entity, user)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VotingRights {
    entries: BTreeMap<(String, String, String), f64>,
}

impl VotingRights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, user: &str, entity: &str, criterion: &str, voting_right: f64) {
        self.entries.insert(
            (criterion.to_string(), entity.to_string(), user.to_string()),
            voting_right,
        );
    }

    /// Voting right of `user` on `(entity, criterion)`, 0 when absent.
    pub fn get(&self, user: &str, entity: &str, criterion: &str) -> f64 {
        self.entries
            .get(&(criterion.to_string(), entity.to_string(), user.to_string()))
            .copied()
            .unwrap_or(0.0)
    }

    /// Voting rights of all users on `(entity, criterion)`, sorted by user.
    pub fn for_entity<'a>(
        &'a self,
        entity: &'a str,
        criterion: &'a str,
    ) -> impl Iterator<Item = (&'a str, f64)> + 'a {
        let start = (criterion.to_string(), entity.to_string(), String::new());
        self.entries
            .range(start..)
            .take_while(move |(key, _)| key.0 == criterion && key.1 == entity)
            .map(|(key, right)| (key.2.as_str(), *right))
    }

    pub fn iter(&self) -> impl Iterator<Item = VotingRightRecord<'_>> {
        self.entries
            .iter()
            .map(|((criterion, entity, user), right)| VotingRightRecord {
                user,
                entity,
                criterion,
                voting_right: *right,
            })
    }

    pub fn criteria(&self) -> BTreeSet<&str> {
        self.entries.keys().map(|k| k.0.as_str()).collect()
    }

    /// Moves every entry of `other` into `self`.
    pub fn extend(&mut self, other: VotingRights) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Diagnostics of the voting-right allocation for one `(entity, criterion)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VotingStatistic {
    /// Sum of `penalty * trust` over the evaluators.
    pub cumulative_trust: f64,
    /// Trust floor granted to low-trust evaluators.
    pub min_voting_right: f64,
    /// Sum of voting rights in excess of `penalty * trust`.
    pub overtrust: f64,
}

/// Voting statistics keyed by `(criterion, entity)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VotingStatistics {
    entries: BTreeMap<(String, String), VotingStatistic>,
}

impl VotingStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, entity: &str, criterion: &str, statistic: VotingStatistic) {
        self.entries
            .insert((criterion.to_string(), entity.to_string()), statistic);
    }

    pub fn get(&self, entity: &str, criterion: &str) -> Option<VotingStatistic> {
        self.entries
            .get(&(criterion.to_string(), entity.to_string()))
            .copied()
    }

    /// Yields `(entity, criterion, statistic)`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, VotingStatistic)> {
        self.entries
            .iter()
            .map(|((criterion, entity), s)| (entity.as_str(), criterion.as_str(), *s))
    }

    pub fn extend(&mut self, other: VotingStatistics) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Direct assessments of single entities.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::errors::DataError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub value: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssessmentRecord<'a> {
    pub user: &'a str,
    pub criterion: &'a str,
    pub entity: &'a str,
    pub assessment: Assessment,
}

/// Assessments keyed by `(criterion, user, entity)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assessments {
    entries: BTreeMap<(String, String, String), Assessment>,
}

impl Assessments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        user: &str,
        criterion: &str,
        entity: &str,
        assessment: Assessment,
    ) -> Result<(), DataError> {
        if !assessment.value.is_finite() {
            return Err(DataError::invalid(
                "assessments",
                "value",
                format!("{user} on {entity} ({criterion}) is {}", assessment.value),
            ));
        }
        if let (Some(min), Some(max)) = (assessment.min, assessment.max) {
            if min > max {
                return Err(DataError::invalid(
                    "assessments",
                    "min",
                    format!("{user} on {entity} ({criterion}): min {min} > max {max}"),
                ));
            }
        }
        self.entries.insert(
            (criterion.to_string(), user.to_string(), entity.to_string()),
            assessment,
        );
        Ok(())
    }

    pub fn get(&self, user: &str, criterion: &str, entity: &str) -> Option<Assessment> {
        self.entries
            .get(&(criterion.to_string(), user.to_string(), entity.to_string()))
            .copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = AssessmentRecord<'_>> {
        self.entries
            .iter()
            .map(|((criterion, user, entity), assessment)| AssessmentRecord {
                user,
                criterion,
                entity,
                assessment: *assessment,
            })
    }

    pub fn criteria(&self) -> BTreeSet<&str> {
        self.entries.keys().map(|k| k.0.as_str()).collect()
    }

    /// For each entity assessed on `criterion`, the users who assessed it.
    pub fn evaluators<'a>(&'a self, criterion: &'a str) -> BTreeMap<&'a str, BTreeSet<&'a str>> {
        let mut evaluators: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for record in self.iter().filter(|r| r.criterion == criterion) {
            evaluators.entry(record.entity).or_default().insert(record.user);
        }
        evaluators
    }

    pub fn restricted_to(&self, criteria: &BTreeSet<String>) -> Assessments {
        Assessments {
            entries: self
                .entries
                .iter()
                .filter(|(key, _)| criteria.contains(&key.0))
                .map(|(key, a)| (key.clone(), *a))
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

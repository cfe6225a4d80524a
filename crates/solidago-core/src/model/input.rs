//! The immutable input tables of a pipeline run.

use std::collections::BTreeSet;

use super::{Assessments, Comparisons, Entities, MadePublic, Users, Vouches};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineInput {
    pub users: Users,
    pub vouches: Vouches,
    pub entities: Entities,
    pub made_public: MadePublic,
    pub comparisons: Comparisons,
    pub assessments: Assessments,
}

impl PipelineInput {
    /// Criteria that carry at least one judgment.
    pub fn criteria(&self) -> BTreeSet<String> {
        self.comparisons
            .criteria()
            .into_iter()
            .chain(self.assessments.criteria())
            .map(str::to_string)
            .collect()
    }

    /// Registers every user and entity that appears in a judgment or vouch
    /// but is missing from the users and entities tables.
    pub fn register_referenced(&mut self) {
        let mut users: BTreeSet<String> = self
            .comparisons
            .users()
            .into_iter()
            .map(str::to_string)
            .collect();
        for record in self.vouches.iter() {
            users.insert(record.by.to_string());
            users.insert(record.to.to_string());
        }
        for record in self.assessments.iter() {
            users.insert(record.user.to_string());
        }
        for user in &users {
            self.users.ensure(user);
        }

        let entities: BTreeSet<String> = self
            .comparisons
            .entities()
            .into_iter()
            .chain(self.assessments.iter().map(|r| r.entity))
            .map(str::to_string)
            .collect();
        for entity in &entities {
            self.entities.ensure(entity);
        }
    }
}

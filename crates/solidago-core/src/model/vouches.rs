//! Directed, weighted, typed vouches between users.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::DataError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vouch {
    pub weight: f64,
    pub priority: f64,
}

/// A vouch with its key, as yielded by [`Vouches::iter`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VouchRecord<'a> {
    pub by: &'a str,
    pub to: &'a str,
    pub kind: &'a str,
    pub vouch: Vouch,
}

/// Vouches keyed by `(voucher, vouchee, kind)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vouches {
    vouches: BTreeMap<(String, String, String), Vouch>,
}

impl Vouches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a vouch; the last write for a key wins.
    pub fn insert(&mut self, by: &str, to: &str, kind: &str, vouch: Vouch) -> Result<(), DataError> {
        if by == to {
            return Err(DataError::SelfVouch {
                user: by.to_string(),
            });
        }
        if !vouch.weight.is_finite() || vouch.weight < 0.0 {
            return Err(DataError::invalid(
                "vouches",
                "weight",
                format!("vouch {by} -> {to} has weight {}", vouch.weight),
            ));
        }
        self.vouches
            .insert((by.to_string(), to.to_string(), kind.to_string()), vouch);
        Ok(())
    }

    pub fn get(&self, by: &str, to: &str, kind: &str) -> Option<Vouch> {
        self.vouches
            .get(&(by.to_string(), to.to_string(), kind.to_string()))
            .copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = VouchRecord<'_>> {
        self.vouches.iter().map(|((by, to, kind), vouch)| VouchRecord {
            by,
            to,
            kind,
            vouch: *vouch,
        })
    }

    pub fn of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = VouchRecord<'a>> + 'a {
        self.iter().filter(move |record| record.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.vouches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vouches.is_empty()
    }
}

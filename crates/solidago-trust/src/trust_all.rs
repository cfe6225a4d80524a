//! Uniform trust.

use solidago_core::model::{Users, Vouches};

use crate::{TrustOutcome, TrustPropagation};

/// Trusts every user fully, ignoring vouches.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrustAll;

impl TrustPropagation for TrustAll {
    fn propagate(&self, users: &Users, _vouches: &Vouches) -> TrustOutcome {
        let users = users
            .iter()
            .map(|user| user.clone().with_trust(1.0))
            .collect();
        TrustOutcome {
            users,
            iterations: 0,
            converged: true,
        }
    }

    fn name(&self) -> &'static str {
        "trust_all"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solidago_core::model::{User, Vouch};

    #[test]
    fn everyone_is_fully_trusted() {
        let users: Users = [User::new("a", true), User::new("b", false)]
            .into_iter()
            .collect();
        let mut vouches = Vouches::new();
        vouches
            .insert("a", "b", "ProofOfPersonhood", Vouch { weight: 1.0, priority: 0.0 })
            .unwrap();
        let outcome = TrustAll.propagate(&users, &vouches);
        assert!(outcome.users.iter().all(|u| u.trust == Some(1.0)));
    }
}

//! Integration tests for voting-right allocation.

use proptest::prelude::*;

use solidago_core::model::{
    Assessment, Assessments, Comparisons, MadePublic, User, Users,
};
use solidago_primitives::dichotomy_solve;
use solidago_voting::affine_overtrust::{min_voting_right, overtrust};
use solidago_voting::{AffineOvertrust, IsTrust, VotingRightsAssignment};

fn evaluator_strategy() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec(
        (0.0f64..=1.0, prop_oneof![Just(0.5f64), Just(1.0f64)]),
        1..40,
    )
}

fn small_population() -> (Users, MadePublic, Comparisons, Assessments) {
    let users: Users = [
        User::new("alice", true).with_trust(0.8),
        User::new("bob", false).with_trust(0.4),
        User::new("carol", false).with_trust(0.0),
    ]
    .into_iter()
    .collect();
    let mut made_public = MadePublic::new();
    made_public.set("alice", "e1", true);
    made_public.set("alice", "e2", true);

    let mut comparisons = Comparisons::new();
    comparisons.insert("alice", "default", "e1", "e2", 3.0, 10.0).unwrap();
    comparisons.insert("bob", "default", "e1", "e2", -1.0, 10.0).unwrap();
    let mut assessments = Assessments::new();
    assessments
        .insert("carol", "default", "e1", Assessment { value: 4.0, min: None, max: None })
        .unwrap();
    (users, made_public, comparisons, assessments)
}

#[test]
fn is_trust_applies_privacy_penalty() {
    let (users, made_public, comparisons, assessments) = small_population();
    let outcome = IsTrust::new(0.5)
        .unwrap()
        .assign(&users, &made_public, &comparisons, &assessments);
    let rights = &outcome.voting_rights;
    assert_eq!(rights.get("alice", "e1", "default"), 0.8);
    assert_eq!(rights.get("bob", "e1", "default"), 0.2);
    assert_eq!(rights.get("carol", "e1", "default"), 0.0);
}

#[test]
fn assessors_count_as_evaluators() {
    let (users, made_public, comparisons, assessments) = small_population();
    let outcome = AffineOvertrust::default().assign(&users, &made_public, &comparisons, &assessments);
    // carol only assessed e1, never compared it.
    assert!(outcome.voting_rights.get("carol", "e1", "default") > 0.0);
    assert_eq!(outcome.voting_rights.get("carol", "e2", "default"), 0.0);
    let stat = outcome.statistics.get("e1", "default").unwrap();
    assert!((stat.cumulative_trust - 1.0).abs() < 1e-12);
}

#[test]
fn small_groups_are_lifted_to_full_rights() {
    let (users, made_public, comparisons, assessments) = small_population();
    let outcome = AffineOvertrust::default().assign(&users, &made_public, &comparisons, &assessments);
    // Budget 2.0 + 0.1 * C covers lifting three users at most.
    assert_eq!(outcome.voting_rights.get("alice", "e1", "default"), 1.0);
    assert_eq!(outcome.voting_rights.get("bob", "e1", "default"), 0.5);
    assert_eq!(outcome.voting_rights.get("carol", "e1", "default"), 0.5);
}

proptest! {
    #[test]
    fn rights_are_bounded(evaluators in evaluator_strategy()) {
        let rule = AffineOvertrust::default();
        let (rights, stat) = rule.entity_voting_rights(&evaluators);
        let total: f64 = rights.iter().sum();
        let penalties: f64 = evaluators.iter().map(|&(_, p)| p).sum();
        let budget = 2.0 + 0.1 * stat.cumulative_trust;
        for (&(_, p), &right) in evaluators.iter().zip(&rights) {
            prop_assert!(right >= 0.0);
            prop_assert!(right <= p + 1e-12);
        }
        prop_assert!(total <= penalties + 1e-9);
        prop_assert!(total <= stat.cumulative_trust + budget + 1e-9);
    }

    #[test]
    fn rights_are_monotone_in_trust(evaluators in evaluator_strategy()) {
        let rule = AffineOvertrust::default();
        let (rights, _) = rule.entity_voting_rights(&evaluators);
        for i in 0..evaluators.len() {
            for j in 0..evaluators.len() {
                let (ti, pi) = evaluators[i];
                let (tj, pj) = evaluators[j];
                if pi == pj && ti <= tj {
                    prop_assert!(rights[i] <= rights[j] + 1e-12);
                }
            }
        }
    }

    #[test]
    fn floor_matches_bisection(evaluators in evaluator_strategy(), budget in 0.1f64..5.0) {
        let floor = min_voting_right(&evaluators, budget);
        if floor < 1.0 {
            let solved = dichotomy_solve(|m| overtrust(&evaluators, m), budget, 0.0, 1.0, 1e-12);
            prop_assert!((floor - solved).abs() < 1e-9, "{} vs {}", floor, solved);
        } else {
            prop_assert!(overtrust(&evaluators, 1.0) <= budget);
        }
    }
}

//! Integration tests for trust propagation.

use std::collections::BTreeMap;

use proptest::prelude::*;
use serde::Deserialize;
use test_fixtures::load_fixture;

use solidago_core::model::{User, Users, Vouch, Vouches};
use solidago_trust::{LipschiTrust, TrustAll, TrustPropagation};

#[derive(Deserialize)]
struct FixtureUser {
    name: String,
    is_pretrusted: bool,
}

#[derive(Deserialize)]
struct FixtureVouch {
    by: String,
    to: String,
    weight: f64,
}

#[derive(Deserialize)]
struct Parameters {
    pretrust_value: f64,
    decay: f64,
    sink_vouch: f64,
    error: f64,
}

#[derive(Deserialize)]
struct TrustScenario {
    users: Vec<FixtureUser>,
    vouches: Vec<FixtureVouch>,
    parameters: Parameters,
    expected_trust: BTreeMap<String, f64>,
}

fn load_chain() -> (Users, Vouches, LipschiTrust, BTreeMap<String, f64>) {
    let scenario: TrustScenario = load_fixture("trust/chain.json");
    let users = scenario
        .users
        .iter()
        .map(|u| User::new(&u.name, u.is_pretrusted))
        .collect();
    let mut vouches = Vouches::new();
    for v in &scenario.vouches {
        vouches
            .insert(&v.by, &v.to, "ProofOfPersonhood", Vouch { weight: v.weight, priority: 0.0 })
            .unwrap();
    }
    let p = &scenario.parameters;
    let trust = LipschiTrust::new(p.pretrust_value, p.decay, p.sink_vouch, p.error).unwrap();
    (users, vouches, trust, scenario.expected_trust)
}

#[test]
fn chain_scenario_matches_expected_trusts() {
    let (users, vouches, lipschitrust, expected) = load_chain();
    let outcome = lipschitrust.propagate(&users, &vouches);
    assert!(outcome.converged);
    for (name, trust) in expected {
        let actual = outcome.users.trust(&name);
        assert!((actual - trust).abs() < 1e-6, "{name}: {actual} vs {trust}");
    }
    assert!(outcome.users.trust("4") > 0.0);
    assert!(outcome.users.trust("1") >= 0.8);
}

#[test]
fn trust_all_trusts_the_chain_fully() {
    let (users, vouches, _, _) = load_chain();
    let outcome = TrustAll.propagate(&users, &vouches);
    for user in outcome.users.iter() {
        assert_eq!(user.trust, Some(1.0));
    }
}

fn population() -> impl Strategy<Value = (Vec<bool>, Vec<(usize, usize, f64)>)> {
    (2usize..12).prop_flat_map(|n| {
        (
            prop::collection::vec(any::<bool>(), n),
            prop::collection::vec((0..n, 0..n, 0.0f64..10.0), 0..3 * n),
        )
    })
}

fn build(pretrusted: &[bool], edges: &[(usize, usize, f64)]) -> (Users, Vouches) {
    let users = pretrusted
        .iter()
        .enumerate()
        .map(|(i, p)| User::new(format!("u{i}"), *p))
        .collect();
    let mut vouches = Vouches::new();
    for &(by, to, weight) in edges {
        if by != to {
            vouches
                .insert(
                    &format!("u{by}"),
                    &format!("u{to}"),
                    "ProofOfPersonhood",
                    Vouch { weight, priority: 0.0 },
                )
                .unwrap();
        }
    }
    (users, vouches)
}

proptest! {
    #[test]
    fn trust_stays_in_unit_interval((pretrusted, edges) in population()) {
        let (users, vouches) = build(&pretrusted, &edges);
        let lipschitrust = LipschiTrust::default();
        let outcome = lipschitrust.propagate(&users, &vouches);
        prop_assert!(outcome.converged);
        for user in outcome.users.iter() {
            let trust = user.trust.unwrap();
            prop_assert!((0.0..=1.0).contains(&trust));
            if user.is_pretrusted {
                prop_assert!(trust >= lipschitrust.pretrust_value() * (1.0 - 1e-9));
            }
        }
    }

    #[test]
    fn more_pretrust_never_lowers_trust(
        (pretrusted, edges) in population(),
        promoted in any::<prop::sample::Index>(),
    ) {
        let (users, vouches) = build(&pretrusted, &edges);
        let mut promoted_flags = pretrusted.clone();
        promoted_flags[promoted.index(pretrusted.len())] = true;
        let (promoted_users, _) = build(&promoted_flags, &edges);

        let lipschitrust = LipschiTrust::default();
        let before = lipschitrust.propagate(&users, &vouches).users;
        let after = lipschitrust.propagate(&promoted_users, &vouches).users;
        for name in before.names() {
            prop_assert!(after.trust(name) >= before.trust(name) - 1e-7);
        }
    }
}

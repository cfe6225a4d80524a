//! Property tests for the score algebra and the typed tables.

use proptest::prelude::*;

use solidago_core::model::{Comparisons, MadePublic, User, Users, Vouch, Vouches};
use solidago_core::types::{squash, Scale, Score};

fn score() -> impl Strategy<Value = Score> {
    (-50.0f64..50.0, 0.0f64..5.0, 0.0f64..5.0).prop_map(|(v, l, r)| Score::new(v, l, r))
}

fn finite_f64() -> impl Strategy<Value = f64> {
    use prop::num::f64::{NEGATIVE, NORMAL, POSITIVE, SUBNORMAL, ZERO};
    POSITIVE | NEGATIVE | NORMAL | SUBNORMAL | ZERO
}

proptest! {
    #[test]
    fn product_interval_contains_product_of_values(a in score(), b in score()) {
        let p = a * b;
        prop_assert!(p.left_unc >= 0.0);
        prop_assert!(p.right_unc >= 0.0);
        for x in [a.min(), a.value, a.max()] {
            for y in [b.min(), b.value, b.max()] {
                let xy = x * y;
                prop_assert!(xy >= p.min() - 1e-9 && xy <= p.max() + 1e-9);
            }
        }
    }

    #[test]
    fn negation_is_an_involution(a in score()) {
        prop_assert_eq!(-(-a), a);
    }

    #[test]
    fn squash_is_monotone_and_bounded(x in -1e3f64..1e3, dx in 1e-3f64..10.0) {
        let lo = squash(x, 100.0);
        let hi = squash(x + dx, 100.0);
        prop_assert!(lo < hi);
        prop_assert!(lo.abs() < 100.0 && hi.abs() < 100.0);
    }

    #[test]
    fn squash_is_monotone_over_every_finite_value(
        a in finite_f64(),
        b in finite_f64(),
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let (slo, shi) = (squash(lo, 100.0), squash(hi, 100.0));
        prop_assert!(slo <= shi + 1e-12, "squash({lo}) = {slo} > squash({hi}) = {shi}");
        prop_assert!(slo.abs() <= 100.0 && shi.abs() <= 100.0);
    }

    #[test]
    fn squashed_scores_stay_in_bounds(a in score()) {
        let s = a.squashed(100.0);
        prop_assert!(s.min() > -100.0 - 1e-9);
        prop_assert!(s.max() < 100.0 + 1e-9);
    }

    #[test]
    fn scale_composition_is_sequential_application(
        m1 in 0.1f64..3.0, t1 in -5.0f64..5.0, m2 in 0.1f64..3.0, t2 in -5.0f64..5.0, x in score()
    ) {
        let first = Scale::new(Score::exact(m1), Score::exact(t1));
        let second = Scale::new(Score::exact(m2), Score::exact(t2));
        let composed = first.then(&second).apply(x);
        let sequential = second.apply(first.apply(x));
        prop_assert!((composed.value - sequential.value).abs() < 1e-9);
        prop_assert!((composed.left_unc - sequential.left_unc).abs() < 1e-9);
        prop_assert!((composed.right_unc - sequential.right_unc).abs() < 1e-9);
    }

    #[test]
    fn comparisons_are_antisymmetric(value in -10.0f64..10.0, max in 0.5f64..20.0) {
        let mut forward = Comparisons::new();
        forward.insert("u", "c", "a", "b", value, max).unwrap();
        let mut backward = Comparisons::new();
        backward.insert("u", "c", "b", "a", -value, max).unwrap();
        prop_assert_eq!(forward, backward);
    }
}

#[test]
fn self_vouch_is_rejected() {
    let mut vouches = Vouches::new();
    let vouch = Vouch { weight: 1.0, priority: 0.0 };
    assert!(vouches.insert("a", "a", "ProofOfPersonhood", vouch).is_err());
    assert!(vouches.insert("a", "b", "ProofOfPersonhood", vouch).is_ok());
    assert!(vouches
        .insert("a", "b", "ProofOfPersonhood", Vouch { weight: -1.0, priority: 0.0 })
        .is_err());
}

#[test]
fn private_pairs_are_penalized() {
    let mut made_public = MadePublic::new();
    made_public.set("u", "e", true);
    assert_eq!(made_public.penalty(0.5, "u", "e"), 1.0);
    assert_eq!(made_public.penalty(0.5, "u", "f"), 0.5);
    assert_eq!(MadePublic::all_public().penalty(0.5, "u", "f"), 1.0);
}

#[test]
fn unknown_users_have_zero_trust() {
    let users: Users = [User::new("a", true).with_trust(0.8), User::new("b", false)]
        .into_iter()
        .collect();
    assert_eq!(users.trust("a"), 0.8);
    assert_eq!(users.trust("b"), 0.0);
    assert_eq!(users.trust("z"), 0.0);
    assert!(users.is_pretrusted("a"));
}

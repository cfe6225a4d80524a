//! Integration tests for collaborative scaling.

use std::collections::BTreeMap;

use proptest::prelude::*;

use solidago_core::config::{ScalingConfig, ScalingStep};
use solidago_core::model::{CriterionScores, MadePublic, User, Users};
use solidago_core::Score;
use solidago_scaling::{
    apply_scales, from_config, Mehestan, QuantileShift, Scaling, ScalingCompose, ScalingContext,
    Standardize,
};

fn trusted_users(names: &[&str]) -> Users {
    names
        .iter()
        .map(|name| User::new(*name, true).with_trust(1.0))
        .collect()
}

fn context<'a>(users: &'a Users, made_public: &'a MadePublic) -> ScalingContext<'a> {
    ScalingContext {
        criterion: "default",
        users,
        made_public,
        privacy_penalty: 0.5,
    }
}

fn user_scores(pairs: &[(&str, f64)], uncertainty: f64) -> BTreeMap<String, Score> {
    pairs
        .iter()
        .map(|(entity, value)| (entity.to_string(), Score::symmetric(*value, uncertainty)))
        .collect()
}

/// Eleven users agreeing on `x_e = e - 7`, one rating `2x + 3`, and a
/// casual user rating five entities `3x - 2`.
fn calibration_scenario() -> (CriterionScores, Vec<String>) {
    let truth: Vec<(String, f64)> = (0..15).map(|k| (format!("e{k:02}"), k as f64 - 7.0)).collect();
    let rated = |f: &dyn Fn(f64) -> f64, n: usize| -> BTreeMap<String, Score> {
        truth
            .iter()
            .take(n)
            .map(|(e, x)| (e.clone(), Score::symmetric(f(*x), 0.01)))
            .collect()
    };
    let mut scores = CriterionScores::new();
    let mut names = Vec::new();
    for i in 0..11 {
        let name = format!("u{i:02}");
        scores.insert(name.clone(), rated(&|x| x, 15));
        names.push(name);
    }
    scores.insert("v_deviant".to_string(), rated(&|x| 2.0 * x + 3.0, 15));
    scores.insert("w_casual".to_string(), rated(&|x| 3.0 * x - 2.0, 5));
    names.push("v_deviant".to_string());
    names.push("w_casual".to_string());
    (scores, names)
}

#[test]
fn mehestan_aligns_users_on_the_majority_scale() {
    let (scores, names) = calibration_scenario();
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    let users = trusted_users(&names);
    let made_public = MadePublic::all_public();
    let mehestan = Mehestan::default().with_lipschitz(100.0).unwrap();

    let scales = mehestan.scale(&scores, &context(&users, &made_public)).unwrap();
    assert_eq!(scales.len(), 13);

    let majority = scales["u00"];
    assert!((majority.multiplier.value - 1.0).abs() < 0.05);
    assert!(majority.translation.value.abs() < 0.05);

    let deviant = scales["v_deviant"];
    assert!((deviant.multiplier.value - 0.5).abs() < 0.05);
    assert!((deviant.translation.value + 1.5).abs() < 0.1);

    let casual = scales["w_casual"];
    assert!((casual.multiplier.value - 1.0 / 3.0).abs() < 0.05);
    assert!((casual.translation.value - 2.0 / 3.0).abs() < 0.15);

    let scaled = apply_scales(&scores, &scales);
    for (entity, score) in &scaled["w_casual"] {
        let truth = scores["u00"][entity].value;
        assert!((score.value - truth).abs() < 0.25, "{entity}: {score} vs {truth}");
    }
}

#[test]
fn mehestan_without_scalers_leaves_scores_unchanged() {
    let (scores, names) = calibration_scenario();
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    let users = trusted_users(&names);
    let made_public = MadePublic::all_public();
    let mehestan = Mehestan::default().with_min_scaler_activity(1000.0);
    let scales = mehestan.scale(&scores, &context(&users, &made_public)).unwrap();
    assert!(scales.is_empty());
    assert_eq!(apply_scales(&scores, &scales), scores);
}

#[test]
fn untrusted_users_are_never_scalers() {
    let (scores, _) = calibration_scenario();
    let users = Users::new();
    let made_public = MadePublic::all_public();
    let scales = Mehestan::default()
        .scale(&scores, &context(&users, &made_public))
        .unwrap();
    assert!(scales.is_empty());
}

fn symmetric_two_users() -> CriterionScores {
    let ratings = [("a", -2.0), ("b", -1.0), ("c", 0.0), ("d", 1.0), ("e", 2.0)];
    [
        ("alice".to_string(), user_scores(&ratings, 0.0)),
        ("bob".to_string(), user_scores(&ratings, 0.0)),
    ]
    .into_iter()
    .collect()
}

#[test]
fn quantile_shift_anchors_the_quantile() {
    let scores: CriterionScores = [
        (
            "alice".to_string(),
            user_scores(&[("a", 0.0), ("b", 1.0), ("c", 2.0), ("d", 3.0), ("e", 4.0)], 0.0),
        ),
        ("bob".to_string(), user_scores(&[("f", 10.0)], 0.0)),
    ]
    .into_iter()
    .collect();
    let users = trusted_users(&["alice", "bob"]);
    let made_public = MadePublic::all_public();
    let shift = QuantileShift::new(0.15, 0.0, f64::INFINITY, 1e-9).unwrap();
    let scales = shift.scale(&scores, &context(&users, &made_public)).unwrap();
    assert!((scales["alice"].translation.value + 1.0).abs() < 1e-3);
    assert_eq!(scales["alice"], scales["bob"]);
}

#[test]
fn standardize_divides_by_deviation_quantile() {
    let scores = symmetric_two_users();
    let users = trusted_users(&["alice", "bob"]);
    let made_public = MadePublic::all_public();
    let standardize = Standardize::new(0.9, f64::INFINITY, 1e-9).unwrap();
    let scales = standardize.scale(&scores, &context(&users, &made_public)).unwrap();
    assert!((scales["bob"].multiplier.value - 0.5).abs() < 1e-3);
    assert_eq!(scales["bob"].translation.value, 0.0);
}

#[test]
fn compose_chains_steps() {
    let scores = symmetric_two_users();
    let users = trusted_users(&["alice", "bob"]);
    let made_public = MadePublic::all_public();
    let chain = ScalingCompose::new(vec![
        Box::new(QuantileShift::new(0.15, 0.0, f64::INFINITY, 1e-9).unwrap()),
        Box::new(Standardize::new(0.9, f64::INFINITY, 1e-9).unwrap()),
    ]);
    let scales = chain.scale(&scores, &context(&users, &made_public)).unwrap();
    let scale = scales["alice"];
    assert!(scale.apply(Score::exact(-2.0)).value.abs() < 1e-3);
    assert!((scale.apply(Score::exact(2.0)).value - 2.0).abs() < 1e-3);
}

#[test]
fn steps_follow_configuration() {
    let none = ScalingConfig {
        steps: Some(Vec::new()),
        ..Default::default()
    };
    assert_eq!(from_config(&none).unwrap().name(), "no_scaling");
    let all = ScalingConfig {
        steps: Some(vec![ScalingStep::Mehestan, ScalingStep::Standardize]),
        ..Default::default()
    };
    assert_eq!(from_config(&all).unwrap().name(), "compose");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn mehestan_multipliers_are_positive(
        truth in prop::collection::vec(prop_oneof![-5.0f64..-0.5, 0.5f64..5.0], 12),
        stretches in prop::collection::vec((0.5f64..2.0, -3.0f64..3.0), 4),
    ) {
        let mut scores = CriterionScores::new();
        let mut names = Vec::new();
        for (u, (a, b)) in stretches.iter().enumerate() {
            let name = format!("user{u}");
            let ratings = truth
                .iter()
                .enumerate()
                .map(|(e, x)| (format!("e{e}"), Score::symmetric(a * x + b, 0.05)))
                .collect();
            scores.insert(name.clone(), ratings);
            names.push(name);
        }
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        let users = trusted_users(&names);
        let made_public = MadePublic::all_public();
        let mehestan = Mehestan::default().with_min_scaler_activity(1.0);
        let scales = mehestan.scale(&scores, &context(&users, &made_public)).unwrap();
        for scale in scales.values() {
            prop_assert!(scale.multiplier.value > 0.0);
            prop_assert!(scale.multiplier.value.is_finite());
            prop_assert!(scale.translation.value.is_finite());
        }
    }
}

//! Integration tests for global aggregation.

use std::collections::BTreeMap;

use proptest::prelude::*;
use serde::Deserialize;
use test_fixtures::load_fixture;

use solidago_aggregation::{Aggregation, Average, EntitywiseQrQuantile};
use solidago_core::config::{AggregationConfig, AggregationMethod};
use solidago_core::model::{CriterionScores, VotingRights};
use solidago_core::Score;

#[derive(Deserialize)]
struct FixtureScore {
    user: String,
    entity: String,
    value: f64,
    left_unc: f64,
    right_unc: f64,
}

#[derive(Deserialize)]
struct ToyScenario {
    criterion: String,
    scores: Vec<FixtureScore>,
    expected_average: BTreeMap<String, Score>,
}

/// Scores and unit voting rights of the toy scenario.
fn toy() -> (ToyScenario, CriterionScores, VotingRights) {
    let scenario: ToyScenario = load_fixture("aggregation/toy.json");
    let mut scores = CriterionScores::new();
    let mut voting_rights = VotingRights::new();
    for s in &scenario.scores {
        scores
            .entry(s.user.clone())
            .or_default()
            .insert(s.entity.clone(), Score::new(s.value, s.left_unc, s.right_unc));
        voting_rights.set(&s.user, &s.entity, &scenario.criterion, 1.0);
    }
    (scenario, scores, voting_rights)
}

fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() < tolerance,
        "{actual} != {expected} (tolerance {tolerance})"
    );
}

#[test]
fn average_matches_toy_expectations() {
    let (scenario, scores, voting_rights) = toy();
    let global = Average
        .aggregate(&scenario.criterion, &scores, &voting_rights)
        .unwrap();
    for (entity, expected) in &scenario.expected_average {
        let actual = global.get(entity, &scenario.criterion).unwrap();
        assert_close(actual.value, expected.value, 1e-9);
        assert_close(actual.left_unc, expected.left_unc, 1e-9);
        assert_close(actual.right_unc, expected.right_unc, 1e-9);
    }
}

#[test]
fn low_quantile_is_conservative_on_toy() {
    let (scenario, scores, voting_rights) = toy();
    let aggregator = EntitywiseQrQuantile::new(0.2, 100.0, 1e-5).unwrap();
    let global = aggregator
        .aggregate(&scenario.criterion, &scores, &voting_rights)
        .unwrap();
    let value = |entity: &str| global.get(entity, &scenario.criterion).unwrap().value;

    assert!(value("e0") < -1.0, "e0 = {}", value("e0"));
    assert_close(value("e1"), 1.0, 0.02);
    assert_close(value("e2"), -0.3, 0.02);
    assert!(value("e3") > 0.2, "e3 = {}", value("e3"));

    let e1 = global.get("e1", &scenario.criterion).unwrap();
    assert_eq!(e1.left_unc, e1.right_unc);
    assert!(e1.left_unc > 0.0 && e1.left_unc < 1.0);
}

#[test]
fn entities_without_voting_rights_are_skipped() {
    let (scenario, scores, _) = toy();
    let mut voting_rights = VotingRights::new();
    voting_rights.set("u0", "e1", &scenario.criterion, 1.0);
    let global = Average
        .aggregate(&scenario.criterion, &scores, &voting_rights)
        .unwrap();
    assert_eq!(global.len(), 1);
    assert_eq!(global.get("e1", &scenario.criterion), Some(Score::new(1.0, 0.01, 0.01)));
}

#[test]
fn from_config_selects_method() {
    let mut config = AggregationConfig::default();
    assert_eq!(solidago_aggregation::from_config(&config).unwrap().name(), "qr_quantile");
    config.method = Some(AggregationMethod::QrMedian);
    assert_eq!(solidago_aggregation::from_config(&config).unwrap().name(), "qr_median");
    config.method = Some(AggregationMethod::Average);
    assert_eq!(solidago_aggregation::from_config(&config).unwrap().name(), "average");
}

#[test]
fn invalid_quantile_is_rejected() {
    assert!(EntitywiseQrQuantile::new(1.0, 0.1, 1e-5).is_err());
    assert!(EntitywiseQrQuantile::new(0.2, 0.0, 1e-5).is_err());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn one_extra_user_moves_median_boundedly(
        values in prop::collection::vec(-5.0f64..5.0, 5),
        outlier in -1e3f64..1e3,
        weight in 0.01f64..1.0,
    ) {
        let lipschitz = 1.0;
        let aggregator = EntitywiseQrQuantile::median(lipschitz, 1e-8).unwrap();
        let mut scores = CriterionScores::new();
        let mut voting_rights = VotingRights::new();
        for (i, value) in values.iter().enumerate() {
            let user = format!("u{i}");
            scores.entry(user.clone()).or_default().insert("e".to_string(), Score::symmetric(*value, 0.1));
            voting_rights.set(&user, "e", "c", 1.0);
        }
        let before = aggregator.aggregate("c", &scores, &voting_rights).unwrap();

        scores.entry("outlier".to_string()).or_default().insert("e".to_string(), Score::exact(outlier));
        voting_rights.set("outlier", "e", "c", weight);
        let after = aggregator.aggregate("c", &scores, &voting_rights).unwrap();

        let shift = (after.get("e", "c").unwrap().value - before.get("e", "c").unwrap().value).abs();
        prop_assert!(shift <= 2.0 * lipschitz * weight + 1e-6, "shift {shift}");
    }

    #[test]
    fn average_lies_between_extremes(values in prop::collection::vec(-10.0f64..10.0, 1..8)) {
        let mut scores = CriterionScores::new();
        let mut voting_rights = VotingRights::new();
        for (i, value) in values.iter().enumerate() {
            let user = format!("u{i}");
            scores.entry(user.clone()).or_default().insert("e".to_string(), Score::exact(*value));
            voting_rights.set(&user, "e", "c", 0.5 + i as f64);
        }
        let global = Average.aggregate("c", &scores, &voting_rights).unwrap();
        let value = global.get("e", "c").unwrap().value;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(value >= min - 1e-9 && value <= max + 1e-9);
    }
}

//! End-to-end tests of the pipeline driver.

use std::collections::BTreeSet;

use solidago_aggregation::Aggregation;
use solidago_core::config::{PipelineConfig, TrustMethod, VotingRightsMethod};
use solidago_core::errors::{AggregationError, NumericError};
use solidago_core::model::{
    Assessment, Assessments, Comparisons, CriterionScores, DirectScoring, MadePublic,
    PipelineInput, User, Users, VotingRights, Vouch, Vouches,
};
use solidago_pipeline::{CriterionStatus, Pipeline};

const CRITERIA: [&str; 3] = ["importance", "pedagogy", "reliability"];
const N_USERS: usize = 8;
const N_ENTITIES: usize = 6;

/// Eight users, three pretrusted, comparing six entities on three criteria.
/// Every user roughly agrees on the entity ranking, at their own scale.
fn population(reversed: bool) -> PipelineInput {
    let mut users = Users::new();
    let mut vouches = Vouches::new();
    for u in 0..N_USERS {
        users.insert(User::new(format!("u{u}"), u < 3));
        if u >= 3 {
            let vouch = Vouch {
                weight: 1.0,
                priority: 0.0,
            };
            vouches
                .insert(&format!("u{}", u % 3), &format!("u{u}"), "ProofOfPersonhood", vouch)
                .unwrap();
        }
    }

    let mut comparisons = Comparisons::new();
    for (c, criterion) in CRITERIA.iter().enumerate() {
        for u in 0..N_USERS {
            let user = format!("u{u}");
            let user_scale = 0.5 + (u % 4) as f64 * 0.5;
            for left in 0..N_ENTITIES {
                for right in (left + 1)..N_ENTITIES {
                    if (left + right + u + c) % 3 == 0 {
                        continue;
                    }
                    let gap = (right as f64 - left as f64) * user_scale;
                    let noise = ((u * 7 + left * 3 + right + c) % 5) as f64 / 5.0 - 0.4;
                    let value = gap + noise;
                    let (l, r) = (format!("e{left}"), format!("e{right}"));
                    if reversed {
                        comparisons.insert(&user, criterion, &r, &l, -value, 10.0).unwrap();
                    } else {
                        comparisons.insert(&user, criterion, &l, &r, value, 10.0).unwrap();
                    }
                }
            }
        }
    }

    let mut assessments = Assessments::new();
    assessments
        .insert(
            "u0",
            "clarity",
            "e0",
            Assessment {
                value: 3.0,
                min: Some(0.0),
                max: Some(10.0),
            },
        )
        .unwrap();

    let mut made_public = MadePublic::new();
    for u in 0..N_USERS {
        for e in 0..N_ENTITIES {
            made_public.set(&format!("u{u}"), &format!("e{e}"), (u + e) % 2 == 0);
        }
    }

    PipelineInput {
        users,
        vouches,
        made_public,
        comparisons,
        assessments,
        ..Default::default()
    }
}

fn config() -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.scaling.min_scaler_activity = Some(1.0);
    config
}

fn pipeline(workers: usize) -> Pipeline {
    Pipeline::from_config(&config()).unwrap().with_max_workers(workers)
}

/// Fails on one criterion and delegates to `inner` elsewhere.
struct FailOn {
    criterion: &'static str,
    inner: Box<dyn Aggregation>,
}

impl Aggregation for FailOn {
    fn aggregate(
        &self,
        criterion: &str,
        scores: &CriterionScores,
        voting_rights: &VotingRights,
    ) -> Result<DirectScoring, AggregationError> {
        if criterion == self.criterion {
            return Err(AggregationError::Solver {
                entity: "e0".to_string(),
                criterion: criterion.to_string(),
                source: NumericError::InvalidInput {
                    operation: "aggregate",
                    message: "forced failure".to_string(),
                },
            });
        }
        self.inner.aggregate(criterion, scores, voting_rights)
    }

    fn name(&self) -> &'static str {
        "fail_on"
    }
}

#[test]
fn full_run_scores_every_criterion() {
    let output = pipeline(2).run(population(false)).unwrap();

    assert!(output.report.check().is_ok());
    for criterion in CRITERIA {
        assert_eq!(output.report.criteria[criterion], CriterionStatus::Succeeded);
        let global = output.global_scores.criterion_scores(criterion);
        assert_eq!(global.len(), N_ENTITIES, "{criterion}");
        assert!(global["e5"].value > global["e0"].value, "{criterion}");
        for (entity, score) in &global {
            assert!(score.value.is_finite(), "{entity}/{criterion}: {score}");
            assert!(score.left_unc >= 0.0 && score.right_unc >= 0.0);
        }

        // squashing keeps every entity and their order
        let squashed = output.squashed_global_scores.criterion_scores(criterion);
        assert_eq!(
            squashed.keys().collect::<Vec<_>>(),
            global.keys().collect::<Vec<_>>()
        );
        for (a, b) in global.keys().zip(global.keys().skip(1)) {
            if global[a].value < global[b].value {
                assert!(squashed[a].value <= squashed[b].value, "{a} {b} on {criterion}");
            }
        }
    }
    assert_eq!(output.report.criteria["clarity"], CriterionStatus::Empty);
    assert_eq!(output.report.trust_converged, Some(true));

    // every user with comparisons has direct and squashed scores
    let direct = output.user_direct_scores.evaluate();
    assert_eq!(direct.len(), N_USERS);
    assert_eq!(
        output.squashed_user_scores.keys().collect::<Vec<_>>(),
        direct.keys().collect::<Vec<_>>()
    );
    for (user, scores) in &direct {
        assert_eq!(output.squashed_user_scores[user].len(), scores.len(), "{user}");
    }

    // every comparing user holds a positive voting right on what they compared
    let input = population(false);
    for record in input.comparisons.iter() {
        for entity in [record.left, record.right] {
            assert!(
                output.voting_rights.get(record.user, entity, record.criterion) > 0.0,
                "{record:?}"
            );
        }
    }
}

#[test]
fn trust_and_voting_rights_are_bounded() {
    let output = pipeline(1).run(population(false)).unwrap();
    for user in output.users.iter() {
        let trust = output.users.trust(&user.name);
        assert!((0.0..=1.0).contains(&trust));
        if user.is_pretrusted {
            assert!(trust >= 0.8 * (1.0 - 1e-9));
        }
    }
    for record in output.voting_rights.iter() {
        assert!((0.0..=1.0).contains(&record.voting_right), "{record:?}");
    }
    // assessments alone still earn voting rights
    assert!(output.voting_rights.get("u0", "e0", "clarity") > 0.0);
}

#[test]
fn outputs_do_not_depend_on_worker_count() {
    let reference = pipeline(1).run(population(false)).unwrap();
    for workers in [4, 16] {
        let output = pipeline(workers).run(population(false)).unwrap();
        assert_eq!(output.user_direct_scores, reference.user_direct_scores);
        assert_eq!(output.user_scales, reference.user_scales);
        assert_eq!(output.global_scores, reference.global_scores);
        assert_eq!(output.squashed_global_scores, reference.squashed_global_scores);
        assert_eq!(output.report, reference.report);
    }
}

#[test]
fn running_twice_gives_identical_outputs() {
    let pipeline = pipeline(3);
    let first = pipeline.run(population(false)).unwrap();
    let second = pipeline.run(population(false)).unwrap();
    assert_eq!(first, second);
}

/// Orientation is normalized when comparisons are stored; the learner's
/// own symmetry is checked in `solidago-learning`.
#[test]
fn comparison_orientation_is_normalized_on_input() {
    let direct = population(false);
    let swapped = population(true);
    assert_eq!(direct.comparisons, swapped.comparisons);

    let pipeline = pipeline(2);
    let direct = pipeline.run(direct).unwrap();
    let swapped = pipeline.run(swapped).unwrap();
    assert_eq!(direct.global_scores, swapped.global_scores);
}

#[test]
fn stored_trust_scores_are_kept() {
    let mut users = Users::new();
    users.insert(User::new("alice", false).with_trust(1.0));
    users.insert(User::new("bob", false));
    let mut comparisons = Comparisons::new();
    for user in ["alice", "bob"] {
        comparisons.insert(user, "importance", "e0", "e1", 3.0, 10.0).unwrap();
    }
    let input = PipelineInput {
        users,
        comparisons,
        ..Default::default()
    };

    let mut config = config();
    config.voting_rights.method = Some(VotingRightsMethod::IsTrust);
    let output = Pipeline::from_config(&config).unwrap().run(input).unwrap();

    assert_eq!(output.users.trust("alice"), 1.0);
    assert_eq!(output.users.trust("bob"), 0.0);
    // private judgments weigh `privacy_penalty`
    assert_eq!(output.voting_rights.get("alice", "e0", "importance"), 0.5);
    assert_eq!(output.voting_rights.get("bob", "e0", "importance"), 0.0);
}

#[test]
fn failed_criterion_does_not_affect_others() {
    let healthy = pipeline(2).run(population(false)).unwrap();
    let aggregation = solidago_aggregation::from_config(&config().aggregation).unwrap();
    let failing = pipeline(2).with_aggregation(Box::new(FailOn {
        criterion: "pedagogy",
        inner: aggregation,
    }));
    let output = failing.run(population(false)).unwrap();

    assert!(matches!(
        &output.report.criteria["pedagogy"],
        CriterionStatus::Failed(message) if message.contains("forced failure")
    ));
    assert_eq!(output.report.failed_criteria(), vec!["pedagogy".to_string()]);
    assert!(output.report.check().is_err());
    assert!(output.global_scores.criterion_scores("pedagogy").is_empty());
    for criterion in ["importance", "reliability"] {
        assert_eq!(
            output.global_scores.criterion_scores(criterion),
            healthy.global_scores.criterion_scores(criterion)
        );
    }
}

#[test]
fn squashed_scores_are_bounded() {
    let output = pipeline(2).run(population(false)).unwrap();
    assert!(!output.squashed_global_scores.is_empty());
    for (_, _, score) in output.squashed_global_scores.iter() {
        assert!(score.value.abs() < 100.0);
    }
    for scores in output.squashed_user_scores.values() {
        for (_, _, score) in scores.iter() {
            assert!(score.value.abs() < 100.0);
            assert!(score.min() >= -100.0 && score.max() <= 100.0);
        }
    }
}

#[test]
fn criteria_filter_restricts_the_run() {
    let mut config = config();
    config.run.criteria = vec!["importance".to_string()];
    let output = Pipeline::from_config(&config)
        .unwrap()
        .run(population(false))
        .unwrap();
    let criteria: BTreeSet<&str> = output.report.criteria.keys().map(String::as_str).collect();
    assert_eq!(criteria, BTreeSet::from(["importance"]));
    assert_eq!(output.global_scores.criteria(), BTreeSet::from(["importance"]));
    assert!(output.voting_rights.criteria().iter().all(|c| *c == "importance"));
}

#[test]
fn trust_all_gives_everyone_full_trust() {
    let mut config = config();
    config.trust.method = Some(TrustMethod::TrustAll);
    let output = Pipeline::from_config(&config)
        .unwrap()
        .run(population(false))
        .unwrap();
    assert!(output.users.iter().all(|u| output.users.trust(&u.name) == 1.0));
}

#[test]
fn step_by_step_matches_full_run() {
    let pipeline = pipeline(2);
    let full = pipeline.run(population(false)).unwrap();

    let mut input = population(false);
    input.register_referenced();
    let criteria = pipeline.select_criteria(input.criteria());
    let trust = pipeline.propagate_trust(&input.users, &input.vouches);
    let voting = pipeline.assign_voting_rights(
        &trust.users,
        &input.made_public,
        &input.comparisons,
        &input.assessments,
        &criteria,
    );
    let (direct, _) = pipeline.learn(&input.comparisons).unwrap();
    let (scales, _) = pipeline
        .scale(&direct, &trust.users, &input.made_public)
        .unwrap();
    let (global, report) = pipeline
        .aggregate(&direct, &scales, &voting.voting_rights)
        .unwrap();
    let post = pipeline.post_process(&direct, &scales, &global);

    assert!(report.check().is_ok());
    assert_eq!(direct, full.user_direct_scores);
    assert_eq!(scales, full.user_scales);
    assert_eq!(global, full.global_scores);
    assert_eq!(post.squashed_global_scores, full.squashed_global_scores);
    assert_eq!(post.squashed_user_scores, full.squashed_user_scores);
}

#[test]
fn invalid_config_is_rejected_before_running() {
    let mut config = config();
    config.voting_rights.privacy_penalty = Some(1.5);
    assert!(Pipeline::from_config(&config).is_err());
}

//! # solidago-cli
//!
//! Command-line front end of the scoring pipeline. Each subcommand runs one
//! phase on the CSV tables of `--input-dir` and writes its tables to
//! `--output-dir`; `run_all` chains every phase.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use solidago_core::config::{CliOverrides, PipelineConfig, CONFIG_FILE_NAME};
use solidago_core::errors::{DataError, PipelineError};
use solidago_core::model::{UserModels, Users};
use solidago_io::{
    load_input, load_made_public, load_population, read_comparisons,
    read_global_scores, read_trust, read_user_scales, read_user_scores, read_voting_rights,
    write_global_scores, write_output, write_trust, write_user_scales, write_user_scores,
    write_voting_rights, write_voting_statistics, COMPARISONS_FILE, GLOBAL_SCORES_FILE,
    SQUASHED_GLOBAL_SCORES_FILE, TRUST_FILE, USER_DIRECT_SCORES_FILE, USER_SCALES_FILE,
    USER_SCORES_FILE, VOTING_RIGHTS_FILE, VOTING_RIGHTS_STATS_FILE,
};
use solidago_pipeline::{Pipeline, RunReport};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    name = "solidago",
    version,
    about = "Collaborative scoring: trust, voting rights, learning, scaling and aggregation"
)]
pub struct Cli {
    /// Directory holding the input tables and the outputs of earlier steps.
    #[arg(long, global = true, value_name = "DIR", default_value = ".", env = "SOLIDAGO_INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Where tables are written. Defaults to the input directory.
    #[arg(long, global = true, value_name = "DIR", env = "SOLIDAGO_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// TOML configuration file. Defaults to `solidago.toml` in the input
    /// directory, when present.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Only process these criteria (comma-separated).
    #[arg(long, global = true, value_delimiter = ',')]
    pub criteria: Option<Vec<String>>,

    /// Size of the worker pool.
    #[arg(long, global = true)]
    pub workers: Option<usize>,

    /// Treat every judgment as public.
    #[arg(long, global = true)]
    pub all_public: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Propagate trust from pretrusted users along vouches.
    Trust,
    /// Assign per-entity voting rights.
    #[command(name = "voting_rights", alias = "voting-rights")]
    VotingRights,
    /// Learn every user's scores from their comparisons.
    Learn,
    /// Compute user scales.
    Scale,
    /// Aggregate scaled user scores into global scores.
    Aggregate,
    /// Apply scales and squash scores for display.
    #[command(name = "post_process", alias = "post-process")]
    PostProcess,
    /// Run every phase.
    #[command(name = "run_all", alias = "run-all")]
    RunAll,
}

impl Cli {
    pub fn output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or(&self.input_dir)
    }

    /// Explicit `--config`, else `solidago.toml` of the input directory.
    fn config_file(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config {
            return Some(path.clone());
        }
        let default = self.input_dir.join(CONFIG_FILE_NAME);
        default.is_file().then_some(default)
    }

    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            max_workers: self.workers,
            criteria: self.criteria.clone(),
            all_public: self.all_public.then_some(true),
        }
    }

    pub fn load_config(&self) -> Result<PipelineConfig, PipelineError> {
        let config_file = self.config_file();
        debug!(config_file = ?config_file, "loading configuration");
        Ok(PipelineConfig::load(
            config_file.as_deref(),
            Some(&self.overrides()),
        )?)
    }

    /// A table produced by an earlier step: looked up in the output
    /// directory first, then in the input directory.
    fn intermediate(&self, name: &str) -> PathBuf {
        let in_output = self.output_dir().join(name);
        if in_output.is_file() {
            in_output
        } else {
            self.input_dir.join(name)
        }
    }

    /// `users` with the trust of `trust.csv` when an earlier step wrote one.
    fn with_stored_trust(&self, mut users: Users) -> Result<Users, PipelineError> {
        let trust_path = self.intermediate(TRUST_FILE);
        if !trust_path.is_file() {
            return Ok(users);
        }
        let trusts = read_trust(&trust_path)?;
        for name in trusts.keys() {
            users.ensure(name);
        }
        Ok(users.with_trusts(&trusts))
    }

    fn user_direct_scores(&self) -> Result<UserModels, PipelineError> {
        let scores = read_user_scores(&self.intermediate(USER_DIRECT_SCORES_FILE))?;
        Ok(UserModels::from(scores))
    }
}

/// Runs the selected subcommand. A criterion that failed makes the whole
/// command fail, after every other table has been written.
pub fn run(cli: &Cli) -> Result<(), PipelineError> {
    let config = cli.load_config()?;
    let pipeline = Pipeline::from_config(&config)?;
    let out = cli.output_dir();
    std::fs::create_dir_all(out).map_err(|e| DataError::Io {
        path: out.display().to_string(),
        message: e.to_string(),
    })?;
    info!(command = ?cli.command, output_dir = %out.display(), "running");

    let report = match cli.command {
        Command::Trust => trust(cli, &pipeline)?,
        Command::VotingRights => voting_rights(cli, &pipeline)?,
        Command::Learn => learn(cli, &pipeline)?,
        Command::Scale => scale(cli, &pipeline)?,
        Command::Aggregate => aggregate(cli, &pipeline)?,
        Command::PostProcess => post_process(cli, &pipeline)?,
        Command::RunAll => run_all(cli, &pipeline)?,
    };
    report.check()
}

fn trust(cli: &Cli, pipeline: &Pipeline) -> Result<RunReport, PipelineError> {
    let (users, vouches) = load_population(&cli.input_dir)?;
    let outcome = pipeline.propagate_trust(&users, &vouches);
    write_trust(&cli.output_dir().join(TRUST_FILE), &outcome.users)?;

    let mut report = RunReport::new();
    report.trust_iterations = Some(outcome.iterations);
    report.trust_converged = Some(outcome.converged);
    Ok(report)
}

fn voting_rights(cli: &Cli, pipeline: &Pipeline) -> Result<RunReport, PipelineError> {
    let mut input = load_input(&cli.input_dir)?;
    input.register_referenced();
    let users = cli.with_stored_trust(std::mem::take(&mut input.users))?;
    let criteria = pipeline.select_criteria(input.criteria());
    let made_public = pipeline.made_public(&input.made_public);
    let outcome = pipeline.assign_voting_rights(
        &users,
        &made_public,
        &input.comparisons,
        &input.assessments,
        &criteria,
    );
    let out = cli.output_dir();
    write_voting_rights(&out.join(VOTING_RIGHTS_FILE), &outcome.voting_rights)?;
    write_voting_statistics(&out.join(VOTING_RIGHTS_STATS_FILE), &outcome.statistics)?;
    Ok(RunReport::new())
}

fn learn(cli: &Cli, pipeline: &Pipeline) -> Result<RunReport, PipelineError> {
    let comparisons = read_comparisons(&cli.input_dir.join(COMPARISONS_FILE))?;
    let (models, report) = pipeline.learn(&comparisons)?;
    write_user_scores(
        &cli.output_dir().join(USER_DIRECT_SCORES_FILE),
        &models.evaluate(),
    )?;
    Ok(report)
}

fn scale(cli: &Cli, pipeline: &Pipeline) -> Result<RunReport, PipelineError> {
    let models = cli.user_direct_scores()?;
    let (users, _) = load_population(&cli.input_dir)?;
    let users = cli.with_stored_trust(users)?;
    let made_public = load_made_public(&cli.input_dir)?;
    let made_public = pipeline.made_public(&made_public);
    let (scales, report) = pipeline.scale(&models, &users, &made_public)?;
    write_user_scales(&cli.output_dir().join(USER_SCALES_FILE), &scales)?;
    Ok(report)
}

fn aggregate(cli: &Cli, pipeline: &Pipeline) -> Result<RunReport, PipelineError> {
    let models = cli.user_direct_scores()?;
    let scales = read_user_scales(&cli.intermediate(USER_SCALES_FILE))?;
    let voting_rights = read_voting_rights(&cli.intermediate(VOTING_RIGHTS_FILE))?;
    let (global, report) = pipeline.aggregate(&models, &scales, &voting_rights)?;
    write_global_scores(&cli.output_dir().join(GLOBAL_SCORES_FILE), &global)?;
    Ok(report)
}

fn post_process(cli: &Cli, pipeline: &Pipeline) -> Result<RunReport, PipelineError> {
    let models = cli.user_direct_scores()?;
    let scales = read_user_scales(&cli.intermediate(USER_SCALES_FILE))?;
    let global = read_global_scores(&cli.intermediate(GLOBAL_SCORES_FILE))?;
    let post = pipeline.post_process(&models, &scales, &global);
    let out = cli.output_dir();
    write_user_scores(&out.join(USER_SCORES_FILE), &post.squashed_user_scores)?;
    write_global_scores(
        &out.join(SQUASHED_GLOBAL_SCORES_FILE),
        &post.squashed_global_scores,
    )?;
    Ok(RunReport::new())
}

fn run_all(cli: &Cli, pipeline: &Pipeline) -> Result<RunReport, PipelineError> {
    let input = load_input(&cli.input_dir)?;
    let output = pipeline.run(input)?;
    write_output(cli.output_dir(), &output)?;
    Ok(output.report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_parse_after_the_subcommand() {
        let cli = Cli::parse_from([
            "solidago",
            "run_all",
            "--input-dir",
            "data",
            "--criteria",
            "importance,pedagogy",
            "--workers",
            "3",
            "--all-public",
        ]);
        assert_eq!(cli.command, Command::RunAll);
        assert_eq!(cli.input_dir, PathBuf::from("data"));
        assert_eq!(cli.output_dir(), Path::new("data"));
        let overrides = cli.overrides();
        assert_eq!(overrides.max_workers, Some(3));
        assert_eq!(
            overrides.criteria,
            Some(vec!["importance".to_string(), "pedagogy".to_string()])
        );
        assert_eq!(overrides.all_public, Some(true));
    }

    #[test]
    fn snake_case_subcommands() {
        for (name, command) in [
            ("trust", Command::Trust),
            ("voting_rights", Command::VotingRights),
            ("learn", Command::Learn),
            ("scale", Command::Scale),
            ("aggregate", Command::Aggregate),
            ("post_process", Command::PostProcess),
            ("run_all", Command::RunAll),
        ] {
            let cli = Cli::parse_from(["solidago", name]);
            assert_eq!(cli.command, command);
        }
    }

    #[test]
    fn all_public_is_not_overridden_unless_set() {
        let cli = Cli::parse_from(["solidago", "--output-dir", "out", "learn"]);
        assert_eq!(cli.overrides().all_public, None);
        assert_eq!(cli.output_dir(), Path::new("out"));
    }
}

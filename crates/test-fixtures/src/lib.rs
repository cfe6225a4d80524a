//! Shared scenarios for the Solidago tests.
//!
//! `scenarios/` holds two kinds of fixtures:
//! - JSON files (`trust/chain.json`, `aggregation/toy.json`,
//!   `learning/single_user.json`), each a `description` plus the inputs and
//!   expected outputs of one component;
//! - CSV directories (`cli/`) laid out like a real input directory, with an
//!   optional `solidago.toml`.

use serde::de::DeserializeOwned;
use std::path::PathBuf;

/// `scenarios/` of this crate, resolved at compile time so every workspace
/// member finds the same files.
fn scenarios_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios")
}

/// Deserializes the JSON scenario at `relative_path` under `scenarios/`.
///
/// # Panics
/// Panics if the file is missing or does not match `T`.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixture_path(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read scenario {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse scenario {}: {}", path.display(), e))
}

/// Absolute path of a scenario file or CSV scenario directory.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    scenarios_root().join(relative_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_scenarios_are_described() {
        for name in [
            "trust/chain.json",
            "aggregation/toy.json",
            "learning/single_user.json",
        ] {
            let value: serde_json::Value = load_fixture(name);
            assert!(value.get("description").is_some(), "{name} has no description");
        }
    }

    #[test]
    fn csv_scenario_has_the_required_table() {
        assert!(fixture_path("cli").join("comparisons.csv").is_file());
    }
}

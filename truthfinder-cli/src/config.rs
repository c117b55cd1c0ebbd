//! Layered settings for the `truthfinder` CLI.
//!
//! Command-line flags win over the TOML file (~/.config/truthfinder/config.toml
//! unless `--config` says otherwise), which wins over the engine's built-in
//! defaults. Flags and file share one shape, [`TruthfinderConfig`], so layering
//! is a field-by-field `or`.
use serde::Deserialize;
use std::path::{Path, PathBuf};
use truthfinder_core::constants::{
    DEFAULT_DAMPENING_FACTOR, DEFAULT_INFLUENCE_RELATED, DEFAULT_INITIAL_TRUSTWORTHINESS, DEFAULT_ITERATIONS,
};
use truthfinder_core::{EngineConfig, TrainOptions};

use crate::oracle::OracleKind;

/// One settings layer. Unset fields fall through to the next layer.
#[derive(Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TruthfinderConfig {
    pub dampening_factor: Option<f64>,
    pub influence_related: Option<f64>,
    pub iterations: Option<usize>,
    pub initial_trustworthiness: Option<f64>,
    pub oracle: Option<String>,
}

/// Everything a training run needs, with no gaps left.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub engine: EngineConfig,
    pub options: TrainOptions,
    pub oracle: OracleKind,
}

const TEMPLATE: &str = "\
# truthfinder settings. Every key is optional; flags on the command line win.

# Sigmoid dampening applied to adjusted confidence, 0 < x < 1.
# Smaller keeps confidence (and so trust) from running away to 1.
# dampening_factor = 0.3

# How much related claims about the same subject count, 0 <= x <= 1.
# 0 switches the implication oracle off.
# influence_related = 0.5

# Fixed number of iterations; there is no early stop.
# iterations = 10

# Trust every source starts from, 0 < x < 1.
# initial_trustworthiness = 0.9

# How claims imply each other: \"tfidf\", \"case-insensitive\" or \"constant\".
# oracle = \"tfidf\"
";

impl TruthfinderConfig {
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Read a settings file. A file that does not exist is an empty layer.
    pub fn read(path: &Path) -> Result<Self, String> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no settings file");
                return Ok(Self::default());
            }
            Err(e) => return Err(format!("cannot read {}: {e}", path.display())),
        };
        Self::parse(&content).map_err(|e| format!("invalid settings in {}: {e}", path.display()))
    }

    /// Layer `self` over `lower`: fields set here are kept, the rest come from `lower`.
    pub fn or(self, lower: Self) -> Self {
        TruthfinderConfig {
            dampening_factor: self.dampening_factor.or(lower.dampening_factor),
            influence_related: self.influence_related.or(lower.influence_related),
            iterations: self.iterations.or(lower.iterations),
            initial_trustworthiness: self.initial_trustworthiness.or(lower.initial_trustworthiness),
            oracle: self.oracle.or(lower.oracle),
        }
    }

    /// Fill remaining gaps with built-in defaults. Range checks are left to
    /// the engine; only the oracle name is validated here.
    pub fn resolve(self) -> Result<Settings, String> {
        let oracle = match self.oracle.as_deref() {
            Some(name) => name.parse()?,
            None => OracleKind::default(),
        };
        Ok(Settings {
            engine: EngineConfig {
                dampening_factor: self.dampening_factor.unwrap_or(DEFAULT_DAMPENING_FACTOR),
                influence_related: self.influence_related.unwrap_or(DEFAULT_INFLUENCE_RELATED),
            },
            options: TrainOptions {
                iterations: self.iterations.unwrap_or(DEFAULT_ITERATIONS),
                initial_trustworthiness: self.initial_trustworthiness.unwrap_or(DEFAULT_INITIAL_TRUSTWORTHINESS),
            },
            oracle,
        })
    }
}

/// `$HOME/.config/truthfinder/config.toml`
pub fn default_path() -> Result<PathBuf, String> {
    let home = std::env::var_os("HOME").ok_or("HOME is not set; pass --config explicitly")?;
    Ok(PathBuf::from(home).join(".config/truthfinder/config.toml"))
}

/// Write the commented template to `path`, creating parent directories.
/// An existing file is never overwritten.
pub fn write_template(path: &Path) -> Result<(), String> {
    if path.exists() {
        return Err(format!("{} already exists; remove it first to regenerate", path.display()));
    }
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| format!("cannot create {}: {e}", dir.display()))?;
    }
    std::fs::write(path, TEMPLATE).map_err(|e| format!("cannot write {}: {e}", path.display()))
}

/// Oracle selection for the CLI (`--oracle` / config `oracle`).
use std::fmt;
use std::str::FromStr;

use truthfinder_core::{CaseInsensitiveImplication, ConstantImplication, ImplicationOracle, Statement};

use crate::tfidf::TfidfImplication;

/// Score used by `--oracle constant`: every pair of distinct claims
/// weakly supports each other.
pub const CONSTANT_ORACLE_SCORE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OracleKind {
    #[default]
    Tfidf,
    CaseInsensitive,
    Constant,
}

impl FromStr for OracleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tfidf" => Ok(Self::Tfidf),
            "case-insensitive" => Ok(Self::CaseInsensitive),
            "constant" => Ok(Self::Constant),
            other => Err(format!(
                "Unknown oracle \"{other}\". Use \"tfidf\", \"case-insensitive\" or \"constant\"."
            )),
        }
    }
}

impl fmt::Display for OracleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Tfidf => "tfidf",
            Self::CaseInsensitive => "case-insensitive",
            Self::Constant => "constant",
        })
    }
}

/// The oracle actually handed to the engine.
pub enum CliOracle {
    Tfidf(TfidfImplication),
    CaseInsensitive(CaseInsensitiveImplication),
    Constant(ConstantImplication),
}

impl CliOracle {
    /// Build the oracle for `kind`, fitting it to `statements` if needed.
    pub fn build(kind: OracleKind, statements: &[Statement]) -> Self {
        match kind {
            OracleKind::Tfidf => {
                let oracle = TfidfImplication::fit(statements);
                tracing::info!(vocabulary = oracle.vocabulary_size(), "fitted tf-idf oracle");
                Self::Tfidf(oracle)
            }
            OracleKind::CaseInsensitive => Self::CaseInsensitive(CaseInsensitiveImplication),
            OracleKind::Constant => Self::Constant(ConstantImplication(CONSTANT_ORACLE_SCORE)),
        }
    }
}

impl ImplicationOracle for CliOracle {
    fn implication(&self, from: &str, to: &str) -> f64 {
        match self {
            Self::Tfidf(o) => o.implication(from, to),
            Self::CaseInsensitive(o) => o.implication(from, to),
            Self::Constant(o) => o.implication(from, to),
        }
    }
}

use std::collections::HashMap;

use crate::constants::{DEFAULT_INITIAL_TRUSTWORTHINESS, DEFAULT_ITERATIONS};
use crate::error::{Result, TruthError};

/// One observed assertion: `source` claims `claim` about `subject`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Statement {
    /// Originator of the assertion, e.g. a website.
    pub source: String,
    /// The asserted value. Compared by exact text.
    pub claim: String,
    /// The entity the claim is about. Groups competing claims.
    pub subject: String,
}

impl Statement {
    pub fn new(source: impl Into<String>, claim: impl Into<String>, subject: impl Into<String>) -> Self {
        Statement {
            source: source.into(),
            claim: claim.into(),
            subject: subject.into(),
        }
    }

    /// Reject rows with a blank source, claim or subject.
    pub(crate) fn validate(&self, row: usize) -> Result<()> {
        for (field, value) in [
            ("source", &self.source),
            ("claim", &self.claim),
            ("subject", &self.subject),
        ] {
            if value.trim().is_empty() {
                return Err(TruthError::Input {
                    row,
                    reason: format!("missing {field}"),
                });
            }
        }
        Ok(())
    }
}

/// A statement annotated with the two engine-managed columns.
///
/// `trustworthiness` belongs to the source and is replicated onto every row
/// from that source. `confidence` belongs to the claim.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoredStatement {
    pub source: String,
    pub claim: String,
    pub subject: String,
    pub trustworthiness: f64,
    pub confidence: f64,
}

impl ScoredStatement {
    pub fn new(statement: &Statement, trustworthiness: f64, confidence: f64) -> Self {
        ScoredStatement {
            source: statement.source.clone(),
            claim: statement.claim.clone(),
            subject: statement.subject.clone(),
            trustworthiness,
            confidence,
        }
    }
}

/// Options for `TruthFinder::train_with()`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrainOptions {
    /// Fixed number of iterations. 0 returns the initialized table.
    pub iterations: usize,
    /// Trust seeded onto every source. Must lie strictly inside (0, 1).
    pub initial_trustworthiness: f64,
}

impl Default for TrainOptions {
    fn default() -> Self {
        TrainOptions {
            iterations: DEFAULT_ITERATIONS,
            initial_trustworthiness: DEFAULT_INITIAL_TRUSTWORTHINESS,
        }
    }
}

/// Per-iteration movement of the estimates. Recorded for inspection only;
/// the loop never stops early because of it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IterationStats {
    /// 1-based iteration number.
    pub iteration: usize,
    /// Largest absolute change of any row's trustworthiness.
    pub max_trust_delta: f64,
    /// Largest absolute change of any row's confidence.
    pub max_confidence_delta: f64,
}

/// Final confidence of one distinct (subject, claim).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClaimEstimate {
    pub subject: String,
    pub claim: String,
    pub confidence: f64,
    /// Distinct sources asserting this claim, in first-appearance order.
    pub sources: Vec<String>,
}

/// Final trustworthiness of one source.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceEstimate {
    pub source: String,
    pub trustworthiness: f64,
    /// Number of statements this source made.
    pub statements: usize,
}

/// Output of a training run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrainResult {
    /// Every input row, in input order, with final estimates populated.
    pub statements: Vec<ScoredStatement>,
    /// Number of iterations actually run.
    pub iterations: usize,
    pub history: Vec<IterationStats>,
}

impl TrainResult {
    /// One estimate per distinct (subject, claim). Subjects keep their
    /// first-appearance order; claims within a subject are sorted by
    /// confidence descending, ties by first appearance.
    pub fn claims(&self) -> Vec<ClaimEstimate> {
        let mut by_subject: Vec<Vec<ClaimEstimate>> = Vec::new();
        let mut subject_idx: HashMap<&str, usize> = HashMap::new();
        let mut claim_idx: HashMap<(&str, &str), (usize, usize)> = HashMap::new();

        for row in &self.statements {
            let s = *subject_idx.entry(row.subject.as_str()).or_insert_with(|| {
                by_subject.push(Vec::new());
                by_subject.len() - 1
            });
            let key = (row.subject.as_str(), row.claim.as_str());
            match claim_idx.get(&key) {
                Some(&(s, c)) => {
                    let estimate = &mut by_subject[s][c];
                    if !estimate.sources.contains(&row.source) {
                        estimate.sources.push(row.source.clone());
                    }
                }
                None => {
                    claim_idx.insert(key, (s, by_subject[s].len()));
                    by_subject[s].push(ClaimEstimate {
                        subject: row.subject.clone(),
                        claim: row.claim.clone(),
                        confidence: row.confidence,
                        sources: vec![row.source.clone()],
                    });
                }
            }
        }

        by_subject
            .into_iter()
            .flat_map(|mut claims| {
                // Stable sort keeps first-appearance order among ties.
                claims.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
                claims
            })
            .collect()
    }

    /// The highest-confidence claim for each subject.
    pub fn most_likely(&self) -> Vec<ClaimEstimate> {
        let mut seen: Vec<String> = Vec::new();
        self.claims()
            .into_iter()
            .filter(|c| {
                if seen.contains(&c.subject) {
                    false
                } else {
                    seen.push(c.subject.clone());
                    true
                }
            })
            .collect()
    }

    /// One estimate per source, sorted by trustworthiness descending.
    pub fn sources(&self) -> Vec<SourceEstimate> {
        let mut sources: Vec<SourceEstimate> = Vec::new();
        let mut idx: HashMap<&str, usize> = HashMap::new();
        for row in &self.statements {
            match idx.get(row.source.as_str()) {
                Some(&i) => sources[i].statements += 1,
                None => {
                    idx.insert(row.source.as_str(), sources.len());
                    sources.push(SourceEstimate {
                        source: row.source.clone(),
                        trustworthiness: row.trustworthiness,
                        statements: 1,
                    });
                }
            }
        }
        sources.sort_by(|a, b| b.trustworthiness.total_cmp(&a.trustworthiness));
        sources
    }
}

/// Row indices grouped by a key, groups in first-appearance order.
///
/// Subjects partition the table for the per-subject steps; sources partition
/// it for the trust update.
pub(crate) fn group_rows<'a, I>(keys: I) -> Vec<Vec<usize>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut key_to_group: HashMap<&'a str, usize> = HashMap::new();
    for (row, key) in keys.into_iter().enumerate() {
        let g = *key_to_group.entry(key).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[g].push(row);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(source: &str, claim: &str, subject: &str, t: f64, c: f64) -> ScoredStatement {
        ScoredStatement {
            source: source.into(),
            claim: claim.into(),
            subject: subject.into(),
            trustworthiness: t,
            confidence: c,
        }
    }

    fn sample_result() -> TrainResult {
        TrainResult {
            statements: vec![
                scored("a", "Einstein", "Special relativity", 0.8, 0.9),
                scored("b", "Newton", "Special relativity", 0.4, 0.3),
                scored("c", "Einstein", "Special relativity", 0.6, 0.9),
                scored("a", "Newton", "Universal gravitation", 0.8, 0.7),
            ],
            iterations: 1,
            history: Vec::new(),
        }
    }

    #[test]
    fn test_blank_fields_rejected() {
        let err = Statement::new("a", "  ", "s").validate(3).unwrap_err();
        assert_eq!(err, TruthError::Input { row: 3, reason: "missing claim".into() });
        assert!(Statement::new("", "x", "s").validate(0).is_err());
        assert!(Statement::new("a", "x", "").validate(0).is_err());
        assert!(Statement::new("a", "x", "s").validate(0).is_ok());
    }

    #[test]
    fn test_claims_are_deduplicated_and_ranked() {
        let claims = sample_result().claims();
        assert_eq!(claims.len(), 3);
        assert_eq!(claims[0].claim, "Einstein");
        assert_eq!(claims[0].sources, vec!["a".to_string(), "c".to_string()]);
        assert_eq!(claims[1].claim, "Newton");
        assert_eq!(claims[2].subject, "Universal gravitation");
    }

    #[test]
    fn test_most_likely_one_per_subject() {
        let best = sample_result().most_likely();
        assert_eq!(best.len(), 2);
        assert_eq!(best[0].claim, "Einstein");
        assert_eq!(best[1].claim, "Newton");
    }

    #[test]
    fn test_sources_sorted_by_trust() {
        let sources = sample_result().sources();
        let names: Vec<&str> = sources.iter().map(|s| s.source.as_str()).collect();
        assert_eq!(names, vec!["a", "c", "b"]);
        assert_eq!(sources[0].statements, 2);
    }

    #[test]
    fn test_group_rows_first_appearance_order() {
        let groups = group_rows(["x", "y", "x", "z", "y"]);
        assert_eq!(groups, vec![vec![0, 2], vec![1, 4], vec![3]]);
    }
}

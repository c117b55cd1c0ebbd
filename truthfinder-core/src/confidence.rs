/// Confidence calculation and finalization.
///
/// Calculation turns source trust into raw, unbounded claim evidence;
/// finalization squashes adjusted evidence back into (0, 1).
/// Both are pure: they read a snapshot and return a new table.
use std::collections::HashMap;

use crate::error::Result;
use crate::numeric::{ensure_finite, sigmoid, trust_score};
use crate::types::ScoredStatement;

/// Raw confidence of every row: the sum of `-ln(1 - t)` over the distinct
/// sources asserting the row's exact claim about the row's subject.
///
/// Corroboration adds up in log space, so two sources at 0.9 give twice the
/// evidence of one. Fails with `TruthError::Domain` if any contributing
/// source has trust >= 1.
pub fn calculate_confidence(rows: &[ScoredStatement]) -> Result<Vec<ScoredStatement>> {
    // (subject, claim) -> (sources already counted, evidence)
    let mut evidence: HashMap<(&str, &str), (Vec<&str>, f64)> = HashMap::new();

    for row in rows {
        let entry = evidence
            .entry((row.subject.as_str(), row.claim.as_str()))
            .or_insert_with(|| (Vec::new(), 0.0));
        if entry.0.contains(&row.source.as_str()) {
            continue;
        }
        entry.0.push(row.source.as_str());
        entry.1 += trust_score(row.trustworthiness)?;
    }

    rows.iter()
        .map(|row| {
            let (_, value) = &evidence[&(row.subject.as_str(), row.claim.as_str())];
            Ok(ScoredStatement {
                confidence: ensure_finite("raw confidence", *value)?,
                ..row.clone()
            })
        })
        .collect()
}

/// Final confidence of every row: `sigmoid(dampening_factor * x)`.
///
/// Elementwise, no interaction between rows. Small dampening factors keep
/// confidence from saturating after the first few iterations.
pub fn finalize_confidence(rows: &[ScoredStatement], dampening_factor: f64) -> Result<Vec<ScoredStatement>> {
    rows.iter()
        .map(|row| {
            let x = ensure_finite("adjusted confidence", row.confidence)?;
            Ok(ScoredStatement {
                confidence: sigmoid(dampening_factor * x),
                ..row.clone()
            })
        })
        .collect()
}

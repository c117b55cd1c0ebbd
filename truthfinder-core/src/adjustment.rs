/// Confidence adjustment: related claims about the same subject reinforce
/// (or undermine) each other through the implication oracle.
///
/// For each distinct claim `c1` of a subject:
///
/// ```text
/// confidence(c1) += influence_related * Σ_{c2 != c1} confidence(c2) * imp(c2 -> c1)
/// ```
///
/// Claims are deduplicated by exact text first, so a claim is never compared
/// against its own duplicates and duplicates are never counted twice.
/// Near-duplicates ("Einstein" vs "Albert Einstein") are separate claims and
/// interact only through the oracle.
///
/// Cost is O(k²) oracle calls per subject with k distinct claims.
use std::collections::HashMap;

use crate::error::{Result, TruthError};
use crate::implication::ImplicationOracle;
use crate::numeric::ensure_finite;
use crate::types::{group_rows, ScoredStatement};

/// Adjust every row's confidence from a single pre-adjustment snapshot.
///
/// All new values are computed from `rows` before any is written, so the
/// update is simultaneous across claims. With `influence_related == 0` the
/// table is returned unchanged and the oracle is never called.
pub fn adjust_confidence<O>(
    rows: &[ScoredStatement],
    oracle: &O,
    influence_related: f64,
) -> Result<Vec<ScoredStatement>>
where
    O: ImplicationOracle + ?Sized,
{
    let mut adjusted = rows.to_vec();
    if influence_related == 0.0 {
        return Ok(adjusted);
    }

    for group in group_rows(rows.iter().map(|r| r.subject.as_str())) {
        let claims = distinct_claims(rows, &group);
        let support = related_support(&claims, oracle)?;

        for &i in &group {
            let s = support[rows[i].claim.as_str()];
            adjusted[i].confidence =
                ensure_finite("adjusted confidence", rows[i].confidence + influence_related * s)?;
        }
    }

    Ok(adjusted)
}

/// Distinct claims of one group with their snapshot confidence, in
/// first-appearance order.
fn distinct_claims<'a>(rows: &'a [ScoredStatement], group: &[usize]) -> Vec<(&'a str, f64)> {
    let mut claims: Vec<(&str, f64)> = Vec::new();
    for &i in group {
        let claim = rows[i].claim.as_str();
        if !claims.iter().any(|(c, _)| *c == claim) {
            claims.push((claim, rows[i].confidence));
        }
    }
    claims
}

/// Σ confidence(c2) * imp(c2 -> c1) over the other distinct claims, per c1.
fn related_support<'a, O>(claims: &[(&'a str, f64)], oracle: &O) -> Result<HashMap<&'a str, f64>>
where
    O: ImplicationOracle + ?Sized,
{
    let mut support = HashMap::with_capacity(claims.len());
    for (i, &(c1, _)) in claims.iter().enumerate() {
        let mut s = 0.0;
        for (j, &(c2, confidence)) in claims.iter().enumerate() {
            if i == j {
                continue;
            }
            s += confidence * checked_implication(oracle, c2, c1)?;
        }
        support.insert(c1, s);
    }
    Ok(support)
}

fn checked_implication<O>(oracle: &O, from: &str, to: &str) -> Result<f64>
where
    O: ImplicationOracle + ?Sized,
{
    let score = oracle.implication(from, to);
    if !score.is_finite() || !(-1.0..=1.0).contains(&score) {
        return Err(TruthError::domain(format!("implication({from:?} -> {to:?})"), score));
    }
    Ok(score)
}

/// Source trustworthiness update.
///
/// Closes the feedback loop: a source's trust becomes the mean finalized
/// confidence of everything it asserts, across all subjects. Trust is a
/// source attribute materialized on each row, so every row of a source
/// receives the same value.
use crate::error::Result;
use crate::numeric::{ensure_finite, mean};
use crate::types::{group_rows, ScoredStatement};

/// Recompute every source's trustworthiness as the arithmetic mean of its
/// rows' confidence. Rows are summed in input order.
pub fn update_trustworthiness(rows: &[ScoredStatement]) -> Result<Vec<ScoredStatement>> {
    let mut updated = rows.to_vec();

    for group in group_rows(rows.iter().map(|r| r.source.as_str())) {
        let confidences = group
            .iter()
            .map(|&i| ensure_finite("finalized confidence", rows[i].confidence))
            .collect::<Result<Vec<f64>>>()?;
        // Groups are never empty: each exists because a row created it.
        let Some(trust) = mean(&confidences) else { continue };
        for &i in &group {
            updated[i].trustworthiness = trust;
        }
    }

    Ok(updated)
}

/// Shared numeric helpers.
///
/// Every logarithm and every value that flows between pipeline steps is
/// checked here, at the point of use. A NaN confidence would silently poison
/// every trust estimate downstream, so violations surface as
/// `TruthError::Domain` immediately.
use crate::error::{Result, TruthError};

/// Evidence contributed by one source: `-ln(1 - t)`.
///
/// Accepts `0 <= t < 1`. At `t = 1` the logarithm is undefined; negative or
/// non-finite trust means something upstream already went wrong.
pub fn trust_score(t: f64) -> Result<f64> {
    if !t.is_finite() || !(0.0..1.0).contains(&t) {
        return Err(TruthError::domain("trust score -ln(1 - t)", t));
    }
    Ok(-(-t).ln_1p())
}

/// Logistic function, evaluated so that `exp` never overflows.
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Reject NaN and infinities with a message naming where they appeared.
pub fn ensure_finite(context: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(TruthError::domain(context, value))
    }
}

/// Arithmetic mean, summed left to right. `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: f64 = values.iter().sum();
    Some(sum / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trust_score_matches_closed_form() {
        let s = trust_score(0.9).unwrap();
        assert!((s - -(0.1f64).ln()).abs() < 1e-12);
        assert_eq!(trust_score(0.0).unwrap(), 0.0);
    }

    #[test]
    fn trust_score_rejects_one() {
        let err = trust_score(1.0).unwrap_err();
        assert!(matches!(err, TruthError::Domain { value, .. } if value == 1.0));
    }

    #[test]
    fn trust_score_rejects_out_of_range_and_nan() {
        assert!(trust_score(1.5).is_err());
        assert!(trust_score(-0.1).is_err());
        assert!(trust_score(f64::NAN).is_err());
        assert!(trust_score(f64::INFINITY).is_err());
    }

    #[test]
    fn sigmoid_is_stable_at_extremes() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(-1000.0) >= 0.0);
        assert!(sigmoid(-1000.0).is_finite());
        assert!(sigmoid(1000.0) <= 1.0);
        let x = 2.5;
        assert!((sigmoid(x) + sigmoid(-x) - 1.0).abs() < 1e-15);
    }

    #[test]
    fn mean_is_left_to_right_sum_over_len() {
        assert_eq!(mean(&[0.5, 0.3]), Some(0.4));
        assert_eq!(mean(&[]), None);
    }
}

/// Implication oracles: how strongly believing one claim implies another.
///
/// The engine only ever asks about two distinct claims on the same subject.
/// Oracles are queried many times across iterations with the same arguments,
/// so they must be deterministic for the duration of a run. `Sync` lets the
/// per-subject phase run on worker threads.
use std::collections::HashMap;

/// Scores `imp(from -> to)` in [-1, 1].
///
/// Positive values mean `from` supports `to`, negative values mean it
/// contradicts it, 0 means unrelated.
pub trait ImplicationOracle: Sync {
    fn implication(&self, from: &str, to: &str) -> f64;
}

impl<F> ImplicationOracle for F
where
    F: Fn(&str, &str) -> f64 + Sync,
{
    fn implication(&self, from: &str, to: &str) -> f64 {
        self(from, to)
    }
}

/// Every ordered pair scores the same value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantImplication(pub f64);

impl ImplicationOracle for ConstantImplication {
    fn implication(&self, _from: &str, _to: &str) -> f64 {
        self.0
    }
}

/// Case-insensitive equality: 1.0 for the same text modulo case, else 0.0.
///
/// Identical claims are merged before the oracle is consulted, so this links
/// only claims that differ in capitalization.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseInsensitiveImplication;

impl ImplicationOracle for CaseInsensitiveImplication {
    fn implication(&self, from: &str, to: &str) -> f64 {
        if from.to_lowercase() == to.to_lowercase() {
            1.0
        } else {
            0.0
        }
    }
}

/// Manually curated scores for ordered claim pairs.
#[derive(Debug, Clone, Default)]
pub struct ImplicationTable {
    scores: HashMap<(String, String), f64>,
    default: f64,
}

impl ImplicationTable {
    /// Empty table; unknown pairs score `default`.
    pub fn new(default: f64) -> Self {
        ImplicationTable {
            scores: HashMap::new(),
            default,
        }
    }

    /// Set `imp(from -> to)`. Directional: the reverse pair is untouched.
    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>, score: f64) {
        self.scores.insert((from.into(), to.into()), score);
    }

    /// Set the same score in both directions.
    pub fn insert_symmetric(&mut self, a: &str, b: &str, score: f64) {
        self.insert(a, b, score);
        self.insert(b, a, score);
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl ImplicationOracle for ImplicationTable {
    fn implication(&self, from: &str, to: &str) -> f64 {
        self.scores
            .get(&(from.to_string(), to.to_string()))
            .copied()
            .unwrap_or(self.default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_is_an_oracle() {
        let oracle = |a: &str, b: &str| if a.len() == b.len() { 0.5 } else { -0.5 };
        assert_eq!(oracle.implication("ab", "cd"), 0.5);
        assert_eq!(oracle.implication("ab", "c"), -0.5);
    }

    #[test]
    fn test_constant() {
        assert_eq!(ConstantImplication(1.0).implication("x", "y"), 1.0);
    }

    #[test]
    fn test_case_insensitive_equality() {
        assert_eq!(CaseInsensitiveImplication.implication("Newton", "newton"), 1.0);
        assert_eq!(CaseInsensitiveImplication.implication("Newton", "Galilei"), 0.0);
    }

    #[test]
    fn test_table_is_directional_with_default() {
        let mut table = ImplicationTable::new(0.0);
        table.insert("Einstein", "Albert Einstein", 0.9);
        table.insert_symmetric("Galilei", "Galileo Galilei", 0.7);

        assert_eq!(table.implication("Einstein", "Albert Einstein"), 0.9);
        assert_eq!(table.implication("Albert Einstein", "Einstein"), 0.0);
        assert_eq!(table.implication("Galileo Galilei", "Galilei"), 0.7);
        assert_eq!(table.len(), 3);
    }
}

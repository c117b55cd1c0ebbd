/// Lexical implication oracle: cosine similarity of TF-IDF vectors.
///
/// The vocabulary and document frequencies are fitted once over every
/// statement's claim text (one document per statement row, duplicates
/// included). Text is lower-cased and split into runs of two or more word
/// characters. Terms never seen during fitting are ignored.
use regex::Regex;
use std::collections::HashMap;
use truthfinder_core::{ImplicationOracle, Statement};

/// Sparse, L2-normalized term vector keyed by vocabulary index.
type SparseVector = HashMap<usize, f64>;

pub struct TfidfImplication {
    tokenizer: Regex,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    /// Fitted claims, keyed by lower-cased text.
    cache: HashMap<String, SparseVector>,
}

impl TfidfImplication {
    /// Fit over the claim texts of `statements`.
    pub fn fit(statements: &[Statement]) -> Self {
        Self::fit_documents(statements.iter().map(|s| s.claim.as_str()))
    }

    pub fn fit_documents<'a>(documents: impl IntoIterator<Item = &'a str>) -> Self {
        let tokenizer = Regex::new(r"\b\w\w+\b").expect("token pattern is valid");

        let documents: Vec<String> = documents.into_iter().map(str::to_lowercase).collect();
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut document_frequency: Vec<usize> = Vec::new();

        for doc in &documents {
            let mut seen: Vec<usize> = Vec::new();
            for token in tokenizer.find_iter(doc) {
                let next = vocabulary.len();
                let index = *vocabulary.entry(token.as_str().to_string()).or_insert(next);
                if index == document_frequency.len() {
                    document_frequency.push(0);
                }
                if !seen.contains(&index) {
                    seen.push(index);
                    document_frequency[index] += 1;
                }
            }
        }

        let n = documents.len() as f64;
        let idf = document_frequency
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let mut oracle = Self {
            tokenizer,
            vocabulary,
            idf,
            cache: HashMap::new(),
        };
        for doc in documents {
            if !oracle.cache.contains_key(&doc) {
                let v = oracle.vectorize(&doc);
                oracle.cache.insert(doc, v);
            }
        }
        oracle
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Cosine similarity of two texts. 0.0 when either has no known terms.
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        let (a, b) = (a.to_lowercase(), b.to_lowercase());
        let va = self.lookup(&a);
        let vb = self.lookup(&b);

        // Iterate the smaller vector.
        let (small, large) = if va.len() <= vb.len() { (&*va, &*vb) } else { (&*vb, &*va) };
        let dot: f64 = small
            .iter()
            .filter_map(|(term, x)| large.get(term).map(|y| x * y))
            .sum();
        dot.min(1.0)
    }

    fn lookup(&self, text: &str) -> std::borrow::Cow<'_, SparseVector> {
        match self.cache.get(text) {
            Some(v) => std::borrow::Cow::Borrowed(v),
            None => std::borrow::Cow::Owned(self.vectorize(text)),
        }
    }

    /// `text` must already be lower-cased.
    fn vectorize(&self, text: &str) -> SparseVector {
        let mut v = SparseVector::new();
        for token in self.tokenizer.find_iter(text) {
            if let Some(&index) = self.vocabulary.get(token.as_str()) {
                *v.entry(index).or_insert(0.0) += self.idf[index];
            }
        }

        let norm = v.values().map(|x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            for x in v.values_mut() {
                *x /= norm;
            }
        }
        v
    }
}

impl ImplicationOracle for TfidfImplication {
    fn implication(&self, from: &str, to: &str) -> f64 {
        self.similarity(from, to)
    }
}

/// Benchmark command: measures how well truth discovery recovers a known
/// ground truth compared to a plain majority vote.
///
/// A synthetic dataset is generated from a seed: every subject has one true
/// claim and a few wrong alternatives, every source has a hidden reliability
/// (the probability it asserts the true claim) and covers a random subset of
/// subjects. The engine never sees the reliabilities.
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::time::Instant;
use truthfinder_core::{CaseInsensitiveImplication, EngineConfig, Statement, TrainResult, TruthError, TruthFinder};

use crate::bail;

/// Wrong alternatives available per subject.
const WRONG_CLAIMS_PER_SUBJECT: usize = 3;
/// Probability that a source says anything about a given subject.
const COVERAGE: f64 = 0.7;
const MIN_RELIABILITY: f64 = 0.3;
const MAX_RELIABILITY: f64 = 0.95;

pub struct BenchmarkOptions {
    pub subjects: usize,
    pub sources: usize,
    pub seed: Option<u64>,
    pub iterations: usize,
    pub initial_trustworthiness: f64,
    pub engine: EngineConfig,
}

/// Generated dataset plus the hidden truth behind it.
pub struct SyntheticDataset {
    pub statements: Vec<Statement>,
    pub truth: HashMap<String, String>,
    pub reliability: HashMap<String, f64>,
}

pub fn generate_dataset(subjects: usize, sources: usize, seed: u64) -> SyntheticDataset {
    let mut rng = SmallRng::seed_from_u64(seed);

    let reliability: Vec<(String, f64)> = (0..sources)
        .map(|s| (format!("source-{s:03}"), rng.random_range(MIN_RELIABILITY..MAX_RELIABILITY)))
        .collect();

    let mut statements = Vec::new();
    let mut truth = HashMap::new();
    for k in 0..subjects {
        let subject = format!("subject-{k:04}");
        let true_claim = format!("true-{k}");
        for (source, r) in &reliability {
            if !rng.random_bool(COVERAGE) {
                continue;
            }
            let claim = if rng.random_bool(*r) {
                true_claim.clone()
            } else {
                format!("wrong-{k}-{}", rng.random_range(0..WRONG_CLAIMS_PER_SUBJECT))
            };
            statements.push(Statement::new(source.as_str(), claim, subject.as_str()));
        }
        truth.insert(subject, true_claim);
    }

    SyntheticDataset {
        statements,
        truth,
        reliability: reliability.into_iter().collect(),
    }
}

/// Most frequent claim per subject; ties go to the claim seen first.
pub fn majority_vote(statements: &[Statement]) -> HashMap<String, String> {
    // subject -> [(claim, votes)] in first-appearance order
    let mut votes: HashMap<&str, Vec<(&str, usize)>> = HashMap::new();
    for s in statements {
        let tally = votes.entry(s.subject.as_str()).or_default();
        match tally.iter_mut().find(|(c, _)| *c == s.claim) {
            Some((_, n)) => *n += 1,
            None => tally.push((s.claim.as_str(), 1)),
        }
    }

    votes
        .into_iter()
        .filter_map(|(subject, tally)| {
            let mut best: Option<(&str, usize)> = None;
            for (claim, n) in tally {
                if best.map_or(true, |(_, m)| n > m) {
                    best = Some((claim, n));
                }
            }
            best.map(|(claim, _)| (subject.to_string(), claim.to_string()))
        })
        .collect()
}

/// Fraction of `predicted` subjects whose claim matches `truth`.
pub fn accuracy(predicted: &HashMap<String, String>, truth: &HashMap<String, String>) -> f64 {
    if predicted.is_empty() {
        return 0.0;
    }
    let correct = predicted
        .iter()
        .filter(|(subject, claim)| truth.get(*subject) == Some(*claim))
        .count();
    correct as f64 / predicted.len() as f64
}

/// Spearman rank correlation (average ranks for ties). `None` when either
/// side is constant or there are fewer than two pairs.
pub fn spearman(xs: &[f64], ys: &[f64]) -> Option<f64> {
    assert_eq!(xs.len(), ys.len(), "spearman needs paired samples");
    if xs.len() < 2 {
        return None;
    }
    let rx = ranks(xs);
    let ry = ranks(ys);

    let n = rx.len() as f64;
    let mx = rx.iter().sum::<f64>() / n;
    let my = ry.iter().sum::<f64>() / n;
    let (mut cov, mut vx, mut vy) = (0.0, 0.0, 0.0);
    for (a, b) in rx.iter().zip(&ry) {
        cov += (a - mx) * (b - my);
        vx += (a - mx) * (a - mx);
        vy += (b - my) * (b - my);
    }
    if vx == 0.0 || vy == 0.0 {
        return None;
    }
    Some(cov / (vx * vy).sqrt())
}

fn ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        // Positions i..=j share the average 1-based rank.
        let rank = (i + j) as f64 / 2.0 + 1.0;
        for &k in &order[i..=j] {
            ranks[k] = rank;
        }
        i = j + 1;
    }
    ranks
}

/// Run the benchmark and print the report.
pub fn run_benchmark(options: &BenchmarkOptions) {
    if options.subjects == 0 || options.sources == 0 {
        bail("--subjects and --sources must both be at least 1");
    }
    let seed = options.seed.unwrap_or_else(|| rand::rng().random());

    let dataset = generate_dataset(options.subjects, options.sources, seed);
    eprintln!(
        "Running benchmark: {} subjects x {} sources = {} statements (seed {seed})",
        options.subjects,
        options.sources,
        dataset.statements.len(),
    );

    let finder = TruthFinder::new(CaseInsensitiveImplication, options.engine).unwrap_or_else(|e| bail(e));

    let start = Instant::now();
    let result = finder
        .train(&dataset.statements, options.iterations, options.initial_trustworthiness)
        .unwrap_or_else(|e| match e {
            TruthError::Domain { .. } => bail(format!(
                "{e}\nTrust saturated at 1. With many agreeing sources, \
                 try a lower --dampening or fewer --iterations."
            )),
            other => bail(other),
        });
    let elapsed = start.elapsed().as_secs_f64();
    tracing::info!(elapsed_secs = elapsed, "training finished");

    report(&dataset, &result, options, elapsed);
}

fn report(dataset: &SyntheticDataset, result: &TrainResult, options: &BenchmarkOptions, elapsed: f64) {
    let predicted: HashMap<String, String> = result
        .most_likely()
        .into_iter()
        .map(|c| (c.subject, c.claim))
        .collect();
    let majority = majority_vote(&dataset.statements);

    let sources = result.sources();
    let learned: Vec<f64> = sources.iter().map(|s| s.trustworthiness).collect();
    let hidden: Vec<f64> = sources.iter().map(|s| dataset.reliability[&s.source]).collect();

    println!("── Accuracy ────────────────────────────────────");
    println!("Subjects with statements: {}", predicted.len());
    println!("TruthFinder:           {:.1}%", accuracy(&predicted, &dataset.truth) * 100.0);
    println!("Majority vote:         {:.1}%", accuracy(&majority, &dataset.truth) * 100.0);

    println!();
    println!("── Source Trust ────────────────────────────────");
    match spearman(&learned, &hidden) {
        Some(rho) => println!("Rank correlation with hidden reliability: {rho:.3}"),
        None => println!("(Insufficient data for rank correlation)"),
    }
    if let (Some(top), Some(bottom)) = (sources.first(), sources.last()) {
        println!(
            "Most trusted:  {} ({:.4}, hidden reliability {:.2})",
            top.source, top.trustworthiness, dataset.reliability[&top.source],
        );
        println!(
            "Least trusted: {} ({:.4}, hidden reliability {:.2})",
            bottom.source, bottom.trustworthiness, dataset.reliability[&bottom.source],
        );
    }

    println!();
    println!("── Convergence ─────────────────────────────────");
    for stats in &result.history {
        println!(
            "Iteration {:>3}: max trust change {:.2e}, max confidence change {:.2e}",
            stats.iteration, stats.max_trust_delta, stats.max_confidence_delta,
        );
    }

    println!();
    println!("── Throughput ──────────────────────────────────");
    println!(
        "{} iterations in {:.3}s (γ = {}, ρ = {})",
        result.iterations, elapsed, options.engine.dampening_factor, options.engine.influence_related,
    );
    if elapsed > 0.0 && result.iterations > 0 {
        println!(
            "Statements/sec:        {:.0}",
            (result.statements.len() * result.iterations) as f64 / elapsed
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_is_reproducible_from_seed() {
        let a = generate_dataset(20, 5, 11);
        let b = generate_dataset(20, 5, 11);
        assert_eq!(a.statements, b.statements);
        assert_eq!(a.reliability, b.reliability);
        assert_eq!(a.truth.len(), 20);
        assert!(a.reliability.values().all(|r| (MIN_RELIABILITY..MAX_RELIABILITY).contains(r)));
    }

    #[test]
    fn test_majority_vote_ties_go_to_first_seen() {
        let statements = vec![
            Statement::new("a", "x", "s"),
            Statement::new("b", "y", "s"),
            Statement::new("c", "y", "t"),
        ];
        let votes = majority_vote(&statements);
        assert_eq!(votes["s"], "x");
        assert_eq!(votes["t"], "y");
    }

    #[test]
    fn test_majority_vote_counts() {
        let statements = vec![
            Statement::new("a", "x", "s"),
            Statement::new("b", "y", "s"),
            Statement::new("c", "y", "s"),
        ];
        assert_eq!(majority_vote(&statements)["s"], "y");
    }

    #[test]
    fn test_accuracy() {
        let truth: HashMap<String, String> =
            [("s".to_string(), "x".to_string()), ("t".to_string(), "y".to_string())].into();
        let predicted: HashMap<String, String> =
            [("s".to_string(), "x".to_string()), ("t".to_string(), "z".to_string())].into();
        assert_eq!(accuracy(&predicted, &truth), 0.5);
        assert_eq!(accuracy(&HashMap::new(), &truth), 0.0);
    }

    #[test]
    fn test_spearman() {
        let perfect = spearman(&[0.1, 0.5, 0.9], &[1.0, 2.0, 3.0]).unwrap();
        assert!((perfect - 1.0).abs() < 1e-12);
        let inverse = spearman(&[0.1, 0.5, 0.9], &[30.0, 20.0, 10.0]).unwrap();
        assert!((inverse + 1.0).abs() < 1e-12);
        assert!(spearman(&[0.5, 0.5], &[1.0, 2.0]).is_none());
        assert!(spearman(&[0.5], &[1.0]).is_none());
    }

    #[test]
    fn test_ranks_average_ties() {
        assert_eq!(ranks(&[3.0, 1.0, 3.0, 2.0]), vec![3.5, 1.0, 3.5, 2.0]);
    }

    #[test]
    fn test_truthfinder_recovers_truth_on_synthetic_data() {
        let dataset = generate_dataset(100, 8, 3);
        let finder = TruthFinder::new(
            CaseInsensitiveImplication,
            EngineConfig { dampening_factor: 0.1, influence_related: 0.5 },
        )
        .unwrap();
        let result = finder.train(&dataset.statements, 5, 0.9).unwrap();
        let predicted: HashMap<String, String> =
            result.most_likely().into_iter().map(|c| (c.subject, c.claim)).collect();
        assert!(accuracy(&predicted, &dataset.truth) > 0.65);
    }
}

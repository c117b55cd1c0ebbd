//! Closed-form checks of each pipeline step on the "scientists" dataset.

use truthfinder_core::{
    adjust_confidence, calculate_confidence, finalize_confidence, update_trustworthiness, ConstantImplication,
    EngineConfig, ScoredStatement, Statement, TruthFinder,
};

const DAMPENING: f64 = 0.1;
const INFLUENCE: f64 = 0.5;
const INITIAL_TRUST: f64 = 0.9;

fn statements() -> Vec<Statement> {
    vec![
        Statement::new("a", "Einstein", "Special relativity"),
        Statement::new("a", "Newton", "Universal gravitation"),
        Statement::new("b", "Einstein", "Special relativity"),
        Statement::new("b", "Galilei", "Heliocentrism"),
        Statement::new("c", "Newton", "Special relativity"),
        Statement::new("c", "Galilei", "Universal gravitation"),
        Statement::new("c", "Einstein", "Heliocentrism"),
    ]
}

/// The table as seeded, with hand-set confidences per row.
fn seeded_table() -> Vec<ScoredStatement> {
    let confidences = [0.5, 0.3, 0.6, 0.8, 0.1, 0.0, 0.8];
    statements()
        .iter()
        .zip(confidences)
        .map(|(s, c)| ScoredStatement::new(s, INITIAL_TRUST, c))
        .collect()
}

fn finder() -> TruthFinder<ConstantImplication> {
    TruthFinder::new(
        ConstantImplication(1.0),
        EngineConfig { dampening_factor: DAMPENING, influence_related: INFLUENCE },
    )
    .unwrap()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn special_relativity_step_by_step() {
    let group: Vec<ScoredStatement> = seeded_table()
        .into_iter()
        .filter(|r| r.subject == "Special relativity")
        .collect();
    assert_eq!(group.len(), 3);

    // Einstein is asserted by a and b, Newton by c alone.
    let a1 = -2.0 * (0.1f64).ln();
    let a2 = -(0.1f64).ln();

    let raw = calculate_confidence(&group).unwrap();
    for row in &raw {
        match row.claim.as_str() {
            "Einstein" => assert_close(row.confidence, a1),
            "Newton" => assert_close(row.confidence, a2),
            other => panic!("unexpected claim {other}"),
        }
    }

    let c1 = a1 + INFLUENCE * a2;
    let c2 = a2 + INFLUENCE * a1;

    let adjusted = adjust_confidence(&raw, &ConstantImplication(1.0), INFLUENCE).unwrap();
    for row in &adjusted {
        match row.claim.as_str() {
            "Einstein" => assert_close(row.confidence, c1),
            _ => assert_close(row.confidence, c2),
        }
    }

    let finalized = finalize_confidence(&adjusted, DAMPENING).unwrap();
    for row in &finalized {
        match row.claim.as_str() {
            "Einstein" => assert_close(row.confidence, 1.0 / (1.0 + (-DAMPENING * c1).exp())),
            _ => assert_close(row.confidence, 1.0 / (1.0 + (-DAMPENING * c2).exp())),
        }
    }

    // The engine's subject pipeline is the same three steps.
    assert_eq!(finder().process_subject(&group).unwrap(), finalized);
}

#[test]
fn trust_update_is_exact_mean() {
    let updated = update_trustworthiness(&seeded_table()).unwrap();
    let trust_of = |source: &str| -> Vec<f64> {
        updated
            .iter()
            .filter(|r| r.source == source)
            .map(|r| r.trustworthiness)
            .collect()
    };

    assert!(trust_of("a").iter().all(|&t| t == 0.4));
    assert!(trust_of("b").iter().all(|&t| t == 0.7));
    assert!(trust_of("c").iter().all(|&t| t == 0.3));
}

#[test]
fn single_iteration_without_influence() {
    let finder = TruthFinder::new(
        ConstantImplication(1.0),
        EngineConfig { dampening_factor: DAMPENING, influence_related: 0.0 },
    )
    .unwrap();
    let result = finder.train(&statements(), 1, INITIAL_TRUST).unwrap();

    let evidence = -(1.0 - INITIAL_TRUST).ln();
    let sig = |x: f64| 1.0 / (1.0 + (-DAMPENING * x).exp());
    let expected = [
        sig(2.0 * evidence),
        sig(evidence),
        sig(2.0 * evidence),
        sig(evidence),
        sig(evidence),
        sig(evidence),
        sig(evidence),
    ];
    for (row, want) in result.statements.iter().zip(expected) {
        assert_close(row.confidence, want);
    }
    assert_close(result.statements[0].trustworthiness, (expected[0] + expected[1]) / 2.0);
    assert_close(result.statements[2].trustworthiness, (expected[2] + expected[3]) / 2.0);
    assert_close(
        result.statements[4].trustworthiness,
        (expected[4] + expected[5] + expected[6]) / 3.0,
    );
}

#[test]
fn zero_iterations_returns_seed() {
    let result = finder().train(&statements(), 0, 0.42).unwrap();
    assert!(result.statements.iter().all(|r| r.trustworthiness == 0.42 && r.confidence == 0.0));
}

#[test]
fn near_duplicate_claims_stay_separate() {
    // "Einstein" and "Albert Einstein" are different claims: each keeps its
    // own evidence and only influences the other through the oracle.
    let statements = vec![
        Statement::new("a", "Einstein", "Special relativity"),
        Statement::new("b", "Albert Einstein", "Special relativity"),
    ];
    let finder = TruthFinder::new(
        ConstantImplication(0.0),
        EngineConfig { dampening_factor: DAMPENING, influence_related: INFLUENCE },
    )
    .unwrap();
    let result = finder.train(&statements, 1, INITIAL_TRUST).unwrap();

    let single = 1.0 / (1.0 + (DAMPENING * (0.1f64).ln()).exp());
    assert_eq!(result.claims().len(), 2);
    assert_close(result.statements[0].confidence, single);
    assert_close(result.statements[1].confidence, single);
}

#[test]
fn trust_reaching_one_aborts_training() {
    // Three sources agreeing under a steep sigmoid: confidence saturates to
    // exactly 1.0 by the second iteration, so the third one's logarithm is
    // undefined.
    let statements = vec![
        Statement::new("a", "x", "s"),
        Statement::new("b", "x", "s"),
        Statement::new("c", "x", "s"),
    ];
    let finder = TruthFinder::new(
        ConstantImplication(1.0),
        EngineConfig { dampening_factor: 0.9, influence_related: 0.0 },
    )
    .unwrap();

    let mut run = finder.start(&statements, 0.999).unwrap();
    run.step().unwrap();
    run.step().unwrap();
    assert!(run.rows().iter().all(|r| r.trustworthiness == 1.0));

    let err = finder.train(&statements, 5, 0.999).unwrap_err();
    assert!(matches!(err, truthfinder_core::TruthError::Domain { .. }), "{err}");
}

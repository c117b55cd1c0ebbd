/// Truth-discovery engine orchestrator.
///
/// One iteration = {calculate → adjust → finalize} for every subject, then a
/// single global trust update. Pure computation: no IO, and nothing survives
/// between `train` calls.
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::adjustment::adjust_confidence;
use crate::confidence::{calculate_confidence, finalize_confidence};
use crate::constants::{DEFAULT_DAMPENING_FACTOR, DEFAULT_INFLUENCE_RELATED};
use crate::error::{Result, TruthError};
use crate::implication::ImplicationOracle;
use crate::trustworthiness::update_trustworthiness;
use crate::types::{group_rows, IterationStats, ScoredStatement, Statement, TrainOptions, TrainResult};

/// Tuning constants, validated once at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// γ in (0, 1): steepness of the confidence sigmoid.
    pub dampening_factor: f64,
    /// ρ in [0, 1]: weight of related claims during adjustment.
    pub influence_related: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            dampening_factor: DEFAULT_DAMPENING_FACTOR,
            influence_related: DEFAULT_INFLUENCE_RELATED,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        let gamma = self.dampening_factor;
        if !(gamma > 0.0 && gamma < 1.0) {
            return Err(TruthError::Configuration {
                parameter: "dampening_factor",
                value: gamma,
                expected: "0 < dampening_factor < 1",
            });
        }
        let rho = self.influence_related;
        if !(0.0..=1.0).contains(&rho) {
            return Err(TruthError::Configuration {
                parameter: "influence_related",
                value: rho,
                expected: "0 <= influence_related <= 1",
            });
        }
        Ok(())
    }
}

/// Where a [`TrainingRun`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Statements accepted, scratch columns not yet seeded.
    Uninitialized,
    /// Seeded; `iteration` iterations completed so far.
    Running { iteration: usize },
    /// Finished after `iterations` iterations. Reached only through `finish()`;
    /// there is no convergence-based stop.
    Stopped { iterations: usize },
}

pub struct TruthFinder<O> {
    oracle: O,
    config: EngineConfig,
}

impl<O: ImplicationOracle> TruthFinder<O> {
    /// Build an engine. Out-of-range tuning constants are rejected here,
    /// never clamped.
    pub fn new(oracle: O, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(TruthFinder { oracle, config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Run `n_iterations` fixed iterations from a uniform trust seed.
    ///
    /// Any domain error aborts the whole call; no partial result is returned.
    pub fn train(
        &self,
        statements: &[Statement],
        n_iterations: usize,
        initial_trustworthiness: f64,
    ) -> Result<TrainResult> {
        let mut run = self.start(statements, initial_trustworthiness)?;
        for _ in 0..n_iterations {
            run.step()?;
        }
        run.finish()
    }

    /// `train()` with an options struct.
    pub fn train_with(&self, statements: &[Statement], options: &TrainOptions) -> Result<TrainResult> {
        self.train(statements, options.iterations, options.initial_trustworthiness)
    }

    /// Validate the statements and seed a run, ready to `step()`.
    pub fn start(&self, statements: &[Statement], initial_trustworthiness: f64) -> Result<TrainingRun<'_, O>> {
        let mut run = TrainingRun::new(self, statements)?;
        run.initialize(initial_trustworthiness)?;
        Ok(run)
    }

    /// Calculator → adjuster → finalizer over one subject's rows.
    pub fn process_subject(&self, rows: &[ScoredStatement]) -> Result<Vec<ScoredStatement>> {
        let raw = calculate_confidence(rows)?;
        let adjusted = adjust_confidence(&raw, &self.oracle, self.config.influence_related)?;
        finalize_confidence(&adjusted, self.config.dampening_factor)
    }

    /// The per-subject phase over the whole table. Subjects are independent
    /// and all read the same trust snapshot.
    pub fn update_fact_confidence(&self, rows: &[ScoredStatement]) -> Result<Vec<ScoredStatement>> {
        let subjects = group_rows(rows.iter().map(|r| r.subject.as_str()));
        self.update_subjects(rows, &subjects)
    }

    /// One full iteration: per-subject phase, then the global trust update.
    pub fn iteration(&self, rows: &[ScoredStatement]) -> Result<Vec<ScoredStatement>> {
        let confident = self.update_fact_confidence(rows)?;
        update_trustworthiness(&confident)
    }

    fn update_subjects(&self, rows: &[ScoredStatement], subjects: &[Vec<usize>]) -> Result<Vec<ScoredStatement>> {
        let process = |group: &Vec<usize>| -> Result<Vec<ScoredStatement>> {
            let slice: Vec<ScoredStatement> = group.iter().map(|&i| rows[i].clone()).collect();
            trace!(subject = %slice[0].subject, rows = slice.len(), "processing subject");
            self.process_subject(&slice)
        };

        #[cfg(feature = "parallel")]
        let processed: Vec<Vec<ScoredStatement>> = subjects.par_iter().map(process).collect::<Result<_>>()?;
        #[cfg(not(feature = "parallel"))]
        let processed: Vec<Vec<ScoredStatement>> = subjects.iter().map(process).collect::<Result<_>>()?;

        // Barrier: every subject is finalized before anything is written back.
        let mut out = rows.to_vec();
        for (group, new_rows) in subjects.iter().zip(processed) {
            for (&i, row) in group.iter().zip(new_rows) {
                out[i] = row;
            }
        }
        Ok(out)
    }
}

/// A training run driven one iteration at a time.
///
/// `TruthFinder::train` is `start` + `step` × n + `finish`; use this directly
/// to inspect intermediate estimates.
pub struct TrainingRun<'a, O> {
    finder: &'a TruthFinder<O>,
    rows: Vec<ScoredStatement>,
    /// Row indices per subject. Fixed for the run: statements never move.
    subjects: Vec<Vec<usize>>,
    state: EngineState,
    history: Vec<IterationStats>,
}

impl<'a, O: ImplicationOracle> TrainingRun<'a, O> {
    /// Accept a statement set. Malformed rows are rejected before anything
    /// else happens.
    pub fn new(finder: &'a TruthFinder<O>, statements: &[Statement]) -> Result<Self> {
        for (row, statement) in statements.iter().enumerate() {
            statement.validate(row)?;
        }
        let rows: Vec<ScoredStatement> = statements.iter().map(|s| ScoredStatement::new(s, 0.0, 0.0)).collect();
        let subjects = group_rows(rows.iter().map(|r| r.subject.as_str()));

        Ok(TrainingRun {
            finder,
            rows,
            subjects,
            state: EngineState::Uninitialized,
            history: Vec::new(),
        })
    }

    /// Seed every row with `initial_trustworthiness` and zero confidence.
    /// Calling this again restarts the run from scratch.
    pub fn initialize(&mut self, initial_trustworthiness: f64) -> Result<()> {
        let t = initial_trustworthiness;
        if !(t > 0.0 && t < 1.0) {
            return Err(TruthError::Domain {
                context: "initial trustworthiness (expected 0 < t < 1)".to_string(),
                value: t,
            });
        }
        for row in &mut self.rows {
            row.trustworthiness = t;
            row.confidence = 0.0;
        }
        self.history.clear();
        self.state = EngineState::Running { iteration: 0 };
        debug!(
            statements = self.rows.len(),
            subjects = self.subjects.len(),
            initial_trustworthiness = t,
            "training run initialized"
        );
        Ok(())
    }

    /// Run one iteration. On error the current estimates are left as they
    /// were before the call. Only a `Running` run can step.
    pub fn step(&mut self) -> Result<IterationStats> {
        let EngineState::Running { iteration } = self.state else {
            return Err(TruthError::InvalidState { operation: "step", state: self.state });
        };

        let confident = self.finder.update_subjects(&self.rows, &self.subjects)?;
        let next = update_trustworthiness(&confident)?;

        let stats = IterationStats {
            iteration: iteration + 1,
            max_trust_delta: max_delta(&self.rows, &next, |r| r.trustworthiness),
            max_confidence_delta: max_delta(&self.rows, &next, |r| r.confidence),
        };
        debug!(
            iteration = stats.iteration,
            max_trust_delta = stats.max_trust_delta,
            max_confidence_delta = stats.max_confidence_delta,
            "iteration complete"
        );

        self.rows = next;
        self.history.push(stats);
        self.state = EngineState::Running { iteration: iteration + 1 };
        Ok(stats)
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Current snapshot of the table.
    pub fn rows(&self) -> &[ScoredStatement] {
        &self.rows
    }

    pub fn history(&self) -> &[IterationStats] {
        &self.history
    }

    /// Stop the run and hand back the annotated statements. A stopped run
    /// no longer steps; finishing it again returns the same result. A run
    /// that was never initialized has nothing to hand back.
    pub fn finish(&mut self) -> Result<TrainResult> {
        let iterations = match self.state {
            EngineState::Running { iteration } => iteration,
            EngineState::Stopped { iterations } => iterations,
            EngineState::Uninitialized => {
                return Err(TruthError::InvalidState { operation: "finish", state: self.state });
            }
        };
        if self.state != (EngineState::Stopped { iterations }) {
            debug!(iterations, "training run stopped");
        }
        self.state = EngineState::Stopped { iterations };

        Ok(TrainResult {
            statements: self.rows.clone(),
            iterations,
            history: self.history.clone(),
        })
    }
}

fn max_delta(before: &[ScoredStatement], after: &[ScoredStatement], field: impl Fn(&ScoredStatement) -> f64) -> f64 {
    before
        .iter()
        .zip(after)
        .map(|(b, a)| (field(a) - field(b)).abs())
        .fold(0.0_f64, f64::max)
}

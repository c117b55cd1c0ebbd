/// Default dampening factor (γ) for the confidence sigmoid.
///
/// Small values flatten the curve so confidence saturates slowly across
/// iterations. Must lie strictly inside (0, 1).
pub const DEFAULT_DAMPENING_FACTOR: f64 = 0.3;

/// Default weight (ρ) of related claims when adjusting confidence.
/// 0 disables cross-claim influence entirely.
pub const DEFAULT_INFLUENCE_RELATED: f64 = 0.5;

/// Trustworthiness seeded onto every source before the first iteration.
pub const DEFAULT_INITIAL_TRUSTWORTHINESS: f64 = 0.9;

/// Number of fixed iterations run when the caller does not choose one.
///
/// There is no convergence-based early stop; callers pick this empirically.
pub const DEFAULT_ITERATIONS: usize = 10;

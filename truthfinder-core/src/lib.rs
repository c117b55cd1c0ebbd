//! truthfinder-core: iterative truth discovery.
//!
//! Many sources make conflicting claims about the same subjects. The engine
//! estimates how trustworthy each source is and how likely each claim is to
//! be true by alternating two updates until the caller's iteration budget is
//! spent: claim confidence from source trust, then source trust from claim
//! confidence. The core does no IO; callers supply the implication oracle.
//!
//! # Quick start
//!
//! ```rust
//! use truthfinder_core::{ConstantImplication, EngineConfig, Statement, TruthFinder};
//!
//! let statements = vec![
//!     Statement::new("a", "Einstein", "Special relativity"),
//!     Statement::new("b", "Einstein", "Special relativity"),
//!     Statement::new("c", "Newton", "Special relativity"),
//! ];
//!
//! let finder = TruthFinder::new(
//!     ConstantImplication(0.0),
//!     EngineConfig { dampening_factor: 0.3, influence_related: 0.5 },
//! ).unwrap();
//!
//! let result = finder.train(&statements, 10, 0.9).unwrap();
//!
//! let best = &result.most_likely()[0];
//! assert_eq!(best.claim, "Einstein");
//!
//! for s in result.sources() {
//!     println!("{}: {:.4}", s.source, s.trustworthiness);
//! }
//! ```

pub mod adjustment;
pub mod confidence;
pub mod constants;
pub mod engine;
pub mod error;
pub mod implication;
pub mod numeric;
pub mod trustworthiness;
pub mod types;

// Re-export primary public API at crate root.
pub use adjustment::adjust_confidence;
pub use confidence::{calculate_confidence, finalize_confidence};
pub use engine::{EngineConfig, EngineState, TrainingRun, TruthFinder};
pub use error::{Result, TruthError};
pub use implication::{ConstantImplication, CaseInsensitiveImplication, ImplicationOracle, ImplicationTable};
pub use trustworthiness::update_trustworthiness;
pub use types::{
    ClaimEstimate, IterationStats, ScoredStatement, SourceEstimate, Statement, TrainOptions, TrainResult,
};

//! Cartesian genetic programming with a (1+λ) evolution strategy.
//!
//! Programs are fixed-size DAGs of function nodes ([`Genome`]). Each
//! generation the [`EvolutionEngine`] mutates the parent into λ offspring,
//! evaluates those whose active subgraph differs from the parent's in
//! parallel, and keeps the best offspring if it is at least as fit.

pub mod config;
pub mod engines;
pub mod error;
pub mod functions;
pub mod types;

pub use config::{CgpOptions, EvolutionConfig};
pub use engines::generation::{EvolutionEngine, GenerationSummary, Genome, GenomeShape, Node};
pub use error::{CgpError, Result};
pub use functions::FunctionCatalog;
pub use types::{ConstantGenerator, Evaluator, Fingerprint, UNEVALUATED};

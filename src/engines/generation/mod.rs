pub mod genome;
pub mod active;
pub mod fingerprint;
pub mod operators;
pub mod evolution_engine;
pub mod progress;

pub use genome::{Genome, GenomeShape, Node};
pub use evolution_engine::{EvolutionEngine, GenerationSummary, ProgressCallback};
pub use progress::{ChannelProgressCallback, ConsoleProgressCallback, ProgressMessage};

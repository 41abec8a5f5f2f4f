use super::evolution::EvolutionConfig;
use crate::engines::generation::Genome;
use crate::functions::FunctionCatalog;
use crate::types::{ConstantGenerator, Evaluator};
use rand::rngs::StdRng;
use std::sync::Arc;

/// Everything an [`EvolutionEngine`](crate::engines::generation::EvolutionEngine)
/// needs: the numeric settings plus the caller-supplied collaborators.
#[derive(Clone)]
pub struct CgpOptions {
    pub config: EvolutionConfig,
    pub functions: FunctionCatalog,
    pub constant: ConstantGenerator,
    pub evaluator: Evaluator,
    /// Explicit random source; falls back to `config.seed`, then entropy
    pub rng: Option<StdRng>,
}

impl CgpOptions {
    pub fn new<C, E>(
        config: EvolutionConfig,
        functions: FunctionCatalog,
        constant: C,
        evaluator: E,
    ) -> Self
    where
        C: Fn(&mut StdRng) -> f64 + Send + Sync + 'static,
        E: Fn(&Genome) -> f64 + Send + Sync + 'static,
    {
        Self {
            config,
            functions,
            constant: Arc::new(constant),
            evaluator: Arc::new(evaluator),
            rng: None,
        }
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Some(rng);
        self
    }
}

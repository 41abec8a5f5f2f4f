use crate::config::{CgpOptions, ConfigSection, EvolutionConfig};
use crate::engines::generation::{
    genome::{Genome, GenomeShape},
    operators::mutate,
};
use crate::error::{CgpError, Result};
use crate::types::{ConstantGenerator, Evaluator};
use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

/// What happened during one call to [`EvolutionEngine::run_generation`]
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSummary {
    /// Generations completed, including this one
    pub generation: usize,
    /// Offspring that inherited the parent's fitness through a fingerprint match
    pub cache_hits: usize,
    /// Offspring sent to the evaluator
    pub evaluations: usize,
    pub best_offspring_fitness: f64,
    /// Parent fitness after selection
    pub parent_fitness: f64,
    /// The parent was replaced by an offspring (better or equal)
    pub replaced: bool,
    /// The replacement was strictly better
    pub improved: bool,
}

pub trait ProgressCallback {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, summary: &GenerationSummary);
}

/// Index of the lowest fitness. Earlier indices win ties and NaN ranks
/// behind every number, so it is only chosen when nothing else is left.
pub(crate) fn select_best(fitnesses: &[f64]) -> usize {
    let ranks_before = |a: f64, b: f64| match (a.is_nan(), b.is_nan()) {
        (false, true) => true,
        (false, false) => a < b,
        _ => false,
    };

    let mut best = 0;
    for (i, &fitness) in fitnesses.iter().enumerate().skip(1) {
        if ranks_before(fitness, fitnesses[best]) {
            best = i;
        }
    }
    best
}

/// (1+λ) evolution strategy over a single parent genome.
///
/// The engine never stops by itself: callers drive it with
/// [`run_generation`](Self::run_generation) or hand their own limits to
/// [`run`](Self::run).
pub struct EvolutionEngine {
    config: EvolutionConfig,
    constant: ConstantGenerator,
    evaluator: Evaluator,
    rng: StdRng,
    parent: Genome,
    generation: usize,
    num_evaluations: usize,
}

impl EvolutionEngine {
    /// Validate the options, draw a random parent and evaluate it once
    pub fn new(options: CgpOptions) -> Result<Self> {
        let CgpOptions {
            config,
            functions,
            constant,
            evaluator,
            rng,
        } = options;

        config.validate()?;
        if functions.is_empty() {
            return Err(CgpError::Configuration(
                "At least one function must be provided".to_string(),
            ));
        }

        let mut rng = match (rng, config.seed) {
            (Some(rng), _) => rng,
            (None, Some(seed)) => StdRng::seed_from_u64(seed),
            (None, None) => StdRng::from_entropy(),
        };

        let mut parent = Genome::random(GenomeShape::from(&config), functions, &constant, &mut rng)?;
        let fitness = evaluator(&parent);
        parent.set_fitness(fitness);

        info!(
            "Evolution engine ready: λ = {}, {} nodes, {} inputs, {} outputs, initial fitness {}",
            config.population_size - 1,
            config.num_nodes,
            config.num_inputs,
            config.num_outputs,
            fitness
        );

        Ok(Self {
            config,
            constant,
            evaluator,
            rng,
            parent,
            generation: 0,
            num_evaluations: 1,
        })
    }

    /// Mutate, evaluate in parallel, select
    pub fn run_generation(&mut self) -> GenerationSummary {
        let lambda = self.config.population_size - 1;

        // The random source is only ever touched here, sequentially
        let mut offspring: Vec<Genome> = (0..lambda)
            .map(|_| {
                mutate(
                    &self.parent,
                    self.config.mutation_rate,
                    &self.constant,
                    &mut self.rng,
                )
            })
            .collect();

        let parent_fingerprint = self.parent.fingerprint();
        let parent_fitness = self.parent.fitness();
        let dispatch: Vec<bool> = offspring
            .iter_mut()
            .map(|child| {
                if child.fingerprint() == parent_fingerprint {
                    child.set_fitness(parent_fitness);
                    false
                } else {
                    true
                }
            })
            .collect();

        let evaluations = dispatch.iter().filter(|&&d| d).count();
        let cache_hits = lambda - evaluations;

        // Fork-join: every task owns exactly one offspring slot
        let evaluator = &self.evaluator;
        offspring
            .par_iter_mut()
            .zip(dispatch.par_iter())
            .filter(|(_, dispatched)| **dispatched)
            .for_each(|(child, _)| {
                let fitness = evaluator(&*child);
                child.set_fitness(fitness);
            });

        self.num_evaluations += evaluations;
        self.generation += 1;

        let fitnesses: Vec<f64> = offspring.iter().map(Genome::fitness).collect();
        let best = select_best(&fitnesses);
        let best_offspring_fitness = offspring[best].fitness();

        // Equal fitness also replaces: lets the parent drift across neutral genomes
        let replaced = best_offspring_fitness <= parent_fitness;
        let improved = best_offspring_fitness < parent_fitness;
        if replaced {
            self.parent = offspring.swap_remove(best);
            if improved {
                info!(
                    "Generation {}: fitness improved {} -> {}",
                    self.generation, parent_fitness, best_offspring_fitness
                );
            } else {
                trace!("Generation {}: neutral drift", self.generation);
            }
        }

        debug!(
            "Generation {}: {} evaluated, {} cache hits, parent fitness {}",
            self.generation,
            evaluations,
            cache_hits,
            self.parent.fitness()
        );

        GenerationSummary {
            generation: self.generation,
            cache_hits,
            evaluations,
            best_offspring_fitness,
            parent_fitness: self.parent.fitness(),
            replaced,
            improved,
        }
    }

    /// Run until `max_generations` more generations have passed or the parent
    /// reaches `target_fitness`. Returns the number of generations executed.
    pub fn run<C: ProgressCallback>(
        &mut self,
        max_generations: usize,
        target_fitness: Option<f64>,
        callback: &mut C,
    ) -> usize {
        let mut executed = 0;
        while executed < max_generations {
            if target_fitness.is_some_and(|target| self.fitness() <= target) {
                break;
            }
            callback.on_generation_start(self.generation);
            let summary = self.run_generation();
            callback.on_generation_complete(&summary);
            executed += 1;
        }
        executed
    }

    /// Best genome found so far
    pub fn parent(&self) -> &Genome {
        &self.parent
    }

    /// The surviving population between generations; the parent is always at index 0
    pub fn population(&self) -> &[Genome] {
        std::slice::from_ref(&self.parent)
    }

    pub fn fitness(&self) -> f64 {
        self.parent.fitness()
    }

    /// Run the current best program on new inputs
    pub fn execute(&self, inputs: &[f64]) -> Result<Vec<f64>> {
        self.parent.execute(inputs)
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Evaluator invocations so far, including the initial parent
    pub fn num_evaluations(&self) -> usize {
        self.num_evaluations
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::primitives;
    use rand::Rng;

    fn options(population_size: usize, seed: u64) -> CgpOptions {
        let config = EvolutionConfig {
            population_size,
            num_nodes: 10,
            mutation_rate: 0.05,
            num_inputs: 2,
            num_outputs: 1,
            max_arity: 2,
            seed: Some(seed),
        };
        CgpOptions::new(
            config,
            primitives::arithmetic(),
            |rng: &mut StdRng| rng.gen_range(-1.0..1.0),
            |genome: &Genome| {
                let out = genome.execute(&[1.0, 2.0]).unwrap_or_default();
                (out.first().copied().unwrap_or(0.0) - 5.0).abs()
            },
        )
    }

    #[test]
    fn test_new_evaluates_initial_parent() {
        let engine = EvolutionEngine::new(options(4, 1)).unwrap();
        assert!(engine.parent().is_evaluated());
        assert_eq!(engine.num_evaluations(), 1);
        assert_eq!(engine.generation(), 0);
        assert_eq!(engine.population().len(), 1);
    }

    #[test]
    fn test_new_rejects_invalid_options() {
        let mut bad = options(4, 1);
        bad.config.population_size = 1;
        assert!(matches!(
            EvolutionEngine::new(bad),
            Err(CgpError::Configuration(_))
        ));

        let mut empty = options(4, 1);
        empty.functions = crate::functions::FunctionCatalog::new();
        assert!(matches!(
            EvolutionEngine::new(empty),
            Err(CgpError::Configuration(_))
        ));
    }

    #[test]
    fn test_summary_accounts_for_every_offspring() {
        let mut engine = EvolutionEngine::new(options(6, 2)).unwrap();
        for _ in 0..50 {
            let before = engine.num_evaluations();
            let summary = engine.run_generation();
            assert_eq!(summary.cache_hits + summary.evaluations, 5);
            assert_eq!(engine.num_evaluations() - before, summary.evaluations);
        }
        assert_eq!(engine.generation(), 50);
    }

    #[test]
    fn test_fitness_never_gets_worse() {
        let mut engine = EvolutionEngine::new(options(5, 3)).unwrap();
        let mut previous = engine.fitness();
        for _ in 0..200 {
            let summary = engine.run_generation();
            assert!(summary.parent_fitness <= previous);
            previous = summary.parent_fitness;
        }
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = EvolutionEngine::new(options(5, 77)).unwrap();
        let mut b = EvolutionEngine::new(options(5, 77)).unwrap();
        for _ in 0..30 {
            assert_eq!(a.run_generation(), b.run_generation());
        }
        assert_eq!(a.parent().fingerprint(), b.parent().fingerprint());
    }

    #[test]
    fn test_explicit_rng_overrides_seed() {
        let mut opts = options(5, 1);
        opts.config.seed = None;
        let a = EvolutionEngine::new(opts.clone().with_rng(StdRng::seed_from_u64(8))).unwrap();
        let b = EvolutionEngine::new(opts.with_rng(StdRng::seed_from_u64(8))).unwrap();
        assert_eq!(a.parent().nodes(), b.parent().nodes());
    }

    #[test]
    fn test_select_best_prefers_lowest_then_earliest() {
        assert_eq!(select_best(&[3.0, 1.0, 2.0, 1.0]), 1);
        assert_eq!(select_best(&[2.0, 2.0, 2.0]), 0);
        assert_eq!(select_best(&[5.0]), 0);
    }

    #[test]
    fn test_select_best_ranks_nan_last() {
        assert_eq!(select_best(&[f64::NAN, 0.5, 0.5]), 1);
        assert_eq!(select_best(&[f64::NAN, f64::NAN, 4.0]), 2);
        assert_eq!(select_best(&[1.0, f64::NAN, 0.25]), 2);
        assert_eq!(select_best(&[f64::INFINITY, f64::NAN]), 0);
        assert_eq!(select_best(&[f64::NAN, f64::NAN]), 0);
    }

    struct Recorder {
        starts: Vec<usize>,
        completed: Vec<usize>,
    }

    impl ProgressCallback for Recorder {
        fn on_generation_start(&mut self, generation: usize) {
            self.starts.push(generation);
        }

        fn on_generation_complete(&mut self, summary: &GenerationSummary) {
            self.completed.push(summary.generation);
        }
    }

    #[test]
    fn test_run_respects_generation_limit() {
        let mut engine = EvolutionEngine::new(options(3, 4)).unwrap();
        let mut recorder = Recorder {
            starts: Vec::new(),
            completed: Vec::new(),
        };

        let executed = engine.run(7, Some(f64::NEG_INFINITY), &mut recorder);
        assert_eq!(executed, 7);
        assert_eq!(recorder.starts, (0..7).collect::<Vec<_>>());
        assert_eq!(recorder.completed, (1..=7).collect::<Vec<_>>());
    }

    #[test]
    fn test_run_stops_at_target() {
        let mut engine = EvolutionEngine::new(options(3, 4)).unwrap();
        let mut recorder = Recorder {
            starts: Vec::new(),
            completed: Vec::new(),
        };

        // Any fitness satisfies an infinite target before the first generation
        let executed = engine.run(100, Some(f64::INFINITY), &mut recorder);
        assert_eq!(executed, 0);
        assert!(recorder.starts.is_empty());
    }
}

use anyhow::{ensure, Context, Result};
use cgp::config::ConfigManager;
use cgp::engines::generation::ConsoleProgressCallback;
use cgp::functions::primitives;
use cgp::{CgpOptions, EvolutionEngine, Genome};
use std::env;

/// Evolves a program that reverses its inputs: `[1, 2, .., n] -> [n, .., 2, 1]`.
fn main() -> Result<()> {
    env_logger::init();

    let manager = ConfigManager::new();
    if let Some(path) = env::args().nth(1) {
        manager
            .load_from_file(&path)
            .with_context(|| format!("loading {}", path))?;
    }
    let config = manager.get();

    let n = config.evolution.num_inputs;
    ensure!(
        config.evolution.num_outputs == n,
        "input reversal needs as many outputs as inputs ({} vs {})",
        config.evolution.num_outputs,
        n
    );

    let inputs: Vec<f64> = (1..=n).map(|i| i as f64).collect();
    let expected: Vec<f64> = inputs.iter().rev().copied().collect();
    let probe = inputs.clone();

    // One point per wrong output; 0 is a perfect program
    let evaluator = move |genome: &Genome| match genome.execute(&probe) {
        Ok(outputs) => outputs
            .iter()
            .zip(&expected)
            .filter(|(got, want)| got != want)
            .count() as f64,
        Err(_) => f64::INFINITY,
    };

    let options = CgpOptions::new(
        config.evolution.clone(),
        primitives::pass_through(),
        |_: &mut rand::rngs::StdRng| 0.0,
        evaluator,
    );
    let mut engine = EvolutionEngine::new(options)?;

    let mut progress = ConsoleProgressCallback::new(config.run.log_every);
    let target = config.run.target_fitness.or(Some(0.0));
    let generations = engine.run(config.run.max_generations, target, &mut progress);

    println!(
        "Finished after {} generations ({} evaluations), fitness {}",
        generations,
        engine.num_evaluations(),
        engine.fitness()
    );
    println!("{}", engine.parent());
    println!("{:?} -> {:?}", inputs, engine.execute(&inputs)?);

    Ok(())
}

use super::evolution_engine::{GenerationSummary, ProgressCallback};
use std::sync::mpsc::Sender;

/// Reports through the `log` facade every `log_every` generations and on
/// every strict improvement.
pub struct ConsoleProgressCallback {
    log_every: usize,
}

impl ConsoleProgressCallback {
    pub fn new(log_every: usize) -> Self {
        Self {
            log_every: log_every.max(1),
        }
    }
}

impl Default for ConsoleProgressCallback {
    fn default() -> Self {
        Self::new(100)
    }
}

impl ProgressCallback for ConsoleProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        log::trace!("Generation {} starting...", generation + 1);
    }

    fn on_generation_complete(&mut self, summary: &GenerationSummary) {
        if summary.improved || summary.generation % self.log_every == 0 {
            log::info!(
                "Generation {} complete. Parent fitness: {:.4}, evaluated: {}, cache hits: {}",
                summary.generation,
                summary.parent_fitness,
                summary.evaluations,
                summary.cache_hits
            );
        }
    }
}

// For handing progress to another thread
pub struct ChannelProgressCallback {
    sender: Sender<ProgressMessage>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressMessage {
    GenerationStart(usize),
    GenerationComplete(GenerationSummary),
}

impl ChannelProgressCallback {
    pub fn new(sender: Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        let _ = self.sender.send(ProgressMessage::GenerationStart(generation));
    }

    fn on_generation_complete(&mut self, summary: &GenerationSummary) {
        let _ = self
            .sender
            .send(ProgressMessage::GenerationComplete(summary.clone()));
    }
}

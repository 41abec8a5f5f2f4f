use crate::engines::generation::Genome;
use rand::rngs::StdRng;
use std::fmt;
use std::sync::Arc;

/// Fitness of a genome that has not been evaluated yet. Lower is better.
pub const UNEVALUATED: f64 = f64::INFINITY;

/// Draws a constant for a node. Controls range and granularity of evolved constants.
pub type ConstantGenerator = Arc<dyn Fn(&mut StdRng) -> f64 + Send + Sync>;

/// Assigns a fitness to a genome. Must be deterministic for fingerprint caching to hold.
pub type Evaluator = Arc<dyn Fn(&Genome) -> f64 + Send + Sync>;

/// Content-derived key over a genome's active subgraph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_hex_display() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0xab;
        bytes[31] = 0x01;
        let rendered = Fingerprint::from_bytes(bytes).to_string();
        assert_eq!(rendered.len(), 64);
        assert!(rendered.starts_with("ab00"));
        assert!(rendered.ends_with("01"));
    }
}

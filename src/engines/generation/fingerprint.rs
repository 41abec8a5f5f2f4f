//! Content-derived cache key over the active subgraph
//!
//! Active nodes are streamed in ascending index order as
//! `function, constant bits, connections...`, followed by the outputs, all as
//! little-endian `u64`s into a BLAKE3 hasher. Inactive nodes never touch the
//! digest, so genomes differing only in dead code share a fingerprint.

use crate::engines::generation::genome::Genome;
use crate::types::Fingerprint;

pub fn compute(genome: &Genome) -> Fingerprint {
    let mut hasher = blake3::Hasher::new();
    let mut write = |value: u64| {
        hasher.update(&value.to_le_bytes());
    };

    for (i, node) in genome.nodes().iter().enumerate() {
        if !genome.is_node_active(i) {
            continue;
        }
        write(node.function as u64);
        write(node.constant.to_bits());
        for &connection in &node.connections {
            write(connection as u64);
        }
    }

    for &output in genome.outputs() {
        write(output as u64);
    }

    Fingerprint::from_bytes(*hasher.finalize().as_bytes())
}

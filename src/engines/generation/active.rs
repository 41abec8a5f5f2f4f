//! Reachability analysis: which addresses can influence an output
//!
//! Inputs are always active. From each output we walk connections backwards
//! with an explicit worklist; because a node only connects to lower
//! addresses, every address is pushed at most once and the walk is bounded
//! by the node count.

use crate::engines::generation::genome::{GenomeShape, Node};

pub fn mark_active(shape: &GenomeShape, nodes: &[Node], outputs: &[usize]) -> Vec<bool> {
    let mut active = vec![false; shape.num_addresses()];
    active[..shape.num_inputs].fill(true);

    let mut worklist: Vec<usize> = Vec::with_capacity(shape.num_nodes);
    for &output in outputs {
        visit(output, &mut active, &mut worklist);
    }

    while let Some(address) = worklist.pop() {
        let node = &nodes[address - shape.num_inputs];
        for &connection in &node.connections {
            visit(connection, &mut active, &mut worklist);
        }
    }

    active
}

// Inputs are pre-marked, so only unseen nodes reach the worklist
fn visit(address: usize, active: &mut [bool], worklist: &mut Vec<usize>) {
    if !active[address] {
        active[address] = true;
        worklist.push(address);
    }
}

//! Graph-based program representation
//!
//! A genome is a fixed-length sequence of nodes followed by a fixed-length
//! sequence of output connections. Addresses are laid out as
//!
//! ```text
//! [ input 0 .. input n-1 | node 0 .. node m-1 ]
//! ```
//!
//! and a node at address `a` may only connect to addresses `< a`. The graph is
//! therefore acyclic by construction and nodes can be executed in index order.
//!
//! Genomes are never edited in place: mutation copies the parent's node and
//! output arrays into a new genome. The active-node mask and the fingerprint
//! are computed on first use and cached for the genome's lifetime.

use crate::config::EvolutionConfig;
use crate::engines::generation::{active, fingerprint};
use crate::error::{CgpError, Result};
use crate::functions::FunctionCatalog;
use crate::types::{ConstantGenerator, Fingerprint, UNEVALUATED};
use rand::rngs::StdRng;
use rand::Rng;
use std::fmt;
use std::sync::OnceLock;

/// Dimensions shared by every genome of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenomeShape {
    pub num_inputs: usize,
    pub num_nodes: usize,
    pub num_outputs: usize,
    pub max_arity: usize,
}

impl GenomeShape {
    /// Number of addressable slots: all inputs plus all nodes
    pub fn num_addresses(&self) -> usize {
        self.num_inputs + self.num_nodes
    }

    /// Address of the node at `index`
    pub fn node_address(&self, index: usize) -> usize {
        self.num_inputs + index
    }

    pub fn is_input(&self, address: usize) -> bool {
        address < self.num_inputs
    }

    /// Checks that random genomes of this shape can be drawn
    pub fn validate(&self) -> Result<()> {
        if self.num_outputs < 1 {
            return Err(CgpError::Configuration(
                "At least one output is necessary".to_string(),
            ));
        }
        if self.num_addresses() == 0 {
            return Err(CgpError::Configuration(
                "Outputs need at least one input or node to connect to".to_string(),
            ));
        }
        if self.num_inputs == 0 && self.num_nodes > 0 && self.max_arity > 0 {
            return Err(CgpError::Configuration(
                "Nodes with connections need at least one input".to_string(),
            ));
        }
        Ok(())
    }
}

impl From<&EvolutionConfig> for GenomeShape {
    fn from(config: &EvolutionConfig) -> Self {
        Self {
            num_inputs: config.num_inputs,
            num_nodes: config.num_nodes,
            num_outputs: config.num_outputs,
            max_arity: config.max_arity,
        }
    }
}

/// A single gene: function index, constant and `max_arity` connections
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub function: usize,
    pub constant: f64,
    pub connections: Vec<usize>,
}

#[derive(Clone)]
pub struct Genome {
    shape: GenomeShape,
    functions: FunctionCatalog,
    nodes: Vec<Node>,
    outputs: Vec<usize>,
    fitness: f64,
    active: OnceLock<Vec<bool>>,
    fingerprint: OnceLock<Fingerprint>,
}

impl Genome {
    /// Draw a random valid genome
    pub fn random(
        shape: GenomeShape,
        functions: FunctionCatalog,
        constant: &ConstantGenerator,
        rng: &mut StdRng,
    ) -> Result<Self> {
        shape.validate()?;
        if functions.is_empty() {
            return Err(CgpError::Configuration(
                "At least one function must be provided".to_string(),
            ));
        }

        let nodes = (0..shape.num_nodes)
            .map(|i| Node {
                function: rng.gen_range(0..functions.len()),
                constant: constant(rng),
                connections: (0..shape.max_arity)
                    .map(|_| rng.gen_range(0..shape.node_address(i)))
                    .collect(),
            })
            .collect();

        let outputs = (0..shape.num_outputs)
            .map(|_| rng.gen_range(0..shape.num_addresses()))
            .collect();

        Ok(Self::from_parts_unchecked(shape, functions, nodes, outputs))
    }

    /// Assemble a genome by hand, checking every structural invariant
    pub fn from_parts(
        shape: GenomeShape,
        functions: FunctionCatalog,
        nodes: Vec<Node>,
        outputs: Vec<usize>,
    ) -> Result<Self> {
        if nodes.len() != shape.num_nodes {
            return Err(CgpError::InvalidGenome(format!(
                "expected {} nodes, got {}",
                shape.num_nodes,
                nodes.len()
            )));
        }
        if outputs.len() != shape.num_outputs {
            return Err(CgpError::InvalidGenome(format!(
                "expected {} outputs, got {}",
                shape.num_outputs,
                outputs.len()
            )));
        }

        for (i, node) in nodes.iter().enumerate() {
            if node.function >= functions.len() {
                return Err(CgpError::InvalidGenome(format!(
                    "node {} selects function {} but the catalog has {}",
                    i,
                    node.function,
                    functions.len()
                )));
            }
            if node.connections.len() != shape.max_arity {
                return Err(CgpError::InvalidGenome(format!(
                    "node {} has {} connections, expected {}",
                    i,
                    node.connections.len(),
                    shape.max_arity
                )));
            }
            let address = shape.node_address(i);
            if let Some(&c) = node.connections.iter().find(|&&c| c >= address) {
                return Err(CgpError::InvalidGenome(format!(
                    "node {} at address {} connects forward to {}",
                    i, address, c
                )));
            }
        }

        if let Some(&o) = outputs.iter().find(|&&o| o >= shape.num_addresses()) {
            return Err(CgpError::InvalidGenome(format!(
                "output connects to {} but only {} addresses exist",
                o,
                shape.num_addresses()
            )));
        }

        Ok(Self::from_parts_unchecked(shape, functions, nodes, outputs))
    }

    pub(crate) fn from_parts_unchecked(
        shape: GenomeShape,
        functions: FunctionCatalog,
        nodes: Vec<Node>,
        outputs: Vec<usize>,
    ) -> Self {
        Self {
            shape,
            functions,
            nodes,
            outputs,
            fitness: UNEVALUATED,
            active: OnceLock::new(),
            fingerprint: OnceLock::new(),
        }
    }

    pub fn shape(&self) -> &GenomeShape {
        &self.shape
    }

    pub fn functions(&self) -> &FunctionCatalog {
        &self.functions
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn outputs(&self) -> &[usize] {
        &self.outputs
    }

    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    pub fn is_evaluated(&self) -> bool {
        self.fitness != UNEVALUATED
    }

    pub(crate) fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }

    /// Per-address activity mask (inputs first, then nodes)
    pub fn active_mask(&self) -> &[bool] {
        self.active
            .get_or_init(|| active::mark_active(&self.shape, &self.nodes, &self.outputs))
    }

    pub fn is_node_active(&self, index: usize) -> bool {
        self.active_mask()[self.shape.node_address(index)]
    }

    /// Indices of the nodes that influence at least one output
    pub fn active_nodes(&self) -> Vec<usize> {
        (0..self.shape.num_nodes)
            .filter(|&i| self.is_node_active(i))
            .collect()
    }

    pub fn num_active_nodes(&self) -> usize {
        self.active_mask()[self.shape.num_inputs..]
            .iter()
            .filter(|&&a| a)
            .count()
    }

    /// Cache key: equal for genomes whose active subgraphs are identical
    pub fn fingerprint(&self) -> Fingerprint {
        *self.fingerprint.get_or_init(|| fingerprint::compute(self))
    }

    /// Run the program on one input vector
    pub fn execute(&self, inputs: &[f64]) -> Result<Vec<f64>> {
        if inputs.len() != self.shape.num_inputs {
            return Err(CgpError::InputArity {
                expected: self.shape.num_inputs,
                actual: inputs.len(),
            });
        }

        let active = self.active_mask();
        let mut values = vec![0.0; self.shape.num_addresses()];
        values[..inputs.len()].copy_from_slice(inputs);

        let mut args = Vec::with_capacity(1 + self.shape.max_arity);
        for (i, node) in self.nodes.iter().enumerate() {
            let address = self.shape.node_address(i);
            if !active[address] {
                continue;
            }

            args.clear();
            args.push(node.constant);
            args.extend(node.connections.iter().map(|&c| values[c]));

            values[address] = self.functions.call(node.function, &args);
        }

        Ok(self.outputs.iter().map(|&o| values[o]).collect())
    }
}

impl fmt::Debug for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Genome")
            .field("shape", &self.shape)
            .field("nodes", &self.nodes)
            .field("outputs", &self.outputs)
            .field("fitness", &self.fitness)
            .finish()
    }
}

/// Lists the active program only, one line per node, then the outputs
impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = |address: usize| {
            if self.shape.is_input(address) {
                format!("x{}", address)
            } else {
                format!("n{}", address - self.shape.num_inputs)
            }
        };

        for i in self.active_nodes() {
            let node = &self.nodes[i];
            let args: Vec<String> = node.connections.iter().map(|&c| label(c)).collect();
            writeln!(
                f,
                "n{} = {}[{}]({})",
                i,
                self.functions.name(node.function).unwrap_or("?"),
                node.constant,
                args.join(", ")
            )?;
        }

        let outputs: Vec<String> = self.outputs.iter().map(|&o| label(o)).collect();
        write!(f, "out = ({})", outputs.join(", "))
    }
}

use crate::engines::generation::genome::{Genome, Node};
use crate::types::ConstantGenerator;
use rand::rngs::StdRng;
use rand::Rng;

/// Number of point mutations applied per offspring: never less than one
pub fn num_mutations(mutation_rate: f64, num_nodes: usize, num_outputs: usize) -> usize {
    let scaled = (mutation_rate * (num_nodes + num_outputs) as f64).floor() as usize;
    scaled.max(1)
}

/// Uniform draw from `0..range` excluding `current`, when there is a choice
fn redraw<R: Rng>(current: usize, range: usize, rng: &mut R) -> usize {
    if range <= 1 {
        return current;
    }
    let candidate = rng.gen_range(0..range - 1);
    if candidate >= current {
        candidate + 1
    } else {
        candidate
    }
}

/// Replace the function, the constant or one connection of a node
fn mutate_node(
    node: &mut Node,
    address: usize,
    num_functions: usize,
    constant: &ConstantGenerator,
    rng: &mut StdRng,
) {
    match rng.gen_range(0..2 + node.connections.len()) {
        0 => node.function = redraw(node.function, num_functions, rng),
        1 => node.constant = constant(rng),
        slot => {
            let connection = &mut node.connections[slot - 2];
            *connection = redraw(*connection, address, rng);
        }
    }
}

/// Mutation: copy the parent's genes and perturb a few of them
///
/// Each step targets a uniformly random slot among all nodes and outputs.
/// Connection draws stay below the node's own address, so the offspring keeps
/// the forward-reference invariant. The offspring starts unevaluated.
pub fn mutate(
    parent: &Genome,
    mutation_rate: f64,
    constant: &ConstantGenerator,
    rng: &mut StdRng,
) -> Genome {
    let shape = *parent.shape();
    let num_functions = parent.functions().len();
    let mut nodes = parent.nodes().to_vec();
    let mut outputs = parent.outputs().to_vec();

    for _ in 0..num_mutations(mutation_rate, shape.num_nodes, shape.num_outputs) {
        let target = rng.gen_range(0..shape.num_nodes + shape.num_outputs);

        if target < shape.num_nodes {
            mutate_node(
                &mut nodes[target],
                shape.node_address(target),
                num_functions,
                constant,
                rng,
            );
        } else {
            let output = &mut outputs[target - shape.num_nodes];
            *output = redraw(*output, shape.num_addresses(), rng);
        }
    }

    Genome::from_parts_unchecked(shape, parent.functions().clone(), nodes, outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::genome::GenomeShape;
    use crate::functions::primitives;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn constant() -> ConstantGenerator {
        Arc::new(|rng: &mut StdRng| rng.gen_range(-10.0..10.0))
    }

    fn parent(rng: &mut StdRng) -> Genome {
        let shape = GenomeShape {
            num_inputs: 3,
            num_nodes: 12,
            num_outputs: 3,
            max_arity: 2,
        };
        Genome::random(shape, primitives::arithmetic(), &constant(), rng).unwrap()
    }

    fn differs(a: &Genome, b: &Genome) -> bool {
        a.nodes() != b.nodes() || a.outputs() != b.outputs()
    }

    #[test]
    fn test_num_mutations_floor_with_minimum_one() {
        assert_eq!(num_mutations(0.0, 10, 3), 1);
        assert_eq!(num_mutations(0.01, 10, 3), 1);
        assert_eq!(num_mutations(0.2, 10, 3), 2);
        assert_eq!(num_mutations(1.0, 10, 3), 13);
        assert_eq!(num_mutations(0.5, 0, 1), 1);
    }

    #[test]
    fn test_redraw_never_returns_current() {
        let mut rng = StdRng::seed_from_u64(11);
        for current in 0..5 {
            for _ in 0..50 {
                let value = redraw(current, 5, &mut rng);
                assert_ne!(value, current);
                assert!(value < 5);
            }
        }
        assert_eq!(redraw(0, 1, &mut rng), 0);
    }

    #[test]
    fn test_offspring_differs_even_at_zero_rate() {
        let mut rng = StdRng::seed_from_u64(42);
        let parent = parent(&mut rng);
        for _ in 0..200 {
            let child = mutate(&parent, 0.0, &constant(), &mut rng);
            assert!(differs(&parent, &child));
        }
    }

    #[test]
    fn test_offspring_keeps_invariants() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut current = parent(&mut rng);
        for _ in 0..300 {
            current = mutate(&current, 0.3, &constant(), &mut rng);
            let rebuilt = Genome::from_parts(
                *current.shape(),
                current.functions().clone(),
                current.nodes().to_vec(),
                current.outputs().to_vec(),
            );
            assert!(rebuilt.is_ok());
            assert!(!current.is_evaluated());
        }
    }

    #[test]
    fn test_mutation_is_deterministic_for_seed() {
        let mut setup = StdRng::seed_from_u64(9);
        let parent = parent(&mut setup);

        let mut a = StdRng::seed_from_u64(100);
        let mut b = StdRng::seed_from_u64(100);
        let child_a = mutate(&parent, 0.2, &constant(), &mut a);
        let child_b = mutate(&parent, 0.2, &constant(), &mut b);

        assert_eq!(child_a.nodes(), child_b.nodes());
        assert_eq!(child_a.outputs(), child_b.outputs());
    }

    #[test]
    fn test_parent_is_untouched() {
        let mut rng = StdRng::seed_from_u64(21);
        let parent = parent(&mut rng);
        let snapshot = (parent.nodes().to_vec(), parent.outputs().to_vec());

        for _ in 0..20 {
            let _ = mutate(&parent, 1.0, &constant(), &mut rng);
        }

        assert_eq!(parent.nodes(), snapshot.0.as_slice());
        assert_eq!(parent.outputs(), snapshot.1.as_slice());
    }
}

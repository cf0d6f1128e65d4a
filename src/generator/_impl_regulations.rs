use crate::generator::{EdgeSet, RegulationAssigner, SeedStream};
use crate::Monotonicity::{Activation, Inhibition};
use crate::{RegulatoryGraph, VariableId};
use log::debug;

impl RegulationAssigner {
    /// Create an assigner where each regulation is an activation with probability
    /// `activation_fraction`.
    pub fn new(activation_fraction: f64) -> RegulationAssigner {
        RegulationAssigner {
            activation_fraction,
        }
    }

    /// Turn an edge set over `num_vars` vertices into a `RegulatoryGraph` with signed
    /// regulations.
    ///
    /// The regulations are added in the edge enumeration order, so the regulators of every
    /// variable are ordered by edge position. Undirected edges `(a, b)` get a random
    /// orientation: `b` regulates `a` when the coin flip is `true`, `a` regulates `b`
    /// otherwise.
    pub fn assign(
        &self,
        num_vars: usize,
        edges: &EdgeSet,
        regulation_seed: u64,
    ) -> Result<RegulatoryGraph, String> {
        let seeds = SeedStream::new(regulation_seed).seeds(2);
        let signs = SeedStream::new(seeds[0]).bernoulli(edges.len(), self.activation_fraction);
        let orientation = if edges.is_directed() {
            vec![false; edges.len()]
        } else {
            SeedStream::new(seeds[1]).coin_flips(edges.len())
        };

        let mut graph = RegulatoryGraph::with_species(num_vars);
        for (i, (a, b)) in edges.as_slice().iter().enumerate() {
            let (regulator, target) = if orientation[i] { (*b, *a) } else { (*a, *b) };
            let monotonicity = if signs[i] { Activation } else { Inhibition };
            graph.add_regulation_by_id(
                VariableId(regulator),
                VariableId(target),
                Some(monotonicity),
            )?;
        }

        debug!(
            "Assigned {} regulations ({} activating).",
            graph.num_regulations(),
            signs.iter().filter(|it| **it).count()
        );
        Ok(graph)
    }
}

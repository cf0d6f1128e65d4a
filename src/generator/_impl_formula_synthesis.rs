use crate::generator::{FormulaSynthesizer, SeedStream};
use crate::{BinaryOp, BooleanNetwork, FnUpdate, RegulatoryGraph, VariableId};
use log::{debug, trace};

/// Variables with more regulators than this always receive an explicit update function.
const ALWAYS_EMIT_ABOVE: usize = 4;

/// Decide whether a variable with `num_regulators` regulators gets an explicit update function.
///
/// Variables without regulators never do, variables with more than four regulators always do,
/// the rest follow their `emit_flag`.
pub fn emits_formula(num_regulators: usize, emit_flag: bool) -> bool {
    num_regulators > ALWAYS_EMIT_ABOVE || (emit_flag && num_regulators > 0)
}

/// **(internal)** The precomputed random decisions of a single variable, all of length `L`
/// (the number of its regulators).
struct VertexPlan {
    /// `true` means OR, `false` means AND, indexed by recursion depth.
    which: Vec<bool>,
    /// `true` means the leaf stays a literal, indexed by leaf position.
    collapse: Vec<bool>,
    arity_seeds: Vec<u64>,
}

/// **(internal)** Everything needed to build the update function of one variable.
struct VertexSynthesis<'a> {
    vertex: VariableId,
    /// Ordered `(regulator, is_activation)` pairs.
    regulators: &'a [(VariableId, bool)],
    plan: VertexPlan,
    lower: u32,
    upper: u32,
}

impl FormulaSynthesizer {
    /// Create a synthesizer for uninterpreted functions with arity in `[lower, upper]`.
    pub fn new(lower: u32, upper: u32) -> FormulaSynthesizer {
        FormulaSynthesizer { lower, upper }
    }

    /// Build a `BooleanNetwork` over the given `graph`, synthesizing update functions for the
    /// variables that are chosen to have one. The remaining functions stay implicit.
    pub fn synthesize(
        &self,
        graph: RegulatoryGraph,
        transition_seed: u64,
    ) -> Result<BooleanNetwork, String> {
        let num_vars = graph.num_vars();
        let regulators: Vec<Vec<(VariableId, bool)>> = graph
            .regulations_by_target()
            .into_iter()
            .map(|regulations| {
                regulations
                    .into_iter()
                    .map(|r| (r.get_regulator(), r.is_activation()))
                    .collect()
            })
            .collect();
        let mut network = BooleanNetwork::new(graph);

        let seeds = SeedStream::new(transition_seed).seeds(4);
        let emit = SeedStream::new(seeds[0]).coin_flips(num_vars);
        let which_seeds = SeedStream::new(seeds[1]).seeds(num_vars);
        let collapse_seeds = SeedStream::new(seeds[2]).seeds(num_vars);
        let arity_seeds = SeedStream::new(seeds[3]).seeds(num_vars);

        for (v, vertex_regulators) in regulators.iter().enumerate() {
            let count = vertex_regulators.len();
            if !emits_formula(count, emit[v]) {
                continue;
            }
            let synthesis = VertexSynthesis {
                vertex: VariableId(v),
                regulators: vertex_regulators,
                plan: VertexPlan {
                    which: SeedStream::new(which_seeds[v]).coin_flips(count),
                    collapse: SeedStream::new(collapse_seeds[v]).coin_flips(count),
                    arity_seeds: SeedStream::new(arity_seeds[v]).seeds(count),
                },
                lower: self.lower,
                upper: self.upper,
            };
            let function = synthesis.build(&mut network)?;
            trace!("${}: {}", network[VariableId(v)], function.to_string(&network));
            network.add_update_function(VariableId(v), function)?;
        }

        debug!(
            "Synthesized {} update functions with {} uninterpreted functions.",
            num_vars - network.num_implicit_parameters(),
            network.num_parameters()
        );
        Ok(network)
    }
}

impl VertexSynthesis<'_> {
    /// Build `synth(L)`, where `synth(1) = leaf(0)` and
    /// `synth(r) = synth(r - 1) 'op' leaf(r - 1)` with `op` given by `which[L - r]`.
    ///
    /// Leaf `L - 1` thus ends up as the right operand of the root and leaf `0` is nested
    /// deepest. The leaves are built in ascending order.
    fn build(&self, network: &mut BooleanNetwork) -> Result<FnUpdate, String> {
        let count = self.regulators.len();
        let mut function = self.leaf(0, network)?;
        for remaining in 2..=count {
            let op = if self.plan.which[count - remaining] {
                BinaryOp::Or
            } else {
                BinaryOp::And
            };
            let leaf = self.leaf(remaining - 1, network)?;
            function = FnUpdate::mk_binary(op, function, leaf);
        }
        Ok(function)
    }

    /// Build the leaf at position `idx`: either a literal of the `idx`-th regulator, or
    /// an uninterpreted function of it and some other regulators.
    fn leaf(&self, idx: usize, network: &mut BooleanNetwork) -> Result<FnUpdate, String> {
        let (pivot, activation) = self.regulators[idx];
        let literal = FnUpdate::mk_literal(pivot, activation);
        let count = self.regulators.len();
        if self.plan.collapse[idx] || count < self.lower as usize {
            return Ok(literal);
        }

        let seed = self.plan.arity_seeds[idx];
        let arity = SeedStream::new(seed).uniform(self.lower..=self.upper) as usize;
        if arity == 0 || count < arity {
            return Ok(literal);
        }
        let mask = SeedStream::new(seed).coin_flips(count);
        if mask.iter().filter(|it| **it).count() < arity {
            return Ok(literal);
        }

        let mut args = vec![pivot];
        args.extend(
            self.regulators
                .iter()
                .zip(mask.iter())
                .filter(|((regulator, _), selected)| **selected && *regulator != pivot)
                .map(|((regulator, _), _)| *regulator)
                .take(arity - 1),
        );
        let name = network.fresh_parameter_name(&format!("F{}_{}", self.vertex.0, idx));
        let parameter = network.add_parameter(&name, args.len() as u32)?;
        Ok(FnUpdate::mk_basic_param(parameter, &args))
    }
}

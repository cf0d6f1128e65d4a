//! Reparametrisation of existing networks.
//!
//! `NetworkParametrizer` finds the binary conjunctions and disjunctions of two literals
//! (e.g. `a & !b`) in the update functions of a network and replaces a random subset of
//! them with fresh uninterpreted functions of the two variables (`F3(a, b)`).

use crate::generator::SeedStream;
use crate::{BinaryOp, BooleanNetwork, FnUpdate, GeneratorError, VariableId};
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Replaces a fraction of the eligible sub-expressions of a network with parameters.
#[derive(Clone, Debug)]
pub struct NetworkParametrizer {
    fraction: f64,
    seed: u64,
}

impl NetworkParametrizer {
    /// Create a parametrizer replacing `round(fraction * M)` of the `M` eligible
    /// sub-expressions (ties are rounded to even), chosen using the given `seed`.
    pub fn new(fraction: f64, seed: u64) -> Result<NetworkParametrizer, GeneratorError> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(GeneratorError::InvalidSettings(format!(
                "The parametrisation fraction must be in [0, 1], got {}.",
                fraction
            )));
        }
        Ok(NetworkParametrizer { fraction, seed })
    }

    /// The number of sub-expressions of `network` which can be replaced.
    pub fn count_eligible(network: &BooleanNetwork) -> usize {
        let (and_count, or_count) = count_eligible_by_op(network);
        and_count + or_count
    }

    /// Return a copy of `network` where the selected eligible sub-expressions are replaced.
    ///
    /// Eligible sub-expressions are numbered by scanning the update functions in variable
    /// order (left to right within a function): first all conjunctions, then all
    /// disjunctions. The `i`-th one, if selected, becomes `F<i>(left, right)`.
    pub fn parametrize(&self, network: &BooleanNetwork) -> Result<BooleanNetwork, String> {
        let (and_count, or_count) = count_eligible_by_op(network);
        let total = and_count + or_count;
        let replaced = ((self.fraction * total as f64).round_ties_even() as usize).min(total);
        let mut selected = vec![false; total];
        selected[..replaced].fill(true);
        SeedStream::new(self.seed).shuffle(&mut selected);
        debug!(
            "Found {} eligible sub-expressions ({} conjunctions), replacing {}.",
            total, and_count, replaced
        );

        let mut result = network.clone();
        let mut rewrite = Rewrite {
            selected: &selected,
            next_and: 0,
            next_or: and_count,
        };
        for var in network.variables() {
            if let Some(function) = network.get_update_function(var) {
                let function = rewrite.rewrite(function.clone(), &mut result)?;
                result.set_update_function(var, Some(function))?;
            }
        }
        Ok(result)
    }

    /// Name of the file into which a parametrised version of `input` is written.
    pub fn output_file_name(&self, input: &Path) -> String {
        let stem = input
            .file_stem()
            .map(|it| it.to_string_lossy().to_string())
            .unwrap_or_default();
        format!(
            "parametrised_{}_f{:?}_s{}.sbml",
            stem, self.fraction, self.seed
        )
    }

    /// Read an SBML network from `input`, parametrise it and write the result into
    /// `output_dir` (created if necessary). Returns the path of the written file.
    pub fn parametrize_file(
        &self,
        input: &Path,
        output_dir: &Path,
    ) -> Result<PathBuf, GeneratorError> {
        let document = std::fs::read_to_string(input).map_err(|source| GeneratorError::Io {
            path: input.to_path_buf(),
            source,
        })?;
        let (network, layout) =
            BooleanNetwork::try_from_sbml(&document).map_err(GeneratorError::Sbml)?;
        let parametrised = self
            .parametrize(&network)
            .map_err(GeneratorError::Network)?;

        std::fs::create_dir_all(output_dir).map_err(|source| GeneratorError::Io {
            path: output_dir.to_path_buf(),
            source,
        })?;
        let path = output_dir.join(self.output_file_name(input));
        std::fs::write(&path, parametrised.to_sbml(&layout)).map_err(|source| {
            GeneratorError::Io {
                path: path.clone(),
                source,
            }
        })?;
        info!(
            "Parametrised `{}` with {} new parameters into `{}`.",
            input.display(),
            parametrised.num_parameters() - network.num_parameters(),
            path.display()
        );
        Ok(path)
    }
}

/// If `function` is a conjunction or disjunction of two literals, return the operator
/// and the two variables.
fn eligible(function: &FnUpdate) -> Option<(BinaryOp, VariableId, VariableId)> {
    let (left, op, right) = function.as_binary()?;
    if !matches!(op, BinaryOp::And | BinaryOp::Or) {
        return None;
    }
    let (left, _) = left.as_literal()?;
    let (right, _) = right.as_literal()?;
    Some((op, left, right))
}

/// Count the eligible conjunctions and disjunctions. Eligible nodes only have literals
/// as children, so they never nest.
fn count_eligible_by_op(network: &BooleanNetwork) -> (usize, usize) {
    let mut and_count = 0;
    let mut or_count = 0;
    for var in network.variables() {
        if let Some(function) = network.get_update_function(var) {
            function.walk_postorder(&mut |it: &FnUpdate| match eligible(it) {
                Some((BinaryOp::And, _, _)) => and_count += 1,
                Some(_) => or_count += 1,
                None => (),
            });
        }
    }
    (and_count, or_count)
}

/// **(internal)** State of a single rewriting pass.
struct Rewrite<'a> {
    selected: &'a [bool],
    next_and: usize,
    next_or: usize,
}

impl Rewrite<'_> {
    fn rewrite(
        &mut self,
        function: FnUpdate,
        network: &mut BooleanNetwork,
    ) -> Result<FnUpdate, String> {
        if let Some((op, left, right)) = eligible(&function) {
            let index = if op == BinaryOp::And {
                self.next_and += 1;
                self.next_and - 1
            } else {
                self.next_or += 1;
                self.next_or - 1
            };
            if !self.selected[index] {
                return Ok(function);
            }
            let name = network.fresh_parameter_name(&format!("F{}", index));
            let parameter = network.add_parameter(&name, 2)?;
            return Ok(FnUpdate::mk_basic_param(parameter, &[left, right]));
        }
        match function {
            FnUpdate::Not(inner) => Ok(FnUpdate::mk_not(self.rewrite(*inner, network)?)),
            FnUpdate::Binary(op, left, right) => {
                let left = self.rewrite(*left, network)?;
                let right = self.rewrite(*right, network)?;
                Ok(FnUpdate::mk_binary(op, left, right))
            }
            other => Ok(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::generator::{circle_layout, GeneratorSettings, NetworkGenerator, TopologyModel};
    use crate::parametrizer::NetworkParametrizer;
    use crate::test_utils::{init_logger, network_from_signs};
    use crate::{BooleanNetwork, FnUpdate, GeneratorError, VariableId};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    /// Five variables, each updated as `X5 & !X6`.
    fn five_conjunctions() -> BooleanNetwork {
        let mut regulations = Vec::new();
        for target in 0..5 {
            regulations.push((5, target, true));
            regulations.push((6, target, false));
        }
        let mut bn = network_from_signs(7, &regulations);
        for target in 0..5 {
            let function = FnUpdate::mk_literal(VariableId(5), true)
                .and(FnUpdate::mk_literal(VariableId(6), false));
            bn.add_update_function(VariableId(target), function).unwrap();
        }
        bn
    }

    #[rstest]
    #[case(0.0, 0)]
    #[case(0.2, 1)]
    #[case(0.3, 2)]
    #[case(0.5, 2)]
    #[case(0.9, 4)]
    #[case(1.0, 5)]
    fn replaces_rounded_fraction(#[case] fraction: f64, #[case] expected: usize) {
        let bn = five_conjunctions();
        assert_eq!(NetworkParametrizer::count_eligible(&bn), 5);
        let result = NetworkParametrizer::new(fraction, 3)
            .unwrap()
            .parametrize(&bn)
            .unwrap();
        assert_eq!(result.num_parameters(), expected);
        assert_eq!(NetworkParametrizer::count_eligible(&result), 5 - expected);
        for p in result.parameters() {
            assert_eq!(result[p].get_arity(), 2);
        }
        for v in result.variables().take(5) {
            let function = result.get_update_function(v).as_ref().unwrap();
            if let Some((_, args)) = function.as_param() {
                assert_eq!(args, &[VariableId(5), VariableId(6)][..]);
            }
        }
    }

    #[test]
    fn conjunctions_are_numbered_first() {
        let mut bn = network_from_signs(
            3,
            &[(1, 0, true), (2, 0, true), (0, 1, true), (2, 1, false)],
        );
        let x0 = VariableId(0);
        let x1 = VariableId(1);
        let x2 = VariableId(2);
        bn.add_update_function(x0, FnUpdate::mk_var(x1).or(FnUpdate::mk_var(x2)))
            .unwrap();
        bn.add_update_function(x1, FnUpdate::mk_var(x0).and(FnUpdate::mk_literal(x2, false)))
            .unwrap();
        // An existing parameter forces a fresh name.
        bn.add_parameter("F0", 1).unwrap();

        let result = NetworkParametrizer::new(1.0, 0)
            .unwrap()
            .parametrize(&bn)
            .unwrap();
        let x0_fn = result.get_update_function(x0).as_ref().unwrap();
        let x1_fn = result.get_update_function(x1).as_ref().unwrap();
        assert_eq!(x0_fn.to_string(&result), "F1(X1, X2)");
        assert_eq!(x1_fn.to_string(&result), "F0_0(X0, X2)");
    }

    #[test]
    fn nested_eligible_nodes_are_found() {
        let bn = network_from_signs(4, &[(1, 0, true), (2, 0, false), (3, 0, true)]);
        let mut bn = bn;
        let (x1, x2, x3) = (VariableId(1), VariableId(2), VariableId(3));
        // !(X1 | !X2) & X3: only the disjunction is eligible.
        let function = FnUpdate::mk_var(x1)
            .or(FnUpdate::mk_literal(x2, false))
            .negation()
            .and(FnUpdate::mk_var(x3));
        bn.add_update_function(VariableId(0), function).unwrap();
        assert_eq!(NetworkParametrizer::count_eligible(&bn), 1);
        let result = NetworkParametrizer::new(1.0, 9)
            .unwrap()
            .parametrize(&bn)
            .unwrap();
        let function = result.get_update_function(VariableId(0)).as_ref().unwrap();
        assert_eq!(function.to_string(&result), "(!F0(X1, X2) & X3)");
    }

    #[test]
    fn zero_fraction_and_no_matches_are_no_ops() {
        let bn = five_conjunctions();
        let result = NetworkParametrizer::new(0.0, 1).unwrap().parametrize(&bn).unwrap();
        assert_eq!(bn, result);

        let mut single = network_from_signs(2, &[(1, 0, false)]);
        single
            .add_update_function(VariableId(0), FnUpdate::mk_literal(VariableId(1), false))
            .unwrap();
        assert_eq!(NetworkParametrizer::count_eligible(&single), 0);
        let result = NetworkParametrizer::new(1.0, 1).unwrap().parametrize(&single).unwrap();
        assert_eq!(single, result);
    }

    #[test]
    fn invalid_fraction_is_rejected() {
        assert!(matches!(
            NetworkParametrizer::new(1.5, 0),
            Err(GeneratorError::InvalidSettings(_))
        ));
        assert!(NetworkParametrizer::new(-0.1, 0).is_err());
    }

    #[test]
    fn parametrize_generated_file() {
        init_logger();
        let settings = GeneratorSettings {
            arity_lower: 8,
            arity_upper: 8,
            ..GeneratorSettings::new(6, TopologyModel::Random { probability: 1.0 })
        };
        let network = NetworkGenerator::new(settings).unwrap().generate(5).unwrap();
        // Five regulators per variable, no uninterpreted functions: every function has
        // exactly one eligible (innermost) node.
        assert_eq!(NetworkParametrizer::count_eligible(&network), 6);

        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("model.sbml");
        std::fs::write(&input, network.to_sbml(&circle_layout(&network))).unwrap();

        let parametrizer = NetworkParametrizer::new(0.5, 11).unwrap();
        let output = parametrizer
            .parametrize_file(&input, &dir.path().join("out"))
            .unwrap();
        assert_eq!(
            output,
            dir.path().join("out").join("parametrised_model_f0.5_s11.sbml")
        );
        let document = std::fs::read_to_string(&output).unwrap();
        let (result, layout) = BooleanNetwork::try_from_sbml(&document).unwrap();
        assert_eq!(result.num_parameters(), 3);
        assert_eq!(layout.len(), 6);
        assert_eq!(document, parametrizer.parametrize(&network).unwrap().to_sbml(&layout));

        let missing = parametrizer.parametrize_file(&dir.path().join("missing.sbml"), dir.path());
        assert!(matches!(missing, Err(GeneratorError::Io { .. })));
    }
}

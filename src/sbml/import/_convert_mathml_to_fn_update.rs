use crate::sbml::import::_read_mathml::MathMl;
use crate::sbml::import::_read_transitions::SbmlTransition;
use crate::{BinaryOp, BooleanNetwork, FnUpdate};
use std::collections::HashMap;

/// Convert a specified transition (one with a default term) into an update function.
///
/// Only the Boolean subset of SBML-qual is supported: default level `0` and at most one
/// function term with result level `1`.
pub fn sbml_transition_to_update_function(
    network: &BooleanNetwork,
    transition: &SbmlTransition,
    id_to_var: &HashMap<String, String>,
) -> Result<FnUpdate, String> {
    let Some(default_term) = transition.default_term.as_ref() else {
        return Err(format!(
            "Transition `{}` has no function terms.",
            transition.id
        ));
    };
    match transition.function_terms.as_slice() {
        [] => level_to_bool(default_term.result_level as i64).map(FnUpdate::Const),
        [term] => {
            if default_term.result_level != 0 {
                Err("Function terms are only supported with default level 0.".to_string())
            } else if term.result_level != 1 {
                Err("Function terms are only supported with result level 1.".to_string())
            } else if let Some(math) = term.math.as_ref() {
                let converter = MathConverter {
                    network,
                    transition,
                    id_to_var,
                };
                converter.convert(math)
            } else {
                Err("Function term has no math formula.".to_string())
            }
        }
        _ => Err("More than one function term is not supported at the moment.".to_string()),
    }
}

fn level_to_bool(level: i64) -> Result<bool, String> {
    match level {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(format!("Cannot convert level `{}` to Boolean.", level)),
    }
}

/// **(internal)** Resolves MathML identifiers against one transition and the network.
struct MathConverter<'a> {
    network: &'a BooleanNetwork,
    transition: &'a SbmlTransition,
    id_to_var: &'a HashMap<String, String>,
}

impl MathConverter<'_> {
    fn convert(&self, math: &MathMl) -> Result<FnUpdate, String> {
        match math {
            MathMl::Boolean(value) => Ok(FnUpdate::Const(*value)),
            MathMl::Integer(i) => level_to_bool(*i).map(FnUpdate::Const),
            MathMl::Identifier(name) => self.resolve_identifier(name).map(FnUpdate::Var),
            MathMl::SymbolApply(p_name, args) => {
                let mut variables = Vec::new();
                for arg in args {
                    match self.convert(arg)? {
                        FnUpdate::Var(v) => variables.push(v),
                        _ => {
                            return Err(format!(
                                "(Transition `{}`) Uninterpreted functions can have only variables as arguments.",
                                self.transition.id
                            ))
                        }
                    }
                }
                let param = self
                    .network
                    .find_parameter(p_name)
                    .ok_or_else(|| format!("Unknown uninterpreted function `{}`.", p_name))?;
                Ok(FnUpdate::Param(param, variables))
            }
            MathMl::Apply(op, args) => self.convert_apply(op, args),
        }
    }

    fn resolve_identifier(&self, name: &str) -> Result<crate::VariableId, String> {
        // Identifiers may reference input ids as well as species ids.
        let species = self
            .transition
            .inputs
            .iter()
            .find(|i| i.id.as_deref() == Some(name))
            .map(|i| i.qual_species.as_str())
            .unwrap_or(name);
        self.id_to_var
            .get(species)
            .and_then(|var| self.network.as_graph().find_variable(var))
            .ok_or_else(|| {
                format!(
                    "Identifier `{}` in transition `{}` is not an input nor a species.",
                    name, self.transition.id
                )
            })
    }

    fn convert_apply(&self, op: &str, args: &[MathMl]) -> Result<FnUpdate, String> {
        match op {
            "not" => match args {
                [arg] => Ok(self.convert(arg)?.negation()),
                _ => Err(format!(
                    "Negation operator needs exactly one argument, {} given.",
                    args.len()
                )),
            },
            "and" | "or" => {
                // Editors producing CNF/DNF use arbitrary argument counts.
                let is_and = op == "and";
                let op = if is_and { BinaryOp::And } else { BinaryOp::Or };
                let mut converted = Vec::new();
                for arg in args {
                    converted.push(self.convert(arg)?);
                }
                let mut converted = converted.into_iter();
                match converted.next() {
                    None => Ok(FnUpdate::Const(is_and)),
                    Some(first) => {
                        Ok(converted.fold(first, |l, r| FnUpdate::mk_binary(op, l, r)))
                    }
                }
            }
            "implies" | "xor" | "eq" | "neq" | "geq" | "leq" | "lt" | "gt" => {
                let [left, right] = args else {
                    return Err(format!(
                        "Operation `{}` requires exactly 2 arguments, {} given.",
                        op,
                        args.len()
                    ));
                };
                let left = self.convert(left)?;
                let right = self.convert(right)?;
                Ok(match op {
                    "implies" => FnUpdate::mk_binary(BinaryOp::Imp, left, right),
                    "xor" => FnUpdate::mk_binary(BinaryOp::Xor, left, right),
                    _ => transform_comparison(op, left, right),
                })
            }
            _ => Err(format!("Unknown MathML operator `{}`.", op)),
        }
    }
}

/// Turn a comparison of two Boolean values into an update function, simplifying
/// comparisons with constants (`x == 1` is just `x`).
///
/// Allowed `op` values are `eq`, `neq`, `geq`, `leq`, `lt`, `gt`.
fn transform_comparison(op: &str, left: FnUpdate, right: FnUpdate) -> FnUpdate {
    match (op, left, right) {
        // A > B === B < A, A >= B === B <= A
        ("gt", l, r) => transform_comparison("lt", r, l),
        ("geq", l, r) => transform_comparison("leq", r, l),
        ("neq", l, r) => match transform_comparison("eq", l, r) {
            FnUpdate::Not(inner) => *inner,
            FnUpdate::Const(b) => FnUpdate::Const(!b),
            eq => eq.negation(),
        },
        ("eq", FnUpdate::Const(a), FnUpdate::Const(b)) => FnUpdate::Const(a == b),
        ("eq", FnUpdate::Const(true), x) | ("eq", x, FnUpdate::Const(true)) => x,
        ("eq", FnUpdate::Const(false), x) | ("eq", x, FnUpdate::Const(false)) => x.negation(),
        ("eq", l, r) => {
            if l == r {
                FnUpdate::Const(true)
            } else {
                FnUpdate::mk_binary(BinaryOp::Iff, l, r)
            }
        }
        // A < B === !A & B
        ("lt", FnUpdate::Const(true), _) | ("lt", _, FnUpdate::Const(false)) => {
            FnUpdate::Const(false)
        }
        ("lt", FnUpdate::Const(false), r) => r,
        ("lt", l, FnUpdate::Const(true)) => l.negation(),
        ("lt", l, r) => l.negation().and(r),
        // A <= B === A => B
        ("leq", FnUpdate::Const(false), _) | ("leq", _, FnUpdate::Const(true)) => {
            FnUpdate::Const(true)
        }
        ("leq", FnUpdate::Const(true), r) => r,
        ("leq", l, FnUpdate::Const(false)) => l.negation(),
        (_, l, r) => FnUpdate::mk_binary(BinaryOp::Imp, l, r),
    }
}

#[cfg(test)]
mod tests {
    use super::transform_comparison;
    use crate::{FnUpdate, VariableId};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_transform_comparison() {
        let a = FnUpdate::mk_var(VariableId(0));
        let b = FnUpdate::mk_var(VariableId(1));
        let t = FnUpdate::mk_true();
        let f = FnUpdate::mk_false();

        assert_eq!(a, transform_comparison("eq", a.clone(), t.clone()));
        assert_eq!(a, transform_comparison("eq", t.clone(), a.clone()));
        assert_eq!(
            a.clone().negation(),
            transform_comparison("eq", a.clone(), f.clone())
        );
        assert_eq!(a, transform_comparison("neq", a.clone(), f.clone()));
        assert_eq!(
            a.clone().negation(),
            transform_comparison("neq", a.clone(), t.clone())
        );
        assert_eq!(t, transform_comparison("eq", a.clone(), a.clone()));
        assert_eq!(
            a.clone().negation().and(b.clone()),
            transform_comparison("lt", a.clone(), b.clone())
        );
        assert_eq!(
            b.clone().negation().and(a.clone()),
            transform_comparison("gt", a.clone(), b.clone())
        );
        assert_eq!(
            FnUpdate::mk_binary(crate::BinaryOp::Imp, a.clone(), b.clone()),
            transform_comparison("leq", a.clone(), b.clone())
        );
        assert_eq!(t, transform_comparison("geq", a.clone(), f.clone()));
    }
}

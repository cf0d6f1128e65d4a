use crate::FnUpdate::*;
use crate::{BinaryOp, BooleanNetwork, FnUpdate, ParameterId, VariableId};
use std::collections::HashSet;

/// Constructor and destructor utility methods. These mainly avoid unnecessary boxing
/// and exhaustive pattern matching when not necessary.
impl FnUpdate {
    /// Create a `true` formula.
    pub fn mk_true() -> FnUpdate {
        Const(true)
    }

    /// Create a `false` formula.
    pub fn mk_false() -> FnUpdate {
        Const(false)
    }

    /// Create an `x` formula where `x` is a Boolean variable.
    pub fn mk_var(id: VariableId) -> FnUpdate {
        Var(id)
    }

    /// Create a `p(x_1, ..., x_k)` formula where `p` is a parameter function and `x_1`
    /// through `x_k` are variables.
    pub fn mk_basic_param(id: ParameterId, args: &[VariableId]) -> FnUpdate {
        Param(id, args.to_vec())
    }

    /// Create a literal: `x` if `positive`, `!x` otherwise.
    pub fn mk_literal(id: VariableId, positive: bool) -> FnUpdate {
        if positive {
            Var(id)
        } else {
            Var(id).negation()
        }
    }

    /// Create a `!phi` formula, where `phi` is an inner `FnUpdate`.
    pub fn mk_not(inner: FnUpdate) -> FnUpdate {
        Not(Box::new(inner))
    }

    /// Create a `phi 'op' psi` where `phi` and `psi` are arguments of `op` operator.
    pub fn mk_binary(op: BinaryOp, left: FnUpdate, right: FnUpdate) -> FnUpdate {
        Binary(op, Box::new(left), Box::new(right))
    }

    /// Negate this function.
    pub fn negation(self) -> FnUpdate {
        FnUpdate::mk_not(self)
    }

    /// Create a conjunction.
    pub fn and(self, other: FnUpdate) -> FnUpdate {
        FnUpdate::mk_binary(BinaryOp::And, self, other)
    }

    /// Create a disjunction.
    pub fn or(self, other: FnUpdate) -> FnUpdate {
        FnUpdate::mk_binary(BinaryOp::Or, self, other)
    }

    /// If `Const`, return the value, otherwise return `None`.
    pub fn as_const(&self) -> Option<bool> {
        match self {
            Const(value) => Some(*value),
            _ => None,
        }
    }

    /// If `Var`, return the id, otherwise return `None`.
    pub fn as_var(&self) -> Option<VariableId> {
        match self {
            Var(value) => Some(*value),
            _ => None,
        }
    }

    /// If `Param`, return the id and args, otherwise return `None`.
    pub fn as_param(&self) -> Option<(ParameterId, &[VariableId])> {
        match self {
            Param(id, args) => Some((*id, args.as_slice())),
            _ => None,
        }
    }

    /// If `Not`, return the inner function, otherwise return `None`.
    pub fn as_not(&self) -> Option<&FnUpdate> {
        match self {
            Not(inner) => Some(inner),
            _ => None,
        }
    }

    /// If `Binary`, return the operator and left/right formulas, otherwise return `None`.
    pub fn as_binary(&self) -> Option<(&FnUpdate, BinaryOp, &FnUpdate)> {
        match self {
            Binary(op, l, r) => Some((l, *op, r)),
            _ => None,
        }
    }

    /// If this is a literal (`x` or `!x`), return the variable and its polarity
    /// (`true` for positive literals).
    pub fn as_literal(&self) -> Option<(VariableId, bool)> {
        match self {
            Var(id) => Some((*id, true)),
            Not(inner) => inner.as_var().map(|id| (id, false)),
            _ => None,
        }
    }
}

/// Other utility methods.
impl FnUpdate {
    /// Return a sorted vector of all variables that are actually used as inputs in this function.
    pub fn collect_arguments(&self) -> Vec<VariableId> {
        let mut args = HashSet::new();
        self.walk_postorder(&mut |it: &FnUpdate| match it {
            Var(id) => {
                args.insert(*id);
            }
            Param(_, p_args) => args.extend(p_args.iter().cloned()),
            _ => (),
        });
        let mut result: Vec<VariableId> = args.into_iter().collect();
        result.sort();
        result
    }

    /// Return a sorted vector of all parameters (i.e. uninterpreted functions) that are used
    /// in this update function.
    pub fn collect_parameters(&self) -> Vec<ParameterId> {
        let mut params = HashSet::new();
        self.walk_postorder(&mut |it: &FnUpdate| {
            if let Param(id, _) = it {
                params.insert(*id);
            }
        });
        let mut result: Vec<ParameterId> = params.into_iter().collect();
        result.sort();
        result
    }

    /// The number of binary operator nodes in this function.
    pub fn count_binary_ops(&self) -> usize {
        let mut count = 0;
        self.walk_postorder(&mut |it: &FnUpdate| {
            if matches!(it, Binary(_, _, _)) {
                count += 1;
            }
        });
        count
    }

    /// The number of leaves of this function, where a literal (`x` or `!x`), a parameter
    /// call and a constant each count as one leaf.
    pub fn count_leaves(&self) -> usize {
        match self {
            Const(_) | Var(_) | Param(_, _) => 1,
            Not(inner) => {
                if inner.as_var().is_some() {
                    1
                } else {
                    inner.count_leaves()
                }
            }
            Binary(_, l, r) => l.count_leaves() + r.count_leaves(),
        }
    }

    /// Convert this update function to a string, taking names from the provided `BooleanNetwork`.
    pub fn to_string(&self, context: &BooleanNetwork) -> String {
        match self {
            Const(value) => value.to_string(),
            Var(id) => context.get_variable_name(*id).to_string(),
            Not(inner) => format!("!{}", inner.to_string(context)),
            Binary(op, l, r) => {
                format!("({} {} {})", l.to_string(context), op, r.to_string(context))
            }
            Param(id, args) => {
                let name = context[*id].get_name();
                if args.is_empty() {
                    name.to_string()
                } else {
                    let args: Vec<&str> = args
                        .iter()
                        .map(|it| context.get_variable_name(*it).as_str())
                        .collect();
                    format!("{}({})", name, args.join(", "))
                }
            }
        }
    }

    /// Allows us to iterate through all nodes of the abstract syntax tree of this function
    /// in post-order.
    ///
    /// Note that this is a preliminary version of the API. A more robust implementation should
    /// provide a standard iterator interface.
    pub fn walk_postorder<F>(&self, action: &mut F)
    where
        F: FnMut(&FnUpdate),
    {
        match self {
            Const(_) | Var(_) | Param(_, _) => action(self),
            Not(inner) => {
                inner.walk_postorder(action);
                action(self);
            }
            Binary(_, left, right) => {
                left.walk_postorder(action);
                right.walk_postorder(action);
                action(self);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::network_from_signs;
    use crate::{BinaryOp, FnUpdate, VariableId};
    use pretty_assertions::assert_eq;

    #[test]
    fn basic_fn_update_test() {
        let mut bn = network_from_signs(3, &[(0, 2, true), (1, 2, false)]);
        let a = VariableId(0);
        let b = VariableId(1);
        let f = bn.add_parameter("f", 2).unwrap();

        let fun = FnUpdate::mk_literal(a, true)
            .and(FnUpdate::mk_literal(b, false))
            .or(FnUpdate::mk_basic_param(f, &[b, a]));
        assert_eq!("((X0 & !X1) | f(X1, X0))", fun.to_string(&bn));
        assert_eq!(vec![a, b], fun.collect_arguments());
        assert_eq!(vec![f], fun.collect_parameters());
        assert_eq!(2, fun.count_binary_ops());
        assert_eq!(3, fun.count_leaves());

        let (l, op, r) = fun.as_binary().unwrap();
        assert_eq!(BinaryOp::Or, op);
        assert_eq!(Some((f, &[b, a][..])), r.as_param());
        let (ll, _, lr) = l.as_binary().unwrap();
        assert_eq!(Some((a, true)), ll.as_literal());
        assert_eq!(Some((b, false)), lr.as_literal());
        assert_eq!(Some(b), lr.as_not().and_then(|it| it.as_var()));
        assert_eq!(None, fun.as_literal());
        assert_eq!(Some(true), FnUpdate::mk_true().as_const());
        assert_eq!(Some(false), FnUpdate::mk_false().as_const());
    }

    #[test]
    fn double_negation_is_not_a_literal() {
        let x = VariableId(0);
        let fun = FnUpdate::mk_var(x).negation().negation();
        assert_eq!(None, fun.as_literal());
        assert_eq!(1, fun.count_leaves());
    }
}

use crate::{
    BooleanNetwork, FnUpdate, Parameter, ParameterId, ParameterIdIterator, RegulatoryGraph,
    Variable, VariableId, VariableIdIterator, ID_REGEX,
};
use std::collections::HashMap;
use std::ops::Index;

/// Basic methods for safely building `BooleanNetwork`s.
impl BooleanNetwork {
    /// Construct a new `BooleanNetwork` from a `RegulatoryGraph` without any parameters.
    pub fn new(graph: RegulatoryGraph) -> BooleanNetwork {
        BooleanNetwork {
            update_functions: vec![None; graph.num_vars()],
            graph,
            parameters: Vec::new(),
            parameter_to_index: HashMap::new(),
        }
    }

    /// Add a new `Parameter` to the `BooleanNetwork`.
    ///
    /// The parameter name must be different from other parameters and variables.
    pub fn add_parameter(&mut self, name: &str, arity: u32) -> Result<ParameterId, String> {
        self.assert_valid_name(name)?;
        self.assert_no_such_variable(name)?;
        self.assert_no_such_parameter(name)?;
        let id = ParameterId(self.parameters.len());
        self.parameter_to_index.insert(name.to_string(), id);
        self.parameters.push(Parameter::new(name, arity));
        Ok(id)
    }

    /// Find a parameter name which is not used by any variable or parameter yet. The `base`
    /// is used as is when possible, otherwise it is extended with a numeric suffix.
    pub fn fresh_parameter_name(&self, base: &str) -> String {
        let mut name = base.to_string();
        let mut suffix = 0;
        while self.graph.find_variable(&name).is_some() || self.find_parameter(&name).is_some() {
            name = format!("{}_{}", base, suffix);
            suffix += 1;
        }
        name
    }

    /// Add a new `UpdateFunction` to the `BooleanNetwork`.
    ///
    /// The variable must not already have an update function. We assume all the variables
    /// and parameters in the function are used correctly.
    pub fn add_update_function(
        &mut self,
        variable: VariableId,
        function: FnUpdate,
    ) -> Result<(), String> {
        self.assert_no_update_function(variable)?;
        self.assert_arguments_are_valid(variable, function.collect_arguments())?;
        self.assert_parameters_are_valid(&function)?;
        self.update_functions[variable.0] = Some(function);
        Ok(())
    }

    /// Allows to directly replace (or remove) the update function.
    ///
    /// The function will replace existing function (if any), but it still needs to satisfy
    /// the declared regulations.
    pub fn set_update_function(
        &mut self,
        variable: VariableId,
        function: Option<FnUpdate>,
    ) -> Result<(), String> {
        if let Some(function) = function.as_ref() {
            self.assert_arguments_are_valid(variable, function.collect_arguments())?;
            self.assert_parameters_are_valid(function)?;
        }
        self.update_functions[variable.0] = function;
        Ok(())
    }

    /// **(internal)** Utility method to ensure that a parameter name is a valid identifier.
    fn assert_valid_name(&self, name: &str) -> Result<(), String> {
        if ID_REGEX.is_match(name) {
            Ok(())
        } else {
            Err(format!("Cannot add parameter. '{}' is not a valid name.", name))
        }
    }

    /// **(internal)** Utility method to ensure that a parameter is also not a variable.
    fn assert_no_such_variable(&self, name: &str) -> Result<(), String> {
        if self.graph.find_variable(name).is_none() {
            Ok(())
        } else {
            Err(format!(
                "Cannot add parameter. '{}' is already a variable.",
                name
            ))
        }
    }

    /// **(internal)** Utility method to ensure that a parameter is not a duplicate.
    fn assert_no_such_parameter(&self, name: &str) -> Result<(), String> {
        if self.find_parameter(name).is_none() {
            Ok(())
        } else {
            Err(format!("Cannot add parameter. '{}' already added.", name))
        }
    }

    /// **(internal)** Utility method to ensure that an update function is not set yet.
    fn assert_no_update_function(&self, variable: VariableId) -> Result<(), String> {
        if self.update_functions[variable.0].is_none() {
            Ok(())
        } else {
            Err(format!(
                "Cannot set update function for {}. Function already set.",
                self.graph.get_variable(variable)
            ))
        }
    }

    /// **(internal)** Utility method to check that the arguments of a function are a subset
    /// of the actual regulators.
    fn assert_arguments_are_valid(
        &self,
        variable: VariableId,
        actual: Vec<VariableId>,
    ) -> Result<(), String> {
        let unexpected: Vec<String> = actual
            .into_iter()
            .filter(|arg| self.graph.find_regulation(*arg, variable).is_none())
            .map(|arg| self.get_variable_name(arg).clone())
            .collect();
        if unexpected.is_empty() {
            Ok(())
        } else {
            let expected_names: Vec<String> = self
                .regulators(variable)
                .into_iter()
                .map(|v| self.get_variable_name(v).clone())
                .collect();
            Err(format!(
                "Variable '{}' is regulated by {:?}, but {:?} were found as arguments",
                self.get_variable(variable),
                expected_names,
                unexpected
            ))
        }
    }

    /// **(internal)** Utility method to check that every parameter is applied with its
    /// declared arity.
    fn assert_parameters_are_valid(&self, function: &FnUpdate) -> Result<(), String> {
        let mut error = None;
        function.walk_postorder(&mut |it: &FnUpdate| {
            if let FnUpdate::Param(id, args) = it {
                let parameter = &self.parameters[id.0];
                if error.is_none() && parameter.get_arity() as usize != args.len() {
                    error = Some(format!(
                        "Parameter '{}' has arity {}, but is used with {} arguments.",
                        parameter.get_name(),
                        parameter.get_arity(),
                        args.len()
                    ));
                }
            }
        });
        match error {
            None => Ok(()),
            Some(error) => Err(error),
        }
    }
}

/// Some utility methods for accessing the structure of a `BooleanNetwork`. Some of them are just
/// delegating to the internal `RegulatoryGraph`, but we have a copy here as well because they
/// are used very often.
impl BooleanNetwork {
    /// Obtain a reference to the underlying `RegulatoryGraph` of the `BooleanNetwork`.
    pub fn as_graph(&self) -> &RegulatoryGraph {
        &self.graph
    }

    /// The number of variables in this `BooleanNetwork`.
    pub fn num_vars(&self) -> usize {
        self.graph.num_vars()
    }

    /// The number of *explicit* parameters in this `BooleanNetwork` (there can be network
    /// variables using erased functions--implicit parameters--that are not counted here).
    pub fn num_parameters(&self) -> usize {
        self.parameters.len()
    }

    /// The number of variables with erased update functions in this `BooleanNetwork`.
    pub fn num_implicit_parameters(&self) -> usize {
        self.update_functions
            .iter()
            .filter(|it| it.is_none())
            .count()
    }

    /// Return an iterator over all variable ids of this network.
    pub fn variables(&self) -> VariableIdIterator {
        self.graph.variables()
    }

    /// Return the variable object based on the given `VariableId`.
    pub fn get_variable(&self, id: VariableId) -> &Variable {
        self.graph.get_variable(id)
    }

    /// Shorthand for `self.as_graph().get_variable(id).get_name()`.
    pub fn get_variable_name(&self, id: VariableId) -> &String {
        self.graph.get_variable_name(id)
    }

    /// Return the variables that regulate the given `target` variable in insertion order.
    pub fn regulators(&self, target: VariableId) -> Vec<VariableId> {
        self.graph.regulators(target)
    }

    /// Find a `ParameterId` corresponding to the given parameter `name`.
    pub fn find_parameter(&self, name: &str) -> Option<ParameterId> {
        self.parameter_to_index.get(name).cloned()
    }

    /// Get a `Parameter` corresponding to the given `ParameterId`.
    pub fn get_parameter(&self, id: ParameterId) -> &Parameter {
        &self.parameters[id.0]
    }

    /// Get a `FnUpdate` corresponding to the given `VariableId`.
    pub fn get_update_function(&self, variable: VariableId) -> &Option<FnUpdate> {
        &self.update_functions[variable.0]
    }

    /// Return an iterator over all parameter ids of this network.
    pub fn parameters(&self) -> ParameterIdIterator {
        (0..self.parameters.len()).map(ParameterId)
    }
}

/// Allow indexing `BooleanNetwork` using `VariableId` objects.
impl Index<VariableId> for BooleanNetwork {
    type Output = Variable;

    fn index(&self, index: VariableId) -> &Self::Output {
        self.graph.get_variable(index)
    }
}

/// Allow indexing `BooleanNetwork` using `ParameterId` objects.
impl Index<ParameterId> for BooleanNetwork {
    type Output = Parameter;

    fn index(&self, index: ParameterId) -> &Self::Output {
        &self.parameters[index.0]
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::network_from_signs;
    use crate::{FnUpdate, VariableId};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_parameter() {
        let mut bn = network_from_signs(3, &[(0, 2, true), (1, 2, false)]);
        let p = bn.add_parameter("F2_1", 2).unwrap();
        assert_eq!(bn.find_parameter("F2_1"), Some(p));
        assert_eq!(bn.num_parameters(), 1);
        // Duplicates, variable names and invalid identifiers are rejected.
        assert!(bn.add_parameter("F2_1", 2).is_err());
        assert!(bn.add_parameter("X0", 1).is_err());
        assert!(bn.add_parameter("F 1", 1).is_err());
    }

    #[test]
    fn test_fresh_parameter_name() {
        let mut bn = network_from_signs(2, &[(0, 1, true)]);
        assert_eq!(bn.fresh_parameter_name("F0"), "F0");
        assert_eq!(bn.fresh_parameter_name("X0"), "X0_0");
        bn.add_parameter("F0", 2).unwrap();
        bn.add_parameter("F0_0", 2).unwrap();
        assert_eq!(bn.fresh_parameter_name("F0"), "F0_1");
    }

    #[test]
    fn test_update_function_validation() {
        let mut bn = network_from_signs(3, &[(0, 2, true), (1, 2, false)]);
        let x0 = VariableId(0);
        let x1 = VariableId(1);
        let x2 = VariableId(2);

        // X2 does not regulate itself.
        let invalid = FnUpdate::mk_var(x0).and(FnUpdate::mk_var(x2));
        assert!(bn.add_update_function(x2, invalid).is_err());

        let p = bn.add_parameter("F2_0", 2).unwrap();
        let wrong_arity = FnUpdate::mk_basic_param(p, &[x0]);
        assert!(bn.add_update_function(x2, wrong_arity).is_err());

        let valid = FnUpdate::mk_basic_param(p, &[x1, x0]).or(FnUpdate::mk_var(x1).negation());
        bn.add_update_function(x2, valid.clone()).unwrap();
        assert_eq!(bn.get_update_function(x2), &Some(valid.clone()));
        assert!(bn.add_update_function(x2, valid).is_err());
        assert_eq!(bn.num_implicit_parameters(), 2);

        bn.set_update_function(x2, None).unwrap();
        assert_eq!(bn.num_implicit_parameters(), 3);
    }
}

use super::{Regulation, RegulatoryGraph, Variable, VariableId};
use crate::{Monotonicity, RegulationIterator, VariableIdIterator, ID_REGEX};
use std::collections::HashMap;
use std::ops::Index;

/// Methods for safely constructing new instances of `RegulatoryGraph`s.
impl RegulatoryGraph {
    /// Create a new `RegulatoryGraph` with variables using the given names
    /// and no regulations.
    ///
    /// The ordering of the variables is preserved.
    pub fn new(variables: Vec<String>) -> RegulatoryGraph {
        RegulatoryGraph {
            regulations: Vec::new(),
            regulation_to_index: HashMap::new(),
            variable_to_index: variables
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), VariableId(i)))
                .collect(),
            variables: variables
                .into_iter()
                .map(|name| Variable { name })
                .collect(),
        }
    }

    /// Create a `RegulatoryGraph` with `num_vars` variables named `X0` to `X(num_vars - 1)`
    /// (the naming scheme of generated networks).
    pub fn with_species(num_vars: usize) -> RegulatoryGraph {
        RegulatoryGraph::new(
            (0..num_vars)
                .map(|i| VariableId(i).species_name())
                .collect(),
        )
    }

    /// Add a new `Regulation` to this `RegulatoryGraph`.
    ///
    /// Returns `Err` if `regulator` or `target` are not valid graph variables or when
    /// the regulation between the two variables already exists.
    pub fn add_regulation(
        &mut self,
        regulator: &str,
        target: &str,
        monotonicity: Option<Monotonicity>,
    ) -> Result<(), String> {
        let regulator = self.get_regulator(regulator)?;
        let target = self.get_target(target)?;
        self.add_regulation_by_id(regulator, target, monotonicity)
    }

    /// Same as `add_regulation`, but uses `VariableId`s instead of names.
    pub fn add_regulation_by_id(
        &mut self,
        regulator: VariableId,
        target: VariableId,
        monotonicity: Option<Monotonicity>,
    ) -> Result<(), String> {
        if regulator.0 >= self.num_vars() || target.0 >= self.num_vars() {
            return Err(format!(
                "Invalid regulation: {} or {} is not a variable.",
                regulator, target
            ));
        }
        self.assert_no_regulation(regulator, target)?;
        self.regulation_to_index
            .insert((regulator, target), self.regulations.len());
        self.regulations.push(Regulation {
            regulator,
            target,
            monotonicity,
        });
        Ok(())
    }

    /// **(internal)** Utility method to safely obtain a regulator variable (using an appropriate error message).
    fn get_regulator(&self, name: &str) -> Result<VariableId, String> {
        self.find_variable(name)
            .ok_or(format!("Invalid regulation: Unknown regulator {}.", name))
    }

    /// **(internal)** Utility method to safely obtain a target variable (using an appropriate error message).
    fn get_target(&self, name: &str) -> Result<VariableId, String> {
        self.find_variable(name)
            .ok_or(format!("Invalid regulation: Unknown target {}.", name))
    }

    /// **(internal)** Utility method to ensure there is no regulation between the two variables yet.
    fn assert_no_regulation(
        &self,
        regulator: VariableId,
        target: VariableId,
    ) -> Result<(), String> {
        if self.find_regulation(regulator, target).is_none() {
            Ok(())
        } else {
            Err(format!(
                "Invalid regulation: {} already regulates {}.",
                self.get_variable(regulator),
                self.get_variable(target)
            ))
        }
    }
}

/// Some basic utility methods for inspecting the `RegulatoryGraph`.
impl RegulatoryGraph {
    /// The number of variables in this `RegulatoryGraph`.
    pub fn num_vars(&self) -> usize {
        self.variables.len()
    }

    /// The number of regulations in this `RegulatoryGraph`.
    pub fn num_regulations(&self) -> usize {
        self.regulations.len()
    }

    /// Find a `VariableId` for the given name, or `None` if the variable does not exist.
    pub fn find_variable(&self, name: &str) -> Option<VariableId> {
        self.variable_to_index.get(name).cloned()
    }

    /// Return a `Variable` corresponding to the given `VariableId`.
    pub fn get_variable(&self, id: VariableId) -> &Variable {
        &self.variables[id.0]
    }

    /// Shorthand for `self.get_variable(id).get_name()`.
    pub fn get_variable_name(&self, id: VariableId) -> &String {
        &self.variables[id.0].name
    }

    /// Find a `Regulation` between two variables if it exists, `None` otherwise.
    pub fn find_regulation(
        &self,
        regulator: VariableId,
        target: VariableId,
    ) -> Option<&Regulation> {
        self.regulation_to_index
            .get(&(regulator, target))
            .map(|i| &self.regulations[*i])
    }

    /// Return the list of variables that regulate the given `target` variable.
    ///
    /// The regulators are **not** sorted: they are returned in the order in which the
    /// regulations were added to the graph.
    pub fn regulators(&self, target: VariableId) -> Vec<VariableId> {
        self.regulations
            .iter()
            .filter(|r| r.target == target)
            .map(|r| r.regulator)
            .collect()
    }

    /// Return the regulations targeting `target`, in the order in which they were added.
    pub fn regulations_of(&self, target: VariableId) -> Vec<&Regulation> {
        self.regulations
            .iter()
            .filter(|r| r.target == target)
            .collect()
    }

    /// Group all regulations by their target in a single pass. The regulations of each target
    /// keep their insertion order.
    pub fn regulations_by_target(&self) -> Vec<Vec<&Regulation>> {
        let mut result = vec![Vec::new(); self.num_vars()];
        for r in &self.regulations {
            result[r.target.0].push(r);
        }
        result
    }

    /// Return a sorted list of variables that are regulated by the given `regulator` variable.
    pub fn targets(&self, regulator: VariableId) -> Vec<VariableId> {
        let mut targets: Vec<VariableId> = self
            .regulations
            .iter()
            .filter(|r| r.regulator == regulator)
            .map(|r| r.target)
            .collect();
        targets.sort();
        targets
    }

    /// Return an iterator over all variable ids of this graph.
    pub fn variables(&self) -> VariableIdIterator {
        (0..self.variables.len()).map(VariableId)
    }

    /// Return an iterator over all regulations of this graph (in insertion order).
    pub fn regulations(&self) -> RegulationIterator {
        self.regulations.iter()
    }

    /// A static check that allows to verify validity of a variable name.
    pub fn is_valid_name(name: &str) -> bool {
        ID_REGEX.is_match(name)
    }
}

/// Allow indexing `RegulatoryGraph` using `VariableId` objects.
impl Index<VariableId> for RegulatoryGraph {
    type Output = Variable;

    fn index(&self, index: VariableId) -> &Self::Output {
        self.get_variable(index)
    }
}

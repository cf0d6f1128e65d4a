use crate::{Variable, VariableId};
use std::fmt::{Display, Error, Formatter};

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", self.name)
    }
}

impl Variable {
    /// Human-readable name of this variable.
    pub fn get_name(&self) -> &String {
        &self.name
    }
}

impl From<usize> for VariableId {
    fn from(val: usize) -> Self {
        VariableId(val)
    }
}

impl From<VariableId> for usize {
    fn from(value: VariableId) -> Self {
        value.0
    }
}

impl Display for VariableId {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(f, "BnVariable({})", self.0)
    }
}

impl VariableId {
    /// The name of the SBML species representing the vertex with this id in generated
    /// networks.
    pub fn species_name(self) -> String {
        format!("X{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use crate::{RegulatoryGraph, VariableId};

    #[test]
    fn basic_variable_test() {
        let rg = RegulatoryGraph::new(vec!["A".to_string()]);
        let a = rg.find_variable("A").unwrap();
        let a = &rg[a];
        assert_eq!("A", a.to_string().as_str());
        assert_eq!("A", a.get_name());
    }

    #[test]
    fn variable_id_conversion() {
        let id = VariableId::from(12);
        assert_eq!(12usize, usize::from(id));
        assert_eq!("X12", id.species_name());
        assert_eq!("BnVariable(12)", id.to_string());
    }
}

use crate::{Monotonicity, Regulation, VariableId};

impl Regulation {
    pub fn get_monotonicity(&self) -> Option<Monotonicity> {
        self.monotonicity
    }

    pub fn get_regulator(&self) -> VariableId {
        self.regulator
    }

    pub fn get_target(&self) -> VariableId {
        self.target
    }

    /// True if this regulation is known to be activating.
    pub fn is_activation(&self) -> bool {
        self.monotonicity == Some(Monotonicity::Activation)
    }

    /// The arrow used for this regulation in the `.aeon`-like notation.
    pub(crate) fn relationship_string(&self) -> &'static str {
        match self.monotonicity {
            Some(Monotonicity::Activation) => "->",
            Some(Monotonicity::Inhibition) => "-|",
            None => "-?",
        }
    }
}

impl Monotonicity {
    /// The value of the SBML-qual `sign` attribute for this monotonicity.
    pub fn sbml_sign(monotonicity: Option<Monotonicity>) -> &'static str {
        match monotonicity {
            None => "unknown",
            Some(Monotonicity::Activation) => "positive",
            Some(Monotonicity::Inhibition) => "negative",
        }
    }

    /// Inverse of `sbml_sign`. Unknown values result in `None`.
    pub fn from_sbml_sign(sign: &str) -> Option<Monotonicity> {
        match sign {
            "positive" => Some(Monotonicity::Activation),
            "negative" => Some(Monotonicity::Inhibition),
            _ => None,
        }
    }
}

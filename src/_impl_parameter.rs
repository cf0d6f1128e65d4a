use crate::{BooleanNetwork, Parameter, ParameterId};

impl Parameter {
    pub fn new(name: &str, arity: u32) -> Parameter {
        Parameter {
            name: name.to_string(),
            arity,
        }
    }

    pub fn get_name(&self) -> &String {
        &self.name
    }

    pub fn get_arity(&self) -> u32 {
        self.arity
    }
}

impl From<ParameterId> for usize {
    fn from(x: ParameterId) -> Self {
        x.0
    }
}

impl ParameterId {
    /// Try to construct a `ParameterId` from the given `usize` value. The id must be valid
    /// inside the context of the specified `BooleanNetwork`, otherwise `None` is returned.
    pub fn try_from_usize(context: &BooleanNetwork, value: usize) -> Option<ParameterId> {
        if value < context.parameters.len() {
            Some(ParameterId(value))
        } else {
            None
        }
    }
}

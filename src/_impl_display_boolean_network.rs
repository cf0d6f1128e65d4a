use crate::{BooleanNetwork, RegulatoryGraph};
use std::fmt::{Display, Error, Formatter};

/// Regulations are written one per line as `regulator 'arrow' target` (`->` activation,
/// `-|` inhibition, `-?` unknown), in insertion order.
impl Display for RegulatoryGraph {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        for r in &self.regulations {
            writeln!(
                f,
                "{} {} {}",
                self.get_variable(r.regulator),
                r.relationship_string(),
                self.get_variable(r.target)
            )?;
        }
        Ok(())
    }
}

impl Display for BooleanNetwork {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", self.graph)?;
        for var in self.variables() {
            if let Some(fun) = self.get_update_function(var) {
                writeln!(f, "${}: {}", self[var], fun.to_string(self))?;
            }
        }
        Ok(())
    }
}

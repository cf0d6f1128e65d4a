use crate::BinaryOp;
use crate::BinaryOp::*;
use std::fmt::{Display, Error, Formatter};

impl Display for BinaryOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        let symbol = match self {
            And => "&",
            Or => "|",
            Xor => "^",
            Imp => "=>",
            Iff => "<=>",
        };
        write!(f, "{}", symbol)?;
        Ok(())
    }
}

impl BinaryOp {
    /// Name of the MathML element representing this operator.
    pub fn mathml_tag(&self) -> &'static str {
        match self {
            Imp => "implies",
            And => "and",
            Or => "or",
            Xor => "xor",
            Iff => "eq",
        }
    }
}

//! A generator of random parametrised Boolean networks.
//!
//! The crate builds a `BooleanNetwork` from one of three random topology models, labels the
//! edges as signed regulations, synthesizes update functions (optionally containing
//! uninterpreted functions) and writes the result as SBML-qual. A separate
//! `NetworkParametrizer` can later replace simple binary sub-expressions of an existing
//! network with fresh uninterpreted functions.

#[macro_use]
extern crate lazy_static;

use regex::Regex;
use std::collections::HashMap;
use std::iter::Map;
use std::ops::Range;
use std::path::PathBuf;

pub mod config;
pub mod generator;
pub mod parametrizer;
pub mod sbml;

/// **(internal)** Utility methods for `BinaryOp`.
mod _impl_binary_op;
/// **(internal)** Utility methods for `BooleanNetwork`.
mod _impl_boolean_network;
/// **(internal)** `BooleanNetwork` to `.aeon`-like string.
mod _impl_display_boolean_network;
/// **(internal)** Utility methods for `FnUpdate`.
mod _impl_fn_update;
/// **(internal)** Utility methods for `Parameter` and `ParameterId`.
mod _impl_parameter;
/// **(internal)** Utility methods for `Regulation`.
mod _impl_regulation;
/// **(internal)** Utility methods for `RegulatoryGraph`.
mod _impl_regulatory_graph;
/// **(internal)** Utility methods for `Variable` and `VariableId`.
mod _impl_variable;

#[cfg(test)]
mod test_utils;

lazy_static! {
    /// A regular expression that matches the identifiers allowed as names of
    /// Boolean parameters or variables.
    static ref ID_REGEX: Regex = Regex::new(r"^[a-zA-Z0-9_]+$").unwrap();
}

/// A type-safe index of a `Variable` inside a `BooleanNetwork` (or a `RegulatoryGraph`).
///
/// In generated networks, the index is also the vertex id of the topology model.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct VariableId(usize);

/// A type-safe index of a `Parameter` inside a `BooleanNetwork`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ParameterId(usize);

/// Possible monotonous effects of a `Regulation` in a `BooleanNetwork`.
///
/// Activation means increasing monotonicity and inhibition means decreasing
/// monotonicity.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Monotonicity {
    Activation,
    Inhibition,
}

/// A variable of a `BooleanNetwork`.
///
/// Variable has a `name` and can have value either true or zero.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Variable {
    name: String,
}

/// A parameter of a `BooleanNetwork`.
///
/// Parameter is an uninterpreted boolean function with a fixed cardinality.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Parameter {
    name: String,
    arity: u32,
}

/// Describes an interaction relationship between two `Variable`s in a `BooleanNetwork`
/// (or a `RegulatoryGraph`).
///
/// Generated regulations are always monotonous. Monotonicity is optional only because
/// SBML documents created elsewhere can declare an `unknown` sign.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Regulation {
    regulator: VariableId,
    target: VariableId,
    monotonicity: Option<Monotonicity>,
}

/// A partial representation of a `BooleanNetwork`, `RegulatoryGraph` contains information
/// about the general structure of the network but lacks the concrete update functions
/// of individual variables.
///
/// The regulations are kept in the order in which they were added. This order determines
/// the order of regulators of each variable, which in turn determines the shape of the
/// generated update functions.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RegulatoryGraph {
    variables: Vec<Variable>,
    regulations: Vec<Regulation>,
    variable_to_index: HashMap<String, VariableId>,
    regulation_to_index: HashMap<(VariableId, VariableId), usize>,
}

/// Possible binary boolean operators that can appear in `FnUpdate`.
///
/// The generator only produces `And` and `Or`, the rest can appear in imported models.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BinaryOp {
    And,
    Or,
    Xor,
    Iff,
    Imp,
}

/// A boolean formula which references `Variable`s and `Parameter`s of the associated
/// `BooleanNetwork`.
///
/// An update function specifies the evolution rules for one specific `Variable` of a
/// `BooleanNetwork`. The cardinality of the function must be the same as specified
/// by the `RegulatoryGraph` if the network.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum FnUpdate {
    Const(bool),
    // Variable references an actual variable of the network (in SBML, this is `X == 1`).
    Var(VariableId),
    // Parameter references a parameter of the network together with variables that are
    // be used as arguments to the parameter function.
    Param(ParameterId, Vec<VariableId>),
    Not(Box<FnUpdate>),
    Binary(BinaryOp, Box<FnUpdate>, Box<FnUpdate>),
}

/// A boolean network parametrised with uninterpreted boolean functions.
///
/// If an update function for a specific variable is not set, we assume the whole
/// function is an implicit parameter (cardinality of which is inferred from the
/// regulatory graph).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BooleanNetwork {
    graph: RegulatoryGraph,
    parameters: Vec<Parameter>,
    update_functions: Vec<Option<FnUpdate>>,
    parameter_to_index: HashMap<String, ParameterId>,
}

/// Errors raised outside of the (purely in-memory) network model, i.e. while loading
/// configurations, reading or writing documents.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("Invalid generator settings: {0}")]
    InvalidSettings(String),
    #[error("Cannot access `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("Invalid SBML document: {0}")]
    Sbml(String),
    #[error("Invalid network: {0}")]
    Network(String),
}

/// An iterator over all `VariableId`s of a `RegulatoryGraph`.
pub type VariableIdIterator = Map<Range<usize>, fn(usize) -> VariableId>;

/// An iterator over all `ParameterId`s of a `BooleanNetwork`.
pub type ParameterIdIterator = Map<Range<usize>, fn(usize) -> ParameterId>;

/// An iterator over all `Regulation`s of a `RegulatoryGraph`.
pub type RegulationIterator<'a> = std::slice::Iter<'a, Regulation>;

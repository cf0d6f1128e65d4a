//! Adds support for SBML-qual import and export to `BooleanNetwork`.
//!
//! Generated networks are only ever written, but the parametrizer needs to read a finished
//! document back, so both directions are supported. Writing a network that was read from
//! a document produced by this module reproduces the document exactly.

use std::collections::HashMap;

/// Contains code for parsing SBML models using the roxmltree library. It is not 100% SBML-qual
/// compliant, but it reads everything the export module writes, plus the most common
/// constructs of models produced by other tools.
pub mod import;

/// Dumps a `BooleanNetwork` into a single-line SBML-qual document.
pub mod export;

/// A layout type for transferring information about node position from SBML files.
///
/// Keys are variable names. The map itself is unordered; the writer always emits glyphs
/// in the order of network variables.
pub type Layout = HashMap<String, (f64, f64)>;

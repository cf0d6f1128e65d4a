use crate::Monotonicity::{Activation, Inhibition};
use crate::{BooleanNetwork, RegulatoryGraph, VariableId};

/// Initialize env_logger for tests. Safe to call multiple times.
pub fn init_logger() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Trace)
        .is_test(true)
        .try_init();
}

/// Build a network over `X0..X(num_vars - 1)` with the given `(regulator, target, activation)`
/// regulations (added in the given order) and no update functions.
pub fn network_from_signs(num_vars: usize, regulations: &[(usize, usize, bool)]) -> BooleanNetwork {
    let mut rg = RegulatoryGraph::with_species(num_vars);
    for (regulator, target, activation) in regulations {
        let monotonicity = if *activation { Activation } else { Inhibition };
        rg.add_regulation_by_id(VariableId(*regulator), VariableId(*target), Some(monotonicity))
            .unwrap();
    }
    BooleanNetwork::new(rg)
}

//! Random generation of parametrised Boolean networks.
//!
//! A network is built in three steps, each driven by its own seed:
//!
//!  1. A `TopologyModel` produces an `EdgeSet` over `N` vertices.
//!  2. A `RegulationAssigner` orients the edges (when undirected) and labels every one of them
//!     as an activation or an inhibition, producing a `RegulatoryGraph`.
//!  3. A `FormulaSynthesizer` builds the update functions, some of which contain
//!     uninterpreted functions (parameters) of bounded arity.
//!
//! `NetworkGenerator` ties these steps together and derives all seeds from a single one, so
//! that the same settings and seed always give the same network.

use crate::sbml::Layout;
use crate::{BooleanNetwork, GeneratorError};
use log::{info, trace};
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};

/// **(internal)** Topology models.
mod _impl_topology;
/// **(internal)** Orientation and signs of regulations.
mod _impl_regulations;
/// **(internal)** Synthesis of update functions.
mod _impl_formula_synthesis;
/// **(internal)** Seeded random streams.
mod _impl_seed_stream;

pub use _impl_formula_synthesis::emits_formula;

/// All derived seeds are below this value (`2^31 - 1`).
pub const MAX_SEED: u64 = (1 << 31) - 1;

/// Radius of the circle on which the generated layout places the variables.
const LAYOUT_RADIUS: f64 = 200.0;

/// A deterministic source of random decisions, fully determined by its initial seed.
///
/// Every independent decision of the generator uses its own stream, so that changing
/// how one decision is drawn never affects the others.
pub struct SeedStream {
    rng: StdRng,
}

/// A random graph model used to generate the network topology.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TopologyModel {
    /// Every ordered pair of distinct vertices is a (directed) edge with the given `probability`.
    Random { probability: f64 },
    /// A ring lattice where every vertex is connected to `neighbours / 2` vertices on each
    /// side, with every edge rewired with `rewire_probability`.
    WattsStrogatz {
        neighbours: usize,
        rewire_probability: f64,
    },
    /// Preferential attachment, where every new vertex connects to `connections`
    /// existing vertices.
    BarabasiAlbert { connections: usize },
}

/// Edges produced by a `TopologyModel`, in enumeration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EdgeSet {
    /// `(regulator, target)` pairs.
    Directed(Vec<(usize, usize)>),
    /// `(min, max)` pairs in ascending order.
    Undirected(Vec<(usize, usize)>),
}

/// Converts an `EdgeSet` into signed regulations.
#[derive(Clone, Debug)]
pub struct RegulationAssigner {
    activation_fraction: f64,
}

/// Builds update functions over the regulators of each variable.
#[derive(Clone, Debug)]
pub struct FormulaSynthesizer {
    lower: u32,
    upper: u32,
}

/// Everything that determines the shape of generated networks (except for the seed).
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorSettings {
    pub num_vars: usize,
    pub model: TopologyModel,
    /// Probability that a regulation is an activation.
    pub activation_fraction: f64,
    /// Lower bound on the arity of uninterpreted functions.
    pub arity_lower: u32,
    /// Upper bound on the arity of uninterpreted functions.
    pub arity_upper: u32,
}

/// Generates networks according to validated `GeneratorSettings`.
#[derive(Clone, Debug)]
pub struct NetworkGenerator {
    settings: GeneratorSettings,
}

impl GeneratorSettings {
    /// Settings with the default activation fraction (`0.8`) and arity bounds (`[2, 4]`).
    pub fn new(num_vars: usize, model: TopologyModel) -> GeneratorSettings {
        GeneratorSettings {
            num_vars,
            model,
            activation_fraction: 0.8,
            arity_lower: 2,
            arity_upper: 4,
        }
    }

    /// Check that the settings describe a network which can be generated.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        let n = self.num_vars;
        if n < 2 {
            return invalid(format!("At least 2 vertices are required, got {}.", n));
        }
        if self.arity_lower < 1 {
            return invalid("The lower arity bound must be at least 1.".to_string());
        }
        if self.arity_lower > self.arity_upper {
            return invalid(format!(
                "The lower arity bound {} is larger than the upper bound {}.",
                self.arity_lower, self.arity_upper
            ));
        }
        if !(0.0..=1.0).contains(&self.activation_fraction) {
            return invalid(format!(
                "The fraction of activating regulations must be in [0, 1], got {}.",
                self.activation_fraction
            ));
        }
        match self.model {
            TopologyModel::Random { probability } => {
                if !(probability > 0.0 && probability <= 1.0) {
                    return invalid(format!(
                        "The connection probability must be in (0, 1], got {}.",
                        probability
                    ));
                }
            }
            TopologyModel::WattsStrogatz {
                neighbours,
                rewire_probability,
            } => {
                if neighbours < 2 || neighbours >= n {
                    return invalid(format!(
                        "The number of neighbours must be in [2, {}), got {}.",
                        n, neighbours
                    ));
                }
                if !(0.0..=1.0).contains(&rewire_probability) {
                    return invalid(format!(
                        "The rewire probability must be in [0, 1], got {}.",
                        rewire_probability
                    ));
                }
            }
            TopologyModel::BarabasiAlbert { connections } => {
                if connections < 1 || connections >= n {
                    return invalid(format!(
                        "The number of connections must be in [1, {}), got {}.",
                        n, connections
                    ));
                }
            }
        }
        Ok(())
    }
}

fn invalid(message: String) -> Result<(), GeneratorError> {
    Err(GeneratorError::InvalidSettings(message))
}

impl NetworkGenerator {
    /// Create a generator, failing if the `settings` are not valid.
    pub fn new(settings: GeneratorSettings) -> Result<NetworkGenerator, GeneratorError> {
        settings.validate()?;
        Ok(NetworkGenerator { settings })
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Generate one network. The topology uses `seed` directly, the regulation and
    /// transition seeds are derived from it.
    pub fn generate(&self, seed: u64) -> Result<BooleanNetwork, GeneratorError> {
        let settings = &self.settings;
        let seeds = SeedStream::new(seed).seeds(2);
        let edges = settings.model.generate_edges(settings.num_vars, seed);
        let graph = RegulationAssigner::new(settings.activation_fraction)
            .assign(settings.num_vars, &edges, seeds[0])
            .map_err(GeneratorError::Network)?;
        let network = FormulaSynthesizer::new(settings.arity_lower, settings.arity_upper)
            .synthesize(graph, seeds[1])
            .map_err(GeneratorError::Network)?;
        info!(
            "Generated network with {} variables, {} regulations and {} parameters (seed {}).",
            network.num_vars(),
            network.as_graph().num_regulations(),
            network.num_parameters(),
            seed
        );
        trace!("Network {}:\n{}", seed, network);
        Ok(network)
    }

    /// The seeds of the networks of a batch, derived from the `master_seed`.
    pub fn network_seeds(master_seed: u64, count: usize) -> Vec<u64> {
        SeedStream::new(master_seed).seeds(count)
    }

    /// File name of the `index`-th network of a batch generated with the `master_seed`.
    pub fn file_name(&self, master_seed: u64, index: usize) -> String {
        let settings = &self.settings;
        format!(
            "bn_{}_s{}_l{}_u{}_f{:?}_n{}_{}.sbml",
            settings.model.file_tag(),
            master_seed,
            settings.arity_lower,
            settings.arity_upper,
            settings.activation_fraction,
            settings.num_vars,
            index
        )
    }

    /// Generate `count` networks and write them (with a circle layout) as SBML files into
    /// `output_dir`, which is created if necessary. Returns the paths of the written files.
    pub fn generate_batch(
        &self,
        master_seed: u64,
        count: usize,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, GeneratorError> {
        std::fs::create_dir_all(output_dir).map_err(|source| GeneratorError::Io {
            path: output_dir.to_path_buf(),
            source,
        })?;
        let mut paths = Vec::with_capacity(count);
        for (index, seed) in Self::network_seeds(master_seed, count).into_iter().enumerate() {
            let network = self.generate(seed)?;
            let document = network.to_sbml(&circle_layout(&network));
            let path = output_dir.join(self.file_name(master_seed, index));
            std::fs::write(&path, document).map_err(|source| GeneratorError::Io {
                path: path.clone(),
                source,
            })?;
            info!("Written `{}`.", path.display());
            paths.push(path);
        }
        Ok(paths)
    }
}

/// Place the variables of the `network` evenly on a circle of radius 200 centred at the
/// origin, starting at `(200, 0)`. Coordinates are rounded to two decimal places.
pub fn circle_layout(network: &BooleanNetwork) -> Layout {
    let step = std::f64::consts::TAU / network.num_vars() as f64;
    network
        .variables()
        .enumerate()
        .map(|(i, var)| {
            let angle = step * i as f64;
            let x = round_to_hundredths(LAYOUT_RADIUS * angle.cos());
            let y = round_to_hundredths(LAYOUT_RADIUS * angle.sin());
            (network.get_variable_name(var).clone(), (x, y))
        })
        .collect()
}

fn round_to_hundredths(value: f64) -> f64 {
    // Avoid writing `-0` into documents.
    (value * 100.0).round() / 100.0 + 0.0
}

#[cfg(test)]
mod tests {
    use crate::generator::{circle_layout, GeneratorSettings, NetworkGenerator, TopologyModel};
    use crate::test_utils::init_logger;
    use crate::{BooleanNetwork, GeneratorError, VariableId};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn random_generator(num_vars: usize, probability: f64) -> NetworkGenerator {
        NetworkGenerator::new(GeneratorSettings::new(
            num_vars,
            TopologyModel::Random { probability },
        ))
        .unwrap()
    }

    #[test]
    fn full_random_network_is_reproducible() {
        init_logger();
        let generator = random_generator(5, 1.0);
        let a = generator.generate(42).unwrap();
        let b = generator.generate(42).unwrap();
        let c = generator.generate(43).unwrap();
        let sbml_a = a.to_sbml(&circle_layout(&a));
        assert_eq!(sbml_a, b.to_sbml(&circle_layout(&b)));
        assert_ne!(sbml_a, c.to_sbml(&circle_layout(&c)));

        // Every variable is regulated by all the others, in ascending order.
        assert_eq!(a.as_graph().num_regulations(), 20);
        for v in a.variables() {
            let expected: Vec<VariableId> = a.variables().filter(|it| *it != v).collect();
            assert_eq!(a.regulators(v), expected);
        }
    }

    #[rstest]
    #[case(TopologyModel::Random { probability: 0.2 })]
    #[case(TopologyModel::WattsStrogatz { neighbours: 4, rewire_probability: 0.1 })]
    #[case(TopologyModel::BarabasiAlbert { connections: 2 })]
    fn species_are_complete(#[case] model: TopologyModel) {
        let generator = NetworkGenerator::new(GeneratorSettings::new(12, model)).unwrap();
        let network = generator.generate(7).unwrap();
        let sbml = network.to_sbml(&circle_layout(&network));
        assert_eq!(sbml.matches("<qual:qualitativeSpecies ").count(), 12);
        for i in 0..12 {
            assert!(sbml.contains(&format!("qual:id=\"X{}\"/>", i)));
        }
        let (read, layout) = BooleanNetwork::try_from_sbml(&sbml).unwrap();
        assert_eq!(layout.len(), 12);
        assert_eq!(sbml, read.to_sbml(&layout));
    }

    #[rstest]
    #[case(GeneratorSettings::new(1, TopologyModel::Random { probability: 0.5 }))]
    #[case(GeneratorSettings::new(5, TopologyModel::Random { probability: 0.0 }))]
    #[case(GeneratorSettings::new(5, TopologyModel::Random { probability: 1.5 }))]
    #[case(GeneratorSettings::new(5, TopologyModel::WattsStrogatz { neighbours: 5, rewire_probability: 0.5 }))]
    #[case(GeneratorSettings::new(5, TopologyModel::WattsStrogatz { neighbours: 1, rewire_probability: 0.5 }))]
    #[case(GeneratorSettings::new(5, TopologyModel::WattsStrogatz { neighbours: 2, rewire_probability: -0.1 }))]
    #[case(GeneratorSettings::new(5, TopologyModel::BarabasiAlbert { connections: 0 }))]
    #[case(GeneratorSettings::new(5, TopologyModel::BarabasiAlbert { connections: 5 }))]
    #[case(GeneratorSettings { arity_lower: 0, ..GeneratorSettings::new(5, TopologyModel::BarabasiAlbert { connections: 2 }) })]
    #[case(GeneratorSettings { arity_lower: 5, arity_upper: 4, ..GeneratorSettings::new(5, TopologyModel::BarabasiAlbert { connections: 2 }) })]
    #[case(GeneratorSettings { activation_fraction: 1.2, ..GeneratorSettings::new(5, TopologyModel::BarabasiAlbert { connections: 2 }) })]
    fn invalid_settings_are_rejected(#[case] settings: GeneratorSettings) {
        let result = NetworkGenerator::new(settings);
        assert!(matches!(result, Err(GeneratorError::InvalidSettings(_))));
    }

    #[test]
    fn batch_file_names() {
        init_logger();
        let settings = GeneratorSettings {
            activation_fraction: 0.5,
            ..GeneratorSettings::new(
                6,
                TopologyModel::WattsStrogatz {
                    neighbours: 2,
                    rewire_probability: 0.25,
                },
            )
        };
        let generator = NetworkGenerator::new(settings).unwrap();
        assert_eq!(
            generator.file_name(42, 1),
            "bn_ws_2_0.25_s42_l2_u4_f0.5_n6_1.sbml"
        );

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("networks");
        let paths = generator.generate_batch(42, 3, &output).unwrap();
        assert_eq!(paths.len(), 3);
        let seeds = NetworkGenerator::network_seeds(42, 3);
        for (index, path) in paths.iter().enumerate() {
            assert_eq!(path, &output.join(generator.file_name(42, index)));
            let content = std::fs::read_to_string(path).unwrap();
            let network = generator.generate(seeds[index]).unwrap();
            assert_eq!(content, network.to_sbml(&circle_layout(&network)));
        }
    }

    #[test]
    fn circle_layout_positions() {
        let network = random_generator(4, 0.5).generate(1).unwrap();
        let layout = circle_layout(&network);
        assert_eq!(layout["X0"], (200.0, 0.0));
        assert_eq!(layout["X1"], (0.0, 200.0));
        assert_eq!(layout["X2"], (-200.0, 0.0));
        assert_eq!(layout["X3"], (0.0, -200.0));
    }
}

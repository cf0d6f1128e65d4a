//! JSON configuration of batch generation.
//!
//! The keys follow the established configuration format of the generator:
//!
//! ```json
//! {
//!   "seed": 42,
//!   "vertices": 20,
//!   "number of networks": 2,
//!   "fraction of act regs": 0.8,
//!   "uninterpreted function arity": { "lower bound": 2, "upper bound": 4 },
//!   "generator": {
//!     "Barabasi-Albert": { "use": false, "connections": 2 },
//!     "Watts-Strogatz": { "use": true, "connections": 4, "rewire probability": "rand" },
//!     "Random Network": { "use": false, "connection probability": 0.1 }
//!   }
//! }
//! ```
//!
//! Every number can be replaced with `"rand"`, in which case it is drawn using the seed.
//! A `"rand"` seed is taken from the current time.

use crate::generator::{GeneratorSettings, NetworkGenerator, SeedStream, TopologyModel};
use crate::GeneratorError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// The `"rand"` placeholder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RandomMarker {
    #[serde(rename = "rand")]
    Rand,
}

/// A configuration value which is either given explicitly or drawn at random.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Setting<T> {
    Value(T),
    Random(RandomMarker),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub seed: Setting<u64>,
    pub vertices: Setting<usize>,
    #[serde(rename = "number of networks")]
    pub networks: Setting<usize>,
    #[serde(rename = "fraction of act regs")]
    pub activation_fraction: Setting<f64>,
    #[serde(rename = "uninterpreted function arity")]
    pub arity: ArityConfig,
    pub generator: ModelConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArityConfig {
    #[serde(rename = "lower bound")]
    pub lower: Setting<u32>,
    #[serde(rename = "upper bound")]
    pub upper: Setting<u32>,
}

/// The topology models. The first enabled one (in the order Barabási-Albert,
/// Watts-Strogatz, random) is used.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(rename = "Barabasi-Albert", default)]
    pub barabasi_albert: Option<BarabasiAlbertConfig>,
    #[serde(rename = "Watts-Strogatz", default)]
    pub watts_strogatz: Option<WattsStrogatzConfig>,
    #[serde(rename = "Random Network", default)]
    pub random: Option<RandomNetworkConfig>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BarabasiAlbertConfig {
    #[serde(rename = "use")]
    pub enabled: bool,
    pub connections: Setting<usize>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WattsStrogatzConfig {
    #[serde(rename = "use")]
    pub enabled: bool,
    pub connections: Setting<usize>,
    #[serde(rename = "rewire probability")]
    pub rewire_probability: Setting<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RandomNetworkConfig {
    #[serde(rename = "use")]
    pub enabled: bool,
    #[serde(rename = "connection probability")]
    pub connection_probability: Setting<f64>,
}

/// A configuration with every `"rand"` value resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedConfig {
    pub seed: u64,
    pub networks: usize,
    pub settings: GeneratorSettings,
}

impl<T: Copy> Setting<T> {
    /// The explicit value, or the first value drawn by `draw` from a stream seeded
    /// with `seed`.
    fn resolve<F>(&self, seed: u64, draw: F) -> T
    where
        F: FnOnce(&mut SeedStream) -> T,
    {
        match self {
            Setting::Value(value) => *value,
            Setting::Random(_) => draw(&mut SeedStream::new(seed)),
        }
    }
}

impl GeneratorConfig {
    /// Parse a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<GeneratorConfig, GeneratorError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<GeneratorConfig, GeneratorError> {
        let json = std::fs::read_to_string(path).map_err(|source| GeneratorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        GeneratorConfig::from_json(&json)
    }

    /// Resolve all `"rand"` values and check that the result is valid.
    pub fn resolve(&self) -> Result<ResolvedConfig, GeneratorError> {
        let seed = match self.seed {
            Setting::Value(seed) => seed,
            Setting::Random(_) => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|it| it.as_secs())
                .unwrap_or_default(),
        };
        let num_vars = self.vertices.resolve(seed, |s| s.uniform_usize(2..=1000));
        let networks = self.networks.resolve(seed, |s| s.uniform_usize(1..=4));
        let activation_fraction = self
            .activation_fraction
            .resolve(seed, |s| round_to(s.unit(), 10.0));
        let arity_lower = self.arity.lower.resolve(seed, |s| s.uniform(1..=4));
        let arity_upper = self.arity.upper.resolve(seed, |s| s.uniform(4..=8));
        let model = self.generator.resolve(seed, num_vars)?;

        let settings = GeneratorSettings {
            num_vars,
            model,
            activation_fraction,
            arity_lower,
            arity_upper,
        };
        settings.validate()?;
        if networks == 0 {
            return Err(GeneratorError::InvalidSettings(
                "At least one network must be generated.".to_string(),
            ));
        }
        debug!("Resolved configuration: {:?} (seed {}).", settings, seed);
        Ok(ResolvedConfig {
            seed,
            networks,
            settings,
        })
    }
}

impl ModelConfig {
    fn resolve(&self, seed: u64, num_vars: usize) -> Result<TopologyModel, GeneratorError> {
        let random_range = |lower: usize, upper: usize, what: &str| {
            if lower > upper {
                Err(GeneratorError::InvalidSettings(format!(
                    "Cannot draw random {} for {} vertices.",
                    what, num_vars
                )))
            } else {
                Ok(SeedStream::new(seed).uniform_usize(lower..=upper))
            }
        };
        let probability =
            |setting: Setting<f64>| setting.resolve(seed, |s| round_to(s.unit(), 100.0));

        if let Some(config) = self.barabasi_albert.as_ref().filter(|it| it.enabled) {
            let connections = match config.connections {
                Setting::Value(value) => value,
                Setting::Random(_) => random_range(2, num_vars.saturating_sub(2), "connections")?,
            };
            return Ok(TopologyModel::BarabasiAlbert { connections });
        }
        if let Some(config) = self.watts_strogatz.as_ref().filter(|it| it.enabled) {
            let neighbours = match config.connections {
                Setting::Value(value) => value,
                Setting::Random(_) => random_range(2, num_vars.saturating_sub(1), "connections")?,
            };
            return Ok(TopologyModel::WattsStrogatz {
                neighbours,
                rewire_probability: probability(config.rewire_probability),
            });
        }
        if let Some(config) = self.random.as_ref().filter(|it| it.enabled) {
            return Ok(TopologyModel::Random {
                probability: probability(config.connection_probability),
            });
        }
        Err(GeneratorError::InvalidSettings(
            "No network generator is enabled.".to_string(),
        ))
    }
}

fn round_to(value: f64, scale: f64) -> f64 {
    (value * scale).round() / scale
}

/// Generate the batch of networks described by the configuration file at `path` into
/// `output_dir`. Returns the paths of the written files.
pub fn generate_from_config(
    path: &Path,
    output_dir: &Path,
) -> Result<Vec<PathBuf>, GeneratorError> {
    let config = GeneratorConfig::from_file(path)?.resolve()?;
    info!(
        "Generating {} network(s) from `{}` (seed {}).",
        config.networks,
        path.display(),
        config.seed
    );
    NetworkGenerator::new(config.settings)?.generate_batch(
        config.seed,
        config.networks,
        output_dir,
    )
}

#[cfg(test)]
mod tests {
    use crate::config::{generate_from_config, GeneratorConfig, RandomMarker, Setting};
    use crate::generator::TopologyModel;
    use crate::test_utils::init_logger;
    use crate::GeneratorError;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    const WATTS_STROGATZ: &str = r#"{
        "seed": 42,
        "vertices": 20,
        "number of networks": 2,
        "fraction of act regs": 0.5,
        "uninterpreted function arity": { "lower bound": 1, "upper bound": 3 },
        "generator": {
            "Barabasi-Albert": { "use": false, "connections": 2 },
            "Watts-Strogatz": { "use": true, "connections": 4, "rewire probability": 0.25 },
            "Random Network": { "use": false, "connection probability": 0.1 }
        }
    }"#;

    const ALL_RANDOM: &str = r#"{
        "seed": 7,
        "vertices": "rand",
        "number of networks": "rand",
        "fraction of act regs": "rand",
        "uninterpreted function arity": { "lower bound": "rand", "upper bound": "rand" },
        "generator": {
            "Barabasi-Albert": { "use": true, "connections": "rand" }
        }
    }"#;

    #[test]
    fn explicit_values() {
        let config = GeneratorConfig::from_json(WATTS_STROGATZ).unwrap();
        assert_eq!(config.seed, Setting::Value(42));
        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.seed, 42);
        assert_eq!(resolved.networks, 2);
        let settings = resolved.settings;
        assert_eq!(settings.num_vars, 20);
        assert_eq!(settings.activation_fraction, 0.5);
        assert_eq!((settings.arity_lower, settings.arity_upper), (1, 3));
        assert_eq!(
            settings.model,
            TopologyModel::WattsStrogatz {
                neighbours: 4,
                rewire_probability: 0.25
            }
        );
    }

    #[test]
    fn random_values_are_deterministic() {
        let config = GeneratorConfig::from_json(ALL_RANDOM).unwrap();
        assert_eq!(config.vertices, Setting::Random(RandomMarker::Rand));
        let resolved = config.resolve().unwrap();
        assert_eq!(resolved, config.resolve().unwrap());

        let settings = &resolved.settings;
        assert!((2..=1000).contains(&settings.num_vars));
        assert!((1..=4).contains(&resolved.networks));
        assert!((0.0..=1.0).contains(&settings.activation_fraction));
        let tenths = settings.activation_fraction * 10.0;
        assert!((tenths - tenths.round()).abs() < 1e-9);
        assert!((1..=4).contains(&settings.arity_lower));
        assert!((4..=8).contains(&settings.arity_upper));
        let TopologyModel::BarabasiAlbert { connections } = settings.model else {
            panic!("Unexpected model {:?}", settings.model);
        };
        assert!(connections >= 2 && connections <= settings.num_vars - 2);
    }

    #[test]
    fn invalid_configurations() {
        assert!(matches!(
            GeneratorConfig::from_json("{ \"seed\": 1 }"),
            Err(GeneratorError::Config(_))
        ));
        let bad_marker = WATTS_STROGATZ.replace("\"vertices\": 20", "\"vertices\": \"many\"");
        assert!(GeneratorConfig::from_json(&bad_marker).is_err());

        let disabled = WATTS_STROGATZ.replace("\"use\": true", "\"use\": false");
        let config = GeneratorConfig::from_json(&disabled).unwrap();
        assert!(matches!(
            config.resolve(),
            Err(GeneratorError::InvalidSettings(_))
        ));

        let too_many = WATTS_STROGATZ.replace("\"connections\": 4", "\"connections\": 20");
        let config = GeneratorConfig::from_json(&too_many).unwrap();
        assert!(matches!(
            config.resolve(),
            Err(GeneratorError::InvalidSettings(_))
        ));

        assert!(matches!(
            GeneratorConfig::from_file(Path::new("/nonexistent/config.json")),
            Err(GeneratorError::Io { .. })
        ));
    }

    #[test]
    fn generate_from_config_file() {
        init_logger();
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        std::fs::write(&config_path, WATTS_STROGATZ).unwrap();
        let output = dir.path().join("out");
        let paths = generate_from_config(&config_path, &output).unwrap();
        let names: Vec<String> = paths
            .iter()
            .map(|it| it.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "bn_ws_4_0.25_s42_l1_u3_f0.5_n20_0.sbml",
                "bn_ws_4_0.25_s42_l1_u3_f0.5_n20_1.sbml"
            ]
        );
        assert!(paths.iter().all(|it| it.is_file()));
    }
}

//! Command line interface of the generator.
//!
//! ```text
//! pbn-gen generate --vertices 20 --seed 42 watts-strogatz --neighbours 4 --rewire 0.2
//! pbn-gen config config.json
//! pbn-gen parametrize networks/bn_ba_2_s1_l2_u4_f0.8_n10_0.sbml --fraction 0.5 --seed 3
//! ```

use biodivine_pbn_generator::config::generate_from_config;
use biodivine_pbn_generator::generator::{GeneratorSettings, NetworkGenerator, TopologyModel};
use biodivine_pbn_generator::parametrizer::NetworkParametrizer;
use biodivine_pbn_generator::GeneratorError;
use clap::{Args, Parser, Subcommand};
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;

/// Generator of random parametrised Boolean networks in SBML-qual format.
#[derive(Parser, Debug)]
#[command(name = "pbn-gen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory where the SBML files are written.
    #[arg(short, long, global = true, default_value = ".")]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a batch of networks with the given topology model.
    Generate {
        #[command(flatten)]
        options: GenerateOptions,

        #[command(subcommand)]
        model: ModelCommand,
    },
    /// Generate a batch of networks described by a JSON configuration file.
    Config {
        /// Path to the configuration file.
        path: PathBuf,
    },
    /// Replace a fraction of eligible `AND`/`OR` nodes in an SBML network with
    /// uninterpreted functions.
    Parametrize {
        /// Path to the input SBML file.
        input: PathBuf,

        /// Fraction of eligible nodes to replace.
        #[arg(short, long)]
        fraction: f64,

        #[arg(short, long, default_value_t = 0)]
        seed: u64,
    },
}

#[derive(Args, Debug)]
struct GenerateOptions {
    /// Number of variables of each network.
    #[arg(short = 'n', long)]
    vertices: usize,

    /// Master seed of the batch.
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Number of networks to generate.
    #[arg(short = 'c', long, default_value_t = 1)]
    networks: usize,

    /// Probability that a regulation is an activation.
    #[arg(short, long, default_value_t = 0.8)]
    fraction: f64,

    /// Lower bound on the arity of uninterpreted functions.
    #[arg(short, long, default_value_t = 2)]
    lower: u32,

    /// Upper bound on the arity of uninterpreted functions.
    #[arg(short, long, default_value_t = 4)]
    upper: u32,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum ModelCommand {
    /// Every ordered pair of distinct vertices is connected with the given probability.
    Random {
        #[arg(short, long)]
        probability: f64,
    },
    /// Small-world ring lattice with random rewiring.
    WattsStrogatz {
        /// Each vertex is connected to this many nearest neighbours.
        #[arg(short = 'k', long)]
        neighbours: usize,

        #[arg(short, long)]
        rewire: f64,
    },
    /// Preferential attachment.
    BarabasiAlbert {
        /// Number of edges attached from every new vertex.
        #[arg(short = 'm', long)]
        connections: usize,
    },
}

impl From<ModelCommand> for TopologyModel {
    fn from(value: ModelCommand) -> Self {
        match value {
            ModelCommand::Random { probability } => TopologyModel::Random { probability },
            ModelCommand::WattsStrogatz { neighbours, rewire } => TopologyModel::WattsStrogatz {
                neighbours,
                rewire_probability: rewire,
            },
            ModelCommand::BarabasiAlbert { connections } => {
                TopologyModel::BarabasiAlbert { connections }
            }
        }
    }
}

fn run(cli: Cli) -> Result<Vec<PathBuf>, GeneratorError> {
    match cli.command {
        Command::Generate { options, model } => {
            let settings = GeneratorSettings {
                num_vars: options.vertices,
                model: model.into(),
                activation_fraction: options.fraction,
                arity_lower: options.lower,
                arity_upper: options.upper,
            };
            NetworkGenerator::new(settings)?.generate_batch(
                options.seed,
                options.networks,
                &cli.output,
            )
        }
        Command::Config { path } => generate_from_config(&path, &cli.output),
        Command::Parametrize {
            input,
            fraction,
            seed,
        } => {
            let path =
                NetworkParametrizer::new(fraction, seed)?.parametrize_file(&input, &cli.output)?;
            Ok(vec![path])
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match run(Cli::parse()) {
        Ok(paths) => {
            for path in paths {
                println!("{}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

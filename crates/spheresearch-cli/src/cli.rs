use clap::{Args, Parser, Subcommand};
use spheresearch::core::measurement::Strategy;
use spheresearch::engine::config::EnumerationMode;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Search a latitude/longitude lattice on a sphere for the best placement of k points.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel scoring.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Enumerate placements of points on the lattice and report the optimal one.
    Search(SearchArgs),
    /// Print the candidate lattice, one point per line.
    Lattice(LatticeArgs),
}

/// Lattice dimensions shared by all subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct LatticeOverrides {
    /// Override the sphere radius.
    #[arg(short, long, value_name = "FLOAT")]
    pub radius: Option<f64>,

    /// Override the number of longitude lines.
    #[arg(long, value_name = "INT")]
    pub slices: Option<usize>,

    /// Override the number of latitude bands (latitude lines + 1).
    #[arg(long, value_name = "INT")]
    pub stacks: Option<usize>,
}

/// Arguments for the `search` subcommand.
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub lattice: LatticeOverrides,

    // --- Search Overrides ---
    /// Override the number of points to place.
    #[arg(short = 'k', long, value_name = "INT")]
    pub points: Option<usize>,

    /// Override the measurement strategy.
    #[arg(short, long, value_enum, value_name = "STRATEGY")]
    pub strategy: Option<StrategyArg>,

    /// Override the enumeration mode.
    #[arg(short, long, value_enum, value_name = "MODE")]
    pub enumeration: Option<EnumerationArg>,

    // --- Run Control ---
    /// Stop after this many evaluations, even if the search is not complete.
    #[arg(long, value_name = "INT")]
    pub max_evaluations: Option<u64>,

    /// Number of placements evaluated per batch.
    #[arg(long, value_name = "INT")]
    pub batch_size: Option<u64>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S search.points=6
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `lattice` subcommand.
#[derive(Args, Debug)]
pub struct LatticeArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub lattice: LatticeOverrides,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyArg {
    /// Maximize the minimum pairwise distance.
    MinDistance,
    /// Minimize the empty-circle to closest-pair ratio.
    CircleRatio,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::MinDistance => Strategy::MinPairwiseDistance,
            StrategyArg::CircleRatio => Strategy::CircleRatio,
        }
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumerationArg {
    /// Visit every combination.
    Exhaustive,
    /// Skip ahead past the closest pair after each evaluation.
    PruneHinted,
}

impl From<EnumerationArg> for EnumerationMode {
    fn from(arg: EnumerationArg) -> Self {
        match arg {
            EnumerationArg::Exhaustive => EnumerationMode::Exhaustive,
            EnumerationArg::PruneHinted => EnumerationMode::PruneHinted,
        }
    }
}

use crate::cli::{LatticeOverrides, SearchArgs};
use crate::error::{CliError, Result};
use serde::Deserialize;
use serde::de::value::StrDeserializer;
use serde::de::{DeserializeOwned, IntoDeserializer};
use spheresearch::core::measurement::Strategy;
use spheresearch::engine::config::{
    EnumerationMode, LatticeConfig, SearchConfig, SearchConfigBuilder,
};
use std::path::Path;
use tracing::debug;

const DEFAULT_RADIUS: f64 = 1.0;
const DEFAULT_SLICES: usize = 20;
const DEFAULT_STACKS: usize = 20;
const DEFAULT_POINTS: usize = 8;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialLatticeConfig {
    radius: Option<f64>,
    slices: Option<usize>,
    stacks: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialSearchSection {
    points: Option<usize>,
    strategy: Option<Strategy>,
    enumeration: Option<EnumerationMode>,
}

/// Configuration as read from a TOML file. Every field is optional; CLI flags
/// take precedence and built-in defaults fill whatever remains.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct PartialSearchConfig {
    lattice: Option<PartialLatticeConfig>,
    search: Option<PartialSearchSection>,
}

impl PartialSearchConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::ConfigFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn from_optional_file(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn merge_with_cli(mut self, args: &SearchArgs) -> Result<SearchConfig> {
        self.apply_set_values(&args.set_values)?;

        let lattice = self.merge_lattice(&args.lattice);
        let search = self.search.take().unwrap_or_default();

        let strategy = args
            .strategy
            .map(Strategy::from)
            .or(search.strategy)
            .unwrap_or_default();
        let enumeration = args
            .enumeration
            .map(EnumerationMode::from)
            .or(search.enumeration)
            .unwrap_or_else(|| strategy.default_enumeration());

        SearchConfigBuilder::new()
            .radius(lattice.radius)
            .slices(lattice.slices)
            .stacks(lattice.stacks)
            .points(args.points.or(search.points).unwrap_or(DEFAULT_POINTS))
            .strategy(strategy)
            .enumeration(enumeration)
            .build()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Resolves only the lattice dimensions, for commands that never search.
    pub fn merge_lattice(&self, overrides: &LatticeOverrides) -> LatticeConfig {
        let file = self.lattice.clone().unwrap_or_default();
        LatticeConfig {
            radius: overrides.radius.or(file.radius).unwrap_or(DEFAULT_RADIUS),
            slices: overrides.slices.or(file.slices).unwrap_or(DEFAULT_SLICES),
            stacks: overrides.stacks.or(file.stacks).unwrap_or(DEFAULT_STACKS),
        }
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };
            let key = key.trim();
            let value_str = value_str.trim();

            match key {
                "lattice.radius" => {
                    self.lattice.get_or_insert_with(Default::default).radius =
                        Some(parse_value(key, value_str, "float")?);
                }
                "lattice.slices" => {
                    self.lattice.get_or_insert_with(Default::default).slices =
                        Some(parse_value(key, value_str, "integer")?);
                }
                "lattice.stacks" => {
                    self.lattice.get_or_insert_with(Default::default).stacks =
                        Some(parse_value(key, value_str, "integer")?);
                }
                "search.points" => {
                    self.search.get_or_insert_with(Default::default).points =
                        Some(parse_value(key, value_str, "integer")?);
                }
                "search.strategy" => {
                    self.search.get_or_insert_with(Default::default).strategy =
                        Some(parse_named(key, value_str)?);
                }
                "search.enumeration" => {
                    self.search.get_or_insert_with(Default::default).enumeration =
                        Some(parse_named(key, value_str)?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value_str: &str, kind: &str) -> Result<T> {
    value_str.parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value_str))
    })
}

fn parse_named<T: DeserializeOwned>(key: &str, value_str: &str) -> Result<T> {
    let deserializer: StrDeserializer<'_, serde::de::value::Error> = value_str.into_deserializer();
    T::deserialize(deserializer)
        .map_err(|e| CliError::Config(format!("Invalid value for {}: {}", key, e)))
}

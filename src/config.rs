use log::info;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Locations of the source files. Flight data is registered per year.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_airports")]
    pub airports: PathBuf,
    #[serde(default = "default_carriers")]
    pub carriers: PathBuf,
    #[serde(default = "default_planes")]
    pub planes: PathBuf,
    #[serde(default = "default_flights", deserialize_with = "year_keys")]
    pub flights: BTreeMap<i32, PathBuf>,
}

fn default_airports() -> PathBuf {
    PathBuf::from("data/airports.csv")
}

fn default_carriers() -> PathBuf {
    PathBuf::from("data/carriers.csv")
}

fn default_planes() -> PathBuf {
    PathBuf::from("data/planes.csv")
}

fn default_flights() -> BTreeMap<i32, PathBuf> {
    BTreeMap::from([(2008, PathBuf::from("data/flights-2008.csv"))])
}

// TOML table keys are always strings.
fn year_keys<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<i32, PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    BTreeMap::<String, PathBuf>::deserialize(deserializer)?
        .into_iter()
        .map(|(year, path)| match year.trim().parse::<i32>() {
            Ok(year) => Ok((year, path)),
            Err(_) => Err(D::Error::custom(format!("invalid flight year {:?}", year))),
        })
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            airports: default_airports(),
            carriers: default_carriers(),
            planes: default_planes(),
            flights: default_flights(),
        }
    }
}

impl Config {
    /// Reads the configuration at `path`, falling back to the defaults when
    /// the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!("{} not found, using default data paths", path.display());
                return Ok(Config::default());
            }
            Err(source) => {
                return Err(Error::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::parse(&text).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

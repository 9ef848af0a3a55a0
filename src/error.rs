use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("could not parse configuration {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("no flight data for year {0}")]
    NoDataForYear(i32),

    #[error("unable to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown airport {0:?}")]
    UnknownAirport(String),

    /// A range table does not cover the value being classified.
    #[error("no {kind} range for value {value}")]
    Unclassified { kind: &'static str, value: i32 },

    #[error("unknown report {0:?}")]
    UnknownReport(String),

    #[error("unable to write report: {0}")]
    Output(#[from] csv::Error),
}

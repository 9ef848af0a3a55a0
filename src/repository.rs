use csv::{ReaderBuilder, StringRecordsIntoIter, Trim};
use log::{debug, warn};
use once_cell::unsync::OnceCell;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{Airport, Carrier, Flight, Plane};

/// Forward-only sequence of records decoded from one source file.
///
/// The header line is skipped. Rows that cannot be decoded are logged and
/// skipped; a failure to read the file itself ends the sequence with an
/// [`Error::Io`]. The file is closed when the value is dropped, whether or
/// not it was read to the end. Reopen through the [`Repository`] to restart.
pub struct Records<T> {
    path: PathBuf,
    rows: StringRecordsIntoIter<File>,
    skipped: u64,
    _record: PhantomData<T>,
}

impl<T: DeserializeOwned> Records<T> {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(file);
        debug!("opened {}", path.display());
        Ok(Records {
            path: path.to_path_buf(),
            rows: reader.into_records(),
            skipped: 0,
            _record: PhantomData,
        })
    }
}

impl<T> Records<T> {
    /// Rows skipped so far because they could not be decoded.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    fn skip(&mut self, line: Option<u64>, err: impl std::fmt::Display) {
        self.skipped += 1;
        warn!(
            "could not parse {} line {}, will be skipped: {}",
            self.path.display(),
            line.map_or_else(|| "?".to_string(), |line| line.to_string()),
            err
        );
    }
}

impl<T: DeserializeOwned> Iterator for Records<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = match self.rows.next()? {
                Ok(record) => record,
                Err(err) => match err.into_kind() {
                    csv::ErrorKind::Io(source) => {
                        return Some(Err(Error::Io {
                            path: self.path.clone(),
                            source,
                        }))
                    }
                    kind => {
                        self.skip(None, format!("{:?}", kind));
                        continue;
                    }
                },
            };
            match record.deserialize(None) {
                Ok(value) => return Some(Ok(value)),
                Err(err) => self.skip(record.position().map(|pos| pos.line()), err),
            }
        }
    }
}

impl<T> Drop for Records<T> {
    fn drop(&mut self) {
        debug!(
            "closed {} ({} rows skipped)",
            self.path.display(),
            self.skipped
        );
    }
}

/// Records indexed by their uppercased code.
#[derive(Debug)]
pub struct Lookup<T> {
    by_code: HashMap<String, T>,
}

impl<T> Lookup<T> {
    fn build(
        records: impl Iterator<Item = Result<T>>,
        code: impl Fn(&T) -> &str,
    ) -> Result<Self> {
        let mut by_code = HashMap::new();
        for record in records {
            let record = record?;
            by_code.insert(code(&record).to_uppercase(), record);
        }
        debug!("indexed {} codes", by_code.len());
        Ok(Lookup { by_code })
    }

    /// Case-insensitive lookup. An unknown code is `None`.
    pub fn get(&self, code: &str) -> Option<&T> {
        self.by_code.get(code.trim().to_uppercase().as_str())
    }
}

/// Access to the source files named by a [`Config`].
///
/// The airport, carrier and plane lookups are each built once, on first use,
/// and kept for the life of the repository.
pub struct Repository {
    airport_path: PathBuf,
    carrier_path: PathBuf,
    plane_path: PathBuf,
    flight_paths: BTreeMap<i32, PathBuf>,
    airports: OnceCell<Lookup<Airport>>,
    carriers: OnceCell<Lookup<Carrier>>,
    planes: OnceCell<Lookup<Plane>>,
}

impl Repository {
    pub fn new(config: &Config) -> Result<Self> {
        let mut flight_paths = BTreeMap::new();
        for (year, path) in &config.flights {
            if path.exists() {
                debug!("found flight data for {} at {}", year, path.display());
                flight_paths.insert(*year, path.clone());
            } else {
                warn!("invalid flight data path for {}: {}", year, path.display());
            }
        }
        if flight_paths.is_empty() {
            return Err(Error::Config("no flight data found".to_string()));
        }
        Ok(Repository {
            airport_path: validate(&config.airports)?,
            carrier_path: validate(&config.carriers)?,
            plane_path: validate(&config.planes)?,
            flight_paths,
            airports: OnceCell::new(),
            carriers: OnceCell::new(),
            planes: OnceCell::new(),
        })
    }

    pub fn airports(&self) -> Result<Records<Airport>> {
        Records::open(&self.airport_path)
    }

    pub fn carriers(&self) -> Result<Records<Carrier>> {
        Records::open(&self.carrier_path)
    }

    pub fn planes(&self) -> Result<Records<Plane>> {
        Records::open(&self.plane_path)
    }

    pub fn flights(&self, year: i32) -> Result<Records<Flight>> {
        let path = self
            .flight_paths
            .get(&year)
            .ok_or(Error::NoDataForYear(year))?;
        Records::open(path)
    }

    /// Years with flight data, ascending.
    pub fn flight_years(&self) -> impl Iterator<Item = i32> + '_ {
        self.flight_paths.keys().copied()
    }

    pub fn airport_lookup(&self) -> Result<&Lookup<Airport>> {
        self.airports.get_or_try_init(|| {
            debug!("loading airports");
            Lookup::build(self.airports()?, |airport| &airport.iata)
        })
    }

    pub fn carrier_lookup(&self) -> Result<&Lookup<Carrier>> {
        self.carriers.get_or_try_init(|| {
            debug!("loading carriers");
            Lookup::build(self.carriers()?, |carrier| &carrier.code)
        })
    }

    pub fn plane_lookup(&self) -> Result<&Lookup<Plane>> {
        self.planes.get_or_try_init(|| {
            debug!("loading planes");
            Lookup::build(self.planes()?, |plane| &plane.tail_number)
        })
    }

    pub fn airport(&self, iata: &str) -> Result<Option<&Airport>> {
        Ok(self.airport_lookup()?.get(iata))
    }

    pub fn carrier(&self, code: &str) -> Result<Option<&Carrier>> {
        Ok(self.carrier_lookup()?.get(code))
    }

    pub fn plane(&self, tail_number: &str) -> Result<Option<&Plane>> {
        Ok(self.plane_lookup()?.get(tail_number))
    }

    pub fn valid_carrier(&self, code: &str) -> Result<bool> {
        Ok(self.carrier(code)?.is_some())
    }
}

fn validate(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        return Err(Error::Config(format!("invalid path: {}", path.display())));
    }
    debug!("found valid path: {}", path.display());
    Ok(path.to_path_buf())
}

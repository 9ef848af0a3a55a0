use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::keys::{Route, YearMonth};
use crate::lenient;

/// A row of the airports file: IATA, name, city, state, country, latitude,
/// longitude.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Airport {
    #[serde(deserialize_with = "lenient::code")]
    pub iata: String,
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub city: String,
    #[serde(deserialize_with = "lenient::text")]
    pub state: String,
    #[serde(deserialize_with = "lenient::text")]
    pub country: String,
    #[serde(deserialize_with = "lenient::float")]
    pub latitude: f64,
    #[serde(deserialize_with = "lenient::float")]
    pub longitude: f64,
}

impl PartialEq for Airport {
    fn eq(&self, other: &Self) -> bool {
        self.iata == other.iata
    }
}

impl Eq for Airport {}

impl Hash for Airport {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.iata.hash(state);
    }
}

impl PartialOrd for Airport {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Airport {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iata.cmp(&other.iata)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Carrier {
    #[serde(deserialize_with = "lenient::code")]
    pub code: String,
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
}

impl PartialEq for Carrier {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Carrier {}

impl Hash for Carrier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl PartialOrd for Carrier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Carrier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.code.cmp(&other.code)
    }
}

/// Declares a labelled enumeration whose unmatched labels fall back to
/// `Unknown`.
macro_rules! labelled {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal,)* }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant,)*
            #[default]
            Unknown,
        }

        impl $name {
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)*
                    $name::Unknown => "Unknown",
                }
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                let value = value.trim();
                [$($name::$variant,)*]
                    .into_iter()
                    .find(|known| known.label().eq_ignore_ascii_case(value))
                    .unwrap_or($name::Unknown)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

labelled!(OwnershipType {
    Individual => "Individual",
    Partnership => "Partnership",
    Corporation => "Corporation",
    CoOwner => "Co-Owner",
    Government => "Government",
    ForeignCorporation => "Foreign Corporation",
});

labelled!(AircraftType {
    FixedWingSingleEngine => "Fixed Wing Single-Engine",
    FixedWingMultiEngine => "Fixed Wing Multi-Engine",
    Rotorcraft => "Rotorcraft",
    Balloon => "Balloon",
});

labelled!(EngineType {
    Reciprocating => "Reciprocating",
    TurboProp => "Turbo-Prop",
    TurboShaft => "Turbo-Shaft",
    TurboJet => "Turbo-Jet",
    TurboFan => "Turbo-Fan",
    FourCycle => "4 Cycle",
    NoEngine => "None",
});

/// A row of the planes file. `year` is 0 when unknown.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Plane {
    #[serde(deserialize_with = "lenient::code")]
    pub tail_number: String,
    #[serde(deserialize_with = "lenient::label")]
    pub ownership_type: OwnershipType,
    #[serde(deserialize_with = "lenient::text")]
    pub manufacturer: String,
    #[serde(deserialize_with = "lenient::date")]
    pub issue_date: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient::text")]
    pub model_number: String,
    #[serde(deserialize_with = "lenient::text")]
    pub status: String,
    #[serde(deserialize_with = "lenient::label")]
    pub aircraft_type: AircraftType,
    #[serde(deserialize_with = "lenient::label")]
    pub engine_type: EngineType,
    #[serde(deserialize_with = "lenient::int")]
    pub year: i32,
}

impl Plane {
    pub fn model(&self) -> PlaneModel {
        PlaneModel {
            manufacturer: self.manufacturer.clone(),
            model_number: self.model_number.clone(),
        }
    }

    pub fn known_year(&self) -> Option<i32> {
        (self.year > 0).then_some(self.year)
    }
}

impl PartialEq for Plane {
    fn eq(&self, other: &Self) -> bool {
        self.tail_number == other.tail_number
    }
}

impl Eq for Plane {}

impl Hash for Plane {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tail_number.hash(state);
    }
}

impl PartialOrd for Plane {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Plane {
    fn cmp(&self, other: &Self) -> Ordering {
        self.tail_number.cmp(&other.tail_number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaneModel {
    pub manufacturer: String,
    pub model_number: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CancellationCode {
    Carrier,
    Weather,
    NationalAirSystem,
    Security,
}

impl CancellationCode {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "A" => Some(CancellationCode::Carrier),
            "B" => Some(CancellationCode::Weather),
            "C" => Some(CancellationCode::NationalAirSystem),
            "D" => Some(CancellationCode::Security),
            _ => None,
        }
    }
}

impl fmt::Display for CancellationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CancellationCode::Carrier => "Carrier",
            CancellationCode::Weather => "Weather",
            CancellationCode::NationalAirSystem => "National Air System",
            CancellationCode::Security => "Security",
        })
    }
}

fn cancellation_code<'de, D>(deserializer: D) -> Result<Option<CancellationCode>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(CancellationCode::from_code(&String::deserialize(deserializer)?))
}

/// One row of a flights file, in column order.
#[derive(Debug, Deserialize)]
struct FlightRow {
    #[serde(deserialize_with = "lenient::int")]
    year: i32,
    #[serde(deserialize_with = "lenient::int")]
    month: i32,
    #[serde(deserialize_with = "lenient::int")]
    day_of_month: i32,
    _day_of_week: IgnoredAny,
    #[serde(deserialize_with = "lenient::hhmm")]
    departure_time: Option<NaiveTime>,
    #[serde(deserialize_with = "lenient::hhmm")]
    scheduled_departure_time: Option<NaiveTime>,
    #[serde(deserialize_with = "lenient::hhmm")]
    arrival_time: Option<NaiveTime>,
    #[serde(deserialize_with = "lenient::hhmm")]
    scheduled_arrival_time: Option<NaiveTime>,
    #[serde(deserialize_with = "lenient::code")]
    carrier: String,
    #[serde(deserialize_with = "lenient::text")]
    flight_number: String,
    #[serde(deserialize_with = "lenient::code")]
    tail_number: String,
    #[serde(deserialize_with = "lenient::int")]
    elapsed_time: i32,
    #[serde(deserialize_with = "lenient::int")]
    scheduled_elapsed_time: i32,
    _air_time: IgnoredAny,
    #[serde(deserialize_with = "lenient::int")]
    arrival_delay: i32,
    #[serde(deserialize_with = "lenient::int")]
    departure_delay: i32,
    #[serde(deserialize_with = "lenient::code")]
    origin: String,
    #[serde(deserialize_with = "lenient::code")]
    destination: String,
    #[serde(deserialize_with = "lenient::int")]
    distance: i32,
    _taxi_in: IgnoredAny,
    _taxi_out: IgnoredAny,
    #[serde(deserialize_with = "lenient::flag")]
    cancelled: bool,
    #[serde(deserialize_with = "cancellation_code")]
    cancellation_code: Option<CancellationCode>,
    #[serde(deserialize_with = "lenient::flag")]
    diverted: bool,
    _carrier_delay: IgnoredAny,
    _weather_delay: IgnoredAny,
    _nas_delay: IgnoredAny,
    _security_delay: IgnoredAny,
    _late_aircraft_delay: IgnoredAny,
}

/// A flight as recorded in the yearly performance files. Airports, carrier
/// and plane are held as codes and resolved through the repository lookups.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "FlightRow")]
pub struct Flight {
    /// `None` when the row's year/month/day do not form a date.
    pub date: Option<NaiveDate>,
    pub carrier: String,
    pub flight_number: String,
    pub tail_number: String,
    pub origin: String,
    pub destination: String,
    pub scheduled_departure: Option<NaiveTime>,
    pub departure: Option<NaiveTime>,
    pub scheduled_arrival: Option<NaiveTime>,
    pub arrival: Option<NaiveTime>,
    pub scheduled_elapsed_minutes: i32,
    pub elapsed_minutes: i32,
    pub departure_delay: i32,
    pub arrival_delay: i32,
    pub distance: i32,
    pub cancelled: bool,
    pub cancellation_code: Option<CancellationCode>,
    pub diverted: bool,
}

impl From<FlightRow> for Flight {
    fn from(row: FlightRow) -> Self {
        let date = match (u32::try_from(row.month), u32::try_from(row.day_of_month)) {
            (Ok(month), Ok(day)) => NaiveDate::from_ymd_opt(row.year, month, day),
            _ => None,
        };
        Flight {
            date,
            carrier: row.carrier,
            flight_number: row.flight_number,
            tail_number: row.tail_number,
            origin: row.origin,
            destination: row.destination,
            scheduled_departure: row.scheduled_departure_time,
            departure: row.departure_time,
            scheduled_arrival: row.scheduled_arrival_time,
            arrival: row.arrival_time,
            scheduled_elapsed_minutes: row.scheduled_elapsed_time,
            elapsed_minutes: row.elapsed_time,
            departure_delay: row.departure_delay,
            arrival_delay: row.arrival_delay,
            distance: row.distance,
            cancelled: row.cancelled,
            cancellation_code: row.cancellation_code,
            diverted: row.diverted,
        }
    }
}

const PLACEHOLDER_TAIL_NUMBERS: [&str; 4] = ["0", "000000", "NA", "UNKNOW"];

impl Flight {
    pub fn not_cancelled(&self) -> bool {
        !self.cancelled
    }

    pub fn not_diverted(&self) -> bool {
        !self.diverted
    }

    pub fn valid_tail_number(&self) -> bool {
        !self.tail_number.is_empty()
            && !PLACEHOLDER_TAIL_NUMBERS.contains(&self.tail_number.as_str())
    }

    pub fn route(&self) -> Route {
        Route::new(self.origin.clone(), self.destination.clone())
    }

    pub fn year_month(&self) -> Option<YearMonth> {
        self.date.map(YearMonth::from)
    }

    pub fn weekday(&self) -> Option<Weekday> {
        self.date.map(|date| date.weekday())
    }
}

//! Cell parsers for source columns whose values are optional or dirty.
//!
//! None of these fail: a value that does not parse becomes the column's
//! sentinel (`0`, `false`, `None`, or an `Unknown` label).

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer};

pub fn parse_int(value: &str) -> i32 {
    value.trim().parse().unwrap_or(0)
}

pub fn parse_float(value: &str) -> f64 {
    value.trim().parse().unwrap_or(0.0)
}

pub fn parse_flag(value: &str) -> bool {
    value.trim() == "1"
}

pub fn parse_code(value: &str) -> String {
    value.trim().to_uppercase()
}

/// `mm/dd/yyyy`
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%m/%d/%Y").ok()
}

/// Clock time written as `hhmm`, where `2400` is midnight.
pub fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    let hhmm: u32 = value.trim().parse().ok()?;
    NaiveTime::from_hms_opt((hhmm / 100) % 24, hhmm % 100, 0)
}

pub fn int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    Ok(parse_int(&String::deserialize(deserializer)?))
}

pub fn float<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(parse_float(&String::deserialize(deserializer)?))
}

pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(parse_flag(&String::deserialize(deserializer)?))
}

pub fn code<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(parse_code(&String::deserialize(deserializer)?))
}

pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(String::deserialize(deserializer)?.trim().to_string())
}

pub fn date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
    Ok(parse_date(&String::deserialize(deserializer)?))
}

pub fn hhmm<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveTime>, D::Error> {
    Ok(parse_hhmm(&String::deserialize(deserializer)?))
}

/// Any enumeration that maps unrecognised text onto an unknown variant.
pub fn label<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: for<'a> From<&'a str>,
{
    Ok(T::from(String::deserialize(deserializer)?.as_str()))
}

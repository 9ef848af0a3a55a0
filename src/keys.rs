//! Grouping keys derived from records.

use chrono::{Datelike, NaiveDate};
use std::fmt;

use crate::error::{Error, Result};

/// Directional origin/destination pair. `JFK-LAX` and `LAX-JFK` are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Route {
    pub origin: String,
    pub destination: String,
}

impl Route {
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Route {
            origin: origin.into(),
            destination: destination.into(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.origin, self.destination)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl From<NaiveDate> for YearMonth {
    fn from(date: NaiveDate) -> Self {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Composite grouping key over two values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairGroup<A, B> {
    pub first: A,
    pub second: B,
}

impl<A, B> PairGroup<A, B> {
    pub fn new(first: A, second: B) -> Self {
        PairGroup { first, second }
    }
}

impl<A: fmt::Display, B: fmt::Display> fmt::Display for PairGroup<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.first, self.second)
    }
}

/// Inclusive integer interval `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueRange {
    low: i32,
    high: i32,
}

pub type FlightDistanceRange = ValueRange;
pub type PlaneAgeRange = ValueRange;

impl ValueRange {
    pub const fn between(low: i32, high: i32) -> Self {
        ValueRange { low, high }
    }

    pub fn contains(&self, value: i32) -> bool {
        self.low <= value && value <= self.high
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

/// An ordered table of ranges used to bucket a value.
///
/// The table is expected to be ascending, non-overlapping and to cover every
/// value it will be asked about. That is not checked; a value outside every
/// range is reported as [`Error::Unclassified`].
#[derive(Debug, Clone, Copy)]
pub struct RangeTable {
    kind: &'static str,
    ranges: &'static [ValueRange],
}

impl RangeTable {
    pub const fn new(kind: &'static str, ranges: &'static [ValueRange]) -> Self {
        RangeTable { kind, ranges }
    }

    pub fn classify(&self, value: i32) -> Result<ValueRange> {
        self.ranges
            .iter()
            .find(|range| range.contains(value))
            .copied()
            .ok_or(Error::Unclassified {
                kind: self.kind,
                value,
            })
    }
}

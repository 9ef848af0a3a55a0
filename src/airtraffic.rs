//! Reports over yearly airline on-time performance data.
//!
//! Flight, airport, carrier and plane records are streamed from CSV files
//! registered in a [`Config`], folded through an [`accumulator::Accumulator`]
//! and written out as tab separated tables by the reports in [`reports`].

pub mod accumulator;
pub mod config;
pub mod error;
pub mod geo;
pub mod keys;
mod lenient;
pub mod model;
pub mod reports;
pub mod repository;

pub use accumulator::{accumulate, count, top_n, Accumulator, Average};
pub use config::Config;
pub use error::{Error, Result};
pub use model::{Airport, Carrier, Flight, Plane, PlaneModel};
pub use reports::{Report, ReportContext, REPORTS};
pub use repository::{Records, Repository};

use std::io::Write;

use super::{ReportContext, Table};
use crate::accumulator::{accumulate, by_value_desc, Accumulator};
use crate::error::Result;
use crate::geo::{distance, Units};
use crate::model::Airport;

pub fn airports_by_state(context: &ReportContext<'_>, out: &mut dyn Write) -> Result<()> {
    let by_state = Accumulator::counting(|airport: &Airport| airport.state.clone())
        .filter(|airport| !airport.state.is_empty());

    let mut table = Table::new(out, &["State", "Airports"]);
    accumulate(
        context.repository.airports()?,
        by_value_desc,
        0,
        &by_state,
        |state, airports| table.row((state, airports)),
    )?;
    table.finish()
}

pub fn airports_by_country(context: &ReportContext<'_>, out: &mut dyn Write) -> Result<()> {
    let by_country = Accumulator::counting(|airport: &Airport| airport.country.clone())
        .filter(|airport| !airport.country.is_empty());

    let mut table = Table::new(out, &["Country", "Airports"]);
    accumulate(
        context.repository.airports()?,
        by_value_desc,
        0,
        &by_country,
        |country, airports| table.row((country, airports)),
    )?;
    table.finish()
}

pub fn distance_between_airports(
    context: &ReportContext<'_>,
    out: &mut dyn Write,
) -> Result<()> {
    let origin = context.origin()?;
    let destination = context.destination()?;

    let mut table = Table::new(out, &["Origin", "Destination", "Miles", "Kilometers"]);
    table.row((
        &origin.iata,
        &destination.iata,
        format!("{:.0}", distance(origin, destination, Units::Miles)),
        format!("{:.0}", distance(origin, destination, Units::Kilometers)),
    ))?;
    table.finish()
}

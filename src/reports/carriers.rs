use std::io::Write;

use super::{paired, ReportContext, Table};
use crate::accumulator::{accumulate, by_value_desc, Accumulator};
use crate::error::Result;
use crate::model::{Carrier, Flight};

/// Counts the flights passing `filter` per known carrier.
fn flights_by_carrier(
    context: &ReportContext<'_>,
    out: &mut dyn Write,
    filter: fn(&Flight) -> bool,
    column: &str,
) -> Result<()> {
    let carriers = context.repository.carrier_lookup()?;
    let by_carrier = Accumulator::counting(|(_, carrier): &(Flight, &Carrier)| *carrier)
        .filter(move |(flight, _)| filter(flight));

    let mut table = Table::new(out, &["Carrier", "Name", column]);
    accumulate(
        paired(context.flights()?, |flight| carriers.get(&flight.carrier)),
        by_value_desc,
        context.limit,
        &by_carrier,
        |carrier, flights| table.row((&carrier.code, &carrier.name, flights)),
    )?;
    table.finish()
}

pub fn most_flights_by_carrier(context: &ReportContext<'_>, out: &mut dyn Write) -> Result<()> {
    flights_by_carrier(context, out, Flight::not_cancelled, "Flights")
}

pub fn most_cancellations_by_carrier(
    context: &ReportContext<'_>,
    out: &mut dyn Write,
) -> Result<()> {
    flights_by_carrier(context, out, |flight| flight.cancelled, "Cancelled")
}

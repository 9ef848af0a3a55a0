use std::io::Write;

use super::{paired, ReportContext, Table};
use crate::accumulator::{accumulate, by_key, by_key_desc, by_value_desc, Accumulator};
use crate::error::Result;
use crate::keys::{RangeTable, ValueRange};
use crate::model::{AircraftType, EngineType, Flight, Plane, PlaneModel};
use crate::repository::Records;

pub const AGE_RANGES: RangeTable = RangeTable::new(
    "plane age",
    &[
        ValueRange::between(0, 5),
        ValueRange::between(6, 10),
        ValueRange::between(11, 20),
        ValueRange::between(21, 30),
        ValueRange::between(31, 40),
        ValueRange::between(41, 50),
        ValueRange::between(51, 100),
    ],
);

const DAYS_PER_YEAR: f64 = 365.0;

pub fn total_planes_by_manufacturer(
    context: &ReportContext<'_>,
    out: &mut dyn Write,
) -> Result<()> {
    let by_manufacturer = Accumulator::counting(|plane: &Plane| plane.manufacturer.clone());

    let mut table = Table::new(out, &["Manufacturer", "Planes"]);
    accumulate(
        context.repository.planes()?,
        by_value_desc,
        0,
        &by_manufacturer,
        |manufacturer, planes| table.row((manufacturer, planes)),
    )?;
    table.finish()
}

pub fn total_planes_by_year(context: &ReportContext<'_>, out: &mut dyn Write) -> Result<()> {
    let by_year = Accumulator::counting(|plane: &Plane| plane.year)
        .filter(|plane| plane.known_year().is_some());

    let mut table = Table::new(out, &["Year", "Planes"]);
    accumulate(
        context.repository.planes()?,
        by_key_desc,
        0,
        &by_year,
        |year, planes| table.row((year, planes)),
    )?;
    table.finish()
}

pub fn total_planes_by_aircraft_type(
    context: &ReportContext<'_>,
    out: &mut dyn Write,
) -> Result<()> {
    let by_type = Accumulator::counting(|plane: &Plane| plane.aircraft_type);

    let mut table = Table::new(out, &["Aircraft type", "Planes"]);
    accumulate(
        context.repository.planes()?,
        by_value_desc,
        0,
        &by_type,
        |aircraft_type, planes| table.row((aircraft_type.label(), planes)),
    )?;
    table.finish()
}

pub fn total_planes_by_engine_type(
    context: &ReportContext<'_>,
    out: &mut dyn Write,
) -> Result<()> {
    let by_type = Accumulator::counting(|plane: &Plane| plane.engine_type);

    let mut table = Table::new(out, &["Engine type", "Planes"]);
    accumulate(
        context.repository.planes()?,
        by_value_desc,
        0,
        &by_type,
        |engine_type, planes| table.row((engine_type.label(), planes)),
    )?;
    table.finish()
}

pub fn planes_with_most_cancellations(
    context: &ReportContext<'_>,
    out: &mut dyn Write,
) -> Result<()> {
    let by_tail = Accumulator::counting(|flight: &Flight| flight.tail_number.clone())
        .filter(|flight| flight.cancelled && flight.valid_tail_number());

    let mut table = Table::new(out, &["Tail number", "Cancelled"]);
    accumulate(
        context.flights()?,
        by_value_desc,
        context.limit,
        &by_tail,
        |tail_number, cancelled| table.row((tail_number, cancelled)),
    )?;
    table.finish()
}

/// Active flights that have a plane in the plane lookup, paired with it.
fn flown<'r>(
    context: &ReportContext<'r>,
) -> Result<impl Iterator<Item = Result<(Flight, &'r Plane)>>> {
    let planes = context.repository.plane_lookup()?;
    let flights: Records<Flight> = context.flights()?;
    Ok(paired(flights, move |flight| {
        if flight.not_cancelled() && flight.valid_tail_number() {
            planes.get(&flight.tail_number)
        } else {
            None
        }
    }))
}

pub fn most_flights_by_plane(context: &ReportContext<'_>, out: &mut dyn Write) -> Result<()> {
    let by_plane = Accumulator::counting(|(_, plane): &(Flight, &Plane)| *plane);

    let mut table = Table::new(out, &["Tail number", "Manufacturer", "Model", "Flights"]);
    accumulate(
        flown(context)?,
        by_value_desc,
        context.limit,
        &by_plane,
        |plane, flights| {
            table.row((
                &plane.tail_number,
                &plane.manufacturer,
                &plane.model_number,
                flights,
            ))
        },
    )?;
    table.finish()
}

pub fn most_flights_by_plane_model(
    context: &ReportContext<'_>,
    out: &mut dyn Write,
) -> Result<()> {
    let by_model = Accumulator::counting(|(_, plane): &(Flight, &Plane)| plane.model());

    let mut table = Table::new(out, &["Manufacturer", "Model", "Flights", "Daily average"]);
    accumulate(
        flown(context)?,
        by_value_desc,
        context.limit,
        &by_model,
        |model: PlaneModel, flights| {
            table.row((
                model.manufacturer,
                model.model_number,
                flights,
                format!("{:.1}", flights as f64 / DAYS_PER_YEAR),
            ))
        },
    )?;
    table.finish()
}

pub fn total_flights_by_plane_manufacturer(
    context: &ReportContext<'_>,
    out: &mut dyn Write,
) -> Result<()> {
    let by_manufacturer =
        Accumulator::counting(|(_, plane): &(Flight, &Plane)| plane.manufacturer.clone());

    let mut table = Table::new(out, &["Manufacturer", "Flights"]);
    accumulate(
        flown(context)?,
        by_value_desc,
        0,
        &by_manufacturer,
        |manufacturer, flights| table.row((manufacturer, flights)),
    )?;
    table.finish()
}

/// Plane age is measured against the year being reported on.
pub fn total_flights_by_plane_age_range(
    context: &ReportContext<'_>,
    out: &mut dyn Write,
) -> Result<()> {
    let year = context.year;
    let by_age = Accumulator::try_counting(move |(_, plane): &(Flight, &Plane)| {
        AGE_RANGES.classify(year - plane.year)
    })
    .filter(|(_, plane)| plane.known_year().is_some());

    let mut total = 0;
    let mut table = Table::new(out, &["Age", "Flights"]);
    accumulate(flown(context)?, by_key, 0, &by_age, |range, flights| {
        total += flights;
        table.row((range.to_string(), flights))
    })?;
    table.row(("Total", total))?;
    table.finish()
}

pub fn total_flights_by_aircraft_type(
    context: &ReportContext<'_>,
    out: &mut dyn Write,
) -> Result<()> {
    let by_type = Accumulator::counting(|(_, plane): &(Flight, &Plane)| plane.aircraft_type);

    let mut table = Table::new(out, &["Aircraft type", "Flights"]);
    accumulate(
        flown(context)?,
        by_value_desc,
        0,
        &by_type,
        |aircraft_type: AircraftType, flights| table.row((aircraft_type.label(), flights)),
    )?;
    table.finish()
}

pub fn total_flights_by_engine_type(
    context: &ReportContext<'_>,
    out: &mut dyn Write,
) -> Result<()> {
    let by_type = Accumulator::counting(|(_, plane): &(Flight, &Plane)| plane.engine_type);

    let mut table = Table::new(out, &["Engine type", "Flights"]);
    accumulate(
        flown(context)?,
        by_value_desc,
        0,
        &by_type,
        |engine_type: EngineType, flights| table.row((engine_type.label(), flights)),
    )?;
    table.finish()
}

use chrono::{NaiveDate, Weekday};
use std::cmp::Ordering;
use std::io::Write;

use super::{paired, ReportContext, Table};
use crate::accumulator::{
    accumulate, by_average_desc, by_key, by_value, by_value_desc, count, top_n, Accumulator,
};
use crate::error::Result;
use crate::keys::{PairGroup, RangeTable, ValueRange, YearMonth};
use crate::model::{Airport, CancellationCode, Carrier, Flight};

pub const DISTANCE_RANGES: RangeTable = RangeTable::new(
    "distance",
    &[
        ValueRange::between(0, 100),
        ValueRange::between(101, 250),
        ValueRange::between(251, 500),
        ValueRange::between(501, 1000),
        ValueRange::between(1001, 2500),
        ValueRange::between(2501, 5000),
        ValueRange::between(5001, 9999),
    ],
);

pub fn total_flights_from_origin(context: &ReportContext<'_>, out: &mut dyn Write) -> Result<()> {
    let origin = context.origin()?;
    let total = count(context.flights()?, |flight: &Flight| {
        flight.not_cancelled() && flight.origin == origin.iata
    })?;

    let mut table = Table::new(out, &["Origin", "Name", "Flights"]);
    table.row((&origin.iata, &origin.name, total))?;
    table.finish()
}

pub fn total_flights_to_destination(
    context: &ReportContext<'_>,
    out: &mut dyn Write,
) -> Result<()> {
    let destination = context.destination()?;
    let total = count(context.flights()?, |flight: &Flight| {
        flight.not_cancelled() && flight.not_diverted() && flight.destination == destination.iata
    })?;

    let mut table = Table::new(out, &["Destination", "Name", "Flights"]);
    table.row((&destination.iata, &destination.name, total))?;
    table.finish()
}

pub fn total_flights_from_origin_to_destination(
    context: &ReportContext<'_>,
    out: &mut dyn Write,
) -> Result<()> {
    let origin = context.origin()?;
    let destination = context.destination()?;
    let total = count(context.flights()?, |flight: &Flight| {
        flight.not_cancelled()
            && flight.not_diverted()
            && flight.origin == origin.iata
            && flight.destination == destination.iata
    })?;

    let mut table = Table::new(out, &["Origin", "Destination", "Flights"]);
    table.row((&origin.iata, &destination.iata, total))?;
    table.finish()
}

pub fn top_flights_by_origin(context: &ReportContext<'_>, out: &mut dyn Write) -> Result<()> {
    let by_origin =
        Accumulator::counting(|flight: &Flight| flight.origin.clone()).filter(Flight::not_cancelled);

    let mut table = Table::new(out, &["Origin", "Flights"]);
    accumulate(
        context.flights()?,
        by_value_desc,
        context.limit,
        &by_origin,
        |origin, flights| table.row((origin, flights)),
    )?;
    table.finish()
}

pub fn top_destinations_from_origin(
    context: &ReportContext<'_>,
    out: &mut dyn Write,
) -> Result<()> {
    let origin = context.origin()?;
    let by_destination = Accumulator::counting(|flight: &Flight| flight.destination.clone())
        .filter(move |flight| flight.not_cancelled() && flight.origin == origin.iata);

    let mut table = Table::new(out, &["Destination", "Flights"]);
    accumulate(
        context.flights()?,
        by_value_desc,
        context.limit,
        &by_destination,
        |destination, flights| table.row((destination, flights)),
    )?;
    table.finish()
}

pub fn most_popular_routes(context: &ReportContext<'_>, out: &mut dyn Write) -> Result<()> {
    let by_route = Accumulator::counting(Flight::route);

    let mut table = Table::new(out, &["Route", "Flights"]);
    accumulate(
        context.flights()?,
        by_value_desc,
        context.limit,
        &by_route,
        |route, flights| table.row((route.to_string(), flights)),
    )?;
    table.finish()
}

pub fn worst_average_departure_delay_by_origin(
    context: &ReportContext<'_>,
    out: &mut dyn Write,
) -> Result<()> {
    let delays = Accumulator::averaging(
        |flight: &Flight| flight.origin.clone(),
        |flight| flight.departure_delay as f64,
    )
    .filter(Flight::not_cancelled);

    let mut table = Table::new(out, &["Origin", "Average delay"]);
    accumulate(
        context.flights()?,
        by_average_desc,
        context.limit,
        &delays,
        |origin, delay| table.row((origin, format!("{:.1}", delay.value()))),
    )?;
    table.finish()
}

pub fn worst_average_arrival_delay_by_destination(
    context: &ReportContext<'_>,
    out: &mut dyn Write,
) -> Result<()> {
    let delays = Accumulator::averaging(
        |flight: &Flight| flight.destination.clone(),
        |flight| flight.arrival_delay as f64,
    )
    .filter(Flight::not_cancelled);

    let mut table = Table::new(out, &["Destination", "Average delay"]);
    accumulate(
        context.flights()?,
        by_average_desc,
        context.limit,
        &delays,
        |destination, delay| table.row((destination, format!("{:.1}", delay.value()))),
    )?;
    table.finish()
}

pub fn most_cancelled_flights_by_origin(
    context: &ReportContext<'_>,
    out: &mut dyn Write,
) -> Result<()> {
    let by_origin = Accumulator::counting(|flight: &Flight| flight.origin.clone())
        .filter(|flight| flight.cancelled);

    let mut table = Table::new(out, &["Origin", "Cancelled"]);
    accumulate(
        context.flights()?,
        by_value_desc,
        context.limit,
        &by_origin,
        |origin, cancelled| table.row((origin, cancelled)),
    )?;
    table.finish()
}

pub fn total_flights_by_origin_state(
    context: &ReportContext<'_>,
    out: &mut dyn Write,
) -> Result<()> {
    by_state(context, out, |flight| &flight.origin)
}

pub fn total_flights_by_destination_state(
    context: &ReportContext<'_>,
    out: &mut dyn Write,
) -> Result<()> {
    by_state(context, out, |flight| &flight.destination)
}

fn by_state(
    context: &ReportContext<'_>,
    out: &mut dyn Write,
    airport_of: fn(&Flight) -> &String,
) -> Result<()> {
    let airports = context.repository.airport_lookup()?;
    let flights = paired(context.flights()?, |flight| airports.get(airport_of(flight)));
    let by_state = Accumulator::counting(|(_, airport): &(Flight, &Airport)| airport.state.clone())
        .filter(|(flight, _)| flight.not_cancelled());

    let mut table = Table::new(out, &["State", "Flights"]);
    accumulate(
        flights,
        by_value_desc,
        context.limit,
        &by_state,
        |state, flights| table.row((state, flights)),
    )?;
    table.finish()
}

pub fn longest_flights(context: &ReportContext<'_>, out: &mut dyn Write) -> Result<()> {
    by_distance(context, out, |a, b| b.distance.cmp(&a.distance))
}

pub fn shortest_flights(context: &ReportContext<'_>, out: &mut dyn Write) -> Result<()> {
    by_distance(context, out, |a, b| a.distance.cmp(&b.distance))
}

fn by_distance(
    context: &ReportContext<'_>,
    out: &mut dyn Write,
    compare: fn(&Flight, &Flight) -> Ordering,
) -> Result<()> {
    let flights = top_n(
        context.flights()?,
        |flight: &Flight| flight.not_cancelled() && flight.not_diverted(),
        compare,
        context.limit,
    )?;

    let mut table = Table::new(
        out,
        &["Flight", "Date", "Carrier", "Origin", "Destination", "Distance"],
    );
    for flight in flights {
        table.row((
            &flight.flight_number,
            flight.date.map(|date| date.to_string()).unwrap_or_default(),
            &flight.carrier,
            &flight.origin,
            &flight.destination,
            flight.distance,
        ))?;
    }
    table.finish()
}

pub fn total_flights_by_distance_range(
    context: &ReportContext<'_>,
    out: &mut dyn Write,
) -> Result<()> {
    let by_range = Accumulator::try_counting(|flight: &Flight| {
        DISTANCE_RANGES.classify(flight.distance)
    })
    .filter(|flight| flight.not_cancelled() && flight.not_diverted());

    let mut table = Table::new(out, &["Distance", "Flights"]);
    accumulate(
        context.flights()?,
        by_key,
        0,
        &by_range,
        |range, flights| table.row((range.to_string(), flights)),
    )?;
    table.finish()
}

pub fn days_with_least_cancellations(
    context: &ReportContext<'_>,
    out: &mut dyn Write,
) -> Result<()> {
    cancellations_by_day(context, out, by_value)
}

pub fn days_with_most_cancellations(
    context: &ReportContext<'_>,
    out: &mut dyn Write,
) -> Result<()> {
    cancellations_by_day(context, out, by_value_desc)
}

type DailyCount = (NaiveDate, u64);

fn cancellations_by_day(
    context: &ReportContext<'_>,
    out: &mut dyn Write,
    compare: fn(&DailyCount, &DailyCount) -> Ordering,
) -> Result<()> {
    let flights = paired(context.flights()?, |flight| flight.date);
    let by_day = Accumulator::counting(|(_, date): &(Flight, NaiveDate)| *date)
        .filter(|(flight, _)| flight.cancelled);

    let mut table = Table::new(out, &["Date", "Cancelled"]);
    accumulate(flights, compare, context.limit, &by_day, |date, cancelled| {
        table.row((date.to_string(), cancelled))
    })?;
    table.finish()
}

pub fn total_monthly_flights(context: &ReportContext<'_>, out: &mut dyn Write) -> Result<()> {
    let flights = paired(context.flights()?, Flight::year_month);
    let by_month = Accumulator::counting(|(_, month): &(Flight, YearMonth)| *month)
        .filter(|(flight, _)| flight.not_cancelled());

    let mut table = Table::new(out, &["Month", "Flights"]);
    accumulate(flights, by_key, 0, &by_month, |month, flights| {
        table.row((month.to_string(), flights))
    })?;
    table.finish()
}

pub fn total_daily_flights(context: &ReportContext<'_>, out: &mut dyn Write) -> Result<()> {
    flights_by_day(context, out, by_key, 0)
}

pub fn most_flights_by_day(context: &ReportContext<'_>, out: &mut dyn Write) -> Result<()> {
    flights_by_day(context, out, by_value_desc, context.limit)
}

pub fn least_flights_by_day(context: &ReportContext<'_>, out: &mut dyn Write) -> Result<()> {
    flights_by_day(context, out, by_value, context.limit)
}

fn flights_by_day(
    context: &ReportContext<'_>,
    out: &mut dyn Write,
    compare: fn(&DailyCount, &DailyCount) -> Ordering,
    limit: usize,
) -> Result<()> {
    let flights = paired(context.flights()?, |flight| flight.date);
    let by_day = Accumulator::counting(|(_, date): &(Flight, NaiveDate)| *date)
        .filter(|(flight, _)| flight.not_cancelled());

    let mut table = Table::new(out, &["Date", "Flights"]);
    accumulate(flights, compare, limit, &by_day, |date, flights| {
        table.row((date.to_string(), flights))
    })?;
    table.finish()
}

pub fn total_flights_by_day_of_week(
    context: &ReportContext<'_>,
    out: &mut dyn Write,
) -> Result<()> {
    let flights = paired(context.flights()?, Flight::weekday);
    let by_weekday = Accumulator::counting(|(_, day): &(Flight, Weekday)| *day)
        .filter(|(flight, _)| flight.not_cancelled());

    let mut table = Table::new(out, &["Day", "Flights"]);
    accumulate(
        flights,
        |a: &(Weekday, u64), b: &(Weekday, u64)| {
            a.0.num_days_from_monday().cmp(&b.0.num_days_from_monday())
        },
        0,
        &by_weekday,
        |day, flights| table.row((day.to_string(), flights)),
    )?;
    table.finish()
}

pub fn most_flights_by_origin_by_day(
    context: &ReportContext<'_>,
    out: &mut dyn Write,
) -> Result<()> {
    let airports = context.repository.airport_lookup()?;
    let flights = paired(context.flights()?, |flight| {
        Some(PairGroup::new(airports.get(&flight.origin)?, flight.date?))
    });
    let by_origin_day =
        Accumulator::counting(|(_, key): &(Flight, PairGroup<&Airport, NaiveDate>)| *key)
            .filter(|(flight, _)| flight.not_cancelled());

    let mut table = Table::new(out, &["Origin", "Date", "Flights"]);
    accumulate(
        flights,
        by_value_desc,
        context.limit,
        &by_origin_day,
        |key, flights| table.row((&key.first.name, key.second.to_string(), flights)),
    )?;
    table.finish()
}

pub fn most_flights_by_carrier_by_day(
    context: &ReportContext<'_>,
    out: &mut dyn Write,
) -> Result<()> {
    let carriers = context.repository.carrier_lookup()?;
    let flights = paired(context.flights()?, |flight| {
        Some(PairGroup::new(carriers.get(&flight.carrier)?, flight.date?))
    });
    let by_carrier_day =
        Accumulator::counting(|(_, key): &(Flight, PairGroup<&Carrier, NaiveDate>)| *key)
            .filter(|(flight, _)| flight.not_cancelled());

    let mut table = Table::new(out, &["Carrier", "Date", "Flights"]);
    accumulate(
        flights,
        by_value_desc,
        context.limit,
        &by_carrier_day,
        |key, flights| table.row((&key.first.name, key.second.to_string(), flights)),
    )?;
    table.finish()
}

pub fn cancellations_by_cause(context: &ReportContext<'_>, out: &mut dyn Write) -> Result<()> {
    let flights = paired(context.flights()?, |flight| flight.cancellation_code);
    let by_cause = Accumulator::counting(|(_, cause): &(Flight, CancellationCode)| *cause)
        .filter(|(flight, _)| flight.cancelled);

    let mut table = Table::new(out, &["Cause", "Cancelled"]);
    accumulate(
        flights,
        by_value_desc,
        context.limit,
        &by_cause,
        |cause, cancelled| table.row((cause.to_string(), cancelled)),
    )?;
    table.finish()
}

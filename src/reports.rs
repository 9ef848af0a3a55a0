//! The report catalog.
//!
//! Every report streams one source through the accumulator helpers and
//! writes a tab separated table, header first, to the given output.

use csv::{StringRecord, WriterBuilder};
use log::info;
use serde::Serialize;
use std::fmt;
use std::io::Write;

use crate::error::{Error, Result};
use crate::model::{Airport, Flight};
use crate::repository::{Records, Repository};

mod airports;
mod carriers;
mod flights;
mod planes;

pub const DEFAULT_LIMIT: usize = 10;

/// Everything a report may need beyond the data itself.
pub struct ReportContext<'r> {
    pub repository: &'r Repository,
    pub year: i32,
    /// Maximum rows for ranked reports; 0 for all of them.
    pub limit: usize,
    pub origin: Option<String>,
    pub destination: Option<String>,
}

impl<'r> ReportContext<'r> {
    pub fn new(repository: &'r Repository, year: i32) -> Self {
        ReportContext {
            repository,
            year,
            limit: DEFAULT_LIMIT,
            origin: None,
            destination: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_origin(mut self, iata: impl Into<String>) -> Self {
        self.origin = Some(iata.into());
        self
    }

    pub fn with_destination(mut self, iata: impl Into<String>) -> Self {
        self.destination = Some(iata.into());
        self
    }

    fn flights(&self) -> Result<Records<Flight>> {
        self.repository.flights(self.year)
    }

    fn origin(&self) -> Result<&'r Airport> {
        self.airport(self.origin.as_deref(), "origin")
    }

    fn destination(&self) -> Result<&'r Airport> {
        self.airport(self.destination.as_deref(), "destination")
    }

    fn airport(&self, iata: Option<&str>, role: &str) -> Result<&'r Airport> {
        let iata =
            iata.ok_or_else(|| Error::Config(format!("this report needs an {} airport", role)))?;
        self.repository
            .airport(iata)?
            .ok_or_else(|| Error::UnknownAirport(iata.trim().to_uppercase()))
    }
}

/// Pairs each flight with something derived from it, dropping the flights
/// for which there is nothing: an undated flight, or one whose plane or
/// airport is missing from the lookups.
fn paired<U>(
    flights: Records<Flight>,
    attach: impl Fn(&Flight) -> Option<U>,
) -> impl Iterator<Item = Result<(Flight, U)>> {
    flights.filter_map(move |flight| match flight {
        Ok(flight) => attach(&flight).map(|found| Ok((flight, found))),
        Err(err) => Some(Err(err)),
    })
}

/// Tab separated output. The header row is held back until the first row or
/// [`finish`](Table::finish), so a report that fails while scanning its
/// source writes nothing.
struct Table<'w> {
    writer: csv::Writer<&'w mut dyn Write>,
    header: Option<StringRecord>,
}

impl<'w> Table<'w> {
    fn new(out: &'w mut dyn Write, headers: &[&str]) -> Self {
        let writer = WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .from_writer(out);
        Table {
            writer,
            header: Some(StringRecord::from(headers.to_vec())),
        }
    }

    fn write_header(&mut self) -> Result<()> {
        if let Some(header) = self.header.take() {
            self.writer.write_record(&header)?;
        }
        Ok(())
    }

    fn row(&mut self, row: impl Serialize) -> Result<()> {
        self.write_header()?;
        self.writer.serialize(row)?;
        Ok(())
    }

    fn finish(mut self) -> Result<()> {
        self.write_header()?;
        self.writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Flight,
    Plane,
    Airport,
    Carrier,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Category::Flight => "flight",
            Category::Plane => "plane",
            Category::Airport => "airport",
            Category::Carrier => "carrier",
        })
    }
}

type ReportFn = fn(&ReportContext<'_>, &mut dyn Write) -> Result<()>;

pub struct Report {
    pub name: &'static str,
    pub category: Category,
    pub description: &'static str,
    run: ReportFn,
}

impl Report {
    pub fn run(&self, context: &ReportContext<'_>, out: &mut dyn Write) -> Result<()> {
        info!("running {} for {}", self.name, context.year);
        (self.run)(context, out)
    }
}

impl fmt::Debug for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Report")
            .field("name", &self.name)
            .field("category", &self.category)
            .finish()
    }
}

pub fn find(name: &str) -> Result<&'static Report> {
    REPORTS
        .iter()
        .find(|report| report.name == name)
        .ok_or_else(|| Error::UnknownReport(name.to_string()))
}

pub const REPORTS: &[Report] = &[
    Report {
        name: "total-flights-from-origin",
        category: Category::Flight,
        description: "Total flights from an origin airport",
        run: flights::total_flights_from_origin,
    },
    Report {
        name: "total-flights-to-destination",
        category: Category::Flight,
        description: "Total flights to a destination airport",
        run: flights::total_flights_to_destination,
    },
    Report {
        name: "total-flights-from-origin-to-destination",
        category: Category::Flight,
        description: "Total flights from an origin to a destination",
        run: flights::total_flights_from_origin_to_destination,
    },
    Report {
        name: "top-flights-by-origin",
        category: Category::Flight,
        description: "Airports with the most departures",
        run: flights::top_flights_by_origin,
    },
    Report {
        name: "top-destinations-from-origin",
        category: Category::Flight,
        description: "Most frequent destinations from an origin airport",
        run: flights::top_destinations_from_origin,
    },
    Report {
        name: "most-popular-routes",
        category: Category::Flight,
        description: "Most flown origin to destination routes",
        run: flights::most_popular_routes,
    },
    Report {
        name: "worst-average-departure-delay-by-origin",
        category: Category::Flight,
        description: "Origins with the worst average departure delay",
        run: flights::worst_average_departure_delay_by_origin,
    },
    Report {
        name: "worst-average-arrival-delay-by-destination",
        category: Category::Flight,
        description: "Destinations with the worst average arrival delay",
        run: flights::worst_average_arrival_delay_by_destination,
    },
    Report {
        name: "most-cancelled-flights-by-origin",
        category: Category::Flight,
        description: "Origins with the most cancelled flights",
        run: flights::most_cancelled_flights_by_origin,
    },
    Report {
        name: "total-flights-by-origin-state",
        category: Category::Flight,
        description: "Departures by state",
        run: flights::total_flights_by_origin_state,
    },
    Report {
        name: "total-flights-by-destination-state",
        category: Category::Flight,
        description: "Arrivals by state",
        run: flights::total_flights_by_destination_state,
    },
    Report {
        name: "longest-flights",
        category: Category::Flight,
        description: "Longest flights by distance",
        run: flights::longest_flights,
    },
    Report {
        name: "shortest-flights",
        category: Category::Flight,
        description: "Shortest flights by distance",
        run: flights::shortest_flights,
    },
    Report {
        name: "total-flights-by-distance-range",
        category: Category::Flight,
        description: "Flights by distance range",
        run: flights::total_flights_by_distance_range,
    },
    Report {
        name: "days-with-least-cancellations",
        category: Category::Flight,
        description: "Days with the fewest cancellations",
        run: flights::days_with_least_cancellations,
    },
    Report {
        name: "days-with-most-cancellations",
        category: Category::Flight,
        description: "Days with the most cancellations",
        run: flights::days_with_most_cancellations,
    },
    Report {
        name: "total-monthly-flights",
        category: Category::Flight,
        description: "Flights per month",
        run: flights::total_monthly_flights,
    },
    Report {
        name: "total-daily-flights",
        category: Category::Flight,
        description: "Flights per day",
        run: flights::total_daily_flights,
    },
    Report {
        name: "total-flights-by-day-of-week",
        category: Category::Flight,
        description: "Flights per day of the week",
        run: flights::total_flights_by_day_of_week,
    },
    Report {
        name: "most-flights-by-day",
        category: Category::Flight,
        description: "Busiest days",
        run: flights::most_flights_by_day,
    },
    Report {
        name: "least-flights-by-day",
        category: Category::Flight,
        description: "Quietest days",
        run: flights::least_flights_by_day,
    },
    Report {
        name: "most-flights-by-origin-by-day",
        category: Category::Flight,
        description: "Busiest days for a single origin",
        run: flights::most_flights_by_origin_by_day,
    },
    Report {
        name: "most-flights-by-carrier-by-day",
        category: Category::Flight,
        description: "Busiest days for a single carrier",
        run: flights::most_flights_by_carrier_by_day,
    },
    Report {
        name: "cancellations-by-cause",
        category: Category::Flight,
        description: "Cancelled flights by reason",
        run: flights::cancellations_by_cause,
    },
    Report {
        name: "total-planes-by-manufacturer",
        category: Category::Plane,
        description: "Registered planes by manufacturer",
        run: planes::total_planes_by_manufacturer,
    },
    Report {
        name: "total-planes-by-year",
        category: Category::Plane,
        description: "Registered planes by year built",
        run: planes::total_planes_by_year,
    },
    Report {
        name: "total-planes-by-aircraft-type",
        category: Category::Plane,
        description: "Registered planes by aircraft type",
        run: planes::total_planes_by_aircraft_type,
    },
    Report {
        name: "total-planes-by-engine-type",
        category: Category::Plane,
        description: "Registered planes by engine type",
        run: planes::total_planes_by_engine_type,
    },
    Report {
        name: "planes-with-most-cancellations",
        category: Category::Plane,
        description: "Tail numbers with the most cancelled flights",
        run: planes::planes_with_most_cancellations,
    },
    Report {
        name: "most-flights-by-plane",
        category: Category::Plane,
        description: "Planes that flew the most",
        run: planes::most_flights_by_plane,
    },
    Report {
        name: "most-flights-by-plane-model",
        category: Category::Plane,
        description: "Plane models that flew the most",
        run: planes::most_flights_by_plane_model,
    },
    Report {
        name: "total-flights-by-plane-manufacturer",
        category: Category::Plane,
        description: "Flights by plane manufacturer",
        run: planes::total_flights_by_plane_manufacturer,
    },
    Report {
        name: "total-flights-by-plane-age-range",
        category: Category::Plane,
        description: "Flights by plane age",
        run: planes::total_flights_by_plane_age_range,
    },
    Report {
        name: "total-flights-by-aircraft-type",
        category: Category::Plane,
        description: "Flights by aircraft type",
        run: planes::total_flights_by_aircraft_type,
    },
    Report {
        name: "total-flights-by-engine-type",
        category: Category::Plane,
        description: "Flights by engine type",
        run: planes::total_flights_by_engine_type,
    },
    Report {
        name: "airports-by-state",
        category: Category::Airport,
        description: "Airports by state",
        run: airports::airports_by_state,
    },
    Report {
        name: "airports-by-country",
        category: Category::Airport,
        description: "Airports by country",
        run: airports::airports_by_country,
    },
    Report {
        name: "distance-between-airports",
        category: Category::Airport,
        description: "Great-circle distance from an origin to a destination",
        run: airports::distance_between_airports,
    },
    Report {
        name: "most-flights-by-carrier",
        category: Category::Carrier,
        description: "Carriers that flew the most",
        run: carriers::most_flights_by_carrier,
    },
    Report {
        name: "most-cancellations-by-carrier",
        category: Category::Carrier,
        description: "Carriers with the most cancelled flights",
        run: carriers::most_cancellations_by_carrier,
    },
];

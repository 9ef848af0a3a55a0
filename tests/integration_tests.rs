use std::fs;
use std::path::Path;

use airtraffic::{reports, Config, Error, ReportContext, Repository};
use tempfile::TempDir;

const AIRPORTS: &str = "\
iata,airport,city,state,country,lat,long
JFK,John F Kennedy Intl,New York,NY,USA,40.63975,-73.77893
LAX,Los Angeles International,Los Angeles,CA,USA,33.94254,-118.40807
SFO,San Francisco International,San Francisco,CA,USA,37.61900,-122.37484
ORD,Chicago O'Hare International,Chicago,IL,USA,41.97960,-87.90446
";

const CARRIERS: &str = "\
Code,Description
AA,American Airlines Inc.
UA,United Air Lines Inc.
";

const PLANES: &str = "\
tailnum,type,manufacturer,issue_date,model,status,aircraft_type,engine_type,year
N100AA,Corporation,BOEING,01/15/1999,737-823,Valid,Fixed Wing Multi-Engine,Turbo-Fan,1999
N200UA,Corporation,AIRBUS,03/01/2005,A320-232,Valid,Fixed Wing Multi-Engine,Turbo-Fan,2005
N300AA,Corporation,BOEING,None,757-223,Valid,Fixed Wing Multi-Engine,Turbo-Jet,None
";

const FLIGHT_HEADER: &str = "Year,Month,DayofMonth,DayOfWeek,DepTime,CRSDepTime,ArrTime,CRSArrTime,UniqueCarrier,FlightNum,TailNum,ActualElapsedTime,CRSElapsedTime,AirTime,ArrDelay,DepDelay,Origin,Dest,Distance,TaxiIn,TaxiOut,Cancelled,CancellationCode,Diverted,CarrierDelay,WeatherDelay,NASDelay,SecurityDelay,LateAircraftDelay";

struct Leg {
    month: u32,
    day: u32,
    carrier: &'static str,
    number: u32,
    tail: &'static str,
    origin: &'static str,
    destination: &'static str,
    departure_delay: &'static str,
    arrival_delay: &'static str,
    distance: u32,
    cancelled: Option<&'static str>,
    diverted: bool,
}

impl Leg {
    fn row(&self) -> String {
        format!(
            "2008,{},{},1,900,850,1200,1150,{},{},{},180,180,160,{},{},{},{},{},5,10,{},{},{},NA,NA,NA,NA,NA",
            self.month,
            self.day,
            self.carrier,
            self.number,
            self.tail,
            self.arrival_delay,
            self.departure_delay,
            self.origin,
            self.destination,
            self.distance,
            u8::from(self.cancelled.is_some()),
            self.cancelled.unwrap_or(""),
            u8::from(self.diverted),
        )
    }

    fn new(month: u32, day: u32, carrier: &'static str, number: u32, tail: &'static str) -> Self {
        Leg {
            month,
            day,
            carrier,
            number,
            tail,
            origin: "JFK",
            destination: "LAX",
            departure_delay: "0",
            arrival_delay: "0",
            distance: 2475,
            cancelled: None,
            diverted: false,
        }
    }

    fn route(self, origin: &'static str, destination: &'static str, distance: u32) -> Self {
        Leg {
            origin,
            destination,
            distance,
            ..self
        }
    }

    fn delays(self, departure_delay: &'static str, arrival_delay: &'static str) -> Self {
        Leg {
            departure_delay,
            arrival_delay,
            ..self
        }
    }

    fn cancelled(self, code: &'static str) -> Self {
        Leg {
            cancelled: Some(code),
            departure_delay: "NA",
            arrival_delay: "NA",
            ..self
        }
    }

    fn diverted(self) -> Self {
        Leg {
            diverted: true,
            ..self
        }
    }
}

fn legs() -> Vec<Leg> {
    vec![
        Leg::new(1, 1, "AA", 101, "N100AA").route("JFK", "LAX", 2475).delays("10", "5"),
        Leg::new(1, 1, "AA", 102, "N100AA").route("LAX", "JFK", 2475).delays("20", "15"),
        Leg::new(1, 2, "UA", 103, "N200UA").route("JFK", "SFO", 2586).delays("30", "25"),
        Leg::new(1, 2, "UA", 104, "N200UA").route("SFO", "LAX", 337).delays("0", "-5"),
        Leg::new(2, 1, "AA", 105, "N100AA").route("JFK", "ORD", 740).cancelled("A"),
        Leg::new(2, 1, "UA", 106, "N999XX").route("ORD", "JFK", 740).delays("5", "0").diverted(),
        // February 30th: kept, but undated.
        Leg::new(2, 30, "AA", 107, "NA").route("LAX", "SFO", 337).delays("10", "10"),
    ]
}

struct Fixture {
    _dir: TempDir,
    repository: Repository,
}

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn fixture() -> Fixture {
    fixture_with(PLANES, &legs())
}

fn fixture_with(planes: &str, legs: &[Leg]) -> Fixture {
    let dir = TempDir::new().unwrap();
    let mut flights = vec![FLIGHT_HEADER.to_string()];
    flights.extend(legs.iter().map(Leg::row));
    flights.push(String::new());

    let config = Config {
        airports: write(dir.path(), "airports.csv", AIRPORTS),
        carriers: write(dir.path(), "carriers.csv", CARRIERS),
        planes: write(dir.path(), "planes.csv", planes),
        flights: [(2008, write(dir.path(), "2008.csv", &flights.join("\n")))].into(),
    };

    let repository = Repository::new(&config).unwrap();
    Fixture {
        _dir: dir,
        repository,
    }
}

fn run(context: &ReportContext<'_>, name: &str) -> String {
    let mut output = Vec::new();
    reports::find(name)
        .unwrap()
        .run(context, &mut output)
        .unwrap();
    String::from_utf8(output).unwrap()
}

#[test]
fn top_flights_by_origin() {
    let fixture = fixture();
    let context = ReportContext::new(&fixture.repository, 2008);

    assert_eq!(
        run(&context, "top-flights-by-origin"),
        "Origin\tFlights\nJFK\t2\nLAX\t2\nORD\t1\nSFO\t1\n"
    );
}

#[test]
fn limit_truncates_ranked_reports() {
    let fixture = fixture();
    let context = ReportContext::new(&fixture.repository, 2008).with_limit(1);

    assert_eq!(
        run(&context, "top-flights-by-origin"),
        "Origin\tFlights\nJFK\t2\n"
    );
}

#[test]
fn average_departure_delay() {
    let fixture = fixture();
    let context = ReportContext::new(&fixture.repository, 2008);

    assert_eq!(
        run(&context, "worst-average-departure-delay-by-origin"),
        "Origin\tAverage delay\nJFK\t20.0\nLAX\t15.0\nORD\t5.0\nSFO\t0.0\n"
    );
}

#[test]
fn flights_by_distance_range() {
    let fixture = fixture();
    let context = ReportContext::new(&fixture.repository, 2008);

    assert_eq!(
        run(&context, "total-flights-by-distance-range"),
        "Distance\tFlights\n251-500\t2\n1001-2500\t2\n2501-5000\t1\n"
    );
}

#[test]
fn undated_flights_are_left_out_of_daily_reports() {
    let fixture = fixture();
    let context = ReportContext::new(&fixture.repository, 2008);

    assert_eq!(
        run(&context, "total-daily-flights"),
        "Date\tFlights\n2008-01-01\t2\n2008-01-02\t2\n2008-02-01\t1\n"
    );
    assert_eq!(
        run(&context, "least-flights-by-day"),
        "Date\tFlights\n2008-02-01\t1\n2008-01-01\t2\n2008-01-02\t2\n"
    );
    assert_eq!(
        run(&context, "total-monthly-flights"),
        "Month\tFlights\n2008-01\t4\n2008-02\t1\n"
    );
}

#[test]
fn origin_lookup_ignores_case() {
    let fixture = fixture();
    let context = ReportContext::new(&fixture.repository, 2008).with_origin("lax");

    assert_eq!(
        run(&context, "total-flights-from-origin"),
        "Origin\tName\tFlights\nLAX\tLos Angeles International\t2\n"
    );
}

#[test]
fn longest_and_shortest_flights() {
    let fixture = fixture();
    let context = ReportContext::new(&fixture.repository, 2008).with_limit(2);

    assert_eq!(
        run(&context, "longest-flights"),
        "Flight\tDate\tCarrier\tOrigin\tDestination\tDistance\n\
         103\t2008-01-02\tUA\tJFK\tSFO\t2586\n\
         101\t2008-01-01\tAA\tJFK\tLAX\t2475\n"
    );
    assert_eq!(
        run(&context, "shortest-flights"),
        "Flight\tDate\tCarrier\tOrigin\tDestination\tDistance\n\
         104\t2008-01-02\tUA\tSFO\tLAX\t337\n\
         107\t\tAA\tLAX\tSFO\t337\n"
    );
}

#[test]
fn flights_by_plane_age() {
    let fixture = fixture();
    let context = ReportContext::new(&fixture.repository, 2008);

    assert_eq!(
        run(&context, "total-flights-by-plane-age-range"),
        "Age\tFlights\n0-5\t2\n6-10\t2\nTotal\t4\n"
    );
}

#[test]
fn planes_by_year_skip_unknown_years() {
    let fixture = fixture();
    let context = ReportContext::new(&fixture.repository, 2008);

    assert_eq!(
        run(&context, "total-planes-by-year"),
        "Year\tPlanes\n2005\t1\n1999\t1\n"
    );
}

#[test]
fn flights_by_carrier() {
    let fixture = fixture();
    let context = ReportContext::new(&fixture.repository, 2008);

    assert_eq!(
        run(&context, "most-flights-by-carrier"),
        "Carrier\tName\tFlights\nAA\tAmerican Airlines Inc.\t3\nUA\tUnited Air Lines Inc.\t3\n"
    );
    assert_eq!(
        run(&context, "cancellations-by-cause"),
        "Cause\tCancelled\nCarrier\t1\n"
    );
}

#[test]
fn distance_between_airports() {
    let fixture = fixture();
    let context = ReportContext::new(&fixture.repository, 2008)
        .with_origin("JFK")
        .with_destination("LAX");

    let output = run(&context, "distance-between-airports");
    let mut lines = output.lines();
    assert_eq!(lines.next(), Some("Origin\tDestination\tMiles\tKilometers"));
    let row: Vec<&str> = lines.next().unwrap().split('\t').collect();
    assert_eq!(&row[..2], ["JFK", "LAX"]);
    let miles: f64 = row[2].parse().unwrap();
    let kilometers: f64 = row[3].parse().unwrap();
    assert!((miles - 2475.0).abs() < 10.0, "{}", miles);
    assert!((kilometers - 3983.0).abs() < 20.0, "{}", kilometers);
}

#[test]
fn report_errors() {
    let fixture = fixture();
    let context = ReportContext::new(&fixture.repository, 2008);
    let mut output = Vec::new();

    assert!(matches!(
        reports::find("no-such-report"),
        Err(Error::UnknownReport(_))
    ));

    let report = reports::find("total-flights-from-origin").unwrap();
    assert!(matches!(
        report.run(&context, &mut output),
        Err(Error::Config(_))
    ));

    let context = context.with_origin("XXX");
    match report.run(&context, &mut output) {
        Err(Error::UnknownAirport(code)) => assert_eq!(code, "XXX"),
        other => panic!("expected unknown airport, got {:?}", other),
    }

    let context = ReportContext::new(&fixture.repository, 2007);
    assert!(matches!(
        reports::find("top-flights-by-origin")
            .unwrap()
            .run(&context, &mut output),
        Err(Error::NoDataForYear(2007))
    ));
}

#[test]
fn busiest_origin_and_carrier_days_skip_undated_flights() {
    let fixture = fixture();
    let context = ReportContext::new(&fixture.repository, 2008);

    assert_eq!(
        run(&context, "most-flights-by-origin-by-day"),
        "Origin\tDate\tFlights\n\
         John F Kennedy Intl\t2008-01-01\t1\n\
         John F Kennedy Intl\t2008-01-02\t1\n\
         Los Angeles International\t2008-01-01\t1\n\
         Chicago O'Hare International\t2008-02-01\t1\n\
         San Francisco International\t2008-01-02\t1\n"
    );
    assert_eq!(
        run(&context, "most-flights-by-carrier-by-day"),
        "Carrier\tDate\tFlights\n\
         American Airlines Inc.\t2008-01-01\t2\n\
         United Air Lines Inc.\t2008-01-02\t2\n\
         United Air Lines Inc.\t2008-02-01\t1\n"
    );
}

#[test]
fn cancellations_by_day() {
    let fixture = fixture_with(
        PLANES,
        &[
            Leg::new(3, 1, "AA", 201, "N100AA").cancelled("B"),
            Leg::new(3, 1, "AA", 202, "N100AA").cancelled("B"),
            Leg::new(3, 2, "UA", 203, "N200UA").cancelled("A"),
            Leg::new(3, 3, "UA", 204, "N200UA"),
            Leg::new(2, 30, "AA", 205, "N100AA").cancelled("C"),
        ],
    );
    let context = ReportContext::new(&fixture.repository, 2008);

    assert_eq!(
        run(&context, "days-with-most-cancellations"),
        "Date\tCancelled\n2008-03-01\t2\n2008-03-02\t1\n"
    );
    assert_eq!(
        run(&context, "days-with-least-cancellations"),
        "Date\tCancelled\n2008-03-02\t1\n2008-03-01\t2\n"
    );
}

#[test]
fn routes_are_directional() {
    let fixture = fixture();
    let context = ReportContext::new(&fixture.repository, 2008);

    assert_eq!(
        run(&context, "most-popular-routes"),
        "Route\tFlights\n\
         JFK-LAX\t1\n\
         JFK-ORD\t1\n\
         JFK-SFO\t1\n\
         LAX-JFK\t1\n\
         LAX-SFO\t1\n\
         ORD-JFK\t1\n\
         SFO-LAX\t1\n"
    );
}

#[test]
fn flights_by_state() {
    let fixture = fixture();
    let context = ReportContext::new(&fixture.repository, 2008);

    assert_eq!(
        run(&context, "total-flights-by-origin-state"),
        "State\tFlights\nCA\t3\nNY\t2\nIL\t1\n"
    );
    assert_eq!(
        run(&context, "total-flights-by-destination-state"),
        "State\tFlights\nCA\t4\nNY\t2\n"
    );
}

#[test]
fn flights_by_plane() {
    let fixture = fixture();
    let context = ReportContext::new(&fixture.repository, 2008);

    assert_eq!(
        run(&context, "planes-with-most-cancellations"),
        "Tail number\tCancelled\nN100AA\t1\n"
    );
    assert_eq!(
        run(&context, "most-flights-by-plane"),
        "Tail number\tManufacturer\tModel\tFlights\n\
         N100AA\tBOEING\t737-823\t2\n\
         N200UA\tAIRBUS\tA320-232\t2\n"
    );
    assert_eq!(
        run(&context, "most-flights-by-plane-model"),
        "Manufacturer\tModel\tFlights\tDaily average\n\
         AIRBUS\tA320-232\t2\t0.0\n\
         BOEING\t737-823\t2\t0.0\n"
    );
}

#[test]
fn key_ordered_reports_list_every_group() {
    let distances = [50, 150, 300, 700, 1500, 3000, 6000, 50, 150, 300, 700, 1500];
    let legs: Vec<Leg> = (1..=12)
        .zip(distances)
        .map(|(month, distance)| {
            Leg::new(month, 1, "AA", 300 + month, "N100AA").route("JFK", "LAX", distance)
        })
        .collect();
    let fixture = fixture_with(PLANES, &legs);
    let context = ReportContext::new(&fixture.repository, 2008).with_limit(1);

    let months: String = (1..=12).map(|month| format!("2008-{:02}\t1\n", month)).collect();
    assert_eq!(
        run(&context, "total-monthly-flights"),
        format!("Month\tFlights\n{}", months)
    );

    let days: String = (1..=12).map(|month| format!("2008-{:02}-01\t1\n", month)).collect();
    assert_eq!(
        run(&context, "total-daily-flights"),
        format!("Date\tFlights\n{}", days)
    );

    assert_eq!(
        run(&context, "total-flights-by-day-of-week"),
        "Day\tFlights\nMon\t2\nTue\t3\nWed\t1\nThu\t1\nFri\t2\nSat\t2\nSun\t1\n"
    );
    assert_eq!(
        run(&context, "total-flights-by-distance-range"),
        "Distance\tFlights\n\
         0-100\t2\n\
         101-250\t2\n\
         251-500\t2\n\
         501-1000\t2\n\
         1001-2500\t2\n\
         2501-5000\t1\n\
         5001-9999\t1\n"
    );

    assert_eq!(
        run(&context, "most-flights-by-day"),
        "Date\tFlights\n2008-01-01\t1\n"
    );
}

#[test]
fn failed_report_writes_nothing() {
    // Built the year after the one being reported on.
    let planes = format!(
        "{}N400AA,Corporation,BOEING,None,787-8,Valid,Fixed Wing Multi-Engine,Turbo-Fan,2009\n",
        PLANES
    );
    let fixture = fixture_with(&planes, &[Leg::new(5, 4, "AA", 401, "N400AA")]);
    let context = ReportContext::new(&fixture.repository, 2008);
    let mut output = Vec::new();

    let result = reports::find("total-flights-by-plane-age-range")
        .unwrap()
        .run(&context, &mut output);
    assert!(matches!(
        result,
        Err(Error::Unclassified {
            kind: "plane age",
            value: -1
        })
    ));
    assert!(output.is_empty(), "{:?}", String::from_utf8_lossy(&output));
}

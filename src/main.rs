use clap::{Parser, Subcommand};
use log::{error, info};
use std::io::{self, Write};
use std::path::PathBuf;

use airtraffic::config::DEFAULT_CONFIG_PATH;
use airtraffic::reports::DEFAULT_LIMIT;
use airtraffic::{reports, Config, Error, ReportContext, Repository, Result, REPORTS};

#[derive(Parser)]
#[command(name = "airtraffic")]
#[command(about = "Reports over airline on-time performance data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file naming the data files
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    config: PathBuf,

    /// Flight year to report on; the most recent configured year if omitted
    #[arg(short, long, global = true)]
    year: Option<i32>,

    /// Maximum rows for ranked reports
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_LIMIT as u16,
        value_parser = clap::value_parser!(u16).range(1..=100),
        global = true
    )]
    limit: u16,

    /// Origin airport (IATA code)
    #[arg(long, global = true)]
    origin: Option<String>,

    /// Destination airport (IATA code)
    #[arg(long, global = true)]
    destination: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available reports
    List,

    /// Run one report and print it to stdout
    Run {
        /// Report name, as shown by `list`
        report: String,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        error!("{}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::List => {
            for report in REPORTS {
                writeln!(out, "{}\t{}\t{}", report.name, report.category, report.description)
                    .map_err(csv::Error::from)?;
            }
            Ok(())
        }
        Commands::Run { report } => {
            let report = reports::find(&report)?;
            let config = Config::load(&cli.config)?;
            let repository = Repository::new(&config)?;

            let year = match cli.year {
                Some(year) => year,
                None => repository
                    .flight_years()
                    .last()
                    .ok_or_else(|| Error::Config("no flight data found".to_string()))?,
            };
            info!("reporting on {}", year);

            let mut context = ReportContext::new(&repository, year).with_limit(cli.limit.into());
            if let Some(origin) = cli.origin {
                context = context.with_origin(origin);
            }
            if let Some(destination) = cli.destination {
                context = context.with_destination(destination);
            }
            report.run(&context, &mut out)
        }
    }
}

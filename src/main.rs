//! Route graph CLI
//!
//! Reads an SBS-1 position stream and prints airport graph analytics every window.

use clap::{Parser, Subcommand};
use routegraph::{
    client::{ClientConfig, RouteClient},
    directory::AirportDirectory,
    geo,
    tracker::{Tracker, TrackerConfig},
};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "routegraph")]
#[command(about = "Airport route graph analytics from ADS-B streams", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Consume a position stream and report analytics per window
    Run {
        /// OpenFlights airports.dat file
        #[arg(short, long, env = "ROUTEGRAPH_AIRPORTS")]
        airports: PathBuf,

        /// Input file (defaults to stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Window length in minutes of stream time
        #[arg(short, long, default_value = "5")]
        window_minutes: i64,

        /// Report the trailing partial window at end of input
        #[arg(long)]
        flush_final: bool,

        /// Base URL of the routes API
        #[arg(long, env = "ROUTEGRAPH_API_URL", default_value = ClientConfig::DEFAULT_BASE_URL)]
        api_url: String,

        /// Request timeout in seconds
        #[arg(long, default_value = "30")]
        timeout: u64,
    },

    /// Resolve a single callsign and print its route
    Resolve {
        callsign: String,

        /// Base URL of the routes API
        #[arg(long, env = "ROUTEGRAPH_API_URL", default_value = ClientConfig::DEFAULT_BASE_URL)]
        api_url: String,
    },

    /// Geodesic distance in nautical miles between two points
    Distance {
        lat1: f64,
        lon1: f64,
        lat2: f64,
        lon2: f64,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the reports
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match cli.command {
        Commands::Run {
            airports,
            input,
            window_minutes,
            flush_final,
            api_url,
            timeout,
        } => {
            let config = TrackerConfig {
                window: chrono::Duration::minutes(window_minutes),
                flush_final,
            };
            let client_config = ClientConfig::new()
                .with_base_url(api_url)
                .with_timeout(Duration::from_secs(timeout));

            run_tracker(&airports, input, client_config, config).await?;
        }

        Commands::Resolve { callsign, api_url } => {
            resolve(&callsign, api_url).await?;
        }

        Commands::Distance {
            lat1,
            lon1,
            lat2,
            lon2,
        } => {
            println!("{:.3} nm", geo::distance_nm(lat1, lon1, lat2, lon2));
        }
    }

    Ok(())
}

async fn run_tracker(
    airports: &PathBuf,
    input: Option<PathBuf>,
    client_config: ClientConfig,
    config: TrackerConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    if config.window.num_minutes() <= 0 {
        return Err("window length must be at least one minute".into());
    }

    tracing::info!("Starting route graph tracker");
    tracing::info!("Airports: {}", airports.display());
    tracing::info!("Routes API: {}", client_config.base_url);
    tracing::info!("Window: {} min", config.window.num_minutes());

    let directory = AirportDirectory::open(airports)?;
    let client = RouteClient::new(client_config)?;
    let mut tracker = Tracker::new(client, directory, config);

    let reader: Box<dyn BufRead> = match input {
        Some(path) => {
            tracing::info!("Reading from {}", path.display());
            Box::new(BufReader::new(File::open(path)?))
        }
        None => Box::new(io::stdin().lock()),
    };

    tracker
        .run(reader, |snapshot| {
            println!("{}", snapshot);
            println!();
        })
        .await?;

    let stats = tracker.stats();
    let graph = tracker.graph();
    tracing::info!("Final statistics:");
    tracing::info!("  Events: {}", stats.events);
    tracing::info!("  Events with callsign: {}", stats.events_with_callsign);
    tracing::info!("  Routes resolved: {}", stats.routes_resolved);
    tracing::info!("  Routes unresolved: {}", stats.routes_unresolved);
    tracing::info!("  Resolver errors: {}", stats.resolver_errors);
    tracing::info!("  Windows closed: {}", stats.windows_closed);
    tracing::info!("  Airports: {}", graph.airport_count());
    tracing::info!("  Routes: {}", graph.route_count());

    Ok(())
}

async fn resolve(callsign: &str, api_url: String) -> Result<(), Box<dyn std::error::Error>> {
    let client = RouteClient::new(ClientConfig::new().with_base_url(api_url))?;

    match client.fetch(callsign).await? {
        Some(route) => {
            println!("Callsign: {}", route.callsign);
            println!("Route: {}", route.route.join(" -> "));
            if let Some(op) = route.operator_iata {
                println!("Operator: {}", op);
            }
            if let Some(n) = route.flight_number {
                println!("Flight number: {}", n);
            }
            println!("Updated: {} ms", route.update_time);
        }
        None => {
            println!("No route found for {}", callsign);
        }
    }

    Ok(())
}

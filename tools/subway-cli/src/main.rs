use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use subway_transit::prelude::*;

mod output;
mod snapshot;

use output::{print_stations, RouteReport};
use snapshot::JsonSnapshotStore;

#[derive(Parser, Debug)]
#[command(
    name = "subway",
    author,
    version,
    about = "Plan subway routes and fares over a JSON network snapshot",
    long_about = "Loads every line of a subway network from a JSON snapshot, answers \
                  shortest-route and fare queries across lines, and edits line topology \
                  in place.\n\n\
                  Edits (insert-section, remove-station) are validated against the line's \
                  existing sections and written back to the snapshot only when they succeed."
)]
struct Args {
    /// Network snapshot JSON file
    #[arg(short, long, global = true, default_value = "network.json")]
    network: PathBuf,

    /// Fare table JSON file (defaults to the standard fare table)
    #[arg(short, long, global = true)]
    fare_config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (show debug messages)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Shortest route between two stations
    Path {
        #[arg(short, long)]
        source: u64,
        #[arg(short, long)]
        target: u64,
    },

    /// Shortest route and the fare for a rider of the given age
    Fare {
        #[arg(short, long)]
        source: u64,
        #[arg(short, long)]
        target: u64,
        #[arg(short, long, allow_negative_numbers = true)]
        age: i32,
    },

    /// Insert a section into a line, extending a terminal or splitting a section
    InsertSection {
        #[arg(short, long)]
        line: u64,
        /// New section id
        #[arg(long)]
        id: u64,
        #[arg(long)]
        up: u64,
        #[arg(long)]
        down: u64,
        #[arg(short, long)]
        distance: u32,
        /// Name for the up station when it is new to the network
        #[arg(long)]
        up_name: Option<String>,
        /// Name for the down station when it is new to the network
        #[arg(long)]
        down_name: Option<String>,
    },

    /// Remove a station from one line
    RemoveStation {
        #[arg(short, long)]
        line: u64,
        #[arg(short, long)]
        station: u64,
    },

    /// List stations, for one line in travel order or for the whole network
    Stations {
        #[arg(short, long)]
        line: Option<u64>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    if !args.network.exists() {
        bail!("Network file does not exist: {}", args.network.display());
    }

    let fare_policy = match &args.fare_config {
        Some(path) => {
            log::info!("Fare table: {}", path.display());
            load_fare_policy(path).context("Failed to load fare table")?
        }
        None => FarePolicy::default(),
    };

    let store = JsonSnapshotStore::new(&args.network);
    let mut network =
        SubwayNetwork::load(&store, fare_policy).context("Failed to load network snapshot")?;
    log::info!(
        "Loaded {} lines, {} stations from {}",
        network.lines().count(),
        network.stations().len(),
        store.path().display()
    );

    match args.command {
        Command::Path { source, target } => {
            let path = network
                .find_path(StationId::new(source), StationId::new(target))
                .context("Route query failed")?;
            print_route(&RouteReport::new(&network, &path, None), args.json)?;
        }

        Command::Fare {
            source,
            target,
            age,
        } => {
            let (path, fare) = network
                .fare_for(StationId::new(source), StationId::new(target), age)
                .context("Fare query failed")?;
            print_route(&RouteReport::new(&network, &path, Some(fare)), args.json)?;
        }

        Command::InsertSection {
            line,
            id,
            up,
            down,
            distance,
            up_name,
            down_name,
        } => {
            let line_id = LineId::new(line);
            let up_station = resolve_station(&network, up, up_name)?;
            let down_station = resolve_station(&network, down, down_name)?;
            let section = Section::new(id, line_id, up_station, down_station, distance)?;

            network
                .insert_section(line_id, section)
                .with_context(|| format!("Failed to insert section into line {}", line_id))?;
            network
                .save_line(&store, line_id)
                .context("Failed to save line")?;

            log::info!("Inserted section {} into line {}", id, line_id);
            print_stations_as(&network.line_stations(line_id)?, args.json)?;
        }

        Command::RemoveStation { line, station } => {
            let line_id = LineId::new(line);
            network
                .remove_station(line_id, StationId::new(station))
                .with_context(|| format!("Failed to remove station {} from line {}", station, line_id))?;
            network
                .save_line(&store, line_id)
                .context("Failed to save line")?;

            log::info!("Removed station {} from line {}", station, line_id);
            print_stations_as(&network.line_stations(line_id)?, args.json)?;
        }

        Command::Stations { line } => {
            let stations = match line {
                Some(line) => network.line_stations(LineId::new(line))?,
                None => network.stations(),
            };
            print_stations_as(&stations, args.json)?;
        }
    }

    Ok(())
}

fn load_fare_policy(path: &Path) -> Result<FarePolicy> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let config: FareConfig =
        serde_json::from_reader(BufReader::new(file)).context("Failed to parse fare table")?;
    Ok(FarePolicy::from_config(&config)?)
}

/// Known stations keep their network name; new ones need a name.
fn resolve_station(network: &SubwayNetwork, id: u64, name: Option<String>) -> Result<Station> {
    match (network.station(StationId::new(id)), name) {
        (Ok(station), _) => Ok(station.clone()),
        (Err(_), Some(name)) => Ok(Station::new(id, name)),
        (Err(_), None) => bail!("Station {} is new to the network; pass a name for it", id),
    }
}

fn print_route(report: &RouteReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        report.print_text();
    }
    Ok(())
}

fn print_stations_as(stations: &[Station], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(stations)?);
    } else {
        print_stations(stations);
    }
    Ok(())
}

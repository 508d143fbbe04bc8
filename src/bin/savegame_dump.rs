//! Decode a saved OpenTTD map blob and print what was recovered
//!
//! Run with: cargo run --bin savegame-dump -- map.sav [--json]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use openttd_client::codec::{resolve, scan};
use openttd_client::{EntityKind, MapParser, MapSnapshot, ParserConfig};

#[derive(Parser)]
#[command(name = "savegame-dump")]
#[command(about = "Inspect an OpenTTD savegame blob")]
struct Cli {
    /// Raw savegame blob as received from the server
    file: PathBuf,
    /// Print the snapshot as JSON
    #[arg(long)]
    json: bool,
    /// List every chunk the walk located
    #[arg(long)]
    chunks: bool,
    /// JSON file with parser limits
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    walk_limit: Option<usize>,
    /// Raise log level to debug
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => ParserConfig::from_json_file(path)?,
        None => ParserConfig::default(),
    };
    if let Some(limit) = cli.walk_limit {
        config.walk_limit = limit;
    }

    let blob = std::fs::read(&cli.file)?;
    let stream = resolve(&blob)?;
    let parser = MapParser::with_config(config);
    let snapshot = parser.parse_stream(&stream);

    if cli.chunks {
        let report = scan(&stream, parser.config());
        println!(
            "anchor: {:?}, stepped {} bytes{}",
            report.anchor,
            report.bytes_stepped,
            if report.aborted { " (aborted)" } else { "" }
        );
        for record in &report.records {
            println!(
                "  {:>10}  {}  {:?}  {} bytes",
                record.tag_offset,
                record.tag_str().escape_debug(),
                record.length_encoding,
                record.body_length
            );
        }
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&snapshot.to_json())?);
    } else {
        print_summary(&snapshot);
    }
    Ok(())
}

fn print_summary(snapshot: &MapSnapshot) {
    println!("Map: {}x{}", snapshot.map_width(), snapshot.map_height());
    if snapshot.is_estimated() {
        println!("Source: estimated (chunk walk found nothing usable)");
    } else {
        println!("Source: structured");
    }

    let extraction = snapshot.extraction();
    let rows = [
        ("Vehicles", EntityKind::Vehicles, snapshot.total_vehicles()),
        ("Stations", EntityKind::Stations, snapshot.total_stations()),
        ("Industries", EntityKind::Industries, snapshot.total_industries()),
        ("Companies", EntityKind::Companies, snapshot.total_companies()),
    ];
    for (label, kind, count) in rows {
        println!("{:<12}{:>6}  [{:?}]", label, count, extraction.get(kind));
    }

    if snapshot.total_vehicles() > 0 {
        println!("\nVehicles by type:");
        for (vehicle_type, count) in snapshot.vehicles_by_type() {
            println!("  {:<10}{:>6}", vehicle_type.name(), count);
        }
        println!("Vehicles by company:");
        for (company, count) in snapshot.vehicles_by_company() {
            let name = snapshot
                .company(company)
                .map(|c| c.name.as_str())
                .unwrap_or("-");
            println!("  #{:<3}{:>6}  {}", company, count, name);
        }
    }

    if !snapshot.chunk_census().is_empty() {
        println!("\nChunks:");
        for (tag, count) in snapshot.chunk_census() {
            println!("  {:<6}{:>6}", tag.escape_debug(), count);
        }
    }
}

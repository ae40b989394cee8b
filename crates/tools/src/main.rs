use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use roomchain_core::{Room, sequence_fingerprint};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod demo_pool;

use config::{OutputFormat, SampleConfig};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML file supplying default seed, length, and format
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long)]
    seed: Option<u64>,
    /// Number of rooms in the generated chain
    #[arg(short, long)]
    length: Option<usize>,
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,
}

#[derive(Serialize)]
struct SampleOutput<'a> {
    seed: u64,
    fingerprint: String,
    rooms: &'a [&'a Room],
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let file_config = match &args.config {
        Some(path) => SampleConfig::load(path)?,
        None => SampleConfig::default(),
    };
    let config = file_config.with_overrides(args.seed, args.length, args.format);

    let pool = demo_pool::demo_pool()?;
    info!(rooms = pool.len(), seed = config.seed, length = config.length, "sampling room chain");

    let sequence = pool
        .create_sequence_seeded(config.length, config.seed)
        .with_context(|| format!("Failed to build a chain of length {}", config.length))?;
    let fingerprint = format!("0x{:016x}", sequence_fingerprint(&sequence));

    match config.format {
        OutputFormat::Text => print!("{}", render_text(&sequence, &fingerprint)),
        OutputFormat::Json => {
            let output = SampleOutput { seed: config.seed, fingerprint, rooms: &sequence };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn render_text(sequence: &[&Room], fingerprint: &str) -> String {
    let mut text = String::new();
    for (index, room) in sequence.iter().enumerate() {
        let entrances: Vec<_> = room.entrances().iter().collect();
        let exits: Vec<_> = room.exits().iter().collect();
        text.push_str(&format!(
            "Room {index}: entrances {entrances:?} exits {exits:?}\n{room}\n\n"
        ));
    }
    text.push_str(&format!("Fingerprint: {fingerprint}\n"));
    text
}

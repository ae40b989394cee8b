use std::io;

use anyhow::{Result, ensure};
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use roomchain_core::{Cell, Room, RoomPool};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Number of random pools to try
    #[arg(short, long, default_value_t = 1000)]
    pools: u32,
    #[arg(short, long, default_value_t = 200)]
    length: usize,
}

fn random_below(rng: &mut ChaCha8Rng, bound: u64) -> usize {
    (rng.next_u64() % bound) as usize
}

fn random_room(rng: &mut ChaCha8Rng, width: usize, height: usize) -> Room {
    // Roughly one blocked cell in three keeps most rooms traversable.
    let cells = (0..width * height)
        .map(|_| if random_below(rng, 3) == 0 { Cell::Blocked } else { Cell::Open })
        .collect();
    Room::from_cells(width, cells)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    println!(
        "Starting fuzz harness on seed {} for {} pools of chain length {}...",
        args.seed, args.pools, args.length
    );
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut built = 0_u32;
    let mut rejected = 0_u32;

    for pool_index in 0..args.pools {
        let width = 3 + random_below(&mut rng, 4);
        let height = 3 + random_below(&mut rng, 4);
        let room_count = 2 + random_below(&mut rng, 10);
        let rooms: Vec<Room> =
            (0..room_count).map(|_| random_room(&mut rng, width, height)).collect();

        let pool = match RoomPool::new(rooms) {
            Ok(pool) => pool,
            Err(err) => {
                debug!(pool_index, %err, "pool rejected");
                rejected += 1;
                continue;
            }
        };
        built += 1;

        let sequence = pool.create_sequence(args.length, &mut rng)?;
        ensure!(
            sequence.len() == args.length,
            "Invariant failed: chain length {} != {} in pool {pool_index}",
            sequence.len(),
            args.length
        );
        for pair in sequence.windows(2) {
            ensure!(pair[0] != pair[1], "Invariant failed: room repeated in pool {pool_index}");
            ensure!(
                pair[0].leads_into(pair[1]),
                "Invariant failed: exits do not meet entrances in pool {pool_index}"
            );
        }
    }

    info!(built, rejected, "fuzzing completed");
    println!("Fuzzing completed successfully: {built} pools chained, {rejected} rejected.");
    Ok(())
}

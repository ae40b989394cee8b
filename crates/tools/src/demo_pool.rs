//! Built-in room set used by the sample tool.

use anyhow::{Context, Result};
use roomchain_core::{Room, RoomPool};

const DEMO_ROOMS: [&str; 8] = [
    "
    .####
    .####
    ...##
    ##.##
    ##.##
    ",
    "
    ##.##
    ##.##
    ##.##
    ##.##
    ##.##
    ",
    "
    ##.##
    #...#
    #...#
    #...#
    .###.
    ",
    "
    ####.
    ####.
    ##...
    ##.##
    ##.##
    ",
    "
    .####
    ...##
    ##...
    ####.
    ####.
    ",
    "
    ##.##
    .....
    .#.#.
    .#.#.
    .#.#.
    ",
    "
    .....
    .#.#.
    .....
    .#.#.
    .....
    ",
    // Sealed vault: no entrance, dropped by the pool.
    "
    #####
    #...#
    #...#
    #...#
    ##.##
    ",
];

pub fn demo_rooms() -> Result<Vec<Room>> {
    DEMO_ROOMS
        .iter()
        .enumerate()
        .map(|(index, template)| {
            Room::from_ascii(template).with_context(|| format!("demo room {index} is malformed"))
        })
        .collect()
}

pub fn demo_pool() -> Result<RoomPool> {
    RoomPool::new(demo_rooms()?).context("demo rooms do not form a valid pool")
}

//! Stable xxh3 fingerprints for generated room sequences.

use xxhash_rust::xxh3::xxh3_64;

use crate::room::Room;

/// Hashes the sequence length as a little-endian `u64` followed by each
/// room's [`Room::canonical_bytes`].
pub fn sequence_fingerprint(sequence: &[&Room]) -> u64 {
    let mut bytes = Vec::new();
    bytes.extend((sequence.len() as u64).to_le_bytes());
    for room in sequence {
        bytes.extend(room.canonical_bytes());
    }
    xxh3_64(&bytes)
}

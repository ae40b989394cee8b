//! Randomized chains of tile-grid rooms whose exits line up with the next
//! room's entrances.

pub mod fingerprint;
pub mod pool;
pub mod room;

mod pick;

pub use fingerprint::sequence_fingerprint;
pub use pool::{MIN_POOL_SIZE, PoolError, RoomId, RoomPool, SequenceError, Walk};
pub use room::{Cell, Room, RoomParseError};

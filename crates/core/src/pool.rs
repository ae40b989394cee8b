//! Entrance-column index over a pool of distinct traversable rooms, and the
//! randomized walk that chains them exit-to-entrance.
//!
//! Construction either yields a fully validated pool or an error; every room
//! in a validated pool has at least one other room it can lead into, so a walk
//! never runs out of candidates.

use std::collections::{BTreeSet, HashSet};
use std::iter::FusedIterator;
use std::sync::atomic::{AtomicU64, Ordering};

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};
use slotmap::{SecondaryMap, SlotMap, new_key_type};
use thiserror::Error;
use tracing::{debug, trace};

use crate::pick::pick;
use crate::room::Room;

new_key_type! {
    struct SlotKey;
}

static NEXT_POOL_TAG: AtomicU64 = AtomicU64::new(0);

/// Handle to a room inside the pool that issued it. Other pools reject it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoomId {
    pool: u64,
    key: SlotKey,
}

pub const MIN_POOL_SIZE: usize = 2;

/// Up-front capacity cap for [`RoomPool::create_sequence`]; longer chains grow as they go.
const SEQUENCE_PREALLOCATION: usize = 4_096;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("minimum 2 open and unique rooms required, found {distinct}")]
    InsufficientPool { distinct: usize },
    /// `input_index` is the room's position in the collection handed to
    /// [`RoomPool::new`].
    #[error(
        "room at input position {input_index} has no other room entering at any of its exits {exits:?}"
    )]
    UnreachablePartner { input_index: usize, exits: Vec<usize> },
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SequenceError {
    #[error("sequence length must be at least 1")]
    InvalidLength,
    #[error("room id does not belong to this pool")]
    UnknownRoom,
}

#[derive(Clone, Debug)]
pub struct RoomPool {
    tag: u64,
    rooms: SlotMap<SlotKey, Room>,
    /// Insertion order, used for uniform picks.
    order: Vec<RoomId>,
    by_entrance: Vec<Vec<RoomId>>,
    /// Rooms reachable from each room's exits, excluding the room itself, sorted by id.
    successors: SecondaryMap<SlotKey, Vec<RoomId>>,
    width: usize,
}

impl RoomPool {
    pub fn new<I>(rooms: I) -> Result<Self, PoolError>
    where
        I: IntoIterator<Item = Room>,
    {
        let mut input_len = 0_usize;
        let traversable: Vec<(usize, Room)> = rooms
            .into_iter()
            .inspect(|_| input_len += 1)
            .enumerate()
            .filter(|(_, room)| room.is_traversable())
            .collect();
        let traversable_len = traversable.len();

        let first_occurrence: Vec<bool> = {
            let mut seen = HashSet::with_capacity(traversable.len());
            traversable.iter().map(|(_, room)| seen.insert(room)).collect()
        };
        let distinct: Vec<(usize, Room)> = traversable
            .into_iter()
            .zip(first_occurrence)
            .filter_map(|(entry, first)| first.then_some(entry))
            .collect();

        if distinct.len() < MIN_POOL_SIZE {
            return Err(PoolError::InsufficientPool { distinct: distinct.len() });
        }

        let tag = NEXT_POOL_TAG.fetch_add(1, Ordering::Relaxed);
        let width = distinct.iter().map(|(_, room)| room.width()).max().unwrap_or(0);
        let mut slots: SlotMap<SlotKey, Room> = SlotMap::with_capacity_and_key(distinct.len());
        let mut order = Vec::with_capacity(distinct.len());
        let mut input_positions = Vec::with_capacity(distinct.len());
        for (input_index, room) in distinct {
            order.push(RoomId { pool: tag, key: slots.insert(room) });
            input_positions.push(input_index);
        }

        let by_entrance = build_entrance_index(&slots, &order, width);

        let mut successors = SecondaryMap::with_capacity(order.len());
        for (&id, &input_index) in order.iter().zip(&input_positions) {
            let room = &slots[id.key];
            let mut reachable: BTreeSet<RoomId> = room
                .exits()
                .iter()
                .filter_map(|&exit| by_entrance.get(exit))
                .flatten()
                .copied()
                .collect();
            reachable.remove(&id);

            if reachable.is_empty() {
                return Err(PoolError::UnreachablePartner {
                    input_index,
                    exits: room.exits().iter().copied().collect(),
                });
            }
            successors.insert(id.key, reachable.into_iter().collect());
        }

        debug!(
            input = input_len,
            dropped = input_len - traversable_len,
            duplicates = traversable_len - order.len(),
            rooms = order.len(),
            width,
            "room pool indexed"
        );

        Ok(Self { tag, rooms: slots, order, by_entrance, successors, width })
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Width of the widest pooled room; the entrance index covers `0..width`.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn rooms(&self) -> impl Iterator<Item = (RoomId, &Room)> {
        self.order.iter().map(|&id| (id, &self.rooms[id.key]))
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.owns(id).then(|| self.rooms.get(id.key)).flatten()
    }

    pub fn contains(&self, room: &Room) -> bool {
        self.id_of(room).is_some()
    }

    pub fn id_of(&self, room: &Room) -> Option<RoomId> {
        self.order.iter().copied().find(|&id| self.rooms[id.key] == *room)
    }

    /// Rooms with an entrance at `column`.
    pub fn entering_at(&self, column: usize) -> impl Iterator<Item = &Room> {
        self.by_entrance.get(column).into_iter().flatten().map(|&id| &self.rooms[id.key])
    }

    /// Rooms that may follow `id` in a sequence. Empty for ids from another pool.
    pub fn successors(&self, id: RoomId) -> &[RoomId] {
        if !self.owns(id) {
            return &[];
        }
        self.successors.get(id.key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Endless random walk over the pool, starting at a uniformly chosen room.
    pub fn walk<'p, 'r, R: Rng + ?Sized>(&'p self, rng: &'r mut R) -> Walk<'p, 'r, R> {
        Walk { pool: self, rng, start: None, current: None }
    }

    /// Endless random walk over the pool, starting at `start`.
    pub fn walk_from<'p, 'r, R: Rng + ?Sized>(
        &'p self,
        start: RoomId,
        rng: &'r mut R,
    ) -> Result<Walk<'p, 'r, R>, SequenceError> {
        if !self.owns(start) || !self.rooms.contains_key(start.key) {
            return Err(SequenceError::UnknownRoom);
        }
        Ok(Walk { pool: self, rng, start: Some(start), current: None })
    }

    /// Builds a chain of exactly `length` rooms where each room leads into the
    /// next and no room directly follows itself. Memory grows with the chain, so
    /// `length` is bounded only by what the caller can hold.
    pub fn create_sequence<R: Rng + ?Sized>(
        &self,
        length: usize,
        rng: &mut R,
    ) -> Result<Vec<&Room>, SequenceError> {
        if length == 0 {
            return Err(SequenceError::InvalidLength);
        }
        let mut sequence = Vec::with_capacity(length.min(SEQUENCE_PREALLOCATION));
        sequence.extend(self.walk(rng).take(length));
        Ok(sequence)
    }

    pub fn create_sequence_seeded(
        &self,
        length: usize,
        seed: u64,
    ) -> Result<Vec<&Room>, SequenceError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.create_sequence(length, &mut rng)
    }

    fn owns(&self, id: RoomId) -> bool {
        id.pool == self.tag
    }

    fn next_after<R: Rng + ?Sized>(&self, current: RoomId, rng: &mut R) -> RoomId {
        pick(rng, &self.successors[current.key])
    }
}

fn build_entrance_index(
    rooms: &SlotMap<SlotKey, Room>,
    order: &[RoomId],
    width: usize,
) -> Vec<Vec<RoomId>> {
    let mut by_entrance = vec![Vec::new(); width];
    for &id in order {
        for &column in rooms[id.key].entrances() {
            by_entrance[column].push(id);
        }
    }
    by_entrance
}

/// Iterator returned by [`RoomPool::walk`] and [`RoomPool::walk_from`]. Never ends.
pub struct Walk<'p, 'r, R: ?Sized> {
    pool: &'p RoomPool,
    rng: &'r mut R,
    start: Option<RoomId>,
    current: Option<RoomId>,
}

impl<'p, R: Rng + ?Sized> Iterator for Walk<'p, '_, R> {
    type Item = &'p Room;

    fn next(&mut self) -> Option<Self::Item> {
        let next = match self.current {
            Some(current) => self.pool.next_after(current, &mut *self.rng),
            None => match self.start.take() {
                Some(start) => start,
                None => pick(&mut *self.rng, &self.pool.order),
            },
        };
        trace!(?next, "walk step");
        self.current = Some(next);
        let pool = self.pool;
        Some(&pool.rooms[next.key])
    }
}

impl<R: Rng + ?Sized> FusedIterator for Walk<'_, '_, R> {}

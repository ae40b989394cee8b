use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;
use roomchain_core::{PoolError, Room, RoomPool, SequenceError};

fn room(template: &str) -> Room {
    Room::from_ascii(template).expect("fixture template should parse")
}

fn assert_valid_chain(sequence: &[&Room], expected_len: usize) {
    assert_eq!(sequence.len(), expected_len);
    for pair in sequence.windows(2) {
        let (previous, current) = (pair[0], pair[1]);
        assert_ne!(previous, current, "a room must never directly follow itself");
        assert!(
            previous.exits().iter().any(|exit| current.entrances().contains(exit)),
            "exits {:?} do not meet entrances {:?}",
            previous.exits(),
            current.entrances()
        );
    }
}

#[test]
fn two_rooms_crossing_columns_alternate() {
    let x = room(
        "
        .##
        ###
        ##.
        ",
    );
    let y = room(
        "
        ##.
        ###
        .##
        ",
    );
    let pool = RoomPool::new(vec![x.clone(), y.clone()]).expect("crossing rooms should build");

    let sequence = pool.create_sequence_seeded(100, 2026).expect("length is positive");
    assert_valid_chain(&sequence, 100);
    for pair in sequence.windows(2) {
        assert!((pair[0] == &x && pair[1] == &y) || (pair[0] == &y && pair[1] == &x));
    }
}

#[test]
fn identical_open_rooms_collapse_below_minimum() {
    let open = "...\n...\n...";
    let result = RoomPool::new(vec![room(open), room(open), room(open)]);
    assert_eq!(result.err(), Some(PoolError::InsufficientPool { distinct: 1 }));
}

#[test]
fn blocked_room_is_dropped_and_never_sequenced() {
    let blocked = room("###\n###\n###");
    let pool = RoomPool::new(vec![room("...\n...\n..."), blocked.clone(), room(".#.\n...\n...")])
        .expect("two open rooms should build");
    assert_eq!(pool.len(), 2);
    assert!(!pool.contains(&blocked));

    for seed in 0..20 {
        let sequence = pool.create_sequence_seeded(50, seed).expect("length is positive");
        assert_valid_chain(&sequence, 50);
        assert!(sequence.iter().all(|&room| room != &blocked));
    }
}

#[test]
fn room_whose_only_exit_has_no_partner_fails_construction() {
    let a = room(".##\n.##\n.##");
    let b = room("..#\n...\n.##");
    let c = room(".##\n...\n##.");
    let result = RoomPool::new(vec![a, b, c]);
    assert_eq!(
        result.err(),
        Some(PoolError::UnreachablePartner { input_index: 2, exits: vec![2] })
    );
}

#[test]
fn only_one_traversable_room_among_unique_rooms_fails() {
    let rooms = vec![
        room("###\n.#.\n..."),
        room("...\n.#.\n###"),
        room(".#.\n.#.\n..#"),
    ];
    assert_eq!(
        RoomPool::new(rooms).err(),
        Some(PoolError::InsufficientPool { distinct: 1 })
    );
}

#[test]
fn room_leading_only_into_itself_fails() {
    let rooms = vec![
        room(".##\n.##\n.##"),
        room("##.\n##.\n##."),
        room("...\n#.#\n#.#"),
    ];
    assert_eq!(
        RoomPool::new(rooms).err(),
        Some(PoolError::UnreachablePartner { input_index: 2, exits: vec![1] })
    );
}

#[test]
fn empty_and_single_inputs_fail() {
    assert_eq!(
        RoomPool::new(Vec::<Room>::new()).err(),
        Some(PoolError::InsufficientPool { distinct: 0 })
    );
    assert_eq!(
        RoomPool::new(vec![room("...\n...")]).err(),
        Some(PoolError::InsufficientPool { distinct: 1 })
    );
}

fn good_pools() -> Vec<Vec<Room>> {
    vec![
        vec![room(".##\n.##\n.##"), room("##.\n##.\n##."), room(".#.\n.#.\n...")],
        vec![room("..#\n#..\n#.."), room("#..\n..#\n..#")],
        vec![
            room(".##\n.##\n.##"),
            room("#.#\n#.#\n#.#"),
            room("##.\n##.\n##."),
            room(".#.\n.#.\n.#."),
            room("..#\n..#\n..#"),
            room("...\n...\n..."),
            room("...\n...\n..."),
            room("#..\n#..\n#.."),
            room("###\n.#.\n..."),
            room("...\n.#.\n###"),
        ],
    ]
}

#[test]
fn good_pools_produce_valid_chains_of_any_length() {
    for rooms in good_pools() {
        let pool = RoomPool::new(rooms).expect("fixture pool should build");
        for length in [1, 3, 20, 100] {
            let sequence = pool.create_sequence_seeded(length, 42).expect("length is positive");
            assert_valid_chain(&sequence, length);
        }
    }
}

#[test]
fn large_fixture_pool_drops_copies_and_closed_rooms() {
    let rooms = good_pools().pop().expect("three fixture pools");
    let pool = RoomPool::new(rooms).expect("fixture pool should build");
    assert_eq!(pool.len(), 7);
    assert!(pool.rooms().all(|(_, room)| room.is_traversable()));
}

#[test]
fn zero_length_is_a_usage_error() {
    let pool = RoomPool::new(good_pools().remove(0)).expect("fixture pool should build");
    assert_eq!(pool.create_sequence_seeded(0, 1), Err(SequenceError::InvalidLength));
}

#[test]
fn walk_keeps_going_past_any_fixed_length() {
    let pool = RoomPool::new(good_pools().remove(1)).expect("fixture pool should build");
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let sequence: Vec<&Room> = pool.walk(&mut rng).take(1_000).collect();
    assert_valid_chain(&sequence, 1_000);
}

//! Uniform selection over an injected random source.

use rand_chacha::rand_core::Rng;

/// Index in `0..len` from one `next_u64` draw reduced modulo `len`.
///
/// The reduction is slightly biased toward low indices. Each index's
/// probability is off from `1 / len` by a relative error below `len / 2^64`,
/// so under 2^-50 for any list shorter than 2^14 candidates.
pub(crate) fn pick_index<R: Rng + ?Sized>(rng: &mut R, len: usize) -> usize {
    debug_assert!(len > 0, "cannot pick from an empty candidate list");
    (rng.next_u64() % len as u64) as usize
}

pub(crate) fn pick<T: Copy, R: Rng + ?Sized>(rng: &mut R, candidates: &[T]) -> T {
    candidates[pick_index(rng, candidates.len())]
}

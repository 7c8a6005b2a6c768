//! Queue shuffling
//!
//! Fisher-Yates over everything except the current track, which is pinned
//! at the front so playback continues uninterrupted.

use rand::seq::SliceRandom;
use rand::Rng;

/// Shuffle `items` keeping `pinned` in place at index 0
///
/// Returns the new index of the pinned item (always 0 when `pinned` is
/// valid). With no pinned item the whole slice is shuffled.
pub fn shuffle_pinned<T, R: Rng + ?Sized>(
    items: &mut [T],
    pinned: Option<usize>,
    rng: &mut R,
) -> Option<usize> {
    match pinned {
        Some(index) if index < items.len() => {
            items.swap(0, index);
            items[1..].shuffle(rng);
            Some(0)
        }
        _ => {
            items.shuffle(rng);
            None
        }
    }
}

use rand::seq::SliceRandom;
use rand::Rng;

use super::types::ORGANIZER_NUMBER;

/// Deals `count` distinct numbers from a uniform shuffle of `[2, size]`.
///
/// When fewer numbers are requested than exist in the range, the leftover
/// numbers simply stay unassigned.
pub fn draw_numbers<R: Rng + ?Sized>(count: usize, size: usize, rng: &mut R) -> Vec<u32> {
    let mut pool: Vec<u32> = (ORGANIZER_NUMBER + 1..=size as u32).collect();
    pool.shuffle(rng);
    pool.truncate(count);
    pool
}

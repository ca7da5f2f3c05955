#[cfg(test)]
mod tests;

use std::num::NonZeroUsize;

use crate::util::{Pixel, sad::dispatch_block_size};

/// Mean-removed error energy between two blocks.
///
/// Returns `(variance, sse)` where `sse` is the plain sum of squared
/// differences and `variance = sse - sum^2 / (width * height)`.
#[must_use]
pub fn get_variance<T: Pixel>(
    width: NonZeroUsize,
    height: NonZeroUsize,
    src: &[T],
    src_pitch: NonZeroUsize,
    ref_: &[T],
    ref_pitch: NonZeroUsize,
) -> (u64, u64) {
    dispatch_block_size!(
        width.get(),
        height.get(),
        variance_wxh,
        src,
        src_pitch,
        ref_,
        ref_pitch
    )
}

#[must_use]
pub fn variance_wxh<T: Pixel, const WIDTH: usize, const HEIGHT: usize>(
    src: &[T],
    src_pitch: NonZeroUsize,
    ref_: &[T],
    ref_pitch: NonZeroUsize,
) -> (u64, u64) {
    let mut sum: i64 = 0;
    let mut sse: u64 = 0;
    for y in 0..HEIGHT {
        let src_row = &src[y * src_pitch.get()..][..WIDTH];
        let ref_row = &ref_[y * ref_pitch.get()..][..WIDTH];
        for (s, r) in src_row.iter().zip(ref_row.iter()) {
            let diff = i64::from(s.to_i32() - r.to_i32());
            sum += diff;
            sse += diff.unsigned_abs() * diff.unsigned_abs();
        }
    }
    let mean_energy = (sum * sum).unsigned_abs() / (WIDTH * HEIGHT) as u64;
    (sse - mean_energy, sse)
}

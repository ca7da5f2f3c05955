mod rust;


use std::num::NonZeroUsize;

use crate::util::Pixel;

pub(crate) use rust::dispatch_block_size;
pub use rust::{sad_wxh, sad_x4_wxh};

/// Sum of absolute differences between a `width`x`height` source block and a
/// candidate block of the same size.
#[must_use]
pub fn get_sad<T: Pixel>(
    width: NonZeroUsize,
    height: NonZeroUsize,
    src: &[T],
    src_pitch: NonZeroUsize,
    ref_: &[T],
    ref_pitch: NonZeroUsize,
) -> u64 {
    rust::get_sad(width, height, src, src_pitch, ref_, ref_pitch)
}

/// Evaluates four candidate blocks against one source block.
///
/// The result is identical to four separate [`get_sad`] calls.
#[must_use]
pub fn get_sad_x4<T: Pixel>(
    width: NonZeroUsize,
    height: NonZeroUsize,
    src: &[T],
    src_pitch: NonZeroUsize,
    refs: [&[T]; 4],
    ref_pitch: NonZeroUsize,
) -> [u64; 4] {
    rust::get_sad_x4(width, height, src, src_pitch, refs, ref_pitch)
}

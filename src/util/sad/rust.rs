use std::num::NonZeroUsize;

use crate::util::Pixel;

macro_rules! dispatch_block_size {
    ($width:expr, $height:expr, $func:ident $(, $arg:expr)*) => {
        match ($width, $height) {
            (4, 4) => $func::<T, 4, 4>($($arg),*),
            (4, 8) => $func::<T, 4, 8>($($arg),*),
            (4, 16) => $func::<T, 4, 16>($($arg),*),
            (8, 4) => $func::<T, 8, 4>($($arg),*),
            (8, 8) => $func::<T, 8, 8>($($arg),*),
            (8, 16) => $func::<T, 8, 16>($($arg),*),
            (8, 32) => $func::<T, 8, 32>($($arg),*),
            (16, 4) => $func::<T, 16, 4>($($arg),*),
            (16, 8) => $func::<T, 16, 8>($($arg),*),
            (16, 16) => $func::<T, 16, 16>($($arg),*),
            (16, 32) => $func::<T, 16, 32>($($arg),*),
            (16, 64) => $func::<T, 16, 64>($($arg),*),
            (32, 8) => $func::<T, 32, 8>($($arg),*),
            (32, 16) => $func::<T, 32, 16>($($arg),*),
            (32, 32) => $func::<T, 32, 32>($($arg),*),
            (32, 64) => $func::<T, 32, 64>($($arg),*),
            (64, 16) => $func::<T, 64, 16>($($arg),*),
            (64, 32) => $func::<T, 64, 32>($($arg),*),
            (64, 64) => $func::<T, 64, 64>($($arg),*),
            (64, 128) => $func::<T, 64, 128>($($arg),*),
            (128, 64) => $func::<T, 128, 64>($($arg),*),
            (128, 128) => $func::<T, 128, 128>($($arg),*),
            _ => unimplemented!("Invalid block size {}x{}", $width, $height),
        }
    };
}

pub(crate) use dispatch_block_size;

#[must_use]
pub(super) fn get_sad<T: Pixel>(
    width: NonZeroUsize,
    height: NonZeroUsize,
    src: &[T],
    src_pitch: NonZeroUsize,
    ref_: &[T],
    ref_pitch: NonZeroUsize,
) -> u64 {
    dispatch_block_size!(
        width.get(),
        height.get(),
        sad_wxh,
        src,
        src_pitch,
        ref_,
        ref_pitch
    )
}

#[must_use]
pub(super) fn get_sad_x4<T: Pixel>(
    width: NonZeroUsize,
    height: NonZeroUsize,
    src: &[T],
    src_pitch: NonZeroUsize,
    refs: [&[T]; 4],
    ref_pitch: NonZeroUsize,
) -> [u64; 4] {
    dispatch_block_size!(
        width.get(),
        height.get(),
        sad_x4_wxh,
        src,
        src_pitch,
        refs,
        ref_pitch
    )
}

#[must_use]
pub fn sad_wxh<T: Pixel, const WIDTH: usize, const HEIGHT: usize>(
    src: &[T],
    src_pitch: NonZeroUsize,
    ref_: &[T],
    ref_pitch: NonZeroUsize,
) -> u64 {
    let mut sum = 0;
    for y in 0..HEIGHT {
        let src_row = &src[y * src_pitch.get()..][..WIDTH];
        let ref_row = &ref_[y * ref_pitch.get()..][..WIDTH];
        sum += src_row.iter().zip(ref_row.iter()).fold(0, |acc, (s, r)| {
            acc + (s.to_i32() - r.to_i32()).unsigned_abs() as u64
        });
    }
    sum
}

#[must_use]
pub fn sad_x4_wxh<T: Pixel, const WIDTH: usize, const HEIGHT: usize>(
    src: &[T],
    src_pitch: NonZeroUsize,
    refs: [&[T]; 4],
    ref_pitch: NonZeroUsize,
) -> [u64; 4] {
    refs.map(|ref_| sad_wxh::<T, WIDTH, HEIGHT>(src, src_pitch, ref_, ref_pitch))
}

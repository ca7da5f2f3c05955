
use std::num::NonZeroUsize;

use crate::{
    block_size::BlockSize,
    util::{
        Pixel,
        sad::{dispatch_block_size, sad_wxh, sad_x4_wxh},
        variance::variance_wxh,
    },
};

pub type SadFn<T> = fn(&[T], NonZeroUsize, &[T], NonZeroUsize) -> u64;
pub type SadX4Fn<T> = fn(&[T], NonZeroUsize, [&[T]; 4], NonZeroUsize) -> [u64; 4];
pub type VarianceFn<T> = fn(&[T], NonZeroUsize, &[T], NonZeroUsize) -> (u64, u64);

/// The three distortion operations bound to one block size.
#[derive(Debug, Clone, Copy)]
pub struct DistortionFnSet<T: Pixel> {
    pub bsize: BlockSize,
    /// Single candidate SAD.
    pub sdf: SadFn<T>,
    /// Four candidate SAD.
    pub sdx4df: SadX4Fn<T>,
    /// Variance and SSE.
    pub vf: VarianceFn<T>,
}

impl<T: Pixel> DistortionFnSet<T> {
    #[must_use]
    pub fn for_block_size(bsize: BlockSize) -> Self {
        let (sdf, sdx4df, vf) = dispatch_block_size!(bsize.width(), bsize.height(), fn_triple);
        Self {
            bsize,
            sdf,
            sdx4df,
            vf,
        }
    }
}

fn fn_triple<T: Pixel, const WIDTH: usize, const HEIGHT: usize>()
-> (SadFn<T>, SadX4Fn<T>, VarianceFn<T>) {
    (
        sad_wxh::<T, WIDTH, HEIGHT>,
        sad_x4_wxh::<T, WIDTH, HEIGHT>,
        variance_wxh::<T, WIDTH, HEIGHT>,
    )
}

/// One [`DistortionFnSet`] per block size, built once and shared read-only.
#[derive(Debug, Clone)]
pub struct DistortionTable<T: Pixel> {
    sets: [DistortionFnSet<T>; BlockSize::COUNT],
}

impl<T: Pixel> DistortionTable<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sets: BlockSize::ALL.map(DistortionFnSet::for_block_size),
        }
    }

    #[must_use]
    pub fn get(&self, bsize: BlockSize) -> &DistortionFnSet<T> {
        &self.sets[bsize.index()]
    }
}

impl<T: Pixel> Default for DistortionTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

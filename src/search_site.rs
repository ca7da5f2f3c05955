
use std::num::NonZeroUsize;

use crate::{
    mv::MotionVector,
    params::{MAX_FIRST_STEP, MAX_MVSEARCH_STEPS},
};

pub const SEARCHES_PER_STEP: usize = 8;

/// One candidate displacement of the diamond search and its linear offset
/// into a buffer of the configured stride.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSite {
    pub mv: MotionVector,
    pub offset: isize,
}

/// The diamond search rings for one reference stride.
///
/// Site 0 is the center. It is followed by [`MAX_MVSEARCH_STEPS`] rings of
/// eight sites each, radius 1024 first and halving down to 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSiteConfig {
    sites: Vec<SearchSite>,
    stride: NonZeroUsize,
}

impl SearchSiteConfig {
    #[must_use]
    pub fn new(stride: NonZeroUsize) -> Self {
        let stride_i = stride.get() as isize;
        let mut sites = Vec::with_capacity(1 + MAX_MVSEARCH_STEPS * SEARCHES_PER_STEP);
        sites.push(SearchSite {
            mv: MotionVector::zero(),
            offset: 0,
        });

        let mut len = MAX_FIRST_STEP;
        while len > 0 {
            let ring = [
                (-len, 0),
                (len, 0),
                (0, -len),
                (0, len),
                (-len, -len),
                (-len, len),
                (len, -len),
                (len, len),
            ];
            sites.extend(ring.into_iter().map(|(row, col)| SearchSite {
                mv: MotionVector::new(row, col),
                offset: row as isize * stride_i + col as isize,
            }));
            len /= 2;
        }

        Self { sites, stride }
    }

    #[must_use]
    pub fn stride(&self) -> NonZeroUsize {
        self.stride
    }

    #[must_use]
    pub fn sites(&self) -> &[SearchSite] {
        &self.sites
    }

    #[must_use]
    pub const fn searches_per_step(&self) -> usize {
        SEARCHES_PER_STEP
    }

    /// Number of rings, excluding the center.
    #[must_use]
    pub fn total_steps(&self) -> usize {
        (self.sites.len() - 1) / SEARCHES_PER_STEP
    }

    /// Index of the first site of `ring` in [`SearchSiteConfig::sites`].
    #[must_use]
    pub const fn ring_start(ring: usize) -> usize {
        1 + ring * SEARCHES_PER_STEP
    }

    /// The eight sites of `ring`, 0 being the coarsest.
    #[must_use]
    pub fn ring(&self, ring: usize) -> &[SearchSite] {
        &self.sites[Self::ring_start(ring)..][..SEARCHES_PER_STEP]
    }
}

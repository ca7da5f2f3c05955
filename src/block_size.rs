#[cfg(test)]
mod tests;

use std::num::NonZeroUsize;

use anyhow::{Result, bail};

/// Log2 of the mode-info unit, the 4x4 granularity block positions are
/// tracked at.
pub const MI_SIZE_LOG2: usize = 2;
pub const MI_SIZE: usize = 1 << MI_SIZE_LOG2;

/// The closed set of block sizes the search can be asked to run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockSize {
    Block4x4,
    Block4x8,
    Block8x4,
    Block8x8,
    Block8x16,
    Block16x8,
    Block16x16,
    Block16x32,
    Block32x16,
    Block32x32,
    Block32x64,
    Block64x32,
    Block64x64,
    Block64x128,
    Block128x64,
    Block128x128,
    Block4x16,
    Block16x4,
    Block8x32,
    Block32x8,
    Block16x64,
    Block64x16,
}

impl BlockSize {
    pub const COUNT: usize = 22;

    pub const ALL: [BlockSize; Self::COUNT] = [
        BlockSize::Block4x4,
        BlockSize::Block4x8,
        BlockSize::Block8x4,
        BlockSize::Block8x8,
        BlockSize::Block8x16,
        BlockSize::Block16x8,
        BlockSize::Block16x16,
        BlockSize::Block16x32,
        BlockSize::Block32x16,
        BlockSize::Block32x32,
        BlockSize::Block32x64,
        BlockSize::Block64x32,
        BlockSize::Block64x64,
        BlockSize::Block64x128,
        BlockSize::Block128x64,
        BlockSize::Block128x128,
        BlockSize::Block4x16,
        BlockSize::Block16x4,
        BlockSize::Block8x32,
        BlockSize::Block32x8,
        BlockSize::Block16x64,
        BlockSize::Block64x16,
    ];

    pub fn from_dimensions(width: usize, height: usize) -> Result<Self> {
        Ok(match (width, height) {
            (4, 4) => Self::Block4x4,
            (4, 8) => Self::Block4x8,
            (4, 16) => Self::Block4x16,
            (8, 4) => Self::Block8x4,
            (8, 8) => Self::Block8x8,
            (8, 16) => Self::Block8x16,
            (8, 32) => Self::Block8x32,
            (16, 4) => Self::Block16x4,
            (16, 8) => Self::Block16x8,
            (16, 16) => Self::Block16x16,
            (16, 32) => Self::Block16x32,
            (16, 64) => Self::Block16x64,
            (32, 8) => Self::Block32x8,
            (32, 16) => Self::Block32x16,
            (32, 32) => Self::Block32x32,
            (32, 64) => Self::Block32x64,
            (64, 16) => Self::Block64x16,
            (64, 32) => Self::Block64x32,
            (64, 64) => Self::Block64x64,
            (64, 128) => Self::Block64x128,
            (128, 64) => Self::Block128x64,
            (128, 128) => Self::Block128x128,
            _ => bail!("Invalid block size {width}x{height}."),
        })
    }

    /// Position of this size in [`BlockSize::ALL`] and in the distortion table.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn width_log2(self) -> usize {
        match self {
            Self::Block4x4 | Self::Block4x8 | Self::Block4x16 => 2,
            Self::Block8x4 | Self::Block8x8 | Self::Block8x16 | Self::Block8x32 => 3,
            Self::Block16x4
            | Self::Block16x8
            | Self::Block16x16
            | Self::Block16x32
            | Self::Block16x64 => 4,
            Self::Block32x8 | Self::Block32x16 | Self::Block32x32 | Self::Block32x64 => 5,
            Self::Block64x16 | Self::Block64x32 | Self::Block64x64 | Self::Block64x128 => 6,
            Self::Block128x64 | Self::Block128x128 => 7,
        }
    }

    #[must_use]
    pub const fn height_log2(self) -> usize {
        match self {
            Self::Block4x4 | Self::Block8x4 | Self::Block16x4 => 2,
            Self::Block4x8 | Self::Block8x8 | Self::Block16x8 | Self::Block32x8 => 3,
            Self::Block4x16
            | Self::Block8x16
            | Self::Block16x16
            | Self::Block32x16
            | Self::Block64x16 => 4,
            Self::Block8x32 | Self::Block16x32 | Self::Block32x32 | Self::Block64x32 => 5,
            Self::Block16x64 | Self::Block32x64 | Self::Block64x64 | Self::Block128x64 => 6,
            Self::Block64x128 | Self::Block128x128 => 7,
        }
    }

    #[must_use]
    pub const fn width(self) -> usize {
        1 << self.width_log2()
    }

    #[must_use]
    pub const fn height(self) -> usize {
        1 << self.height_log2()
    }

    #[must_use]
    pub fn width_nz(self) -> NonZeroUsize {
        NonZeroUsize::MIN.saturating_add(self.width() - 1)
    }

    #[must_use]
    pub fn height_nz(self) -> NonZeroUsize {
        NonZeroUsize::MIN.saturating_add(self.height() - 1)
    }

    #[must_use]
    pub const fn width_mi_log2(self) -> usize {
        self.width_log2() - MI_SIZE_LOG2
    }

    #[must_use]
    pub const fn height_mi_log2(self) -> usize {
        self.height_log2() - MI_SIZE_LOG2
    }

    #[must_use]
    pub const fn is_square(self) -> bool {
        self.width_log2() == self.height_log2()
    }
}

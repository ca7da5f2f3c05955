
use crate::{
    block_size::{BlockSize, MI_SIZE},
    intrabc::{IntraBcDirection, TileInfo},
    mv::MotionVector,
    params::MAX_MVSEARCH_STEPS,
    plane::Plane,
    util::Pixel,
};

/// Bits used to code a motion vector component in 1/8 pel.
pub const MV_IN_USE_BITS: u32 = 14;
pub const MV_UPP: i32 = 1 << MV_IN_USE_BITS;
pub const MV_LOW: i32 = -(1 << MV_IN_USE_BITS);

/// Largest full-pel distance the search may travel from its reference MV.
pub const MAX_FULL_PEL_VAL: i32 = (1 << (MAX_MVSEARCH_STEPS - 1)) - 1;

/// Inclusive bounding box of full-pel motion vectors a search may visit.
///
/// Limits start as the region the reference buffer can serve and are only
/// ever tightened afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MvLimits {
    pub row_min: i32,
    pub row_max: i32,
    pub col_min: i32,
    pub col_max: i32,
}

impl MvLimits {
    #[must_use]
    pub const fn new(row_min: i32, row_max: i32, col_min: i32, col_max: i32) -> Self {
        Self {
            row_min,
            row_max,
            col_min,
            col_max,
        }
    }

    /// Limits for a block at picture position `(x, y)` such that every
    /// candidate block stays inside a picture of `width`x`height` extended by
    /// `hpad`/`vpad` samples of border.
    #[must_use]
    pub fn for_padded_block(
        x: usize,
        y: usize,
        bsize: BlockSize,
        width: usize,
        height: usize,
        hpad: usize,
        vpad: usize,
    ) -> Self {
        let (x, y) = (x as i32, y as i32);
        let (w, h) = (bsize.width() as i32, bsize.height() as i32);
        Self {
            row_min: -(y + vpad as i32),
            row_max: height as i32 + vpad as i32 - h - y,
            col_min: -(x + hpad as i32),
            col_max: width as i32 + hpad as i32 - w - x,
        }
    }

    /// [`MvLimits::for_padded_block`] for a block of `plane`.
    #[must_use]
    pub fn for_plane_block<T: Pixel>(
        plane: &Plane<T>,
        x: usize,
        y: usize,
        bsize: BlockSize,
    ) -> Self {
        Self::for_padded_block(
            x,
            y,
            bsize,
            plane.width().get(),
            plane.height().get(),
            plane.hpad(),
            plane.vpad(),
        )
    }

    /// Limits for an intra block copy search of the block at mode-info
    /// position `(mi_row, mi_col)`.
    ///
    /// `Above` covers the tile rows above the current superblock row,
    /// `Left` covers the current superblock row to the left of the current
    /// superblock.
    #[must_use]
    pub fn for_intra_block(
        mi_row: usize,
        mi_col: usize,
        bsize: BlockSize,
        tile: &TileInfo,
        mib_size_log2: u32,
        direction: IntraBcDirection,
    ) -> Self {
        let mi = MI_SIZE as i32;
        let (mi_row, mi_col) = (mi_row as i32, mi_col as i32);
        let (w, h) = (bsize.width() as i32, bsize.height() as i32);
        let mib_size = 1 << mib_size_log2;
        let sb_row = mi_row >> mib_size_log2;
        let sb_col = mi_col >> mib_size_log2;

        let col_min = (tile.mi_col_start as i32 - mi_col) * mi;
        let row_min = (tile.mi_row_start as i32 - mi_row) * mi;
        match direction {
            IntraBcDirection::Above => Self {
                row_min,
                row_max: (sb_row * mib_size - mi_row) * mi - h,
                col_min,
                col_max: (tile.mi_col_end as i32 - mi_col) * mi - w,
            },
            IntraBcDirection::Left => {
                let bottom_coded_mi_edge = ((sb_row + 1) * mib_size).min(tile.mi_row_end as i32);
                Self {
                    row_min,
                    row_max: (bottom_coded_mi_edge - mi_row) * mi - h,
                    col_min,
                    col_max: (sb_col * mib_size - mi_col) * mi - w,
                }
            }
        }
    }

    /// Intersects the limits with the window reachable from `mv` (1/8 pel):
    /// at most [`MAX_FULL_PEL_VAL`] away, and inside the codable MV range.
    pub fn set_mv_search_range(&mut self, mv: MotionVector) {
        let col_min = (mv.col >> 3) - MAX_FULL_PEL_VAL + i32::from(mv.col & 7 != 0);
        let row_min = (mv.row >> 3) - MAX_FULL_PEL_VAL + i32::from(mv.row & 7 != 0);
        let col_max = (mv.col >> 3) + MAX_FULL_PEL_VAL;
        let row_max = (mv.row >> 3) + MAX_FULL_PEL_VAL;

        self.tighten(&Self {
            row_min: row_min.max((MV_LOW >> 3) + 1),
            row_max: row_max.min((MV_UPP >> 3) - 1),
            col_min: col_min.max((MV_LOW >> 3) + 1),
            col_max: col_max.min((MV_UPP >> 3) - 1),
        });
    }

    /// Shrinks `self` to its intersection with `other`.
    pub fn tighten(&mut self, other: &Self) {
        self.row_min = self.row_min.max(other.row_min);
        self.row_max = self.row_max.min(other.row_max);
        self.col_min = self.col_min.max(other.col_min);
        self.col_max = self.col_max.min(other.col_max);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.row_min > self.row_max || self.col_min > self.col_max
    }

    #[must_use]
    pub fn contains(&self, mv: MotionVector) -> bool {
        mv.col >= self.col_min
            && mv.col <= self.col_max
            && mv.row >= self.row_min
            && mv.row <= self.row_max
    }

    /// Clamps each component into the box. Must not be called on empty limits.
    #[must_use]
    pub fn clamp(&self, mv: MotionVector) -> MotionVector {
        debug_assert!(!self.is_empty());
        MotionVector {
            row: mv.row.max(self.row_min).min(self.row_max),
            col: mv.col.max(self.col_min).min(self.col_max),
        }
    }
}

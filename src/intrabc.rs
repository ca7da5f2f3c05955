
use crate::{
    block_size::{BlockSize, MI_SIZE},
    mv::MotionVector,
};

/// Superblocks (64 wide units) that must separate a block copy source from
/// the block being coded.
pub const INTRABC_DELAY_SB64: i32 = 4;

const SCALE_PX_TO_MV: i32 = 8;

/// Tile extents in 4x4 mode-info units, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileInfo {
    pub mi_row_start: usize,
    pub mi_row_end: usize,
    pub mi_col_start: usize,
    pub mi_col_end: usize,
}

impl TileInfo {
    /// A single tile covering a `width`x`height` picture.
    #[must_use]
    pub fn whole_picture(width: usize, height: usize) -> Self {
        Self {
            mi_row_start: 0,
            mi_row_end: height.div_ceil(MI_SIZE),
            mi_col_start: 0,
            mi_col_end: width.div_ceil(MI_SIZE),
        }
    }
}

/// Where an intra block copy may read from: the current tile, coded in
/// superblocks of `1 << mib_size_log2` mode-info units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntraBcArea {
    pub tile: TileInfo,
    pub mib_size_log2: u32,
}

impl IntraBcArea {
    /// [`is_dv_valid`] for the block at pixel position `(x, y)`.
    #[must_use]
    pub fn allows(&self, dv: MotionVector, x: usize, y: usize, bsize: BlockSize) -> bool {
        is_dv_valid(
            dv,
            &self.tile,
            y / MI_SIZE,
            x / MI_SIZE,
            bsize,
            self.mib_size_log2,
        )
    }
}

/// The two reference regions an intra block copy search is split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntraBcDirection {
    Above,
    Left,
}

/// Whether a block copy displacement `dv` (1/8 pel) only references samples
/// that are already reconstructed, and that a decoder pipelining superblocks
/// along a wavefront may read.
#[must_use]
pub fn is_dv_valid(
    dv: MotionVector,
    tile: &TileInfo,
    mi_row: usize,
    mi_col: usize,
    bsize: BlockSize,
    mib_size_log2: u32,
) -> bool {
    if !dv.is_full_pel() {
        return false;
    }

    let mi = MI_SIZE as i32;
    let (mi_row, mi_col) = (mi_row as i32, mi_col as i32);
    let (bw, bh) = (bsize.width() as i32, bsize.height() as i32);

    let src_top_edge = mi_row * mi * SCALE_PX_TO_MV + dv.row;
    let src_left_edge = mi_col * mi * SCALE_PX_TO_MV + dv.col;
    let src_bottom_edge = (mi_row * mi + bh) * SCALE_PX_TO_MV + dv.row;
    let src_right_edge = (mi_col * mi + bw) * SCALE_PX_TO_MV + dv.col;
    if src_top_edge < tile.mi_row_start as i32 * mi * SCALE_PX_TO_MV
        || src_left_edge < tile.mi_col_start as i32 * mi * SCALE_PX_TO_MV
        || src_bottom_edge > tile.mi_row_end as i32 * mi * SCALE_PX_TO_MV
        || src_right_edge > tile.mi_col_end as i32 * mi * SCALE_PX_TO_MV
    {
        return false;
    }

    // the source's bottom right corner has to be in an already coded superblock
    let sb_size = (1 << mib_size_log2) * mi;
    let active_sb_row = mi_row >> mib_size_log2;
    let active_sb64_col = (mi_col * mi) >> 6;
    let src_sb_row = ((src_bottom_edge >> 3) - 1) / sb_size;
    let src_sb64_col = ((src_right_edge >> 3) - 1) >> 6;
    let total_sb64_per_row = ((tile.mi_col_end as i32 - tile.mi_col_start as i32 - 1) >> 4) + 1;
    let active_sb64 = active_sb_row * total_sb64_per_row + active_sb64_col;
    let src_sb64 = src_sb_row * total_sb64_per_row + src_sb64_col;
    if src_sb64 >= active_sb64 - INTRABC_DELAY_SB64 {
        return false;
    }

    // wavefront: rows further up may reach further right
    let gradient = 1 + INTRABC_DELAY_SB64 + i32::from(sb_size > 64);
    let wf_offset = gradient * (active_sb_row - src_sb_row);
    src_sb_row <= active_sb_row && src_sb64_col < active_sb64_col - INTRABC_DELAY_SB64 + wf_offset
}

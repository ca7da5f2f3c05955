pub mod pictures;

// Re-export commonly used items
pub use pictures::{
    PictureContent, TestPictureConfig, copy_block, extract_block, generate_picture,
    generate_picture_16bit,
};

use std::sync::Arc;

use anyhow::Result;
use av1_fullpel_me::{
    BlockRequest, BlockSize, DistortionTable, MotionSearch, MotionVector, Pixel, Plane,
    SearchConfig, SearchFlags, SearchSiteConfig,
};

/// A search over `reference` with sites built for its stride.
pub fn build_search<'a, T: Pixel>(
    reference: &'a Plane<T>,
    table: &'a DistortionTable<T>,
    config: SearchConfig,
) -> Result<MotionSearch<'a, T>> {
    let sites = Arc::new(SearchSiteConfig::new(reference.stride()));
    MotionSearch::new(reference, sites, table, config)
}

/// A cost-free request for the `bsize` block of `source` at `(x, y)`,
/// predicted from the zero MV.
pub fn block_request<T: Pixel>(
    source: &Plane<T>,
    bsize: BlockSize,
    x: usize,
    y: usize,
) -> BlockRequest<'_, T> {
    BlockRequest {
        bsize,
        x,
        y,
        src: source.view(x, y),
        mvp_full: MotionVector::zero(),
        step_param: 5,
        sad_per_bit: 0,
        error_per_bit: 0,
        ref_mv: MotionVector::zero(),
        flags: SearchFlags::empty(),
        limits: None,
    }
}

/// One request per `bsize` block of `source` in raster order.
pub fn tile_requests<T: Pixel>(source: &Plane<T>, bsize: BlockSize) -> Vec<BlockRequest<'_, T>> {
    let (w, h) = (bsize.width(), bsize.height());
    let mut requests = Vec::new();
    for y in (0..=source.height().get() - h).step_by(h) {
        for x in (0..=source.width().get() - w).step_by(w) {
            requests.push(block_request(source, bsize, x, y));
        }
    }
    requests
}

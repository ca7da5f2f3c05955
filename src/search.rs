#[cfg(test)]
mod tests;

use std::sync::Arc;

use anyhow::{Result, bail};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::{
    block_size::BlockSize,
    cost::{MvCostModel, MvCostTables},
    diamond::full_pixel_diamond,
    dist::{DistortionFnSet, DistortionTable},
    hash::{HashIndex, crc::BlockHasher, duplicate_block_search},
    intrabc::{IntraBcArea, TileInfo},
    limits::MvLimits,
    mesh::full_pixel_exhaustive,
    mv::MotionVector,
    params::{MAX_MVSEARCH_STEPS, MeshPolicy, SearchConfig, SearchFlags, SearchMethod},
    plane::{Plane, PlaneView},
    search_site::SearchSiteConfig,
    util::Pixel,
};

/// Cost reported when no candidate could be evaluated.
pub const MAX_COST: u64 = u64::MAX;

/// Superblocks of 64x64 unless configured otherwise.
const DEFAULT_MIB_SIZE_LOG2: u32 = 4;

/// What every search stage of one block reads: the source block, the
/// reference picture positioned at the co-located block, the distortion
/// functions and rate model for the block, and the limits candidates must
/// stay within.
#[derive(Debug, Clone, Copy)]
pub struct BlockContext<'a, T: Pixel> {
    pub src: PlaneView<'a, T>,
    pub reference: PlaneView<'a, T>,
    pub fns: &'a DistortionFnSet<T>,
    pub cost: MvCostModel<'a>,
    pub limits: MvLimits,
}

impl<T: Pixel> BlockContext<'_, T> {
    /// SAD of the candidate `offset` samples away from the co-located block.
    #[must_use]
    pub fn sad_at(&self, offset: isize) -> u64 {
        (self.fns.sdf)(
            self.src.block(),
            self.src.stride(),
            self.reference.at_offset(offset),
            self.reference.stride(),
        )
    }

    #[must_use]
    pub fn sad(&self, mv: MotionVector) -> u64 {
        self.sad_at(self.reference.offset_of(mv))
    }

    #[must_use]
    pub fn sad_x4_at(&self, offsets: [isize; 4]) -> [u64; 4] {
        (self.fns.sdx4df)(
            self.src.block(),
            self.src.stride(),
            offsets.map(|offset| self.reference.at_offset(offset)),
            self.reference.stride(),
        )
    }

    /// Variance of the full pel candidate `mv` plus its rate against the
    /// 1/8 pel `ref_mv`.
    #[must_use]
    pub fn mvpred_var(&self, mv: MotionVector, ref_mv: MotionVector) -> u64 {
        let (variance, _sse) = (self.fns.vf)(
            self.src.block(),
            self.src.stride(),
            self.reference.at_mv(mv),
            self.reference.stride(),
        );
        variance + self.cost.rd_cost(mv.to_eighth_pel(), ref_mv)
    }
}

/// Per call search state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchState {
    pub best_mv: MotionVector,
    /// The position the best was last moved away from.
    pub second_best_mv: MotionVector,
    pub best_cost: u64,
}

impl SearchState {
    #[must_use]
    pub fn new(start: MotionVector) -> Self {
        Self {
            best_mv: start,
            second_best_mv: start,
            best_cost: MAX_COST,
        }
    }
}

/// One block to search.
#[derive(Debug, Clone, Copy)]
pub struct BlockRequest<'a, T: Pixel> {
    pub bsize: BlockSize,
    /// Picture position of the block's top left sample.
    pub x: usize,
    pub y: usize,
    /// The source block.
    pub src: PlaneView<'a, T>,
    /// Full pel start of the search.
    pub mvp_full: MotionVector,
    /// First diamond ring, 0 being the coarsest.
    pub step_param: usize,
    pub sad_per_bit: u32,
    pub error_per_bit: u32,
    /// 1/8 pel vector rates are measured against.
    pub ref_mv: MotionVector,
    pub flags: SearchFlags,
    /// Further restriction of the candidates, on top of what the reference
    /// buffer and the codable MV range allow.
    pub limits: Option<MvLimits>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// Full pel.
    pub best_mv: MotionVector,
    pub second_best_mv: MotionVector,
    /// [`MAX_COST`] when no candidate was evaluated.
    pub cost: u64,
}

impl From<SearchState> for SearchResult {
    fn from(state: SearchState) -> Self {
        Self {
            best_mv: state.best_mv,
            second_best_mv: state.second_best_mv,
            cost: state.best_cost,
        }
    }
}

/// Full pel motion search against one reference picture.
///
/// Holds only shared, read-only picture state, so one instance can serve
/// any number of blocks concurrently.
#[derive(Debug)]
pub struct MotionSearch<'a, T: Pixel> {
    reference: &'a Plane<T>,
    sites: Arc<SearchSiteConfig>,
    distortion: &'a DistortionTable<T>,
    config: SearchConfig,
    cost_tables: Option<&'a MvCostTables>,
    hash_index: Option<&'a HashIndex>,
    hasher: BlockHasher,
    intra_area: IntraBcArea,
}

impl<'a, T: Pixel> MotionSearch<'a, T> {
    /// `sites` must be built for the stride of `reference`.
    pub fn new(
        reference: &'a Plane<T>,
        sites: Arc<SearchSiteConfig>,
        distortion: &'a DistortionTable<T>,
        config: SearchConfig,
    ) -> Result<Self> {
        if sites.stride() != reference.stride() {
            bail!(
                "Search sites were built for stride {}, the reference has stride {}.",
                sites.stride(),
                reference.stride()
            );
        }
        Ok(Self {
            reference,
            sites,
            distortion,
            config,
            cost_tables: None,
            hash_index: None,
            hasher: BlockHasher::new(),
            intra_area: IntraBcArea {
                tile: TileInfo::whole_picture(
                    reference.width().get(),
                    reference.height().get(),
                ),
                mib_size_log2: DEFAULT_MIB_SIZE_LOG2,
            },
        })
    }

    /// Rates MVs with `tables`. Without tables every MV is free.
    #[must_use]
    pub fn with_cost_tables(mut self, tables: &'a MvCostTables) -> Self {
        self.cost_tables = Some(tables);
        self
    }

    #[must_use]
    pub fn with_hash_index(mut self, index: &'a HashIndex) -> Self {
        self.hash_index = Some(index);
        self
    }

    /// The tile and superblock size intra block copy candidates are
    /// validated against. Defaults to one tile and 64x64 superblocks.
    #[must_use]
    pub fn with_intra_area(mut self, area: IntraBcArea) -> Self {
        self.intra_area = area;
        self
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Limits of `request` after intersecting them with what the reference
    /// buffer can serve and what can be coded around the reference MV.
    #[must_use]
    pub fn limits_for(&self, request: &BlockRequest<'_, T>) -> MvLimits {
        let mut limits =
            MvLimits::for_plane_block(self.reference, request.x, request.y, request.bsize);
        if let Some(extra) = &request.limits {
            limits.tighten(extra);
        }
        limits.set_mv_search_range(request.ref_mv);
        limits
    }

    /// Searches one block: diamond search with refinement, then the mesh
    /// search, then the hash search when requested.
    ///
    /// # Panics
    ///
    /// If the configured method is not [`SearchMethod::Nstep`].
    #[must_use]
    pub fn full_pixel_search(&self, request: &BlockRequest<'_, T>) -> SearchResult {
        let method = self.config.method;
        assert!(
            method == SearchMethod::Nstep,
            "search method {method:?} is not implemented"
        );

        let mut state = SearchState::new(request.mvp_full);
        let limits = self.limits_for(request);
        if limits.is_empty() {
            debug!(x = request.x, y = request.y, ?limits, "empty search limits");
            return state.into();
        }

        let bsize = request.bsize;
        let ctx = BlockContext {
            src: request.src,
            reference: self.reference.view(request.x, request.y),
            fns: self.distortion.get(bsize),
            cost: MvCostModel::new(self.cost_tables, request.sad_per_bit, request.error_per_bit),
            limits,
        };

        let step_param = request.step_param.min(MAX_MVSEARCH_STEPS - 1);
        let mut var = full_pixel_diamond(
            &ctx,
            &self.sites,
            request.mvp_full,
            step_param,
            MAX_MVSEARCH_STEPS - 1 - step_param,
            true,
            self.config.refine_range,
            request.ref_mv,
            &mut state,
        );
        trace!(x = request.x, y = request.y, mv = ?state.best_mv, cost = var, "diamond");

        if self.should_run_mesh(bsize, var)
            && let Some((mv, cost)) = full_pixel_exhaustive(
                &ctx,
                state.best_mv,
                &self.config.mesh_schedule,
                request.ref_mv,
                &mut state.second_best_mv,
            )
        {
            trace!(x = request.x, y = request.y, ?mv, cost, "mesh");
            if cost < var {
                var = cost;
                state.best_mv = mv;
            }
        }

        if request.flags.contains(SearchFlags::HASH_SEARCH)
            && let Some(index) = self.hash_index
        {
            let intra = request
                .flags
                .contains(SearchFlags::INTRA)
                .then_some(&self.intra_area);
            if let Some((mv, cost)) = duplicate_block_search(
                &ctx,
                index,
                &self.hasher,
                request.x,
                request.y,
                intra,
                request.ref_mv,
            ) {
                trace!(x = request.x, y = request.y, ?mv, cost, "hash");
                if cost < var {
                    state.second_best_mv = state.best_mv;
                    state.best_mv = mv;
                    var = cost;
                }
            }
        }

        state.best_cost = var;
        state.into()
    }

    /// Searches every request and returns the results in request order.
    #[must_use]
    pub fn search_blocks(&self, requests: &[BlockRequest<'_, T>]) -> Vec<SearchResult> {
        #[cfg(feature = "rayon")]
        let results = requests
            .par_iter()
            .map(|request| self.full_pixel_search(request))
            .collect();
        #[cfg(not(feature = "rayon"))]
        let results = requests
            .iter()
            .map(|request| self.full_pixel_search(request))
            .collect();
        results
    }

    fn should_run_mesh(&self, bsize: BlockSize, var: u64) -> bool {
        match self.config.mesh_policy {
            MeshPolicy::Always => true,
            MeshPolicy::Thresholded { threshold } => {
                let shift = 10 - (bsize.width_mi_log2() + bsize.height_mi_log2());
                var > threshold >> shift
            }
        }
    }
}

#![allow(clippy::unwrap_used, reason = "allow in test files")]

use super::*;
use crate::tests::{block_of, context, noise_plane};

fn searcher<'a>(
    reference: &'a Plane<u8>,
    table: &'a DistortionTable<u8>,
    config: SearchConfig,
) -> MotionSearch<'a, u8> {
    let sites = Arc::new(SearchSiteConfig::new(reference.stride()));
    MotionSearch::new(reference, sites, table, config).unwrap()
}

fn request<'a>(source: &'a Plane<u8>, x: usize, y: usize) -> BlockRequest<'a, u8> {
    BlockRequest {
        bsize: BlockSize::from_dimensions(source.width().get(), source.height().get()).unwrap(),
        x,
        y,
        src: source.view(0, 0),
        mvp_full: MotionVector::zero(),
        step_param: 6,
        sad_per_bit: 0,
        error_per_bit: 0,
        ref_mv: MotionVector::zero(),
        flags: SearchFlags::empty(),
        limits: None,
    }
}

#[test]
fn context_helpers_agree_with_the_distortion_functions() {
    let reference = noise_plane(64, 64, 16, 3);
    let source = block_of(&noise_plane(8, 8, 0, 4), 0, 0, BlockSize::Block8x8);
    let table = DistortionTable::new();
    let ctx = context(&table, &reference, &source, 24, 24, MvCostModel::cost_free());

    let mvs = [
        MotionVector::new(-3, 1),
        MotionVector::new(0, 0),
        MotionVector::new(5, -7),
        MotionVector::new(2, 2),
    ];
    let sads = ctx.sad_x4_at(mvs.map(|mv| ctx.reference.offset_of(mv)));
    for (mv, sad) in mvs.into_iter().zip(sads) {
        assert_eq!(ctx.sad(mv), sad);
        let direct = (table.get(BlockSize::Block8x8).sdf)(
            source.view(0, 0).block(),
            source.stride(),
            ctx.reference.at_mv(mv),
            reference.stride(),
        );
        assert_eq!(direct, sad);
    }
}

#[test]
fn exact_match_has_zero_predicted_variance() {
    let reference = noise_plane(64, 64, 16, 3);
    let source = block_of(&reference, 26, 21, BlockSize::Block8x8);
    let table = DistortionTable::new();
    let ctx = context(&table, &reference, &source, 24, 24, MvCostModel::cost_free());
    assert_eq!(ctx.mvpred_var(MotionVector::new(-3, 2), MotionVector::zero()), 0);
    assert!(ctx.mvpred_var(MotionVector::zero(), MotionVector::zero()) > 0);
}

#[test]
fn sites_must_match_the_reference_stride() {
    let reference = noise_plane(64, 64, 16, 3);
    let table = DistortionTable::new();
    let other = noise_plane(64, 64, 8, 3);
    let sites = Arc::new(SearchSiteConfig::new(other.stride()));
    let result = MotionSearch::new(&reference, sites, &table, SearchConfig::default());
    assert!(result.is_err());
}

#[test]
fn empty_limits_report_max_cost() {
    let reference = noise_plane(64, 64, 16, 3);
    let source = block_of(&reference, 8, 8, BlockSize::Block8x8);
    let table = DistortionTable::new();
    let search = searcher(&reference, &table, SearchConfig::default());

    let mut req = request(&source, 8, 8);
    req.mvp_full = MotionVector::new(2, 2);
    req.limits = Some(MvLimits::new(1, 0, -4, 4));
    let result = search.full_pixel_search(&req);
    assert_eq!(result.cost, MAX_COST);
    assert_eq!(result.best_mv, MotionVector::new(2, 2));
}

#[test]
#[should_panic(expected = "is not implemented")]
fn only_nstep_is_supported() {
    let reference = noise_plane(64, 64, 16, 3);
    let source = block_of(&reference, 8, 8, BlockSize::Block8x8);
    let table = DistortionTable::new();
    let config = SearchConfig {
        method: SearchMethod::FastDiamond,
        ..SearchConfig::default()
    };
    let search = searcher(&reference, &table, config);
    let _ = search.full_pixel_search(&request(&source, 8, 8));
}

#[test]
fn mesh_threshold_scales_with_block_area() {
    let reference = noise_plane(64, 64, 16, 3);
    let table = DistortionTable::new();
    let config = SearchConfig {
        mesh_policy: MeshPolicy::Thresholded { threshold: 6400 },
        ..SearchConfig::default()
    };
    let search = searcher(&reference, &table, config);

    assert!(!search.should_run_mesh(BlockSize::Block16x16, 100));
    assert!(search.should_run_mesh(BlockSize::Block16x16, 101));
    assert!(!search.should_run_mesh(BlockSize::Block128x128, 6400));
    assert!(search.should_run_mesh(BlockSize::Block128x128, 6401));
    assert!(search.should_run_mesh(BlockSize::Block4x4, 26));

    let always = searcher(&reference, &table, SearchConfig::default());
    assert!(always.should_run_mesh(BlockSize::Block4x4, 0));
}

#[test]
fn limits_combine_buffer_request_and_codable_range() {
    let reference = noise_plane(64, 64, 16, 3);
    let source = block_of(&reference, 8, 8, BlockSize::Block8x8);
    let table = DistortionTable::new();
    let search = searcher(&reference, &table, SearchConfig::default());

    let mut req = request(&source, 8, 8);
    assert_eq!(
        search.limits_for(&req),
        MvLimits::for_plane_block(&reference, 8, 8, BlockSize::Block8x8)
    );
    req.limits = Some(MvLimits::new(-2, 100, -100, 3));
    let limits = search.limits_for(&req);
    assert_eq!((limits.row_min, limits.col_max), (-2, 3));
    assert_eq!(limits.row_max, 16 + 64 - 8 - 8);
}

#[test]
fn finds_the_planted_block() {
    let reference = noise_plane(128, 128, 32, 41);
    // row +3, col -2 from (56, 56)
    let source = block_of(&reference, 54, 59, BlockSize::Block16x16);
    let table = DistortionTable::new();
    let search = searcher(&reference, &table, SearchConfig::default());

    let result = search.full_pixel_search(&request(&source, 56, 56));
    assert_eq!(result.best_mv, MotionVector::new(3, -2));
    assert_eq!(result.cost, 0);
}

#[test]
fn predictor_at_the_optimum_is_kept() {
    let reference = noise_plane(128, 128, 32, 41);
    let source = block_of(&reference, 54, 59, BlockSize::Block16x16);
    let table = DistortionTable::new();
    let search = searcher(&reference, &table, SearchConfig::default());

    let mut req = request(&source, 56, 56);
    req.mvp_full = MotionVector::new(3, -2);
    let result = search.full_pixel_search(&req);
    assert_eq!(result.best_mv, MotionVector::new(3, -2));
    assert_eq!(result.cost, 0);
}

#[test]
fn hash_search_reaches_past_the_other_stages() {
    let reference = noise_plane(256, 64, 16, 43);
    let source = block_of(&reference, 200, 40, BlockSize::Block8x8);
    let index = HashIndex::from_plane(&reference, 8).unwrap();
    let table = DistortionTable::new();
    let config = SearchConfig {
        mesh_policy: MeshPolicy::Thresholded { threshold: u64::MAX },
        ..SearchConfig::default()
    };
    let search = searcher(&reference, &table, config).with_hash_index(&index);

    let mut req = request(&source, 8, 8);
    let without = search.full_pixel_search(&req);
    assert!(without.cost > 0);

    req.flags = SearchFlags::HASH_SEARCH;
    let with = search.full_pixel_search(&req);
    assert_eq!(with.best_mv, MotionVector::new(32, 192));
    assert_eq!(with.cost, 0);
    assert_eq!(with.second_best_mv, without.best_mv);
}

#[test]
fn batch_matches_single_searches() {
    let reference = noise_plane(128, 128, 32, 47);
    let sources: Vec<_> = [(10, 20), (60, 60), (100, 8), (33, 90)]
        .into_iter()
        .map(|(x, y)| block_of(&reference, x, y, BlockSize::Block8x8))
        .collect();
    let table = DistortionTable::new();
    let tables = MvCostTables::from_magnitude_model();
    let search = searcher(&reference, &table, SearchConfig::default()).with_cost_tables(&tables);

    let requests: Vec<_> = sources
        .iter()
        .enumerate()
        .map(|(i, source)| {
            let mut req = request(source, 8 + 24 * i, 16 + 20 * i);
            req.sad_per_bit = 40;
            req.error_per_bit = 80;
            req
        })
        .collect();
    let batch = search.search_blocks(&requests);
    let single: Vec<_> = requests
        .iter()
        .map(|req| search.full_pixel_search(req))
        .collect();
    assert_eq!(batch, single);
}


use tracing::trace;

use crate::{
    mv::MotionVector,
    refining::refining_search_sad,
    search::{BlockContext, MAX_COST, SearchState},
    search_site::SearchSiteConfig,
    util::Pixel,
};

/// Result of one diamond search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiamondOutcome {
    pub cost: u64,
    pub mv: MotionVector,
    /// Rings whose best candidate was still the start point.
    pub num00: usize,
}

/// Hierarchical n-step search starting at ring `search_param`.
///
/// `start` is full pel and is clamped into the limits first. `center_mv` is
/// the 1/8 pel vector MV costs are measured against. Every time the best
/// moves, the position it leaves is written to `second_best`.
pub fn diamond_search_sad<T: Pixel>(
    ctx: &BlockContext<'_, T>,
    cfg: &SearchSiteConfig,
    start: MotionVector,
    search_param: usize,
    center_mv: MotionVector,
    second_best: &mut MotionVector,
) -> DiamondOutcome {
    let limits = &ctx.limits;
    if limits.is_empty() || search_param >= cfg.total_steps() {
        return DiamondOutcome {
            cost: MAX_COST,
            mv: start,
            num00: 0,
        };
    }

    let fcenter_mv = center_mv.to_full_pel();
    let start = limits.clamp(start);
    let mut best_mv = start;
    let start_offset = ctx.reference.offset_of(start);
    let mut best_offset = start_offset;
    let mut best_sad = ctx.sad_at(best_offset) + ctx.cost.sad_cost(best_mv, fcenter_mv);
    let mut num00 = 0;

    // site indices are relative to the start of the first ring, 0 being the
    // center, so the winner of one ring never equals the winner of another
    let sites = &cfg.sites()[SearchSiteConfig::ring_start(search_param) - 1..];
    let mut best_site = 0;
    let mut last_site = 0;
    let mut i = 1;

    for _ in 0..cfg.total_steps() - search_param {
        let ring = &sites[i..][..cfg.searches_per_step()];
        let all_in = best_mv.row + ring[0].mv.row > limits.row_min
            && best_mv.row + ring[1].mv.row < limits.row_max
            && best_mv.col + ring[2].mv.col > limits.col_min
            && best_mv.col + ring[3].mv.col < limits.col_max;

        if all_in {
            for batch in ring.chunks_exact(4) {
                let offsets = [0, 1, 2, 3].map(|t| best_offset + batch[t].offset);
                let sads = ctx.sad_x4_at(offsets);
                for (site, sad) in batch.iter().zip(sads) {
                    if sad < best_sad {
                        let this_mv = best_mv + site.mv;
                        let cost = sad + ctx.cost.sad_cost(this_mv, fcenter_mv);
                        if cost < best_sad {
                            best_sad = cost;
                            best_site = i;
                        }
                    }
                    i += 1;
                }
            }
        } else {
            for site in ring {
                let this_mv = best_mv + site.mv;
                if limits.contains(this_mv) {
                    let sad = ctx.sad_at(best_offset + site.offset);
                    if sad < best_sad {
                        let cost = sad + ctx.cost.sad_cost(this_mv, fcenter_mv);
                        if cost < best_sad {
                            best_sad = cost;
                            best_site = i;
                        }
                    }
                }
                i += 1;
            }
        }

        if best_site != last_site {
            *second_best = best_mv;
            best_mv = best_mv + sites[best_site].mv;
            best_offset += sites[best_site].offset;
            last_site = best_site;
        } else if best_offset == start_offset {
            num00 += 1;
        }
    }

    DiamondOutcome {
        cost: best_sad,
        mv: best_mv,
        num00,
    }
}

/// Diamond search with escalation to finer starting rings and a final
/// refining search.
///
/// Every result is rescored with variance plus rate against `ref_mv`
/// (1/8 pel) so that it compares with the mesh and hash searches. The
/// clamped predictor is scored the same way, so the result never costs more
/// than `mvp_full`. The best MV and its cost are written to `state`.
pub fn full_pixel_diamond<T: Pixel>(
    ctx: &BlockContext<'_, T>,
    cfg: &SearchSiteConfig,
    mvp_full: MotionVector,
    step_param: usize,
    further_steps: usize,
    mut do_refine: bool,
    refine_range: usize,
    ref_mv: MotionVector,
    state: &mut SearchState,
) -> u64 {
    let first = diamond_search_sad(
        ctx,
        cfg,
        mvp_full,
        step_param,
        ref_mv,
        &mut state.second_best_mv,
    );
    let mut best_cost = rescore(ctx, first.cost, first.mv, ref_mv);
    state.best_mv = first.mv;
    trace!(step_param, cost = best_cost, num00 = first.num00, "first diamond");

    let mut n = first.num00;
    if n > further_steps {
        do_refine = false;
    }

    let mut num00 = 0;
    while n < further_steps {
        n += 1;
        if num00 > 0 {
            num00 -= 1;
            continue;
        }

        let next = diamond_search_sad(
            ctx,
            cfg,
            mvp_full,
            step_param + n,
            ref_mv,
            &mut state.second_best_mv,
        );
        num00 = next.num00;
        let cost = rescore(ctx, next.cost, next.mv, ref_mv);
        if num00 > further_steps - n {
            do_refine = false;
        }
        if cost < best_cost {
            best_cost = cost;
            state.best_mv = next.mv;
        }
    }

    // a diamond move lowers SAD plus rate, which can still raise the variance
    if !ctx.limits.is_empty() {
        let start = ctx.limits.clamp(mvp_full);
        let start_cost = ctx.mvpred_var(start, ref_mv);
        if start_cost < best_cost {
            best_cost = start_cost;
            state.best_mv = start;
        }
    }

    if do_refine {
        let mut refined = state.best_mv;
        let sad = refining_search_sad(
            ctx,
            &mut refined,
            refine_range,
            ref_mv,
            &mut state.second_best_mv,
        );
        let cost = rescore(ctx, sad, refined, ref_mv);
        if cost < best_cost {
            best_cost = cost;
            state.best_mv = refined;
        }
    }

    state.best_cost = best_cost;
    best_cost
}

fn rescore<T: Pixel>(
    ctx: &BlockContext<'_, T>,
    sad: u64,
    mv: MotionVector,
    ref_mv: MotionVector,
) -> u64 {
    if sad < MAX_COST {
        ctx.mvpred_var(mv, ref_mv)
    } else {
        sad
    }
}

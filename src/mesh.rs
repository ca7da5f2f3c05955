
use tracing::{debug, trace};

use crate::{
    mv::MotionVector,
    params::{MAX_RANGE, MIN_INTERVAL, MIN_RANGE, MeshSchedule},
    search::{BlockContext, MAX_COST},
    util::Pixel,
};

/// Scores every `step`-th position of the `±range` window around `center`
/// (clamped into the limits) and returns the best SAD plus rate.
///
/// The winner is left in `best_mv`. Rate is measured against the full pel
/// `ref_mv`.
pub fn exhaustive_mesh_search<T: Pixel>(
    ctx: &BlockContext<'_, T>,
    ref_mv: MotionVector,
    best_mv: &mut MotionVector,
    range: i32,
    step: i32,
    center: MotionVector,
    second_best: &mut MotionVector,
) -> u64 {
    debug_assert!(step >= 1);
    let limits = &ctx.limits;
    if limits.is_empty() {
        return MAX_COST;
    }

    let fcenter_mv = limits.clamp(center);
    *best_mv = fcenter_mv;
    let mut best_sad = ctx.sad(fcenter_mv) + ctx.cost.sad_cost(fcenter_mv, ref_mv);

    let start_row = (-range).max(limits.row_min - fcenter_mv.row);
    let start_col = (-range).max(limits.col_min - fcenter_mv.col);
    let end_row = range.min(limits.row_max - fcenter_mv.row);
    let end_col = range.min(limits.col_max - fcenter_mv.col);
    let col_step = if step > 1 { step } else { 4 };

    let mut consider = |mv: MotionVector, sad: u64, best_mv: &mut MotionVector| {
        if sad < best_sad {
            let cost = sad + ctx.cost.sad_cost(mv, ref_mv);
            if cost < best_sad {
                best_sad = cost;
                *second_best = *best_mv;
                *best_mv = mv;
            }
        }
    };

    for r in (start_row..=end_row).step_by(step as usize) {
        for c in (start_col..=end_col).step_by(col_step as usize) {
            let mv = MotionVector::new(fcenter_mv.row + r, fcenter_mv.col + c);
            if step > 1 {
                consider(mv, ctx.sad(mv), best_mv);
            } else if c + 3 <= end_col {
                let offsets =
                    [0, 1, 2, 3].map(|i| ctx.reference.offset_of(mv + MotionVector::new(0, i)));
                for (i, sad) in ctx.sad_x4_at(offsets).into_iter().enumerate() {
                    consider(mv + MotionVector::new(0, i as i32), sad, best_mv);
                }
            } else {
                for i in 0..=end_col - c {
                    let this_mv = mv + MotionVector::new(0, i);
                    consider(this_mv, ctx.sad(this_mv), best_mv);
                }
            }
        }
    }

    best_sad
}

/// Mesh search over `schedule`, coarse to fine, around `center` (full pel).
///
/// Returns `None` when the first pattern cannot open a search or the limits
/// are empty. Otherwise returns the MV and its variance plus rate against
/// `ref_mv` (1/8 pel).
pub fn full_pixel_exhaustive<T: Pixel>(
    ctx: &BlockContext<'_, T>,
    center: MotionVector,
    schedule: &MeshSchedule,
    ref_mv: MotionVector,
    second_best: &mut MotionVector,
) -> Option<(MotionVector, u64)> {
    let first = schedule.first();
    if !first.is_valid_start() {
        debug!(
            range = first.range,
            interval = first.interval,
            "mesh schedule rejected"
        );
        return None;
    }
    if ctx.limits.is_empty() {
        return None;
    }

    let f_ref_mv = ref_mv.to_full_pel();
    let divisor = first.range / first.interval;
    let reach =
        i32::try_from(center.max_abs()).map_or(MAX_RANGE, |len| len.saturating_mul(5) / 4);
    let range = first.range.max(reach).min(MAX_RANGE);
    let interval = first.interval.max(range / divisor);

    let mut best_mv = center;
    let mut best_sme = exhaustive_mesh_search(
        ctx,
        f_ref_mv,
        &mut best_mv,
        range,
        interval,
        center,
        second_best,
    );
    trace!(range, interval, cost = best_sme, "mesh pass");

    if interval > MIN_INTERVAL && range > MIN_RANGE {
        for pattern in &schedule.patterns()[1..] {
            let previous = best_mv;
            best_sme = exhaustive_mesh_search(
                ctx,
                f_ref_mv,
                &mut best_mv,
                pattern.range,
                pattern.interval,
                previous,
                second_best,
            );
            trace!(
                range = pattern.range,
                interval = pattern.interval,
                cost = best_sme,
                "mesh pass"
            );
            if pattern.interval == 1 {
                break;
            }
        }
    }

    let cost = if best_sme < MAX_COST {
        ctx.mvpred_var(best_mv, ref_mv)
    } else {
        best_sme
    };
    Some((best_mv, cost))
}

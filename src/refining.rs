
use crate::{
    mv::MotionVector,
    search::{BlockContext, MAX_COST},
    util::Pixel,
};

const NEIGHBORS: [MotionVector; 4] = [
    MotionVector::new(-1, 0),
    MotionVector::new(0, -1),
    MotionVector::new(0, 1),
    MotionVector::new(1, 0),
];

/// Unit step hill climb over the four direct neighbors of `mv`.
///
/// Runs at most `search_range` moves and leaves the final position in `mv`.
/// Returns the SAD plus rate of that position, rate measured against
/// `center_mv` (1/8 pel).
pub fn refining_search_sad<T: Pixel>(
    ctx: &BlockContext<'_, T>,
    mv: &mut MotionVector,
    search_range: usize,
    center_mv: MotionVector,
    second_best: &mut MotionVector,
) -> u64 {
    let limits = &ctx.limits;
    if !limits.contains(*mv) {
        return MAX_COST;
    }

    let fcenter_mv = center_mv.to_full_pel();
    let stride = ctx.reference.stride().get() as isize;
    let mut best_offset = ctx.reference.offset_of(*mv);
    let mut best_sad = ctx.sad_at(best_offset) + ctx.cost.sad_cost(*mv, fcenter_mv);

    for _ in 0..search_range {
        let mut best_site = None;
        let all_in = mv.row - 1 > limits.row_min
            && mv.row + 1 < limits.row_max
            && mv.col - 1 > limits.col_min
            && mv.col + 1 < limits.col_max;

        if all_in {
            let sads = ctx.sad_x4_at([
                best_offset - stride,
                best_offset - 1,
                best_offset + 1,
                best_offset + stride,
            ]);
            for (j, sad) in sads.into_iter().enumerate() {
                if sad < best_sad {
                    let cost = sad + ctx.cost.sad_cost(*mv + NEIGHBORS[j], fcenter_mv);
                    if cost < best_sad {
                        best_sad = cost;
                        best_site = Some(j);
                    }
                }
            }
        } else {
            for (j, neighbor) in NEIGHBORS.iter().enumerate() {
                let this_mv = *mv + *neighbor;
                if limits.contains(this_mv) {
                    let sad = ctx.sad(this_mv);
                    if sad < best_sad {
                        let cost = sad + ctx.cost.sad_cost(this_mv, fcenter_mv);
                        if cost < best_sad {
                            best_sad = cost;
                            best_site = Some(j);
                        }
                    }
                }
            }
        }

        let Some(site) = best_site else {
            break;
        };
        *second_best = *mv;
        *mv = *mv + NEIGHBORS[site];
        best_offset = ctx.reference.offset_of(*mv);
    }

    best_sad
}

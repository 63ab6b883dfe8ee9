//! Division of a cell's points between its two children
use crate::traits::{DataCategory, Geometry};
use crate::types::{Point, SplitMethod};
use itertools::{Itertools, MinMaxResult};
use log::trace;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Axis with the largest extent, and that extent's bounds
fn widest_axis<D: DataCategory, M: Geometry>(points: &[Point<D, M>]) -> (usize, f64, f64) {
    let mut best = (0, 0.0, 0.0);
    let mut best_extent = -1.0;
    for axis in 0..M::DIM {
        if let MinMaxResult::MinMax(lo, hi) = points
            .iter()
            .map(|p| p.pos.as_ref()[axis])
            .minmax_by(|a, b| a.total_cmp(b))
        {
            if hi - lo > best_extent {
                best_extent = hi - lo;
                best = (axis, lo, hi);
            }
        }
    }
    best
}

/// Move every point with coordinate below `value` to the front, returning how many moved
fn partition_below<D: DataCategory, M: Geometry>(
    points: &mut [Point<D, M>],
    axis: usize,
    value: f64,
) -> usize {
    let mut mid = 0;
    for i in 0..points.len() {
        if points[i].pos.as_ref()[axis] < value {
            points.swap(i, mid);
            mid += 1;
        }
    }
    mid
}

/// Reorder so the `mid` smallest points along `axis` come first
fn select_rank<D: DataCategory, M: Geometry>(
    points: &mut [Point<D, M>],
    axis: usize,
    mid: usize,
) -> usize {
    points.select_nth_unstable_by(mid, |a, b| {
        a.pos.as_ref()[axis].total_cmp(&b.pos.as_ref()[axis])
    });
    mid
}

/// Reorder `points` into two groups and return the size of the first
///
/// Both groups are non-empty for any input of two or more points. When the chosen
/// method cannot separate the points (no spread along the split axis), the points are
/// divided in half by position in the slice. `seed` drives [`SplitMethod::Random`].
pub(crate) fn split_points<D: DataCategory, M: Geometry>(
    points: &mut [Point<D, M>],
    method: SplitMethod,
    seed: u64,
) -> usize {
    let n = points.len();
    debug_assert!(n >= 2);

    let (axis, lo, hi) = widest_axis(points);
    let mid = if hi > lo {
        match method {
            SplitMethod::Middle => partition_below(points, axis, 0.5 * lo + 0.5 * hi),
            SplitMethod::Mean => {
                let scale = 1.0 / n as f64;
                let mean = points
                    .iter()
                    .map(|p| scale * p.pos.as_ref()[axis])
                    .sum::<f64>();
                partition_below(points, axis, mean)
            }
            SplitMethod::Median => select_rank(points, axis, n / 2),
            SplitMethod::Random => {
                let mut rng = StdRng::seed_from_u64(seed);
                let f: f64 = rng.gen_range(0.2..0.8);
                let rank = ((n as f64 * f) as usize).clamp(1, n - 1);
                select_rank(points, axis, rank)
            }
        }
    } else {
        0
    };

    if mid == 0 || mid == n {
        trace!(
            "Degenerate {:?} split of {} points along axis {}, halving",
            method,
            n,
            axis
        );
        n / 2
    } else {
        mid
    }
}

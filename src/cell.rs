//! Cells of a field's tree
use crate::traits::{DataCategory, Geometry};
use crate::types::{CellId, Point};
use std::fmt;

/// One node of a tree, summarising every point beneath it
///
/// Points beneath a cell are contiguous in the owning field's point store, starting
/// at [`Cell::start`].
pub struct Cell<D: DataCategory, M: Geometry> {
    pos: M::Position,
    size: f64,
    w: f64,
    value: D::Value,
    n: usize,
    start: usize,
    children: Option<[CellId; 2]>,
}

impl<D: DataCategory, M: Geometry> Cell<D, M> {
    pub(crate) fn new(aggregate: Aggregate<D, M>, start: usize) -> Self {
        Self {
            pos: aggregate.pos,
            size: aggregate.size,
            w: aggregate.w,
            value: aggregate.value,
            n: aggregate.n,
            start,
            children: None,
        }
    }

    pub(crate) fn set_weight(&mut self, w: f64) {
        self.w = w;
    }

    pub(crate) fn set_children(&mut self, left: CellId, right: CellId) {
        self.children = Some([left, right]);
    }

    /// Weighted centroid
    pub fn pos(&self) -> &M::Position {
        &self.pos
    }

    /// Largest distance from the centroid to any point in the cell
    pub fn size(&self) -> f64 {
        self.size
    }

    /// Square of [`Cell::size`]
    pub fn size_squared(&self) -> f64 {
        self.size * self.size
    }

    /// Total weight
    pub fn w(&self) -> f64 {
        self.w
    }

    /// Weighted sum of the point values
    pub fn value(&self) -> D::Value {
        self.value
    }

    /// Number of points
    pub fn n(&self) -> usize {
        self.n
    }

    /// Offset of the first point of this cell in the field's point store
    pub fn start(&self) -> usize {
        self.start
    }

    /// Children, or `None` for a leaf
    pub fn children(&self) -> Option<[CellId; 2]> {
        self.children
    }

    /// Left child
    pub fn left(&self) -> Option<CellId> {
        self.children.map(|c| c[0])
    }

    /// Right child
    pub fn right(&self) -> Option<CellId> {
        self.children.map(|c| c[1])
    }

    /// Check if the cell is a leaf
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

impl<D: DataCategory, M: Geometry> fmt::Debug for Cell<D, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("pos", &self.pos)
            .field("size", &self.size)
            .field("w", &self.w)
            .field("value", &self.value)
            .field("n", &self.n)
            .field("start", &self.start)
            .field("children", &self.children)
            .finish()
    }
}

/// Centroid, bounding size and sums over a set of points
pub(crate) struct Aggregate<D: DataCategory, M: Geometry> {
    pub(crate) pos: M::Position,
    pub(crate) size: f64,
    pub(crate) w: f64,
    pub(crate) value: D::Value,
    pub(crate) n: usize,
}

impl<D: DataCategory, M: Geometry> Aggregate<D, M> {
    /// Compute the aggregate of a non-empty set of points
    pub(crate) fn from_points(points: &[Point<D, M>]) -> Self {
        let first = &points[0];
        if points.len() == 1 {
            return Self {
                pos: first.pos,
                size: 0.0,
                w: first.w,
                value: D::aggregate(points, &first.pos),
                n: 1,
            };
        }

        let w: f64 = points.iter().map(|p| p.w).sum();
        if points.iter().all(|p| p.pos == first.pos) {
            return Self {
                pos: first.pos,
                size: 0.0,
                w,
                value: D::aggregate(points, &first.pos),
                n: points.len(),
            };
        }

        // Fall back to an unweighted centroid if every weight is zero
        let mean = if w > 0.0 {
            weighted_mean::<D, M>(points, |p| p.w / w)
        } else {
            let n = points.len() as f64;
            weighted_mean::<D, M>(points, |_| 1.0 / n)
        };
        let pos = M::finish_centroid(mean, 1.0, &first.pos);

        let size = points
            .iter()
            .map(|p| M::distance(&pos, &p.pos))
            .fold(0.0, f64::max);

        Self {
            pos,
            size,
            w,
            value: D::aggregate(points, &pos),
            n: points.len(),
        }
    }
}

/// Mean position, with `fraction` summing to one over the points
///
/// Partial sums stay inside the points' bounding box.
fn weighted_mean<D: DataCategory, M: Geometry>(
    points: &[Point<D, M>],
    fraction: impl Fn(&Point<D, M>) -> f64,
) -> M::Position {
    let mut mean = M::zero();
    for p in points {
        let s = fraction(p);
        for (acc, x) in mean.as_mut().iter_mut().zip(p.pos.as_ref()) {
            *acc += s * x;
        }
    }
    mean
}

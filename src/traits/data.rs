//! Data categories
use crate::traits::Geometry;
use crate::types::Point;
use std::fmt::Debug;

pub trait DataCategory: Copy + Debug + Send + Sync + 'static {
    //! The per-point quantity carried through a tree
    /// Value stored per point, and aggregated (weighted) per cell
    type Value: Copy + Debug + Default + PartialEq + Send + Sync;

    /// Short name used in log messages and C entry points
    const NAME: &'static str;

    /// Weighted sum of the point values, expressed in the frame of `centroid`
    fn aggregate<M: Geometry>(points: &[Point<Self, M>], centroid: &M::Position) -> Self::Value;
}

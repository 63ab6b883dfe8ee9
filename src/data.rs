//! Count, scalar and shear data categories
use crate::traits::{DataCategory, Geometry};
use crate::types::Point;
use num::complex::Complex64;

/// Points carry only a position and a weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Count;

/// Points carry a real scalar `k`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Scalar;

/// Points carry a shear `g1 + i g2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Shear;

impl DataCategory for Count {
    type Value = ();
    const NAME: &'static str = "N";

    fn aggregate<M: Geometry>(_points: &[Point<Self, M>], _centroid: &M::Position) {}
}

impl DataCategory for Scalar {
    type Value = f64;
    const NAME: &'static str = "K";

    fn aggregate<M: Geometry>(points: &[Point<Self, M>], _centroid: &M::Position) -> f64 {
        points.iter().map(|p| p.w * p.value).sum()
    }
}

impl DataCategory for Shear {
    type Value = Complex64;
    const NAME: &'static str = "G";

    fn aggregate<M: Geometry>(points: &[Point<Self, M>], centroid: &M::Position) -> Complex64 {
        points
            .iter()
            .map(|p| M::transport_shear(p.value, &p.pos, centroid) * p.w)
            .sum()
    }
}

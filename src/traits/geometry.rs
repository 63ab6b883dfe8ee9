//! Geometry
use num::complex::Complex64;
use std::fmt::Debug;

pub trait Geometry: Copy + Debug + Send + Sync + 'static {
    //! Coordinate system that points and cell centroids live in
    //!
    //! All distance math downstream of construction goes through this trait, so
    //! the cell and field code is identical for every geometry.

    /// Internal position representation
    type Position: Copy + Debug + PartialEq + Send + Sync + AsRef<[f64]> + AsMut<[f64]>;

    /// Number of Cartesian components in a position
    const DIM: usize;

    /// Short name used in log messages and C entry points
    const NAME: &'static str;

    /// Convert an input coordinate pair into the internal representation
    ///
    /// For flat geometry this is `(x, y)`, for spherical geometry `(ra, dec)` in radians.
    fn from_coords(a: f64, b: f64) -> Self::Position;

    /// The origin
    fn zero() -> Self::Position;

    /// Squared distance between two positions
    fn distance_squared(a: &Self::Position, b: &Self::Position) -> f64;

    /// Distance between two positions
    fn distance(a: &Self::Position, b: &Self::Position) -> f64 {
        Self::distance_squared(a, b).sqrt()
    }

    /// Turn an accumulated sum of weighted positions into a centroid
    ///
    /// `first` is returned if no sensible centroid exists.
    fn finish_centroid(sum: Self::Position, total: f64, first: &Self::Position)
        -> Self::Position;

    /// Move a shear measured at `from` into the local frame at `to`
    fn transport_shear(g: Complex64, from: &Self::Position, to: &Self::Position) -> Complex64;
}

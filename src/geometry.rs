//! Flat and spherical geometry
use crate::traits::Geometry;
use num::complex::Complex64;

/// Planar coordinates `(x, y)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flat;

/// Angular coordinates `(ra, dec)` in radians, stored as unit 3-vectors
///
/// Distances are chord lengths on the unit sphere, which agree with great-circle
/// separations (in radians) to second order for the small separations trees resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sphere;

impl Geometry for Flat {
    type Position = [f64; 2];
    const DIM: usize = 2;
    const NAME: &'static str = "Flat";

    fn from_coords(a: f64, b: f64) -> Self::Position {
        [a, b]
    }

    fn zero() -> Self::Position {
        [0.0; 2]
    }

    fn distance_squared(a: &Self::Position, b: &Self::Position) -> f64 {
        let dx = a[0] - b[0];
        let dy = a[1] - b[1];
        dx * dx + dy * dy
    }

    fn distance(a: &Self::Position, b: &Self::Position) -> f64 {
        (a[0] - b[0]).hypot(a[1] - b[1])
    }

    fn finish_centroid(
        sum: Self::Position,
        total: f64,
        first: &Self::Position,
    ) -> Self::Position {
        if total > 0.0 {
            [sum[0] / total, sum[1] / total]
        } else {
            *first
        }
    }

    fn transport_shear(g: Complex64, _from: &Self::Position, _to: &Self::Position) -> Complex64 {
        g
    }
}

/// Unit vector for a right ascension and declination in radians
pub fn unit_vector(ra: f64, dec: f64) -> [f64; 3] {
    let (sin_ra, cos_ra) = ra.sin_cos();
    let (sin_dec, cos_dec) = dec.sin_cos();
    [cos_dec * cos_ra, cos_dec * sin_ra, sin_dec]
}

fn dot(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Position angle, measured from east toward north, of the tangent direction `t` at `p`
///
/// Returns `None` at the poles where the local basis is undefined.
fn position_angle(p: &[f64; 3], t: &[f64; 3]) -> Option<f64> {
    let rxy = p[0].hypot(p[1]);
    if rxy == 0.0 {
        return None;
    }
    let east = [-p[1] / rxy, p[0] / rxy, 0.0];
    let north = [-p[2] * p[0] / rxy, -p[2] * p[1] / rxy, rxy];
    Some(dot(t, &north).atan2(dot(t, &east)))
}

impl Geometry for Sphere {
    type Position = [f64; 3];
    const DIM: usize = 3;
    const NAME: &'static str = "Sphere";

    fn from_coords(a: f64, b: f64) -> Self::Position {
        unit_vector(a, b)
    }

    fn zero() -> Self::Position {
        [0.0; 3]
    }

    fn distance_squared(a: &Self::Position, b: &Self::Position) -> f64 {
        let dx = a[0] - b[0];
        let dy = a[1] - b[1];
        let dz = a[2] - b[2];
        dx * dx + dy * dy + dz * dz
    }

    fn finish_centroid(
        sum: Self::Position,
        _total: f64,
        first: &Self::Position,
    ) -> Self::Position {
        let norm = dot(&sum, &sum).sqrt();
        if norm > 0.0 {
            [sum[0] / norm, sum[1] / norm, sum[2] / norm]
        } else {
            *first
        }
    }

    fn transport_shear(g: Complex64, from: &Self::Position, to: &Self::Position) -> Complex64 {
        let cos_d = dot(from, to);
        // Great-circle direction at `from` heading to `to`, and at `to` heading away from `from`
        let t_from = [
            to[0] - cos_d * from[0],
            to[1] - cos_d * from[1],
            to[2] - cos_d * from[2],
        ];
        let t_to = [
            cos_d * to[0] - from[0],
            cos_d * to[1] - from[1],
            cos_d * to[2] - from[2],
        ];
        if dot(&t_from, &t_from) < 1e-24 {
            return g;
        }
        match (position_angle(from, &t_from), position_angle(to, &t_to)) {
            (Some(a_from), Some(a_to)) => g * Complex64::from_polar(1.0, 2.0 * (a_to - a_from)),
            _ => g,
        }
    }
}

#[cfg(test)]
mod test {
    use super::{unit_vector, Flat, Sphere};
    use crate::traits::Geometry;
    use approx::assert_relative_eq;
    use num::complex::Complex64;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    #[test]
    fn test_unit_vector() {
        let p = unit_vector(0.0, 0.0);
        assert_relative_eq!(p[0], 1.0);
        assert_relative_eq!(p[1], 0.0);
        assert_relative_eq!(p[2], 0.0);

        let p = unit_vector(FRAC_PI_2, 0.0);
        assert_relative_eq!(p[0], 0.0, epsilon = 1e-15);
        assert_relative_eq!(p[1], 1.0);

        let p = unit_vector(1.3, -0.4);
        assert_relative_eq!(Sphere::distance_squared(&p, &Sphere::zero()), 1.0, epsilon = 1e-14);
    }

    #[test]
    fn test_flat_distance() {
        assert_relative_eq!(Flat::distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
        assert_relative_eq!(Flat::distance(&[0.0, 0.0], &[-1e300, 1e300]), 2.0_f64.sqrt() * 1e300);
        assert_eq!(Flat::distance(&[f64::MAX, 0.0], &[-f64::MAX, 0.0]), f64::INFINITY);
    }

    #[test]
    fn test_chord_distance() {
        let a = Sphere::from_coords(0.0, 0.0);
        let b = Sphere::from_coords(FRAC_PI_2, 0.0);
        assert_relative_eq!(Sphere::distance(&a, &b), 2.0_f64.sqrt());
    }

    #[test]
    fn test_centroids() {
        assert_eq!(Flat::finish_centroid([2.0, 4.0], 2.0, &[9.0, 9.0]), [1.0, 2.0]);
        assert_eq!(Flat::finish_centroid([2.0, 4.0], 0.0, &[9.0, 9.0]), [9.0, 9.0]);

        let c = Sphere::finish_centroid([2.0, 0.0, 0.0], 5.0, &[0.0, 0.0, 1.0]);
        assert_eq!(c, [1.0, 0.0, 0.0]);
        let c = Sphere::finish_centroid([0.0, 0.0, 0.0], 2.0, &[0.0, 0.0, 1.0]);
        assert_eq!(c, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_transport_along_equator_and_meridian() {
        let g = Complex64::new(0.3, -0.1);

        let from = Sphere::from_coords(0.0, 0.0);
        let to = Sphere::from_coords(0.5, 0.0);
        let moved = Sphere::transport_shear(g, &from, &to);
        assert_relative_eq!(moved.re, g.re, epsilon = 1e-14);
        assert_relative_eq!(moved.im, g.im, epsilon = 1e-14);

        let from = Sphere::from_coords(1.0, 0.1);
        let to = Sphere::from_coords(1.0, FRAC_PI_4);
        let moved = Sphere::transport_shear(g, &from, &to);
        assert_relative_eq!(moved.re, g.re, epsilon = 1e-14);
        assert_relative_eq!(moved.im, g.im, epsilon = 1e-14);
    }

    #[test]
    fn test_transport_is_reversible() {
        let g = Complex64::new(0.2, 0.05);
        let from = Sphere::from_coords(0.2, 1.1);
        let to = Sphere::from_coords(1.4, 0.9);

        let moved = Sphere::transport_shear(g, &from, &to);
        // Rotation only changes the orientation
        assert_relative_eq!(moved.norm(), g.norm(), epsilon = 1e-14);
        // At high latitude the frame genuinely rotates
        assert!((moved - g).norm() > 1e-3);

        let back = Sphere::transport_shear(moved, &to, &from);
        assert_relative_eq!(back.re, g.re, epsilon = 1e-12);
        assert_relative_eq!(back.im, g.im, epsilon = 1e-12);
    }

    #[test]
    fn test_transport_degenerate() {
        let g = Complex64::new(0.2, 0.05);
        let p = Sphere::from_coords(0.7, 0.3);
        assert_eq!(Sphere::transport_shear(g, &p, &p), g);

        let pole = [0.0, 0.0, 1.0];
        assert_eq!(Sphere::transport_shear(g, &pole, &p), g);

        assert_eq!(Flat::transport_shear(g, &[0.0, 0.0], &[1.0, 1.0]), g);
    }
}

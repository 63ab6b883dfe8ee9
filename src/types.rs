//! Types specific to celltree

use crate::error::Error;
use crate::traits::{DataCategory, Geometry};
use std::fmt;

/// A single input point, stored by the field in tree order
pub struct Point<D: DataCategory, M: Geometry> {
    /// Position in the geometry's internal representation
    pub pos: M::Position,
    /// Weight
    pub w: f64,
    /// Scalar or shear value, `()` for counts
    pub value: D::Value,
    /// Index of the point in the input arrays
    pub index: usize,
}

// Derives would put bounds on the marker types rather than on their associated types.
impl<D: DataCategory, M: Geometry> Clone for Point<D, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: DataCategory, M: Geometry> Copy for Point<D, M> {}

impl<D: DataCategory, M: Geometry> fmt::Debug for Point<D, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Point")
            .field("pos", &self.pos)
            .field("w", &self.w)
            .field("value", &self.value)
            .field("index", &self.index)
            .finish()
    }
}

/// Handle to a cell inside a field's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub usize);

/// Policy used to divide the points of a cell between its two children
///
/// Every method splits along the axis on which the points have the largest extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum SplitMethod {
    /// Split at the midpoint of the extent
    #[default]
    Middle = 0,
    /// Split at the median point
    Median = 1,
    /// Split at the mean coordinate
    Mean = 2,
    /// Split at a random rank in the middle 60% of the points
    Random = 3,
}

impl TryFrom<i32> for SplitMethod {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SplitMethod::Middle),
            1 => Ok(SplitMethod::Median),
            2 => Ok(SplitMethod::Mean),
            3 => Ok(SplitMethod::Random),
            _ => Err(Error::InvalidInput(format!("Unknown split method: {value}"))),
        }
    }
}

#[cfg(test)]
mod test {
    use super::SplitMethod;

    #[test]
    fn test_split_method_from_int() {
        assert_eq!(SplitMethod::try_from(0).unwrap(), SplitMethod::Middle);
        assert_eq!(SplitMethod::try_from(1).unwrap(), SplitMethod::Median);
        assert_eq!(SplitMethod::try_from(2).unwrap(), SplitMethod::Mean);
        assert_eq!(SplitMethod::try_from(3).unwrap(), SplitMethod::Random);
        assert!(SplitMethod::try_from(4).is_err());
        assert!(SplitMethod::try_from(-1).is_err());
        assert_eq!(SplitMethod::default(), SplitMethod::Middle);
    }
}

//! # Cell trees for correlation functions
//!
//! Builds hierarchical spatial partitions of weighted points, each node summarising its
//! points by a centroid, a bounding size, the total weight and the weighted sum of a
//! scalar or shear value. Pair and triple counting algorithms walk these trees and treat
//! any cell that is small compared with its separation from another as a single point.
//!
//! Points live either on a plane ([`geometry::Flat`]) or on the sky ([`geometry::Sphere`]),
//! and carry no value ([`data::Count`]), a scalar ([`data::Scalar`]) or a shear
//! ([`data::Shear`]).
//!
//! ```
//! use celltree::{FieldOptions, NFieldFlat};
//!
//! let options = FieldOptions::new(0.1, 10.0, 0.1);
//! let field = NFieldFlat::new(&[0.0, 1.0], &[0.0, 0.0], &[1.0, 1.0], &options).unwrap();
//! let root = field.cell(field.top_level_cells()[0]);
//! assert_eq!(root.n(), 2);
//! assert_eq!(root.pos(), &[0.5, 0.0]);
//! ```
#![cfg_attr(feature = "strict", deny(warnings))]
#![warn(missing_docs)]

#[macro_use]
extern crate lazy_static;

pub mod bindings;
pub mod cell;
pub mod data;
pub mod error;
pub mod field;
pub mod geometry;
pub mod options;
mod split;
pub mod traits;
pub mod types;

pub use cell::Cell;
pub use error::{Error, Result};
pub use field::{
    Field, GFieldFlat, GFieldSphere, KFieldFlat, KFieldSphere, NFieldFlat, NFieldSphere,
};
pub use options::FieldOptions;
pub use types::{CellId, Point, SplitMethod};

//! Trait definitions

mod data;
mod geometry;

pub use data::DataCategory;
pub use geometry::Geometry;

//! Feature data model: coordinates, extents, geometries and features.

mod coord;
mod extent;
mod feature;
mod geometry;

pub use coord::Coord;
pub use extent::Extent;
pub use feature::{Feature, FeatureId, FeatureKey};
pub use geometry::{Geometry, GeometryType, VertexRef};

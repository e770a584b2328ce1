//! The rendering pipeline: classifies tile-store features into a render
//! taxonomy, tessellates them into typed shapes, orders them by z-index,
//! and rasterizes the result into an encoded PNG.

mod classify;
mod error;
mod facade;
mod label;
mod queue;
mod raster;
mod render_type;
mod shape;

pub use classify::classify;
pub use error::{Error, Result};
pub use facade::{render_png, RenderRequest};
pub use render_type::RenderType;
pub use shape::{tessellate, GeoFeatureKind, ProjectedBounds, RoadSubType, Shape, ShapeKind};

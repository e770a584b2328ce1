//! Memory-mapped, pointer-addressable storage for a pre-built map tile file.
//!
//! ## Binary layout
//! `FileHeader | TileHeaderEntry[tileCount] | Tile[...]`, each tile being
//! `TileBlockHeader | MapFeature[featuresCount] | Coordinate[coordinatesCount]
//! | StringEntry[stringCount] | char16[charactersCount]`. All multi-byte
//! integers are little-endian; every struct is 1-byte packed. See
//! [`layout`] for the exact field offsets.
//!
//! Producing this file from raw map data is out of scope for this crate —
//! it is assumed pre-built by an external producer.

mod error;
mod geodetic;
mod layout;
mod store;

pub use error::{Error, Result};
pub use geodetic::{tile_id_for_cell, tiles_for_bounding_box, BoundingBox, Coordinate};
pub use layout::{GeometryType, CURRENT_VERSION};
pub use store::{FeatureData, PropertyBag, TileStore};

//! Converts a classified feature into a drawable [`Shape`], projecting its
//! coordinates to Mercator world units and updating the running bounding
//! box.
//!
//! Shapes are a flat tagged enum rather than a trait object: the queue only
//! ever needs to know a shape's z-index to order it, and the compositor
//! switches on `kind` directly, so boxing would add an indirection with no
//! payoff.

use tile_store::{Coordinate, FeatureData, GeometryType};

use crate::render_type::{self as rt, RenderType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoFeatureKind {
	Forest,
	Plain,
	Hills,
	Mountains,
	Desert,
	Water,
	Leisure,
	Residential,
	Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoadSubType {
	Motorway,
	Trunk,
	Primary,
	Secondary,
	Tertiary,
	Residential,
	/// Has no entry of its own in the styling table; styled as [`RoadSubType::Unknown`].
	Service,
	Track,
	Unknown,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
	GeoFeature(GeoFeatureKind),
	Road(RoadSubType),
	Railway,
	Waterway,
	Border,
	Label { text: String },
}

/// A tessellated, Mercator-projected feature ready for the queue.
#[derive(Debug, Clone)]
pub struct Shape {
	pub kind: ShapeKind,
	pub is_polygon: bool,
	pub coordinates: Vec<(f64, f64)>,
	pub z_index: i32,
}

/// The running projected bounding box, seeded to infinities and widened by
/// every coordinate of every tessellated shape.
#[derive(Debug, Clone, Copy)]
pub struct ProjectedBounds {
	pub min_x: f64,
	pub min_y: f64,
	pub max_x: f64,
	pub max_y: f64,
}

impl Default for ProjectedBounds {
	fn default() -> Self {
		Self {
			min_x: f64::INFINITY,
			min_y: f64::INFINITY,
			max_x: f64::NEG_INFINITY,
			max_y: f64::NEG_INFINITY,
		}
	}
}

impl ProjectedBounds {
	fn extend(&mut self, x: f64, y: f64) {
		self.min_x = self.min_x.min(x);
		self.max_x = self.max_x.max(x);
		self.min_y = self.min_y.min(y);
		self.max_y = self.max_y.max(y);
	}

	pub fn is_empty(&self) -> bool { !self.min_x.is_finite() || !self.min_y.is_finite() }

	pub fn width(&self) -> f64 { self.max_x - self.min_x }

	pub fn height(&self) -> f64 { self.max_y - self.min_y }
}

fn project(coordinates: &[Coordinate], bounds: &mut ProjectedBounds) -> Vec<(f64, f64)> {
	coordinates
		.iter()
		.map(|c| {
			let (x, y) = (c.mercator_x(), c.mercator_y());
			bounds.extend(x, y);
			(x, y)
		})
		.collect()
}

fn road_sub_type(render_type: RenderType) -> RoadSubType {
	match render_type {
		rt::H__MOTORWAY => RoadSubType::Motorway,
		rt::H__TRUNK => RoadSubType::Trunk,
		rt::H__PRIMARY => RoadSubType::Primary,
		rt::H__SECONDARY => RoadSubType::Secondary,
		rt::H__TERTIARY => RoadSubType::Tertiary,
		rt::H__RESIDENTIAL => RoadSubType::Residential,
		rt::H__SERVICE => RoadSubType::Service,
		rt::H__TRACK => RoadSubType::Track,
		_ => RoadSubType::Unknown,
	}
}

/// Dispatches a classified feature through the leaf → subcategory →
/// category → general hierarchy, returning `None` for render types that
/// the table drops (`UNKNOWN` and anything the hierarchy never matches).
pub fn tessellate(feature: &FeatureData, render_type: RenderType, bounds: &mut ProjectedBounds) -> Option<Shape> {
	let is_polygon = feature.geometry_type == GeometryType::Polygon;

	// Leaf-level matches.
	let leaf = match render_type {
		rt::PLACE_NAME => {
			let first = feature.coordinates.first()?;
			let coordinates = project(std::slice::from_ref(first), bounds);
			let text = feature.display_label().unwrap_or_default().to_string();
			return Some(Shape {
				kind: ShapeKind::Label { text },
				is_polygon: false,
				coordinates,
				z_index: 60,
			});
		}
		rt::WATERWAY => Some((ShapeKind::Waterway, 40)),
		rt::LU__N_FOREST => Some((ShapeKind::GeoFeature(GeoFeatureKind::Forest), 11)),
		rt::LU__N_PLAIN => Some((ShapeKind::GeoFeature(GeoFeatureKind::Plain), 10)),
		rt::LU__N_HILLS => Some((ShapeKind::GeoFeature(GeoFeatureKind::Hills), 12)),
		rt::LU__N_MOUNTAINS => Some((ShapeKind::GeoFeature(GeoFeatureKind::Mountains), 13)),
		rt::LU__N_DESERT => Some((ShapeKind::GeoFeature(GeoFeatureKind::Desert), 9)),
		rt::LU__N_WATER => Some((ShapeKind::GeoFeature(GeoFeatureKind::Water), 40)),
		rt::H__MOTORWAY | rt::H__TRUNK | rt::H__PRIMARY | rt::H__SECONDARY | rt::H__TERTIARY | rt::H__RESIDENTIAL | rt::H__SERVICE | rt::H__TRACK => {
			Some((ShapeKind::Road(road_sub_type(render_type)), 50))
		}
		_ => None,
	};

	let (kind, z_index) = leaf.or_else(|| match rt::subcategory_of(render_type) {
		rt::LU__LEISURE => Some((ShapeKind::GeoFeature(GeoFeatureKind::Leisure), 41)),
		_ => match rt::category_of(render_type) {
			rt::LU_RESIDENTIAL => Some((ShapeKind::GeoFeature(GeoFeatureKind::Residential), 41)),
			_ => match rt::general_of(render_type) {
				rt::UNKNOWN => None,
				rt::HIGHWAY => Some((ShapeKind::Road(RoadSubType::Unknown), 50)),
				rt::RAILWAY => Some((ShapeKind::Railway, 45)),
				rt::BORDER => Some((ShapeKind::Border, 30)),
				rt::LANDUSE => Some((ShapeKind::GeoFeature(GeoFeatureKind::Unknown), 7)),
				other => {
					log::warn!("render type {other} matched no tessellation rule at any hierarchy level, dropping feature");
					None
				}
			},
		},
	})?;

	let coordinates = project(&feature.coordinates, bounds);
	Some(Shape {
		kind,
		is_polygon,
		coordinates,
		z_index,
	})
}

//! Projection and tile-planning primitives.
//!
//! The tile id scheme is left opaque-but-deterministic, owned by the
//! (out-of-scope) map file producer. Since no producer exists here, this
//! module defines its own scheme: one tile per whole degree of
//! latitude/longitude. See `DESIGN.md` for the full rationale.

const EPSILON: f64 = f64::EPSILON;

/// A geographic point, stored as 64-bit lat/lon.
#[derive(Copy, Clone, Debug)]
pub struct Coordinate {
	pub latitude: f64,
	pub longitude: f64,
}

impl Coordinate {
	pub fn new(latitude: f64, longitude: f64) -> Self { Self { latitude, longitude } }

	/// World-unit X coordinate: plain longitude.
	pub fn mercator_x(&self) -> f64 { self.longitude }

	/// World-unit Y coordinate: spherical Mercator of latitude.
	pub fn mercator_y(&self) -> f64 {
		let lat_rad = self.latitude.to_radians();
		(std::f64::consts::FRAC_PI_4 + lat_rad / 2.0).tan().ln()
	}
}

impl PartialEq for Coordinate {
	fn eq(&self, other: &Self) -> bool {
		(self.latitude - other.latitude).abs() <= EPSILON && (self.longitude - other.longitude).abs() <= EPSILON
	}
}

/// A geographic query rectangle. Edges are inclusive.
#[derive(Copy, Clone, Debug)]
pub struct BoundingBox {
	pub min_lat: f64,
	pub min_lon: f64,
	pub max_lat: f64,
	pub max_lon: f64,
}

impl BoundingBox {
	pub fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
		Self {
			min_lat,
			min_lon,
			max_lat,
			max_lon,
		}
	}

	/// Inclusive-edge membership test, used by the store's coarse in-box filter.
	pub fn contains(&self, c: &Coordinate) -> bool {
		c.latitude >= self.min_lat && c.latitude <= self.max_lat && c.longitude >= self.min_lon && c.longitude <= self.max_lon
	}

	fn intersects_cell(&self, lat: i32, lon: i32) -> bool {
		let cell_max_lat = (lat + 1) as f64;
		let cell_max_lon = (lon + 1) as f64;
		let cell_min_lat = lat as f64;
		let cell_min_lon = lon as f64;

		cell_min_lat <= self.max_lat && cell_max_lat >= self.min_lat && cell_min_lon <= self.max_lon && cell_max_lon >= self.min_lon
	}
}

/// Maps a one-degree grid cell to its tile id.
pub fn tile_id_for_cell(lat: i32, lon: i32) -> i32 { (lat + 90) * 360 + (lon + 180) }

/// Returns the ordered list of tile ids whose one-degree cell intersects `box_`.
///
/// Ordering is row-major: latitude ascending, then longitude ascending,
/// matching the store's requirement that tile-planner order be stable and
/// reproducible for a given box.
pub fn tiles_for_bounding_box(box_: &BoundingBox) -> Vec<i32> {
	let lat_lo = box_.min_lat.floor() as i32;
	let lat_hi = box_.max_lat.floor() as i32;
	let lon_lo = box_.min_lon.floor() as i32;
	let lon_hi = box_.max_lon.floor() as i32;

	let mut ids = Vec::new();
	for lat in lat_lo..=lat_hi {
		if !(-90..90).contains(&lat) {
			continue;
		}
		for lon in lon_lo..=lon_hi {
			let wrapped = ((lon % 360) + 360) % 360 - 180;
			if box_.intersects_cell(lat, wrapped) {
				ids.push(tile_id_for_cell(lat, wrapped));
			}
		}
	}
	ids
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn mercator_round_trip() {
		for lat in [-80.0, -45.0, -1.0, 0.0, 12.5, 45.0, 80.0] {
			let c = Coordinate::new(lat, 0.0);
			let y = c.mercator_y();
			// inverse Mercator
			let lat_rad = 2.0 * y.exp().atan() - std::f64::consts::FRAC_PI_2;
			let back = Coordinate::new(lat_rad.to_degrees(), 0.0);
			assert!((back.mercator_y() - y).abs() < 1e-9);
		}
	}

	#[test]
	fn coordinate_equality_uses_epsilon() {
		let a = Coordinate::new(1.0, 2.0);
		let b = Coordinate::new(1.0 + f64::EPSILON / 2.0, 2.0);
		assert_eq!(a, b);
	}

	#[test]
	fn bounding_box_contains_inclusive_edges() {
		let b = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
		assert!(b.contains(&Coordinate::new(0.0, 0.0)));
		assert!(b.contains(&Coordinate::new(1.0, 1.0)));
		assert!(!b.contains(&Coordinate::new(1.0001, 0.5)));
	}

	#[test]
	fn tiles_for_bounding_box_covers_single_cell() {
		let b = BoundingBox::new(10.2, 20.2, 10.8, 20.8);
		let ids = tiles_for_bounding_box(&b);
		assert_eq!(ids, vec![tile_id_for_cell(10, 20)]);
	}

	#[test]
	fn tiles_for_bounding_box_covers_a_grid() {
		let b = BoundingBox::new(10.8, 20.8, 12.2, 22.2);
		let ids = tiles_for_bounding_box(&b);
		// rows 10,11,12 x cols 20,21,22 = 9 cells, row-major order
		assert_eq!(ids.len(), 9);
		assert_eq!(ids[0], tile_id_for_cell(10, 20));
		assert_eq!(*ids.last().unwrap(), tile_id_for_cell(12, 22));
	}
}

//! Maps a feature's property bag plus geometry type to a [`RenderType`].
//!
//! Rules are evaluated in a fixed order: first match wins, and each rule
//! looks at the first property whose key satisfies its test. The property
//! bag is walked in place (no intermediate map), since every rule only ever
//! needs the first matching property.

use tile_store::{GeometryType, PropertyBag};

use crate::render_type::{self as rt, RenderType};

fn find<'a>(props: &'a PropertyBag, test: impl Fn(&str) -> bool) -> Option<(&'a str, &'a str)> {
	props.iter().find(|(k, _)| test(k))
}

fn find_eq<'a>(props: &'a PropertyBag, key: &str) -> Option<&'a str> { find(props, |k| k == key).map(|(_, v)| v) }

fn find_starts_with<'a>(props: &'a PropertyBag, prefix: &str) -> Option<(&'a str, &'a str)> {
	find(props, |k| k.starts_with(prefix))
}

pub fn classify(props: &PropertyBag, geometry: GeometryType) -> RenderType {
	// 1. Highway
	if let Some(value) = find_eq(props, "highway") {
		return match value {
			"motorway" => rt::H__MOTORWAY,
			"trunk" => rt::H__TRUNK,
			"primary" => rt::H__PRIMARY,
			"secondary" => rt::H__SECONDARY,
			"tertiary" => rt::H__TERTIARY,
			"residential" | "living_street" => rt::H__RESIDENTIAL,
			"service" => rt::H__SERVICE,
			"track" => rt::H__TRACK,
			_ => rt::HIGHWAY,
		};
	}

	// 2. Waterway
	if geometry != GeometryType::Point && find(props, |k| k.starts_with("water")).is_some() {
		return rt::WATERWAY;
	}

	// 3. Railway
	if let Some(value) = find_eq(props, "railway") {
		return match value {
			"rail" => rt::R__MAINLINE,
			"subway" => rt::R__SUBWAY,
			"light_rail" => rt::R__LIGHT_RAIL,
			"tram" => rt::R__TRAM,
			"narrow_gauge" => rt::R__NARROW_GAUGE,
			"monorail" => rt::R__MONORAIL,
			"preserved" => rt::R__PRESERVED,
			"miniature" => rt::R__MINIATURE,
			"funicular" => rt::R__FUNICULAR,
			_ => rt::RAILWAY,
		};
	}

	// 4. Administrative border: both tests must hold.
	let is_admin_boundary = find_starts_with(props, "boundary")
		.map(|(_, v)| v.starts_with("administrative"))
		.unwrap_or(false);
	let is_admin_level_2 = find_starts_with(props, "admin_level")
		.map(|(_, v)| v == "2")
		.unwrap_or(false);
	if is_admin_boundary && is_admin_level_2 {
		return rt::BORDER;
	}

	// 5. Place name
	if geometry != GeometryType::Point {
		if let Some((_, value)) = find_starts_with(props, "place") {
			if matches!(value, "city" | "town" | "locality" | "hamlet") {
				return rt::PLACE_NAME;
			}
		}
	}

	// 6. Forest boundary
	if let Some((_, value)) = find_starts_with(props, "boundary") {
		if value.starts_with("forest") {
			return rt::LU__N_FOREST;
		}
	}

	// 7. Forest landuse
	if let Some((_, value)) = find_starts_with(props, "landuse") {
		if value.starts_with("forest") || value.starts_with("orchard") {
			return rt::LU__N_FOREST;
		}
	}

	// 8. Residential-class landuse
	if let Some((_, value)) = find_starts_with(props, "landuse") {
		if matches!(
			value,
			"residential" | "cemetery" | "industrial" | "commercial" | "square" | "construction" | "military" | "quarry" | "brownfield"
		) {
			return rt::LU_RESIDENTIAL;
		}
	}

	if geometry == GeometryType::Polygon {
		// 9. Plain landuse
		if let Some((_, value)) = find_starts_with(props, "landuse") {
			if matches!(
				value,
				"form" | "meadow" | "grass" | "greenfield" | "recreation_ground" | "winter_sports" | "allotments"
			) {
				return rt::LU__N_PLAIN;
			}
		}

		// 10. Water landuse
		if let Some((_, value)) = find_starts_with(props, "landuse") {
			if matches!(value, "reservoir" | "basin") {
				return rt::LU__N_WATER;
			}
		}

		// 11. Building
		if find_starts_with(props, "building").is_some() {
			return rt::LU_RESIDENTIAL;
		}

		// 12. Amenity
		if let Some((_, value)) = find_starts_with(props, "amenity") {
			return if value == "fountain" { rt::LU_R__FOUNTAIN } else { rt::LU_RESIDENTIAL };
		}

		// 13. Leisure
		if find_starts_with(props, "leisure").is_some() {
			return rt::LU__LEISURE;
		}

		// 14. Natural
		if let Some((_, value)) = find_starts_with(props, "natural") {
			return match value {
				"fell" | "grassland" | "heath" | "moor" | "scrub" | "wetland" => rt::LU__N_PLAIN,
				"wood" | "tree_row" => rt::LU__N_FOREST,
				"bare_rock" | "rock" | "scree" => rt::LU__N_MOUNTAINS,
				"beach" | "sand" => rt::LU__N_DESERT,
				"water" => rt::LU__N_WATER,
				_ => rt::LU__NATURAL,
			};
		}
	}

	// 15. Otherwise
	rt::UNKNOWN
}

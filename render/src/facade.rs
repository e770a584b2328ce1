//! End-to-end rendering façade: query box + size in, encoded PNG bytes out.

use tile_store::{BoundingBox, TileStore};

use crate::{
	classify::classify,
	queue::DrawQueue,
	raster,
	shape::{tessellate, ProjectedBounds},
	Error, Result,
};

/// A geographic query plus the requested square canvas size, matching the
/// `(minLon, minLat, maxLon, maxLat, size)` request shape.
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest {
	pub min_lon: f64,
	pub min_lat: f64,
	pub max_lon: f64,
	pub max_lat: f64,
	pub size: u32,
}

/// Opens `path`, visits every feature intersecting `request`'s box,
/// classifies and tessellates each, then rasterizes the result at
/// `request.size x request.size` and encodes it as PNG.
pub fn render_png(path: impl AsRef<std::path::Path>, request: RenderRequest) -> Result<Vec<u8>> {
	let store = TileStore::open(path)?;
	let box_ = BoundingBox::new(request.min_lat, request.min_lon, request.max_lat, request.max_lon);

	let mut queue = DrawQueue::default();
	let mut bounds = ProjectedBounds::default();

	store.for_each_feature(&box_, |feature| {
		let render_type = classify(&feature.properties, feature.geometry_type);
		if let Some(shape) = tessellate(feature, render_type, &mut bounds) {
			queue.push(shape);
		}
		true
	})?;

	let pixmap = if bounds.is_empty() {
		// No feature intersected the box: an all-white canvas is still a
		// well-formed response.
		tiny_skia::Pixmap::new(request.size, request.size).ok_or(Error::EmptyCanvas)?
	} else {
		let scale = if bounds.width() > 0.0 && bounds.height() > 0.0 {
			(request.size as f64 / bounds.width()).min(request.size as f64 / bounds.height())
		} else {
			1.0
		};
		raster::rasterize(queue, bounds.min_x, bounds.min_y, scale, request.size, request.size)?
	};

	encode_png(&pixmap)
}

fn encode_png(pixmap: &tiny_skia::Pixmap) -> Result<Vec<u8>> {
	let mut out = Vec::new();
	{
		let mut encoder = png::Encoder::new(&mut out, pixmap.width(), pixmap.height());
		encoder.set_color(png::ColorType::Rgba);
		encoder.set_depth(png::BitDepth::Eight);
		let mut writer = encoder.write_header().map_err(Error::Encode)?;
		writer.write_image_data(pixmap.data()).map_err(Error::Encode)?;
	}
	Ok(out)
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use tile_store::CURRENT_VERSION;

	use super::*;

	fn write_string(chars: &mut Vec<u8>, strings: &mut Vec<u8>, text: &str) {
		let offset_units = (chars.len() / 2) as i32;
		let units: Vec<u16> = text.encode_utf16().collect();
		for u in &units {
			chars.extend_from_slice(&u.to_le_bytes());
		}
		strings.extend_from_slice(&offset_units.to_le_bytes());
		strings.extend_from_slice(&(units.len() as i32).to_le_bytes());
	}

	/// Builds a single-tile file with one primary-highway polyline.
	fn build_fixture() -> tempfile::NamedTempFile {
		let mut coordinates = Vec::new();
		let mut strings = Vec::new();
		let mut chars = Vec::new();

		coordinates.extend_from_slice(&5.0f64.to_le_bytes());
		coordinates.extend_from_slice(&5.0f64.to_le_bytes());
		coordinates.extend_from_slice(&6.0f64.to_le_bytes());
		coordinates.extend_from_slice(&6.0f64.to_le_bytes());

		write_string(&mut chars, &mut strings, "highway");
		write_string(&mut chars, &mut strings, "primary");

		let mut features = Vec::new();
		features.extend_from_slice(&1i64.to_le_bytes());
		features.extend_from_slice(&(-1i32).to_le_bytes());
		features.push(0); // Polyline
		features.extend_from_slice(&0i32.to_le_bytes());
		features.extend_from_slice(&2i32.to_le_bytes());
		features.extend_from_slice(&0i32.to_le_bytes());
		features.extend_from_slice(&1i32.to_le_bytes());

		let block_header_size = 40;
		let features_len = features.len();
		let coordinates_offset = block_header_size + features_len;
		let strings_offset = coordinates_offset + coordinates.len();
		let characters_offset = strings_offset + strings.len();

		let mut block = Vec::new();
		block.extend_from_slice(&1i32.to_le_bytes());
		block.extend_from_slice(&2i32.to_le_bytes());
		block.extend_from_slice(&2i32.to_le_bytes());
		block.extend_from_slice(&((chars.len() / 2) as i32).to_le_bytes());
		block.extend_from_slice(&(coordinates_offset as u64).to_le_bytes());
		block.extend_from_slice(&(strings_offset as u64).to_le_bytes());
		block.extend_from_slice(&(characters_offset as u64).to_le_bytes());
		block.extend_from_slice(&features);
		block.extend_from_slice(&coordinates);
		block.extend_from_slice(&strings);
		block.extend_from_slice(&chars);

		let mut file_bytes = Vec::new();
		file_bytes.extend_from_slice(&CURRENT_VERSION.to_le_bytes());
		file_bytes.extend_from_slice(&1i32.to_le_bytes());

		let tile_offset = 12 + 12;
		file_bytes.extend_from_slice(&0i32.to_le_bytes());
		file_bytes.extend_from_slice(&(tile_offset as u64).to_le_bytes());
		file_bytes.extend_from_slice(&block);

		let mut f = tempfile::NamedTempFile::new().unwrap();
		f.write_all(&file_bytes).unwrap();
		f
	}

	#[test]
	fn renders_a_valid_png_for_a_matching_box() {
		let f = build_fixture();
		let bytes = render_png(
			f.path(),
			RenderRequest {
				min_lon: 0.0,
				min_lat: 0.0,
				max_lon: 10.0,
				max_lat: 10.0,
				size: 64,
			},
		)
		.unwrap();

		assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
	}

	#[test]
	fn empty_box_still_yields_a_png() {
		let f = build_fixture();
		let bytes = render_png(
			f.path(),
			RenderRequest {
				min_lon: -80.0,
				min_lat: -80.0,
				max_lon: -70.0,
				max_lat: -70.0,
				size: 32,
			},
		)
		.unwrap();

		assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
	}
}

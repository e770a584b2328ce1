//! Projects the draw queue onto a canvas and rasterizes it with `tiny_skia`.
//!
//! Colors are symbolic names with standard CSS RGB values; style tuples
//! for road sub-types are a direct table lookup.

use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Stroke, StrokeDash, Transform};

use crate::{
	label,
	queue::DrawQueue,
	shape::{GeoFeatureKind, RoadSubType, Shape, ShapeKind},
	Error,
};

fn rgb(r: u8, g: u8, b: u8) -> Color { Color::from_rgba8(r, g, b, 255) }

fn rgba(r: u8, g: u8, b: u8, a: u8) -> Color { Color::from_rgba8(r, g, b, a) }

fn geo_feature_color(kind: GeoFeatureKind) -> Color {
	match kind {
		GeoFeatureKind::Forest => rgb(34, 139, 34),
		GeoFeatureKind::Plain => rgb(154, 205, 50),
		GeoFeatureKind::Hills => rgb(189, 183, 107),
		GeoFeatureKind::Mountains => rgb(139, 137, 137),
		GeoFeatureKind::Desert => rgb(237, 201, 175),
		GeoFeatureKind::Water => rgb(173, 216, 230),
		GeoFeatureKind::Leisure => rgb(144, 238, 144),
		GeoFeatureKind::Residential => rgb(222, 184, 135),
		GeoFeatureKind::Unknown => rgb(211, 211, 211),
	}
}

/// `(foreground color, foreground width, background color, background width)`.
fn road_style(sub_type: RoadSubType) -> (Color, f32, Color, f32) {
	match sub_type {
		RoadSubType::Motorway => (rgb(139, 0, 0), 2.0, rgb(255, 255, 0), 2.2),
		RoadSubType::Trunk => (rgb(255, 0, 0), 1.8, rgb(255, 255, 0), 2.0),
		RoadSubType::Primary => (rgb(255, 165, 0), 1.8, rgb(255, 255, 0), 2.0),
		RoadSubType::Secondary => (rgb(255, 165, 0), 1.6, rgb(255, 255, 0), 1.8),
		RoadSubType::Tertiary => (rgb(255, 255, 0), 1.6, rgb(255, 255, 0), 1.8),
		RoadSubType::Residential | RoadSubType::Service => (rgb(255, 255, 255), 1.6, dark_gray(), 1.8),
		RoadSubType::Track => (rgb(188, 143, 143), 1.4, rgb(165, 42, 42), 1.5),
		RoadSubType::Unknown => (rgb(255, 127, 80), 0.2, rgb(255, 255, 0), 0.4),
	}
}

// `Color::from_rgba8` is not `const`, so these are functions rather than
// `const`/`static` bindings.
fn waterway_color() -> Color { rgb(173, 216, 230) }
fn dark_gray() -> Color { rgb(169, 169, 169) }
fn light_gray() -> Color { rgb(211, 211, 211) }
fn border_color() -> Color { rgb(128, 128, 128) }
fn background_color() -> Color { rgb(255, 255, 255) }

fn path_from(coordinates: &[(f32, f32)], close: bool) -> Option<tiny_skia::Path> {
	let mut pb = PathBuilder::new();
	let mut iter = coordinates.iter();
	let first = iter.next()?;
	pb.move_to(first.0, first.1);
	for &(x, y) in iter {
		pb.line_to(x, y);
	}
	if close {
		pb.close();
	}
	pb.finish()
}

fn stroke_with(pixmap: &mut Pixmap, coordinates: &[(f32, f32)], color: Color, width: f32, dash: Option<&[f32]>) {
	let Some(path) = path_from(coordinates, false) else { return };
	let mut paint = Paint::default();
	paint.set_color(color);
	paint.anti_alias = true;

	let mut stroke = Stroke { width, ..Stroke::default() };
	if let Some(pattern) = dash {
		stroke.dash = StrokeDash::new(pattern.to_vec(), 0.0);
	}

	pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
}

fn fill_with(pixmap: &mut Pixmap, coordinates: &[(f32, f32)], color: Color) {
	let Some(path) = path_from(coordinates, true) else { return };
	let mut paint = Paint::default();
	paint.set_color(color);
	paint.anti_alias = true;
	pixmap.fill_path(&path, &paint, FillRule::EvenOdd, Transform::identity(), None);
}

/// Translates and scales a shape's world coordinates into canvas space,
/// flipping vertically so Mercator's north-up convention matches image
/// row-major top-down order.
fn canvas_coordinates(shape: &Shape, min_x: f64, min_y: f64, scale: f64, height: f64) -> Vec<(f32, f32)> {
	shape
		.coordinates
		.iter()
		.map(|&(x, y)| {
			let cx = (x - min_x) * scale;
			let cy = height - (y - min_y) * scale;
			(cx as f32, cy as f32)
		})
		.collect()
}

/// Drains `queue` in ascending z-index and rasterizes every shape onto a
/// `width x height` canvas whose world extent is `(min_x, min_y)..(min_x +
/// width/scale, min_y + height/scale)`. Fails with `Error::EmptyCanvas` if
/// either dimension is zero.
pub fn rasterize(mut queue: DrawQueue, min_x: f64, min_y: f64, scale: f64, width: u32, height: u32) -> Result<Pixmap, Error> {
	let mut pixmap = Pixmap::new(width, height).ok_or(Error::EmptyCanvas)?;
	pixmap.fill(background_color());

	let height_f = height as f64;

	while let Some(shape) = queue.pop() {
		let is_label = matches!(shape.kind, ShapeKind::Label { .. });
		if shape.coordinates.is_empty() || (shape.coordinates.len() < 2 && !is_label) {
			log::debug!("dropping degenerate shape with {} coordinate(s)", shape.coordinates.len());
			continue;
		}

		let canvas = canvas_coordinates(&shape, min_x, min_y, scale, height_f);

		match &shape.kind {
			ShapeKind::GeoFeature(kind) => {
				let color = geo_feature_color(*kind);
				if shape.is_polygon {
					if *kind == GeoFeatureKind::Leisure {
						stroke_with(&mut pixmap, &canvas, color, 1.2, None);
						let c = color.to_color_u8();
						fill_with(&mut pixmap, &canvas, rgba(c.red(), c.green(), c.blue(), 51));
					} else {
						fill_with(&mut pixmap, &canvas, color);
					}
				} else {
					stroke_with(&mut pixmap, &canvas, color, 1.2, None);
				}
			}
			ShapeKind::Waterway => {
				if shape.is_polygon {
					fill_with(&mut pixmap, &canvas, waterway_color());
				} else {
					stroke_with(&mut pixmap, &canvas, waterway_color(), 1.2, None);
				}
			}
			ShapeKind::Railway => {
				stroke_with(&mut pixmap, &canvas, dark_gray(), 2.0, None);
				stroke_with(&mut pixmap, &canvas, light_gray(), 1.2, Some(&[2.0, 4.0, 2.0]));
			}
			ShapeKind::Border => {
				stroke_with(&mut pixmap, &canvas, border_color(), 2.0, None);
			}
			ShapeKind::Road(sub_type) => {
				if shape.is_polygon {
					continue;
				}
				let (fg, fg_width, bg, bg_width) = road_style(*sub_type);
				stroke_with(&mut pixmap, &canvas, bg, bg_width, None);
				stroke_with(&mut pixmap, &canvas, fg, fg_width, None);
			}
			ShapeKind::Label { text } => {
				if let Some((x, y)) = canvas.first() {
					label::draw(&mut pixmap, text, *x, *y);
				}
			}
		}
	}

	Ok(pixmap)
}

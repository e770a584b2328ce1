//! Label text rendering: discovers a bold system font via `fontdb` and
//! rasterizes glyphs with `fontdue`, blending them directly into the
//! `tiny_skia` canvas.
//!
//! No font asset ships with this crate. If no system font can be found the
//! label degrades to a small marker dot plus a logged warning, rather than
//! fabricating a bundled font.

use std::sync::OnceLock;

use fontdue::Font;
use tiny_skia::Pixmap;

const FONT_SIZE: f32 = 12.0;
const TEXT_COLOR: (u8, u8, u8) = (0, 0, 0);

fn system_font() -> Option<&'static Font> {
	static FONT: OnceLock<Option<Font>> = OnceLock::new();
	FONT.get_or_init(load_bold_system_font).as_ref()
}

fn load_bold_system_font() -> Option<Font> {
	let mut db = fontdb::Database::new();
	db.load_system_fonts();

	let query = fontdb::Query {
		families: &[fontdb::Family::SansSerif],
		weight: fontdb::Weight::BOLD,
		..fontdb::Query::default()
	};
	let id = db.query(&query).or_else(|| {
		db.query(&fontdb::Query {
			families: &[fontdb::Family::SansSerif],
			..fontdb::Query::default()
		})
	})?;

	let (source, _index) = db.face_source(id)?;
	let bytes: Vec<u8> = match &source {
		fontdb::Source::Binary(data) => data.as_ref().as_ref().to_vec(),
		fontdb::Source::File(path) | fontdb::Source::SharedFile(path, _) => std::fs::read(path).ok()?,
	};

	match Font::from_bytes(bytes, fontdue::FontSettings::default()) {
		Ok(font) => Some(font),
		Err(e) => {
			log::warn!("discovered system font could not be parsed: {e}");
			None
		}
	}
}

fn draw_marker(pixmap: &mut Pixmap, x: f32, y: f32) {
	let (w, h) = (pixmap.width() as i32, pixmap.height() as i32);
	for dy in -1..=1 {
		for dx in -1..=1 {
			let (px, py) = (x as i32 + dx, y as i32 + dy);
			if px < 0 || py < 0 || px >= w || py >= h {
				continue;
			}
			set_pixel(pixmap, px as u32, py as u32, TEXT_COLOR, 255);
		}
	}
}

fn set_pixel(pixmap: &mut Pixmap, x: u32, y: u32, color: (u8, u8, u8), alpha: u8) {
	if x >= pixmap.width() || y >= pixmap.height() {
		return;
	}
	let idx = (y * pixmap.width() + x) as usize * 4;
	let data = pixmap.data_mut();
	let Some(pixel) = data.get_mut(idx..idx + 4) else { return };

	let a = f32::from(alpha) / 255.0;
	pixel[0] = ((1.0 - a) * f32::from(pixel[0]) + a * f32::from(color.0)) as u8;
	pixel[1] = ((1.0 - a) * f32::from(pixel[1]) + a * f32::from(color.1)) as u8;
	pixel[2] = ((1.0 - a) * f32::from(pixel[2]) + a * f32::from(color.2)) as u8;
	pixel[3] = 255;
}

/// Draws `text` anchored at `(x, y)`, bold 12pt black, or a marker dot if no
/// system font could be discovered.
pub fn draw(pixmap: &mut Pixmap, text: &str, x: f32, y: f32) {
	if text.is_empty() {
		return;
	}

	let Some(font) = system_font() else {
		log::warn!("no system font available, drawing marker only for label {text:?}");
		draw_marker(pixmap, x, y);
		return;
	};

	let mut cursor_x = x;
	for ch in text.chars() {
		let (metrics, bitmap) = font.rasterize(ch, FONT_SIZE);
		if bitmap.is_empty() {
			cursor_x += metrics.advance_width;
			continue;
		}

		let glyph_x = (cursor_x + metrics.xmin as f32).round() as i32;
		let glyph_y = (y - metrics.height as f32 - metrics.ymin as f32).round() as i32;

		for (i, &alpha) in bitmap.iter().enumerate() {
			if alpha == 0 {
				continue;
			}
			let px = glyph_x + (i % metrics.width) as i32;
			let py = glyph_y + (i / metrics.width) as i32;
			if px < 0 || py < 0 {
				continue;
			}
			set_pixel(pixmap, px as u32, py as u32, TEXT_COLOR, alpha);
		}

		cursor_x += metrics.advance_width;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_text_draws_nothing() {
		let mut pixmap = Pixmap::new(10, 10).unwrap();
		draw(&mut pixmap, "", 5.0, 5.0);
		for pixel in pixmap.pixels() {
			assert_eq!(pixel.alpha(), 0);
		}
	}

	#[test]
	fn marker_fallback_draws_within_bounds_without_panicking() {
		let mut pixmap = Pixmap::new(4, 4).unwrap();
		draw_marker(&mut pixmap, 0.0, 0.0);
		draw_marker(&mut pixmap, 3.0, 3.0);
	}
}

//! The memory-mapped tile store: open, tile lookup, and feature iteration.

use std::{fs::File, path::Path};

use memmap2::{Mmap, MmapOptions};

use crate::{
	error::{Error, Result},
	geodetic::{tiles_for_bounding_box, BoundingBox, Coordinate},
	layout::{
		ByteReader,
		FeatureRecord,
		FileHeader,
		GeometryType,
		TileBlockHeader,
		TileHeaderEntry,
		COORDINATE_RECORD_SIZE,
		FEATURE_RECORD_SIZE,
		FILE_HEADER_SIZE,
		STRING_ENTRY_SIZE,
		TILE_HEADER_ENTRY_SIZE,
	},
};

/// An ordered key/value property bag materialized for a single feature.
///
/// Kept as an ordered `Vec` rather than a `HashMap`: the classifier only
/// ever needs the first property matching a given key, and feature property
/// counts are small, so linear lookup is both simpler and faster than
/// hashing.
#[derive(Debug, Default, Clone)]
pub struct PropertyBag {
	entries: Vec<(String, String)>,
}

impl PropertyBag {
	/// Appends a property, preserving storage order. Exposed for building
	/// fixtures in tests outside this crate; `for_each_feature` populates bags
	/// straight from the mapped file instead.
	pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) { self.entries.push((key.into(), value.into())); }

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> { self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str())) }

	pub fn get(&self, key: &str) -> Option<&str> {
		self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
	}

	pub fn len(&self) -> usize { self.entries.len() }

	pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

/// A single feature, fully materialized for the duration of the visitor
/// callback. Property bag and coordinates are owned (see `DESIGN.md` for why
/// this store copies out of the mapped region rather than handing back
/// unaligned slices into it), but nothing here outlives the call in spirit:
/// callers should not stash a `FeatureData` past the callback that produced
/// it.
#[derive(Debug, Clone)]
pub struct FeatureData {
	pub id: i64,
	pub geometry_type: GeometryType,
	pub coordinates: Vec<Coordinate>,
	pub label: Option<String>,
	pub properties: PropertyBag,
}

impl FeatureData {
	/// The label to draw: the `name` property if present, else the
	/// feature's intrinsic label.
	pub fn display_label(&self) -> Option<&str> { self.properties.get("name").or(self.label.as_deref()) }
}

struct TileLocation {
	header: TileBlockHeader,
	base: usize,
}

/// A memory-mapped, pointer-addressable tile store.
pub struct TileStore {
	mmap: Mmap,
	tile_count: i32,
}

impl TileStore {
	/// Opens and validates a map file, memory-mapping it for the lifetime of
	/// the returned store.
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		let file = File::open(path)?;
		let mmap = unsafe { MmapOptions::new().map(&file)? };

		let reader = ByteReader::new(&mmap);
		let header = FileHeader::read(reader)?;
		if header.version != crate::layout::CURRENT_VERSION {
			return Err(Error::Format(format!(
				"unrecognized file version {} (expected {})",
				header.version,
				crate::layout::CURRENT_VERSION
			)));
		}

		let index_end = FILE_HEADER_SIZE + header.tile_count as usize * TILE_HEADER_ENTRY_SIZE;
		if index_end > mmap.len() {
			return Err(Error::Format(format!(
				"declared tile count {} exceeds mapped size",
				header.tile_count
			)));
		}

		Ok(Self {
			mmap,
			tile_count: header.tile_count,
		})
	}

	fn reader(&self) -> ByteReader { ByteReader::new(&self.mmap) }

	/// Linearly scans the tile index for `id`. Acceptable since realistic
	/// pre-built files have a small (hundreds) tile count.
	fn find_tile(&self, id: i32) -> Result<Option<TileLocation>> {
		let reader = self.reader();
		for i in 0..self.tile_count as usize {
			let entry = TileHeaderEntry::read(reader, i)?;
			if entry.id == id {
				let base = entry.offset_in_bytes as usize;
				let header = TileBlockHeader::read(reader, base)?;
				return Ok(Some(TileLocation { header, base }));
			}
		}
		Ok(None)
	}

	/// Visits every feature whose coordinates intersect `box_`, in
	/// tile-planner order then storage order.
	///
	/// `visitor` returns `false` to halt iteration entirely, matching the
	/// cooperative cancellation contract.
	pub fn for_each_feature(&self, box_: &BoundingBox, mut visitor: impl FnMut(&FeatureData) -> bool) -> Result<()> {
		let reader = self.reader();
		for tile_id in tiles_for_bounding_box(box_) {
			let Some(location) = self.find_tile(tile_id)? else {
				log::debug!("tile {tile_id} not present in store, skipping");
				continue;
			};

			let block_header_size = crate::layout::TILE_BLOCK_HEADER_SIZE;
			let features_base = location.base + block_header_size;

			for i in 0..location.header.features_count as usize {
				let feature_base = features_base + i * FEATURE_RECORD_SIZE;
				let record = FeatureRecord::read(reader, feature_base)?;

				let coord_base = location.base + location.header.coordinates_offset_in_bytes as usize;
				let mut coordinates = Vec::with_capacity(record.coordinate_count.max(0) as usize);
				let mut in_box = false;
				for c in 0..record.coordinate_count {
					let offset = coord_base + (record.coordinate_offset + c) as usize * COORDINATE_RECORD_SIZE;
					let raw = crate::layout::CoordinateRecord::read(reader, offset)?;
					let coordinate = Coordinate::new(raw.latitude, raw.longitude);
					if box_.contains(&coordinate) {
						in_box = true;
					}
					coordinates.push(coordinate);
				}

				if !in_box {
					continue;
				}

				let string_base = location.base + location.header.strings_offset_in_bytes as usize;
				let char_base = location.base + location.header.characters_offset_in_bytes as usize;

				let label = if record.label_offset >= 0 {
					let string_offset = string_base + record.label_offset as usize * STRING_ENTRY_SIZE;
					let entry = crate::layout::StringEntry::read(reader, string_offset)?;
					Some(ByteReader::new(&self.mmap[char_base..]).read_utf16(entry.offset, entry.length)?)
				} else {
					None
				};

				let mut properties = Vec::with_capacity(record.property_count.max(0) as usize);
				for p in 0..record.property_count {
					let key_index = record.properties_offset + p as i32 * 2;
					let value_index = key_index + 1;

					let key_entry = crate::layout::StringEntry::read(reader, string_base + key_index as usize * STRING_ENTRY_SIZE)?;
					let value_entry =
						crate::layout::StringEntry::read(reader, string_base + value_index as usize * STRING_ENTRY_SIZE)?;

					let chars = ByteReader::new(&self.mmap[char_base..]);
					let key = chars.read_utf16(key_entry.offset, key_entry.length)?;
					let value = chars.read_utf16(value_entry.offset, value_entry.length)?;
					properties.push((key, value));
				}

				let data = FeatureData {
					id: record.id,
					geometry_type: record.geometry_type,
					coordinates,
					label,
					properties: PropertyBag { entries: properties },
				};

				if !visitor(&data) {
					return Ok(());
				}
			}
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::layout::{CURRENT_VERSION, TILE_BLOCK_HEADER_SIZE};

	fn write_string(chars: &mut Vec<u8>, strings: &mut Vec<u8>, text: &str) {
		let offset_units = (chars.len() / 2) as i32;
		let units: Vec<u16> = text.encode_utf16().collect();
		for u in &units {
			chars.extend_from_slice(&u.to_le_bytes());
		}
		strings.extend_from_slice(&offset_units.to_le_bytes());
		strings.extend_from_slice(&(units.len() as i32).to_le_bytes());
	}

	/// Builds a single-tile, single-feature map file in memory and writes it
	/// to a temp path, returning the path.
	fn build_fixture() -> tempfile::NamedTempFile {
		let mut coordinates = Vec::new();
		let mut strings = Vec::new();
		let mut chars = Vec::new();

		// one polyline with two coordinates, one inside the query box
		coordinates.extend_from_slice(&5.0f64.to_le_bytes());
		coordinates.extend_from_slice(&5.0f64.to_le_bytes());
		coordinates.extend_from_slice(&50.0f64.to_le_bytes());
		coordinates.extend_from_slice(&50.0f64.to_le_bytes());

		write_string(&mut chars, &mut strings, "highway");
		write_string(&mut chars, &mut strings, "primary");

		let mut features = Vec::new();
		// id
		features.extend_from_slice(&1i64.to_le_bytes());
		// labelOffset = -1
		features.extend_from_slice(&(-1i32).to_le_bytes());
		// geometryType = Polyline (0)
		features.push(0);
		// coordinateOffset
		features.extend_from_slice(&0i32.to_le_bytes());
		// coordinateCount
		features.extend_from_slice(&2i32.to_le_bytes());
		// propertiesOffset (string-entry index)
		features.extend_from_slice(&0i32.to_le_bytes());
		// propertyCount
		features.extend_from_slice(&1i32.to_le_bytes());

		let block_header_size = TILE_BLOCK_HEADER_SIZE;
		let features_len = features.len();
		let coordinates_offset = block_header_size + features_len;
		let strings_offset = coordinates_offset + coordinates.len();
		let characters_offset = strings_offset + strings.len();

		let mut block = Vec::new();
		block.extend_from_slice(&1i32.to_le_bytes()); // featuresCount
		block.extend_from_slice(&2i32.to_le_bytes()); // coordinatesCount
		block.extend_from_slice(&2i32.to_le_bytes()); // stringCount
		block.extend_from_slice(&((chars.len() / 2) as i32).to_le_bytes()); // charactersCount
		block.extend_from_slice(&(coordinates_offset as u64).to_le_bytes());
		block.extend_from_slice(&(strings_offset as u64).to_le_bytes());
		block.extend_from_slice(&(characters_offset as u64).to_le_bytes());
		block.extend_from_slice(&features);
		block.extend_from_slice(&coordinates);
		block.extend_from_slice(&strings);
		block.extend_from_slice(&chars);

		let mut file_bytes = Vec::new();
		file_bytes.extend_from_slice(&CURRENT_VERSION.to_le_bytes());
		file_bytes.extend_from_slice(&1i32.to_le_bytes()); // tileCount

		let tile_offset = FILE_HEADER_SIZE + TILE_HEADER_ENTRY_SIZE;
		file_bytes.extend_from_slice(&0i32.to_le_bytes()); // tile id
		file_bytes.extend_from_slice(&(tile_offset as u64).to_le_bytes());
		file_bytes.extend_from_slice(&block);

		use std::io::Write;
		let mut f = tempfile::NamedTempFile::new().unwrap();
		f.write_all(&file_bytes).unwrap();
		f
	}

	#[test]
	fn open_and_iterate_fixture() {
		let f = build_fixture();
		let store = TileStore::open(f.path()).unwrap();

		let box_ = BoundingBox::new(0.0, 0.0, 60.0, 60.0);
		let mut seen = Vec::new();
		store
			.for_each_feature(&box_, |feature| {
				seen.push(feature.clone());
				true
			})
			.unwrap();

		assert_eq!(seen.len(), 1);
		assert_eq!(seen[0].id, 1);
		assert_eq!(seen[0].properties.get("highway"), Some("primary"));
		assert_eq!(seen[0].coordinates.len(), 2);
	}

	#[test]
	fn box_outside_every_tile_yields_no_features() {
		let f = build_fixture();
		let store = TileStore::open(f.path()).unwrap();

		let box_ = BoundingBox::new(-80.0, -80.0, -70.0, -70.0);
		let mut count = 0;
		store
			.for_each_feature(&box_, |_| {
				count += 1;
				true
			})
			.unwrap();
		assert_eq!(count, 0);
	}

	#[test]
	fn visitor_returning_false_halts_iteration() {
		let f = build_fixture();
		let store = TileStore::open(f.path()).unwrap();
		let box_ = BoundingBox::new(0.0, 0.0, 60.0, 60.0);

		let mut count = 0;
		store
			.for_each_feature(&box_, |_| {
				count += 1;
				false
			})
			.unwrap();
		assert_eq!(count, 1);
	}

	#[test]
	fn unrecognized_version_is_format_error() {
		let mut buf = vec![0u8; FILE_HEADER_SIZE];
		buf[0..8].copy_from_slice(&999i64.to_le_bytes());
		let mut f = tempfile::NamedTempFile::new().unwrap();
		use std::io::Write;
		f.write_all(&buf).unwrap();

		let err = TileStore::open(f.path()).unwrap_err();
		assert!(matches!(err, Error::Format(_)));
	}
}

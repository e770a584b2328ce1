//! Bit-exact binary layout for the map file.
//!
//! All structs are 1-byte packed, little-endian, as the binary layout
//! require. Rather than `repr(C)` casts over the mapped region (which is not
//! guaranteed aligned), every struct here is a thin typed view backed by a
//! [`ByteReader`] that validates offsets against the mapped length the first
//! time they're touched.

use crate::error::{Error, Result};

/// A checked cursor over a byte slice borrowed from the mapped region.
///
/// Every read validates that `offset + size` is within bounds before
/// touching memory; callers that have already validated a sub-region (e.g.
/// iterating a fixed-size array inside it) pay no further bounds-check cost
/// beyond what `read_*` already does.
#[derive(Copy, Clone)]
pub struct ByteReader<'a> {
	data: &'a [u8],
}

impl<'a> ByteReader<'a> {
	pub fn new(data: &'a [u8]) -> Self { Self { data } }

	pub fn len(&self) -> usize { self.data.len() }

	fn slice(&self, offset: usize, size: usize) -> Result<&'a [u8]> {
		let end = offset.checked_add(size).ok_or_else(|| Error::Format("offset overflow".into()))?;
		self.data
			.get(offset..end)
			.ok_or_else(|| Error::Format(format!("offset {offset}..{end} out of range (len {})", self.data.len())))
	}

	pub fn read_u8(&self, offset: usize) -> Result<u8> { Ok(self.slice(offset, 1)?[0]) }

	pub fn read_i32(&self, offset: usize) -> Result<i32> {
		Ok(i32::from_le_bytes(self.slice(offset, 4)?.try_into().unwrap()))
	}

	pub fn read_i64(&self, offset: usize) -> Result<i64> {
		Ok(i64::from_le_bytes(self.slice(offset, 8)?.try_into().unwrap()))
	}

	pub fn read_u64(&self, offset: usize) -> Result<u64> {
		Ok(u64::from_le_bytes(self.slice(offset, 8)?.try_into().unwrap()))
	}

	pub fn read_f64(&self, offset: usize) -> Result<f64> {
		Ok(f64::from_le_bytes(self.slice(offset, 8)?.try_into().unwrap()))
	}

	/// Reads `length` UTF-16 code units starting at the byte offset
	/// `offset_units * 2`, transcoding to a Rust `String` at this boundary.
	/// `length_units` counts UTF-16 code units, not bytes.
	pub fn read_utf16(&self, offset_units: i32, length_units: i32) -> Result<String> {
		if offset_units < 0 || length_units < 0 {
			return Err(Error::Format("negative string offset/length".into()));
		}
		let byte_offset = offset_units as usize * 2;
		let byte_len = length_units as usize * 2;
		let bytes = self.slice(byte_offset, byte_len)?;
		let units: Vec<u16> = bytes.chunks_exact(2).map(|c| u16::from_le_bytes([c[0], c[1]])).collect();
		Ok(String::from_utf16_lossy(&units))
	}
}

pub const FILE_HEADER_SIZE: usize = 12;
pub const TILE_HEADER_ENTRY_SIZE: usize = 12;
pub const TILE_BLOCK_HEADER_SIZE: usize = 40;
pub const FEATURE_RECORD_SIZE: usize = 29;
pub const COORDINATE_RECORD_SIZE: usize = 16;
pub const STRING_ENTRY_SIZE: usize = 8;

pub const CURRENT_VERSION: i64 = 1;

pub struct FileHeader {
	pub version: i64,
	pub tile_count: i32,
}

impl FileHeader {
	pub fn read(r: ByteReader) -> Result<Self> {
		Ok(Self {
			version: r.read_i64(0)?,
			tile_count: r.read_i32(8)?,
		})
	}
}

pub struct TileHeaderEntry {
	pub id: i32,
	pub offset_in_bytes: u64,
}

impl TileHeaderEntry {
	pub fn read(r: ByteReader, index: usize) -> Result<Self> {
		let base = FILE_HEADER_SIZE + index * TILE_HEADER_ENTRY_SIZE;
		Ok(Self {
			id: r.read_i32(base)?,
			offset_in_bytes: r.read_u64(base + 4)?,
		})
	}
}

pub struct TileBlockHeader {
	pub features_count: i32,
	pub coordinates_count: i32,
	pub string_count: i32,
	pub characters_count: i32,
	pub coordinates_offset_in_bytes: u64,
	pub strings_offset_in_bytes: u64,
	pub characters_offset_in_bytes: u64,
}

impl TileBlockHeader {
	pub fn read(r: ByteReader, base: usize) -> Result<Self> {
		Ok(Self {
			features_count: r.read_i32(base)?,
			coordinates_count: r.read_i32(base + 4)?,
			string_count: r.read_i32(base + 8)?,
			characters_count: r.read_i32(base + 12)?,
			coordinates_offset_in_bytes: r.read_u64(base + 16)?,
			strings_offset_in_bytes: r.read_u64(base + 24)?,
			characters_offset_in_bytes: r.read_u64(base + 32)?,
		})
	}
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum GeometryType {
	Polyline,
	Polygon,
	Point,
}

impl GeometryType {
	fn from_byte(b: u8) -> Result<Self> {
		match b {
			0 => Ok(Self::Polyline),
			1 => Ok(Self::Polygon),
			2 => Ok(Self::Point),
			other => Err(Error::Format(format!("unknown geometry type tag {other}"))),
		}
	}
}

pub struct FeatureRecord {
	pub id: i64,
	pub label_offset: i32,
	pub geometry_type: GeometryType,
	pub coordinate_offset: i32,
	pub coordinate_count: i32,
	pub properties_offset: i32,
	pub property_count: i32,
}

impl FeatureRecord {
	pub fn read(r: ByteReader, base: usize) -> Result<Self> {
		Ok(Self {
			id: r.read_i64(base)?,
			label_offset: r.read_i32(base + 8)?,
			geometry_type: GeometryType::from_byte(r.read_u8(base + 12)?)?,
			coordinate_offset: r.read_i32(base + 13)?,
			coordinate_count: r.read_i32(base + 17)?,
			properties_offset: r.read_i32(base + 21)?,
			property_count: r.read_i32(base + 25)?,
		})
	}
}

pub struct CoordinateRecord {
	pub latitude: f64,
	pub longitude: f64,
}

impl CoordinateRecord {
	pub fn read(r: ByteReader, base: usize) -> Result<Self> {
		Ok(Self {
			latitude: r.read_f64(base)?,
			longitude: r.read_f64(base + 8)?,
		})
	}
}

pub struct StringEntry {
	pub offset: i32,
	pub length: i32,
}

impl StringEntry {
	pub fn read(r: ByteReader, base: usize) -> Result<Self> {
		Ok(Self {
			offset: r.read_i32(base)?,
			length: r.read_i32(base + 4)?,
		})
	}
}

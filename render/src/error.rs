use thiserror::Error;

/// Fatal errors from the rendering façade. Per-feature classification and
/// tessellation problems never appear here; they are diagnosed via `log`
/// and the offending feature is dropped.
#[derive(Debug, Error)]
pub enum Error {
	#[error(transparent)]
	Store(#[from] tile_store::Error),
	#[error("requested canvas has zero area")]
	EmptyCanvas,
	#[error("failed to encode PNG: {0}")]
	Encode(#[from] png::EncodingError),
}

pub type Result<T> = std::result::Result<T, Error>;

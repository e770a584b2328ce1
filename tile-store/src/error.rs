use thiserror::Error;

/// Fatal errors from opening or validating a tile store.
///
/// Per-feature and per-classification problems are never represented here;
/// they are diagnosed via `log` and the offending feature or tile is skipped.
#[derive(Debug, Error)]
pub enum Error {
	#[error("failed to map tile store file: {0}")]
	Io(#[from] std::io::Error),
	#[error("malformed tile store: {0}")]
	Format(String),
}

pub type Result<T> = std::result::Result<T, Error>;

use std::io;

use thiserror::Error;

use crate::sfnt::table::TableTag;

#[derive(Debug, Error)]
pub enum FontError {
    /// A read would run past the end of the buffer.
    #[error("read of {needed} bytes at offset {offset} is out of bounds for a {len} byte buffer")]
    OutOfBounds {
        offset: usize,
        needed: usize,
        len: usize,
    },

    /// The container header is unusable. Fatal to the whole load.
    #[error("malformed container header: {reason}")]
    MalformedHeader { reason: String },

    /// A table declared a version this codec set does not implement and
    /// that has no lower-version fallback. The table is kept as opaque
    /// bytes by the container.
    #[error("unsupported version {version:#010x} for `{tag}` table")]
    UnsupportedVersion { tag: TableTag, version: u32 },

    /// Fewer bytes than the table's declared version requires.
    #[error("`{tag}` table is truncated")]
    TruncatedData { tag: TableTag },

    /// A structured table failed encode-side validation.
    #[error("invalid `{tag}` table: {reason}")]
    InvalidTable {
        tag: TableTag,
        reason: &'static str,
    },

    #[error("malformed bitmap font: {reason}")]
    MalformedBitmapFont { reason: String },

    #[error("resource {id} unavailable")]
    MissingResource { id: i16 },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type FontResult<T> = Result<T, FontError>;

//! Binary font-container codec and bitmap-text layout.
//!
//! Two independent pipelines share the cursor and checksum primitives:
//! raw bytes decode through the table directory and per-tag codecs into a
//! structured [`sfnt::FontContainer`], which re-encodes with recomputed
//! checksums and offsets; bitmap font resources decode into a glyph table
//! plus shared image, which the [`layout::TextLayoutEngine`] turns into
//! positioned glyph rectangles for an external renderer.

pub mod bitmap;
pub mod checksum;
pub mod cursor;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod resource;
pub mod sfnt;

pub use error::{FontError, FontResult};

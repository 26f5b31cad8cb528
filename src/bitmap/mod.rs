//! Decoder for classic fixed-bitmap font resources: a 26-byte record,
//! a packed bit image shared by every glyph, a pixel-offset table, and a
//! width/offset table.

use log::warn;
use once_cell::unsync::OnceCell;

use crate::{
    cursor::ByteCursor,
    error::{FontError, FontResult},
    geometry::Rect,
};

pub use record::{FontRecord, FontTypeFlags, FONT_RECORD_LEN};

mod record;

/// One glyph's slice of the shared bit image plus its metrics.
///
/// The missing-glyph sentinel has `offset == width == -1` and a zero
/// rect; it stands in both for codes explicitly marked missing in the
/// width/offset table and for codes outside the font's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub char_code: u16,

    /// Pixel offset and width within the shared image; height is the
    /// font's rect height.
    pub rect: Rect,

    /// Kerning/origin adjustment.
    pub offset: i8,
    /// Advance width.
    pub width: i8,
}

impl Glyph {
    pub const fn missing(char_code: u16) -> Self {
        Self {
            char_code,
            rect: Rect::zero(),
            offset: -1,
            width: -1,
        }
    }

    pub fn is_missing(&self) -> bool {
        self.offset == -1 && self.width == -1
    }
}

/// The decoded pixel image: one byte per pixel, row-major, grayscale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphImage {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

impl GlyphImage {
    fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            pixels: Vec::new(),
        }
    }

    pub fn row(&self, y: usize) -> &[u8] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }
}

/// One decode pass's output: the glyph table and the shared image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strike {
    pub glyphs: Vec<Glyph>,
    pub image: GlyphImage,
}

impl Strike {
    fn empty() -> Self {
        Self {
            glyphs: Vec::new(),
            image: GlyphImage::empty(),
        }
    }
}

/// A bitmap font resource. The glyph table and image are decoded lazily
/// on first access and memoized for the font's lifetime; the record is
/// read eagerly.
#[derive(Debug)]
pub struct BitmapFont {
    record: FontRecord,
    data: Vec<u8>,
    strike: OnceCell<Strike>,
}

impl BitmapFont {
    pub fn new(data: Vec<u8>) -> FontResult<Self> {
        let mut cursor = ByteCursor::new(&data);
        let record = FontRecord::decode(&mut cursor)?;

        Ok(Self {
            record,
            data,
            strike: OnceCell::new(),
        })
    }

    pub fn record(&self) -> &FontRecord {
        &self.record
    }

    pub fn line_height(&self) -> i32 {
        self.record.line_height()
    }

    /// The memoized decode. Failure is logged and degrades to an empty
    /// strike so the font object stays usable; callers that need the
    /// error use [`decode_strike`] directly.
    fn strike(&self) -> &Strike {
        self.strike.get_or_init(|| {
            decode_strike(&self.record, &self.data).unwrap_or_else(|error| {
                warn!("bitmap font strike failed to decode: {}", error);
                Strike::empty()
            })
        })
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.strike().glyphs
    }

    pub fn image(&self) -> &GlyphImage {
        &self.strike().image
    }

    /// Glyph for a character code. Codes outside the font's range yield
    /// the missing-glyph sentinel, as do in-range codes marked missing in
    /// the width/offset table.
    pub fn glyph(&self, char_code: u16) -> Glyph {
        if char_code < self.record.first_char || char_code > self.record.last_char {
            return Glyph::missing(char_code);
        }

        self.strike()
            .glyphs
            .get(usize::from(char_code - self.record.first_char))
            .copied()
            .unwrap_or_else(|| Glyph::missing(char_code))
    }
}

/// Decodes the bit image, pixel-offset table, and width/offset table into
/// a glyph table plus image.
pub fn decode_strike(record: &FontRecord, data: &[u8]) -> FontResult<Strike> {
    let mut cursor = ByteCursor::new(data);
    cursor.seek(FONT_RECORD_LEN)?;

    // rowWords of zero means the resource carries no bitmap image:
    // degenerate but valid, with no glyphs available for drawing
    if record.row_words == 0 {
        return Ok(Strike::empty());
    }

    let depth = record.font_type.bit_depth();
    let width = record.row_words as usize * 16;
    let height = record.rect_height as usize;
    let row_bytes = record.row_words as usize * 2 * depth as usize;

    let packed = cursor.read_bytes(row_bytes * height)?;
    let image = unpack_image(packed, width, height, depth);

    // one pixel offset per glyph slot plus the end-of-image terminal
    let mut offsets = Vec::with_capacity(record.glyph_count() + 1);
    for _ in 0..record.glyph_count() + 1 {
        offsets.push(cursor.read_u16()?);
    }

    cursor.push_position(record.width_offset_table_position())?;

    let mut glyphs = Vec::with_capacity(record.glyph_count());
    for index in 0..record.glyph_count() {
        let char_code = record.first_char + index as u16;
        let entry = cursor.read_i16()?;

        if entry == -1 {
            glyphs.push(Glyph::missing(char_code));
            continue;
        }

        let x = i32::from(offsets[index]);
        let glyph_width = i32::from(offsets[index + 1]) - x;
        if glyph_width < 0 {
            return Err(FontError::MalformedBitmapFont {
                reason: format!("pixel offsets for code {} run backwards", char_code),
            });
        }

        glyphs.push(Glyph {
            char_code,
            rect: Rect::new(x, 0, glyph_width, i32::from(record.rect_height)),
            offset: (entry >> 8) as i8,
            width: (entry & 0xFF) as i8,
        });
    }

    cursor.pop_position();

    Ok(Strike { glyphs, image })
}

/// Expands a packed row image to one byte per pixel. Source bytes use an
/// inverted convention relative to the target representation, so every
/// byte is bit-complemented first; sub-byte values are scaled to the full
/// 0..=255 range.
fn unpack_image(packed: &[u8], width: usize, height: usize, depth: u32) -> GlyphImage {
    let pixels_per_byte = 8 / depth as usize;
    let scale: u8 = match depth {
        1 => 255,
        2 => 85,
        4 => 17,
        _ => 1,
    };

    let row_bytes = width * depth as usize / 8;
    let mut pixels = Vec::with_capacity(width * height);

    for row in packed.chunks_exact(row_bytes).take(height) {
        for &byte in row {
            let byte = !byte;

            for pixel in 0..pixels_per_byte {
                let shift = 8 - depth as usize * (pixel + 1);
                let value = (byte >> shift) & ((1u16 << depth) - 1) as u8;

                pixels.push(value * scale);
            }
        }
    }

    GlyphImage {
        width,
        height,
        pixels,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::cursor::ByteWriter;

    /// A three-glyph font: codes 32..=34, 7 rows tall, two words per row.
    fn sample_resource() -> Vec<u8> {
        let mut writer = ByteWriter::new();

        writer.write_u16(0x9000); // fontType: proportional, 1 bpp
        writer.write_u16(32); // firstChar
        writer.write_u16(34); // lastChar
        writer.write_i16(8); // widMax
        writer.write_i16(-1); // kernMax
        writer.write_i16(0); // nDescent
        writer.write_i16(8); // fRectWidth
        writer.write_i16(7); // fRectHeight
        writer.write_u16(23); // owTLoc: words from its own field to byte 62
        writer.write_i16(6); // ascent
        writer.write_i16(1); // descent
        writer.write_i16(2); // leading
        writer.write_i16(2); // rowWords

        // bit image: 4 bytes per row, 7 rows; stored complemented
        writer.write_u8(0x55);
        for _ in 1..28 {
            writer.write_u8(0xFF);
        }

        // pixel-offset table, final entry is the terminal
        for offset in [0u16, 10, 18, 18] {
            writer.write_u16(offset);
        }

        // width/offset table: high byte kerning offset, low byte advance
        writer.write_i16(0x0005);
        writer.write_i16(0x0108);
        writer.write_i16(-1);

        writer.into_bytes()
    }

    #[test]
    fn glyph_extraction() {
        let font = BitmapFont::new(sample_resource()).unwrap();

        let space = font.glyph(32);
        assert_eq!(space.rect, Rect::new(0, 0, 10, 7));
        assert_eq!(space.offset, 0);
        assert_eq!(space.width, 5);

        let bang = font.glyph(33);
        assert_eq!(bang.rect, Rect::new(10, 0, 8, 7));
        assert_eq!(bang.offset, 1);
        assert_eq!(bang.width, 8);

        // marked missing in the width/offset table
        assert!(font.glyph(34).is_missing());
        // outside the font's range entirely
        assert!(font.glyph(35).is_missing());
        assert!(font.glyph(0).is_missing());
    }

    #[test]
    fn image_is_complemented_and_expanded() {
        let font = BitmapFont::new(sample_resource()).unwrap();
        let image = font.image();

        assert_eq!(image.width, 32);
        assert_eq!(image.height, 7);
        assert_eq!(image.pixels.len(), 32 * 7);

        // 0x55 complements to 0xAA: alternating on/off pixels
        assert_eq!(&image.row(0)[..8], &[255, 0, 255, 0, 255, 0, 255, 0]);
        // 0xFF complements to zero
        assert_eq!(&image.row(0)[8..16], &[0; 8]);
    }

    #[test]
    fn zero_row_words_is_a_valid_empty_font() {
        let mut data = sample_resource();
        // rowWords lives in the record's final word
        data[24] = 0;
        data[25] = 0;

        let font = BitmapFont::new(data).unwrap();

        assert!(font.glyphs().is_empty());
        assert_eq!(font.image().width, 0);
        assert!(font.glyph(32).is_missing());
    }

    #[test]
    fn truncated_image_degrades_to_empty_strike() {
        let mut data = sample_resource();
        data.truncate(40);

        let font = BitmapFont::new(data.clone()).unwrap();
        assert!(font.glyphs().is_empty());

        // the eager path surfaces the error instead
        let record = *font.record();
        assert!(decode_strike(&record, &data).is_err());
    }

    #[test]
    fn line_height_is_rect_height_plus_leading() {
        let font = BitmapFont::new(sample_resource()).unwrap();

        assert_eq!(font.line_height(), 9);
    }
}

use crate::{
    cursor::{ByteCursor, ByteWriter},
    error::{FontError, FontResult},
    sfnt::data_types::Fixed,
};

use super::TableTag;

const VERSION_1_0: u32 = 0x00010000;
const VERSION_2_0: u32 = 0x00020000;
const VERSION_3_0: u32 = 0x00030000;

/// PostScript table: glyph names plus global PostScript metrics.
///
/// Formats 2.5 and 4.0 are recognized but not implemented; they fail with
/// `UnsupportedVersion` so the container retains their raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostTable {
    pub italic_angle: Fixed,
    pub underline_position: i16,
    pub underline_thickness: i16,
    pub is_fixed_pitch: u32,
    pub min_mem_type42: u32,
    pub max_mem_type42: u32,
    pub min_mem_type1: u32,
    pub max_mem_type1: u32,
    pub names: PostNames,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostNames {
    /// Format 1.0: the glyph order is exactly the 258-entry standard
    /// Macintosh set; no extra storage.
    Standard,

    /// Format 2.0: a per-glyph index into the standard set, with indices
    /// of 258 and above offset into the trailing custom-name list.
    Indexed {
        indices: Vec<u16>,
        custom: Vec<String>,
    },

    /// Format 3.0: no names.
    None,
}

impl PostTable {
    pub fn decode(data: &[u8]) -> FontResult<Self> {
        let mut cursor = ByteCursor::new(data);

        let version = cursor.read_u32()?;
        let italic_angle = Fixed(cursor.read_i32()?);
        let underline_position = cursor.read_i16()?;
        let underline_thickness = cursor.read_i16()?;
        let is_fixed_pitch = cursor.read_u32()?;
        let min_mem_type42 = cursor.read_u32()?;
        let max_mem_type42 = cursor.read_u32()?;
        let min_mem_type1 = cursor.read_u32()?;
        let max_mem_type1 = cursor.read_u32()?;

        let names = match version {
            VERSION_1_0 => PostNames::Standard,
            VERSION_2_0 => Self::decode_indexed(&mut cursor)?,
            VERSION_3_0 => PostNames::None,
            // 2.5 (deprecated index-offset form) and 4.0 (CID-keyed) are
            // recognized but unimplemented
            _ => {
                return Err(FontError::UnsupportedVersion {
                    tag: TableTag::POST,
                    version,
                })
            }
        };

        Ok(Self {
            italic_angle,
            underline_position,
            underline_thickness,
            is_fixed_pitch,
            min_mem_type42,
            max_mem_type42,
            min_mem_type1,
            max_mem_type1,
            names,
        })
    }

    fn decode_indexed(cursor: &mut ByteCursor) -> FontResult<PostNames> {
        let num_glyphs = cursor.read_u16()?;

        let mut indices = Vec::with_capacity(usize::from(num_glyphs));
        for _ in 0..num_glyphs {
            indices.push(cursor.read_u16()?);
        }

        let mut custom = Vec::new();
        while !cursor.is_at_end() {
            let len = usize::from(cursor.read_u8()?);
            let bytes = cursor.read_bytes(len)?;

            let name = String::from_utf8(bytes.to_vec()).map_err(|_| FontError::InvalidTable {
                tag: TableTag::POST,
                reason: "glyph name is not valid ascii",
            })?;

            custom.push(name);
        }

        Ok(PostNames::Indexed { indices, custom })
    }

    pub fn encode(&self) -> FontResult<Vec<u8>> {
        let mut writer = ByteWriter::new();

        writer.write_u32(match &self.names {
            PostNames::Standard => VERSION_1_0,
            PostNames::Indexed { .. } => VERSION_2_0,
            PostNames::None => VERSION_3_0,
        });
        writer.write_i32(self.italic_angle.0);
        writer.write_i16(self.underline_position);
        writer.write_i16(self.underline_thickness);
        writer.write_u32(self.is_fixed_pitch);
        writer.write_u32(self.min_mem_type42);
        writer.write_u32(self.max_mem_type42);
        writer.write_u32(self.min_mem_type1);
        writer.write_u32(self.max_mem_type1);

        if let PostNames::Indexed { indices, custom } = &self.names {
            writer.write_u16(indices.len() as u16);

            for &index in indices {
                writer.write_u16(index);
            }

            for name in custom {
                if name.len() > 255 {
                    return Err(FontError::InvalidTable {
                        tag: TableTag::POST,
                        reason: "glyph name longer than 255 bytes",
                    });
                }

                writer.write_u8(name.len() as u8);
                writer.write_bytes(name.as_bytes());
            }
        }

        Ok(writer.into_bytes())
    }

    /// Resolve a glyph's PostScript name, if the format carries names.
    pub fn glyph_name(&self, glyph_id: u16) -> Option<&str> {
        match &self.names {
            PostNames::Standard => MACINTOSH_NAMES.get(usize::from(glyph_id)).copied(),
            PostNames::Indexed { indices, custom } => {
                let index = usize::from(*indices.get(usize::from(glyph_id))?);

                if index < MACINTOSH_NAMES.len() {
                    Some(MACINTOSH_NAMES[index])
                } else {
                    custom.get(index - MACINTOSH_NAMES.len()).map(String::as_str)
                }
            }
            PostNames::None => None,
        }
    }
}

/// The standard Macintosh glyph order. Format 1.0 tables use it directly;
/// format 2.0 indices below 258 select from it.
#[rustfmt::skip]
pub static MACINTOSH_NAMES: [&str; 258] = [
    ".notdef", ".null", "nonmarkingreturn", "space", "exclam", "quotedbl",
    "numbersign", "dollar", "percent", "ampersand", "quotesingle",
    "parenleft", "parenright", "asterisk", "plus", "comma", "hyphen",
    "period", "slash", "zero", "one", "two", "three", "four", "five",
    "six", "seven", "eight", "nine", "colon", "semicolon", "less",
    "equal", "greater", "question", "at", "A", "B", "C", "D", "E", "F",
    "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S", "T",
    "U", "V", "W", "X", "Y", "Z", "bracketleft", "backslash",
    "bracketright", "asciicircum", "underscore", "grave", "a", "b", "c",
    "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o", "p", "q",
    "r", "s", "t", "u", "v", "w", "x", "y", "z", "braceleft", "bar",
    "braceright", "asciitilde", "Adieresis", "Aring", "Ccedilla",
    "Eacute", "Ntilde", "Odieresis", "Udieresis", "aacute", "agrave",
    "acircumflex", "adieresis", "atilde", "aring", "ccedilla", "eacute",
    "egrave", "ecircumflex", "edieresis", "iacute", "igrave",
    "icircumflex", "idieresis", "ntilde", "oacute", "ograve",
    "ocircumflex", "odieresis", "otilde", "uacute", "ugrave",
    "ucircumflex", "udieresis", "dagger", "degree", "cent", "sterling",
    "section", "bullet", "paragraph", "germandbls", "registered",
    "copyright", "trademark", "acute", "dieresis", "notequal", "AE",
    "Oslash", "infinity", "plusminus", "lessequal", "greaterequal",
    "yen", "mu", "partialdiff", "summation", "product", "pi", "integral",
    "ordfeminine", "ordmasculine", "Omega", "ae", "oslash",
    "questiondown", "exclamdown", "logicalnot", "radical", "florin",
    "approxequal", "Delta", "guillemotleft", "guillemotright",
    "ellipsis", "nonbreakingspace", "Agrave", "Atilde", "Otilde", "OE",
    "oe", "endash", "emdash", "quotedblleft", "quotedblright",
    "quoteleft", "quoteright", "divide", "lozenge", "ydieresis",
    "Ydieresis", "fraction", "currency", "guilsinglleft",
    "guilsinglright", "fi", "fl", "daggerdbl", "periodcentered",
    "quotesinglbase", "quotedblbase", "perthousand", "Acircumflex",
    "Ecircumflex", "Aacute", "Edieresis", "Egrave", "Iacute",
    "Icircumflex", "Idieresis", "Igrave", "Oacute", "Ocircumflex",
    "apple", "Ograve", "Uacute", "Ucircumflex", "Ugrave", "dotlessi",
    "circumflex", "tilde", "macron", "breve", "dotaccent", "ring",
    "cedilla", "hungarumlaut", "ogonek", "caron", "Lslash", "lslash",
    "Scaron", "scaron", "Zcaron", "zcaron", "brokenbar", "Eth", "eth",
    "Yacute", "yacute", "Thorn", "thorn", "minus", "multiply",
    "onesuperior", "twosuperior", "threesuperior", "onehalf",
    "onequarter", "threequarters", "franc", "Gbreve", "gbreve",
    "Idotaccent", "Scedilla", "scedilla", "Cacute", "cacute", "Ccaron",
    "ccaron", "dcroat",
];

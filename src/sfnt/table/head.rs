use crate::{
    cursor::{ByteCursor, ByteWriter},
    error::{FontError, FontResult},
    sfnt::data_types::{Fixed, FWord, LongDateTime},
};

use super::TableTag;

/// Required value of the magic number field.
pub const HEAD_MAGIC: u32 = 0x5F0F3CF5;

/// Byte offset of `checkSumAdjustment` within the encoded table, for the
/// container's whole-font fixup.
pub(crate) const CHECKSUM_ADJUSTMENT_OFFSET: usize = 8;

const HEAD_VERSION: u32 = 0x00010000;

/// Fixed 54-byte font header table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadTable {
    pub revision: Fixed,

    /// Recomputed by the container on every encode; the stored value is
    /// only meaningful on a freshly decoded font.
    pub checksum_adjustment: u32,

    pub flags: HeadFlags,
    pub units_per_em: u16,
    pub created: LongDateTime,
    pub modified: LongDateTime,
    pub x_min: FWord,
    pub y_min: FWord,
    pub x_max: FWord,
    pub y_max: FWord,
    pub mac_style: MacStyle,

    /// Smallest readable size in pixels
    pub lowest_rec_ppem: u16,

    pub font_direction_hint: i16,
    pub index_to_loc_format: IndexToLocFormat,
    pub glyph_data_format: i16,
}

/// - 0: Baseline at y = 0
/// - 1: Left sidebearing at x = 0
/// - 2: Instructions may depend on point size
/// - 3: Force ppem to integer values
/// - 4: Instructions may alter advance width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadFlags(pub u16);

impl HeadFlags {
    pub const BASELINE_AT_ZERO: u16 = 1 << 0;
    pub const LEFT_SIDEBEARING_AT_ZERO: u16 = 1 << 1;
    pub const INSTRUCTIONS_DEPEND_ON_POINT_SIZE: u16 = 1 << 2;
    pub const FORCE_INTEGER_PPEM: u16 = 1 << 3;
    pub const INSTRUCTIONS_ALTER_ADVANCE: u16 = 1 << 4;

    pub fn contains(self, mask: u16) -> bool {
        self.0 & mask != 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacStyle(pub u16);

impl MacStyle {
    pub const BOLD: u16 = 1 << 0;
    pub const ITALIC: u16 = 1 << 1;
    pub const UNDERLINE: u16 = 1 << 2;
    pub const OUTLINE: u16 = 1 << 3;
    pub const SHADOW: u16 = 1 << 4;
    pub const CONDENSED: u16 = 1 << 5;
    pub const EXTENDED: u16 = 1 << 6;

    pub fn contains(self, mask: u16) -> bool {
        self.0 & mask != 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexToLocFormat {
    Short,
    Long,
}

impl IndexToLocFormat {
    fn from_i16(value: i16) -> FontResult<Self> {
        match value {
            0 => Ok(Self::Short),
            1 => Ok(Self::Long),
            _ => Err(FontError::InvalidTable {
                tag: TableTag::HEAD,
                reason: "indexToLocFormat must be 0 or 1",
            }),
        }
    }

    fn to_i16(self) -> i16 {
        match self {
            Self::Short => 0,
            Self::Long => 1,
        }
    }
}

impl HeadTable {
    pub fn decode(data: &[u8]) -> FontResult<Self> {
        let mut cursor = ByteCursor::new(data);

        let version = cursor.read_u32()?;
        if version != HEAD_VERSION {
            return Err(FontError::UnsupportedVersion {
                tag: TableTag::HEAD,
                version,
            });
        }

        let revision = Fixed(cursor.read_i32()?);
        let checksum_adjustment = cursor.read_u32()?;

        let magic = cursor.read_u32()?;
        if magic != HEAD_MAGIC {
            return Err(FontError::InvalidTable {
                tag: TableTag::HEAD,
                reason: "bad magic number",
            });
        }

        let flags = HeadFlags(cursor.read_u16()?);
        let units_per_em = cursor.read_u16()?;
        let created = LongDateTime(cursor.read_i64()?);
        let modified = LongDateTime(cursor.read_i64()?);
        let x_min = FWord(cursor.read_i16()?);
        let y_min = FWord(cursor.read_i16()?);
        let x_max = FWord(cursor.read_i16()?);
        let y_max = FWord(cursor.read_i16()?);
        let mac_style = MacStyle(cursor.read_u16()?);
        let lowest_rec_ppem = cursor.read_u16()?;
        let font_direction_hint = cursor.read_i16()?;
        let index_to_loc_format = IndexToLocFormat::from_i16(cursor.read_i16()?)?;
        let glyph_data_format = cursor.read_i16()?;

        Ok(Self {
            revision,
            checksum_adjustment,
            flags,
            units_per_em,
            created,
            modified,
            x_min,
            y_min,
            x_max,
            y_max,
            mac_style,
            lowest_rec_ppem,
            font_direction_hint,
            index_to_loc_format,
            glyph_data_format,
        })
    }

    /// Encodes the fixed 54-byte layout with `checkSumAdjustment` zeroed.
    /// The container overwrites the field after the whole-font checksum is
    /// known.
    pub fn encode(&self) -> FontResult<Vec<u8>> {
        let mut writer = ByteWriter::new();

        writer.write_u32(HEAD_VERSION);
        writer.write_i32(self.revision.0);
        writer.write_u32(0); // checkSumAdjustment, backfilled by the container
        writer.write_u32(HEAD_MAGIC);
        writer.write_u16(self.flags.0);
        writer.write_u16(self.units_per_em);
        writer.write_i64(self.created.0);
        writer.write_i64(self.modified.0);
        writer.write_i16(self.x_min.0);
        writer.write_i16(self.y_min.0);
        writer.write_i16(self.x_max.0);
        writer.write_i16(self.y_max.0);
        writer.write_u16(self.mac_style.0);
        writer.write_u16(self.lowest_rec_ppem);
        writer.write_i16(self.font_direction_hint);
        writer.write_i16(self.index_to_loc_format.to_i16());
        writer.write_i16(self.glyph_data_format);

        Ok(writer.into_bytes())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample() -> HeadTable {
        HeadTable {
            revision: Fixed(0x00018000),
            checksum_adjustment: 0,
            flags: HeadFlags(HeadFlags::BASELINE_AT_ZERO | HeadFlags::LEFT_SIDEBEARING_AT_ZERO),
            units_per_em: 2048,
            created: LongDateTime(0x7654_3210),
            modified: LongDateTime(0x7654_4321),
            x_min: FWord(-120),
            y_min: FWord(-300),
            x_max: FWord(1900),
            y_max: FWord(1800),
            mac_style: MacStyle(MacStyle::BOLD),
            lowest_rec_ppem: 9,
            font_direction_hint: 2,
            index_to_loc_format: IndexToLocFormat::Short,
            glyph_data_format: 0,
        }
    }

    #[test]
    fn round_trip() {
        let head = sample();
        let bytes = head.encode().unwrap();

        assert_eq!(bytes.len(), 54);
        assert_eq!(HeadTable::decode(&bytes).unwrap(), head);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = sample().encode().unwrap();
        bytes[12] = 0;

        assert!(matches!(
            HeadTable::decode(&bytes),
            Err(FontError::InvalidTable { .. })
        ));
    }

    #[test]
    fn rejects_unknown_version() {
        let mut bytes = sample().encode().unwrap();
        bytes[0] = 0x02;

        assert!(matches!(
            HeadTable::decode(&bytes),
            Err(FontError::UnsupportedVersion { .. })
        ));
    }
}

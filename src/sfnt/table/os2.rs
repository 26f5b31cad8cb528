use log::warn;

use crate::{
    cursor::{ByteCursor, ByteWriter},
    error::{FontError, FontResult},
};

use super::TableTag;

const VERSION_1_LEN: usize = 8;
const VERSION_2_LEN: usize = 10;
const VERSION_5_LEN: usize = 4;

/// OS/2 and Windows metrics table, versions 0 through 5.
///
/// Version-0 fields are always present; each later tier is an optional
/// block. A table whose declared version promises more bytes than it
/// carries is downgraded to the highest fully-populated tier rather than
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Os2Table {
    pub version: u16,
    pub x_avg_char_width: i16,
    pub us_weight_class: u16,
    pub us_width_class: u16,
    pub fs_type: u16,
    pub y_subscript_x_size: i16,
    pub y_subscript_y_size: i16,
    pub y_subscript_x_offset: i16,
    pub y_subscript_y_offset: i16,
    pub y_superscript_x_size: i16,
    pub y_superscript_y_size: i16,
    pub y_superscript_x_offset: i16,
    pub y_superscript_y_offset: i16,
    pub y_strikeout_size: i16,
    pub y_strikeout_position: i16,
    pub s_family_class: i16,
    pub panose: [u8; 10],

    /// Two independently-maskable Unicode-range bitfield pairs. Pure flag
    /// storage; no behavior beyond read/write.
    pub ul_unicode_range: [u32; 4],

    pub ach_vend_id: [u8; 4],
    pub fs_selection: FsSelection,
    pub us_first_char_index: u16,
    pub us_last_char_index: u16,
    pub s_typo_ascender: i16,
    pub s_typo_descender: i16,
    pub s_typo_line_gap: i16,
    pub us_win_ascent: u16,
    pub us_win_descent: u16,

    pub v1: Option<Os2Version1>,
    pub v2: Option<Os2Version2>,
    pub v5: Option<Os2Version5>,
}

/// - 0: Italic
/// - 5: Bold
/// - 6: Regular
/// - 7: Use typo metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FsSelection(pub u16);

impl FsSelection {
    pub const ITALIC: u16 = 1 << 0;
    pub const BOLD: u16 = 1 << 5;
    pub const REGULAR: u16 = 1 << 6;
    pub const USE_TYPO_METRICS: u16 = 1 << 7;

    pub fn contains(self, mask: u16) -> bool {
        self.0 & mask != 0
    }
}

/// Version-1 additions: code-page range bitfields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Os2Version1 {
    pub ul_code_page_range1: u32,
    pub ul_code_page_range2: u32,
}

/// Version-2 additions (shared by versions 2 through 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Os2Version2 {
    pub sx_height: i16,
    pub s_cap_height: i16,
    pub us_default_char: u16,
    pub us_break_char: u16,
    pub us_max_context: u16,
}

/// Version-5 additions: optical point-size bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Os2Version5 {
    pub us_lower_optical_point_size: u16,
    pub us_upper_optical_point_size: u16,
}

impl Os2Table {
    pub fn decode(data: &[u8]) -> FontResult<Self> {
        let mut cursor = ByteCursor::new(data);

        let declared = cursor.read_u16()?;
        if declared > 5 {
            return Err(FontError::UnsupportedVersion {
                tag: TableTag::OS2,
                version: u32::from(declared),
            });
        }

        let x_avg_char_width = cursor.read_i16()?;
        let us_weight_class = cursor.read_u16()?;
        let us_width_class = cursor.read_u16()?;
        let fs_type = cursor.read_u16()?;
        let y_subscript_x_size = cursor.read_i16()?;
        let y_subscript_y_size = cursor.read_i16()?;
        let y_subscript_x_offset = cursor.read_i16()?;
        let y_subscript_y_offset = cursor.read_i16()?;
        let y_superscript_x_size = cursor.read_i16()?;
        let y_superscript_y_size = cursor.read_i16()?;
        let y_superscript_x_offset = cursor.read_i16()?;
        let y_superscript_y_offset = cursor.read_i16()?;
        let y_strikeout_size = cursor.read_i16()?;
        let y_strikeout_position = cursor.read_i16()?;
        let s_family_class = cursor.read_i16()?;

        let mut panose = [0u8; 10];
        panose.copy_from_slice(cursor.read_bytes(10)?);

        let ul_unicode_range = [
            cursor.read_u32()?,
            cursor.read_u32()?,
            cursor.read_u32()?,
            cursor.read_u32()?,
        ];

        let mut ach_vend_id = [0u8; 4];
        ach_vend_id.copy_from_slice(cursor.read_bytes(4)?);

        let fs_selection = FsSelection(cursor.read_u16()?);
        let us_first_char_index = cursor.read_u16()?;
        let us_last_char_index = cursor.read_u16()?;
        let s_typo_ascender = cursor.read_i16()?;
        let s_typo_descender = cursor.read_i16()?;
        let s_typo_line_gap = cursor.read_i16()?;
        let us_win_ascent = cursor.read_u16()?;
        let us_win_descent = cursor.read_u16()?;

        // each later tier is read only if the declared version promises it
        // AND the bytes are actually there; otherwise the version is
        // downgraded to the tier below and decoding continues
        let mut version = declared;
        let mut v1 = None;
        let mut v2 = None;
        let mut v5 = None;

        if version >= 1 {
            if cursor.remaining() >= VERSION_1_LEN {
                v1 = Some(Os2Version1 {
                    ul_code_page_range1: cursor.read_u32()?,
                    ul_code_page_range2: cursor.read_u32()?,
                });
            } else {
                version = 0;
            }
        }

        if version >= 2 {
            if cursor.remaining() >= VERSION_2_LEN {
                v2 = Some(Os2Version2 {
                    sx_height: cursor.read_i16()?,
                    s_cap_height: cursor.read_i16()?,
                    us_default_char: cursor.read_u16()?,
                    us_break_char: cursor.read_u16()?,
                    us_max_context: cursor.read_u16()?,
                });
            } else {
                version = 1;
            }
        }

        if version >= 5 {
            if cursor.remaining() >= VERSION_5_LEN {
                v5 = Some(Os2Version5 {
                    us_lower_optical_point_size: cursor.read_u16()?,
                    us_upper_optical_point_size: cursor.read_u16()?,
                });
            } else {
                version = 2;
            }
        }

        if version != declared {
            warn!(
                "OS/2 table declared version {} but only carries version {} fields",
                declared, version
            );
        }

        Ok(Self {
            version,
            x_avg_char_width,
            us_weight_class,
            us_width_class,
            fs_type,
            y_subscript_x_size,
            y_subscript_y_size,
            y_subscript_x_offset,
            y_subscript_y_offset,
            y_superscript_x_size,
            y_superscript_y_size,
            y_superscript_x_offset,
            y_superscript_y_offset,
            y_strikeout_size,
            y_strikeout_position,
            s_family_class,
            panose,
            ul_unicode_range,
            ach_vend_id,
            fs_selection,
            us_first_char_index,
            us_last_char_index,
            s_typo_ascender,
            s_typo_descender,
            s_typo_line_gap,
            us_win_ascent,
            us_win_descent,
            v1,
            v2,
            v5,
        })
    }

    pub fn encode(&self) -> FontResult<Vec<u8>> {
        let missing_tier = || FontError::InvalidTable {
            tag: TableTag::OS2,
            reason: "version promises fields that are not populated",
        };

        let mut writer = ByteWriter::new();

        writer.write_u16(self.version);
        writer.write_i16(self.x_avg_char_width);
        writer.write_u16(self.us_weight_class);
        writer.write_u16(self.us_width_class);
        writer.write_u16(self.fs_type);
        writer.write_i16(self.y_subscript_x_size);
        writer.write_i16(self.y_subscript_y_size);
        writer.write_i16(self.y_subscript_x_offset);
        writer.write_i16(self.y_subscript_y_offset);
        writer.write_i16(self.y_superscript_x_size);
        writer.write_i16(self.y_superscript_y_size);
        writer.write_i16(self.y_superscript_x_offset);
        writer.write_i16(self.y_superscript_y_offset);
        writer.write_i16(self.y_strikeout_size);
        writer.write_i16(self.y_strikeout_position);
        writer.write_i16(self.s_family_class);
        writer.write_bytes(&self.panose);

        for range in self.ul_unicode_range {
            writer.write_u32(range);
        }

        writer.write_bytes(&self.ach_vend_id);
        writer.write_u16(self.fs_selection.0);
        writer.write_u16(self.us_first_char_index);
        writer.write_u16(self.us_last_char_index);
        writer.write_i16(self.s_typo_ascender);
        writer.write_i16(self.s_typo_descender);
        writer.write_i16(self.s_typo_line_gap);
        writer.write_u16(self.us_win_ascent);
        writer.write_u16(self.us_win_descent);

        if self.version >= 1 {
            let v1 = self.v1.as_ref().ok_or_else(missing_tier)?;
            writer.write_u32(v1.ul_code_page_range1);
            writer.write_u32(v1.ul_code_page_range2);
        }

        if self.version >= 2 {
            let v2 = self.v2.as_ref().ok_or_else(missing_tier)?;
            writer.write_i16(v2.sx_height);
            writer.write_i16(v2.s_cap_height);
            writer.write_u16(v2.us_default_char);
            writer.write_u16(v2.us_break_char);
            writer.write_u16(v2.us_max_context);
        }

        if self.version >= 5 {
            let v5 = self.v5.as_ref().ok_or_else(missing_tier)?;
            writer.write_u16(v5.us_lower_optical_point_size);
            writer.write_u16(v5.us_upper_optical_point_size);
        }

        Ok(writer.into_bytes())
    }
}

use crate::{
    cursor::{ByteCursor, ByteWriter},
    error::{FontError, FontResult},
    sfnt::data_types::Fixed,
};

use super::TableTag;

const VERSION_0_5: u32 = 0x00005000;
const VERSION_1_0: u32 = 0x00010000;

/// Maximum profile table.
///
/// Version 0.5 carries only the glyph count; version 1.0 adds the
/// TrueType-interpreter limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaxpTable {
    /// the number of glyphs in the font
    pub num_glyphs: u16,

    /// Present iff the table is version 1.0.
    pub profile: Option<TrueTypeProfile>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrueTypeProfile {
    /// points in non-compound glyph
    pub max_points: u16,
    /// contours in non-compound glyph
    pub max_contours: u16,
    /// points in compound glyph
    pub max_component_points: u16,
    /// contours in compound glyph
    pub max_component_contours: u16,
    /// set to 2
    pub max_zones: u16,
    /// points used in Twilight Zone (Z0)
    pub max_twilight_points: u16,
    /// number of Storage Area locations
    pub max_storage: u16,
    /// number of FDEFs
    pub max_function_defs: u16,
    /// number of IDEFs
    pub max_instruction_defs: u16,
    /// maximum stack depth
    pub max_stack_elements: u16,
    /// byte count for glyph instructions
    pub max_size_of_instructions: u16,
    /// number of glyphs referenced at top level
    pub max_component_elements: u16,
    /// levels of recursion, set to 0 if font has only simple glyphs
    pub max_component_depth: u16,
}

impl MaxpTable {
    pub fn decode(data: &[u8]) -> FontResult<Self> {
        let mut cursor = ByteCursor::new(data);

        let version = cursor.read_u32()?;
        let num_glyphs = cursor.read_u16()?;

        let profile = match version {
            VERSION_0_5 => None,
            VERSION_1_0 => Some(TrueTypeProfile {
                max_points: cursor.read_u16()?,
                max_contours: cursor.read_u16()?,
                max_component_points: cursor.read_u16()?,
                max_component_contours: cursor.read_u16()?,
                max_zones: cursor.read_u16()?,
                max_twilight_points: cursor.read_u16()?,
                max_storage: cursor.read_u16()?,
                max_function_defs: cursor.read_u16()?,
                max_instruction_defs: cursor.read_u16()?,
                max_stack_elements: cursor.read_u16()?,
                max_size_of_instructions: cursor.read_u16()?,
                max_component_elements: cursor.read_u16()?,
                max_component_depth: cursor.read_u16()?,
            }),
            _ => {
                return Err(FontError::UnsupportedVersion {
                    tag: TableTag::MAXP,
                    version,
                })
            }
        };

        Ok(Self {
            num_glyphs,
            profile,
        })
    }

    pub fn encode(&self) -> FontResult<Vec<u8>> {
        let mut writer = ByteWriter::new();

        writer.write_u32(match self.profile {
            Some(_) => VERSION_1_0,
            None => VERSION_0_5,
        });
        writer.write_u16(self.num_glyphs);

        if let Some(profile) = &self.profile {
            writer.write_u16(profile.max_points);
            writer.write_u16(profile.max_contours);
            writer.write_u16(profile.max_component_points);
            writer.write_u16(profile.max_component_contours);
            writer.write_u16(profile.max_zones);
            writer.write_u16(profile.max_twilight_points);
            writer.write_u16(profile.max_storage);
            writer.write_u16(profile.max_function_defs);
            writer.write_u16(profile.max_instruction_defs);
            writer.write_u16(profile.max_stack_elements);
            writer.write_u16(profile.max_size_of_instructions);
            writer.write_u16(profile.max_component_elements);
            writer.write_u16(profile.max_component_depth);
        }

        Ok(writer.into_bytes())
    }

    pub fn version(&self) -> Fixed {
        Fixed(match self.profile {
            Some(_) => VERSION_1_0 as i32,
            None => VERSION_0_5 as i32,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn version_0_5_round_trip() {
        let maxp = MaxpTable {
            num_glyphs: 37,
            profile: None,
        };

        let bytes = maxp.encode().unwrap();
        assert_eq!(bytes.len(), 6);
        assert_eq!(MaxpTable::decode(&bytes).unwrap(), maxp);
    }

    #[test]
    fn version_1_0_round_trip() {
        let maxp = MaxpTable {
            num_glyphs: 258,
            profile: Some(TrueTypeProfile {
                max_points: 120,
                max_contours: 30,
                max_component_points: 140,
                max_component_contours: 32,
                max_zones: 2,
                max_twilight_points: 16,
                max_storage: 64,
                max_function_defs: 10,
                max_instruction_defs: 0,
                max_stack_elements: 256,
                max_size_of_instructions: 400,
                max_component_elements: 4,
                max_component_depth: 1,
            }),
        };

        let bytes = maxp.encode().unwrap();
        assert_eq!(bytes.len(), 32);
        assert_eq!(MaxpTable::decode(&bytes).unwrap(), maxp);
    }

    #[test]
    fn rejects_unknown_version() {
        let bytes = [0x00, 0x02, 0x00, 0x00, 0x00, 0x05];

        assert!(matches!(
            MaxpTable::decode(&bytes),
            Err(FontError::UnsupportedVersion { .. })
        ));
    }
}

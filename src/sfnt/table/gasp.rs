use crate::{
    cursor::{ByteCursor, ByteWriter},
    error::{FontError, FontResult},
};

use super::TableTag;

/// Grid-fitting and scan-conversion procedure table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GaspTable {
    pub version: u16,

    /// Sorted ascending by `max_ppem`; the last range conventionally
    /// covers up to 0xFFFF.
    pub ranges: Vec<GaspRange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GaspRange {
    pub max_ppem: u16,
    pub behavior: GaspBehavior,
}

/// - 0: gridfit
/// - 1: grayscale
/// - 2: symmetric gridfit (version 1 only)
/// - 3: symmetric smoothing (version 1 only)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GaspBehavior(pub u16);

impl GaspBehavior {
    pub const GRIDFIT: u16 = 1 << 0;
    pub const DOGRAY: u16 = 1 << 1;
    pub const SYMMETRIC_GRIDFIT: u16 = 1 << 2;
    pub const SYMMETRIC_SMOOTHING: u16 = 1 << 3;

    pub fn contains(self, mask: u16) -> bool {
        self.0 & mask != 0
    }

    fn mask_for_version(version: u16) -> u16 {
        match version {
            0 => Self::GRIDFIT | Self::DOGRAY,
            _ => Self::GRIDFIT | Self::DOGRAY | Self::SYMMETRIC_GRIDFIT | Self::SYMMETRIC_SMOOTHING,
        }
    }
}

impl GaspTable {
    pub fn decode(data: &[u8]) -> FontResult<Self> {
        let mut cursor = ByteCursor::new(data);

        let version = cursor.read_u16()?;
        if version > 1 {
            return Err(FontError::UnsupportedVersion {
                tag: TableTag::GASP,
                version: u32::from(version),
            });
        }

        let num_ranges = cursor.read_u16()?;
        let mask = GaspBehavior::mask_for_version(version);

        let mut ranges = Vec::with_capacity(usize::from(num_ranges));
        for _ in 0..num_ranges {
            let max_ppem = cursor.read_u16()?;
            let behavior = GaspBehavior(cursor.read_u16()? & mask);

            ranges.push(GaspRange { max_ppem, behavior });
        }

        Ok(Self { version, ranges })
    }

    pub fn encode(&self) -> FontResult<Vec<u8>> {
        if !self
            .ranges
            .windows(2)
            .all(|pair| pair[0].max_ppem < pair[1].max_ppem)
        {
            return Err(FontError::InvalidTable {
                tag: TableTag::GASP,
                reason: "ranges are not sorted ascending by max ppem",
            });
        }

        let mask = GaspBehavior::mask_for_version(self.version);

        let mut writer = ByteWriter::new();
        writer.write_u16(self.version);
        writer.write_u16(self.ranges.len() as u16);

        for range in &self.ranges {
            writer.write_u16(range.max_ppem);
            writer.write_u16(range.behavior.0 & mask);
        }

        Ok(writer.into_bytes())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_trip() {
        let gasp = GaspTable {
            version: 1,
            ranges: vec![
                GaspRange {
                    max_ppem: 8,
                    behavior: GaspBehavior(GaspBehavior::DOGRAY),
                },
                GaspRange {
                    max_ppem: 0xFFFF,
                    behavior: GaspBehavior(
                        GaspBehavior::GRIDFIT | GaspBehavior::SYMMETRIC_GRIDFIT,
                    ),
                },
            ],
        };

        let bytes = gasp.encode().unwrap();
        assert_eq!(GaspTable::decode(&bytes).unwrap(), gasp);
    }

    #[test]
    fn version_0_masks_symmetric_bits() {
        let mut writer = ByteWriter::new();
        writer.write_u16(0); // version
        writer.write_u16(1); // numRanges
        writer.write_u16(0xFFFF);
        writer.write_u16(0x000F); // all four behavior bits set

        let gasp = GaspTable::decode(writer.bytes()).unwrap();

        assert_eq!(gasp.ranges[0].behavior.0, 0x0003);
    }

    #[test]
    fn encode_rejects_unsorted_ranges() {
        let gasp = GaspTable {
            version: 0,
            ranges: vec![
                GaspRange {
                    max_ppem: 16,
                    behavior: GaspBehavior(GaspBehavior::GRIDFIT),
                },
                GaspRange {
                    max_ppem: 8,
                    behavior: GaspBehavior(GaspBehavior::DOGRAY),
                },
            ],
        };

        assert!(matches!(
            gasp.encode(),
            Err(FontError::InvalidTable { .. })
        ));
    }
}

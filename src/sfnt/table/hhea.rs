use crate::{
    cursor::{ByteCursor, ByteWriter},
    error::{FontError, FontResult},
    sfnt::data_types::{Fixed, FWord},
};

use super::{hmtx::HmtxTable, TableTag};

const HHEA_VERSION: u32 = 0x00010000;

/// Horizontal header table.
///
/// `ascender`/`descender`/`line_gap` carry author intent and are never
/// recomputed. The metrics-derived fields are kept consistent with the
/// paired hmtx table on encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HheaTable {
    pub ascender: FWord,
    pub descender: FWord,
    pub line_gap: FWord,
    pub advance_width_max: u16,
    pub min_left_side_bearing: i16,
    pub min_right_side_bearing: i16,
    pub x_max_extent: i16,
    pub caret_slope_rise: i16,
    pub caret_slope_run: i16,
    pub caret_offset: i16,
    pub metric_data_format: i16,

    /// Count of explicit (advanceWidth, leftSideBearing) pairs in hmtx.
    /// Recomputed from the paired hmtx table on write, never trusted from
    /// the original bytes.
    pub number_of_h_metrics: u16,
}

impl HheaTable {
    pub fn decode(data: &[u8]) -> FontResult<Self> {
        let mut cursor = ByteCursor::new(data);

        let version = cursor.read_u32()?;
        if version != HHEA_VERSION {
            return Err(FontError::UnsupportedVersion {
                tag: TableTag::HHEA,
                version,
            });
        }

        let ascender = FWord(cursor.read_i16()?);
        let descender = FWord(cursor.read_i16()?);
        let line_gap = FWord(cursor.read_i16()?);
        let advance_width_max = cursor.read_u16()?;
        let min_left_side_bearing = cursor.read_i16()?;
        let min_right_side_bearing = cursor.read_i16()?;
        let x_max_extent = cursor.read_i16()?;
        let caret_slope_rise = cursor.read_i16()?;
        let caret_slope_run = cursor.read_i16()?;
        let caret_offset = cursor.read_i16()?;

        // four reserved words, set to 0
        for _ in 0..4 {
            cursor.read_i16()?;
        }

        let metric_data_format = cursor.read_i16()?;
        let number_of_h_metrics = cursor.read_u16()?;

        Ok(Self {
            ascender,
            descender,
            line_gap,
            advance_width_max,
            min_left_side_bearing,
            min_right_side_bearing,
            x_max_extent,
            caret_slope_rise,
            caret_slope_run,
            caret_offset,
            metric_data_format,
            number_of_h_metrics,
        })
    }

    /// Encodes the table, refreshing the metrics-derived fields from the
    /// paired hmtx table when one is present.
    pub fn encode(&self, hmtx: Option<&HmtxTable>) -> FontResult<Vec<u8>> {
        let mut refreshed = self.clone();

        if let Some(hmtx) = hmtx {
            refreshed.number_of_h_metrics = hmtx.number_of_h_metrics();
            if let Some(max) = hmtx.advance_width_max() {
                refreshed.advance_width_max = max;
            }
            if let Some(min) = hmtx.min_left_side_bearing() {
                refreshed.min_left_side_bearing = min;
            }
        }

        let mut writer = ByteWriter::new();

        writer.write_u32(HHEA_VERSION);
        writer.write_i16(refreshed.ascender.0);
        writer.write_i16(refreshed.descender.0);
        writer.write_i16(refreshed.line_gap.0);
        writer.write_u16(refreshed.advance_width_max);
        writer.write_i16(refreshed.min_left_side_bearing);
        writer.write_i16(refreshed.min_right_side_bearing);
        writer.write_i16(refreshed.x_max_extent);
        writer.write_i16(refreshed.caret_slope_rise);
        writer.write_i16(refreshed.caret_slope_run);
        writer.write_i16(refreshed.caret_offset);

        for _ in 0..4 {
            writer.write_i16(0);
        }

        writer.write_i16(refreshed.metric_data_format);
        writer.write_u16(refreshed.number_of_h_metrics);

        Ok(writer.into_bytes())
    }

    pub fn version(&self) -> Fixed {
        Fixed(HHEA_VERSION as i32)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sfnt::table::hmtx::LongHorMetric;

    fn sample() -> HheaTable {
        HheaTable {
            ascender: FWord(1600),
            descender: FWord(-400),
            line_gap: FWord(90),
            advance_width_max: 2000,
            min_left_side_bearing: -50,
            min_right_side_bearing: -10,
            x_max_extent: 1950,
            caret_slope_rise: 1,
            caret_slope_run: 0,
            caret_offset: 0,
            metric_data_format: 0,
            number_of_h_metrics: 3,
        }
    }

    #[test]
    fn round_trip() {
        let hhea = sample();
        let bytes = hhea.encode(None).unwrap();

        assert_eq!(bytes.len(), 36);
        assert_eq!(HheaTable::decode(&bytes).unwrap(), hhea);
    }

    #[test]
    fn encode_refreshes_metric_fields_from_hmtx() {
        let hmtx = HmtxTable {
            metrics: vec![
                LongHorMetric {
                    advance_width: 600,
                    left_side_bearing: 20,
                },
                LongHorMetric {
                    advance_width: 2400,
                    left_side_bearing: -80,
                },
            ],
            trailing_bearings: vec![5],
        };

        let bytes = sample().encode(Some(&hmtx)).unwrap();
        let decoded = HheaTable::decode(&bytes).unwrap();

        assert_eq!(decoded.number_of_h_metrics, 2);
        assert_eq!(decoded.advance_width_max, 2400);
        assert_eq!(decoded.min_left_side_bearing, -80);
    }
}

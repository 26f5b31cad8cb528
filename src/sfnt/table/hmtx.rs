use crate::{
    cursor::{ByteCursor, ByteWriter},
    error::FontResult,
};

/// One explicit horizontal metric pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongHorMetric {
    pub advance_width: u16,
    pub left_side_bearing: i16,
}

/// Horizontal metrics table.
///
/// The wire format stores `numberOfHMetrics` explicit pairs followed by
/// bearing-only entries for the remaining glyphs, each reusing the last
/// explicit advance width. `numberOfHMetrics == 1` is the monospace
/// special case: one shared width, per-glyph bearings only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HmtxTable {
    pub metrics: Vec<LongHorMetric>,
    pub trailing_bearings: Vec<i16>,
}

impl HmtxTable {
    /// Decoding needs the explicit-pair count from hhea and the glyph
    /// count from maxp; the container resolves both before calling.
    pub fn decode(data: &[u8], number_of_h_metrics: u16, num_glyphs: u16) -> FontResult<Self> {
        let mut cursor = ByteCursor::new(data);

        let mut metrics = Vec::with_capacity(usize::from(number_of_h_metrics));
        for _ in 0..number_of_h_metrics {
            let advance_width = cursor.read_u16()?;
            let left_side_bearing = cursor.read_i16()?;

            metrics.push(LongHorMetric {
                advance_width,
                left_side_bearing,
            });
        }

        let trailing = num_glyphs.saturating_sub(number_of_h_metrics);
        let mut trailing_bearings = Vec::with_capacity(usize::from(trailing));
        for _ in 0..trailing {
            trailing_bearings.push(cursor.read_i16()?);
        }

        Ok(Self {
            metrics,
            trailing_bearings,
        })
    }

    pub fn encode(&self) -> FontResult<Vec<u8>> {
        let mut writer = ByteWriter::new();

        for metric in &self.metrics {
            writer.write_u16(metric.advance_width);
            writer.write_i16(metric.left_side_bearing);
        }

        for &bearing in &self.trailing_bearings {
            writer.write_i16(bearing);
        }

        Ok(writer.into_bytes())
    }

    pub fn number_of_h_metrics(&self) -> u16 {
        self.metrics.len() as u16
    }

    pub fn num_glyphs(&self) -> usize {
        self.metrics.len() + self.trailing_bearings.len()
    }

    /// Advance width for a glyph; glyphs beyond the explicit pairs reuse
    /// the last explicit advance width.
    pub fn advance_width(&self, glyph_id: u16) -> Option<u16> {
        let glyph_id = usize::from(glyph_id);

        if glyph_id < self.metrics.len() {
            return Some(self.metrics[glyph_id].advance_width);
        }

        if glyph_id < self.num_glyphs() {
            return self.metrics.last().map(|metric| metric.advance_width);
        }

        None
    }

    pub fn left_side_bearing(&self, glyph_id: u16) -> Option<i16> {
        let glyph_id = usize::from(glyph_id);

        if glyph_id < self.metrics.len() {
            return Some(self.metrics[glyph_id].left_side_bearing);
        }

        self.trailing_bearings
            .get(glyph_id - self.metrics.len())
            .copied()
    }

    pub(crate) fn advance_width_max(&self) -> Option<u16> {
        self.metrics.iter().map(|metric| metric.advance_width).max()
    }

    pub(crate) fn min_left_side_bearing(&self) -> Option<i16> {
        self.metrics
            .iter()
            .map(|metric| metric.left_side_bearing)
            .chain(self.trailing_bearings.iter().copied())
            .min()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn monospace_expansion() {
        // one explicit pair, nine bearing-only entries
        let mut bytes = vec![0x02, 0x58, 0x00, 0x05];
        for bearing in 1..=9i16 {
            bytes.extend_from_slice(&bearing.to_be_bytes());
        }

        let hmtx = HmtxTable::decode(&bytes, 1, 10).unwrap();

        assert_eq!(hmtx.num_glyphs(), 10);
        for glyph_id in 0..10 {
            assert_eq!(hmtx.advance_width(glyph_id), Some(600));
        }
        assert_eq!(hmtx.left_side_bearing(0), Some(5));
        for glyph_id in 1..10u16 {
            assert_eq!(hmtx.left_side_bearing(glyph_id), Some(glyph_id as i16));
        }
    }

    #[test]
    fn round_trip() {
        let hmtx = HmtxTable {
            metrics: vec![
                LongHorMetric {
                    advance_width: 500,
                    left_side_bearing: 10,
                },
                LongHorMetric {
                    advance_width: 650,
                    left_side_bearing: -4,
                },
            ],
            trailing_bearings: vec![7, 8],
        };

        let bytes = hmtx.encode().unwrap();
        let decoded = HmtxTable::decode(&bytes, 2, 4).unwrap();

        assert_eq!(decoded, hmtx);
    }

    #[test]
    fn out_of_range_glyph() {
        let hmtx = HmtxTable {
            metrics: vec![LongHorMetric {
                advance_width: 500,
                left_side_bearing: 10,
            }],
            trailing_bearings: vec![],
        };

        assert_eq!(hmtx.advance_width(1), None);
        assert_eq!(hmtx.left_side_bearing(1), None);
    }
}

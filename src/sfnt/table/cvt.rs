use crate::{
    cursor::{ByteCursor, ByteWriter},
    error::{FontError, FontResult},
};

use super::TableTag;

/// Control value table: a flat array of signed 16-bit values with no
/// structure beyond the element count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CvtTable {
    pub values: Vec<i16>,
}

impl CvtTable {
    pub fn decode(data: &[u8]) -> FontResult<Self> {
        // an odd byte count cannot round-trip through a list of words
        if data.len() % 2 != 0 {
            return Err(FontError::TruncatedData {
                tag: TableTag::CVT,
            });
        }

        let mut cursor = ByteCursor::new(data);

        let mut values = Vec::with_capacity(data.len() / 2);
        while !cursor.is_at_end() {
            values.push(cursor.read_i16()?);
        }

        Ok(Self { values })
    }

    pub fn encode(&self) -> FontResult<Vec<u8>> {
        let mut writer = ByteWriter::new();

        for &value in &self.values {
            writer.write_i16(value);
        }

        Ok(writer.into_bytes())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_trip() {
        let cvt = CvtTable {
            values: vec![0, -40, 512, 88],
        };

        let bytes = cvt.encode().unwrap();
        assert_eq!(bytes.len(), 8);
        assert_eq!(CvtTable::decode(&bytes).unwrap(), cvt);
    }

    #[test]
    fn odd_length_is_truncated() {
        assert!(matches!(
            CvtTable::decode(&[0x00, 0x01, 0x02]),
            Err(FontError::TruncatedData { .. })
        ));
    }
}

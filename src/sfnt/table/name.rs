use crate::{
    cursor::{ByteCursor, ByteWriter},
    error::{FontError, FontResult},
};

use super::TableTag;

/// Naming table, format 0.
///
/// Record strings are kept as raw storage bytes; their encoding depends on
/// the record's platform. Format 1 (language-tag records) is left to the
/// opaque pass-through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTable {
    pub records: Vec<NameRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRecord {
    /// Platform identifier code.
    pub platform_id: u16,
    /// Platform-specific encoding identifier.
    pub encoding_id: u16,
    /// Language identifier.
    pub language_id: u16,
    /// Name identifier.
    pub name_id: u16,
    /// Raw string bytes from the storage area.
    pub value: Vec<u8>,
}

pub mod name_id {
    pub const FAMILY: u16 = 1;
    pub const SUBFAMILY: u16 = 2;
    pub const UNIQUE_ID: u16 = 3;
    pub const FULL_NAME: u16 = 4;
    pub const VERSION: u16 = 5;
    pub const POSTSCRIPT_NAME: u16 = 6;
}

impl NameTable {
    pub fn decode(data: &[u8]) -> FontResult<Self> {
        let mut cursor = ByteCursor::new(data);

        let format = cursor.read_u16()?;
        if format != 0 {
            return Err(FontError::UnsupportedVersion {
                tag: TableTag::NAME,
                version: u32::from(format),
            });
        }

        let count = cursor.read_u16()?;
        let string_offset = usize::from(cursor.read_u16()?);

        let mut records = Vec::with_capacity(usize::from(count));
        for _ in 0..count {
            let platform_id = cursor.read_u16()?;
            let encoding_id = cursor.read_u16()?;
            let language_id = cursor.read_u16()?;
            let name_id = cursor.read_u16()?;
            let length = usize::from(cursor.read_u16()?);
            let offset = usize::from(cursor.read_u16()?);

            let start = string_offset + offset;
            let value = data
                .get(start..start + length)
                .ok_or(FontError::TruncatedData {
                    tag: TableTag::NAME,
                })?
                .to_vec();

            records.push(NameRecord {
                platform_id,
                encoding_id,
                language_id,
                name_id,
                value,
            });
        }

        Ok(Self { records })
    }

    /// Encodes format 0, re-packing string storage sequentially in record
    /// order.
    pub fn encode(&self) -> FontResult<Vec<u8>> {
        let mut writer = ByteWriter::new();

        writer.write_u16(0); // format
        writer.write_u16(self.records.len() as u16);
        writer.write_u16(6 + 12 * self.records.len() as u16); // stringOffset

        let mut offset = 0usize;
        for record in &self.records {
            writer.write_u16(record.platform_id);
            writer.write_u16(record.encoding_id);
            writer.write_u16(record.language_id);
            writer.write_u16(record.name_id);
            writer.write_u16(record.value.len() as u16);
            writer.write_u16(offset as u16);

            offset += record.value.len();
        }

        for record in &self.records {
            writer.write_bytes(&record.value);
        }

        Ok(writer.into_bytes())
    }

    /// First record with the given name id, preferring Unicode-decodable
    /// platforms.
    pub fn find(&self, name_id: u16) -> Option<&NameRecord> {
        self.records
            .iter()
            .find(|record| record.name_id == name_id && record.is_unicode())
            .or_else(|| self.records.iter().find(|record| record.name_id == name_id))
    }
}

impl NameRecord {
    /// Unicode (0) and Windows (3) platforms store UTF-16BE.
    pub fn is_unicode(&self) -> bool {
        matches!(self.platform_id, 0 | 3)
    }

    /// Decodes the record's value for display. UTF-16BE for Unicode
    /// platforms, a lossy byte-per-char fallback otherwise.
    pub fn to_string_lossy(&self) -> String {
        if self.is_unicode() {
            let units: Vec<u16> = self
                .value
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();

            String::from_utf16_lossy(&units)
        } else {
            self.value.iter().map(|&byte| byte as char).collect()
        }
    }
}

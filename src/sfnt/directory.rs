use crate::{
    cursor::{ByteCursor, ByteWriter},
    error::{FontError, FontResult},
};

use super::table::TableTag;

/// Container format tags this codec accepts.
pub mod format {
    /// Windows-style TrueType outlines (version 1.0).
    pub const TRUE_TYPE: u32 = 0x00010000;
    /// 'true', Apple-style TrueType.
    pub const APPLE_TRUE: u32 = 0x74727565;
    /// 'OTTO', CFF outlines.
    pub const OPEN_TYPE: u32 = 0x4F54544F;
    /// 'typ1', PostScript Type 1 wrapped in sfnt.
    pub const TYPE_1: u32 = 0x74797031;
}

pub(crate) const HEADER_LEN: usize = 12;
pub(crate) const ENTRY_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetSubtable {
    pub format: u32,
    pub number_of_tables: u16,

    /// the largest power of two less than or equal to the number of items
    /// in the table, times 16, i.e. the largest number of items that can
    /// be easily searched
    pub search_range: u16,

    /// log2(maximum power of 2 <= numTables)
    pub entry_selector: u16,

    /// numTables * 16 - searchRange
    pub range_shift: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub tag: TableTag,
    pub checksum: u32,
    /// From the start of the file.
    pub offset: u32,
    /// Unpadded size; tables are padded to 4-byte boundaries on disk.
    pub length: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDirectory {
    pub offset_subtable: OffsetSubtable,
    pub entries: Vec<DirectoryEntry>,
}

impl TableDirectory {
    /// Reads the fixed 12-byte header and the directory records. Table
    /// contents are not interpreted here.
    pub fn decode(cursor: &mut ByteCursor) -> FontResult<Self> {
        let format = cursor.read_u32()?;
        if !matches!(
            format,
            format::TRUE_TYPE | format::APPLE_TRUE | format::OPEN_TYPE | format::TYPE_1
        ) {
            return Err(FontError::MalformedHeader {
                reason: format!("unrecognized container format tag {:#010x}", format),
            });
        }

        let number_of_tables = cursor.read_u16()?;
        let search_range = cursor.read_u16()?;
        let entry_selector = cursor.read_u16()?;
        let range_shift = cursor.read_u16()?;

        let mut entries = Vec::with_capacity(usize::from(number_of_tables));
        for _ in 0..number_of_tables {
            let tag = TableTag::from_u32(cursor.read_u32()?);
            let checksum = cursor.read_u32()?;
            let offset = cursor.read_u32()?;
            let length = cursor.read_u32()?;

            entries.push(DirectoryEntry {
                tag,
                checksum,
                offset,
                length,
            });
        }

        Ok(Self {
            offset_subtable: OffsetSubtable {
                format,
                number_of_tables,
                search_range,
                entry_selector,
                range_shift,
            },
            entries,
        })
    }

    pub fn find(&self, tag: TableTag) -> Option<&DirectoryEntry> {
        self.entries.iter().find(|entry| entry.tag == tag)
    }

    /// Serializes the header and records. The binary-search hint fields
    /// are recomputed from the table count, never copied; records are
    /// written sorted ascending by tag.
    pub fn encode(format: u32, entries: &[DirectoryEntry]) -> Vec<u8> {
        let (search_range, entry_selector, range_shift) = search_fields(entries.len() as u16);

        let mut writer = ByteWriter::new();
        writer.write_u32(format);
        writer.write_u16(entries.len() as u16);
        writer.write_u16(search_range);
        writer.write_u16(entry_selector);
        writer.write_u16(range_shift);

        let mut sorted: Vec<&DirectoryEntry> = entries.iter().collect();
        sorted.sort_by_key(|entry| entry.tag);

        for entry in sorted {
            writer.write_u32(entry.tag.as_u32());
            writer.write_u32(entry.checksum);
            writer.write_u32(entry.offset);
            writer.write_u32(entry.length);
        }

        writer.into_bytes()
    }

    /// The on-disk placement order for table data: a fixed priority for
    /// well-known tags, unknown tags last, ties broken by tag value.
    pub(crate) fn placement_order(tags: impl Iterator<Item = TableTag>) -> Vec<TableTag> {
        let mut order: Vec<TableTag> = tags.collect();
        order.sort_by_key(|&tag| (tag.write_priority(), tag));
        order
    }
}

/// searchRange = largest power-of-two <= n, times 16; entrySelector = log2
/// of that power; rangeShift = n * 16 - searchRange.
fn search_fields(number_of_tables: u16) -> (u16, u16, u16) {
    if number_of_tables == 0 {
        return (0, 0, 0);
    }

    let entry_selector = 15 - number_of_tables.leading_zeros() as u16;
    let search_range = (1 << entry_selector) * 16;
    let range_shift = number_of_tables * 16 - search_range;

    (search_range, entry_selector, range_shift)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn search_field_computation() {
        assert_eq!(search_fields(1), (16, 0, 0));
        assert_eq!(search_fields(9), (128, 3, 16));
        assert_eq!(search_fields(10), (128, 3, 32));
        assert_eq!(search_fields(16), (256, 4, 0));
    }

    #[test]
    fn decode_rejects_unknown_format() {
        let bytes = [0xCA, 0xFE, 0xBA, 0xBE, 0, 0, 0, 0, 0, 0, 0, 0];
        let mut cursor = ByteCursor::new(&bytes);

        assert!(matches!(
            TableDirectory::decode(&mut cursor),
            Err(FontError::MalformedHeader { .. })
        ));
    }

    #[test]
    fn encode_sorts_records_by_tag() {
        let entries = [
            DirectoryEntry {
                tag: TableTag::HEAD,
                checksum: 1,
                offset: 44,
                length: 54,
            },
            DirectoryEntry {
                tag: TableTag::OS2,
                checksum: 2,
                offset: 100,
                length: 78,
            },
        ];

        let bytes = TableDirectory::encode(format::TRUE_TYPE, &entries);
        let mut cursor = ByteCursor::new(&bytes);
        let directory = TableDirectory::decode(&mut cursor).unwrap();

        // 'OS/2' sorts before 'head'
        assert_eq!(directory.entries[0].tag, TableTag::OS2);
        assert_eq!(directory.entries[1].tag, TableTag::HEAD);
        assert_eq!(directory.offset_subtable.search_range, 32);
        assert_eq!(directory.offset_subtable.entry_selector, 1);
        assert_eq!(directory.offset_subtable.range_shift, 0);
    }

    #[test]
    fn placement_puts_head_first_and_unknown_last() {
        let order = TableDirectory::placement_order(
            [
                TableTag::POST,
                TableTag::new(*b"ZZZZ"),
                TableTag::HEAD,
                TableTag::HMTX,
            ]
            .into_iter(),
        );

        assert_eq!(
            order,
            vec![
                TableTag::HEAD,
                TableTag::HMTX,
                TableTag::POST,
                TableTag::new(*b"ZZZZ"),
            ]
        );
    }
}

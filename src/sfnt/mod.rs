//! The sfnt container: a directory of tagged, checksummed, length-prefixed
//! tables, each independently versioned.

use std::collections::BTreeMap;

use log::warn;

use crate::{
    checksum::{checksum_adjustment, font_checksum, table_checksum},
    cursor::ByteCursor,
    error::{FontError, FontResult},
};

use self::{
    directory::{DirectoryEntry, TableDirectory, ENTRY_LEN, HEADER_LEN},
    table::{
        codec_key, decode_independent, FontTable, HeadTable, HheaTable, HmtxTable, MaxpTable,
        TableTag, CHECKSUM_ADJUSTMENT_OFFSET,
    },
};

pub mod data_types;
pub mod directory;
pub mod table;

/// Finds the table of a given variant regardless of the tag it was stored
/// under (byte-swapped containers keep their original tags as map keys).
macro_rules! find_table {
    ($tables:expr, $variant:ident) => {
        $tables.values().find_map(|table| match table {
            FontTable::$variant(inner) => Some(inner),
            _ => None,
        })
    };
}

/// A decoded font file: container format plus one structured (or opaque)
/// value per directory entry.
///
/// Tables are immutable once decoded; the edit entry points replace whole
/// tables, and re-encoding recomputes every checksum and offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontContainer {
    pub format: u32,
    tables: BTreeMap<TableTag, FontTable>,
    advisories: Vec<ChecksumAdvisory>,
}

/// A stored directory checksum that did not match the table bytes.
/// Advisory only; never fails a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecksumAdvisory {
    pub tag: TableTag,
    pub stored: u32,
    pub computed: u32,
}

impl FontContainer {
    pub fn decode(bytes: &[u8]) -> FontResult<Self> {
        let mut cursor = ByteCursor::new(bytes);
        let directory = TableDirectory::decode(&mut cursor)?;

        // a directory entry pointing outside the file means the directory
        // itself cannot be trusted; fatal per the error taxonomy
        for entry in &directory.entries {
            if u64::from(entry.offset) + u64::from(entry.length) > bytes.len() as u64 {
                return Err(FontError::MalformedHeader {
                    reason: format!(
                        "`{}` entry range {}..{} lies outside the {} byte file",
                        entry.tag,
                        entry.offset,
                        u64::from(entry.offset) + u64::from(entry.length),
                        bytes.len()
                    ),
                });
            }
        }

        let slice_of = |entry: &DirectoryEntry| {
            &bytes[entry.offset as usize..entry.offset as usize + entry.length as usize]
        };

        let mut advisories = Vec::new();
        for entry in &directory.entries {
            let data = slice_of(entry);

            // head's directory checksum is defined over bytes with the
            // adjustment field zeroed
            let computed = if codec_key(entry.tag) == Some(TableTag::HEAD)
                && data.len() >= CHECKSUM_ADJUSTMENT_OFFSET + 4
            {
                let mut zeroed = data.to_vec();
                zeroed[CHECKSUM_ADJUSTMENT_OFFSET..CHECKSUM_ADJUSTMENT_OFFSET + 4].fill(0);
                table_checksum(&zeroed)
            } else {
                table_checksum(data)
            };

            if computed != entry.checksum {
                warn!(
                    "`{}` table checksum mismatch: directory says {:#010x}, bytes sum to {:#010x}",
                    entry.tag, entry.checksum, computed
                );
                advisories.push(ChecksumAdvisory {
                    tag: entry.tag,
                    stored: entry.checksum,
                    computed,
                });
            }
        }

        // hmtx needs hhea's metric count and maxp's glyph count, so it is
        // decoded after every independent table regardless of directory
        // order
        let mut tables = BTreeMap::new();
        let mut deferred = Vec::new();

        for entry in &directory.entries {
            let data = slice_of(entry);

            let key = match codec_key(entry.tag) {
                Some(TableTag::HMTX) => {
                    deferred.push(entry);
                    continue;
                }
                Some(key) => key,
                None => {
                    tables.insert(entry.tag, FontTable::Opaque(data.to_vec()));
                    continue;
                }
            };

            let table = match decode_independent(key, data) {
                Ok(table) => table,
                Err(error) => {
                    warn!("keeping `{}` table as opaque bytes: {}", entry.tag, error);
                    FontTable::Opaque(data.to_vec())
                }
            };

            tables.insert(entry.tag, table);
        }

        for entry in deferred {
            let data = slice_of(entry);

            let counts = {
                let hhea = find_table!(tables, Hhea);
                let maxp = find_table!(tables, Maxp);
                hhea.zip(maxp)
                    .map(|(hhea, maxp)| (hhea.number_of_h_metrics, maxp.num_glyphs))
            };

            let table = match counts {
                Some((number_of_h_metrics, num_glyphs)) => {
                    match HmtxTable::decode(data, number_of_h_metrics, num_glyphs) {
                        Ok(hmtx) => FontTable::Hmtx(hmtx),
                        Err(error) => {
                            warn!("keeping `{}` table as opaque bytes: {}", entry.tag, error);
                            FontTable::Opaque(data.to_vec())
                        }
                    }
                }
                None => {
                    warn!(
                        "keeping `{}` table as opaque bytes: hhea and maxp are required to \
                         decode it",
                        entry.tag
                    );
                    FontTable::Opaque(data.to_vec())
                }
            };

            tables.insert(entry.tag, table);
        }

        Ok(Self {
            format: directory.offset_subtable.format,
            tables,
            advisories,
        })
    }

    /// Serializes the whole container: per-table encode, canonical
    /// placement, directory with recomputed search hints, whole-font
    /// checksum, and the head adjustment backpatch.
    pub fn encode(&self) -> FontResult<Vec<u8>> {
        let hmtx = self.hmtx();

        let mut encoded = BTreeMap::new();
        for (&tag, table) in &self.tables {
            encoded.insert(tag, table.encode(hmtx)?);
        }

        let order = TableDirectory::placement_order(self.tables.keys().copied());

        let head_tag = self
            .tables
            .iter()
            .find(|(_, table)| matches!(table, FontTable::Head(_)))
            .map(|(&tag, _)| tag);

        let mut offset = HEADER_LEN + ENTRY_LEN * order.len();
        let mut entries = Vec::with_capacity(order.len());
        let mut head_offset = None;
        for &tag in &order {
            let data = &encoded[&tag];

            if Some(tag) == head_tag {
                head_offset = Some(offset);
            }

            entries.push(DirectoryEntry {
                tag,
                checksum: table_checksum(data),
                offset: offset as u32,
                length: data.len() as u32,
            });

            offset += padded_len(data.len());
        }

        let directory_bytes = TableDirectory::encode(self.format, &entries);
        let directory_len = directory_bytes.len();

        let mut file = directory_bytes;
        for &tag in &order {
            file.extend_from_slice(&encoded[&tag]);
            while file.len() % 4 != 0 {
                file.push(0);
            }
        }

        let total = font_checksum(&file[..directory_len], &entries);
        let adjustment = checksum_adjustment(total);

        if let Some(head_offset) = head_offset {
            let at = head_offset + CHECKSUM_ADJUSTMENT_OFFSET;
            file[at..at + 4].copy_from_slice(&adjustment.to_be_bytes());
        }

        Ok(file)
    }

    pub fn tables(&self) -> impl Iterator<Item = (TableTag, &FontTable)> {
        self.tables.iter().map(|(&tag, table)| (tag, table))
    }

    pub fn table(&self, tag: TableTag) -> Option<&FontTable> {
        self.tables.get(&tag)
    }

    pub fn advisories(&self) -> &[ChecksumAdvisory] {
        &self.advisories
    }

    /// Replaces or adds a table. Offsets and checksums are recomputed on
    /// the next encode.
    pub fn insert_table(&mut self, tag: TableTag, table: FontTable) {
        self.tables.insert(tag, table);
    }

    pub fn remove_table(&mut self, tag: TableTag) -> Option<FontTable> {
        self.tables.remove(&tag)
    }

    pub fn head(&self) -> Option<&HeadTable> {
        find_table!(self.tables, Head)
    }

    pub fn hhea(&self) -> Option<&HheaTable> {
        find_table!(self.tables, Hhea)
    }

    pub fn maxp(&self) -> Option<&MaxpTable> {
        find_table!(self.tables, Maxp)
    }

    pub fn hmtx(&self) -> Option<&HmtxTable> {
        find_table!(self.tables, Hmtx)
    }

    pub fn name(&self) -> Option<&table::NameTable> {
        find_table!(self.tables, Name)
    }

    pub fn os2(&self) -> Option<&table::Os2Table> {
        find_table!(self.tables, Os2)
    }

    pub fn post(&self) -> Option<&table::PostTable> {
        find_table!(self.tables, Post)
    }

    /// PostScript name for a glyph, when the post table carries names.
    pub fn glyph_name(&self, glyph_id: u16) -> Option<&str> {
        self.post()?.glyph_name(glyph_id)
    }
}

fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{table::*, *};
    use crate::checksum::CHECKSUM_MAGIC;
    use crate::sfnt::data_types::{FWord, Fixed, LongDateTime};
    use crate::sfnt::directory::format;

    fn sample_container() -> FontContainer {
        let mut container = FontContainer {
            format: format::TRUE_TYPE,
            tables: BTreeMap::new(),
            advisories: Vec::new(),
        };

        container.insert_table(
            TableTag::HEAD,
            FontTable::Head(HeadTable {
                revision: Fixed(0x00010000),
                checksum_adjustment: 0,
                flags: HeadFlags(3),
                units_per_em: 1000,
                created: LongDateTime(3_000_000_000),
                modified: LongDateTime(3_000_000_500),
                x_min: FWord(-100),
                y_min: FWord(-250),
                x_max: FWord(900),
                y_max: FWord(800),
                mac_style: MacStyle(0),
                lowest_rec_ppem: 8,
                font_direction_hint: 2,
                index_to_loc_format: IndexToLocFormat::Short,
                glyph_data_format: 0,
            }),
        );

        container.insert_table(
            TableTag::MAXP,
            FontTable::Maxp(MaxpTable {
                num_glyphs: 4,
                profile: None,
            }),
        );

        container.insert_table(
            TableTag::HHEA,
            FontTable::Hhea(HheaTable {
                ascender: FWord(800),
                descender: FWord(-200),
                line_gap: FWord(50),
                advance_width_max: 0,
                min_left_side_bearing: 0,
                min_right_side_bearing: 0,
                x_max_extent: 0,
                caret_slope_rise: 1,
                caret_slope_run: 0,
                caret_offset: 0,
                metric_data_format: 0,
                number_of_h_metrics: 0, // recomputed from hmtx on encode
            }),
        );

        container.insert_table(
            TableTag::HMTX,
            FontTable::Hmtx(HmtxTable {
                metrics: vec![
                    LongHorMetric {
                        advance_width: 500,
                        left_side_bearing: 10,
                    },
                    LongHorMetric {
                        advance_width: 620,
                        left_side_bearing: 12,
                    },
                ],
                trailing_bearings: vec![3, 4],
            }),
        );

        container.insert_table(
            TableTag::CVT,
            FontTable::Cvt(CvtTable {
                values: vec![12, -8, 40],
            }),
        );

        container.insert_table(
            TableTag::new(*b"zzzz"),
            FontTable::Opaque(vec![1, 2, 3, 4, 5]),
        );

        container
    }

    #[test]
    fn encode_decode_round_trip() {
        let container = sample_container();
        let bytes = container.encode().unwrap();

        let decoded = FontContainer::decode(&bytes).unwrap();
        assert!(decoded.advisories().is_empty());

        // re-encoding a decoded container reproduces the bytes exactly
        assert_eq!(decoded.encode().unwrap(), bytes);

        // and decoding again yields the identical structured value
        assert_eq!(FontContainer::decode(&bytes).unwrap(), decoded);
    }

    #[test]
    fn whole_font_checksum_equals_magic() {
        let bytes = sample_container().encode().unwrap();

        assert_eq!(table_checksum(&bytes), CHECKSUM_MAGIC);
    }

    #[test]
    fn per_table_checksums_match_directory() {
        let bytes = sample_container().encode().unwrap();

        let mut cursor = ByteCursor::new(&bytes);
        let directory = TableDirectory::decode(&mut cursor).unwrap();

        for entry in &directory.entries {
            let data =
                &bytes[entry.offset as usize..(entry.offset + entry.length) as usize];

            let computed = if entry.tag == TableTag::HEAD {
                let mut zeroed = data.to_vec();
                zeroed[CHECKSUM_ADJUSTMENT_OFFSET..CHECKSUM_ADJUSTMENT_OFFSET + 4].fill(0);
                table_checksum(&zeroed)
            } else {
                table_checksum(data)
            };

            assert_eq!(computed, entry.checksum, "{}", entry.tag);
        }
    }

    #[test]
    fn hmtx_decodes_after_its_dependencies() {
        let bytes = sample_container().encode().unwrap();
        let decoded = FontContainer::decode(&bytes).unwrap();

        let hmtx = decoded.hmtx().unwrap();
        assert_eq!(hmtx.num_glyphs(), 4);
        assert_eq!(hmtx.advance_width(3), Some(620));

        let hhea = decoded.hhea().unwrap();
        assert_eq!(hhea.number_of_h_metrics, 2);
    }

    #[test]
    fn tampered_table_is_an_advisory_not_an_error() {
        let mut bytes = sample_container().encode().unwrap();
        // the opaque `zzzz` table is placed last: 5 data bytes + 3 pad
        let len = bytes.len();
        bytes[len - 5] ^= 0xFF;

        let decoded = FontContainer::decode(&bytes).unwrap();

        assert_eq!(decoded.advisories().len(), 1);
        assert_eq!(decoded.advisories()[0].tag, TableTag::new(*b"zzzz"));
    }

    #[test]
    fn bad_table_is_kept_opaque_and_round_trips() {
        let mut container = sample_container();
        // a cvt table with an odd byte count fails its codec
        container.insert_table(TableTag::CVT, FontTable::Opaque(vec![9, 9, 9]));

        let bytes = container.encode().unwrap();
        let decoded = FontContainer::decode(&bytes).unwrap();

        assert_eq!(
            decoded.table(TableTag::CVT),
            Some(&FontTable::Opaque(vec![9, 9, 9]))
        );
        // the rest of the container still decoded
        assert!(decoded.head().is_some());
        assert_eq!(decoded.encode().unwrap(), bytes);
    }

    #[test]
    fn entry_range_outside_file_is_fatal() {
        let mut bytes = sample_container().encode().unwrap();
        bytes.truncate(bytes.len() - 8);

        assert!(matches!(
            FontContainer::decode(&bytes),
            Err(FontError::MalformedHeader { .. })
        ));
    }

    #[test]
    fn byte_swapped_tag_resolves_codec() {
        let cvt = CvtTable { values: vec![7, 8] };
        let swapped = TableTag::CVT.byte_swapped();

        let mut container = sample_container();
        container.remove_table(TableTag::CVT);
        container.insert_table(swapped, FontTable::Cvt(cvt.clone()));

        let bytes = container.encode().unwrap();
        let decoded = FontContainer::decode(&bytes).unwrap();

        assert_eq!(decoded.table(swapped), Some(&FontTable::Cvt(cvt)));
    }
}

mod cvt;
mod gasp;
mod head;
mod hhea;
mod hmtx;
mod maxp;
mod name;
mod os2;
mod post;
mod tag;

pub use cvt::CvtTable;
pub use gasp::{GaspBehavior, GaspRange, GaspTable};
pub use head::{HeadFlags, HeadTable, IndexToLocFormat, MacStyle, HEAD_MAGIC};
pub use hhea::HheaTable;
pub use hmtx::{HmtxTable, LongHorMetric};
pub use maxp::{MaxpTable, TrueTypeProfile};
pub use name::{name_id, NameRecord, NameTable};
pub use os2::{FsSelection, Os2Table, Os2Version1, Os2Version2, Os2Version5};
pub use post::{PostNames, PostTable, MACINTOSH_NAMES};
pub use tag::TableTag;

pub(crate) use head::CHECKSUM_ADJUSTMENT_OFFSET;

use crate::error::FontResult;

/// One structured table. Tags without a codec are carried as opaque bytes
/// and round-trip unmodified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontTable {
    Head(HeadTable),
    Hhea(HheaTable),
    Hmtx(HmtxTable),
    Maxp(MaxpTable),
    Name(NameTable),
    Os2(Os2Table),
    Gasp(GaspTable),
    Cvt(CvtTable),
    Post(PostTable),
    Opaque(Vec<u8>),
}

/// Resolves the codec key for a directory tag: the tag itself if a codec
/// exists for it, otherwise its byte-swapped form (containers written by
/// byte-swapping hosts store tags reversed).
pub(crate) fn codec_key(tag: TableTag) -> Option<TableTag> {
    if has_codec(tag) {
        Some(tag)
    } else if has_codec(tag.byte_swapped()) {
        Some(tag.byte_swapped())
    } else {
        None
    }
}

fn has_codec(tag: TableTag) -> bool {
    matches!(
        tag,
        TableTag::HEAD
            | TableTag::HHEA
            | TableTag::HMTX
            | TableTag::MAXP
            | TableTag::NAME
            | TableTag::OS2
            | TableTag::GASP
            | TableTag::CVT
            | TableTag::POST
    )
}

/// Decodes a table that does not depend on any other table. hmtx is the
/// exception; the container resolves its hhea/maxp inputs and calls
/// `HmtxTable::decode` directly.
pub(crate) fn decode_independent(key: TableTag, data: &[u8]) -> FontResult<FontTable> {
    Ok(match key {
        TableTag::HEAD => FontTable::Head(HeadTable::decode(data)?),
        TableTag::HHEA => FontTable::Hhea(HheaTable::decode(data)?),
        TableTag::MAXP => FontTable::Maxp(MaxpTable::decode(data)?),
        TableTag::NAME => FontTable::Name(NameTable::decode(data)?),
        TableTag::OS2 => FontTable::Os2(Os2Table::decode(data)?),
        TableTag::GASP => FontTable::Gasp(GaspTable::decode(data)?),
        TableTag::CVT => FontTable::Cvt(CvtTable::decode(data)?),
        TableTag::POST => FontTable::Post(PostTable::decode(data)?),
        _ => FontTable::Opaque(data.to_vec()),
    })
}

impl FontTable {
    /// Serializes the table. hhea refreshes its metrics-derived fields
    /// from the paired hmtx table.
    pub(crate) fn encode(&self, hmtx: Option<&HmtxTable>) -> FontResult<Vec<u8>> {
        match self {
            Self::Head(head) => head.encode(),
            Self::Hhea(hhea) => hhea.encode(hmtx),
            Self::Hmtx(table) => table.encode(),
            Self::Maxp(maxp) => maxp.encode(),
            Self::Name(name) => name.encode(),
            Self::Os2(os2) => os2.encode(),
            Self::Gasp(gasp) => gasp.encode(),
            Self::Cvt(cvt) => cvt.encode(),
            Self::Post(post) => post.encode(),
            Self::Opaque(bytes) => Ok(bytes.clone()),
        }
    }

    pub fn is_opaque(&self) -> bool {
        matches!(self, Self::Opaque(_))
    }
}

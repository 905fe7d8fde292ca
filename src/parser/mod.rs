pub mod group;
pub mod lines;
pub mod lookback;
pub mod segment;
pub mod team;
pub mod writeup;

use crate::model::{DocMeta, DocType, Document};
use crate::owners::OwnerDirectory;

/// Parse one document's extracted text. Pure: the same text, metadata and
/// directory always produce the same document, and nothing here can fail.
pub fn parse_document(text: &str, meta: &DocMeta, owners: &OwnerDirectory) -> Document {
    match meta.doc_type {
        DocType::Lookback => Document::Lookback(lookback::parse_lookback(text, meta, owners)),
        _ => Document::Rankings(segment::segment(text, meta, owners)),
    }
}

//! Per-attribute vertex welding for flattened triangle meshes.
//!
//! Extraction records every triangle corner independently: one value per attribute kind, appended
//! to that kind's stream, plus one [Corners] record per triangle per kind. Once an asset is fully
//! extracted, [AttributeStore::weld_all] deduplicates each stream on its own (see [weld]) and
//! rewrites the kind's index records to point into the compacted stream.
//!
//! Weld sensitivity is decided entirely by [quantization](quantize), applied once as values enter
//! the store; welding itself compares bit patterns exactly.
#![cfg_attr(not(debug_assertions), warn(missing_docs))]

pub mod attribute;
pub mod error;
pub mod hash;
pub mod quantize;
mod store;
pub mod weld;

pub use attribute::{AttributeKind, AttributeType, AttributeValue};
pub use error::StoreError;
pub use hash::WeldKey;
pub use quantize::{Precision, Precisions, Quantize};
pub use store::*;
pub use weld::XRefs;

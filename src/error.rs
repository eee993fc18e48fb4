use crate::attribute::AttributeKind;

/// Errors related to [AttributeStores](crate::AttributeStore).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("{kind} stream holds {len} values; the next position does not fit in the store's index type")]
    IndexOverflow { kind: AttributeKind, len: usize },
    #[error("precision factor must be finite and greater than zero, found {0}")]
    InvalidPrecision(f32),
}

use meshweld_common::ArrayIndex;
use num_traits::AsPrimitive;

use crate::{
    attribute::AttributeKind,
    error::StoreError,
    hash::WeldKey,
    store::{Corners, WeldReport},
    weld,
};

/// The stream of one attribute kind, and the per-triangle records indexing into it.
#[derive(Debug, Clone)]
pub struct Channel<T, Idx: ArrayIndex = u32> {
    kind: AttributeKind,
    values: Vec<T>,
    indices: Vec<Corners<Idx>>,
}

impl<T, Idx: ArrayIndex> Channel<T, Idx> {
    pub(crate) fn new(kind: AttributeKind) -> Self {
        Self {
            kind,
            values: Vec::new(),
            indices: Vec::new(),
        }
    }

    #[inline]
    pub fn kind(&self) -> AttributeKind {
        self.kind
    }

    #[inline]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    #[inline]
    pub fn indices(&self) -> &[Corners<Idx>] {
        &self.indices
    }

    /// Number of values in the stream.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The value referenced by `triangle`'s `corner`, if that corner has one.
    pub fn corner_value(&self, triangle: usize, corner: usize) -> Option<&T> {
        let idx = self.indices.get(triangle)?.0.get(corner).copied().flatten()?;
        self.values.get(AsPrimitive::<usize>::as_(idx))
    }

    /// Append `value`, returning its position.
    pub(crate) fn push(&mut self, value: T) -> Result<Idx, StoreError> {
        let pos = num_traits::cast::<usize, Idx>(self.values.len()).ok_or(
            StoreError::IndexOverflow {
                kind: self.kind,
                len: self.values.len(),
            },
        )?;
        self.values.push(value);
        Ok(pos)
    }

    /// # Panics
    ///
    /// * if `triangle` is not the next triangle ordinal of this channel
    pub(crate) fn record(&mut self, triangle: usize, corners: Corners<Idx>) {
        assert_eq!(
            triangle,
            self.indices.len(),
            "{} indices recorded out of order",
            self.kind
        );
        self.indices.push(corners);
    }
}

impl<T: WeldKey, Idx: ArrayIndex> Channel<T, Idx>
where
    usize: AsPrimitive<Idx>,
{
    /// Weld the stream and remap the indices to match.
    ///
    /// An empty stream has nothing to reference, so its indices are cleared and `None` is returned.
    pub fn weld(&mut self) -> Option<WeldReport> {
        if self.values.is_empty() {
            tracing::trace!(kind = self.kind.name(), "no values; clearing indices");
            self.indices.clear();
            return None;
        }
        let xrefs = weld::weld(&mut self.values);
        xrefs.remap(&mut self.indices);
        let report = WeldReport {
            kind: self.kind,
            before: xrefs.source_len(),
            after: xrefs.welded_len(),
        };
        tracing::debug!(
            kind = self.kind.name(),
            before = report.before,
            after = report.after,
            "welded stream"
        );
        Some(report)
    }
}

//! Per-kind attribute streams and the triangle index records referring to them.

use meshweld_common::ArrayIndex;
use num_traits::AsPrimitive;

use crate::{
    attribute::{AttributeKind, AttributeValue, Binormal, Normal, Position, Rgba, Tangent, Texcoord},
    error::StoreError,
    quantize::Precisions,
};

mod builder;
mod channel;
mod corners;
#[cfg(feature = "parallel")]
mod parallel;

pub use builder::*;
pub use channel::*;
pub use corners::*;

/// Run `$body` against the channel of `$kind`, bound as `$ch`.
///
/// Channels hold different value types, so the body is duplicated per arm rather than abstracted.
macro_rules! with_channel {
    ($store:expr, $kind:expr, |mut $ch:ident| $body:expr) => {
        match $kind {
            AttributeKind::Position => {
                let $ch = &mut $store.positions;
                $body
            }
            AttributeKind::Normal => {
                let $ch = &mut $store.normals;
                $body
            }
            AttributeKind::Tangent => {
                let $ch = &mut $store.tangents;
                $body
            }
            AttributeKind::Binormal => {
                let $ch = &mut $store.binormals;
                $body
            }
            AttributeKind::Color => {
                let $ch = &mut $store.colors;
                $body
            }
            AttributeKind::Texcoord => {
                let $ch = &mut $store.texcoords;
                $body
            }
        }
    };
    ($store:expr, $kind:expr, |$ch:ident| $body:expr) => {
        match $kind {
            AttributeKind::Position => {
                let $ch = &$store.positions;
                $body
            }
            AttributeKind::Normal => {
                let $ch = &$store.normals;
                $body
            }
            AttributeKind::Tangent => {
                let $ch = &$store.tangents;
                $body
            }
            AttributeKind::Binormal => {
                let $ch = &$store.binormals;
                $body
            }
            AttributeKind::Color => {
                let $ch = &$store.colors;
                $body
            }
            AttributeKind::Texcoord => {
                let $ch = &$store.texcoords;
                $body
            }
        }
    };
}

/// Outcome of welding one kind's stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeldReport {
    pub kind: AttributeKind,
    /// Stream length before the weld
    pub before: usize,
    /// Stream length after the weld; the number of distinct values
    pub after: usize,
}

impl WeldReport {
    #[inline]
    pub fn merged(&self) -> usize {
        self.before - self.after
    }
}

/// One [WeldReport] per kind which had values to weld, in canonical kind order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeldSummary {
    pub reports: Vec<WeldReport>,
}

impl WeldSummary {
    pub fn get(&self, kind: AttributeKind) -> Option<&WeldReport> {
        self.reports.iter().find(|r| r.kind == kind)
    }

    /// Total number of values removed across all kinds.
    pub fn merged(&self) -> usize {
        self.reports.iter().map(WeldReport::merged).sum()
    }
}

/// Accumulates the attribute values of one asset, and welds them once extraction is complete.
///
/// Values are appended in the order corners are visited, so before welding every stream position is
/// referenced by exactly one triangle corner. After [weld_all](Self::weld_all), each stream holds
/// only distinct values, and every present index refers into its compacted stream.
#[derive(Debug, Clone)]
pub struct AttributeStore<Idx: ArrayIndex = u32> {
    precisions: Precisions,
    triangles: usize,
    positions: Channel<Position, Idx>,
    normals: Channel<Normal, Idx>,
    tangents: Channel<Tangent, Idx>,
    binormals: Channel<Binormal, Idx>,
    colors: Channel<Rgba, Idx>,
    texcoords: Channel<Texcoord, Idx>,
    /// Materials used by each triangle; welding never touches these
    materials: Vec<Vec<u32>>,
}

impl<Idx: ArrayIndex> Default for AttributeStore<Idx> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Idx: ArrayIndex> AttributeStore<Idx> {
    pub fn new() -> Self {
        Self::with_precisions(Precisions::default())
    }

    pub fn with_precisions(precisions: Precisions) -> Self {
        Self {
            precisions,
            triangles: 0,
            positions: Channel::new(AttributeKind::Position),
            normals: Channel::new(AttributeKind::Normal),
            tangents: Channel::new(AttributeKind::Tangent),
            binormals: Channel::new(AttributeKind::Binormal),
            colors: Channel::new(AttributeKind::Color),
            texcoords: Channel::new(AttributeKind::Texcoord),
            materials: Vec::new(),
        }
    }

    #[inline]
    pub fn precisions(&self) -> &Precisions {
        &self.precisions
    }

    /// Number of triangles with at least one recorded index or material record.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles
    }

    /// Append `value` to the stream of its kind, returning its position.
    ///
    /// The value is stored as given; quantize it first (see
    /// [AttributeValue::quantize](crate::AttributeValue::quantize)). Duplicates are accepted.
    ///
    /// # Errors
    ///
    /// * if the new position does not fit in `Idx`
    pub fn append(&mut self, value: AttributeValue) -> Result<Idx, StoreError> {
        match value {
            AttributeValue::Position(v) => self.positions.push(v),
            AttributeValue::Normal(v) => self.normals.push(v),
            AttributeValue::Tangent(v) => self.tangents.push(v),
            AttributeValue::Binormal(v) => self.binormals.push(v),
            AttributeValue::Color(v) => self.colors.push(v),
            AttributeValue::Texcoord(v) => self.texcoords.push(v),
        }
    }

    /// Current length of `kind`'s stream; the position the next appended value of that kind will get.
    #[inline]
    pub fn current_len(&self, kind: AttributeKind) -> usize {
        with_channel!(self, kind, |ch| ch.len())
    }

    /// Append the index record of `triangle` for `kind`.
    ///
    /// # Panics
    ///
    /// * if `triangle` is not the next unrecorded triangle of `kind`
    pub fn record_indices(&mut self, triangle: usize, kind: AttributeKind, corners: Corners<Idx>) {
        with_channel!(self, kind, |mut ch| ch.record(triangle, corners));
        self.triangles = self.triangles.max(triangle + 1);
    }

    /// Record the materials used by `triangle`. Triangles skipped since the last record get an
    /// empty list.
    ///
    /// # Panics
    ///
    /// * if `triangle` already has materials recorded
    pub fn record_materials(&mut self, triangle: usize, materials: &[u32]) {
        assert!(
            triangle >= self.materials.len(),
            "materials of triangle {triangle} recorded out of order"
        );
        self.materials.resize_with(triangle, Vec::new);
        self.materials.push(materials.to_vec());
        self.triangles = self.triangles.max(triangle + 1);
    }

    /// Materials used by `triangle`; empty if none were recorded.
    #[inline]
    pub fn materials(&self, triangle: usize) -> &[u32] {
        self.materials.get(triangle).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Material lists in triangle order, up to the last triangle with any recorded.
    #[inline]
    pub fn material_records(&self) -> &[Vec<u32>] {
        &self.materials
    }

    /// Index records of `kind`, one per triangle.
    #[inline]
    pub fn indices(&self, kind: AttributeKind) -> &[Corners<Idx>] {
        with_channel!(self, kind, |ch| ch.indices())
    }

    /// Kinds with at least one value, in canonical order.
    pub fn present_kinds(&self) -> impl Iterator<Item = AttributeKind> + '_ {
        AttributeKind::ALL
            .into_iter()
            .filter(|&kind| self.current_len(kind) > 0)
    }

    #[inline]
    pub fn positions(&self) -> &Channel<Position, Idx> {
        &self.positions
    }

    #[inline]
    pub fn normals(&self) -> &Channel<Normal, Idx> {
        &self.normals
    }

    #[inline]
    pub fn tangents(&self) -> &Channel<Tangent, Idx> {
        &self.tangents
    }

    #[inline]
    pub fn binormals(&self) -> &Channel<Binormal, Idx> {
        &self.binormals
    }

    #[inline]
    pub fn colors(&self) -> &Channel<Rgba, Idx> {
        &self.colors
    }

    #[inline]
    pub fn texcoords(&self) -> &Channel<Texcoord, Idx> {
        &self.texcoords
    }

    /// The value used by `triangle`'s `corner` for `kind`, if present.
    pub fn corner_value(
        &self,
        triangle: usize,
        corner: usize,
        kind: AttributeKind,
    ) -> Option<AttributeValue> {
        match kind {
            AttributeKind::Position => self
                .positions
                .corner_value(triangle, corner)
                .map(|&v| AttributeValue::Position(v)),
            AttributeKind::Normal => self
                .normals
                .corner_value(triangle, corner)
                .map(|&v| AttributeValue::Normal(v)),
            AttributeKind::Tangent => self
                .tangents
                .corner_value(triangle, corner)
                .map(|&v| AttributeValue::Tangent(v)),
            AttributeKind::Binormal => self
                .binormals
                .corner_value(triangle, corner)
                .map(|&v| AttributeValue::Binormal(v)),
            AttributeKind::Color => self
                .colors
                .corner_value(triangle, corner)
                .map(|&v| AttributeValue::Color(v)),
            AttributeKind::Texcoord => self
                .texcoords
                .corner_value(triangle, corner)
                .map(|&v| AttributeValue::Texcoord(v)),
        }
    }
}

impl<Idx: ArrayIndex> AttributeStore<Idx>
where
    usize: AsPrimitive<Idx>,
{
    /// Weld every kind's stream independently and remap its indices. Kinds without values have
    /// their indices cleared.
    ///
    /// Welding an already-welded store maps every index onto itself.
    #[tracing::instrument(skip(self), fields(triangles = self.triangles))]
    pub fn weld_all(&mut self) -> WeldSummary {
        let reports = AttributeKind::ALL
            .into_iter()
            .filter_map(|kind| with_channel!(self, kind, |mut ch| ch.weld()))
            .collect();
        WeldSummary { reports }
    }
}

use meshweld_common::ArrayIndex;

use crate::{
    attribute::{AttributeKind, AttributeValue, Binormal, Normal, Position, Rgba, Tangent, Texcoord},
    error::StoreError,
    store::{AttributeStore, Corners},
};

/// Raw, unquantized attributes of a single polygon corner. `None` marks an absent attribute.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Corner {
    pub position: Option<Position>,
    pub normal: Option<Normal>,
    pub tangent: Option<Tangent>,
    pub binormal: Option<Binormal>,
    pub color: Option<Rgba>,
    pub texcoord: Option<Texcoord>,
}

impl Corner {
    #[inline]
    pub fn at(position: Position) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn get(&self, kind: AttributeKind) -> Option<AttributeValue> {
        match kind {
            AttributeKind::Position => self.position.map(AttributeValue::Position),
            AttributeKind::Normal => self.normal.map(AttributeValue::Normal),
            AttributeKind::Tangent => self.tangent.map(AttributeValue::Tangent),
            AttributeKind::Binormal => self.binormal.map(AttributeValue::Binormal),
            AttributeKind::Color => self.color.map(AttributeValue::Color),
            AttributeKind::Texcoord => self.texcoord.map(AttributeValue::Texcoord),
        }
    }
}

/// Counts for a single mesh fed through a [MeshBuilder].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MeshStats {
    pub triangles: usize,
    /// Polygons discarded for not being triangles
    pub dropped: usize,
}

/// Feeds the polygons of one mesh into an [AttributeStore].
///
/// Positions keep running across meshes; a store holds an entire asset.
#[derive(Debug)]
pub struct MeshBuilder<'store, Idx: ArrayIndex = u32> {
    store: &'store mut AttributeStore<Idx>,
    span: tracing::Span,
    stats: MeshStats,
    materials: Vec<u32>,
}

impl<Idx: ArrayIndex> AttributeStore<Idx> {
    pub fn begin_mesh(&mut self, name: &str) -> MeshBuilder<'_, Idx> {
        let span = tracing::debug_span!("mesh", mesh = name, first_triangle = self.triangle_count());
        MeshBuilder {
            store: self,
            span,
            stats: MeshStats::default(),
            materials: Vec::new(),
        }
    }
}

impl<'store, Idx: ArrayIndex> MeshBuilder<'store, Idx> {
    #[inline]
    pub fn stats(&self) -> MeshStats {
        self.stats
    }

    /// Materials recorded for every triangle pushed from now on. Empty until set.
    pub fn set_materials(&mut self, materials: &[u32]) {
        self.materials.clear();
        self.materials.extend_from_slice(materials);
    }

    /// Quantize and record one polygon, along with the current materials.
    ///
    /// Polygons with other than three corners are dropped, and `false` is returned; the first one
    /// dropped in a mesh is reported.
    ///
    /// # Errors
    ///
    /// * if a stream outgrows `Idx`
    pub fn push_polygon(&mut self, corners: &[Corner]) -> Result<bool, StoreError> {
        let _span = self.span.enter();
        let corners: &[Corner; 3] = match corners.try_into() {
            Ok(tri) => tri,
            Err(_) => {
                if self.stats.dropped == 0 {
                    tracing::warn!(
                        corners = corners.len(),
                        "non-triangle polygon in mesh; all non-triangles are discarded"
                    );
                }
                self.stats.dropped += 1;
                return Ok(false);
            }
        };

        // every index is cast before anything is written, so an overflow leaves the store untouched
        let precisions = *self.store.precisions();
        let mut staged = [(Corners::ABSENT, [None; 3]); AttributeKind::ALL.len()];
        for (kind, (record, pending)) in AttributeKind::ALL.into_iter().zip(&mut staged) {
            // the first position this triangle may take in `kind`'s stream
            let mut next = self.store.current_len(kind);
            for (j, corner) in corners.iter().enumerate() {
                if let Some(value) = corner.get(kind) {
                    record[j] = Some(num_traits::cast::<usize, Idx>(next).ok_or(
                        StoreError::IndexOverflow { kind, len: next },
                    )?);
                    pending[j] = Some(value.quantize(&precisions));
                    next += 1;
                }
            }
        }

        let triangle = self.store.triangle_count();
        for (kind, (record, pending)) in AttributeKind::ALL.into_iter().zip(staged) {
            for value in pending.into_iter().flatten() {
                self.store.append(value)?;
            }
            self.store.record_indices(triangle, kind, record);
        }
        self.store.record_materials(triangle, &self.materials);

        self.stats.triangles += 1;
        Ok(true)
    }

    /// Record every polygon of `polygons`, returning how many were kept.
    ///
    /// # Errors
    ///
    /// * if a stream outgrows `Idx`
    pub fn extend<'p>(
        &mut self,
        polygons: impl IntoIterator<Item = &'p [Corner]>,
    ) -> Result<usize, StoreError> {
        let mut kept = 0;
        for polygon in polygons {
            kept += usize::from(self.push_polygon(polygon)?);
        }
        Ok(kept)
    }

    pub fn finish(self) -> MeshStats {
        let _span = self.span.enter();
        tracing::debug!(
            triangles = self.stats.triangles,
            dropped = self.stats.dropped,
            "finished mesh"
        );
        self.stats
    }
}

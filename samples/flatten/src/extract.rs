//! Feeding glTF triangle data into an [AttributeStore].

use std::path::Path;

use gltf::{buffer, mesh::Mode, Document, Node};
use meshweld::{AttributeStore, Corner, Precisions, StoreError, WeldSummary};
use nalgebra::{point, vector, Vector3};

/// Errors related to flattening a single glTF file.
#[derive(Debug, thiserror::Error)]
pub enum FlattenError {
    #[error(transparent)]
    Gltf(#[from] gltf::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("primitive {primitive} of mesh {mesh} has no positions")]
    MissingPositions { mesh: usize, primitive: usize },
}

/// Result of flattening one file.
#[derive(Debug)]
pub struct Flattened {
    pub store: AttributeStore,
    pub summary: WeldSummary,
    pub dropped: usize,
}

/// Load `path`, record every triangle reachable from its scenes, and weld.
#[tracing::instrument(skip(precisions))]
pub fn flatten(
    path: &Path,
    precisions: Precisions,
    parallel: bool,
) -> Result<Flattened, FlattenError> {
    let (doc, buffers, _) = gltf::import(path)?;
    let mut extractor = Extractor {
        buffers: &buffers,
        store: AttributeStore::with_precisions(precisions),
        dropped: 0,
    };

    if doc.scenes().len() == 0 {
        // sceneless documents are a library of meshes
        for mesh in doc.meshes() {
            extractor.mesh(&mesh)?;
        }
    } else {
        visit_scenes(&doc, &mut extractor)?;
    }

    let Extractor { mut store, dropped, .. } = extractor;
    tracing::info!(
        triangles = store.triangle_count(),
        kinds = ?store.present_kinds().collect::<Vec<_>>(),
        "extracted"
    );
    let summary = if parallel {
        store.weld_all_parallel()
    } else {
        store.weld_all()
    };
    Ok(Flattened {
        store,
        summary,
        dropped,
    })
}

fn visit_scenes(doc: &Document, extractor: &mut Extractor<'_>) -> Result<(), FlattenError> {
    for scene in doc.scenes() {
        tracing::debug!(scene = scene.index(), name = ?scene.name(), "visiting scene");
        for node in scene.nodes() {
            extractor.node(&node)?;
        }
    }
    Ok(())
}

struct Extractor<'data> {
    buffers: &'data [buffer::Data],
    store: AttributeStore,
    dropped: usize,
}

impl<'data> Extractor<'data> {
    fn node(&mut self, node: &Node<'_>) -> Result<(), FlattenError> {
        if let Some(mesh) = node.mesh() {
            self.mesh(&mesh)?;
        }
        for child in node.children() {
            self.node(&child)?;
        }
        Ok(())
    }

    fn mesh(&mut self, mesh: &gltf::Mesh<'_>) -> Result<(), FlattenError> {
        let name = mesh
            .name()
            .map_or_else(|| format!("mesh{}", mesh.index()), str::to_owned);
        let buffers = self.buffers;
        let mut builder = self.store.begin_mesh(&name);

        for primitive in mesh.primitives() {
            if primitive.mode() != Mode::Triangles {
                tracing::warn!(
                    mesh = %name,
                    primitive = primitive.index(),
                    mode = ?primitive.mode(),
                    "skipping non-triangle primitive"
                );
                self.dropped += 1;
                continue;
            }

            let reader = primitive.reader(|b| buffers.get(b.index()).map(|data| &data.0[..]));
            let corners = read_corners(&reader).ok_or(FlattenError::MissingPositions {
                mesh: mesh.index(),
                primitive: primitive.index(),
            })?;
            // primitives on the default material record none
            let materials: Vec<u32> = primitive
                .material()
                .index()
                .and_then(|i| u32::try_from(i).ok())
                .into_iter()
                .collect();
            builder.set_materials(&materials);

            let order: Vec<usize> = match reader.read_indices() {
                Some(indices) => indices.into_u32().map(|i| i as usize).collect(),
                None => (0..corners.len()).collect(),
            };

            for tri in order.chunks(3) {
                // an out-of-range index reads as an absent corner, which fails the triangle check
                let polygon: Vec<Corner> = tri
                    .iter()
                    .filter_map(|&i| corners.get(i).copied())
                    .collect();
                builder.push_polygon(&polygon)?;
            }
        }

        self.dropped += builder.finish().dropped;
        Ok(())
    }
}

/// Gather the per-vertex attributes of a primitive. `None` if it has no positions.
fn read_corners<'a, 's, F>(reader: &gltf::mesh::Reader<'a, 's, F>) -> Option<Vec<Corner>>
where
    F: Clone + Fn(gltf::Buffer<'a>) -> Option<&'s [u8]>,
{
    let mut corners: Vec<Corner> = reader
        .read_positions()?
        .map(|[x, y, z]| Corner::at(point![x, y, z]))
        .collect();

    if let Some(normals) = reader.read_normals() {
        for (corner, [x, y, z]) in corners.iter_mut().zip(normals) {
            corner.normal = Some(vector![x, y, z]);
        }
    }
    if let Some(tangents) = reader.read_tangents() {
        for (corner, [x, y, z, w]) in corners.iter_mut().zip(tangents) {
            let tangent = vector![x, y, z];
            corner.tangent = Some(tangent);
            // glTF stores handedness instead of binormals
            corner.binormal = corner.normal.map(|n: Vector3<f32>| n.cross(&tangent) * w);
        }
    }
    if let Some(colors) = reader.read_colors(0) {
        for (corner, [r, g, b, a]) in corners.iter_mut().zip(colors.into_rgba_f32()) {
            corner.color = Some(point![r, g, b, a]);
        }
    }
    if let Some(texcoords) = reader.read_tex_coords(0) {
        for (corner, [u, v]) in corners.iter_mut().zip(texcoords.into_f32()) {
            corner.texcoord = Some(point![u, v]);
        }
    }
    Some(corners)
}

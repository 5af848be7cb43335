//! Tetrahedral map building.
//!
//! The volumetric analogue of the skin map: each graphical vertex is
//! expressed in the 4-component barycentric frame of one physical
//! tetrahedron. Unlike the surface case there is no single face
//! normal, so the auxiliary normal point uses a small scale-free
//! offset relative to the tetrahedron's own size; the runtime
//! normalizes the reconstructed direction anyway.

use serde::{Deserialize, Serialize};
use weft_grid::SpatialHashGrid;
use weft_math::{tetra_barycentric, Vec3};
use weft_mesh::{GraphicalSubmesh, PhysicalMesh};
use weft_types::{WeftError, WeftResult};

use crate::candidate::CandidateTetra;
use crate::config::BindConfig;

/// Offset of the auxiliary normal point, as a fraction of the
/// tetrahedron's bounding-box diagonal.
const NORMAL_OFFSET_FACTOR: f32 = 0.01;

/// One tetrahedrally skinned graphical vertex. The map is dense: one
/// entry per graphical vertex, in vertex order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TetraMapEntry {
    /// Corner vertex indices of the matched tetrahedron.
    pub tetra_indices: [u32; 4],
    /// Barycentric fit of the vertex position; components weight the
    /// corners in order and sum to 1.
    pub position_bary: [f32; 4],
    /// Barycentric fit of the normal-displaced auxiliary point.
    pub normal_bary: [f32; 4],
}

impl Default for TetraMapEntry {
    fn default() -> Self {
        Self {
            tetra_indices: [0; 4],
            position_bary: [0.0; 4],
            normal_bary: [0.0; 4],
        }
    }
}

/// Worst out-of-range violation of a barycentric quadruple: 0 inside
/// the tetrahedron, growing with the distance outside.
fn worst_violation(bary: &[f32; 4]) -> f32 {
    let mut worst = 0.0f32;
    for &b in bary {
        worst = worst.max(-b);
        worst = worst.max(b - 1.0);
    }
    worst
}

/// Result of the tetra map stage.
#[derive(Debug, Clone)]
pub struct TetraMapOutput {
    /// One entry per graphical vertex, in vertex order.
    pub entries: Vec<TetraMapEntry>,
    /// Vertices for which every tetrahedron was degenerate. They stay
    /// static at their authored position.
    pub unmapped: u32,
}

/// Builds the dense tetra map for the vertices of `submeshes`.
///
/// Every vertex gets the tetrahedron with the smallest worst-component
/// violation — a vertex inside any tetrahedron scores 0 there, a
/// vertex outside the volume gets the least-bad extrapolation.
/// Degenerate tetrahedra are never selected.
pub fn build_tetra_map(
    physical: &PhysicalMesh,
    submeshes: &[GraphicalSubmesh],
    config: &BindConfig,
) -> WeftResult<TetraMapOutput> {
    if !physical.is_tetrahedral() {
        return Err(WeftError::InvalidMesh(
            "Tetra maps require a tetrahedral physical mesh".into(),
        ));
    }

    let element_count = physical.element_count();
    let margin = physical.average_edge_length;
    let mut candidates = Vec::with_capacity(element_count);
    let mut avg_half_diagonal = 0.0f32;
    for e in 0..element_count {
        let candidate = CandidateTetra::build(physical, e, margin);
        avg_half_diagonal += candidate.bounds.extents().length();
        candidates.push(candidate);
    }
    if element_count > 0 {
        avg_half_diagonal /= element_count as f32;
    }

    let spacing = config.grid_spacing.unwrap_or(avg_half_diagonal);
    let mut grid = SpatialHashGrid::new(spacing);
    for (e, candidate) in candidates.iter().enumerate() {
        grid.insert_bounds(&candidate.bounds, e as u32);
    }

    let total: usize = submeshes.iter().map(|s| s.vertex_count()).sum();
    let mut entries = vec![TetraMapEntry::default(); total];
    let mut unmatched = 0u32;
    let mut query: Vec<u32> = Vec::new();

    let mut base = 0usize;
    for submesh in submeshes {
        for i in 0..submesh.vertex_count() {
            let position = submesh.position_vec3(i);

            grid.query_point_into(position, None, &mut query);
            let mut best = best_tetra(
                query
                    .iter()
                    .map(|&id| id as usize)
                    .filter(|&e| candidates[e].bounds.contains(position)),
                &candidates,
                position,
            );
            if best.is_none() {
                best = best_tetra(0..candidates.len(), &candidates, position);
            }

            let Some((e, position_bary)) = best else {
                // every tetrahedron is degenerate
                unmatched += 1;
                continue;
            };
            let candidate = &candidates[e];

            // Second point above the position, along the normal. The
            // offset is small but arbitrary: the reconstructed
            // direction is normalized during skinning.
            let normal = submesh.normal_vec3(i).normalize_or(Vec3::X);
            let offset = candidate.tight_diagonal() * NORMAL_OFFSET_FACTOR;
            let [p0, p1, p2, p3] = candidate.vertices;
            let normal_bary = tetra_barycentric(p0, p1, p2, p3, position + normal * offset)
                .unwrap_or(position_bary);

            entries[base + i] = TetraMapEntry {
                tetra_indices: candidate.indices,
                position_bary,
                normal_bary,
            };
        }
        base += submesh.vertex_count();
    }

    if unmatched > 0 {
        tracing::warn!(
            "{} vertices could not be mapped, they will be static",
            unmatched
        );
    }

    Ok(TetraMapOutput {
        entries,
        unmapped: unmatched,
    })
}

/// Minimum worst-violation solve over a candidate subset. Ties keep
/// the first-found candidate.
fn best_tetra(
    elements: impl Iterator<Item = usize>,
    candidates: &[CandidateTetra],
    position: Vec3,
) -> Option<(usize, [f32; 4])> {
    let mut best: Option<(usize, [f32; 4])> = None;
    let mut best_worst = f32::MAX;

    for e in elements {
        let [p0, p1, p2, p3] = candidates[e].vertices;
        let Some(bary) = tetra_barycentric(p0, p1, p2, p3, position) else {
            continue;
        };
        let worst = worst_violation(&bary);
        if worst < best_worst {
            best_worst = worst;
            best = Some((e, bary));
        }
    }

    best
}

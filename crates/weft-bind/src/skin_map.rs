//! Mesh-to-mesh skin map building.
//!
//! The fallback stage for every graphical vertex the immediate matcher
//! could not resolve (or, in integrate mode, for all of them): find
//! the physical triangle whose barycentric fit reconstructs the vertex
//! best, preferring candidates from the spatial grid and escalating to
//! an exhaustive scan only when the grid comes back empty.

use serde::{Deserialize, Serialize};
use weft_grid::SpatialHashGrid;
use weft_math::Vec3;
use weft_mesh::{GraphicalSubmesh, PhysicalMesh, Topology};
use weft_types::constants::{DEFAULT_OFFSET_ALONG_NORMAL_FACTOR, POOR_FIT_PENALTY};
use weft_types::{GroupMask, WeftError, WeftResult};

use crate::candidate::{BaryFit, CandidateTriangle, FitValidity};
use crate::config::BindConfig;
use crate::error_metric::fit_error;
use crate::fitter::fit_triangle;
use crate::immediate::ImmediateEntry;

/// One mesh-to-mesh skinned graphical vertex.
///
/// The runtime reconstructs the vertex from the three physical
/// vertices: position from `position_bary` (with the height offset
/// re-applied along the interpolated normal), normal and tangent as
/// the directions from the reconstructed position to the two auxiliary
/// points. Each bary triple is `(u, v, height)` with `u` weighting
/// `vertex_indices[1]`, `v` weighting `vertex_indices[2]`, and
/// `1 - u - v` weighting `vertex_indices[0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkinMapEntry {
    /// Corner vertex indices of the matched physical triangle.
    pub vertex_indices: [u32; 3],
    /// Barycentric fit of the vertex position.
    pub position_bary: [f32; 3],
    /// Barycentric fit of the normal-displaced auxiliary point.
    pub normal_bary: [f32; 3],
    /// Barycentric fit of the tangent-displaced auxiliary point.
    /// Mirrors `position_bary` for meshes without tangents.
    pub tangent_bary: [f32; 3],
    /// Target graphical vertex, absolute across all submeshes.
    pub target_vertex: u32,
}

/// Result of the skin map stage.
#[derive(Debug, Clone)]
pub struct SkinMapOutput {
    /// Entries sorted by `target_vertex`.
    pub entries: Vec<SkinMapEntry>,
    /// The offset-along-normal scale the fits were computed with. The
    /// runtime needs the same scale to undo the normalization.
    pub offset_along_normal: f32,
    /// Vertices no stage could map. They stay static at their authored
    /// position.
    pub unmapped: u32,
}

/// Builds the skin map for the vertices of `submeshes`.
///
/// When `immediate_map` is given, vertices it already resolved are
/// skipped (unless `integrate` is set, which folds them in), resolved
/// vertices are rewritten to [`ImmediateEntry::Escalated`], and
/// `BadNormal` hints restrict the first fit attempt to the triangles
/// incident on the hinted physical vertex.
pub fn build_skin_map(
    physical: &PhysicalMesh,
    submeshes: &[GraphicalSubmesh],
    mut immediate_map: Option<&mut [ImmediateEntry]>,
    integrate: bool,
    config: &BindConfig,
) -> WeftResult<SkinMapOutput> {
    if physical.is_tetrahedral() {
        return Err(WeftError::InvalidMesh(
            "Skin maps require a triangle physical mesh".into(),
        ));
    }

    let offset = config
        .offset_along_normal
        .unwrap_or(DEFAULT_OFFSET_ALONG_NORMAL_FACTOR * physical.average_edge_length);
    if !(offset > 0.0) {
        return Err(WeftError::InvalidConfig(
            "Offset along normal is zero; physical mesh has no edge length statistics".into(),
        ));
    }

    // Prepare candidate triangles and derive the grid spacing from
    // their fattened bounds.
    let element_count = physical.element_count();
    let margin = physical.average_edge_length;
    let mut candidates = Vec::with_capacity(element_count);
    let mut avg_half_diagonal = 0.0f32;
    for e in 0..element_count {
        let candidate = CandidateTriangle::build(physical, e, margin);
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

    // Hint re-fits need the vertex-to-triangle fan.
    let topology = immediate_map
        .is_some()
        .then(|| Topology::of_mesh(physical));

    let mut entries: Vec<SkinMapEntry> = Vec::new();
    let mut unmapped = 0u32;
    let mut fallback_scans = 0u32;
    let mut query: Vec<u32> = Vec::new();

    let mut base = 0usize;
    for submesh in submeshes {
        for i in 0..submesh.vertex_count() {
            let target = (base + i) as u32;
            let position = submesh.position_vec3(i);
            let normal = submesh.normal_vec3(i);
            let tangent = submesh.tangent_vec3(i);
            let slave = submesh.slave_mask(i);

            if let Some(map) = immediate_map.as_deref_mut() {
                let entry = map[base + i];
                let hint = match entry {
                    ImmediateEntry::BadNormal { phys_vertex } => Some(phys_vertex),
                    ImmediateEntry::Direct { phys_vertex, .. } if integrate => Some(phys_vertex),
                    _ => None,
                };

                if let Some(hinted) = hint {
                    map[base + i] = ImmediateEntry::Unmapped;

                    // Exact re-fit against the fan around the hinted
                    // physical vertex before searching anywhere else.
                    let fan = topology
                        .as_ref()
                        .map(|t| t.elements_of(hinted as usize))
                        .unwrap_or(&[]);
                    if let Some((e, fit)) = best_fit(
                        fan.iter().map(|&e| e as usize),
                        &candidates,
                        slave,
                        position,
                        normal,
                        tangent,
                        offset,
                    ) {
                        map[base + i] = ImmediateEntry::Escalated {
                            skin_index: entries.len() as u32,
                        };
                        entries.push(make_entry(physical, &candidates[e], &fit, target));
                        continue;
                    }
                    // nothing usable around the hint, search normally
                } else if !matches!(entry, ImmediateEntry::Unmapped) {
                    continue;
                }
            }

            grid.query_point_into(position, None, &mut query);
            let mut best = best_fit(
                query
                    .iter()
                    .map(|&id| id as usize)
                    .filter(|&e| candidates[e].bounds.contains(position)),
                &candidates,
                slave,
                position,
                normal,
                tangent,
                offset,
            );

            if best.is_none() && config.exhaustive_fallback {
                fallback_scans += 1;
                best = best_fit_exhaustive(
                    &candidates,
                    slave,
                    position,
                    normal,
                    tangent,
                    offset,
                );
            }

            match best {
                Some((e, fit)) => {
                    if let Some(map) = immediate_map.as_deref_mut() {
                        map[base + i] = ImmediateEntry::Escalated {
                            skin_index: entries.len() as u32,
                        };
                    }
                    entries.push(make_entry(physical, &candidates[e], &fit, target));
                }
                None => unmapped += 1,
            }
        }
        base += submesh.vertex_count();
    }

    if fallback_scans > 0 {
        tracing::debug!(
            count = fallback_scans,
            "spatial grid queries came back empty, used exhaustive search"
        );
    }
    if unmapped > 0 {
        tracing::warn!("{} vertices could not be mapped, they will be static", unmapped);
    }

    sort_skin_map(&mut entries, immediate_map.as_deref_mut());

    Ok(SkinMapOutput {
        entries,
        offset_along_normal: offset,
        unmapped,
    })
}

/// Minimum-error fully-valid fit over a candidate subset. Ties keep
/// the first-found candidate.
fn best_fit(
    elements: impl Iterator<Item = usize>,
    candidates: &[CandidateTriangle],
    slave: GroupMask,
    position: Vec3,
    normal: Vec3,
    tangent: Option<Vec3>,
    offset: f32,
) -> Option<(usize, BaryFit)> {
    let mut best: Option<(usize, BaryFit)> = None;
    let mut best_error = f32::MAX;

    for e in elements {
        let candidate = &candidates[e];
        if !candidate.usable || !candidate.master.intersects(slave) {
            continue;
        }

        let fit = fit_triangle(candidate, position, normal, tangent, offset);
        if fit.validity != FitValidity::Valid {
            continue;
        }

        let error = fit_error(candidate, &fit, normal);
        if error < best_error {
            best_error = error;
            best = Some((e, fit));
        }
    }

    best
}

/// Last-resort scan of every candidate; accepts poor fits with a
/// penalty so a wildly stretched binding still beats a static vertex.
fn best_fit_exhaustive(
    candidates: &[CandidateTriangle],
    slave: GroupMask,
    position: Vec3,
    normal: Vec3,
    tangent: Option<Vec3>,
    offset: f32,
) -> Option<(usize, BaryFit)> {
    let mut best: Option<(usize, BaryFit)> = None;
    let mut best_error = f32::MAX;

    for (e, candidate) in candidates.iter().enumerate() {
        if best_error <= 0.0 {
            break;
        }
        if !candidate.usable || !candidate.master.intersects(slave) {
            continue;
        }

        let fit = fit_triangle(candidate, position, normal, tangent, offset);
        if fit.validity == FitValidity::Degenerate {
            continue;
        }

        let mut error = fit_error(candidate, &fit, normal);
        if fit.validity == FitValidity::Poor {
            error += POOR_FIT_PENALTY;
        }
        if error < best_error {
            best_error = error;
            best = Some((e, fit));
        }
    }

    best
}

fn make_entry(
    physical: &PhysicalMesh,
    candidate: &CandidateTriangle,
    fit: &BaryFit,
    target: u32,
) -> SkinMapEntry {
    SkinMapEntry {
        vertex_indices: candidate.vertex_indices(physical),
        position_bary: fit.position,
        normal_bary: fit.normal,
        tangent_bary: fit.tangent,
        target_vertex: target,
    }
}

/// Sorts `entries` by target vertex and repoints every
/// [`ImmediateEntry::Escalated`] slot at its entry's new position.
///
/// Every pass that builds or permutes a skin map finishes through
/// here, so the sorted invariant and the escalated links can never
/// drift apart.
pub fn sort_skin_map(entries: &mut [SkinMapEntry], immediate_map: Option<&mut [ImmediateEntry]>) {
    entries.sort_by_key(|e| e.target_vertex);

    if let Some(map) = immediate_map {
        for (j, entry) in entries.iter().enumerate() {
            let slot = &mut map[entry.target_vertex as usize];
            debug_assert!(
                matches!(slot, ImmediateEntry::Escalated { .. }),
                "skin map entry without a matching escalated slot"
            );
            *slot = ImmediateEntry::Escalated {
                skin_index: j as u32,
            };
        }
    }
}

//! # weft-bind
//!
//! Builds the correspondence between a graphical LOD and the physical
//! mesh that drives it. The produced maps are persisted with the asset
//! and consumed read-only by the runtime skinning path every frame; no
//! per-frame search ever happens.
//!
//! ## Pipeline
//!
//! 1. [`immediate::match_vertices`] — direct 1:1 vertex matches (the
//!    cheap path).
//! 2. [`skin_map::build_skin_map`] — barycentric mesh-to-mesh binding
//!    for everything the immediate stage rejected, or for all vertices
//!    in integrate mode.
//! 3. [`tetra_map::build_tetra_map`] — the volumetric analogue for
//!    tetrahedral physical meshes.
//! 4. [`transition::build_lod_transitions`] — skin maps between
//!    adjacent physical LODs.
//! 5. [`reorder::reorder_graphics_vertices`] — cache-coherency
//!    reordering, rewriting every map consistently.
//!
//! [`bind_graphical_lod`] sequences stages 1–3 for one LOD.

pub mod candidate;
pub mod config;
pub mod error_metric;
pub mod fitter;
pub mod immediate;
pub mod reorder;
pub mod skin_map;
pub mod tetra_map;
pub mod transition;

pub use candidate::{BaryFit, CandidateTetra, CandidateTriangle, FitValidity};
pub use config::BindConfig;
pub use immediate::{ImmediateEntry, ImmediateMatchResult};
pub use reorder::{CorrespondenceMaps, SubmeshPartition, SubmeshPermutation};
pub use skin_map::{SkinMapEntry, SkinMapOutput};
pub use tetra_map::{TetraMapEntry, TetraMapOutput};
pub use transition::{LodTransitions, TransitionMap};

use weft_mesh::{GraphicalSubmesh, PhysicalMesh};
use weft_types::constants::DEFAULT_OFFSET_ALONG_NORMAL_FACTOR;
use weft_types::WeftResult;

/// Everything the binder produces for one graphical LOD.
#[derive(Debug, Clone)]
pub struct BindOutput {
    /// One entry per graphical vertex. Empty when the immediate map
    /// was dropped (nearly everything needed mesh-to-mesh skinning).
    pub immediate_map: Vec<ImmediateEntry>,
    /// Mesh-to-mesh entries, sorted by target vertex. Empty for
    /// tetrahedral meshes.
    pub skin_map: Vec<SkinMapEntry>,
    /// Dense tetrahedral entries. Empty for surface meshes.
    pub tetra_map: Vec<TetraMapEntry>,
    /// Offset-along-normal scale the skin map was built with.
    pub offset_along_normal: f32,
    /// Vertices no stage could map.
    pub unmapped_count: u32,
}

/// Builds the full correspondence for one graphical LOD.
///
/// Fails only on invalid configuration or malformed meshes; individual
/// vertices that cannot be matched are recovered through the fallback
/// chain and surfaced in [`BindOutput::unmapped_count`].
pub fn bind_graphical_lod(
    physical: &PhysicalMesh,
    submeshes: &[GraphicalSubmesh],
    config: &BindConfig,
) -> WeftResult<BindOutput> {
    let config = config.validated()?;
    physical.validate()?;
    for submesh in submeshes {
        submesh.validate()?;
    }

    let derived_offset = config
        .offset_along_normal
        .unwrap_or(DEFAULT_OFFSET_ALONG_NORMAL_FACTOR * physical.average_edge_length);

    if physical.is_tetrahedral() {
        let output = tetra_map::build_tetra_map(physical, submeshes, &config)?;
        return Ok(BindOutput {
            immediate_map: Vec::new(),
            skin_map: Vec::new(),
            tetra_map: output.entries,
            offset_along_normal: derived_offset,
            unmapped_count: output.unmapped,
        });
    }

    let has_tangents = submeshes.iter().any(|s| s.has_tangents());
    let matched = immediate::match_vertices(physical, submeshes, &config);
    let mut immediate_map = matched.entries;
    let total = immediate_map.len();

    let mut skin_map = Vec::new();
    let mut offset_along_normal = derived_offset;
    let mut unmapped_count = 0;

    if matched.unresolved > 0 || has_tangents || config.integrate_immediate_map {
        // Forget immediate mode entirely when it resolved almost
        // nothing; merge into one map when tangents would otherwise
        // force two runtime skinning paths.
        let clear_immediate = matched.unresolved as usize > total * 3 / 4;
        let direct_matches = immediate_map
            .iter()
            .filter(|e| matches!(e, ImmediateEntry::Direct { .. }))
            .count();
        let mostly_immediate = 2 * direct_matches > total;
        let integrate = config.integrate_immediate_map
            || clear_immediate
            || (has_tangents && !mostly_immediate);

        let output = skin_map::build_skin_map(
            physical,
            submeshes,
            Some(&mut immediate_map),
            integrate,
            &config,
        )?;
        skin_map = output.entries;
        offset_along_normal = output.offset_along_normal;
        unmapped_count = output.unmapped;

        if clear_immediate {
            immediate_map.clear();
        }
    }

    Ok(BindOutput {
        immediate_map,
        skin_map,
        tetra_map: Vec::new(),
        offset_along_normal,
        unmapped_count,
    })
}

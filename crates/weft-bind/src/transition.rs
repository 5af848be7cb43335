//! LOD transition maps.
//!
//! When the simulation switches between physical LODs, the outgoing
//! mesh's state must be blended onto the incoming mesh. The blend
//! reuses the skin map machinery: the mesh whose state is carried over
//! plays the graphical role and its neighbor is the correspondence
//! target. LOD meshes are topologically close by construction, so no
//! immediate matching or normal gating is involved.

use serde::{Deserialize, Serialize};
use weft_mesh::{GraphicalSubmesh, PhysicalMesh, Tangents};
use weft_types::WeftResult;

use crate::config::BindConfig;
use crate::skin_map::{build_skin_map, SkinMapEntry};

/// A skin map between two physical LODs of the same asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionMap {
    /// Entries sorted by source vertex (the coarser mesh's vertex id).
    pub entries: Vec<SkinMapEntry>,
    /// Offset-along-normal scale of the target mesh the fits were
    /// computed with.
    pub offset_along_normal: f32,
    /// Blend thickness applied at LOD switch time.
    pub thickness: f32,
}

/// Transition maps attached to one physical LOD.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LodTransitions {
    /// Map onto the next-coarser neighbor, absent for the first LOD.
    pub down: Option<TransitionMap>,
    /// Map onto the next-finer neighbor, absent for the last LOD.
    pub up: Option<TransitionMap>,
}

/// Wraps a physical mesh as a graphical input: its positions and
/// skinning normals, no tangents, no slave masks.
fn as_graphical_input(mesh: &PhysicalMesh) -> GraphicalSubmesh {
    GraphicalSubmesh {
        positions: mesh.positions.clone(),
        normals: mesh.skinning_normals.clone(),
        tangents: Tangents::None,
        slave_masks: None,
        indices: Vec::new(),
    }
}

/// Builds the map carrying `source`'s vertices onto `target`.
pub fn build_transition_map(
    source: &PhysicalMesh,
    target: &PhysicalMesh,
) -> WeftResult<TransitionMap> {
    let view = [as_graphical_input(source)];
    let output = build_skin_map(target, &view, None, false, &BindConfig::default())?;

    Ok(TransitionMap {
        entries: output.entries,
        offset_along_normal: output.offset_along_normal,
        thickness: 1.0,
    })
}

/// Builds the up/down transition maps for every adjacent pair in
/// `lods` (ordered finest to coarsest or vice versa; "down" always
/// points at the previous entry, "up" at the next).
pub fn build_lod_transitions(lods: &[PhysicalMesh]) -> WeftResult<Vec<LodTransitions>> {
    let mut all = Vec::with_capacity(lods.len());

    for (i, mesh) in lods.iter().enumerate() {
        let mut transitions = LodTransitions::default();
        if i > 0 {
            transitions.down = Some(build_transition_map(mesh, &lods[i - 1])?);
        }
        if i + 1 < lods.len() {
            transitions.up = Some(build_transition_map(mesh, &lods[i + 1])?);
        }
        all.push(transitions);
    }

    Ok(all)
}

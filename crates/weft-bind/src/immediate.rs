//! Immediate (one-to-one) vertex matching.
//!
//! The cheap fast path: a graphical vertex that coincides with a
//! physical vertex is skinned by copying that vertex directly, with no
//! interpolation. Vertices this stage cannot resolve fall through to
//! the mesh-to-mesh skin map builder.

use serde::{Deserialize, Serialize};
use weft_mesh::{GraphicalSubmesh, PhysicalMesh};

use crate::config::BindConfig;

/// One immediate-map slot per graphical vertex.
///
/// `BadNormal` records a candidate that passed the distance gate but
/// failed the normal gate; the skin map builder uses it as a hint to
/// re-fit against the triangles incident on that physical vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImmediateEntry {
    /// No physical vertex qualified.
    Unmapped,
    /// Direct 1:1 match. `normal_flipped` marks an opposed normal the
    /// runtime must negate.
    Direct { phys_vertex: u32, normal_flipped: bool },
    /// Distance gate passed, normal gate failed. Hint only.
    BadNormal { phys_vertex: u32 },
    /// Resolved by the skin map; index into the sorted entry array.
    Escalated { skin_index: u32 },
}

/// All-ones sentinel for an unmapped vertex in the packed encoding.
pub const PACKED_UNMAPPED: u32 = u32::MAX;
/// High-bit flag: the entry indexes the skin map.
pub const PACKED_ESCALATED: u32 = 1 << 31;
/// Flag: direct match with an opposed normal.
pub const PACKED_FLIPPED: u32 = 1 << 30;
/// Flag: distance gate passed, normal gate failed.
pub const PACKED_BAD_NORMAL: u32 = 1 << 29;
/// Low bits carrying the index payload.
pub const PACKED_INDEX_MASK: u32 = PACKED_BAD_NORMAL - 1;

impl ImmediateEntry {
    /// Encodes to the packed u32 wire format. Used only at the
    /// serialization boundary.
    pub fn to_packed(self) -> u32 {
        match self {
            ImmediateEntry::Unmapped => PACKED_UNMAPPED,
            ImmediateEntry::Direct {
                phys_vertex,
                normal_flipped,
            } => {
                let flags = if normal_flipped { PACKED_FLIPPED } else { 0 };
                (phys_vertex & PACKED_INDEX_MASK) | flags
            }
            ImmediateEntry::BadNormal { phys_vertex } => {
                (phys_vertex & PACKED_INDEX_MASK) | PACKED_BAD_NORMAL
            }
            ImmediateEntry::Escalated { skin_index } => {
                (skin_index & PACKED_INDEX_MASK) | PACKED_ESCALATED
            }
        }
    }

    /// Decodes from the packed u32 wire format.
    pub fn from_packed(bits: u32) -> Self {
        if bits == PACKED_UNMAPPED {
            ImmediateEntry::Unmapped
        } else if bits & PACKED_ESCALATED != 0 {
            ImmediateEntry::Escalated {
                skin_index: bits & PACKED_INDEX_MASK,
            }
        } else if bits & PACKED_BAD_NORMAL != 0 {
            ImmediateEntry::BadNormal {
                phys_vertex: bits & PACKED_INDEX_MASK,
            }
        } else {
            ImmediateEntry::Direct {
                phys_vertex: bits & PACKED_INDEX_MASK,
                normal_flipped: bits & PACKED_FLIPPED != 0,
            }
        }
    }
}

/// Result of the immediate matching stage.
#[derive(Debug, Clone)]
pub struct ImmediateMatchResult {
    /// One entry per graphical vertex, absolute across submeshes.
    pub entries: Vec<ImmediateEntry>,
    /// Vertices left `Unmapped` or `BadNormal` — the fallback stage's
    /// workload.
    pub unresolved: u32,
}

/// Matches every graphical vertex against the nearest mask-compatible
/// physical vertex.
///
/// A match is kept when its squared distance is within the configured
/// epsilon *and* the normals agree within the resemblance angle; ties
/// on distance go to the larger `|normal dot|`. Intentionally
/// O(V_graphical × V_physical) — it runs once, offline.
pub fn match_vertices(
    physical: &PhysicalMesh,
    submeshes: &[GraphicalSubmesh],
    config: &BindConfig,
) -> ImmediateMatchResult {
    let epsilon_sq = config.distance_epsilon * config.distance_epsilon;
    let min_cos = config
        .normal_resemblance_deg
        .to_radians()
        .cos()
        .clamp(0.0, 1.0);

    let total: usize = submeshes.iter().map(|s| s.vertex_count()).sum();
    let mut entries = vec![ImmediateEntry::Unmapped; total];
    let mut unresolved = 0u32;

    let phys_count = physical.vertex_count();

    let mut base = 0usize;
    for submesh in submeshes {
        for i in 0..submesh.vertex_count() {
            let position = submesh.position_vec3(i);
            let normal = submesh.normal_vec3(i);
            let slave = submesh.slave_mask(i);

            let mut best: Option<u32> = None;
            let mut min_dist_sq = f32::MAX;
            let mut max_dot = 0.0f32;

            for pv in 0..phys_count {
                // stop once an exact, well-aligned hit is in hand
                if min_dist_sq <= 0.0 && max_dot >= min_cos {
                    break;
                }
                if !physical.master_mask(pv).intersects(slave) {
                    continue;
                }

                let dist_sq = (physical.position_vec3(pv) - position).length_squared();
                let dot = normal.dot(physical.normal_vec3(pv));
                if dist_sq < min_dist_sq || (dist_sq == min_dist_sq && dot.abs() > max_dot.abs()) {
                    min_dist_sq = dist_sq;
                    best = Some(pv as u32);
                    max_dot = dot;
                }
            }

            let slot = &mut entries[base + i];
            match best {
                Some(phys_vertex) if min_dist_sq <= epsilon_sq && max_dot.abs() >= min_cos => {
                    *slot = ImmediateEntry::Direct {
                        phys_vertex,
                        normal_flipped: max_dot < 0.0,
                    };
                }
                Some(phys_vertex) if min_dist_sq <= epsilon_sq => {
                    // close enough, facing the wrong way — keep as a
                    // hint for the fallback stage
                    *slot = ImmediateEntry::BadNormal { phys_vertex };
                    unresolved += 1;
                }
                _ => {
                    *slot = ImmediateEntry::Unmapped;
                    unresolved += 1;
                }
            }
        }
        base += submesh.vertex_count();
    }

    if unresolved > 0 {
        tracing::debug!(
            unresolved,
            total,
            "immediate matching left vertices for the mesh-to-mesh stage"
        );
    }

    ImmediateMatchResult {
        entries,
        unresolved,
    }
}

//! Cache-coherency reordering of graphical vertices.
//!
//! The runtime skins the simulated part of each submesh every frame
//! and prefetches exactly that range. Grouping the vertices (and
//! triangles) that reference simulated physical geometry at the front
//! of their buffers makes the range a prefix whose size can be
//! reported as a plain count.
//!
//! Everything that references a graphical vertex or triangle index —
//! the immediate map, the skin map, the tetra map, the index buffer —
//! is rewritten through one permutation-application entry point, which
//! re-sorts the skin map, re-links escalated immediate entries, and
//! re-validates the map invariants before returning. Call sites never
//! re-derive that bookkeeping.

use serde::{Deserialize, Serialize};
use weft_mesh::{GraphicalSubmesh, PhysicalMesh, Tangents};
use weft_types::{WeftError, WeftResult};

use crate::immediate::ImmediateEntry;
use crate::skin_map::{sort_skin_map, SkinMapEntry};
use crate::tetra_map::TetraMapEntry;

/// Partition number of the actively simulated range.
const SIMULATED: i32 = 0;
/// Sentinel for vertices no map references; sorts last.
const UNCLASSIFIED: i32 = i32::MAX;

/// The three maps of one graphical LOD, rewritten together whenever
/// any index permutation is applied.
#[derive(Debug)]
pub struct CorrespondenceMaps<'a> {
    /// One entry per graphical vertex, or empty when the immediate map
    /// was dropped.
    pub immediate_map: &'a mut Vec<ImmediateEntry>,
    /// Sorted by target vertex.
    pub skin_map: &'a mut Vec<SkinMapEntry>,
    /// One entry per graphical vertex, or empty for surface meshes.
    pub tetra_map: &'a mut Vec<TetraMapEntry>,
}

/// Simulated-range boundaries of one submesh after reordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmeshPartition {
    /// Submesh index within the LOD.
    pub submesh: u32,
    /// Vertices the simulation drives directly.
    pub num_simulated_vertices: u32,
    /// As above, plus vertices pulled into the simulated range only
    /// through triangle membership. This is the prefetch range.
    pub num_simulated_vertices_additional: u32,
    /// Index-buffer entries belonging to simulated triangles.
    pub num_simulated_indices: u32,
}

/// Vertex and triangle permutation of one submesh, as new→old lookup
/// tables.
#[derive(Debug, Clone)]
pub struct SubmeshPermutation {
    /// `vertex_new_to_old[new]` is the vertex's previous index.
    pub vertex_new_to_old: Vec<u32>,
    /// `triangle_new_to_old[new]` is the triangle's previous index.
    pub triangle_new_to_old: Vec<u32>,
}

impl SubmeshPermutation {
    /// The permutation that undoes this one.
    pub fn inverse(&self) -> WeftResult<SubmeshPermutation> {
        Ok(SubmeshPermutation {
            vertex_new_to_old: invert(&self.vertex_new_to_old)?,
            triangle_new_to_old: invert(&self.triangle_new_to_old)?,
        })
    }
}

/// Partition number of a physical vertex: simulated prefix or static
/// suffix.
#[inline]
fn vertex_partition(physical: &PhysicalMesh, v: u32) -> i32 {
    if v < physical.num_simulated_vertices {
        0
    } else {
        1
    }
}

/// Inverts a new→old table into old→new, verifying it is a bijection.
fn invert(new_to_old: &[u32]) -> WeftResult<Vec<u32>> {
    let n = new_to_old.len();
    let mut old_to_new = vec![u32::MAX; n];
    for (new, &old) in new_to_old.iter().enumerate() {
        if old as usize >= n || old_to_new[old as usize] != u32::MAX {
            return Err(WeftError::InvariantViolation(format!(
                "Permutation is not a bijection at entry {}",
                new
            )));
        }
        old_to_new[old as usize] = new as u32;
    }
    Ok(old_to_new)
}

/// Reorders every submesh's vertices and triangles so the simulated
/// partition is a prefix, rewrites all maps accordingly, and reports
/// the partition boundaries.
///
/// Returns the partition record and the applied permutations (so a
/// caller can undo or replay the reorder on sidecar data).
pub fn reorder_graphics_vertices(
    physical: &PhysicalMesh,
    submeshes: &mut [GraphicalSubmesh],
    maps: &mut CorrespondenceMaps,
) -> WeftResult<(Vec<SubmeshPartition>, Vec<SubmeshPermutation>)> {
    let total: usize = submeshes.iter().map(|s| s.vertex_count()).sum();
    check_map_lengths(maps, total)?;

    let mut partitions = Vec::with_capacity(submeshes.len());
    let mut permutations = Vec::with_capacity(submeshes.len());

    let mut offset = 0usize;
    for (s, submesh) in submeshes.iter().enumerate() {
        let n = submesh.vertex_count();

        // Classify each vertex by the physical geometry its map entry
        // references: minimum partition over all references,
        // unclassified when nothing references it.
        let mut partition = vec![UNCLASSIFIED; n];
        let mut additional = vec![false; n];

        if !maps.immediate_map.is_empty() {
            for i in 0..n {
                match maps.immediate_map[offset + i] {
                    ImmediateEntry::Direct { phys_vertex, .. }
                    | ImmediateEntry::BadNormal { phys_vertex } => {
                        partition[i] = partition[i].min(vertex_partition(physical, phys_vertex));
                    }
                    _ => {}
                }
            }
        }

        for entry in maps.skin_map.iter() {
            let Some(local) = (entry.target_vertex as usize).checked_sub(offset) else {
                continue;
            };
            if local >= n {
                continue;
            }
            // conservative: the triangle is static if any corner is
            let max_corner = *entry.vertex_indices.iter().max().unwrap();
            partition[local] = partition[local].min(vertex_partition(physical, max_corner));
        }

        if !maps.tetra_map.is_empty() {
            for i in 0..n {
                let entry = &maps.tetra_map[offset + i];
                let max_corner = *entry.tetra_indices.iter().max().unwrap();
                partition[i] = partition[i].min(vertex_partition(physical, max_corner));
            }
        }

        // A triangle belongs to the best partition any of its corners
        // reaches; corners dragged forward by that rule are tagged
        // "additional" so the direct simulated count stays exact.
        let tri_count = submesh.triangle_count();
        let mut tri_min = vec![UNCLASSIFIED; tri_count];
        for t in 0..tri_count {
            let [a, b, c] = submesh.triangle(t);
            tri_min[t] = partition[a as usize]
                .min(partition[b as usize])
                .min(partition[c as usize]);
        }
        for t in 0..tri_count {
            for v in submesh.triangle(t) {
                if tri_min[t] < partition[v as usize] {
                    partition[v as usize] = tri_min[t];
                    additional[v as usize] = true;
                }
            }
        }

        let mut vertex_new_to_old: Vec<u32> = (0..n as u32).collect();
        vertex_new_to_old.sort_by_key(|&old| (partition[old as usize], old));

        let mut num_simulated_vertices = 0u32;
        let mut num_simulated_vertices_additional = 0u32;
        for (new, &old) in vertex_new_to_old.iter().enumerate() {
            if partition[old as usize] > SIMULATED {
                break;
            }
            num_simulated_vertices_additional = (new + 1) as u32;
            if !additional[old as usize] {
                num_simulated_vertices = (new + 1) as u32;
            }
        }

        // Triangles sort by the worst partition among their corners so
        // the simulated-triangle range is exact.
        let mut tri_max = vec![UNCLASSIFIED; tri_count];
        for t in 0..tri_count {
            let [a, b, c] = submesh.triangle(t);
            tri_max[t] = partition[a as usize]
                .max(partition[b as usize])
                .max(partition[c as usize]);
        }
        let mut triangle_new_to_old: Vec<u32> = (0..tri_count as u32).collect();
        triangle_new_to_old.sort_by_key(|&old| (tri_max[old as usize], old));

        let num_simulated_triangles =
            tri_max.iter().filter(|&&p| p <= SIMULATED).count() as u32;

        partitions.push(SubmeshPartition {
            submesh: s as u32,
            num_simulated_vertices,
            num_simulated_vertices_additional,
            num_simulated_indices: num_simulated_triangles * 3,
        });
        permutations.push(SubmeshPermutation {
            vertex_new_to_old,
            triangle_new_to_old,
        });

        offset += n;
    }

    apply_permutation(physical, submeshes, &permutations, maps)?;

    Ok((partitions, permutations))
}

/// Applies per-submesh vertex/triangle permutations to the submesh
/// buffers and every map, then restores and re-validates the map
/// invariants.
///
/// This is the only operation that may renumber graphical indices.
pub fn apply_permutation(
    physical: &PhysicalMesh,
    submeshes: &mut [GraphicalSubmesh],
    permutations: &[SubmeshPermutation],
    maps: &mut CorrespondenceMaps,
) -> WeftResult<()> {
    if permutations.len() != submeshes.len() {
        return Err(WeftError::InvariantViolation(format!(
            "Permutation count ({}) != submesh count ({})",
            permutations.len(),
            submeshes.len()
        )));
    }
    let total: usize = submeshes.iter().map(|s| s.vertex_count()).sum();
    check_map_lengths(maps, total)?;

    let mut offset = 0usize;
    for (submesh, permutation) in submeshes.iter_mut().zip(permutations) {
        let n = submesh.vertex_count();
        let tri_count = submesh.triangle_count();
        if permutation.vertex_new_to_old.len() != n
            || permutation.triangle_new_to_old.len() != tri_count
        {
            return Err(WeftError::InvariantViolation(
                "Permutation size does not match submesh".into(),
            ));
        }

        let vertex_new_to_old = &permutation.vertex_new_to_old;
        let vertex_old_to_new = invert(vertex_new_to_old)?;
        let triangle_new_to_old = &permutation.triangle_new_to_old;
        invert(triangle_new_to_old)?;

        // Vertex attribute buffers
        permute(&mut submesh.positions, vertex_new_to_old);
        permute(&mut submesh.normals, vertex_new_to_old);
        match &mut submesh.tangents {
            Tangents::None => {}
            Tangents::Vec3(v) => permute(v, vertex_new_to_old),
            Tangents::Vec4(v) => permute(v, vertex_new_to_old),
        }
        if let Some(masks) = &mut submesh.slave_masks {
            permute(masks, vertex_new_to_old);
        }

        // Index buffer: renumber vertices, then reorder triangles
        for index in &mut submesh.indices {
            *index = vertex_old_to_new[*index as usize];
        }
        let old_indices = submesh.indices.clone();
        for (new_t, &old_t) in triangle_new_to_old.iter().enumerate() {
            let src = old_t as usize * 3;
            submesh.indices[new_t * 3..new_t * 3 + 3]
                .copy_from_slice(&old_indices[src..src + 3]);
        }

        // Maps
        if !maps.immediate_map.is_empty() {
            permute(&mut maps.immediate_map[offset..offset + n], vertex_new_to_old);
        }
        if !maps.tetra_map.is_empty() {
            permute(&mut maps.tetra_map[offset..offset + n], vertex_new_to_old);
        }
        for entry in maps.skin_map.iter_mut() {
            let Some(local) = (entry.target_vertex as usize).checked_sub(offset) else {
                continue;
            };
            if local >= n {
                continue;
            }
            entry.target_vertex = (offset + vertex_old_to_new[local] as usize) as u32;
        }

        offset += n;
    }

    let immediate = if maps.immediate_map.is_empty() {
        None
    } else {
        Some(maps.immediate_map.as_mut_slice())
    };
    sort_skin_map(maps.skin_map, immediate);

    validate_correspondence(physical, total, maps)
}

/// Reorders `values` in place so `values[new] = old_values[new_to_old[new]]`.
fn permute<T: Clone>(values: &mut [T], new_to_old: &[u32]) {
    let old_values: Vec<T> = values.to_vec();
    for (new, &old) in new_to_old.iter().enumerate() {
        values[new] = old_values[old as usize].clone();
    }
}

fn check_map_lengths(maps: &CorrespondenceMaps, total: usize) -> WeftResult<()> {
    if !maps.immediate_map.is_empty() && maps.immediate_map.len() != total {
        return Err(WeftError::InvariantViolation(format!(
            "Immediate map length ({}) != graphical vertex count ({})",
            maps.immediate_map.len(),
            total
        )));
    }
    if !maps.tetra_map.is_empty() && maps.tetra_map.len() != total {
        return Err(WeftError::InvariantViolation(format!(
            "Tetra map length ({}) != graphical vertex count ({})",
            maps.tetra_map.len(),
            total
        )));
    }
    Ok(())
}

/// Verifies every map invariant: indices in bounds, skin map strictly
/// sorted with unique targets, escalated links consistent.
pub fn validate_correspondence(
    physical: &PhysicalMesh,
    total_vertices: usize,
    maps: &CorrespondenceMaps,
) -> WeftResult<()> {
    check_map_lengths(maps, total_vertices)?;
    let phys_count = physical.vertex_count() as u32;

    let mut previous: Option<u32> = None;
    for (j, entry) in maps.skin_map.iter().enumerate() {
        if entry.target_vertex as usize >= total_vertices {
            return Err(WeftError::InvariantViolation(format!(
                "Skin map entry {} targets vertex {} out of {}",
                j, entry.target_vertex, total_vertices
            )));
        }
        if entry.vertex_indices.iter().any(|&v| v >= phys_count) {
            return Err(WeftError::InvariantViolation(format!(
                "Skin map entry {} references a physical vertex out of bounds",
                j
            )));
        }
        if let Some(previous) = previous {
            if entry.target_vertex <= previous {
                return Err(WeftError::InvariantViolation(format!(
                    "Skin map unsorted at entry {} (target {} after {})",
                    j, entry.target_vertex, previous
                )));
            }
        }
        previous = Some(entry.target_vertex);
    }

    for (i, entry) in maps.immediate_map.iter().enumerate() {
        match *entry {
            ImmediateEntry::Direct { phys_vertex, .. }
            | ImmediateEntry::BadNormal { phys_vertex } => {
                if phys_vertex >= phys_count {
                    return Err(WeftError::InvariantViolation(format!(
                        "Immediate entry {} references physical vertex {} out of {}",
                        i, phys_vertex, phys_count
                    )));
                }
            }
            ImmediateEntry::Escalated { skin_index } => {
                let valid = maps
                    .skin_map
                    .get(skin_index as usize)
                    .is_some_and(|e| e.target_vertex as usize == i);
                if !valid {
                    return Err(WeftError::InvariantViolation(format!(
                        "Immediate entry {} escalates to a mismatched skin entry",
                        i
                    )));
                }
            }
            ImmediateEntry::Unmapped => {}
        }
    }

    for (i, entry) in maps.tetra_map.iter().enumerate() {
        if entry.tetra_indices.iter().any(|&v| v >= phys_count) {
            return Err(WeftError::InvariantViolation(format!(
                "Tetra map entry {} references a physical vertex out of bounds",
                i
            )));
        }
    }

    Ok(())
}

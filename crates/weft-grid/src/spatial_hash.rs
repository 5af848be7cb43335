//! Generation-stamped uniform spatial hash.
//!
//! Space is cut into cubic cells of a single configurable spacing.
//! Each cell hashes into a fixed-size bucket table; bucket contents
//! are singly-linked lists whose nodes live in one flat growable
//! arena, with array indices as links and `-1` as the terminator.
//! Distinct cells may alias to one bucket; callers filter query
//! results against their own bounds.

use weft_math::{Aabb, Vec3};

/// Large odd hash primes, one per axis.
const HASH_PRIME_X: u32 = 92_837_111;
const HASH_PRIME_Y: u32 = 689_287_499;
const HASH_PRIME_Z: u32 = 283_923_481;

/// End-of-list sentinel for the entry arena.
const NIL: i32 = -1;

/// Spatial hash construction parameters.
#[derive(Debug, Clone, Copy)]
pub struct GridConfig {
    /// Cell edge length. Clamped to a small positive minimum.
    pub spacing: f32,
    /// Number of hash buckets. A large prime keeps cell aliasing rare.
    pub table_size: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            spacing: 1.0,
            table_size: 170_111,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Cell {
    /// Arena index of the first entry, `NIL` for an empty list.
    first: i32,
    /// Generation the list belongs to. Stale stamps read as empty.
    stamp: u32,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    item: u32,
    next: i32,
}

/// Uniform grid over points and axis-aligned boxes.
///
/// `reset` is O(1): it bumps the generation counter instead of
/// clearing the bucket table, so the grid can be rebuilt every frame
/// of a batch run without reallocation.
pub struct SpatialHashGrid {
    spacing: f32,
    /// Inverse cell size (cached for performance).
    inv_spacing: f32,
    generation: u32,
    cells: Vec<Cell>,
    entries: Vec<Entry>,
}

impl SpatialHashGrid {
    /// Creates a grid with the given cell spacing and the default
    /// table size.
    pub fn new(spacing: f32) -> Self {
        Self::with_config(GridConfig {
            spacing,
            ..GridConfig::default()
        })
    }

    /// Creates a grid from explicit configuration.
    pub fn with_config(config: GridConfig) -> Self {
        let spacing = config.spacing.max(1e-6);
        Self {
            spacing,
            inv_spacing: 1.0 / spacing,
            generation: 1,
            cells: vec![Cell { first: NIL, stamp: 0 }; config.table_size.max(1)],
            entries: Vec::new(),
        }
    }

    /// Current cell spacing.
    #[inline]
    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Changes the cell spacing. Invalidates all contents.
    pub fn set_spacing(&mut self, spacing: f32) {
        self.spacing = spacing.max(1e-6);
        self.inv_spacing = 1.0 / self.spacing;
        self.reset();
    }

    /// Logically empties every bucket in O(1) by advancing the
    /// generation counter.
    pub fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.entries.clear();
    }

    /// Number of entries inserted since the last reset.
    #[inline]
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Integer cell coordinate containing `p` on each axis.
    #[inline]
    fn cell_coord(&self, p: Vec3) -> (i32, i32, i32) {
        (
            (p.x * self.inv_spacing).floor() as i32,
            (p.y * self.inv_spacing).floor() as i32,
            (p.z * self.inv_spacing).floor() as i32,
        )
    }

    #[inline]
    fn bucket_of(&self, x: i32, y: i32, z: i32) -> usize {
        let h = (x as u32).wrapping_mul(HASH_PRIME_X)
            ^ (y as u32).wrapping_mul(HASH_PRIME_Y)
            ^ (z as u32).wrapping_mul(HASH_PRIME_Z);
        (h as usize) % self.cells.len()
    }

    fn push_entry(&mut self, bucket: usize, item: u32) {
        let cell = &mut self.cells[bucket];
        let head = if cell.stamp == self.generation {
            cell.first
        } else {
            NIL
        };
        let index = self.entries.len() as i32;
        self.entries.push(Entry { item, next: head });
        *cell = Cell {
            first: index,
            stamp: self.generation,
        };
    }

    /// Inserts `item` into the single cell containing `p`.
    pub fn insert_point(&mut self, p: Vec3, item: u32) {
        let (x, y, z) = self.cell_coord(p);
        let bucket = self.bucket_of(x, y, z);
        self.push_entry(bucket, item);
    }

    /// Inserts `item` into every cell overlapped by `bounds`.
    pub fn insert_bounds(&mut self, bounds: &Aabb, item: u32) {
        let (x0, y0, z0) = self.cell_coord(bounds.min);
        let (x1, y1, z1) = self.cell_coord(bounds.max);
        for x in x0..=x1 {
            for y in y0..=y1 {
                for z in z0..=z1 {
                    let bucket = self.bucket_of(x, y, z);
                    self.push_entry(bucket, item);
                }
            }
        }
    }

    fn collect_bucket(&self, bucket: usize, max_results: Option<usize>, out: &mut Vec<u32>) {
        let cell = self.cells[bucket];
        if cell.stamp != self.generation {
            return;
        }
        let mut at = cell.first;
        while at != NIL {
            if let Some(cap) = max_results {
                if out.len() >= cap {
                    return;
                }
            }
            let entry = self.entries[at as usize];
            out.push(entry.item);
            at = entry.next;
        }
    }

    /// Collects every item whose cell contains `p` into `out`.
    ///
    /// `out` is cleared first and can be reused across queries to
    /// avoid reallocation. Bucket aliasing can surface items from
    /// unrelated cells; filter against item bounds.
    pub fn query_point_into(&self, p: Vec3, max_results: Option<usize>, out: &mut Vec<u32>) {
        out.clear();
        let (x, y, z) = self.cell_coord(p);
        self.collect_bucket(self.bucket_of(x, y, z), max_results, out);
    }

    /// Collects the union of items over every cell overlapped by
    /// `bounds` into `out`. Items spanning several cells appear once
    /// per overlapped cell; use [`Self::query_unique_into`] for a
    /// deduplicated result.
    pub fn query_bounds_into(&self, bounds: &Aabb, max_results: Option<usize>, out: &mut Vec<u32>) {
        out.clear();
        let (x0, y0, z0) = self.cell_coord(bounds.min);
        let (x1, y1, z1) = self.cell_coord(bounds.max);
        for x in x0..=x1 {
            for y in y0..=y1 {
                for z in z0..=z1 {
                    if let Some(cap) = max_results {
                        if out.len() >= cap {
                            return;
                        }
                    }
                    self.collect_bucket(self.bucket_of(x, y, z), max_results, out);
                }
            }
        }
    }

    /// Like [`Self::query_bounds_into`], then sorts and deduplicates.
    pub fn query_unique_into(&self, bounds: &Aabb, max_results: Option<usize>, out: &mut Vec<u32>) {
        self.query_bounds_into(bounds, None, out);
        out.sort_unstable();
        out.dedup();
        if let Some(cap) = max_results {
            out.truncate(cap);
        }
    }
}

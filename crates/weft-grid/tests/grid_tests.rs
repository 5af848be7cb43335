//! Integration tests for weft-grid.

use weft_grid::{GridConfig, SpatialHashGrid};
use weft_math::{Aabb, Vec3};

/// Fattened bounds of the canonical single-triangle physical mesh.
fn triangle_bounds() -> Aabb {
    let mut bounds = Aabb::from_point(Vec3::ZERO);
    bounds.include(Vec3::new(1.0, 0.0, 0.0));
    bounds.include(Vec3::new(0.0, 1.0, 0.0));
    bounds.fatten(0.1);
    bounds
}

// ─── Query Tests ──────────────────────────────────────────────

#[test]
fn point_inside_bounds_is_found() {
    let mut grid = SpatialHashGrid::new(1.0);
    grid.insert_bounds(&triangle_bounds(), 7);

    let mut result = Vec::new();
    grid.query_point_into(Vec3::new(0.25, 0.25, 0.0), None, &mut result);
    assert!(result.contains(&7));
}

#[test]
fn point_far_outside_returns_empty() {
    let mut grid = SpatialHashGrid::new(1.0);
    grid.insert_bounds(&triangle_bounds(), 7);

    let mut result = Vec::new();
    grid.query_point_into(Vec3::splat(100.5), None, &mut result);
    assert!(result.is_empty());
}

#[test]
fn point_insert_and_query() {
    let mut grid = SpatialHashGrid::new(0.5);
    grid.insert_point(Vec3::new(0.2, 0.2, 0.2), 3);
    grid.insert_point(Vec3::new(0.3, 0.3, 0.3), 4);

    let mut result = Vec::new();
    grid.query_point_into(Vec3::new(0.25, 0.25, 0.25), None, &mut result);
    result.sort_unstable();
    assert_eq!(result, vec![3, 4]);
}

#[test]
fn bounds_query_unions_cells() {
    let mut grid = SpatialHashGrid::new(1.0);
    grid.insert_point(Vec3::new(0.5, 0.5, 0.5), 1);
    grid.insert_point(Vec3::new(1.5, 0.5, 0.5), 2);

    let mut query = Aabb::from_point(Vec3::new(0.1, 0.1, 0.1));
    query.include(Vec3::new(1.9, 0.9, 0.9));

    let mut result = Vec::new();
    grid.query_unique_into(&query, None, &mut result);
    assert_eq!(result, vec![1, 2]);
}

#[test]
fn unique_query_deduplicates_spanning_items() {
    let mut grid = SpatialHashGrid::new(1.0);
    // spans two cells along x, so the raw union reports it twice
    let mut bounds = Aabb::from_point(Vec3::new(0.2, 0.2, 0.2));
    bounds.include(Vec3::new(1.8, 0.8, 0.8));
    grid.insert_bounds(&bounds, 9);

    let mut raw = Vec::new();
    grid.query_bounds_into(&bounds, None, &mut raw);
    assert!(raw.len() >= 2);

    let mut unique = Vec::new();
    grid.query_unique_into(&bounds, None, &mut unique);
    assert_eq!(unique, vec![9]);
}

#[test]
fn max_results_caps_output() {
    let mut grid = SpatialHashGrid::new(1.0);
    for id in 0..5 {
        grid.insert_point(Vec3::new(0.5, 0.5, 0.5), id);
    }

    let mut result = Vec::new();
    grid.query_point_into(Vec3::new(0.5, 0.5, 0.5), Some(3), &mut result);
    assert_eq!(result.len(), 3);
}

// ─── Reset & Reconfiguration Tests ────────────────────────────

#[test]
fn reset_empties_all_buckets() {
    let mut grid = SpatialHashGrid::new(1.0);
    grid.insert_point(Vec3::ZERO, 1);
    grid.reset();

    let mut result = Vec::new();
    grid.query_point_into(Vec3::ZERO, None, &mut result);
    assert!(result.is_empty());
    assert_eq!(grid.entry_count(), 0);
}

#[test]
fn grid_survives_many_reset_cycles() {
    let mut grid = SpatialHashGrid::new(1.0);
    let mut result = Vec::new();
    for round in 0..100u32 {
        grid.reset();
        grid.insert_point(Vec3::ZERO, round);
        grid.query_point_into(Vec3::ZERO, None, &mut result);
        assert_eq!(result, vec![round]);
    }
}

#[test]
fn set_spacing_invalidates_contents() {
    let mut grid = SpatialHashGrid::new(1.0);
    grid.insert_point(Vec3::ZERO, 1);

    grid.set_spacing(0.25);
    assert_eq!(grid.spacing(), 0.25);

    let mut result = Vec::new();
    grid.query_point_into(Vec3::ZERO, None, &mut result);
    assert!(result.is_empty());
}

#[test]
fn non_positive_spacing_is_clamped() {
    let grid = SpatialHashGrid::new(0.0);
    assert!(grid.spacing() > 0.0);
}

#[test]
fn custom_table_size() {
    let mut grid = SpatialHashGrid::with_config(GridConfig {
        spacing: 1.0,
        table_size: 17,
    });
    grid.insert_point(Vec3::ZERO, 1);

    let mut result = Vec::new();
    grid.query_point_into(Vec3::ZERO, None, &mut result);
    assert_eq!(result, vec![1]);
}

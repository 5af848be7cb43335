//! # weft-grid
//!
//! Uniform spatial hash grid over points and axis-aligned boxes.
//!
//! The binder inserts every candidate element's fattened bounds once,
//! then issues one point query per graphical vertex. The grid is
//! rebuilt many times within a batch run, so invalidation is O(1):
//! a generation counter stamps every bucket, and a bucket whose stamp
//! is stale reads as empty without touching the bucket array.

pub mod spatial_hash;

pub use spatial_hash::{GridConfig, SpatialHashGrid};

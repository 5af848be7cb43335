//! # weft-mesh
//!
//! Mesh data model for the Weft binding pipeline.
//!
//! ## Key Types
//!
//! - [`PhysicalMesh`] — The coarse simulated surface (or tetrahedral
//!   volume) that drives deformation. Carries skinning normals, master
//!   group masks, and the simulated/static partition boundaries.
//! - [`GraphicalSubmesh`] — One submesh of the rendered surface that
//!   is reconstructed from the physical mesh every frame. Read-only
//!   input to the binder.
//! - [`Topology`] — Vertex-to-element adjacency for the physical mesh.
//! - Procedural generators for test meshes (quad grids, fixtures).

pub mod generators;
pub mod graphical;
pub mod physical;
pub mod topology;

pub use graphical::{GraphicalSubmesh, Tangents};
pub use physical::PhysicalMesh;
pub use topology::Topology;

//! Scalar type alias for the binding pipeline.
//!
//! All authored mesh data and map entries use `f32`; the maps are
//! consumed verbatim by the runtime skinning path, which operates on
//! single-precision vertex buffers.

/// The floating-point type used throughout the pipeline.
pub type Scalar = f32;

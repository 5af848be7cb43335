//! Shared numeric constants for the binding pipeline.

/// Epsilon for floating-point comparisons.
pub const EPSILON: f32 = 1.0e-7;

/// Epsilon for degenerate triangle detection (doubled-area threshold).
pub const DEGENERATE_AREA_THRESHOLD: f32 = 1.0e-10;

/// Epsilon for degenerate tetrahedron detection (volume threshold).
pub const DEGENERATE_VOLUME_THRESHOLD: f32 = 1.0e-12;

/// Tolerance for clamping barycentric coordinates into `[0, 1]`.
/// A coordinate within this distance of the valid range is snapped in;
/// anything further out marks the fit as poor.
pub const BARY_CLAMP_TOLERANCE: f32 = 1.0e-4;

/// Default offset along the vertex normal for the auxiliary normal and
/// tangent fit points, as a fraction of the physical mesh's average
/// edge length.
pub const DEFAULT_OFFSET_ALONG_NORMAL_FACTOR: f32 = 0.1;

/// Default maximum angle (degrees) between a graphical vertex normal
/// and its matched physical vertex normal for an immediate match.
pub const DEFAULT_NORMAL_RESEMBLANCE_DEG: f32 = 25.0;

/// Error penalty added to poor-validity fits accepted by the
/// exhaustive fallback. Large enough that any fully valid fit wins.
pub const POOR_FIT_PENALTY: f32 = 100.0;

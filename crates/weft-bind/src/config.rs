//! Binder configuration.
//!
//! Tunables for the correspondence build. Defaults reproduce the
//! authoring pipeline's standard behavior; every derived value can be
//! pinned explicitly.

use serde::{Deserialize, Serialize};
use weft_types::constants::DEFAULT_NORMAL_RESEMBLANCE_DEG;
use weft_types::{WeftError, WeftResult};

/// Configuration for one correspondence build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindConfig {
    /// Spatial grid cell spacing. `None` derives it from the mean
    /// half-diagonal of the fattened candidate bounds.
    pub grid_spacing: Option<f32>,

    /// Maximum angle (degrees) between a graphical vertex normal and a
    /// physical vertex normal for an immediate match. Must be
    /// positive; values above 90 are clamped to 90.
    pub normal_resemblance_deg: f32,

    /// Maximum distance between a graphical and a physical vertex for
    /// an immediate match. The default of 0 demands exact coincidence.
    pub distance_epsilon: f32,

    /// Fold every immediate match into the skin map so the runtime
    /// pays for a single skinning path. Forced on when tangents are
    /// present and most vertices are mesh-mesh skinned anyway.
    pub integrate_immediate_map: bool,

    /// Offset-along-normal scale for the auxiliary normal/tangent fit
    /// points. `None` derives `0.1 ×` the physical mesh's average edge
    /// length.
    pub offset_along_normal: Option<f32>,

    /// Scan every candidate when the spatial query comes back empty,
    /// accepting poor fits with a penalty instead of leaving the
    /// vertex unmapped.
    pub exhaustive_fallback: bool,
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            grid_spacing: None,
            normal_resemblance_deg: DEFAULT_NORMAL_RESEMBLANCE_DEG,
            distance_epsilon: 0.0,
            integrate_immediate_map: false,
            offset_along_normal: None,
            exhaustive_fallback: true,
        }
    }
}

impl BindConfig {
    /// Validates the configuration, returning a copy with
    /// out-of-range-but-recoverable values clamped.
    ///
    /// A non-positive resemblance angle is a hard error (it would
    /// reject every match); angles above 90 degrees are clamped with a
    /// warning.
    pub fn validated(&self) -> WeftResult<BindConfig> {
        let mut config = self.clone();

        if !config.normal_resemblance_deg.is_finite() || config.normal_resemblance_deg <= 0.0 {
            return Err(WeftError::InvalidConfig(format!(
                "Normal resemblance angle must be in (0, 90], got {}",
                config.normal_resemblance_deg
            )));
        }
        if config.normal_resemblance_deg > 90.0 {
            tracing::warn!(
                angle = config.normal_resemblance_deg,
                "normal resemblance angle clamped to 90 degrees"
            );
            config.normal_resemblance_deg = 90.0;
        }

        if config.distance_epsilon < 0.0 {
            return Err(WeftError::InvalidConfig(format!(
                "Distance epsilon must be non-negative, got {}",
                config.distance_epsilon
            )));
        }
        if let Some(spacing) = config.grid_spacing {
            if !(spacing > 0.0) {
                return Err(WeftError::InvalidConfig(format!(
                    "Grid spacing must be positive, got {}",
                    spacing
                )));
            }
        }
        if let Some(offset) = config.offset_along_normal {
            if !(offset > 0.0) {
                return Err(WeftError::InvalidConfig(format!(
                    "Offset along normal must be positive, got {}",
                    offset
                )));
            }
        }

        Ok(config)
    }
}

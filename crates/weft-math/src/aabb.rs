//! Axis-aligned bounding boxes.
//!
//! Used to bound candidate triangles and tetrahedra before they are
//! binned into the spatial hash grid. Boxes are fattened by the
//! physical mesh's average edge length so that nearby-but-off-surface
//! query points still land inside.

use glam::Vec3;

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// A degenerate box containing exactly one point.
    #[inline]
    pub fn from_point(p: Vec3) -> Self {
        Self { min: p, max: p }
    }

    /// Grows the box to contain `p`.
    #[inline]
    pub fn include(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// The smallest box containing both inputs.
    #[inline]
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Grows the box by `margin` on all six sides.
    #[inline]
    pub fn fatten(&mut self, margin: f32) {
        let m = Vec3::splat(margin);
        self.min -= m;
        self.max += m;
    }

    /// Returns true if `p` lies inside or on the boundary.
    #[inline]
    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Half-diagonal vector (center to max corner).
    #[inline]
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Full-diagonal length.
    #[inline]
    pub fn diagonal(&self) -> f32 {
        (self.max - self.min).length()
    }
}

//! Master/slave group masks.
//!
//! Bitfields that partition vertices into compatible matching groups,
//! e.g. separate cloth panels that must never cross-match. A physical
//! vertex carries a *master* mask naming the groups it may serve; a
//! graphical vertex carries a *slave* mask naming the groups allowed
//! to serve it. A pairing is legal when the two masks intersect.

use serde::{Deserialize, Serialize};

/// A 32-bit group membership mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupMask(pub u32);

impl GroupMask {
    /// Member of every group. Vertices without authored masks match
    /// anything.
    pub const ALL: GroupMask = GroupMask(u32::MAX);

    /// Member of no group. Never matches.
    pub const NONE: GroupMask = GroupMask(0);

    /// Returns true if the two masks share at least one group.
    #[inline]
    pub fn intersects(self, other: GroupMask) -> bool {
        (self.0 & other.0) != 0
    }

    /// Returns true if no group bit is set.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Union of two masks.
    #[inline]
    pub fn union(self, other: GroupMask) -> GroupMask {
        GroupMask(self.0 | other.0)
    }

    /// An empty mask reads as "unauthored" and is promoted to `ALL` so
    /// the vertex can still match somewhere.
    #[inline]
    pub fn or_all(self) -> GroupMask {
        if self.is_empty() {
            GroupMask::ALL
        } else {
            self
        }
    }
}

impl Default for GroupMask {
    fn default() -> Self {
        GroupMask::ALL
    }
}

impl From<u32> for GroupMask {
    fn from(bits: u32) -> Self {
        GroupMask(bits)
    }
}

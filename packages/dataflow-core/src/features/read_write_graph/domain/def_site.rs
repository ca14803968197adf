//! Memory-access descriptors: which bytes of which object a node touches

use super::node::NodeId;
use crate::shared::models::{range_covers, ranges_overlap, Offset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// `(object, offset, length)` triple attached to a read or a write
#[derive(Clone, Copy, Serialize, Deserialize)]
pub struct DefSite {
    /// Memory object (an allocation-like node, or UNKNOWN_MEMORY)
    pub target: NodeId,
    pub offset: Offset,
    pub len: Offset,
}

impl DefSite {
    pub fn new(target: NodeId, offset: Offset, len: Offset) -> Self {
        Self {
            target,
            offset,
            len,
        }
    }

    /// Site with a fully known byte range
    pub fn known(target: NodeId, offset: u64, len: u64) -> Self {
        Self::new(target, Offset::new(offset), Offset::new(len))
    }

    /// The whole object, bytes unknown
    pub fn whole(target: NodeId) -> Self {
        Self::new(target, Offset::UNKNOWN, Offset::UNKNOWN)
    }

    #[inline]
    pub fn is_unknown_range(&self) -> bool {
        self.offset.is_unknown() || self.len.is_unknown()
    }

    /// Same site with the byte range dropped
    pub fn widened(&self) -> Self {
        Self::whole(self.target)
    }

    /// Could the two objects be the same memory?
    ///
    /// UNKNOWN_MEMORY aliases every object.
    #[inline]
    pub fn targets_may_alias(&self, other: &DefSite) -> bool {
        self.target == other.target
            || self.target == NodeId::UNKNOWN_MEMORY
            || other.target == NodeId::UNKNOWN_MEMORY
    }

    /// May the two sites touch a common byte?
    ///
    /// Offsets into UNKNOWN_MEMORY say nothing about the concrete object,
    /// so a site on unknown memory overlaps every site.
    pub fn may_overlap(&self, other: &DefSite) -> bool {
        if self.target == NodeId::UNKNOWN_MEMORY || other.target == NodeId::UNKNOWN_MEMORY {
            return true;
        }
        self.target == other.target
            && ranges_overlap(self.offset, self.len, other.offset, other.len)
    }

    /// Does a write to `self` overwrite every byte of `other`?
    ///
    /// Requires the very same concrete object and fully known ranges.
    pub fn covers(&self, other: &DefSite) -> bool {
        self.target == other.target
            && self.target != NodeId::UNKNOWN_MEMORY
            && range_covers(self.offset, self.len, other.offset, other.len)
    }
}

impl fmt::Debug for DefSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}, +{}]", self.target, self.offset, self.len)
    }
}

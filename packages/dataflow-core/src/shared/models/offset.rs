/*
 * Offset - byte offsets into abstract memory objects
 *
 * An offset is either a known non-negative byte count or UNKNOWN.
 * Arithmetic saturates to UNKNOWN, and UNKNOWN never compares equal
 * to anything (including itself), so callers are forced to treat it
 * conservatively.
 */

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};

/// Byte offset (or length) with an explicit "unknown" state
#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Offset(u64);

impl Offset {
    /// The reserved "unknown" value
    pub const UNKNOWN: Offset = Offset(u64::MAX);

    /// Zero offset
    pub const ZERO: Offset = Offset(0);

    /// Create a known offset.
    ///
    /// `u64::MAX` is reserved for UNKNOWN, so passing it yields UNKNOWN.
    #[inline]
    pub const fn new(value: u64) -> Self {
        Offset(value)
    }

    #[inline]
    pub const fn is_unknown(&self) -> bool {
        self.0 == u64::MAX
    }

    #[inline]
    pub const fn is_known(&self) -> bool {
        !self.is_unknown()
    }

    /// Numeric value, `None` for UNKNOWN
    #[inline]
    pub const fn value(&self) -> Option<u64> {
        if self.is_unknown() {
            None
        } else {
            Some(self.0)
        }
    }

    /// Structural identity (UNKNOWN is identical to UNKNOWN).
    ///
    /// Only for bookkeeping such as cache keys; use `==` for semantics.
    #[inline]
    pub(crate) const fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for Offset {
    fn default() -> Self {
        Offset::ZERO
    }
}

impl From<u64> for Offset {
    fn from(value: u64) -> Self {
        Offset::new(value)
    }
}

impl PartialEq for Offset {
    fn eq(&self, other: &Self) -> bool {
        self.is_known() && other.is_known() && self.0 == other.0
    }
}

impl PartialOrd for Offset {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.is_unknown() || other.is_unknown() {
            return None;
        }
        Some(self.0.cmp(&other.0))
    }
}

impl Add for Offset {
    type Output = Offset;

    fn add(self, rhs: Offset) -> Offset {
        match (self.value(), rhs.value()) {
            (Some(a), Some(b)) => a.checked_add(b).map_or(Offset::UNKNOWN, Offset::new),
            _ => Offset::UNKNOWN,
        }
    }
}

impl Sub for Offset {
    type Output = Offset;

    /// Underflow also yields UNKNOWN (offsets are never negative)
    fn sub(self, rhs: Offset) -> Offset {
        match (self.value(), rhs.value()) {
            (Some(a), Some(b)) => a.checked_sub(b).map_or(Offset::UNKNOWN, Offset::new),
            _ => Offset::UNKNOWN,
        }
    }
}

impl fmt::Debug for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Some(v) => write!(f, "{}", v),
            None => write!(f, "?"),
        }
    }
}

/// Half-open byte interval `[start, end)` of a known range
///
/// Returns `None` when the range is not fully known (unknown offset,
/// unknown length, or an end that overflows).
#[inline]
pub fn known_interval(offset: Offset, len: Offset) -> Option<(u64, u64)> {
    let start = offset.value()?;
    let end = (offset + len).value()?;
    Some((start, end))
}

/// May `[off1, off1+len1)` and `[off2, off2+len2)` share a byte?
///
/// Unknown ranges overlap everything. Empty known ranges overlap nothing.
pub fn ranges_overlap(off1: Offset, len1: Offset, off2: Offset, len2: Offset) -> bool {
    match (known_interval(off1, len1), known_interval(off2, len2)) {
        (Some((s1, e1)), Some((s2, e2))) => s1 < e2 && s2 < e1,
        _ => true,
    }
}

/// Does `[off1, off1+len1)` provably contain `[off2, off2+len2)`?
///
/// Never true when either range is unknown.
pub fn range_covers(off1: Offset, len1: Offset, off2: Offset, len2: Offset) -> bool {
    match (known_interval(off1, len1), known_interval(off2, len2)) {
        (Some((s1, e1)), Some((s2, e2))) => s1 <= s2 && e2 <= e1,
        _ => false,
    }
}

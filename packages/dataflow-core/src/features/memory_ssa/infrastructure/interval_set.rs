//! Sorted set of disjoint half-open byte intervals
//!
//! Tracks which bytes of a query are still not overwritten while walking
//! backwards from a use.

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct IntervalSet {
    /// Sorted, disjoint, non-empty `[start, end)` pairs
    intervals: Vec<(u64, u64)>,
}

impl IntervalSet {
    /// Every representable byte: `[0, u64::MAX)`
    pub fn full() -> Self {
        Self::single(0, u64::MAX)
    }

    pub fn single(start: u64, end: u64) -> Self {
        let intervals = if start < end { vec![(start, end)] } else { Vec::new() };
        Self { intervals }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.intervals.iter().copied()
    }

    /// Does `[start, end)` share a byte with the set?
    pub fn intersects(&self, start: u64, end: u64) -> bool {
        start < end && self.intervals.iter().any(|&(s, e)| start < e && s < end)
    }

    /// Remove `[start, end)` from the set
    pub fn subtract(&mut self, start: u64, end: u64) {
        if start >= end {
            return;
        }
        let mut result = Vec::with_capacity(self.intervals.len() + 1);
        for &(s, e) in &self.intervals {
            if e <= start || end <= s {
                result.push((s, e));
                continue;
            }
            if s < start {
                result.push((s, start));
            }
            if end < e {
                result.push((end, e));
            }
        }
        self.intervals = result;
    }
}

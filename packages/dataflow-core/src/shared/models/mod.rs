//! Shared value types

pub mod offset;

pub use offset::{known_interval, range_covers, ranges_overlap, Offset};

//! Memory SSA construction

pub mod interval_set;
pub mod transformation;

pub use interval_set::IntervalSet;
pub use transformation::{
    MemoryDef, MemoryPhi, MemorySSAStats, MemorySSATransformation, PhiId,
};

//! Feature modules - Each feature follows Hexagonal Architecture
//!
//! Each feature contains:
//! - domain/     - Pure data model
//! - ports/      - Interface definitions (traits)
//! - application/ - Entry points used by callers
//! - infrastructure/ - Algorithms

pub mod read_write_graph;

// Engines behind the data-dependence facade
pub mod memory_ssa;
pub mod reaching_definitions;

pub mod data_dependence;

pub mod points_to;

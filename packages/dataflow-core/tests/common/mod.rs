//! Common test utilities for dataflow-core
//!
//! Builders and proptest strategies for Read-Write Graphs and points-to
//! graphs, plus a path-based oracle for definitions that must be reported.

#![allow(dead_code)]

mod builders;
mod oracle;

pub use builders::*;
pub use oracle::*;

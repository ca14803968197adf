//! # Points-to Graph
//!
//! Typed pointer-operation graph produced by a points-to solver, and the
//! structural validator run over it before it is trusted.
//!
//! ```text
//! let report = PointerGraphValidator::new(&graph).validate();
//! if report.is_invalid() {
//!     eprint!("{}", report);
//! }
//! ```

pub mod domain;
pub mod infrastructure;

pub use domain::{Arity, PSNode, PSNodeId, PSNodeType, PointerGraph};
pub use infrastructure::{Diagnostic, PointerGraphValidator, ValidationReport};

pub mod errors;

pub use errors::{DataDependenceError, DataDependenceResult};

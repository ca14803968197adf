pub mod diagnostic;
pub mod validator;

pub use diagnostic::{Diagnostic, ValidationReport};
pub use validator::PointerGraphValidator;

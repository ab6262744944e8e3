//! Diagnostic types for error reporting.

mod error;
mod span;

pub use error::ScaffoldError;
pub use span::Span;

//! PHP source model: generated syntax, printing, and reading existing files.

pub mod ast;
pub mod fingerprint;
pub mod imports;
pub mod printer;
pub mod reader;

pub use ast::{ClassName, Expr, MethodDeclaration, Param, PhpType, Stmt, Visibility};
pub use imports::ImportSet;
pub use printer::Printer;
pub use reader::{ExistingClass, ExistingMethod, PhpParser};

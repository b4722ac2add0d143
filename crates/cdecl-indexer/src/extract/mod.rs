//! Declaration and diagnostic extraction.
//!
//! [`extract_declarations`] walks one source file and records the
//! top-level functions, aggregates, and macros it declares.
//! [`parse_compile_log`] recovers structured diagnostics from a build
//! tool's captured output.

mod compile_log;
mod declarations;
mod types;

pub use compile_log::parse_compile_log;
pub use declarations::extract_declarations;
pub use types::{
    Field, FileDeclarations, FunctionDecl, LogMessage, MacroDecl, Severity, StructDecl, StructKind,
};

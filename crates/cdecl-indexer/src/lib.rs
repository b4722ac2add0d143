pub mod arena;
pub mod codec;
pub mod config;
pub mod extract;
pub mod index;
pub mod server;
pub mod syntax;

pub use arena::{Arena, ArenaError, ArenaStr};
pub use codec::{CodecError, Decoder, Encoder};
pub use config::ServerConfig;
pub use extract::{
    FileDeclarations, Field, FunctionDecl, LogMessage, MacroDecl, Severity, StructDecl, StructKind,
    extract_declarations, parse_compile_log,
};
pub use index::DeclarationIndex;
pub use server::Session;

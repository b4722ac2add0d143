use crate::arena::ArenaStr;

/// One name/type pair: a function parameter, an aggregate member, or an
/// enum constant. Enum constants have no type, so `type_name` is absent
/// for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub type_name: Option<ArenaStr>,
    pub name: ArenaStr,
}

/// A top-level function declaration with its signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDecl {
    pub line: u32,
    pub name: ArenaStr,
    pub return_type: ArenaStr,
    pub parameters: Vec<Field>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructKind {
    Struct,
    Union,
    Enum,
}

impl StructKind {
    /// Label used when reporting the declaration to a client.
    pub fn as_wire(self) -> &'static str {
        match self {
            StructKind::Struct => "struct",
            StructKind::Union => "union",
            StructKind::Enum => "enum",
        }
    }
}

/// A named aggregate: `struct`, `union`, or `enum`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDecl {
    pub line: u32,
    pub name: ArenaStr,
    pub kind: StructKind,
    pub fields: Vec<Field>,
}

/// A `#define` with a name. Parameters and replacement text are not kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacroDecl {
    pub line: u32,
    pub name: ArenaStr,
}

/// Everything extracted from one source file. String handles resolve
/// against the arena the file was extracted into.
#[derive(Debug, Default)]
pub struct FileDeclarations {
    pub functions: Vec<FunctionDecl>,
    pub structs: Vec<StructDecl>,
    pub macros: Vec<MacroDecl>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    /// Single-letter form expected by quickfix-style consumers.
    pub fn as_wire(self) -> &'static str {
        match self {
            Severity::Error => "E",
            Severity::Warning => "W",
        }
    }
}

/// One diagnostic recovered from a compile log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessage {
    pub lnum: u32,
    pub col: u32,
    pub code: String,
    pub severity: Severity,
    pub filename: String,
    pub text: String,
}

//! Declaration index over a source tree.
//!
//! The index owns one large arena budget; every indexed file carves a
//! child arena out of it and keeps its declaration strings there. A file
//! is re-extracted only when its modification time changes.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::Path;
use std::time::SystemTime;

use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::arena::{Arena, ArenaError};
use crate::extract::{FunctionDecl, MacroDecl, StructDecl, extract_declarations};

/// Total string budget shared by every indexed file.
const INDEX_ARENA_BYTES: usize = 200 * 1024 * 1024;
/// Per-file slice carved out of the shared budget.
const FILE_ARENA_BYTES: usize = 1024 * 1024;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error(transparent)]
    Arena(#[from] ArenaError),
}

/// Declarations of a single file plus the cache key that validates them.
pub struct FileEntry {
    pub path: String,
    pub mtime: Option<SystemTime>,
    pub arena: Arena,
    pub functions: Vec<FunctionDecl>,
    pub structs: Vec<StructDecl>,
    pub macros: Vec<MacroDecl>,
}

/// All indexed files, keyed by path as discovered.
pub struct DeclarationIndex {
    budget: Arena,
    files: HashMap<String, FileEntry>,
}

impl DeclarationIndex {
    pub fn new() -> Self {
        Self::with_budget(INDEX_ARENA_BYTES)
    }

    pub fn with_budget(bytes: usize) -> Self {
        Self {
            budget: Arena::with_capacity(bytes),
            files: HashMap::new(),
        }
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn files(&self) -> impl Iterator<Item = &FileEntry> {
        self.files.values()
    }

    pub fn get(&self, path: &str) -> Option<&FileEntry> {
        self.files.get(path)
    }

    /// Whether `path` must be (re-)extracted for the given mtime.
    pub fn needs_refresh(&self, path: &str, mtime: SystemTime) -> bool {
        self.files
            .get(path)
            .map_or(true, |entry| entry.mtime != Some(mtime))
    }

    /// Extract `content` into the entry for `path`, creating it on first
    /// sight. Returns `Ok(false)` when the cached mtime already matches.
    pub fn upsert(
        &mut self,
        path: &str,
        mtime: SystemTime,
        content: &str,
    ) -> Result<bool, IndexError> {
        let entry = match self.files.entry(path.to_owned()) {
            Entry::Occupied(occupied) => {
                let entry = occupied.into_mut();
                if entry.mtime == Some(mtime) {
                    return Ok(false);
                }
                entry
            }
            Entry::Vacant(vacant) => {
                let arena = self.budget.create_child(FILE_ARENA_BYTES)?;
                vacant.insert(FileEntry {
                    path: path.to_owned(),
                    mtime: None,
                    arena,
                    functions: Vec::new(),
                    structs: Vec::new(),
                    macros: Vec::new(),
                })
            }
        };

        entry.arena.reset();
        entry.functions.clear();
        entry.structs.clear();
        entry.macros.clear();

        let declarations = extract_declarations(content, &mut entry.arena)?;
        entry.functions = declarations.functions;
        entry.structs = declarations.structs;
        entry.macros = declarations.macros;
        entry.mtime = Some(mtime);

        debug!(
            path = %path,
            functions = entry.functions.len(),
            structs = entry.structs.len(),
            macros = entry.macros.len(),
            "indexed file"
        );
        Ok(true)
    }

    /// Walk `root` and refresh every file whose name matches one of
    /// `extensions`. Returns whether anything was re-extracted.
    ///
    /// Unreadable files and arena exhaustion are logged and skipped; a
    /// scan never fails as a whole.
    pub fn scan_tree(&mut self, root: &Path, extensions: &[String]) -> bool {
        let mut changed = false;

        for entry in WalkDir::new(root).into_iter().filter_map(Result::ok) {
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if name.ends_with('~') {
                continue;
            }
            if !extensions.iter().any(|ext| name.ends_with(ext.as_str())) {
                continue;
            }

            let path = entry.path().to_string_lossy().into_owned();
            let mtime = match entry.metadata().map(|meta| meta.modified()) {
                Ok(Ok(mtime)) => mtime,
                Ok(Err(error)) => {
                    warn!(path = %path, %error, "could not stat file, skipping");
                    continue;
                }
                Err(error) => {
                    warn!(path = %path, %error, "could not stat file, skipping");
                    continue;
                }
            };
            if !self.needs_refresh(&path, mtime) {
                continue;
            }

            let content = match std::fs::read(entry.path()) {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(error) => {
                    warn!(path = %path, %error, "could not read file, skipping");
                    continue;
                }
            };

            match self.upsert(&path, mtime, &content) {
                Ok(updated) => changed |= updated,
                Err(error) => warn!(path = %path, %error, "extraction failed, skipping"),
            }
        }

        changed
    }
}

impl Default for DeclarationIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/src/index_tests.rs"]
mod tests;

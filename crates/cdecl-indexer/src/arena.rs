use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ArenaError {
    #[error("arena capacity exceeded: requested {requested} byte(s), {remaining} remaining")]
    CapacityExceeded { requested: usize, remaining: usize },
}

/// Handle to a string stored in an [`Arena`].
///
/// A handle is only meaningful against the arena that produced it and is
/// invalidated by [`Arena::reset`]; resolving a stale handle yields `""`
/// rather than leftover text, because a reset zero-fills the storage it
/// reclaims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaStr {
    offset: u32,
    len: u32,
}

impl ArenaStr {
    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Bump allocator with a fixed byte budget.
///
/// Allocation only ever advances a cursor; the sole way to reclaim space is
/// [`Arena::reset`], which discards everything at once. Per-file isolation
/// (one child arena per indexed file) keeps that an acceptable granularity:
/// a reset only ever throws away that one file's declarations.
#[derive(Debug)]
pub struct Arena {
    buf: Vec<u8>,
    capacity: usize,
    /// Bytes handed to child arenas; they count against this arena's budget
    /// but live in the children.
    reserved: usize,
}

impl Arena {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::new(),
            capacity,
            reserved: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn used(&self) -> usize {
        self.buf.len() + self.reserved
    }

    pub fn remaining(&self) -> usize {
        self.capacity - self.used()
    }

    /// Allocate `size` zero-initialized bytes, advancing the cursor.
    pub fn alloc(&mut self, size: usize) -> Result<ArenaStr, ArenaError> {
        if size > self.remaining() {
            return Err(ArenaError::CapacityExceeded {
                requested: size,
                remaining: self.remaining(),
            });
        }
        let offset = self.buf.len();
        self.buf.resize(offset + size, 0);
        Ok(ArenaStr {
            offset: offset as u32,
            len: size as u32,
        })
    }

    /// Copy `text` into the arena and return a handle to it.
    pub fn store_str(&mut self, text: &str) -> Result<ArenaStr, ArenaError> {
        let span = self.alloc(text.len())?;
        self.buf[span.offset as usize..span.offset as usize + text.len()]
            .copy_from_slice(text.as_bytes());
        Ok(span)
    }

    /// Resolve a handle back to its text. Stale handles resolve to `""`.
    pub fn text(&self, span: ArenaStr) -> &str {
        let start = span.offset as usize;
        self.buf
            .get(start..start + span.len as usize)
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
            .unwrap_or("")
    }

    /// Carve a fixed-size child arena out of this arena's remaining budget.
    ///
    /// The child owns its storage and resets independently; its budget stays
    /// reserved in the parent for the child's whole lifetime.
    pub fn create_child(&mut self, size: usize) -> Result<Arena, ArenaError> {
        if size > self.remaining() {
            return Err(ArenaError::CapacityExceeded {
                requested: size,
                remaining: self.remaining(),
            });
        }
        self.reserved += size;
        Ok(Arena::with_capacity(size))
    }

    /// Rewind the cursor to zero and zero-fill the reclaimed bytes.
    ///
    /// Stale declaration text must never leak into a fresh parse that
    /// allocates fewer bytes than the previous one did.
    pub fn reset(&mut self) {
        for byte in self.buf.iter_mut() {
            *byte = 0;
        }
        self.buf.clear();
    }
}

#[cfg(test)]
#[path = "../tests/src/arena_tests.rs"]
mod tests;

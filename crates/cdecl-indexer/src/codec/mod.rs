//! Wire codec for the subset of MessagePack the RPC channel uses.
//!
//! Only the formats the protocol actually exchanges are implemented:
//! nil, booleans, unsigned integers up to 32 bits, UTF-8 strings,
//! arrays, and maps. All multi-byte length prefixes and integer
//! payloads are big-endian.

mod decode;
mod encode;

pub use decode::Decoder;
pub use encode::Encoder;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("message truncated, needed {needed} more byte(s)")]
    Truncated { needed: usize },
    #[error("expected {expected}, found format byte {found:#04x}")]
    UnexpectedFormat { expected: &'static str, found: u8 },
    #[error("string payload is not valid UTF-8")]
    InvalidUtf8,
}

// Format bytes shared by the encoder and decoder.
pub(crate) mod format {
    pub const NIL: u8 = 0xc0;
    pub const FALSE: u8 = 0xc2;
    pub const TRUE: u8 = 0xc3;
    pub const UINT8: u8 = 0xcc;
    pub const UINT16: u8 = 0xcd;
    pub const UINT32: u8 = 0xce;
    pub const STR8: u8 = 0xd9;
    pub const STR16: u8 = 0xda;
    pub const STR32: u8 = 0xdb;
    pub const ARRAY16: u8 = 0xdc;
    pub const ARRAY32: u8 = 0xdd;
    pub const MAP16: u8 = 0xde;
    pub const MAP32: u8 = 0xdf;

    pub const FIXMAP: u8 = 0x80;
    pub const FIXARRAY: u8 = 0x90;
    pub const FIXSTR: u8 = 0xa0;
}

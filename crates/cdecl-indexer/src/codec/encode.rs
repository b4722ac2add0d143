use crate::codec::format;

/// Append-only MessagePack writer over a growable buffer.
///
/// Every value picks the smallest format that fits: integers below 128
/// become positive fixints, strings under 32 bytes become fixstrs, and
/// so on up through the 8/16/32-bit prefixed forms.
#[derive(Default)]
pub struct Encoder {
    buf: Vec<u8>,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn encode_nil(&mut self) {
        self.buf.push(format::NIL);
    }

    pub fn encode_bool(&mut self, value: bool) {
        self.buf
            .push(if value { format::TRUE } else { format::FALSE });
    }

    pub fn encode_uint(&mut self, value: u32) {
        if value < 0x80 {
            self.buf.push(value as u8);
        } else if value <= 0xFF {
            self.buf.push(format::UINT8);
            self.buf.push(value as u8);
        } else if value <= 0xFFFF {
            self.buf.push(format::UINT16);
            self.buf.extend_from_slice(&(value as u16).to_be_bytes());
        } else {
            self.buf.push(format::UINT32);
            self.buf.extend_from_slice(&value.to_be_bytes());
        }
    }

    pub fn encode_str(&mut self, value: &str) {
        let len = value.len();
        if len < 32 {
            self.buf.push(format::FIXSTR | len as u8);
        } else if len <= 0xFF {
            self.buf.push(format::STR8);
            self.buf.push(len as u8);
        } else if len <= 0xFFFF {
            self.buf.push(format::STR16);
            self.buf.extend_from_slice(&(len as u16).to_be_bytes());
        } else {
            self.buf.push(format::STR32);
            self.buf.extend_from_slice(&(len as u32).to_be_bytes());
        }
        self.buf.extend_from_slice(value.as_bytes());
    }

    /// Write an array header; the caller then writes `len` elements.
    pub fn encode_array_len(&mut self, len: usize) {
        if len < 16 {
            self.buf.push(format::FIXARRAY | len as u8);
        } else if len <= 0xFFFF {
            self.buf.push(format::ARRAY16);
            self.buf.extend_from_slice(&(len as u16).to_be_bytes());
        } else {
            self.buf.push(format::ARRAY32);
            self.buf.extend_from_slice(&(len as u32).to_be_bytes());
        }
    }

    /// Write a map header; the caller then writes `len` key/value pairs.
    pub fn encode_map_len(&mut self, len: usize) {
        if len < 16 {
            self.buf.push(format::FIXMAP | len as u8);
        } else if len <= 0xFFFF {
            self.buf.push(format::MAP16);
            self.buf.extend_from_slice(&(len as u16).to_be_bytes());
        } else {
            self.buf.push(format::MAP32);
            self.buf.extend_from_slice(&(len as u32).to_be_bytes());
        }
    }

    pub fn bytes_written(&self) -> usize {
        self.buf.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
#[path = "../../tests/src/codec/encode_tests.rs"]
mod tests;

use crate::codec::{CodecError, format};

/// Cursor-based MessagePack reader over a borrowed buffer.
///
/// Strings decode zero-copy as slices of the input. The reader is
/// strictly typed: each `read_*` fails with [`CodecError::UnexpectedFormat`]
/// if the next value is not of the requested kind.
pub struct Decoder<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8], CodecError> {
        if self.remaining() < count {
            return Err(CodecError::Truncated {
                needed: count - self.remaining(),
            });
        }
        let slice = &self.buf[self.pos..self.pos + count];
        self.pos += count;
        Ok(slice)
    }

    fn take_byte(&mut self) -> Result<u8, CodecError> {
        Ok(self.take(1)?[0])
    }

    fn take_u16(&mut self) -> Result<u16, CodecError> {
        let bytes = self.take(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    fn take_u32(&mut self) -> Result<u32, CodecError> {
        let bytes = self.take(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_array_len(&mut self) -> Result<usize, CodecError> {
        match self.take_byte()? {
            byte if byte & 0xf0 == format::FIXARRAY => Ok((byte & 0x0f) as usize),
            format::ARRAY16 => Ok(self.take_u16()? as usize),
            format::ARRAY32 => Ok(self.take_u32()? as usize),
            found => Err(CodecError::UnexpectedFormat {
                expected: "array",
                found,
            }),
        }
    }

    pub fn read_map_len(&mut self) -> Result<usize, CodecError> {
        match self.take_byte()? {
            byte if byte & 0xf0 == format::FIXMAP => Ok((byte & 0x0f) as usize),
            format::MAP16 => Ok(self.take_u16()? as usize),
            format::MAP32 => Ok(self.take_u32()? as usize),
            found => Err(CodecError::UnexpectedFormat {
                expected: "map",
                found,
            }),
        }
    }

    pub fn read_uint(&mut self) -> Result<u32, CodecError> {
        match self.take_byte()? {
            byte @ 0x00..=0x7f => Ok(byte as u32),
            format::UINT8 => Ok(self.take_byte()? as u32),
            format::UINT16 => Ok(self.take_u16()? as u32),
            format::UINT32 => self.take_u32(),
            found => Err(CodecError::UnexpectedFormat {
                expected: "unsigned integer",
                found,
            }),
        }
    }

    pub fn read_str(&mut self) -> Result<&'a str, CodecError> {
        let len = match self.take_byte()? {
            byte if byte & 0xe0 == format::FIXSTR => (byte & 0x1f) as usize,
            format::STR8 => self.take_byte()? as usize,
            format::STR16 => self.take_u16()? as usize,
            format::STR32 => self.take_u32()? as usize,
            found => {
                return Err(CodecError::UnexpectedFormat {
                    expected: "string",
                    found,
                });
            }
        };
        let bytes = self.take(len)?;
        std::str::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8)
    }

    pub fn read_nil(&mut self) -> Result<(), CodecError> {
        match self.take_byte()? {
            format::NIL => Ok(()),
            found => Err(CodecError::UnexpectedFormat {
                expected: "nil",
                found,
            }),
        }
    }

    pub fn read_bool(&mut self) -> Result<bool, CodecError> {
        match self.take_byte()? {
            format::TRUE => Ok(true),
            format::FALSE => Ok(false),
            found => Err(CodecError::UnexpectedFormat {
                expected: "boolean",
                found,
            }),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src/codec/decode_tests.rs"]
mod tests;

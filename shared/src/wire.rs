use thiserror::Error;

/// Errors that can occur while decoding a payload received off the wire.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    /// Payload ended before the announced length was read (SECURITY:
    /// potentially truncated or malicious packet)
    #[error("Unexpected end of payload (needed {needed} more bytes)")]
    UnexpectedEof { needed: usize },

    /// A length-prefixed string was not valid UTF-8
    #[error("Payload string is not valid UTF-8")]
    InvalidUtf8,

    /// A boolean field held something other than 0 or 1
    #[error("Invalid boolean byte {value}")]
    InvalidBool { value: u8 },

    /// Unknown payload tag (version mismatch or malformed packet)
    #[error("Unknown payload tag {tag}")]
    UnknownTag { tag: u8 },
}

/// Anything that can be written to and read back from a byte payload.
pub trait Wire: Sized {
    fn ser(&self, writer: &mut ByteWriter);
    fn de(reader: &mut ByteReader) -> Result<Self, WireError>;
}

// ByteWriter

/// Grows a byte buffer one field at a time. Strings and byte arrays are
/// length-prefixed with a big-endian u32.
pub struct ByteWriter {
    buffer: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(64),
        }
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_bool(&mut self, value: bool) {
        self.write_u8(u8::from(value));
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.write_u32(bytes.len() as u32);
        self.buffer.extend_from_slice(bytes);
    }

    pub fn write_string(&mut self, value: &str) {
        self.write_bytes(value.as_bytes());
    }

    pub fn to_bytes(self) -> Vec<u8> {
        self.buffer
    }
}

impl Default for ByteWriter {
    fn default() -> Self {
        Self::new()
    }
}

// ByteReader

/// Cursor over a received payload. Every read is bounds-checked; a short
/// payload surfaces as `WireError::UnexpectedEof` rather than a panic.
pub struct ByteReader<'a> {
    buffer: &'a [u8],
    cursor: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, cursor: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    pub fn read_u8(&mut self) -> Result<u8, WireError> {
        let slice = self.take(1)?;
        Ok(slice[0])
    }

    pub fn read_u32(&mut self) -> Result<u32, WireError> {
        let slice = self.take(4)?;
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(slice);
        Ok(u32::from_be_bytes(bytes))
    }

    pub fn read_bool(&mut self) -> Result<bool, WireError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(WireError::InvalidBool { value }),
        }
    }

    pub fn read_bytes(&mut self) -> Result<Vec<u8>, WireError> {
        let length = self.read_u32()? as usize;
        let slice = self.take(length)?;
        Ok(slice.to_vec())
    }

    pub fn read_string(&mut self) -> Result<String, WireError> {
        let bytes = self.read_bytes()?;
        String::from_utf8(bytes).map_err(|_| WireError::InvalidUtf8)
    }

    fn take(&mut self, length: usize) -> Result<&'a [u8], WireError> {
        if self.remaining() < length {
            return Err(WireError::UnexpectedEof {
                needed: length - self.remaining(),
            });
        }
        let slice = &self.buffer[self.cursor..self.cursor + length];
        self.cursor += length;
        Ok(slice)
    }
}

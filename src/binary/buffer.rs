//! Bounds-checked byte buffer I/O.
//!
//! All multi-byte integers are little-endian. Strings are UTF-8 with a
//! u32 length prefix.

use crate::{Error, Result};

/// Append-only, growable byte sink used by serializers.
#[derive(Debug, Default)]
pub struct OutputByteBuffer {
    data: Vec<u8>,
}

impl OutputByteBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Create a buffer with a pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Append a single byte.
    pub fn write_u8(&mut self, value: u8) {
        self.data.push(value);
    }

    /// Append a u16 in little-endian form.
    pub fn write_u16(&mut self, value: u16) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    /// Append a u32 in little-endian form.
    pub fn write_u32(&mut self, value: u32) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    /// Append a u32 length prefix followed by the UTF-8 bytes.
    ///
    /// An empty string still writes its zero-length prefix.
    pub fn write_string(&mut self, value: &str) {
        self.write_u32(value.len() as u32);
        self.data.extend_from_slice(value.as_bytes());
    }

    /// Append raw bytes without a length prefix.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow the accumulated bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer, returning the accumulated bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

/// Bounds-checked read cursor over a fixed byte source.
///
/// A buffer instance is consumed linearly by one logical deserialization
/// pass; it must not be shared across concurrent operations.
#[derive(Debug)]
pub struct InputByteBuffer<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> InputByteBuffer<'a> {
    /// Create a cursor positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current cursor position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes remaining after the cursor.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn check(&self, requested: usize) -> Result<()> {
        if self.pos + requested > self.data.len() {
            return Err(Error::OutOfBounds {
                position: self.pos,
                requested,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    /// Read one byte and advance.
    pub fn read_u8(&mut self) -> Result<u8> {
        self.check(1)?;
        let value = self.data[self.pos];
        self.pos += 1;
        Ok(value)
    }

    /// Read one byte without advancing.
    pub fn peek_u8(&self) -> Result<u8> {
        self.check(1)?;
        Ok(self.data[self.pos])
    }

    /// Read one byte and fail with a descriptive error unless it equals
    /// `expected`. `node_kind` names the node being read for diagnostics.
    pub fn assert_u8(&mut self, expected: u8, node_kind: &'static str) -> Result<()> {
        let actual = self.read_u8()?;
        if actual != expected {
            return Err(Error::TypeTagMismatch {
                node_kind,
                expected,
                actual,
            });
        }
        Ok(())
    }

    /// Read a u16 in little-endian form.
    pub fn read_u16(&mut self) -> Result<u16> {
        self.check(2)?;
        let bytes = [self.data[self.pos], self.data[self.pos + 1]];
        self.pos += 2;
        Ok(u16::from_le_bytes(bytes))
    }

    /// Read a u32 in little-endian form.
    pub fn read_u32(&mut self) -> Result<u32> {
        self.check(4)?;
        let bytes = [
            self.data[self.pos],
            self.data[self.pos + 1],
            self.data[self.pos + 2],
            self.data[self.pos + 3],
        ];
        self.pos += 4;
        Ok(u32::from_le_bytes(bytes))
    }

    /// Read a u32 length prefix followed by that many UTF-8 bytes.
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_u32()? as usize;
        self.check(len)?;
        let start = self.pos;
        let bytes = &self.data[start..start + len];
        let value = std::str::from_utf8(bytes)
            .map_err(|_| Error::InvalidUtf8(start))?
            .to_string();
        self.pos += len;
        Ok(value)
    }

    /// Read `len` raw bytes without a length prefix.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.check(len)?;
        let start = self.pos;
        self.pos += len;
        Ok(&self.data[start..start + len])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_roundtrip() {
        let mut out = OutputByteBuffer::new();
        out.write_u8(0x42);
        out.write_u16(0x1234);
        out.write_u32(0xDEADBEEF);

        let bytes = out.into_bytes();
        let mut input = InputByteBuffer::new(&bytes);
        assert_eq!(input.read_u8().unwrap(), 0x42);
        assert_eq!(input.read_u16().unwrap(), 0x1234);
        assert_eq!(input.read_u32().unwrap(), 0xDEADBEEF);
        assert_eq!(input.remaining(), 0);
    }

    #[test]
    fn test_string_roundtrip() {
        let mut out = OutputByteBuffer::new();
        out.write_string("||example.org^");
        out.write_string("");

        let bytes = out.into_bytes();
        let mut input = InputByteBuffer::new(&bytes);
        assert_eq!(input.read_string().unwrap(), "||example.org^");
        assert_eq!(input.read_string().unwrap(), "");
    }

    #[test]
    fn test_out_of_bounds_read() {
        let bytes = [0x01u8];
        let mut input = InputByteBuffer::new(&bytes);
        assert!(input.read_u32().is_err());

        // The failed read must not advance the cursor.
        assert_eq!(input.read_u8().unwrap(), 0x01);
        assert!(matches!(
            input.read_u8(),
            Err(Error::OutOfBounds { position: 1, .. })
        ));
    }

    #[test]
    fn test_truncated_string() {
        let mut out = OutputByteBuffer::new();
        out.write_u32(100); // length prefix larger than the payload
        out.write_bytes(b"short");

        let bytes = out.into_bytes();
        let mut input = InputByteBuffer::new(&bytes);
        assert!(input.read_string().is_err());
    }

    #[test]
    fn test_invalid_utf8() {
        let mut out = OutputByteBuffer::new();
        out.write_u32(2);
        out.write_bytes(&[0xFF, 0xFE]);

        let bytes = out.into_bytes();
        let mut input = InputByteBuffer::new(&bytes);
        assert!(matches!(input.read_string(), Err(Error::InvalidUtf8(_))));
    }

    #[test]
    fn test_peek_does_not_advance() {
        let bytes = [0x07u8, 0x08];
        let mut input = InputByteBuffer::new(&bytes);
        assert_eq!(input.peek_u8().unwrap(), 0x07);
        assert_eq!(input.peek_u8().unwrap(), 0x07);
        assert_eq!(input.read_u8().unwrap(), 0x07);
        assert_eq!(input.peek_u8().unwrap(), 0x08);
    }

    #[test]
    fn test_assert_u8_mismatch() {
        let bytes = [0x05u8];
        let mut input = InputByteBuffer::new(&bytes);
        let err = input.assert_u8(0x09, "Hint").unwrap_err();
        match err {
            Error::TypeTagMismatch {
                node_kind,
                expected,
                actual,
            } => {
                assert_eq!(node_kind, "Hint");
                assert_eq!(expected, 0x09);
                assert_eq!(actual, 0x05);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

//! Binary slice reader with cursor tracking.

use crate::{BufferError, ByteSource};

/// A bounds-checked reader over a borrowed byte slice.
///
/// Every read checks the remaining length first and fails with
/// [`BufferError::EndOfBuffer`] instead of panicking.
///
/// # Example
///
/// ```
/// use widepack_buffers::{ByteSource, Reader};
///
/// let data = [0x01, 0x02, 0x03];
/// let mut reader = Reader::new(&data);
///
/// assert_eq!(reader.read_u8(), Ok(0x01));
/// assert_eq!(reader.read_u16(), Ok(0x0203));
/// assert!(reader.read_u8().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    /// The underlying byte slice.
    pub uint8: &'a [u8],
    /// Current cursor position. Never exceeds `uint8.len()`.
    pub x: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader positioned at the start of `uint8`.
    pub fn new(uint8: &'a [u8]) -> Self {
        Self { uint8, x: 0 }
    }

    /// Resets the reader with a new byte slice.
    pub fn reset(&mut self, uint8: &'a [u8]) {
        self.uint8 = uint8;
        self.x = 0;
    }

    /// Returns the number of remaining bytes.
    pub fn size(&self) -> usize {
        self.uint8.len() - self.x
    }

    /// Returns `true` once every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Peeks at the current byte without advancing the cursor.
    pub fn peek(&self) -> Result<u8, BufferError> {
        self.check(1)?;
        Ok(self.uint8[self.x])
    }

    /// Returns the unread tail without advancing.
    pub fn rest(&self) -> &'a [u8] {
        &self.uint8[self.x..]
    }

    /// Reads `size` raw bytes as a borrowed subslice and advances the cursor.
    pub fn buf(&mut self, size: usize) -> Result<&'a [u8], BufferError> {
        self.check(size)?;
        let x = self.x;
        self.x += size;
        Ok(&self.uint8[x..self.x])
    }

    #[inline]
    fn check(&self, n: usize) -> Result<(), BufferError> {
        if n > self.size() {
            Err(BufferError::EndOfBuffer {
                offset: self.x,
                needed: n,
            })
        } else {
            Ok(())
        }
    }
}

impl ByteSource for Reader<'_> {
    fn position(&self) -> usize {
        self.x
    }

    fn remaining(&self) -> Option<usize> {
        Some(self.size())
    }

    #[inline]
    fn read_u8(&mut self) -> Result<u8, BufferError> {
        self.check(1)?;
        let val = self.uint8[self.x];
        self.x += 1;
        Ok(val)
    }

    #[inline]
    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], BufferError> {
        self.check(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.uint8[self.x..self.x + N]);
        self.x += N;
        Ok(out)
    }

    fn read_vec(&mut self, len: usize) -> Result<Vec<u8>, BufferError> {
        self.buf(len).map(<[u8]>::to_vec)
    }
}

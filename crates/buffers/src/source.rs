//! The [`ByteSource`] trait shared by the slice and stream readers.

use crate::BufferError;

/// A sequential source of bytes read as big-endian fields.
///
/// Implementors provide the three primitive reads; the fixed-width integer and
/// float readers are derived from [`ByteSource::read_array`].
pub trait ByteSource {
    /// Number of bytes consumed so far.
    fn position(&self) -> usize;

    /// Bytes still available, or `None` if the source cannot tell ahead of
    /// time (e.g. a socket or pipe).
    fn remaining(&self) -> Option<usize>;

    /// Reads one byte.
    fn read_u8(&mut self) -> Result<u8, BufferError>;

    /// Reads exactly `N` bytes.
    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], BufferError>;

    /// Reads exactly `len` bytes into a new vector.
    ///
    /// Implementations must not allocate `len` bytes up front unless they know
    /// that many bytes are available.
    fn read_vec(&mut self, len: usize) -> Result<Vec<u8>, BufferError>;

    #[inline]
    fn read_i8(&mut self) -> Result<i8, BufferError> {
        self.read_u8().map(|b| b as i8)
    }

    #[inline]
    fn read_u16(&mut self) -> Result<u16, BufferError> {
        self.read_array().map(u16::from_be_bytes)
    }

    #[inline]
    fn read_i16(&mut self) -> Result<i16, BufferError> {
        self.read_array().map(i16::from_be_bytes)
    }

    #[inline]
    fn read_u32(&mut self) -> Result<u32, BufferError> {
        self.read_array().map(u32::from_be_bytes)
    }

    #[inline]
    fn read_i32(&mut self) -> Result<i32, BufferError> {
        self.read_array().map(i32::from_be_bytes)
    }

    #[inline]
    fn read_u64(&mut self) -> Result<u64, BufferError> {
        self.read_array().map(u64::from_be_bytes)
    }

    #[inline]
    fn read_i64(&mut self) -> Result<i64, BufferError> {
        self.read_array().map(i64::from_be_bytes)
    }

    /// Reads an IEEE-754 single from its big-endian bit pattern.
    #[inline]
    fn read_f32(&mut self) -> Result<f32, BufferError> {
        self.read_array().map(f32::from_be_bytes)
    }

    /// Reads an IEEE-754 double from its big-endian bit pattern.
    #[inline]
    fn read_f64(&mut self) -> Result<f64, BufferError> {
        self.read_array().map(f64::from_be_bytes)
    }
}

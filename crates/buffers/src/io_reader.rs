//! Reader over any [`std::io::Read`] stream.

use std::io::{self, Read};

use crate::{BufferError, ByteSource};

/// Reads big-endian fields from a blocking [`Read`] source.
///
/// The reader counts consumed bytes so errors can report an offset. It does
/// no buffering of its own; wrap slow sources in [`std::io::BufReader`].
#[derive(Debug)]
pub struct IoReader<R> {
    inner: R,
    x: usize,
}

impl<R: Read> IoReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, x: 0 }
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Fills `dst` completely. Bytes that arrive before a failure still count
    /// toward the position; the error reports the field's start offset.
    fn fill(&mut self, dst: &mut [u8]) -> Result<(), BufferError> {
        let offset = self.x;
        let mut filled = 0;
        while filled < dst.len() {
            match self.inner.read(&mut dst[filled..]) {
                Ok(0) => {
                    self.x += filled;
                    return Err(BufferError::EndOfBuffer {
                        offset,
                        needed: dst.len(),
                    });
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    self.x += filled;
                    return Err(BufferError::Io(e.kind()));
                }
            }
        }
        self.x += filled;
        Ok(())
    }
}

impl<R: Read> ByteSource for IoReader<R> {
    fn position(&self) -> usize {
        self.x
    }

    fn remaining(&self) -> Option<usize> {
        None
    }

    fn read_u8(&mut self) -> Result<u8, BufferError> {
        let mut octet = [0u8; 1];
        self.fill(&mut octet)?;
        Ok(octet[0])
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], BufferError> {
        let mut out = [0u8; N];
        self.fill(&mut out)?;
        Ok(out)
    }

    fn read_vec(&mut self, len: usize) -> Result<Vec<u8>, BufferError> {
        let offset = self.x;
        // Grow with the bytes that actually arrive rather than trusting `len`.
        let mut out = Vec::new();
        let result = (&mut self.inner).take(len as u64).read_to_end(&mut out);
        self.x += out.len();
        result.map_err(|e| BufferError::Io(e.kind()))?;
        if out.len() < len {
            return Err(BufferError::EndOfBuffer {
                offset,
                needed: len,
            });
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Chunked<'a> {
        chunks: Vec<&'a [u8]>,
    }

    impl Read for Chunked<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.chunks.is_empty() {
                return Ok(0);
            }
            let chunk = self.chunks[0];
            let n = chunk.len().min(buf.len());
            buf[..n].copy_from_slice(&chunk[..n]);
            if n == chunk.len() {
                self.chunks.remove(0);
            } else {
                self.chunks[0] = &chunk[n..];
            }
            Ok(n)
        }
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
        }
    }

    #[test]
    fn reads_across_chunk_boundaries() {
        let mut reader = IoReader::new(Chunked {
            chunks: vec![&[0x01, 0x02], &[0x03, 0x04], &[0x05]],
        });
        assert_eq!(reader.read_u8(), Ok(0x01));
        assert_eq!(reader.read_u32(), Ok(0x0203_0405));
        assert_eq!(reader.position(), 5);
        assert_eq!(
            reader.read_u8(),
            Err(BufferError::EndOfBuffer {
                offset: 5,
                needed: 1
            })
        );
    }

    #[test]
    fn read_vec_stops_at_end_of_stream() {
        let mut reader = IoReader::new(&b"abc"[..]);
        assert_eq!(
            reader.read_vec(1 << 30),
            Err(BufferError::EndOfBuffer {
                offset: 0,
                needed: 1 << 30
            })
        );
        assert_eq!(reader.position(), 3);
    }

    #[test]
    fn short_reads_still_advance_position() {
        let mut reader = IoReader::new(Chunked {
            chunks: vec![&[0xa0], &[0x01, 0x02]],
        });
        assert_eq!(reader.read_u8(), Ok(0xa0));
        assert_eq!(
            reader.read_u32(),
            Err(BufferError::EndOfBuffer {
                offset: 1,
                needed: 4
            })
        );
        assert_eq!(reader.position(), 3);
        assert_eq!(
            reader.read_u8(),
            Err(BufferError::EndOfBuffer {
                offset: 3,
                needed: 1
            })
        );
    }

    #[test]
    fn failed_read_vec_counts_delivered_bytes() {
        let mut reader = IoReader::new((&b"xy"[..]).chain(Broken));
        assert_eq!(
            reader.read_vec(8),
            Err(BufferError::Io(io::ErrorKind::ConnectionReset))
        );
        assert_eq!(reader.position(), 2);
    }

    #[test]
    fn read_vec_exact() {
        let mut reader = IoReader::new(&b"abcdef"[..]);
        assert_eq!(reader.read_vec(4), Ok(b"abcd".to_vec()));
        assert_eq!(reader.position(), 4);
        assert_eq!(reader.remaining(), None);
    }

    #[test]
    fn stream_failure_is_not_end_of_buffer() {
        let mut reader = IoReader::new(Broken);
        assert_eq!(
            reader.read_u8(),
            Err(BufferError::Io(io::ErrorKind::ConnectionReset))
        );
    }
}

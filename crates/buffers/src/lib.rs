//! Byte cursors for the widepack codec.
//!
//! - [`Reader`] reads big-endian fields from a borrowed slice.
//! - [`IoReader`] reads the same fields from any [`std::io::Read`].
//! - [`Writer`] appends big-endian fields to a growable buffer.
//!
//! Both readers implement [`ByteSource`], so a decoder can be written once
//! against the trait and driven by either.

mod io_reader;
mod reader;
mod source;
mod writer;

use thiserror::Error;

pub use io_reader::IoReader;
pub use reader::Reader;
pub use source::ByteSource;
pub use writer::Writer;

/// Error type for buffer reads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// The source ran out before `needed` bytes could be read at `offset`.
    #[error("end of buffer: needed {needed} byte(s) at offset {offset}")]
    EndOfBuffer { offset: usize, needed: usize },
    /// The underlying stream failed for a reason other than end-of-file.
    #[error("i/o error: {0:?}")]
    Io(std::io::ErrorKind),
}

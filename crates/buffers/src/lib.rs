//! nbt-buffers - big-endian binary primitives.
//!
//! Every multi-byte field in the tag format is most-significant-byte first.
//! [`Reader`] walks a borrowed byte slice with a cursor and never panics on
//! short input; [`Writer`] appends to an owned, growing buffer.

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::Writer;

use thiserror::Error;

/// Errors produced by [`Reader`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("unexpected end of buffer: needed {needed} byte(s), {remaining} remaining")]
    EndOfBuffer { needed: usize, remaining: usize },
    #[error("invalid UTF-8")]
    InvalidUtf8,
}

//! Codec error types.

use thiserror::Error;

use crate::tag_type::TagType;

/// Grammar violation found while decoding. Offsets are byte positions in the
/// input where the offending field starts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unknown tag type 0x{code:02x} at offset {offset}")]
    UnknownTagType { code: u8, offset: usize },
    #[error("root tag must be a compound, found {0}")]
    InvalidRoot(TagType),
    #[error("negative length {length} at offset {offset}")]
    InvalidLength { length: i32, offset: usize },
    #[error("string at offset {offset} is not valid UTF-8")]
    InvalidEncoding { offset: usize },
    #[error("truncated input at offset {offset}: {needed} more byte(s) required")]
    TruncatedInput { offset: usize, needed: usize },
    #[error("list at offset {offset} declares end elements with count {count}")]
    InvalidListElementType { count: i32, offset: usize },
    #[error("nesting deeper than {limit} containers")]
    DepthLimitExceeded { limit: usize },
    #[error("{count} trailing byte(s) after root compound")]
    TrailingBytes { count: usize },
}

/// Tree shape the wire format cannot express.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("root tag must be a compound, found {0}")]
    InvalidRoot(TagType),
    #[error("list declared as {expected} holds a {found} at index {index}")]
    HeterogeneousList {
        expected: TagType,
        found: TagType,
        index: usize,
    },
    #[error("empty list has no element type")]
    InvalidList,
    #[error("string of {len} bytes exceeds the 65535 byte limit")]
    StringTooLong { len: usize },
    #[error("{len} elements exceed the i32 length field")]
    LengthOverflow { len: usize },
}

/// Failure of [`NbtDecoder::decode_from_reader`](crate::NbtDecoder::decode_from_reader).
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Failure of [`NbtEncoder::encode_to_writer`](crate::NbtEncoder::encode_to_writer).
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

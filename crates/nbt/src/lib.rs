//! nbt - codec for the NBT binary tagged tree format.
//!
//! A document is a single named compound whose children form a tree of
//! typed tags. [`NbtDecoder`] turns raw bytes into a [`Tag`] tree and
//! [`NbtEncoder`] turns a tree back into bytes. The codec works on
//! uncompressed streams; gzip framing and file handling belong to the caller.
//!
//! ```
//! use nbt::{Compound, Tag, Value};
//!
//! let mut root = Compound::new();
//! root.insert(Tag::named("b", Value::Byte(1)));
//! let doc = Tag::named("", Value::Compound(root));
//!
//! let bytes = nbt::encode(&doc).unwrap();
//! assert_eq!(bytes, [0x0a, 0x00, 0x00, 0x01, 0x00, 0x01, b'b', 0x01, 0x00]);
//! assert_eq!(nbt::decode(&bytes).unwrap(), doc);
//! ```

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod json;
pub mod tag;
pub mod tag_type;

pub use decoder::{DecoderOptions, NbtDecoder};
pub use encoder::NbtEncoder;
pub use error::{DecodeError, EncodeError, ReadError, WriteError};
pub use tag::{Compound, List, Tag, Value};
pub use tag_type::TagType;

use std::io::{Read, Write};

/// Decodes a document from raw, uncompressed bytes with default options.
pub fn decode(data: &[u8]) -> Result<Tag, DecodeError> {
    NbtDecoder::new().decode(data)
}

/// Reads `reader` to the end and decodes the document it contains.
pub fn decode_from_reader<R: Read>(reader: R) -> Result<Tag, ReadError> {
    NbtDecoder::new().decode_from_reader(reader)
}

/// Encodes a document rooted at a compound tag.
pub fn encode(tag: &Tag) -> Result<Vec<u8>, EncodeError> {
    NbtEncoder::new().encode(tag)
}

/// Encodes a document and writes it to `writer`.
///
/// Nothing is written unless the whole tree encodes successfully.
pub fn encode_to_writer<W: Write>(tag: &Tag, writer: W) -> Result<(), WriteError> {
    NbtEncoder::new().encode_to_writer(tag, writer)
}

//! Tag tree decoder.
//!
//! Recursive descent over the binary grammar, single pass, no backtracking:
//!
//! ```text
//! document      := TAG_COMPOUND name body
//! body          := (type_code name payload)* TAG_END
//! list          := type_code count:i32 payload{count}
//! byte_array    := count:i32 i8{count}
//! int_array     := count:i32 i32{count}
//! string        := len:u16 utf8{len}
//! ```
//!
//! All state lives in a cursor local to one [`NbtDecoder::decode`] call.

use std::io::Read;

use nbt_buffers::{BufferError, Reader};
use tracing::{debug, trace};

use crate::error::{DecodeError, ReadError};
use crate::tag::{Compound, List, Tag, Value};
use crate::tag_type::TagType;

/// Default bound on container nesting, counting the root compound.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Limits applied while decoding untrusted input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderOptions {
    /// Deepest accepted container nesting. `None` disables the check.
    pub max_depth: Option<usize>,
    /// When `false`, bytes left after the root compound fail the decode.
    pub allow_trailing_bytes: bool,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            max_depth: Some(DEFAULT_MAX_DEPTH),
            allow_trailing_bytes: true,
        }
    }
}

/// Stateless document decoder.
#[derive(Debug, Clone, Default)]
pub struct NbtDecoder {
    pub options: DecoderOptions,
}

impl NbtDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DecoderOptions) -> Self {
        Self { options }
    }

    /// Decodes one document from `data`.
    ///
    /// The root must be a named compound. Declared counts are checked against
    /// the remaining input before anything is allocated for them.
    #[tracing::instrument(level = "debug", skip_all, fields(len = data.len()))]
    pub fn decode(&self, data: &[u8]) -> Result<Tag, DecodeError> {
        let mut c = Cursor {
            reader: Reader::new(data),
            depth: 0,
            max_depth: self.options.max_depth,
        };
        let root = c
            .read_root()
            .inspect_err(|err| debug!(%err, "decode failed"))?;

        let trailing = c.reader.remaining();
        if trailing > 0 {
            if !self.options.allow_trailing_bytes {
                return Err(DecodeError::TrailingBytes { count: trailing });
            }
            debug!(trailing, "ignoring bytes after root compound");
        }
        debug!(
            root = root.name().unwrap_or_default(),
            consumed = c.reader.x,
            "decoded document"
        );
        Ok(root)
    }

    /// Reads `reader` to the end, then decodes the bytes.
    ///
    /// Compression is the caller's concern: wrap a gzip source in a
    /// decompressing reader before handing it over.
    pub fn decode_from_reader<R: Read>(&self, mut reader: R) -> Result<Tag, ReadError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Ok(self.decode(&data)?)
    }
}

struct Cursor<'a> {
    reader: Reader<'a>,
    depth: usize,
    max_depth: Option<usize>,
}

impl<'a> Cursor<'a> {
    /// Runs a primitive read, translating buffer errors at the current offset.
    #[inline]
    fn read<T>(
        &mut self,
        f: impl FnOnce(&mut Reader<'a>) -> Result<T, BufferError>,
    ) -> Result<T, DecodeError> {
        let offset = self.reader.x;
        f(&mut self.reader).map_err(|err| match err {
            BufferError::EndOfBuffer { needed, remaining } => DecodeError::TruncatedInput {
                offset,
                needed: needed - remaining,
            },
            BufferError::InvalidUtf8 => DecodeError::InvalidEncoding { offset },
        })
    }

    fn tag_type(&mut self) -> Result<TagType, DecodeError> {
        let offset = self.reader.x;
        let code = self.read(Reader::u8)?;
        TagType::from_u8(code).ok_or(DecodeError::UnknownTagType { code, offset })
    }

    fn string(&mut self) -> Result<String, DecodeError> {
        let len = self.read(Reader::u16)? as usize;
        Ok(self.read(|r| r.utf8(len))?.to_owned())
    }

    /// Reads an i32 count of `element` values.
    ///
    /// Negative counts are rejected. A count whose smallest possible encoding
    /// is longer than the rest of the input can only mean truncation.
    fn count(&mut self, element: TagType) -> Result<usize, DecodeError> {
        let offset = self.reader.x;
        let length = self.read(Reader::i32)?;
        if length < 0 {
            return Err(DecodeError::InvalidLength { length, offset });
        }
        let count = length as usize;
        let min_size = count.saturating_mul(element.min_payload_size());
        let remaining = self.reader.remaining();
        if min_size > remaining {
            return Err(DecodeError::TruncatedInput {
                offset: self.reader.x,
                needed: min_size - remaining,
            });
        }
        Ok(count)
    }

    fn enter(&mut self) -> Result<(), DecodeError> {
        self.depth += 1;
        match self.max_depth {
            Some(limit) if self.depth > limit => Err(DecodeError::DepthLimitExceeded { limit }),
            _ => Ok(()),
        }
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn read_root(&mut self) -> Result<Tag, DecodeError> {
        let ty = self.tag_type()?;
        if ty != TagType::Compound {
            return Err(DecodeError::InvalidRoot(ty));
        }
        let name = self.string()?;
        let body = self.compound()?;
        Ok(Tag::named(name, body))
    }

    fn compound(&mut self) -> Result<Compound, DecodeError> {
        self.enter()?;
        let mut compound = Compound::new();
        loop {
            let ty = self.tag_type()?;
            if ty == TagType::End {
                break;
            }
            let name = self.string()?;
            let value = self.payload(ty)?;
            compound.push(Tag::named(name, value));
        }
        self.leave();
        trace!(entries = compound.len(), depth = self.depth, "read compound");
        Ok(compound)
    }

    fn list(&mut self) -> Result<List, DecodeError> {
        self.enter()?;
        let element_type = self.tag_type()?;
        let offset = self.reader.x;
        let count = self.count(element_type)?;
        if element_type == TagType::End && count > 0 {
            return Err(DecodeError::InvalidListElementType {
                count: count as i32,
                offset,
            });
        }
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(Tag::new(self.payload(element_type)?));
        }
        self.leave();
        trace!(%element_type, count, depth = self.depth, "read list");
        Ok(List::with_items(element_type, items))
    }

    fn payload(&mut self, ty: TagType) -> Result<Value, DecodeError> {
        Ok(match ty {
            TagType::End => unreachable!("end marker has no payload"),
            TagType::Byte => Value::Byte(self.read(Reader::i8)?),
            TagType::Short => Value::Short(self.read(Reader::i16)?),
            TagType::Int => Value::Int(self.read(Reader::i32)?),
            TagType::Long => Value::Long(self.read(Reader::i64)?),
            TagType::Float => Value::Float(self.read(Reader::f32)?),
            TagType::Double => Value::Double(self.read(Reader::f64)?),
            TagType::ByteArray => {
                let count = self.count(TagType::Byte)?;
                let bytes = self.read(|r| r.buf(count))?;
                Value::ByteArray(bytes.iter().map(|&b| b as i8).collect())
            }
            TagType::String => Value::String(self.string()?),
            TagType::List => Value::List(self.list()?),
            TagType::Compound => Value::Compound(self.compound()?),
            TagType::IntArray => {
                let count = self.count(TagType::Int)?;
                let mut ints = Vec::with_capacity(count);
                for _ in 0..count {
                    ints.push(self.read(Reader::i32)?);
                }
                Value::IntArray(ints)
            }
        })
    }
}

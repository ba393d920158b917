//! Tag tree encoder.
//!
//! Mirrors the decoder so that decoding an encoded tree yields the same
//! tree. Shape problems the format cannot express (non-compound root,
//! mixed lists, oversized strings) fail the whole encode; nothing written so
//! far is handed out.

use std::io::Write;

use nbt_buffers::Writer;
use tracing::debug;

use crate::error::{EncodeError, WriteError};
use crate::tag::{Compound, List, Tag, Value};
use crate::tag_type::TagType;

/// Document encoder writing into an internal buffer.
pub struct NbtEncoder {
    pub writer: Writer,
}

impl Default for NbtEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl NbtEncoder {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(),
        }
    }

    /// Encodes a document rooted at `tag`, which must be a compound.
    ///
    /// An unnamed root is written with the empty name.
    #[tracing::instrument(level = "debug", skip_all, fields(root = tag.name().unwrap_or_default()))]
    pub fn encode(&mut self, tag: &Tag) -> Result<Vec<u8>, EncodeError> {
        self.writer.discard();
        match self.write_document(tag) {
            Ok(()) => {
                let bytes = self.writer.flush();
                debug!(len = bytes.len(), "encoded document");
                Ok(bytes)
            }
            Err(err) => {
                self.writer.discard();
                debug!(%err, "encode failed");
                Err(err)
            }
        }
    }

    /// Encodes `tag` and writes the complete document to `out`.
    ///
    /// `out` is untouched when encoding fails. Compression is the caller's
    /// concern: pass a compressing writer to produce gzip output.
    pub fn encode_to_writer<W: Write>(&mut self, tag: &Tag, mut out: W) -> Result<(), WriteError> {
        let bytes = self.encode(tag)?;
        out.write_all(&bytes)?;
        out.flush()?;
        Ok(())
    }

    fn write_document(&mut self, tag: &Tag) -> Result<(), EncodeError> {
        let Value::Compound(body) = tag.value() else {
            return Err(EncodeError::InvalidRoot(tag.tag_type()));
        };
        self.write_type(TagType::Compound);
        self.write_str(tag.name().unwrap_or_default())?;
        self.write_compound(body)
    }

    #[inline]
    fn write_type(&mut self, ty: TagType) {
        self.writer.u8(ty.code());
    }

    fn write_str(&mut self, s: &str) -> Result<(), EncodeError> {
        let len = u16::try_from(s.len()).map_err(|_| EncodeError::StringTooLong { len: s.len() })?;
        self.writer.u16(len);
        self.writer.buf(s.as_bytes());
        Ok(())
    }

    fn write_count(&mut self, len: usize) -> Result<(), EncodeError> {
        let count = i32::try_from(len).map_err(|_| EncodeError::LengthOverflow { len })?;
        self.writer.i32(count);
        Ok(())
    }

    fn write_compound(&mut self, compound: &Compound) -> Result<(), EncodeError> {
        for child in compound {
            self.write_type(child.tag_type());
            self.write_str(child.name().unwrap_or_default())?;
            self.write_payload(child.value())?;
        }
        self.write_type(TagType::End);
        Ok(())
    }

    /// Writes a list header and its items' payloads. Item names are not
    /// part of the list encoding and are dropped.
    fn write_list(&mut self, list: &List) -> Result<(), EncodeError> {
        let element_type = match (list.element_type, list.items.first()) {
            (Some(ty), _) => ty,
            (None, Some(first)) => first.tag_type(),
            (None, None) => return Err(EncodeError::InvalidList),
        };
        if let Some((index, item)) = list
            .items
            .iter()
            .enumerate()
            .find(|(_, item)| item.tag_type() != element_type)
        {
            return Err(EncodeError::HeterogeneousList {
                expected: element_type,
                found: item.tag_type(),
                index,
            });
        }
        self.write_type(element_type);
        self.write_count(list.items.len())?;
        for item in &list.items {
            self.write_payload(item.value())?;
        }
        Ok(())
    }

    fn write_payload(&mut self, value: &Value) -> Result<(), EncodeError> {
        match value {
            Value::Byte(v) => self.writer.i8(*v),
            Value::Short(v) => self.writer.i16(*v),
            Value::Int(v) => self.writer.i32(*v),
            Value::Long(v) => self.writer.i64(*v),
            Value::Float(v) => self.writer.f32(*v),
            Value::Double(v) => self.writer.f64(*v),
            Value::ByteArray(bytes) => {
                self.write_count(bytes.len())?;
                for b in bytes {
                    self.writer.i8(*b);
                }
            }
            Value::String(s) => self.write_str(s)?,
            Value::List(list) => self.write_list(list)?,
            Value::Compound(compound) => self.write_compound(compound)?,
            Value::IntArray(ints) => {
                self.write_count(ints.len())?;
                for i in ints {
                    self.writer.i32(*i);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(children: Vec<Tag>) -> Tag {
        Tag::named("", Compound::from_iter(children))
    }

    #[test]
    fn encodes_single_byte_child() {
        let bytes = NbtEncoder::new()
            .encode(&root(vec![Tag::named("b", 1i8)]))
            .unwrap();
        assert_eq!(bytes, [0x0a, 0x00, 0x00, 0x01, 0x00, 0x01, 0x62, 0x01, 0x00]);
    }

    #[test]
    fn unnamed_root_gets_empty_name() {
        let bytes = NbtEncoder::new().encode(&Tag::new(Compound::new())).unwrap();
        assert_eq!(bytes, [0x0a, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn non_compound_root_is_rejected() {
        let err = NbtEncoder::new().encode(&Tag::named("x", 1i32)).unwrap_err();
        assert_eq!(err, EncodeError::InvalidRoot(TagType::Int));
    }

    #[test]
    fn list_header_uses_declared_type() {
        let list = List::with_items(TagType::Short, vec![Tag::new(1i16), Tag::new(-1i16)]);
        let bytes = NbtEncoder::new()
            .encode(&root(vec![Tag::named("l", list)]))
            .unwrap();
        assert_eq!(
            bytes,
            [
                0x0a, 0x00, 0x00, // root
                0x09, 0x00, 0x01, b'l', // list "l"
                0x02, 0x00, 0x00, 0x00, 0x02, // short x2
                0x00, 0x01, 0xff, 0xff, // items
                0x00,
            ]
        );
    }

    #[test]
    fn empty_list_without_type_is_invalid() {
        let err = NbtEncoder::new()
            .encode(&root(vec![Tag::named("l", List::default())]))
            .unwrap_err();
        assert_eq!(err, EncodeError::InvalidList);
    }

    #[test]
    fn untyped_list_takes_first_item_type() {
        let list = List {
            element_type: None,
            items: vec![Tag::new(1i8), Tag::new(2i8)],
        };
        let bytes = NbtEncoder::new()
            .encode(&root(vec![Tag::named("l", list)]))
            .unwrap();
        assert_eq!(&bytes[7..12], &[0x01, 0x00, 0x00, 0x00, 0x02]);
    }

    #[test]
    fn mixed_list_is_rejected() {
        let list = List::from_items(vec![Tag::new(1i32), Tag::new("two")]);
        let err = NbtEncoder::new()
            .encode(&root(vec![Tag::named("l", list)]))
            .unwrap_err();
        assert_eq!(
            err,
            EncodeError::HeterogeneousList {
                expected: TagType::Int,
                found: TagType::String,
                index: 1
            }
        );
    }

    #[test]
    fn long_string_is_rejected() {
        let s = "a".repeat(65_536);
        let err = NbtEncoder::new()
            .encode(&root(vec![Tag::named("s", s)]))
            .unwrap_err();
        assert_eq!(err, EncodeError::StringTooLong { len: 65_536 });
    }

    #[test]
    fn encoder_is_reusable_after_failure() {
        let mut encoder = NbtEncoder::new();
        let bad = root(vec![
            Tag::named("ok", 1i8),
            Tag::named("l", List::default()),
        ]);
        assert!(encoder.encode(&bad).is_err());
        let good = encoder.encode(&root(vec![])).unwrap();
        assert_eq!(good, [0x0a, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn failed_encode_writes_nothing() {
        let mut sink = Vec::new();
        let bad = root(vec![Tag::named(
            "l",
            List::from_items(vec![Tag::new(1i32), Tag::new("two")]),
        )]);
        let err = NbtEncoder::new().encode_to_writer(&bad, &mut sink).unwrap_err();
        assert!(matches!(err, WriteError::Encode(EncodeError::HeterogeneousList { .. })));
        assert!(sink.is_empty());
    }
}

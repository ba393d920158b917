//! Wire type codes.

use std::fmt;

/// The type code carried by every tag on the wire.
///
/// Discriminants are the wire values; variant order is part of the format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TagType {
    End = 0,
    Byte = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    ByteArray = 7,
    String = 8,
    List = 9,
    Compound = 10,
    IntArray = 11,
}

impl TagType {
    pub const ALL: [TagType; 12] = [
        TagType::End,
        TagType::Byte,
        TagType::Short,
        TagType::Int,
        TagType::Long,
        TagType::Float,
        TagType::Double,
        TagType::ByteArray,
        TagType::String,
        TagType::List,
        TagType::Compound,
        TagType::IntArray,
    ];

    /// Maps a raw type code to its variant, or `None` for unknown codes.
    pub const fn from_u8(code: u8) -> Option<TagType> {
        match code {
            0 => Some(TagType::End),
            1 => Some(TagType::Byte),
            2 => Some(TagType::Short),
            3 => Some(TagType::Int),
            4 => Some(TagType::Long),
            5 => Some(TagType::Float),
            6 => Some(TagType::Double),
            7 => Some(TagType::ByteArray),
            8 => Some(TagType::String),
            9 => Some(TagType::List),
            10 => Some(TagType::Compound),
            11 => Some(TagType::IntArray),
            _ => None,
        }
    }

    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Smallest number of payload bytes a value of this type occupies.
    ///
    /// Used to reject declared counts that cannot possibly fit in the
    /// remaining input.
    pub const fn min_payload_size(self) -> usize {
        match self {
            TagType::End => 0,
            TagType::Byte => 1,
            TagType::Short => 2,
            TagType::Int | TagType::Float => 4,
            TagType::Long | TagType::Double => 8,
            TagType::ByteArray | TagType::IntArray => 4,
            TagType::String => 2,
            TagType::List => 5,
            TagType::Compound => 1,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            TagType::End => "end",
            TagType::Byte => "byte",
            TagType::Short => "short",
            TagType::Int => "int",
            TagType::Long => "long",
            TagType::Float => "float",
            TagType::Double => "double",
            TagType::ByteArray => "byte array",
            TagType::String => "string",
            TagType::List => "list",
            TagType::Compound => "compound",
            TagType::IntArray => "int array",
        }
    }
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for TagType {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        TagType::from_u8(code).ok_or(code)
    }
}

impl From<TagType> for u8 {
    fn from(ty: TagType) -> u8 {
        ty.code()
    }
}

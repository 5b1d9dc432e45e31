//! The decoded representation of an `ilst` tag list: a map from [`TagKey`]
//! to a list of typed [`Value`]s, plus the wire codec that parses and
//! renders it.

pub mod codec;
pub mod genre;

use std::collections::HashMap;

pub use crate::fourcc::TagKey;

/// Image format of a `covr` cover art entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoverFormat {
    Jpeg = 0x0D,
    Png = 0x0E,
}

impl CoverFormat {
    /// Maps a raw `data` flags value to a format, clamping anything other
    /// than JPEG or PNG to JPEG.
    pub fn from_flags(flags: u32) -> Self {
        match flags {
            0x0E => Self::Png,
            _ => Self::Jpeg,
        }
    }

    pub fn as_flags(self) -> u32 {
        self as u32
    }
}

/// Format of a freeform (`----`) entry's payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FreeformFormat {
    Data = 0x0,
    Text = 0x1,
}

impl FreeformFormat {
    pub fn from_flags(flags: u32) -> Self {
        match flags {
            0x1 => Self::Text,
            _ => Self::Data,
        }
    }

    pub fn as_flags(self) -> u32 {
        self as u32
    }
}

/// A tag's typed value, shaped per the wire format its key dictates.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Text(Vec<String>),
    Bytes(Vec<Vec<u8>>),
    IntPair(Vec<(u16, u16)>),
    U16(Vec<u16>),
    Bool(bool),
    Cover(Vec<(CoverFormat, Vec<u8>)>),
    Freeform(Vec<(FreeformFormat, Vec<u8>)>),
}

impl Value {
    /// Item count used as the second ordering key when rendering `ilst`;
    /// mirrors comparing the decoded Python value's `len()`, which is the
    /// list length, not a summed byte length.
    fn sort_len(&self) -> usize {
        match self {
            Self::Text(v) => v.len(),
            Self::Bytes(v) => v.len(),
            Self::IntPair(v) => v.len(),
            Self::U16(v) => v.len(),
            Self::Bool(_) => 0,
            Self::Cover(v) => v.len(),
            Self::Freeform(v) => v.len(),
        }
    }

    /// Byte representation used as the third (lexicographic) ordering key.
    fn sort_bytes(&self) -> Vec<u8> {
        match self {
            Self::Text(v) => v.join("").into_bytes(),
            Self::Bytes(v) => v.concat(),
            Self::IntPair(v) => v.iter().flat_map(|(a, b)| [*a, *b]).flat_map(u16::to_be_bytes).collect(),
            Self::U16(v) => v.iter().flat_map(|n| n.to_be_bytes()).collect(),
            Self::Bool(b) => vec![*b as u8],
            Self::Cover(v) => v.iter().flat_map(|(_, b)| b.clone()).collect(),
            Self::Freeform(v) => v.iter().flat_map(|(_, b)| b.clone()).collect(),
        }
    }
}

/// A decoded `ilst`: the user-visible, file-independent tag map.
#[derive(Clone, Debug, Default)]
pub struct TagMap {
    entries: HashMap<TagKey, Value>,
}

impl TagMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &TagKey) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &TagKey) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    pub fn contains(&self, key: &TagKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: TagKey, value: Value) -> Option<Value> {
        self.entries.insert(key, value)
    }

    pub fn remove(&mut self, key: &TagKey) -> Option<Value> {
        self.entries.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TagKey, &Value)> {
        self.entries.iter()
    }
}

//! Four character codes (FourCC) identifying boxes, and the composite key
//! used to address freeform (`----`) tags.

use std::borrow::Cow;
use std::fmt::{self, Write};

/// A 4 byte box identifier.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Fourcc(pub [u8; 4]);

impl Fourcc {
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl From<[u8; 4]> for Fourcc {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for Fourcc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Fourcc(")?;
        for c in self.0.iter().map(|b| char::from(*b)) {
            f.write_char(c)?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for Fourcc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.iter().map(|b| char::from(*b)) {
            f.write_char(c)?;
        }
        Ok(())
    }
}

/// The identifier of a tag entry in an `ilst`: either a plain 4 byte
/// identifier, or a freeform `----:mean:name` triple.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TagKey {
    /// A plain box identifier, e.g. `©nam`, `trkn`, `covr`.
    Fourcc(Fourcc),
    /// A `----` freeform identifier, keyed by an arbitrary `(mean, name)` pair.
    Freeform {
        /// Typically `"com.apple.iTunes"`.
        mean: Cow<'static, str>,
        name: Cow<'static, str>,
    },
}

impl TagKey {
    pub const fn fourcc(bytes: [u8; 4]) -> Self {
        Self::Fourcc(Fourcc(bytes))
    }

    pub fn freeform(mean: impl Into<Cow<'static, str>>, name: impl Into<Cow<'static, str>>) -> Self {
        Self::Freeform { mean: mean.into(), name: name.into() }
    }

    /// Returns the plain 4 byte identifier, if this key isn't a freeform key.
    pub fn as_fourcc(&self) -> Option<Fourcc> {
        match self {
            Self::Fourcc(f) => Some(*f),
            Self::Freeform { .. } => None,
        }
    }
}

impl fmt::Display for TagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fourcc(fourcc) => write!(f, "{fourcc}"),
            Self::Freeform { mean, name } => write!(f, "----:{mean}:{name}"),
        }
    }
}

impl From<Fourcc> for TagKey {
    fn from(value: Fourcc) -> Self {
        Self::Fourcc(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fourcc_display_renders_ascii() {
        let name = Fourcc(*b"trkn");
        assert_eq!(name.to_string(), "trkn");
    }

    #[test]
    fn freeform_key_display_matches_itunes_format() {
        let key = TagKey::freeform("com.apple.iTunes", "iTunSMPB");
        assert_eq!(key.to_string(), "----:com.apple.iTunes:iTunSMPB");
    }
}

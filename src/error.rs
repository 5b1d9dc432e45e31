use std::borrow::Cow;
use std::{error, fmt, io, string};

use crate::fourcc::Fourcc;

/// Type alias for the result of metadata operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Kinds of errors that may occur while reading or rewriting metadata.
#[derive(Debug)]
pub enum ErrorKind {
    /// A box's size/structure violates the ISO BMFF grammar during parsing.
    MalformedBox,
    /// An expected box path could not be found. Contains the missing segment.
    NotFound(Fourcc),
    /// `moov.udta.meta.ilst` is absent on load.
    NoTags,
    /// Inside a tag atom, a sibling sub-atom had an unexpected identifier.
    /// Contains the parent identifier and the unexpected child.
    UnexpectedAtom(Fourcc, Fourcc),
    /// A freeform `data` sub-atom had a non-zero version byte.
    UnsupportedVersion(u8),
    /// A tuple component, tempo value or other numeric field was out of range.
    InvalidValue,
    /// No track with handler type `soun` was found while decoding stream info.
    NoAudioTrack,
    /// An IO error occurred.
    Io(io::Error),
}

/// An error produced while reading or rewriting metadata.
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// A human readable description.
    pub description: Cow<'static, str>,
}

impl Error {
    pub fn new(kind: ErrorKind, description: impl Into<Cow<'static, str>>) -> Self {
        Self { kind, description: description.into() }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match &self.kind {
            ErrorKind::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        let description = format!("IO error: {err}");
        Self::new(ErrorKind::Io(err), description)
    }
}

impl From<string::FromUtf8Error> for Error {
    fn from(_err: string::FromUtf8Error) -> Self {
        Self::new(ErrorKind::InvalidValue, "Data is not valid utf-8")
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.description.is_empty() {
            write!(f, "{:?}", self.kind)
        } else {
            write!(f, "{}: {:?}", self.description, self.kind)
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.description.is_empty() {
            write!(f, "{:?}", self.kind)
        } else {
            write!(f, "{}", self.description)
        }
    }
}

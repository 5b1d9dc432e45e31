//! A library for reading and rewriting iTunes-style tag atoms embedded in
//! ISO Base Media Format files (M4A/M4B/M4P/MP4).
//!
//! [`MediaFile`] ties the pieces together for a file on disk: [`BoxTree`]
//! parses the box structure, [`stream_info`] and [`tag::codec`] decode it,
//! and [`rewriter`] splices edited tags back in while keeping every sample
//! offset table intact.

pub mod boxes;
pub mod cursor;
pub mod error;
pub mod fourcc;
pub mod rewriter;
pub mod stream_info;
pub mod tag;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

pub use boxes::{BoxTree, Boxx};
pub use cursor::ByteCursor;
pub use error::{Error, ErrorKind, Result};
pub use fourcc::{Fourcc, TagKey};
pub use stream_info::StreamInfo;
pub use tag::{CoverFormat, FreeformFormat, TagMap, Value};

/// MIME types this format claims, for a surrounding format-registry facade.
pub const MIME_TYPES: &[&str] = &["audio/mp4", "audio/x-m4a", "audio/mpeg4", "audio/aac"];

/// Scores how strongly the first ~128 bytes of a file look like this format,
/// for format auto-detection by a surrounding `FileType` registry.
pub fn score(header: &[u8]) -> u8 {
    let mut score = 0u8;
    if contains(header, b"ftyp") {
        score += 1;
    }
    if contains(header, b"mp4") {
        score += 1;
    }
    score
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// An open MP4/QuickTime file's decoded tags and stream info, tied to a path
/// on disk.
///
/// Tags and stream info outlive the open/save cycle; there is no reference
/// back to the file after [`MediaFile::read_from_path`] returns. Saving
/// re-opens and re-parses the path, per the single-threaded, non-cancellable
/// save sequence this crate guarantees.
#[derive(Clone, Debug)]
pub struct MediaFile {
    path: PathBuf,
    stream_info: Option<StreamInfo>,
    tag: TagMap,
}

impl MediaFile {
    /// Opens, parses, and decodes the file at `path`.
    ///
    /// A missing `moov.udta.meta.ilst` yields an empty [`TagMap`] rather
    /// than an error — per §7, tag-load failure never poisons stream info.
    /// A missing `soun` track yields `stream_info() == None`.
    pub fn read_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().read(true).open(&path)?;
        let mut cursor = ByteCursor::new(file);
        let tree = BoxTree::parse(&mut cursor)?;

        let stream_info = match stream_info::load(&tree, &mut cursor) {
            Ok(info) => Some(info),
            Err(Error { kind: ErrorKind::NoAudioTrack, .. }) => None,
            Err(e) => return Err(e),
        };

        let tag = match tag::codec::load(&tree, &mut cursor) {
            Ok(tag) => tag,
            Err(Error { kind: ErrorKind::NoTags, .. }) => TagMap::new(),
            Err(e) => return Err(e),
        };

        Ok(Self { path, stream_info, tag })
    }

    /// Re-opens the original path read/write, re-parses it, renders the
    /// current tag map, and splices it in.
    ///
    /// The box tree captured at load time (or by a previous save) is stale
    /// afterward; call [`MediaFile::read_from_path`] again to observe the
    /// saved state.
    pub fn write_to_path(&self) -> Result<()> {
        let file = OpenOptions::new().read(true).write(true).open(&self.path)?;
        let mut cursor = ByteCursor::new(file);
        let tree = BoxTree::parse(&mut cursor)?;
        let payload = tag::codec::render(&self.tag);
        rewriter::save(&mut cursor, &tree, &payload)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn stream_info(&self) -> Option<&StreamInfo> {
        self.stream_info.as_ref()
    }

    pub fn tag(&self) -> &TagMap {
        &self.tag
    }

    pub fn tag_mut(&mut self) -> &mut TagMap {
        &mut self.tag
    }
}

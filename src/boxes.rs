//! The tree of ISO BMFF boxes backing a parsed file.

use std::io::{Read, Seek, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::cursor::ByteCursor;
use crate::error::{Error, ErrorKind, Result};
use crate::fourcc::Fourcc;

/// The FourCCs that carry children instead of (or, for `meta`, in addition
/// to) opaque payload bytes.
const CONTAINERS: &[[u8; 4]] = &[
    *b"moov", *b"udta", *b"trak", *b"mdia", *b"meta", *b"ilst", *b"stbl", *b"minf", *b"moof",
    *b"traf",
];

/// Bytes of container-specific prefix that precede a container's children,
/// skipped on parse and re-emitted verbatim on render. Only `meta` has one:
/// a 4-byte version/flags field.
fn skip_size(name: Fourcc) -> u64 {
    if name.as_bytes() == b"meta" {
        4
    } else {
        0
    }
}

fn is_container(name: Fourcc) -> bool {
    CONTAINERS.contains(name.as_bytes())
}

/// A single parsed ISO BMFF box.
#[derive(Clone, Debug)]
pub struct Boxx {
    /// Absolute offset of the size field.
    pub offset: u64,
    /// Total length from `offset`, including the header.
    pub length: u64,
    /// Whether the on-disk header used the extended 64-bit size form.
    pub extended: bool,
    pub name: Fourcc,
    /// `Some` only for FourCCs in the container set.
    pub children: Option<Vec<Boxx>>,
}

impl Boxx {
    /// Offset of the first content byte, i.e. past the header and any
    /// container-specific prefix.
    pub fn content_offset(&self) -> u64 {
        let header_len = if self.extended { 16 } else { 8 };
        self.offset + header_len + skip_size(self.name)
    }

    pub fn end(&self) -> u64 {
        self.offset + self.length
    }

    pub fn header_len(&self) -> u64 {
        if self.extended {
            16
        } else {
            8
        }
    }

    /// All direct children with the given name, in document order.
    pub fn children_named(&self, name: &Fourcc) -> impl Iterator<Item = &Boxx> {
        self.children
            .iter()
            .flatten()
            .filter(move |c| &c.name == name)
    }

    /// Recursively finds boxes with the given name, depth-first.
    pub fn find_all<'a>(&'a self, name: &'a Fourcc, recursive: bool) -> Vec<&'a Boxx> {
        let mut out = Vec::new();
        find_all_into(self, name, recursive, &mut out);
        out
    }
}

fn find_all_into<'a>(b: &'a Boxx, name: &'a Fourcc, recursive: bool, out: &mut Vec<&'a Boxx>) {
    let Some(children) = &b.children else { return };
    for child in children {
        if &child.name == name {
            out.push(child);
        }
        if recursive {
            find_all_into(child, name, recursive, out);
        }
    }
}

/// The full top-level box listing of a file.
#[derive(Clone, Debug, Default)]
pub struct BoxTree {
    pub top_level: Vec<Boxx>,
}

impl BoxTree {
    /// Parses the whole file, starting at offset 0.
    pub fn parse<F: Read + Write + Seek>(cursor: &mut ByteCursor<F>) -> Result<Self> {
        let end = cursor.len()?;
        cursor.seek(0)?;

        let mut top_level = Vec::new();
        let mut pos = 0u64;
        while pos + 8 <= end {
            let b = parse_box(cursor, pos, end, true)?;
            pos = b.end();
            top_level.push(b);
        }
        Ok(Self { top_level })
    }

    /// Returns the chain of boxes from the first top-level segment down to
    /// the named descendant, inclusive.
    pub fn path(&self, names: &[Fourcc]) -> Result<Vec<&Boxx>> {
        let Some((head, tail)) = names.split_first() else {
            return Ok(Vec::new());
        };

        let mut chain = Vec::with_capacity(names.len());
        let mut current = self
            .top_level
            .iter()
            .find(|b| &b.name == head)
            .ok_or_else(|| Error::new(ErrorKind::NotFound(*head), format!("atom '{head}' not found")))?;
        chain.push(current);

        for name in tail {
            let children = current.children.as_ref().ok_or_else(|| {
                Error::new(ErrorKind::NotFound(*name), format!("'{}' is not a container", current.name))
            })?;
            current = children
                .iter()
                .find(|b| &b.name == name)
                .ok_or_else(|| Error::new(ErrorKind::NotFound(*name), format!("atom '{name}' not found")))?;
            chain.push(current);
        }

        Ok(chain)
    }

    /// Recursively finds boxes with the given name across all top-level
    /// subtrees.
    pub fn find_all(&self, name: &Fourcc, recursive: bool) -> Vec<&Boxx> {
        let mut out = Vec::new();
        for b in &self.top_level {
            if &b.name == name {
                out.push(b);
            }
            if recursive {
                find_all_into(b, name, recursive, &mut out);
            }
        }
        out
    }
}

/// Parses one box (and, recursively, its children) starting at `offset`.
/// `top_level` permits the size==0 "extends to EOF" sentinel.
fn parse_box<F: Read + Write + Seek>(
    cursor: &mut ByteCursor<F>,
    offset: u64,
    file_end: u64,
    top_level: bool,
) -> Result<Boxx> {
    let head = cursor.read_at(offset, 8)?;
    let mut size = (&head[0..4]).read_u32::<BigEndian>()? as u64;
    let name = Fourcc([head[4], head[5], head[6], head[7]]);

    let (extended, length) = if size == 1 {
        let ext = cursor.read_at(offset + 8, 8)?;
        let full = (&ext[..]).read_u64::<BigEndian>()?;
        (true, full)
    } else if size == 0 {
        if !top_level {
            return Err(Error::new(ErrorKind::MalformedBox, "inner atom claims zero length"));
        }
        size = file_end - offset;
        (false, size)
    } else if size < 8 {
        return Err(Error::new(ErrorKind::MalformedBox, format!("atom length {size} is less than 8")));
    } else {
        (false, size)
    };

    let children = if is_container(name) {
        let header_len = if extended { 16 } else { 8 };
        let mut pos = offset + header_len + skip_size(name);
        let end = offset + length;
        let mut kids = Vec::new();
        while pos + 8 <= end {
            let child = parse_box(cursor, pos, file_end, false)?;
            if child.end() > end {
                return Err(Error::new(ErrorKind::MalformedBox, "child atom overruns parent"));
            }
            pos = child.end();
            kids.push(child);
        }
        if pos != end {
            return Err(Error::new(ErrorKind::MalformedBox, "children do not exactly tile parent"));
        }
        Some(kids)
    } else {
        None
    };

    Ok(Boxx { offset, length, extended, name, children })
}

/// Serialises `(name, payload)` into wire bytes, choosing the 32-bit or
/// extended 64-bit size form depending on the total length.
pub fn render(name: Fourcc, payload: &[u8]) -> Vec<u8> {
    let size = payload.len() as u64 + 8;
    let mut out = Vec::with_capacity(size as usize + 8);
    if size <= u32::MAX as u64 {
        out.write_u32::<BigEndian>(size as u32).unwrap();
        out.extend_from_slice(name.as_bytes());
    } else {
        out.write_u32::<BigEndian>(1).unwrap();
        out.extend_from_slice(name.as_bytes());
        out.write_u64::<BigEndian>(size + 8).unwrap();
    }
    out.extend_from_slice(payload);
    out
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn fourcc(s: &[u8; 4]) -> Fourcc {
        Fourcc(*s)
    }

    #[test]
    fn render_uses_32_bit_form_for_small_payload() {
        let bytes = render(fourcc(b"free"), &[0u8; 4]);
        assert_eq!(&bytes[0..4], &12u32.to_be_bytes());
        assert_eq!(&bytes[4..8], b"free");
    }

    #[test]
    fn parse_tiles_top_level_boxes() {
        let mut data = Vec::new();
        data.extend_from_slice(&render(fourcc(b"ftyp"), b"isomiso2mp41"));
        data.extend_from_slice(&render(fourcc(b"free"), &[]));
        let len = data.len();
        let mut cursor = ByteCursor::new(Cursor::new(data));

        let tree = BoxTree::parse(&mut cursor).unwrap();
        assert_eq!(tree.top_level.len(), 2);
        assert_eq!(tree.top_level[0].name, fourcc(b"ftyp"));
        assert_eq!(tree.top_level.last().unwrap().end(), len as u64);
    }

    #[test]
    fn zero_length_top_level_box_extends_to_eof() {
        let mut data = Vec::new();
        data.write_u32::<BigEndian>(0).unwrap();
        data.extend_from_slice(b"mdat");
        data.extend_from_slice(&[0xAAu8; 16]);
        let total = data.len() as u64;
        let mut cursor = ByteCursor::new(Cursor::new(data));

        let tree = BoxTree::parse(&mut cursor).unwrap();
        assert_eq!(tree.top_level.len(), 1);
        assert_eq!(tree.top_level[0].length, total);
    }

    #[test]
    fn short_size_field_is_malformed() {
        let mut data = Vec::new();
        data.write_u32::<BigEndian>(4).unwrap();
        data.extend_from_slice(b"free");
        let mut cursor = ByteCursor::new(Cursor::new(data));

        let err = BoxTree::parse(&mut cursor).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::MalformedBox));
    }

    #[test]
    fn meta_prefix_is_skipped_before_children() {
        let nam = render(fourcc(b"free"), &[]);
        let mut meta_payload = vec![0u8; 4];
        meta_payload.extend_from_slice(&nam);
        let data = render(fourcc(b"meta"), &meta_payload);
        let mut cursor = ByteCursor::new(Cursor::new(data));

        let tree = BoxTree::parse(&mut cursor).unwrap();
        let meta = &tree.top_level[0];
        let children = meta.children.as_ref().unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].name, fourcc(b"free"));
    }

    #[test]
    fn path_reports_not_found_for_missing_segment() {
        let data = render(fourcc(b"ftyp"), b"isom");
        let mut cursor = ByteCursor::new(Cursor::new(data));
        let tree = BoxTree::parse(&mut cursor).unwrap();

        let err = tree.path(&[fourcc(b"moov")]).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::NotFound(_)));
    }
}

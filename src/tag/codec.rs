//! Dispatch table from tag FourCC to `(parse, render)` behavior, and the
//! per-tag wire formats themselves.

use std::collections::HashMap;
use std::io::{Read, Seek, Write};

use lazy_static::lazy_static;

use crate::boxes::{render as render_box, BoxTree};
use crate::cursor::ByteCursor;
use crate::error::{Error, ErrorKind, Result};
use crate::fourcc::{Fourcc, TagKey};
use crate::tag::genre::genre_name;
use crate::tag::{CoverFormat, FreeformFormat, TagMap, Value};

fn fourcc(bytes: &[u8; 4]) -> Fourcc {
    Fourcc(*bytes)
}

/// Named text tags, decoded as UTF-8 lists with `flags == 1`.
const TEXT_FOURCCS: &[[u8; 4]] = &[
    [0xA9, b'n', b'a', b'm'],
    [0xA9, b'a', b'l', b'b'],
    [0xA9, b'A', b'R', b'T'],
    [0xA9, b'w', b'r', b't'],
    [0xA9, b'd', b'a', b'y'],
    [0xA9, b'c', b'm', b't'],
    *b"desc",
    *b"purd",
    [0xA9, b'g', b'r', b'p'],
    [0xA9, b'g', b'e', b'n'],
    [0xA9, b'l', b'y', b'r'],
    [0xA9, b't', b'o', b'o'],
    *b"cprt",
    *b"soal",
    *b"soaa",
    *b"soar",
    *b"sonm",
    *b"soco",
    *b"sosn",
    *b"tvsh",
    *b"aART",
    *b"catg",
    *b"keyw",
];

/// FourCC identifying the `©gen` text tag, referenced directly by the
/// `gnre` legacy-genre fallback.
const GEN_FOURCC: [u8; 4] = [0xA9, b'g', b'e', b'n'];

/// Sort-priority list from iTunes-compatible tag ordering; any key whose
/// 4-byte prefix isn't listed sorts after all of these.
const PRIORITY: &[[u8; 4]] = &[
    [0xA9, b'n', b'a', b'm'],
    [0xA9, b'A', b'R', b'T'],
    [0xA9, b'w', b'r', b't'],
    [0xA9, b'a', b'l', b'b'],
    [0xA9, b'g', b'e', b'n'],
    *b"gnre",
    *b"trkn",
    *b"disk",
    [0xA9, b'd', b'a', b'y'],
    *b"cpil",
    *b"pgap",
    *b"pcst",
    *b"tmpo",
    [0xA9, b't', b'o', b'o'],
    *b"----",
    *b"covr",
    [0xA9, b'l', b'y', b'r'],
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TagKind {
    Text,
    Bytes,
    IntPair,
    IntPairNoTrailing,
    Tempo,
    Bool,
    Cover,
    /// Read-only; `gnre` is translated into `©gen` on load and never written.
    Genre,
}

lazy_static! {
    static ref REGISTRY: HashMap<[u8; 4], TagKind> = {
        let mut m = HashMap::new();
        for f in TEXT_FOURCCS {
            m.insert(*f, TagKind::Text);
        }
        m.insert(*b"purl", TagKind::Bytes);
        m.insert(*b"egid", TagKind::Bytes);
        m.insert(*b"trkn", TagKind::IntPair);
        m.insert(*b"disk", TagKind::IntPairNoTrailing);
        m.insert(*b"tmpo", TagKind::Tempo);
        m.insert(*b"cpil", TagKind::Bool);
        m.insert(*b"pgap", TagKind::Bool);
        m.insert(*b"pcst", TagKind::Bool);
        m.insert(*b"covr", TagKind::Cover);
        m.insert(*b"gnre", TagKind::Genre);
        m
    };
}

/// Locates `moov.udta.meta.ilst` and decodes every child into the tag map.
pub fn load<F: Read + Write + Seek>(tree: &BoxTree, cursor: &mut ByteCursor<F>) -> Result<TagMap> {
    let path_names = [fourcc(b"moov"), fourcc(b"udta"), fourcc(b"meta"), fourcc(b"ilst")];
    let path = tree
        .path(&path_names)
        .map_err(|_| Error::new(ErrorKind::NoTags, "no 'moov.udta.meta.ilst' atom present"))?;
    let ilst = *path.last().expect("path is non-empty for a non-empty name list");

    let mut map = TagMap::new();
    for child in ilst.children.iter().flatten() {
        let content = cursor.read_at(child.content_offset(), child.end() - child.content_offset())?;
        dispatch_parse(child.name, &content, &mut map)?;
    }
    Ok(map)
}

fn dispatch_parse(name: Fourcc, content: &[u8], map: &mut TagMap) -> Result<()> {
    if name.as_bytes() == b"----" {
        return parse_freeform(content, map);
    }
    match REGISTRY.get(name.as_bytes()) {
        Some(TagKind::Text) => parse_text(name, content, 1, map),
        Some(TagKind::Bytes) => parse_bytes(name, content, 0, map),
        Some(TagKind::IntPair) | Some(TagKind::IntPairNoTrailing) => parse_pair(name, content, map),
        Some(TagKind::Tempo) => parse_tempo(name, content, map),
        Some(TagKind::Bool) => parse_bool(name, content, map),
        Some(TagKind::Cover) => parse_cover(name, content, map),
        Some(TagKind::Genre) => parse_genre(content, map),
        // Unknown FourCCs are tolerated the same way named text tags are on
        // load; they simply have no registry entry to render them back.
        None => parse_text(name, content, 1, map),
    }
}

/// Iterates the `data` sub-atoms of a tag atom's content, in the
/// `[size:u32 | "data" | flags:u32 | reserved:u32 | payload]` shape shared
/// by every tag except `----` and `covr`.
fn parse_data_children<'a>(parent: Fourcc, content: &'a [u8]) -> Result<Vec<(u32, &'a [u8])>> {
    let mut out = Vec::new();
    let mut pos = 0usize;
    while pos < content.len() {
        if pos + 16 > content.len() {
            return Err(Error::new(ErrorKind::MalformedBox, "truncated data sub-atom"));
        }
        let size = u32::from_be_bytes(content[pos..pos + 4].try_into().unwrap()) as usize;
        let name = Fourcc(content[pos + 4..pos + 8].try_into().unwrap());
        if name.as_bytes() != b"data" {
            return Err(Error::new(
                ErrorKind::UnexpectedAtom(parent, name),
                format!("unexpected atom '{name}' inside '{parent}'"),
            ));
        }
        let flags = u32::from_be_bytes(content[pos + 8..pos + 12].try_into().unwrap());
        if pos + size > content.len() || size < 16 {
            return Err(Error::new(ErrorKind::MalformedBox, "data sub-atom overruns its parent"));
        }
        out.push((flags, &content[pos + 16..pos + size]));
        pos += size;
    }
    Ok(out)
}

fn render_data_atom(flags: u32, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(16 + payload.len());
    out.extend_from_slice(&((payload.len() + 16) as u32).to_be_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&flags.to_be_bytes());
    out.extend_from_slice(&0u32.to_be_bytes());
    out.extend_from_slice(payload);
    out
}

fn render_data(name: Fourcc, flags: u32, values: &[Vec<u8>]) -> Vec<u8> {
    let mut payload = Vec::new();
    for v in values {
        payload.extend_from_slice(&render_data_atom(flags, v));
    }
    render_box(name, &payload)
}

fn parse_text(name: Fourcc, content: &[u8], expected_flags: u32, map: &mut TagMap) -> Result<()> {
    let children = parse_data_children(name, content)?;
    let strings: Vec<String> = children
        .into_iter()
        .filter(|(flags, _)| *flags == expected_flags)
        .map(|(_, bytes)| String::from_utf8_lossy(bytes).into_owned())
        .collect();
    if !strings.is_empty() {
        map.insert(TagKey::Fourcc(name), Value::Text(strings));
    }
    Ok(())
}

fn render_text(name: Fourcc, values: &[String], flags: u32) -> Vec<u8> {
    let data: Vec<Vec<u8>> = values.iter().map(|s| s.as_bytes().to_vec()).collect();
    render_data(name, flags, &data)
}

fn parse_bytes(name: Fourcc, content: &[u8], expected_flags: u32, map: &mut TagMap) -> Result<()> {
    let children = parse_data_children(name, content)?;
    let values: Vec<Vec<u8>> = children
        .into_iter()
        .filter(|(flags, _)| *flags == expected_flags)
        .map(|(_, bytes)| bytes.to_vec())
        .collect();
    if !values.is_empty() {
        map.insert(TagKey::Fourcc(name), Value::Bytes(values));
    }
    Ok(())
}

fn render_bytes(name: Fourcc, values: &[Vec<u8>], flags: u32) -> Vec<u8> {
    render_data(name, flags, values)
}

fn parse_pair(name: Fourcc, content: &[u8], map: &mut TagMap) -> Result<()> {
    let children = parse_data_children(name, content)?;
    let mut pairs = Vec::with_capacity(children.len());
    for (_, payload) in children {
        if payload.len() < 6 {
            return Err(Error::new(ErrorKind::InvalidValue, "integer pair payload too short"));
        }
        let a = u16::from_be_bytes([payload[2], payload[3]]);
        let b = u16::from_be_bytes([payload[4], payload[5]]);
        pairs.push((a, b));
    }
    map.insert(TagKey::Fourcc(name), Value::IntPair(pairs));
    Ok(())
}

fn render_pair(name: Fourcc, values: &[(u16, u16)], trailing: bool) -> Vec<u8> {
    let data: Vec<Vec<u8>> = values
        .iter()
        .map(|(a, b)| {
            let mut buf = Vec::with_capacity(8);
            buf.extend_from_slice(&0u16.to_be_bytes());
            buf.extend_from_slice(&a.to_be_bytes());
            buf.extend_from_slice(&b.to_be_bytes());
            if trailing {
                buf.extend_from_slice(&0u16.to_be_bytes());
            }
            buf
        })
        .collect();
    render_data(name, 0, &data)
}

fn parse_tempo(name: Fourcc, content: &[u8], map: &mut TagMap) -> Result<()> {
    let children = parse_data_children(name, content)?;
    let mut values = Vec::with_capacity(children.len());
    for (_, payload) in children {
        if payload.len() < 2 {
            return Err(Error::new(ErrorKind::InvalidValue, "tempo payload too short"));
        }
        values.push(u16::from_be_bytes([payload[0], payload[1]]));
    }
    map.insert(TagKey::Fourcc(name), Value::U16(values));
    Ok(())
}

fn render_tempo(name: Fourcc, values: &[u16]) -> Vec<u8> {
    let data: Vec<Vec<u8>> = values.iter().map(|v| v.to_be_bytes().to_vec()).collect();
    render_data(name, 0x15, &data)
}

fn parse_bool(name: Fourcc, content: &[u8], map: &mut TagMap) -> Result<()> {
    let children = parse_data_children(name, content)?;
    let value = children.first().map(|(_, payload)| !payload.is_empty() && payload[0] != 0).unwrap_or(false);
    map.insert(TagKey::Fourcc(name), Value::Bool(value));
    Ok(())
}

fn render_bool(name: Fourcc, value: bool) -> Vec<u8> {
    render_data(name, 0x15, &[vec![value as u8]])
}

fn parse_cover(name: Fourcc, content: &[u8], map: &mut TagMap) -> Result<()> {
    let mut covers = Vec::new();
    let mut pos = 0usize;
    while pos < content.len() {
        if pos + 12 > content.len() {
            return Err(Error::new(ErrorKind::MalformedBox, "truncated atom inside 'covr'"));
        }
        let size = u32::from_be_bytes(content[pos..pos + 4].try_into().unwrap()) as usize;
        let atom_name = Fourcc(content[pos + 4..pos + 8].try_into().unwrap());
        if atom_name.as_bytes() == b"name" {
            pos += size;
            continue;
        }
        if atom_name.as_bytes() != b"data" {
            return Err(Error::new(
                ErrorKind::UnexpectedAtom(name, atom_name),
                format!("unexpected atom '{atom_name}' inside 'covr'"),
            ));
        }
        let flags = u32::from_be_bytes(content[pos + 8..pos + 12].try_into().unwrap());
        if pos + size > content.len() || size < 16 {
            return Err(Error::new(ErrorKind::MalformedBox, "cover data sub-atom overruns its parent"));
        }
        let format = CoverFormat::from_flags(flags);
        covers.push((format, content[pos + 16..pos + size].to_vec()));
        pos += size;
    }
    map.insert(TagKey::Fourcc(name), Value::Cover(covers));
    Ok(())
}

fn render_cover(name: Fourcc, values: &[(CoverFormat, Vec<u8>)]) -> Vec<u8> {
    let mut payload = Vec::new();
    for (format, bytes) in values {
        payload.extend_from_slice(&render_data_atom(format.as_flags(), bytes));
    }
    render_box(name, &payload)
}

/// `mean_box`/`name_box` header: `[size:u32 | name:4 | flags:u32]`, 12 bytes,
/// followed by the UTF-8 payload. No `data` atom shape applies here.
fn parse_mean_or_name(content: &[u8], pos: usize, expected: &[u8; 4]) -> Result<(usize, String)> {
    if pos + 12 > content.len() {
        return Err(Error::new(ErrorKind::MalformedBox, "truncated freeform 'mean'/'name' box"));
    }
    let size = u32::from_be_bytes(content[pos..pos + 4].try_into().unwrap()) as usize;
    let atom_name = Fourcc(content[pos + 4..pos + 8].try_into().unwrap());
    if atom_name.as_bytes() != expected || pos + size > content.len() || size < 12 {
        return Err(Error::new(
            ErrorKind::UnexpectedAtom(fourcc(b"----"), atom_name),
            "malformed freeform 'mean'/'name' box",
        ));
    }
    let text = String::from_utf8_lossy(&content[pos + 12..pos + size]).into_owned();
    Ok((pos + size, text))
}

fn parse_freeform(content: &[u8], map: &mut TagMap) -> Result<()> {
    let (pos, mean) = parse_mean_or_name(content, 0, b"mean")?;
    let (mut pos, name) = parse_mean_or_name(content, pos, b"name")?;

    let mut values = Vec::new();
    while pos < content.len() {
        if pos + 16 > content.len() {
            return Err(Error::new(ErrorKind::MalformedBox, "truncated freeform data sub-atom"));
        }
        let size = u32::from_be_bytes(content[pos..pos + 4].try_into().unwrap()) as usize;
        let atom_name = Fourcc(content[pos + 4..pos + 8].try_into().unwrap());
        if atom_name.as_bytes() != b"data" {
            return Err(Error::new(
                ErrorKind::UnexpectedAtom(fourcc(b"----"), atom_name),
                format!("unexpected atom '{atom_name}' inside '----'"),
            ));
        }
        let version = content[pos + 8];
        if version != 0 {
            return Err(Error::new(ErrorKind::UnsupportedVersion(version), "freeform data sub-atom has non-zero version"));
        }
        let flags = u32::from_be_bytes([0, content[pos + 9], content[pos + 10], content[pos + 11]]);
        if pos + size > content.len() || size < 16 {
            return Err(Error::new(ErrorKind::MalformedBox, "freeform data sub-atom overruns its parent"));
        }
        values.push((FreeformFormat::from_flags(flags), content[pos + 16..pos + size].to_vec()));
        pos += size;
    }

    if !values.is_empty() {
        map.insert(TagKey::Freeform { mean: mean.into(), name: name.into() }, Value::Freeform(values));
    }
    Ok(())
}

fn render_freeform(mean: &str, name: &str, values: &[(FreeformFormat, Vec<u8>)]) -> Vec<u8> {
    let mut mean_box = Vec::with_capacity(12 + mean.len());
    mean_box.extend_from_slice(&((mean.len() + 12) as u32).to_be_bytes());
    mean_box.extend_from_slice(b"mean");
    mean_box.extend_from_slice(&0u32.to_be_bytes());
    mean_box.extend_from_slice(mean.as_bytes());

    let mut name_box = Vec::with_capacity(12 + name.len());
    name_box.extend_from_slice(&((name.len() + 12) as u32).to_be_bytes());
    name_box.extend_from_slice(b"name");
    name_box.extend_from_slice(&0u32.to_be_bytes());
    name_box.extend_from_slice(name.as_bytes());

    let mut payload = mean_box;
    payload.extend_from_slice(&name_box);
    for (format, bytes) in values {
        let flags = format.as_flags();
        let mut data_box = Vec::with_capacity(16 + bytes.len());
        data_box.extend_from_slice(&((bytes.len() + 16) as u32).to_be_bytes());
        data_box.extend_from_slice(b"data");
        data_box.push(0); // version
        data_box.extend_from_slice(&flags.to_be_bytes()[1..4]);
        data_box.extend_from_slice(&0u32.to_be_bytes());
        data_box.extend_from_slice(bytes);
        payload.extend_from_slice(&data_box);
    }

    render_box(fourcc(b"----"), &payload)
}

fn parse_genre(content: &[u8], map: &mut TagMap) -> Result<()> {
    if content.len() < 18 {
        return Ok(());
    }
    let index = u16::from_be_bytes([content[16], content[17]]);
    let gen_key = TagKey::fourcc(GEN_FOURCC);
    if !map.contains(&gen_key) {
        if let Some(name) = genre_name(index) {
            map.insert(gen_key, Value::Text(vec![name.to_owned()]));
        }
    }
    Ok(())
}

fn priority_index(key: &TagKey) -> usize {
    let prefix = match key {
        TagKey::Fourcc(f) => *f.as_bytes(),
        TagKey::Freeform { .. } => *b"----",
    };
    PRIORITY.iter().position(|p| p == &prefix).unwrap_or(PRIORITY.len())
}

fn dispatch_render(key: &TagKey, value: &Value, out: &mut Vec<u8>) {
    match key {
        TagKey::Freeform { mean, name } => {
            if let Value::Freeform(v) = value {
                out.extend_from_slice(&render_freeform(mean, name, v));
            }
        }
        TagKey::Fourcc(f) => match REGISTRY.get(f.as_bytes()) {
            Some(TagKind::Text) => {
                if let Value::Text(v) = value {
                    out.extend_from_slice(&render_text(*f, v, 1));
                }
            }
            Some(TagKind::Bytes) => {
                if let Value::Bytes(v) = value {
                    out.extend_from_slice(&render_bytes(*f, v, 0));
                }
            }
            Some(TagKind::IntPair) => {
                if let Value::IntPair(v) = value {
                    out.extend_from_slice(&render_pair(*f, v, true));
                }
            }
            Some(TagKind::IntPairNoTrailing) => {
                if let Value::IntPair(v) = value {
                    out.extend_from_slice(&render_pair(*f, v, false));
                }
            }
            Some(TagKind::Tempo) => {
                if let Value::U16(v) = value {
                    out.extend_from_slice(&render_tempo(*f, v));
                }
            }
            Some(TagKind::Bool) => {
                if let Value::Bool(b) = value {
                    out.extend_from_slice(&render_bool(*f, *b));
                }
            }
            Some(TagKind::Cover) => {
                if let Value::Cover(v) = value {
                    out.extend_from_slice(&render_cover(*f, v));
                }
            }
            // `gnre` is read-only and unknown FourCCs have no renderer: both
            // are silently dropped from the rendered `ilst`.
            Some(TagKind::Genre) | None => {}
        },
    }
}

/// Renders the complete `ilst` payload in iTunes-compatible order.
pub fn render(tags: &TagMap) -> Vec<u8> {
    let mut entries: Vec<(&TagKey, &Value)> = tags.iter().collect();
    entries.sort_by_key(|(k, v)| (priority_index(k), v.sort_len(), v.sort_bytes()));

    let mut payload = Vec::new();
    for (key, value) in entries {
        dispatch_render(key, value, &mut payload);
    }
    payload
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::boxes::BoxTree;

    fn build_file(ilst_children: &[u8]) -> Vec<u8> {
        let ilst = render_box(fourcc(b"ilst"), ilst_children);
        let mut meta_payload = vec![0u8; 4];
        meta_payload.extend_from_slice(&ilst);
        let meta = render_box(fourcc(b"meta"), &meta_payload);
        let udta = render_box(fourcc(b"udta"), &meta);
        let moov = render_box(fourcc(b"moov"), &udta);
        let mut file = render_box(fourcc(b"ftyp"), b"isomiso2mp41");
        file.extend_from_slice(&moov);
        file
    }

    fn load_tags(file: Vec<u8>) -> TagMap {
        let mut cursor = ByteCursor::new(Cursor::new(file));
        let tree = BoxTree::parse(&mut cursor).unwrap();
        load(&tree, &mut cursor).unwrap()
    }

    #[test]
    fn minimal_text_tag_round_trips() {
        let nam_data = render_data_atom(1, b"Hi");
        let nam = render_box(fourcc(b"\xa9nam"), &nam_data);
        let tags = load_tags(build_file(&nam));

        let value = tags.get(&TagKey::fourcc([0xA9, b'n', b'a', b'm'])).unwrap();
        assert_eq!(value, &Value::Text(vec!["Hi".to_owned()]));

        let rendered = render(&tags);
        assert_eq!(rendered, nam);
    }

    #[test]
    fn tuple_pair_round_trips() {
        let trkn_data = render_data_atom(0, &[0, 0, 0, 3, 0, 10, 0, 0]);
        let trkn = render_box(fourcc(b"trkn"), &trkn_data);
        let tags = load_tags(build_file(&trkn));

        let value = tags.get(&TagKey::fourcc(*b"trkn")).unwrap();
        assert_eq!(value, &Value::IntPair(vec![(3, 10)]));

        let rendered = render(&tags);
        assert_eq!(rendered, trkn);
    }

    #[test]
    fn freeform_round_trips_through_three_sub_atoms() {
        let mut map = TagMap::new();
        map.insert(
            TagKey::freeform("com.apple.iTunes", "iTunSMPB"),
            Value::Freeform(vec![(FreeformFormat::Text, b"abc".to_vec())]),
        );
        let rendered = render(&map);

        let mut cursor = ByteCursor::new(Cursor::new(build_file(&rendered)));
        let tree = BoxTree::parse(&mut cursor).unwrap();
        let loaded = load(&tree, &mut cursor).unwrap();

        let key = TagKey::freeform("com.apple.iTunes", "iTunSMPB");
        assert_eq!(loaded.get(&key), Some(&Value::Freeform(vec![(FreeformFormat::Text, b"abc".to_vec())])));
    }

    #[test]
    fn legacy_genre_translates_when_gen_is_absent() {
        let mut gnre_payload = vec![0u8; 16];
        gnre_payload.extend_from_slice(&18u16.to_be_bytes());
        let gnre = render_box(fourcc(b"gnre"), &gnre_payload);
        let tags = load_tags(build_file(&gnre));

        assert_eq!(tags.get(&TagKey::fourcc(GEN_FOURCC)), Some(&Value::Text(vec!["Rock".to_owned()])));

        let rendered = render(&tags);
        assert!(rendered.is_empty(), "gnre must never be rendered back");
    }

    #[test]
    fn legacy_genre_does_not_override_existing_gen() {
        let gen_data = render_data_atom(1, b"Jazz Fusion");
        let mut children = render_box(fourcc(b"\xa9gen"), &gen_data);
        let mut gnre_payload = vec![0u8; 16];
        gnre_payload.extend_from_slice(&18u16.to_be_bytes());
        children.extend_from_slice(&render_box(fourcc(b"gnre"), &gnre_payload));

        let tags = load_tags(build_file(&children));
        assert_eq!(tags.get(&TagKey::fourcc(GEN_FOURCC)), Some(&Value::Text(vec!["Jazz Fusion".to_owned()])));
    }

    #[test]
    fn unsupported_freeform_version_fails() {
        let mut mean = Vec::new();
        mean.extend_from_slice(&16u32.to_be_bytes());
        mean.extend_from_slice(b"mean");
        mean.extend_from_slice(&0u32.to_be_bytes());
        mean.extend_from_slice(b"test");

        let mut name = Vec::new();
        name.extend_from_slice(&16u32.to_be_bytes());
        name.extend_from_slice(b"name");
        name.extend_from_slice(&0u32.to_be_bytes());
        name.extend_from_slice(b"key1");

        let mut data = Vec::new();
        data.extend_from_slice(&19u32.to_be_bytes());
        data.extend_from_slice(b"data");
        data.push(1); // unsupported version
        data.extend_from_slice(&[0, 0, 0]); // flags
        data.extend_from_slice(&[0, 0, 0, 0]); // reserved
        data.extend_from_slice(b"abc");

        let mut content = mean;
        content.extend_from_slice(&name);
        content.extend_from_slice(&data);

        let err = parse_freeform(&content, &mut TagMap::new()).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnsupportedVersion(1)));
    }
}

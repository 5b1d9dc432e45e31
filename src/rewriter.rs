//! The splice engine: replaces `moov.udta.meta.ilst` in place (or synthesizes
//! one), then walks ancestors and sample-offset tables to keep every other
//! byte offset in the file pointing at the same sample data.

use std::io::{Read, Seek, Write};

use crate::boxes::{render as render_box, BoxTree, Boxx};
use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::fourcc::Fourcc;

fn fourcc(bytes: &[u8; 4]) -> Fourcc {
    Fourcc(*bytes)
}

/// Constant body of the synthesized `hdlr` atom inside a freshly created
/// `meta` box: `<8 zero bytes> "mdirappl" <9 zero bytes>`.
fn hdlr_payload() -> Vec<u8> {
    let mut v = vec![0u8; 8];
    v.extend_from_slice(b"mdirappl");
    v.extend_from_slice(&[0u8; 9]);
    v
}

/// Emits a `free` atom whose payload is `len` zero bytes.
fn free_atom(len: usize) -> Vec<u8> {
    render_box(fourcc(b"free"), &vec![0u8; len])
}

/// Padding to the next 1024-byte boundary past `need` bytes.
fn pad_len(need: usize) -> usize {
    ((need + 1023) & !1023) - need
}

/// Replaces the tag list with `new_ilst_payload` (the concatenation of
/// rendered tag atoms, as produced by [`crate::tag::codec::render`]) and
/// fixes up every affected ancestor size and sample-offset table.
///
/// `tree` must be the box tree of the file as it stands before this call;
/// it is consumed logically by the splice and must be re-parsed by the
/// caller to observe the new state.
pub fn save<F: Read + Write + Seek>(
    cursor: &mut ByteCursor<F>,
    tree: &BoxTree,
    new_ilst_payload: &[u8],
) -> Result<()> {
    let ilst_atom = render_box(fourcc(b"ilst"), new_ilst_payload);

    let names = [fourcc(b"moov"), fourcc(b"udta"), fourcc(b"meta"), fourcc(b"ilst")];
    match tree.path(&names) {
        Ok(path) => save_existing(cursor, tree, &path, ilst_atom),
        Err(_) => save_new(cursor, tree, ilst_atom),
    }
}

fn save_existing<F: Read + Write + Seek>(
    cursor: &mut ByteCursor<F>,
    tree: &BoxTree,
    path: &[&Boxx],
    ilst_atom: Vec<u8>,
) -> Result<()> {
    let ilst = path[3];
    let meta = path[2];

    let mut offset = ilst.offset;
    let mut length = ilst.length;

    let siblings = meta.children.as_ref().expect("meta is a container");
    if let Some(idx) = siblings.iter().position(|b| b.offset == ilst.offset) {
        if idx > 0 {
            let prev = &siblings[idx - 1];
            if prev.name.as_bytes() == b"free" {
                offset = prev.offset;
                length += prev.length;
            }
        }
        if let Some(next) = siblings.get(idx + 1) {
            if next.name.as_bytes() == b"free" {
                length += next.length;
            }
        }
    }

    let mut data = ilst_atom;
    let mut delta = data.len() as i64 - length as i64;
    if delta > 0 || (delta < 0 && delta > -8) {
        data.extend_from_slice(&free_atom(pad_len(data.len())));
        delta = data.len() as i64 - length as i64;
    } else if delta < 0 {
        data.extend_from_slice(&free_atom((-delta - 8) as usize));
        delta = 0;
    }

    if delta > 0 {
        cursor.insert(delta as u64, offset)?;
    }
    cursor.write_at(offset, &data)?;

    update_parents(cursor, &path[..3], delta)?;
    update_offset_tables(cursor, tree, delta, offset)?;
    Ok(())
}

fn save_new<F: Read + Write + Seek>(
    cursor: &mut ByteCursor<F>,
    tree: &BoxTree,
    ilst_atom: Vec<u8>,
) -> Result<()> {
    let mut meta_payload = vec![0u8; 4];
    meta_payload.extend_from_slice(&render_box(fourcc(b"hdlr"), &hdlr_payload()));
    meta_payload.extend_from_slice(&ilst_atom);
    meta_payload.extend_from_slice(&free_atom(pad_len(ilst_atom.len())));
    let meta = render_box(fourcc(b"meta"), &meta_payload);

    let udta_names = [fourcc(b"moov"), fourcc(b"udta")];
    let (insert_at, bytes, chain_names): (u64, Vec<u8>, Vec<Fourcc>) = match tree.path(&udta_names) {
        Ok(path) => (path[1].offset + 8, meta, vec![fourcc(b"moov"), fourcc(b"udta")]),
        Err(_) => {
            let path = tree.path(&[fourcc(b"moov")])?;
            let udta = render_box(fourcc(b"udta"), &meta);
            (path[0].offset + 8, udta, vec![fourcc(b"moov")])
        }
    };

    let delta = bytes.len() as i64;
    cursor.insert(delta as u64, insert_at)?;
    cursor.write_at(insert_at, &bytes)?;

    let chain = tree.path(&chain_names)?;
    update_parents(cursor, &chain, delta)?;
    update_offset_tables(cursor, tree, delta, insert_at)?;
    Ok(())
}

/// Rewrites each ancestor's size field by `delta`.
fn update_parents<F: Read + Write + Seek>(
    cursor: &mut ByteCursor<F>,
    chain: &[&Boxx],
    delta: i64,
) -> Result<()> {
    if delta == 0 {
        return Ok(());
    }
    for b in chain {
        let new_len = (b.length as i64 + delta) as u64;
        if b.extended {
            cursor.write_at(b.offset + 8, &new_len.to_be_bytes())?;
        } else {
            cursor.write_at(b.offset, &(new_len as u32).to_be_bytes())?;
        }
    }
    Ok(())
}

#[derive(Clone, Copy)]
enum Width {
    U32,
    U64,
}

fn update_offset_tables<F: Read + Write + Seek>(
    cursor: &mut ByteCursor<F>,
    tree: &BoxTree,
    delta: i64,
    region_offset: u64,
) -> Result<()> {
    if delta == 0 {
        return Ok(());
    }

    for moov in tree.find_all(&fourcc(b"moov"), false) {
        for b in moov.find_all(&fourcc(b"stco"), true) {
            fixup_offset_table(cursor, b, delta, region_offset, Width::U32)?;
        }
        for b in moov.find_all(&fourcc(b"co64"), true) {
            fixup_offset_table(cursor, b, delta, region_offset, Width::U64)?;
        }
    }
    for moof in tree.find_all(&fourcc(b"moof"), false) {
        for b in moof.find_all(&fourcc(b"tfhd"), true) {
            fixup_tfhd(cursor, b, delta, region_offset)?;
        }
    }
    Ok(())
}

/// Resolves a box's possibly-stale (pre-splice) offset to its current
/// on-disk position, bumping it by `delta` if it sat past the spliced
/// region.
fn resolved_pos(b: &Boxx, delta: i64, region_offset: u64) -> u64 {
    if b.offset > region_offset {
        (b.offset as i64 + delta) as u64
    } else {
        b.offset
    }
}

fn fixup_offset_table<F: Read + Write + Seek>(
    cursor: &mut ByteCursor<F>,
    b: &Boxx,
    delta: i64,
    region_offset: u64,
    width: Width,
) -> Result<()> {
    let pos = resolved_pos(b, delta, region_offset);
    let count_pos = pos + 12;
    let count = u32::from_be_bytes(cursor.read_at(count_pos, 4)?.try_into().unwrap()) as u64;
    let entries_pos = count_pos + 4;

    match width {
        Width::U32 => {
            let raw = cursor.read_at(entries_pos, count * 4)?;
            let mut out = Vec::with_capacity(raw.len());
            for chunk in raw.chunks_exact(4) {
                let o = u32::from_be_bytes(chunk.try_into().unwrap()) as u64;
                let shifted = if o > region_offset { (o as i64 + delta) as u64 } else { o };
                out.extend_from_slice(&(shifted as u32).to_be_bytes());
            }
            cursor.write_at(entries_pos, &out)?;
        }
        Width::U64 => {
            let raw = cursor.read_at(entries_pos, count * 8)?;
            let mut out = Vec::with_capacity(raw.len());
            for chunk in raw.chunks_exact(8) {
                let o = u64::from_be_bytes(chunk.try_into().unwrap());
                let shifted = if o > region_offset { (o as i64 + delta) as u64 } else { o };
                out.extend_from_slice(&shifted.to_be_bytes());
            }
            cursor.write_at(entries_pos, &out)?;
        }
    }
    Ok(())
}

fn fixup_tfhd<F: Read + Write + Seek>(
    cursor: &mut ByteCursor<F>,
    b: &Boxx,
    delta: i64,
    region_offset: u64,
) -> Result<()> {
    let pos = resolved_pos(b, delta, region_offset);
    let head = cursor.read_at(pos + 8, 4)?;
    let flags = u32::from_be_bytes([0, head[1], head[2], head[3]]);
    if flags & 0x000001 != 0 {
        let raw = cursor.read_at(pos + 16, 8)?;
        let o = u64::from_be_bytes(raw.try_into().unwrap());
        if o > region_offset {
            cursor.write_at(pos + 16, &((o as i64 + delta) as u64).to_be_bytes())?;
        }
    }
    Ok(())
}

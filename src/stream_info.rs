//! Read-only decoder of audio stream metadata (duration, channels, sample
//! rate, bitrate) from `moov.trak.mdia`. Shares [`BoxTree`] with the tag
//! codec and exercises the same "parse a box's raw bytes" shape, but never
//! writes anything back.

use std::io::{Read, Seek, Write};

use crate::boxes::BoxTree;
use crate::cursor::ByteCursor;
use crate::error::{Error, ErrorKind, Result};
use crate::fourcc::Fourcc;

fn fourcc(bytes: &[u8; 4]) -> Fourcc {
    Fourcc(*bytes)
}

/// Decoded audio stream properties.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StreamInfo {
    pub length_seconds: f64,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub sample_rate: u32,
    /// Average bitrate in bits per second; `0` if the `esds` descriptor
    /// tree couldn't be decoded (optional, tolerated per §7).
    pub bitrate: u32,
}

/// Locates the first `soun` track under `moov` and decodes its duration and,
/// where present, its `mp4a`/`esds` sample description.
pub fn load<F: Read + Write + Seek>(tree: &BoxTree, cursor: &mut ByteCursor<F>) -> Result<StreamInfo> {
    let moov = tree.path(&[fourcc(b"moov")])?[0];

    let mut mdia = None;
    for trak in moov.children_named(&fourcc(b"trak")) {
        let Some(candidate) = trak.children_named(&fourcc(b"mdia")).next() else { continue };
        let Some(hdlr) = candidate.children_named(&fourcc(b"hdlr")).next() else { continue };
        let data = cursor.read_at(hdlr.offset, hdlr.length)?;
        if data.len() >= 20 && &data[16..20] == b"soun" {
            mdia = Some(candidate);
            break;
        }
    }
    let mdia = mdia.ok_or_else(|| Error::new(ErrorKind::NoAudioTrack, "no 'soun' track found"))?;

    let mdhd = mdia
        .children_named(&fourcc(b"mdhd"))
        .next()
        .ok_or_else(|| Error::new(ErrorKind::MalformedBox, "'mdia' has no 'mdhd'"))?;
    let length_seconds = decode_mdhd(&cursor.read_at(mdhd.offset, mdhd.length)?)?;

    let mut info = StreamInfo { length_seconds, ..StreamInfo::default() };

    if let Some(stsd) = mdia
        .children_named(&fourcc(b"minf"))
        .next()
        .and_then(|minf| minf.children_named(&fourcc(b"stbl")).next())
        .and_then(|stbl| stbl.children_named(&fourcc(b"stsd")).next())
    {
        if let Ok(bytes) = cursor.read_at(stsd.offset, stsd.length) {
            decode_stsd(&bytes, &mut info);
        }
    }

    Ok(info)
}

/// `data` is the full `mdhd` atom, 8-byte header included (as in the
/// original `fileobj.read(atom.length)` reads this crate is grounded on).
fn decode_mdhd(data: &[u8]) -> Result<f64> {
    if data.len() < 9 {
        return Err(Error::new(ErrorKind::MalformedBox, "'mdhd' is too short"));
    }
    let (timescale, duration) = match data[8] {
        0 if data.len() >= 28 => {
            let timescale = u32::from_be_bytes(data[20..24].try_into().unwrap());
            let duration = u32::from_be_bytes(data[24..28].try_into().unwrap()) as u64;
            (timescale, duration)
        }
        1 if data.len() >= 40 => {
            let timescale = u32::from_be_bytes(data[28..32].try_into().unwrap());
            let duration = u64::from_be_bytes(data[32..40].try_into().unwrap());
            (timescale, duration)
        }
        _ => return Err(Error::new(ErrorKind::MalformedBox, "'mdhd' has an unsupported version or is too short")),
    };
    if timescale == 0 {
        return Ok(0.0);
    }
    Ok(duration as f64 / timescale as f64)
}

/// Fills in `channels`/`bits_per_sample`/`sample_rate`/`bitrate` from the
/// full `stsd` atom bytes, silently leaving them at their defaults on any
/// decode failure — the whole box is optional per §4.4.
fn decode_stsd(data: &[u8], info: &mut StreamInfo) {
    if data.len() < 50 || &data[20..24] != b"mp4a" {
        return;
    }
    info.channels = u16::from_be_bytes(data[40..42].try_into().unwrap());
    info.bits_per_sample = u16::from_be_bytes(data[42..44].try_into().unwrap());
    info.sample_rate = u32::from_be_bytes(data[46..50].try_into().unwrap());

    if data.len() < 65 || &data[56..60] != b"esds" || data[64] != 0x03 {
        return;
    }

    let mut pos = 65usize;
    if data.len() >= pos + 3 && &data[pos..pos + 3] == [0x80, 0x80, 0x80] {
        pos += 3;
    }
    pos += 4;
    if data.len() <= pos || data[pos] != 0x04 {
        return;
    }
    pos += 1;
    if data.len() >= pos + 3 && &data[pos..pos + 3] == [0x80, 0x80, 0x80] {
        pos += 3;
    }
    pos += 10;
    if data.len() >= pos + 4 {
        info.bitrate = u32::from_be_bytes(data[pos..pos + 4].try_into().unwrap());
    }
}

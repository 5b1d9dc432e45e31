//! A random-access view over an open file, with the splice primitives the
//! [rewriter](crate::rewriter) needs to grow or shrink a file in place.

use std::io::{Read, Seek, SeekFrom, Write};

use crate::error::Result;

/// Bytes moved per chunk while shifting a file's tail during a splice. Keeps
/// `insert`/`remove` from buffering an entire multi-gigabyte `mdat` in memory.
const CHUNK_LEN: usize = 64 * 1024;

/// A random-access cursor over a seekable, readable and writable stream,
/// typically an open [`File`](std::fs::File).
pub struct ByteCursor<F> {
    inner: F,
}

impl<F: Read + Write + Seek> ByteCursor<F> {
    pub fn new(inner: F) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> F {
        self.inner
    }

    /// Returns the total length of the underlying stream.
    pub fn len(&mut self) -> Result<u64> {
        let len = self.inner.seek(SeekFrom::End(0))?;
        Ok(len)
    }

    /// Returns the current stream position.
    pub fn position(&mut self) -> Result<u64> {
        Ok(self.inner.stream_position()?)
    }

    pub fn seek(&mut self, pos: u64) -> Result<()> {
        self.inner.seek(SeekFrom::Start(pos))?;
        Ok(())
    }

    /// Reads exactly `len` bytes starting at the absolute offset `at`,
    /// leaving the stream position just past the read.
    pub fn read_at(&mut self, at: u64, len: u64) -> Result<Vec<u8>> {
        self.inner.seek(SeekFrom::Start(at))?;
        let mut buf = vec![0u8; len as usize];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    pub fn write_at(&mut self, at: u64, data: &[u8]) -> Result<()> {
        self.inner.seek(SeekFrom::Start(at))?;
        self.inner.write_all(data)?;
        Ok(())
    }

    /// Grows the stream by `n` zero bytes at offset `at`, shifting everything
    /// from `at` onward forward by `n`. The inserted region is left
    /// zero-filled; callers overwrite it with real content afterward.
    pub fn insert(&mut self, n: u64, at: u64) -> Result<()> {
        if n == 0 {
            return Ok(());
        }

        let old_len = self.len()?;
        let mut pos = old_len;
        while pos > at {
            let chunk_len = CHUNK_LEN.min((pos - at) as usize) as u64;
            let read_start = pos - chunk_len;

            let buf = self.read_at(read_start, chunk_len)?;
            self.write_at(read_start + n, &buf)?;

            pos = read_start;
        }

        self.write_at(at, &vec![0u8; n as usize])?;
        Ok(())
    }

    /// Shrinks the stream by `n` bytes at offset `at`, shifting everything
    /// from `at + n` onward backward by `n`, then truncating the stream.
    pub fn remove(&mut self, n: u64, at: u64) -> Result<()>
    where
        F: TruncateLen,
    {
        if n == 0 {
            return Ok(());
        }

        let old_len = self.len()?;
        let mut read_pos = at + n;
        let mut write_pos = at;
        while read_pos < old_len {
            let chunk_len = CHUNK_LEN.min((old_len - read_pos) as usize) as u64;

            let buf = self.read_at(read_pos, chunk_len)?;
            self.write_at(write_pos, &buf)?;

            read_pos += chunk_len;
            write_pos += chunk_len;
        }

        self.inner.set_len_checked(old_len - n)?;
        Ok(())
    }
}

/// Truncation, abstracted so `ByteCursor` can splice both real files and the
/// in-memory buffers used in tests.
pub trait TruncateLen {
    fn set_len_checked(&mut self, len: u64) -> std::io::Result<()>;
}

impl TruncateLen for std::fs::File {
    fn set_len_checked(&mut self, len: u64) -> std::io::Result<()> {
        self.set_len(len)
    }
}

impl TruncateLen for std::io::Cursor<Vec<u8>> {
    fn set_len_checked(&mut self, len: u64) -> std::io::Result<()> {
        self.get_mut().truncate(len as usize);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn insert_preserves_prefix_and_suffix() {
        let data = b"abcdefgh".to_vec();
        let mut cursor = ByteCursor::new(Cursor::new(data));

        cursor.insert(4, 3).unwrap();
        let out = cursor.into_inner().into_inner();
        assert_eq!(&out, b"abc\0\0\0\0defgh");
    }

    #[test]
    fn remove_preserves_prefix_and_suffix() {
        let data = b"abcXXXdefgh".to_vec();
        let mut cursor = ByteCursor::new(Cursor::new(data));

        cursor.remove(3, 3).unwrap();
        let out = cursor.into_inner().into_inner();
        assert_eq!(&out, b"abcdefgh");
    }

    #[test]
    fn insert_and_remove_round_trip_large_tail() {
        let mut data = vec![0u8; 200_000];
        for (i, b) in data.iter_mut().enumerate() {
            *b = (i % 251) as u8;
        }
        let original = data.clone();
        let mut cursor = ByteCursor::new(Cursor::new(data));

        cursor.insert(777, 12_345).unwrap();
        cursor.remove(777, 12_345).unwrap();

        let out = cursor.into_inner().into_inner();
        assert_eq!(out, original);
    }
}

//! Low-level overwrite pass execution.

use crate::config::CHUNK_SIZE;
use crate::error::Result;
use crate::pattern::PassPattern;
use rand::{CryptoRng, RngCore};
use std::fs::File;
use std::io::{Seek, SeekFrom, Write};

/// Overwrite `size` bytes from offset 0 with `pattern`.
///
/// Writes in `CHUNK_SIZE` chunks, the last one truncated to the remaining
/// byte count. Random passes draw a fresh buffer from `rng` for every chunk.
/// Application buffers are flushed before returning; forcing the data to
/// stable storage is the caller's job (see [`commit`]).
///
/// # Returns
///
/// The number of bytes written, always equal to `size` on success.
pub fn write_pass<W, R>(handle: &mut W, size: u64, pattern: PassPattern, rng: &mut R) -> Result<u64>
where
    W: Write + Seek,
    R: RngCore + CryptoRng,
{
    handle.seek(SeekFrom::Start(0))?;

    let buf_len = (CHUNK_SIZE as u64).min(size) as usize;
    let mut buffer = match pattern {
        PassPattern::Fixed(byte) => vec![byte; buf_len],
        PassPattern::Random => vec![0u8; buf_len],
    };

    let mut remaining = size;
    while remaining > 0 {
        let chunk = (buf_len as u64).min(remaining) as usize;
        if pattern == PassPattern::Random {
            rng.fill_bytes(&mut buffer[..chunk]);
        }
        handle.write_all(&buffer[..chunk])?;
        remaining -= chunk as u64;
    }

    handle.flush()?;
    Ok(size)
}

/// Force file data to stable storage.
pub fn sync_pass(file: &File) -> Result<()> {
    file.sync_data()?;
    Ok(())
}

/// Flush and durably commit a file after its final pass.
///
/// Shredding is complete only once this returns `Ok`.
pub fn commit(file: &mut File) -> Result<()> {
    file.flush()?;
    file.sync_all()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::{Cursor, Read};
    use tempfile::NamedTempFile;

    /// Records the size of every write call.
    struct CountingWriter {
        inner: Cursor<Vec<u8>>,
        writes: Vec<usize>,
    }

    impl CountingWriter {
        fn new(data: Vec<u8>) -> Self {
            Self {
                inner: Cursor::new(data),
                writes: Vec::new(),
            }
        }
    }

    impl Write for CountingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            let n = self.inner.write(buf)?;
            self.writes.push(n);
            Ok(n)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Seek for CountingWriter {
        fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
            self.inner.seek(pos)
        }
    }

    #[test]
    fn test_fixed_pass_overwrites_every_byte() {
        let mut handle = Cursor::new(vec![0x42u8; 5000]);
        handle.seek(SeekFrom::End(0)).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let written = write_pass(&mut handle, 5000, PassPattern::Fixed(0xAA), &mut rng).unwrap();

        assert_eq!(written, 5000);
        let data = handle.into_inner();
        assert_eq!(data.len(), 5000);
        assert!(data.iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn test_chunking_truncates_last_chunk() {
        let size = 2 * CHUNK_SIZE + 123;
        let mut handle = CountingWriter::new(vec![0u8; size]);
        let mut rng = StdRng::seed_from_u64(2);

        write_pass(&mut handle, size as u64, PassPattern::Fixed(0xFF), &mut rng).unwrap();

        assert_eq!(handle.writes, vec![CHUNK_SIZE, CHUNK_SIZE, 123]);
        assert_eq!(handle.inner.get_ref().len(), size);
    }

    #[test]
    fn test_random_chunks_differ() {
        let size = 2 * CHUNK_SIZE;
        let mut handle = Cursor::new(vec![0u8; size]);
        let mut rng = StdRng::seed_from_u64(3);

        write_pass(&mut handle, size as u64, PassPattern::Random, &mut rng).unwrap();

        let data = handle.into_inner();
        assert_ne!(&data[..CHUNK_SIZE], &data[CHUNK_SIZE..]);
        assert!(data.iter().any(|&b| b != 0));
    }

    #[test]
    fn test_random_passes_differ() {
        let mut handle = Cursor::new(vec![0u8; 4096]);
        let mut rng = StdRng::seed_from_u64(4);

        write_pass(&mut handle, 4096, PassPattern::Random, &mut rng).unwrap();
        let first = handle.get_ref().clone();
        write_pass(&mut handle, 4096, PassPattern::Random, &mut rng).unwrap();

        assert_ne!(&first, handle.get_ref());
    }

    #[test]
    fn test_zero_size_writes_nothing() {
        let mut handle = CountingWriter::new(Vec::new());
        let mut rng = StdRng::seed_from_u64(5);

        let written = write_pass(&mut handle, 0, PassPattern::Random, &mut rng).unwrap();

        assert_eq!(written, 0);
        assert!(handle.writes.is_empty());
    }

    #[test]
    fn test_pass_on_real_file_and_commit() {
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(b"Sensitive content that must go").unwrap();
        tmp.flush().unwrap();
        let size = tmp.as_file().metadata().unwrap().len();

        let mut file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .open(tmp.path())
            .unwrap();
        let mut rng = StdRng::seed_from_u64(6);
        write_pass(&mut file, size, PassPattern::Fixed(0x00), &mut rng).unwrap();
        sync_pass(&file).unwrap();
        commit(&mut file).unwrap();

        let mut content = Vec::new();
        std::fs::File::open(tmp.path())
            .unwrap()
            .read_to_end(&mut content)
            .unwrap();
        assert_eq!(content.len() as u64, size);
        assert!(content.iter().all(|&b| b == 0));
    }
}

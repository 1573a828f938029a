//! DAG file I/O: a logical dataset spanning up to two backing files,
//! needed because a single dataset can exceed the 32-bit file size limit
//! on some platforms (§4.6).

use std::fs::{File, OpenOptions};
use std::os::unix::fs::FileExt;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::DagError;

const DAG_FDS: usize = 2;
pub const MIX_BYTES: u64 = 128;
pub const MAX_DAG_FILE_BYTES: u64 = 0xffff_ff80; // 2^32 - 2^7
pub const LINES_PER_FILE: u64 = MAX_DAG_FILE_BYTES / MIX_BYTES;

struct Shard {
    path: PathBuf,
    file: File,
}

/// Owns up to two backing files holding one logical dataset. Names: the
/// first file is `<base>`, the second (if needed) `<base>-1` (§4.6).
pub struct DagHandle {
    shards: Vec<Shard>,
    full_lines: u64,
}

fn shard_path(base: &Path, index: usize) -> PathBuf {
    if index == 0 {
        base.to_path_buf()
    } else {
        let mut name = base.as_os_str().to_owned();
        name.push(format!("-{index}"));
        PathBuf::from(name)
    }
}

impl DagHandle {
    /// Opens (or creates, per `options`) all files required for
    /// `full_lines`. On any failure, closes and does not leave behind
    /// files this call itself created, returning `None` instead of an
    /// error: an "unavailable" outcome distinct from a fatal I/O error
    /// (§4.6, §7). A plain, infallible-by-contract open is left to the
    /// caller: they should treat `None` as fatal if they expect success.
    pub fn try_open(base: &Path, options: &OpenOptions, full_lines: u64) -> Option<DagHandle> {
        let shard_count = ((full_lines + LINES_PER_FILE - 1) / LINES_PER_FILE).max(1) as usize;
        let mut shards = Vec::with_capacity(shard_count);

        for i in 0..shard_count {
            let path = shard_path(base, i);
            match options.open(&path) {
                Ok(file) => shards.push(Shard { path, file }),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "dag shard open failed");
                    for shard in &shards {
                        if let Err(unlink_err) = std::fs::remove_file(&shard.path) {
                            warn!(
                                path = %shard.path.display(),
                                error = %unlink_err,
                                "dag shard cleanup unlink failed"
                            );
                        }
                    }
                    return None;
                }
            }
        }

        debug!(shards = shard_count, full_lines, "dag handle opened");
        Some(DagHandle { shards, full_lines })
    }

    pub fn full_lines(&self) -> u64 {
        self.full_lines
    }

    /// Total bytes actually present on disk across all shards.
    pub fn bytes(&self) -> Result<u64, DagError> {
        let mut total = 0u64;
        for shard in &self.shards {
            let meta = shard.file.metadata()?;
            total += meta.len();
            if meta.len() != MAX_DAG_FILE_BYTES {
                break;
            }
        }
        Ok(total)
    }

    fn shard_and_offset(&self, dag_line: u64) -> (usize, u64) {
        let shard = (dag_line / LINES_PER_FILE) as usize;
        let offset = dag_line % LINES_PER_FILE;
        (shard, offset)
    }

    /// Reads `lines` 128-byte lines starting at `dag_line` into `out`,
    /// splitting the range at `LINES_PER_FILE` boundaries as needed. Each
    /// positional read must return exactly the requested bytes; a short
    /// read is fatal (§4.6).
    pub fn pread(&self, out: &mut [u8], lines: u64, dag_line: u64) -> Result<(), DagError> {
        assert_eq!(out.len() as u64, lines * MIX_BYTES);
        assert!(dag_line + lines <= self.full_lines);

        let (mut shard, mut offset) = self.shard_and_offset(dag_line);
        let mut remaining = lines;
        let mut cursor = 0usize;

        while remaining > 0 {
            let n = remaining.min(LINES_PER_FILE - offset);
            let bytes = (n * MIX_BYTES) as usize;
            let byte_offset = offset * MIX_BYTES;

            let got = self.shards[shard]
                .file
                .read_at(&mut out[cursor..cursor + bytes], byte_offset)?;
            if got != bytes {
                return Err(DagError::ShortRead {
                    expected: bytes,
                    got,
                });
            }

            cursor += bytes;
            remaining -= n;
            offset = 0;
            shard += 1;
        }

        Ok(())
    }

    /// Writes `lines` 128-byte lines from `data` starting at `dag_line`,
    /// splitting at `LINES_PER_FILE` boundaries. Short writes are fatal
    /// (§4.6).
    pub fn pwrite(&self, data: &[u8], lines: u64, dag_line: u64) -> Result<(), DagError> {
        assert_eq!(data.len() as u64, lines * MIX_BYTES);
        assert!(dag_line + lines <= self.full_lines);

        let (mut shard, mut offset) = self.shard_and_offset(dag_line);
        let mut remaining = lines;
        let mut cursor = 0usize;

        while remaining > 0 {
            let n = remaining.min(LINES_PER_FILE - offset);
            let bytes = (n * MIX_BYTES) as usize;
            let byte_offset = offset * MIX_BYTES;

            self.shards[shard]
                .file
                .write_all_at(&data[cursor..cursor + bytes], byte_offset)
                .map_err(|e| {
                    if e.kind() == std::io::ErrorKind::WriteZero {
                        DagError::ShortWrite {
                            expected: bytes,
                            got: 0,
                        }
                    } else {
                        DagError::Io(e)
                    }
                })?;

            cursor += bytes;
            remaining -= n;
            offset = 0;
            shard += 1;
        }

        Ok(())
    }

    /// Keeps the backing files on disk and releases the handle.
    pub fn close(self) {
        drop(self);
    }

    /// Closes the handle and unlinks every backing file.
    pub fn close_and_delete(self) {
        for shard in &self.shards {
            if let Err(e) = std::fs::remove_file(&shard.path) {
                warn!(path = %shard.path.display(), error = %e, "dag shard unlink failed");
            }
        }
    }
}

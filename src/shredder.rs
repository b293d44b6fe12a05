//! Per-file shred: validate, overwrite, optionally rename, remove.

use crate::config::RENAME_ALPHABET;
use crate::error::{Error, Result};
use crate::events::{EventSender, ShredEvent};
use crate::pattern::PatternSequence;
use crate::writer;
use rand::{CryptoRng, Rng, RngCore};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Result of shredding a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShredOutcome {
    /// All passes written, committed, and the file removed.
    Shredded,
    /// Dry run; nothing was touched.
    DryRun,
    /// Zero-length file removed without overwriting.
    RemovedEmpty,
    /// Missing, not a regular file, or an I/O error part-way through.
    Failed,
}

impl ShredOutcome {
    /// Whether the outcome counts as a success.
    pub fn is_success(&self) -> bool {
        !matches!(self, ShredOutcome::Failed)
    }
}

/// Shreds individual files with a fixed pass sequence.
///
/// Cheap to clone; every worker holds its own copy sharing the sequence.
#[derive(Debug, Clone)]
pub struct FileShredder {
    sequence: Arc<PatternSequence>,
    dry_run: bool,
    events: EventSender,
}

impl FileShredder {
    /// Create a shredder that reports to `events`.
    pub fn new(sequence: Arc<PatternSequence>, dry_run: bool, events: EventSender) -> Self {
        Self {
            sequence,
            dry_run,
            events,
        }
    }

    /// The pass sequence applied to every file.
    pub fn sequence(&self) -> &PatternSequence {
        &self.sequence
    }

    /// Shred `path` using the thread-local CSPRNG.
    ///
    /// Never returns an error: failures are logged and reported as
    /// [`ShredOutcome::Failed`]. A failed file may be left partially
    /// overwritten and/or renamed; nothing is rolled back.
    pub fn overwrite_file(&self, path: &Path, secure_rename: bool) -> ShredOutcome {
        self.overwrite_file_with(path, secure_rename, &mut rand::thread_rng())
    }

    /// Shred `path`, drawing random passes and rename names from `rng`.
    pub fn overwrite_file_with<R>(&self, path: &Path, secure_rename: bool, rng: &mut R) -> ShredOutcome
    where
        R: RngCore + CryptoRng,
    {
        match self.try_shred(path, secure_rename, rng) {
            Ok(outcome) => outcome,
            Err(Error::NotFound(path)) => {
                self.events.send(ShredEvent::NotFound { path });
                ShredOutcome::Failed
            }
            Err(e) => {
                self.events.send(ShredEvent::Failed {
                    path: path.to_path_buf(),
                    detail: e.to_string(),
                });
                ShredOutcome::Failed
            }
        }
    }

    fn try_shred<R>(&self, path: &Path, secure_rename: bool, rng: &mut R) -> Result<ShredOutcome>
    where
        R: RngCore + CryptoRng,
    {
        let metadata = match fs::symlink_metadata(path) {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::NotFound(path.to_path_buf()))
            }
            Err(e) => return Err(e.into()),
        };
        if !metadata.is_file() {
            return Err(Error::NotAFile(path.to_path_buf()));
        }

        if self.dry_run {
            self.events.send(ShredEvent::DryRun {
                path: path.to_path_buf(),
            });
            return Ok(ShredOutcome::DryRun);
        }

        let size = metadata.len();
        if size == 0 {
            fs::remove_file(path)?;
            self.events.send(ShredEvent::RemovedEmpty {
                path: path.to_path_buf(),
            });
            return Ok(ShredOutcome::RemovedEmpty);
        }

        self.overwrite(path, size, rng)?;

        let final_path = if secure_rename {
            let renamed = rename_randomly(path, rng)?;
            self.events.send(ShredEvent::Renamed {
                from: path.to_path_buf(),
                to: renamed.clone(),
            });
            renamed
        } else {
            path.to_path_buf()
        };

        fs::remove_file(&final_path)?;
        self.events.send(ShredEvent::Shredded {
            path: path.to_path_buf(),
        });
        Ok(ShredOutcome::Shredded)
    }

    /// Run every pass over `[0, size)` and commit. The handle is closed on return.
    fn overwrite<R>(&self, path: &Path, size: u64, rng: &mut R) -> Result<()>
    where
        R: RngCore + CryptoRng,
    {
        let mut file = OpenOptions::new().read(true).write(true).open(path)?;
        let total = self.sequence.len();

        for (i, pattern) in self.sequence.iter().enumerate() {
            let bytes = writer::write_pass(&mut file, size, *pattern, rng)?;
            writer::sync_pass(&file)?;
            self.events.send(ShredEvent::Pass {
                path: path.to_path_buf(),
                index: i + 1,
                total,
                bytes,
            });
        }

        writer::commit(&mut file)
    }
}

/// Generate a random lowercase alphanumeric name of `len` characters.
pub fn random_name<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| RENAME_ALPHABET[rng.gen_range(0..RENAME_ALPHABET.len())] as char)
        .collect()
}

/// Rename `path` to a random name of the same length in the same directory.
///
/// If the generated name is taken, `_1`, `_2`, ... is appended until a free
/// name is found.
///
/// # Returns
///
/// The new path.
pub fn rename_randomly<R: Rng + ?Sized>(path: &Path, rng: &mut R) -> Result<PathBuf> {
    let name_len = path
        .file_name()
        .map(|n| n.to_string_lossy().chars().count())
        .unwrap_or(1)
        .max(1);
    let dir = path.parent().unwrap_or_else(|| Path::new(""));

    let candidate = random_name(rng, name_len);
    let mut target = dir.join(&candidate);
    let mut counter = 0u32;
    while fs::symlink_metadata(&target).is_ok() {
        counter += 1;
        target = dir.join(format!("{}_{}", candidate, counter));
    }

    fs::rename(path, &target)?;
    Ok(target)
}

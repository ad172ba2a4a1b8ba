//! Whole-file hashing in fixed-size chunks with progress reporting.
//!
//! Progress is `chunks_before_this_read / estimated_total`, where the
//! estimate is `floor(size / CHUNK_SIZE) + 1`, followed by one final report
//! of `chunks_read / estimated_total` after the last read. The sequence is
//! non-decreasing, but the final value is only approximately 1.0 and is used
//! for display.

use super::digest::{DigestAccumulator, HexDigest};
use super::error::{HashError, Result};
use camino::Utf8Path;
use log::debug;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::sync::mpsc;
use std::thread;
use wingman::DigestAlgorithm;

/// Bytes read per chunk when hashing a whole file.
pub const CHUNK_SIZE: usize = 32 * 1024;

/// Hash the file at `path`, reporting progress after every chunk.
///
/// `on_progress` is called once per chunk and once more on completion, so a
/// zero-byte file still reports a single value.
///
/// # Errors
///
/// Returns [`HashError::Io`] if the file cannot be opened or read.
pub fn hash_file<F>(
    path: &Utf8Path,
    algorithm: DigestAlgorithm,
    mut on_progress: F,
) -> Result<HexDigest>
where
    F: FnMut(f64),
{
    let mut file = File::open(path).map_err(HashError::io(path))?;
    let size = file.metadata().map_err(HashError::io(path))?.len();
    let total = estimated_chunks(size);
    debug!("hashing {path} ({size} bytes, ~{total} chunks) with {algorithm}");

    let mut buffer = vec![0_u8; CHUNK_SIZE];
    let mut accumulator = DigestAccumulator::new(algorithm);
    let mut chunks = 0_u64;
    loop {
        let read = fill_chunk(&mut file, &mut buffer).map_err(HashError::io(path))?;
        let Some(chunk) = buffer.get(..read).filter(|chunk| !chunk.is_empty()) else {
            break;
        };
        accumulator = accumulator.update(chunk);
        on_progress(fraction(chunks, total));
        chunks += 1;
    }
    on_progress(fraction(chunks, total));
    Ok(accumulator.finish())
}

/// Hash `path` on a scoped worker thread, delivering progress on the calling
/// thread.
///
/// The call blocks until the digest is ready. Progress values arrive over a
/// channel in the order the worker produced them.
///
/// # Errors
///
/// Returns the worker's [`HashError`], or [`HashError::InvalidState`] if the
/// worker terminated without producing a result.
pub fn hash_file_in_background<F>(
    path: &Utf8Path,
    algorithm: DigestAlgorithm,
    mut on_progress: F,
) -> Result<HexDigest>
where
    F: FnMut(f64),
{
    let (sender, receiver) = mpsc::channel::<f64>();
    thread::scope(|scope| {
        let worker = scope.spawn(move || {
            hash_file(path, algorithm, |fraction| {
                // A closed receiver only means nobody is watching progress.
                let _ = sender.send(fraction);
            })
        });
        for fraction in receiver {
            on_progress(fraction);
        }
        worker.join().map_err(|_| HashError::InvalidState {
            reason: format!("hashing worker for {path} terminated unexpectedly"),
        })?
    })
}

const fn estimated_chunks(size: u64) -> u64 {
    size / CHUNK_SIZE as u64 + 1
}

fn fraction(chunks: u64, total: u64) -> f64 {
    chunks as f64 / total as f64
}

/// Read until `buffer` is full or the reader is exhausted.
fn fill_chunk(reader: &mut impl Read, buffer: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while let Some(rest) = buffer.get_mut(filled..).filter(|rest| !rest.is_empty()) {
        match reader.read(rest) {
            Ok(0) => break,
            Ok(read) => filled += read,
            Err(error) if error.kind() == ErrorKind::Interrupted => {}
            Err(error) => return Err(error),
        }
    }
    Ok(filled)
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;

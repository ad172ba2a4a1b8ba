//! Hashing of named entries inside zip-based installer packages.
//!
//! Packages are scanned as a forward-only stream of local entries so that
//! every entry carrying the requested name is hashed, duplicates included,
//! in the order they appear. Entries that record their sizes only in a
//! trailing data descriptor cannot be streamed; for those archives the scan
//! falls back to the central directory, which sees one entry per name.

use super::digest::{DigestAccumulator, HexDigest};
use super::error::{HashError, Result};
use camino::Utf8Path;
use log::{debug, warn};
use std::fs::File;
use std::io::{self, BufReader, ErrorKind, Read};
use wingman::DigestAlgorithm;
use zip::ZipArchive;
use zip::read::read_zipfile_from_stream;
use zip::result::ZipError;

/// Package entry holding the MSIX/APPX signature.
pub const SIGNATURE_ENTRY: &str = "AppxSignature.p7x";

/// File extensions accepted by [`hash_container_entry`], compared
/// case-insensitively.
pub const CONTAINER_EXTENSIONS: [&str; 4] = ["appx", "appxbundle", "msix", "msixbundle"];

const ENTRY_CHUNK_SIZE: usize = 1024;

/// Whether `path` names an appx or msix family package.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use wingman_cli::hashing::is_container_path;
///
/// assert!(is_container_path(Utf8Path::new("App.MSIXBundle")));
/// assert!(!is_container_path(Utf8Path::new("app.zip")));
/// ```
#[must_use]
pub fn is_container_path(path: &Utf8Path) -> bool {
    path.extension().is_some_and(|extension| {
        CONTAINER_EXTENSIONS
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(extension))
    })
}

/// Hash every entry named `entry_name` inside the package at `path`.
///
/// Matching entries feed one accumulator in encounter order. When nothing
/// matches, the digest of zero bytes is returned; use
/// [`HexDigest::is_empty_input_digest`] to detect that case.
///
/// # Errors
///
/// Returns [`HashError::InvalidArgument`] before touching the file when the
/// extension is not an allowed package type, and [`HashError::Io`] when the
/// file cannot be read or is not a valid archive.
pub fn hash_container_entry(
    path: &Utf8Path,
    entry_name: &str,
    algorithm: DigestAlgorithm,
) -> Result<HexDigest> {
    if !is_container_path(path) {
        return Err(HashError::InvalidArgument {
            reason: format!(
                "{path} is not a package; expected one of: {}",
                CONTAINER_EXTENSIONS.join(", ")
            ),
        });
    }

    let file = File::open(path).map_err(HashError::io(path))?;
    let accumulator = match scan_stream(BufReader::new(file), entry_name, algorithm) {
        Ok(accumulator) => accumulator,
        Err(ZipError::UnsupportedArchive(reason)) => {
            warn!("streaming scan of {path} unsupported ({reason}); using central directory");
            let reopened = File::open(path).map_err(HashError::io(path))?;
            scan_directory(reopened, entry_name, algorithm).map_err(archive_error(path))?
        }
        Err(error) => return Err(archive_error(path)(error)),
    };
    Ok(accumulator.finish())
}

/// Hash the MSIX/APPX signature entry of the package at `path`.
///
/// # Errors
///
/// See [`hash_container_entry`].
pub fn hash_msix_signature(path: &Utf8Path, algorithm: DigestAlgorithm) -> Result<HexDigest> {
    hash_container_entry(path, SIGNATURE_ENTRY, algorithm)
}

fn scan_stream(
    mut reader: impl Read,
    entry_name: &str,
    algorithm: DigestAlgorithm,
) -> std::result::Result<DigestAccumulator, ZipError> {
    let mut accumulator = DigestAccumulator::new(algorithm);
    let mut matched = 0_usize;
    // Dropping a streamed entry drains its remaining bytes, which positions
    // the reader at the next local header.
    while let Some(mut entry) = read_zipfile_from_stream(&mut reader)? {
        if entry.name() == entry_name {
            accumulator = absorb(accumulator, &mut entry)?;
            matched += 1;
        }
    }
    debug!("streamed {matched} entries named {entry_name}");
    Ok(accumulator)
}

fn scan_directory(
    file: File,
    entry_name: &str,
    algorithm: DigestAlgorithm,
) -> std::result::Result<DigestAccumulator, ZipError> {
    let mut archive = ZipArchive::new(BufReader::new(file))?;
    let accumulator = DigestAccumulator::new(algorithm);
    match archive.by_name(entry_name) {
        Ok(mut entry) => Ok(absorb(accumulator, &mut entry)?),
        Err(ZipError::FileNotFound) => Ok(accumulator),
        Err(error) => Err(error),
    }
}

fn absorb(
    mut accumulator: DigestAccumulator,
    entry: &mut impl Read,
) -> io::Result<DigestAccumulator> {
    let mut buffer = [0_u8; ENTRY_CHUNK_SIZE];
    loop {
        match entry.read(&mut buffer) {
            Ok(0) => return Ok(accumulator),
            Ok(read) => {
                let chunk = buffer.get(..read).unwrap_or_default();
                accumulator = accumulator.update(chunk);
            }
            Err(error) if error.kind() == ErrorKind::Interrupted => {}
            Err(error) => return Err(error),
        }
    }
}

fn archive_error(path: &Utf8Path) -> impl FnOnce(ZipError) -> HashError + '_ {
    move |error| HashError::Io {
        path: path.to_owned(),
        source: io::Error::from(error),
    }
}

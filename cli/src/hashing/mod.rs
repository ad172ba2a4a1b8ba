//! Streaming content hashing for installer files and package signatures.
//!
//! # Sub-modules
//!
//! - [`error`] - Error taxonomy for hashing failures.
//! - [`digest`] - Threaded digest accumulator and the `HexDigest` newtype.
//! - [`file`] - Chunked whole-file hashing with progress reporting.
//! - [`container`] - Hashing of named entries inside zip-based packages.

pub mod container;
pub mod digest;
pub mod error;
pub mod file;

pub use container::{
    CONTAINER_EXTENSIONS, SIGNATURE_ENTRY, hash_container_entry, hash_msix_signature,
    is_container_path,
};
pub use digest::{DigestAccumulator, HexDigest, render_hex};
pub use error::{HashError, Result};
pub use file::{CHUNK_SIZE, hash_file, hash_file_in_background};

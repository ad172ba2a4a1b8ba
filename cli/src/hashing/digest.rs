//! Digest accumulation and hexadecimal rendering.
//!
//! [`DigestAccumulator`] is consumed and returned by every update, so a
//! finalised accumulator can never be fed again and two hashing passes never
//! share one instance.

use sha2::{Digest, Sha256, Sha512};
use std::fmt::{self, Write as _};
use wingman::DigestAlgorithm;

/// Incremental digest state threaded through each chunk.
///
/// # Examples
///
/// ```
/// use wingman::DigestAlgorithm;
/// use wingman_cli::hashing::DigestAccumulator;
///
/// let digest = DigestAccumulator::new(DigestAlgorithm::Sha256)
///     .update(b"ab")
///     .update(b"c")
///     .finish();
/// assert_eq!(
///     digest.as_str(),
///     "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
/// );
/// ```
#[derive(Clone, Debug)]
pub struct DigestAccumulator {
    inner: Inner,
}

#[derive(Clone, Debug)]
enum Inner {
    Sha256(Sha256),
    Sha512(Sha512),
}

impl DigestAccumulator {
    /// Start an empty accumulator for `algorithm`.
    #[must_use]
    pub fn new(algorithm: DigestAlgorithm) -> Self {
        let inner = match algorithm {
            DigestAlgorithm::Sha256 => Inner::Sha256(Sha256::new()),
            DigestAlgorithm::Sha512 => Inner::Sha512(Sha512::new()),
        };
        Self { inner }
    }

    /// Feed `chunk` and return the advanced accumulator.
    #[must_use]
    pub fn update(mut self, chunk: &[u8]) -> Self {
        match &mut self.inner {
            Inner::Sha256(hasher) => hasher.update(chunk),
            Inner::Sha512(hasher) => hasher.update(chunk),
        }
        self
    }

    /// Finalise the digest and render it as lowercase hex.
    #[must_use]
    pub fn finish(self) -> HexDigest {
        let hex = match self.inner {
            Inner::Sha256(hasher) => render_hex(&hasher.finalize()),
            Inner::Sha512(hasher) => render_hex(&hasher.finalize()),
        };
        HexDigest(hex)
    }
}

/// Render `bytes` as lowercase hex, two digits per byte, no separators.
///
/// # Examples
///
/// ```
/// use wingman_cli::hashing::render_hex;
///
/// assert_eq!(render_hex(&[0x00, 0x0f, 0xa0, 0xff]), "000fa0ff");
/// ```
#[must_use]
pub fn render_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .fold(String::with_capacity(bytes.len() * 2), |mut hex, byte| {
            let _ = write!(hex, "{byte:02x}");
            hex
        })
}

/// A lowercase hexadecimal digest string.
///
/// Only produced by [`DigestAccumulator::finish`], so the length always
/// matches the algorithm: 64 characters for SHA-256, 128 for SHA-512.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HexDigest(String);

impl HexDigest {
    /// Return the digest as a hex string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Whether this is the digest of zero bytes under `algorithm`.
    ///
    /// Package-entry hashing returns the empty digest when no entry matched,
    /// so callers use this to tell "absent" from "present".
    #[must_use]
    pub fn is_empty_input_digest(&self, algorithm: DigestAlgorithm) -> bool {
        DigestAccumulator::new(algorithm).finish() == *self
    }
}

impl AsRef<str> for HexDigest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HexDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[rstest]
    fn empty_accumulator_yields_empty_input_digest() {
        let digest = DigestAccumulator::new(DigestAlgorithm::Sha256).finish();
        assert_eq!(digest.as_str(), EMPTY_SHA256);
        assert!(digest.is_empty_input_digest(DigestAlgorithm::Sha256));
    }

    #[rstest]
    fn chunking_does_not_change_the_digest() {
        let whole = DigestAccumulator::new(DigestAlgorithm::Sha512)
            .update(b"hello world")
            .finish();
        let split = DigestAccumulator::new(DigestAlgorithm::Sha512)
            .update(b"hello")
            .update(b" ")
            .update(b"world")
            .finish();
        assert_eq!(whole, split);
        assert_eq!(whole.as_str().len(), 128);
    }

    #[rstest]
    fn accumulators_are_independent_after_clone() {
        let base = DigestAccumulator::new(DigestAlgorithm::Sha256).update(b"shared");
        let left = base.clone().update(b"left").finish();
        let right = base.update(b"right").finish();
        assert_ne!(left, right);
    }

    #[rstest]
    #[case::zero(&[0x00], "00")]
    #[case::low_nibble(&[0x07], "07")]
    #[case::high(&[0xff, 0x10], "ff10")]
    #[case::empty(&[], "")]
    fn render_hex_pads_every_byte(#[case] bytes: &[u8], #[case] expected: &str) {
        assert_eq!(render_hex(bytes), expected);
    }
}

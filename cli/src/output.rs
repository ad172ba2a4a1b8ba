//! Output formatting for the wingman CLI.
//!
//! Each renderer returns a plain string so the binary decides where it
//! goes and tests can compare it directly.

use crate::hashing::HexDigest;
use crate::naming::ManifestNames;
use camino::Utf8Path;
use wingman::DigestAlgorithm;

/// Format a digest line in the `sha256sum` style, prefixed with the
/// algorithm.
///
/// # Example
///
/// ```
/// use camino::Utf8Path;
/// use wingman::DigestAlgorithm;
/// use wingman_cli::hashing::DigestAccumulator;
/// use wingman_cli::output::digest_line;
///
/// let digest = DigestAccumulator::new(DigestAlgorithm::Sha256).finish();
/// assert_eq!(
///     digest_line(DigestAlgorithm::Sha256, &digest, Utf8Path::new("empty.bin")),
///     "sha256  e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855  empty.bin"
/// );
/// ```
#[must_use]
pub fn digest_line(algorithm: DigestAlgorithm, digest: &HexDigest, path: &Utf8Path) -> String {
    format!("{algorithm}  {digest}  {path}")
}

/// Format the line reported when a package carries no signature entry.
#[must_use]
pub fn missing_signature_line(path: &Utf8Path) -> String {
    format!("No AppxSignature.p7x entry in {path}")
}

/// Format every derived name and path, one `label: value` pair per line.
#[must_use]
pub fn names_summary(names: &ManifestNames) -> String {
    let rows = [
        ("Branch", names.branch().to_string()),
        ("Installer manifest", names.installer_path()),
        ("Locale manifest", names.locale_path()),
        ("Version manifest", names.version_path()),
    ];
    rows.iter()
        .map(|(label, value)| format!("{label}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the confirmation printed after state has been written.
#[must_use]
pub fn saved_message(count: usize, path: &Utf8Path) -> String {
    let plural = if count == 1 { "field" } else { "fields" };
    format!("Saved {count} {plural} to {path}")
}

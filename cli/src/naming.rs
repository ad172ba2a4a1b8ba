//! Manifest file names, repository paths and the publication branch name.
//!
//! Everything here is derived once per run from the package identifier,
//! version and default locale. The branch suffix is the only random part;
//! its generator is seeded explicitly so a run can be reproduced by fixing
//! the seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;

/// Length of the random branch suffix.
pub const BRANCH_SUFFIX_LENGTH: usize = 14;

const BRANCH_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Random source used for branch suffixes.
pub type BranchRng = StdRng;

/// Build the branch generator: from `seed` when given, otherwise from the
/// operating system.
///
/// # Examples
///
/// ```
/// use wingman_cli::naming::{BranchName, branch_rng};
///
/// let first = BranchName::generate("Contoso.App", "1.0", &mut branch_rng(Some(7)));
/// let again = BranchName::generate("Contoso.App", "1.0", &mut branch_rng(Some(7)));
/// assert_eq!(first, again);
/// ```
#[must_use]
pub fn branch_rng(seed: Option<u64>) -> BranchRng {
    seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64)
}

/// Publication branch: `{identifier}-{version}-{suffix}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BranchName {
    name: String,
    suffix_start: usize,
}

impl BranchName {
    /// Draw a fresh suffix from `rng`.
    pub fn generate(identifier: &str, version: &str, rng: &mut impl Rng) -> Self {
        let suffix: String = (0..BRANCH_SUFFIX_LENGTH)
            .map(|_| char::from(BRANCH_ALPHABET[rng.random_range(0..BRANCH_ALPHABET.len())]))
            .collect();
        let name = format!("{identifier}-{version}-{suffix}");
        let suffix_start = name.len() - BRANCH_SUFFIX_LENGTH;
        Self { name, suffix_start }
    }

    /// Full branch name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// The random suffix alone.
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.name[self.suffix_start..]
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Names and repository paths of the three manifests of one package
/// version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestNames {
    installer: String,
    default_locale: String,
    version: String,
    base_path: String,
    branch: BranchName,
}

impl ManifestNames {
    /// Derive every name for `identifier` at `version` with manifests in
    /// `default_locale`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wingman_cli::naming::{ManifestNames, branch_rng};
    ///
    /// let names = ManifestNames::new("Contoso.App", "1.2.0", "en-US", &mut branch_rng(Some(1)));
    /// assert_eq!(names.locale_manifest(), "Contoso.App.locale.en-US.yaml");
    /// assert_eq!(
    ///     names.installer_path(),
    ///     "manifests/c/Contoso/App/1.2.0/Contoso.App.installer.yaml"
    /// );
    /// ```
    pub fn new(identifier: &str, version: &str, default_locale: &str, rng: &mut impl Rng) -> Self {
        let initial = identifier
            .chars()
            .next()
            .map(|first| first.to_lowercase().collect::<String>())
            .unwrap_or_default();
        Self {
            installer: format!("{identifier}.installer.yaml"),
            default_locale: format!("{identifier}.locale.{default_locale}.yaml"),
            version: format!("{identifier}.version.yaml"),
            base_path: format!(
                "manifests/{initial}/{}/{version}",
                identifier.replace('.', "/")
            ),
            branch: BranchName::generate(identifier, version, rng),
        }
    }

    /// `{identifier}.installer.yaml`.
    #[must_use]
    pub fn installer_manifest(&self) -> &str {
        &self.installer
    }

    /// `{identifier}.locale.{locale}.yaml`.
    #[must_use]
    pub fn locale_manifest(&self) -> &str {
        &self.default_locale
    }

    /// `{identifier}.version.yaml`.
    #[must_use]
    pub fn version_manifest(&self) -> &str {
        &self.version
    }

    /// Repository directory holding the manifests.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Repository path of the installer manifest.
    #[must_use]
    pub fn installer_path(&self) -> String {
        self.path_of(&self.installer)
    }

    /// Repository path of the default locale manifest.
    #[must_use]
    pub fn locale_path(&self) -> String {
        self.path_of(&self.default_locale)
    }

    /// Repository path of the version manifest.
    #[must_use]
    pub fn version_path(&self) -> String {
        self.path_of(&self.version)
    }

    /// Publication branch.
    #[must_use]
    pub const fn branch(&self) -> &BranchName {
        &self.branch
    }

    fn path_of(&self, file: &str) -> String {
        format!("{}/{file}", self.base_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn names() -> ManifestNames {
        ManifestNames::new("Microsoft.Edge.Beta", "120.0.1", "en-GB", &mut branch_rng(Some(42)))
    }

    #[rstest]
    fn file_names_follow_the_identifier(names: ManifestNames) {
        assert_eq!(names.installer_manifest(), "Microsoft.Edge.Beta.installer.yaml");
        assert_eq!(names.locale_manifest(), "Microsoft.Edge.Beta.locale.en-GB.yaml");
        assert_eq!(names.version_manifest(), "Microsoft.Edge.Beta.version.yaml");
    }

    #[rstest]
    fn paths_nest_identifier_segments_under_the_initial(names: ManifestNames) {
        assert_eq!(names.base_path(), "manifests/m/Microsoft/Edge/Beta/120.0.1");
        assert_eq!(
            names.version_path(),
            "manifests/m/Microsoft/Edge/Beta/120.0.1/Microsoft.Edge.Beta.version.yaml"
        );
        assert_eq!(
            names.locale_path(),
            "manifests/m/Microsoft/Edge/Beta/120.0.1/Microsoft.Edge.Beta.locale.en-GB.yaml"
        );
    }

    #[rstest]
    fn branch_has_identifier_version_and_suffix(names: ManifestNames) {
        let branch = names.branch();

        assert!(branch.as_str().starts_with("Microsoft.Edge.Beta-120.0.1-"));
        assert_eq!(branch.suffix().len(), BRANCH_SUFFIX_LENGTH);
        assert!(
            branch
                .suffix()
                .bytes()
                .all(|byte| byte.is_ascii_uppercase() || byte.is_ascii_digit())
        );
    }

    #[rstest]
    fn same_seed_gives_same_branch() {
        let first = BranchName::generate("A.B", "1", &mut branch_rng(Some(9)));
        let second = BranchName::generate("A.B", "1", &mut branch_rng(Some(9)));
        let other = BranchName::generate("A.B", "1", &mut branch_rng(Some(10)));

        assert_eq!(first, second);
        assert_ne!(first.suffix(), other.suffix());
    }

    #[rstest]
    fn empty_identifier_has_no_initial() {
        let names = ManifestNames::new("", "1", "en-US", &mut branch_rng(Some(0)));

        assert_eq!(names.base_path(), "manifests///1");
    }
}

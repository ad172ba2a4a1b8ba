//! Behaviour tests for installer and package-signature hashing.

mod support;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use sha2::{Digest, Sha256};
use std::cell::RefCell;
use support::{FixtureFile, package, plain_file};
use wingman::DigestAlgorithm;
use wingman_cli::hashing::{HashError, HexDigest, hash_file, hash_msix_signature, render_hex};

#[derive(Default)]
struct HashingWorld {
    fixture: RefCell<Option<FixtureFile>>,
    digest: RefCell<Option<HexDigest>>,
    error: RefCell<Option<HashError>>,
    progress: RefCell<Vec<f64>>,
}

#[fixture]
fn hashing_world() -> HashingWorld {
    HashingWorld::default()
}

impl HashingWorld {
    fn record(&self, result: Result<HexDigest, HashError>) {
        match result {
            Ok(digest) => {
                self.digest.replace(Some(digest));
            }
            Err(error) => {
                self.error.replace(Some(error));
            }
        }
    }

    fn digest(&self) -> String {
        self.digest
            .borrow()
            .as_ref()
            .map(|digest| digest.as_str().to_owned())
            .expect("hashing succeeded")
    }
}

#[given("an installer file containing \"{contents}\"")]
fn given_installer(hashing_world: &HashingWorld, contents: String) {
    hashing_world
        .fixture
        .replace(Some(plain_file("setup.exe", contents.as_bytes())));
}

#[given("an MSIX package whose signature is \"{signature}\"")]
fn given_signed_package(hashing_world: &HashingWorld, signature: String) {
    let entries: [(&str, &[u8]); 2] = [
        ("AppxManifest.xml", b"<Package/>"),
        ("AppxSignature.p7x", signature.as_bytes()),
    ];
    hashing_world
        .fixture
        .replace(Some(package("App.msix", &entries)));
}

#[given("an MSIX package without a signature")]
fn given_unsigned_package(hashing_world: &HashingWorld) {
    let entries: [(&str, &[u8]); 1] = [("AppxManifest.xml", b"<Package/>")];
    hashing_world
        .fixture
        .replace(Some(package("App.msix", &entries)));
}

#[when("the installer is hashed")]
fn when_installer_hashed(hashing_world: &HashingWorld) {
    let fixture = hashing_world.fixture.borrow();
    let path = &fixture.as_ref().expect("fixture prepared").path;
    let mut progress = Vec::new();
    let result = hash_file(path, DigestAlgorithm::Sha256, |fraction| {
        progress.push(fraction);
    });
    hashing_world.progress.replace(progress);
    hashing_world.record(result);
}

#[when("the package signature is hashed")]
fn when_signature_hashed(hashing_world: &HashingWorld) {
    let fixture = hashing_world.fixture.borrow();
    let path = &fixture.as_ref().expect("fixture prepared").path;
    hashing_world.record(hash_msix_signature(path, DigestAlgorithm::Sha256));
}

#[then("the digest is \"{expected}\"")]
fn then_digest(hashing_world: &HashingWorld, expected: String) {
    assert_eq!(hashing_world.digest(), expected);
}

#[then("the digest is the SHA-256 of \"{contents}\"")]
fn then_digest_of(hashing_world: &HashingWorld, contents: String) {
    let expected = render_hex(&Sha256::digest(contents.as_bytes()));
    assert_eq!(hashing_world.digest(), expected);
}

#[then("the digest is the empty-input digest")]
fn then_empty_digest(hashing_world: &HashingWorld) {
    let digest = hashing_world.digest.borrow();
    let digest = digest.as_ref().expect("hashing succeeded");
    assert!(digest.is_empty_input_digest(DigestAlgorithm::Sha256));
}

#[then("progress ends at completion")]
fn then_progress_complete(hashing_world: &HashingWorld) {
    let progress = hashing_world.progress.borrow();
    assert_eq!(progress.last().copied(), Some(1.0));
    assert!(progress.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[then("hashing is rejected as an invalid argument")]
fn then_invalid_argument(hashing_world: &HashingWorld) {
    assert!(matches!(
        hashing_world.error.borrow().as_ref(),
        Some(HashError::InvalidArgument { .. })
    ));
}

// ---------------------------------------------------------------------------
// Scenario bindings
// ---------------------------------------------------------------------------

#[scenario(path = "tests/features/hashing.feature", index = 0)]
fn scenario_plain_installer(hashing_world: HashingWorld) {
    let _ = hashing_world;
}

#[scenario(path = "tests/features/hashing.feature", index = 1)]
fn scenario_signed_package(hashing_world: HashingWorld) {
    let _ = hashing_world;
}

#[scenario(path = "tests/features/hashing.feature", index = 2)]
fn scenario_unsigned_package(hashing_world: HashingWorld) {
    let _ = hashing_world;
}

#[scenario(path = "tests/features/hashing.feature", index = 3)]
fn scenario_non_package_rejected(hashing_world: HashingWorld) {
    let _ = hashing_world;
}

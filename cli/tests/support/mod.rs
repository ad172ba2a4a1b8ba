//! Fixture builders shared by the behaviour tests.

use camino::Utf8PathBuf;
use std::io::Write;
use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// A file inside a temporary directory that lives as long as the fixture.
pub struct FixtureFile {
    /// Keeps the directory alive.
    _dir: TempDir,
    /// Path to the file.
    pub path: Utf8PathBuf,
}

fn fixture_path(dir: &TempDir, name: &str) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(dir.path().join(name)).expect("temp paths are UTF-8")
}

/// Write `contents` to a fresh file called `name`.
pub fn plain_file(name: &str, contents: &[u8]) -> FixtureFile {
    let dir = TempDir::new().expect("create temp dir");
    let path = fixture_path(&dir, name);
    std::fs::write(&path, contents).expect("write fixture");
    FixtureFile { _dir: dir, path }
}

/// Build a zip archive called `name` holding `entries`.
pub fn package(name: &str, entries: &[(&str, &[u8])]) -> FixtureFile {
    let dir = TempDir::new().expect("create temp dir");
    let path = fixture_path(&dir, name);
    let file = std::fs::File::create(&path).expect("create package");
    let mut writer = ZipWriter::new(file);
    for (entry, contents) in entries {
        writer
            .start_file(*entry, SimpleFileOptions::default())
            .expect("start entry");
        writer.write_all(contents).expect("write entry");
    }
    writer.finish().expect("finish package");
    FixtureFile { _dir: dir, path }
}

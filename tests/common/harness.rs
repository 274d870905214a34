//! Shared test harness for end-to-end CLI tests.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// An isolated collection root with a command builder pointed at it.
pub struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp collection root"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// A command pre-pointed at this collection root.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("audiolog").expect("binary builds");
        cmd.arg("--dir").arg(self.root());
        cmd
    }

    /// Writes a journal file directly into the root.
    pub fn add_journal(&self, stem: &str, name: &str) {
        let body = format!(r#"{{"name": "{name}"}}"#);
        fs::write(self.root().join(format!("{stem}.journal.json")), body)
            .expect("write journal file");
    }

    /// Writes a record metadata file directly into the root.
    pub fn add_record(&self, key: &str, name: &str, tags: &[&str], data: &[&str]) {
        let tags: Vec<String> = tags.iter().map(|t| format!("\"{t}\"")).collect();
        let data: Vec<String> = data.iter().map(|d| format!("\"{d}\"")).collect();
        let body = format!(
            r#"{{"name": "{name}", "tags": [{}], "data": [{}]}}"#,
            tags.join(", "),
            data.join(", ")
        );
        fs::write(self.root().join(key), body).expect("write record file");
    }

    /// Writes an audio source file for feeding into `import`. The fixture
    /// lives under a hidden directory so the scanner never sees it.
    pub fn audio_fixture(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let dir = self.root().join(".fixtures");
        fs::create_dir_all(&dir).expect("create fixture dir");
        let path = dir.join(name);
        fs::write(&path, bytes).expect("write audio fixture");
        path
    }

    pub fn file_exists(&self, rel: &str) -> bool {
        self.root().join(rel).exists()
    }
}

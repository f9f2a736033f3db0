//! Shared test infrastructure for integration tests.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A fixture tree copied into a scratch directory so builds never touch
/// the checked-in files.
pub struct TestFixture {
    pub temp_dir: TempDir,
}

/// Exit status and captured output of one CLI invocation.
#[derive(Debug)]
pub struct RunResult {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl From<Output> for RunResult {
    fn from(output: Output) -> Self {
        Self {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

fn manifest_dir() -> PathBuf {
    PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into()))
}

fn copy_tree(from: &Path, to: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(to)?;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let target = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

impl TestFixture {
    /// Load a fixture by name from tests/fixtures/{name}/.
    pub fn load(name: &str) -> anyhow::Result<Self> {
        let fixture_dir = manifest_dir().join("tests/fixtures").join(name);
        let temp_dir = TempDir::new()?;
        copy_tree(&fixture_dir, temp_dir.path()).map_err(|e| {
            anyhow::anyhow!("Failed to copy fixture {}: {}", fixture_dir.display(), e)
        })?;
        Ok(Self { temp_dir })
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel))
            .unwrap_or_else(|e| panic!("Failed to read {rel}: {e}"))
    }

    /// Run `schema-vocab <command> --config config/config.yaml --root <fixture>`
    /// followed by `extra`.
    pub fn run(&self, command: &str, extra: &[&str]) -> RunResult {
        let output = Command::new(env!("CARGO_BIN_EXE_schema-vocab"))
            .arg(command)
            .arg("--config")
            .arg(self.path("config/config.yaml"))
            .arg("--root")
            .arg(self.root())
            .args(extra)
            .env_remove("RUST_LOG")
            .output()
            .expect("spawn schema-vocab");
        output.into()
    }
}

//! Line-addressable scheme document with sentinel substitution.
//!
//! The document is loaded once from the already-built output (or from the
//! template on the first run), mutated in memory and flushed by replacing the
//! destination file in one rename.
use crate::serialize::EnumFragment;
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubstitutionOutcome {
    /// The sentinel at zero-based `line` was replaced by `inserted` lines.
    Replaced { line: usize, inserted: usize },
    /// No line equals the sentinel; the document is unchanged.
    NotFound,
}

#[derive(Debug, Clone)]
pub struct SchemeDocument {
    destination: PathBuf,
    lines: Vec<String>,
    dirty: bool,
}

impl SchemeDocument {
    /// Open the output document if it exists, otherwise start from `template`.
    pub fn open(template: &Path, output: &Path) -> Result<Self> {
        let source = if output.is_file() { output } else { template };
        let text = fs::read_to_string(source)
            .with_context(|| format!("read scheme {}", source.display()))?;
        tracing::debug!(source = %source.display(), "scheme document loaded");
        Ok(Self::from_text(&text, output.to_path_buf()))
    }

    pub fn from_text(text: &str, destination: PathBuf) -> Self {
        Self {
            destination,
            lines: text.split_inclusive('\n').map(normalize_line).collect(),
            dirty: false,
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Replace the first line equal to `sentinel` (terminator included) with
    /// the fragment's lines.
    pub fn substitute(&mut self, sentinel: &str, fragment: &EnumFragment) -> SubstitutionOutcome {
        let Some(index) = self.lines.iter().position(|line| line == sentinel) else {
            tracing::warn!(
                sentinel = sentinel.trim_end(),
                destination = %self.destination.display(),
                "sentinel not found; nothing substituted"
            );
            return SubstitutionOutcome::NotFound;
        };
        let inserted = fragment.lines().len();
        self.lines
            .splice(index..=index, fragment.lines().iter().cloned());
        self.dirty = true;
        SubstitutionOutcome::Replaced {
            line: index,
            inserted,
        }
    }

    /// Write the document if it changed since the last flush.
    pub fn flush(&mut self) -> Result<bool> {
        if !self.dirty {
            return Ok(false);
        }
        let parent = self
            .destination
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;

        let mut staged = tempfile::NamedTempFile::new_in(parent)
            .with_context(|| format!("stage {}", self.destination.display()))?;
        for line in &self.lines {
            staged
                .write_all(line.as_bytes())
                .with_context(|| format!("write {}", self.destination.display()))?;
        }
        staged
            .persist(&self.destination)
            .map_err(|err| anyhow!("publish {}: {}", self.destination.display(), err.error))?;
        self.dirty = false;
        tracing::info!(
            destination = %self.destination.display(),
            lines = self.lines.len(),
            "scheme document written"
        );
        Ok(true)
    }
}

/// CRLF terminators become `\n` so sentinels from the config match.
fn normalize_line(line: &str) -> String {
    match line.strip_suffix("\r\n") {
        Some(body) => format!("{body}\n"),
        None => line.to_string(),
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;

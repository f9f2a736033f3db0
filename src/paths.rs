//! Typed paths into the schema build layout.
//!
//! Every file the pipeline touches is derived here from the configured
//! environment so the layout is defined in exactly one place.
use crate::config::Environment;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct SchemePaths {
    root: PathBuf,
    ontologies_dir: PathBuf,
    schemes_dir: PathBuf,
    final_schemes_dir: PathBuf,
    scheme_file: String,
}

impl SchemePaths {
    pub fn new(root: PathBuf, environment: &Environment) -> Self {
        Self {
            ontologies_dir: root.join(&environment.path_for_ontologies),
            schemes_dir: root.join(&environment.path_for_schemes),
            final_schemes_dir: root.join(&environment.path_for_final_schemes),
            scheme_file: environment.name_of_schemes_file.clone(),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ontologies_dir(&self) -> &Path {
        &self.ontologies_dir
    }

    /// Return the `<ontologies>/<key>.owl` path for an OWL source.
    pub fn owl_path(&self, vocabulary: &str) -> PathBuf {
        self.ontologies_dir
            .join(format!("{}.owl", vocabulary.to_lowercase()))
    }

    /// Return every `*.csv` in the ontology directory whose name contains the
    /// lower-cased source key, sorted by path.
    pub fn csv_paths(&self, vocabulary: &str) -> Result<Vec<PathBuf>> {
        let needle = vocabulary.to_lowercase();
        let mut paths = Vec::new();
        let entries = fs::read_dir(&self.ontologies_dir)
            .with_context(|| format!("read {}", self.ontologies_dir.display()))?;
        for entry in entries {
            let path = entry
                .with_context(|| format!("read entry in {}", self.ontologies_dir.display()))?
                .path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            if name.ends_with(".csv") && name.contains(&needle) {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    pub fn template_path(&self) -> PathBuf {
        self.schemes_dir.join(&self.scheme_file)
    }

    pub fn output_path(&self) -> PathBuf {
        self.final_schemes_dir.join(&self.scheme_file)
    }

    pub fn final_schemes_dir(&self) -> &Path {
        &self.final_schemes_dir
    }
}

pub fn display_path(path: &Path, base: Option<&Path>) -> String {
    if let Some(base) = base {
        if let Ok(relative) = path.strip_prefix(base) {
            return relative.display().to_string();
        }
    }
    path.display().to_string()
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;

//! Vocabulary configuration loading and validation.
//!
//! The YAML layout is shared with the download and bundling tooling around
//! this crate, so unknown keys (archive URLs, zip flags, bundler paths) are
//! accepted and ignored here.
use crate::error::VocabError;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Namespace used to admit edges when a source does not name its own.
pub const DEFAULT_NAMESPACE: &str = "http://purl.obolibrary.org/obo/";

#[derive(Debug, Deserialize, Clone)]
struct ConfigFile {
    config: VocabConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct VocabConfig {
    pub environment: Environment,
    pub prefixes_controlled_vocabularies: PrefixBlock,
    /// Processed in ascending key order.
    pub ontologies: BTreeMap<String, VocabularySource>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Environment {
    pub path_for_ontologies: String,
    pub path_for_schemes: String,
    pub path_for_final_schemes: String,
    pub name_of_schemes_file: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PrefixBlock {
    pub term_to_replace: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct VocabularySource {
    pub format: SourceFormat,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(rename = "enum", default)]
    pub enums: BTreeMap<String, ExtractionSpec>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceFormat {
    pub file_suffix: SourceKind,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Owl,
    Csv,
    #[serde(other)]
    Unsupported,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Owl => "owl",
            SourceKind::Csv => "csv",
            SourceKind::Unsupported => "unsupported",
        }
    }
}

/// One `enum:` entry. Shapes are told apart by their keys.
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum ExtractionSpec {
    Owl(OwlExtraction),
    Csv(CsvExtraction),
    Unsupported(serde_yaml::Value),
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OwlExtraction {
    pub descending_from: String,
    pub term_to_replace: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CsvExtraction {
    pub filtering_column: String,
    pub filtering_term: serde_yaml::Value,
    pub terms_to_include: Vec<String>,
    pub term_to_replace: String,
}

impl ExtractionSpec {
    /// Keys present in the entry, for configuration errors.
    fn keys(&self) -> String {
        match self {
            ExtractionSpec::Owl(_) => "descending_from, term_to_replace".to_string(),
            ExtractionSpec::Csv(_) => {
                "filtering_column, filtering_term, terms_to_include, term_to_replace".to_string()
            }
            ExtractionSpec::Unsupported(serde_yaml::Value::Mapping(mapping)) => {
                let keys: Vec<String> = mapping
                    .keys()
                    .map(|key| match key {
                        serde_yaml::Value::String(key) => key.clone(),
                        other => format!("{other:?}"),
                    })
                    .collect();
                if keys.is_empty() {
                    "no keys".to_string()
                } else {
                    keys.join(", ")
                }
            }
            ExtractionSpec::Unsupported(_) => "a non-mapping value".to_string(),
        }
    }
}

impl CsvExtraction {
    /// Render the filter value the way it appears in a CSV cell.
    pub fn filtering_text(&self) -> Option<String> {
        match &self.filtering_term {
            serde_yaml::Value::String(value) => Some(value.clone()),
            serde_yaml::Value::Number(value) => Some(value.to_string()),
            serde_yaml::Value::Bool(value) => Some(value.to_string()),
            _ => None,
        }
    }
}

impl VocabularySource {
    pub fn namespace(&self) -> &str {
        self.namespace.as_deref().unwrap_or(DEFAULT_NAMESPACE)
    }

    pub fn owl_extractions(
        &self,
        vocabulary: &str,
    ) -> Result<Vec<(&str, &OwlExtraction)>, VocabError> {
        let mut out = Vec::new();
        for (name, extraction) in &self.enums {
            match extraction {
                ExtractionSpec::Owl(owl) => out.push((name.as_str(), owl)),
                other => {
                    return Err(VocabError::configuration(
                        vocabulary,
                        format!(
                            "enum {name} needs descending_from and term_to_replace (found {})",
                            other.keys()
                        ),
                    ))
                }
            }
        }
        if out.is_empty() {
            return Err(VocabError::configuration(vocabulary, "no enum entries"));
        }
        Ok(out)
    }

    pub fn csv_extractions(
        &self,
        vocabulary: &str,
    ) -> Result<Vec<(&str, &CsvExtraction)>, VocabError> {
        let mut out = Vec::new();
        for (name, extraction) in &self.enums {
            match extraction {
                ExtractionSpec::Csv(csv) => out.push((name.as_str(), csv)),
                other => {
                    return Err(VocabError::configuration(
                        vocabulary,
                        format!(
                            "enum {name} needs filtering_column, filtering_term, \
                             terms_to_include and term_to_replace (found {})",
                            other.keys()
                        ),
                    ))
                }
            }
        }
        if out.is_empty() {
            return Err(VocabError::configuration(
                vocabulary,
                "csv source has no filtering enum (e.g. coll_by_enum)",
            ));
        }
        Ok(out)
    }
}

/// Load the vocabulary config from a YAML file with a top-level `config:` key.
pub fn load_config(path: &Path) -> Result<VocabConfig> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let file: ConfigFile = serde_yaml::from_slice(&bytes)
        .with_context(|| format!("parse config YAML {}", path.display()))?;
    Ok(file.config)
}

/// Validate environment paths, sentinels and the shape of every extraction.
pub fn validate_config(config: &VocabConfig) -> Result<()> {
    let env = &config.environment;
    for (label, value) in [
        ("path_for_ontologies", &env.path_for_ontologies),
        ("path_for_schemes", &env.path_for_schemes),
        ("path_for_final_schemes", &env.path_for_final_schemes),
        ("name_of_schemes_file", &env.name_of_schemes_file),
    ] {
        if value.trim().is_empty() {
            return Err(VocabError::configuration(
                "environment",
                format!("{label} must be non-empty"),
            )
            .into());
        }
        validate_relative_path(value, label)?;
    }
    if config.prefixes_controlled_vocabularies.term_to_replace.is_empty() {
        return Err(VocabError::configuration(
            "prefixes_controlled_vocabularies",
            "term_to_replace must be non-empty",
        )
        .into());
    }

    for (vocabulary, source) in &config.ontologies {
        match source.format.file_suffix {
            SourceKind::Owl => {
                for (name, owl) in source.owl_extractions(vocabulary)? {
                    require_sentinel(vocabulary, name, &owl.term_to_replace)?;
                    if owl.descending_from.trim().is_empty() {
                        return Err(VocabError::configuration(
                            vocabulary,
                            format!("enum {name} has an empty descending_from"),
                        )
                        .into());
                    }
                }
            }
            SourceKind::Csv => {
                for (name, csv) in source.csv_extractions(vocabulary)? {
                    require_sentinel(vocabulary, name, &csv.term_to_replace)?;
                    if csv.filtering_text().is_none() {
                        return Err(VocabError::configuration(
                            vocabulary,
                            format!("enum {name} filtering_term must be a scalar"),
                        )
                        .into());
                    }
                    if csv.terms_to_include.is_empty() {
                        return Err(VocabError::configuration(
                            vocabulary,
                            format!("enum {name} terms_to_include must be non-empty"),
                        )
                        .into());
                    }
                }
            }
            SourceKind::Unsupported => {
                return Err(VocabError::configuration(
                    vocabulary,
                    "file_suffix must be \"owl\" or \"csv\"",
                )
                .into());
            }
        }
    }
    Ok(())
}

fn require_sentinel(vocabulary: &str, name: &str, sentinel: &str) -> Result<(), VocabError> {
    if sentinel.is_empty() {
        return Err(VocabError::configuration(
            vocabulary,
            format!("enum {name} term_to_replace must be non-empty"),
        ));
    }
    Ok(())
}

fn validate_relative_path(rel: &str, label: &str) -> Result<()> {
    let path = Path::new(rel);
    if path.is_absolute() || has_parent_components(path) {
        return Err(VocabError::configuration(
            "environment",
            format!("{label} must be a relative path without '..' (got {rel:?})"),
        )
        .into());
    }
    Ok(())
}

fn has_parent_components(path: &Path) -> bool {
    path.components()
        .any(|component| matches!(component, std::path::Component::ParentDir))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

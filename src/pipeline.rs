//! Sequential build of the final scheme document.
//!
//! Sources run one after another against a single in-memory document; the
//! document is flushed after each source and once more after the prefix
//! block, so a failure never leaves a half-written file behind.
use crate::closure::extract_closure;
use crate::config::{validate_config, SourceKind, VocabConfig, VocabularySource};
use crate::document::{SchemeDocument, SubstitutionOutcome};
use crate::error::VocabError;
use crate::graph::{load_rdf_xml, BaseIriNamespace, GraphBuilder};
use crate::paths::{display_path, SchemePaths};
use crate::prefixes::{derive_prefixes, PrefixTable};
use crate::serialize::{render_concepts, render_prefixes, render_tabular};
use crate::tabular::{filter_and_project, load_csv};
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub output_path: String,
    pub extractions: Vec<ExtractionReport>,
    pub prefixes: PrefixReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    pub vocabulary: String,
    pub enum_name: String,
    pub format: &'static str,
    pub source_file: String,
    pub sentinel: String,
    pub entries: usize,
    pub substitution: SubstitutionOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrefixReport {
    pub entries: usize,
    pub substitution: SubstitutionOutcome,
}

struct BuildState<'a> {
    paths: &'a SchemePaths,
    document: SchemeDocument,
    prefixes: PrefixTable,
    extractions: Vec<ExtractionReport>,
}

impl BuildState<'_> {
    fn extract_owl(&mut self, vocabulary: &str, source: &VocabularySource) -> Result<()> {
        let extractions = source.owl_extractions(vocabulary)?;
        let path = self.paths.owl_path(vocabulary);
        let triples = load_rdf_xml(&path)?;
        let graph = GraphBuilder::new(BaseIriNamespace::new(source.namespace())).build(&triples);

        for (enum_name, extraction) in extractions {
            let records = extract_closure(&graph, &extraction.descending_from)
                .with_context(|| format!("extract {vocabulary}/{enum_name}"))?;
            let accepted = self.prefixes.merge(derive_prefixes(&records));
            let fragment = render_concepts(&records);
            let substitution = self.document.substitute(&extraction.term_to_replace, &fragment);
            tracing::info!(
                vocabulary,
                enum_name,
                entries = fragment.entries(),
                new_prefixes = accepted,
                "owl vocabulary rendered"
            );
            self.extractions.push(ExtractionReport {
                vocabulary: vocabulary.to_string(),
                enum_name: enum_name.to_string(),
                format: SourceKind::Owl.as_str(),
                source_file: display_path(&path, Some(self.paths.root())),
                sentinel: extraction.term_to_replace.trim_end().to_string(),
                entries: fragment.entries(),
                substitution,
            });
        }
        Ok(())
    }

    fn extract_csv(&mut self, vocabulary: &str, source: &VocabularySource) -> Result<()> {
        let extractions = source.csv_extractions(vocabulary)?;
        let files = self.paths.csv_paths(vocabulary)?;
        if files.is_empty() {
            tracing::warn!(vocabulary, "no CSV file matches this vocabulary");
        }

        for path in files {
            let table = load_csv(&path)?;
            for (enum_name, extraction) in &extractions {
                let term = extraction.filtering_text().ok_or_else(|| {
                    VocabError::configuration(vocabulary, "filtering_term must be a scalar")
                })?;
                let records = filter_and_project(
                    &table,
                    &extraction.filtering_column,
                    &term,
                    &extraction.terms_to_include,
                )
                .with_context(|| format!("filter {vocabulary}/{enum_name}"))?;
                let fragment = render_tabular(&records);
                let substitution = self.document.substitute(&extraction.term_to_replace, &fragment);
                tracing::info!(
                    vocabulary,
                    enum_name = *enum_name,
                    table = %table.name,
                    entries = fragment.entries(),
                    "csv vocabulary rendered"
                );
                self.extractions.push(ExtractionReport {
                    vocabulary: vocabulary.to_string(),
                    enum_name: enum_name.to_string(),
                    format: SourceKind::Csv.as_str(),
                    source_file: display_path(&path, Some(self.paths.root())),
                    sentinel: extraction.term_to_replace.trim_end().to_string(),
                    entries: fragment.entries(),
                    substitution,
                });
            }
        }
        Ok(())
    }
}

/// Inject every configured vocabulary, then the prefix block, into the
/// scheme document. The first failing source aborts the run.
pub fn run_build(config: &VocabConfig, paths: &SchemePaths) -> Result<BuildReport> {
    validate_config(config)?;
    let document = SchemeDocument::open(&paths.template_path(), &paths.output_path())?;
    let mut state = BuildState {
        paths,
        document,
        prefixes: PrefixTable::default(),
        extractions: Vec::new(),
    };

    for (vocabulary, source) in &config.ontologies {
        let start = Instant::now();
        match source.format.file_suffix {
            SourceKind::Owl => state.extract_owl(vocabulary, source)?,
            SourceKind::Csv => state.extract_csv(vocabulary, source)?,
            SourceKind::Unsupported => {
                return Err(VocabError::configuration(
                    vocabulary,
                    "file_suffix must be \"owl\" or \"csv\"",
                )
                .into())
            }
        }
        state.document.flush()?;
        tracing::info!(
            vocabulary = vocabulary.as_str(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "vocabulary source processed"
        );
    }

    if state.prefixes.is_empty() {
        tracing::warn!("no ontology prefixes collected");
    }
    let fragment = render_prefixes(&state.prefixes);
    let substitution = state.document.substitute(
        &config.prefixes_controlled_vocabularies.term_to_replace,
        &fragment,
    );
    state.document.flush()?;
    tracing::info!(
        lines = state.document.lines().len(),
        prefixes = state.prefixes.len(),
        "scheme build complete"
    );

    Ok(BuildReport {
        output_path: display_path(state.document.destination(), Some(paths.root())),
        extractions: state.extractions,
        prefixes: PrefixReport {
            entries: fragment.entries(),
            substitution,
        },
    })
}

/// Validate the config and confirm every input the build will read exists.
pub fn check_inputs(config: &VocabConfig, paths: &SchemePaths) -> Result<Vec<PathBuf>> {
    validate_config(config)?;
    let mut inputs = Vec::new();
    let template = paths.template_path();
    if !template.is_file() {
        return Err(anyhow!("missing template {}", template.display()));
    }
    inputs.push(template);

    for (vocabulary, source) in &config.ontologies {
        match source.format.file_suffix {
            SourceKind::Owl => {
                let path = paths.owl_path(vocabulary);
                if !path.is_file() {
                    return Err(anyhow!("missing ontology {}", path.display()));
                }
                inputs.push(path);
            }
            SourceKind::Csv => {
                let files = paths.csv_paths(vocabulary)?;
                if files.is_empty() {
                    return Err(anyhow!(
                        "no CSV file containing {:?} in {}",
                        vocabulary.to_lowercase(),
                        paths.ontologies_dir().display()
                    ));
                }
                inputs.extend(files);
            }
            SourceKind::Unsupported => {}
        }
    }
    Ok(inputs)
}

/// Remove previously built schemes so the next build starts from the template.
pub fn clean_output(paths: &SchemePaths) -> Result<bool> {
    let dir = paths.final_schemes_dir();
    if !dir.exists() {
        return Ok(false);
    }
    fs::remove_dir_all(dir).with_context(|| format!("remove {}", dir.display()))?;
    tracing::info!(dir = %dir.display(), "removed previous build output");
    Ok(true)
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;

//! Descendant closure over is-a edges.
//!
//! Subclass edges point from the narrower concept to the broader one, so the
//! members of a vocabulary rooted at `R` are the nodes with a subclass path
//! reaching `R`.
use crate::error::VocabError;
use crate::graph::{EdgeRole, TripleGraph};
use std::collections::{BTreeSet, VecDeque};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConceptRecord {
    pub iri: String,
    pub id: String,
    pub label: String,
}

/// Derive a CURIE-like identifier from a node: the last path segment with
/// every `_` turned into `:`.
pub fn concept_id(node: &str) -> String {
    node.rsplit('/').next().unwrap_or(node).replace('_', ":")
}

/// Extract every concept beneath `root`, sorted by label.
///
/// The descendant set is widened by one hop in the full graph before records
/// are resolved; nodes that end up without a label are dropped and the root
/// itself is never part of the result.
pub fn extract_closure(
    graph: &TripleGraph,
    root: &str,
) -> Result<Vec<ConceptRecord>, VocabError> {
    if !graph.contains(root) {
        return Err(VocabError::RootNotFound(root.to_string()));
    }

    let descendants = subclass_descendants(graph, root);
    if descendants.is_empty() {
        return Err(VocabError::NoDescendants(root.to_string()));
    }

    let mut candidates: BTreeSet<&str> = BTreeSet::new();
    for &node in &descendants {
        candidates.insert(node);
        candidates.extend(graph.predecessors(node).map(|(source, _)| source));
        candidates.extend(graph.successors(node).map(|(target, _)| target));
    }
    candidates.remove(root);

    let mut records: Vec<ConceptRecord> = candidates
        .into_iter()
        .filter_map(|node| resolve_record(graph, node))
        .collect();
    records.sort_by(|a, b| a.label.cmp(&b.label));
    Ok(records)
}

fn subclass_descendants<'a>(graph: &'a TripleGraph, root: &str) -> BTreeSet<&'a str> {
    let mut seen: BTreeSet<&'a str> = BTreeSet::new();
    let mut queue: VecDeque<&'a str> = graph
        .predecessors(root)
        .filter(|(_, role)| *role == EdgeRole::SubClassOf)
        .map(|(source, _)| source)
        .collect();
    while let Some(node) = queue.pop_front() {
        if !seen.insert(node) {
            continue;
        }
        queue.extend(
            graph
                .predecessors(node)
                .filter(|(_, role)| *role == EdgeRole::SubClassOf)
                .map(|(source, _)| source),
        );
    }
    // A subclass cycle through the root would otherwise list it as its own descendant.
    seen.remove(root);
    seen
}

fn resolve_record(graph: &TripleGraph, node: &str) -> Option<ConceptRecord> {
    // Lowest label wins when a concept carries several.
    let label = graph
        .successors(node)
        .filter(|(_, role)| *role == EdgeRole::Label)
        .map(|(target, _)| target)
        .min()?;
    Some(ConceptRecord {
        iri: node.to_string(),
        id: concept_id(node),
        label: label.to_string(),
    })
}

#[cfg(test)]
#[path = "closure_tests.rs"]
mod tests;

//! Restricted ontology graph construction.
//!
//! Only identifier, label and subclass assertions survive, and only when one
//! endpoint lies in the ontology's namespace. The admission test is a plain
//! substring match on the namespace base IRI, so it can admit an unrelated
//! triple that happens to mention the namespace.
use anyhow::{Context, Result};
use oxrdf::{BlankNode, Subject, Term};
use oxrdfxml::RdfXmlParser;
use regex::Regex;
use sha2::Digest;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub const OBO_IN_OWL_ID: &str = "http://www.geneontology.org/formats/oboInOwl#id";
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
pub const RDFS_SUB_CLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";

/// Generated blank-node names: `N` plus 32 characters.
const ANONYMOUS_NODE_PATTERN: &str = r"^N.{32}$";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl Triple {
    fn from_rdf(triple: &oxrdf::Triple) -> Self {
        Self {
            subject: subject_text(&triple.subject),
            predicate: triple.predicate.as_str().to_string(),
            object: term_text(&triple.object),
        }
    }
}

#[allow(unreachable_patterns)]
fn subject_text(subject: &Subject) -> String {
    match subject {
        Subject::NamedNode(node) => node.as_str().to_string(),
        Subject::BlankNode(node) => anonymous_name(node),
        other => other.to_string(),
    }
}

#[allow(unreachable_patterns)]
fn term_text(term: &Term) -> String {
    match term {
        Term::NamedNode(node) => node.as_str().to_string(),
        Term::BlankNode(node) => anonymous_name(node),
        Term::Literal(literal) => literal.value().to_string(),
        other => other.to_string(),
    }
}

/// Stable 33-character name for a blank node, always matching the
/// anonymous-node pattern.
fn anonymous_name(node: &BlankNode) -> String {
    let mut hasher = sha2::Sha256::new();
    hasher.update(node.as_str().as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!("N{}", &digest[..32])
}

/// Parse an RDF/XML ontology into plain string triples.
pub fn load_rdf_xml(path: &Path) -> Result<Vec<Triple>> {
    let file = File::open(path).with_context(|| format!("open ontology {}", path.display()))?;
    let mut triples = Vec::new();
    for triple in RdfXmlParser::new().for_reader(BufReader::new(file)) {
        let triple = triple.with_context(|| format!("parse RDF/XML {}", path.display()))?;
        triples.push(Triple::from_rdf(&triple));
    }
    Ok(triples)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeRole {
    Identifier,
    Label,
    SubClassOf,
}

impl EdgeRole {
    pub fn from_predicate(predicate: &str) -> Option<Self> {
        match predicate {
            OBO_IN_OWL_ID => Some(EdgeRole::Identifier),
            RDFS_LABEL => Some(EdgeRole::Label),
            RDFS_SUB_CLASS_OF => Some(EdgeRole::SubClassOf),
            _ => None,
        }
    }
}

/// Decides whether a node belongs to the ontology being extracted.
pub trait NamespacePredicate {
    fn admits(&self, node: &str) -> bool;
}

/// Admits any node whose string form contains the base IRI.
#[derive(Debug, Clone)]
pub struct BaseIriNamespace {
    base: String,
}

impl BaseIriNamespace {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }
}

impl NamespacePredicate for BaseIriNamespace {
    fn admits(&self, node: &str) -> bool {
        node.contains(&self.base)
    }
}

impl<F> NamespacePredicate for F
where
    F: Fn(&str) -> bool,
{
    fn admits(&self, node: &str) -> bool {
        self(node)
    }
}

/// Directed graph keyed by node string. Every node has an entry in both
/// adjacency maps, possibly empty.
#[derive(Debug, Default, Clone)]
pub struct TripleGraph {
    successors: BTreeMap<String, BTreeMap<String, EdgeRole>>,
    predecessors: BTreeMap<String, BTreeMap<String, EdgeRole>>,
}

impl TripleGraph {
    /// A repeated (subject, object) pair keeps the most recent role.
    fn add_edge(&mut self, subject: &str, object: &str, role: EdgeRole) {
        self.predecessors.entry(subject.to_string()).or_default();
        self.successors.entry(object.to_string()).or_default();
        self.successors
            .entry(subject.to_string())
            .or_default()
            .insert(object.to_string(), role);
        self.predecessors
            .entry(object.to_string())
            .or_default()
            .insert(subject.to_string(), role);
    }

    fn remove_node(&mut self, node: &str) {
        if let Some(targets) = self.successors.remove(node) {
            for target in targets.keys() {
                if let Some(incoming) = self.predecessors.get_mut(target) {
                    incoming.remove(node);
                }
            }
        }
        if let Some(sources) = self.predecessors.remove(node) {
            for source in sources.keys() {
                if let Some(outgoing) = self.successors.get_mut(source) {
                    outgoing.remove(node);
                }
            }
        }
    }

    pub fn contains(&self, node: &str) -> bool {
        self.successors.contains_key(node)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.successors.keys().map(String::as_str)
    }

    pub fn successors<'a>(&'a self, node: &str) -> impl Iterator<Item = (&'a str, EdgeRole)> {
        self.successors
            .get(node)
            .into_iter()
            .flat_map(|edges| edges.iter().map(|(target, role)| (target.as_str(), *role)))
    }

    pub fn predecessors<'a>(&'a self, node: &str) -> impl Iterator<Item = (&'a str, EdgeRole)> {
        self.predecessors
            .get(node)
            .into_iter()
            .flat_map(|edges| edges.iter().map(|(source, role)| (source.as_str(), *role)))
    }

    pub fn node_count(&self) -> usize {
        self.successors.len()
    }

    pub fn edge_count(&self) -> usize {
        self.successors.values().map(BTreeMap::len).sum()
    }
}

pub struct GraphBuilder<N> {
    namespace: N,
    anonymous: Regex,
}

impl<N: NamespacePredicate> GraphBuilder<N> {
    pub fn new(namespace: N) -> Self {
        Self {
            namespace,
            anonymous: Regex::new(ANONYMOUS_NODE_PATTERN).expect("regex for anonymous nodes"),
        }
    }

    pub fn is_anonymous(&self, node: &str) -> bool {
        self.anonymous.is_match(node)
    }

    pub fn build(&self, triples: &[Triple]) -> TripleGraph {
        let mut graph = TripleGraph::default();
        for triple in triples {
            let Some(role) = EdgeRole::from_predicate(&triple.predicate) else {
                continue;
            };
            if self.namespace.admits(&triple.subject) || self.namespace.admits(&triple.object) {
                graph.add_edge(&triple.subject, &triple.object, role);
            }
        }

        let anonymous: Vec<String> = graph
            .nodes()
            .filter(|node| self.is_anonymous(node))
            .map(str::to_string)
            .collect();
        for node in &anonymous {
            if graph
                .predecessors(node)
                .any(|(_, role)| role == EdgeRole::Label)
            {
                tracing::debug!(
                    label = node.as_str(),
                    "label matches the anonymous-node pattern and is dropped"
                );
            }
            graph.remove_node(node);
        }

        tracing::info!(
            triples = triples.len(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            anonymous_removed = anonymous.len(),
            "ontology graph built"
        );
        graph
    }
}

#[cfg(test)]
#[path = "graph_tests.rs"]
mod tests;

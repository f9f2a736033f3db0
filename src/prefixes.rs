//! Namespace prefix derivation for the schema header.
use crate::closure::ConceptRecord;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixEntry {
    pub code: String,
    pub base: String,
}

/// Derive one prefix per namespace segment seen in `records`.
///
/// Records are scanned in ascending IRI order and the first IRI seen for a
/// segment supplies its base, so the outcome does not depend on label order.
pub fn derive_prefixes(records: &[ConceptRecord]) -> Vec<PrefixEntry> {
    let mut iris: Vec<&str> = records.iter().map(|record| record.iri.as_str()).collect();
    iris.sort_unstable();

    let mut seen = BTreeSet::new();
    let mut entries = Vec::new();
    for iri in iris {
        let code = namespace_segment(iri);
        if seen.insert(code) {
            entries.push(PrefixEntry {
                code: code.to_string(),
                base: prefix_base(iri),
            });
        }
    }
    entries
}

/// Final path component up to the first `_`.
fn namespace_segment(iri: &str) -> &str {
    let last = iri.rsplit('/').next().unwrap_or(iri);
    last.split('_').next().unwrap_or(last)
}

/// Full IRI up to the first `_`, with the separator kept.
fn prefix_base(iri: &str) -> String {
    let head = iri.split('_').next().unwrap_or(iri);
    format!("{head}_")
}

/// Prefix codes accumulated over a whole run. The first base registered for
/// a code is kept; later collisions are ignored.
#[derive(Debug, Default, Clone)]
pub struct PrefixTable {
    entries: BTreeMap<String, String>,
}

impl PrefixTable {
    /// Fold `entries` into the table and return how many were new.
    pub fn merge(&mut self, entries: Vec<PrefixEntry>) -> usize {
        let mut accepted = 0;
        for entry in entries {
            if let Entry::Vacant(slot) = self.entries.entry(entry.code) {
                slot.insert(entry.base);
                accepted += 1;
            }
        }
        accepted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by code.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(code, base)| (code.as_str(), base.as_str()))
    }
}

#[cfg(test)]
#[path = "prefixes_tests.rs"]
mod tests;

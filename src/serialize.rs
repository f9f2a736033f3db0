//! Rendering of vocabularies into LinkML `permissible_values` blocks.
//!
//! Fragments are spliced verbatim into the schema template, so indentation is
//! fixed: entry keys sit at six spaces, their fields at eight and prefix
//! lines at two.
use crate::closure::ConceptRecord;
use crate::prefixes::PrefixTable;
use crate::tabular::TabularRecord;
use std::collections::BTreeSet;

const KEY_INDENT: &str = "      ";
const FIELD_INDENT: &str = "        ";
const PREFIX_INDENT: &str = "  ";

/// Rendered lines for one sentinel, each terminated by `\n`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumFragment {
    lines: Vec<String>,
    entries: usize,
}

impl EnumFragment {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of vocabulary entries (or prefixes) rendered.
    pub fn entries(&self) -> usize {
        self.entries
    }

    fn push_entry(&mut self, seen: &mut BTreeSet<String>, label: &str, meaning: &str) {
        let (quote, text) = quote_label(label);
        let key = format!("{KEY_INDENT}{quote}{text}{quote} :\n");
        if !seen.insert(key.clone()) {
            return;
        }
        self.lines.push(key);
        self.lines
            .push(format!("{FIELD_INDENT}text: {quote}{text}{quote}\n"));
        self.lines
            .push(format!("{FIELD_INDENT}meaning: \"{meaning}\"\n"));
        self.entries += 1;
    }
}

/// Pick the delimiter for a label and normalize its text.
///
/// A `"` in the label switches to single quotes, a `'` keeps double quotes,
/// and a label holding both loses its double quotes. Backslashes become `/`
/// whenever the result is double-quoted. Line breaks fold to a single space
/// so every entry stays on its own lines.
pub fn quote_label(label: &str) -> (char, String) {
    let folded = label.replace("\r\n", " ").replace(['\r', '\n'], " ");
    let label = folded.as_str();
    let has_double = label.contains('"');
    let has_single = label.contains('\'');
    match (has_double, has_single) {
        (true, false) => ('\'', label.to_string()),
        (true, true) => ('"', label.replace('"', "").replace('\\', "/")),
        (false, _) => ('"', label.replace('\\', "/")),
    }
}

/// Render ontology concepts; duplicate labels collapse to the first entry.
pub fn render_concepts(records: &[ConceptRecord]) -> EnumFragment {
    let mut fragment = EnumFragment::default();
    let mut seen = BTreeSet::new();
    for record in records {
        fragment.push_entry(&mut seen, &record.label, &record.id);
    }
    fragment
}

/// Render table rows with a combined `name, id` label.
pub fn render_tabular(records: &[TabularRecord]) -> EnumFragment {
    let mut fragment = EnumFragment::default();
    let mut seen = BTreeSet::new();
    for record in records {
        let label = format!("{}, {}", record.name(), record.id());
        fragment.push_entry(&mut seen, &label, record.id());
    }
    fragment
}

/// Render the prefix table as `  code: base` lines sorted by code.
pub fn render_prefixes(table: &PrefixTable) -> EnumFragment {
    let lines: Vec<String> = table
        .entries()
        .map(|(code, base)| format!("{PREFIX_INDENT}{code}: {base}\n"))
        .collect();
    EnumFragment {
        entries: lines.len(),
        lines,
    }
}

#[cfg(test)]
#[path = "serialize_tests.rs"]
mod tests;

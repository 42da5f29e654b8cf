//! Per-model link tables.

use indexmap::IndexMap;

/// Fields one source model supplies to a destination model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
    source: String,
    /// Synthesized field name -> source field name.
    fields: IndexMap<String, String>,
}

impl LinkEntry {
    #[must_use]
    pub fn new(source: impl Into<String>, fields: IndexMap<String, String>) -> Self {
        Self {
            source: source.into(),
            fields,
        }
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub const fn fields(&self) -> &IndexMap<String, String> {
        &self.fields
    }
}

/// Ordered link entries for one destination model. Built once when the
/// model is registered; read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkTable {
    entries: Vec<LinkEntry>,
}

impl LinkTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, entry: LinkEntry) {
        self.entries.push(entry);
    }

    #[must_use]
    pub fn entries(&self) -> &[LinkEntry] {
        &self.entries
    }

    /// Entries fed by `source`, in declaration order.
    pub fn for_source<'a>(&'a self, source: &'a str) -> impl Iterator<Item = &'a LinkEntry> {
        self.entries.iter().filter(move |e| e.source == source)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

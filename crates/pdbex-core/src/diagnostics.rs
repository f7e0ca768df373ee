//! Structured record of degraded output.
//!
//! Resolution never fails. When a record cannot be rendered faithfully the
//! resolver emits a placeholder and files a [`Diagnostic`] here, so callers
//! can report how much of a dump is approximate without scraping the text.

use std::collections::HashSet;
use std::fmt;

use crate::index::TypeIndex;
use crate::records::LeafKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind
{
    /// The index is not present in the type stream.
    UnresolvedIndex,
    /// The record exists but its kind has no C rendering.
    UnknownLeafKind(LeafKind),
    /// The record refers back to itself through modifiers or pointers.
    RecursiveType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Diagnostic
{
    pub index: TypeIndex,
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self.kind {
            DiagnosticKind::UnresolvedIndex => write!(f, "type {} not found in type stream", self.index),
            DiagnosticKind::UnknownLeafKind(kind) => write!(f, "type {} has unsupported kind {kind}", self.index),
            DiagnosticKind::RecursiveType => write!(f, "type {} refers to itself", self.index),
        }
    }
}

/// Deduplicated, insertion-ordered diagnostics.
#[derive(Debug, Default)]
pub struct Diagnostics
{
    seen: HashSet<Diagnostic>,
    entries: Vec<Diagnostic>,
}

impl Diagnostics
{
    /// Record a diagnostic; repeats of the same (index, kind) are dropped.
    pub fn report(&mut self, index: TypeIndex, kind: DiagnosticKind)
    {
        let diagnostic = Diagnostic { index, kind };
        if self.seen.insert(diagnostic) {
            tracing::debug!(%diagnostic, "rendering placeholder");
            self.entries.push(diagnostic);
        }
    }

    pub fn entries(&self) -> &[Diagnostic]
    {
        &self.entries
    }

    pub fn len(&self) -> usize
    {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.entries.is_empty()
    }
}

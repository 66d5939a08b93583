//! Error accumulation and reporting
//!
//! An [`ErrorReporter`] records `(key, message)` entries in strict insertion
//! order and renders them on demand as either a classified report (grouped
//! by key) or a simple one (the flat list). An optional transform, typically
//! an i18n lookup, is applied to every message at report time only, so it can
//! be swapped between two reports of the same reporter.
//!
//! # Examples
//!
//! ```rust,ignore
//! use formguard::reporter::ErrorReporter;
//!
//! let mut reporter = ErrorReporter::new();
//! reporter.error("email", "Invalid email");
//! reporter.error("password", "Password is required");
//! reporter.error("email", "Duplicated email");
//!
//! let classified = reporter.classified();
//! assert_eq!(classified["email"], ["Invalid email", "Duplicated email"]);
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Message transform applied at report time.
pub type Transform = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Messages grouped by key, in first-seen key order.
pub type ClassifiedReport = IndexMap<String, Vec<String>>;

// ============================================================================
// REPORT TYPES
// ============================================================================

/// One recorded error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportEntry {
    /// The key the error belongs to, usually a field id.
    pub key: String,
    /// The error message.
    pub message: String,
}

impl ReportEntry {
    /// Creates an entry.
    pub fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Shape of a rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportMode {
    /// Messages grouped by key.
    #[default]
    Classified,
    /// Flat insertion-ordered entries.
    Simple,
}

impl ReportMode {
    /// Parses `"classified"` or `"simple"`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "classified" => Some(Self::Classified),
            "simple" => Some(Self::Simple),
            _ => None,
        }
    }
}

/// A rendered report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Report {
    /// See [`ReportMode::Classified`].
    Classified(ClassifiedReport),
    /// See [`ReportMode::Simple`].
    Simple(Vec<ReportEntry>),
}

impl Report {
    /// Returns the grouped messages, if this is a classified report.
    #[must_use]
    pub fn as_classified(&self) -> Option<&ClassifiedReport> {
        match self {
            Self::Classified(report) => Some(report),
            Self::Simple(_) => None,
        }
    }

    /// Returns the flat entries, if this is a simple report.
    #[must_use]
    pub fn as_simple(&self) -> Option<&[ReportEntry]> {
        match self {
            Self::Simple(entries) => Some(entries),
            Self::Classified(_) => None,
        }
    }

    /// Returns true if the report holds no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Classified(report) => report.is_empty(),
            Self::Simple(entries) => entries.is_empty(),
        }
    }
}

// ============================================================================
// ERROR REPORTER
// ============================================================================

/// Insertion-ordered error accumulator.
#[derive(Clone, Default)]
pub struct ErrorReporter {
    entries: Vec<ReportEntry>,
    transform: Option<Transform>,
}

impl ErrorReporter {
    /// Creates an empty reporter without a transform.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty reporter that applies `transform` at report time.
    pub fn with_transform<F>(transform: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self {
            entries: Vec::new(),
            transform: Some(Arc::new(transform)),
        }
    }

    pub(crate) fn with_shared_transform(transform: Option<Transform>) -> Self {
        Self {
            entries: Vec::new(),
            transform,
        }
    }

    /// Replaces the transform. Affects every later report.
    pub fn set_transform<F>(&mut self, transform: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(transform));
    }

    /// Removes the transform.
    pub fn clear_transform(&mut self) {
        self.transform = None;
    }

    /// Records one error.
    pub fn error(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.entries.push(ReportEntry::new(key, message));
    }

    /// Appends every entry of `other` after this reporter's own.
    pub fn merge(&mut self, other: &ErrorReporter) {
        self.entries.extend_from_slice(&other.entries);
    }

    /// Returns true if at least one error was recorded.
    #[must_use]
    pub fn is_error_occurred(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Number of recorded errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The raw entries, untransformed.
    #[must_use]
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    /// Renders the recorded errors.
    #[must_use]
    pub fn report(&self, mode: ReportMode) -> Report {
        match mode {
            ReportMode::Classified => Report::Classified(self.classified()),
            ReportMode::Simple => Report::Simple(self.simple()),
        }
    }

    /// Renders by mode name. Unknown names yield `None`.
    #[must_use]
    pub fn report_named(&self, mode: &str) -> Option<Report> {
        ReportMode::from_name(mode).map(|mode| self.report(mode))
    }

    /// Messages grouped by key in first-seen key order.
    #[must_use]
    pub fn classified(&self) -> ClassifiedReport {
        let mut report = ClassifiedReport::new();
        for entry in &self.entries {
            report
                .entry(entry.key.clone())
                .or_default()
                .push(self.apply(&entry.message));
        }
        report
    }

    /// The flat insertion-ordered entries.
    #[must_use]
    pub fn simple(&self) -> Vec<ReportEntry> {
        self.entries
            .iter()
            .map(|entry| ReportEntry::new(entry.key.clone(), self.apply(&entry.message)))
            .collect()
    }

    fn apply(&self, message: &str) -> String {
        match &self.transform {
            Some(transform) => transform(message),
            None => message.to_owned(),
        }
    }
}

impl fmt::Debug for ErrorReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorReporter")
            .field("entries", &self.entries)
            .field("transform", &self.transform.as_ref().map(|_| "<function>"))
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================

//! Error types for building and running validations.
//!
//! Two families of errors exist:
//!
//! - [`DefinitionError`] is raised synchronously while a [`Field`](crate::Field)
//!   or [`FormDefinition`](crate::FormDefinition) is being built. It never
//!   surfaces from `validate()`.
//! - [`ValidateError`] aborts a running `validate()` call. A check that merely
//!   rejects its input is *not* an error; that outcome is reported as data in
//!   [`FieldOutcome`](crate::FieldOutcome) / [`FormOutcome`](crate::FormOutcome).

use crate::registry::CheckName;

/// Boxed error returned by caller-supplied specification checks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ============================================================================
// DEFINITION ERRORS
// ============================================================================

/// Errors raised while constructing field and form definitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum DefinitionError {
    /// The check name has no predicate in the registry.
    #[error("{name} is not a validation method")]
    UnknownCheck {
        /// The name that failed to resolve.
        name: CheckName,
    },

    /// A field id was registered twice on the same form.
    #[error("{id} is already defined")]
    DuplicateField {
        /// The duplicated field id.
        id: String,
    },

    /// A field id was looked up but never registered.
    #[error("{id} is not defined")]
    UndefinedField {
        /// The missing field id.
        id: String,
    },
}

impl DefinitionError {
    pub(crate) fn unknown_check(name: &CheckName) -> Self {
        Self::UnknownCheck { name: name.clone() }
    }

    pub(crate) fn duplicate_field(id: impl Into<String>) -> Self {
        Self::DuplicateField { id: id.into() }
    }

    pub(crate) fn undefined_field(id: impl Into<String>) -> Self {
        Self::UndefinedField { id: id.into() }
    }
}

// ============================================================================
// PREDICATE ERRORS
// ============================================================================

/// Errors raised by a registry predicate while it runs.
///
/// These are runtime failures of the predicate itself (bad arguments, broken
/// pattern), not a rejected input.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum PredicateError {
    /// A required positional argument was not supplied.
    #[error("missing argument #{index}")]
    MissingArgument {
        /// Zero-based position of the argument.
        index: usize,
    },

    /// A positional argument has the wrong shape.
    #[error("argument #{index} must be {expected}")]
    InvalidArgument {
        /// Zero-based position of the argument.
        index: usize,
        /// Human-readable description of the accepted shape.
        expected: &'static str,
    },

    /// A textual pattern argument failed to compile.
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

impl PredicateError {
    pub(crate) fn missing(index: usize) -> Self {
        Self::MissingArgument { index }
    }

    pub(crate) fn invalid(index: usize, expected: &'static str) -> Self {
        Self::InvalidArgument { index, expected }
    }
}

// ============================================================================
// VALIDATE ERRORS
// ============================================================================

/// Errors that abort a `validate()` call.
///
/// When one of these is returned no outcome or report exists for the call.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ValidateError {
    /// A typical check's predicate failed to run.
    #[error("check {check} failed to run: {source}")]
    Predicate {
        /// The check whose predicate failed.
        check: CheckName,
        /// The predicate failure.
        #[source]
        source: PredicateError,
    },

    /// A specification check returned an error of its own.
    #[error("specification failed: {source}")]
    Specification {
        /// The error reported by the specification.
        #[source]
        source: BoxError,
    },

    /// A field of a form aborted its validation.
    #[error("field {field}: {source}")]
    Field {
        /// Id of the field that aborted.
        field: String,
        /// The field's own error.
        #[source]
        source: Box<ValidateError>,
    },
}

impl ValidateError {
    /// Wraps this error with the id of the form field that produced it.
    #[must_use]
    pub fn in_field(self, field: impl Into<String>) -> Self {
        Self::Field {
            field: field.into(),
            source: Box::new(self),
        }
    }

    /// Returns the id of the form field that aborted, if any.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Field { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Returns the innermost error, skipping field wrappers.
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::Field { source, .. } => source.root(),
            other => other,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

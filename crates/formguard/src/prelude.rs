//! Prelude module for convenient imports.
//!
//! Provides a single `use formguard::prelude::*;` import that brings in the
//! builders, outcomes and check vocabulary needed to define and run
//! validations.
//!
//! # Examples
//!
//! ```rust,ignore
//! use formguard::prelude::*;
//!
//! let username = Field::builder()
//!     .typical(CheckName::IsLength, [4, 16])?
//!     .build();
//! let definition = FormDefinition::builder().field("username", username)?.build();
//! ```

// ============================================================================
// DEFINITIONS: Fields, forms and their builders
// ============================================================================

pub use crate::field::{Field, FieldBuilder, FieldOptions, FieldOutcome};
pub use crate::form::{Form, FormBuilder, FormDefinition, FormOptions, FormOutcome};

// ============================================================================
// CHECKS: Names, arguments and specifications
// ============================================================================

pub use crate::check::{SpecOutcome, Specification, specification_fn};
pub use crate::registry::{Arg, CheckName, Registry};

// ============================================================================
// REPORTING
// ============================================================================

pub use crate::reporter::{ErrorReporter, Report, ReportEntry, ReportMode};

// ============================================================================
// ERRORS AND INPUTS
// ============================================================================

pub use crate::error::{BoxError, DefinitionError, PredicateError, ValidateError};
pub use crate::input::{InputValue, Inputs};

//! # formguard
//!
//! Field and form validation with ordered checks and classified error
//! reports.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use formguard::prelude::*;
//! use regex::Regex;
//!
//! let definition = FormDefinition::builder()
//!     .field(
//!         "username",
//!         Field::builder()
//!             .typical(CheckName::Matches, [Regex::new("(?i)^[-_a-z0-9]+$")?])?
//!             .typical(CheckName::IsLength, [4, 16])?
//!             .build(),
//!     )?
//!     .field(
//!         "gender",
//!         Field::builder().typical(CheckName::IsIn, [["male", "female"]])?.build(),
//!     )?
//!     .build();
//!
//! let mut form = Form::new(definition);
//! form.input("username", "my-username@").input("gender", "man");
//!
//! let outcome = form.validate().await?;
//! assert_eq!(outcome.errors["username"], ["Not matched"]);
//! assert_eq!(outcome.errors["gender"], ["Unexpected value"]);
//! ```
//!
//! ## Checks
//!
//! - **Typical** checks are registry predicates addressed by [`CheckName`]
//!   and resolved when they are added, see [`registry`].
//! - **Specification** checks are caller-supplied async predicates, see
//!   [`check::Specification`].
//!
//! ## Reports
//!
//! [`Form::validate`] records every failure in an [`ErrorReporter`], which
//! renders either a classified report (messages grouped by field id) or a
//! simple one (the flat list), see [`reporter`].

pub mod check;
pub mod completion;
pub mod error;
pub mod field;
pub mod form;
pub mod input;
pub mod messages;
pub mod prelude;
pub mod registry;
pub mod reporter;

pub use check::{Check, SpecOutcome, Specification, specification_fn};
pub use error::{BoxError, DefinitionError, PredicateError, ValidateError};
pub use field::{Field, FieldBuilder, FieldOptions, FieldOutcome};
pub use form::{Form, FormBuilder, FormDefinition, FormOptions, FormOutcome};
pub use input::{InputValue, Inputs};
pub use messages::MessageTable;
pub use registry::{Arg, CheckName, Registry};
pub use reporter::{ErrorReporter, Report, ReportEntry, ReportMode};

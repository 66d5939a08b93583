//! Single-value validation
//!
//! A [`Field`] is an immutable, ordered list of checks plus two policies:
//!
//! - `pass_if_empty`: an input that coerces to `""` is valid without running
//!   any check.
//! - `should_check_all`: keep evaluating after the first failure instead of
//!   stopping there.
//!
//! Fields are assembled with [`FieldBuilder`]. Reuse works by derivation:
//! [`Field::derive`] returns a builder pre-loaded with the field's checks, and
//! [`FieldBuilder::extend`] appends the checks of other fields.
//!
//! # Examples
//!
//! ```rust,ignore
//! use formguard::{CheckName, Field};
//!
//! let email = Field::builder()
//!     .check_with_message(CheckName::IsEmail, "It is not a email")?
//!     .build();
//!
//! let strict = email
//!     .derive()
//!     .typical_with_message(CheckName::IsLength, [4, 8], "Not in range")?
//!     .should_check_all(true)
//!     .build();
//!
//! let outcome = strict.validate("a@a").await?;
//! assert_eq!(outcome.error_messages, ["It is not a email", "Not in range"]);
//! ```

use std::ops::ControlFlow;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::check::{Check, SpecificationCheck, Specification, TypicalCheck, Verdict};
use crate::completion;
use crate::error::{DefinitionError, ValidateError};
use crate::input::InputValue;
use crate::registry::{Arg, CheckName, Registry};

// ============================================================================
// OPTIONS
// ============================================================================

/// Evaluation policy of a [`Field`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldOptions {
    /// Treat an empty input as valid without running any check.
    pub pass_if_empty: bool,
    /// Keep evaluating after the first failing check.
    pub should_check_all: bool,
}

// ============================================================================
// OUTCOME
// ============================================================================

/// Result of validating one value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOutcome {
    /// True when no check failed.
    pub is_valid: bool,
    /// Messages of the failing checks, in check order. Duplicates are kept.
    pub error_messages: Vec<String>,
}

impl FieldOutcome {
    /// An outcome with no failures.
    #[must_use]
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error_messages: Vec::new(),
        }
    }

    /// Folds one verdict in. Breaks when evaluation should stop.
    fn absorb(&mut self, verdict: Verdict, should_check_all: bool) -> ControlFlow<()> {
        match verdict {
            Verdict::Pass => ControlFlow::Continue(()),
            Verdict::Fail(messages) => {
                self.is_valid = false;
                self.error_messages.extend(messages);
                if should_check_all {
                    ControlFlow::Continue(())
                } else {
                    ControlFlow::Break(())
                }
            }
        }
    }
}

// ============================================================================
// FIELD
// ============================================================================

/// An immutable validation definition for one value.
///
/// Safe to share across tasks and to validate concurrently; every call owns
/// its own accumulator.
#[derive(Debug, Clone)]
pub struct Field {
    checks: Vec<Check>,
    options: FieldOptions,
    registry: Arc<Registry>,
}

impl Default for Field {
    fn default() -> Self {
        Self {
            checks: Vec::new(),
            options: FieldOptions::default(),
            registry: Registry::shared(),
        }
    }
}

impl Field {
    /// Starts a field resolved against the shared standard registry.
    #[must_use]
    pub fn builder() -> FieldBuilder {
        FieldBuilder::new(Registry::shared())
    }

    /// Starts a field resolved against `registry`.
    #[must_use]
    pub fn builder_with_registry(registry: Arc<Registry>) -> FieldBuilder {
        FieldBuilder::new(registry)
    }

    /// Returns a builder pre-loaded with this field's checks, options and
    /// registry. New checks are appended after the inherited ones.
    #[must_use]
    pub fn derive(&self) -> FieldBuilder {
        FieldBuilder {
            checks: self.checks.clone(),
            options: self.options,
            registry: Arc::clone(&self.registry),
        }
    }

    /// The ordered checks.
    #[must_use]
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    #[must_use]
    pub fn options(&self) -> FieldOptions {
        self.options
    }

    /// The registry typical checks are resolved against.
    #[must_use]
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Validates one value.
    ///
    /// The input is coerced to a string first. A rejected input is reported
    /// in the returned [`FieldOutcome`]; an `Err` means a check failed to run
    /// and no outcome exists.
    #[tracing::instrument(name = "field.validate", skip_all, fields(
        checks = self.checks.len(),
        pass_if_empty = self.options.pass_if_empty,
        should_check_all = self.options.should_check_all,
    ))]
    pub async fn validate(
        &self,
        input: impl Into<InputValue>,
    ) -> Result<FieldOutcome, ValidateError> {
        let input = input.into().into_text();
        let mut outcome = FieldOutcome::valid();

        if self.options.pass_if_empty && input.is_empty() {
            tracing::trace!("empty input passes without checks");
            return Ok(outcome);
        }

        let fallback = self.registry.messages().fallback();
        for (index, check) in self.checks.iter().enumerate() {
            let verdict = check.run(&input, fallback).await.inspect_err(|error| {
                tracing::warn!(index, %error, "check aborted validation");
            })?;
            if outcome.absorb(verdict, self.options.should_check_all).is_break() {
                tracing::debug!(index, "stopped at first failure");
                break;
            }
        }

        Ok(outcome)
    }

    /// Validates one value and hands the result to `callback` before
    /// returning it.
    pub async fn validate_then<F>(
        &self,
        input: impl Into<InputValue>,
        callback: F,
    ) -> Result<FieldOutcome, ValidateError>
    where
        F: FnOnce(Result<&FieldOutcome, &ValidateError>),
    {
        completion::notify(self.validate(input).await, callback)
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Builder for [`Field`].
///
/// Typical checks are resolved as they are added, so an unknown check name
/// fails here rather than during validation.
#[derive(Debug, Clone)]
pub struct FieldBuilder {
    checks: Vec<Check>,
    options: FieldOptions,
    registry: Arc<Registry>,
}

impl FieldBuilder {
    fn new(registry: Arc<Registry>) -> Self {
        Self {
            checks: Vec::new(),
            options: FieldOptions::default(),
            registry,
        }
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn pass_if_empty(mut self, pass_if_empty: bool) -> Self {
        self.options.pass_if_empty = pass_if_empty;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn should_check_all(mut self, should_check_all: bool) -> Self {
        self.options.should_check_all = should_check_all;
        self
    }

    /// Replaces both policies at once.
    #[must_use = "builder methods must be chained or built"]
    pub fn options(mut self, options: FieldOptions) -> Self {
        self.options = options;
        self
    }

    /// Appends a typical check that takes no arguments.
    pub fn check(self, name: impl Into<CheckName>) -> Result<Self, DefinitionError> {
        self.push_typical(name.into(), Vec::new(), None)
    }

    /// Appends a typical check that takes no arguments, with an explicit
    /// message.
    pub fn check_with_message(
        self,
        name: impl Into<CheckName>,
        message: impl Into<String>,
    ) -> Result<Self, DefinitionError> {
        self.push_typical(name.into(), Vec::new(), Some(message.into()))
    }

    /// Appends a typical check with its registry default message.
    ///
    /// # Errors
    ///
    /// [`DefinitionError::UnknownCheck`] if `name` is not registered.
    pub fn typical<I>(self, name: impl Into<CheckName>, args: I) -> Result<Self, DefinitionError>
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        self.push_typical(name.into(), args.into_iter().map(Into::into).collect(), None)
    }

    /// Appends a typical check with an explicit message.
    ///
    /// # Errors
    ///
    /// [`DefinitionError::UnknownCheck`] if `name` is not registered.
    pub fn typical_with_message<I>(
        self,
        name: impl Into<CheckName>,
        args: I,
        message: impl Into<String>,
    ) -> Result<Self, DefinitionError>
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        self.push_typical(
            name.into(),
            args.into_iter().map(Into::into).collect(),
            Some(message.into()),
        )
    }

    /// Appends a specification check.
    #[must_use = "builder methods must be chained or built"]
    pub fn specification(mut self, specification: impl Specification + 'static) -> Self {
        self.checks.push(Check::Specification(SpecificationCheck::new(specification, None)));
        self
    }

    /// Appends a specification check with a build-time message.
    #[must_use = "builder methods must be chained or built"]
    pub fn specification_with_message(
        mut self,
        specification: impl Specification + 'static,
        message: impl Into<String>,
    ) -> Self {
        self.checks.push(Check::Specification(SpecificationCheck::new(
            specification,
            Some(message.into()),
        )));
        self
    }

    /// Appends every check of each field, in argument order.
    #[must_use = "builder methods must be chained or built"]
    pub fn extend<'a>(mut self, fields: impl IntoIterator<Item = &'a Field>) -> Self {
        for field in fields {
            self.checks.extend(field.checks.iter().cloned());
        }
        self
    }

    #[must_use]
    pub fn build(self) -> Field {
        Field {
            checks: self.checks,
            options: self.options,
            registry: self.registry,
        }
    }

    fn push_typical(
        mut self,
        name: CheckName,
        args: Vec<Arg>,
        message: Option<String>,
    ) -> Result<Self, DefinitionError> {
        let check = TypicalCheck::resolve(&self.registry, name, args, message)?;
        self.checks.push(Check::Typical(check));
        Ok(self)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{SpecOutcome, specification_fn};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn email_and_length() -> FieldBuilder {
        Field::builder()
            .check_with_message(CheckName::IsEmail, "It is not a email")
            .unwrap()
            .typical_with_message(CheckName::IsLength, [4, 8], "Not in range")
            .unwrap()
    }

    #[tokio::test]
    async fn stops_at_first_failure_by_default() {
        let field = email_and_length().build();
        let outcome = field.validate("a@a").await.unwrap();
        assert!(!outcome.is_valid);
        assert_eq!(outcome.error_messages, ["It is not a email"]);
    }

    #[tokio::test]
    async fn check_all_collects_every_failure() {
        let field = email_and_length().should_check_all(true).build();
        let outcome = field.validate("a@a").await.unwrap();
        assert_eq!(outcome.error_messages, ["It is not a email", "Not in range"]);

        let outcome = field.validate("a@b.io").await.unwrap();
        assert_eq!(outcome, FieldOutcome::valid());
    }

    #[tokio::test]
    async fn pass_if_empty_skips_every_check() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let field = Field::builder()
            .check(CheckName::IsRequired)
            .unwrap()
            .specification(specification_fn(move |_input| {
                counter.fetch_add(1, Ordering::SeqCst);
                async move { Ok(SpecOutcome::invalid()) }
            }))
            .pass_if_empty(true)
            .build();

        assert!(field.validate("").await.unwrap().is_valid);
        assert!(field.validate(None::<&str>).await.unwrap().is_valid);
        assert!(field.validate(0).await.unwrap().is_valid);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let outcome = field.validate("x").await.unwrap();
        assert!(!outcome.is_valid);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_input_runs_checks_without_pass_if_empty() {
        let field = Field::builder().check(CheckName::IsRequired).unwrap().build();
        let outcome = field.validate("").await.unwrap();
        assert_eq!(outcome.error_messages, ["Required"]);
    }

    #[test]
    fn unknown_check_fails_at_build_time() {
        let err = Field::builder().check("non_existent_type").unwrap_err();
        assert_eq!(err.to_string(), "non_existent_type is not a validation method");
    }

    #[tokio::test]
    async fn custom_registry() {
        let registry = Arc::new(
            Registry::empty().register_with_message(
                "isSlug",
                |input: &str, _: &[Arg]| {
                    Ok(input.chars().all(|c| c.is_ascii_lowercase() || c == '-'))
                },
                "Not a slug",
            ),
        );
        let field = Field::builder_with_registry(registry)
            .check("isSlug")
            .unwrap()
            .build();

        assert!(field.validate("hello-world").await.unwrap().is_valid);
        assert_eq!(
            field.validate("Hello").await.unwrap().error_messages,
            ["Not a slug"]
        );
        assert!(Field::builder_with_registry(field.registry().clone())
            .check(CheckName::IsEmail)
            .is_err());
    }

    #[tokio::test]
    async fn derive_appends_after_inherited_checks() {
        let base = Field::builder()
            .check_with_message(CheckName::IsEmail, "email")
            .unwrap()
            .build();
        let derived = base
            .derive()
            .typical_with_message(CheckName::IsLength, [100], "length")
            .unwrap()
            .should_check_all(true)
            .build();

        assert_eq!(base.len(), 1);
        assert_eq!(derived.len(), 2);
        assert_eq!(
            derived.validate("nope").await.unwrap().error_messages,
            ["email", "length"]
        );
    }

    #[tokio::test]
    async fn extend_copies_in_argument_order() {
        let a = Field::builder().check_with_message(CheckName::IsInvalid, "a").unwrap().build();
        let b = Field::builder().check_with_message(CheckName::IsInvalid, "b").unwrap().build();
        let field = Field::builder()
            .check_with_message(CheckName::IsInvalid, "own")
            .unwrap()
            .extend([&a, &b])
            .should_check_all(true)
            .build();

        let messages: Vec<_> = field.checks().iter().filter_map(Check::message).collect();
        assert_eq!(messages, ["own", "a", "b"]);
        assert_eq!(
            field.validate("x").await.unwrap().error_messages,
            ["own", "a", "b"]
        );
    }

    #[tokio::test]
    async fn runtime_error_aborts_both_surfaces() {
        let field = Field::builder()
            .specification_with_message(
                specification_fn(|input| async move {
                    if input == "error" {
                        Err("runtime error".into())
                    } else {
                        Ok(SpecOutcome::valid())
                    }
                }),
                "Invalid input",
            )
            .build();

        assert!(field.validate("error").await.is_err());

        let mut observed = None;
        let result = field
            .validate_then("error", |r| observed = Some(r.is_err()))
            .await;
        assert!(result.is_err());
        assert_eq!(observed, Some(true));
    }

    #[test]
    fn options_from_config() {
        let options: FieldOptions = serde_json::from_str(r#"{"passIfEmpty": true}"#).unwrap();
        assert_eq!(
            options,
            FieldOptions {
                pass_if_empty: true,
                should_check_all: false,
            }
        );
    }
}

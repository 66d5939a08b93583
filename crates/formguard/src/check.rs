//! Checks stored on a field
//!
//! A [`Check`] is either:
//!
//! - **typical**: a registry predicate addressed by [`CheckName`], run with
//!   positional [`Arg`]s. Its message is fixed when the check is built.
//! - **specification**: a caller-supplied, possibly asynchronous
//!   [`Specification`]. Its message is decided when it runs, from the
//!   [`SpecOutcome`] it returns.
//!
//! # Examples
//!
//! ```rust,ignore
//! use formguard::check::{SpecOutcome, specification_fn};
//!
//! let unique = specification_fn(|input| async move {
//!     let taken = lookup(&input).await?;
//!     Ok(if taken {
//!         SpecOutcome::invalid().with_message("Already taken")
//!     } else {
//!         SpecOutcome::valid()
//!     })
//! });
//! ```

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::error::{BoxError, DefinitionError, ValidateError};
use crate::registry::{Arg, CheckName, Predicate, Registry};

// ============================================================================
// SPECIFICATION CONTRACT
// ============================================================================

/// Result contract of a specification check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecOutcome {
    /// Whether the input passed.
    pub is_valid: bool,
    /// Single message to record on failure. Wins over `messages`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Messages to record on failure, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<String>,
}

impl SpecOutcome {
    /// A passing outcome.
    #[must_use]
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            message: None,
            messages: Vec::new(),
        }
    }

    /// A failing outcome that defers to the check's own message.
    #[must_use]
    pub fn invalid() -> Self {
        Self {
            is_valid: false,
            ..Self::valid()
        }
    }

    /// Sets the single failure message.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the list of failure messages.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_messages<I, S>(mut self, messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.messages = messages.into_iter().map(Into::into).collect();
        self
    }

    /// Messages to record for a failing outcome.
    ///
    /// Precedence: single message, then the message list, then
    /// `check_message`, then `fallback`.
    fn into_failure_messages(self, check_message: Option<&str>, fallback: &str) -> Vec<String> {
        if let Some(message) = self.message {
            vec![message]
        } else if !self.messages.is_empty() {
            self.messages
        } else {
            vec![check_message.unwrap_or(fallback).to_owned()]
        }
    }
}

impl From<bool> for SpecOutcome {
    fn from(is_valid: bool) -> Self {
        if is_valid { Self::valid() } else { Self::invalid() }
    }
}

/// A caller-supplied check that may suspend.
///
/// Closures of the shape `Fn(String) -> impl Future<Output = Result<SpecOutcome, BoxError>>`
/// implement this trait directly.
pub trait Specification: Send + Sync {
    /// Checks `input`.
    ///
    /// An `Err` aborts the enclosing `validate()` call.
    fn check<'a>(&'a self, input: &'a str) -> BoxFuture<'a, Result<SpecOutcome, BoxError>>;
}

impl<F, Fut> Specification for F
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<SpecOutcome, BoxError>> + Send + 'static,
{
    fn check<'a>(&'a self, input: &'a str) -> BoxFuture<'a, Result<SpecOutcome, BoxError>> {
        Box::pin(self(input.to_owned()))
    }
}

/// Pins an async closure's signature to the [`Specification`] contract.
///
/// Closures passed straight to a builder sometimes leave their error type
/// uninferred; routing them through this function fixes it to [`BoxError`].
pub fn specification_fn<F, Fut>(f: F) -> F
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<SpecOutcome, BoxError>> + Send + 'static,
{
    f
}

// ============================================================================
// CHECKS
// ============================================================================

/// What a single check concluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Verdict {
    Pass,
    Fail(Vec<String>),
}

/// A registry-backed check.
#[derive(Clone)]
pub struct TypicalCheck {
    name: CheckName,
    args: Vec<Arg>,
    message: String,
    predicate: Predicate,
}

impl TypicalCheck {
    /// Resolves `name` in `registry` and fixes the check's message.
    ///
    /// The message is `message` if given and non-empty, else the registry
    /// default for `name`, else the generic fallback.
    pub fn resolve(
        registry: &Registry,
        name: CheckName,
        args: Vec<Arg>,
        message: Option<String>,
    ) -> Result<Self, DefinitionError> {
        let predicate = registry.resolve(&name)?;
        let message = message
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| registry.messages().resolve(&name).to_owned());
        Ok(Self {
            name,
            args,
            message,
            predicate,
        })
    }

    /// The check's name.
    #[must_use]
    pub fn name(&self) -> &CheckName {
        &self.name
    }

    /// The positional arguments.
    #[must_use]
    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// The message recorded on failure.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    fn run(&self, input: &str) -> Result<Verdict, ValidateError> {
        let passed = (self.predicate)(input, &self.args).map_err(|source| ValidateError::Predicate {
            check: self.name.clone(),
            source,
        })?;
        Ok(if passed {
            Verdict::Pass
        } else {
            Verdict::Fail(vec![self.message.clone()])
        })
    }
}

impl fmt::Debug for TypicalCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypicalCheck")
            .field("name", &self.name)
            .field("args", &self.args)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// A caller-supplied check.
#[derive(Clone)]
pub struct SpecificationCheck {
    specification: Arc<dyn Specification>,
    message: Option<String>,
}

impl SpecificationCheck {
    /// Wraps `specification` with an optional build-time message.
    ///
    /// An empty message counts as no message.
    pub fn new(specification: impl Specification + 'static, message: Option<String>) -> Self {
        Self {
            specification: Arc::new(specification),
            message: message.filter(|message| !message.is_empty()),
        }
    }

    /// The build-time message, if one was given.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    async fn run(&self, input: &str, fallback: &str) -> Result<Verdict, ValidateError> {
        let outcome = self
            .specification
            .check(input)
            .await
            .map_err(|source| ValidateError::Specification { source })?;
        Ok(if outcome.is_valid {
            Verdict::Pass
        } else {
            Verdict::Fail(outcome.into_failure_messages(self.message(), fallback))
        })
    }
}

impl fmt::Debug for SpecificationCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecificationCheck")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// One entry of a field's ordered check list.
#[derive(Debug, Clone)]
pub enum Check {
    /// Registry-backed check.
    Typical(TypicalCheck),
    /// Caller-supplied check.
    Specification(SpecificationCheck),
}

impl Check {
    /// Returns true for registry-backed checks.
    #[must_use]
    pub fn is_typical(&self) -> bool {
        matches!(self, Self::Typical(_))
    }

    /// The message known before the check runs.
    ///
    /// For specification checks this is only the build-time message; the
    /// outcome may still override it.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Typical(check) => Some(check.message()),
            Self::Specification(check) => check.message(),
        }
    }

    pub(crate) async fn run(&self, input: &str, fallback: &str) -> Result<Verdict, ValidateError> {
        match self {
            Self::Typical(check) => check.run(input),
            Self::Specification(check) => check.run(input, fallback).await,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PredicateError;

    fn spec_for(outcome: SpecOutcome) -> impl Specification {
        specification_fn(move |_input| {
            let outcome = outcome.clone();
            async move { Ok(outcome) }
        })
    }

    #[test]
    fn typical_message_precedence() {
        let registry = Registry::standard();

        let explicit = TypicalCheck::resolve(
            &registry,
            CheckName::IsEmail,
            Vec::new(),
            Some("It is not a email".into()),
        )
        .unwrap();
        assert_eq!(explicit.message(), "It is not a email");

        let by_name =
            TypicalCheck::resolve(&registry, CheckName::IsEmail, Vec::new(), None).unwrap();
        assert_eq!(by_name.message(), "Not an email");

        let empty = TypicalCheck::resolve(
            &registry,
            CheckName::IsEmail,
            Vec::new(),
            Some(String::new()),
        )
        .unwrap();
        assert_eq!(empty.message(), "Not an email");

        let registry = registry.register("isSlug", |_: &str, _: &[Arg]| Ok(true));
        let fallback =
            TypicalCheck::resolve(&registry, CheckName::from("isSlug"), Vec::new(), None).unwrap();
        assert_eq!(fallback.message(), "Invalid value");
    }

    #[test]
    fn typical_resolve_unknown_name() {
        let err = TypicalCheck::resolve(
            &Registry::standard(),
            CheckName::from("non_existent_type"),
            Vec::new(),
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("non_existent_type"));
    }

    #[test]
    fn typical_run() {
        let check = TypicalCheck::resolve(
            &Registry::standard(),
            CheckName::IsLength,
            vec![Arg::from(4), Arg::from(8)],
            Some("Not in range".into()),
        )
        .unwrap();

        assert_eq!(check.run("aaaa").unwrap(), Verdict::Pass);
        assert_eq!(
            check.run("aaa").unwrap(),
            Verdict::Fail(vec!["Not in range".into()])
        );
    }

    #[test]
    fn typical_run_propagates_predicate_error() {
        let check = TypicalCheck::resolve(&Registry::standard(), CheckName::IsIn, Vec::new(), None)
            .unwrap();
        let err = check.run("x").unwrap_err();
        assert!(matches!(
            err,
            ValidateError::Predicate {
                check: CheckName::IsIn,
                source: PredicateError::MissingArgument { index: 0 },
            }
        ));
    }

    #[tokio::test]
    async fn specification_message_precedence() {
        let single = SpecificationCheck::new(
            spec_for(SpecOutcome::invalid().with_message("one").with_messages(["a", "b"])),
            Some("build".into()),
        );
        assert_eq!(
            single.run("x", "fallback").await.unwrap(),
            Verdict::Fail(vec!["one".into()])
        );

        let list = SpecificationCheck::new(
            spec_for(SpecOutcome::invalid().with_messages(["bad input", "bad input"])),
            Some("build".into()),
        );
        assert_eq!(
            list.run("x", "fallback").await.unwrap(),
            Verdict::Fail(vec!["bad input".into(), "bad input".into()])
        );

        let build = SpecificationCheck::new(spec_for(SpecOutcome::invalid()), Some("build".into()));
        assert_eq!(
            build.run("x", "fallback").await.unwrap(),
            Verdict::Fail(vec!["build".into()])
        );

        let fallback = SpecificationCheck::new(spec_for(SpecOutcome::invalid()), None);
        assert_eq!(
            fallback.run("x", "fallback").await.unwrap(),
            Verdict::Fail(vec!["fallback".into()])
        );

        let empty = SpecificationCheck::new(spec_for(SpecOutcome::invalid()), Some(String::new()));
        assert_eq!(empty.message(), None);
        assert_eq!(
            empty.run("x", "fallback").await.unwrap(),
            Verdict::Fail(vec!["fallback".into()])
        );
    }

    #[tokio::test]
    async fn specification_pass_ignores_messages() {
        let check = SpecificationCheck::new(
            spec_for(SpecOutcome::valid().with_message("ignored")),
            None,
        );
        assert_eq!(check.run("x", "fallback").await.unwrap(), Verdict::Pass);
    }

    #[tokio::test]
    async fn specification_error_aborts() {
        let check = SpecificationCheck::new(
            specification_fn(|_input| async move { Err("runtime error".into()) }),
            Some("Invalid input".into()),
        );
        let err = check.run("error", "fallback").await.unwrap_err();
        assert_eq!(err.to_string(), "specification failed: runtime error");
    }

    #[test]
    fn outcome_from_bool() {
        assert!(SpecOutcome::from(true).is_valid);
        assert!(!SpecOutcome::from(false).is_valid);
    }

    #[test]
    fn outcome_deserializes_from_json() {
        let outcome: SpecOutcome =
            serde_json::from_str(r#"{"isValid": false, "messages": ["bad input"]}"#).unwrap();
        assert_eq!(outcome, SpecOutcome::invalid().with_messages(["bad input"]));
    }
}

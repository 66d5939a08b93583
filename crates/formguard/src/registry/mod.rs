//! Predicate registry
//!
//! Typical checks are addressed by a [`CheckName`] and resolved against a
//! [`Registry`] when the check is added to a field. Resolution happens once,
//! at build time: an unknown name fails immediately with
//! [`DefinitionError::UnknownCheck`] instead of surfacing later from
//! `validate()`.
//!
//! # Examples
//!
//! ```rust,ignore
//! use formguard::registry::{Arg, CheckName, Registry};
//!
//! let registry = Registry::standard()
//!     .register("isSlug", |input: &str, _args: &[Arg]| {
//!         Ok(input.chars().all(|c| c.is_ascii_lowercase() || c == '-'))
//!     });
//!
//! assert!(registry.contains(&CheckName::from("isSlug")));
//! ```

mod predicates;

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{DefinitionError, PredicateError};
use crate::messages::MessageTable;

// ============================================================================
// CHECK NAMES
// ============================================================================

macro_rules! check_names {
    ($( $(#[$doc:meta])* $variant:ident => $name:literal, )*) => {
        /// Identifier of a typical check.
        ///
        /// Standard checks have their own variant; anything else is carried as
        /// [`CheckName::Custom`] and only resolves if it was registered.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[non_exhaustive]
        pub enum CheckName {
            $( $(#[$doc])* $variant, )*
            /// A caller-registered check.
            Custom(Cow<'static, str>),
        }

        impl CheckName {
            /// Every standard check, in declaration order.
            pub const STANDARD: &'static [CheckName] = &[$(CheckName::$variant,)*];

            /// Returns the conventional name of the check.
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $name,)*
                    Self::Custom(name) => name,
                }
            }

            fn standard(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(Self::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

check_names! {
    /// Email address.
    IsEmail => "isEmail",
    /// `http`/`https` URL.
    IsUrl => "isURL",
    /// Character count within `[min, max]`.
    IsLength => "isLength",
    /// Regular expression match.
    Matches => "matches",
    /// ASCII letters only.
    IsAlpha => "isAlpha",
    /// ASCII letters and digits only.
    IsAlphanumeric => "isAlphanumeric",
    /// Optionally signed decimal digits.
    IsNumeric => "isNumeric",
    /// No uppercase letters.
    IsLowercase => "isLowercase",
    /// No lowercase letters.
    IsUppercase => "isUppercase",
    /// Integer literal.
    IsInt => "isInt",
    /// Floating point literal.
    IsFloat => "isFloat",
    /// One of a list of allowed values.
    IsIn => "isIn",
    /// Contains a substring.
    Contains => "contains",
    /// Equals a value exactly.
    Equals => "equals",
    /// Number strictly greater than a threshold.
    IsGt => "isGT",
    /// Number greater than or equal to a threshold.
    IsGte => "isGTE",
    /// Number strictly less than a threshold.
    IsLt => "isLT",
    /// Number less than or equal to a threshold.
    IsLte => "isLTE",
    /// Always fails; its default message is the generic fallback.
    IsInvalid => "isInvalid",
    /// Non-empty.
    IsRequired => "isRequired",
    /// Integer greater than or equal to zero.
    IsPositiveInt => "isPositiveInt",
    /// Number greater than or equal to zero.
    IsPositiveNumber => "isPositiveNumber",
}

impl CheckName {
    /// Creates a name for a caller-registered check.
    ///
    /// Standard names map to their own variant, so `custom("isEmail")`
    /// equals [`CheckName::IsEmail`].
    pub fn custom(name: impl Into<Cow<'static, str>>) -> Self {
        let name = name.into();
        Self::standard(&name).unwrap_or(Self::Custom(name))
    }

    /// Returns true for one of the built-in names.
    #[must_use]
    pub fn is_standard(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }
}

impl fmt::Display for CheckName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for CheckName {
    fn from(name: &str) -> Self {
        Self::standard(name).unwrap_or_else(|| Self::Custom(Cow::Owned(name.to_owned())))
    }
}

impl From<String> for CheckName {
    fn from(name: String) -> Self {
        Self::custom(name)
    }
}

impl From<&CheckName> for CheckName {
    fn from(name: &CheckName) -> Self {
        name.clone()
    }
}

impl FromStr for CheckName {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl Serialize for CheckName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CheckName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::custom)
    }
}

// ============================================================================
// ARGUMENTS
// ============================================================================

/// Positional argument handed to a predicate after the input.
#[derive(Debug, Clone)]
pub enum Arg {
    /// Integer argument (lengths, thresholds).
    Int(i64),
    /// Floating point argument (thresholds).
    Float(f64),
    /// Text argument (substrings, textual patterns, numeric strings).
    Text(String),
    /// List of allowed values.
    List(Vec<String>),
    /// Compiled regular expression.
    Pattern(Regex),
}

impl Arg {
    /// Reads the argument as a number, parsing text if needed.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            Self::Text(s) => predicates::to_float(s),
            Self::List(_) | Self::Pattern(_) => None,
        }
    }

    /// Reads the argument as a non-negative count.
    #[must_use]
    pub fn as_usize(&self) -> Option<usize> {
        match self {
            Self::Int(n) => usize::try_from(*n).ok(),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Reads the argument as text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Reads the argument as a list of values.
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }
}

impl PartialEq for Arg {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Pattern(a), Self::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

macro_rules! arg_from_int {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Arg {
            fn from(value: $ty) -> Self {
                Self::Int(i64::from(value))
            }
        })*
    };
}

arg_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<usize> for Arg {
    fn from(value: usize) -> Self {
        i64::try_from(value).map_or(Self::Float(value as f64), Self::Int)
    }
}

impl From<f32> for Arg {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Regex> for Arg {
    fn from(value: Regex) -> Self {
        Self::Pattern(value)
    }
}

impl From<Vec<String>> for Arg {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

impl From<Vec<&str>> for Arg {
    fn from(values: Vec<&str>) -> Self {
        Self::List(values.into_iter().map(str::to_owned).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Arg {
    fn from(values: [&str; N]) -> Self {
        Self::List(values.into_iter().map(str::to_owned).collect())
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Shared handle to a synchronous predicate.
///
/// Returns `Ok(true)` when the input passes, `Ok(false)` when it is rejected,
/// and `Err` when the predicate itself cannot run.
pub type Predicate = Arc<dyn Fn(&str, &[Arg]) -> Result<bool, PredicateError> + Send + Sync>;

static SHARED: LazyLock<Arc<Registry>> = LazyLock::new(|| Arc::new(Registry::standard()));

/// Name to predicate mapping plus the default-message table.
#[derive(Clone)]
pub struct Registry {
    predicates: HashMap<CheckName, Predicate>,
    messages: MessageTable,
}

impl Registry {
    /// Creates a registry without predicates, using the standard messages.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            predicates: HashMap::new(),
            messages: MessageTable::standard(),
        }
    }

    /// Creates a registry holding every standard predicate.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            predicates: predicates::standard().into_iter().collect(),
            messages: MessageTable::standard(),
        }
    }

    /// Returns the process-wide standard registry.
    ///
    /// Fields built without an explicit registry use this one.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::clone(&SHARED)
    }

    /// Registers (or replaces) the predicate for `name`.
    #[must_use = "builder methods must be chained or built"]
    pub fn register<F>(mut self, name: impl Into<CheckName>, predicate: F) -> Self
    where
        F: Fn(&str, &[Arg]) -> Result<bool, PredicateError> + Send + Sync + 'static,
    {
        self.predicates.insert(name.into(), Arc::new(predicate));
        self
    }

    /// Registers a predicate together with its default message.
    #[must_use = "builder methods must be chained or built"]
    pub fn register_with_message<F>(
        mut self,
        name: impl Into<CheckName>,
        predicate: F,
        message: impl Into<Cow<'static, str>>,
    ) -> Self
    where
        F: Fn(&str, &[Arg]) -> Result<bool, PredicateError> + Send + Sync + 'static,
    {
        let name = name.into();
        self.messages.set(name.clone(), message);
        self.predicates.insert(name, Arc::new(predicate));
        self
    }

    /// Replaces the default-message table.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_messages(mut self, messages: MessageTable) -> Self {
        self.messages = messages;
        self
    }

    /// Returns the default-message table.
    #[must_use]
    pub fn messages(&self) -> &MessageTable {
        &self.messages
    }

    /// Returns true if a predicate is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &CheckName) -> bool {
        self.predicates.contains_key(name)
    }

    /// Looks up the predicate for `name`.
    pub fn resolve(&self, name: &CheckName) -> Result<Predicate, DefinitionError> {
        self.predicates
            .get(name)
            .cloned()
            .ok_or_else(|| DefinitionError::unknown_check(name))
    }

    /// Iterates over the registered names in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &CheckName> {
        self.predicates.keys()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.predicates.keys().map(CheckName::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Registry")
            .field("predicates", &names)
            .field("messages", &self.messages)
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_strings() {
        for name in CheckName::STANDARD {
            assert_eq!(&CheckName::from(name.as_str()), name);
        }
        assert_eq!(CheckName::from("isURL"), CheckName::IsUrl);
        assert_eq!(CheckName::from("isGTE"), CheckName::IsGte);
    }

    #[test]
    fn unknown_names_become_custom() {
        let name = CheckName::from("isSlug");
        assert_eq!(name, CheckName::Custom(Cow::Borrowed("isSlug")));
        assert!(!name.is_standard());
        assert_eq!(CheckName::custom("isEmail"), CheckName::IsEmail);
    }

    #[test]
    fn standard_registry_knows_every_standard_name() {
        let registry = Registry::standard();
        for name in CheckName::STANDARD {
            assert!(registry.contains(name), "{name} missing");
        }
    }

    #[test]
    fn resolve_unknown_fails() {
        let err = Registry::standard()
            .resolve(&CheckName::from("non_existent_type"))
            .err();
        assert_eq!(
            err,
            Some(DefinitionError::UnknownCheck {
                name: CheckName::from("non_existent_type"),
            })
        );
    }

    #[test]
    fn empty_registry_resolves_nothing() {
        assert!(Registry::empty().resolve(&CheckName::IsEmail).is_err());
    }

    #[test]
    fn register_custom_predicate() {
        let registry = Registry::empty().register("isSlug", |input: &str, _args: &[Arg]| {
            Ok(input.chars().all(|c| c.is_ascii_lowercase() || c == '-'))
        });

        let predicate = registry.resolve(&CheckName::from("isSlug")).unwrap();
        assert!(predicate("my-slug", &[]).unwrap());
        assert!(!predicate("My Slug", &[]).unwrap());
    }

    #[test]
    fn register_with_message_sets_default() {
        let registry = Registry::empty().register_with_message(
            "isSlug",
            |_: &str, _: &[Arg]| Ok(true),
            "Not a slug",
        );
        assert_eq!(registry.messages().resolve(&CheckName::from("isSlug")), "Not a slug");
    }

    #[test]
    fn arg_conversions() {
        assert_eq!(Arg::from(8).as_usize(), Some(8));
        assert_eq!(Arg::from(-1).as_usize(), None);
        assert_eq!(Arg::from("1.5").as_f64(), Some(1.5));
        assert_eq!(Arg::from(["male", "female"]).as_list().map(<[String]>::len), Some(2));
        assert_eq!(Arg::from("abc").as_text(), Some("abc"));
    }

    #[test]
    fn names_serialize_as_strings() {
        let json = serde_json::to_string(&CheckName::IsLength).unwrap();
        assert_eq!(json, "\"isLength\"");
        let back: CheckName = serde_json::from_str("\"matches\"").unwrap();
        assert_eq!(back, CheckName::Matches);
    }
}

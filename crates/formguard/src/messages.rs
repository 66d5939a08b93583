//! Default error messages
//!
//! A [`MessageTable`] maps check names to the message recorded when that
//! check rejects an input and no explicit message was given. The entry under
//! [`CheckName::IsInvalid`] doubles as the generic fallback used when a name
//! has no entry of its own.
//!
//! Tables serialize as a flat JSON object keyed by check name, so they can
//! live in configuration:
//!
//! ```json
//! { "isInvalid": "Invalid value", "isEmail": "Not an email" }
//! ```

use std::borrow::Cow;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::registry::CheckName;

/// Message used when a table has no fallback entry.
pub const DEFAULT_FALLBACK: &str = "Invalid value";

const STANDARD_MESSAGES: &[(CheckName, &str)] = &[
    (CheckName::IsInvalid, DEFAULT_FALLBACK),
    (CheckName::IsEmail, "Not an email"),
    (CheckName::IsUrl, "Not a URL"),
    (CheckName::IsLength, "String is not in range"),
    (CheckName::Matches, "Not matched"),
    (CheckName::IsAlpha, "Contains non-alphabetic characters"),
    (CheckName::IsAlphanumeric, "Contains non-alphanumeric characters"),
    (CheckName::IsNumeric, "Not numeric"),
    (CheckName::IsLowercase, "Not lowercase"),
    (CheckName::IsUppercase, "Not uppercase"),
    (CheckName::IsInt, "Not an integer"),
    (CheckName::IsFloat, "Not a number"),
    (CheckName::IsIn, "Unexpected value"),
    (CheckName::Contains, "Does not contain the expected text"),
    (CheckName::Equals, "Does not match the expected value"),
    (CheckName::IsGt, "Too small"),
    (CheckName::IsGte, "Too small"),
    (CheckName::IsLt, "Too large"),
    (CheckName::IsLte, "Too large"),
    (CheckName::IsRequired, "Required"),
    (CheckName::IsPositiveInt, "Not a positive integer"),
    (CheckName::IsPositiveNumber, "Not a positive number"),
];

/// Check name to default message mapping.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageTable {
    messages: IndexMap<CheckName, Cow<'static, str>>,
}

impl MessageTable {
    /// Creates an empty table. Its fallback is [`DEFAULT_FALLBACK`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the table of standard messages.
    #[must_use]
    pub fn standard() -> Self {
        STANDARD_MESSAGES
            .iter()
            .map(|(name, message)| (name.clone(), Cow::Borrowed(*message)))
            .collect()
    }

    /// Parses a table from a JSON object.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Sets the default message for `name`.
    pub fn set(&mut self, name: impl Into<CheckName>, message: impl Into<Cow<'static, str>>) {
        self.messages.insert(name.into(), message.into());
    }

    /// Builder form of [`set`](Self::set).
    #[must_use = "builder methods must be chained or built"]
    pub fn with(
        mut self,
        name: impl Into<CheckName>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.set(name, message);
        self
    }

    /// Sets the generic fallback message.
    pub fn set_fallback(&mut self, message: impl Into<Cow<'static, str>>) {
        self.set(CheckName::IsInvalid, message);
    }

    /// Overlays every entry of `other` onto this table.
    #[must_use = "builder methods must be chained or built"]
    pub fn merged(mut self, other: MessageTable) -> Self {
        self.messages.extend(other.messages);
        self
    }

    /// Returns the message registered for `name`, if any.
    #[must_use]
    pub fn get(&self, name: &CheckName) -> Option<&str> {
        self.messages.get(name).map(AsRef::as_ref)
    }

    /// Returns the generic fallback message.
    #[must_use]
    pub fn fallback(&self) -> &str {
        self.get(&CheckName::IsInvalid).unwrap_or(DEFAULT_FALLBACK)
    }

    /// Returns the message for `name`, or the fallback.
    #[must_use]
    pub fn resolve(&self, name: &CheckName) -> &str {
        self.get(name).unwrap_or_else(|| self.fallback())
    }

    /// Number of entries, fallback included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns true if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl FromIterator<(CheckName, Cow<'static, str>)> for MessageTable {
    fn from_iter<I: IntoIterator<Item = (CheckName, Cow<'static, str>)>>(iter: I) -> Self {
        Self {
            messages: iter.into_iter().collect(),
        }
    }
}

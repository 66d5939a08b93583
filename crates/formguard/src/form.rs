//! Multi-field validation
//!
//! A [`FormDefinition`] maps field ids to shared [`Field`]s in registration
//! order. A [`Form`] pairs a definition with a mutable set of inputs and
//! validates them field by field, recording every failure message in a fresh
//! [`ErrorReporter`] under the field's id.
//!
//! # Examples
//!
//! ```rust,ignore
//! use formguard::{CheckName, Field, Form, FormDefinition};
//!
//! let definition = FormDefinition::builder()
//!     .field("gender", Field::builder().typical(CheckName::IsIn, [["male", "female"]])?.build())?
//!     .build();
//!
//! let mut form = Form::new(definition);
//! form.input("gender", "man");
//!
//! let outcome = form.validate().await?;
//! assert_eq!(outcome.errors["gender"], ["Unexpected value"]);
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::completion;
use crate::error::{DefinitionError, ValidateError};
use crate::field::Field;
use crate::input::{InputValue, Inputs};
use crate::reporter::{ClassifiedReport, ErrorReporter, Report, ReportMode, Transform};

// ============================================================================
// OPTIONS
// ============================================================================

/// Evaluation policy of a [`FormDefinition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormOptions {
    /// Validate fields whose input is absent, as if it were empty.
    ///
    /// When false, fields with no input are skipped entirely.
    pub should_check_all: bool,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            should_check_all: true,
        }
    }
}

// ============================================================================
// OUTCOME
// ============================================================================

/// Result of validating a form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormOutcome {
    /// True when no field recorded an error.
    pub is_valid: bool,
    /// Messages grouped by field id, in field order.
    pub errors: ClassifiedReport,
    /// The reporter the messages were recorded in.
    #[serde(skip)]
    pub reporter: ErrorReporter,
}

impl FormOutcome {
    fn from_reporter(reporter: ErrorReporter) -> Self {
        Self {
            is_valid: !reporter.is_error_occurred(),
            errors: reporter.classified(),
            reporter,
        }
    }

    /// Re-renders the recorded errors in another shape.
    #[must_use]
    pub fn report(&self, mode: ReportMode) -> Report {
        self.reporter.report(mode)
    }
}

// ============================================================================
// DEFINITION
// ============================================================================

/// An immutable, ordered mapping from field id to [`Field`].
#[derive(Clone, Default)]
pub struct FormDefinition {
    fields: IndexMap<String, Arc<Field>>,
    options: FormOptions,
    transform: Option<Transform>,
}

impl FormDefinition {
    #[must_use]
    pub fn builder() -> FormBuilder {
        FormBuilder::default()
    }

    /// Returns a builder pre-loaded with this definition's fields, options
    /// and transform.
    #[must_use]
    pub fn derive(&self) -> FormBuilder {
        FormBuilder {
            fields: self.fields.clone(),
            options: self.options,
            transform: self.transform.clone(),
        }
    }

    /// Looks up a field by id.
    #[must_use]
    pub fn get_field(&self, id: &str) -> Option<&Field> {
        self.fields.get(id).map(Arc::as_ref)
    }

    /// Looks up a field by id.
    ///
    /// # Errors
    ///
    /// [`DefinitionError::UndefinedField`] if no field has that id.
    pub fn get_field_or_error(&self, id: &str) -> Result<&Field, DefinitionError> {
        self.get_field(id).ok_or_else(|| DefinitionError::undefined_field(id))
    }

    /// Field ids in registration order.
    pub fn field_ids(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    #[must_use]
    pub fn options(&self) -> FormOptions {
        self.options
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validates `inputs` against every field, in registration order.
    ///
    /// An input missing from `inputs` is validated as empty, or skipped when
    /// [`FormOptions::should_check_all`] is false. The first field that fails
    /// to run aborts the whole call.
    #[tracing::instrument(name = "form.validate", skip_all, fields(
        fields = self.fields.len(),
        inputs = inputs.len(),
        should_check_all = self.options.should_check_all,
    ))]
    pub async fn validate(&self, inputs: &Inputs) -> Result<FormOutcome, ValidateError> {
        let mut reporter = ErrorReporter::with_shared_transform(self.transform.clone());

        for (id, field) in &self.fields {
            let value = match inputs.get(id) {
                Some(value) => value.clone(),
                None if !self.options.should_check_all => {
                    tracing::trace!(field = %id, "no input, skipped");
                    continue;
                }
                None => InputValue::Null,
            };

            let outcome = field.validate(value).await.map_err(|error| error.in_field(id))?;
            if !outcome.is_valid {
                tracing::debug!(
                    field = %id,
                    errors = outcome.error_messages.len(),
                    "field rejected input"
                );
            }
            for message in outcome.error_messages {
                reporter.error(id.clone(), message);
            }
        }

        Ok(FormOutcome::from_reporter(reporter))
    }
}

impl fmt::Debug for FormDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormDefinition")
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .field("options", &self.options)
            .field("transform", &self.transform.as_ref().map(|_| "<function>"))
            .finish()
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Builder for [`FormDefinition`].
#[derive(Clone, Default)]
pub struct FormBuilder {
    fields: IndexMap<String, Arc<Field>>,
    options: FormOptions,
    transform: Option<Transform>,
}

impl FormBuilder {
    /// Registers a field under `id`.
    ///
    /// # Errors
    ///
    /// [`DefinitionError::DuplicateField`] if `id` is already registered.
    pub fn field(
        mut self,
        id: impl Into<String>,
        field: impl Into<Arc<Field>>,
    ) -> Result<Self, DefinitionError> {
        let id = id.into();
        if self.fields.contains_key(&id) {
            return Err(DefinitionError::duplicate_field(id));
        }
        self.fields.insert(id, field.into());
        Ok(self)
    }

    /// Registers every field of `definition`, in its order.
    ///
    /// # Errors
    ///
    /// [`DefinitionError::DuplicateField`] on the first id already registered.
    pub fn extend(self, definition: &FormDefinition) -> Result<Self, DefinitionError> {
        definition
            .fields
            .iter()
            .try_fold(self, |builder, (id, field)| builder.field(id.clone(), Arc::clone(field)))
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn should_check_all(mut self, should_check_all: bool) -> Self {
        self.options.should_check_all = should_check_all;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn options(mut self, options: FormOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the transform applied to every message when a report is rendered.
    #[must_use = "builder methods must be chained or built"]
    pub fn transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(transform));
        self
    }

    #[must_use]
    pub fn build(self) -> FormDefinition {
        FormDefinition {
            fields: self.fields,
            options: self.options,
            transform: self.transform,
        }
    }
}

impl fmt::Debug for FormBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormBuilder")
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// FORM
// ============================================================================

/// A definition plus the inputs to validate against it.
#[derive(Debug, Clone)]
pub struct Form {
    definition: Arc<FormDefinition>,
    inputs: Inputs,
}

impl Form {
    /// Creates a form with no inputs.
    pub fn new(definition: impl Into<Arc<FormDefinition>>) -> Self {
        Self {
            definition: definition.into(),
            inputs: Inputs::new(),
        }
    }

    /// Creates a form pre-filled with `inputs`.
    pub fn with_inputs<I, K, V>(definition: impl Into<Arc<FormDefinition>>, inputs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<InputValue>,
    {
        let mut form = Self::new(definition);
        form.inputs(inputs);
        form
    }

    #[must_use]
    pub fn definition(&self) -> &Arc<FormDefinition> {
        &self.definition
    }

    /// Sets one input, replacing any previous value.
    pub fn input(&mut self, id: impl Into<String>, value: impl Into<InputValue>) -> &mut Self {
        self.inputs.insert(id.into(), value.into());
        self
    }

    /// Merges `inputs` into the current ones. Later writes win.
    pub fn inputs<I, K, V>(&mut self, inputs: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<InputValue>,
    {
        self.inputs
            .extend(inputs.into_iter().map(|(id, value)| (id.into(), value.into())));
        self
    }

    /// Merges the members of a JSON object into the current inputs.
    pub fn inputs_from_json(
        &mut self,
        object: serde_json::Map<String, serde_json::Value>,
    ) -> &mut Self {
        self.inputs(object)
    }

    /// Clears every input.
    pub fn reset_inputs(&mut self) -> &mut Self {
        self.inputs.clear();
        self
    }

    /// The current inputs.
    #[must_use]
    pub fn input_values(&self) -> &Inputs {
        &self.inputs
    }

    #[must_use]
    pub fn get_field(&self, id: &str) -> Option<&Field> {
        self.definition.get_field(id)
    }

    /// See [`FormDefinition::get_field_or_error`].
    pub fn get_field_or_error(&self, id: &str) -> Result<&Field, DefinitionError> {
        self.definition.get_field_or_error(id)
    }

    /// Validates the current inputs. See [`FormDefinition::validate`].
    pub async fn validate(&self) -> Result<FormOutcome, ValidateError> {
        self.definition.validate(&self.inputs).await
    }

    /// Validates the current inputs and hands the result to `callback`
    /// before returning it.
    pub async fn validate_then<F>(&self, callback: F) -> Result<FormOutcome, ValidateError>
    where
        F: FnOnce(Result<&FormOutcome, &ValidateError>),
    {
        completion::notify(self.validate().await, callback)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::CheckName;
    use pretty_assertions::assert_eq;

    fn required() -> Field {
        Field::builder().check(CheckName::IsRequired).unwrap().build()
    }

    #[test]
    fn duplicate_field_rejected() {
        let err = FormDefinition::builder()
            .field("name", required())
            .unwrap()
            .field("name", required())
            .unwrap_err();
        assert_eq!(err.to_string(), "name is already defined");
    }

    #[test]
    fn undefined_field_lookup() {
        let definition = FormDefinition::builder().field("name", required()).unwrap().build();
        assert!(definition.get_field("name").is_some());
        assert!(definition.get_field("age").is_none());
        assert_eq!(
            definition.get_field_or_error("age").unwrap_err(),
            DefinitionError::UndefinedField { id: "age".into() }
        );
    }

    #[test]
    fn extend_and_derive_keep_order() {
        let base = FormDefinition::builder()
            .field("a", required())
            .unwrap()
            .field("b", required())
            .unwrap()
            .build();
        let extended = FormDefinition::builder()
            .field("z", required())
            .unwrap()
            .extend(&base)
            .unwrap()
            .build();
        assert_eq!(extended.field_ids().collect::<Vec<_>>(), ["z", "a", "b"]);

        let derived = base.derive().field("c", required()).unwrap().build();
        assert_eq!(derived.field_ids().collect::<Vec<_>>(), ["a", "b", "c"]);
        assert_eq!(base.len(), 2);

        assert!(base.derive().extend(&base).is_err());
    }

    #[tokio::test]
    async fn absent_input_validated_as_empty_by_default() {
        let definition = FormDefinition::builder().field("name", required()).unwrap().build();
        let outcome = Form::new(definition).validate().await.unwrap();
        assert!(!outcome.is_valid);
        assert_eq!(outcome.errors["name"], ["Required"]);
    }

    #[tokio::test]
    async fn absent_input_skipped_without_check_all() {
        let definition = FormDefinition::builder()
            .field("name", required())
            .unwrap()
            .should_check_all(false)
            .build();
        let outcome = Form::new(definition).validate().await.unwrap();
        assert!(outcome.is_valid);
        assert!(outcome.errors.is_empty());
    }

    #[tokio::test]
    async fn inputs_overwrite_and_reset() {
        let definition = FormDefinition::builder().field("name", required()).unwrap().build();
        let mut form = Form::with_inputs(definition, [("name", "")]);
        form.input("name", "alice");
        assert!(form.validate().await.unwrap().is_valid);

        form.reset_inputs();
        assert!(form.input_values().is_empty());
        assert!(!form.validate().await.unwrap().is_valid);
    }

    #[tokio::test]
    async fn json_inputs_are_coerced() {
        let definition = FormDefinition::builder()
            .field("age", Field::builder().typical(CheckName::IsGte, [18]).unwrap().build())
            .unwrap()
            .build();
        let mut form = Form::new(definition);
        let serde_json::Value::Object(object) = serde_json::json!({ "age": 30 }) else {
            unreachable!()
        };
        form.inputs_from_json(object);
        assert!(form.validate().await.unwrap().is_valid);
    }

    #[tokio::test]
    async fn transform_reaches_outcome() {
        let definition = FormDefinition::builder()
            .field("name", required())
            .unwrap()
            .transform(|message| format!("t({message})"))
            .build();
        let outcome = Form::new(definition).validate().await.unwrap();
        assert_eq!(outcome.errors["name"], ["t(Required)"]);
        assert_eq!(outcome.reporter.entries()[0].message, "Required");
    }

    #[test]
    fn options_default_checks_all() {
        assert!(FormOptions::default().should_check_all);
        let options: FormOptions = serde_json::from_str("{}").unwrap();
        assert!(options.should_check_all);
    }

    #[tokio::test]
    async fn outcome_serializes_without_reporter() {
        let definition = FormDefinition::builder().field("name", required()).unwrap().build();
        let outcome = Form::new(definition).validate().await.unwrap();
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            serde_json::json!({ "isValid": false, "errors": { "name": ["Required"] } })
        );
    }
}

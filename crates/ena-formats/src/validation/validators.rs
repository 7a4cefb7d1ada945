//! Required-attribute validators shared by the sample and study formats.

use crate::error::{EnaError, Result};
use crate::input::{SampleTable, StudyRecord};

/// Cell texts that stand for a null value. Matched exactly, after trimming.
pub const NULL_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Whether a value counts as present.
///
/// A value is missing when the attribute is absent, when it is a null cell,
/// when it is empty after trimming whitespace, or when it is a null marker.
pub fn is_present(value: Option<&str>) -> bool {
    value
        .map(str::trim)
        .is_some_and(|v| !v.is_empty() && !NULL_MARKERS.contains(&v))
}

/// Anything that exposes named attributes to the validators.
pub trait AttributeSource {
    /// Whether the attribute exists as a column or key.
    fn has_attribute(&self, name: &str) -> bool;

    /// Whether every value of the attribute is present.
    ///
    /// Only meaningful for attributes that exist; callers check
    /// [`AttributeSource::has_attribute`] first.
    fn all_values_present(&self, name: &str) -> bool;
}

impl AttributeSource for SampleTable {
    fn has_attribute(&self, name: &str) -> bool {
        self.has_column(name)
    }

    fn all_values_present(&self, name: &str) -> bool {
        self.rows.iter().all(|row| is_present(row.get(name)))
    }
}

impl AttributeSource for StudyRecord {
    fn has_attribute(&self, name: &str) -> bool {
        self.contains(name)
    }

    fn all_values_present(&self, name: &str) -> bool {
        is_present(self.get(name))
    }
}

/// Trait for validators.
pub trait Validator<S: ?Sized> {
    /// Run validation; the error message names every offending attribute.
    fn validate(&self, source: &S) -> Result<()>;
}

fn failure(prefix: &str, names: &[&str]) -> EnaError {
    EnaError::Validation(format!("{}{}.", prefix, names.join(",")))
}

/// Checks that every required attribute exists as a column or key.
#[derive(Debug, Clone)]
pub struct FieldPresenceValidator {
    required: &'static [&'static str],
    message: &'static str,
}

impl FieldPresenceValidator {
    /// `message` is the prefix placed before the comma-joined names.
    pub fn new(required: &'static [&'static str], message: &'static str) -> Self {
        Self { required, message }
    }

    /// Required attributes absent from the source, in required order.
    pub fn missing<S: AttributeSource + ?Sized>(&self, source: &S) -> Vec<&'static str> {
        self.required
            .iter()
            .copied()
            .filter(|name| !source.has_attribute(name))
            .collect()
    }
}

impl<S: AttributeSource + ?Sized> Validator<S> for FieldPresenceValidator {
    fn validate(&self, source: &S) -> Result<()> {
        let missing = self.missing(source);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(failure(self.message, &missing))
        }
    }
}

/// Checks that every existing required attribute has present values.
///
/// For a table this is per column across all rows: the column is reported,
/// never the row.
#[derive(Debug, Clone)]
pub struct ValuePresenceValidator {
    required: &'static [&'static str],
    message: &'static str,
}

impl ValuePresenceValidator {
    /// `message` is the prefix placed before the comma-joined names.
    pub fn new(required: &'static [&'static str], message: &'static str) -> Self {
        Self { required, message }
    }

    /// Required attributes with at least one missing value, in required order.
    pub fn blank<S: AttributeSource + ?Sized>(&self, source: &S) -> Vec<&'static str> {
        self.required
            .iter()
            .copied()
            .filter(|name| source.has_attribute(name))
            .filter(|name| !source.all_values_present(name))
            .collect()
    }
}

impl<S: AttributeSource + ?Sized> Validator<S> for ValuePresenceValidator {
    fn validate(&self, source: &S) -> Result<()> {
        let blank = self.blank(source);
        if blank.is_empty() {
            Ok(())
        } else {
            Err(failure(self.message, &blank))
        }
    }
}

/// Required attributes and the messages used when they fail.
#[derive(Debug, Clone, Copy)]
pub struct RequiredAttributes {
    pub names: &'static [&'static str],
    pub missing_fields_message: &'static str,
    pub missing_values_message: &'static str,
}

pub const SAMPLE_REQUIREMENTS: RequiredAttributes = RequiredAttributes {
    names: &["alias", "taxon_id"],
    missing_fields_message:
        "Some required sample attributes are missing from the metadata upload file: ",
    missing_values_message: "Some samples are missing values in the following fields: ",
};

pub const STUDY_REQUIREMENTS: RequiredAttributes = RequiredAttributes {
    names: &["alias", "title"],
    missing_fields_message:
        "Some required study attributes are missing from the metadata upload file: ",
    missing_values_message: "The study is missing values in the following fields: ",
};

/// Runs validators in order, stopping at the first failure.
pub struct ValidationEngine<S: ?Sized> {
    validators: Vec<Box<dyn Validator<S>>>,
}

impl<S: AttributeSource + ?Sized> ValidationEngine<S> {
    /// Field presence first, then value presence.
    pub fn new(requirements: RequiredAttributes) -> Self {
        Self {
            validators: vec![
                Box::new(FieldPresenceValidator::new(
                    requirements.names,
                    requirements.missing_fields_message,
                )),
                Box::new(ValuePresenceValidator::new(
                    requirements.names,
                    requirements.missing_values_message,
                )),
            ],
        }
    }

    /// Run all validators.
    pub fn validate(&self, source: &S) -> Result<()> {
        for validator in &self.validators {
            validator.validate(source)?;
        }
        Ok(())
    }
}

//! Required-field and required-value validation.

mod validators;

pub use validators::{
    is_present, AttributeSource, FieldPresenceValidator, RequiredAttributes, ValidationEngine,
    ValuePresenceValidator, Validator, NULL_MARKERS, SAMPLE_REQUIREMENTS, STUDY_REQUIREMENTS,
};

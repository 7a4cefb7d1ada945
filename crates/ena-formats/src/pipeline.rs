//! Validate-then-build sequence for a single metadata record.

use std::fmt;
use std::path::Path;

use log::{debug, info};

use crate::error::{EnaError, Result};
use crate::formats::ValidationLevel;
use crate::input::{SampleTable, StudyRecord, TabularReader};
use crate::model::{SampleSet, Study, ToXmlElement, XmlElement};
use crate::validation::{
    AttributeSource, RequiredAttributes, ValidationEngine, SAMPLE_REQUIREMENTS, STUDY_REQUIREMENTS,
};
use crate::xml::{to_bytes_with_config, SerializerConfig};

/// Where a pipeline is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Unvalidated,
    Validated,
    Built,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Unvalidated => "unvalidated",
            Stage::Validated => "validated",
            Stage::Built => "built",
        };
        f.write_str(name)
    }
}

/// A parsed metadata record that can be validated and turned into a document.
pub trait SubmissionRecord: AttributeSource + Sized {
    /// Fixed file name inside the record's directory format.
    const FILE_NAME: &'static str;

    /// Required attributes and their failure messages.
    const REQUIREMENTS: RequiredAttributes;

    /// Read the record from a file.
    fn read(reader: &TabularReader, path: &Path) -> Result<Self>;

    /// Root element of the submission document.
    fn document(&self) -> XmlElement;
}

impl SubmissionRecord for SampleTable {
    const FILE_NAME: &'static str = "ena_metadata_samples.tsv";
    const REQUIREMENTS: RequiredAttributes = SAMPLE_REQUIREMENTS;

    fn read(reader: &TabularReader, path: &Path) -> Result<Self> {
        reader.read_sample_table(path)
    }

    fn document(&self) -> XmlElement {
        SampleSet::from(self).to_xml_element()
    }
}

impl SubmissionRecord for StudyRecord {
    const FILE_NAME: &'static str = "ena_metadata_study.tsv";
    const REQUIREMENTS: RequiredAttributes = STUDY_REQUIREMENTS;

    fn read(reader: &TabularReader, path: &Path) -> Result<Self> {
        reader.read_study_record(path)
    }

    fn document(&self) -> XmlElement {
        Study::from(self).to_xml_element()
    }
}

/// Owns one record and tracks whether it may be built yet.
#[derive(Debug, Clone)]
pub struct SubmissionPipeline<R: SubmissionRecord> {
    record: R,
    stage: Stage,
    serializer: SerializerConfig,
}

impl<R: SubmissionRecord> SubmissionPipeline<R> {
    /// Start an unvalidated pipeline.
    pub fn new(record: R) -> Self {
        Self {
            record,
            stage: Stage::Unvalidated,
            serializer: SerializerConfig::default(),
        }
    }

    /// Use a custom serializer configuration for [`SubmissionPipeline::build`].
    pub fn with_serializer(mut self, config: SerializerConfig) -> Self {
        self.serializer = config;
        self
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn record(&self) -> &R {
        &self.record
    }

    /// Run field presence then value presence checks.
    ///
    /// The level is accepted for interface compatibility; every level runs
    /// the same checks. On failure the stage is left unchanged.
    pub fn validate(&mut self, level: ValidationLevel) -> Result<()> {
        debug!("Validating {} at level {:?}", R::FILE_NAME, level);

        ValidationEngine::<R>::new(R::REQUIREMENTS).validate(&self.record)?;

        if self.stage == Stage::Unvalidated {
            self.stage = Stage::Validated;
        }
        info!("{} passed validation", R::FILE_NAME);
        Ok(())
    }

    /// Serialize the document. Only allowed once, after validation.
    pub fn build(&mut self) -> Result<Vec<u8>> {
        if self.stage != Stage::Validated {
            return Err(EnaError::InvalidState {
                expected: Stage::Validated,
                found: self.stage,
            });
        }

        let bytes = to_bytes_with_config(&self.record.document(), &self.serializer)?;
        self.stage = Stage::Built;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_study() -> StudyRecord {
        [("alias", "A1"), ("title", "Gut")].into_iter().collect()
    }

    #[test]
    fn test_build_before_validate_is_invalid_state() {
        let mut pipeline = SubmissionPipeline::new(valid_study());
        let err = pipeline.build().unwrap_err();

        assert!(matches!(
            err,
            EnaError::InvalidState {
                expected: Stage::Validated,
                found: Stage::Unvalidated
            }
        ));
        assert_eq!(pipeline.stage(), Stage::Unvalidated);
    }

    #[test]
    fn test_stage_sequence() {
        let mut pipeline = SubmissionPipeline::new(valid_study());
        pipeline.validate(ValidationLevel::Min).unwrap();
        assert_eq!(pipeline.stage(), Stage::Validated);

        let bytes = pipeline.build().unwrap();
        assert!(!bytes.is_empty());
        assert_eq!(pipeline.stage(), Stage::Built);

        let err = pipeline.build().unwrap_err();
        assert!(matches!(err, EnaError::InvalidState { found: Stage::Built, .. }));
    }

    #[test]
    fn test_failed_validation_keeps_stage() {
        let record: StudyRecord = [("alias", "A1")].into_iter().collect();
        let mut pipeline = SubmissionPipeline::new(record);

        assert!(pipeline.validate(ValidationLevel::Max).unwrap_err().is_validation());
        assert_eq!(pipeline.stage(), Stage::Unvalidated);
        assert!(pipeline.build().is_err());
    }

    #[test]
    fn test_levels_run_same_checks() {
        let record: StudyRecord = [("alias", "A1"), ("title", " ")].into_iter().collect();

        let min = SubmissionPipeline::new(record.clone())
            .validate(ValidationLevel::Min)
            .unwrap_err()
            .to_string();
        let max = SubmissionPipeline::new(record)
            .validate(ValidationLevel::Max)
            .unwrap_err()
            .to_string();

        assert_eq!(min, max);
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Unvalidated.to_string(), "unvalidated");
        assert_eq!(Stage::Built.to_string(), "built");
    }
}

//! File formats for ENA sample metadata, study metadata and submission receipts.
//!
//! Each format wraps a single file. The directory constructors resolve the
//! fixed file name used when a format is stored as a one-file directory.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::input::{ReaderConfig, SampleTable, StudyRecord, TabularReader};
use crate::model::XmlElement;
use crate::pipeline::{SubmissionPipeline, SubmissionRecord};
use crate::receipt::Receipt;

/// Requested validation depth. Every level runs the same full check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationLevel {
    Min,
    #[default]
    Max,
}

/// A tab-separated metadata file backing a sample table or a study record.
#[derive(Debug, Clone)]
pub struct MetadataFormat<R: SubmissionRecord> {
    path: PathBuf,
    reader: TabularReader,
    _record: PhantomData<R>,
}

/// Sample metadata: header row plus one row per sample.
pub type SampleMetadataFormat = MetadataFormat<SampleTable>;

/// Study metadata: two columns, one key per line, no header.
pub type StudyMetadataFormat = MetadataFormat<StudyRecord>;

impl<R: SubmissionRecord> MetadataFormat<R> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            reader: TabularReader::new(),
            _record: PhantomData,
        }
    }

    /// The format's fixed file inside `dir`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(R::FILE_NAME))
    }

    /// Read with a custom delimiter or quote character.
    pub fn with_reader_config(mut self, config: ReaderConfig) -> Self {
        self.reader = TabularReader::with_config(config);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file into its record.
    pub fn read(&self) -> Result<R> {
        R::read(&self.reader, &self.path)
    }

    /// Read the file into an unvalidated pipeline.
    pub fn pipeline(&self) -> Result<SubmissionPipeline<R>> {
        Ok(SubmissionPipeline::new(self.read()?))
    }

    /// Check required attributes and values.
    pub fn validate(&self, level: ValidationLevel) -> Result<()> {
        self.pipeline()?.validate(level)
    }

    /// Read, validate and serialize to UTF-8 XML bytes.
    pub fn to_xml(&self) -> Result<Vec<u8>> {
        let mut pipeline = self.pipeline()?;
        pipeline.validate(ValidationLevel::default())?;
        let bytes = pipeline.build()?;
        debug!("Converted {} to {} bytes of XML", self.path.display(), bytes.len());
        Ok(bytes)
    }
}

/// The archive's XML receipt for a submission.
#[derive(Debug, Clone)]
pub struct SubmissionReceiptFormat {
    path: PathBuf,
}

impl SubmissionReceiptFormat {
    pub const FILE_NAME: &'static str = "ena_submission_receipt.xml";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(Self::FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file into an unparsed receipt.
    pub fn read(&self) -> Result<Receipt> {
        Ok(Receipt::new(TabularReader::read_text(&self.path)?))
    }

    /// Parse the receipt and hand back its element tree.
    pub fn parse(&self) -> Result<XmlElement> {
        self.read()?.into_document()
    }

    /// Check that the receipt is well-formed XML.
    pub fn validate(&self, _level: ValidationLevel) -> Result<()> {
        self.read()?.parse().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dir_resolves_fixed_names() {
        let dir = Path::new("/data/upload");

        assert_eq!(
            SampleMetadataFormat::from_dir(dir).path(),
            Path::new("/data/upload/ena_metadata_samples.tsv")
        );
        assert_eq!(
            StudyMetadataFormat::from_dir(dir).path(),
            Path::new("/data/upload/ena_metadata_study.tsv")
        );
        assert_eq!(
            SubmissionReceiptFormat::from_dir(dir).path(),
            Path::new("/data/upload/ena_submission_receipt.xml")
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SampleMetadataFormat::new("/nonexistent/samples.tsv")
            .validate(ValidationLevel::Min)
            .unwrap_err();

        assert!(matches!(err, crate::EnaError::Io { .. }));
    }

    #[test]
    fn test_default_level_is_max() {
        assert_eq!(ValidationLevel::default(), ValidationLevel::Max);
    }
}

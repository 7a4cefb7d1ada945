//! ena-formats: submission metadata formats for the European Nucleotide Archive.
//!
//! Three independent formats, each read from a single file:
//!
//! - **Sample metadata**: a tab-separated table, one row per sample, with
//!   required `alias` and `taxon_id` columns. Converts to a `SAMPLE_SET` document.
//! - **Study metadata**: a two-column key/value file with required `alias`
//!   and `title` keys. Converts to a `PROJECT_SET` document.
//! - **Submission receipt**: the archive's XML response, checked for
//!   well-formedness only.
//!
//! Validation runs in two passes: first every required attribute must exist,
//! then every existing required attribute must have non-blank values.
//!
//! # Example
//!
//! ```no_run
//! use ena_formats::{SampleMetadataFormat, ValidationLevel};
//!
//! let format = SampleMetadataFormat::from_dir("upload/");
//! format.validate(ValidationLevel::Max).unwrap();
//!
//! let xml = format.to_xml().unwrap();
//! println!("{}", String::from_utf8_lossy(&xml));
//! ```

pub mod error;
pub mod formats;
pub mod input;
pub mod model;
pub mod pipeline;
pub mod receipt;
pub mod validation;
pub mod xml;

pub use error::{EnaError, Result};
pub use formats::{
    MetadataFormat, SampleMetadataFormat, StudyMetadataFormat, SubmissionReceiptFormat,
    ValidationLevel,
};
pub use input::{ReaderConfig, SampleRow, SampleTable, StudyRecord, TabularReader};
pub use model::{SampleSet, Study, ToXmlElement, XmlElement};
pub use pipeline::{Stage, SubmissionPipeline, SubmissionRecord};
pub use receipt::{Receipt, ReceiptState, INVALID_RECEIPT_MESSAGE};
pub use validation::is_present;
pub use xml::SerializerConfig;

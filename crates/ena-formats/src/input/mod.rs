//! Tabular input reading.

mod reader;
mod source;

pub use reader::{ReaderConfig, TabularReader};
pub use source::{SampleRow, SampleTable, StudyRecord};

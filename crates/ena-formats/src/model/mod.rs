//! Submission document model: sample sets and studies as XML element trees.

mod element;
mod sample;
mod study;

pub use element::XmlElement;
pub use sample::{Sample, SampleSet};
pub use study::Study;

/// Builds the root element of a submission document.
///
/// Implementations never fail for already-validated input, and the
/// returned tree is self-contained.
pub trait ToXmlElement {
    fn to_xml_element(&self) -> XmlElement;
}

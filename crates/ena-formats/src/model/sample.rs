//! ENA sample set documents.

use crate::input::{SampleRow, SampleTable};
use crate::validation::is_present;

use super::{ToXmlElement, XmlElement};

/// Columns that map to dedicated sample elements or attributes.
const RESERVED_COLUMNS: &[&str] = &[
    "alias",
    "center_name",
    "title",
    "taxon_id",
    "scientific_name",
    "common_name",
    "description",
];

pub(crate) fn present_value(value: Option<&str>) -> Option<String> {
    value.filter(|v| is_present(Some(*v))).map(|v| v.trim().to_string())
}

/// A single sample.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sample {
    pub alias: String,
    pub taxon_id: String,
    pub center_name: Option<String>,
    pub title: Option<String>,
    pub scientific_name: Option<String>,
    pub common_name: Option<String>,
    pub description: Option<String>,
    /// Free-form tag/value pairs, in column order.
    pub attributes: Vec<(String, String)>,
}

impl Sample {
    /// Build from a row; optional columns without a value are dropped.
    pub fn from_row(row: &SampleRow) -> Self {
        let attributes = row
            .iter()
            .filter(|(name, _)| !RESERVED_COLUMNS.contains(name))
            .filter_map(|(name, value)| present_value(value).map(|v| (name.to_string(), v)))
            .collect();

        Self {
            alias: present_value(row.get("alias")).unwrap_or_default(),
            taxon_id: present_value(row.get("taxon_id")).unwrap_or_default(),
            center_name: present_value(row.get("center_name")),
            title: present_value(row.get("title")),
            scientific_name: present_value(row.get("scientific_name")),
            common_name: present_value(row.get("common_name")),
            description: present_value(row.get("description")),
            attributes,
        }
    }
}

impl ToXmlElement for Sample {
    fn to_xml_element(&self) -> XmlElement {
        let mut sample = XmlElement::new("SAMPLE").with_attribute("alias", &self.alias);
        if let Some(center) = &self.center_name {
            sample.set_attribute("center_name", center);
        }

        if let Some(title) = &self.title {
            sample.push_child(XmlElement::text_element("TITLE", title));
        }

        let mut name = XmlElement::new("SAMPLE_NAME")
            .with_child(XmlElement::text_element("TAXON_ID", &self.taxon_id));
        if let Some(scientific) = &self.scientific_name {
            name.push_child(XmlElement::text_element("SCIENTIFIC_NAME", scientific));
        }
        if let Some(common) = &self.common_name {
            name.push_child(XmlElement::text_element("COMMON_NAME", common));
        }
        sample.push_child(name);

        if let Some(description) = &self.description {
            sample.push_child(XmlElement::text_element("DESCRIPTION", description));
        }

        if !self.attributes.is_empty() {
            let mut attributes = XmlElement::new("SAMPLE_ATTRIBUTES");
            for (tag, value) in &self.attributes {
                attributes.push_child(
                    XmlElement::new("SAMPLE_ATTRIBUTE")
                        .with_child(XmlElement::text_element("TAG", tag))
                        .with_child(XmlElement::text_element("VALUE", value)),
                );
            }
            sample.push_child(attributes);
        }

        sample
    }
}

/// A set of samples submitted together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleSet {
    pub samples: Vec<Sample>,
}

impl From<&SampleTable> for SampleSet {
    fn from(table: &SampleTable) -> Self {
        Self {
            samples: table.rows.iter().map(Sample::from_row).collect(),
        }
    }
}

impl ToXmlElement for SampleSet {
    fn to_xml_element(&self) -> XmlElement {
        let mut set = XmlElement::new("SAMPLE_SET");
        for sample in &self.samples {
            set.push_child(sample.to_xml_element());
        }
        set
    }
}

//! ENA study documents, rendered as the archive's project object.

use crate::input::StudyRecord;

use super::sample::present_value;
use super::{ToXmlElement, XmlElement};

const RESERVED_KEYS: &[&str] = &["alias", "center_name", "name", "title", "description"];

/// A study registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Study {
    pub alias: String,
    pub title: String,
    pub center_name: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    /// Free-form tag/value pairs, in key order.
    pub attributes: Vec<(String, String)>,
}

impl From<&StudyRecord> for Study {
    fn from(record: &StudyRecord) -> Self {
        let attributes = record
            .iter()
            .filter(|(key, _)| !RESERVED_KEYS.contains(key))
            .filter_map(|(key, value)| present_value(value).map(|v| (key.to_string(), v)))
            .collect();

        Self {
            alias: present_value(record.get("alias")).unwrap_or_default(),
            title: present_value(record.get("title")).unwrap_or_default(),
            center_name: present_value(record.get("center_name")),
            name: present_value(record.get("name")),
            description: present_value(record.get("description")),
            attributes,
        }
    }
}

impl ToXmlElement for Study {
    fn to_xml_element(&self) -> XmlElement {
        let mut project = XmlElement::new("PROJECT").with_attribute("alias", &self.alias);
        if let Some(center) = &self.center_name {
            project.set_attribute("center_name", center);
        }

        if let Some(name) = &self.name {
            project.push_child(XmlElement::text_element("NAME", name));
        }
        project.push_child(XmlElement::text_element("TITLE", &self.title));
        if let Some(description) = &self.description {
            project.push_child(XmlElement::text_element("DESCRIPTION", description));
        }
        project.push_child(
            XmlElement::new("SUBMISSION_PROJECT").with_child(XmlElement::new("SEQUENCING_PROJECT")),
        );

        if !self.attributes.is_empty() {
            let mut attributes = XmlElement::new("PROJECT_ATTRIBUTES");
            for (tag, value) in &self.attributes {
                attributes.push_child(
                    XmlElement::new("PROJECT_ATTRIBUTE")
                        .with_child(XmlElement::text_element("TAG", tag))
                        .with_child(XmlElement::text_element("VALUE", value)),
                );
            }
            project.push_child(attributes);
        }

        XmlElement::new("PROJECT_SET").with_child(project)
    }
}

use serde::{Deserialize, Serialize};

use crate::models::GeologyDocument;

/// Label of the empty choice rendered ahead of the section names.
pub const SELECT_PLACEHOLDER: &str = "Select Section";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectionOption {
    /// Stable key for the host's option element.
    pub id: String,
    /// Option value and label.
    pub name: String,
}

/// One option per section, in document order.
pub fn section_options(document: &GeologyDocument) -> Vec<SectionOption> {
    document
        .polygons_by_section
        .iter()
        .map(|section| SectionOption {
            id: section.section_id.to_string(),
            name: section.section_name.clone(),
        })
        .collect()
}

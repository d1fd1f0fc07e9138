// Document model for uploaded cross-section files
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::color::HexColor;

/// Load counters reported by `get_load_stats`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoadStats {
    pub documents_loaded: usize,
    pub load_failures: usize,
    pub section_count: usize,
    pub has_document: bool,
}

/// Root of an uploaded document: `{ "polygonsBySection": [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeologyDocument {
    pub polygons_by_section: Vec<Section>,
}

impl GeologyDocument {
    /// First section whose name matches exactly.
    pub fn find_section(&self, name: &str) -> Option<&Section> {
        self.polygons_by_section
            .iter()
            .find(|section| section.section_name == name)
    }

    pub fn section_count(&self) -> usize {
        self.polygons_by_section.len()
    }
}

// Section ids show up as both numbers and strings in exported files
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SectionId {
    Number(i64),
    Text(String),
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionId::Number(n) => write!(f, "{}", n),
            SectionId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub section_id: SectionId,
    pub section_name: String,
    #[serde(default)]
    pub polygons: Vec<Polygon>,
    #[serde(default)]
    pub boreholes: Vec<Borehole>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Polygon {
    #[serde(rename = "points2D", default)]
    pub points_2d: Vec<Point2D>,
    #[serde(rename = "points3D", default)]
    pub points_3d: Vec<Point3D>,
    pub color: HexColor,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub symbol_description: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point2D {
    pub vertex: [f64; 2],
}

/// `vertex` is `[x, y, z]` with z as elevation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point3D {
    pub vertex: [f64; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Borehole {
    pub x: f64,
    pub elevation: f64,
    pub depth: f64,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_document() {
        let json = r#"{
            "polygonsBySection": [{
                "sectionId": 7,
                "sectionName": "A-A'",
                "polygons": [{
                    "points2D": [{"vertex": [0, 0]}, {"vertex": [1, 0]}, {"vertex": [1, 1]}],
                    "points3D": [{"vertex": [0, 0, 5]}, {"vertex": [1, 0, 5]}, {"vertex": [1, 1, 4]}],
                    "color": "a0b0c0",
                    "symbol": "Qal",
                    "symbolDescription": "Alluvium"
                }],
                "boreholes": [{"x": 3.5, "elevation": 12, "depth": 40, "name": "BH-1"}]
            }]
        }"#;

        let doc: GeologyDocument = serde_json::from_str(json).expect("document");
        assert_eq!(doc.section_count(), 1);
        let section = doc.find_section("A-A'").expect("section");
        assert_eq!(section.section_id, SectionId::Number(7));
        assert_eq!(section.polygons[0].points_2d.len(), 3);
        assert_eq!(section.polygons[0].points_3d[2].vertex, [1.0, 1.0, 4.0]);
        assert_eq!(section.polygons[0].symbol_description, "Alluvium");
        assert_eq!(section.boreholes[0].name, "BH-1");
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let json = r#"{"polygonsBySection": [{"sectionId": "s1", "sectionName": "North"}]}"#;
        let doc: GeologyDocument = serde_json::from_str(json).expect("document");
        let section = &doc.polygons_by_section[0];
        assert!(section.polygons.is_empty());
        assert!(section.boreholes.is_empty());
        assert_eq!(section.section_id.to_string(), "s1");
    }

    #[test]
    fn find_section_is_exact_match() {
        let json = r#"{"polygonsBySection": [
            {"sectionId": 1, "sectionName": "East"},
            {"sectionId": 2, "sectionName": "East 2"}
        ]}"#;
        let doc: GeologyDocument = serde_json::from_str(json).expect("document");
        assert_eq!(doc.find_section("East 2").map(|s| &s.section_id), Some(&SectionId::Number(2)));
        assert!(doc.find_section("east").is_none());
    }
}

use lazy_static::lazy_static;
use parking_lot::ReentrantMutex;
use std::cell::RefCell;

use crate::config::ViewerConfig;
use crate::models::{GeologyDocument, LoadStats};
use crate::scale::ZoomTransform;

/// Transient 2D view state; reset whenever the document or selection changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interaction2D {
    pub transform: ZoomTransform,
    // Index into the selected section's polygons
    pub active_label: Option<ActiveLabel>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveLabel {
    pub polygon_index: usize,
    pub symbol_width: Option<f64>,
    pub description_width: Option<f64>,
}

// Module state shared by every wasm export
pub struct ModuleState {
    // Last successfully parsed document
    pub document: Option<GeologyDocument>,

    // Empty string means nothing is selected
    pub selected_section: String,

    pub interaction: Interaction2D,

    pub config: ViewerConfig,

    // Stats
    pub documents_loaded: usize,
    pub load_failures: usize,
}

lazy_static! {
    static ref MODULE_STATE: ReentrantMutex<RefCell<ModuleState>> =
        ReentrantMutex::new(RefCell::new(ModuleState::new()));
}

impl Default for ModuleState {
    fn default() -> Self {
        ModuleState::new()
    }
}

impl ModuleState {
    pub fn new() -> Self {
        ModuleState {
            document: None,
            selected_section: String::new(),
            interaction: Interaction2D::default(),
            config: ViewerConfig::default(),
            documents_loaded: 0,
            load_failures: 0,
        }
    }

    pub fn with_mut<F, R>(f: F) -> R
    where
        F: FnOnce(&mut ModuleState) -> R,
    {
        let guard = MODULE_STATE.lock();
        let mut borrow = guard.borrow_mut();
        f(&mut borrow)
    }

    pub fn with<F, R>(f: F) -> R
    where
        F: FnOnce(&ModuleState) -> R,
    {
        let guard = MODULE_STATE.lock();
        let borrow = guard.borrow();
        f(&borrow)
    }

    /// Swap in a freshly loaded document. Returns its section count.
    pub fn replace_document(&mut self, document: GeologyDocument) -> usize {
        let count = document.section_count();
        self.document = Some(document);
        self.selected_section.clear();
        self.interaction = Interaction2D::default();
        self.documents_loaded += 1;
        count
    }

    pub fn record_load_failure(&mut self) {
        self.load_failures += 1;
    }

    pub fn select_section(&mut self, name: &str) {
        if self.selected_section != name {
            self.interaction = Interaction2D::default();
        }
        self.selected_section = name.to_string();
    }

    pub fn stats(&self) -> LoadStats {
        LoadStats {
            documents_loaded: self.documents_loaded,
            load_failures: self.load_failures,
            section_count: self.document.as_ref().map_or(0, |d| d.section_count()),
            has_document: self.document.is_some(),
        }
    }

    /// Drop the document, selection, counters and config.
    pub fn reset(&mut self) {
        *self = ModuleState::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Section, SectionId};

    fn doc_with(names: &[&str]) -> GeologyDocument {
        GeologyDocument {
            polygons_by_section: names
                .iter()
                .enumerate()
                .map(|(i, name)| Section {
                    section_id: SectionId::Number(i as i64),
                    section_name: name.to_string(),
                    polygons: Vec::new(),
                    boreholes: Vec::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn replacing_document_clears_selection() {
        let mut state = ModuleState::new();
        state.replace_document(doc_with(&["A"]));
        state.select_section("A");
        state.interaction.transform = ZoomTransform { k: 2.0, x: 1.0, y: 1.0 };

        let count = state.replace_document(doc_with(&["B", "C"]));
        assert_eq!(count, 2);
        assert!(state.selected_section.is_empty());
        assert_eq!(state.interaction, Interaction2D::default());
        assert_eq!(state.documents_loaded, 2);
    }

    #[test]
    fn stats_count_loads_and_failures() {
        let mut state = ModuleState::new();
        state.replace_document(doc_with(&["A", "B"]));
        state.record_load_failure();
        let stats = state.stats();
        assert_eq!(stats.documents_loaded, 1);
        assert_eq!(stats.load_failures, 1);
        assert_eq!(stats.section_count, 2);
        assert!(stats.has_document);

        state.reset();
        assert_eq!(
            state.stats(),
            LoadStats { documents_loaded: 0, load_failures: 0, section_count: 0, has_document: false }
        );
    }

    #[test]
    fn reselecting_same_section_keeps_zoom() {
        let mut state = ModuleState::new();
        state.select_section("A");
        state.interaction.transform = ZoomTransform { k: 3.0, x: 0.0, y: 0.0 };
        state.select_section("A");
        assert_eq!(state.interaction.transform.k, 3.0);
        state.select_section("B");
        assert_eq!(state.interaction.transform, ZoomTransform::identity());
    }
}

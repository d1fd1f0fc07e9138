use wasm_bindgen::prelude::*;
use serde_wasm_bindgen::to_value;

// Create a console module for logging
pub mod console;
pub mod color;
pub mod config;
pub mod geometry;
pub mod loader;
pub mod models;
pub mod module_state;
pub mod scale;
pub mod selector;
pub mod svg;
pub mod view2d;
pub mod view3d;

use config::ViewerConfig;
use module_state::ModuleState;
use view2d::{ClickOutcome, SectionView, Viewport};

// Enable better panic messages in console during development
#[cfg(feature = "console_error_panic_hook")]
pub use console_error_panic_hook::set_once as set_panic_hook;

// Use the macro from our console module
#[macro_export]
macro_rules! console_log {
    ($($t:tt)*) => (crate::console::log(&format!($($t)*)))
}

use std::sync::Once;
static INIT: Once = Once::new();

// This sets up the wasm_bindgen start functionality
#[wasm_bindgen(start)]
pub fn start() {
    INIT.call_once(|| {
        // Set the panic hook for better error messages
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        console_log!("Geology viewer module initialized");
    });
}

/// Replace the viewer configuration. Missing fields keep their defaults;
/// an invalid config is rejected and the current one stays.
#[wasm_bindgen]
pub fn configure_viewer(config: JsValue) -> Result<(), JsValue> {
    let config: ViewerConfig = if config.is_undefined() || config.is_null() {
        ViewerConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config)?
    };
    config
        .validate()
        .map_err(|e| JsValue::from_str(&format!("Invalid viewer config: {}", e)))?;
    console_log!("Viewer configured: padding={} zoom=[{}, {}]", config.padding, config.min_zoom, config.max_zoom);
    ModuleState::with_mut(|state| state.config = config);
    Ok(())
}

/// Load a document from already-read JSON text. Returns the section count.
///
/// Unlike `load_document_file` this never alerts; the caller decides how to report.
#[wasm_bindgen]
pub fn load_document_json(text: &str) -> Result<usize, JsValue> {
    match loader::load_document_text(text) {
        Ok(count) => {
            console_log!("Document loaded with {} sections", count);
            Ok(count)
        }
        Err(err) => {
            console_log!("Error parsing JSON: {}", err);
            Err(JsValue::from_str(&err.to_string()))
        }
    }
}

#[wasm_bindgen]
pub fn has_document() -> bool {
    ModuleState::with(|state| state.document.is_some())
}

#[wasm_bindgen]
pub fn get_section_options() -> Result<JsValue, JsValue> {
    let options = ModuleState::with(|state| {
        state
            .document
            .as_ref()
            .map(selector::section_options)
            .unwrap_or_default()
    });
    console_log!("Sections: {:?}", options.iter().map(|o| o.name.as_str()).collect::<Vec<_>>());
    Ok(to_value(&options)?)
}

/// Load counters and current document size.
#[wasm_bindgen]
pub fn get_load_stats() -> Result<JsValue, JsValue> {
    let stats = ModuleState::with(|state| state.stats());
    Ok(to_value(&stats)?)
}

/// Forget the loaded document and go back to the default configuration.
#[wasm_bindgen]
pub fn reset_viewer() {
    ModuleState::with_mut(|state| state.reset());
    console_log!("Viewer reset");
}

#[wasm_bindgen]
pub fn get_select_placeholder() -> String {
    selector::SELECT_PLACEHOLDER.to_string()
}

#[wasm_bindgen]
pub fn select_section(name: &str) {
    ModuleState::with_mut(|state| state.select_section(name));
}

#[wasm_bindgen]
pub fn get_selected_section() -> String {
    ModuleState::with(|state| state.selected_section.clone())
}

fn current_section_view(width: f64, height: f64) -> SectionView {
    ModuleState::with(|state| match state.document.as_ref() {
        Some(document) => view2d::render_section(
            document,
            &state.selected_section,
            Viewport { width, height },
            &state.config,
            &state.interaction,
        ),
        None => SectionView::Idle,
    })
}

/// Layout of the selected section as a structured object.
#[wasm_bindgen]
pub fn render_section_2d(width: f64, height: f64) -> Result<JsValue, JsValue> {
    Ok(to_value(&current_section_view(width, height))?)
}

/// Layout of the selected section as ready-to-insert SVG markup.
#[wasm_bindgen]
pub fn render_section_svg(width: f64, height: f64) -> String {
    svg::to_svg(&current_section_view(width, height), width, height)
}

/// Click in the section view at screen coordinates. Returns whether a label is now shown.
#[wasm_bindgen]
pub fn click_section_2d(
    width: f64,
    height: f64,
    x: f64,
    y: f64,
    symbol_width: Option<f64>,
    description_width: Option<f64>,
) -> bool {
    let outcome = ModuleState::with_mut(|state| {
        let ModuleState {
            document,
            selected_section,
            interaction,
            config,
            ..
        } = state;
        match document.as_ref() {
            Some(document) => view2d::handle_click(
                document,
                selected_section,
                Viewport { width, height },
                config,
                interaction,
                [x, y],
                symbol_width,
                description_width,
            ),
            None => ClickOutcome::Missed,
        }
    });
    if let ClickOutcome::Shown(index) = outcome {
        console_log!("Showing label for polygon {}", index);
    }
    matches!(outcome, ClickOutcome::Shown(_))
}

#[wasm_bindgen]
pub fn zoom_section_2d(x: f64, y: f64, factor: f64) {
    ModuleState::with_mut(|state| {
        let ModuleState { interaction, config, .. } = state;
        view2d::zoom(interaction, config, [x, y], factor);
    });
}

#[wasm_bindgen]
pub fn pan_section_2d(dx: f64, dy: f64) {
    ModuleState::with_mut(|state| view2d::pan(&mut state.interaction, dx, dy));
}

#[wasm_bindgen]
pub fn reset_zoom_2d() {
    ModuleState::with_mut(|state| state.interaction.transform = scale::ZoomTransform::identity());
}

/// Scene description for every section, or `null` before a document is loaded.
#[wasm_bindgen]
pub fn build_scene_3d() -> Result<JsValue, JsValue> {
    let scene = ModuleState::with(|state| {
        state
            .document
            .as_ref()
            .map(|document| view3d::build_scene(document, &state.config))
    });
    match scene {
        Some(scene) => {
            console_log!(
                "Scene built: {} polygon meshes, {} boreholes, grid size {}",
                scene.polygons.len(),
                scene.boreholes.len(),
                scene.grid.size
            );
            Ok(to_value(&scene)?)
        }
        None => Ok(JsValue::NULL),
    }
}

pub use loader::load_document_file;

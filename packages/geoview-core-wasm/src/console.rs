use wasm_bindgen::prelude::*;

// This allows us to access console.log from JS
#[wasm_bindgen]
extern "C" {
    // Use `js_namespace` to bind `console.log(..)` instead of just `log(..)`
    #[wasm_bindgen(js_namespace = console)]
    pub fn log(s: &str);
}

/// Blocking `window.alert`; falls back to the console outside a window (workers, tests).
pub fn alert(message: &str) {
    match web_sys::window() {
        Some(window) => {
            if window.alert_with_message(message).is_err() {
                log(message);
            }
        }
        None => log(message),
    }
}

// Note: The console_log macro is defined in lib.rs to avoid duplication

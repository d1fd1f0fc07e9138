// Document loading: file contents -> parsed document in module state
use std::fmt;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::console_log;
use crate::models::GeologyDocument;
use crate::module_state::ModuleState;

/// Shown to the user whenever an upload cannot be used.
pub const INVALID_FILE_MESSAGE: &str = "Error reading file. Please ensure it is a valid JSON file.";

#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    /// Not JSON, or JSON that does not describe a document.
    InvalidJson {
        line: usize,
        column: usize,
        message: String,
    },
    /// The browser could not hand over the file contents as text.
    FileRead(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::InvalidJson { line, column, message } => {
                write!(f, "invalid input file at line {}, column {}: {}", line, column, message)
            }
            LoadError::FileRead(message) => write!(f, "failed to read file: {}", message),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::InvalidJson {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}

pub fn parse_document(text: &str) -> Result<GeologyDocument, LoadError> {
    Ok(serde_json::from_str::<GeologyDocument>(text)?)
}

/// Parse `text` and, only on success, make it the current document.
pub fn load_document_text(text: &str) -> Result<usize, LoadError> {
    match parse_document(text) {
        Ok(document) => Ok(ModuleState::with_mut(|state| state.replace_document(document))),
        Err(err) => {
            ModuleState::with_mut(|state| state.record_load_failure());
            Err(err)
        }
    }
}

async fn read_file_text(file: &web_sys::File) -> Result<String, LoadError> {
    let value = JsFuture::from(file.text())
        .await
        .map_err(|e| LoadError::FileRead(format!("{:?}", e)))?;
    value
        .as_string()
        .ok_or_else(|| LoadError::FileRead("file contents are not text".to_string()))
}

/// Load already-read file contents, reporting any failure to `alert` exactly
/// once. A failed read or parse keeps the previously loaded document.
pub fn load_with_alert<F>(contents: Result<String, LoadError>, alert: &mut F) -> Result<usize, LoadError>
where
    F: FnMut(&str),
{
    let loaded = match contents {
        Ok(text) => load_document_text(&text),
        Err(err) => {
            ModuleState::with_mut(|state| state.record_load_failure());
            Err(err)
        }
    };
    if loaded.is_err() {
        alert(INVALID_FILE_MESSAGE);
    }
    loaded
}

/// Read an uploaded file and load it. Any failure raises one alert and keeps
/// the previously loaded document.
#[wasm_bindgen]
pub async fn load_document_file(file: web_sys::File) -> Result<JsValue, JsValue> {
    console_log!("Reading {} ({} bytes)", file.name(), file.size());

    let contents = read_file_text(&file).await;
    match load_with_alert(contents, &mut |message| crate::console::alert(message)) {
        Ok(section_count) => {
            console_log!("Loaded {} with {} sections", file.name(), section_count);
            Ok(JsValue::from_f64(section_count as f64))
        }
        Err(err) => {
            console_log!("Error parsing JSON: {}", err);
            Err(JsValue::from_str(&err.to_string()))
        }
    }
}

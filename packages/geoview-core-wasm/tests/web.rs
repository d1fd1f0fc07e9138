//! JS-facing exports, run with `wasm-pack test --node`.
#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

use geoview_core_wasm::{
    build_scene_3d, configure_viewer, get_load_stats, get_section_options, get_selected_section, has_document,
    load_document_json, render_section_svg, reset_viewer, select_section, zoom_section_2d,
};

const DOCUMENT: &str = r#"{"polygonsBySection": [
    {"sectionId": 1, "sectionName": "North", "polygons": [
        {"points2D": [{"vertex": [0, 0]}, {"vertex": [10, 0]}, {"vertex": [5, 5]}],
         "points3D": [{"vertex": [0, 0, 0]}, {"vertex": [10, 0, 0]}, {"vertex": [5, 0, 5]}],
         "color": "123abc", "symbol": "Ks", "symbolDescription": "Sandstone"}
    ], "boreholes": [{"x": 5, "elevation": 0, "depth": 20, "name": "BH"}]}
]}"#;

#[wasm_bindgen_test]
fn exports_drive_a_full_session() {
    let count = load_document_json(DOCUMENT).expect("document");
    assert_eq!(count, 1);
    assert!(has_document());

    let options = js_sys::Array::from(&get_section_options().expect("options"));
    assert_eq!(options.length(), 1);

    select_section("North");
    assert_eq!(get_selected_section(), "North");
    let svg = render_section_svg(300.0, 200.0);
    assert!(svg.contains("#123abc"));

    select_section("Missing");
    assert!(render_section_svg(300.0, 200.0).contains("No section found with name: Missing"));

    assert!(load_document_json("[1, 2").is_err());
    assert!(has_document());

    let scene = build_scene_3d().expect("scene");
    assert!(!scene.is_null());
    let polygons = js_sys::Reflect::get(&scene, &JsValue::from_str("polygons")).expect("polygons");
    assert_eq!(js_sys::Array::from(&polygons).length(), 1);

    let stats = get_load_stats().expect("stats");
    let failures = js_sys::Reflect::get(&stats, &JsValue::from_str("loadFailures")).expect("loadFailures");
    assert_eq!(failures.as_f64(), Some(1.0));

    let inverted = js_sys::JSON::parse(r#"{"minZoom": 20}"#).expect("json");
    assert!(configure_viewer(inverted).is_err());
    zoom_section_2d(10.0, 10.0, 2.0);

    reset_viewer();
    assert!(!has_document());
    assert!(build_scene_3d().expect("scene").is_null());
}

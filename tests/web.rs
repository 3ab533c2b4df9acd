// Browser smoke tests: `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn element_exists(id: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
        .is_some()
}

#[wasm_bindgen_test]
fn mount_and_unmount_table() {
    caterpillar_bond::start_game().unwrap();
    assert!(element_exists("cb-table-canvas"));
    assert!(element_exists("cb-status"));
    assert!(element_exists("cb-gauge"));

    caterpillar_bond::stop_game();
    assert!(!element_exists("cb-table-canvas"));
    assert!(!element_exists("cb-status"));
    // second teardown is a no-op
    caterpillar_bond::stop_game();
}

#[wasm_bindgen_test]
fn host_canvas_survives_teardown() {
    let doc = web_sys::window().and_then(|w| w.document()).unwrap();
    let canvas = doc.create_element("canvas").unwrap();
    canvas.set_id("cb-table-canvas");
    doc.body().unwrap().append_child(&canvas).unwrap();

    caterpillar_bond::start_game().unwrap();
    caterpillar_bond::stop_game();
    assert!(element_exists("cb-table-canvas"));
    assert!(!element_exists("cb-status"));
    canvas.remove();
}

#[wasm_bindgen_test]
fn remount_replaces_session() {
    caterpillar_bond::start_game().unwrap();
    caterpillar_bond::start_game().unwrap();
    assert!(element_exists("cb-table-canvas"));
    caterpillar_bond::stop_game();
}

//! Browser tests, run with `wasm-pack test --headless --firefox crates/webui`.
#![cfg(target_arch = "wasm32")]

use assert_matches::assert_matches;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use webui::{
    bootstrap::{self, BootstrapError, MOUNT_POINT_ID},
    config::AppConfig,
};

wasm_bindgen_test_configure!(run_in_browser);

fn add_mount_point() {
    let document = gloo::utils::document();
    if document.get_element_by_id(MOUNT_POINT_ID).is_none() {
        let element = document.create_element("div").unwrap();
        element.set_id(MOUNT_POINT_ID);
        document.body().unwrap().append_child(&element).unwrap();
    }
}

#[wasm_bindgen_test]
fn base_url_matches_page_origin() {
    let config = AppConfig::from_window().unwrap();
    let location = gloo::utils::window().location();
    let expected = format!(
        "{}//{}:{}",
        location.protocol().unwrap(),
        location.hostname().unwrap(),
        location.port().unwrap()
    );
    assert_eq!(expected, config.base_url.as_str());
    assert!(config.features.edit_enabled);
    assert!(config.features.delete_enabled);
}

#[wasm_bindgen_test]
fn missing_mount_point_is_reported() {
    let config = AppConfig::from_window().unwrap();
    assert_matches!(
        bootstrap::mount_at("no-such-element", config).err(),
        Some(BootstrapError::MountPointMissing(id)) if id == "no-such-element"
    );
}

#[wasm_bindgen_test]
fn second_mount_is_rejected() {
    add_mount_point();
    let config = AppConfig::from_window().unwrap();
    let _first = bootstrap::mount(config.clone()).unwrap();
    assert_matches!(
        bootstrap::mount(config).err(),
        Some(BootstrapError::AlreadyMounted)
    );
    assert!(
        gloo::utils::document()
            .get_element_by_id(MOUNT_POINT_ID)
            .is_some()
    );
}

use crate::helpers::{folder, paths, FakeConfig};
use custom_data_server::custom_data::{custom_data_paths_in_workspaces, CustomDataLanguage};
use serde_json::json;

const CSS: CustomDataLanguage = CustomDataLanguage::Css;

#[test]
fn no_workspace_yields_no_paths() {
    let config = FakeConfig::default().with_folder_value("css", "/ws", json!({ "customData": ["a.json"] }));
    assert!(custom_data_paths_in_workspaces(CSS, None, &config).is_empty());
}

#[test]
fn folder_entries_resolve_against_folder_root_in_order() {
    let config = FakeConfig::default().with_folder_value(
        "css",
        "/ws",
        json!({ "customData": ["./a.ext", "b/c.ext"] }),
    );
    let folders = [folder("/ws")];

    assert_eq!(
        custom_data_paths_in_workspaces(CSS, Some(&folders[..]), &config),
        paths(&["/ws/a.ext", "/ws/b/c.ext"])
    );
}

#[test]
fn non_array_value_only_affects_its_folder() {
    let config = FakeConfig::default()
        .with_folder_value("css", "/one", json!({ "customData": "a.json" }))
        .with_folder_value("css", "/two", json!({ "customData": 42 }))
        .with_folder_value("css", "/three", json!({ "customData": ["c.json"] }));
    let folders = [folder("/one"), folder("/two"), folder("/three")];

    assert_eq!(
        custom_data_paths_in_workspaces(CSS, Some(&folders[..]), &config),
        paths(&["/three/c.json"])
    );
}

#[test]
fn non_string_entries_are_skipped() {
    let config = FakeConfig::default().with_folder_value(
        "css",
        "/ws",
        json!({ "customData": [1, "a.json", null, { "path": "b.json" }, "c.json"] }),
    );
    let folders = [folder("/ws")];

    assert_eq!(
        custom_data_paths_in_workspaces(CSS, Some(&folders[..]), &config),
        paths(&["/ws/a.json", "/ws/c.json"])
    );
}

#[test]
fn values_outside_folder_scope_are_ignored() {
    let config = FakeConfig::default()
        .with_global_value("css", "/ws", json!({ "customData": ["user.json"] }))
        .with_workspace_value("css", "/ws", json!({ "customData": ["workspace.json"] }));
    let folders = [folder("/ws")];

    assert!(custom_data_paths_in_workspaces(CSS, Some(&folders[..]), &config).is_empty());
}

#[test]
fn folder_section_without_custom_data_contributes_nothing() {
    let config = FakeConfig::default()
        .with_folder_value("css", "/a", json!({ "validate": false }))
        .with_folder_value("css", "/b", json!(["not", "an", "object"]));
    let folders = [folder("/a"), folder("/b")];

    assert!(custom_data_paths_in_workspaces(CSS, Some(&folders[..]), &config).is_empty());
}

#[test]
fn only_the_requested_language_section_is_read() {
    let config = FakeConfig::default()
        .with_folder_value("css", "/ws", json!({ "customData": ["css.json"] }))
        .with_folder_value("html", "/ws", json!({ "customData": ["html.json"] }));
    let folders = [folder("/ws")];

    assert_eq!(
        custom_data_paths_in_workspaces(CustomDataLanguage::Html, Some(&folders[..]), &config),
        paths(&["/ws/html.json"])
    );
}

#[test]
fn duplicates_are_kept_and_output_is_stable() {
    let config = FakeConfig::default()
        .with_folder_value("css", "/ws", json!({ "customData": ["a.json", "./a.json"] }))
        .with_folder_value("css", "/other", json!({ "customData": ["../ws/a.json"] }));
    let folders = [folder("/ws"), folder("/other")];

    let first = custom_data_paths_in_workspaces(CSS, Some(&folders[..]), &config);
    assert_eq!(first, paths(&["/ws/a.json", "/ws/a.json", "/ws/a.json"]));
    assert_eq!(first, custom_data_paths_in_workspaces(CSS, Some(&folders[..]), &config));
}

use std::fs;
use std::path::Path;

use custom_data_server::custom_data::{
    custom_data_paths_from_extensions, CustomDataLanguage, ExtensionRegistry,
};
use custom_data_server::extension_registry::{load_extension, read_manifest, scan_extension_dirs, ManifestError};
use tempfile::tempdir;

fn write_manifest(dir: &Path, content: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join("package.json"), content).unwrap();
}

#[test]
fn scans_extensions_in_file_name_order() {
    let dir = tempdir().unwrap();
    let root = fs::canonicalize(dir.path()).unwrap();
    write_manifest(
        &root.join("zeta.theme-1.0.0"),
        r#"{ "publisher": "zeta", "name": "theme", "contributes": { "css": { "customData": ["z.json"] } } }"#,
    );
    write_manifest(
        &root.join("alpha.data-2.1.0"),
        r#"{ "publisher": "alpha", "name": "data", "contributes": { "css": { "customData": ["./a.json", "b/c.json"] } } }"#,
    );
    fs::create_dir_all(root.join("no-manifest")).unwrap();
    fs::write(root.join("extensions.json"), "[]").unwrap();

    let snapshot = scan_extension_dirs(&[root.clone()]);
    let ids: Vec<_> = snapshot.all().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["alpha.data", "zeta.theme"]);

    assert_eq!(
        custom_data_paths_from_extensions(CustomDataLanguage::Css, &snapshot),
        vec![
            root.join("alpha.data-2.1.0/a.json"),
            root.join("alpha.data-2.1.0/b/c.json"),
            root.join("zeta.theme-1.0.0/z.json"),
        ]
    );
}

#[test]
fn scans_multiple_dirs_in_given_order() {
    let dir = tempdir().unwrap();
    let root = fs::canonicalize(dir.path()).unwrap();
    let builtin = root.join("builtin");
    let user = root.join("user");
    write_manifest(&builtin.join("b"), r#"{ "name": "b" }"#);
    write_manifest(&user.join("a"), r#"{ "name": "a" }"#);

    let snapshot = scan_extension_dirs(&[user, builtin, root.join("missing")]);
    let ids: Vec<_> = snapshot.all().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[test]
fn unreadable_manifest_is_kept_without_contents() {
    let dir = tempdir().unwrap();
    let ext_dir = dir.path().join("broken");
    write_manifest(&ext_dir, "{ not json");

    let extension = load_extension(&ext_dir).unwrap();
    assert_eq!(extension.id, "broken");
    assert_eq!(extension.package_json, None);
    assert!(matches!(
        read_manifest(&ext_dir.join("package.json")),
        Err(ManifestError::Parse { .. })
    ));

    let snapshot = scan_extension_dirs(&[dir.path().to_path_buf()]);
    assert_eq!(snapshot.len(), 1);
    assert!(custom_data_paths_from_extensions(CustomDataLanguage::Css, &snapshot).is_empty());
}

#[test]
fn directory_without_manifest_is_not_an_extension() {
    let dir = tempdir().unwrap();
    assert!(load_extension(dir.path()).is_none());
    assert!(scan_extension_dirs(&[]).is_empty());
}

#[cfg(unix)]
#[test]
fn symlinked_extension_dirs_are_scanned() {
    let dir = tempdir().unwrap();
    let root = fs::canonicalize(dir.path()).unwrap();
    let checkout = root.join("checkout");
    write_manifest(
        &checkout,
        r#"{ "publisher": "acme", "name": "dev", "contributes": { "css": { "customData": ["d.json"] } } }"#,
    );
    let extensions = root.join("extensions");
    fs::create_dir_all(&extensions).unwrap();
    let linked = extensions.join("acme.dev-0.0.1");
    std::os::unix::fs::symlink(&checkout, &linked).unwrap();

    let snapshot = scan_extension_dirs(&[extensions]);
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.all()[0].id, "acme.dev");
    assert_eq!(
        custom_data_paths_from_extensions(CustomDataLanguage::Css, &snapshot),
        vec![linked.join("d.json")]
    );
}

use std::path::{Component, Path, PathBuf};
use tower_lsp_server::lsp_types::Uri;
use tower_lsp_server::UriExt;

/// Directory holding the per-folder settings file, relative to a folder root.
pub const SETTINGS_DIR: &str = ".vscode";
pub const SETTINGS_FILE: &str = "settings.json";
pub const MANIFEST_FILE: &str = "package.json";

pub fn uri_to_path_buf(uri: &Uri) -> Option<PathBuf> {
    uri.to_file_path().map(|p| p.into_owned())
}

/// Join `relative` onto `base` and normalize the result.
///
/// An absolute `relative` replaces `base` entirely. No file system access
/// happens here, so the result may name a file that does not exist.
#[must_use]
pub fn resolve_path(base: &Path, relative: &Path) -> PathBuf {
    normalize(&base.join(relative))
}

/// Lexically remove `.` components and fold `..` into their parent.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(normalized.components().next_back(), Some(Component::Normal(_))) {
                    normalized.pop();
                } else if !normalized.has_root() {
                    // Keep leading `..` of a relative path, there is nothing to pop.
                    normalized.push("..");
                }
            }
            Component::Normal(name) => normalized.push(name),
        }
    }
    normalized
}

pub fn settings_path_for_root(root: &Path) -> PathBuf {
    root.join(SETTINGS_DIR).join(SETTINGS_FILE)
}

/// Is this a `.vscode/settings.json` file?
pub fn is_settings_file(path: &Path) -> bool {
    path.file_name().is_some_and(|name| name == SETTINGS_FILE)
        && path
            .parent()
            .and_then(Path::file_name)
            .is_some_and(|dir| dir == SETTINGS_DIR)
}

pub fn is_manifest_file(path: &Path) -> bool {
    path.file_name().is_some_and(|name| name == MANIFEST_FILE)
}

use crate::custom_data::{
    ConfigurationInspection, ConfigurationInspector, CustomDataLanguage, WorkspaceFolder,
    CUSTOM_DATA_KEY,
};
use crate::utils::paths::settings_path_for_root;
use log::debug;
use regex::{Captures, Regex};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"("(?:[^"\\]|\\.)*")|//[^\n]*|/\*(?s:.*?)\*/"#)
        .expect("comment regex failed to compile")
});

static TRAILING_COMMA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"("(?:[^"\\]|\\.)*")|,(\s*[}\]])"#).expect("trailing comma regex failed to compile")
});

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{} does not contain a settings object", path.display())]
    NotAnObject { path: PathBuf },
}

/// Settings documents split by scope.
///
/// Keys may be flat (`"css.customData"`) or nested (`"css": { "customData" }`).
#[derive(Debug, Clone)]
pub struct SettingsStore {
    defaults: Map<String, Value>,
    user: Map<String, Value>,
    workspace: Map<String, Value>,
    folders: HashMap<PathBuf, Map<String, Value>>,
}

impl SettingsStore {
    pub fn new() -> Self {
        let mut defaults = Map::new();
        for language in [CustomDataLanguage::Css, CustomDataLanguage::Html] {
            defaults.insert(
                format!("{}.{}", language.section(), CUSTOM_DATA_KEY),
                Value::Array(vec![]),
            );
        }
        Self {
            defaults,
            user: Map::new(),
            workspace: Map::new(),
            folders: HashMap::new(),
        }
    }

    /// Replace the user scope. Anything other than an object clears it.
    pub fn set_user_settings(&mut self, settings: Value) {
        self.user = into_object(settings);
    }

    /// Replace the workspace scope. Anything other than an object clears it.
    pub fn set_workspace_settings(&mut self, settings: Value) {
        self.workspace = into_object(settings);
    }

    pub fn set_folder_settings(&mut self, root: PathBuf, settings: Map<String, Value>) {
        self.folders.insert(root, settings);
    }

    pub fn remove_folder(&mut self, root: &Path) {
        self.folders.remove(root);
    }

    /// (Re)load `<root>/.vscode/settings.json` into the folder scope.
    ///
    /// A missing file leaves the folder with no settings. On any other failure
    /// the folder scope is cleared and the error returned.
    pub fn load_folder(&mut self, root: &Path) -> Result<(), SettingsError> {
        match read_settings_file(&settings_path_for_root(root)) {
            Ok(settings) => {
                debug!("loaded {} folder settings from {}", settings.len(), root.display());
                self.set_folder_settings(root.to_path_buf(), settings);
                Ok(())
            }
            Err(SettingsError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                self.set_folder_settings(root.to_path_buf(), Map::new());
                Ok(())
            }
            Err(e) => {
                self.remove_folder(root);
                Err(e)
            }
        }
    }

    /// The effective value of `section` for `folder`, with folder settings
    /// taking precedence over workspace, user and default settings.
    pub fn merged(&self, section: &str, folder: &WorkspaceFolder) -> Option<Value> {
        let inspection = self.inspect(section, folder);
        let layers = [
            inspection.default_value,
            inspection.global_value,
            inspection.workspace_value,
            inspection.workspace_folder_value,
        ];

        let mut merged: Option<Map<String, Value>> = None;
        for layer in layers.into_iter().flatten() {
            if let Value::Object(layer) = layer {
                merged.get_or_insert_with(Map::new).extend(layer);
            }
        }
        merged.map(Value::Object)
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationInspector for SettingsStore {
    fn inspect(&self, section: &str, folder: &WorkspaceFolder) -> ConfigurationInspection {
        ConfigurationInspection {
            default_value: section_value(&self.defaults, section),
            global_value: section_value(&self.user, section),
            workspace_value: section_value(&self.workspace, section),
            workspace_folder_value: self
                .folders
                .get(&folder.root)
                .and_then(|settings| section_value(settings, section)),
        }
    }
}

fn into_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Gather `section` from both nested and flat keys. Flat keys win.
fn section_value(settings: &Map<String, Value>, section: &str) -> Option<Value> {
    let mut found = false;
    let mut result = Map::new();

    if let Some(Value::Object(nested)) = settings.get(section) {
        found = true;
        result.extend(nested.clone());
    }

    let prefix = format!("{section}.");
    for (key, value) in settings {
        if let Some(rest) = key.strip_prefix(&prefix) {
            found = true;
            insert_dotted(&mut result, rest, value.clone());
        }
    }

    found.then_some(Value::Object(result))
}

fn insert_dotted(map: &mut Map<String, Value>, key: &str, value: Value) {
    match key.split_once('.') {
        None => {
            map.insert(key.to_string(), value);
        }
        Some((head, rest)) => {
            let child = map
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            if let Value::Object(child) = child {
                insert_dotted(child, rest, value);
            }
        }
    }
}

pub fn read_settings_file(path: &Path) -> Result<Map<String, Value>, SettingsError> {
    let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_settings(&text).map_err(|e| match e {
        ParseFailure::Json(source) => SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        },
        ParseFailure::NotAnObject => SettingsError::NotAnObject {
            path: path.to_path_buf(),
        },
    })
}

#[derive(Debug)]
enum ParseFailure {
    Json(serde_json::Error),
    NotAnObject,
}

fn parse_settings(text: &str) -> Result<Map<String, Value>, ParseFailure> {
    let stripped = strip_jsonc(text);
    if stripped.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str::<Value>(&stripped).map_err(ParseFailure::Json)? {
        Value::Object(map) => Ok(map),
        _ => Err(ParseFailure::NotAnObject),
    }
}

fn keep_strings(caps: &Captures<'_>) -> String {
    match (caps.get(1), caps.get(2)) {
        (Some(string), _) => string.as_str().to_string(),
        (None, Some(close)) => close.as_str().to_string(),
        (None, None) => String::new(),
    }
}

/// Drop comments and trailing commas so `serde_json` accepts a settings file.
pub fn strip_jsonc(text: &str) -> String {
    let without_comments = COMMENT_RE.replace_all(text, keep_strings);
    TRAILING_COMMA_RE
        .replace_all(&without_comments, keep_strings)
        .into_owned()
}

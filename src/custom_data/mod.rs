pub mod extensions;
pub mod workspace;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

pub use extensions::custom_data_paths_from_extensions;
pub use workspace::custom_data_paths_in_workspaces;

/// Key holding the list of custom data files, both in settings sections and
/// in `contributes.<language>` of an extension manifest.
pub const CUSTOM_DATA_KEY: &str = "customData";

/// The language whose custom data is being collected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomDataLanguage {
    #[default]
    Css,
    Html,
}

impl CustomDataLanguage {
    /// Settings namespace, which is also the `contributes` key in manifests.
    #[must_use]
    pub fn section(self) -> &'static str {
        match self {
            Self::Css => "css",
            Self::Html => "html",
        }
    }
}

impl fmt::Display for CustomDataLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.section())
    }
}

/// A root directory open in the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceFolder {
    pub root: PathBuf,
    pub name: String,
}

impl WorkspaceFolder {
    pub fn new(root: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            name: name.into(),
        }
    }
}

/// The value of one settings section, split by the scope it was set at.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigurationInspection {
    pub default_value: Option<Value>,
    pub global_value: Option<Value>,
    pub workspace_value: Option<Value>,
    pub workspace_folder_value: Option<Value>,
}

/// Read access to configuration, scoped per (section, folder).
pub trait ConfigurationInspector {
    fn inspect(&self, section: &str, folder: &WorkspaceFolder) -> ConfigurationInspection;
}

/// An extension package known to the host.
#[derive(Debug, Clone, PartialEq)]
pub struct InstalledExtension {
    pub id: String,
    pub extension_path: PathBuf,
    /// Parsed `package.json`, if one could be read.
    pub package_json: Option<Value>,
}

/// Source of the installed extensions, in host order.
pub trait ExtensionRegistry {
    fn all(&self) -> &[InstalledExtension];
}

impl ExtensionRegistry for [InstalledExtension] {
    fn all(&self) -> &[InstalledExtension] {
        self
    }
}

impl ExtensionRegistry for Vec<InstalledExtension> {
    fn all(&self) -> &[InstalledExtension] {
        self
    }
}

/// Workspace folder paths followed by extension paths.
pub fn all_custom_data_paths(
    language: CustomDataLanguage,
    folders: Option<&[WorkspaceFolder]>,
    config: &impl ConfigurationInspector,
    registry: &(impl ExtensionRegistry + ?Sized),
) -> Vec<PathBuf> {
    let mut paths = custom_data_paths_in_workspaces(language, folders, config);
    paths.extend(custom_data_paths_from_extensions(language, registry));
    paths
}

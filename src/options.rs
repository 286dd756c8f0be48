use crate::custom_data::CustomDataLanguage;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

/// `initializationOptions` accepted by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerOptions {
    pub language: CustomDataLanguage,
    /// Directories holding one subdirectory per installed extension.
    pub extension_dirs: Vec<PathBuf>,
    /// User scope settings.
    pub settings: Value,
    /// Settings from a multi-root workspace file.
    pub workspace_settings: Value,
}

impl ServerOptions {
    /// Invalid options are logged and replaced by the defaults.
    pub fn from_initialization_options(options: Option<Value>) -> Self {
        let Some(options) = options else {
            return Self::default();
        };
        serde_json::from_value(options).unwrap_or_else(|e| {
            warn!("ignoring invalid initialization options: {e}");
            Self::default()
        })
    }
}

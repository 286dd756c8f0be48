use super::{ConfigurationInspector, CustomDataLanguage, WorkspaceFolder, CUSTOM_DATA_KEY};
use crate::utils::paths::resolve_path;
use log::debug;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Collect the custom data paths declared in each folder's own settings.
///
/// Only the folder-scoped value is read. A value set at user or workspace
/// scope is ignored even when the folder sets nothing. Entries that are not
/// strings are skipped.
pub fn custom_data_paths_in_workspaces(
    language: CustomDataLanguage,
    folders: Option<&[WorkspaceFolder]>,
    config: &impl ConfigurationInspector,
) -> Vec<PathBuf> {
    let mut data_paths = Vec::new();
    let Some(folders) = folders else {
        return data_paths;
    };

    for folder in folders {
        let inspection = config.inspect(language.section(), folder);
        let Some(entries) = inspection
            .workspace_folder_value
            .as_ref()
            .and_then(|section| section.get(CUSTOM_DATA_KEY))
            .and_then(Value::as_array)
        else {
            continue;
        };

        for entry in entries {
            match entry.as_str() {
                Some(relative) => data_paths.push(resolve_path(&folder.root, Path::new(relative))),
                None => debug!(
                    "skipping non-string {}.{} entry in {}: {}",
                    language, CUSTOM_DATA_KEY, folder.name, entry
                ),
            }
        }
    }

    data_paths
}

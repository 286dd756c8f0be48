use super::{CustomDataLanguage, ExtensionRegistry, CUSTOM_DATA_KEY};
use crate::utils::{paths::resolve_path, value::get_path};
use log::debug;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Collect the custom data paths contributed by extension manifests at
/// `contributes.<language>.customData`.
///
/// Entries are not filtered by type. A non-string entry is resolved from its
/// JSON text.
pub fn custom_data_paths_from_extensions(
    language: CustomDataLanguage,
    registry: &(impl ExtensionRegistry + ?Sized),
) -> Vec<PathBuf> {
    let mut data_paths = Vec::new();

    for extension in registry.all() {
        let Some(entries) = extension
            .package_json
            .as_ref()
            .and_then(|manifest| {
                get_path(manifest, &["contributes", language.section(), CUSTOM_DATA_KEY])
            })
            .and_then(Value::as_array)
        else {
            continue;
        };

        for entry in entries {
            let relative = match entry {
                Value::String(s) => s.clone(),
                other => {
                    debug!(
                        "resolving non-string {}.{} entry of {} from its JSON text: {}",
                        language, CUSTOM_DATA_KEY, extension.id, other
                    );
                    other.to_string()
                }
            };
            data_paths.push(resolve_path(&extension.extension_path, Path::new(&relative)));
        }
    }

    data_paths
}

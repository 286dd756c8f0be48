use crate::custom_data::{ExtensionRegistry, InstalledExtension};
use crate::ext::duration::DurationFormat;
use crate::utils::paths::MANIFEST_FILE;
use ignore::WalkBuilder;
use log::{debug, warn};
use serde_json::Value;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
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
}

/// The extensions found by one scan, in scan order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtensionSnapshot {
    extensions: Vec<InstalledExtension>,
}

impl ExtensionSnapshot {
    pub fn new(extensions: Vec<InstalledExtension>) -> Self {
        Self { extensions }
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

impl ExtensionRegistry for ExtensionSnapshot {
    fn all(&self) -> &[InstalledExtension] {
        &self.extensions
    }
}

/// Scan each directory for installed extensions.
///
/// Every direct subdirectory, or symlink to one, holding a `package.json` is
/// one extension. Directories are visited in the order given, and their
/// children in file name order, so the snapshot order is stable between scans.
pub fn scan_extension_dirs(dirs: &[PathBuf]) -> ExtensionSnapshot {
    let start = Instant::now();
    let mut extensions = Vec::new();

    for dir in dirs {
        let walker = WalkBuilder::new(dir)
            .standard_filters(false)
            .max_depth(Some(1))
            .follow_links(true)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("failed to scan extensions in {}: {e}", dir.display());
                    continue;
                }
            };
            if entry.depth() == 0 || !entry.file_type().is_some_and(|t| t.is_dir()) {
                continue;
            }
            if let Some(extension) = load_extension(entry.path()) {
                extensions.push(extension);
            }
        }
    }

    debug!(
        "scanned {} extensions in {}",
        extensions.len(),
        start.elapsed().log_str()
    );
    ExtensionSnapshot::new(extensions)
}

/// Load the extension installed at `extension_path`.
///
/// Returns `None` when the directory has no manifest. A manifest that cannot
/// be read or parsed is logged and the extension kept without one.
pub fn load_extension(extension_path: &Path) -> Option<InstalledExtension> {
    let manifest_path = extension_path.join(MANIFEST_FILE);
    let package_json = match read_manifest(&manifest_path) {
        Ok(manifest) => Some(manifest),
        Err(ManifestError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            return None;
        }
        Err(e) => {
            warn!("{e}");
            None
        }
    };

    Some(InstalledExtension {
        id: extension_id(extension_path, package_json.as_ref()),
        extension_path: extension_path.to_path_buf(),
        package_json,
    })
}

pub fn read_manifest(path: &Path) -> Result<Value, ManifestError> {
    let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ManifestError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// `publisher.name` from the manifest, else the directory name.
fn extension_id(extension_path: &Path, package_json: Option<&Value>) -> String {
    let manifest_id = package_json.and_then(|manifest| {
        let publisher = manifest.get("publisher")?.as_str()?;
        let name = manifest.get("name")?.as_str()?;
        Some(format!("{publisher}.{name}"))
    });

    manifest_id.unwrap_or_else(|| {
        extension_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    })
}

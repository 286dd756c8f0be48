use crate::custom_data::WorkspaceFolder;
use crate::ext::duration::DurationFormat;
use crate::options::ServerOptions;
use crate::server::Backend;
use crate::utils::paths::{is_manifest_file, is_settings_file, uri_to_path_buf};
use log::{debug, error, info};
use std::path::PathBuf;
use tokio::time::Instant;
use tower_lsp_server::lsp_types::{
    self, notification::DidChangeWatchedFiles, notification::Notification,
    DidChangeConfigurationParams, DidChangeWatchedFilesParams,
    DidChangeWatchedFilesRegistrationOptions, DidChangeWorkspaceFoldersParams, FileSystemWatcher,
    GlobPattern, InitializeParams, InitializeResult, OneOf, Registration, ServerCapabilities,
    ServerInfo, Uri, WorkspaceFoldersServerCapabilities, WorkspaceServerCapabilities,
};

const WATCHED_FILES: [&str; 2] = ["**/.vscode/settings.json", "**/package.json"];

pub async fn handle_initialize(backend: &Backend, params: InitializeParams) -> InitializeResult {
    let options = ServerOptions::from_initialization_options(params.initialization_options.clone());
    {
        let mut settings = backend.settings.write().await;
        settings.set_user_settings(options.settings.clone());
        settings.set_workspace_settings(options.workspace_settings.clone());
    }
    info!(
        "collecting {} custom data, extension dirs: {:?}",
        options.language, options.extension_dirs
    );
    *backend.options.write().await = options;

    *backend.can_watch_files.write().await = params
        .capabilities
        .workspace
        .as_ref()
        .and_then(|workspace| workspace.did_change_watched_files.as_ref())
        .and_then(|watched| watched.dynamic_registration)
        .unwrap_or(false);

    let folders = initial_workspace_folders(&params);
    if let Some(folders) = &folders {
        info!(
            "initial workspace roots: {:?}",
            folders.iter().map(|f| &f.root).collect::<Vec<_>>()
        );
    }
    *backend.workspace_folders.write().await = folders;
    backend.reload_all_folder_settings().await;

    InitializeResult {
        server_info: Some(ServerInfo {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }),
        capabilities: ServerCapabilities {
            workspace: Some(WorkspaceServerCapabilities {
                workspace_folders: Some(WorkspaceFoldersServerCapabilities {
                    supported: Some(true),
                    change_notifications: Some(OneOf::Left(true)),
                }),
                file_operations: None,
            }),
            ..ServerCapabilities::default()
        },
    }
}

pub async fn handle_initialized(backend: &Backend) {
    let start = Instant::now();

    if *backend.can_watch_files.read().await {
        register_file_watchers(backend).await;
    }
    backend.announce_custom_data().await;

    debug!("initialized in {}", start.elapsed().log_str());
}

async fn register_file_watchers(backend: &Backend) {
    let watchers = WATCHED_FILES
        .iter()
        .map(|glob| FileSystemWatcher {
            glob_pattern: GlobPattern::String((*glob).to_string()),
            kind: None,
        })
        .collect();
    let register_options =
        match serde_json::to_value(DidChangeWatchedFilesRegistrationOptions { watchers }) {
            Ok(value) => value,
            Err(e) => {
                error!("failed to encode file watchers: {e}");
                return;
            }
        };

    let registration = Registration {
        id: "custom-data-watchers".to_string(),
        method: DidChangeWatchedFiles::METHOD.to_string(),
        register_options: Some(register_options),
    };
    if let Err(e) = backend.client.register_capability(vec![registration]).await {
        error!("failed to register file watchers: {e}");
    }
}

pub async fn handle_did_change_workspace_folders(
    backend: &Backend,
    params: DidChangeWorkspaceFoldersParams,
) {
    let mut added = Vec::new();
    {
        let mut folders = backend.workspace_folders.write().await;
        let mut settings = backend.settings.write().await;

        for folder in params.event.removed {
            let Some(root) = uri_to_path_buf(&folder.uri) else {
                continue;
            };
            if let Some(folders) = folders.as_mut() {
                folders.retain(|f| f.root != root);
            }
            settings.remove_folder(&root);
            info!("removed root folder: {}", root.display());
        }

        for folder in params.event.added {
            let Some(folder) = to_workspace_folder(&folder.uri, folder.name) else {
                continue;
            };
            let folders = folders.get_or_insert_with(Vec::new);
            if folders.iter().any(|f| f.root == folder.root) {
                continue;
            }
            info!("added root folder: {}", folder.root.display());
            added.push(folder.root.clone());
            folders.push(folder);
        }
    }

    for root in added {
        backend.reload_folder_settings(&root).await;
    }
    backend.announce_custom_data().await;
}

pub async fn handle_did_change_configuration(
    backend: &Backend,
    params: DidChangeConfigurationParams,
) {
    if params.settings.is_object() {
        debug!("user settings changed");
        backend
            .settings
            .write()
            .await
            .set_user_settings(params.settings);
    }
    backend.reload_all_folder_settings().await;
    backend.announce_custom_data().await;
}

pub async fn handle_did_change_watched_files(
    backend: &Backend,
    params: DidChangeWatchedFilesParams,
) {
    let roots: Vec<PathBuf> = backend
        .workspace_folders
        .read()
        .await
        .iter()
        .flatten()
        .map(|folder| folder.root.clone())
        .collect();

    let mut is_relevant = false;
    for change in params.changes {
        let Some(path) = uri_to_path_buf(&change.uri) else {
            continue;
        };

        if is_settings_file(&path) {
            // `<root>/.vscode/settings.json`
            let Some(root) = path.parent().and_then(|p| p.parent()) else {
                continue;
            };
            if roots.iter().any(|r| r == root) {
                debug!("folder settings changed: {}", path.display());
                backend.reload_folder_settings(root).await;
                is_relevant = true;
            }
        } else if is_manifest_file(&path) {
            debug!("extension manifest changed: {}", path.display());
            is_relevant = true;
        }
    }

    if is_relevant {
        backend.announce_custom_data().await;
    }
}

fn to_workspace_folder(uri: &Uri, name: String) -> Option<WorkspaceFolder> {
    let root = uri_to_path_buf(uri)?;
    Some(WorkspaceFolder { root, name })
}

/// Prefer `workspaceFolders`, falling back to the root as a single folder.
fn initial_workspace_folders(params: &InitializeParams) -> Option<Vec<WorkspaceFolder>> {
    if let Some(folders) = &params.workspace_folders {
        return Some(
            folders
                .iter()
                .filter_map(|f: &lsp_types::WorkspaceFolder| {
                    to_workspace_folder(&f.uri, f.name.clone())
                })
                .collect(),
        );
    }

    let root = get_root_path(params)?;
    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Some(vec![WorkspaceFolder { root, name }])
}

#[allow(deprecated)]
fn get_root_path(params: &InitializeParams) -> Option<PathBuf> {
    // root_path is deprecated in favor of root_uri
    params
        .root_uri
        .as_ref()
        .and_then(uri_to_path_buf)
        .or_else(|| params.root_path.as_ref().map(PathBuf::from))
}

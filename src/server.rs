use crate::custom_data::{all_custom_data_paths, CustomDataLanguage, WorkspaceFolder};
use crate::ext::custom_data::{CssCustomDataChanged, CustomDataPathsParams, HtmlCustomDataChanged};
use crate::ext::duration::DurationFormat;
use crate::extension_registry::scan_extension_dirs;
use crate::handlers::{custom_data, lifecycle};
use crate::options::ServerOptions;
use crate::settings::SettingsStore;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::sync::RwLock;
use tower_lsp_server::jsonrpc::Result;
use tower_lsp_server::lsp_types::{
    DidChangeConfigurationParams, DidChangeWatchedFilesParams, DidChangeWorkspaceFoldersParams,
    InitializeParams, InitializeResult, InitializedParams,
};
use tower_lsp_server::{Client, LanguageServer};

#[derive(Debug)]
pub struct Backend {
    pub client: Client,
    pub options: RwLock<ServerOptions>,
    /// `None` until a workspace is opened.
    pub workspace_folders: RwLock<Option<Vec<WorkspaceFolder>>>,
    pub settings: RwLock<SettingsStore>,
    /// Whether the client lets us register file watchers.
    pub can_watch_files: RwLock<bool>,
}

impl Backend {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            options: RwLock::new(ServerOptions::default()),
            workspace_folders: RwLock::new(None),
            settings: RwLock::new(SettingsStore::new()),
            can_watch_files: RwLock::new(false),
        }
    }

    /// Recompute the custom data paths from the current folders, settings and
    /// installed extensions.
    pub async fn collect_custom_data_paths(&self) -> Vec<PathBuf> {
        let start = Instant::now();
        let (language, extension_dirs) = {
            let options = self.options.read().await;
            (options.language, options.extension_dirs.clone())
        };
        let extensions = scan_extension_dirs(&extension_dirs);
        let folders = self.workspace_folders.read().await;
        let settings = self.settings.read().await;

        let paths = all_custom_data_paths(
            language,
            folders.as_deref(),
            &*settings,
            &extensions,
        );

        debug!(
            "collected {} {} custom data paths in {}",
            paths.len(),
            language,
            start.elapsed().log_str()
        );
        paths
    }

    /// Send the freshly collected paths to the client.
    pub async fn announce_custom_data(&self) {
        let language = self.options.read().await.language;
        let paths = path_strings(self.collect_custom_data_paths().await);
        info!("announcing {} {language} custom data paths", paths.len());

        match language {
            CustomDataLanguage::Css => {
                self.client
                    .send_notification::<CssCustomDataChanged>(paths)
                    .await;
            }
            CustomDataLanguage::Html => {
                self.client
                    .send_notification::<HtmlCustomDataChanged>(paths)
                    .await;
            }
        }
    }

    /// Reload the settings file of the folder rooted at `root`.
    pub async fn reload_folder_settings(&self, root: &Path) {
        if let Err(e) = self.settings.write().await.load_folder(root) {
            warn!("{e}");
        }
    }

    pub async fn reload_all_folder_settings(&self) {
        let roots: Vec<PathBuf> = self
            .workspace_folders
            .read()
            .await
            .iter()
            .flatten()
            .map(|folder| folder.root.clone())
            .collect();
        for root in roots {
            self.reload_folder_settings(&root).await;
        }
    }

    pub async fn custom_data_paths(&self, params: CustomDataPathsParams) -> Result<Vec<String>> {
        custom_data::handle_custom_data_paths(self, params).await
    }
}

pub fn path_strings(paths: Vec<PathBuf>) -> Vec<String> {
    paths
        .into_iter()
        .map(|path| path.to_string_lossy().into_owned())
        .collect()
}

impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        info!("Initializing server...");
        Ok(lifecycle::handle_initialize(self, params).await)
    }

    async fn initialized(&self, _: InitializedParams) {
        lifecycle::handle_initialized(self).await;
    }

    async fn shutdown(&self) -> Result<()> {
        info!("Shutting down server...");
        Ok(())
    }

    async fn did_change_workspace_folders(&self, params: DidChangeWorkspaceFoldersParams) {
        lifecycle::handle_did_change_workspace_folders(self, params).await;
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        lifecycle::handle_did_change_configuration(self, params).await;
    }

    async fn did_change_watched_files(&self, params: DidChangeWatchedFilesParams) {
        lifecycle::handle_did_change_watched_files(self, params).await;
    }
}

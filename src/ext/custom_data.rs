use serde::{Deserialize, Serialize};
use tower_lsp_server::lsp_types::{notification::Notification, request::Request};

/// Sent to the client whenever the CSS custom data paths are recomputed.
#[derive(Debug)]
pub enum CssCustomDataChanged {}

impl Notification for CssCustomDataChanged {
    type Params = Vec<String>;
    const METHOD: &'static str = "css/customDataChanged";
}

/// Sent to the client whenever the HTML custom data paths are recomputed.
#[derive(Debug)]
pub enum HtmlCustomDataChanged {}

impl Notification for HtmlCustomDataChanged {
    type Params = Vec<String>;
    const METHOD: &'static str = "html/customDataChanged";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomDataPathsParams {}

/// Ask the server for the current custom data paths.
#[derive(Debug)]
pub enum CustomDataPaths {}

impl Request for CustomDataPaths {
    type Params = CustomDataPathsParams;
    type Result = Vec<String>;
    const METHOD: &'static str = "customData/paths";
}

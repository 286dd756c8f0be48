use crate::ext::custom_data::CustomDataPathsParams;
use crate::server::{path_strings, Backend};
use tower_lsp_server::jsonrpc::Result;

pub async fn handle_custom_data_paths(
    backend: &Backend,
    _: CustomDataPathsParams,
) -> Result<Vec<String>> {
    Ok(path_strings(backend.collect_custom_data_paths().await))
}

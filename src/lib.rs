use crate::ext::custom_data::CustomDataPaths;
use crate::lsp_logger::LspLogger;
use crate::server::Backend;
use log::info;
use tower_lsp_server::lsp_types::request::Request;
use tower_lsp_server::{LspService, Server};

pub mod custom_data;
pub mod ext;
pub mod extension_registry;
pub mod handlers;
pub mod lsp_logger;
pub mod options;
pub mod server;
pub mod settings;
pub mod utils;

pub async fn run() {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = build_service();

    info!("Starting server v{}...", env!("CARGO_PKG_VERSION"));
    Server::new(stdin, stdout, socket).serve(service).await;
}

fn build_service() -> (LspService<Backend>, tower_lsp_server::ClientSocket) {
    LspService::build(|client| {
        let logger = LspLogger::new(client.clone());
        if let Err(e) = log::set_boxed_logger(Box::new(logger)) {
            eprintln!("Error setting logger: {}", e);
        }
        log::set_max_level(log::LevelFilter::Debug);

        Backend::new(client)
    })
    .custom_method(CustomDataPaths::METHOD, Backend::custom_data_paths)
    .finish()
}

use log::{Level, Log, Metadata, Record};
use tower_lsp_server::lsp_types::MessageType;
use tower_lsp_server::Client;

fn level_to_message_type(level: Level) -> MessageType {
    match level {
        Level::Error => MessageType::ERROR,
        Level::Warn => MessageType::WARNING,
        Level::Info => MessageType::INFO,
        Level::Debug | Level::Trace => MessageType::LOG,
    }
}

/// Forwards log records to the client as `window/logMessage`.
#[derive(Debug)]
pub struct LspLogger {
    client: Client,
}

impl LspLogger {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl Log for LspLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        // The directory walker is chatty at debug level.
        if record.target().starts_with("ignore") || record.target().starts_with("globset") {
            return;
        }

        let client = self.client.clone();
        let message_type = level_to_message_type(record.level());
        let message = format!("[{}] {}", record.target(), record.args());

        // Logging can happen outside of the server's runtime, e.g. in unit tests.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                client.log_message(message_type, message).await;
            });
        }
    }

    fn flush(&self) {}
}

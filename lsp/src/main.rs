mod config;
mod convert;
mod server;

use log::LevelFilter;
use lsp_server::Connection;
use lsp_types::{
    CompletionOptions, HoverProviderCapability, InitializeParams, ServerCapabilities,
    TextDocumentSyncCapability, TextDocumentSyncKind,
};
use simple_logger::SimpleLogger;
use std::error::Error;

use crate::config::Settings;
use crate::server::Server;

pub type ServerResult<T> = Result<T, Box<dyn Error + Sync + Send>>;

fn main() -> ServerResult<()> {
    // 1. 初始化日志 (输出到 stderr，因为 stdout 被 LSP 占用了)，RUST_LOG 可覆盖级别
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .env()
        .init()?;
    log::info!("fourgl-lsp {} starting...", env!("CARGO_PKG_VERSION"));

    // 2. 建立连接 (基于 stdio)
    let (connection, io_threads) = Connection::stdio();

    // 3. 初始化握手：声明支持的功能
    let server_capabilities = serde_json::to_value(capabilities())?;
    let initialization_params = connection.initialize(server_capabilities)?;
    let params: InitializeParams = serde_json::from_value(initialization_params)?;

    let settings = match params.initialization_options {
        Some(options) => Settings::from_json(options).unwrap_or_else(|err| {
            log::warn!("ignoring invalid initializationOptions: {}", err);
            Settings::default()
        }),
        None => Settings::default(),
    };
    log::info!("initialized with {:?}", settings);

    Server::new(&connection, settings).run()?;
    io_threads.join()?;

    log::info!("fourgl-lsp shutting down");
    Ok(())
}

fn capabilities() -> ServerCapabilities {
    ServerCapabilities {
        // 全量同步：每次变动都发整个文件内容
        text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),
        completion_provider: Some(CompletionOptions {
            trigger_characters: Some(vec![".".to_string(), " ".to_string(), "(".to_string()]),
            ..Default::default()
        }),
        hover_provider: Some(HoverProviderCapability::Simple(true)),
        ..Default::default()
    }
}

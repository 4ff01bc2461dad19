use std::collections::HashMap;

use fourgl::Workspace;
use fourgl::source::{LANGUAGE_ID, is_fourgl};
use lsp_server::{
    Connection, ErrorCode, ExtractError, Message, Notification, Request, RequestId, Response,
};
use lsp_types::notification::{
    DidChangeConfiguration, DidChangeTextDocument, DidCloseTextDocument, DidOpenTextDocument,
    Notification as _, PublishDiagnostics,
};
use lsp_types::request::{Completion, HoverRequest, Request as _};
use lsp_types::{
    CompletionParams, CompletionResponse, DidChangeConfigurationParams,
    DidChangeTextDocumentParams, DidCloseTextDocumentParams, DidOpenTextDocumentParams,
    HoverParams, PublishDiagnosticsParams, Uri,
};

use crate::ServerResult;
use crate::config::Settings;
use crate::convert;

/// 服务端状态。消息按到达顺序逐条处理，不存在并发访问。
pub struct Server<'a> {
    connection: &'a Connection,
    workspace: Workspace,
    settings: Settings,
    /// 已接管文档的协议 URI，重新发布诊断时要用
    uris: HashMap<String, Uri>,
}

impl<'a> Server<'a> {
    pub fn new(connection: &'a Connection, settings: Settings) -> Self {
        Self {
            connection,
            workspace: Workspace::new(),
            settings,
            uris: HashMap::new(),
        }
    }

    pub fn run(mut self) -> ServerResult<()> {
        log::info!("fourgl-lsp initialized!");

        let connection = self.connection;
        for msg in &connection.receiver {
            match msg {
                Message::Request(req) => {
                    if connection.handle_shutdown(&req)? {
                        return Ok(());
                    }
                    self.handle_request(req)?;
                }
                Message::Notification(not) => self.handle_notification(not)?,
                Message::Response(resp) => {
                    log::debug!("ignoring response {:?}", resp.id);
                }
            }
        }
        Ok(())
    }

    // ==========================================
    // Requests
    // ==========================================

    fn handle_request(&mut self, req: Request) -> ServerResult<()> {
        let method = req.method.clone();
        let response = match method.as_str() {
            Completion::METHOD => self.answer::<Completion>(req, Self::on_completion),
            HoverRequest::METHOD => self.answer::<HoverRequest>(req, Self::on_hover),
            _ => {
                log::warn!("unhandled request: {}", method);
                Response::new_err(
                    req.id,
                    ErrorCode::MethodNotFound as i32,
                    format!("method not supported: {}", method),
                )
            }
        };
        self.connection.sender.send(Message::Response(response))?;
        Ok(())
    }

    /// 解出参数并调用处理函数；参数不合法时回 InvalidParams
    fn answer<R>(&self, req: Request, handler: fn(&Self, R::Params) -> R::Result) -> Response
    where
        R: lsp_types::request::Request,
    {
        let id = req.id.clone();
        match cast::<R>(req) {
            Ok((id, params)) => Response::new_ok(id, handler(self, params)),
            Err(ExtractError::JsonError { method, error }) => {
                log::warn!("invalid params for {}: {}", method, error);
                Response::new_err(id, ErrorCode::InvalidParams as i32, error.to_string())
            }
            Err(ExtractError::MethodMismatch(req)) => Response::new_err(
                req.id,
                ErrorCode::MethodNotFound as i32,
                format!("method not supported: {}", req.method),
            ),
        }
    }

    fn on_completion(&self, params: CompletionParams) -> Option<CompletionResponse> {
        if !self.settings.enable_completion {
            return Some(CompletionResponse::Array(Vec::new()));
        }
        let doc = params.text_document_position;
        let pos = convert::from_position(doc.position);
        let items = self
            .workspace
            .completions(doc.text_document.uri.as_str(), pos)
            .into_iter()
            .map(convert::completion_item)
            .collect();
        Some(CompletionResponse::Array(items))
    }

    fn on_hover(&self, params: HoverParams) -> Option<lsp_types::Hover> {
        let doc = params.text_document_position_params;
        let pos = convert::from_position(doc.position);
        self.workspace
            .hover(doc.text_document.uri.as_str(), pos)
            .map(convert::hover)
    }

    // ==========================================
    // Notifications
    // ==========================================

    fn handle_notification(&mut self, not: Notification) -> ServerResult<()> {
        let method = not.method.clone();
        match method.as_str() {
            DidOpenTextDocument::METHOD => {
                if let Some(params) = cast_notification::<DidOpenTextDocument>(not) {
                    self.on_did_open(params)?;
                }
            }
            DidChangeTextDocument::METHOD => {
                if let Some(params) = cast_notification::<DidChangeTextDocument>(not) {
                    self.on_did_change(params)?;
                }
            }
            DidCloseTextDocument::METHOD => {
                if let Some(params) = cast_notification::<DidCloseTextDocument>(not) {
                    self.on_did_close(params)?;
                }
            }
            DidChangeConfiguration::METHOD => {
                if let Some(params) = cast_notification::<DidChangeConfiguration>(not) {
                    self.on_did_change_configuration(params)?;
                }
            }
            _ => log::debug!("unhandled notification: {}", method),
        }
        Ok(())
    }

    fn on_did_open(&mut self, params: DidOpenTextDocumentParams) -> ServerResult<()> {
        let doc = params.text_document;
        if doc.language_id != LANGUAGE_ID && !is_fourgl(doc.uri.as_str()) {
            log::debug!("not a 4GL document, skipping {}", doc.uri.as_str());
            return Ok(());
        }

        let key = doc.uri.as_str().to_string();
        self.workspace.on_document_changed(&key, doc.version, doc.text);
        self.uris.insert(key.clone(), doc.uri);
        self.publish_diagnostics(&key, Some(doc.version))
    }

    fn on_did_change(&mut self, params: DidChangeTextDocumentParams) -> ServerResult<()> {
        let key = params.text_document.uri.as_str().to_string();
        if !self.uris.contains_key(&key) {
            return Ok(());
        }
        let version = params.text_document.version;

        // 全量同步：最后一个变更就是完整文本
        if let Some(change) = params.content_changes.into_iter().last() {
            self.workspace.on_document_changed(&key, version, change.text);
            self.publish_diagnostics(&key, Some(version))?;
        }
        Ok(())
    }

    fn on_did_close(&mut self, params: DidCloseTextDocumentParams) -> ServerResult<()> {
        let key = params.text_document.uri.as_str().to_string();
        let Some(uri) = self.uris.remove(&key) else {
            return Ok(());
        };
        self.workspace.on_document_closed(&key);
        self.send_diagnostics(uri, Vec::new(), None)
    }

    fn on_did_change_configuration(
        &mut self,
        params: DidChangeConfigurationParams,
    ) -> ServerResult<()> {
        match Settings::from_json(params.settings) {
            Ok(settings) => {
                log::info!("settings changed: {:?}", settings);
                self.settings = settings;
            }
            Err(err) => {
                log::warn!("ignoring invalid settings: {}", err);
                return Ok(());
            }
        }

        // 设置变化后重新发布所有打开文档的诊断
        for key in self.workspace.open_uris() {
            let version = self
                .workspace
                .documents
                .get_by_uri(&key)
                .map(|d| d.version);
            self.publish_diagnostics(&key, version)?;
        }
        Ok(())
    }

    // ==========================================
    // Diagnostics
    // ==========================================

    fn publish_diagnostics(&self, key: &str, version: Option<i32>) -> ServerResult<()> {
        let Some(uri) = self.uris.get(key) else {
            return Ok(());
        };

        let diagnostics = if self.settings.enable_diagnostics {
            self.workspace
                .diagnostics(key)
                .into_iter()
                .take(self.settings.max_number_of_problems)
                .map(convert::diagnostic)
                .collect()
        } else {
            Vec::new()
        };

        log::debug!("publishing {} diagnostics for {}", diagnostics.len(), key);
        self.send_diagnostics(uri.clone(), diagnostics, version)
    }

    fn send_diagnostics(
        &self,
        uri: Uri,
        diagnostics: Vec<lsp_types::Diagnostic>,
        version: Option<i32>,
    ) -> ServerResult<()> {
        let params = PublishDiagnosticsParams::new(uri, diagnostics, version);
        let not = Notification::new(PublishDiagnostics::METHOD.to_string(), params);
        self.connection.sender.send(Message::Notification(not))?;
        Ok(())
    }
}

// 辅助函数：尝试将通用的 Request 转换为具体的 LSP Request 类型
fn cast<R>(req: Request) -> Result<(RequestId, R::Params), ExtractError<Request>>
where
    R: lsp_types::request::Request,
    R::Params: serde::de::DeserializeOwned,
{
    req.extract(R::METHOD)
}

/// 通知没有回复通道，参数不合法只记日志
fn cast_notification<N>(not: Notification) -> Option<N::Params>
where
    N: lsp_types::notification::Notification,
    N::Params: serde::de::DeserializeOwned,
{
    match not.extract(N::METHOD) {
        Ok(params) => Some(params),
        Err(ExtractError::JsonError { method, error }) => {
            log::warn!("invalid params for {}: {}", method, error);
            None
        }
        Err(ExtractError::MethodMismatch(not)) => {
            log::warn!("unexpected notification {}", not.method);
            None
        }
    }
}

//! JSON-lines command protocol
//!
//! 1 行 1 リクエスト `{"id", "method", "params"}` を読み、
//! 1 行 1 レスポンス `{"id", "result"}` / `{"id", "error"}` を書く。
//! 書き込み系コマンドは外部クライアントからの操作として扱う。

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{
    Deserialize,
    Serialize,
};
use serde_json::Value;
use thiserror::Error;
use tokio::io::{
    AsyncBufRead,
    AsyncBufReadExt,
    AsyncWrite,
    AsyncWriteExt,
};

use crate::helper::{
    HelperError,
    TRANSLATION_HELPER,
    ViewHelpers,
    register_translation_helper,
};
use crate::service::{
    I18n,
    RemoveTarget,
    ServiceError,
    Translations,
};

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    InvalidRequest(#[source] serde_json::Error),

    #[error("Unknown method: {method}")]
    UnknownMethod { method: String },

    #[error("Invalid params for {method}: {source}")]
    InvalidParams {
        method: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Helper(#[from] HelperError),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    #[must_use]
    pub const fn success(id: Value, result: Value) -> Self {
        Self { id, result: Some(result), error: None }
    }

    #[must_use]
    pub const fn failure(id: Value, error: String) -> Self {
        Self { id, result: None, error: Some(error) }
    }
}

/// `insert` のパラメータ
#[derive(Debug, Deserialize)]
struct InsertParams {
    /// 対象言語
    language: String,
    /// 基準文字列、ペアの配列、またはオブジェクト
    strings: Value,
    /// `strings` が文字列のときの翻訳
    translated: Option<Value>,
}

/// `remove` のパラメータ
#[derive(Debug, Deserialize)]
struct RemoveParams {
    /// 対象言語
    language: String,
    /// 省略時は言語ごと削除
    strings: Option<Value>,
}

/// 言語だけを受け取るコマンドのパラメータ
#[derive(Debug, Deserialize)]
struct LanguageParams {
    /// 言語コード
    language: String,
}

/// `translate` のパラメータ
#[derive(Debug, Deserialize)]
struct TranslateParams {
    /// 基準文字列
    base: String,
}

/// `t` のパラメータ
#[derive(Debug, Deserialize)]
struct HelperParams {
    /// `[base, ...args]`
    args: Vec<Value>,
}

/// One client connection.
#[derive(Debug)]
pub struct Session {
    /// Shared service
    i18n: Arc<I18n>,
    /// Helpers callable through `t`
    helpers: ViewHelpers,
}

impl Session {
    #[must_use]
    pub fn new(i18n: Arc<I18n>) -> Self {
        let mut helpers = ViewHelpers::new();
        register_translation_helper(&mut helpers, Arc::clone(&i18n));
        Self { i18n, helpers }
    }

    /// Handles one request line. Every failure becomes an `error` response.
    #[must_use]
    pub fn handle_line(&self, line: &str) -> Response {
        let request: Request = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                let error = ServerError::InvalidRequest(e);
                tracing::error!("{error}");
                return Response::failure(Value::Null, error.to_string());
            }
        };

        tracing::debug!(method = %request.method, id = %request.id, "Request");

        match self.dispatch(&request.method, request.params) {
            Ok(result) => Response::success(request.id, result),
            Err(error) => {
                tracing::error!(method = %request.method, "{error}");
                Response::failure(request.id, error.to_string())
            }
        }
    }

    /// Runs `method` and returns its result.
    pub fn dispatch(&self, method: &str, params: Value) -> Result<Value, ServerError> {
        match method {
            "insert" => {
                let params: InsertParams = parse_params(method, params)?;
                let translations =
                    Translations::from_json(&params.strings, params.translated.as_ref())?;
                let inserted = self.i18n.remote().insert(&params.language, translations)?;
                Ok(Value::from(inserted))
            }
            "remove" => {
                let params: RemoveParams = parse_params(method, params)?;
                let target = RemoveTarget::from_json(params.strings.as_ref())?;
                let removed = self.i18n.remote().remove(&params.language, target)?;
                Ok(Value::from(removed))
            }
            "getLanguage" => Ok(Value::String(self.i18n.language())),
            "setLanguage" => {
                let params: LanguageParams = parse_params(method, params)?;
                self.i18n.set_language(params.language);
                Ok(Value::Null)
            }
            "translate" => {
                let params: TranslateParams = parse_params(method, params)?;
                Ok(Value::String(self.i18n.translate(&params.base)))
            }
            "t" => {
                let params: HelperParams = parse_params(method, params)?;
                Ok(Value::String(self.helpers.call(TRANSLATION_HELPER, &params.args)?))
            }
            "publish" => {
                let params: LanguageParams = parse_params(method, params)?;
                let records = self.i18n.publish(&params.language);
                Ok(serde_json::to_value(records)?)
            }
            _ => Err(ServerError::UnknownMethod { method: method.to_string() }),
        }
    }
}

/// Deserializes the params of `method`.
fn parse_params<T: DeserializeOwned>(method: &str, params: Value) -> Result<T, ServerError> {
    serde_json::from_value(params)
        .map_err(|source| ServerError::InvalidParams { method: method.to_string(), source })
}

/// Serves requests from `reader` until end of input.
///
/// Blank lines are ignored.
///
/// # Errors
/// I/O failures on `reader` or `writer`.
pub async fn serve<R, W>(session: &Session, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = session.handle_line(&line);
        let mut encoded = serde_json::to_string(&response)?;
        encoded.push('\n');
        writer.write_all(encoded.as_bytes()).await?;
        writer.flush().await?;
    }
    tracing::info!("Input closed");
    Ok(())
}

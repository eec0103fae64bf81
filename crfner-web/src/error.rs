//! Erros da camada HTTP e sua tradução em respostas JSON.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use crfner_core::NerError;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ServerError {
    /// Requisição sem o campo de texto obrigatório, JSON inválido ou multipart sem arquivo.
    #[error("{0}")]
    MalformedInput(String),

    /// Falha ao extrair texto do documento enviado (PDF corrompido, DOCX inválido...).
    #[error("{0}")]
    ExtractionFailure(String),

    /// Erro vindo do núcleo de rotulagem.
    #[error(transparent)]
    Pipeline(#[from] NerError),

    #[error("{0}")]
    Internal(String),
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::MalformedInput(_) => StatusCode::BAD_REQUEST,
            ServerError::ExtractionFailure(_)
            | ServerError::Pipeline(_)
            | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ServerError::MalformedInput(_) => "malformed_input",
            ServerError::ExtractionFailure(_) => "extraction_failure",
            ServerError::Pipeline(NerError::SchemaMismatch { .. }) => "schema_mismatch",
            ServerError::Pipeline(_) => "pipeline_error",
            ServerError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();
        if status.is_server_error() {
            error!(kind = self.kind(), %message, "request failed");
        } else {
            warn!(kind = self.kind(), %message, "request rejected");
        }

        let body = json!({
            "error": message,
            "kind": self.kind(),
        });
        (status, Json(body)).into_response()
    }
}

pub type ServerResult<T> = Result<T, ServerError>;

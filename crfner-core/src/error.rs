//! # Erros do Núcleo
//!
//! O núcleo não levanta erros para sequências de tokens bem formadas: extração
//! e montagem são funções puras. Os erros abaixo só aparecem na fronteira com
//! o modelo pré-treinado (carregamento e validação do esquema de features) ou
//! quando um preditor externo quebra o contrato de alinhamento.

use std::path::PathBuf;

use thiserror::Error;

/// Erros produzidos pelo núcleo de rotulagem.
#[derive(Debug, Error)]
pub enum NerError {
    /// O modelo foi treinado com um esquema de features diferente do produzido
    /// pelo extrator. Sem esta verificação a qualidade das predições degradaria
    /// silenciosamente.
    #[error("feature schema mismatch: missing {missing:?}, unexpected {unexpected:?}")]
    SchemaMismatch {
        /// Chaves do extrator que o modelo não conhece.
        missing: Vec<String>,
        /// Chaves conhecidas pelo modelo que o extrator não produz.
        unexpected: Vec<String>,
    },

    /// O preditor devolveu um número de rótulos diferente do número de tokens.
    #[error("label count mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// O artefato do modelo é inválido (rótulos vazios, matriz de transição incoerente...).
    #[error("invalid model at {path}: {reason}")]
    ModelLoad { path: PathBuf, reason: String },

    /// Modelo montado em código com rótulos ou dimensões incoerentes.
    #[error("invalid model: {0}")]
    InvalidModel(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Resultado padrão do núcleo.
pub type Result<T> = std::result::Result<T, NerError>;

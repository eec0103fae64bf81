//! # crfner-web — Camada HTTP do serviço de rotulagem
//!
//! Expõe o [`crfner_core::LabelingPipeline`] via axum: texto livre em `/predict`,
//! documentos PDF/DOCX/texto em `/upload`. A extração de texto dos documentos
//! vive aqui ([`extract`]); o núcleo só recebe strings.

pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod state;

pub use api::create_router;
pub use config::{CliArgs, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use state::AppState;

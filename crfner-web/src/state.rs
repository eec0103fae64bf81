//! Estado compartilhado da aplicação

use crfner_core::LabelingPipeline;

use crate::config::ServerConfig;

/// Contexto construído uma vez na inicialização e compartilhado via `Arc`.
///
/// O pipeline é somente leitura: requisições concorrentes usam o mesmo modelo
/// sem nenhuma trava.
#[derive(Debug)]
pub struct AppState {
    pub pipeline: LabelingPipeline,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(pipeline: LabelingPipeline, config: ServerConfig) -> Self {
        Self { pipeline, config }
    }
}

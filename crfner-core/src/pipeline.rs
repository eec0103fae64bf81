//! # Pipeline de Rotulagem
//!
//! Conecta os estágios em sequência estrita, sem estado mutável compartilhado:
//!
//! ```text
//! texto → normalize → tokenize → extract_features → predict → assemble → AnnotationResult
//! ```
//!
//! O [`LabelingPipeline`] é o contexto da aplicação: construído uma vez na
//! inicialização (o modelo é carregado só nessa hora) e passado por referência
//! a quem precisa rotular texto.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::annotation::{assemble, AnnotationResult};
use crate::error::{NerError, Result};
use crate::features::{extract_features, FeatureMap};
use crate::normalizer::normalize;
use crate::predictor::{validate_schema, CrfPredictor, LabelPredictor};
use crate::tokenizer::{tokenize, Token};

/// Um token acompanhado das features que o modelo veria.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenFeatures {
    pub token: Token,
    pub features: FeatureMap,
}

/// O pipeline de rotulagem, dono do preditor carregado.
#[derive(Clone)]
pub struct LabelingPipeline {
    predictor: Arc<dyn LabelPredictor>,
}

impl LabelingPipeline {
    /// Monta o pipeline, recusando um preditor cujo esquema declarado
    /// difere das features produzidas aqui.
    pub fn new(predictor: Arc<dyn LabelPredictor>) -> Result<Self> {
        if let Some(schema) = predictor.schema() {
            validate_schema(schema)?;
        }
        Ok(Self { predictor })
    }

    /// Carrega o modelo CRF do caminho dado e monta o pipeline.
    pub fn from_model_path(path: impl AsRef<Path>) -> Result<Self> {
        let predictor = CrfPredictor::load(path)?;
        Self::new(Arc::new(predictor))
    }

    pub fn predictor(&self) -> &dyn LabelPredictor {
        self.predictor.as_ref()
    }

    /// Normaliza e tokeniza o texto.
    pub fn tokens(&self, text: &str) -> Vec<Token> {
        tokenize(&normalize(text))
    }

    /// Executa o pipeline até a extração de features, sem chamar o modelo.
    pub fn inspect(&self, text: &str) -> Vec<TokenFeatures> {
        let tokens = self.tokens(text);
        let features = extract_features(&tokens);
        tokens
            .into_iter()
            .zip(features)
            .map(|(token, features)| TokenFeatures { token, features })
            .collect()
    }

    /// Rotula o texto inteiro como uma única sequência.
    ///
    /// Texto vazio ou só com espaços produz uma lista vazia de anotações
    /// sem consultar o modelo.
    pub fn annotate(&self, text: &str) -> Result<AnnotationResult> {
        let start = Instant::now();
        let tokens = self.tokens(text);

        if tokens.is_empty() {
            return Ok(AnnotationResult {
                phrase: text.to_string(),
                annotations: vec![],
            });
        }

        let features = extract_features(&tokens);
        let labels = self.predictor.predict(&features)?;
        if labels.len() != features.len() {
            return Err(NerError::LengthMismatch {
                expected: features.len(),
                actual: labels.len(),
            });
        }
        let annotations = assemble(&tokens, labels)?;

        debug!(
            chars = text.len(),
            tokens = annotations.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "text annotated"
        );

        Ok(AnnotationResult {
            phrase: text.to_string(),
            annotations,
        })
    }
}

impl std::fmt::Debug for LabelingPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelingPipeline")
            .field("labels", &self.predictor.labels())
            .finish()
    }
}

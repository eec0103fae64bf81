//! # crfner-core — Rotulagem de Tokens com CRF
//!
//! Este crate implementa o núcleo determinístico de um serviço de reconhecimento
//! de entidades nomeadas em francês: dado um texto livre, cada token recebe um
//! rótulo previsto por um modelo CRF pré-treinado.
//!
//! ## Arquitetura do Sistema
//!
//! O dado flui por um pipeline linear, cada estágio produzindo uma nova sequência:
//!
//! 1.  **Normalização** ([`normalizer`]): transliteração para a forma sem acentos.
//! 2.  **Tokenização** ([`tokenizer`]): o texto é dividido em tokens com as regras do francês.
//! 3.  **Extração de Features** ([`features`]): cada token vira um [`FeatureMap`] de esquema fixo.
//! 4.  **Predição** ([`predictor`]): um [`LabelPredictor`] devolve um rótulo por token
//!     (o [`CrfPredictor`] decodifica com [`viterbi`] sobre os pesos de [`crf`]).
//! 5.  **Montagem** ([`annotation`]): pares `{mot, annotation}` na ordem dos tokens.
//!
//! Invariante: tokens, features e rótulos têm sempre o mesmo tamanho, e o índice
//! `i` se refere ao mesmo token em todas as sequências.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use std::sync::Arc;
//! use crfner_core::{CrfModel, CrfPredictor, LabelingPipeline};
//!
//! let mut model = CrfModel::new(["O", "B-PER", "B-LOC"]);
//! model.set_state_weight("word:Jean", "B-PER", 2.0);
//! model.set_state_weight("word:Paris", "B-LOC", 2.0);
//!
//! let pipeline = LabelingPipeline::new(Arc::new(CrfPredictor::new(model)?))?;
//! let result = pipeline.annotate("Jean habite à Paris")?;
//!
//! for annotation in &result.annotations {
//!     println!("{} -> {}", annotation.token, annotation.label);
//! }
//! assert_eq!(result.annotations[3].label, "B-LOC");
//! # Ok::<(), crfner_core::NerError>(())
//! ```

pub mod annotation;
pub mod crf;
pub mod error;
pub mod features;
pub mod normalizer;
pub mod pipeline;
pub mod predictor;
pub mod tokenizer;
pub mod viterbi;

pub use annotation::{assemble, Annotation, AnnotationResult};
pub use crf::CrfModel;
pub use error::{NerError, Result};
pub use features::{extract_features, FeatureMap};
pub use pipeline::{LabelingPipeline, TokenFeatures};
pub use predictor::{validate_schema, CrfPredictor, LabelPredictor};
pub use tokenizer::{tokenize, Token};

//! # CRF — Conditional Random Field Linear-Chain
//!
//! Artefato do modelo pré-treinado: rótulos, pesos de estado (atributo × rótulo)
//! e pesos de transição (rótulo × rótulo). O treinamento acontece fora deste
//! repositório; aqui o modelo é carregado uma vez e usado somente para leitura.
//!
//! ## Estrutura do Modelo
//!
//! Score total de uma sequência de rótulos:
//!
//! ```text
//! score(y, x) = Σ_i [emission(y_i, x_i) + transition(y_{i-1}, y_i)]
//! emission(y, x_i) = Σ_k peso(atributo_k, y) * valor_k
//! ```
//!
//! ## Formato em disco (JSON)
//!
//! ```json
//! {
//!   "labels": ["O", "B-PER", "I-PER"],
//!   "feature_schema": ["word", "is_first", "..."],
//!   "state_weights": { "word:Jean": [0.0, 2.1, 0.0], "is_capitalized": [-0.4, 1.2, 0.8] },
//!   "transition_weights": [[0.5, 0.1, -3.0], [0.0, 0.0, 2.0], [0.2, 0.0, 1.0]]
//! }
//! ```
//!
//! Cada vetor de `state_weights` tem um peso por rótulo, na ordem de `labels`.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{NerError, Result};
use crate::features::attribute_key;

/// Modelo CRF com pesos aprendidos.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrfModel {
    /// Rótulos opacos, na ordem dos índices usados pelas matrizes.
    pub labels: Vec<String>,
    /// Chaves de feature com que o modelo foi treinado (vazio se não declarado).
    #[serde(default)]
    pub feature_schema: Vec<String>,
    /// Pesos de estado: atributo → um peso por rótulo.
    #[serde(default)]
    pub state_weights: HashMap<String, Vec<f64>>,
    /// Pesos de transição: indexados por [rótulo_anterior][rótulo_seguinte].
    #[serde(default)]
    pub transition_weights: Vec<Vec<f64>>,
}

impl CrfModel {
    /// Cria um modelo com pesos zerados para os rótulos dados.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let n = labels.len();
        Self {
            labels,
            feature_schema: Vec::new(),
            state_weights: HashMap::new(),
            transition_weights: vec![vec![0.0; n]; n],
        }
    }

    /// Carrega o artefato JSON e verifica sua coerência interna.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let mut model: CrfModel = serde_json::from_str(&raw)?;
        model.check().map_err(|reason| NerError::ModelLoad {
            path: path.to_path_buf(),
            reason,
        })?;

        info!(
            path = %path.display(),
            labels = model.labels.len(),
            attributes = model.state_weights.len(),
            "CRF model loaded"
        );
        Ok(model)
    }

    /// Grava o modelo em JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Verifica dimensões e rótulos de um modelo montado em código.
    /// Uma matriz de transição ausente vira zeros.
    pub fn validate(&mut self) -> Result<()> {
        self.check().map_err(NerError::InvalidModel)
    }

    fn check(&mut self) -> std::result::Result<(), String> {
        let n = self.labels.len();

        if n == 0 {
            return Err("model declares no labels".into());
        }
        let unique: BTreeSet<&String> = self.labels.iter().collect();
        if unique.len() != n {
            return Err("duplicate labels".into());
        }

        if self.transition_weights.is_empty() {
            self.transition_weights = vec![vec![0.0; n]; n];
        } else if self.transition_weights.len() != n
            || self.transition_weights.iter().any(|row| row.len() != n)
        {
            return Err(format!("transition matrix must be {n}x{n}"));
        }

        if let Some((attribute, weights)) =
            self.state_weights.iter().find(|(_, w)| w.len() != n)
        {
            return Err(format!(
                "attribute '{attribute}' has {} weights, expected {n}",
                weights.len()
            ));
        }
        Ok(())
    }

    /// Índice de um rótulo, se existir.
    pub fn label_index(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Chaves de feature que o modelo conhece: o esquema declarado ou, na falta
    /// dele, as chaves implícitas nos nomes dos atributos pesados.
    pub fn feature_keys(&self) -> BTreeSet<String> {
        if !self.feature_schema.is_empty() {
            return self.feature_schema.iter().cloned().collect();
        }
        self.state_weights
            .keys()
            .map(|attribute| attribute_key(attribute).to_string())
            .collect()
    }

    /// Score de emissão de cada rótulo para um token.
    ///
    /// `score[y] = Σ_k peso(atributo_k, y) * valor_k`; atributos desconhecidos pesam 0.
    pub fn emission_scores(&self, attributes: &[(String, f64)]) -> Vec<f64> {
        let mut scores = vec![0.0; self.labels.len()];
        for (attribute, value) in attributes {
            if *value == 0.0 {
                continue;
            }
            if let Some(weights) = self.state_weights.get(attribute) {
                for (score, weight) in scores.iter_mut().zip(weights) {
                    *score += weight * value;
                }
            }
        }
        scores
    }

    /// Score de transição entre dois rótulos (por índice).
    pub fn transition_score(&self, prev: usize, next: usize) -> f64 {
        self.transition_weights[prev][next]
    }

    /// Configura um peso de estado. Devolve `false` se o rótulo não existir.
    pub fn set_state_weight(&mut self, attribute: &str, label: &str, weight: f64) -> bool {
        let Some(index) = self.label_index(label) else {
            return false;
        };
        let n = self.labels.len();
        self.state_weights
            .entry(attribute.to_string())
            .or_insert_with(|| vec![0.0; n])[index] = weight;
        true
    }

    /// Configura um peso de transição. Devolve `false` se algum rótulo não existir.
    pub fn set_transition(&mut self, from: &str, to: &str, weight: f64) -> bool {
        match (self.label_index(from), self.label_index(to)) {
            (Some(prev), Some(next)) => {
                self.transition_weights[prev][next] = weight;
                true
            }
            _ => false,
        }
    }
}

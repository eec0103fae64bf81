//! # Fronteira com o Modelo de Rotulagem
//!
//! O algoritmo de decodificação é uma capacidade injetada: o pipeline só conhece
//! o trait [`LabelPredictor`]. Isso permite testar o núcleo com um preditor
//! de mentira e trocar o modelo sem tocar no resto.
//!
//! [`CrfPredictor`] é a implementação real: CRF + Viterbi. Na construção ele
//! compara o esquema de features do modelo com [`FeatureMap::KEYS`] e recusa
//! modelos treinados com outro esquema. Qualquer preditor que declare um
//! esquema via [`LabelPredictor::schema`] é verificado de novo pelo pipeline
//! com [`validate_schema`].

use std::collections::BTreeSet;
use std::path::Path;

use tracing::warn;

use crate::crf::CrfModel;
use crate::error::{NerError, Result};
use crate::features::FeatureMap;
use crate::viterbi::viterbi_decode;

/// Um modelo de rotulagem de sequências pré-treinado.
///
/// Implementações são somente leitura depois de construídas e podem ser
/// chamadas de várias threads ao mesmo tempo.
pub trait LabelPredictor: Send + Sync {
    /// Prediz um rótulo por feature map, na mesma ordem.
    fn predict(&self, features: &[FeatureMap]) -> Result<Vec<String>>;

    /// Chaves de feature com que o preditor foi treinado, se declaradas.
    fn schema(&self) -> Option<&[String]> {
        None
    }

    /// Conjunto de rótulos que o preditor pode emitir (vazio se desconhecido).
    fn labels(&self) -> &[String] {
        &[]
    }
}

/// Preditor CRF linear-chain decodificado com Viterbi.
#[derive(Debug, Clone)]
pub struct CrfPredictor {
    model: CrfModel,
}

impl CrfPredictor {
    /// Envolve um modelo, validando dimensões, rótulos e esquema de features.
    pub fn new(mut model: CrfModel) -> Result<Self> {
        model.validate()?;
        check_schema(&model)?;
        Ok(Self { model })
    }

    /// Carrega o artefato do disco e valida o esquema.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(CrfModel::load(path)?)
    }

    pub fn model(&self) -> &CrfModel {
        &self.model
    }
}

impl LabelPredictor for CrfPredictor {
    fn predict(&self, features: &[FeatureMap]) -> Result<Vec<String>> {
        let sequence: Vec<Vec<(String, f64)>> =
            features.iter().map(FeatureMap::attributes).collect();
        let result = viterbi_decode(&self.model, &sequence);
        Ok(result
            .best_path
            .into_iter()
            .map(|index| self.model.labels[index].clone())
            .collect())
    }

    fn schema(&self) -> Option<&[String]> {
        if self.model.feature_schema.is_empty() {
            None
        } else {
            Some(&self.model.feature_schema)
        }
    }

    fn labels(&self) -> &[String] {
        &self.model.labels
    }
}

/// Exige que um esquema declarado seja exatamente [`FeatureMap::KEYS`].
pub fn validate_schema(schema: &[String]) -> Result<()> {
    let known: BTreeSet<String> = schema.iter().cloned().collect();
    compare_keys(&known, true)
}

/// Compara as chaves conhecidas pelo modelo com as produzidas pelo extrator.
///
/// Com esquema declarado, a comparação é exata. Sem ele, as chaves vêm dos
/// atributos pesados e só chaves inesperadas são erro: uma feature pode ter
/// ficado sem nenhum peso não nulo no treinamento.
fn check_schema(model: &CrfModel) -> Result<()> {
    let known = model.feature_keys();

    if known.is_empty() {
        warn!("model carries no feature schema nor state weights, skipping schema check");
        return Ok(());
    }
    compare_keys(&known, !model.feature_schema.is_empty())
}

fn compare_keys(known: &BTreeSet<String>, require_all: bool) -> Result<()> {
    let expected: BTreeSet<String> = FeatureMap::KEYS.iter().map(|k| k.to_string()).collect();

    let unexpected: Vec<String> = known.difference(&expected).cloned().collect();
    let missing: Vec<String> = if require_all {
        expected.difference(known).cloned().collect()
    } else {
        Vec::new()
    };

    if missing.is_empty() && unexpected.is_empty() {
        Ok(())
    } else {
        Err(NerError::SchemaMismatch {
            missing,
            unexpected,
        })
    }
}

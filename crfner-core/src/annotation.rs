//! # Montagem do Resultado
//!
//! Junta cada token ao rótulo previsto, posição a posição. Não há
//! reordenação, filtragem nem deduplicação: a saída tem a ordem exata dos tokens.
//!
//! Os nomes de campo serializados (`mot`, `annotation`, `phrase`, `annotations`)
//! fazem parte do contrato externo da API.

use serde::{Deserialize, Serialize};

use crate::error::{NerError, Result};

/// Um par (token, rótulo).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(rename = "mot")]
    pub token: String,
    #[serde(rename = "annotation")]
    pub label: String,
}

/// Resposta completa de uma rotulagem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationResult {
    /// O texto recebido, ecoado como veio.
    pub phrase: String,
    pub annotations: Vec<Annotation>,
}

/// Zipa tokens e rótulos.
///
/// As duas sequências derivam da mesma sequência de features; um tamanho
/// diferente só acontece se o preditor quebrar o contrato, e vira
/// [`NerError::LengthMismatch`].
pub fn assemble<S: AsRef<str>>(tokens: &[S], labels: Vec<String>) -> Result<Vec<Annotation>> {
    if tokens.len() != labels.len() {
        return Err(NerError::LengthMismatch {
            expected: tokens.len(),
            actual: labels.len(),
        });
    }

    Ok(tokens
        .iter()
        .zip(labels)
        .map(|(token, label)| Annotation {
            token: token.as_ref().to_string(),
            label,
        })
        .collect())
}

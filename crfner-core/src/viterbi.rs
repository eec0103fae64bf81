//! # Algoritmo de Viterbi — Decodificação de Sequências CRF
//!
//! Encontra a sequência de rótulos de maior score por **programação dinâmica**.
//! Uma busca exaustiva custaria `O(L^N)` para N tokens e L rótulos; o Viterbi
//! explora que o melhor caminho até o token i com rótulo y depende apenas do
//! melhor caminho até o token i-1 → `O(N × L²)`.
//!
//! ```text
//! Inicialização: viterbi[0][y] = emission(y, x_0)
//! Recursão:      viterbi[i][y] = max_{y'} [viterbi[i-1][y'] + transition(y', y)] + emission(y, x_i)
//! Backtracking:  reconstrói o caminho ótimo de trás pra frente
//! ```
//!
//! Empates são resolvidos a favor do menor índice de rótulo, o que torna a
//! decodificação determinística.

use crate::crf::CrfModel;

/// Resultado do Viterbi para uma sequência.
#[derive(Debug, Clone, PartialEq)]
pub struct ViterbiResult {
    /// Índices de rótulo do melhor caminho (um por token).
    pub best_path: Vec<usize>,
    /// Score (não normalizado) do melhor caminho.
    pub best_score: f64,
}

/// Executa o Viterbi sobre os atributos de cada token.
pub fn viterbi_decode(model: &CrfModel, sequence: &[Vec<(String, f64)>]) -> ViterbiResult {
    let n_tokens = sequence.len();
    let n_labels = model.labels.len();
    if n_tokens == 0 || n_labels == 0 {
        return ViterbiResult {
            best_path: vec![],
            best_score: 0.0,
        };
    }

    let emission: Vec<Vec<f64>> = sequence
        .iter()
        .map(|attributes| model.emission_scores(attributes))
        .collect();

    // backptr[i][y] = rótulo anterior que maximiza o score de y no token i
    let mut backptr = vec![vec![0usize; n_labels]; n_tokens];
    let mut viterbi = emission[0].clone();

    for i in 1..n_tokens {
        let mut next = vec![f64::NEG_INFINITY; n_labels];
        for y in 0..n_labels {
            let mut best_prev = 0;
            let mut best_score = f64::NEG_INFINITY;
            for (prev, score) in viterbi.iter().enumerate() {
                let candidate = score + model.transition_score(prev, y);
                if candidate > best_score {
                    best_score = candidate;
                    best_prev = prev;
                }
            }
            next[y] = best_score + emission[i][y];
            backptr[i][y] = best_prev;
        }
        viterbi = next;
    }

    let (mut label, best_score) = argmax(&viterbi);
    let mut best_path = vec![0usize; n_tokens];
    best_path[n_tokens - 1] = label;
    for i in (1..n_tokens).rev() {
        label = backptr[i][label];
        best_path[i - 1] = label;
    }

    ViterbiResult {
        best_path,
        best_score,
    }
}

/// (índice, valor) do primeiro máximo.
fn argmax(scores: &[f64]) -> (usize, f64) {
    let mut best = (0, f64::NEG_INFINITY);
    for (i, &score) in scores.iter().enumerate() {
        if score > best.1 {
            best = (i, score);
        }
    }
    best
}

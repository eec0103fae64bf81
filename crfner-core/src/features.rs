//! # Engenharia de Features para o CRF
//!
//! Para cada token, produz um [`FeatureMap`] com um esquema fixo de 16 chaves.
//! O modelo pré-treinado conhece exatamente estas chaves e tipos; renomear ou
//! omitir uma delas faz as predições degradarem sem erro algum, por isso o
//! esquema é um struct e não um mapa aberto.
//!
//! ## Features Implementadas
//!
//! ### Do token atual
//! - `word`: o texto exato
//! - `is_capitalized`, `is_all_caps`, `is_all_lower`: comparações de caixa
//! - `prefix-1/2/3`, `suffix-1/2/3`: primeiros/últimos caracteres
//! - `has_hyphen`, `is_numeric`
//!
//! ### De posição e contexto (janela de 1 token)
//! - `is_first`, `is_last`
//! - `prev_word`, `next_word` (string vazia nas bordas)
//!
//! ## Tokens vazios
//!
//! O tokenizador nunca emite tokens vazios, mas o extrator aceita qualquer
//! sequência. Para um token vazio: prefixos/sufixos são `""` e todos os
//! predicados de caixa e de conteúdo são `false`.

use serde::{Deserialize, Serialize};

/// Representação estruturada das features de um token.
///
/// A serialização usa os nomes de chave do treinamento (`prefix-1`, `suffix-3`...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureMap {
    pub word: String,
    pub is_first: bool,
    pub is_last: bool,
    pub is_capitalized: bool,
    pub is_all_caps: bool,
    pub is_all_lower: bool,
    #[serde(rename = "prefix-1")]
    pub prefix_1: String,
    #[serde(rename = "prefix-2")]
    pub prefix_2: String,
    #[serde(rename = "prefix-3")]
    pub prefix_3: String,
    #[serde(rename = "suffix-1")]
    pub suffix_1: String,
    #[serde(rename = "suffix-2")]
    pub suffix_2: String,
    #[serde(rename = "suffix-3")]
    pub suffix_3: String,
    pub prev_word: String,
    pub next_word: String,
    pub has_hyphen: bool,
    pub is_numeric: bool,
}

impl FeatureMap {
    /// O esquema de chaves, na ordem em que o modelo as recebe.
    pub const KEYS: [&'static str; 16] = [
        "word",
        "is_first",
        "is_last",
        "is_capitalized",
        "is_all_caps",
        "is_all_lower",
        "prefix-1",
        "prefix-2",
        "prefix-3",
        "suffix-1",
        "suffix-2",
        "suffix-3",
        "prev_word",
        "next_word",
        "has_hyphen",
        "is_numeric",
    ];

    /// Achata o mapa em atributos ponderados, na convenção CRFsuite usada no treinamento:
    ///
    /// - feature string → atributo `"chave:valor"` com peso 1.0
    /// - feature booleana → atributo `"chave"` com peso 1.0 ou 0.0
    ///
    /// # Exemplo
    /// `word = "Paris"` vira `("word:Paris", 1.0)`; `is_first = false` vira `("is_first", 0.0)`.
    pub fn attributes(&self) -> Vec<(String, f64)> {
        let text = |key: &str, value: &str| (format!("{key}:{value}"), 1.0);
        let flag = |key: &str, value: bool| (key.to_string(), if value { 1.0 } else { 0.0 });

        vec![
            text("word", &self.word),
            flag("is_first", self.is_first),
            flag("is_last", self.is_last),
            flag("is_capitalized", self.is_capitalized),
            flag("is_all_caps", self.is_all_caps),
            flag("is_all_lower", self.is_all_lower),
            text("prefix-1", &self.prefix_1),
            text("prefix-2", &self.prefix_2),
            text("prefix-3", &self.prefix_3),
            text("suffix-1", &self.suffix_1),
            text("suffix-2", &self.suffix_2),
            text("suffix-3", &self.suffix_3),
            text("prev_word", &self.prev_word),
            text("next_word", &self.next_word),
            flag("has_hyphen", self.has_hyphen),
            flag("is_numeric", self.is_numeric),
        ]
    }
}

/// Devolve a chave de feature que originou um atributo (`"word:Paris"` → `"word"`).
pub fn attribute_key(attribute: &str) -> &str {
    attribute
        .split_once(':')
        .map_or(attribute, |(key, _)| key)
}

/// Gera um [`FeatureMap`] por token, alinhado por índice com a entrada.
///
/// Aceita qualquer sequência de textos: `&[Token]`, `&[String]` ou `&[&str]`.
///
/// # Exemplo
/// ```rust
/// use crfner_core::features::extract_features;
///
/// let features = extract_features(&["Jean", "habite", "Paris"]);
/// assert_eq!(features[0].prefix_2, "Je");
/// assert_eq!(features[0].next_word, "habite");
/// assert!(features[2].is_last);
/// ```
pub fn extract_features<S: AsRef<str>>(words: &[S]) -> Vec<FeatureMap> {
    (0..words.len())
        .map(|i| extract_for_token(words, i))
        .collect()
}

/// Extrai as features do token `i`, olhando apenas para os vizinhos imediatos.
///
/// # Panics
/// Se `i` estiver fora da sequência.
pub fn extract_for_token<S: AsRef<str>>(words: &[S], i: usize) -> FeatureMap {
    let word = words[i].as_ref();
    let last = words.len() - 1;

    FeatureMap {
        word: word.to_string(),
        is_first: i == 0,
        is_last: i == last,
        is_capitalized: is_capitalized(word),
        is_all_caps: !word.is_empty() && word.to_uppercase() == word,
        is_all_lower: !word.is_empty() && word.to_lowercase() == word,
        prefix_1: prefix(word, 1),
        prefix_2: prefix(word, 2),
        prefix_3: prefix(word, 3),
        suffix_1: suffix(word, 1),
        suffix_2: suffix(word, 2),
        suffix_3: suffix(word, 3),
        prev_word: if i == 0 {
            String::new()
        } else {
            words[i - 1].as_ref().to_string()
        },
        next_word: if i == last {
            String::new()
        } else {
            words[i + 1].as_ref().to_string()
        },
        has_hyphen: word.contains('-'),
        is_numeric: !word.is_empty() && word.chars().all(|c| c.is_ascii_digit()),
    }
}

/// O primeiro caractere é igual à sua versão maiúscula ("." e "2" contam).
fn is_capitalized(word: &str) -> bool {
    word.chars()
        .next()
        .is_some_and(|c| c.to_uppercase().eq(std::iter::once(c)))
}

fn prefix(word: &str, n: usize) -> String {
    word.chars().take(n).collect()
}

fn suffix(word: &str, n: usize) -> String {
    let count = word.chars().count();
    word.chars().skip(count.saturating_sub(n)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    #[test]
    fn test_one_map_per_token() {
        let tokens = tokenize("Le president Macron a parle a Lyon hier .");
        let features = extract_features(&tokens);
        assert_eq!(features.len(), tokens.len());
        for (token, fv) in tokens.iter().zip(&features) {
            assert_eq!(fv.word, token.text);
        }
    }

    #[test]
    fn test_first_and_last_positions() {
        let features = extract_features(&["Il", "pleut", "a", "Nantes"]);
        assert!(features[0].is_first);
        assert_eq!(features[0].prev_word, "");
        assert!(!features[0].is_last);

        let last = features.last().unwrap();
        assert!(last.is_last);
        assert_eq!(last.next_word, "");
        assert!(!last.is_first);

        assert_eq!(features[2].prev_word, "pleut");
        assert_eq!(features[2].next_word, "Nantes");
    }

    #[test]
    fn test_capitalized_name() {
        let features = extract_features(&["Jean", "habite", "Paris"]);
        let jean = &features[0];
        assert!(jean.is_capitalized);
        assert!(!jean.is_all_caps);
        assert!(!jean.is_all_lower);
        assert_eq!(jean.prefix_2, "Je");
        assert_eq!(jean.suffix_2, "an");
        assert_eq!(jean.prev_word, "");
        assert_eq!(jean.next_word, "habite");

        assert!(!features[1].is_capitalized);
        assert!(features[1].is_all_lower);
    }

    #[test]
    fn test_single_number_token() {
        let features = extract_features(&["2024"]);
        let year = &features[0];
        assert!(year.is_numeric);
        assert!(year.is_all_caps);
        assert!(year.is_all_lower);
        assert!(year.is_capitalized);
        assert!(year.is_first);
        assert!(year.is_last);
        assert_eq!(year.prev_word, "");
        assert_eq!(year.next_word, "");
    }

    #[test]
    fn test_empty_sequence() {
        let words: [&str; 0] = [];
        assert!(extract_features(&words).is_empty());
    }

    #[test]
    fn test_hyphenated_word() {
        let features = extract_features(&["anti-corruption"]);
        assert!(features[0].has_hyphen);
        assert_eq!(features[0].prefix_3, "ant");
        assert_eq!(features[0].suffix_3, "ion");
        assert!(!features[0].is_numeric);
    }

    #[test]
    fn test_short_tokens_truncate_affixes() {
        let features = extract_features(&["a", "Ok"]);
        assert_eq!(features[0].prefix_3, "a");
        assert_eq!(features[0].suffix_2, "a");
        assert_eq!(features[1].prefix_3, "Ok");
        assert_eq!(features[1].suffix_3, "Ok");
        assert_eq!(features[1].suffix_1, "k");
    }

    #[test]
    fn test_affixes_count_characters_not_bytes() {
        let features = extract_features(&["été"]);
        assert_eq!(features[0].prefix_2, "ét");
        assert_eq!(features[0].suffix_1, "é");
    }

    #[test]
    fn test_punctuation_token() {
        let features = extract_features(&["."]);
        // A comparação de caixa é trivialmente verdadeira para pontuação
        assert!(features[0].is_capitalized);
        assert!(features[0].is_all_caps);
        assert!(features[0].is_all_lower);
        assert!(!features[0].is_numeric);
        assert_eq!(features[0].prefix_1, ".");
    }

    #[test]
    fn test_empty_token_does_not_panic() {
        let features = extract_features(&["", "mot"]);
        let empty = &features[0];
        assert_eq!(empty.word, "");
        assert_eq!(empty.prefix_1, "");
        assert_eq!(empty.suffix_3, "");
        assert!(!empty.is_capitalized);
        assert!(!empty.is_all_caps);
        assert!(!empty.is_all_lower);
        assert!(!empty.is_numeric);
        assert!(!empty.has_hyphen);
        assert_eq!(features[1].prev_word, "");
    }

    #[test]
    fn test_all_caps_acronym() {
        let features = extract_features(&["SNCF"]);
        assert!(features[0].is_all_caps);
        assert!(!features[0].is_all_lower);
        assert!(features[0].is_capitalized);
    }

    #[test]
    fn test_serialized_keys_match_schema() {
        let fv = &extract_features(&["Jean"])[0];
        let value = serde_json::to_value(fv).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), FeatureMap::KEYS.len());
        for key in FeatureMap::KEYS {
            assert!(object.contains_key(key), "missing key {key}");
        }
        assert_eq!(object["prefix-2"], "Je");
    }

    #[test]
    fn test_attributes_follow_crfsuite_convention() {
        let fv = &extract_features(&["Jean", "habite"])[0];
        let attributes = fv.attributes();
        assert_eq!(attributes.len(), FeatureMap::KEYS.len());
        assert!(attributes.contains(&("word:Jean".to_string(), 1.0)));
        assert!(attributes.contains(&("is_first".to_string(), 1.0)));
        assert!(attributes.contains(&("is_last".to_string(), 0.0)));
        assert!(attributes.contains(&("prev_word:".to_string(), 1.0)));

        let keys: Vec<&str> = attributes.iter().map(|(a, _)| attribute_key(a)).collect();
        assert_eq!(keys, FeatureMap::KEYS);
    }

    #[test]
    fn test_attribute_key() {
        assert_eq!(attribute_key("word:Paris"), "word");
        assert_eq!(attribute_key("word:a:b"), "word");
        assert_eq!(attribute_key("is_first"), "is_first");
        assert_eq!(attribute_key("prev_word:"), "prev_word");
    }
}

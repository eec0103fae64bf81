//! # Tokenizador para Francês
//!
//! Divide o texto já normalizado em tokens (palavras, números, pontuações).
//! Reproduz as convenções do tokenizador com o qual o modelo foi treinado:
//!
//! - **Elisões** são separadas com o apóstrofo: "l'homme" → "l'", "homme";
//!   "qu'il" → "qu'", "il". Outros apóstrofos internos ficam na palavra ("aujourd'hui").
//! - **Hífens** entre caracteres de palavra ficam no token ("anti-corruption", "Saint-Denis").
//! - **Abreviações** de tratamento mantêm o ponto quando o texto continua
//!   ("M. Dupont", "etc. et"); no fim da frase o ponto é um token à parte.
//! - **Números** mantêm separadores decimais e de milhar ("3,5", "1.000").
//! - **URLs e e-mails** são tokens únicos.
//! - Sequências de pontos formam um único token ("...").
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use crfner_core::tokenizer::tokenize;
//!
//! let tokens = tokenize("L'anti-corruption arrive à Paris.");
//! let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
//! assert_eq!(texts, ["L'", "anti-corruption", "arrive", "à", "Paris", "."]);
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Um token extraído do texto normalizado.
///
/// Apenas `text` participa da extração de features; os offsets permitem
/// relacionar o token ao trecho de origem.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    /// O texto do token (ex: "Jean", ",", "l'").
    pub text: String,
    /// Índice de byte inicial no texto normalizado (inclusive).
    pub start: usize,
    /// Índice de byte final no texto normalizado (exclusivo).
    pub end: usize,
    /// Posição do token na sequência (0, 1, 2...).
    pub index: usize,
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Artigos e pronomes elididos que se separam da palavra seguinte.
const ELISIONS: &[&str] = &[
    "l", "d", "j", "m", "n", "s", "t", "c", "qu", "jusqu", "lorsqu", "puisqu", "quoiqu",
    "presqu",
];

/// Abreviações que mantêm o ponto. Nenhuma é também uma palavra comum
/// ("vol", "art" e "tel" ficariam colados ao ponto final).
const ABBREVIATIONS: &[&str] = &[
    "M", "MM", "Mme", "Mmes", "Mlle", "Mlles", "Dr", "Pr", "Mgr", "St", "Ste", "etc", "cf",
];

static URL_OR_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)(?:https?://|www\.)[^\s<>"]*[^\s<>".,;:!?)\]]|[\w.+-]+@[\w-]+(?:\.[\w-]+)+"#,
    )
    .expect("URL/e-mail pattern is valid")
});

/// Tokeniza um texto normalizado.
///
/// Nunca produz tokens vazios; texto vazio ou só com espaços gera uma lista vazia.
pub fn tokenize(text: &str) -> Vec<Token> {
    let atomic: Vec<(usize, usize)> = URL_OR_EMAIL
        .find_iter(text)
        .map(|m| (m.start(), m.end()))
        .collect();
    let mut atomic = atomic.into_iter().peekable();

    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut current_start = 0;
    let mut i = 0;

    while i < chars.len() {
        let (pos, ch) = chars[i];

        while atomic.peek().is_some_and(|&(span_start, _)| span_start < pos) {
            atomic.next();
        }
        if let Some(&(span_start, span_end)) = atomic.peek() {
            if span_start == pos {
                flush_token(&mut tokens, &mut current, current_start, pos);
                push_token(&mut tokens, &text[span_start..span_end], span_start, span_end);
                while i < chars.len() && chars[i].0 < span_end {
                    i += 1;
                }
                atomic.next();
                continue;
            }
        }

        let next = chars.get(i + 1).map(|&(_, c)| c);

        if ch.is_alphanumeric() {
            if current.is_empty() {
                current_start = pos;
            }
            current.push(ch);
        } else if ch == '-' && !current.is_empty() && next.is_some_and(char::is_alphanumeric) {
            current.push(ch);
        } else if ch == '\'' && !current.is_empty() {
            if is_elision(&current) {
                current.push(ch);
                flush_token(&mut tokens, &mut current, current_start, pos + 1);
            } else if next.is_some_and(char::is_alphabetic) {
                current.push(ch);
            } else {
                flush_token(&mut tokens, &mut current, current_start, pos);
                push_token(&mut tokens, "'", pos, pos + 1);
            }
        } else if (ch == '.' || ch == ',')
            && is_number(&current)
            && next.is_some_and(|c| c.is_ascii_digit())
        {
            current.push(ch);
        } else if ch == '.'
            && ABBREVIATIONS.contains(&current.as_str())
            && continues_with_word(&chars[i + 1..])
        {
            current.push(ch);
            flush_token(&mut tokens, &mut current, current_start, pos + 1);
        } else if ch.is_whitespace() {
            flush_token(&mut tokens, &mut current, current_start, pos);
        } else if ch == '.' {
            flush_token(&mut tokens, &mut current, current_start, pos);
            let mut last = i;
            while chars.get(last + 1).is_some_and(|&(_, c)| c == '.') {
                last += 1;
            }
            let end = chars[last].0 + 1;
            push_token(&mut tokens, &text[pos..end], pos, end);
            i = last + 1;
            continue;
        } else {
            flush_token(&mut tokens, &mut current, current_start, pos);
            let mut buf = [0u8; 4];
            push_token(&mut tokens, ch.encode_utf8(&mut buf), pos, pos + ch.len_utf8());
        }
        i += 1;
    }

    flush_token(&mut tokens, &mut current, current_start, text.len());

    for (index, token) in tokens.iter_mut().enumerate() {
        token.index = index;
    }
    tokens
}

fn is_elision(word: &str) -> bool {
    let lower = word.to_lowercase();
    ELISIONS.contains(&lower.as_str())
}

/// O próximo caractere não branco começa uma palavra.
fn continues_with_word(rest: &[(usize, char)]) -> bool {
    rest.iter()
        .map(|&(_, c)| c)
        .find(|c| !c.is_whitespace())
        .is_some_and(char::is_alphanumeric)
}

fn is_number(word: &str) -> bool {
    word.chars().next().is_some_and(|c| c.is_ascii_digit())
        && word.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',')
}

/// Fecha o token acumulado e adiciona à lista (se não vazio)
fn flush_token(tokens: &mut Vec<Token>, text: &mut String, start: usize, end: usize) {
    if !text.is_empty() {
        tokens.push(Token {
            text: std::mem::take(text),
            start,
            end,
            index: 0, // atribuído no final
        });
    }
}

fn push_token(tokens: &mut Vec<Token>, text: &str, start: usize, end: usize) {
    tokens.push(Token {
        text: text.to_string(),
        start,
        end,
        index: 0,
    });
}

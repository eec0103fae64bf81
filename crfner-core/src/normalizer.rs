//! # Normalização de Texto
//!
//! Reduz o texto a uma forma canônica sem acentos antes da tokenização.
//! O modelo CRF foi treinado sobre texto transliterado para ASCII, então
//! "Élysée" precisa chegar ao extrator como "Elysee".
//!
//! ## Etapas
//!
//! 1. Decomposição de compatibilidade (NFKD): "é" → "e" + acento combinante,
//!    "ﬁ" → "fi", "²" → "2".
//! 2. Remoção das marcas combinantes.
//! 3. Tabela própria para a tipografia francesa (aspas, travessões, espaços
//!    inseparáveis), onde a convenção do treinamento difere da genérica.
//! 4. `deunicode` para todo o resto: outros alfabetos ("Москва" → "Moskva"),
//!    símbolos ("€" → "EUR"). Caracteres sem transliteração são descartados.
//!
//! A saída é sempre ASCII. Texto ASCII passa intacto, o que torna a
//! normalização idempotente.

use deunicode::deunicode_char;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Transliterações que têm precedência sobre as do `deunicode`.
const TRANSLITERATIONS: &[(char, &str)] = &[
    ('œ', "oe"),
    ('Œ', "OE"),
    ('æ', "ae"),
    ('Æ', "AE"),
    ('ß', "ss"),
    ('ø', "o"),
    ('Ø', "O"),
    ('ł', "l"),
    ('Ł', "L"),
    ('đ', "d"),
    ('Đ', "D"),
    ('ð', "d"),
    ('þ', "th"),
    ('\u{2018}', "'"),
    ('\u{2019}', "'"),
    ('\u{201A}', "'"),
    ('\u{2032}', "'"),
    ('\u{201C}', "\""),
    ('\u{201D}', "\""),
    ('\u{201E}', "\""),
    ('«', "\""),
    ('»', "\""),
    ('\u{2010}', "-"),
    ('\u{2011}', "-"),
    ('\u{2012}', "-"),
    ('\u{2013}', "-"),
    ('\u{2014}', "-"),
    ('\u{2212}', "-"),
    ('\u{2026}', "..."),
    ('\u{00A0}', " "),
    ('\u{202F}', " "),
];

/// Normaliza o texto para a forma sem acentos usada no treinamento do modelo.
///
/// # Exemplo
/// ```rust
/// use crfner_core::normalizer::normalize;
///
/// assert_eq!(normalize("L'Élysée a reçu « Zoë »"), "L'Elysee a recu \" Zoe \"");
/// ```
pub fn normalize(text: &str) -> String {
    if text.is_ascii() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    for c in text.nfkd().filter(|c| !is_combining_mark(*c)) {
        match transliterate(c) {
            Some(replacement) => out.push_str(replacement),
            None if c.is_ascii() => out.push(c),
            None => {}
        }
    }
    out
}

fn transliterate(c: char) -> Option<&'static str> {
    if c.is_ascii() {
        return None;
    }
    TRANSLITERATIONS
        .iter()
        .find(|(from, _)| *from == c)
        .map(|(_, to)| *to)
        .or_else(|| deunicode_char(c))
}

//! # Extração de Texto de Documentos
//!
//! Converte o arquivo enviado em `/upload` em texto puro antes da rotulagem.
//!
//! - **PDF**: `pdf-extract`, páginas separadas por quebra de linha.
//! - **DOCX**: `docx-rs`; um parágrafo não vazio por linha.
//! - **Texto**: qualquer outro arquivo precisa ser UTF-8 válido.
//!
//! O tipo é detectado pela assinatura do conteúdo e, na falta dela, pela extensão.

use docx_rs::{DocumentChild, Paragraph, ParagraphChild, RunChild};

use crate::error::ServerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentKind {
    pub fn detect(bytes: &[u8], filename: Option<&str>) -> Self {
        if bytes.starts_with(b"%PDF-") {
            return DocumentKind::Pdf;
        }
        if bytes.starts_with(b"PK\x03\x04") {
            return DocumentKind::Docx;
        }
        let extension = filename
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("pdf") => DocumentKind::Pdf,
            Some("docx") => DocumentKind::Docx,
            _ => DocumentKind::PlainText,
        }
    }
}

/// Extrai o texto de um documento enviado.
pub fn extract_text(bytes: &[u8], filename: Option<&str>) -> Result<String, ServerError> {
    match DocumentKind::detect(bytes, filename) {
        DocumentKind::Pdf => extract_pdf(bytes),
        DocumentKind::Docx => extract_docx(bytes),
        DocumentKind::PlainText => extract_plain(bytes),
    }
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ServerError> {
    // pdf-extract entra em pânico em alguns arquivos malformados
    std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
        .map_err(|_| ServerError::ExtractionFailure("unreadable PDF document".into()))?
        .map_err(|e| ServerError::ExtractionFailure(format!("PDF extraction failed: {e}")))
}

fn extract_docx(bytes: &[u8]) -> Result<String, ServerError> {
    let docx = docx_rs::read_docx(bytes)
        .map_err(|e| ServerError::ExtractionFailure(format!("DOCX extraction failed: {e}")))?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(paragraph) => Some(paragraph_text(paragraph)),
            _ => None,
        })
        .filter(|text| !text.trim().is_empty())
        .collect();

    Ok(paragraphs.join("\n"))
}

/// Paragraph → Run → Text; runs de um mesmo parágrafo são concatenados.
fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    for child in &paragraph.children {
        let ParagraphChild::Run(run) = child else {
            continue;
        };
        for run_child in &run.children {
            match run_child {
                RunChild::Text(t) => text.push_str(&t.text),
                RunChild::Tab(_) => text.push('\t'),
                RunChild::Break(_) => text.push('\n'),
                _ => {}
            }
        }
    }
    text
}

fn extract_plain(bytes: &[u8]) -> Result<String, ServerError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| ServerError::ExtractionFailure("file is not valid UTF-8 text".into()))?;
    Ok(text.trim_start_matches('\u{FEFF}').to_string())
}

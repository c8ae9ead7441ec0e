//! Text extraction for uploaded emails.
//! Supports: TXT, PDF
//!
//! Extraction failures are not errors: they yield an empty string, which the
//! supervisor answers with the failover classification.

use std::path::Path;
use tracing::{info, warn};

use crate::error::AppError;

/// Extensions accepted for upload, with the leading dot.
pub const ALLOWED_EXTENSIONS: &[&str] = &[".pdf", ".txt"];

/// Lower-cased extension of `file_name` without the dot.
pub fn extension_of(file_name: &str) -> String {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default()
}

/// Rejects uploads with an unsupported extension or above `max_file_size` bytes.
pub fn validate_upload(file_name: &str, size: usize, max_file_size: usize) -> Result<(), AppError> {
    let extension = format!(".{}", extension_of(file_name));
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AppError::Validation(format!(
            "Tipo de arquivo não suportado. Use: {}",
            ALLOWED_EXTENSIONS.join(", ")
        )));
    }

    if size > max_file_size {
        return Err(AppError::Validation(format!(
            "Arquivo muito grande. Tamanho máximo: {}MB",
            max_file_size / (1024 * 1024)
        )));
    }

    Ok(())
}

/// Reads an upload from disk, returning its file name and contents.
pub async fn read_upload(path: &Path) -> Result<(String, Vec<u8>), AppError> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let data = tokio::fs::read(path).await?;
    Ok((file_name, data))
}

/// Extract text content from binary file data based on file extension
pub fn extract_text_from_file(file_name: &str, file_data: &[u8]) -> String {
    let extension = extension_of(file_name);

    info!("Extracting text from file: {} (type: {})", file_name, extension);

    match extension.as_str() {
        "txt" => decode_text(file_data),
        "pdf" => extract_pdf_text(file_data),
        _ => {
            warn!("Unsupported file extension: {}", extension);
            String::new()
        }
    }
}

/// UTF-8 first, then Latin-1, which maps every byte to a code point.
fn decode_text(file_data: &[u8]) -> String {
    match std::str::from_utf8(file_data) {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            warn!("TXT is not valid UTF-8 ({}), decoding as Latin-1", e);
            file_data
                .iter()
                .map(|&b| b as char)
                .collect::<String>()
                .trim()
                .to_string()
        }
    }
}

/// Extract text from PDF file
fn extract_pdf_text(file_data: &[u8]) -> String {
    let is_pdf = infer::get(file_data)
        .map(|kind| kind.mime_type() == "application/pdf")
        .unwrap_or(false);
    if !is_pdf {
        warn!("Erro ao ler PDF: conteúdo não é um PDF");
        return String::new();
    }

    info!("Extracting text from PDF...");

    match pdf_extract::extract_text_from_mem(file_data) {
        Ok(text) => {
            let cleaned = clean_extracted_text(&text);
            info!("PDF extraction successful: {} characters", cleaned.chars().count());
            cleaned
        }
        Err(e) => {
            warn!("Erro ao ler PDF: {}", e);
            String::new()
        }
    }
}

/// Clean up extracted text
fn clean_extracted_text(text: &str) -> String {
    text.lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

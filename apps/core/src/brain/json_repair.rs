//! JSON repair for model output.
//!
//! Strips markdown fences from the raw completion and parses the remaining text
//! into a [`RawModelResult`]. Failures never escape: they become `Erro` records.

use serde_json::{Map, Value};
use tracing::{error, warn};

use crate::models::{Category, RawModelResult};

pub const INVALID_JSON_RAZAO: &str = "Resposta inválida da IA - formato JSON incorreto";
pub const INVALID_JSON_RESPOSTA: &str =
    "Tente novamente. Se o erro persistir, verifique a configuração da API.";
pub const UNEXPECTED_RESPOSTA: &str = "Tente novamente.";

/// Outcome of a repair attempt. Both variants carry a usable record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedResponse {
    /// The payload parsed into a JSON object.
    Valid(RawModelResult),
    /// The payload could not be used; the record is a canonical `Erro`.
    Invalid(RawModelResult),
}

impl ParsedResponse {
    pub fn is_valid(&self) -> bool {
        matches!(self, ParsedResponse::Valid(_))
    }

    pub fn into_result(self) -> RawModelResult {
        match self {
            ParsedResponse::Valid(result) | ParsedResponse::Invalid(result) => result,
        }
    }
}

/// Removes every ```` ```json ```` / ```` ``` ```` marker and surrounding whitespace.
pub fn strip_markdown_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parses a model completion into a [`RawModelResult`].
pub fn repair(raw: &str) -> ParsedResponse {
    let clean = strip_markdown_fences(raw);

    let value: Value = match serde_json::from_str(&clean) {
        Ok(value) => value,
        Err(e) => {
            warn!("Erro ao fazer parse do JSON da IA: {}", e);
            warn!("Texto recebido: {}...", preview(raw, 200));
            return ParsedResponse::Invalid(RawModelResult::error_record(
                INVALID_JSON_RAZAO,
                INVALID_JSON_RESPOSTA,
            ));
        }
    };

    match from_object(value) {
        Ok(result) => ParsedResponse::Valid(result),
        Err(cause) => {
            error!("Erro inesperado ao processar JSON: {}", cause);
            ParsedResponse::Invalid(RawModelResult::error_record(
                format!("Erro ao processar resposta: {}", cause),
                UNEXPECTED_RESPOSTA,
            ))
        }
    }
}

fn from_object(value: Value) -> Result<RawModelResult, String> {
    let object = match value {
        Value::Object(object) => object,
        other => return Err(format!("esperado objeto JSON, recebido {}", kind_of(&other))),
    };

    Ok(RawModelResult {
        categoria: text_field(&object, "categoria").map(|label| Category::from_label(&label)),
        confianca: confidence_field(&object)?,
        razao: text_field(&object, "razao"),
        resposta_sugerida: text_field(&object, "resposta_sugerida"),
    })
}

fn text_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Accepts integers, floats (truncated toward zero) and numeric strings.
fn confidence_field(object: &Map<String, Value>) -> Result<Option<i64>, String> {
    let Some(value) = object.get("confianca") else {
        return Ok(None);
    };

    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    parsed
        .map(Some)
        .ok_or_else(|| format!("campo confianca inválido: {}", value))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "booleano",
        Value::Number(_) => "número",
        Value::String(_) => "texto",
        Value::Array(_) => "lista",
        Value::Object(_) => "objeto",
    }
}

fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{"categoria":"Produtivo","confianca":88,"razao":"Pedido de pagamento.","resposta_sugerida":"Vou verificar."}"#;

    #[test]
    fn test_plain_json_parses() {
        let parsed = repair(PAYLOAD);
        assert!(parsed.is_valid());
        let result = parsed.into_result();
        assert_eq!(result.categoria, Some(Category::Produtivo));
        assert_eq!(result.confianca, Some(88));
        assert_eq!(result.razao.as_deref(), Some("Pedido de pagamento."));
        assert_eq!(result.resposta_sugerida.as_deref(), Some("Vou verificar."));
    }

    #[test]
    fn test_fenced_json_matches_unwrapped() {
        let fenced = format!("```json\n{}\n```", PAYLOAD);
        assert_eq!(repair(&fenced), repair(PAYLOAD));

        let bare_fence = format!("```\n{}\n```  ", PAYLOAD);
        assert_eq!(repair(&bare_fence), repair(PAYLOAD));
    }

    #[test]
    fn test_invalid_json_yields_canonical_error() {
        let parsed = repair("desculpe, não posso ajudar");
        assert!(!parsed.is_valid());
        let result = parsed.into_result();
        assert_eq!(result.categoria, Some(Category::Erro));
        assert_eq!(result.confianca, Some(0));
        assert_eq!(result.razao.as_deref(), Some(INVALID_JSON_RAZAO));
        assert_eq!(result.resposta_sugerida.as_deref(), Some(INVALID_JSON_RESPOSTA));
    }

    #[test]
    fn test_empty_payload_is_invalid() {
        assert!(!repair("").is_valid());
        assert!(!repair("```json\n```").is_valid());
    }

    #[test]
    fn test_non_object_goes_through_unexpected_path() {
        let result = repair("[1, 2, 3]").into_result();
        assert_eq!(result.categoria, Some(Category::Erro));
        assert!(result.razao.unwrap().starts_with("Erro ao processar resposta:"));
        assert_eq!(result.resposta_sugerida.as_deref(), Some(UNEXPECTED_RESPOSTA));
    }

    #[test]
    fn test_confidence_coercion() {
        let float = repair(r#"{"categoria":"Produtivo","confianca":72.9}"#).into_result();
        assert_eq!(float.confianca, Some(72));

        let string = repair(r#"{"categoria":"Produtivo","confianca":" 64 "}"#).into_result();
        assert_eq!(string.confianca, Some(64));

        let bogus = repair(r#"{"categoria":"Produtivo","confianca":"alta"}"#);
        assert!(!bogus.is_valid());

        let boolean = repair(r#"{"categoria":"Produtivo","confianca":true}"#);
        assert!(!boolean.is_valid());
    }

    #[test]
    fn test_missing_fields_stay_absent() {
        let result = repair("{}").into_result();
        assert_eq!(result, RawModelResult::default());
        assert_eq!(result.categoria(), Category::Indefinido);
        assert_eq!(result.confianca(), 0);
    }

    #[test]
    fn test_unknown_category_maps_to_indefinido() {
        let result = repair(r#"{"categoria":"Spam","confianca":50}"#).into_result();
        assert_eq!(result.categoria, Some(Category::Indefinido));
    }
}

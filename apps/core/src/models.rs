use serde::{Deserialize, Serialize};
use std::fmt;

/// Default rationale when the model omits `razao`.
pub const DEFAULT_RAZAO: &str = "Sem explicação.";
/// Default reply when the model omits `resposta_sugerida`.
pub const DEFAULT_RESPOSTA: &str = "Analisar manualmente.";

/// An email waiting to be classified. Consumed once per request.
#[derive(Debug, Clone)]
pub struct ClassificationRequest {
    /// Already decoded email text.
    pub text: String,
}

impl ClassificationRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Length in characters of the trimmed text.
    pub fn trimmed_len(&self) -> usize {
        self.text.trim().chars().count()
    }
}

/// Classification label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    /// Requires action.
    Produtivo,
    /// No action needed.
    Improdutivo,
    /// Processing failure.
    Erro,
    /// The model omitted the label or answered something unrecognised.
    Indefinido,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Produtivo => "Produtivo",
            Category::Improdutivo => "Improdutivo",
            Category::Erro => "Erro",
            Category::Indefinido => "Indefinido",
        }
    }

    /// Maps a label produced by the model. Unknown labels become `Indefinido`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "produtivo" => Category::Produtivo,
            "improdutivo" => Category::Improdutivo,
            "erro" => Category::Erro,
            _ => Category::Indefinido,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The language model's best-effort structured answer, after JSON repair.
///
/// Every field is optional: the model may leave any of them out. Defaults are
/// applied by the confidence adjuster when the final result is built.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawModelResult {
    pub categoria: Option<Category>,
    /// Raw confidence as reported; may fall outside 0..=100.
    pub confianca: Option<i64>,
    pub razao: Option<String>,
    pub resposta_sugerida: Option<String>,
}

impl RawModelResult {
    pub fn categoria(&self) -> Category {
        self.categoria.unwrap_or(Category::Indefinido)
    }

    pub fn confianca(&self) -> i64 {
        self.confianca.unwrap_or(0)
    }

    /// An `Erro` record carrying a fixed rationale and reply.
    pub fn error_record(razao: impl Into<String>, resposta: impl Into<String>) -> Self {
        Self {
            categoria: Some(Category::Erro),
            confianca: Some(0),
            razao: Some(razao.into()),
            resposta_sugerida: Some(resposta.into()),
        }
    }
}

/// The final, user-facing output. `confianca` is always within 0..=100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub categoria: Category,
    pub confianca: u8,
    pub razao: String,
    pub resposta_sugerida: String,
}

impl ClassificationResult {
    /// Builds a result, clamping the confidence into 0..=100.
    pub fn new(
        categoria: Category,
        confianca: i64,
        razao: impl Into<String>,
        resposta_sugerida: impl Into<String>,
    ) -> Self {
        Self {
            categoria,
            confianca: confianca.clamp(0, 100) as u8,
            razao: razao.into(),
            resposta_sugerida: resposta_sugerida.into(),
        }
    }

    /// Result returned when the model call itself fails.
    pub fn technical_failure(cause: impl fmt::Display) -> Self {
        Self::new(
            Category::Erro,
            0,
            format!("Falha técnica na consulta à IA: {}", cause),
            "Tente novamente mais tarde ou verifique a configuração da API.",
        )
    }

    /// Deterministic substitute for input too short to classify.
    pub fn failover() -> Self {
        Self::new(
            Category::Improdutivo,
            100,
            "O conteúdo enviado não contém texto suficiente para análise. Pode ser uma imagem digitalizada ou arquivo sem texto selecionável.",
            "O sistema não conseguiu extrair texto do arquivo. Por favor, verifique o conteúdo e tente novamente com um arquivo que contenha texto selecionável.",
        )
    }
}

//! Semantic scoring using keyword sets and regex patterns.
//!
//! Counts how many distinct keywords of each category occur in the email and
//! flags monetary values and dates. Pure and deterministic.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Action verbs.
pub const ACAO_KEYWORDS: &[&str] = &[
    "pagar",
    "resolver",
    "corrigir",
    "implementar",
    "desenvolver",
    "testar",
    "configurar",
    "instalar",
    "atualizar",
    "revisar",
    "analisar",
    "verificar",
];

/// Technical terms.
pub const TECNICO_KEYWORDS: &[&str] = &[
    "api",
    "bug",
    "erro",
    "sistema",
    "código",
    "deploy",
    "servidor",
    "banco",
    "dados",
    "endpoint",
    "request",
    "response",
    "integração",
];

/// Financial terms. "pagar" is shared with the action set and counts in both.
pub const FINANCEIRO_KEYWORDS: &[&str] = &[
    "pagar",
    "fatura",
    "boleto",
    "pagamento",
    "valor",
    "r$",
    "reais",
    "débito",
    "crédito",
    "cobrança",
    "pendência",
];

/// Urgency markers.
pub const URGENCIA_KEYWORDS: &[&str] = &[
    "urgente",
    "imediato",
    "asap",
    "prioritário",
    "crítico",
    "bloqueio",
];

// Patterns run against lower-cased text.
// NOTE: expect() is acceptable here: the patterns are constants.
static MONEY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"r\$\s*\d+|reais|\d+[.,]\d+").expect("Invalid regex: monetary value pattern")
});

static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{1,2}[/-]\d{1,2}[/-]\d{2,4}|\d{1,2}/\d{1,2}")
        .expect("Invalid regex: date pattern")
});

/// Keyword counts and pattern flags derived from one email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreVector {
    pub acao: u32,
    pub tecnico: u32,
    pub financeiro: u32,
    pub urgencia: u32,
    /// Sum of the four counters.
    pub total: u32,
    pub tem_valor_monetario: bool,
    pub tem_data: bool,
}

/// Number of distinct keywords from `set` that occur as substrings of `text`.
fn count_hits(text: &str, set: &[&str]) -> u32 {
    set.iter().filter(|keyword| text.contains(**keyword)).count() as u32
}

/// Scores an email. Matching is case-insensitive.
pub fn score(text: &str) -> ScoreVector {
    let lower = text.to_lowercase();

    let acao = count_hits(&lower, ACAO_KEYWORDS);
    let tecnico = count_hits(&lower, TECNICO_KEYWORDS);
    let financeiro = count_hits(&lower, FINANCEIRO_KEYWORDS);
    let urgencia = count_hits(&lower, URGENCIA_KEYWORDS);

    ScoreVector {
        acao,
        tecnico,
        financeiro,
        urgencia,
        total: acao + tecnico + financeiro + urgencia,
        tem_valor_monetario: MONEY_PATTERN.is_match(&lower),
        tem_data: DATE_PATTERN.is_match(&lower),
    }
}

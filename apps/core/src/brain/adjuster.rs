//! Confidence Adjuster.
//!
//! Post-processes the model's raw confidence using the [`ScoreVector`] and the
//! length of the email. Rules are kept in a priority-ordered list:
//!
//! 1. `ShortText`, `StrongIndicators`, `Urgency` form an exclusive group. The first
//!    rule whose selector matches is the only one of the group that runs, even when
//!    its effect turns out to be a no-op.
//! 2. `ShortUnproductive` is evaluated afterwards on its own and stacks on top.
//!
//! Notes describing an adjustment are appended to the model's rationale.

use tracing::{debug, info};

use super::scorer::ScoreVector;
use crate::models::{Category, ClassificationResult, RawModelResult, DEFAULT_RAZAO, DEFAULT_RESPOSTA};

/// Below this many characters the email counts as short.
pub const SHORT_TEXT_LIMIT: usize = 50;
/// Below this many characters an `Improdutivo` email needs no reply.
pub const TINY_TEXT_LIMIT: usize = 30;
/// Reply forced for tiny `Improdutivo` emails.
pub const NO_ACTION_REPLY: &str = "Nenhuma ação necessária.";

const SHORT_SPECIFIC_FLOOR: i64 = 85;
const SHORT_GENERIC_CEILING: i64 = 20;
const STRONG_BOOST: i64 = 15;
const STRONG_CAP: i64 = 95;
const HIGH_CONFIDENCE: i64 = 90;
const TINY_UNPRODUCTIVE_FLOOR: i64 = 95;

/// Everything a rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub categoria: Category,
    /// Characters in the trimmed email.
    pub text_len: usize,
    pub scores: &'a ScoreVector,
}

/// A confidence adjustment rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Short email: boost if specific, penalise if generic.
    ShortText,
    /// `Produtivo` with several strong indicators.
    StrongIndicators,
    /// `Produtivo` with explicit urgency.
    Urgency,
    /// Tiny `Improdutivo` email.
    ShortUnproductive,
}

/// The mutually exclusive group, in priority order.
pub const EXCLUSIVE_RULES: [Rule; 3] = [Rule::ShortText, Rule::StrongIndicators, Rule::Urgency];

/// A confidence change produced by one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjustment {
    pub rule: Rule,
    pub from: i64,
    pub to: i64,
    /// Text appended to the rationale, if the rule annotates.
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Raised,
    Adjusted,
}

impl Direction {
    fn verb(self) -> &'static str {
        match self {
            Direction::Raised => "aumentada",
            Direction::Adjusted => "ajustada",
        }
    }
}

fn note(direction: Direction, from: i64, to: i64, cause: &str) -> String {
    format!(
        " (Confiança {} de {}% para {}% devido a {})",
        direction.verb(),
        from,
        to,
        cause
    )
}

fn is_short_and_specific(scores: &ScoreVector) -> bool {
    scores.total >= 2 || scores.tem_valor_monetario || (scores.acao >= 1 && scores.tecnico >= 1)
}

impl Rule {
    /// Whether the rule claims this email.
    pub fn selects(&self, ctx: &RuleContext<'_>) -> bool {
        let scores = ctx.scores;
        match self {
            Rule::ShortText => ctx.text_len < SHORT_TEXT_LIMIT,
            Rule::StrongIndicators => {
                ctx.categoria == Category::Produtivo
                    && (scores.total >= 3 || (scores.tem_valor_monetario && scores.acao >= 1))
            }
            Rule::Urgency => ctx.categoria == Category::Produtivo && scores.urgencia >= 1,
            Rule::ShortUnproductive => {
                ctx.categoria == Category::Improdutivo && ctx.text_len < TINY_TEXT_LIMIT
            }
        }
    }

    /// The change this rule makes to `confidence`, if any. Assumes `selects` held.
    fn effect(&self, ctx: &RuleContext<'_>, confidence: i64) -> Option<Adjustment> {
        let adjustment = |to: i64, note: Option<String>| Adjustment {
            rule: *self,
            from: confidence,
            to,
            note,
        };

        match self {
            Rule::ShortText => {
                if is_short_and_specific(ctx.scores) {
                    (confidence < SHORT_SPECIFIC_FLOOR).then(|| {
                        let to = SHORT_SPECIFIC_FLOOR;
                        info!("BOOST aplicado: {}% → {}% (texto curto mas objetivo)", confidence, to);
                        adjustment(
                            to,
                            Some(note(
                                Direction::Raised,
                                confidence,
                                to,
                                "termos específicos e objetivos apesar da brevidade",
                            )),
                        )
                    })
                } else if ctx.scores.total == 0 && confidence > SHORT_GENERIC_CEILING {
                    let to = SHORT_GENERIC_CEILING;
                    info!("Penalidade aplicada: {}% → {}% (texto curto e genérico)", confidence, to);
                    Some(adjustment(
                        to,
                        Some(note(
                            Direction::Adjusted,
                            confidence,
                            to,
                            "brevidade e falta de contexto",
                        )),
                    ))
                } else {
                    None
                }
            }
            Rule::StrongIndicators => (confidence < HIGH_CONFIDENCE).then(|| {
                let to = (confidence + STRONG_BOOST).min(STRONG_CAP);
                info!("BOOST aplicado: {}% → {}% (múltiplos indicadores)", confidence, to);
                adjustment(
                    to,
                    Some(note(
                        Direction::Raised,
                        confidence,
                        to,
                        "múltiplos indicadores de importância",
                    )),
                )
            }),
            Rule::Urgency => (confidence < HIGH_CONFIDENCE).then(|| {
                let to = confidence.max(HIGH_CONFIDENCE);
                info!("Urgência detectada: confiança → {}%", to);
                adjustment(
                    to,
                    Some(note(
                        Direction::Adjusted,
                        confidence,
                        to,
                        "indicadores de urgência",
                    )),
                )
            }),
            // Never annotates the rationale.
            Rule::ShortUnproductive => (confidence < TINY_UNPRODUCTIVE_FLOOR).then(|| {
                info!("Improdutivo curto confirmado: confiança → {}%", TINY_UNPRODUCTIVE_FLOOR);
                adjustment(TINY_UNPRODUCTIVE_FLOOR, None)
            }),
        }
    }
}

/// Runs the rule list and returns the adjustments that fired, in order.
pub fn plan(ctx: &RuleContext<'_>, confidence: i64) -> Vec<Adjustment> {
    let mut adjustments = Vec::new();
    let mut current = confidence;

    if let Some(rule) = EXCLUSIVE_RULES.iter().find(|rule| rule.selects(ctx)) {
        debug!("Regra selecionada: {:?}", rule);
        if let Some(adjustment) = rule.effect(ctx, current) {
            current = adjustment.to;
            adjustments.push(adjustment);
        }
    }

    if Rule::ShortUnproductive.selects(ctx) {
        if let Some(adjustment) = Rule::ShortUnproductive.effect(ctx, current) {
            adjustments.push(adjustment);
        }
    }

    adjustments
}

/// Applies the adjustment rules to a raw model result and builds the final output.
pub fn adjust(result: RawModelResult, text: &str, scores: &ScoreVector) -> ClassificationResult {
    let categoria = result.categoria();
    let mut confianca = result.confianca();
    let ctx = RuleContext {
        categoria,
        text_len: text.trim().chars().count(),
        scores,
    };

    let mut razao = result.razao.unwrap_or_else(|| DEFAULT_RAZAO.to_string());
    for adjustment in plan(&ctx, confianca) {
        confianca = adjustment.to;
        if let Some(note) = adjustment.note {
            razao.push_str(&note);
        }
    }

    let resposta_sugerida = if Rule::ShortUnproductive.selects(&ctx) {
        NO_ACTION_REPLY.to_string()
    } else {
        result
            .resposta_sugerida
            .unwrap_or_else(|| DEFAULT_RESPOSTA.to_string())
    };

    ClassificationResult::new(categoria, confianca, razao, resposta_sugerida)
}

//! Email Classifier - orchestrator of the classification core.
//!
//! Pipeline for one email:
//! 1. Truncate the text and build the prompt
//! 2. Ask the language model for a JSON answer (temperature 0)
//! 3. Repair/parse the answer
//! 4. Score the full, untruncated text
//! 5. Adjust the confidence
//!
//! A failed model call becomes an `Erro` result; `classify` never fails.

use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use super::adjuster::adjust;
use super::json_repair::repair;
use super::prompt::{build_prompt, truncate_chars};
use super::scorer::score;
use crate::actors::traits::LlmActor;
use crate::config::ClassifierSettings;
use crate::models::{ClassificationRequest, ClassificationResult};

/// Classification core bound to a language-model backend.
pub struct EmailClassifier<L: LlmActor> {
    llm: Arc<L>,
    settings: ClassifierSettings,
}

impl<L: LlmActor> Clone for EmailClassifier<L> {
    fn clone(&self) -> Self {
        Self {
            llm: Arc::clone(&self.llm),
            settings: self.settings.clone(),
        }
    }
}

impl<L: LlmActor> EmailClassifier<L> {
    pub fn new(llm: Arc<L>, settings: ClassifierSettings) -> Self {
        Self { llm, settings }
    }

    pub fn settings(&self) -> &ClassifierSettings {
        &self.settings
    }

    /// Classifies one email.
    #[instrument(skip_all, fields(text_len = request.text.len()))]
    pub async fn classify(&self, request: ClassificationRequest) -> ClassificationResult {
        let text = request.text.as_str();
        let truncated = truncate_chars(text, self.settings.max_text_length);
        info!(
            "Analisando texto com {} caracteres (truncado: {})",
            request.trimmed_len(),
            truncated.chars().count()
        );

        let prompt = build_prompt(truncated);
        let raw = match self
            .llm
            .complete_json(prompt, self.settings.temperature)
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                error!("Erro ao processar com IA: {}", e);
                return ClassificationResult::technical_failure(e);
            }
        };
        info!("Resposta recebida do modelo");

        let parsed = repair(&raw);
        if !parsed.is_valid() {
            warn!("Resposta da IA inutilizável, seguindo com registro de erro");
        }
        let parsed = parsed.into_result();
        info!(
            "Classificação inicial: {} ({}%)",
            parsed.categoria(),
            parsed.confianca()
        );

        let scores = score(text);
        info!(
            "Análise semântica: ação={}, técnico={}, financeiro={}, urgência={}, total={}, valor={}, data={}",
            scores.acao,
            scores.tecnico,
            scores.financeiro,
            scores.urgencia,
            scores.total,
            scores.tem_valor_monetario,
            scores.tem_data
        );

        let result = adjust(parsed, text, &scores);
        info!(
            "Classificação final: {} ({}%)",
            result.categoria, result.confianca
        );
        result
    }
}

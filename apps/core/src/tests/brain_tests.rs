//! Brain Module Tests
//!
//! End-to-end runs of the classifier against a scripted model, plus properties
//! that must hold for any input.

use super::mock_llm::{answer, MockLlmActor};
use crate::brain::adjuster::NO_ACTION_REPLY;
use crate::brain::json_repair::{repair, strip_markdown_fences};
use crate::brain::scorer::score;
use crate::brain::{adjust, EmailClassifier};
use crate::config::ClassifierSettings;
use crate::models::{Category, ClassificationRequest, ClassificationResult, RawModelResult};
use std::sync::Arc;

async fn classify_with(reply: &str, text: &str) -> ClassificationResult {
    let classifier = EmailClassifier::new(
        Arc::new(MockLlmActor::replying(reply)),
        ClassifierSettings::default(),
    );
    classifier.classify(ClassificationRequest::new(text)).await
}

#[cfg(test)]
mod scenario_tests {
    use super::*;

    #[tokio::test]
    async fn test_short_technical_request_is_boosted() {
        let result = classify_with(&answer("Produtivo", 40), "Testar API").await;

        assert_eq!(result.categoria, Category::Produtivo);
        assert_eq!(result.confianca, 85);
        assert!(result.razao.contains("(Confiança aumentada de 40% para 85%"));
        assert_eq!(result.resposta_sugerida, "Resposta do modelo.");
    }

    #[tokio::test]
    async fn test_short_generic_text_is_penalized() {
        let result = classify_with(&answer("Produtivo", 70), "Ok").await;

        assert_eq!(result.confianca, 20);
        assert!(result
            .razao
            .ends_with("(Confiança ajustada de 70% para 20% devido a brevidade e falta de contexto)"));
    }

    #[tokio::test]
    async fn test_short_generic_text_at_ceiling_untouched() {
        let result = classify_with(&answer("Produtivo", 20), "Ok").await;

        assert_eq!(result.confianca, 20);
        assert_eq!(result.razao, "Motivo do modelo.");
    }

    #[tokio::test]
    async fn test_multiple_indicators_boost_productive() {
        let text = "Preciso corrigir o bug no sistema de cobrança antes da reunião de amanhã com o time.";
        let scores = score(text);
        assert!(scores.total >= 3);
        assert_eq!(scores.urgencia, 0);

        let result = classify_with(&answer("Produtivo", 70), text).await;

        assert_eq!(result.confianca, 85);
        assert!(result.razao.contains("múltiplos indicadores de importância"));
    }

    #[tokio::test]
    async fn test_short_unproductive_gets_no_action_reply() {
        let result = classify_with(&answer("Improdutivo", 50), "Feliz Natal").await;

        assert_eq!(result.categoria, Category::Improdutivo);
        assert_eq!(result.confianca, 95);
        assert_eq!(result.resposta_sugerida, NO_ACTION_REPLY);
    }

    #[tokio::test]
    async fn test_fenced_answer_is_repaired() {
        let fenced = format!("```json\n{}\n```", answer("Produtivo", 88));
        let text = "Bom dia, segue em anexo o relatório trimestral solicitado pela diretoria na semana passada.";

        let result = classify_with(&fenced, text).await;

        assert_eq!(result.categoria, Category::Produtivo);
        assert_eq!(result.confianca, 88);
        assert_eq!(result.razao, "Motivo do modelo.");
    }

    #[tokio::test]
    async fn test_model_failure_yields_error_result() {
        let classifier = EmailClassifier::new(
            Arc::new(MockLlmActor::failing("connection refused")),
            ClassifierSettings::default(),
        );

        let result = classifier
            .classify(ClassificationRequest::new("Preciso do boleto de outubro."))
            .await;

        assert_eq!(result.categoria, Category::Erro);
        assert_eq!(result.confianca, 0);
        assert!(result.razao.starts_with("Falha técnica na consulta à IA:"));
        assert!(result.razao.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_garbage_answer_yields_error_record() {
        let text = "Bom dia, segue em anexo o relatório trimestral solicitado pela diretoria na semana passada.";
        let result = classify_with("not json at all", text).await;

        assert_eq!(result.categoria, Category::Erro);
        assert_eq!(result.confianca, 0);
    }

    #[tokio::test]
    async fn test_unknown_category_passes_through() {
        let text = "Bom dia, segue em anexo o relatório trimestral solicitado pela diretoria na semana passada.";
        let result = classify_with(&answer("Spam", 60), text).await;

        assert_eq!(result.categoria, Category::Indefinido);
        assert_eq!(result.confianca, 60);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        "Ok",
        "Valeu",
        "Testar API",
        "URGENTE: pagar fatura de R$ 1.500,00 até 10/12/2024",
        "Obrigado pela atenção, tenham todos um excelente final de semana e boas festas!",
        "Bug crítico no servidor de produção, o deploy falhou e o banco de dados não responde.",
    ];

    #[test]
    fn test_confidence_always_in_range() {
        let categories = ["Produtivo", "Improdutivo", "Erro", "Indefinido"];
        for text in SAMPLES {
            let scores = score(text);
            for categoria in categories {
                for confianca in [-50, 0, 19, 20, 21, 50, 79, 80, 84, 85, 94, 95, 99, 100, 250] {
                    let raw = RawModelResult {
                        categoria: Some(Category::from_label(categoria)),
                        confianca: Some(confianca),
                        razao: None,
                        resposta_sugerida: None,
                    };
                    let result = adjust(raw, text, &scores);
                    assert!(
                        result.confianca <= 100,
                        "{} / {} / {} -> {}",
                        text,
                        categoria,
                        confianca,
                        result.confianca
                    );
                }
            }
        }
    }

    #[test]
    fn test_scorer_is_deterministic() {
        for text in SAMPLES {
            assert_eq!(score(text), score(text));
            assert_eq!(score(text), score(&text.to_uppercase()));
        }
    }

    #[test]
    fn test_fence_stripping_preserves_json() {
        let json = answer("Improdutivo", 77);
        let direct = repair(&json);
        let fenced = repair(&format!("```json\n{}\n```", json));
        let bare_fence = repair(&format!("```\n{}\n```", json));

        assert!(direct.is_valid());
        assert_eq!(direct, fenced);
        assert_eq!(direct, bare_fence);
        assert_eq!(strip_markdown_fences(&format!("```json{}```", json)), json);
    }

    #[test]
    fn test_unproductive_short_text_never_drops_confidence() {
        for confianca in [0, 10, 50, 94] {
            let raw = RawModelResult {
                categoria: Some(Category::Improdutivo),
                confianca: Some(confianca),
                razao: Some("r".to_string()),
                resposta_sugerida: Some("s".to_string()),
            };
            let result = adjust(raw, "Bom dia", &score("Bom dia"));
            assert_eq!(result.confianca, 95);
            assert_eq!(result.resposta_sugerida, NO_ACTION_REPLY);
        }
    }
}

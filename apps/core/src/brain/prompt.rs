//! Classification prompt sent to the language model.

/// Keeps at most `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Builds the instruction prompt around an already truncated email.
pub fn build_prompt(truncated: &str) -> String {
    format!(
        r#"
Você é um classificador sênior de emails corporativos. Analise o texto abaixo.

TEXTO:
"""{truncated}"""

REGRAS DE CLASSIFICAÇÃO:
- "Produtivo": Requer ação, suporte, dúvidas, pagamentos, relatórios, solicitações técnicas, testes de API/sistema, desenvolvimento.
- "Improdutivo": Apenas saudações, spam, agradecimentos vagos ou conteúdo ilegível.

CRITÉRIOS DE CONFIANÇA (0-100%):

ALTA CONFIANÇA (85-100%):
- Verbos de ação claros: "Pagar", "Resolver", "Testar", "Desenvolver", "Implementar", "Corrigir"
- Termos técnicos específicos: "API", "código", "bug", "erro", "sistema", "banco de dados"
- Valores monetários ou datas específicas
- Solicitações explícitas mesmo que curtas

MÉDIA CONFIANÇA (60-84%):
- Contexto financeiro/corporativo sem ação explícita
- Menção a processos sem urgência clara
- Termos genéricos de negócio

BAIXA CONFIANÇA (0-59%):
- Apenas fragmentos sem contexto ("Segue anexo", "Ok")
- Texto ambíguo ou ilegível
- Saudações isoladas

IMPORTANTE:
- Textos curtos (menos de 50 chars) MAS com termos técnicos específicos ou ações claras DEVEM ter confiança ALTA (85%+)
- A brevidade não é problema se o conteúdo é claro e objetivo
- "Testar API", "corrigir bug", "pagar fatura" são exemplos de textos curtos mas com alta confiança

Retorne APENAS JSON:
{{
  "categoria": "Produtivo" ou "Improdutivo",
  "confianca": (inteiro 0-100),
  "razao": "Explicação técnica e direta.",
  "resposta_sugerida": "Resposta formal e direta."
}}
"#
    )
}

//! # Persistência — Base de Regras e Relatório em Disco
//!
//! Dois arquivos JSON:
//!
//! | Arquivo | Direção | Tipo |
//! |---------|---------|------|
//! | base de regras (padrão `data/rules.json`) | leitura | [`RuleBook`] |
//! | relatório (`summary_path` na configuração) | escrita | [`Summary`] |
//!
//! A base é validada durante a desserialização: uma regra inválida rejeita
//! o arquivo inteiro, com o motivo no contexto do erro.
//!
//! ## ⚠️ Atomicidade
//!
//! A escrita do relatório **não é atômica**: um crash no meio da escrita
//! deixa o arquivo truncado.

use std::path::Path;

use anyhow::{Context, Result};

use crate::core::{KnowledgeBase, RuleBook};
use crate::summary::Summary;

/// Carrega a base de regras de um arquivo JSON.
///
/// # Erros
///
/// Arquivo ausente ou ilegível, JSON malformado ou regra inválida.
pub fn load_rule_book(path: &Path) -> Result<RuleBook> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Falha ao ler a base de regras {}", path.display()))?;
    let book: RuleBook = serde_json::from_str(&json)
        .with_context(|| format!("Falha ao desserializar {}", path.display()))?;
    tracing::info!(path = %path.display(), rules = book.rule_count(), "Base de regras carregada");
    Ok(book)
}

/// Grava o relatório como JSON pretty-printed, criando o diretório pai.
pub fn save_summary(summary: &Summary, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Falha ao criar diretório {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(summary).context("Falha ao serializar o relatório")?;
    std::fs::write(path, json)
        .with_context(|| format!("Falha ao escrever {}", path.display()))?;
    tracing::info!(path = %path.display(), "Relatório gravado");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::knowledge_base::tests::chain_book;
    use crate::core::Fact;
    use crate::inference::engine::tests::engine_with;

    #[test]
    fn test_load_rule_book_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        std::fs::write(
            &path,
            r#"{
                "rules": [
                    { "causes": ["A", { "fact": "B", "weight": 0.4 }], "goals": ["C"] },
                    { "causes": ["C"], "goals": ["D"], "question": "Você confirma {fact}?" }
                ],
                "questions": { "A": "O paciente tem febre?" }
            }"#,
        )
        .unwrap();

        let book = load_rule_book(&path).unwrap();
        assert_eq!(book.rule_count(), 2);
        assert_eq!(book.find_rule_by_goal("D"), Some(1));
        assert_eq!(book.question_for("A").as_deref(), Some("O paciente tem febre?"));
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        let err = load_rule_book(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("nope.json"));
    }

    /// Uma regra inválida rejeita o arquivo inteiro
    #[test]
    fn test_load_rejects_invalid_rule() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        std::fs::write(&path, r#"{ "rules": [ { "causes": [], "goals": ["C"] } ] }"#).unwrap();
        assert!(load_rule_book(&path).is_err());
    }

    #[test]
    fn test_save_summary_creates_parent_dir() {
        let mut engine = engine_with(
            chain_book(),
            vec![Fact::positive("A"), Fact::positive("B")],
            &[],
            &[],
        );
        engine.forward().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("summary.json");
        save_summary(&engine.summary(), &path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["rules"].as_array().unwrap().len(), 2);
    }
}

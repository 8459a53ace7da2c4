//! # Erros do Motor e da Configuração
//!
//! Um enum por subsistema, todos com `thiserror`:
//!
//! | Erro | Quando | Gravidade |
//! |------|--------|-----------|
//! | [`EngineError::Precondition`] | algoritmo chamado sem fatos/objetivos semente | aborta a chamada |
//! | [`EngineError::RuleNotFound`] | índice de regra fora da base | base malformada |
//! | [`EngineError::FactNotFound`] | fato exigido ausente da store | base malformada |
//! | [`EngineError::Configuration`] | motor montado sem viewer ou com limiar inválido | aborta a construção |
//! | [`EngineError::InvalidRule`] | regra rejeitada no carregamento | base malformada |
//! | [`ConfigError`] | arquivo ou variável de ambiente inválidos | aborta o programa |
//!
//! Uma resposta `Unsure` no encadeamento para trás **não** é erro: é um
//! término definido, reportado como
//! [`Outcome::Aborted`](crate::inference::Outcome::Aborted).
//!
//! Depois de um erro fatal, os fatos já derivados continuam inspecionáveis no
//! motor, mas não há garantia de consistência para uma nova chamada.

use thiserror::Error;

use crate::core::RuleId;

/// Erros do motor de inferência e da base de conhecimento.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("pré-condição violada: {0}")]
    Precondition(String),

    #[error("regra {0} não existe na base de conhecimento")]
    RuleNotFound(RuleId),

    #[error("fato '{0}' não encontrado")]
    FactNotFound(String),

    #[error("configuração inválida: {0}")]
    Configuration(String),

    #[error("regra {rule} inválida: {reason}")]
    InvalidRule { rule: RuleId, reason: String },
}

/// Erros de carregamento e validação da configuração.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("arquivo de configuração não encontrado: {path}")]
    FileNotFound { path: String },

    #[error("erro de parsing em {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("valor inválido em '{field}': {message}")]
    ValidationFailed { field: String, message: String },
}

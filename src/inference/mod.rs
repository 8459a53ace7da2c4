//! # Módulo Inference — Motor de Encadeamento de Regras
//!
//! Este módulo contém o **motor de inferência**: a partir de fatos iniciais,
//! objetivos e uma [`KnowledgeBase`](crate::core::KnowledgeBase), deriva
//! fatos novos disparando regras.
//!
//! ## Algoritmos
//!
//! | Algoritmo | Dirigido por | Pergunta ao usuário? | Para quando |
//! |-----------|--------------|----------------------|-------------|
//! | **forward** | dados | não | nenhuma regra nova casa |
//! | **backward** | objetivos | sim (folhas) | fila vazia ou resposta `talvez` |
//! | **mixed** | ambos | sim | um positivo é inferido ou não há mais hipóteses |
//!
//! ## Resultado
//!
//! Toda execução devolve um [`Outcome`]. Abortar por resposta incerta não
//! é erro (`Err`), e sim um resultado distinguível de "terminou sem concluir".
//! `Err` fica reservado para violações de pré-condição e bases inconsistentes.
//!
//! ```text
//! Completed            → terminou normalmente (talvez sem nada inferido)
//! Concluded { fact }   → o misto encontrou um fato positivo
//! Aborted { fact }     → o usuário respondeu `talvez` para `fact`
//! Stalled { rounds }   → o misto desistiu (hipóteses repetidas ou limite)
//! ```

pub mod engine;

pub mod goals;

pub mod matching;

mod forward;

mod backward;

mod mixed;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

pub use engine::{
    EngineBuilder, InferenceEngine, Shot, ShootPolicy, ShotRules, DEFAULT_FOUND_FACTOR,
    DEFAULT_MAX_MIXED_ROUNDS,
};
pub use goals::{GoalQueue, PendingGoal, VisitedRules};

/// Resultado de uma execução do motor.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Completed,
    Concluded { fact: String },
    Aborted { fact: String },
    Stalled { rounds: usize },
}

impl Outcome {
    /// Falso apenas quando o usuário interrompeu com `talvez`.
    pub fn is_success(&self) -> bool {
        !matches!(self, Outcome::Aborted { .. })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Completed => f.write_str("concluído"),
            Outcome::Concluded { fact } => write!(f, "conclusão: {}", fact),
            Outcome::Aborted { fact } => write!(f, "interrompido em '{}'", fact),
            Outcome::Stalled { rounds } => write!(f, "sem conclusão após {} rodada(s)", rounds),
        }
    }
}

/// Algoritmo escolhido na configuração.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Forward,
    Backward,
    Mixed,
}

impl FromStr for Strategy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "forward" => Ok(Strategy::Forward),
            "backward" => Ok(Strategy::Backward),
            "mixed" => Ok(Strategy::Mixed),
            other => Err(EngineError::Configuration(format!(
                "algoritmo desconhecido: '{}' (use forward, backward ou mixed)",
                other
            ))),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::Forward => "forward",
            Strategy::Backward => "backward",
            Strategy::Mixed => "mixed",
        })
    }
}

impl InferenceEngine {
    /// Executa o algoritmo escolhido.
    pub fn run(&mut self, strategy: Strategy) -> Result<Outcome, EngineError> {
        tracing::info!(%strategy, "Iniciando inferência");
        match strategy {
            Strategy::Forward => self.forward(),
            Strategy::Backward => self.backward(),
            Strategy::Mixed => self.mixed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::knowledge_base::tests::chain_book;
    use crate::core::Fact;
    use crate::inference::engine::tests::engine_with;

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("Mixed".parse::<Strategy>().unwrap(), Strategy::Mixed);
        assert_eq!(" backward ".parse::<Strategy>().unwrap(), Strategy::Backward);
        assert!(matches!(
            "sideways".parse::<Strategy>(),
            Err(EngineError::Configuration(_))
        ));
    }

    /// O status vai numa tag `status` ao serializar
    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(Outcome::Aborted { fact: "B".into() }).unwrap();
        assert_eq!(json["status"], "aborted");
        assert_eq!(json["fact"], "B");
        let json = serde_json::to_value(Outcome::Completed).unwrap();
        assert_eq!(json["status"], "completed");
    }

    #[test]
    fn test_run_dispatches_and_records_outcome() {
        let mut engine = engine_with(
            chain_book(),
            vec![Fact::positive("A"), Fact::positive("B")],
            &[],
            &[],
        );
        assert!(engine.last_outcome().is_none());
        let outcome = engine.run(Strategy::Forward).unwrap();
        assert_eq!(engine.last_outcome(), Some(&outcome));
    }
}

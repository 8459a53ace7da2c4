//! # Encadeamento para Frente (dirigido por dados)
//!
//! ```text
//! id = 0
//! enquanto id < número de regras:
//!   se regra[id] não disparou E todas as causas são conhecidas:
//!     shoot(regra[id]); id = 0        // fatos novos podem satisfazer regras anteriores
//!   senão:
//!     id += 1
//! ```
//!
//! Termina porque cada disparo aumenta estritamente o conjunto de regras
//! disparadas, que é finito; sem disparos, a varredura acaba em uma passada.
//! Terminar sem fatos inferidos é um resultado válido, não um erro.

use crate::core::Algorithm;
use crate::error::EngineError;

use super::engine::InferenceEngine;
use super::matching::fully_matches;
use super::Outcome;

impl InferenceEngine {
    /// Executa o encadeamento para frente.
    ///
    /// # Erros
    ///
    /// [`EngineError::Precondition`] sem fatos iniciais.
    pub fn forward(&mut self) -> Result<Outcome, EngineError> {
        let outcome = self.run_forward()?;
        self.viewer.print(&format!(
            "Encadeamento para frente concluído: {} regra(s) disparada(s), {} fato(s) inferido(s)",
            self.shot.len(),
            self.inference.len()
        ));
        self.last_outcome = Some(outcome.clone());
        Ok(outcome)
    }

    pub(super) fn run_forward(&mut self) -> Result<Outcome, EngineError> {
        if self.initial.is_empty() {
            return Err(EngineError::Precondition(
                "o encadeamento para frente exige ao menos um fato inicial".into(),
            ));
        }

        let mut id = 0;
        while id < self.kb.rule_count() {
            if !self.shot.contains(id) {
                let matched = {
                    let rule = self.kb.rule(id)?;
                    fully_matches(rule, &self.known_stores())
                };
                if matched {
                    self.shoot(id, Algorithm::Forward)?;
                    id = 0;
                    continue;
                }
            }
            id += 1;
        }

        tracing::debug!(shot = self.shot.len(), "Ponto fixo do encadeamento para frente");
        Ok(Outcome::Completed)
    }
}

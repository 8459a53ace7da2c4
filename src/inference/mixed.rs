//! # Encadeamento Misto
//!
//! Alterna os dois algoritmos até encontrar um fato inferido **positivo**:
//!
//! ```text
//! loop:
//!   1. forward()                         : falha se não há fatos iniciais
//!   2. algum fato inferido positivo?     → Concluded
//!   3. fatos intuitivos = objetivos das regras não disparadas com
//!        found_factor ≤ fator de certeza < 1
//!   4. nenhum?                           → Completed (ponto fixo sem conclusão)
//!   5. para cada fato intuitivo: backward() só sobre ele;
//!        algum positivo depois?          → Concluded
//!   6. volta ao passo 1
//! ```
//!
//! Regras com fator 1.0 (casamento completo) são do `forward`, não daqui.
//!
//! ## Política de Término
//!
//! O laço externo não tem limite natural: uma base que nunca produz um
//! positivo pode regenerar o mesmo conjunto intuitivo para sempre. Por isso
//! a execução termina com [`Outcome::Stalled`] quando
//!
//! - o conjunto de fatos intuitivos da rodada já apareceu numa rodada
//!   anterior, ou
//! - `max_mixed_rounds` rodadas foram executadas.
//!
//! Antes de cada `backward` intuitivo a fila de objetivos e a pilha de
//! regras visitadas são esvaziadas: um ramo abortado por `talvez` não
//! contamina o próximo.

use std::collections::{BTreeSet, HashSet};

use crate::error::EngineError;

use super::engine::InferenceEngine;
use super::matching::causes_match_factor;
use super::Outcome;

impl InferenceEngine {
    /// Executa o encadeamento misto.
    ///
    /// # Erros
    ///
    /// [`EngineError::Precondition`] sem fatos iniciais (verificado pelo `forward`).
    pub fn mixed(&mut self) -> Result<Outcome, EngineError> {
        let outcome = self.run_mixed()?;
        let message = match &outcome {
            Outcome::Concluded { fact } => format!("Conclusão encontrada: {}", fact),
            Outcome::Stalled { rounds } => {
                format!("Sem conclusão após {} rodada(s): fatos intuitivos repetidos", rounds)
            }
            _ => "Sem conclusão: nenhuma regra plausível restante".to_string(),
        };
        self.viewer.print(&message);
        self.last_outcome = Some(outcome.clone());
        Ok(outcome)
    }

    fn run_mixed(&mut self) -> Result<Outcome, EngineError> {
        let mut seen: HashSet<BTreeSet<String>> = HashSet::new();
        let mut rounds = 0;

        loop {
            rounds += 1;
            tracing::debug!(round = rounds, "Rodada do encadeamento misto");

            self.run_forward()?;
            if let Some(fact) = self.positive_conclusion() {
                return Ok(Outcome::Concluded { fact });
            }

            let intuitive = self.intuitive_facts()?;
            if intuitive.is_empty() {
                return Ok(Outcome::Completed);
            }
            if !seen.insert(intuitive.iter().cloned().collect()) {
                tracing::info!(round = rounds, "Conjunto intuitivo repetido, encerrando");
                return Ok(Outcome::Stalled { rounds });
            }

            for fact in intuitive {
                self.goals.clear();
                self.visited.clear();
                self.push_goal(&fact);

                if let Outcome::Aborted { fact: unresolved } = self.run_backward()? {
                    self.viewer.debug(&format!(
                        "Hipótese '{}' abandonada: '{}' ficou sem resposta",
                        fact, unresolved
                    ));
                }
                if let Some(fact) = self.positive_conclusion() {
                    return Ok(Outcome::Concluded { fact });
                }
            }

            if rounds >= self.max_mixed_rounds {
                tracing::warn!(rounds, "Limite de rodadas do encadeamento misto atingido");
                return Ok(Outcome::Stalled { rounds });
            }
        }
    }

    /// Objetivos das regras não disparadas cujo fator de certeza está em
    /// `[found_factor, 1)`, sem repetição, na ordem das regras.
    pub fn intuitive_facts(&mut self) -> Result<Vec<String>, EngineError> {
        let mut intuitive: Vec<String> = Vec::new();
        for id in 0..self.kb.rule_count() {
            if self.shot.contains(id) {
                continue;
            }
            let (factor, goals) = {
                let rule = self.kb.rule(id)?;
                (causes_match_factor(rule, &self.known_stores()), rule.goals.clone())
            };
            if factor >= self.found_factor && factor < 1.0 {
                self.viewer.debug(&format!(
                    "Regra {} plausível (fator {:.2}): {}",
                    id,
                    factor,
                    goals.join(", ")
                ));
                for goal in goals {
                    if !intuitive.contains(&goal) {
                        intuitive.push(goal);
                    }
                }
            }
        }
        Ok(intuitive)
    }
}

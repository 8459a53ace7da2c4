//! # Encadeamento para Trás (dirigido por objetivos)
//!
//! Cada iteração olha a **frente** da [`GoalQueue`](super::goals::GoalQueue):
//!
//! 1. **Já conhecido** (em `initial`, `asked` ou `inference`, qualquer
//!    sinal): sai da fila; se é causa de uma regra visitada, decrementa a
//!    contagem pendente dela. Regra com zero pendentes sai da pilha e dispara.
//! 2. **Produzido por alguma regra** ainda não disparada e fora da pilha:
//!    a regra é empilhada e suas causas entram **à frente** da fila, na
//!    ordem declarada (profundidade, esquerda → direita).
//! 3. **Folha**: pergunta ao [`Viewer`](crate::viewer::Viewer). `sim`/`não`
//!    vão para `asked`; `talvez` **aborta** a execução inteira.
//!
//! ```text
//! fila [D]              → R1 produz D: pilha [R1 1/1], fila [C(R1), D]
//! fila [C(R1), D]       → R0 produz C: pilha [R0 2/2, R1], fila [A(R0), B(R0), C(R1), D]
//! fila [A(R0), ...]     → folha: pergunta A
//! ...                   → A, B resolvidos: R0 dispara (C), depois R1 (D)
//! ```
//!
//! A execução acaba com a fila vazia ([`Outcome::Completed`]) ou com uma
//! resposta incerta ([`Outcome::Aborted`]), e o chamador precisa distinguir
//! os dois.

use crate::core::{Algorithm, Fact, RuleId, Sign};
use crate::error::EngineError;
use crate::viewer::{default_question, Question};

use super::engine::InferenceEngine;
use super::goals::PendingGoal;
use super::Outcome;

impl InferenceEngine {
    /// Executa o encadeamento para trás sobre os objetivos já enfileirados.
    ///
    /// # Erros
    ///
    /// [`EngineError::Precondition`] com a fila de objetivos vazia.
    pub fn backward(&mut self) -> Result<Outcome, EngineError> {
        if self.goals.is_empty() {
            return Err(EngineError::Precondition(
                "o encadeamento para trás exige ao menos um objetivo".into(),
            ));
        }
        let outcome = self.run_backward()?;
        match &outcome {
            Outcome::Aborted { fact } => self.viewer.print(&format!(
                "Encadeamento para trás interrompido: sem resposta para '{}'",
                fact
            )),
            _ => self.viewer.print(&format!(
                "Encadeamento para trás concluído: {} regra(s) disparada(s)",
                self.shot.len()
            )),
        }
        self.last_outcome = Some(outcome.clone());
        Ok(outcome)
    }

    /// Enfileira uma hipótese no fim da fila de objetivos.
    pub fn push_goal(&mut self, fact: &str) {
        let fact = crate::core::fact::normalize_id(fact);
        self.goals.push_back(PendingGoal::hypothesis(fact.clone()));
        if !self.hypotheses.contains(&fact) {
            self.hypotheses.push(fact);
        }
    }

    pub(super) fn run_backward(&mut self) -> Result<Outcome, EngineError> {
        while let Some(pending) = self.goals.front().cloned() {
            // 1. Já conhecido
            if self.is_known(&pending.fact) {
                self.goals.pop_front();
                if let Some(owner) = pending.owner {
                    self.resolve_cause(owner)?;
                }
                continue;
            }

            // 2. Expansão pela primeira regra produtora disponível
            if let Some(rule_id) = self.expandable_rule(&pending.fact) {
                let causes: Vec<String> = self
                    .kb
                    .causes_of(rule_id)?
                    .iter()
                    .map(|cause| cause.fact.clone())
                    .collect();
                tracing::debug!(rule = rule_id, goal = %pending.fact, causes = causes.len(), "Expandindo regra");
                self.viewer.debug(&format!(
                    "'{}' depende da regra {}: verificando {}",
                    pending.fact,
                    rule_id,
                    causes.join(", ")
                ));
                self.visited.push(rule_id, causes.len());
                self.goals.expand(rule_id, causes.into_iter());
                continue;
            }

            // 3. Folha: pergunta ao usuário
            let text = self
                .kb
                .question_for(&pending.fact)
                .unwrap_or_else(|| default_question(&pending.fact));
            let answer = self.viewer.ask(&Question::new(&pending.fact, &text));
            match answer {
                Sign::Positive | Sign::Negative => {
                    tracing::info!(fact = %pending.fact, answer = %answer.label(), "Resposta registrada");
                    self.asked
                        .append(Fact::new(&pending.fact, answer).answered(Algorithm::Backward));
                }
                Sign::Unsure => {
                    tracing::info!(fact = %pending.fact, "Resposta incerta, abortando");
                    return Ok(Outcome::Aborted { fact: pending.fact });
                }
            }
        }

        if !self.visited.is_empty() {
            tracing::warn!(pending = self.visited.len(), "Fila vazia com regras ainda visitadas");
        }
        Ok(Outcome::Completed)
    }

    /// Primeira regra que produz `fact`, ainda não disparada e fora da pilha.
    fn expandable_rule(&self, fact: &str) -> Option<RuleId> {
        self.kb
            .rules_for_goal(fact)
            .into_iter()
            .find(|&rule| !self.shot.contains(rule) && !self.visited.contains(rule))
    }

    /// Uma causa de `owner` foi resolvida; dispara a regra se era a última.
    fn resolve_cause(&mut self, owner: RuleId) -> Result<(), EngineError> {
        if let Some(rule) = self.visited.resolve_one(owner) {
            self.shoot(rule, Algorithm::Backward)?;
        }
        Ok(())
    }
}

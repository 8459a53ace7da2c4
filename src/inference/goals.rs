//! # Fila de Objetivos e Pilha de Regras Visitadas
//!
//! Estruturas de controle do encadeamento para trás:
//!
//! - [`GoalQueue`] — deque de fatos a verificar. `push_front` é usado **só**
//!   na expansão das causas de uma regra (busca em profundidade);
//!   `push_back` é reservado para semear hipóteses (objetivos do chamador e
//!   fatos intuitivos do algoritmo misto).
//! - [`VisitedRules`] — pilha LIFO de regras expandidas cujas causas ainda
//!   estão pendentes.
//!
//! ```text
//! fila:   [A(R0), B(R0), D]        pilha: [R0 2/2, R1 1/1]
//!          └ causas de R0 ┘  └ hipótese
//! ```
//!
//! A fila aceita o mesmo fato mais de uma vez: cada entrada carrega a regra
//! dona, e resolver a entrada decrementa exatamente aquela regra.

use std::collections::VecDeque;

use serde::Serialize;

use crate::core::RuleId;

/// Entrada da fila de objetivos.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PendingGoal {
    /// Fato a verificar.
    pub fact: String,
    /// Regra cuja causa este fato é. `None` para hipóteses semeadas.
    pub owner: Option<RuleId>,
}

impl PendingGoal {
    pub fn hypothesis(fact: impl Into<String>) -> Self {
        Self {
            fact: fact.into(),
            owner: None,
        }
    }

    pub fn cause_of(fact: impl Into<String>, owner: RuleId) -> Self {
        Self {
            fact: fact.into(),
            owner: Some(owner),
        }
    }
}

/// Fila de objetivos com inserção nas duas pontas.
#[derive(Clone, Debug, Default)]
pub struct GoalQueue {
    entries: VecDeque<PendingGoal>,
}

impl GoalQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Semeia uma hipótese no fim da fila.
    pub fn push_back(&mut self, goal: PendingGoal) {
        self.entries.push_back(goal);
    }

    /// Enfileira as causas de `owner` à frente, preservando a ordem declarada:
    /// a próxima entrada retirada é a primeira causa.
    pub fn expand(&mut self, owner: RuleId, causes: impl DoubleEndedIterator<Item = String>) {
        for fact in causes.rev() {
            self.entries.push_front(PendingGoal::cause_of(fact, owner));
        }
    }

    pub fn front(&self) -> Option<&PendingGoal> {
        self.entries.front()
    }

    pub fn pop_front(&mut self) -> Option<PendingGoal> {
        self.entries.pop_front()
    }

    pub fn contains(&self, fact: &str) -> bool {
        self.entries.iter().any(|goal| goal.fact == fact)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingGoal> + '_ {
        self.entries.iter()
    }
}

/// Regra expandida aguardando a resolução de suas causas.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VisitedRule {
    pub rule: RuleId,
    pub causes_total: usize,
    pub causes_pending: usize,
}

/// Pilha de regras visitadas, topo na frente.
#[derive(Clone, Debug, Default)]
pub struct VisitedRules {
    stack: VecDeque<VisitedRule>,
}

impl VisitedRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empilha uma regra com todas as `causes` pendentes.
    pub fn push(&mut self, rule: RuleId, causes: usize) {
        self.stack.push_front(VisitedRule {
            rule,
            causes_total: causes,
            causes_pending: causes,
        });
    }

    pub fn contains(&self, rule: RuleId) -> bool {
        self.stack.iter().any(|visited| visited.rule == rule)
    }

    /// Marca uma causa de `rule` como resolvida.
    ///
    /// Quando a contagem pendente chega a zero, a regra sai da pilha e seu id
    /// é devolvido para ser disparado.
    pub fn resolve_one(&mut self, rule: RuleId) -> Option<RuleId> {
        let position = self.stack.iter().position(|visited| visited.rule == rule)?;
        let entry = &mut self.stack[position];
        entry.causes_pending = entry.causes_pending.saturating_sub(1);
        if entry.causes_pending == 0 {
            self.stack.remove(position);
            Some(rule)
        } else {
            None
        }
    }

    pub fn top(&self) -> Option<&VisitedRule> {
        self.stack.front()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.stack.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &VisitedRule> + '_ {
        self.stack.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// As causas expandidas saem na ordem declarada, antes das hipóteses
    #[test]
    fn test_expand_is_depth_first_left_to_right() {
        let mut queue = GoalQueue::new();
        queue.push_back(PendingGoal::hypothesis("D"));
        queue.push_back(PendingGoal::hypothesis("E"));
        queue.expand(0, ["A".to_string(), "B".to_string()].into_iter());

        let order: Vec<_> = std::iter::from_fn(|| queue.pop_front())
            .map(|goal| (goal.fact, goal.owner))
            .collect();
        assert_eq!(
            order,
            vec![
                ("A".to_string(), Some(0)),
                ("B".to_string(), Some(0)),
                ("D".to_string(), None),
                ("E".to_string(), None),
            ]
        );
    }

    /// O mesmo fato pode aparecer para regras diferentes
    #[test]
    fn test_queue_keeps_duplicates_per_owner() {
        let mut queue = GoalQueue::new();
        queue.expand(0, ["X".to_string()].into_iter());
        queue.expand(1, ["X".to_string()].into_iter());
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.front().unwrap().owner, Some(1));
    }

    #[test]
    fn test_visited_rule_pops_when_all_causes_resolved() {
        let mut visited = VisitedRules::new();
        visited.push(1, 1);
        visited.push(0, 2);
        assert_eq!(visited.top().unwrap().rule, 0);

        assert_eq!(visited.resolve_one(0), None);
        assert_eq!(visited.top().unwrap().causes_pending, 1);
        assert_eq!(visited.resolve_one(0), Some(0));
        assert!(!visited.contains(0));

        assert_eq!(visited.resolve_one(1), Some(1));
        assert!(visited.is_empty());
    }

    #[test]
    fn test_resolve_unknown_rule_is_noop() {
        let mut visited = VisitedRules::new();
        visited.push(3, 1);
        assert_eq!(visited.resolve_one(9), None);
        assert_eq!(visited.len(), 1);
    }
}

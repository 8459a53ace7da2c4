//! # KnowledgeBase — Interface da Base de Regras
//!
//! O motor de inferência só enxerga a base através do trait
//! [`KnowledgeBase`], uma interface de capacidade, somente leitura. O
//! formato de armazenamento fica a cargo do adaptador concreto; o motor
//! nunca inspeciona qual adaptador recebeu.
//!
//! ## Operações
//!
//! | Método | Retorno | Erro |
//! |--------|---------|------|
//! | `rule_count()` | número de regras | — |
//! | `rule(id)` | a regra | `RuleNotFound` |
//! | `causes_of(id)` | causas ordenadas | `RuleNotFound` |
//! | `goals_of(id)` | objetivos ordenados | `RuleNotFound` |
//! | `rules_for_goal(fato)` | regras que produzem o fato, por id | — |
//! | `find_rule_by_goal(fato)` | primeira delas | — |
//! | `question_for(fato)` | texto da pergunta | — |
//!
//! ## RuleBook
//!
//! [`RuleBook`] é o adaptador padrão, carregado de JSON por
//! [`persistence::load_rule_book`](crate::persistence::load_rule_book):
//!
//! ```json
//! {
//!   "rules": [
//!     { "causes": ["A", { "fact": "B", "weight": 0.4 }], "goals": ["C"] }
//!   ],
//!   "questions": { "A": "O paciente tem febre?" }
//! }
//! ```
//!
//! Mantém um **índice reverso** objetivo → regras, montado na inserção, para
//! que o encadeamento para trás encontre a regra produtora sem varrer a base.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use crate::error::EngineError;

use super::fact::normalize_id;
use super::rule::{Cause, Rule, RuleId};

/// Interface somente leitura sobre um conjunto de regras.
pub trait KnowledgeBase {
    /// Número de regras. Ids válidos vão de `0` a `rule_count() - 1`.
    fn rule_count(&self) -> usize;

    /// Regra pelo índice.
    fn rule(&self, id: RuleId) -> Result<&Rule, EngineError>;

    /// Texto da pergunta a fazer sobre `fact`, se a base definir um.
    fn question_for(&self, fact: &str) -> Option<String>;

    fn causes_of(&self, id: RuleId) -> Result<&[Cause], EngineError> {
        Ok(&self.rule(id)?.causes)
    }

    fn goals_of(&self, id: RuleId) -> Result<&[String], EngineError> {
        Ok(&self.rule(id)?.goals)
    }

    /// Todas as regras cujo conjunto de objetivos contém `fact`, em ordem de id.
    fn rules_for_goal(&self, fact: &str) -> Vec<RuleId> {
        (0..self.rule_count())
            .filter(|&id| self.rule(id).map(|rule| rule.has_goal(fact)).unwrap_or(false))
            .collect()
    }

    /// A primeira regra que produz `fact`.
    fn find_rule_by_goal(&self, fact: &str) -> Option<RuleId> {
        self.rules_for_goal(fact).into_iter().next()
    }
}

/// Causa como aparece no arquivo: id simples ou `{ fact, weight }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CauseEntry {
    Plain(String),
    Weighted {
        fact: String,
        #[serde(default)]
        weight: Option<f64>,
    },
}

impl From<CauseEntry> for Cause {
    fn from(entry: CauseEntry) -> Self {
        match entry {
            CauseEntry::Plain(fact) => Cause::new(fact),
            CauseEntry::Weighted { fact, weight } => Cause { fact, weight },
        }
    }
}

/// Regra como aparece no arquivo.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleEntry {
    pub causes: Vec<CauseEntry>,
    pub goals: Vec<String>,
    #[serde(default)]
    pub question: Option<String>,
}

/// Documento JSON completo da base.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuleBookDocument {
    #[serde(default)]
    pub rules: Vec<RuleEntry>,
    #[serde(default)]
    pub questions: HashMap<String, String>,
}

/// Base de regras em memória, adaptador padrão do trait [`KnowledgeBase`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "RuleBookDocument")]
pub struct RuleBook {
    rules: Vec<Rule>,
    /// Perguntas explícitas por fato.
    questions: HashMap<String, String>,
    /// Índice reverso: fato objetivo → regras que o produzem (em ordem de id).
    goal_index: HashMap<String, Vec<RuleId>>,
}

impl RuleBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Valida e adiciona uma regra, devolvendo seu id (a próxima posição).
    ///
    /// Ids de fatos são normalizados. Rejeita regras sem causas, sem
    /// objetivos, com causa repetida ou com peso fora de `[0, 1]`.
    pub fn add_rule(
        &mut self,
        causes: Vec<Cause>,
        goals: Vec<String>,
        question: Option<String>,
    ) -> Result<RuleId, EngineError> {
        let id = self.rules.len();
        let invalid = |reason: String| EngineError::InvalidRule { rule: id, reason };

        if causes.is_empty() {
            return Err(invalid("nenhuma causa declarada".into()));
        }
        if goals.is_empty() {
            return Err(invalid("nenhum objetivo declarado".into()));
        }

        let mut seen = HashSet::new();
        let mut normalized_causes = Vec::with_capacity(causes.len());
        for cause in causes {
            let fact = normalize_id(&cause.fact);
            if fact.is_empty() {
                return Err(invalid("causa com id vazio".into()));
            }
            if let Some(weight) = cause.weight {
                if !(0.0..=1.0).contains(&weight) {
                    return Err(invalid(format!("peso {} de '{}' fora de [0, 1]", weight, fact)));
                }
            }
            if !seen.insert(fact.clone()) {
                return Err(invalid(format!("causa '{}' repetida", fact)));
            }
            normalized_causes.push(Cause {
                fact,
                weight: cause.weight,
            });
        }

        let mut normalized_goals = Vec::with_capacity(goals.len());
        for goal in goals {
            let goal = normalize_id(&goal);
            if goal.is_empty() {
                return Err(invalid("objetivo com id vazio".into()));
            }
            if !normalized_goals.contains(&goal) {
                normalized_goals.push(goal);
            }
        }

        // Atualiza o índice reverso para cada objetivo
        for goal in &normalized_goals {
            self.goal_index.entry(goal.clone()).or_default().push(id);
        }

        let rule = Rule {
            id,
            causes: normalized_causes,
            goals: normalized_goals,
            question,
        };
        tracing::debug!(rule = %rule, "KB: regra armazenada");
        self.rules.push(rule);
        Ok(id)
    }

    /// Registra a pergunta a fazer sobre um fato.
    pub fn add_question(&mut self, fact: &str, question: impl Into<String>) {
        self.questions.insert(normalize_id(fact), question.into());
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

impl TryFrom<RuleBookDocument> for RuleBook {
    type Error = EngineError;

    fn try_from(document: RuleBookDocument) -> Result<Self, Self::Error> {
        let mut book = RuleBook::new();
        for entry in document.rules {
            book.add_rule(
                entry.causes.into_iter().map(Cause::from).collect(),
                entry.goals,
                entry.question,
            )?;
        }
        for (fact, question) in document.questions {
            book.add_question(&fact, question);
        }
        Ok(book)
    }
}

impl KnowledgeBase for RuleBook {
    fn rule_count(&self) -> usize {
        self.rules.len()
    }

    fn rule(&self, id: RuleId) -> Result<&Rule, EngineError> {
        self.rules.get(id).ok_or(EngineError::RuleNotFound(id))
    }

    /// Pergunta explícita do fato; senão o modelo da primeira regra que o
    /// tem como causa, com `{fact}` substituído.
    fn question_for(&self, fact: &str) -> Option<String> {
        if let Some(question) = self.questions.get(fact) {
            return Some(question.clone());
        }
        self.rules
            .iter()
            .filter(|rule| rule.has_cause(fact))
            .find_map(|rule| rule.question.as_ref())
            .map(|template| template.replace("{fact}", fact))
    }

    fn rules_for_goal(&self, fact: &str) -> Vec<RuleId> {
        self.goal_index.get(fact).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Base dos cenários: R0 [A, B] ⇒ [C], R1 [C] ⇒ [D]
    pub(crate) fn chain_book() -> RuleBook {
        let mut book = RuleBook::new();
        book.add_rule(vec![Cause::new("A"), Cause::new("B")], vec!["C".into()], None)
            .unwrap();
        book.add_rule(vec![Cause::new("C")], vec!["D".into()], None)
            .unwrap();
        book
    }

    #[test]
    fn test_rule_lookup_and_out_of_range() {
        let book = chain_book();
        assert_eq!(book.rule_count(), 2);
        assert_eq!(book.goals_of(1).unwrap(), ["D".to_string()]);
        assert_eq!(book.causes_of(0).unwrap().len(), 2);
        assert!(matches!(book.rule(2), Err(EngineError::RuleNotFound(2))));
        assert!(matches!(book.causes_of(7), Err(EngineError::RuleNotFound(7))));
    }

    /// O índice reverso devolve as regras produtoras em ordem de id
    #[test]
    fn test_rules_for_goal_uses_index() {
        let mut book = chain_book();
        book.add_rule(vec![Cause::new("E")], vec!["C".into()], None)
            .unwrap();

        assert_eq!(book.rules_for_goal("C"), vec![0, 2]);
        assert_eq!(book.find_rule_by_goal("C"), Some(0));
        assert_eq!(book.find_rule_by_goal("A"), None);
    }

    #[test]
    fn test_question_for_prefers_explicit_question() {
        let mut book = RuleBook::new();
        book.add_rule(
            vec![Cause::new("febre")],
            vec!["gripe".into()],
            Some("Você observa {fact}?".into()),
        )
        .unwrap();
        assert_eq!(book.question_for("febre").as_deref(), Some("Você observa febre?"));

        book.add_question("febre", "O paciente tem febre?");
        assert_eq!(book.question_for("febre").as_deref(), Some("O paciente tem febre?"));
        assert_eq!(book.question_for("tosse"), None);
    }

    #[test]
    fn test_add_rule_rejects_malformed_rules() {
        let mut book = RuleBook::new();
        let no_goal = book.add_rule(vec![Cause::new("A")], vec![], None);
        assert!(matches!(no_goal, Err(EngineError::InvalidRule { rule: 0, .. })));

        let bad_weight = book.add_rule(vec![Cause::weighted("A", 1.5)], vec!["B".into()], None);
        assert!(matches!(bad_weight, Err(EngineError::InvalidRule { .. })));

        let repeated = book.add_rule(
            vec![Cause::new("A"), Cause::new(" A ")],
            vec!["B".into()],
            None,
        );
        assert!(matches!(repeated, Err(EngineError::InvalidRule { .. })));
        assert_eq!(book.rule_count(), 0);
    }

    /// O documento JSON aceita causas simples e com peso
    #[test]
    fn test_deserialize_document() {
        let json = r#"{
            "rules": [
                { "causes": ["A", { "fact": "B", "weight": 0.4 }], "goals": ["C"] },
                { "causes": ["C"], "goals": ["D"], "question": "{fact}?" }
            ],
            "questions": { "A": "Tem A?" }
        }"#;
        let book: RuleBook = serde_json::from_str(json).unwrap();

        assert_eq!(book.rule_count(), 2);
        assert_eq!(book.causes_of(0).unwrap()[1], Cause::weighted("B", 0.4));
        assert_eq!(book.question_for("A").as_deref(), Some("Tem A?"));
        assert_eq!(book.question_for("C").as_deref(), Some("C?"));
    }

    #[test]
    fn test_deserialize_rejects_invalid_rule() {
        let json = r#"{ "rules": [ { "causes": [], "goals": ["C"] } ] }"#;
        assert!(serde_json::from_str::<RuleBook>(json).is_err());
    }
}

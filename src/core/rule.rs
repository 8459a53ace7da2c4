//! # Rule — Causas que Produzem Objetivos
//!
//! Uma [`Rule`] liga uma lista ordenada de **causas** (fatos exigidos, com
//! peso opcional) a uma lista ordenada de **objetivos** (fatos produzidos
//! quando a regra dispara).
//!
//! ```text
//! Regra 0: [A, B(0.4)] ⇒ [C]
//!           └ causas ┘     └ objetivos
//! ```
//!
//! A ordem declarada na base de conhecimento é preservada e determina a ordem
//! de varredura no casamento e na expansão do encadeamento para trás.
//! Regras são imutáveis depois de carregadas.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Índice da regra na base (0-based e contíguo).
pub type RuleId = usize;

/// Uma causa de regra: o fato exigido e seu peso opcional.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cause {
    pub fact: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl Cause {
    pub fn new(fact: impl Into<String>) -> Self {
        Self {
            fact: fact.into(),
            weight: None,
        }
    }

    pub fn weighted(fact: impl Into<String>, weight: f64) -> Self {
        Self {
            fact: fact.into(),
            weight: Some(weight),
        }
    }
}

/// Regra carregada da base de conhecimento.
#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    /// Posição da regra na base.
    pub id: RuleId,
    /// Causas na ordem declarada.
    pub causes: Vec<Cause>,
    /// Objetivos na ordem declarada.
    pub goals: Vec<String>,
    /// Modelo de pergunta para as causas desta regra (`{fact}` é substituído).
    pub question: Option<String>,
}

impl Rule {
    pub fn has_goal(&self, fact: &str) -> bool {
        self.goals.iter().any(|goal| goal == fact)
    }

    pub fn has_cause(&self, fact: &str) -> bool {
        self.causes.iter().any(|cause| cause.fact == fact)
    }
}

/// Formato: `R0: A, B(0.40) ⇒ C`
impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let causes: Vec<String> = self
            .causes
            .iter()
            .map(|cause| match cause.weight {
                Some(weight) => format!("{}({:.2})", cause.fact, weight),
                None => cause.fact.clone(),
            })
            .collect();
        write!(f, "R{}: {} ⇒ {}", self.id, causes.join(", "), self.goals.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let rule = Rule {
            id: 0,
            causes: vec![Cause::new("A"), Cause::weighted("B", 0.4)],
            goals: vec!["C".into()],
            question: None,
        };
        assert_eq!(rule.to_string(), "R0: A, B(0.40) ⇒ C");
        assert!(rule.has_goal("C"));
        assert!(rule.has_cause("B"));
        assert!(!rule.has_cause("C"));
    }
}

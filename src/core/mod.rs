//! # Módulo Core — Tipos Fundamentais do Motor de Regras
//!
//! Tudo o que o motor de inferência manipula está aqui:
//!
//! - [`Sign`] — sinal trivalente (positivo, negativo, incerto)
//! - [`Fact`] — fato com sinal, peso e proveniência
//! - [`FactStore`] — contêiner ordenado de fatos com cursor por snapshot
//! - [`Rule`] / [`Cause`] — causas que produzem objetivos
//! - [`KnowledgeBase`] — interface somente leitura sobre as regras
//! - [`RuleBook`] — adaptador padrão da base, carregado de JSON
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use crate::core::{Cause, Fact, FactStore, KnowledgeBase, RuleBook};
//!
//! let mut book = RuleBook::new();
//! book.add_rule(vec![Cause::new("chuva")], vec!["chão molhado".into()], None)?;
//!
//! let mut facts = FactStore::new("initial");
//! facts.append(Fact::positive("chuva"));
//! assert_eq!(book.find_rule_by_goal("chão molhado"), Some(0));
//! ```

pub mod sign;

pub mod fact;

pub mod fact_store;

pub mod rule;

pub mod knowledge_base;

pub use fact::{Algorithm, Fact, FactField, FieldValue};
pub use fact_store::{Cursor, FactStore};
pub use knowledge_base::{KnowledgeBase, RuleBook};
pub use rule::{Cause, Rule, RuleId};
pub use sign::Sign;

//! # Fact — Unidade Atômica de Conhecimento do Motor
//!
//! Um [`Fact`] é um identificador textual com um [`Sign`] e, opcionalmente,
//! um peso e a proveniência (qual algoritmo e qual regra o produziram).
//!
//! ## Imutável por Substituição
//!
//! Fatos não são editados no lugar. Para "mudar" um fato, insere-se um novo
//! registro com o mesmo id na [`FactStore`](super::FactStore): o último
//! registro vence.
//!
//! | Campo | Tipo | Descrição |
//! |-------|------|-----------|
//! | `id` | String | Identificador (normalizado em NFC) |
//! | `sign` | [Sign] | Positivo, negativo ou incerto |
//! | `weight` | Option<f64> | Peso declarado, quando existir |
//! | `algorithm` | Option<[Algorithm]> | Algoritmo que derivou o fato |
//! | `rule` | Option<[RuleId]> | Regra que derivou o fato |
//!
//! Fatos iniciais e respostas do usuário não têm `rule`.

use std::fmt;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use super::rule::RuleId;
use super::Sign;

/// Normaliza um identificador de fato: remove espaços das bordas e aplica NFC.
///
/// Aplicado no carregamento da base, nas sementes da configuração e nas
/// respostas do viewer, para que o mesmo texto sempre gere o mesmo id.
pub fn normalize_id(raw: &str) -> String {
    raw.trim().nfc().collect()
}

/// Algoritmo de encadeamento que produziu um fato.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Encadeamento para frente (dirigido por dados).
    Forward,
    /// Encadeamento para trás (dirigido por objetivos).
    Backward,
}

impl Algorithm {
    pub fn label(&self) -> &'static str {
        match self {
            Algorithm::Forward => "forward",
            Algorithm::Backward => "backward",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fato conhecido pelo motor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    /// Identificador do fato.
    pub id: String,

    /// Sinal trivalente.
    #[serde(default)]
    pub sign: Sign,

    /// Peso opcional (ex: peso de uma causa declarado na base).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    /// Algoritmo que derivou o fato. `None` para fatos fornecidos pelo chamador.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<Algorithm>,

    /// Regra que derivou o fato. `None` para fatos iniciais e respostas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<RuleId>,
}

impl Fact {
    /// Cria um fato sem peso nem proveniência.
    pub fn new(id: impl AsRef<str>, sign: Sign) -> Self {
        Self {
            id: normalize_id(id.as_ref()),
            sign,
            weight: None,
            algorithm: None,
            rule: None,
        }
    }

    /// Atalho para um fato positivo, o caso mais comum nas sementes.
    pub fn positive(id: impl AsRef<str>) -> Self {
        Self::new(id, Sign::Positive)
    }

    pub fn negative(id: impl AsRef<str>) -> Self {
        Self::new(id, Sign::Negative)
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Marca o fato como derivado por `algorithm` a partir da regra `rule`.
    pub fn derived(mut self, algorithm: Algorithm, rule: RuleId) -> Self {
        self.algorithm = Some(algorithm);
        self.rule = Some(rule);
        self
    }

    /// Marca o fato como resposta do usuário obtida por `algorithm`.
    pub fn answered(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = Some(algorithm);
        self
    }
}

/// Formato: `id+`, `id-` ou `id?`, com a regra de origem quando houver.
impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.id, self.sign)?;
        if let Some(rule) = self.rule {
            write!(f, " (regra {})", rule)?;
        }
        Ok(())
    }
}

/// Campo consultável de um [`Fact`], usado por
/// [`FactStore::get`](super::FactStore::get) e
/// [`FactStore::find_by_field`](super::FactStore::find_by_field).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FactField {
    Sign,
    Weight,
    Algorithm,
    Rule,
}

/// Valor de um [`FactField`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldValue {
    Sign(Sign),
    Weight(f64),
    Algorithm(Algorithm),
    Rule(RuleId),
}

impl Fact {
    /// Lê um campo do fato. Retorna `None` quando o campo opcional está ausente.
    pub fn field(&self, field: FactField) -> Option<FieldValue> {
        match field {
            FactField::Sign => Some(FieldValue::Sign(self.sign)),
            FactField::Weight => self.weight.map(FieldValue::Weight),
            FactField::Algorithm => self.algorithm.map(FieldValue::Algorithm),
            FactField::Rule => self.rule.map(FieldValue::Rule),
        }
    }
}

//! # InferenceEngine — Estado e Disparo de Regras
//!
//! O [`InferenceEngine`] possui **todo** o estado de uma execução:
//!
//! | Campo | Tipo | Papel |
//! |-------|------|-------|
//! | `initial` | [FactStore] | fatos fornecidos pelo chamador (e derivados, em `Reseed`) |
//! | `inference` | [FactStore] | fatos derivados por disparo de regras |
//! | `asked` | [FactStore] | respostas do usuário |
//! | `goals` | [GoalQueue] | objetivos a verificar (encadeamento para trás) |
//! | `visited` | [VisitedRules] | regras expandidas com causas pendentes |
//! | `shot` | [ShotRules] | regras já disparadas, com instante e ordem |
//!
//! Os algoritmos ficam em módulos próprios
//! ([`forward`](super::forward), [`backward`](super::backward),
//! [`mixed`](super::mixed)) e compartilham o [`shoot()`](InferenceEngine::shoot)
//! definido aqui.
//!
//! ## Uso Único
//!
//! Um motor corresponde a **uma** execução. Rodar um segundo algoritmo no
//! mesmo motor não reinicia o estado e tem comportamento indefinido. Chamadas
//! concorrentes ou reentrantes não são suportadas; o `&mut self` dos
//! algoritmos já impede isso em tempo de compilação.
//!
//! ## Exemplo
//!
//! ```rust
//! let mut engine = InferenceEngine::builder(Box::new(book))
//!     .initial_facts([Fact::positive("A"), Fact::positive("B")])
//!     .viewer(Box::new(ScriptedViewer::new([])))
//!     .build()?;
//! engine.forward()?;
//! println!("{}", engine.summary());
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{Algorithm, Fact, FactField, FactStore, FieldValue, KnowledgeBase, RuleId, Sign};
use crate::error::EngineError;
use crate::summary::Summary;
use crate::viewer::Viewer;

use super::goals::{GoalQueue, PendingGoal, VisitedRules};
use super::Outcome;

/// Limiar padrão do fator de certeza no algoritmo misto.
pub const DEFAULT_FOUND_FACTOR: f64 = 0.5;

/// Número padrão de rodadas do algoritmo misto antes de desistir.
pub const DEFAULT_MAX_MIXED_ROUNDS: usize = 16;

/// Para onde vão os fatos derivados por [`InferenceEngine::shoot`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShootPolicy {
    /// Derivados entram em `inference` **e** em `initial`, e o sinal negativo
    /// se propaga pelas regras seguintes.
    #[default]
    Reseed,
    /// Derivados entram só em `inference`.
    InferenceOnly,
}

/// Registro de disparo de uma regra.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Shot {
    /// Posição na ordem de disparo (0 = primeira).
    pub order: usize,
    pub fired_at: DateTime<Utc>,
}

/// Regras disparadas. Só cresce; cada regra dispara no máximo uma vez.
#[derive(Clone, Debug, Default)]
pub struct ShotRules {
    shots: BTreeMap<RuleId, Shot>,
    order: Vec<RuleId>,
}

impl ShotRules {
    /// Registra o disparo. Devolve `false` se a regra já havia disparado.
    pub fn record(&mut self, rule: RuleId) -> bool {
        if self.shots.contains_key(&rule) {
            return false;
        }
        self.shots.insert(
            rule,
            Shot {
                order: self.order.len(),
                fired_at: Utc::now(),
            },
        );
        self.order.push(rule);
        true
    }

    pub fn contains(&self, rule: RuleId) -> bool {
        self.shots.contains_key(&rule)
    }

    pub fn get(&self, rule: RuleId) -> Option<&Shot> {
        self.shots.get(&rule)
    }

    /// Ids na ordem em que dispararam.
    pub fn firing_order(&self) -> &[RuleId] {
        &self.order
    }

    /// Pares (regra, disparo) ordenados por id.
    pub fn iter(&self) -> impl Iterator<Item = (RuleId, &Shot)> + '_ {
        self.shots.iter().map(|(rule, shot)| (*rule, shot))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Motor de encadeamento de regras.
pub struct InferenceEngine {
    pub(super) kb: Box<dyn KnowledgeBase>,
    pub(super) viewer: Box<dyn Viewer>,
    pub(super) found_factor: f64,
    pub(super) max_mixed_rounds: usize,
    pub(super) shoot_policy: ShootPolicy,
    pub(super) initial: FactStore,
    pub(super) inference: FactStore,
    pub(super) asked: FactStore,
    pub(super) goals: GoalQueue,
    /// Fatos semeados como hipótese (objetivos do chamador e fatos intuitivos).
    pub(super) hypotheses: Vec<String>,
    pub(super) visited: VisitedRules,
    pub(super) shot: ShotRules,
    pub(super) last_outcome: Option<Outcome>,
}

/// Construtor do [`InferenceEngine`].
pub struct EngineBuilder {
    kb: Box<dyn KnowledgeBase>,
    initial: Vec<Fact>,
    goals: Vec<String>,
    viewer: Option<Box<dyn Viewer>>,
    found_factor: f64,
    max_mixed_rounds: usize,
    shoot_policy: ShootPolicy,
}

impl EngineBuilder {
    /// Fatos iniciais, na ordem dada. Opcional para uso só com `backward`.
    pub fn initial_facts(mut self, facts: impl IntoIterator<Item = Fact>) -> Self {
        self.initial.extend(facts);
        self
    }

    /// Objetivos a verificar. Opcional para uso só com `forward`.
    pub fn goals<S: AsRef<str>>(mut self, goals: impl IntoIterator<Item = S>) -> Self {
        self.goals
            .extend(goals.into_iter().map(|goal| crate::core::fact::normalize_id(goal.as_ref())));
        self
    }

    pub fn viewer(mut self, viewer: Box<dyn Viewer>) -> Self {
        self.viewer = Some(viewer);
        self
    }

    pub fn found_factor(mut self, found_factor: f64) -> Self {
        self.found_factor = found_factor;
        self
    }

    pub fn max_mixed_rounds(mut self, rounds: usize) -> Self {
        self.max_mixed_rounds = rounds;
        self
    }

    pub fn shoot_policy(mut self, policy: ShootPolicy) -> Self {
        self.shoot_policy = policy;
        self
    }

    /// Monta o motor.
    ///
    /// # Erros
    ///
    /// [`EngineError::Configuration`] sem viewer, com `found_factor` fora de
    /// `[0, 1]` ou com `max_mixed_rounds == 0`.
    pub fn build(self) -> Result<InferenceEngine, EngineError> {
        let viewer = self
            .viewer
            .ok_or_else(|| EngineError::Configuration("nenhum viewer fornecido".into()))?;
        if !(0.0..=1.0).contains(&self.found_factor) {
            return Err(EngineError::Configuration(format!(
                "found_factor {} fora de [0, 1]",
                self.found_factor
            )));
        }
        if self.max_mixed_rounds == 0 {
            return Err(EngineError::Configuration(
                "max_mixed_rounds deve ser maior que zero".into(),
            ));
        }

        let mut goals = GoalQueue::new();
        for goal in &self.goals {
            goals.push_back(PendingGoal::hypothesis(goal.clone()));
        }

        tracing::info!(
            rules = self.kb.rule_count(),
            initial = self.initial.len(),
            goals = self.goals.len(),
            found_factor = self.found_factor,
            "Motor de inferência criado"
        );

        Ok(InferenceEngine {
            kb: self.kb,
            viewer,
            found_factor: self.found_factor,
            max_mixed_rounds: self.max_mixed_rounds,
            shoot_policy: self.shoot_policy,
            initial: FactStore::with_facts("initial", self.initial),
            inference: FactStore::new("inference"),
            asked: FactStore::new("asked"),
            goals,
            hypotheses: self.goals,
            visited: VisitedRules::new(),
            shot: ShotRules::default(),
            last_outcome: None,
        })
    }
}

impl InferenceEngine {
    pub fn builder(kb: Box<dyn KnowledgeBase>) -> EngineBuilder {
        EngineBuilder {
            kb,
            initial: Vec::new(),
            goals: Vec::new(),
            viewer: None,
            found_factor: DEFAULT_FOUND_FACTOR,
            max_mixed_rounds: DEFAULT_MAX_MIXED_ROUNDS,
            shoot_policy: ShootPolicy::default(),
        }
    }

    /// Stores consultadas no casamento, na ordem de prioridade.
    pub(super) fn known_stores(&self) -> [&FactStore; 3] {
        [&self.initial, &self.inference, &self.asked]
    }

    /// Verdadeiro se o fato já é conhecido em alguma store.
    pub(super) fn is_known(&self, fact: &str) -> bool {
        self.known_stores().iter().any(|store| store.contains(fact))
    }

    /// Dispara a regra `rule_id`, derivando seus objetivos.
    ///
    /// ## Sinal derivado
    ///
    /// As causas são varridas na ordem declarada; para cada uma, procura-se
    /// o fato com sinal **negativo** em `initial` e depois em `asked`. O
    /// primeiro negativo encontrado encerra a varredura e torna o resultado
    /// negativo. Sem nenhum negativo, o resultado é positivo.
    ///
    /// Cada objetivo é gravado em `inference` (e também em `initial` com
    /// [`ShootPolicy::Reseed`]) com o sinal resultante e a proveniência.
    ///
    /// Devolve `false`, sem efeito, se a regra já tinha disparado.
    pub fn shoot(&mut self, rule_id: RuleId, algorithm: Algorithm) -> Result<bool, EngineError> {
        let rule = self.kb.rule(rule_id)?.clone();
        if !self.shot.record(rule_id) {
            tracing::warn!(rule = rule_id, "Regra já disparada, ignorando");
            return Ok(false);
        }

        let mut sign = Sign::Positive;
        let negative = FieldValue::Sign(Sign::Negative);
        for cause in &rule.causes {
            let negated = [&self.initial, &self.asked].iter().any(|store| {
                matches!(store.get(&cause.fact, FactField::Sign), Ok(Some(value)) if value == negative)
            });
            if negated {
                tracing::debug!(rule = rule_id, cause = %cause.fact, "Causa negada");
                sign = Sign::Negative;
                break;
            }
        }

        for goal in &rule.goals {
            let fact = Fact::new(goal, sign).derived(algorithm, rule_id);
            if self.shoot_policy == ShootPolicy::Reseed {
                self.initial.append(fact.clone());
            }
            self.inference.append(fact);
        }

        let order = self.shot.len();
        tracing::info!(rule = rule_id, %algorithm, sign = %sign, order, "Regra disparada");
        self.viewer.debug(&format!(
            "#{} {} [{}] ⇒ {}",
            order,
            rule,
            algorithm,
            rule.goals
                .iter()
                .map(|goal| format!("{}{}", goal, sign))
                .collect::<Vec<_>>()
                .join(", ")
        ));
        Ok(true)
    }

    pub fn is_rule_shot(&self, rule: RuleId) -> bool {
        self.shot.contains(rule)
    }

    pub fn shot_rules(&self) -> &ShotRules {
        &self.shot
    }

    pub fn initial_facts(&self) -> &FactStore {
        &self.initial
    }

    pub fn inference_facts(&self) -> &FactStore {
        &self.inference
    }

    pub fn asked_facts(&self) -> &FactStore {
        &self.asked
    }

    pub fn goals(&self) -> &GoalQueue {
        &self.goals
    }

    pub fn visited_rules(&self) -> &VisitedRules {
        &self.visited
    }

    pub fn hypotheses(&self) -> &[String] {
        &self.hypotheses
    }

    pub fn knowledge_base(&self) -> &dyn KnowledgeBase {
        self.kb.as_ref()
    }

    pub fn found_factor(&self) -> f64 {
        self.found_factor
    }

    /// Resultado da última execução, se houve uma.
    pub fn last_outcome(&self) -> Option<&Outcome> {
        self.last_outcome.as_ref()
    }

    /// Primeiro fato inferido com sinal positivo.
    pub fn positive_conclusion(&self) -> Option<String> {
        self.inference
            .find_by_field(FactField::Sign, FieldValue::Sign(Sign::Positive))
            .map(str::to_owned)
    }

    /// Rastro da execução para relatório externo.
    pub fn summary(&self) -> Summary {
        Summary::from_engine(self)
    }
}

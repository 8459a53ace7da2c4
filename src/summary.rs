//! # Summary — Rastro Causal de uma Execução
//!
//! Depois de rodar um algoritmo, o chamador pede um [`Summary`]: para cada
//! regra disparada (ordenada por id, anotada com a ordem de disparo), de
//! onde veio cada causa e para onde foi cada objetivo.
//!
//! ## Origem das Causas
//!
//! | Onde o fato está | Origem |
//! |------------------|--------|
//! | `initial`, com algoritmo registrado | [`CauseOrigin::Forward`] |
//! | `initial`, sem algoritmo | [`CauseOrigin::Initial`] |
//! | `inference` | [`CauseOrigin::Inference`] |
//! | `asked` | [`CauseOrigin::Question`] |
//!
//! ## Origem dos Objetivos
//!
//! | Condição | Origem |
//! |----------|--------|
//! | era uma hipótese (objetivo do chamador ou fato intuitivo) | [`GoalOrigin::Backward`] |
//! | está em `asked` | [`GoalOrigin::Question`] |
//! | caso contrário | [`GoalOrigin::Inference`] |
//!
//! O sinal é lido da mesma store que definiu a origem. Um fato ausente de
//! todas as stores fica sem origem e sem sinal.
//!
//! ## Formatos
//!
//! - JSON via serde (gravado por [`save_summary`](crate::persistence::save_summary))
//! - Texto via `Display`:
//!
//! ```text
//! Resultado: concluído
//! R0 #0 [forward] 2026-10-16T12:00:00Z
//!   causa A+ (inicial)
//!   causa B- (inicial)
//!   objetivo C- (inferência)
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::{Algorithm, Fact, FactStore, RuleId, Sign};
use crate::inference::{InferenceEngine, Outcome};

/// De onde veio uma causa no momento do relatório.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CauseOrigin {
    Initial,
    Inference,
    Question,
    /// Derivado por disparo e replicado nos fatos iniciais.
    Forward,
}

impl CauseOrigin {
    pub fn label(&self) -> &'static str {
        match self {
            CauseOrigin::Initial => "inicial",
            CauseOrigin::Inference => "inferência",
            CauseOrigin::Question => "pergunta",
            CauseOrigin::Forward => "derivado",
        }
    }
}

/// Como um objetivo chegou ao relatório.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalOrigin {
    /// Hipótese verificada pelo encadeamento para trás.
    Backward,
    Inference,
    Question,
}

impl GoalOrigin {
    pub fn label(&self) -> &'static str {
        match self {
            GoalOrigin::Backward => "hipótese",
            GoalOrigin::Inference => "inferência",
            GoalOrigin::Question => "pergunta",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CauseTrace {
    pub fact: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    pub origin: Option<CauseOrigin>,
    pub sign: Option<Sign>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GoalTrace {
    pub fact: String,
    pub origin: Option<GoalOrigin>,
    pub sign: Option<Sign>,
}

/// Uma regra disparada e suas ligações.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RuleTrace {
    pub rule: RuleId,
    /// Posição na ordem de disparo.
    pub order: usize,
    pub fired_at: DateTime<Utc>,
    /// Algoritmo que disparou a regra, lido dos objetivos derivados.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<Algorithm>,
    pub causes: Vec<CauseTrace>,
    pub goals: Vec<GoalTrace>,
}

/// Relatório completo da execução.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub outcome: Option<Outcome>,
    pub rules: Vec<RuleTrace>,
    pub inferred: Vec<Fact>,
    pub asked: Vec<Fact>,
}

impl Summary {
    /// Monta o relatório a partir do estado atual do motor.
    ///
    /// Regras que sumiram da base entre o disparo e o relatório são
    /// ignoradas com um aviso.
    pub fn from_engine(engine: &InferenceEngine) -> Self {
        let kb = engine.knowledge_base();
        let initial = engine.initial_facts();
        let inference = engine.inference_facts();
        let asked = engine.asked_facts();

        let mut rules = Vec::with_capacity(engine.shot_rules().len());
        for (id, shot) in engine.shot_rules().iter() {
            let rule = match kb.rule(id) {
                Ok(rule) => rule,
                Err(e) => {
                    tracing::warn!(rule = id, error = %e, "Regra disparada ausente da base");
                    continue;
                }
            };

            let causes = rule
                .causes
                .iter()
                .map(|cause| {
                    let (origin, sign) = cause_origin(&cause.fact, initial, inference, asked);
                    CauseTrace {
                        fact: cause.fact.clone(),
                        weight: cause.weight,
                        origin,
                        sign,
                    }
                })
                .collect();

            let goals = rule
                .goals
                .iter()
                .map(|goal| {
                    let (origin, sign) = goal_origin(goal, engine.hypotheses(), inference, asked);
                    GoalTrace {
                        fact: goal.clone(),
                        origin,
                        sign,
                    }
                })
                .collect();

            let algorithm = rule
                .goals
                .iter()
                .filter_map(|goal| inference.fact(goal).ok())
                .find(|fact| fact.rule == Some(id))
                .and_then(|fact| fact.algorithm);

            rules.push(RuleTrace {
                rule: id,
                order: shot.order,
                fired_at: shot.fired_at,
                algorithm,
                causes,
                goals,
            });
        }

        Summary {
            outcome: engine.last_outcome().cloned(),
            rules,
            inferred: inference.iter().cloned().collect(),
            asked: asked.iter().cloned().collect(),
        }
    }

    /// Ids das regras na ordem em que dispararam.
    pub fn firing_order(&self) -> Vec<RuleId> {
        let mut traces: Vec<&RuleTrace> = self.rules.iter().collect();
        traces.sort_by_key(|trace| trace.order);
        traces.into_iter().map(|trace| trace.rule).collect()
    }
}

fn sign_in(store: &FactStore, fact: &str) -> Option<Sign> {
    store.fact(fact).ok().map(|fact| fact.sign)
}

fn cause_origin(
    fact: &str,
    initial: &FactStore,
    inference: &FactStore,
    asked: &FactStore,
) -> (Option<CauseOrigin>, Option<Sign>) {
    if let Ok(found) = initial.fact(fact) {
        let origin = if found.algorithm.is_some() {
            CauseOrigin::Forward
        } else {
            CauseOrigin::Initial
        };
        return (Some(origin), Some(found.sign));
    }
    if let Some(sign) = sign_in(inference, fact) {
        return (Some(CauseOrigin::Inference), Some(sign));
    }
    if let Some(sign) = sign_in(asked, fact) {
        return (Some(CauseOrigin::Question), Some(sign));
    }
    (None, None)
}

fn goal_origin(
    fact: &str,
    hypotheses: &[String],
    inference: &FactStore,
    asked: &FactStore,
) -> (Option<GoalOrigin>, Option<Sign>) {
    if hypotheses.iter().any(|h| h == fact) {
        return (Some(GoalOrigin::Backward), sign_in(inference, fact));
    }
    if let Some(sign) = sign_in(asked, fact) {
        return (Some(GoalOrigin::Question), Some(sign));
    }
    match sign_in(inference, fact) {
        Some(sign) => (Some(GoalOrigin::Inference), Some(sign)),
        None => (None, None),
    }
}

fn write_entry(
    f: &mut fmt::Formatter<'_>,
    kind: &str,
    fact: &str,
    sign: Option<Sign>,
    origin: Option<&str>,
) -> fmt::Result {
    let sign = sign.map(|s| s.symbol()).unwrap_or("");
    match origin {
        Some(origin) => writeln!(f, "  {} {}{} ({})", kind, fact, sign, origin),
        None => writeln!(f, "  {} {} (desconhecido)", kind, fact),
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Some(outcome) => writeln!(f, "Resultado: {}", outcome)?,
            None => writeln!(f, "Resultado: nenhuma execução")?,
        }
        if self.rules.is_empty() {
            writeln!(f, "Nenhuma regra disparada")?;
        }
        for trace in &self.rules {
            write!(f, "R{} #{}", trace.rule, trace.order)?;
            if let Some(algorithm) = trace.algorithm {
                write!(f, " [{}]", algorithm)?;
            }
            writeln!(f, " {}", trace.fired_at.to_rfc3339())?;
            for cause in &trace.causes {
                write_entry(f, "causa", &cause.fact, cause.sign, cause.origin.map(|o| o.label()))?;
            }
            for goal in &trace.goals {
                write_entry(f, "objetivo", &goal.fact, goal.sign, goal.origin.map(|o| o.label()))?;
            }
        }
        if !self.asked.is_empty() {
            let answers: Vec<String> = self.asked.iter().map(|fact| fact.to_string()).collect();
            writeln!(f, "Respostas: {}", answers.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::knowledge_base::tests::chain_book;
    use crate::core::Fact;
    use crate::inference::engine::tests::engine_with;

    /// Cenário A: causas de R1 vêm do disparo de R0 replicado em `initial`
    #[test]
    fn test_summary_after_forward() {
        let mut engine = engine_with(
            chain_book(),
            vec![Fact::positive("A"), Fact::positive("B")],
            &[],
            &[],
        );
        engine.forward().unwrap();
        let summary = engine.summary();

        assert_eq!(summary.outcome, Some(Outcome::Completed));
        assert_eq!(summary.firing_order(), vec![0, 1]);

        let r0 = &summary.rules[0];
        assert_eq!(r0.algorithm, Some(Algorithm::Forward));
        assert_eq!(r0.causes[0].origin, Some(CauseOrigin::Initial));
        assert_eq!(r0.goals[0].origin, Some(GoalOrigin::Inference));
        assert_eq!(r0.goals[0].sign, Some(Sign::Positive));

        let r1 = &summary.rules[1];
        assert_eq!(r1.causes[0].origin, Some(CauseOrigin::Forward));
        assert_eq!(summary.inferred.len(), 2);
    }

    /// Cenário C: folhas vêm de perguntas, o objetivo do chamador é hipótese
    #[test]
    fn test_summary_after_backward() {
        let mut engine = engine_with(
            chain_book(),
            vec![],
            &["D"],
            &[("A", Sign::Positive), ("B", Sign::Positive)],
        );
        engine.backward().unwrap();
        let summary = engine.summary();

        let r0 = &summary.rules[0];
        assert_eq!(r0.algorithm, Some(Algorithm::Backward));
        assert!(r0
            .causes
            .iter()
            .all(|cause| cause.origin == Some(CauseOrigin::Question)));

        let r1 = &summary.rules[1];
        assert_eq!(r1.goals[0].origin, Some(GoalOrigin::Backward));
        assert_eq!(r1.goals[0].sign, Some(Sign::Positive));
        assert_eq!(summary.asked.len(), 2);
    }

    #[test]
    fn test_summary_without_run() {
        let engine = engine_with(chain_book(), vec![Fact::positive("A")], &[], &[]);
        let summary = engine.summary();
        assert!(summary.outcome.is_none());
        assert!(summary.rules.is_empty());
        assert!(summary.to_string().contains("Nenhuma regra disparada"));
    }

    #[test]
    fn test_summary_text_and_json() {
        let mut engine = engine_with(
            chain_book(),
            vec![Fact::positive("A"), Fact::negative("B")],
            &[],
            &[],
        );
        engine.forward().unwrap();
        let summary = engine.summary();

        let text = summary.to_string();
        assert!(text.contains("R0 #0 [forward]"));
        assert!(text.contains("causa B- (inicial)"));
        assert!(text.contains("objetivo C- (inferência)"));

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["outcome"]["status"], "completed");
        assert_eq!(json["rules"][0]["causes"][1]["origin"], "initial");
        assert_eq!(json["rules"][1]["goals"][0]["sign"], "negative");
    }
}

//! # Casamento de Regras e Fator de Certeza
//!
//! Funções puras sobre uma [`Rule`] e um conjunto de [`FactStore`]s,
//! consultadas na ordem de prioridade fixa **inicial → inferida → perguntada**.
//!
//! ## match_count
//!
//! Conta as causas presentes em **alguma** store. Uma causa presente em
//! duas stores conta uma vez. O sinal do fato não importa aqui.
//!
//! ## causes_match_factor
//!
//! Pontuação monótona em `[0, 1]` comparada ao `found_factor` pelo
//! algoritmo misto. Não é uma probabilidade normalizada.
//!
//! | Símbolo | Definição |
//! |---------|-----------|
//! | `T` | total de causas |
//! | `W` | soma dos pesos das causas casadas **com** peso |
//! | `U` | causas casadas **sem** peso |
//! | `M` | causas sem peso entre **todas** as causas |
//!
//! ```text
//! casadas == 0      → 0
//! M == T            → casadas / T      (nenhuma causa tem peso)
//! 0 < M < T         → W + U / T        (pesos parciais)
//! M == 0            → W                (todas têm peso)
//! ```
//!
//! A assimetria do caso parcial é intencional e reproduzida exatamente.
//! O resultado é limitado a `[0, 1]`.

use crate::core::{FactStore, Rule};

/// Verdadeiro se `fact` está em alguma das stores.
fn known(fact: &str, stores: &[&FactStore]) -> bool {
    stores.iter().any(|store| store.contains(fact))
}

/// Número de causas de `rule` presentes em alguma das `stores`.
pub fn match_count(rule: &Rule, stores: &[&FactStore]) -> usize {
    rule.causes
        .iter()
        .filter(|cause| known(&cause.fact, stores))
        .count()
}

/// Todas as causas estão presentes.
pub fn fully_matches(rule: &Rule, stores: &[&FactStore]) -> bool {
    match_count(rule, stores) == rule.causes.len()
}

/// Fator de certeza das causas de `rule` (ver tabela do módulo).
pub fn causes_match_factor(rule: &Rule, stores: &[&FactStore]) -> f64 {
    let total = rule.causes.len();
    let matched = match_count(rule, stores);
    if total == 0 || matched == 0 {
        return 0.0;
    }

    let mut weight_sum = 0.0; // W
    let mut matched_unweighted = 0usize; // U
    let mut unweighted = 0usize; // M
    for cause in &rule.causes {
        let is_matched = known(&cause.fact, stores);
        match cause.weight {
            Some(weight) => {
                if is_matched {
                    weight_sum += weight;
                }
            }
            None => {
                unweighted += 1;
                if is_matched {
                    matched_unweighted += 1;
                }
            }
        }
    }

    let factor = if unweighted == total {
        matched as f64 / total as f64
    } else if unweighted > 0 {
        weight_sum + matched_unweighted as f64 / total as f64
    } else {
        weight_sum
    };
    factor.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::core::{Cause, Fact};

    fn rule(causes: Vec<Cause>) -> Rule {
        Rule {
            id: 0,
            causes,
            goals: vec!["G".into()],
            question: None,
        }
    }

    fn store(ids: &[&str]) -> FactStore {
        FactStore::with_facts("test", ids.iter().map(|id| Fact::positive(id)))
    }

    /// Uma causa presente em duas stores conta uma vez
    #[test]
    fn test_match_count_counts_each_cause_once() {
        let r = rule(vec![Cause::new("A"), Cause::new("B"), Cause::new("C")]);
        let initial = store(&["A"]);
        let inference = store(&["A", "B"]);
        let asked = FactStore::new("asked");

        assert_eq!(match_count(&r, &[&initial, &inference, &asked]), 2);
        assert!(!fully_matches(&r, &[&initial, &inference, &asked]));
    }

    /// O sinal não importa para o casamento
    #[test]
    fn test_negative_fact_still_matches() {
        let r = rule(vec![Cause::new("A")]);
        let initial = FactStore::with_facts("initial", [Fact::negative("A")]);
        assert!(fully_matches(&r, &[&initial]));
    }

    #[test]
    fn test_factor_without_weights_is_ratio() {
        let r = rule(vec![Cause::new("A"), Cause::new("B"), Cause::new("C"), Cause::new("D")]);
        let facts = store(&["A", "C", "D"]);
        assert!((causes_match_factor(&r, &[&facts]) - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_factor_with_all_weights_is_weight_sum() {
        let r = rule(vec![Cause::weighted("A", 0.5), Cause::weighted("B", 0.3), Cause::weighted("C", 0.2)]);
        let facts = store(&["A", "C"]);
        assert!((causes_match_factor(&r, &[&facts]) - 0.7).abs() < 1e-9);
    }

    /// Pesos parciais: W + U/T, com U contando só causas casadas sem peso
    #[test]
    fn test_factor_with_partial_weights() {
        let r = rule(vec![
            Cause::weighted("A", 0.4),
            Cause::new("B"),
            Cause::new("C"),
            Cause::weighted("D", 0.1),
        ]);
        let facts = store(&["A", "B"]);
        // W = 0.4, U = 1, T = 4
        assert!((causes_match_factor(&r, &[&facts]) - 0.65).abs() < 1e-9);
    }

    #[test]
    fn test_factor_zero_when_nothing_matches() {
        let r = rule(vec![Cause::weighted("A", 0.9), Cause::new("B")]);
        let facts = store(&["Z"]);
        assert_eq!(causes_match_factor(&r, &[&facts]), 0.0);
    }

    fn arb_rule() -> impl Strategy<Value = (Vec<Cause>, Vec<bool>)> {
        prop::collection::vec((prop::option::of(0.0f64..=1.0), any::<bool>()), 1..8).prop_map(
            |entries| {
                let causes = entries
                    .iter()
                    .enumerate()
                    .map(|(i, (weight, _))| Cause {
                        fact: format!("F{}", i),
                        weight: *weight,
                    })
                    .collect();
                let present = entries.iter().map(|(_, present)| *present).collect();
                (causes, present)
            },
        )
    }

    proptest! {
        /// O fator fica sempre em [0, 1]
        #[test]
        fn prop_factor_in_unit_interval((causes, present) in arb_rule()) {
            let facts = FactStore::with_facts(
                "test",
                causes.iter().zip(&present).filter(|(_, p)| **p).map(|(c, _)| Fact::positive(&c.fact)),
            );
            let factor = causes_match_factor(&rule(causes), &[&facts]);
            prop_assert!((0.0..=1.0).contains(&factor));
        }

        /// fully_matches não depende da ordem de declaração das causas
        #[test]
        fn prop_full_match_is_order_independent((causes, present) in arb_rule()) {
            let facts = FactStore::with_facts(
                "test",
                causes.iter().zip(&present).filter(|(_, p)| **p).map(|(c, _)| Fact::positive(&c.fact)),
            );
            let mut reversed = causes.clone();
            reversed.reverse();
            let forward = rule(causes);
            let backward = rule(reversed);
            prop_assert_eq!(match_count(&forward, &[&facts]), match_count(&backward, &[&facts]));
            prop_assert_eq!(fully_matches(&forward, &[&facts]), present.iter().all(|p| *p));
            prop_assert_eq!(fully_matches(&backward, &[&facts]), present.iter().all(|p| *p));
        }
    }
}

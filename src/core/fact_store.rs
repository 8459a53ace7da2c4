//! # FactStore — Contêiner Ordenado de Fatos
//!
//! A [`FactStore`] guarda fatos indexados por id **e** a ordem em que foram
//! inseridos. O motor mantém várias delas (fatos iniciais, inferidos,
//! perguntados) e nunca compartilha armazenamento entre duas stores:
//! consultas cruzadas são sempre por valor (id).
//!
//! ## Armazenamento
//!
//! - **Fatos**: `HashMap<String, Fact>` — busca O(1) por id
//! - **Ordem**: `Vec<String>` — ordem de inserção, usada para exibição e
//!   para o cursor
//!
//! Ids são únicos dentro de uma store. Reinserir um id substitui o registro
//! (o último vence); `append` move o id para o fim da ordem, `prepend` para
//! o início.
//!
//! ## Cursor com Snapshot
//!
//! O [`Cursor`] é uma **cópia** da ordem tirada por
//! [`reset_cursor()`](FactStore::reset_cursor). Inserções e remoções feitas
//! depois do snapshot **não aparecem** em [`next_id()`](FactStore::next_id)
//! até o próximo `reset_cursor()`:
//!
//! ```text
//! store: [A, B]        reset_cursor()  → snapshot [A, B]
//! append(C)            store: [A, B, C], snapshot ainda [A, B]
//! next_id() → A, next_id() → B, next_id() → None
//! reset_cursor()       → snapshot [A, B, C]
//! ```
//!
//! Quem consome a store tira um novo snapshot no meio do laço quando quer
//! enxergar fatos recém-inseridos.

use std::collections::HashMap;

use crate::error::EngineError;

use super::fact::{Fact, FactField, FieldValue};

/// Snapshot separado da ordem de uma [`FactStore`], consumido id a id.
///
/// Nunca referencia o estado vivo da store.
#[derive(Clone, Debug, Default)]
pub struct Cursor {
    snapshot: Vec<String>,
    position: usize,
}

impl Cursor {
    fn new(snapshot: Vec<String>) -> Self {
        Self { snapshot, position: 0 }
    }

    fn advance(&mut self) -> Option<String> {
        let id = self.snapshot.get(self.position).cloned();
        if id.is_some() {
            self.position += 1;
        }
        id
    }

    /// Quantos ids ainda restam no snapshot.
    pub fn remaining(&self) -> usize {
        self.snapshot.len() - self.position
    }
}

/// Contêiner ordenado e id-único de [`Fact`]s.
#[derive(Clone, Debug)]
pub struct FactStore {
    /// Nome usado nos logs (ex: "initial", "inference").
    name: &'static str,
    facts: HashMap<String, Fact>,
    order: Vec<String>,
    cursor: Cursor,
}

impl FactStore {
    /// Cria uma store vazia. O cursor começa vazio até o primeiro `reset_cursor()`.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            facts: HashMap::new(),
            order: Vec::new(),
            cursor: Cursor::default(),
        }
    }

    /// Cria uma store já populada, na ordem do iterador.
    pub fn with_facts(name: &'static str, facts: impl IntoIterator<Item = Fact>) -> Self {
        let mut store = Self::new(name);
        for fact in facts {
            store.append(fact);
        }
        store
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Insere no fim da ordem. Se o id já existe, o registro é substituído.
    pub fn append(&mut self, fact: Fact) {
        self.detach(&fact.id);
        tracing::debug!(store = self.name, fact = %fact, "append");
        self.order.push(fact.id.clone());
        self.facts.insert(fact.id.clone(), fact);
    }

    /// Insere no início da ordem. Se o id já existe, o registro é substituído.
    pub fn prepend(&mut self, fact: Fact) {
        self.detach(&fact.id);
        tracing::debug!(store = self.name, fact = %fact, "prepend");
        self.order.insert(0, fact.id.clone());
        self.facts.insert(fact.id.clone(), fact);
    }

    /// Remove o fato e devolve o registro removido, se existia.
    pub fn remove(&mut self, id: &str) -> Option<Fact> {
        let removed = self.facts.remove(id);
        if removed.is_some() {
            self.order.retain(|existing| existing != id);
        }
        removed
    }

    /// Retira o id da ordem (sem tocar no mapa) antes de uma reinserção.
    fn detach(&mut self, id: &str) {
        if self.facts.contains_key(id) {
            self.order.retain(|existing| existing != id);
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.facts.contains_key(id)
    }

    /// Busca o registro de um fato.
    ///
    /// # Erros
    ///
    /// [`EngineError::FactNotFound`] quando o id não está na store. Os
    /// algoritmos tratam isso como "ainda não conhecido", exceto onde a
    /// presença é garantida.
    pub fn fact(&self, id: &str) -> Result<&Fact, EngineError> {
        self.facts
            .get(id)
            .ok_or_else(|| EngineError::FactNotFound(id.to_string()))
    }

    /// Lê um campo de um fato. `Ok(None)` quando o fato existe mas o campo
    /// opcional está vazio.
    pub fn get(&self, id: &str, field: FactField) -> Result<Option<FieldValue>, EngineError> {
        Ok(self.fact(id)?.field(field))
    }

    /// Primeiro fato (na ordem de inserção) cujo `field` vale `value`.
    ///
    /// Varredura completa O(n).
    pub fn find_by_field(&self, field: FactField, value: FieldValue) -> Option<&str> {
        self.order
            .iter()
            .find(|id| {
                self.facts
                    .get(id.as_str())
                    .and_then(|fact| fact.field(field))
                    == Some(value)
            })
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Fatos na ordem de inserção (visão viva, não usa o cursor).
    pub fn iter(&self) -> impl Iterator<Item = &Fact> + '_ {
        self.order.iter().filter_map(|id| self.facts.get(id))
    }

    /// Ids na ordem de inserção.
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.order.iter().map(String::as_str)
    }

    /// Tira um novo snapshot da ordem atual e reposiciona o cursor no início.
    pub fn reset_cursor(&mut self) {
        self.cursor = Cursor::new(self.order.clone());
    }

    /// Consome o próximo id do snapshot. `None` ao fim da sequência.
    ///
    /// Ids removidos depois do snapshot continuam sendo devolvidos; quem
    /// consome deve verificar com [`contains()`](FactStore::contains) se
    /// precisa do registro.
    pub fn next_id(&mut self) -> Option<String> {
        self.cursor.advance()
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Algorithm, Sign};

    fn store_ab() -> FactStore {
        FactStore::with_facts("test", [Fact::positive("A"), Fact::negative("B")])
    }

    /// Fatos inseridos são recuperados com sinal, peso e proveniência idênticos
    #[test]
    fn test_append_then_get_preserves_record() {
        let mut store = FactStore::new("test");
        let fact = Fact::negative("C").with_weight(0.4).derived(Algorithm::Forward, 2);
        store.append(fact.clone());

        assert_eq!(store.fact("C").unwrap(), &fact);
        assert_eq!(
            store.get("C", FactField::Sign).unwrap(),
            Some(FieldValue::Sign(Sign::Negative))
        );
        assert_eq!(
            store.get("C", FactField::Weight).unwrap(),
            Some(FieldValue::Weight(0.4))
        );
        assert_eq!(store.get("C", FactField::Rule).unwrap(), Some(FieldValue::Rule(2)));
    }

    /// `get` em id inexistente sinaliza FactNotFound
    #[test]
    fn test_get_missing_is_fact_not_found() {
        let store = store_ab();
        let err = store.get("Z", FactField::Sign).unwrap_err();
        assert!(matches!(err, EngineError::FactNotFound(ref id) if id == "Z"));
    }

    /// Reinserir um id substitui o registro (último vence) sem duplicar
    #[test]
    fn test_reappend_replaces_record() {
        let mut store = store_ab();
        store.append(Fact::positive("B"));

        assert_eq!(store.len(), 2);
        assert_eq!(store.fact("B").unwrap().sign, Sign::Positive);
        assert_eq!(store.ids().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    /// `prepend` coloca o fato à frente da ordem
    #[test]
    fn test_prepend_goes_first() {
        let mut store = store_ab();
        store.prepend(Fact::positive("Z"));
        assert_eq!(store.ids().collect::<Vec<_>>(), vec!["Z", "A", "B"]);

        store.prepend(Fact::positive("B"));
        assert_eq!(store.ids().collect::<Vec<_>>(), vec!["B", "Z", "A"]);
    }

    #[test]
    fn test_remove() {
        let mut store = store_ab();
        assert!(store.remove("A").is_some());
        assert!(!store.contains("A"));
        assert!(store.remove("A").is_none());
        assert_eq!(store.ids().collect::<Vec<_>>(), vec!["B"]);
    }

    #[test]
    fn test_find_by_field_returns_first_in_order() {
        let mut store = store_ab();
        store.append(Fact::negative("C"));

        let found = store.find_by_field(FactField::Sign, FieldValue::Sign(Sign::Negative));
        assert_eq!(found, Some("B"));
        assert_eq!(
            store.find_by_field(FactField::Sign, FieldValue::Sign(Sign::Unsure)),
            None
        );
    }

    /// O cursor começa vazio: nada é iterado antes do primeiro reset
    #[test]
    fn test_cursor_empty_before_reset() {
        let mut store = store_ab();
        assert_eq!(store.next_id(), None);
        store.reset_cursor();
        assert_eq!(store.next_id().as_deref(), Some("A"));
    }

    /// Mutações durante a iteração só aparecem após novo `reset_cursor()`
    #[test]
    fn test_cursor_is_a_snapshot() {
        let mut store = store_ab();
        store.reset_cursor();
        assert_eq!(store.next_id().as_deref(), Some("A"));

        store.append(Fact::positive("C"));
        store.remove("B");

        // O snapshot ainda contém B e não contém C
        assert_eq!(store.next_id().as_deref(), Some("B"));
        assert_eq!(store.next_id(), None);

        store.reset_cursor();
        let seen: Vec<String> = std::iter::from_fn(|| store.next_id()).collect();
        assert_eq!(seen, vec!["A".to_string(), "C".to_string()]);
    }

    #[test]
    fn test_cursor_remaining() {
        let mut store = store_ab();
        store.reset_cursor();
        assert_eq!(store.cursor().remaining(), 2);
        store.next_id();
        assert_eq!(store.cursor().remaining(), 1);
    }
}

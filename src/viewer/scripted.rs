//! # ScriptedViewer — Respostas Pré-gravadas
//!
//! Responde às perguntas a partir de uma tabela `fato → sinal` definida de
//! antemão (na configuração, seção `[answers]`, ou num teste). Fatos fora
//! da tabela recebem a resposta padrão (`Unsure`, a menos que configurado).
//!
//! Tudo o que passa pelo viewer fica registrado num [`ViewerEvent`] log
//! compartilhado (`Arc<Mutex<..>>`), que continua acessível depois que o
//! viewer é entregue ao motor.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::fact::normalize_id;
use crate::core::Sign;

use super::{Question, Viewer};

/// Evento registrado pelo [`ScriptedViewer`].
#[derive(Clone, Debug, PartialEq)]
pub enum ViewerEvent {
    Debug(String),
    Print(String),
    Error(String),
    /// Pergunta feita e a resposta dada.
    Asked { fact: String, answer: Sign },
}

/// Viewer não interativo com respostas fixas.
pub struct ScriptedViewer {
    answers: HashMap<String, Sign>,
    fallback: Sign,
    events: Arc<Mutex<Vec<ViewerEvent>>>,
}

impl ScriptedViewer {
    pub fn new(answers: impl IntoIterator<Item = (String, Sign)>) -> Self {
        Self {
            answers: answers
                .into_iter()
                .map(|(fact, sign)| (normalize_id(&fact), sign))
                .collect(),
            fallback: Sign::Unsure,
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Resposta para fatos que não estão na tabela.
    pub fn with_fallback(mut self, fallback: Sign) -> Self {
        self.fallback = fallback;
        self
    }

    /// Handle compartilhado do log de eventos.
    pub fn events(&self) -> Arc<Mutex<Vec<ViewerEvent>>> {
        Arc::clone(&self.events)
    }

    fn record(&self, event: ViewerEvent) {
        self.events.lock().push(event);
    }
}

impl Viewer for ScriptedViewer {
    fn debug(&mut self, text: &str) {
        tracing::debug!(target: "viewer", "{}", text);
        self.record(ViewerEvent::Debug(text.to_string()));
    }

    fn print(&mut self, text: &str) {
        self.record(ViewerEvent::Print(text.to_string()));
    }

    fn print_error(&mut self, text: &str) {
        self.record(ViewerEvent::Error(text.to_string()));
    }

    fn ask(&mut self, question: &Question<'_>) -> Sign {
        let mut answer = self
            .answers
            .get(question.fact)
            .copied()
            .unwrap_or(self.fallback);
        if !question.options.contains(&answer) {
            answer = Sign::Unsure;
        }
        tracing::info!(fact = %question.fact, answer = %answer.label(), "Resposta pré-gravada");
        self.record(ViewerEvent::Asked {
            fact: question.fact.to_string(),
            answer,
        });
        answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answers_from_table_and_fallback() {
        let mut viewer = ScriptedViewer::new([("A".to_string(), Sign::Negative)]);
        assert_eq!(viewer.ask(&Question::new("A", "A?")), Sign::Negative);
        assert_eq!(viewer.ask(&Question::new("B", "B?")), Sign::Unsure);

        let mut lenient = ScriptedViewer::new([]).with_fallback(Sign::Positive);
        assert_eq!(lenient.ask(&Question::new("B", "B?")), Sign::Positive);
    }

    /// O log continua acessível pelo handle depois de mover o viewer
    #[test]
    fn test_events_are_shared() {
        let viewer = ScriptedViewer::new([("A".to_string(), Sign::Positive)]);
        let events = viewer.events();

        let mut boxed: Box<dyn Viewer> = Box::new(viewer);
        boxed.print("olá");
        boxed.ask(&Question::new("A", "A?"));

        let log = events.lock();
        assert_eq!(
            *log,
            vec![
                ViewerEvent::Print("olá".into()),
                ViewerEvent::Asked {
                    fact: "A".into(),
                    answer: Sign::Positive
                },
            ]
        );
    }
}

//! # Módulo Viewer — Diálogo com o Usuário
//!
//! O motor conversa com o mundo exterior só pelo trait [`Viewer`]:
//!
//! | Método | Uso | Retorno |
//! |--------|-----|---------|
//! | `debug` | explicação passo a passo do raciocínio | — |
//! | `print` | mensagens para o usuário | — |
//! | `print_error` | problemas recuperáveis | — |
//! | `ask` | pergunta sim/não/talvez sobre um fato | [`Sign`] |
//!
//! `ask` é o **único ponto de suspensão** do motor: bloqueia até haver
//! resposta, sem timeout. Um viewer que nunca responde trava o algoritmo.
//! Garantir uma resposta (ou devolver `Unsure` para cancelar) é
//! responsabilidade de quem implementa o viewer.
//!
//! ## Implementações
//!
//! - [`ConsoleViewer`] — terminal interativo (stdin/stdout)
//! - [`ScriptedViewer`] — respostas pré-gravadas, para execuções em lote e testes

pub mod console;

pub mod scripted;

pub use console::ConsoleViewer;
pub use scripted::{ScriptedViewer, ViewerEvent};

use crate::core::Sign;

/// Pergunta feita ao usuário sobre um fato folha.
#[derive(Clone, Copy, Debug)]
pub struct Question<'a> {
    /// Id do fato perguntado.
    pub fact: &'a str,
    /// Texto exibido.
    pub text: &'a str,
    /// Respostas aceitas.
    pub options: &'a [Sign],
}

impl<'a> Question<'a> {
    pub fn new(fact: &'a str, text: &'a str) -> Self {
        Self {
            fact,
            text,
            options: &Sign::ALL,
        }
    }

    /// Lista das opções no formato `sim/não/talvez`.
    pub fn options_label(&self) -> String {
        self.options
            .iter()
            .map(Sign::label)
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Interface de capacidade do diálogo com o usuário.
pub trait Viewer {
    fn debug(&mut self, text: &str);

    fn print(&mut self, text: &str);

    fn print_error(&mut self, text: &str);

    /// Bloqueia até obter uma das `question.options`.
    fn ask(&mut self, question: &Question<'_>) -> Sign;
}

/// Pergunta padrão quando a base não define uma para o fato.
pub fn default_question(fact: &str) -> String {
    format!("O fato '{}' é verdadeiro?", fact)
}

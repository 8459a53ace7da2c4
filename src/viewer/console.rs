//! # ConsoleViewer — Viewer Interativo de Terminal
//!
//! Escreve mensagens na saída e lê respostas linha a linha da entrada.
//! Genérico sobre `BufRead`/`Write` para poder ser testado com buffers em
//! memória; [`ConsoleViewer::stdio()`] monta a versão ligada ao terminal.
//!
//! ```text
//! ? O paciente tem febre? [sim/não/talvez] sim
//! ```
//!
//! Respostas fora das opções são recusadas e a pergunta é repetida. Fim da
//! entrada (EOF) conta como `talvez`: o encadeamento para trás é abortado
//! em vez de ficar bloqueado para sempre.

use std::io::{self, BufRead, Stdin, StdinLock, Stdout, Write};

use crate::core::Sign;

use super::{Question, Viewer};

/// Viewer de terminal.
pub struct ConsoleViewer<R, W> {
    input: R,
    output: W,
    /// Quando `true`, as mensagens de `debug` também são impressas.
    verbose: bool,
}

impl ConsoleViewer<StdinLock<'static>, Stdout> {
    /// Viewer ligado a stdin/stdout.
    pub fn stdio(verbose: bool) -> Self {
        let stdin: Stdin = io::stdin();
        Self::new(stdin.lock(), io::stdout(), verbose)
    }
}

impl<R: BufRead, W: Write> ConsoleViewer<R, W> {
    pub fn new(input: R, output: W, verbose: bool) -> Self {
        Self {
            input,
            output,
            verbose,
        }
    }

    /// Devolve a saída, usado nos testes para inspecionar o que foi escrito.
    pub fn into_output(self) -> W {
        self.output
    }

    fn write_line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.output, "{}", line) {
            tracing::warn!(error = %e, "Falha ao escrever no console");
        }
    }
}

impl<R: BufRead, W: Write> Viewer for ConsoleViewer<R, W> {
    fn debug(&mut self, text: &str) {
        tracing::debug!(target: "viewer", "{}", text);
        if self.verbose {
            self.write_line(&format!("· {}", text));
        }
    }

    fn print(&mut self, text: &str) {
        self.write_line(text);
    }

    fn print_error(&mut self, text: &str) {
        tracing::warn!(target: "viewer", "{}", text);
        self.write_line(&format!("! {}", text));
    }

    fn ask(&mut self, question: &Question<'_>) -> Sign {
        loop {
            let prompt = format!("? {} [{}] ", question.text, question.options_label());
            if let Err(e) = write!(self.output, "{}", prompt).and_then(|_| self.output.flush()) {
                tracing::warn!(error = %e, "Falha ao escrever a pergunta");
            }

            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) => {
                    tracing::info!(fact = %question.fact, "Entrada encerrada, resposta incerta");
                    return Sign::Unsure;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "Falha ao ler resposta");
                    return Sign::Unsure;
                }
            }

            match line.parse::<Sign>() {
                Ok(sign) if question.options.contains(&sign) => return sign,
                Ok(sign) => {
                    self.print_error(&format!("'{}' não é uma opção válida aqui", sign.label()))
                }
                Err(e) => self.print_error(&e.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewer(input: &str) -> ConsoleViewer<&[u8], Vec<u8>> {
        ConsoleViewer::new(input.as_bytes(), Vec::new(), false)
    }

    #[test]
    fn test_ask_parses_answer() {
        let mut console = viewer("sim\n");
        let answer = console.ask(&Question::new("A", "Tem A?"));
        assert_eq!(answer, Sign::Positive);

        let out = String::from_utf8(console.into_output()).unwrap();
        assert!(out.contains("? Tem A? [sim/não/talvez]"));
    }

    /// Respostas inválidas são recusadas e a pergunta é repetida
    #[test]
    fn test_ask_repeats_on_invalid_answer() {
        let mut console = viewer("quem sabe\nnão\n");
        assert_eq!(console.ask(&Question::new("A", "Tem A?")), Sign::Negative);

        let out = String::from_utf8(console.into_output()).unwrap();
        assert_eq!(out.matches("? Tem A?").count(), 2);
        assert!(out.contains("! resposta não reconhecida"));
    }

    /// Resposta fora das opções oferecidas também é recusada
    #[test]
    fn test_ask_respects_restricted_options() {
        let mut console = viewer("talvez\nsim\n");
        let options = [Sign::Positive, Sign::Negative];
        let question = Question {
            fact: "A",
            text: "Tem A?",
            options: &options,
        };
        assert_eq!(console.ask(&question), Sign::Positive);
    }

    /// EOF na entrada encerra a pergunta como incerta
    #[test]
    fn test_ask_eof_is_unsure() {
        let mut console = viewer("");
        assert_eq!(console.ask(&Question::new("A", "Tem A?")), Sign::Unsure);
    }

    /// Debug só aparece na saída em modo verboso
    #[test]
    fn test_debug_respects_verbose() {
        let mut quiet = viewer("");
        quiet.debug("detalhe");
        assert!(quiet.into_output().is_empty());

        let mut verbose = ConsoleViewer::new("".as_bytes(), Vec::new(), true);
        verbose.debug("detalhe");
        let out = String::from_utf8(verbose.into_output()).unwrap();
        assert_eq!(out, "· detalhe\n");
    }
}

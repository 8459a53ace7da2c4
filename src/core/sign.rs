//! # Sign — Valor de Verdade Trivalente
//!
//! Todo [`Fact`](super::Fact) carrega um [`Sign`]: positivo, negativo ou
//! incerto. É a única noção de "verdade" do motor: não há lógica fuzzy nem
//! probabilidades, apenas estes três valores e o fator de certeza linear
//! calculado sobre as causas de uma regra.
//!
//! | Variante | Significado | Texto aceito |
//! |----------|-------------|--------------|
//! | `Positive` | o fato é verdadeiro | `+`, `s`, `sim`, `y`, `yes`, `positive` |
//! | `Negative` | o fato é falso | `-`, `n`, `não`, `nao`, `no`, `negative` |
//! | `Unsure` | o usuário não sabe | `?`, `t`, `talvez`, `unsure` |
//!
//! No encadeamento para trás, uma resposta `Unsure` **interrompe** a
//! execução (ver [`Outcome::Aborted`](crate::inference::Outcome::Aborted)).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Sinal trivalente de um fato.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sign {
    /// Fato confirmado.
    Positive,
    /// Fato negado.
    Negative,
    /// Fato sem resposta conclusiva.
    Unsure,
}

impl Sign {
    /// As três opções oferecidas ao [`Viewer`](crate::viewer::Viewer) em cada pergunta.
    pub const ALL: [Sign; 3] = [Sign::Positive, Sign::Negative, Sign::Unsure];

    /// Símbolo curto usado nos relatórios (`+`, `-`, `?`).
    pub fn symbol(&self) -> &'static str {
        match self {
            Sign::Positive => "+",
            Sign::Negative => "-",
            Sign::Unsure => "?",
        }
    }

    /// Label legível em PT-BR.
    pub fn label(&self) -> &'static str {
        match self {
            Sign::Positive => "sim",
            Sign::Negative => "não",
            Sign::Unsure => "talvez",
        }
    }

    pub fn is_positive(&self) -> bool {
        matches!(self, Sign::Positive)
    }

    pub fn is_negative(&self) -> bool {
        matches!(self, Sign::Negative)
    }
}

impl Default for Sign {
    fn default() -> Self {
        Sign::Positive
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Erro de parsing de um [`Sign`] a partir de texto livre.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("resposta não reconhecida: '{0}'")]
pub struct ParseSignError(pub String);

impl FromStr for Sign {
    type Err = ParseSignError;

    /// Aceita respostas em PT-BR e em inglês, sem diferenciar maiúsculas.
    ///
    /// A entrada é normalizada em NFC antes da comparação: "não" digitado
    /// com acento combinante (`a` + `~`) é reconhecido igual ao pré-composto.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s.trim().nfc().collect::<String>().to_lowercase();
        match normalized.as_str() {
            "+" | "s" | "sim" | "y" | "yes" | "positive" | "positivo" => Ok(Sign::Positive),
            "-" | "n" | "não" | "nao" | "no" | "negative" | "negativo" => Ok(Sign::Negative),
            "?" | "t" | "talvez" | "unsure" | "incerto" => Ok(Sign::Unsure),
            _ => Err(ParseSignError(s.trim().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Respostas em PT-BR e inglês mapeiam para o mesmo sinal
    #[test]
    fn test_parse_accepts_both_languages() {
        assert_eq!("sim".parse::<Sign>(), Ok(Sign::Positive));
        assert_eq!("YES".parse::<Sign>(), Ok(Sign::Positive));
        assert_eq!(" não ".parse::<Sign>(), Ok(Sign::Negative));
        assert_eq!("no".parse::<Sign>(), Ok(Sign::Negative));
        assert_eq!("talvez".parse::<Sign>(), Ok(Sign::Unsure));
        assert_eq!("?".parse::<Sign>(), Ok(Sign::Unsure));
    }

    /// "não" com til combinante (NFD) é normalizado antes da comparação
    #[test]
    fn test_parse_normalizes_decomposed_input() {
        let decomposed = "na\u{0303}o";
        assert_eq!(decomposed.parse::<Sign>(), Ok(Sign::Negative));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("talvez não".parse::<Sign>().is_err());
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&Sign::Negative).unwrap();
        assert_eq!(json, "\"negative\"");
        let back: Sign = serde_json::from_str("\"unsure\"").unwrap();
        assert_eq!(back, Sign::Unsure);
    }
}

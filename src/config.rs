//! # Configuração da Execução
//!
//! Resolvida em camadas (maior prioridade primeiro):
//!
//! 1. Variáveis de ambiente `RULE_CHAIN_*`
//! 2. Arquivo TOML (primeiro argumento da linha de comando, padrão `rule-chain.toml`)
//! 3. Valores padrão compilados
//!
//! O arquivo padrão é opcional; um caminho passado explicitamente precisa existir.
//!
//! ## Exemplo
//!
//! ```toml
//! knowledge_base = "data/rules.json"
//! algorithm = "mixed"
//! facts = ["febre", { id = "tosse", sign = "não" }]
//! goals = ["gripe"]
//! found_factor = 0.5
//! summary_path = "out/summary.json"
//!
//! [answers]
//! "dor no corpo" = "sim"
//! ```
//!
//! ## Variáveis de Ambiente
//!
//! | Variável | Campo |
//! |----------|-------|
//! | `RULE_CHAIN_KB` | `knowledge_base` |
//! | `RULE_CHAIN_ALGORITHM` | `algorithm` |
//! | `RULE_CHAIN_FOUND_FACTOR` | `found_factor` |
//! | `RULE_CHAIN_MAX_MIXED_ROUNDS` | `max_mixed_rounds` |
//! | `RULE_CHAIN_VERBOSE` | `verbose` |
//!
//! Valores numéricos ou booleanos que não fazem parse são ignorados com um
//! aviso. Um nome de algoritmo desconhecido é erro.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::{Fact, Sign};
use crate::error::ConfigError;
use crate::inference::{ShootPolicy, Strategy, DEFAULT_FOUND_FACTOR, DEFAULT_MAX_MIXED_ROUNDS};

/// Arquivo lido quando nenhum caminho é passado na linha de comando.
pub const DEFAULT_CONFIG_PATH: &str = "rule-chain.toml";

/// Fato semente: id simples (positivo) ou tabela completa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactSeed {
    Plain(String),
    Detailed {
        id: String,
        /// Qualquer texto aceito por `Sign::from_str` (`sim`, `não`, `negative`...).
        #[serde(default)]
        sign: Option<String>,
        #[serde(default)]
        weight: Option<f64>,
    },
}

impl FactSeed {
    pub fn to_fact(&self) -> Result<Fact, ConfigError> {
        match self {
            FactSeed::Plain(id) => Ok(Fact::positive(id)),
            FactSeed::Detailed { id, sign, weight } => {
                let sign = match sign {
                    Some(text) => parse_sign(&format!("facts.{}", id), text)?,
                    None => Sign::Positive,
                };
                let fact = Fact::new(id, sign);
                Ok(match weight {
                    Some(weight) => fact.with_weight(*weight),
                    None => fact,
                })
            }
        }
    }

    fn id(&self) -> &str {
        match self {
            FactSeed::Plain(id) => id,
            FactSeed::Detailed { id, .. } => id,
        }
    }
}

fn parse_sign(field: &str, text: &str) -> Result<Sign, ConfigError> {
    text.parse::<Sign>().map_err(|e| ConfigError::ValidationFailed {
        field: field.to_string(),
        message: e.to_string(),
    })
}

/// Configuração completa de uma execução.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Caminho da base de regras em JSON.
    pub knowledge_base: PathBuf,
    pub algorithm: Strategy,
    pub facts: Vec<FactSeed>,
    pub goals: Vec<String>,
    pub found_factor: f64,
    pub max_mixed_rounds: usize,
    pub shoot_policy: ShootPolicy,
    /// Imprime o raciocínio passo a passo no console.
    pub verbose: bool,
    /// Onde gravar o relatório JSON. Ausente: só imprime o texto.
    pub summary_path: Option<PathBuf>,
    /// Filtro do `tracing` quando `RUST_LOG` não está definido.
    pub log_level: String,
    /// Respostas pré-gravadas. Presente: execução não interativa.
    pub answers: Option<BTreeMap<String, String>>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            knowledge_base: PathBuf::from("data/rules.json"),
            algorithm: Strategy::default(),
            facts: Vec::new(),
            goals: Vec::new(),
            found_factor: DEFAULT_FOUND_FACTOR,
            max_mixed_rounds: DEFAULT_MAX_MIXED_ROUNDS,
            shoot_policy: ShootPolicy::default(),
            verbose: false,
            summary_path: None,
            log_level: "info".to_string(),
            answers: None,
        }
    }
}

impl ChainConfig {
    /// Carrega a configuração em camadas e valida o resultado.
    ///
    /// `path` ausente usa [`DEFAULT_CONFIG_PATH`] se ele existir.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Self::from_file(default)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Carrega de uma string TOML (usado nos testes).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Aplica as variáveis `RULE_CHAIN_*` obtidas por `lookup`.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(val) = lookup("RULE_CHAIN_KB") {
            self.knowledge_base = PathBuf::from(val);
        }
        if let Some(val) = lookup("RULE_CHAIN_ALGORITHM") {
            self.algorithm = val.parse().map_err(|e: crate::error::EngineError| {
                ConfigError::ValidationFailed {
                    field: "algorithm".to_string(),
                    message: e.to_string(),
                }
            })?;
        }
        if let Some(val) = lookup("RULE_CHAIN_FOUND_FACTOR") {
            match val.parse::<f64>() {
                Ok(v) => self.found_factor = v,
                Err(_) => tracing::warn!(value = %val, "RULE_CHAIN_FOUND_FACTOR ignorado"),
            }
        }
        if let Some(val) = lookup("RULE_CHAIN_MAX_MIXED_ROUNDS") {
            match val.parse::<usize>() {
                Ok(v) => self.max_mixed_rounds = v,
                Err(_) => tracing::warn!(value = %val, "RULE_CHAIN_MAX_MIXED_ROUNDS ignorado"),
            }
        }
        if let Some(val) = lookup("RULE_CHAIN_VERBOSE") {
            match val.parse::<bool>() {
                Ok(v) => self.verbose = v,
                Err(_) => tracing::warn!(value = %val, "RULE_CHAIN_VERBOSE ignorado"),
            }
        }
        Ok(())
    }

    /// Valida os valores finais.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.found_factor) {
            return Err(ConfigError::ValidationFailed {
                field: "found_factor".to_string(),
                message: "deve estar entre 0.0 e 1.0".to_string(),
            });
        }
        if self.max_mixed_rounds == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "max_mixed_rounds".to_string(),
                message: "deve ser maior que 0".to_string(),
            });
        }
        for seed in &self.facts {
            if seed.id().trim().is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "facts".to_string(),
                    message: "fato com id vazio".to_string(),
                });
            }
            seed.to_fact()?;
        }
        if self.goals.iter().any(|goal| goal.trim().is_empty()) {
            return Err(ConfigError::ValidationFailed {
                field: "goals".to_string(),
                message: "objetivo com id vazio".to_string(),
            });
        }
        self.answer_signs()?;
        Ok(())
    }

    /// Fatos iniciais já convertidos.
    pub fn initial_facts(&self) -> Result<Vec<Fact>, ConfigError> {
        self.facts.iter().map(FactSeed::to_fact).collect()
    }

    /// Respostas pré-gravadas convertidas em sinais, se houver a seção.
    pub fn answer_signs(&self) -> Result<Option<Vec<(String, Sign)>>, ConfigError> {
        let Some(answers) = &self.answers else {
            return Ok(None);
        };
        answers
            .iter()
            .map(|(fact, text)| Ok((fact.clone(), parse_sign(&format!("answers.{}", fact), text)?)))
            .collect::<Result<Vec<_>, ConfigError>>()
            .map(Some)
    }
}

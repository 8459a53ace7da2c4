#![allow(dead_code)]
#![allow(rustdoc::broken_intra_doc_links)]
//! # rule-chain — Motor de Encadeamento de Regras
//!
//! **Ponto de entrada** da aplicação de linha de comando.
//!
//! Carrega uma base de regras, semeia fatos e objetivos a partir da
//! configuração e executa um dos três algoritmos de inferência, imprimindo
//! o rastro das regras disparadas ao final.
//!
//! ## Fluxo de Execução
//!
//! ```text
//! main()
//!   ├── Carrega a configuração (TOML + RULE_CHAIN_*)
//!   ├── Configura tracing/logging
//!   ├── Carrega a base de regras (JSON)
//!   ├── Escolhe o viewer:
//!   │     ├── [answers] presente → ScriptedViewer
//!   │     └── senão              → ConsoleViewer (stdin/stdout)
//!   ├── Monta o InferenceEngine
//!   ├── Executa forward | backward | mixed
//!   └── Imprime o Summary (e grava JSON se summary_path estiver definido)
//! ```
//!
//! ## Exemplo de Uso
//!
//! ```bash
//! # Usa ./rule-chain.toml se existir
//! cargo run
//!
//! # Configuração explícita e algoritmo sobrescrito pelo ambiente
//! RULE_CHAIN_ALGORITHM=mixed cargo run -- rule-chain.toml
//!
//! # Logs detalhados (vão para stderr)
//! RUST_LOG=debug cargo run
//! ```
//!
//! O processo sai com código `2` quando a execução é interrompida por uma
//! resposta `talvez`.

/// Módulo `core` — fatos, stores, regras e a base de conhecimento.
mod core;

/// Módulo `config` — configuração em camadas (TOML + ambiente).
mod config;

/// Módulo `error` — erros do motor e da configuração.
mod error;

/// Módulo `inference` — forward, backward e mixed.
mod inference;

/// Módulo `persistence` — leitura da base e gravação do relatório em JSON.
mod persistence;

/// Módulo `summary` — rastro causal das regras disparadas.
mod summary;

/// Módulo `viewer` — diálogo com o usuário.
mod viewer;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::ChainConfig;
use crate::inference::InferenceEngine;
use crate::viewer::{ConsoleViewer, ScriptedViewer, Viewer};

fn main() -> Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = ChainConfig::load(config_path.as_deref()).context("Falha ao carregar a configuração")?;

    // RUST_LOG tem prioridade sobre log_level da configuração.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(algorithm = %config.algorithm, "rule-chain — Starting...");

    let book = persistence::load_rule_book(&config.knowledge_base)?;

    let viewer: Box<dyn Viewer> = match config.answer_signs()? {
        Some(answers) => {
            tracing::info!(answers = answers.len(), "Usando respostas pré-gravadas");
            Box::new(ScriptedViewer::new(answers))
        }
        None => Box::new(ConsoleViewer::stdio(config.verbose)),
    };

    let mut engine = InferenceEngine::builder(Box::new(book))
        .initial_facts(config.initial_facts()?)
        .goals(&config.goals)
        .viewer(viewer)
        .found_factor(config.found_factor)
        .max_mixed_rounds(config.max_mixed_rounds)
        .shoot_policy(config.shoot_policy)
        .build()?;

    let outcome = engine
        .run(config.algorithm)
        .with_context(|| format!("Falha no encadeamento {}", config.algorithm))?;

    let summary = engine.summary();
    println!("{}", summary);
    if let Some(path) = &config.summary_path {
        persistence::save_summary(&summary, path)?;
    }

    tracing::info!(%outcome, "Execução encerrada");
    if !outcome.is_success() {
        std::process::exit(2);
    }
    Ok(())
}

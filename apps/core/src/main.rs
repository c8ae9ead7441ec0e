// Email Classifier Entry Point
// Classifies an email (text or .txt/.pdf file) as Produtivo / Improdutivo.

mod actors;
mod brain;
mod config;
mod error;
mod models;
mod text_extract;

#[cfg(test)]
mod tests;

use actors::supervisor::SupervisorHandle;
use anyhow::Context;
use clap::Parser;
use config::AppConfig;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

const SERVICE_NAME: &str = "email-classifier";

/// Classifica emails como Produtivo ou Improdutivo.
#[derive(Debug, Parser)]
#[command(name = "classifier-core", version, about)]
struct Cli {
    /// Texto do email a ser classificado
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    text: Option<String>,

    /// Arquivo PDF ou TXT contendo o email
    #[arg(long)]
    file: Option<PathBuf>,

    /// Imprime o JSON formatado
    #[arg(long)]
    pretty: bool,
}

/// Logs go to stderr; `LOG_FORMAT=json` selects Bunyan-style JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        Registry::default()
            .with(filter)
            .with(JsonStorageLayer)
            .with(BunyanFormattingLayer::new(
                SERVICE_NAME.to_string(),
                std::io::stderr,
            ))
            .init();
    } else {
        Registry::default()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    config.log_summary();

    let supervisor = SupervisorHandle::from_config(&config)?;

    let result = match cli.file {
        Some(path) => {
            let (file_name, data) = text_extract::read_upload(&path)
                .await
                .with_context(|| format!("Erro ao ler arquivo {}", path.display()))?;
            supervisor.classify_file(file_name, data).await?
        }
        None => {
            supervisor
                .classify_text(cli.text.unwrap_or_default())
                .await?
        }
    };

    let output = if cli.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{}", output);

    supervisor.shutdown().await;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    info!("Classificador de Emails iniciado");
    if let Err(e) = run(cli).await {
        error!("Falha na classificação: {:#}", e);
        return Err(e);
    }
    info!("Classificador de Emails encerrado");
    Ok(())
}

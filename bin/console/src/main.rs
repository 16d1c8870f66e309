//! Console driver for chatflow.
//!
//! Serves one conversation over stdin and stdout. Launching starts the
//! session; every following line is a user message. Lines starting with `/`
//! are commands:
//!
//! - `/restart` starts the conversation over
//! - `/reload` re-reads the flow document and swaps it in
//! - `/quit` exits

mod config;
mod error;

use chatflow_ai::build_classifier;
use chatflow_conversation::{InMemorySessionStore, InMemoryTranscript};
use chatflow_core::SessionId;
use chatflow_engine::FlowEngine;
use chatflow_flow::FlowProvider;
use crate::config::AppConfig;
use crate::error::ConsoleError;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const PROMPT: &[u8] = b"> ";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(report) => {
            tracing::error!(error = %report, "chatflow console stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> chatflow_core::Result<(), ConsoleError> {
    let config = AppConfig::from_env().map_err(|e| ConsoleError::Config {
        reason: e.to_string(),
    })?;
    tracing::info!(flow_path = %config.flow_path.display(), "Loaded configuration");

    let flows = Arc::new(FlowProvider::new());
    load_flow(&flows, &config.flow_path).await?;

    let engine = FlowEngine::new(
        Arc::clone(&flows),
        Arc::new(InMemorySessionStore::new()),
        Arc::new(InMemoryTranscript::new()),
        build_classifier(&config.classifier),
    )
    .with_config(config.engine.clone());

    let session = SessionId::new(config.session_id.clone());
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print_messages(&mut stdout, engine.start(&session).await).await?;

    loop {
        write_out(&mut stdout, PROMPT).await?;

        let line = tokio::select! {
            line = lines.next_line() => line.map_err(ConsoleError::from)?,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                None
            }
        };
        let Some(line) = line else {
            break;
        };

        let replies = match line.trim() {
            "/quit" => break,
            "/restart" => engine.start(&session).await,
            "/reload" => {
                if let Err(report) = load_flow(&flows, &config.flow_path).await {
                    tracing::warn!(error = %report, "Reload failed, keeping active flow");
                }
                continue;
            }
            text => engine.on_user_message(&session, Some(text)).await,
        };
        print_messages(&mut stdout, replies).await?;
    }

    Ok(())
}

async fn load_flow(flows: &FlowProvider, path: &Path) -> chatflow_core::Result<(), ConsoleError> {
    flows
        .load_file(path)
        .await
        .map_err(|report| ConsoleError::FlowLoad {
            path: path.display().to_string(),
            reason: report.to_string(),
        })?;
    Ok(())
}

async fn print_messages(
    stdout: &mut Stdout,
    messages: Vec<String>,
) -> chatflow_core::Result<(), ConsoleError> {
    for message in messages {
        write_out(stdout, format!("{}\n", message).as_bytes()).await?;
    }
    Ok(())
}

async fn write_out(stdout: &mut Stdout, bytes: &[u8]) -> chatflow_core::Result<(), ConsoleError> {
    stdout.write_all(bytes).await.map_err(ConsoleError::from)?;
    stdout.flush().await.map_err(ConsoleError::from)?;
    Ok(())
}

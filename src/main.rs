//! tool-relay - interactive front end.
//!
//! Reads one request per line from stdin and prints the proposed tool call,
//! the tool result and the final answer. `/clear` forgets the conversation,
//! `/quit` (or end of input) exits.

use std::error::Error;
use std::sync::Arc;

use secrecy::ExposeSecret;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

use tool_relay::adapters::ai::{OpenAIConfig, OpenAIProvider};
use tool_relay::adapters::registry::{HttpRegistryConfig, HttpToolRegistry, LazyToolRegistry};
use tool_relay::application::{CompletionClient, Orchestrator, ToolCatalog, ToolExecutor};
use tool_relay::config::{AppConfig, LoggingConfig};
use tool_relay::domain::conversation::ConversationHistory;
use tool_relay::ports::ToolRegistry;

fn init_tracing(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

fn build_orchestrator(config: &AppConfig) -> Result<Orchestrator, Box<dyn Error>> {
    let api_key = config
        .ai
        .api_key
        .as_ref()
        .map(|k| k.expose_secret().clone())
        .unwrap_or_default();
    let provider = OpenAIProvider::new(
        OpenAIConfig::new(api_key)
            .with_model(&config.ai.model)
            .with_base_url(&config.ai.base_url)
            .with_timeout(config.ai.timeout())
            .with_max_retries(config.ai.max_retries),
    )?;

    let mut completion = CompletionClient::new(Arc::new(provider))
        .with_temperature(config.ai.temperature)
        .with_timeout(config.ai.timeout());
    if let Some(max_tokens) = config.ai.max_tokens {
        completion = completion.with_max_tokens(max_tokens);
    }

    let registry_config = HttpRegistryConfig::new(&config.catalog.base_url)
        .with_manual_path(&config.catalog.manual_path)
        .with_timeout(config.catalog.timeout());
    let registry: Arc<dyn ToolRegistry> = Arc::new(LazyToolRegistry::new(move || {
        let registry_config = registry_config.clone();
        async move {
            let inner = HttpToolRegistry::connect(registry_config).await?;
            Ok(Arc::new(inner) as Arc<dyn ToolRegistry>)
        }
    }));

    let timeout = config.catalog.timeout();
    Ok(Orchestrator::new(
        ToolCatalog::new(registry.clone()).with_timeout(timeout),
        completion,
        ToolExecutor::new(registry).with_timeout(timeout),
    )
    .with_settings(config.orchestrator.settings()))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.logging);
    config.validate()?;

    tracing::info!(
        model = %config.ai.model,
        catalog = %config.catalog.base_url,
        "Starting tool-relay"
    );
    let orchestrator = build_orchestrator(&config)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut history = ConversationHistory::new();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        match input {
            "" => continue,
            "/quit" | "/exit" => break,
            "/clear" => {
                history = ConversationHistory::new();
                stdout.write_all(b"(history cleared)\n").await?;
                continue;
            }
            _ => {}
        }

        match orchestrator.handle(input, &history).await {
            Ok(outcome) => {
                let report = format!(
                    "\n--- Proposed tool call ---\n{}\n\n--- Tool result ---\n{}\n\n--- Final answer ---\n{}\n\n",
                    outcome.proposed_call, outcome.tool_result, outcome.final_answer
                );
                stdout.write_all(report.as_bytes()).await?;
                history = outcome.history;
            }
            Err(err) => {
                tracing::error!(error = %err, "Request failed");
                stdout
                    .write_all(format!("Error: {}\n", err).as_bytes())
                    .await?;
            }
        }
    }

    Ok(())
}

mod api;
mod router;
mod state;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use studio_billing::{BillingProvider, StripeClient};
use studio_llm::{create_provider, GenerationSettings, StudyGenerator};

use crate::state::AppState;

/// HTTP backend for document study tools.
///
/// Serves flashcard and infographic generation, file conversion, and
/// subscription billing. Everything else comes from the environment.
#[derive(Parser, Debug)]
#[command(name = "studio-server", version, about = "HTTP backend for document study tools")]
struct Args {
    /// Bind address (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Listen port (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Config profile; keys are looked up as {PROFILE}_{KEY} first
    #[arg(long, env = "STUDIO_PROFILE")]
    profile: Option<String>,
}

fn load_config(args: &Args) -> studio_core::Config {
    let mut config = studio_core::Config::for_profile(args.profile.as_deref().unwrap_or(""));
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    studio_core::config::load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let args = Args::parse();
    let config = load_config(&args);
    config.validate().context("invalid configuration")?;
    config.log_summary();

    let provider = create_provider(&config.llm, &config.ollama)
        .context("failed to create LLM provider")?;
    let generator = StudyGenerator::new(provider, GenerationSettings::from(&config.llm))
        .context("failed to load prompt templates")?;
    info!("Generation backend: {}", generator.provider_name());

    let billing = StripeClient::from_config(&config.billing)
        .map(|client| Arc::new(client) as Arc<dyn BillingProvider>);
    if billing.is_none() {
        info!("STRIPE_SECRET_KEY not set, billing endpoints will answer 503");
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, generator, billing));
    let app = router::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

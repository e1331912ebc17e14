//! Captain Click server binary.
//!
//! Loads configuration, wires the model gateway and quota into the
//! explanation pipeline, and serves the HTTP API.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use captain_click::adapters::ai::{
    AnthropicConfig, AnthropicProvider, GatewayConfig, ModelGateway, OpenAIConfig, OpenAIProvider,
};
use captain_click::adapters::http::{app_router, ExplainHandlers};
use captain_click::adapters::rate_limiter::InMemoryRateLimiter;
use captain_click::application::{GenerateExplanationHandler, GenerationSettings};
use captain_click::config::{AiConfig, AiProvider, AppConfig};
use captain_click::ports::AIProvider as AIProviderPort;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let provider = build_provider(&config.ai)?;
    let gateway = Arc::new(ModelGateway::new(
        provider,
        GatewayConfig::new(config.ai.attempt_timeout(), config.ai.request_budget()),
    ));

    let settings = GenerationSettings {
        models: config.ai.model_chain(),
        max_tokens: config.ai.max_tokens,
        temperature: config.ai.temperature,
        ..Default::default()
    };

    let mut handler = GenerateExplanationHandler::new(gateway, settings);
    if config.rate_limit.enabled {
        let limiter = InMemoryRateLimiter::new(config.rate_limit.daily_limit)
            .with_cleanup_probability(config.rate_limit.cleanup_probability);
        tracing::info!(daily_limit = limiter.daily_limit(), "daily quota enabled");
        handler = handler.with_rate_limiter(Arc::new(limiter));
    } else {
        tracing::info!("daily quota disabled");
    }

    let app = app_router(
        ExplainHandlers::new(Arc::new(handler)),
        &config.server.cors_origins_list(),
    );

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, models = ?config.ai.model_chain(), "captain click listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn build_provider(
    ai: &AiConfig,
) -> Result<Arc<dyn AIProviderPort>, captain_click::ports::AIError> {
    let key = ai.active_key();
    if key.is_none() {
        tracing::warn!(
            provider = ?ai.provider,
            "no API key configured; every request will be served fallback content"
        );
    }

    let provider: Arc<dyn AIProviderPort> = match ai.provider {
        AiProvider::Anthropic => Arc::new(AnthropicProvider::new(
            AnthropicConfig::new(key)
                .with_base_url(&ai.anthropic_base_url)
                .with_timeout(ai.request_budget()),
        )?),
        AiProvider::OpenAI => Arc::new(OpenAIProvider::new(
            OpenAIConfig::new(key)
                .with_base_url(&ai.openai_base_url)
                .with_timeout(ai.request_budget()),
        )?),
    };
    Ok(provider)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}

//! strategy-builder HTTP Server
//!
//! Axum-based server exposing the strategy wizard as a REST API, plus the
//! catalogs and the translation endpoint used by the web front end.

mod config;
mod handlers;
mod routes;
mod session;
mod state;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use strategy_builder::{collab::{LlmResearchSummarizer, MockSentimentSource}, ProviderLlm};
use strategy_core::{GenerationOptions, LlmProvider, ProviderChain, ProviderStrategy};
use strategy_runtime::{
    GeminiConfig, GeminiProvider, OllamaConfig, OllamaProvider, TranslationCache, TranslationService,
};

use crate::config::{LlmBackend, ServerConfig};
use crate::session::WizardSessions;
use crate::state::AppState;

fn build_provider(config: &ServerConfig) -> anyhow::Result<Arc<dyn LlmProvider>> {
    let provider: Arc<dyn LlmProvider> = match config.llm_backend {
        LlmBackend::Gemini => {
            let mut gemini = GeminiConfig::from_env()?;
            if let Some(model) = config.model_override() {
                gemini.model = model.to_string();
            }
            Arc::new(GeminiProvider::from_config(gemini)?)
        }
        LlmBackend::Ollama => {
            let mut ollama = OllamaConfig::from_env();
            if let Some(model) = config.model_override() {
                ollama.model = model.to_string();
            }
            Arc::new(OllamaProvider::from_config(ollama))
        }
        LlmBackend::Failover => {
            if config.llm_model.is_some() {
                tracing::warn!("⚠ LLM_MODEL is ignored in failover mode; set GEMINI_MODEL / OLLAMA_MODEL");
            }
            let mut providers: Vec<Box<dyn LlmProvider>> = Vec::new();
            match GeminiProvider::from_env() {
                Ok(gemini) => providers.push(Box::new(gemini)),
                Err(e) => tracing::warn!("⚠ Gemini skipped in failover chain: {}", e),
            }
            providers.push(Box::new(OllamaProvider::from_env()));
            Arc::new(
                ProviderChain::new(providers, ProviderStrategy::Failover)
                    .with_attempt_timeout(config.llm_timeout),
            )
        }
    };
    Ok(provider)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();
    let config = ServerConfig::from_env()?;

    // Initialize LLM provider
    let provider = build_provider(&config)?;

    match provider.health_check().await {
        Ok(true) => {
            tracing::info!("✓ Connected to {}", provider.name());
            if let Ok(models) = provider.list_models().await {
                for model in models {
                    tracing::info!("  Model: {}", model.id);
                }
            }
        }
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ {} not available - generation will fail", provider.name());
            tracing::warn!("  Set GEMINI_API_KEY, or run Ollama with LLM_PROVIDER=ollama");
        }
    }

    // Empty model: each provider answers with its configured model
    let options = GenerationOptions::default();
    let llm = Arc::new(ProviderLlm::new(provider.clone(), options.clone()));
    let research = Arc::new(LlmResearchSummarizer::new(provider.clone(), options));

    // Translation cache lives as long as the server
    let cache = Arc::new(TranslationCache::new(
        config.translation_cache_ttl,
        config.translation_cache_capacity,
    ));
    let translation = Arc::new(TranslationService::with_public_providers(
        cache,
        &config.libretranslate_url,
        config.google_translate_api_key.clone(),
    ));
    tracing::info!("Translation providers: {}", translation.provider_names().join(" → "));

    let sessions = Arc::new(WizardSessions::new(config.layout.clone(), config.numbering));

    // Drop idle wizards
    let pruned = sessions.clone();
    let idle = config.session_idle;
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(idle.clamp(Duration::from_secs(1), Duration::from_secs(60)));
        loop {
            tick.tick().await;
            let removed = pruned.prune_idle(idle);
            if removed > 0 {
                tracing::info!(removed, remaining = pruned.len(), "Pruned idle wizards");
            }
        }
    });

    let config = Arc::new(config);
    let state = AppState {
        provider,
        llm,
        sessions,
        sentiment: Arc::new(MockSentimentSource::new()),
        research,
        translation,
        config: config.clone(),
    };

    let app = routes::router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 strategy-builder server running on http://{}", config.bind_addr);
    tracing::info!("   layout: {}, prompt numbering: {:?}", config.layout.name, config.numbering);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                          - Health check");
    tracing::info!("  GET  /api/models                      - List available models");
    tracing::info!("  GET  /api/catalog/{{tokens|presets|foundational}}");
    tracing::info!("  POST /api/wizards                     - Start a wizard");
    tracing::info!("  POST /api/wizards/{{id}}/next|back|reset");
    tracing::info!("  PUT  /api/wizards/{{id}}/payload        - Submit step data");
    tracing::info!("  POST /api/wizards/{{id}}/generate       - Generate strategy");
    tracing::info!("  POST /api/translate                   - Translate UI text");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}

//! Router

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::handlers;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health & info
        .route("/health", get(handlers::health_check))
        .route("/api/models", get(handlers::list_models))

        // Catalogs
        .route("/api/catalog/tokens", get(handlers::catalog_tokens))
        .route("/api/catalog/presets", get(handlers::catalog_presets))
        .route("/api/catalog/foundational", get(handlers::catalog_foundational))

        // Wizard
        .route("/api/wizards", post(handlers::create_wizard))
        .route(
            "/api/wizards/{id}",
            get(handlers::get_wizard).delete(handlers::delete_wizard),
        )
        .route("/api/wizards/{id}/next", post(handlers::next_step))
        .route("/api/wizards/{id}/back", post(handlers::previous_step))
        .route("/api/wizards/{id}/reset", post(handlers::reset_wizard))
        .route("/api/wizards/{id}/skip/{step}", post(handlers::skip_step))
        .route("/api/wizards/{id}/unskip/{step}", post(handlers::unskip_step))
        .route("/api/wizards/{id}/payload", put(handlers::apply_payload))
        .route("/api/wizards/{id}/presets/{preset}", post(handlers::select_preset))
        .route(
            "/api/wizards/{id}/foundational/{strategy}",
            post(handlers::select_foundational),
        )
        .route("/api/wizards/{id}/model", put(handlers::set_model_target))
        .route("/api/wizards/{id}/prompt", get(handlers::get_prompt))
        .route("/api/wizards/{id}/sentiment", post(handlers::load_sentiment))
        .route("/api/wizards/{id}/research", post(handlers::load_research))
        .route("/api/wizards/{id}/generate", post(handlers::generate_strategy))
        .route("/api/wizards/{id}/proceed", post(handlers::proceed))

        // Translation
        .route("/api/translate", post(handlers::translate))
        .route("/api/translate/cache", delete(handlers::clear_translation_cache))

        // Static files (WASM frontend)
        .fallback_service(ServeDir::new("static"))

        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

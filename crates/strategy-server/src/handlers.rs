//! HTTP Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use strategy_builder::{
    catalog::{foundational_strategies, proven_presets, token_directory, FoundationalStrategy, ProvenPreset},
    collab::ResearchDocument,
    BuilderError, ErrorKind, GeneratedStrategy, ModelTarget, StepPayload, StrategyWizard, TokenInfo,
    WizardView,
};
use strategy_core::{GenerationError, ModelInfo};
use strategy_runtime::Translation;

use crate::session::{SessionId, SharedWizard};
use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub provider: String,
    pub provider_connected: bool,
    pub layout: &'static str,
    pub active_wizards: usize,
    pub translation_providers: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    /// Wizard state after the failure, when the error came from a wizard
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wizard: Option<WizardView>,
}

#[derive(Debug, Serialize)]
pub struct CreatedWizard {
    pub id: String,
    pub wizard: WizardView,
}

#[derive(Debug, Deserialize)]
pub struct ModelTargetRequest {
    pub target: ModelTarget,
}

#[derive(Debug, Serialize)]
pub struct PromptResponse {
    pub prompt: String,
    pub model_target: ModelTarget,
}

#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub texts: Vec<String>,
    pub target: String,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    pub translations: Vec<Translation>,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);
pub type ApiResult<T> = Result<Json<T>, ApiError>;

fn api_error(status: StatusCode, code: &str, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
            wizard: None,
        }),
    )
}

fn builder_error(err: &BuilderError, wizard: &StrategyWizard) -> ApiError {
    let (status, code) = match err {
        BuilderError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION"),
        BuilderError::Generation(e) => (StatusCode::BAD_GATEWAY, e.code()),
        BuilderError::CollaboratorFetch { .. } => (StatusCode::BAD_GATEWAY, "COLLABORATOR"),
        BuilderError::StepOutOfRange { .. } => (StatusCode::BAD_REQUEST, "STEP_OUT_OF_RANGE"),
        BuilderError::NotSkippable(_) => (StatusCode::CONFLICT, "NOT_SKIPPABLE"),
        BuilderError::StepNotInLayout(_) => (StatusCode::CONFLICT, "STEP_NOT_IN_LAYOUT"),
        BuilderError::Busy => (StatusCode::CONFLICT, "BUSY"),
        BuilderError::UnknownPreset(_) => (StatusCode::NOT_FOUND, "UNKNOWN_PRESET"),
        BuilderError::UnknownStrategy(_) => (StatusCode::NOT_FOUND, "UNKNOWN_STRATEGY"),
        BuilderError::NothingGenerated => (StatusCode::CONFLICT, "NOTHING_GENERATED"),
    };
    if err.kind() != ErrorKind::Validation {
        tracing::warn!(code, error = %err, "Wizard request failed");
    }
    (
        status,
        Json(ErrorResponse {
            error: err.user_message(),
            code: code.into(),
            wizard: Some(wizard.view()),
        }),
    )
}

/// Snapshot on success, error plus snapshot otherwise
fn respond<T>(result: Result<T, BuilderError>, wizard: &StrategyWizard) -> ApiResult<WizardView> {
    match result {
        Ok(_) => Ok(Json(wizard.view())),
        Err(e) => Err(builder_error(&e, wizard)),
    }
}

fn find_wizard(state: &AppState, id: &str) -> Result<SharedWizard, ApiError> {
    state
        .sessions
        .get(&SessionId::from_string(id))
        .ok_or_else(|| {
            api_error(
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
                format!("No wizard session '{}'", id),
            )
        })
}

// ============================================================================
// Health & catalogs
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider_connected = state.provider.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        provider: state.provider.name().to_string(),
        provider_connected,
        layout: state.config.layout.name,
        active_wizards: state.sessions.len(),
        translation_providers: state.translation.provider_names(),
    })
}

/// Models offered by the configured backend
pub async fn list_models(State(state): State<AppState>) -> ApiResult<Vec<ModelInfo>> {
    state.provider.list_models().await.map(Json).map_err(|e| {
        tracing::error!("Model listing failed: {}", e);
        api_error(StatusCode::BAD_GATEWAY, e.code(), e.user_message())
    })
}

pub async fn catalog_tokens() -> Json<Vec<TokenInfo>> {
    Json(token_directory())
}

pub async fn catalog_presets() -> Json<Vec<ProvenPreset>> {
    Json(proven_presets())
}

pub async fn catalog_foundational() -> Json<Vec<FoundationalStrategy>> {
    Json(foundational_strategies())
}

// ============================================================================
// Wizard lifecycle
// ============================================================================

pub async fn create_wizard(State(state): State<AppState>) -> (StatusCode, Json<CreatedWizard>) {
    let (id, wizard) = state.sessions.create();
    let view = wizard.lock().await.view();
    tracing::info!(session = %id, layout = %view.layout, "Wizard created");
    (
        StatusCode::CREATED,
        Json(CreatedWizard {
            id: id.to_string(),
            wizard: view,
        }),
    )
}

pub async fn get_wizard(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<WizardView> {
    let wizard = find_wizard(&state, &id)?;
    let view = wizard.lock().await.view();
    Ok(Json(view))
}

pub async fn delete_wizard(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.remove(&SessionId::from_string(&id)) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(api_error(
            StatusCode::NOT_FOUND,
            "SESSION_NOT_FOUND",
            format!("No wizard session '{}'", id),
        ))
    }
}

// ============================================================================
// Navigation
// ============================================================================

pub async fn next_step(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<WizardView> {
    let wizard = find_wizard(&state, &id)?;
    let mut wizard = wizard.lock().await;
    let result = wizard.next();
    respond(result, &wizard)
}

pub async fn previous_step(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<WizardView> {
    let wizard = find_wizard(&state, &id)?;
    let mut wizard = wizard.lock().await;
    let result = wizard.back();
    respond(result, &wizard)
}

pub async fn skip_step(
    State(state): State<AppState>,
    Path((id, step)): Path<(String, usize)>,
) -> ApiResult<WizardView> {
    let wizard = find_wizard(&state, &id)?;
    let mut wizard = wizard.lock().await;
    let result = wizard.skip(step);
    respond(result, &wizard)
}

pub async fn unskip_step(
    State(state): State<AppState>,
    Path((id, step)): Path<(String, usize)>,
) -> ApiResult<WizardView> {
    let wizard = find_wizard(&state, &id)?;
    let mut wizard = wizard.lock().await;
    wizard.unskip(step);
    Ok(Json(wizard.view()))
}

pub async fn reset_wizard(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<WizardView> {
    let wizard = find_wizard(&state, &id)?;
    let mut wizard = wizard.lock().await;
    wizard.reset();
    Ok(Json(wizard.view()))
}

// ============================================================================
// Data entry
// ============================================================================

pub async fn apply_payload(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<StepPayload>,
) -> ApiResult<WizardView> {
    let wizard = find_wizard(&state, &id)?;
    let mut wizard = wizard.lock().await;
    let result = wizard.apply(payload);
    respond(result, &wizard)
}

pub async fn select_preset(
    State(state): State<AppState>,
    Path((id, preset)): Path<(String, String)>,
) -> ApiResult<WizardView> {
    let wizard = find_wizard(&state, &id)?;
    let mut wizard = wizard.lock().await;
    let result = wizard.select_preset(&preset);
    respond(result, &wizard)
}

pub async fn select_foundational(
    State(state): State<AppState>,
    Path((id, strategy)): Path<(String, String)>,
) -> ApiResult<WizardView> {
    let wizard = find_wizard(&state, &id)?;
    let mut wizard = wizard.lock().await;
    let result = wizard.select_foundational(&strategy);
    respond(result, &wizard)
}

pub async fn set_model_target(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ModelTargetRequest>,
) -> ApiResult<WizardView> {
    let wizard = find_wizard(&state, &id)?;
    let mut wizard = wizard.lock().await;
    wizard.set_model_target(payload.target);
    Ok(Json(wizard.view()))
}

pub async fn get_prompt(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<PromptResponse> {
    let wizard = find_wizard(&state, &id)?;
    let wizard = wizard.lock().await;
    Ok(Json(PromptResponse {
        prompt: wizard.compose_prompt(),
        model_target: wizard.model_target(),
    }))
}

pub async fn load_sentiment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<WizardView> {
    let wizard = find_wizard(&state, &id)?;
    let mut wizard = wizard.lock().await;
    let result = wizard.load_sentiment(state.sentiment.as_ref()).await;
    respond(result, &wizard)
}

pub async fn load_research(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(document): Json<ResearchDocument>,
) -> ApiResult<WizardView> {
    let wizard = find_wizard(&state, &id)?;
    let mut wizard = wizard.lock().await;
    let result = wizard.load_research(state.research.as_ref(), document).await;
    respond(result, &wizard)
}

// ============================================================================
// Generation
// ============================================================================

/// Generate a strategy for the wizard's current inputs
///
/// The wizard lock is released while the LLM runs; the wizard stays busy
/// until the outcome is recorded. The call runs on its own task so the
/// outcome is recorded even when the client goes away mid-request.
pub async fn generate_strategy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<WizardView> {
    let wizard = find_wizard(&state, &id)?;

    let ticket = {
        let mut guard = wizard.lock().await;
        match guard.begin_generation() {
            Ok(ticket) => ticket,
            Err(e) => return Err(builder_error(&e, &guard)),
        }
    };

    let llm = state.llm.clone();
    let shared = wizard.clone();
    let pending = ticket.clone();
    let task = tokio::spawn(async move {
        let outcome = llm.generate(&pending.prompt).await;
        let mut guard = shared.lock().await;
        let result = guard.complete_generation(pending, outcome);
        respond(result, &guard)
    });

    match task.await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Generation task failed: {}", e);
            let mut guard = wizard.lock().await;
            let result = guard.complete_generation(
                ticket,
                Err(GenerationError::Other("generation task failed".into())),
            );
            respond(result, &guard)
        }
    }
}

/// Hand the generated strategy to backtesting
pub async fn proceed(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<GeneratedStrategy> {
    let wizard = find_wizard(&state, &id)?;
    let wizard = wizard.lock().await;
    match wizard.proceed() {
        Ok(strategy) => Ok(Json(strategy.clone())),
        Err(e) => Err(builder_error(&e, &wizard)),
    }
}

// ============================================================================
// Translation
// ============================================================================

pub async fn translate(
    State(state): State<AppState>,
    Json(payload): Json<TranslateRequest>,
) -> ApiResult<TranslateResponse> {
    let target = payload.target.trim();
    if target.is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "INVALID_LANGUAGE",
            "Target language is required",
        ));
    }

    let translations = state
        .translation
        .translate_batch(&payload.texts, target, payload.source.as_deref())
        .await;
    Ok(Json(TranslateResponse { translations }))
}

pub async fn clear_translation_cache(State(state): State<AppState>) -> StatusCode {
    state.translation.clear_cache().await;
    StatusCode::NO_CONTENT
}

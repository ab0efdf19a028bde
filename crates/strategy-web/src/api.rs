//! API Client
//!
//! Mirrors of the server's JSON shapes. Only the fields the UI reads are
//! declared; the rest of each payload is ignored on deserialization.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepView {
    pub index: usize,
    pub kind: String,
    pub label: String,
    pub skippable: bool,
    pub skipped: bool,
}

/// Percentages travel as decimal strings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskManagement {
    pub stop_loss: String,
    pub take_profit: String,
    pub position_size: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InstantSwap {
    pub enabled: bool,
    pub stablecoin: String,
    pub min_profit_threshold: String,
    pub auto_compound: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoreParameters {
    pub asset: String,
    pub strategy_type: String,
    pub breakout_condition: String,
    pub percentage_increase: String,
    pub timeframe: String,
    pub volume_condition: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrategyParameters {
    pub asset: String,
    pub strategy_type: String,
    pub breakout_condition: String,
    pub percentage_increase: String,
    pub timeframe: String,
    pub volume_condition: String,
    pub risk_management: RiskManagement,
    pub instant_swap: InstantSwap,
}

impl StrategyParameters {
    pub fn core(&self) -> CoreParameters {
        CoreParameters {
            asset: self.asset.clone(),
            strategy_type: self.strategy_type.clone(),
            breakout_condition: self.breakout_condition.clone(),
            percentage_increase: self.percentage_increase.clone(),
            timeframe: self.timeframe.clone(),
            volume_condition: self.volume_condition.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub symbol: String,
    pub name: String,
    pub address: String,
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub market_cap: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub volume_24h: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PresetSummary {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct FoundationalSummary {
    pub id: String,
    pub name: String,
    pub category: String,
    pub crypto_adaptation: String,
    pub complexity: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SentimentSummary {
    pub overall_sentiment: String,
    pub sentiment_score: f64,
    pub confidence: f64,
    #[serde(default)]
    pub trending_keywords: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ResearchSummary {
    pub source: String,
    pub summary: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AuxiliaryInputs {
    pub token: Option<TokenInfo>,
    pub foundational: Option<FoundationalSummary>,
    pub sentiment: Option<SentimentSummary>,
    pub research: Option<ResearchSummary>,
    #[serde(default)]
    pub custom_modifications: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GeneratedStrategy {
    pub id: String,
    pub content: String,
    pub model_target: String,
    pub generated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ErrorInfo {
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct WizardView {
    pub steps: Vec<StepView>,
    pub active_step: usize,
    pub parameters: StrategyParameters,
    pub auxiliary: AuxiliaryInputs,
    pub selected_preset: Option<String>,
    pub model_target: String,
    pub prompt: String,
    pub generation_result: Option<GeneratedStrategy>,
    pub last_error: Option<ErrorInfo>,
    pub busy: bool,
    pub can_go_back: bool,
    pub can_go_next: bool,
    pub can_proceed: bool,
}

impl WizardView {
    pub fn current(&self) -> Option<&StepView> {
        self.steps.get(self.active_step)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct CreatedWizard {
    pub id: String,
    pub wizard: WizardView,
}

/// Data submitted for one step
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "step", content = "value", rename_all = "snake_case")]
pub enum StepPayload {
    TokenSelection(TokenInfo),
    CoreParameters(CoreParameters),
    RiskSettings(RiskManagement),
    SwapSettings(InstantSwap),
    FreeText(String),
}

#[derive(Clone, Debug, Deserialize)]
pub struct Translation {
    pub text: String,
}

#[derive(Deserialize)]
struct TranslateResponse {
    translations: Vec<Translation>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    wizard: Option<WizardView>,
}

/// A failed call, with the wizard snapshot the server sent back (if any)
#[derive(Clone, Debug)]
pub struct ApiFailure {
    pub message: String,
    pub wizard: Option<WizardView>,
}

impl ApiFailure {
    fn transport(err: impl std::fmt::Display) -> Self {
        Self {
            message: err.to_string(),
            wizard: None,
        }
    }
}

/// `<select>` values are strings; booleans are encoded as "true"/"false"
pub fn flag_value(flag: bool) -> &'static str {
    if flag { "true" } else { "false" }
}

pub fn parse_flag(value: &str) -> bool {
    value == "true"
}

fn url(path: &str) -> String {
    let origin = web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_else(|| "http://localhost:3000".into());
    format!("{}{}", origin, path)
}

async fn send<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T, ApiFailure> {
    let response = request.send().await.map_err(ApiFailure::transport)?;

    if response.status().is_success() {
        response.json::<T>().await.map_err(ApiFailure::transport)
    } else {
        let status = response.status();
        match response.json::<ErrorBody>().await {
            Ok(body) => Err(ApiFailure {
                message: body.error,
                wizard: body.wizard,
            }),
            Err(_) => Err(ApiFailure::transport(format!("Request failed ({})", status))),
        }
    }
}

async fn get<T: DeserializeOwned>(path: &str) -> Result<T, ApiFailure> {
    send(reqwest::Client::new().get(url(path))).await
}

async fn post<T: DeserializeOwned>(path: &str) -> Result<T, ApiFailure> {
    send(reqwest::Client::new().post(url(path))).await
}

// ----- catalogs -----

pub async fn tokens() -> Result<Vec<TokenInfo>, ApiFailure> {
    get("/api/catalog/tokens").await
}

pub async fn presets() -> Result<Vec<PresetSummary>, ApiFailure> {
    get("/api/catalog/presets").await
}

pub async fn foundational() -> Result<Vec<FoundationalSummary>, ApiFailure> {
    get("/api/catalog/foundational").await
}

// ----- wizard -----

pub async fn create_wizard() -> Result<CreatedWizard, ApiFailure> {
    post("/api/wizards").await
}

/// `next`, `back`, `reset`, `sentiment` or `generate`
pub async fn action(id: &str, action: &str) -> Result<WizardView, ApiFailure> {
    post(&format!("/api/wizards/{}/{}", id, action)).await
}

pub async fn skip(id: &str, step: usize) -> Result<WizardView, ApiFailure> {
    post(&format!("/api/wizards/{}/skip/{}", id, step)).await
}

pub async fn unskip(id: &str, step: usize) -> Result<WizardView, ApiFailure> {
    post(&format!("/api/wizards/{}/unskip/{}", id, step)).await
}

pub async fn apply(id: &str, payload: &StepPayload) -> Result<WizardView, ApiFailure> {
    send(
        reqwest::Client::new()
            .put(url(&format!("/api/wizards/{}/payload", id)))
            .json(payload),
    )
    .await
}

pub async fn select_preset(id: &str, preset: &str) -> Result<WizardView, ApiFailure> {
    post(&format!("/api/wizards/{}/presets/{}", id, preset)).await
}

pub async fn select_foundational(id: &str, strategy: &str) -> Result<WizardView, ApiFailure> {
    post(&format!("/api/wizards/{}/foundational/{}", id, strategy)).await
}

pub async fn set_model(id: &str, target: &str) -> Result<WizardView, ApiFailure> {
    send(
        reqwest::Client::new()
            .put(url(&format!("/api/wizards/{}/model", id)))
            .json(&serde_json::json!({ "target": target })),
    )
    .await
}

pub async fn load_research(id: &str, title: &str, text: &str) -> Result<WizardView, ApiFailure> {
    send(
        reqwest::Client::new()
            .post(url(&format!("/api/wizards/{}/research", id)))
            .json(&serde_json::json!({ "title": title, "text": text })),
    )
    .await
}

pub async fn proceed(id: &str) -> Result<GeneratedStrategy, ApiFailure> {
    post(&format!("/api/wizards/{}/proceed", id)).await
}

// ----- translation -----

pub async fn translate(texts: Vec<String>, target: &str) -> Result<Vec<Translation>, ApiFailure> {
    let response: TranslateResponse = send(
        reqwest::Client::new()
            .post(url("/api/translate"))
            .json(&serde_json::json!({ "texts": texts, "target": target })),
    )
    .await?;
    Ok(response.translations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_encoding() {
        assert_eq!(flag_value(true), "true");
        assert!(parse_flag(flag_value(true)));
        assert!(!parse_flag(flag_value(false)));
        assert!(!parse_flag("yes"));
    }

    #[test]
    fn test_payload_matches_server_tagging() {
        let payload = StepPayload::RiskSettings(RiskManagement {
            stop_loss: "2".into(),
            take_profit: "6".into(),
            position_size: "100".into(),
        });
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["step"], "risk_settings");
        assert_eq!(json["value"]["take_profit"], "6");

        let json = serde_json::to_value(StepPayload::FreeText("tighter stops".into())).unwrap();
        assert_eq!(json["step"], "free_text");
    }

    #[test]
    fn test_error_body_carries_wizard() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"error": "No wizard session 'x'", "code": "SESSION_NOT_FOUND"}"#)
                .unwrap();
        assert!(body.wizard.is_none());
        assert!(body.error.contains("No wizard"));
    }
}

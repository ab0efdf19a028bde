//! Translation backends

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{TranslationError, TranslationProvider};

pub const DEFAULT_LIBRETRANSLATE_URL: &str = "https://libretranslate.de";

async fn read_json<T: for<'de> Deserialize<'de>>(
    provider: &'static str,
    response: reqwest::Response,
) -> Result<T, TranslationError> {
    let status = response.status();
    if !status.is_success() {
        return Err(TranslationError::Status {
            provider,
            status: status.as_u16(),
        });
    }
    response
        .json::<T>()
        .await
        .map_err(|e| TranslationError::InvalidResponse {
            provider,
            message: e.to_string(),
        })
}

/// Google Cloud Translation v2 (needs an API key)
pub struct GoogleTranslateProvider {
    client: reqwest::Client,
    api_key: String,
}

impl GoogleTranslateProvider {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
        }
    }
}

#[derive(Deserialize)]
struct GoogleResponse {
    data: GoogleData,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleData {
    translations: Vec<GoogleTranslation>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleTranslation {
    translated_text: String,
}

#[async_trait]
impl TranslationProvider for GoogleTranslateProvider {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn translate(
        &self,
        text: &str,
        target: &str,
        source: &str,
    ) -> Result<String, TranslationError> {
        let response = self
            .client
            .post("https://translation.googleapis.com/language/translate/v2")
            .query(&[("key", self.api_key.as_str())])
            .json(&json!({ "q": text, "source": source, "target": target, "format": "text" }))
            .send()
            .await?;

        let body: GoogleResponse = read_json(self.name(), response).await?;
        body.data
            .translations
            .into_iter()
            .next()
            .map(|t| t.translated_text)
            .ok_or_else(|| TranslationError::InvalidResponse {
                provider: self.name(),
                message: "no translations returned".into(),
            })
    }
}

/// LibreTranslate, public or self-hosted
pub struct LibreTranslateProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl LibreTranslateProvider {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LibreResponse {
    translated_text: String,
}

#[async_trait]
impl TranslationProvider for LibreTranslateProvider {
    fn name(&self) -> &'static str {
        "libretranslate"
    }

    async fn translate(
        &self,
        text: &str,
        target: &str,
        source: &str,
    ) -> Result<String, TranslationError> {
        let mut body = json!({ "q": text, "source": source, "target": target, "format": "text" });
        if let Some(key) = &self.api_key {
            body["api_key"] = json!(key);
        }

        let response = self
            .client
            .post(format!("{}/translate", self.base_url))
            .json(&body)
            .send()
            .await?;

        let body: LibreResponse = read_json(self.name(), response).await?;
        Ok(body.translated_text)
    }
}

/// MyMemory, free and keyless
pub struct MyMemoryProvider {
    client: reqwest::Client,
}

impl MyMemoryProvider {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyMemoryResponse {
    response_data: MyMemoryData,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyMemoryData {
    translated_text: String,
}

#[async_trait]
impl TranslationProvider for MyMemoryProvider {
    fn name(&self) -> &'static str {
        "mymemory"
    }

    async fn translate(
        &self,
        text: &str,
        target: &str,
        source: &str,
    ) -> Result<String, TranslationError> {
        let langpair = format!("{}|{}", source, target);
        let response = self
            .client
            .get("https://api.mymemory.translated.net/get")
            .query(&[("q", text), ("langpair", langpair.as_str())])
            .send()
            .await?;

        let body: MyMemoryResponse = read_json(self.name(), response).await?;
        Ok(body.response_data.translated_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_shapes() {
        let google: GoogleResponse =
            serde_json::from_str(r#"{"data":{"translations":[{"translatedText":"hola"}]}}"#)
                .unwrap();
        assert_eq!(google.data.translations[0].translated_text, "hola");

        let libre: LibreResponse = serde_json::from_str(r#"{"translatedText":"bonjour"}"#).unwrap();
        assert_eq!(libre.translated_text, "bonjour");

        let memory: MyMemoryResponse = serde_json::from_str(
            r#"{"responseData":{"translatedText":"hallo","match":1},"responseStatus":200}"#,
        )
        .unwrap();
        assert_eq!(memory.response_data.translated_text, "hallo");
    }

    #[test]
    fn test_libretranslate_url_is_normalized() {
        let provider = LibreTranslateProvider::new(reqwest::Client::new(), "http://localhost:5000/", None);
        assert_eq!(provider.base_url, "http://localhost:5000");
    }
}

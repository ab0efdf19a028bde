//! Translation
//!
//! Tries each provider in order and caches the first success. When every
//! provider fails the original text is returned unchanged.

mod cache;
mod providers;

pub use cache::TranslationCache;
pub use providers::{
    GoogleTranslateProvider, LibreTranslateProvider, MyMemoryProvider, DEFAULT_LIBRETRANSLATE_URL,
};

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_SOURCE_LANG: &str = "en";

#[derive(Error, Debug)]
pub enum TranslationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} returned HTTP {status}")]
    Status { provider: &'static str, status: u16 },

    #[error("{provider} returned an unexpected body: {message}")]
    InvalidResponse {
        provider: &'static str,
        message: String,
    },
}

/// A single translation backend
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn translate(
        &self,
        text: &str,
        target: &str,
        source: &str,
    ) -> Result<String, TranslationError>;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Translation {
    pub text: String,
    /// Provider that produced the text; `None` when the original was returned
    pub provider: Option<String>,
    pub cached: bool,
}

impl Translation {
    fn untranslated(text: &str) -> Self {
        Self {
            text: text.to_string(),
            provider: None,
            cached: false,
        }
    }
}

pub struct TranslationService {
    providers: Vec<Box<dyn TranslationProvider>>,
    cache: Arc<TranslationCache>,
}

impl TranslationService {
    pub fn new(providers: Vec<Box<dyn TranslationProvider>>, cache: Arc<TranslationCache>) -> Self {
        Self { providers, cache }
    }

    /// LibreTranslate then MyMemory, with Google first when a key is given
    pub fn with_public_providers(
        cache: Arc<TranslationCache>,
        libretranslate_url: &str,
        google_api_key: Option<String>,
    ) -> Self {
        let client = reqwest::Client::new();
        let mut providers: Vec<Box<dyn TranslationProvider>> = Vec::new();
        if let Some(key) = google_api_key {
            providers.push(Box::new(GoogleTranslateProvider::new(client.clone(), key)));
        }
        providers.push(Box::new(LibreTranslateProvider::new(
            client.clone(),
            libretranslate_url,
            None,
        )));
        providers.push(Box::new(MyMemoryProvider::new(client)));
        Self::new(providers, cache)
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub async fn translate(&self, text: &str, target: &str, source: Option<&str>) -> Translation {
        let source = source.unwrap_or(DEFAULT_SOURCE_LANG);
        if text.trim().is_empty() || source.eq_ignore_ascii_case(target) {
            return Translation::untranslated(text);
        }

        if let Some(hit) = self.cache.get(text, target, source).await {
            debug!(lang = target, "Translation cache hit");
            return Translation {
                text: hit,
                provider: None,
                cached: true,
            };
        }

        for provider in &self.providers {
            match provider.translate(text, target, source).await {
                Ok(translated) => {
                    self.cache.insert(text, target, source, translated.clone()).await;
                    return Translation {
                        text: translated,
                        provider: Some(provider.name().to_string()),
                        cached: false,
                    };
                }
                Err(e) => warn!(provider = provider.name(), error = %e, "Provider failed, trying next"),
            }
        }

        warn!(lang = target, "All translation providers failed");
        Translation::untranslated(text)
    }

    /// Translate concurrently, keeping input order
    pub async fn translate_batch(
        &self,
        texts: &[String],
        target: &str,
        source: Option<&str>,
    ) -> Vec<Translation> {
        join_all(texts.iter().map(|t| self.translate(t, target, source))).await
    }

    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubProvider {
        name: &'static str,
        fail: bool,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl TranslationProvider for StubProvider {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn translate(
            &self,
            text: &str,
            target: &str,
            _source: &str,
        ) -> Result<String, TranslationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(TranslationError::Status {
                    provider: self.name,
                    status: 503,
                })
            } else {
                Ok(format!("[{}] {}", target, text))
            }
        }
    }

    fn stub(name: &'static str, fail: bool) -> (Box<dyn TranslationProvider>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Box::new(StubProvider {
                name,
                fail,
                calls: calls.clone(),
            }),
            calls,
        )
    }

    #[tokio::test]
    async fn test_falls_back_and_caches() {
        let (first, first_calls) = stub("first", true);
        let (second, second_calls) = stub("second", false);
        let service = TranslationService::new(vec![first, second], Arc::new(TranslationCache::default()));

        let result = service.translate("Stop Loss", "es", None).await;
        assert_eq!(result.text, "[es] Stop Loss");
        assert_eq!(result.provider.as_deref(), Some("second"));

        let again = service.translate("Stop Loss", "es", None).await;
        assert!(again.cached);
        assert_eq!(again.text, "[es] Stop Loss");
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);

        service.clear_cache().await;
        service.translate("Stop Loss", "es", None).await;
        assert_eq!(second_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_all_failing_returns_original() {
        let (a, _) = stub("a", true);
        let (b, _) = stub("b", true);
        let service = TranslationService::new(vec![a, b], Arc::new(TranslationCache::default()));

        let result = service.translate("Take Profit", "fr", Some("en")).await;
        assert_eq!(result, Translation::untranslated("Take Profit"));
    }

    #[tokio::test]
    async fn test_same_language_skips_providers() {
        let (a, calls) = stub("a", false);
        let service = TranslationService::new(vec![a], Arc::new(TranslationCache::default()));
        assert_eq!(service.translate("Hello", "en", None).await.text, "Hello");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_batch_keeps_order() {
        let (a, _) = stub("a", false);
        let service = TranslationService::new(vec![a], Arc::new(TranslationCache::default()));
        let texts = vec!["one".to_string(), "two".to_string(), "three".to_string()];

        let results = service.translate_batch(&texts, "de", None).await;
        let texts: Vec<_> = results.into_iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["[de] one", "[de] two", "[de] three"]);
    }

    #[test]
    fn test_public_provider_order() {
        let cache = Arc::new(TranslationCache::default());
        let service =
            TranslationService::with_public_providers(cache.clone(), DEFAULT_LIBRETRANSLATE_URL, None);
        assert_eq!(service.provider_names(), vec!["libretranslate", "mymemory"]);

        let service = TranslationService::with_public_providers(
            cache,
            DEFAULT_LIBRETRANSLATE_URL,
            Some("key".into()),
        );
        assert_eq!(service.provider_names()[0], "google");
    }
}

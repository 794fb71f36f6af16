//! Language data loader — resolves a language code to a content document
//! through a bounded fallback chain, caching successes in memory.
//!
//! Resolution order for one request:
//! 1. cache
//! 2. primary base URL
//! 3. alternate base URL (same path shape)
//! 4. the default language, same procedure
//! 5. the built-in document
//!
//! The visited-codes guard makes step 4 run at most once: a code is never
//! attempted twice, so a failing default language goes straight to step 5.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, info, warn};

use crate::content::fallback::builtin_document;
use crate::content::fetcher::ContentFetcher;
use crate::events::{AppEvent, EventBus};
use crate::models::content::ContentDocument;

pub struct ContentLoader {
    fetcher: Arc<dyn ContentFetcher>,
    bus: EventBus,
    base_url: String,
    alt_base_url: Option<String>,
    default_lang: String,
    /// Fetched documents by the code they resolved under. No TTL, no
    /// invalidation besides [`ContentLoader::clear_cache`]. Concurrent
    /// fetches for one key are tolerated; the last write wins.
    cache: RwLock<HashMap<String, Arc<ContentDocument>>>,
}

impl ContentLoader {
    pub fn new(
        fetcher: Arc<dyn ContentFetcher>,
        bus: EventBus,
        base_url: String,
        alt_base_url: Option<String>,
        default_lang: String,
    ) -> Self {
        Self {
            fetcher,
            bus,
            base_url,
            alt_base_url,
            default_lang,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Resolves `lang` to a content document. Infallible in the sense of the
    /// fallback chain: every failure path ends at the built-in document.
    ///
    /// A cache hit returns immediately with no events; otherwise a
    /// `LoadingStarted` is published before the first fetch and exactly one
    /// `ContentLoaded` (carrying the resolved code) once anything succeeds.
    pub async fn load(&self, lang: &str) -> Arc<ContentDocument> {
        if let Some(document) = self.cached(lang) {
            debug!(lang, "content served from cache");
            return document;
        }

        self.bus.publish(AppEvent::LoadingStarted {
            lang: lang.to_string(),
        });

        let mut attempted: Vec<String> = Vec::new();
        let mut current = lang.to_string();

        loop {
            if attempted.iter().any(|code| code == &current) {
                break; // guard: never attempt one code twice
            }

            // A fallback language may already be cached from an earlier load.
            // The caller observed LoadingStarted, so this still announces.
            if let Some(document) = self.cached(&current) {
                self.bus.publish(AppEvent::ContentLoaded {
                    lang: current.clone(),
                    document: document.clone(),
                });
                return document;
            }
            attempted.push(current.clone());

            if let Some(document) = self.fetch_any_base(&current).await {
                let document = Arc::new(document);
                self.cache
                    .write()
                    .expect("content cache lock poisoned")
                    .insert(current.clone(), document.clone());
                info!(lang = %current, "content loaded");
                self.bus.publish(AppEvent::ContentLoaded {
                    lang: current.clone(),
                    document: document.clone(),
                });
                return document;
            }

            if current == self.default_lang {
                break;
            }
            warn!(lang = %current, fallback = %self.default_lang, "language failed, falling back");
            current = self.default_lang.clone();
        }

        // Terminal step. Not cached: the next load should retry the network.
        warn!(lang = %self.default_lang, "all sources failed, serving built-in document");
        let document = Arc::new(builtin_document());
        self.bus.publish(AppEvent::ContentLoaded {
            lang: self.default_lang.clone(),
            document: document.clone(),
        });
        document
    }

    /// Steps 2 and 3 of the chain: the primary base, then the alternate.
    /// With no alternate configured this retries the primary once.
    async fn fetch_any_base(&self, lang: &str) -> Option<ContentDocument> {
        for url in self.candidate_urls(lang) {
            match self.fetcher.fetch_document(&url).await {
                Ok(document) => return Some(document),
                Err(err) => warn!(%url, "content fetch failed: {err}"),
            }
        }
        None
    }

    fn candidate_urls(&self, lang: &str) -> [String; 2] {
        let alt_base = self.alt_base_url.as_deref().unwrap_or(&self.base_url);
        [
            format!("{}/data/lang/{lang}.json", self.base_url.trim_end_matches('/')),
            format!("{}/data/lang/{lang}.json", alt_base.trim_end_matches('/')),
        ]
    }

    fn cached(&self, lang: &str) -> Option<Arc<ContentDocument>> {
        self.cache
            .read()
            .expect("content cache lock poisoned")
            .get(lang)
            .cloned()
    }

    pub fn clear_cache(&self) {
        self.cache
            .write()
            .expect("content cache lock poisoned")
            .clear();
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::content::fetcher::FetchError;
    use crate::events::EventKind;
    use crate::models::content::{About, Contact};

    const BASE: &str = "https://cv.example.com";
    const ALT: &str = "https://mirror.example.com";

    fn make_document(name: &str) -> ContentDocument {
        ContentDocument {
            about: About {
                name: name.to_string(),
                title: "Engineer".to_string(),
                location: String::new(),
                description: "d".to_string(),
                email: String::new(),
            },
            experience: Vec::new(),
            projects: Vec::new(),
            skills: Vec::new(),
            tools: Vec::new(),
            contact: Contact::default(),
        }
    }

    /// Serves the configured URLs, 404s everything else, records every call.
    struct StubFetcher {
        responses: HashMap<String, ContentDocument>,
        calls: Mutex<Vec<String>>,
    }

    impl StubFetcher {
        fn new(responses: &[(String, ContentDocument)]) -> Arc<Self> {
            Arc::new(Self {
                responses: responses.iter().cloned().collect(),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ContentFetcher for StubFetcher {
        async fn fetch_document(&self, url: &str) -> Result<ContentDocument, FetchError> {
            self.calls.lock().unwrap().push(url.to_string());
            match self.responses.get(url) {
                Some(document) => Ok(document.clone()),
                None => Err(FetchError::Status {
                    status: 404,
                    url: url.to_string(),
                }),
            }
        }
    }

    fn make_loader(fetcher: Arc<StubFetcher>, bus: EventBus) -> ContentLoader {
        ContentLoader::new(
            fetcher,
            bus,
            BASE.to_string(),
            Some(ALT.to_string()),
            "es".to_string(),
        )
    }

    /// Records every published event as "kind:lang".
    fn record_events(bus: &EventBus) -> Arc<Mutex<Vec<String>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        for kind in [EventKind::LoadingStarted, EventKind::ContentLoaded] {
            let log = log.clone();
            bus.subscribe(kind, move |event| {
                let entry = match event {
                    AppEvent::LoadingStarted { lang } => format!("loading:{lang}"),
                    AppEvent::ContentLoaded { lang, .. } => format!("loaded:{lang}"),
                    other => format!("unexpected:{:?}", other.kind()),
                };
                log.lock().unwrap().push(entry);
                Ok(())
            });
        }
        log
    }

    fn primary_url(lang: &str) -> String {
        format!("{BASE}/data/lang/{lang}.json")
    }

    fn alt_url(lang: &str) -> String {
        format!("{ALT}/data/lang/{lang}.json")
    }

    #[tokio::test]
    async fn test_second_load_is_served_from_cache() {
        let fetcher = StubFetcher::new(&[(primary_url("es"), make_document("es doc"))]);
        let loader = make_loader(fetcher.clone(), EventBus::new());

        let first = loader.load("es").await;
        let second = loader.load("es").await;

        assert_eq!(first.about.name, "es doc");
        assert_eq!(second.about.name, "es doc");
        assert_eq!(fetcher.calls().len(), 1, "second load must not fetch");
    }

    #[tokio::test]
    async fn test_cache_hit_publishes_no_events() {
        let fetcher = StubFetcher::new(&[(primary_url("es"), make_document("es doc"))]);
        let bus = EventBus::new();
        let loader = make_loader(fetcher, bus.clone());
        let events = record_events(&bus);

        loader.load("es").await;
        assert_eq!(*events.lock().unwrap(), vec!["loading:es", "loaded:es"]);

        loader.load("es").await;
        assert_eq!(
            *events.lock().unwrap(),
            vec!["loading:es", "loaded:es"],
            "cache hit must stay silent"
        );
    }

    #[tokio::test]
    async fn test_alternate_base_is_tried_after_primary_failure() {
        let fetcher = StubFetcher::new(&[(alt_url("es"), make_document("mirrored"))]);
        let loader = make_loader(fetcher.clone(), EventBus::new());

        let document = loader.load("es").await;

        assert_eq!(document.about.name, "mirrored");
        assert_eq!(fetcher.calls(), vec![primary_url("es"), alt_url("es")]);
    }

    #[tokio::test]
    async fn test_missing_language_falls_back_to_default() {
        let fetcher = StubFetcher::new(&[(primary_url("es"), make_document("es doc"))]);
        let bus = EventBus::new();
        let loader = make_loader(fetcher.clone(), bus.clone());
        let events = record_events(&bus);

        let document = loader.load("fr").await;

        assert_eq!(document.about.name, "es doc");
        assert_eq!(
            fetcher.calls(),
            vec![primary_url("fr"), alt_url("fr"), primary_url("es")]
        );
        // The loaded announcement carries the resolved code, not "fr".
        assert_eq!(*events.lock().unwrap(), vec!["loading:fr", "loaded:es"]);
    }

    #[tokio::test]
    async fn test_fallback_resolves_from_cached_default() {
        let fetcher = StubFetcher::new(&[(primary_url("es"), make_document("es doc"))]);
        let loader = make_loader(fetcher.clone(), EventBus::new());

        loader.load("es").await;
        let document = loader.load("fr").await;

        assert_eq!(document.about.name, "es doc");
        // es was fetched once, for the direct load; the fallback used the cache.
        assert_eq!(
            fetcher.calls(),
            vec![primary_url("es"), primary_url("fr"), alt_url("fr")]
        );
    }

    #[tokio::test]
    async fn test_failing_default_serves_builtin_without_recursion() {
        let fetcher = StubFetcher::new(&[]);
        let bus = EventBus::new();
        let loader = make_loader(fetcher.clone(), bus.clone());
        let events = record_events(&bus);

        let document = loader.load("es").await;

        assert_eq!(document.about.name, "Jose Carlos Castillo (PepeCharly)");
        assert_eq!(
            fetcher.calls().len(),
            2,
            "default language must be attempted exactly once per base"
        );
        assert_eq!(*events.lock().unwrap(), vec!["loading:es", "loaded:es"]);
    }

    #[tokio::test]
    async fn test_builtin_is_not_cached() {
        let fetcher = StubFetcher::new(&[]);
        let loader = make_loader(fetcher.clone(), EventBus::new());

        loader.load("es").await;
        loader.load("es").await;

        // Both loads went to the network; the built-in never entered the cache.
        assert_eq!(fetcher.calls().len(), 4);
    }

    #[tokio::test]
    async fn test_clear_cache_forces_refetch() {
        let fetcher = StubFetcher::new(&[(primary_url("es"), make_document("es doc"))]);
        let loader = make_loader(fetcher.clone(), EventBus::new());

        loader.load("es").await;
        loader.clear_cache();
        loader.load("es").await;

        assert_eq!(fetcher.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_language_with_no_sources_serves_builtin() {
        let fetcher = StubFetcher::new(&[]);
        let loader = make_loader(fetcher.clone(), EventBus::new());

        let document = loader.load("fr").await;

        assert_eq!(document.about.name, "Jose Carlos Castillo (PepeCharly)");
        // fr on both bases, then es on both bases, then the built-in.
        assert_eq!(fetcher.calls().len(), 4);
    }
}

mod config;
mod content;
mod errors;
mod events;
mod export;
mod models;
mod state;
mod storage;
mod theme;

use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::content::{ContentLoader, HttpFetcher};
use crate::events::{AppEvent, EventBus, EventKind};
use crate::export::docx::DocxExporter;
use crate::export::pdf::PdfExporter;
use crate::export::DocumentExporter;
use crate::state::AppState;
use crate::storage::{PreferenceStore, LANGUAGE_KEY};
use crate::theme::{LoggingApplier, ThemeCoordinator};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting folio v{}", env!("CARGO_PKG_VERSION"));

    let bus = EventBus::new();
    let prefs = Arc::new(PreferenceStore::new(&config.storage_dir));
    let loader = Arc::new(ContentLoader::new(
        Arc::new(HttpFetcher::new()),
        bus.clone(),
        config.content_base_url.clone(),
        config.content_alt_base_url.clone(),
        config.default_lang.clone(),
    ));
    let themes = Arc::new(ThemeCoordinator::new(
        bus.clone(),
        prefs.clone(),
        Arc::new(LoggingApplier),
        &config.default_theme,
    ));
    let exporters: Vec<Arc<dyn DocumentExporter>> = vec![
        Arc::new(PdfExporter),
        Arc::new(DocxExporter),
    ];
    let state = AppState {
        config,
        bus,
        prefs,
        loader,
        themes,
        exporters,
    };

    // Log-only observers standing in for the rendering layer.
    state.bus.subscribe(EventKind::LoadingStarted, |event| {
        if let AppEvent::LoadingStarted { lang } = event {
            info!(%lang, "loading content");
        }
        Ok(())
    });
    state.bus.subscribe(EventKind::ContentLoaded, |event| {
        if let AppEvent::ContentLoaded { lang, document } = event {
            info!(
                %lang,
                sections = document.section_count(),
                "content ready for {}",
                document.about.name
            );
        }
        Ok(())
    });

    state.themes.restore_saved_theme();
    info!(
        active = state.themes.active_theme(),
        known = state.themes.available_themes().len(),
        "theme restored"
    );

    let lang = preferred_language(&state);
    let document = state.loader.load(&lang).await;
    remember_language(&state, &lang);

    std::fs::create_dir_all(&state.config.output_dir)?;
    for exporter in &state.exporters {
        let format = exporter.format();
        let exporter = exporter.clone();
        let document = document.clone();
        let export_lang = lang.clone();
        let template = state.config.export_template.clone();

        // Exporters are CPU-bound; keep them off the async runtime.
        let result =
            tokio::task::spawn_blocking(move || exporter.export(&document, &export_lang, &template))
                .await?;
        match result {
            Ok(artifact) => {
                let path = state.config.output_dir.join(&artifact.file_name);
                std::fs::write(&path, &artifact.bytes)?;
                info!(
                    path = %path.display(),
                    size = artifact.bytes.len(),
                    "export written"
                );
            }
            // One-shot user action: report, never retry, keep going with the
            // remaining exporters.
            Err(err) => error!(format = format.extension(), "export failed: {err}"),
        }
    }

    Ok(())
}

/// The persisted language preference, or the configured default when the
/// preference is absent or unreadable.
fn preferred_language(state: &AppState) -> String {
    match state.prefs.get(LANGUAGE_KEY) {
        Ok(Some(lang)) => lang,
        Ok(None) => state.config.default_lang.clone(),
        Err(err) => {
            warn!("could not read language preference: {err}");
            state.config.default_lang.clone()
        }
    }
}

/// Persists the resolved language and announces the change when it differs
/// from the stored preference. Storage failures degrade to session state.
fn remember_language(state: &AppState, lang: &str) {
    let previous = state.prefs.get(LANGUAGE_KEY).unwrap_or_default();
    if previous.as_deref() == Some(lang) {
        return;
    }
    state.bus.publish(AppEvent::LanguageChanged {
        lang: lang.to_string(),
    });
    if let Err(err) = state.prefs.set(LANGUAGE_KEY, lang) {
        warn!("could not persist language preference: {err}");
    }
}

use std::sync::Arc;

use crate::config::Config;
use crate::content::ContentLoader;
use crate::events::EventBus;
use crate::export::DocumentExporter;
use crate::storage::PreferenceStore;
use crate::theme::ThemeCoordinator;

/// Shared application state, wired once at startup and passed by reference.
/// Single-instance-per-process without ambient globals: every collaborator
/// receives exactly the pieces it depends on at construction time.
pub struct AppState {
    pub config: Config,
    pub bus: EventBus,
    pub prefs: Arc<PreferenceStore>,
    pub loader: Arc<ContentLoader>,
    pub themes: Arc<ThemeCoordinator>,
    pub exporters: Vec<Arc<dyn DocumentExporter>>,
}

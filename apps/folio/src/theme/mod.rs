//! Active visual theme coordination: a fixed registry of known themes, the
//! persisted selection, and change announcements on the event bus.
#![allow(dead_code)]

use std::sync::{Arc, RwLock};

use tracing::{info, warn};

use crate::events::{AppEvent, EventBus};
use crate::storage::{PreferenceStore, THEME_KEY};

/// One selectable theme. `preview` is a relative asset path for pickers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub preview: &'static str,
}

/// The fixed theme set. The active theme is always drawn from this table;
/// `set_theme` rejects anything else without changing state.
const THEMES: &[ThemeSpec] = &[
    ThemeSpec {
        id: "classic",
        name: "Classic",
        preview: "themes/classic/preview.png",
    },
    ThemeSpec {
        id: "dark",
        name: "Dark Mode",
        preview: "themes/dark/preview.png",
    },
    ThemeSpec {
        id: "linkedin",
        name: "LinkedIn",
        preview: "themes/linkedin/preview.png",
    },
    ThemeSpec {
        id: "neumorphism",
        name: "Neumorphism",
        preview: "themes/neumorphism/preview.png",
    },
    ThemeSpec {
        id: "darkpunk",
        name: "Dark Punk",
        preview: "themes/darkpunk/preview.png",
    },
    ThemeSpec {
        id: "neon",
        name: "Neon",
        preview: "themes/neon/preview.png",
    },
];

fn find_theme(id: &str) -> Option<&'static ThemeSpec> {
    THEMES.iter().find(|theme| theme.id == id)
}

/// Stylesheet association collaborator: given a validated theme, makes its
/// presentation assets active. The coordinator only hands over the id and
/// the relative stylesheet path.
pub trait ThemeApplier: Send + Sync {
    fn apply(&self, theme: &ThemeSpec, stylesheet: &str);
}

/// Applier used by the binary: announces the association in the log.
pub struct LoggingApplier;

impl ThemeApplier for LoggingApplier {
    fn apply(&self, theme: &ThemeSpec, stylesheet: &str) {
        info!(theme = theme.id, stylesheet, "theme stylesheet selected");
    }
}

pub struct ThemeCoordinator {
    bus: EventBus,
    store: Arc<PreferenceStore>,
    applier: Arc<dyn ThemeApplier>,
    default_theme: &'static str,
    active: RwLock<&'static str>,
}

impl ThemeCoordinator {
    /// A `default_theme` outside the registry falls back to the first entry.
    pub fn new(
        bus: EventBus,
        store: Arc<PreferenceStore>,
        applier: Arc<dyn ThemeApplier>,
        default_theme: &str,
    ) -> Self {
        let default_theme = match find_theme(default_theme) {
            Some(theme) => theme.id,
            None => {
                warn!(theme = default_theme, "configured default theme unknown");
                THEMES[0].id
            }
        };
        Self {
            bus,
            store,
            applier,
            default_theme,
            active: RwLock::new(default_theme),
        }
    }

    /// Activates `id`: updates in-memory state, persists the selection,
    /// hands the stylesheet association to the applier, and publishes
    /// `ThemeChanged`. Unknown ids are rejected with a logged warning and
    /// nothing changes. Persistence failures degrade to session-only state.
    pub fn set_theme(&self, id: &str) -> bool {
        let Some(theme) = find_theme(id) else {
            warn!(theme = id, "unknown theme rejected");
            return false;
        };

        *self.active.write().expect("active theme lock poisoned") = theme.id;

        if let Err(err) = self.store.set(THEME_KEY, theme.id) {
            warn!("could not persist theme selection: {err}");
        }

        let stylesheet = format!("themes/{}/theme.css", theme.id);
        self.applier.apply(theme, &stylesheet);

        self.bus.publish(AppEvent::ThemeChanged {
            theme: theme.id.to_string(),
        });
        true
    }

    /// Owned copy of the registry; mutating it cannot touch coordinator state.
    pub fn available_themes(&self) -> Vec<ThemeSpec> {
        THEMES.to_vec()
    }

    pub fn active_theme(&self) -> &'static str {
        *self.active.read().expect("active theme lock poisoned")
    }

    /// Restores the persisted selection at startup. Absent, unknown, or
    /// unreadable values resolve to the configured default.
    pub fn restore_saved_theme(&self) {
        let saved = match self.store.get(THEME_KEY) {
            Ok(saved) => saved,
            Err(err) => {
                warn!("could not read saved theme: {err}");
                None
            }
        };
        let resolved = saved
            .as_deref()
            .and_then(find_theme)
            .map(|theme| theme.id)
            .unwrap_or(self.default_theme);
        self.set_theme(resolved);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

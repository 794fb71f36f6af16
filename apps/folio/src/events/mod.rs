//! Synchronous publish/subscribe hub decoupling producers and consumers of
//! state-change notifications.
//!
//! This is an in-process notification bus, not a message broker: delivery is
//! synchronous, in registration order, on the publishing context. There is no
//! queuing, no async delivery, and no backpressure. A failing subscriber is
//! logged and never blocks the rest.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tracing::warn;

use crate::models::content::ContentDocument;

/// Payload union for every notification crossing the bus. Each variant's
/// shape is fixed, so handlers are checked against the event they subscribe to.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// A load left the cache and is about to hit the network.
    LoadingStarted { lang: String },
    /// A document was resolved. `lang` is the code the document was actually
    /// resolved under, which may differ from the requested one after fallback.
    ContentLoaded {
        lang: String,
        document: Arc<ContentDocument>,
    },
    /// The active visual theme changed to a validated id.
    ThemeChanged { theme: String },
    /// The persisted language preference moved to a new code.
    LanguageChanged { lang: String },
}

/// Payload-free discriminant of [`AppEvent`], used as the subscription key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    LoadingStarted,
    ContentLoaded,
    ThemeChanged,
    LanguageChanged,
}

impl AppEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            AppEvent::LoadingStarted { .. } => EventKind::LoadingStarted,
            AppEvent::ContentLoaded { .. } => EventKind::ContentLoaded,
            AppEvent::ThemeChanged { .. } => EventKind::ThemeChanged,
            AppEvent::LanguageChanged { .. } => EventKind::LanguageChanged,
        }
    }
}

type Callback = Arc<dyn Fn(&AppEvent) -> anyhow::Result<()> + Send + Sync>;

struct Registration {
    id: u64,
    callback: Callback,
}

#[derive(Default)]
struct BusInner {
    registry: Mutex<HashMap<EventKind, Vec<Registration>>>,
    next_id: AtomicU64,
}

impl BusInner {
    fn registry(&self) -> MutexGuard<'_, HashMap<EventKind, Vec<Registration>>> {
        self.registry.lock().expect("event registry lock poisoned")
    }
}

/// Process-wide notification hub. Clones share one registry; construct once
/// at composition time and hand clones to collaborators.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` under `kind` and returns the capability that
    /// removes exactly this registration. The same closure may be registered
    /// more than once; each registration fires independently.
    pub fn subscribe<F>(&self, kind: EventKind, callback: F) -> Subscription
    where
        F: Fn(&AppEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .registry()
            .entry(kind)
            .or_default()
            .push(Registration {
                id,
                callback: Arc::new(callback),
            });
        Subscription {
            bus: Arc::downgrade(&self.inner),
            kind,
            id,
        }
    }

    /// Invokes every registration for the event's kind, in registration
    /// order, on the calling context. A callback returning `Err` is logged
    /// and the remaining callbacks still run. Registrations added while the
    /// callbacks execute are not delivered for this publish.
    pub fn publish(&self, event: AppEvent) {
        let snapshot: Vec<Callback> = self
            .inner
            .registry()
            .get(&event.kind())
            .map(|regs| regs.iter().map(|r| r.callback.clone()).collect())
            .unwrap_or_default();

        for callback in snapshot {
            if let Err(err) = callback(&event) {
                warn!(kind = ?event.kind(), "event subscriber failed: {err:#}");
            }
        }
    }

    /// Removes every registration for `kind`.
    pub fn unsubscribe_all(&self, kind: EventKind) {
        self.inner.registry().remove(&kind);
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.inner
            .registry()
            .get(&kind)
            .map(|regs| regs.len())
            .unwrap_or(0)
    }
}

/// Capability returned by [`EventBus::subscribe`]. `cancel` removes exactly
/// the registration that produced it; dropping the handle without cancelling
/// leaves the registration in place.
pub struct Subscription {
    bus: Weak<BusInner>,
    kind: EventKind,
    id: u64,
}

impl Subscription {
    pub fn cancel(self) {
        let Some(inner) = self.bus.upgrade() else {
            return; // bus already gone, nothing to remove
        };
        let mut registry = inner.registry();
        if let Some(regs) = registry.get_mut(&self.kind) {
            if let Some(pos) = regs.iter().position(|r| r.id == self.id) {
                regs.remove(pos);
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    fn theme_event(id: &str) -> AppEvent {
        AppEvent::ThemeChanged {
            theme: id.to_string(),
        }
    }

    fn recorder(log: &Arc<Mutex<Vec<String>>>, tag: &str) -> impl Fn(&AppEvent) -> anyhow::Result<()> {
        let log = log.clone();
        let tag = tag.to_string();
        move |_| {
            log.lock().unwrap().push(tag.clone());
            Ok(())
        }
    }

    #[test]
    fn test_publish_invokes_in_registration_order() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        bus.subscribe(EventKind::ThemeChanged, recorder(&log, "first"));
        bus.subscribe(EventKind::ThemeChanged, recorder(&log, "second"));
        bus.subscribe(EventKind::ThemeChanged, recorder(&log, "third"));

        bus.publish(theme_event("dark"));

        assert_eq!(*log.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_failing_subscriber_does_not_block_the_rest() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        bus.subscribe(EventKind::ThemeChanged, recorder(&log, "before"));
        bus.subscribe(EventKind::ThemeChanged, |_| Err(anyhow!("subscriber exploded")));
        bus.subscribe(EventKind::ThemeChanged, recorder(&log, "after"));

        bus.publish(theme_event("dark"));

        assert_eq!(*log.lock().unwrap(), vec!["before", "after"]);
    }

    #[test]
    fn test_same_callback_registered_twice_fires_twice() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        bus.subscribe(EventKind::ThemeChanged, recorder(&log, "dup"));
        bus.subscribe(EventKind::ThemeChanged, recorder(&log, "dup"));

        bus.publish(theme_event("neon"));

        assert_eq!(*log.lock().unwrap(), vec!["dup", "dup"]);
    }

    #[test]
    fn test_cancel_removes_exactly_one_registration() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let handle = bus.subscribe(EventKind::ThemeChanged, recorder(&log, "dup"));
        bus.subscribe(EventKind::ThemeChanged, recorder(&log, "dup"));
        assert_eq!(bus.subscriber_count(EventKind::ThemeChanged), 2);

        handle.cancel();
        assert_eq!(bus.subscriber_count(EventKind::ThemeChanged), 1);

        bus.publish(theme_event("classic"));
        assert_eq!(*log.lock().unwrap(), vec!["dup"]);
    }

    #[test]
    fn test_cancelled_subscriber_never_fires_again() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let handle = bus.subscribe(EventKind::LoadingStarted, recorder(&log, "once"));
        bus.publish(AppEvent::LoadingStarted {
            lang: "es".to_string(),
        });
        handle.cancel();
        bus.publish(AppEvent::LoadingStarted {
            lang: "en".to_string(),
        });

        assert_eq!(*log.lock().unwrap(), vec!["once"]);
    }

    #[test]
    fn test_unsubscribe_all_clears_one_kind_only() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        bus.subscribe(EventKind::ThemeChanged, recorder(&log, "theme"));
        bus.subscribe(EventKind::LanguageChanged, recorder(&log, "lang"));

        bus.unsubscribe_all(EventKind::ThemeChanged);
        bus.publish(theme_event("dark"));
        bus.publish(AppEvent::LanguageChanged {
            lang: "en".to_string(),
        });

        assert_eq!(*log.lock().unwrap(), vec!["lang"]);
    }

    #[test]
    fn test_publish_with_no_subscribers_is_a_noop() {
        let bus = EventBus::new();
        bus.publish(theme_event("dark"));
        assert_eq!(bus.subscriber_count(EventKind::ThemeChanged), 0);
    }

    #[test]
    fn test_clones_share_one_registry() {
        let bus = EventBus::new();
        let clone = bus.clone();
        let log = Arc::new(Mutex::new(Vec::new()));

        clone.subscribe(EventKind::ThemeChanged, recorder(&log, "via-clone"));
        bus.publish(theme_event("dark"));

        assert_eq!(*log.lock().unwrap(), vec!["via-clone"]);
    }
}

//! # Theme Bridge
//!
//! One-directional publication of the active resolver into state containers
//! that render independently of the controller. The controller pushes a
//! [`BridgeView`] after every state change; the bridge decides whether that
//! change is visible to subscribers.
//!
//! Publication is keyed on the *identity* of the active theme and palette
//! (`Arc` pointers), never on the resolver value, so recreating a resolver
//! over the same state publishes nothing. While the controller is reloading,
//! a view without a theme is held back: subscribers keep the previous colors
//! until the reload settles.
//!
//! ## Subscribing
//!
//! ```no_run
//! use engine::{ActiveThemeController, MemoryStore};
//! use std::sync::Arc;
//!
//! let controller = ActiveThemeController::new(Arc::new(MemoryStore::new()));
//! let mut updates = controller.bridge().subscribe();
//!
//! tokio::spawn(async move {
//!     while updates.changed().await.is_ok() {
//!         let snapshot = updates.borrow().clone();
//!         let accent = snapshot.resolver.get("global", "primaryButton");
//!         log::info!("repaint with {accent} (active: {})", snapshot.is_active);
//!     }
//! });
//! ```

use crate::model::{ActiveTheme, Palette};
use crate::resolver::ColorResolver;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;

/// What subscribers receive.
#[derive(Debug, Clone)]
pub struct ThemeSnapshot {
    pub resolver: ColorResolver,
    pub is_active: bool,
    /// Increments with every publication
    pub revision: u64,
}

impl ThemeSnapshot {
    fn initial() -> Self {
        Self {
            resolver: ColorResolver::fallback(),
            is_active: false,
            revision: 0,
        }
    }
}

/// Synchronous callback invoked for every publication, in order.
pub trait ThemeObserver: Send + Sync {
    fn on_theme_published(&self, snapshot: &ThemeSnapshot);
}

/// Controller state as seen by the bridge.
#[derive(Debug, Clone)]
pub struct BridgeView {
    pub theme: Option<Arc<ActiveTheme>>,
    pub palette: Option<Arc<Palette>>,
    pub resolver: ColorResolver,
    pub reloading: bool,
}

#[derive(Debug, Clone, Default)]
struct Identity {
    theme: Option<Arc<ActiveTheme>>,
    palette: Option<Arc<Palette>>,
}

impl Identity {
    fn same_as(&self, theme: &Option<Arc<ActiveTheme>>, palette: &Option<Arc<Palette>>) -> bool {
        same_arc(&self.theme, theme) && same_arc(&self.palette, palette)
    }
}

fn same_arc<T>(a: &Option<Arc<T>>, b: &Option<Arc<T>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

pub struct ThemeBridge {
    sender: watch::Sender<ThemeSnapshot>,
    observers: Mutex<Vec<Arc<dyn ThemeObserver>>>,
    // Holding the Arcs keeps pointer identity meaningful.
    published: Mutex<Identity>,
    revision: AtomicU64,
}

impl ThemeBridge {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(ThemeSnapshot::initial());
        Self {
            sender,
            observers: Mutex::new(Vec::new()),
            published: Mutex::new(Identity::default()),
            revision: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ThemeSnapshot> {
        self.sender.subscribe()
    }

    pub fn add_observer(&self, observer: Arc<dyn ThemeObserver>) {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observer);
    }

    /// Latest published snapshot.
    pub fn current(&self) -> ThemeSnapshot {
        self.sender.borrow().clone()
    }

    /// Publishes `view` if its identity differs from the last publication.
    /// Returns `true` when subscribers were notified.
    pub fn sync(&self, view: BridgeView) -> bool {
        let snapshot = {
            let mut published = self
                .published
                .lock()
                .unwrap_or_else(PoisonError::into_inner);

            if published.same_as(&view.theme, &view.palette) {
                return false;
            }

            if view.theme.is_none() && view.reloading {
                log::debug!("Holding back theme clear while reload is in flight");
                return false;
            }

            *published = Identity {
                theme: view.theme.clone(),
                palette: view.palette.clone(),
            };

            ThemeSnapshot {
                is_active: view.resolver.is_active(),
                resolver: view.resolver,
                revision: self.revision.fetch_add(1, Ordering::SeqCst) + 1,
            }
        };

        log::debug!(
            "Publishing theme revision {} (active: {})",
            snapshot.revision,
            snapshot.is_active
        );
        self.sender.send_replace(snapshot.clone());

        let observers = self
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for observer in observers {
            observer.on_theme_published(&snapshot);
        }
        true
    }
}

impl Default for ThemeBridge {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ColorEntry, ElementMapping};
    use crate::resolver::PaletteCache;
    use crate::store::Namespace;

    #[derive(Default)]
    struct Recorder {
        flags: Mutex<Vec<bool>>,
    }

    impl ThemeObserver for Recorder {
        fn on_theme_published(&self, snapshot: &ThemeSnapshot) {
            self.flags.lock().unwrap().push(snapshot.is_active);
        }
    }

    fn active_view(reloading: bool) -> BridgeView {
        let palette = Arc::new(Palette::new(
            "p",
            "P",
            vec![ColorEntry::new("c1", "#abcdef")],
        ));
        let theme = Arc::new(ActiveTheme {
            palette_id: "p".to_string(),
            palette_name: "P".to_string(),
            element_mapping: ElementMapping::new().with("global", "link", "c1"),
            source: Namespace::User,
        });
        let mut cache = PaletteCache::new();
        cache.refresh(Some(&palette));
        BridgeView {
            resolver: ColorResolver::new(Some(theme.clone()), Some(&palette), &cache),
            theme: Some(theme),
            palette: Some(palette),
            reloading,
        }
    }

    fn cleared_view(reloading: bool) -> BridgeView {
        BridgeView {
            theme: None,
            palette: None,
            resolver: ColorResolver::fallback(),
            reloading,
        }
    }

    #[test]
    fn test_same_identity_is_not_republished() {
        let bridge = ThemeBridge::new();
        let recorder = Arc::new(Recorder::default());
        bridge.add_observer(recorder.clone());

        let view = active_view(false);
        assert!(bridge.sync(view.clone()));

        // New resolver value, same theme/palette identity
        let mut cache = PaletteCache::new();
        cache.refresh(view.palette.as_ref());
        let rebuilt = BridgeView {
            resolver: ColorResolver::new(view.theme.clone(), view.palette.as_ref(), &cache),
            ..view.clone()
        };
        assert!(!bridge.sync(rebuilt));

        assert_eq!(*recorder.flags.lock().unwrap(), vec![true]);
        assert_eq!(bridge.current().revision, 1);
    }

    #[test]
    fn test_initial_clear_is_a_no_op() {
        let bridge = ThemeBridge::new();
        assert!(!bridge.sync(cleared_view(false)));
        assert!(!bridge.current().is_active);
    }

    #[test]
    fn test_clear_is_held_back_while_reloading() {
        let bridge = ThemeBridge::new();
        let recorder = Arc::new(Recorder::default());
        bridge.add_observer(recorder.clone());

        bridge.sync(active_view(false));
        assert!(!bridge.sync(cleared_view(true)));
        assert!(bridge.current().is_active);

        // Once the reload is over the clear goes through
        assert!(bridge.sync(cleared_view(false)));
        assert_eq!(*recorder.flags.lock().unwrap(), vec![true, false]);
    }

    #[tokio::test]
    async fn test_watch_subscribers_see_latest_snapshot() {
        let bridge = ThemeBridge::new();
        let mut receiver = bridge.subscribe();

        bridge.sync(active_view(false));
        receiver.changed().await.unwrap();
        let snapshot = receiver.borrow().clone();
        assert!(snapshot.is_active);
        assert_eq!(snapshot.resolver.get("global", "link"), "#abcdef");
    }
}

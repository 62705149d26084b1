//! # Active Theme Controller
//!
//! Owns "which theme is active" for the signed-in user and keeps the
//! [`ThemeBridge`] in step with it.
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized ──user signs in──▶ Initializing ──┬─▶ ActiveUser        (saved preference)
//!                                                 ├─▶ ActiveAppDefault  (admin default)
//!                                                 └─▶ Disabled
//!
//! activate()  any state ──▶ ActiveUser
//! disable()   any state ──▶ Disabled ──▶ ActiveAppDefault (if an admin default exists)
//! reload()    any state ──▶ Reloading ──▶ prior state (active theme still resolves)
//!                                     └─▶ ActiveUser | ActiveAppDefault | Disabled
//! sign out    any state ──▶ Uninitialized
//! ```
//!
//! ## Ordering
//!
//! Every lifecycle call takes a ticket when it starts. A call commits only
//! if no newer call has started since, so overlapping calls resolve to the
//! one issued last, whatever order they finish in. A superseded
//! [`activate`](ActiveThemeController::activate) reports
//! [`ThemeError::Superseded`]; superseded `disable`/`reload`/`initialize`
//! calls return `Ok(())` without touching state.
//!
//! Commits are serialized: the ticket check, the state change and the bridge
//! publication happen under one lock, so subscribers see states in the order
//! the controller committed them. Observers run inside that section and must
//! not block.
//!
//! ## Example
//!
//! ```no_run
//! use engine::{ActiveThemeController, MemoryStore, Namespace};
//! use std::sync::Arc;
//!
//! let controller = ActiveThemeController::new(Arc::new(MemoryStore::new()));
//! controller.set_user(Some("user-42")).await?;
//!
//! controller.activate("brand", true, Some(Namespace::App)).await?;
//! let color = controller.get_color_for_element("global", "primaryButton");
//! ```

mod sequence;
mod state;

pub use state::ThemeStatus;

use crate::bridge::ThemeBridge;
use crate::common::ThemeError;
use crate::model::{ActiveTheme, Palette, ThemeReference, parse_hex_color};
use crate::resolver::{ColorResolver, ResolvedSource, SourceResolver};
use crate::store::{ConfigStore, Namespace, keys};
use sequence::{RequestSequence, Ticket};
use state::ControllerState;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Where a settled lifecycle call ended up.
enum Settled {
    User(ResolvedSource),
    AppDefault(ResolvedSource),
    Disabled,
}

enum Transition {
    Apply {
        theme: Arc<ActiveTheme>,
        palette: Arc<Palette>,
        status: ThemeStatus,
    },
    Clear { status: ThemeStatus },
}

impl Transition {
    fn apply(resolved: ResolvedSource, status: ThemeStatus) -> Self {
        let theme = Arc::new(active_theme_from(&resolved));
        Transition::Apply {
            theme,
            palette: resolved.palette,
            status,
        }
    }
}

impl From<Settled> for Transition {
    fn from(settled: Settled) -> Self {
        match settled {
            Settled::User(resolved) => Transition::apply(resolved, ThemeStatus::ActiveUser),
            Settled::AppDefault(resolved) => {
                Transition::apply(resolved, ThemeStatus::ActiveAppDefault)
            }
            Settled::Disabled => Transition::Clear { status: ThemeStatus::Disabled },
        }
    }
}

fn active_theme_from(resolved: &ResolvedSource) -> ActiveTheme {
    ActiveTheme {
        palette_id: resolved.palette.id.clone(),
        palette_name: resolved.palette.name.clone(),
        element_mapping: resolved.mapping.clone(),
        source: resolved.tier,
    }
}

/// Rejects palettes that cannot back a theme. Unparsable hex codes are only
/// reported; lookups that hit them still return the stored string.
fn validate(palette_id: &str, resolved: ResolvedSource) -> Result<ResolvedSource, ThemeError> {
    if !resolved.palette.is_well_formed() {
        return Err(ThemeError::malformed(
            palette_id,
            format!("{} palette has no color list", resolved.tier),
        ));
    }

    for entry in resolved.palette.entries() {
        if let Err(e) = parse_hex_color(&entry.hex_code) {
            log::warn!(
                "Palette '{palette_id}' color '{}' has hex code '{}': {e}",
                entry.id,
                entry.hex_code
            );
        }
    }
    Ok(resolved)
}

/// Exits the `Reloading` phase on every path out of `reload`.
struct ReloadGuard<'a> {
    controller: &'a ActiveThemeController,
}

impl Drop for ReloadGuard<'_> {
    fn drop(&mut self) {
        self.controller.finish_reload();
    }
}

pub struct ActiveThemeController {
    store: Arc<dyn ConfigStore>,
    state: RwLock<ControllerState>,
    sequence: RequestSequence,
    commits: Mutex<()>,
    bridge: ThemeBridge,
}

impl ActiveThemeController {
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self {
            store,
            state: RwLock::new(ControllerState::default()),
            sequence: RequestSequence::default(),
            commits: Mutex::new(()),
            bridge: ThemeBridge::new(),
        }
    }

    pub fn bridge(&self) -> &ThemeBridge {
        &self.bridge
    }

    pub fn status(&self) -> ThemeStatus {
        self.read_state().status
    }

    pub fn is_active(&self) -> bool {
        self.read_state().theme.is_some()
    }

    pub fn active_theme(&self) -> Option<Arc<ActiveTheme>> {
        self.read_state().theme.clone()
    }

    pub fn user_id(&self) -> Option<String> {
        self.read_state().user_id.clone()
    }

    /// Snapshot of the current resolver.
    pub fn resolver(&self) -> ColorResolver {
        self.read_state().resolver.clone()
    }

    /// Color for a UI element. Never fails and never suspends.
    pub fn get_color_for_element(&self, section: &str, element: &str) -> String {
        self.read_state()
            .resolver
            .get(section, element)
            .to_string()
    }

    /// Reacts to the auth collaborator. `Some` initializes the theme for that
    /// user (a no-op if already done); `None` signs out and clears the theme.
    pub async fn set_user(&self, user_id: Option<&str>) -> Result<(), ThemeError> {
        let Some(user_id) = user_id else {
            let ticket = self.sequence.issue();
            self.write_state().user_id = None;
            self.commit(ticket, Transition::Clear { status: ThemeStatus::Uninitialized });
            log::info!("User signed out, custom theme cleared");
            return Ok(());
        };

        let switching = {
            let mut state = self.write_state();
            if state.user_id.as_deref() == Some(user_id)
                && state.status != ThemeStatus::Uninitialized
            {
                return Ok(());
            }
            let switching = state
                .user_id
                .as_deref()
                .is_some_and(|current| current != user_id);
            state.user_id = Some(user_id.to_string());
            switching
        };

        // Another user's theme must not leak into this session.
        if switching {
            let ticket = self.sequence.issue();
            self.commit(ticket, Transition::Clear { status: ThemeStatus::Uninitialized });
        }

        log::info!("Initializing custom theme for user {user_id}");
        self.initialize().await
    }

    /// Restores the saved preference, else the admin default, else disables.
    ///
    /// A saved reference that no longer resolves is deleted and the call
    /// still succeeds.
    ///
    /// # Errors
    ///
    /// [`ThemeError::NoUser`] without a user, [`ThemeError::Store`] when the
    /// store fails for a reason other than a missing key.
    pub async fn initialize(&self) -> Result<(), ThemeError> {
        self.require_user()?;
        let ticket = self.sequence.issue();
        self.write_state().set_status(ThemeStatus::Initializing);

        match self.settle().await {
            Ok(settled) => {
                self.commit(ticket, settled.into());
                log::info!("Custom theme initialized: {}", self.status());
                Ok(())
            }
            Err(e) => {
                log::error!("Custom theme initialization failed: {e}");
                let _commit = self.lock_commits();
                if self.sequence.is_current(ticket) {
                    self.write_state().set_status(ThemeStatus::Disabled);
                }
                Err(e)
            }
        }
    }

    /// Activates `palette_id`, auto-detecting its tier unless `source` is
    /// given, and persists the choice to the `user` tier when `persist` is set.
    ///
    /// All or nothing: on any error the previous theme stays active.
    ///
    /// # Errors
    ///
    /// - [`ThemeError::NotFound`] when no tier holds both palette and mapping
    /// - [`ThemeError::Malformed`] when the palette has no color list
    /// - [`ThemeError::Store`] when reading (explicit tier) or persisting fails
    /// - [`ThemeError::Superseded`] when a newer lifecycle call was issued meanwhile
    pub async fn activate(
        &self,
        palette_id: &str,
        persist: bool,
        source: Option<Namespace>,
    ) -> Result<Arc<ActiveTheme>, ThemeError> {
        self.require_user()?;
        let ticket = self.sequence.issue();
        let superseded = || ThemeError::Superseded {
            palette_id: palette_id.to_string(),
        };

        let resolved = SourceResolver::new(self.store.as_ref())
            .resolve(palette_id, source)
            .await?;
        let resolved = validate(palette_id, resolved)?;

        if !self.sequence.is_current(ticket) {
            return Err(superseded());
        }

        if persist {
            let reference = ThemeReference::new(palette_id, resolved.tier);
            let saved = self
                .store
                .set(
                    Namespace::User,
                    keys::ACTIVE_CUSTOM_THEME,
                    reference.to_stored(),
                )
                .await;

            if !self.sequence.is_current(ticket) {
                if saved.is_ok() {
                    log::warn!(
                        "Saved theme '{palette_id}' after a newer theme request was issued"
                    );
                }
                return Err(superseded());
            }
            saved?;
        }

        let theme = Arc::new(active_theme_from(&resolved));
        let transition = Transition::Apply {
            theme: Arc::clone(&theme),
            palette: resolved.palette,
            status: ThemeStatus::ActiveUser,
        };
        if !self.commit(ticket, transition) {
            return Err(superseded());
        }

        log::info!(
            "Activated theme '{}' from {} namespace (persisted: {persist})",
            theme.palette_id,
            theme.source
        );
        Ok(theme)
    }

    /// Forgets the user's preference and falls back to the admin default.
    ///
    /// Failing to delete the saved preference is logged, not returned.
    ///
    /// # Errors
    ///
    /// [`ThemeError::Store`] when looking up the admin default fails; the
    /// theme is already cleared at that point.
    pub async fn disable(&self) -> Result<(), ThemeError> {
        self.require_user()?;
        let ticket = self.sequence.issue();

        if let Err(e) = self
            .store
            .delete(Namespace::User, keys::ACTIVE_CUSTOM_THEME)
            .await
        {
            log::error!("Failed to delete saved theme preference: {e}");
        }

        if !self.commit(ticket, Transition::Clear { status: ThemeStatus::Disabled }) {
            return Ok(());
        }
        log::info!("Custom theme disabled");

        if let Some(resolved) = self.app_default().await? {
            self.commit(
                ticket,
                Transition::apply(resolved, ThemeStatus::ActiveAppDefault),
            );
        }
        Ok(())
    }

    /// Re-resolves the active theme from the tier it came from and keeps
    /// the prior state when it still resolves. Otherwise the store decides:
    /// saved preference, then admin default, then `Disabled`. Subscribers of
    /// the bridge keep the previous colors until the reload settles.
    ///
    /// # Errors
    ///
    /// [`ThemeError::Store`] on store failures other than a missing key; the
    /// previous theme is kept.
    pub async fn reload(&self) -> Result<(), ThemeError> {
        self.require_user()?;
        let ticket = self.sequence.issue();
        let (_reloading, current) = self.begin_reload();
        log::debug!("Reloading custom theme");

        if let Some((reference, status)) = current {
            match self.resolve_reference(&reference).await {
                Ok(resolved) => {
                    self.commit(ticket, Transition::apply(resolved, status));
                    return Ok(());
                }
                Err(e) if e.marks_reference_stale() => {
                    log::warn!(
                        "Active theme '{}' no longer resolves: {e}",
                        reference.palette_id
                    );
                }
                Err(e) => return Err(e),
            }
        }

        let settled = self.settle().await?;
        self.commit(ticket, settled.into());
        Ok(())
    }

    /// Nothing is committed here; the caller commits the outcome only once
    /// every read has succeeded.
    async fn settle(&self) -> Result<Settled, ThemeError> {
        if let Some(resolved) = self.saved_preference().await? {
            return Ok(Settled::User(resolved));
        }

        Ok(match self.app_default().await? {
            Some(resolved) => Settled::AppDefault(resolved),
            None => Settled::Disabled,
        })
    }

    async fn saved_preference(&self) -> Result<Option<ResolvedSource>, ThemeError> {
        let Some(stored) = self
            .store
            .get_optional(Namespace::User, keys::ACTIVE_CUSTOM_THEME)
            .await?
        else {
            return Ok(None);
        };

        let reference = match ThemeReference::from_stored(&stored) {
            Ok(reference) => reference,
            Err(e) => {
                self.discard_stale_reference(&e.to_string()).await;
                return Ok(None);
            }
        };

        match self.resolve_reference(&reference).await {
            Ok(resolved) => Ok(Some(resolved)),
            Err(e) if e.marks_reference_stale() => {
                self.discard_stale_reference(&e.to_string()).await;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn app_default(&self) -> Result<Option<ResolvedSource>, ThemeError> {
        let Some(stored) = self
            .store
            .get_optional(Namespace::App, keys::DEFAULT_CUSTOM_THEME)
            .await?
        else {
            return Ok(None);
        };

        let palette_id = match ThemeReference::from_stored(&stored) {
            Ok(reference) => reference.palette_id,
            Err(e) => {
                log::warn!("Ignoring unreadable admin default theme: {e}");
                return Ok(None);
            }
        };

        let resolved = SourceResolver::new(self.store.as_ref())
            .resolve(&palette_id, None)
            .await
            .and_then(|resolved| validate(&palette_id, resolved));

        match resolved {
            Ok(resolved) => Ok(Some(resolved)),
            Err(e) => {
                log::warn!("Admin default theme '{palette_id}' cannot be used: {e}");
                Ok(None)
            }
        }
    }

    async fn resolve_reference(
        &self,
        reference: &ThemeReference,
    ) -> Result<ResolvedSource, ThemeError> {
        SourceResolver::new(self.store.as_ref())
            .resolve(&reference.palette_id, Some(reference.source))
            .await
            .and_then(|resolved| validate(&reference.palette_id, resolved))
    }

    /// Deletes the saved preference. The in-memory theme is left alone.
    async fn discard_stale_reference(&self, reason: &str) {
        log::warn!("Discarding stale theme preference: {reason}");

        if let Err(e) = self
            .store
            .delete(Namespace::User, keys::ACTIVE_CUSTOM_THEME)
            .await
        {
            log::error!("Failed to delete stale theme preference: {e}");
        }
    }

    /// Applies `transition` if `ticket` is still the newest call.
    fn commit(&self, ticket: Ticket, transition: Transition) -> bool {
        let _commit = self.lock_commits();
        if !self.sequence.is_current(ticket) {
            log::debug!("Dropping result of a superseded theme request");
            return false;
        }

        let view = {
            let mut state = self.write_state();
            match transition {
                Transition::Apply {
                    theme,
                    palette,
                    status,
                } => {
                    state.apply(Some(theme), Some(palette));
                    state.set_status(status);
                }
                Transition::Clear { status } => {
                    state.apply(None, None);
                    state.set_status(status);
                }
            }
            state.bridge_view()
        };

        self.bridge.sync(view);
        true
    }

    /// Enters `Reloading` and returns the reference and status to restore if
    /// a theme is active.
    fn begin_reload(&self) -> (ReloadGuard<'_>, Option<(ThemeReference, ThemeStatus)>) {
        let current = {
            let mut state = self.write_state();
            state.enter_reload();
            let status = match state.resume {
                ThemeStatus::ActiveAppDefault => ThemeStatus::ActiveAppDefault,
                _ => ThemeStatus::ActiveUser,
            };
            state.theme.as_ref().map(|theme| (theme.reference(), status))
        };
        (ReloadGuard { controller: self }, current)
    }

    fn finish_reload(&self) {
        let _commit = self.lock_commits();
        let view = {
            let mut state = self.write_state();
            state.leave_reload();
            state.bridge_view()
        };
        self.bridge.sync(view);
    }

    fn require_user(&self) -> Result<(), ThemeError> {
        if self.read_state().user_id.is_none() {
            return Err(ThemeError::NoUser);
        }
        Ok(())
    }

    fn lock_commits(&self) -> MutexGuard<'_, ()> {
        self.commits.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_state(&self) -> RwLockReadGuard<'_, ControllerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, ControllerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

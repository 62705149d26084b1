use crate::bridge::BridgeView;
use crate::model::{ActiveTheme, Palette};
use crate::resolver::{ColorResolver, PaletteCache};
use std::fmt;
use std::sync::Arc;

/// Lifecycle state of the active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeStatus {
    /// No user has been seen yet, or the user signed out
    #[default]
    Uninitialized,
    /// Looking for a saved preference or an admin default
    Initializing,
    /// A theme chosen by the user is active
    ActiveUser,
    /// The tenant-wide admin default is active
    ActiveAppDefault,
    /// No theme; every color comes from the default table
    Disabled,
    /// A reload is in flight; the previous theme keeps being served
    Reloading,
}

impl ThemeStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, ThemeStatus::ActiveUser | ThemeStatus::ActiveAppDefault)
    }
}

impl fmt::Display for ThemeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ThemeStatus::Uninitialized => "uninitialized",
            ThemeStatus::Initializing => "initializing",
            ThemeStatus::ActiveUser => "active (user)",
            ThemeStatus::ActiveAppDefault => "active (app default)",
            ThemeStatus::Disabled => "disabled",
            ThemeStatus::Reloading => "reloading",
        };
        f.write_str(label)
    }
}

/// Everything the controller mutates. Only touched inside short,
/// non-suspending critical sections.
#[derive(Debug, Default)]
pub(crate) struct ControllerState {
    pub status: ThemeStatus,
    /// Status to restore once every in-flight reload has finished
    pub resume: ThemeStatus,
    pub reloads_in_flight: usize,
    pub user_id: Option<String>,
    pub theme: Option<Arc<ActiveTheme>>,
    pub palette: Option<Arc<Palette>>,
    pub cache: PaletteCache,
    pub resolver: ColorResolver,
}

impl ControllerState {
    pub fn reloading(&self) -> bool {
        self.reloads_in_flight > 0
    }

    /// Records a target status. While reloading it becomes the status to
    /// resume with; the visible status stays `Reloading`.
    pub fn set_status(&mut self, status: ThemeStatus) {
        if self.reloading() {
            self.resume = status;
        } else {
            self.status = status;
        }
    }

    pub fn apply(&mut self, theme: Option<Arc<ActiveTheme>>, palette: Option<Arc<Palette>>) {
        self.cache.refresh(palette.as_ref());
        self.resolver = ColorResolver::new(theme.clone(), palette.as_ref(), &self.cache);
        self.theme = theme;
        self.palette = palette;
    }

    pub fn enter_reload(&mut self) {
        if !self.reloading() {
            self.resume = self.status;
            self.status = ThemeStatus::Reloading;
        }
        self.reloads_in_flight += 1;
    }

    pub fn leave_reload(&mut self) {
        self.reloads_in_flight = self.reloads_in_flight.saturating_sub(1);
        if !self.reloading() && self.status == ThemeStatus::Reloading {
            self.status = self.resume;
        }
    }

    pub fn bridge_view(&self) -> BridgeView {
        BridgeView {
            theme: self.theme.clone(),
            palette: self.palette.clone(),
            resolver: self.resolver.clone(),
            reloading: self.reloading(),
        }
    }
}

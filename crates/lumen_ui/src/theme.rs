//! # Motion Theme
//!
//! Named animation presets shared by every control of an application,
//! loaded once from TOML and injected explicitly into each control.
//!
//! ```toml
//! tick_rate_hz = 60
//!
//! [presets.hover]
//! easing = "linear"
//! increment = 0.10
//! hold = true
//! ```
//!
//! A [`ThemeHandle`] shares one theme between controls and tells
//! subscribers when it is replaced.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use lumen_core::{
    AnimationConfig, AnimationError, AnimationManager, AnimationResult, Easing, FrameClock,
    DEFAULT_TICK_RATE_HZ,
};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

/// Check-state fade of toggle controls.
pub const CHECK: &str = "check";
/// Hover/focus glow.
pub const HOVER: &str = "hover";
/// Press ripple (two-phase, overlapping).
pub const RIPPLE: &str = "ripple";
/// Title-bar icon click burst.
pub const CLICK: &str = "click";
/// Navigation drawer overlay fade.
pub const DRAWER: &str = "drawer";

fn default_tick_rate() -> u32 {
    DEFAULT_TICK_RATE_HZ
}

/// Application-wide animation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MotionTheme {
    /// Rate of the clock controls should be driven at.
    #[serde(default = "default_tick_rate")]
    pub tick_rate_hz: u32,
    /// Presets keyed by effect name.
    #[serde(default)]
    pub presets: BTreeMap<String, AnimationConfig>,
}

impl MotionTheme {
    /// Material presets used by the stock controls.
    #[must_use]
    pub fn material() -> Self {
        let presets = [
            (CHECK, AnimationConfig::new(Easing::EaseInOut, 0.06).with_hold()),
            (HOVER, AnimationConfig::new(Easing::Linear, 0.10).with_hold()),
            (
                RIPPLE,
                AnimationConfig::new(Easing::Linear, 0.10)
                    .with_secondary_increment(0.08)
                    .with_multiple(),
            ),
            (CLICK, AnimationConfig::new(Easing::EaseOut, 0.04).with_hold()),
            (DRAWER, AnimationConfig::new(Easing::EaseInOut, 0.04).with_hold()),
        ];

        Self {
            tick_rate_hz: DEFAULT_TICK_RATE_HZ,
            presets: presets
                .into_iter()
                .map(|(name, config)| (name.to_string(), config))
                .collect(),
        }
    }

    /// Parses and validates a theme document.
    ///
    /// # Errors
    ///
    /// Returns [`AnimationError::ThemeParse`] for malformed TOML and
    /// [`AnimationError::InvalidConfig`] for invalid presets.
    pub fn from_toml_str(source: &str) -> AnimationResult<Self> {
        let theme: Self =
            toml::from_str(source).map_err(|e| AnimationError::ThemeParse(e.to_string()))?;
        theme.validate()?;
        Ok(theme)
    }

    /// Reads, parses and validates a theme file.
    ///
    /// # Errors
    ///
    /// Returns [`AnimationError::ThemeRead`] if the file cannot be read, or
    /// any error of [`from_toml_str`](Self::from_toml_str).
    pub fn from_file(path: impl AsRef<Path>) -> AnimationResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| AnimationError::ThemeRead {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let theme = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), presets = theme.presets.len(), "motion theme loaded");
        Ok(theme)
    }

    /// Serializes the theme back to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`AnimationError::ThemeParse`] if serialization fails.
    pub fn to_toml_string(&self) -> AnimationResult<String> {
        toml::to_string(self).map_err(|e| AnimationError::ThemeParse(e.to_string()))
    }

    /// Checks the tick rate and every preset.
    ///
    /// # Errors
    ///
    /// Returns [`AnimationError::InvalidConfig`] naming the first bad entry.
    pub fn validate(&self) -> AnimationResult<()> {
        if self.tick_rate_hz == 0 {
            return Err(AnimationError::InvalidConfig(
                "tick_rate_hz must be positive".to_string(),
            ));
        }

        for (name, config) in &self.presets {
            config.validate().map_err(|e| match e {
                AnimationError::InvalidConfig(reason) => {
                    AnimationError::InvalidConfig(format!("preset {name}: {reason}"))
                }
                other => other,
            })?;
        }
        Ok(())
    }

    /// Adds or replaces a preset.
    #[must_use]
    pub fn with_preset(mut self, name: impl Into<String>, config: AnimationConfig) -> Self {
        self.presets.insert(name.into(), config);
        self
    }

    /// Looks up a preset.
    ///
    /// # Errors
    ///
    /// Returns [`AnimationError::UnknownPreset`] if `name` is not defined.
    pub fn preset(&self, name: &str) -> AnimationResult<AnimationConfig> {
        self.presets
            .get(name)
            .copied()
            .ok_or_else(|| AnimationError::UnknownPreset(name.to_string()))
    }

    /// Builds a manager from a preset.
    ///
    /// # Errors
    ///
    /// Returns [`AnimationError::UnknownPreset`] or
    /// [`AnimationError::InvalidConfig`].
    pub fn manager<D>(&self, name: &str) -> AnimationResult<AnimationManager<D>> {
        AnimationManager::new(self.preset(name)?)
    }

    /// Applies the easing and increments of preset `name` to a live
    /// manager. `allow_multiple`, `hold` and `rest_progress` only change
    /// when the manager is rebuilt.
    ///
    /// # Errors
    ///
    /// Returns [`AnimationError::UnknownPreset`] or
    /// [`AnimationError::InvalidConfig`]; the manager is unchanged then.
    pub fn retune<D>(&self, name: &str, manager: &mut AnimationManager<D>) -> AnimationResult<()> {
        let preset = self.preset(name)?;
        preset.validate()?;
        manager.set_easing(preset.easing);
        manager.set_increment(preset.increment)?;
        manager.set_secondary_increment(preset.secondary_increment)
    }

    /// Creates a clock at the theme's tick rate.
    #[must_use]
    pub fn clock(&self) -> FrameClock {
        FrameClock::new(self.tick_rate_hz)
    }
}

impl Default for MotionTheme {
    fn default() -> Self {
        Self::material()
    }
}

/// Identifier returned by [`ThemeHandle::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Callback run when the shared theme is replaced.
pub type ThemeObserver = Box<dyn FnMut(&MotionTheme) + Send>;

/// Observers plus bookkeeping for the ones taken out while a
/// replacement notifies them.
#[derive(Default)]
struct ObserverList {
    entries: Vec<(ObserverId, ThemeObserver)>,
    in_flight: Vec<ObserverId>,
    removed: Vec<ObserverId>,
}

impl ObserverList {
    fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(observer, _)| *observer != id);
        if self.entries.len() != before {
            return true;
        }
        if self.in_flight.contains(&id) && !self.removed.contains(&id) {
            self.removed.push(id);
            return true;
        }
        false
    }

    fn len(&self) -> usize {
        self.entries.len() + self.in_flight.len() - self.removed.len()
    }
}

struct ThemeShared {
    theme: RwLock<Arc<MotionTheme>>,
    observers: Mutex<ObserverList>,
    next_id: AtomicU64,
}

/// Shared, explicitly injected theme with change notification.
///
/// Cloning yields another handle to the same theme.
#[derive(Clone)]
pub struct ThemeHandle {
    shared: Arc<ThemeShared>,
}

impl ThemeHandle {
    /// Wraps a theme for sharing.
    #[must_use]
    pub fn new(theme: MotionTheme) -> Self {
        Self {
            shared: Arc::new(ThemeShared {
                theme: RwLock::new(Arc::new(theme)),
                observers: Mutex::new(ObserverList::default()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Snapshot of the current theme.
    #[must_use]
    pub fn current(&self) -> Arc<MotionTheme> {
        Arc::clone(&self.shared.theme.read())
    }

    /// Registers an observer for theme replacement.
    pub fn subscribe<F>(&self, observer: F) -> ObserverId
    where
        F: FnMut(&MotionTheme) + Send + 'static,
    {
        let id = ObserverId(self.shared.next_id.fetch_add(1, Ordering::Relaxed));
        self.shared.observers.lock().entries.push((id, Box::new(observer)));
        id
    }

    /// Removes an observer. Returns false if it was not registered.
    ///
    /// Safe to call from inside a notification, including for the
    /// observer that is running; a removed observer is not called again.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        self.shared.observers.lock().remove(id)
    }

    /// Number of registered observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.shared.observers.lock().len()
    }

    /// Validates and installs a new theme, then notifies every observer
    /// once, in subscription order.
    ///
    /// Observers may subscribe or unsubscribe from inside the
    /// notification. A new observer is not called for the replacement in
    /// progress.
    ///
    /// # Errors
    ///
    /// Returns [`AnimationError::InvalidConfig`] and leaves the current
    /// theme untouched if `theme` does not validate.
    pub fn replace(&self, theme: MotionTheme) -> AnimationResult<()> {
        theme.validate()?;
        let theme = Arc::new(theme);
        *self.shared.theme.write() = Arc::clone(&theme);

        let mut notifying = {
            let mut list = self.shared.observers.lock();
            let taken = std::mem::take(&mut list.entries);
            list.in_flight.extend(taken.iter().map(|(id, _)| *id));
            taken
        };

        for (id, observer) in &mut notifying {
            if self.shared.observers.lock().removed.contains(id) {
                continue;
            }
            observer(&theme);
        }

        let mut list = self.shared.observers.lock();
        let mut kept = Vec::with_capacity(notifying.len() + list.entries.len());
        for (id, observer) in notifying {
            list.in_flight.retain(|flight| *flight != id);
            let before = list.removed.len();
            list.removed.retain(|removed| *removed != id);
            if list.removed.len() == before {
                kept.push((id, observer));
            }
        }
        kept.append(&mut list.entries);
        list.entries = kept;

        tracing::debug!(observers = list.len(), "motion theme replaced");
        Ok(())
    }

    /// Reloads the theme from disk and notifies observers.
    ///
    /// # Errors
    ///
    /// Any error of [`MotionTheme::from_file`]; the current theme is kept.
    pub fn reload(&self, path: impl AsRef<Path>) -> AnimationResult<()> {
        self.replace(MotionTheme::from_file(path)?)
    }
}

/// Theme observer registration owned by a control. Unsubscribes on drop.
#[derive(Debug)]
pub(crate) struct ThemeSubscription {
    handle: ThemeHandle,
    id: ObserverId,
}

impl ThemeSubscription {
    pub(crate) fn new<F>(handle: &ThemeHandle, observer: F) -> Self
    where
        F: FnMut(&MotionTheme) + Send + 'static,
    {
        Self {
            handle: handle.clone(),
            id: handle.subscribe(observer),
        }
    }
}

impl Drop for ThemeSubscription {
    fn drop(&mut self) {
        self.handle.unsubscribe(self.id);
    }
}

impl Default for ThemeHandle {
    fn default() -> Self {
        Self::new(MotionTheme::material())
    }
}

impl std::fmt::Debug for ThemeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeHandle")
            .field("theme", &self.current())
            .field("observers", &self.observer_count())
            .finish()
    }
}

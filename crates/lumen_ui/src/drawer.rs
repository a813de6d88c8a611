//! Navigation drawer motion for a custom-chrome window.
//!
//! Two effects: the dimming overlay fades with the drawer, and the drawer
//! icon in the title bar plays a click burst each time it is pressed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use lumen_core::{AnimationResult, Direction, FrameClock, SharedAnimation};

use crate::theme::{MotionTheme, ThemeHandle, ThemeSubscription, CLICK, DRAWER};

/// Overlay opacity when the drawer is fully open.
pub const OVERLAY_MAX_OPACITY: f64 = 0.55;

/// Animation state of a window's navigation drawer.
pub struct DrawerAnimator {
    open: bool,
    fade: SharedAnimation,
    click: SharedAnimation,
    repaint: Arc<AtomicBool>,
    theme: Option<ThemeSubscription>,
}

impl DrawerAnimator {
    /// Builds both managers from `theme` and attaches them to `clock`.
    ///
    /// # Errors
    ///
    /// Fails if the theme lacks the `drawer` or `click` preset.
    pub fn new(theme: &MotionTheme, clock: &FrameClock) -> AnimationResult<Self> {
        let repaint = Arc::new(AtomicBool::new(false));

        let mut fade = theme.manager::<()>(DRAWER)?;
        let mut click = theme.manager::<()>(CLICK)?;
        for manager in [&mut fade, &mut click] {
            let flag = Arc::clone(&repaint);
            manager.on_progress(move |_| flag.store(true, Ordering::Release));
        }

        Ok(Self {
            open: false,
            fade: fade.attach(clock),
            click: click.attach(clock),
            repaint,
            theme: None,
        })
    }

    /// Builds from the handle's current theme and re-applies the `drawer`
    /// and `click` presets whenever the theme is replaced.
    ///
    /// # Errors
    ///
    /// Fails if the current theme lacks either preset.
    pub fn from_handle(handle: &ThemeHandle, clock: &FrameClock) -> AnimationResult<Self> {
        let mut drawer = Self::new(&handle.current(), clock)?;

        let targets = [
            (DRAWER, Arc::downgrade(&drawer.fade)),
            (CLICK, Arc::downgrade(&drawer.click)),
        ];
        drawer.theme = Some(ThemeSubscription::new(handle, move |theme| {
            for (name, manager) in &targets {
                let Some(manager) = manager.upgrade() else {
                    continue;
                };
                if let Err(error) = theme.retune(name, &mut *manager.lock()) {
                    tracing::warn!(preset = *name, %error, "failed to apply preset");
                };
            }
        }));
        Ok(drawer)
    }

    /// True once the drawer has begun opening and not yet begun closing.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Drawer started opening.
    ///
    /// # Errors
    ///
    /// Fails only if the animator has been disposed.
    pub fn begin_open(&mut self) -> AnimationResult<()> {
        self.fade.lock().start(Direction::In)?;
        self.open = true;
        Ok(())
    }

    /// Drawer started closing.
    ///
    /// # Errors
    ///
    /// Fails only if the animator has been disposed.
    pub fn begin_close(&mut self) -> AnimationResult<()> {
        self.fade.lock().start(Direction::Out)?;
        self.open = false;
        Ok(())
    }

    /// Drawer icon pressed: toggles the drawer and restarts the click
    /// burst from zero.
    ///
    /// # Errors
    ///
    /// Fails only if the animator has been disposed.
    pub fn icon_pressed(&mut self) -> AnimationResult<()> {
        if self.open {
            self.begin_close()?;
        } else {
            self.begin_open()?;
        }

        let mut click = self.click.lock();
        click.set_progress(0.0)?;
        click.start(Direction::In)
    }

    /// Current overlay opacity.
    #[must_use]
    pub fn overlay_opacity(&self) -> f64 {
        self.fade.lock().progress() * OVERLAY_MAX_OPACITY
    }

    /// Eased progress of the icon click burst.
    #[must_use]
    pub fn click_progress(&self) -> f64 {
        self.click.lock().progress()
    }

    /// Returns and clears the pending-repaint flag.
    pub fn take_repaint(&self) -> bool {
        self.repaint.swap(false, Ordering::AcqRel)
    }

    /// Tears down both managers and stops following the theme.
    pub fn dispose(&mut self) {
        self.theme = None;
        self.fade.lock().dispose();
        self.click.lock().dispose();
    }
}

impl std::fmt::Debug for DrawerAnimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawerAnimator")
            .field("open", &self.open)
            .field("follows_theme", &self.theme.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drawer() -> (DrawerAnimator, FrameClock) {
        let theme = MotionTheme::material();
        let clock = theme.clock();
        (DrawerAnimator::new(&theme, &clock).unwrap(), clock)
    }

    #[test]
    fn test_overlay_fades_to_max_opacity() {
        let (mut drawer, clock) = drawer();
        drawer.begin_open().unwrap();
        for _ in 0..30 {
            clock.tick();
        }
        assert!((drawer.overlay_opacity() - OVERLAY_MAX_OPACITY).abs() < 1e-9);

        drawer.begin_close().unwrap();
        for _ in 0..30 {
            clock.tick();
        }
        assert_eq!(drawer.overlay_opacity(), 0.0);
    }

    #[test]
    fn test_icon_press_toggles_and_restarts_click() {
        let (mut drawer, clock) = drawer();
        drawer.icon_pressed().unwrap();
        assert!(drawer.is_open());
        for _ in 0..30 {
            clock.tick();
        }
        assert!((drawer.click_progress() - 1.0).abs() < 1e-9);

        drawer.icon_pressed().unwrap();
        assert!(!drawer.is_open());
        assert_eq!(drawer.click_progress(), 0.0);
        clock.tick();
        assert!(drawer.take_repaint());
        assert!(drawer.click_progress() > 0.0);
    }

    #[test]
    fn test_dispose() {
        let (mut drawer, clock) = drawer();
        drawer.dispose();
        assert!(drawer.begin_open().is_err());
        assert!(!drawer.is_open());
        assert!(drawer.icon_pressed().is_err());
        assert!(!drawer.is_open());
        assert_eq!(clock.tick(), 0);
    }

    #[test]
    fn test_follows_theme_replacement() {
        let handle = ThemeHandle::default();
        let clock = handle.current().clock();
        let mut drawer = DrawerAnimator::from_handle(&handle, &clock).unwrap();

        let snappy = MotionTheme::material().with_preset(
            DRAWER,
            lumen_core::AnimationConfig::new(lumen_core::Easing::Linear, 0.5).with_hold(),
        );
        handle.replace(snappy).unwrap();

        drawer.begin_open().unwrap();
        clock.tick();
        assert!((drawer.overlay_opacity() - 0.5 * OVERLAY_MAX_OPACITY).abs() < 1e-9);

        drawer.dispose();
        assert_eq!(handle.observer_count(), 0);
    }

    #[test]
    fn test_failed_close_keeps_drawer_open() {
        let (mut drawer, _clock) = drawer();
        drawer.begin_open().unwrap();
        drawer.dispose();

        assert!(drawer.begin_close().is_err());
        assert!(drawer.is_open());
    }
}

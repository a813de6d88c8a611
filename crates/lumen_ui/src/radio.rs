//! # Radio Button Motion
//!
//! Headless animation controller for a material radio button. The host
//! forwards input and checked-state changes, ticks the shared clock, and
//! paints from [`RadioAnimator::frame`] whenever
//! [`RadioAnimator::take_repaint`] reports a pending repaint.
//!
//! Three managers run per control:
//!
//! | Effect | Preset   | Started by                                   |
//! |--------|----------|----------------------------------------------|
//! | check  | `check`  | `In` when checked, `Out` when unchecked      |
//! | hover  | `hover`  | `In` on focus, `Out` on focus loss / release |
//! | ripple | `ripple` | `InOutIn` on press (pointer or Space)        |
//!
//! A ripple's second phase is parked while the press is held and resumes
//! on release.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use lumen_core::{
    attach_shared, AnimationError, AnimationManager, AnimationResult, Direction, FrameClock,
    SharedAnimation,
};

use parking_lot::Mutex;

use crate::input::{InputEvent, Key, PointerState};
use crate::theme::{MotionTheme, ThemeHandle, ThemeSubscription, CHECK, HOVER, RIPPLE};

/// One ripple as the painter needs it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleFrame {
    /// Eased growth phase.
    pub progress: f64,
    /// Eased fade phase.
    pub secondary_progress: f64,
    /// Direction the ripple was started with.
    pub direction: Direction,
    /// Checked state when the press happened.
    pub checked_at_start: bool,
}

/// Paint inputs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RadioFrame {
    /// Current checked state.
    pub checked: bool,
    /// Eased check fill, 0.0 (empty) to 1.0 (filled).
    pub check_progress: f64,
    /// Eased hover glow.
    pub hover_progress: f64,
    /// Live ripples, oldest first.
    pub ripples: Vec<RippleFrame>,
}

/// Animation state of a single radio button.
pub struct RadioAnimator {
    checked: bool,
    hovered: bool,
    ripple_enabled: bool,
    pointer: PointerState,
    release_increment: Arc<Mutex<f64>>,
    check: SharedAnimation<bool>,
    hover: SharedAnimation<bool>,
    ripple: SharedAnimation<bool>,
    repaint: Arc<AtomicBool>,
    theme: Option<ThemeSubscription>,
}

impl RadioAnimator {
    /// Builds the three managers from `theme` and attaches them to `clock`.
    ///
    /// # Errors
    ///
    /// Fails if the theme lacks the `check`, `hover` or `ripple` preset.
    pub fn new(theme: &MotionTheme, clock: &FrameClock) -> AnimationResult<Self> {
        let repaint = Arc::new(AtomicBool::new(false));
        let ripple_preset = theme.preset(RIPPLE)?;

        Ok(Self {
            checked: false,
            hovered: false,
            ripple_enabled: true,
            pointer: PointerState::Out,
            release_increment: Arc::new(Mutex::new(ripple_preset.secondary_increment)),
            check: wire(theme.manager(CHECK)?, clock, &repaint),
            hover: wire(theme.manager(HOVER)?, clock, &repaint),
            ripple: wire(AnimationManager::new(ripple_preset)?, clock, &repaint),
            repaint,
            theme: None,
        })
    }

    /// Builds from the handle's current theme and follows later
    /// replacements: easing and increments of the `check`, `hover` and
    /// `ripple` presets are re-applied to the live managers. Running
    /// animations keep their progress.
    ///
    /// # Errors
    ///
    /// Fails if the current theme lacks one of the three presets.
    pub fn from_handle(handle: &ThemeHandle, clock: &FrameClock) -> AnimationResult<Self> {
        let mut radio = Self::new(&handle.current(), clock)?;

        let check = Arc::downgrade(&radio.check);
        let hover = Arc::downgrade(&radio.hover);
        let ripple = Arc::downgrade(&radio.ripple);
        let release = Arc::clone(&radio.release_increment);
        radio.theme = Some(ThemeSubscription::new(handle, move |theme| {
            retune(theme, CHECK, &check);
            retune(theme, HOVER, &hover);

            let Some(ripple) = ripple.upgrade() else {
                return;
            };
            let Ok(preset) = theme.preset(RIPPLE) else {
                tracing::warn!(preset = RIPPLE, "replacement theme lacks preset, keeping current");
                return;
            };
            let mut ripple = ripple.lock();
            let parked = ripple.config().secondary_increment <= 0.0;
            if let Err(error) = theme.retune(RIPPLE, &mut *ripple) {
                tracing::warn!(preset = RIPPLE, %error, "failed to apply preset");
                return;
            }
            *release.lock() = preset.secondary_increment;
            if parked {
                // Press still held; the second phase resumes on release.
                let _ = ripple.set_secondary_increment(0.0);
            }
        }));
        Ok(radio)
    }

    /// Current checked state.
    #[must_use]
    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Current pointer state.
    #[must_use]
    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    /// Whether hover and ripple effects run.
    #[must_use]
    pub fn ripple_enabled(&self) -> bool {
        self.ripple_enabled
    }

    /// Enables or disables hover and ripple effects.
    pub fn set_ripple_enabled(&mut self, enabled: bool) {
        self.ripple_enabled = enabled;
    }

    /// Changes the checked state.
    ///
    /// With effects disabled the check fill snaps to its end value instead
    /// of animating.
    ///
    /// # Errors
    ///
    /// Fails only if the animator has been disposed.
    pub fn set_checked(&mut self, checked: bool) -> AnimationResult<()> {
        self.ensure_live()?;
        if checked == self.checked {
            return Ok(());
        }

        let direction = if checked { Direction::In } else { Direction::Out };
        let mut check = self.check.lock();
        check.start_with_data(direction, vec![checked])?;
        if !self.ripple_enabled {
            check.set_progress(direction.end_value())?;
        }
        self.checked = checked;
        Ok(())
    }

    /// Routes one input event.
    ///
    /// # Errors
    ///
    /// Fails only if the animator has been disposed.
    pub fn handle(&mut self, event: InputEvent) -> AnimationResult<()> {
        self.ensure_live()?;
        match event {
            InputEvent::FocusGained => {
                if self.ripple_enabled && !self.hovered {
                    self.hover.lock().start_with_data(Direction::In, vec![self.checked])?;
                    self.hovered = true;
                }
            }
            InputEvent::FocusLost => {
                if self.ripple_enabled && self.hovered {
                    self.hover.lock().start_with_data(Direction::Out, vec![self.checked])?;
                    self.hovered = false;
                }
            }
            InputEvent::PointerEnter => self.pointer = PointerState::Hover,
            InputEvent::PointerLeave => self.pointer = PointerState::Out,
            InputEvent::PointerDown => {
                if self.ripple_enabled {
                    self.press_ripple()?;
                }
                self.pointer = PointerState::Down;
            }
            InputEvent::KeyDown(Key::Space) => {
                if self.ripple_enabled && self.ripple.lock().animation_count() == 0 {
                    self.press_ripple()?;
                }
            }
            InputEvent::PointerUp => {
                if self.ripple_enabled {
                    self.pointer = PointerState::Hover;
                    self.release_ripple()?;
                    if self.hovered {
                        self.hover.lock().start_with_data(Direction::Out, vec![self.checked])?;
                        self.hovered = false;
                    }
                }
            }
            InputEvent::KeyUp(Key::Space) => {
                if self.ripple_enabled {
                    self.pointer = PointerState::Hover;
                    self.release_ripple()?;
                }
            }
            InputEvent::KeyDown(_) | InputEvent::KeyUp(_) => {}
        }
        Ok(())
    }

    /// Snapshot of everything the painter needs.
    #[must_use]
    pub fn frame(&self) -> RadioFrame {
        let check_progress = self.check.lock().progress();
        let hover_progress = self.hover.lock().progress();

        let ripple = self.ripple.lock();
        let ripples = if ripple.is_animating() {
            (0..ripple.animation_count())
                .map(|index| RippleFrame {
                    progress: ripple.progress_at(index),
                    secondary_progress: ripple.secondary_progress_at(index),
                    direction: ripple.direction(index).unwrap_or(Direction::InOutIn),
                    checked_at_start: ripple
                        .data(index)
                        .and_then(|data| data.first().copied())
                        .unwrap_or(self.checked),
                })
                .collect()
        } else {
            Vec::new()
        };

        RadioFrame {
            checked: self.checked,
            check_progress,
            hover_progress,
            ripples,
        }
    }

    /// True while any of the three effects is still moving.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.check.lock().is_animating()
            || self.hover.lock().is_animating()
            || self.ripple.lock().is_animating()
    }

    /// Returns and clears the pending-repaint flag set by progress
    /// notifications.
    pub fn take_repaint(&self) -> bool {
        self.repaint.swap(false, Ordering::AcqRel)
    }

    /// Moves all three managers to another clock.
    pub fn attach(&self, clock: &FrameClock) {
        attach_shared(&self.check, clock);
        attach_shared(&self.hover, clock);
        attach_shared(&self.ripple, clock);
    }

    /// Tears down all three managers and stops following the theme; no
    /// repaint is requested afterwards.
    pub fn dispose(&mut self) {
        self.theme = None;
        self.check.lock().dispose();
        self.hover.lock().dispose();
        self.ripple.lock().dispose();
    }

    fn press_ripple(&self) -> AnimationResult<()> {
        let mut ripple = self.ripple.lock();
        ripple.start_with_data(Direction::InOutIn, vec![self.checked])?;
        ripple.set_secondary_increment(0.0)
    }

    fn release_ripple(&self) -> AnimationResult<()> {
        let release = *self.release_increment.lock();
        self.ripple.lock().set_secondary_increment(release)
    }

    fn ensure_live(&self) -> AnimationResult<()> {
        if self.check.lock().is_disposed() {
            return Err(AnimationError::Disposed);
        }
        Ok(())
    }
}

impl std::fmt::Debug for RadioAnimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RadioAnimator")
            .field("checked", &self.checked)
            .field("hovered", &self.hovered)
            .field("ripple_enabled", &self.ripple_enabled)
            .field("pointer", &self.pointer)
            .field("follows_theme", &self.theme.is_some())
            .finish_non_exhaustive()
    }
}

fn retune(theme: &MotionTheme, name: &str, manager: &Weak<Mutex<AnimationManager<bool>>>) {
    let Some(manager) = manager.upgrade() else {
        return;
    };
    if let Err(error) = theme.retune(name, &mut *manager.lock()) {
        tracing::warn!(preset = name, %error, "failed to apply preset");
    };
}

/// Registers the repaint flag as observer and attaches to the clock.
fn wire(
    mut manager: AnimationManager<bool>,
    clock: &FrameClock,
    repaint: &Arc<AtomicBool>,
) -> SharedAnimation<bool> {
    let flag = Arc::clone(repaint);
    manager.on_progress(move |_| flag.store(true, Ordering::Release));
    manager.attach(clock)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::{AnimationConfig, Easing};

    const EPSILON: f64 = 1e-9;

    fn animator() -> (RadioAnimator, FrameClock) {
        let theme = MotionTheme::material();
        let clock = theme.clock();
        (RadioAnimator::new(&theme, &clock).unwrap(), clock)
    }

    fn run(clock: &FrameClock, ticks: usize) {
        for _ in 0..ticks {
            clock.tick();
        }
    }

    #[test]
    fn test_starts_at_rest() {
        let (radio, _clock) = animator();
        let frame = radio.frame();

        assert!(!frame.checked);
        assert_eq!(frame.check_progress, 0.0);
        assert_eq!(frame.hover_progress, 0.0);
        assert!(frame.ripples.is_empty());
        assert!(!radio.take_repaint());
    }

    #[test]
    fn test_check_fades_in_and_holds() {
        let (mut radio, clock) = animator();
        radio.set_checked(true).unwrap();

        run(&clock, 1);
        assert!(radio.take_repaint());
        let early = radio.frame().check_progress;
        assert!(early > 0.0 && early < 1.0);

        // 0.06 per tick: 17 ticks to land, then it stays held.
        run(&clock, 40);
        assert!((radio.frame().check_progress - 1.0).abs() < EPSILON);
        assert!(!radio.is_animating());
    }

    #[test]
    fn test_uncheck_fades_out() {
        let (mut radio, clock) = animator();
        radio.set_checked(true).unwrap();
        run(&clock, 40);
        radio.set_checked(false).unwrap();
        run(&clock, 40);

        assert_eq!(radio.frame().check_progress, 0.0);
        assert!(!radio.frame().checked);
    }

    #[test]
    fn test_disabled_effects_snap_check() {
        let (mut radio, clock) = animator();
        radio.set_ripple_enabled(false);
        radio.set_checked(true).unwrap();
        assert!((radio.frame().check_progress - 1.0).abs() < EPSILON);

        radio.handle(InputEvent::PointerDown).unwrap();
        run(&clock, 1);
        assert!(radio.frame().ripples.is_empty());
        assert!(radio.take_repaint());
    }

    #[test]
    fn test_press_parks_second_phase_until_release() {
        let (mut radio, clock) = animator();
        radio.handle(InputEvent::PointerDown).unwrap();
        assert_eq!(radio.pointer(), PointerState::Down);

        run(&clock, 30);
        let held = radio.frame();
        assert_eq!(held.ripples.len(), 1);
        assert!((held.ripples[0].progress - 1.0).abs() < EPSILON);
        assert_eq!(held.ripples[0].secondary_progress, 0.0);
        assert_eq!(held.ripples[0].direction, Direction::InOutIn);

        radio.handle(InputEvent::PointerUp).unwrap();
        run(&clock, 1);
        let released = radio.frame();
        assert!(released.ripples[0].secondary_progress > 0.0);

        // 0.08 per tick: 13 ticks to finish, one more to retire.
        run(&clock, 14);
        assert!(radio.frame().ripples.is_empty());
    }

    #[test]
    fn test_ripple_snapshots_checked_state() {
        let (mut radio, clock) = animator();
        radio.set_checked(true).unwrap();
        radio.handle(InputEvent::PointerDown).unwrap();
        radio.set_checked(false).unwrap();
        run(&clock, 1);

        let frame = radio.frame();
        assert!(frame.ripples[0].checked_at_start);
        assert!(!frame.checked);
    }

    #[test]
    fn test_space_only_ripples_when_idle() {
        let (mut radio, clock) = animator();
        radio.handle(InputEvent::KeyDown(Key::Space)).unwrap();
        radio.handle(InputEvent::KeyDown(Key::Space)).unwrap();
        run(&clock, 1);
        assert_eq!(radio.frame().ripples.len(), 1);

        radio.handle(InputEvent::KeyUp(Key::Space)).unwrap();
        radio.handle(InputEvent::KeyDown(Key::Enter)).unwrap();
        assert_eq!(radio.pointer(), PointerState::Hover);
    }

    #[test]
    fn test_overlapping_clicks_stack_ripples() {
        let (mut radio, clock) = animator();
        for _ in 0..3 {
            radio.handle(InputEvent::PointerDown).unwrap();
            run(&clock, 2);
        }
        assert_eq!(radio.frame().ripples.len(), 3);
    }

    #[test]
    fn test_focus_glow() {
        let (mut radio, clock) = animator();
        radio.handle(InputEvent::FocusGained).unwrap();
        run(&clock, 20);
        assert!((radio.frame().hover_progress - 1.0).abs() < EPSILON);

        radio.handle(InputEvent::FocusLost).unwrap();
        run(&clock, 20);
        assert_eq!(radio.frame().hover_progress, 0.0);
    }

    #[test]
    fn test_dispose_stops_repaints() {
        let (mut radio, clock) = animator();
        radio.set_checked(true).unwrap();
        radio.dispose();
        run(&clock, 5);

        assert!(!radio.take_repaint());
        assert!(radio.set_checked(false).is_err());
        assert_eq!(clock.subscriber_count(), 0);
    }

    #[test]
    fn test_failed_calls_leave_state_untouched() {
        let (mut radio, _clock) = animator();
        radio.dispose();

        assert_eq!(radio.set_checked(true), Err(AnimationError::Disposed));
        assert!(!radio.is_checked());

        assert_eq!(radio.handle(InputEvent::PointerDown), Err(AnimationError::Disposed));
        assert_eq!(radio.pointer(), PointerState::Out);
        assert_eq!(radio.handle(InputEvent::FocusGained), Err(AnimationError::Disposed));
        assert_eq!(radio.frame().hover_progress, 0.0);
    }

    #[test]
    fn test_attach_moves_to_new_clock() {
        let (mut radio, old_clock) = animator();
        let new_clock = FrameClock::default();
        radio.attach(&new_clock);
        radio.set_checked(true).unwrap();

        run(&old_clock, 40);
        assert_eq!(radio.frame().check_progress, 0.0);
        run(&new_clock, 40);
        assert!((radio.frame().check_progress - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_follows_theme_replacement() {
        let handle = ThemeHandle::default();
        let clock = handle.current().clock();
        let mut radio = RadioAnimator::from_handle(&handle, &clock).unwrap();
        assert_eq!(handle.observer_count(), 1);

        let snappy = MotionTheme::material()
            .with_preset(CHECK, AnimationConfig::new(Easing::Linear, 0.5).with_hold());
        handle.replace(snappy).unwrap();

        radio.set_checked(true).unwrap();
        run(&clock, 1);
        assert!((radio.frame().check_progress - 0.5).abs() < EPSILON);
        run(&clock, 1);
        assert!((radio.frame().check_progress - 1.0).abs() < EPSILON);

        radio.dispose();
        assert_eq!(handle.observer_count(), 0);
    }

    #[test]
    fn test_theme_change_keeps_held_ripple_parked() {
        let handle = ThemeHandle::default();
        let clock = handle.current().clock();
        let mut radio = RadioAnimator::from_handle(&handle, &clock).unwrap();
        radio.handle(InputEvent::PointerDown).unwrap();
        run(&clock, 12);

        let snappy = MotionTheme::material().with_preset(
            RIPPLE,
            AnimationConfig::new(Easing::Linear, 0.5)
                .with_secondary_increment(0.5)
                .with_multiple(),
        );
        handle.replace(snappy).unwrap();
        run(&clock, 5);
        assert_eq!(radio.frame().ripples[0].secondary_progress, 0.0);

        radio.handle(InputEvent::PointerUp).unwrap();
        run(&clock, 1);
        assert!((radio.frame().ripples[0].secondary_progress - 0.5).abs() < EPSILON);
        run(&clock, 2);
        assert!(radio.frame().ripples.is_empty());
    }

    #[test]
    fn test_dropped_radio_stops_following() {
        let handle = ThemeHandle::default();
        let clock = handle.current().clock();
        let radio = RadioAnimator::from_handle(&handle, &clock).unwrap();
        drop(radio);

        assert_eq!(handle.observer_count(), 0);
        assert!(handle.replace(MotionTheme::material()).is_ok());
    }
}

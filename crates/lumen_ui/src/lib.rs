//! # Lumen UI Motion
//!
//! Host-side pieces that embed the [`lumen_core`] engine into controls:
//!
//! - [`MotionTheme`] / [`ThemeHandle`]: animation presets loaded from TOML
//!   and injected explicitly into each control, with change observers.
//!   Controls built with `from_handle` follow theme replacement.
//! - [`RadioAnimator`]: check, hover and ripple motion of a radio button.
//! - [`DrawerAnimator`]: overlay fade and icon burst of a navigation drawer.
//!
//! Painting, layout and window management belong to the host toolkit;
//! these types only turn input events into progress values.
//!
//! ## Example
//!
//! ```rust
//! use lumen_ui::{InputEvent, MotionTheme, RadioAnimator};
//!
//! let theme = MotionTheme::material();
//! let clock = theme.clock();
//! let mut radio = RadioAnimator::new(&theme, &clock)?;
//!
//! radio.handle(InputEvent::PointerDown)?;
//! radio.set_checked(true)?;
//! clock.tick();
//!
//! if radio.take_repaint() {
//!     let frame = radio.frame();
//!     assert_eq!(frame.ripples.len(), 1);
//! }
//! # Ok::<(), lumen_core::AnimationError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod drawer;
pub mod input;
pub mod radio;
pub mod theme;

pub use drawer::{DrawerAnimator, OVERLAY_MAX_OPACITY};
pub use input::{InputEvent, Key, PointerState};
pub use radio::{RadioAnimator, RadioFrame, RippleFrame};
pub use theme::{MotionTheme, ObserverId, ThemeHandle, ThemeObserver};

//! # Lumen Animation Core
//!
//! Timer-driven progress engine behind every animated control in Lumen:
//! check-state fades, hover glows and ripple bursts all run on an
//! [`AnimationManager`] fed by a host-owned [`FrameClock`].
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    ANIMATION PIPELINE                     │
//! ├──────────────────────────────────────────────────────────┤
//! │  Input Event → start() → FrameClock tick → on_progress   │
//! │       ↓             ↓            ↓               ↓        │
//! │  Host control   Instance    Advance/Retire    Repaint     │
//! │                              (batched)      progress()    │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use lumen_core::{AnimationConfig, AnimationManager, Direction, Easing, FrameClock};
//!
//! let clock = FrameClock::default();
//! let mut fade: AnimationManager =
//!     AnimationManager::new(AnimationConfig::new(Easing::EaseInOut, 0.25))?;
//! fade.on_progress(|manager| println!("repaint at {:.2}", manager.progress()));
//!
//! let fade = fade.attach(&clock);
//! fade.lock().start(Direction::In)?;
//! for _ in 0..4 {
//!     clock.tick();
//! }
//! assert!((fade.lock().progress() - 1.0).abs() < 1e-9);
//! # Ok::<(), lumen_core::AnimationError>(())
//! ```
//!
//! ## Threading
//!
//! Everything runs on the host's UI thread. Observers receive the manager
//! by shared reference and must not tick the clock that drives them.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod clock;
pub mod config;
pub mod easing;
pub mod error;
pub mod instance;
pub mod manager;

pub use clock::{
    attach_shared, ClockSubscription, FrameClock, SharedAnimation, TickTarget,
    DEFAULT_TICK_RATE_HZ,
};
pub use config::AnimationConfig;
pub use easing::Easing;
pub use error::{AnimationError, AnimationResult};
pub use instance::{AnimationInstance, Direction};
pub use manager::{AnimationManager, ProgressCallback};

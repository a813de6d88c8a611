//! Input events a host forwards to animated controls.
//!
//! Only the events that start or steer animations are modelled; hit
//! testing and cursor handling stay with the host toolkit.

/// Keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Space bar.
    Space,
    /// Enter/Return key.
    Enter,
    /// Tab key.
    Tab,
    /// Escape key.
    Escape,
    /// Any key the controls ignore.
    Other,
}

/// Input event relevant to control animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEvent {
    /// Keyboard focus moved onto the control.
    FocusGained,
    /// Keyboard focus left the control.
    FocusLost,
    /// Pointer entered the control bounds.
    PointerEnter,
    /// Pointer left the control bounds.
    PointerLeave,
    /// Primary pointer button pressed over the control.
    PointerDown,
    /// Primary pointer button released.
    PointerUp,
    /// Key pressed while focused.
    KeyDown(Key),
    /// Key released while focused.
    KeyUp(Key),
}

/// Coarse pointer state of a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerState {
    /// Pointer is elsewhere.
    #[default]
    Out,
    /// Pointer is over the control.
    Hover,
    /// Pointer button is held on the control.
    Down,
}

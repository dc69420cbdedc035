use std::time::Duration;

use crossterm::event::Event as CrosstermEvent;

/// Events processed by TUI applications.
#[derive(Debug, Clone, derive_more::From)]
pub(super) enum TuiEvent {
    /// Game logic update, carrying the time since the previous tick.
    #[from(ignore)]
    Tick(Duration),
    /// Screen render timing.
    #[from(ignore)]
    Render,
    /// Terminal events such as key input, mouse, and resize.
    Crossterm(CrosstermEvent),
}

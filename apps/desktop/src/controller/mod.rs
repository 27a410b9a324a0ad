//! Controller layer: view state machine, UI events, and demo-mode fallback.

pub mod app;
pub mod events;
pub mod state;

pub use app::StoryApp;

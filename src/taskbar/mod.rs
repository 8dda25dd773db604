//! Taskbar state detection and appearance
//!
//! - [`directory`] finds the taskbar of every display
//! - [`classifier`] decides which windows count
//! - [`resolver`] classifies every monitor once per pass
//! - [`appearance`] turns a classification into an accent policy
//! - [`peek`] hides or shows the peek button
//! - [`aero_peek`] tracks the Aero Peek gesture

pub mod accent;
pub mod aero_peek;
pub mod appearance;
pub mod classifier;
pub mod directory;
pub mod peek;
pub mod resolver;
pub mod state;

#[cfg(test)]
mod tests;

pub use accent::{AccentMode, AccentPolicy};
pub use aero_peek::AeroPeekObserver;
pub use appearance::{appearance_for, AppearanceApplier, ApplyOutcome};
pub use directory::{TaskbarDirectory, TaskbarEntry};
pub use peek::{PeekOutcome, PeekToggle};
pub use resolver::{MonitorStateResolver, Resolution};
pub use state::MonitorState;

//! Win32 backend
//!
//! - [`Win32WindowSystem`]: the live [`WindowSystem`](crate::os::WindowSystem)
//! - [`AeroPeekHook`]: Aero Peek start and end events
//! - [`MessageWindow`]: display changes, shell restarts, exit requests
//! - [`InstanceGuard`]: one running instance at a time

pub mod composition;
pub mod event_hook;
pub mod instance;
pub mod message_window;
pub mod system;

pub use composition::CompositionApi;
pub use event_hook::AeroPeekHook;
pub use instance::InstanceGuard;
pub use message_window::MessageWindow;
pub use system::Win32WindowSystem;

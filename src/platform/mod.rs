//! Platform abstraction layer
//!
//! Handles the frontend-facing pieces the simulation never sees:
//! - Input events and key mapping
//! - Frame pacing

pub mod clock;
pub mod input;

pub use clock::FrameClock;
pub use input::{Action, InputEvent, InputState, Key};

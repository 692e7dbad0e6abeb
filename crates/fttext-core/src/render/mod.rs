//! The scrolling frame renderer.
//!
//! Measures the text once, then either sends a single static frame or sweeps
//! the text from off-screen right to off-screen left, one pixel per frame.
//! Cancellation comes in through a `watch` channel and is checked before
//! every frame and before every new sweep.

mod renderer;
mod state;

pub use renderer::{RenderOutcome, RenderReport, ScrollRenderer};
pub use state::ScrollState;

//! Frame timing.
//!
//! One [`FrameClock`] per window, ticked once per presented frame.
//! [`FpsCounter`] turns the deltas into periodic frame-rate reports.

mod fps;
mod frame_clock;

pub use fps::FpsCounter;
pub use frame_clock::{FrameClock, FrameTime};

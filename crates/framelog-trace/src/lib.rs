//! Turns a recorded event log into readable output.
//!
//! [`reconstruct`] replays an event log once, tracking scope nesting from the
//! scope-open and scope-close call names and diffing each state snapshot
//! against the last one seen at the same depth. [`render`] then walks the
//! resulting [`RenderPlan`](framelog_types::RenderPlan) into a host
//! [`Console`], appends a picture of the drawing surface and a statistics
//! block.

mod console;
mod reconstruct;
mod render;

pub use console::*;
pub use reconstruct::*;
pub use render::*;

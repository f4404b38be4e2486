//! Data model shared by the framelog runtime and trace pipeline.
//!
//! Everything recorded during a profiling session is expressed with these
//! types: opaque [`Value`]s, [`StateSnapshot`]s of a target's scalar
//! properties, [`CallRecord`]s, the tagged [`Event`] log entries, and the
//! [`RenderPlan`] that reconstruction hands to a renderer.

mod error;
mod event;
mod plan;
mod snapshot;
mod value;

pub use error::*;
pub use event::*;
pub use plan::*;
pub use snapshot::*;
pub use value::*;

//! Records everything a drawing context does during a profiling session.
//!
//! A target exposes its callable members through a swappable
//! [`MethodTable`] and its scalar properties through the [`Instrumentable`]
//! capability trait. Starting a [`Session`] replaces every member with a
//! recording wrapper; each wrapped call appends a state snapshot and a call
//! record to the session's [`EventLog`] before delegating to the original.
//! Ending the session puts every original member back.

mod config;
mod interceptor;
mod journal;
mod methods;
mod session;
mod snapshotter;

pub use config::*;
pub use interceptor::*;
pub use journal::*;
pub use methods::*;
pub use session::*;
pub use snapshotter::*;

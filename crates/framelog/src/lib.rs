//! Frame-level call and state tracing for drawing contexts.
//!
//! framelog wraps every callable member of a drawing context, records a
//! snapshot of its scalar state before each call, and after one frame turns
//! that log into a nested, readable trace: scope groups opened by `save` and
//! closed by `restore`, the call signatures, and only the fields that changed
//! within each scope.
//!
//! # Using this crate
//!
//! Implement [`Instrumentable`] for the context (expose its members through a
//! [`MethodTable`] and its properties by name) and [`SurfaceSnapshot`] for the
//! surface that owns it, then profile one frame:
//!
//! ```rust,ignore
//! let mut frames = framelog::IntervalFrames::sixty_hz();
//! let mut console = framelog::TextConsole::new(std::io::stdout());
//! framelog::profile_frame(
//!     &mut ctx,
//!     &framelog::ProfilerConfig::from_env(),
//!     &mut frames,
//!     &mut console,
//!     |ctx| {
//!         ctx.call("save", &[])?;
//!         ctx.call("fillRect", &[0.into(), 0.into(), 10.into(), 10.into()])?;
//!         ctx.call("restore", &[])?;
//!         Ok(())
//!     },
//! )
//! .await?;
//! ```
//!
//! # Configuration
//!
//! | Variable | Effect |
//! |---|---|
//! | `FRAMELOG_SCOPE_OPEN` | call name that opens a nested scope (default `save`) |
//! | `FRAMELOG_SCOPE_CLOSE` | call name that closes it (default `restore`) |
//! | `FRAMELOG_FIELDS` | comma-separated property names to track instead of discovering them |
//! | `FRAMELOG_IMAGE_SCALE` | display scale of the surface snapshot (default `1`) |

mod frame;

pub use frame::*;
pub use framelog_runtime::*;
pub use framelog_trace::*;
pub use framelog_types::*;

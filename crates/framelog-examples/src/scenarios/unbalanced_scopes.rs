use framelog::{Instrumentable, Session, TraceError};

use super::rect;
use crate::canvas::Canvas2d;

/// One `restore` too many, then two `save`s that are never closed.
pub fn draw(ctx: &mut Session<'_, Canvas2d>) -> Result<(), TraceError> {
    ctx.call("save", &[])?;
    ctx.set("fillStyle", "purple");
    ctx.call("fillRect", &rect(0.0, 0.0, 16.0, 16.0))?;
    ctx.call("restore", &[])?;
    ctx.call("restore", &[])?;

    ctx.set("fillStyle", "yellow");
    ctx.call("fillRect", &rect(16.0, 0.0, 16.0, 16.0))?;
    ctx.call("save", &[])?;
    ctx.call("save", &[])?;
    ctx.set("globalAlpha", 0.5);
    ctx.call("fillRect", &rect(32.0, 0.0, 16.0, 16.0))?;
    Ok(())
}

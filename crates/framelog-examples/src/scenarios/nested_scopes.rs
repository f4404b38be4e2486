use framelog::{Instrumentable, Session, TraceError};

use super::rect;
use crate::canvas::Canvas2d;

/// Background, then a translated card with a framed badge two scopes deep.
pub fn draw(ctx: &mut Session<'_, Canvas2d>) -> Result<(), TraceError> {
    ctx.set("fillStyle", "#eeeeee");
    ctx.call("fillRect", &rect(0.0, 0.0, 64.0, 48.0))?;

    ctx.call("save", &[])?;
    ctx.call("translate", &[8.0.into(), 8.0.into()])?;
    ctx.set("fillStyle", "#3366cc");
    ctx.call("fillRect", &rect(0.0, 0.0, 40.0, 24.0))?;

    ctx.call("save", &[])?;
    ctx.set("strokeStyle", "orange");
    ctx.set("lineWidth", 3.0);
    ctx.call("strokeRect", &rect(4.0, 4.0, 12.0, 12.0))?;
    ctx.call("restore", &[])?;

    ctx.call("fillRect", &rect(20.0, 4.0, 12.0, 12.0))?;
    ctx.call("restore", &[])?;

    ctx.call("fillRect", &rect(52.0, 36.0, 8.0, 8.0))?;
    Ok(())
}

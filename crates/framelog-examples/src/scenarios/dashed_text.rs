use framelog::{Instrumentable, Session, TraceError, Value};

use super::rect;
use crate::canvas::Canvas2d;

/// Dashed outline around a label, exercising list-valued arguments.
pub fn draw(ctx: &mut Session<'_, Canvas2d>) -> Result<(), TraceError> {
    ctx.call("setLineDash", &[Value::Numbers(vec![4.0, 2.0])])?;
    ctx.call("getLineDash", &[])?;
    ctx.call("beginPath", &[])?;
    ctx.call("rect", &rect(6.0, 6.0, 52.0, 20.0))?;
    ctx.call("stroke", &[])?;

    ctx.set("font", "bold 12px monospace");
    ctx.set("textAlign", "center");
    ctx.call("measureText", &["framelog".into()])?;
    ctx.call("fillText", &["framelog".into(), 32.0.into(), 20.0.into()])?;
    Ok(())
}

use framelog::{Instrumentable, Session, TraceError};

use super::rect;
use crate::canvas::Canvas2d;

const SWATCHES: &[(&str, f64)] = &[
    ("red", 1.0),
    ("green", 0.75),
    ("blue", 0.5),
    ("#000", 0.25),
];

/// A strip of swatches, each changing fill and alpha before drawing.
pub fn draw(ctx: &mut Session<'_, Canvas2d>) -> Result<(), TraceError> {
    ctx.call("clearRect", &rect(0.0, 0.0, 64.0, 48.0))?;
    for (i, (color, alpha)) in SWATCHES.iter().enumerate() {
        ctx.set("fillStyle", *color);
        ctx.set("globalAlpha", *alpha);
        let x = 4.0 + i as f64 * 14.0;
        ctx.call("fillRect", &rect(x, 12.0, 12.0, 24.0))?;
    }
    Ok(())
}

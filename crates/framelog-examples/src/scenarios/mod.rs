use framelog::{Session, TraceError, Value};

use crate::canvas::Canvas2d;

pub mod dashed_text;
pub mod nested_scopes;
pub mod style_churn;
pub mod unbalanced_scopes;

/// Issues one frame's worth of drawing against an instrumented canvas.
pub type Draw = fn(&mut Session<'_, Canvas2d>) -> Result<(), TraceError>;

/// Arguments of a rectangle call: `x, y, width, height`.
pub fn rect(x: f64, y: f64, w: f64, h: f64) -> [Value; 4] {
    [x.into(), y.into(), w.into(), h.into()]
}

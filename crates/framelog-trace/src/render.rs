use std::future::Future;

use framelog_types::{
    CollaboratorError, LogLine, RenderInstruction, RenderPlan, TraceError, TraceStats,
};

use crate::Console;

pub const STATISTICS_LABEL: &str = "Statistics";

/// An encoded picture of a drawing surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub mime: String,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

/// The drawable surface that owns an instrumented context.
pub trait SurfaceSnapshot {
    /// Encodes the surface's current contents. Resolves once the image is ready.
    fn snapshot(&self) -> impl Future<Output = Result<EncodedImage, CollaboratorError>> + Send;
}

/// Walks `plan` into `console`, then shows the surface and the statistics block.
///
/// Group opens and closes are forwarded exactly as planned; an unbalanced plan
/// stays unbalanced. Console and snapshot failures are returned as-is inside
/// [`TraceError::Collaborator`].
pub async fn render<S, C>(
    plan: &RenderPlan,
    surface: &S,
    console: &mut C,
    scale: f64,
) -> Result<TraceStats, TraceError>
where
    S: SurfaceSnapshot + ?Sized,
    C: Console + ?Sized,
{
    for instruction in &plan.instructions {
        match instruction {
            RenderInstruction::OpenGroup { label, collapsed } => console.group(label, *collapsed)?,
            RenderInstruction::Line(line) => console.log(&line.segments)?,
            RenderInstruction::CloseGroup => console.group_end()?,
        }
    }

    let image = surface.snapshot().await?;
    console.image(&image, scale)?;

    console.group(STATISTICS_LABEL, false)?;
    console.log(&LogLine::field("calls", plan.stats.calls).segments)?;
    console.log(&LogLine::field("changed fields", plan.stats.changed_fields).segments)?;
    console.group_end()?;

    Ok(plan.stats)
}

use std::future::Future;
use std::time::{Duration, Instant};

use framelog_runtime::{Instrumentable, ProfilerConfig, Session};
use framelog_trace::{Console, SurfaceSnapshot, render};
use framelog_types::{RenderPlan, TraceError};
use tokio::time::{Interval, MissedTickBehavior};
use tracing::debug;

/// A frame boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTick {
    pub index: u64,
    pub at: Instant,
}

/// Source of animation-frame boundaries.
pub trait FrameSource {
    /// Resolves at the next frame boundary.
    fn next_frame(&mut self) -> impl Future<Output = FrameTick> + Send;
}

/// Frame boundaries on a fixed Tokio interval.
pub struct IntervalFrames {
    interval: Interval,
    index: u64,
}

impl IntervalFrames {
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval, index: 0 }
    }

    pub fn sixty_hz() -> Self {
        Self::new(Duration::from_micros(16_667))
    }
}

impl FrameSource for IntervalFrames {
    async fn next_frame(&mut self) -> FrameTick {
        let at = self.interval.tick().await;
        self.index += 1;
        FrameTick {
            index: self.index,
            at: at.into_std(),
        }
    }
}

/// Frame boundaries that arrive as soon as the scheduler runs again.
#[derive(Debug, Default)]
pub struct ManualFrames {
    index: u64,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameSource for ManualFrames {
    async fn next_frame(&mut self) -> FrameTick {
        tokio::task::yield_now().await;
        self.index += 1;
        FrameTick {
            index: self.index,
            at: Instant::now(),
        }
    }
}

/// What one profiled frame produced.
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub frame: u64,
    pub plan: RenderPlan,
    pub elapsed: Duration,
}

/// Profiles the draw calls issued during one frame and renders the trace.
///
/// `draw` runs synchronously against the instrumented target. Collection
/// stops at the next frame boundary from `frames`; the target is restored,
/// the log reconstructed, and the trace rendered into `console` followed by
/// a snapshot of the target's surface.
pub async fn profile_frame<T, Fs, C, F>(
    target: &mut T,
    config: &ProfilerConfig,
    frames: &mut Fs,
    console: &mut C,
    draw: F,
) -> Result<FrameReport, TraceError>
where
    T: Instrumentable + SurfaceSnapshot,
    Fs: FrameSource,
    C: Console + ?Sized,
    F: FnOnce(&mut Session<'_, T>) -> Result<(), TraceError>,
{
    let mut session = Session::start(target, config)?;
    draw(&mut session)?;

    let tick = frames.next_frame().await;
    session.mark_frame();
    session.end()?;
    let plan = session.trace()?;
    let elapsed = session.elapsed();
    drop(session);

    debug!(
        frame = tick.index,
        calls = plan.stats.calls,
        changed_fields = plan.stats.changed_fields,
        "frame trace reconstructed"
    );

    render(&plan, &*target, console, config.image_scale).await?;
    Ok(FrameReport {
        frame: tick.index,
        plan,
        elapsed,
    })
}

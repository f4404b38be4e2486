use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::{Duration, Instant};

use framelog_trace::reconstruct;
use framelog_types::{CallRecord, Event, RenderPlan, TraceError, Value};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::interceptor::instrument;
use crate::{EventLog, Instrumentable, Instrumentation, ProfilerConfig, StateSnapshotter};

/// State shared between a session and the wrappers it installed.
#[derive(Debug)]
pub(crate) struct Recorder {
    snapshotter: StateSnapshotter,
    log: EventLog,
    recording: bool,
    fault: Option<TraceError>,
}

impl Recorder {
    fn new(snapshotter: StateSnapshotter) -> Self {
        Self {
            snapshotter,
            log: EventLog::new(),
            recording: true,
            fault: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Self::new(StateSnapshotter::default())
    }

    #[cfg(test)]
    pub(crate) fn events(&self) -> &[Event] {
        self.log.as_slice()
    }

    #[cfg(test)]
    pub(crate) fn fault(&self) -> Option<&TraceError> {
        self.fault.as_ref()
    }

    #[cfg(test)]
    pub(crate) fn is_recording(&self) -> bool {
        self.recording
    }

    /// Appends a snapshot. A failed capture is fatal: it is kept as the
    /// session's fault and nothing is recorded after it.
    fn record_state<T: Instrumentable>(&mut self, target: &T) -> bool {
        match self.snapshotter.capture(target) {
            Ok(snapshot) => {
                self.log.append(Event::State(snapshot));
                true
            }
            Err(err) => {
                warn!(error = %err, "state capture failed; recording stopped");
                self.fault.get_or_insert(err);
                self.recording = false;
                false
            }
        }
    }

    /// Snapshot first, then the call itself.
    pub(crate) fn record_call<T: Instrumentable>(
        &mut self,
        target: &T,
        name: &str,
        args: &[Value],
    ) {
        if !self.recording || !self.record_state(target) {
            return;
        }
        let position = self.log.len();
        self.log.append(Event::Call(CallRecord {
            name: name.to_owned(),
            args: args.to_vec(),
            position,
        }));
    }
}

/// One profiling session over a borrowed target.
///
/// The session dereferences to the target, so code keeps driving it exactly
/// as before while every call is recorded. [`Session::end`] is one-way.
/// Dropping a session that was never ended still restores the target.
pub struct Session<'a, T: Instrumentable> {
    target: &'a mut T,
    recorder: Arc<Mutex<Recorder>>,
    instrumentation: Instrumentation,
    config: ProfilerConfig,
    started_at: Instant,
    frames: u64,
    running: bool,
    log: Option<EventLog>,
}

impl<'a, T: Instrumentable> Session<'a, T> {
    /// Discovers the target's state keys, records the initial snapshot and
    /// wraps every callable member.
    pub fn start(target: &'a mut T, config: &ProfilerConfig) -> Result<Self, TraceError> {
        let mut snapshotter = StateSnapshotter::new(config.schema.clone());
        let initial = snapshotter.discover(&*target);
        let keys = initial.len();

        let mut recorder = Recorder::new(snapshotter);
        recorder.log.append(Event::State(initial));
        let recorder = Arc::new(Mutex::new(recorder));

        let instrumentation = instrument(target, &recorder)?;
        debug!(
            keys,
            members = instrumentation.wrapped().len(),
            "profiling session started"
        );

        Ok(Self {
            target,
            recorder,
            instrumentation,
            config: config.clone(),
            started_at: Instant::now(),
            frames: 0,
            running: true,
            log: None,
        })
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Counts a frame boundary observed while the session was open.
    pub fn mark_frame(&mut self) -> u64 {
        self.frames += 1;
        self.frames
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn config(&self) -> &ProfilerConfig {
        &self.config
    }

    /// Stops recording and restores the target.
    ///
    /// A closing snapshot is appended so the effects of the last call show up
    /// in the trace. Faults raised inside wrappers are returned here.
    pub fn end(&mut self) -> Result<(), TraceError> {
        if !self.running {
            return Err(TraceError::DoubleEndSession);
        }
        self.running = false;
        self.instrumentation.restore(&mut *self.target);

        let mut recorder = self.recorder.lock();
        if recorder.recording {
            recorder.record_state(&*self.target);
        }
        recorder.recording = false;
        let log = std::mem::take(&mut recorder.log);
        let fault = recorder.fault.take();
        drop(recorder);

        debug!(
            events = log.len(),
            frames = self.frames,
            elapsed_ms = self.started_at.elapsed().as_millis() as u64,
            "profiling session ended"
        );
        self.log = Some(log);

        match fault {
            Some(fault) => Err(fault),
            None => Ok(()),
        }
    }

    /// The recorded log. Empty until the session has ended.
    pub fn events(&self) -> &[Event] {
        self.log.as_ref().map(EventLog::as_slice).unwrap_or(&[])
    }

    /// Reconstructs the trace from the recorded log.
    pub fn trace(&self) -> Result<RenderPlan, TraceError> {
        let log = self.log.as_ref().ok_or(TraceError::SessionStillRunning)?;
        Ok(reconstruct(log.as_slice(), &self.config.reconstruct))
    }

    /// Ends the session if needed and hands back the recorded log.
    ///
    /// The log is returned even when ending surfaces a fault; it then holds
    /// everything recorded before the fault.
    pub fn into_log(mut self) -> (EventLog, Option<TraceError>) {
        let fault = if self.running { self.end().err() } else { None };
        (self.log.take().unwrap_or_default(), fault)
    }
}

impl<T: Instrumentable> Deref for Session<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &*self.target
    }
}

impl<T: Instrumentable> DerefMut for Session<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut *self.target
    }
}

impl<T: Instrumentable> Drop for Session<'_, T> {
    fn drop(&mut self) {
        if self.running {
            self.running = false;
            self.instrumentation.restore(&mut *self.target);
            self.recorder.lock().recording = false;
            debug!("profiling session dropped without end; target restored");
        }
    }
}

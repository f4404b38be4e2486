use std::sync::Arc;

use framelog_types::{TraceError, Value};
use parking_lot::Mutex;
use tracing::debug;

use crate::session::Recorder;
use crate::{Instrumentable, Method};

/// Prefix under which the interceptor parks each original member while it is wrapped.
pub const ALIAS_PREFIX: &str = "__framelog_original__";

pub fn alias_for(name: &str) -> String {
    format!("{ALIAS_PREFIX}{name}")
}

/// Record of which members were wrapped, used to put the originals back.
#[derive(Debug)]
pub struct Instrumentation {
    wrapped: Vec<String>,
    restored: bool,
}

/// Wraps every member currently in the target's method table.
///
/// Members added afterwards stay unwrapped. Fails without touching the
/// target if any alias name is already taken.
pub(crate) fn instrument<T: Instrumentable>(
    target: &mut T,
    recorder: &Arc<Mutex<Recorder>>,
) -> Result<Instrumentation, TraceError> {
    let names: Vec<String> = target.methods().names().map(str::to_owned).collect();

    for name in &names {
        let alias = alias_for(name);
        if target.methods().contains(&alias) {
            return Err(TraceError::InstrumentationNameCollision {
                member: name.clone(),
                alias,
            });
        }
    }

    let table = target.methods_mut();
    for name in &names {
        let Some(original) = table.get(name).cloned() else {
            continue;
        };
        table.insert(alias_for(name), original.clone());
        table.insert(name.clone(), wrap(name.clone(), original, Arc::clone(recorder)));
    }

    debug!(members = names.len(), "instrumented target");
    Ok(Instrumentation {
        wrapped: names,
        restored: false,
    })
}

fn wrap<T: Instrumentable>(
    name: String,
    original: Method<T>,
    recorder: Arc<Mutex<Recorder>>,
) -> Method<T> {
    Method::new(move |target: &mut T, args: &[Value]| {
        // the lock is released before the original runs, so it may re-enter the table
        recorder.lock().record_call(&*target, &name, args);
        original.invoke(target, args)
    })
}

impl Instrumentation {
    /// Names of the wrapped members.
    pub fn wrapped(&self) -> &[String] {
        &self.wrapped
    }

    pub fn is_restored(&self) -> bool {
        self.restored
    }

    /// Puts every original member back and removes every alias. Later calls are no-ops.
    pub fn restore<T: Instrumentable>(&mut self, target: &mut T) {
        if self.restored {
            return;
        }
        let table = target.methods_mut();
        for name in &self.wrapped {
            if let Some(original) = table.remove(&alias_for(name)) {
                table.insert(name.clone(), original);
            }
        }
        self.restored = true;
        debug!(members = self.wrapped.len(), "restored target");
    }
}

use std::collections::HashSet;

use framelog_types::{StateSnapshot, TraceError, Value};

use crate::Instrumentable;

/// Which property names a session tracks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SnapshotSchema {
    /// Reflect over the target once and keep every number- or string-valued property.
    #[default]
    Discover,
    /// Track exactly these names.
    Fields(Vec<String>),
}

impl SnapshotSchema {
    /// Parses a comma-separated field list. `None` if it names no fields.
    pub fn from_list(raw: &str) -> Option<Self> {
        let fields: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_owned)
            .collect();
        (!fields.is_empty()).then_some(Self::Fields(fields))
    }
}

/// Extracts scalar state from a target, caching the canonical key list
/// after the first pass.
#[derive(Debug, Clone, Default)]
pub struct StateSnapshotter {
    schema: SnapshotSchema,
    keys: Option<Vec<String>>,
}

impl StateSnapshotter {
    pub fn new(schema: SnapshotSchema) -> Self {
        Self { schema, keys: None }
    }

    /// Canonical key list, once discovered.
    pub fn keys(&self) -> Option<&[String]> {
        self.keys.as_deref()
    }

    /// Discovers keys on first use, reads the cached keys afterwards.
    pub fn capture_state<T: Instrumentable>(&mut self, target: &T) -> StateSnapshot {
        match self.capture(target) {
            Ok(snapshot) => snapshot,
            Err(_) => self.discover(target),
        }
    }

    /// Fixes the canonical key list and returns the first snapshot, in
    /// declaration order.
    pub fn discover<T: Instrumentable>(&mut self, target: &T) -> StateSnapshot {
        let snapshot = match &self.schema {
            SnapshotSchema::Discover => {
                let mut seen = HashSet::new();
                let mut snapshot = StateSnapshot::new();
                for field in target.properties() {
                    // shadowed names are listed once
                    if field.value.is_scalar() && seen.insert(field.name.clone()) {
                        snapshot.push(field.name, field.value);
                    }
                }
                snapshot
            }
            SnapshotSchema::Fields(names) => {
                let mut snapshot = StateSnapshot::with_capacity(names.len());
                for name in names {
                    snapshot.push(name.clone(), read(target, name));
                }
                snapshot
            }
        };

        self.keys = Some(snapshot.names().map(str::to_owned).collect());
        snapshot
    }

    /// Reads current values for the cached keys, walking them in reverse
    /// insertion order. Only the key set is guaranteed, not its order.
    pub fn capture<T: Instrumentable>(&self, target: &T) -> Result<StateSnapshot, TraceError> {
        let keys = self.keys.as_ref().ok_or(TraceError::MissingCanonicalKeys)?;
        let mut snapshot = StateSnapshot::with_capacity(keys.len());
        for name in keys.iter().rev() {
            snapshot.push(name.clone(), read(target, name));
        }
        Ok(snapshot)
    }
}

fn read<T: Instrumentable>(target: &T, name: &str) -> Value {
    target.property(name).unwrap_or(Value::Undefined)
}

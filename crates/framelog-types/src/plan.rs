use facet::Facet;

/// Style hint attached to a piece of a log line. Consoles decide how to show it.
#[derive(Facet, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
#[facet(rename_all = "snake_case")]
pub enum Tone {
    Plain,
    Call,
    Key,
    Value,
    Changed,
}

#[derive(Facet, Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub tone: Tone,
}

impl Segment {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

/// A single styled line of trace output.
#[derive(Facet, Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub segments: Vec<Segment>,
}

impl LogLine {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment::new(text, Tone::Plain)],
        }
    }

    pub fn call(signature: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment::new(signature, Tone::Call)],
        }
    }

    /// `key = value` as listed in the initial state group.
    pub fn field(name: &str, value: impl ToString) -> Self {
        Self {
            segments: vec![
                Segment::new(name, Tone::Key),
                Segment::new(" = ", Tone::Plain),
                Segment::new(value.to_string(), Tone::Value),
            ],
        }
    }

    /// `key = value` for a field that changed since the scope's last snapshot.
    pub fn changed(name: &str, value: impl ToString) -> Self {
        Self {
            segments: vec![
                Segment::new(name, Tone::Key),
                Segment::new(" = ", Tone::Plain),
                Segment::new(value.to_string(), Tone::Changed),
            ],
        }
    }

    /// The line with all style hints dropped.
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

#[derive(Facet, Debug, Clone, PartialEq, Eq)]
#[repr(u8)]
#[facet(rename_all = "snake_case")]
pub enum RenderInstruction {
    OpenGroup { label: String, collapsed: bool },
    Line(LogLine),
    CloseGroup,
}

#[derive(Facet, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TraceStats {
    /// Number of intercepted calls.
    pub calls: u64,
    /// Number of changed-field lines emitted, summed over all snapshots.
    pub changed_fields: u64,
}

/// Scope nesting that did not balance. Recorded, never corrected.
#[derive(Facet, Debug, Clone, PartialEq, Eq)]
#[repr(u8)]
#[facet(rename_all = "snake_case")]
pub enum ScopeAnomaly {
    /// A scope-close call dropped the depth below the root scope.
    UnmatchedClose { position: usize, depth: i64 },
    /// The log ended with scopes still open.
    UnmatchedOpen { depth: i64 },
}

/// Ordered render instructions produced by reconstructing one event log.
#[derive(Facet, Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderPlan {
    pub instructions: Vec<RenderInstruction>,
    pub stats: TraceStats,
    pub anomalies: Vec<ScopeAnomaly>,
}

impl RenderPlan {
    pub fn lines(&self) -> impl Iterator<Item = &LogLine> {
        self.instructions.iter().filter_map(|instruction| match instruction {
            RenderInstruction::Line(line) => Some(line),
            _ => None,
        })
    }

    pub fn open_groups(&self) -> usize {
        self.instructions
            .iter()
            .filter(|i| matches!(i, RenderInstruction::OpenGroup { .. }))
            .count()
    }

    pub fn close_groups(&self) -> usize {
        self.instructions
            .iter()
            .filter(|i| matches!(i, RenderInstruction::CloseGroup))
            .count()
    }
}

use facet::Facet;

use crate::{StateSnapshot, Value};

/// A recorded invocation of a callable member.
#[derive(Facet, Debug, Clone, PartialEq)]
pub struct CallRecord {
    /// Member name as it was looked up on the target.
    pub name: String,

    /// Arguments in call order, exactly as passed.
    pub args: Vec<Value>,

    /// Index of this call's event in the event log.
    pub position: usize,
}

impl CallRecord {
    /// Renders the call as `name(arg1, arg2, ...)`.
    pub fn signature(&self) -> String {
        let args = self
            .args
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({args})", self.name)
    }
}

/// One entry in a session's event log.
///
/// A `State` event precedes every `Call` event, and one extra `State` event
/// opens the log at session start.
#[derive(Facet, Debug, Clone, PartialEq)]
#[repr(u8)]
#[facet(rename_all = "snake_case")]
pub enum Event {
    State(StateSnapshot),
    Call(CallRecord),
}

impl Event {
    pub fn as_call(&self) -> Option<&CallRecord> {
        match self {
            Self::Call(call) => Some(call),
            Self::State(_) => None,
        }
    }

    pub fn as_state(&self) -> Option<&StateSnapshot> {
        match self {
            Self::State(state) => Some(state),
            Self::Call(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_keeps_argument_order_and_literals() {
        let call = CallRecord {
            name: "fillRect".into(),
            args: vec![0.into(), 0.into(), 10.into(), 10.into()],
            position: 1,
        };
        assert_eq!(call.signature(), "fillRect(0, 0, 10, 10)");
    }

    #[test]
    fn signature_without_arguments() {
        let call = CallRecord {
            name: "save".into(),
            args: Vec::new(),
            position: 3,
        };
        assert_eq!(call.signature(), "save()");
    }
}

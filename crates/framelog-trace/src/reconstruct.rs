use std::collections::HashMap;

use framelog_types::{Event, LogLine, RenderInstruction, RenderPlan, ScopeAnomaly, StateSnapshot};
use tracing::warn;

pub const DEFAULT_SCOPE_OPEN: &str = "save";
pub const DEFAULT_SCOPE_CLOSE: &str = "restore";
pub const DEFAULT_INITIAL_STATE_LABEL: &str = "Initial state";
pub const DEFAULT_GROUP_LABEL_PREFIX: &str = "Group";

/// Depth of the root scope.
const ROOT_SCOPE: i64 = 1;

/// Names and labels that drive reconstruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconstructOptions {
    /// Call name that opens a nested scope.
    pub scope_open: String,
    /// Call name that closes the innermost scope.
    pub scope_close: String,
    /// Label of the collapsed group listing the first snapshot.
    pub initial_state_label: String,
    /// Nested scope groups are labeled `{prefix} {n}`, with `n` counting from 1.
    pub group_label_prefix: String,
}

impl Default for ReconstructOptions {
    fn default() -> Self {
        Self {
            scope_open: DEFAULT_SCOPE_OPEN.to_owned(),
            scope_close: DEFAULT_SCOPE_CLOSE.to_owned(),
            initial_state_label: DEFAULT_INITIAL_STATE_LABEL.to_owned(),
            group_label_prefix: DEFAULT_GROUP_LABEL_PREFIX.to_owned(),
        }
    }
}

/// Replays `events` once and produces the render plan.
///
/// The last-seen state table is indexed by depth number, not by scope
/// identity: after unbalanced closes, a later scope at the same depth diffs
/// against whatever an earlier, unrelated scope left there.
pub fn reconstruct(events: &[Event], options: &ReconstructOptions) -> RenderPlan {
    let mut plan = RenderPlan::default();
    let mut depth = ROOT_SCOPE;
    let mut groups_opened: u64 = 0;
    let mut last_seen: HashMap<i64, &StateSnapshot> = HashMap::new();
    let mut seen_any_state = false;

    for (position, event) in events.iter().enumerate() {
        match event {
            Event::Call(call) => {
                plan.stats.calls += 1;

                if call.name == options.scope_open {
                    groups_opened += 1;
                    plan.instructions.push(RenderInstruction::OpenGroup {
                        label: format!("{} {groups_opened}", options.group_label_prefix),
                        collapsed: false,
                    });
                    depth += 1;
                }

                plan.instructions
                    .push(RenderInstruction::Line(LogLine::call(call.signature())));

                if call.name == options.scope_close {
                    plan.instructions.push(RenderInstruction::CloseGroup);
                    depth -= 1;
                    if depth < ROOT_SCOPE {
                        warn!(
                            position,
                            depth,
                            name = %call.name,
                            "scope closed without a matching open"
                        );
                        plan.anomalies
                            .push(ScopeAnomaly::UnmatchedClose { position, depth });
                    }
                }
            }
            Event::State(state) => {
                if !seen_any_state {
                    seen_any_state = true;
                    emit_initial_state(&mut plan, state, options);
                    last_seen.insert(ROOT_SCOPE, state);
                    continue;
                }

                // Nothing recorded at this depth yet: every field counts as changed.
                let changed = match last_seen.get(&depth) {
                    Some(previous) => state.changed_since(previous),
                    None => state.iter().collect(),
                };
                for field in changed {
                    plan.instructions
                        .push(RenderInstruction::Line(LogLine::changed(&field.name, &field.value)));
                    plan.stats.changed_fields += 1;
                }
                last_seen.insert(depth, state);
            }
        }
    }

    if depth > ROOT_SCOPE {
        warn!(depth, "event log ended with open scopes");
        plan.anomalies.push(ScopeAnomaly::UnmatchedOpen { depth });
    }

    plan
}

fn emit_initial_state(plan: &mut RenderPlan, state: &StateSnapshot, options: &ReconstructOptions) {
    plan.instructions.push(RenderInstruction::OpenGroup {
        label: options.initial_state_label.clone(),
        collapsed: true,
    });
    for field in state {
        plan.instructions
            .push(RenderInstruction::Line(LogLine::field(&field.name, &field.value)));
    }
    plan.instructions.push(RenderInstruction::CloseGroup);
}

#[cfg(test)]
mod tests {
    use super::*;
    use framelog_types::{CallRecord, TraceStats, Value};

    fn state(pairs: &[(&str, Value)]) -> Event {
        let mut snap = StateSnapshot::new();
        for (name, value) in pairs {
            snap.push(*name, value.clone());
        }
        Event::State(snap)
    }

    fn call(name: &str, args: Vec<Value>) -> Event {
        Event::Call(CallRecord {
            name: name.to_owned(),
            args,
            position: 0,
        })
    }

    fn texts(plan: &RenderPlan) -> Vec<String> {
        plan.instructions
            .iter()
            .map(|instruction| match instruction {
                RenderInstruction::OpenGroup { label, collapsed } => {
                    format!("open {label}{}", if *collapsed { " (collapsed)" } else { "" })
                }
                RenderInstruction::Line(line) => line.text(),
                RenderInstruction::CloseGroup => "close".to_owned(),
            })
            .collect()
    }

    #[test]
    fn diffs_consecutive_snapshots_at_the_same_scope() {
        let events = vec![
            state(&[("a", 1.into()), ("b", 2.into())]),
            state(&[("a", 1.into()), ("b", 3.into())]),
            state(&[("a", 5.into()), ("b", 3.into())]),
        ];
        let plan = reconstruct(&events, &ReconstructOptions::default());

        assert_eq!(
            texts(&plan),
            [
                "open Initial state (collapsed)",
                "a = 1",
                "b = 2",
                "close",
                "b = 3",
                "a = 5",
            ]
        );
        assert_eq!(
            plan.stats,
            TraceStats {
                calls: 0,
                changed_fields: 2
            }
        );
    }

    #[test]
    fn identical_snapshot_yields_no_changes() {
        let events = vec![
            state(&[("a", 1.into())]),
            state(&[("a", 1.into())]),
        ];
        let plan = reconstruct(&events, &ReconstructOptions::default());
        assert_eq!(plan.stats.changed_fields, 0);
        assert_eq!(plan.lines().count(), 1);
    }

    #[test]
    fn call_lines_render_arguments_in_order() {
        let events = vec![
            state(&[]),
            state(&[]),
            call("fillRect", vec![0.into(), 0.into(), 10.into(), 10.into()]),
        ];
        let plan = reconstruct(&events, &ReconstructOptions::default());
        let lines: Vec<String> = plan.lines().map(|line| line.text()).collect();
        assert_eq!(lines, ["fillRect(0, 0, 10, 10)"]);
        assert_eq!(plan.stats.calls, 1);
    }

    #[test]
    fn nested_scope_diffs_against_its_own_last_state() {
        let events = vec![
            state(&[("lineWidth", 1.into()), ("fillStyle", "black".into())]),
            state(&[("lineWidth", 1.into()), ("fillStyle", "black".into())]),
            call("save", vec![]),
            // First snapshot inside the scope: nothing to compare against.
            state(&[("lineWidth", 2.into()), ("fillStyle", "black".into())]),
            call("stroke", vec![]),
            state(&[("lineWidth", 2.into()), ("fillStyle", "black".into())]),
            call("restore", vec![]),
            // Back at the root: compared to the pre-save state, not the inner one.
            state(&[("lineWidth", 1.into()), ("fillStyle", "black".into())]),
        ];
        let plan = reconstruct(&events, &ReconstructOptions::default());

        assert_eq!(
            texts(&plan),
            [
                "open Initial state (collapsed)",
                "lineWidth = 1",
                "fillStyle = black",
                "close",
                "open Group 1",
                "save()",
                "lineWidth = 2",
                "fillStyle = black",
                "stroke()",
                "restore()",
                "close",
            ]
        );
        assert_eq!(plan.open_groups(), 2);
        assert_eq!(plan.close_groups(), 2);
        assert_eq!(plan.stats.calls, 3);
        assert_eq!(plan.stats.changed_fields, 2);
        assert!(plan.anomalies.is_empty());
    }

    #[test]
    fn group_labels_count_up() {
        let events = vec![
            state(&[]),
            call("save", vec![]),
            call("restore", vec![]),
            call("save", vec![]),
            call("restore", vec![]),
        ];
        let plan = reconstruct(&events, &ReconstructOptions::default());
        let labels: Vec<&str> = plan
            .instructions
            .iter()
            .filter_map(|instruction| match instruction {
                RenderInstruction::OpenGroup { label, .. } => Some(label.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, ["Initial state", "Group 1", "Group 2"]);
    }

    #[test]
    fn unmatched_close_is_recorded_not_corrected() {
        let events = vec![state(&[]), call("restore", vec![])];
        let plan = reconstruct(&events, &ReconstructOptions::default());

        assert_eq!(plan.open_groups(), 1);
        assert_eq!(plan.close_groups(), 2);
        assert_eq!(
            plan.anomalies,
            [ScopeAnomaly::UnmatchedClose {
                position: 1,
                depth: 0
            }]
        );
    }

    #[test]
    fn unmatched_open_is_left_open() {
        let events = vec![state(&[]), call("save", vec![]), call("save", vec![])];
        let plan = reconstruct(&events, &ReconstructOptions::default());

        assert_eq!(plan.open_groups(), 3);
        assert_eq!(plan.close_groups(), 1);
        assert_eq!(plan.anomalies, [ScopeAnomaly::UnmatchedOpen { depth: 3 }]);
    }

    #[test]
    fn depth_index_is_reused_after_unbalanced_close() {
        let events = vec![
            state(&[("a", 1.into())]),
            call("restore", vec![]),
            // depth 0, never seen: everything is new
            state(&[("a", 1.into())]),
            call("save", vec![]),
            // back at depth 1: diffs against the root's initial state
            state(&[("a", 1.into())]),
        ];
        let plan = reconstruct(&events, &ReconstructOptions::default());
        assert_eq!(plan.stats.changed_fields, 1);
    }

    #[test]
    fn scope_names_are_configurable() {
        let options = ReconstructOptions {
            scope_open: "push".into(),
            scope_close: "pop".into(),
            ..ReconstructOptions::default()
        };
        let events = vec![
            state(&[]),
            call("push", vec![]),
            call("save", vec![]),
            call("pop", vec![]),
        ];
        let plan = reconstruct(&events, &options);
        assert_eq!(plan.open_groups(), 2);
        assert_eq!(plan.close_groups(), 2);
    }
}

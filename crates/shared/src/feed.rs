//! Bounded notification feed and the controller's dispatch rules.
//!
//! The feed keeps the most recent broker messages, newest first. Push events
//! map onto controller state through [`dispatch`], and toggle clicks are
//! planned through [`plan_toggle`]; both are plain functions so the rules can
//! be exercised without a UI runtime.

use chrono::{DateTime, Utc};
use serde_json::Value;

/// Maximum number of entries kept in the feed. Older entries are evicted
/// from the tail, never reordered.
pub const FEED_CAP: usize = 30;

/// One broker message rendered in the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    /// Monotonic per-feed sequence number, used as a render key.
    pub seq: u64,
    pub topic: String,
    pub payload: Value,
    pub received_at: DateTime<Utc>,
}

impl FeedEntry {
    /// Payload pretty-printed for display.
    pub fn payload_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.payload).unwrap_or_else(|_| self.payload.to_string())
    }

    /// Arrival time as a short clock string.
    pub fn received_time(&self) -> String {
        self.received_at.format("%H:%M:%S").to_string()
    }
}

/// Most-recent-first list of broker messages, bounded to [`FEED_CAP`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feed {
    entries: Vec<FeedEntry>,
    next_seq: u64,
}

impl Feed {
    /// Head-insert a message and evict beyond the cap.
    pub fn push(&mut self, topic: String, payload: Value) {
        let entry = FeedEntry {
            seq: self.next_seq,
            topic,
            payload,
            received_at: Utc::now(),
        };
        self.next_seq += 1;
        self.entries.insert(0, entry);
        self.entries.truncate(FEED_CAP);
    }

    /// Entries, newest first.
    pub fn entries(&self) -> &[FeedEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Controller effect of one decoded push event.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Bridge readiness changed.
    SetReady(bool),
    /// Append a broker message to the feed.
    Append { topic: String, payload: Value },
    /// Event carries nothing for this controller.
    Ignore,
}

/// Map a push event onto controller state.
///
/// Only a connect with result code 0 marks the bridge ready; a connect with
/// any other (or missing) code changes nothing.
pub fn dispatch(event: &crate::PushEvent) -> Effect {
    use crate::PushEvent;

    match event {
        PushEvent::Connect { rc: Some(0) } => Effect::SetReady(true),
        PushEvent::Disconnect => Effect::SetReady(false),
        PushEvent::Message { topic, payload } => Effect::Append {
            topic: topic.clone(),
            payload: payload.clone(),
        },
        _ => Effect::Ignore,
    }
}

/// What a subscribe/unsubscribe click should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TogglePlan {
    /// A previous toggle for this subject is still in flight; drop the click.
    Busy,
    /// The bridge is not ready: connect first, then run the action only if
    /// the connect succeeds.
    ConnectThen(ToggleAction),
    /// The bridge is ready: run the action directly.
    Run(ToggleAction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    Subscribe,
    Unsubscribe,
}

/// Plan a toggle click from current controller state.
pub fn plan_toggle(ready: bool, subscribed: bool, pending: bool) -> TogglePlan {
    if pending {
        return TogglePlan::Busy;
    }
    let action = if subscribed {
        ToggleAction::Unsubscribe
    } else {
        ToggleAction::Subscribe
    };
    if ready {
        TogglePlan::Run(action)
    } else {
        TogglePlan::ConnectThen(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PushEvent;
    use serde_json::json;

    #[test]
    fn feed_keeps_only_the_most_recent() {
        let mut feed = Feed::default();
        for i in 0..40 {
            feed.push(format!("topic/{i}"), json!({ "n": i }));
        }
        assert_eq!(feed.entries().len(), FEED_CAP);
        // Newest first, oldest evicted.
        assert_eq!(feed.entries()[0].topic, "topic/39");
        assert_eq!(feed.entries()[FEED_CAP - 1].topic, "topic/10");
    }

    #[test]
    fn feed_shorter_than_cap_keeps_everything() {
        let mut feed = Feed::default();
        feed.push("a".into(), json!(1));
        feed.push("b".into(), json!(2));
        assert_eq!(feed.entries().len(), 2);
        assert_eq!(feed.entries()[0].topic, "b");
        assert_eq!(feed.entries()[1].topic, "a");
    }

    #[test]
    fn feed_sequence_numbers_are_unique_across_eviction() {
        let mut feed = Feed::default();
        for i in 0..35 {
            feed.push(format!("t{i}"), json!(null));
        }
        let mut seqs: Vec<u64> = feed.entries().iter().map(|e| e.seq).collect();
        seqs.dedup();
        assert_eq!(seqs.len(), FEED_CAP);
    }

    #[test]
    fn connect_rc_zero_sets_ready() {
        assert_eq!(
            dispatch(&PushEvent::Connect { rc: Some(0) }),
            Effect::SetReady(true)
        );
    }

    #[test]
    fn connect_with_other_code_is_ignored() {
        assert_eq!(dispatch(&PushEvent::Connect { rc: Some(5) }), Effect::Ignore);
        assert_eq!(dispatch(&PushEvent::Connect { rc: None }), Effect::Ignore);
    }

    #[test]
    fn disconnect_clears_ready() {
        assert_eq!(dispatch(&PushEvent::Disconnect), Effect::SetReady(false));
    }

    #[test]
    fn broker_message_appends() {
        let event = PushEvent::Message {
            topic: "carrera/x/materia/mat_bd2".into(),
            payload: json!({"aula": "B3"}),
        };
        assert_eq!(
            dispatch(&event),
            Effect::Append {
                topic: "carrera/x/materia/mat_bd2".into(),
                payload: json!({"aula": "B3"}),
            }
        );
    }

    #[test]
    fn foreign_events_are_ignored() {
        assert_eq!(dispatch(&PushEvent::StreamError), Effect::Ignore);
        assert_eq!(dispatch(&PushEvent::Raw("x".into())), Effect::Ignore);
        assert_eq!(dispatch(&PushEvent::Other(json!({"type": "log"}))), Effect::Ignore);
    }

    #[test]
    fn toggle_is_rejected_while_pending() {
        assert_eq!(plan_toggle(true, false, true), TogglePlan::Busy);
        assert_eq!(plan_toggle(false, true, true), TogglePlan::Busy);
    }

    #[test]
    fn toggle_connects_first_when_not_ready() {
        assert_eq!(
            plan_toggle(false, false, false),
            TogglePlan::ConnectThen(ToggleAction::Subscribe)
        );
        assert_eq!(
            plan_toggle(false, true, false),
            TogglePlan::ConnectThen(ToggleAction::Unsubscribe)
        );
    }

    #[test]
    fn toggle_runs_directly_when_ready() {
        assert_eq!(plan_toggle(true, false, false), TogglePlan::Run(ToggleAction::Subscribe));
        assert_eq!(plan_toggle(true, true, false), TogglePlan::Run(ToggleAction::Unsubscribe));
    }
}

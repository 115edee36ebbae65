//! Per-page controller state for the subscription feed.
//!
//! [`FeedContext`] is owned by the subjects page and provided through the
//! component context — deliberately not a process-wide global, so its
//! lifetime matches the page session. All mutation happens on the UI event
//! loop; the push listener's event stream is the only path that flips
//! readiness or appends to the feed after page entry.

use std::collections::HashSet;

use dioxus::prelude::*;

use campusfeed_shared::{dispatch, Effect, Feed, PushEvent};

/// Controller state shared between the subjects page and its rows.
#[derive(Clone, Copy)]
pub struct FeedContext {
    /// Bridge readiness. Subscribe/unsubscribe must not be issued while
    /// false; the toggle path connects first instead.
    pub ready: Signal<bool>,
    /// Bounded live feed, newest first.
    pub feed: Signal<Feed>,
    /// Subjects with a toggle currently in flight; a second click on the
    /// same subject is dropped until the first resolves.
    pending: Signal<HashSet<String>>,
}

impl FeedContext {
    pub fn new(
        ready: Signal<bool>,
        feed: Signal<Feed>,
        pending: Signal<HashSet<String>>,
    ) -> Self {
        Self {
            ready,
            feed,
            pending,
        }
    }

    /// Apply one decoded push event. The last arrived authoritative signal
    /// wins; there is no reconciliation pass.
    pub fn apply(&mut self, event: &PushEvent) {
        match dispatch(event) {
            Effect::SetReady(ready) => self.ready.set(ready),
            Effect::Append { topic, payload } => self.feed.write().push(topic, payload),
            Effect::Ignore => {}
        }
    }

    pub fn is_ready(&self) -> bool {
        *self.ready.read()
    }

    pub fn set_ready(&mut self, ready: bool) {
        self.ready.set(ready);
    }

    /// Mark a toggle as in flight. Returns false when one already is.
    pub fn begin(&mut self, id_materia: &str) -> bool {
        self.pending.write().insert(id_materia.to_string())
    }

    /// Release a subject's in-flight marker.
    pub fn finish(&mut self, id_materia: &str) {
        self.pending.write().remove(id_materia);
    }

    pub fn is_pending(&self, id_materia: &str) -> bool {
        self.pending.read().contains(id_materia)
    }
}

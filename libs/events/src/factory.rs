//! Construction triggers for analytics events.
//!
//! The factory is the only construction surface for events. It exists for
//! the client's own trigger points (flag evaluation, track, identify, and
//! user indexing); application code consumes events, it does not build them.

use std::sync::Arc;

use chrono::Utc;
use flagkit_user::User;
use serde_json::Value;
use tracing::debug;

use crate::{
    CustomEvent, EvaluationReason, Event, EventError, FeatureRequestEvent, IdentifyEvent,
    IndexEvent,
};

/// Returns the current wall-clock time in epoch milliseconds.
pub fn unix_millis_now() -> i64 {
    Utc::now().timestamp_millis()
}

/// What the evaluation engine reports about a single flag evaluation.
///
/// This is an input record, not an event: the factory copies it into one or
/// two immutable [`FeatureRequestEvent`]s.
#[derive(Debug, Clone)]
pub struct EvalOutcome {
    /// The key of the evaluated flag.
    pub key: String,
    /// Index of the served variation, if evaluation reached one.
    pub variation: Option<usize>,
    /// The value served to the caller.
    pub value: Value,
    /// The caller-supplied fallback value.
    pub default: Value,
    /// The flag version at evaluation time.
    pub version: Option<u64>,
    /// Key of the flag this evaluation was a prerequisite of, if any.
    pub prereq_of: Option<String>,
    /// Whether the flag asks for full-fidelity events.
    pub track_events: bool,
    /// End of the flag's debug window, in epoch milliseconds, if active.
    pub debug_events_until: Option<i64>,
    /// Why evaluation chose this value.
    pub reason: Option<EvaluationReason>,
}

/// Builds events on behalf of the client's trigger points.
///
/// Each trigger method stamps the event with the factory's wall clock and
/// applies the construction rules that are not plain field copies: reason
/// stripping, identify key derivation, the index-event user requirement, and
/// the debug-window duplication.
#[derive(Debug, Clone)]
pub struct EventFactory {
    include_reasons: bool,
    now: fn() -> i64,
}

impl EventFactory {
    /// A factory that omits evaluation reasons from feature events.
    pub fn new() -> Self {
        Self {
            include_reasons: false,
            now: unix_millis_now,
        }
    }

    /// A factory that keeps evaluation reasons on feature events, for
    /// callers that requested them.
    pub fn with_reasons() -> Self {
        Self {
            include_reasons: true,
            ..Self::new()
        }
    }

    /// Replaces the wall-clock source. Both the creation timestamp and the
    /// debug-window comparison use it.
    pub fn with_time_source(mut self, now: fn() -> i64) -> Self {
        self.now = now;
        self
    }

    /// Events for one flag evaluation: the primary event, plus a debug copy
    /// while the flag's debug window is open.
    ///
    /// The two are independent instances; downstream summarization treats
    /// them separately.
    pub fn feature_request_events(
        &self,
        outcome: EvalOutcome,
        user: Option<Arc<User>>,
    ) -> Vec<Event> {
        let now = (self.now)();
        let reason = if self.include_reasons {
            outcome.reason
        } else {
            None
        };
        let primary = FeatureRequestEvent::new(
            now,
            outcome.key,
            user,
            outcome.variation,
            outcome.value,
            outcome.default,
            outcome.version,
            outcome.prereq_of,
            outcome.track_events,
            outcome.debug_events_until,
            false,
            reason,
        );

        let debug_copy = primary.should_debug(now).then(|| primary.debug_copy());
        let mut events = vec![Event::FeatureRequest(primary)];
        if let Some(copy) = debug_copy {
            debug!(
                flag_key = copy.base().key().unwrap_or_default(),
                until = copy.debug_events_until(),
                "debug window open, emitting debug event"
            );
            events.push(Event::FeatureRequest(copy));
        }
        events
    }

    /// Event for one explicit tracking call.
    pub fn custom_event(
        &self,
        key: impl Into<String>,
        user: Option<Arc<User>>,
        json_data: Option<Value>,
        metric_value: Option<f64>,
    ) -> Event {
        Event::Custom(CustomEvent::new(
            (self.now)(),
            key.into(),
            user,
            json_data,
            metric_value,
        ))
    }

    /// Event for one explicit identify call. A missing user is tolerated
    /// and yields an event with a missing key.
    pub fn identify_event(&self, user: Option<Arc<User>>) -> Event {
        Event::Identify(IdentifyEvent::new((self.now)(), user))
    }

    /// Event registering a newly seen user's full attribute set. Fails
    /// without a user; an index event exists to carry user detail.
    pub fn index_event(&self, user: Option<Arc<User>>) -> Result<Event, EventError> {
        IndexEvent::new((self.now)(), user).map(Event::Index)
    }
}

impl Default for EventFactory {
    fn default() -> Self {
        Self::new()
    }
}

//! Event type definitions for the closed analytics event set.
//!
//! Four variants share a common header (user, creation date, key). Instances
//! are immutable: fields are private, read accessors are the only public
//! surface, and the constructors are crate-internal so that construction
//! happens only at the client's trigger points (see
//! [`EventFactory`](crate::EventFactory)).

use std::sync::Arc;

use flagkit_user::User;
use serde::Serialize;
use serde_json::Value;

use crate::{EvaluationReason, EventError};

// =============================================================================
// Event Kinds
// =============================================================================

/// All event kind names as constants.
pub mod kind_names {
    pub const FEATURE_REQUEST: &str = "feature_request";
    pub const CUSTOM: &str = "custom";
    pub const IDENTIFY: &str = "identify";
    pub const INDEX: &str = "index";
}

/// The kind of an analytics event.
///
/// The set is closed: adding a kind is a contract revision for every
/// consumer, so there is deliberately no "other" case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    FeatureRequest,
    Custom,
    Identify,
    Index,
}

impl EventKind {
    /// Returns the canonical name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::FeatureRequest => kind_names::FEATURE_REQUEST,
            EventKind::Custom => kind_names::CUSTOM,
            EventKind::Identify => kind_names::IDENTIFY,
            EventKind::Index => kind_names::INDEX,
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EventKind {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            kind_names::FEATURE_REQUEST => Ok(EventKind::FeatureRequest),
            kind_names::CUSTOM => Ok(EventKind::Custom),
            kind_names::IDENTIFY => Ok(EventKind::Identify),
            kind_names::INDEX => Ok(EventKind::Index),
            other => Err(EventError::UnknownEventKind(other.to_string())),
        }
    }
}

// =============================================================================
// Shared Header
// =============================================================================

/// The header every event variant carries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventBase {
    creation_date: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<Arc<User>>,
}

impl EventBase {
    pub(crate) fn new(creation_date: i64, key: Option<String>, user: Option<Arc<User>>) -> Self {
        Self {
            creation_date,
            key,
            user,
        }
    }

    /// Epoch-millisecond timestamp of the triggering action.
    pub fn creation_date(&self) -> i64 {
        self.creation_date
    }

    /// The subject key: flag key, custom-event key, or user key.
    ///
    /// `None` only for an identify event built without a user.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// The user context the event pertains to. Shared, never copied.
    pub fn user(&self) -> Option<&Arc<User>> {
        self.user.as_ref()
    }
}

// =============================================================================
// Feature Request Events
// =============================================================================

/// One flag evaluation outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRequestEvent {
    #[serde(flatten)]
    base: EventBase,

    #[serde(skip_serializing_if = "Option::is_none")]
    variation: Option<usize>,

    value: Value,

    default: Value,

    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    prereq_of: Option<String>,

    track_events: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    debug_events_until: Option<i64>,

    debug: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<EvaluationReason>,
}

impl FeatureRequestEvent {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        creation_date: i64,
        key: String,
        user: Option<Arc<User>>,
        variation: Option<usize>,
        value: Value,
        default: Value,
        version: Option<u64>,
        prereq_of: Option<String>,
        track_events: bool,
        debug_events_until: Option<i64>,
        debug: bool,
        reason: Option<EvaluationReason>,
    ) -> Self {
        Self {
            base: EventBase::new(creation_date, Some(key), user),
            variation,
            value,
            default,
            version,
            prereq_of,
            track_events,
            debug_events_until,
            debug,
            reason,
        }
    }

    /// The shared event header.
    pub fn base(&self) -> &EventBase {
        &self.base
    }

    /// Index of the served variation in the flag's variation list.
    pub fn variation(&self) -> Option<usize> {
        self.variation
    }

    /// The value served to the caller.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The caller-supplied fallback value.
    pub fn default_value(&self) -> &Value {
        &self.default
    }

    /// The flag version at evaluation time.
    pub fn version(&self) -> Option<u64> {
        self.version
    }

    /// Key of the flag this evaluation was a prerequisite of, if any.
    pub fn prereq_of(&self) -> Option<&str> {
        self.prereq_of.as_deref()
    }

    /// Whether the flag asks for full-fidelity events instead of summaries.
    pub fn track_events(&self) -> bool {
        self.track_events
    }

    /// End of the flag's debug window, in epoch milliseconds.
    pub fn debug_events_until(&self) -> Option<i64> {
        self.debug_events_until
    }

    /// True only on the derived copy emitted for the debug window.
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Why evaluation chose this value, when the caller asked for reasons.
    pub fn reason(&self) -> Option<&EvaluationReason> {
        self.reason.as_ref()
    }

    /// True while `now_ms` is inside the flag's debug window and this event
    /// is the primary (non-debug) record.
    pub fn should_debug(&self, now_ms: i64) -> bool {
        !self.debug && self.debug_events_until.is_some_and(|until| until > now_ms)
    }

    /// A second, independent instance with identical fields except `debug`.
    pub(crate) fn debug_copy(&self) -> Self {
        Self {
            debug: true,
            ..self.clone()
        }
    }
}

// =============================================================================
// Custom Events
// =============================================================================

/// An explicit application tracking call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomEvent {
    #[serde(flatten)]
    base: EventBase,

    #[serde(skip_serializing_if = "Option::is_none")]
    json_data: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    metric_value: Option<f64>,
}

impl CustomEvent {
    pub(crate) fn new(
        creation_date: i64,
        key: String,
        user: Option<Arc<User>>,
        json_data: Option<Value>,
        metric_value: Option<f64>,
    ) -> Self {
        Self {
            base: EventBase::new(creation_date, Some(key), user),
            json_data,
            metric_value,
        }
    }

    /// The shared event header.
    pub fn base(&self) -> &EventBase {
        &self.base
    }

    /// Structured data attached to the tracking call.
    pub fn json_data(&self) -> Option<&Value> {
        self.json_data.as_ref()
    }

    /// Numeric value attached to the tracking call.
    pub fn metric_value(&self) -> Option<f64> {
        self.metric_value
    }

    /// String rendering of the structured payload, kept for consumers of the
    /// pre-structured API. Computed from [`json_data`](Self::json_data) on
    /// every call, so the two views cannot disagree.
    #[deprecated(note = "use json_data")]
    pub fn data(&self) -> Option<String> {
        self.json_data.as_ref().map(Value::to_string)
    }
}

// =============================================================================
// Identify Events
// =============================================================================

/// An explicit user-identification call.
///
/// The key is derived from the user's key at construction time. A missing
/// user is tolerated and yields a missing key; compare [`IndexEvent`], which
/// refuses to exist without one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdentifyEvent {
    #[serde(flatten)]
    base: EventBase,
}

impl IdentifyEvent {
    pub(crate) fn new(creation_date: i64, user: Option<Arc<User>>) -> Self {
        let key = user.as_ref().map(|u| u.key().to_string());
        Self {
            base: EventBase::new(creation_date, key, user),
        }
    }

    /// The shared event header.
    pub fn base(&self) -> &EventBase {
        &self.base
    }
}

// =============================================================================
// Index Events
// =============================================================================

/// The implicit registration of a user's full attribute set the first time
/// the processor sees that user, so later events can carry the key alone.
///
/// Only the processor pipeline produces these; its whole purpose is the user
/// detail, so construction fails without a user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexEvent {
    #[serde(flatten)]
    base: EventBase,
}

impl IndexEvent {
    pub(crate) fn new(creation_date: i64, user: Option<Arc<User>>) -> Result<Self, EventError> {
        let Some(user) = user else {
            return Err(EventError::UserRequired {
                kind: EventKind::Index,
            });
        };
        let key = Some(user.key().to_string());
        Ok(Self {
            base: EventBase::new(creation_date, key, Some(user)),
        })
    }

    /// The shared event header.
    pub fn base(&self) -> &EventBase {
        &self.base
    }
}

// =============================================================================
// The Closed Event Set
// =============================================================================

/// An analytics event produced by the client.
///
/// The variant set is closed. Consumers switch on the concrete variant; a
/// `match` without a wildcard arm is checked by the compiler, which is the
/// required loud failure mode if the set ever changes. Consumers that key on
/// kind *names* instead get the same guarantee from
/// [`EventKind::from_str`](std::str::FromStr), which rejects unknown names.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    FeatureRequest(FeatureRequestEvent),
    Custom(CustomEvent),
    Identify(IdentifyEvent),
    Index(IndexEvent),
}

impl Event {
    fn base(&self) -> &EventBase {
        match self {
            Event::FeatureRequest(e) => e.base(),
            Event::Custom(e) => e.base(),
            Event::Identify(e) => e.base(),
            Event::Index(e) => e.base(),
        }
    }

    /// The kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Event::FeatureRequest(_) => EventKind::FeatureRequest,
            Event::Custom(_) => EventKind::Custom,
            Event::Identify(_) => EventKind::Identify,
            Event::Index(_) => EventKind::Index,
        }
    }

    /// Epoch-millisecond timestamp of the triggering action.
    pub fn creation_date(&self) -> i64 {
        self.base().creation_date()
    }

    /// The subject key: flag key, custom-event key, or user key.
    pub fn key(&self) -> Option<&str> {
        self.base().key()
    }

    /// The user context the event pertains to.
    pub fn user(&self) -> Option<&Arc<User>> {
        self.base().user()
    }
}

impl From<FeatureRequestEvent> for Event {
    fn from(event: FeatureRequestEvent) -> Self {
        Event::FeatureRequest(event)
    }
}

impl From<CustomEvent> for Event {
    fn from(event: CustomEvent) -> Self {
        Event::Custom(event)
    }
}

impl From<IdentifyEvent> for Event {
    fn from(event: IdentifyEvent) -> Self {
        Event::Identify(event)
    }
}

impl From<IndexEvent> for Event {
    fn from(event: IndexEvent) -> Self {
        Event::Index(event)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn test_user(key: &str) -> Arc<User> {
        Arc::new(User::with_key(key).build())
    }

    fn feature_event(debug_events_until: Option<i64>, debug: bool) -> FeatureRequestEvent {
        FeatureRequestEvent::new(
            1_000,
            "flag-a".to_string(),
            Some(test_user("u1")),
            Some(2),
            json!(true),
            json!(false),
            Some(7),
            None,
            true,
            debug_events_until,
            debug,
            Some(EvaluationReason::Fallthrough),
        )
    }

    #[test]
    fn test_event_kind_name_roundtrip() {
        for kind in [
            EventKind::FeatureRequest,
            EventKind::Custom,
            EventKind::Identify,
            EventKind::Index,
        ] {
            let parsed: EventKind = kind.as_str().parse().unwrap();
            assert_eq!(kind, parsed);
        }
    }

    #[test]
    fn test_unknown_kind_name_is_loud() {
        let result: Result<EventKind, _> = "heartbeat".parse();
        assert_eq!(
            result.unwrap_err(),
            EventError::UnknownEventKind("heartbeat".to_string())
        );
    }

    #[test]
    fn test_feature_request_field_roundtrip() {
        let user = test_user("u1");
        let event = FeatureRequestEvent::new(
            1_000,
            "flag-a".to_string(),
            Some(user.clone()),
            Some(2),
            json!("served"),
            json!("fallback"),
            Some(7),
            Some("parent-flag".to_string()),
            true,
            Some(2_000),
            false,
            Some(EvaluationReason::TargetMatch),
        );

        assert_eq!(event.base().creation_date(), 1_000);
        assert_eq!(event.base().key(), Some("flag-a"));
        assert_eq!(event.base().user(), Some(&user));
        assert_eq!(event.variation(), Some(2));
        assert_eq!(event.value(), &json!("served"));
        assert_eq!(event.default_value(), &json!("fallback"));
        assert_eq!(event.version(), Some(7));
        assert_eq!(event.prereq_of(), Some("parent-flag"));
        assert!(event.track_events());
        assert_eq!(event.debug_events_until(), Some(2_000));
        assert!(!event.debug());
        assert_eq!(event.reason(), Some(&EvaluationReason::TargetMatch));

        // Reads are stable: no accessor observes mutation.
        assert_eq!(event.value(), &json!("served"));
        assert_eq!(event.base().key(), Some("flag-a"));
    }

    #[test]
    fn test_should_debug_inside_window() {
        let event = feature_event(Some(2_000), false);
        assert!(event.should_debug(1_500));
    }

    #[test]
    fn test_should_debug_window_elapsed() {
        let event = feature_event(Some(2_000), false);
        assert!(!event.should_debug(2_000));
        assert!(!event.should_debug(3_000));
    }

    #[test]
    fn test_should_debug_without_window() {
        let event = feature_event(None, false);
        assert!(!event.should_debug(0));
    }

    #[test]
    fn test_debug_copy_differs_only_in_debug_flag() {
        let primary = feature_event(Some(2_000), false);
        let copy = primary.debug_copy();

        assert!(copy.debug());
        assert!(!primary.debug());
        assert_eq!(copy.base(), primary.base());
        assert_eq!(copy.variation(), primary.variation());
        assert_eq!(copy.value(), primary.value());
        assert_eq!(copy.default_value(), primary.default_value());
        assert_eq!(copy.version(), primary.version());
        assert_eq!(copy.prereq_of(), primary.prereq_of());
        assert_eq!(copy.track_events(), primary.track_events());
        assert_eq!(copy.debug_events_until(), primary.debug_events_until());
        assert_eq!(copy.reason(), primary.reason());
        // A debug copy never spawns another debug copy.
        assert!(!copy.should_debug(1_500));
    }

    #[test]
    #[allow(deprecated)]
    fn test_custom_event_legacy_data_view() {
        let payload = json!({"a": 1});
        let event = CustomEvent::new(
            1_000,
            "conversion".to_string(),
            Some(test_user("u1")),
            Some(payload.clone()),
            Some(9.5),
        );

        assert_eq!(event.json_data(), Some(&payload));
        assert_eq!(event.data(), Some(payload.to_string()));
        assert_eq!(event.data().as_deref(), Some(r#"{"a":1}"#));
        assert_eq!(event.metric_value(), Some(9.5));
    }

    #[test]
    #[allow(deprecated)]
    fn test_custom_event_absent_payload() {
        let event = CustomEvent::new(1_000, "click".to_string(), None, None, None);
        assert_eq!(event.json_data(), None);
        assert_eq!(event.data(), None);
        assert_eq!(event.metric_value(), None);
    }

    #[test]
    fn test_identify_derives_key_from_user() {
        let event = IdentifyEvent::new(1_000, Some(test_user("abc")));
        assert_eq!(event.base().key(), Some("abc"));
    }

    #[test]
    fn test_identify_tolerates_missing_user() {
        // Asymmetric with IndexEvent on purpose; see the index test below.
        let event = IdentifyEvent::new(1_000, None);
        assert_eq!(event.base().key(), None);
        assert_eq!(event.base().user(), None);
    }

    #[test]
    fn test_index_rejects_missing_user() {
        let result = IndexEvent::new(1_000, None);
        assert_eq!(
            result.unwrap_err(),
            EventError::UserRequired {
                kind: EventKind::Index
            }
        );
    }

    #[test]
    fn test_index_derives_key_from_user() {
        let user = test_user("abc");
        let event = IndexEvent::new(1_000, Some(user.clone())).unwrap();
        assert_eq!(event.base().key(), Some("abc"));
        assert_eq!(event.base().user(), Some(&user));
    }

    #[test]
    fn test_event_common_accessors() {
        let event = Event::from(IdentifyEvent::new(1_000, Some(test_user("u9"))));
        assert_eq!(event.kind(), EventKind::Identify);
        assert_eq!(event.creation_date(), 1_000);
        assert_eq!(event.key(), Some("u9"));
        assert_eq!(event.user().unwrap().key(), "u9");
    }

    #[test]
    fn test_event_serializes_with_kind_tag() {
        let event = Event::from(IdentifyEvent::new(1_000, Some(test_user("u9"))));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "identify");
        assert_eq!(json["creation_date"], 1_000);
        assert_eq!(json["key"], "u9");
        assert_eq!(json["user"]["key"], "u9");
    }

    #[test]
    fn test_feature_event_serialization_skips_absent_fields() {
        let event = FeatureRequestEvent::new(
            1_000,
            "flag-a".to_string(),
            None,
            None,
            json!(1),
            json!(0),
            None,
            None,
            false,
            None,
            false,
            None,
        );
        let json = serde_json::to_value(&event).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("variation"));
        assert!(!obj.contains_key("version"));
        assert!(!obj.contains_key("prereq_of"));
        assert!(!obj.contains_key("debug_events_until"));
        assert!(!obj.contains_key("reason"));
        assert!(!obj.contains_key("user"));
        assert_eq!(json["value"], 1);
        assert_eq!(json["track_events"], false);
    }

    proptest! {
        #[test]
        fn prop_feature_request_accessors_return_inputs(
            creation_date in any::<i64>(),
            key in "[a-z][a-z0-9.-]{0,24}",
            variation in proptest::option::of(0usize..32),
            value in any::<i64>(),
            default in any::<i64>(),
            version in proptest::option::of(any::<u64>()),
            track_events in any::<bool>(),
            debug_events_until in proptest::option::of(any::<i64>()),
        ) {
            let event = FeatureRequestEvent::new(
                creation_date,
                key.clone(),
                None,
                variation,
                json!(value),
                json!(default),
                version,
                None,
                track_events,
                debug_events_until,
                false,
                None,
            );

            prop_assert_eq!(event.base().creation_date(), creation_date);
            prop_assert_eq!(event.base().key(), Some(key.as_str()));
            prop_assert_eq!(event.variation(), variation);
            prop_assert_eq!(event.value(), &json!(value));
            prop_assert_eq!(event.default_value(), &json!(default));
            prop_assert_eq!(event.version(), version);
            prop_assert_eq!(event.track_events(), track_events);
            prop_assert_eq!(event.debug_events_until(), debug_events_until);
        }
    }
}

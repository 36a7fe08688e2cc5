//! # flagkit-events
//!
//! Analytics event model for the flagkit feature-flag client.
//!
//! ## Design Principles
//!
//! - Events are immutable records of user-facing activity
//! - The variant set is closed; consumers match on it exhaustively
//! - Construction happens only at the client's trigger points, through
//!   [`EventFactory`]; application code reads events, it never builds them
//! - Events share the user context by reference and never copy, mutate, or
//!   redact it (redaction is the event processor's job, downstream)
//!
//! ## Event Kinds
//!
//! - [`FeatureRequestEvent`]: one flag evaluation outcome, optionally
//!   accompanied by a debug copy while the flag's debug window is open
//! - [`CustomEvent`]: an explicit application tracking call
//! - [`IdentifyEvent`]: an explicit user-identification call
//! - [`IndexEvent`]: internal registration of a newly seen user's full
//!   attribute set

mod error;
mod factory;
mod reason;
mod sink;
mod types;

pub use error::EventError;
pub use factory::{unix_millis_now, EvalOutcome, EventFactory};
pub use reason::{ErrorKind, EvaluationReason};
pub use sink::EventSink;
pub use types::*;

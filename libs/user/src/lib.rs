//! # flagkit-user
//!
//! User context types for the flagkit feature-flag client.
//!
//! ## Design Principles
//!
//! - A user is identified by a required, stable `key`; every other attribute
//!   is optional
//! - Users are immutable once built and shared by reference; the analytics
//!   pipeline never copies or modifies them
//! - Private-attribute names travel with the user, but redaction is applied
//!   downstream (in the event processor), never here
//! - Users support roundtrip serialization (build → serialize → deserialize)

mod user;

pub use user::{User, UserBuilder};

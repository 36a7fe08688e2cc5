//! The handoff seam between event construction and the event processor.

use crate::Event;

/// Consumes events produced by the client's trigger points.
///
/// The event processor's inbound queue implements this, as do custom sinks
/// installed by applications that want to observe analytics traffic.
/// Implementations must match on [`Event`] exhaustively; a wildcard arm that
/// skips unmatched variants would silently drop analytics data if the set
/// ever changes.
pub trait EventSink: Send {
    /// Accepts one event. Called synchronously on the triggering thread, so
    /// implementations should hand off quickly rather than block.
    fn send(&mut self, event: Event);

    /// Delivers anything the sink has buffered. The default does nothing.
    fn flush(&mut self) {}
}

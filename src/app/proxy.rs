//! Defines an abstraction over the event sending mechanism.

use super::events::UserEvent;

/// A trait that abstracts the sending of user events.
/// This is "fire-and-forget" and doesn't return a result, simplifying its use.
pub trait EventProxy: Send + Sync + Clone + 'static {
    fn send_event(&self, event: UserEvent);
}

/// Implement the trait for the real `tao::event_loop::EventLoopProxy`.
#[cfg(feature = "desktop")]
impl EventProxy for tao::event_loop::EventLoopProxy<UserEvent> {
    fn send_event(&self, event: UserEvent) {
        // The real proxy can return an error when the loop is gone; we log it and move on.
        if let Err(e) = tao::event_loop::EventLoopProxy::send_event(self, event) {
            tracing::warn!("Failed to send event to event loop: {}", e);
        }
    }
}

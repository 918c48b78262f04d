//! Event dispatcher: one handler per event name.
//!
//! The receive loop hands every decoded [`Envelope`] to
//! [`Dispatcher::dispatch`], which looks up the handler registered for
//! `envelope.event` and calls it with `(payload, envelope)`.
//!
//! # Registration semantics
//!
//! The registry is a plain map from name to a single handler.  Calling
//! [`Dispatcher::on`] twice with the same name *replaces* the first handler;
//! there is no fan-out to multiple subscribers.
//!
//! # Unknown events
//!
//! Events nobody registered for are dropped and logged at `debug`.  This keeps
//! the client forward compatible with server events it does not understand.
//!
//! # Handlers must not block
//!
//! Handlers run on the receive task.  A handler that blocks stalls delivery of
//! every later event, so handlers only take short locks and send on unbounded
//! channels.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use checkers_core::Envelope;
use serde_json::Value;
use tracing::debug;

/// A registered event handler, called with `(payload, raw envelope)`.
pub type Handler = Arc<dyn Fn(&Value, &Envelope) + Send + Sync>;

/// Result of dispatching one envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A handler was found and ran.
    Handled,
    /// No handler is registered for the event; the message was dropped.
    Unhandled,
}

/// Routes inbound envelopes to their handlers.
#[derive(Default)]
pub struct Dispatcher {
    handlers: RwLock<HashMap<String, Handler>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `event`, replacing any previous handler.
    ///
    /// Returns `true` if a handler was replaced.
    pub fn on<F>(&self, event: impl Into<String>, handler: F) -> bool
    where
        F: Fn(&Value, &Envelope) + Send + Sync + 'static,
    {
        let event = event.into();
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        let replaced = handlers.insert(event.clone(), Arc::new(handler)).is_some();
        if replaced {
            debug!(event = %event, "replaced event handler");
        }
        replaced
    }

    /// Removes the handler for `event`.  Returns `true` if one was registered.
    pub fn off(&self, event: &str) -> bool {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(event)
            .is_some()
    }

    pub fn is_registered(&self, event: &str) -> bool {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(event)
    }

    /// Invokes the handler registered for `envelope.event`.
    ///
    /// The handler is cloned out of the registry before it runs, so a handler
    /// may itself call [`Dispatcher::on`] without deadlocking.
    pub fn dispatch(&self, envelope: &Envelope) -> DispatchOutcome {
        let handler = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&envelope.event)
            .cloned();

        match handler {
            Some(handler) => {
                handler(&envelope.payload, envelope);
                DispatchOutcome::Handled
            }
            None => {
                debug!(event = %envelope.event, "no handler registered; dropping event");
                DispatchOutcome::Unhandled
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[test]
    fn test_dispatch_invokes_registered_handler_with_payload_and_raw() {
        // Arrange
        let dispatcher = Dispatcher::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        dispatcher.on("error", move |payload, raw| {
            sink.lock().unwrap().push((payload.clone(), raw.event.clone()));
        });

        // Act
        let outcome = dispatcher.dispatch(&Envelope::new("error", json!("boom")));

        // Assert
        assert_eq!(outcome, DispatchOutcome::Handled);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![(json!("boom"), "error".to_string())]
        );
    }

    #[test]
    fn test_unknown_event_is_dropped_without_error() {
        let dispatcher = Dispatcher::new();
        let outcome = dispatcher.dispatch(&Envelope::bare("server_added_this_later"));
        assert_eq!(outcome, DispatchOutcome::Unhandled);
    }

    #[test]
    fn test_reregistering_replaces_previous_handler() {
        // Arrange
        let dispatcher = Dispatcher::new();
        let calls = Arc::new(Mutex::new(Vec::new()));
        let first = Arc::clone(&calls);
        let second = Arc::clone(&calls);

        // Act
        let replaced_first = dispatcher.on("board_response", move |_, _| {
            first.lock().unwrap().push("first")
        });
        let replaced_second = dispatcher.on("board_response", move |_, _| {
            second.lock().unwrap().push("second")
        });
        dispatcher.dispatch(&Envelope::bare("board_response"));

        // Assert: only the latest handler ran, exactly once
        assert!(!replaced_first);
        assert!(replaced_second);
        assert_eq!(*calls.lock().unwrap(), vec!["second"]);
    }

    #[test]
    fn test_off_removes_handler() {
        let dispatcher = Dispatcher::new();
        dispatcher.on("reset_game", |_, _| {});
        assert!(dispatcher.is_registered("reset_game"));

        assert!(dispatcher.off("reset_game"));
        assert!(!dispatcher.is_registered("reset_game"));
        assert_eq!(
            dispatcher.dispatch(&Envelope::bare("reset_game")),
            DispatchOutcome::Unhandled
        );
    }

    #[test]
    fn test_handler_may_reregister_itself_without_deadlock() {
        // Arrange: a handler that swaps in a new handler when it runs
        let dispatcher = Arc::new(Dispatcher::new());
        let inner = Arc::clone(&dispatcher);
        let hits = Arc::new(Mutex::new(0u32));
        let hits_inner = Arc::clone(&hits);
        dispatcher.on("ping", move |_, _| {
            let hits_again = Arc::clone(&hits_inner);
            inner.on("ping", move |_, _| *hits_again.lock().unwrap() += 10);
        });

        // Act
        dispatcher.dispatch(&Envelope::bare("ping"));
        dispatcher.dispatch(&Envelope::bare("ping"));

        // Assert
        assert_eq!(*hits.lock().unwrap(), 10);
    }
}

//! In-process publish/subscribe registry.
//!
//! Listeners are registered under an event name and invoked synchronously,
//! in registration order, with a JSON payload. `emit` works on a snapshot of
//! the listener list taken under the read lock and calls listeners after
//! releasing it, so a listener may subscribe or unsubscribe re-entrantly
//! without deadlocking. A panicking listener is logged and skipped.
//!
//! The bus is passed around explicitly (typically as `Arc<EventBus>`).

use std::collections::HashMap;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, warn};

/// Event asking the UI shell to open the authentication panel.
pub const OPEN_AUTH_PANEL: &str = "open-auth-panel";

/// Shared callback handle. Clones are the same listener for
/// [`EventBus::unsubscribe`].
#[derive(Clone)]
pub struct Listener(Arc<dyn Fn(&Value) + Send + Sync>);

impl Listener {
    pub fn new(callback: impl Fn(&Value) + Send + Sync + 'static) -> Self {
        Self(Arc::new(callback))
    }

    fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn call(&self, payload: &Value) {
        (self.0)(payload);
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Listener(..)")
    }
}

/// Handle for one registration, returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subscription {
    event: String,
    id: u64,
}

impl Subscription {
    /// Event the registration belongs to.
    pub fn event(&self) -> &str {
        self.event.as_str()
    }
}

struct Entry {
    id: u64,
    listener: Listener,
}

/// Event-name keyed listener registry.
#[derive(Default)]
pub struct EventBus {
    listeners: RwLock<HashMap<String, Vec<Entry>>>,
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` under `event`.
    ///
    /// The same listener may be registered any number of times; each
    /// registration is invoked separately.
    pub fn subscribe(&self, event: &str, listener: Listener) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(event.to_owned())
            .or_default()
            .push(Entry { id, listener });
        Subscription {
            event: event.to_owned(),
            id,
        }
    }

    /// Remove every registration of `listener` under `event`.
    ///
    /// Unknown events or listeners are ignored.
    pub fn unsubscribe(&self, event: &str, listener: &Listener) {
        let mut listeners = self
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(entries) = listeners.get_mut(event) {
            entries.retain(|entry| !entry.listener.same_as(listener));
            if entries.is_empty() {
                listeners.remove(event);
            }
        }
    }

    /// Remove exactly the registration behind `subscription`.
    ///
    /// Returns `false` if it was already removed.
    pub fn cancel(&self, subscription: &Subscription) -> bool {
        let mut listeners = self
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let Some(entries) = listeners.get_mut(subscription.event()) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|entry| entry.id != subscription.id);
        let removed = entries.len() != before;
        if entries.is_empty() {
            listeners.remove(subscription.event());
        }
        removed
    }

    /// Number of registrations under `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event)
            .map_or(0, Vec::len)
    }

    /// Invoke every listener registered under `event` at the time of the call.
    pub fn emit(&self, event: &str, payload: &Value) {
        let snapshot: Vec<Listener> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event)
            .map(|entries| entries.iter().map(|entry| entry.listener.clone()).collect())
            .unwrap_or_default();
        debug!(event, listeners = snapshot.len(), "emitting event");

        for listener in snapshot {
            if catch_unwind(AssertUnwindSafe(|| listener.call(payload))).is_err() {
                warn!(event, "event listener panicked");
            }
        }
    }

    /// Ask the UI shell to open the authentication panel in `mode`.
    pub fn open_auth_panel(&self, mode: AuthPanelMode) {
        self.emit(OPEN_AUTH_PANEL, &json!({ "mode": mode }));
    }

    /// Subscribe to auth-panel requests with a typed callback.
    ///
    /// Payloads that do not name a known mode are delivered as
    /// [`AuthPanelMode::Login`].
    pub fn on_open_auth_panel(
        &self,
        callback: impl Fn(AuthPanelMode) + Send + Sync + 'static,
    ) -> Subscription {
        self.subscribe(
            OPEN_AUTH_PANEL,
            Listener::new(move |payload| callback(AuthPanelMode::from_payload(payload))),
        )
    }
}

/// Which form the authentication panel should show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthPanelMode {
    #[default]
    Login,
    Signup,
}

impl AuthPanelMode {
    fn from_payload(payload: &Value) -> Self {
        payload
            .get("mode")
            .cloned()
            .and_then(|mode| serde_json::from_value(mode).ok())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::sync::Mutex;

    #[fixture]
    fn bus() -> Arc<EventBus> {
        Arc::new(EventBus::new())
    }

    fn recorder(log: &Arc<Mutex<Vec<String>>>, tag: &'static str) -> Listener {
        let log = Arc::clone(log);
        Listener::new(move |payload| {
            log.lock()
                .expect("log lock")
                .push(format!("{tag}:{payload}"));
        })
    }

    fn calls(log: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
        log.lock().expect("log lock").clone()
    }

    #[rstest]
    fn listeners_run_in_registration_order(bus: Arc<EventBus>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe("saved", recorder(&log, "first"));
        bus.subscribe("saved", recorder(&log, "second"));
        bus.subscribe("other", recorder(&log, "other"));

        bus.emit("saved", &json!(1));
        assert_eq!(calls(&log), ["first:1", "second:1"]);
    }

    #[rstest]
    fn emitting_without_listeners_is_a_no_op(bus: Arc<EventBus>) {
        bus.emit("nobody-listens", &Value::Null);
        assert_eq!(bus.listener_count("nobody-listens"), 0);
    }

    #[rstest]
    fn unsubscribe_removes_every_registration_of_a_listener(bus: Arc<EventBus>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let twice = recorder(&log, "twice");
        bus.subscribe("saved", twice.clone());
        bus.subscribe("saved", recorder(&log, "kept"));
        bus.subscribe("saved", twice.clone());

        bus.unsubscribe("saved", &twice);
        bus.emit("saved", &json!("x"));
        assert_eq!(calls(&log), ["kept:\"x\""]);
    }

    #[rstest]
    fn unsubscribing_unknown_things_is_ignored(bus: Arc<EventBus>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let listener = recorder(&log, "a");
        bus.unsubscribe("missing", &listener);
        bus.subscribe("saved", listener);
        bus.unsubscribe("saved", &recorder(&log, "a"));
        assert_eq!(bus.listener_count("saved"), 1);
    }

    #[rstest]
    fn cancel_removes_exactly_one_registration(bus: Arc<EventBus>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let listener = recorder(&log, "dup");
        let first = bus.subscribe("saved", listener.clone());
        bus.subscribe("saved", listener);

        assert!(bus.cancel(&first));
        assert!(!bus.cancel(&first));
        bus.emit("saved", &json!(2));
        assert_eq!(calls(&log), ["dup:2"]);
    }

    #[rstest]
    fn panicking_listener_does_not_stop_the_rest(bus: Arc<EventBus>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe("saved", Listener::new(|_| panic!("listener failure")));
        bus.subscribe("saved", recorder(&log, "after"));

        bus.emit("saved", &json!(true));
        assert_eq!(calls(&log), ["after:true"]);
    }

    #[rstest]
    fn listeners_added_during_emit_wait_for_the_next_one(bus: Arc<EventBus>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let inner_bus = Arc::clone(&bus);
        let inner_log = Arc::clone(&log);
        bus.subscribe(
            "saved",
            Listener::new(move |_| {
                inner_bus.subscribe("saved", recorder(&inner_log, "late"));
            }),
        );

        bus.emit("saved", &json!(1));
        assert!(calls(&log).is_empty());
        bus.emit("saved", &json!(2));
        assert_eq!(calls(&log), ["late:2"]);
    }

    #[rstest]
    #[case(json!({ "mode": "signup" }), AuthPanelMode::Signup)]
    #[case(json!({ "mode": "login" }), AuthPanelMode::Login)]
    #[case(json!({ "mode": "register" }), AuthPanelMode::Login)]
    #[case(json!({}), AuthPanelMode::Login)]
    #[case(Value::Null, AuthPanelMode::Login)]
    fn auth_panel_payloads_decode_with_login_default(
        bus: Arc<EventBus>,
        #[case] payload: Value,
        #[case] expected: AuthPanelMode,
    ) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        bus.on_open_auth_panel(move |mode| sink.lock().expect("seen lock").push(mode));

        bus.emit(OPEN_AUTH_PANEL, &payload);
        assert_eq!(*seen.lock().expect("seen lock"), [expected]);
    }

    #[rstest]
    fn open_auth_panel_emits_the_mode(bus: Arc<EventBus>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe(OPEN_AUTH_PANEL, recorder(&log, "panel"));

        bus.open_auth_panel(AuthPanelMode::Signup);
        bus.open_auth_panel(AuthPanelMode::default());
        assert_eq!(
            calls(&log),
            [r#"panel:{"mode":"signup"}"#, r#"panel:{"mode":"login"}"#]
        );
    }
}

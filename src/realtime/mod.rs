//! Change notifications for the `note` table.
//!
//! The backend pushes row changes over a Phoenix channel websocket.
//! [`protocol`] encodes and decodes the JSON frames, [`ChangeBindings`] maps
//! a change kind to the action it triggers, and [`RealtimeSubscription`]
//! owns the live socket.

pub(crate) mod protocol;
mod socket;

pub(crate) use socket::RealtimeSubscription;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub(crate) enum ChangeKind {
    Insert,
    Update,
    Delete,
}

type Handler = Box<dyn Fn()>;

/// Event kind to action table for one subscription.
#[derive(Default)]
pub(crate) struct ChangeBindings {
    handlers: HashMap<ChangeKind, Handler>,
}

impl ChangeBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, kind: ChangeKind, handler: impl Fn() + 'static) -> Self {
        self.handlers.insert(kind, Box::new(handler));
        self
    }

    /// Kinds the server should be asked to push, in a stable order.
    pub fn kinds(&self) -> Vec<ChangeKind> {
        let mut kinds: Vec<ChangeKind> = self.handlers.keys().copied().collect();
        kinds.sort_by_key(|k| *k as u8);
        kinds
    }

    /// Run the handler bound to `kind`. Returns false when nothing is bound.
    pub fn dispatch(&self, kind: ChangeKind) -> bool {
        match self.handlers.get(&kind) {
            Some(handler) => {
                tracing::debug!(%kind, "dispatching change notification");
                handler();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use std::str::FromStr;

    #[test]
    fn test_change_kind_wire_names() {
        assert_eq!(ChangeKind::Update.to_string(), "UPDATE");
        assert_eq!(ChangeKind::from_str("DELETE").ok(), Some(ChangeKind::Delete));
        assert!(ChangeKind::from_str("TRUNCATE").is_err());
        assert_eq!(
            serde_json::to_value(ChangeKind::Insert).expect("serialize"),
            serde_json::json!("INSERT")
        );
    }

    #[test]
    fn test_dispatch_runs_only_bound_kind() {
        let refetches = Rc::new(Cell::new(0));
        let r = refetches.clone();
        let bindings = ChangeBindings::new().on(ChangeKind::Update, move || r.set(r.get() + 1));

        assert!(bindings.dispatch(ChangeKind::Update));
        assert!(bindings.dispatch(ChangeKind::Update));
        assert!(!bindings.dispatch(ChangeKind::Insert));
        assert!(!bindings.dispatch(ChangeKind::Delete));
        assert_eq!(refetches.get(), 2);
    }

    #[test]
    fn test_kinds_are_sorted() {
        let bindings = ChangeBindings::new()
            .on(ChangeKind::Delete, || {})
            .on(ChangeKind::Insert, || {});
        assert_eq!(bindings.kinds(), vec![ChangeKind::Insert, ChangeKind::Delete]);
    }
}

use super::protocol::{self, Incoming, HEARTBEAT_INTERVAL_MS, RECONNECT_DELAY_MS};
use super::{ChangeBindings, ChangeKind};
use crate::config::EnvConfig;
use crate::store::{StoreError, StoreResult};
use leptos_dom::helpers::{set_interval_with_handle, set_timeout_with_handle, IntervalHandle, TimeoutHandle};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, Event, MessageEvent, WebSocket};

/// A live change subscription on one table.
///
/// Holding the value keeps the socket, its heartbeat and its handlers
/// alive. A socket the server drops is reopened after a fixed delay.
/// Dropping the value leaves the channel, stops the heartbeat and closes
/// the socket for good.
pub(crate) struct RealtimeSubscription {
    channel: Rc<Channel>,
}

struct Channel {
    url: String,
    token: String,
    table: String,
    kinds: Vec<ChangeKind>,
    bindings: Rc<ChangeBindings>,
    refs: Rc<Cell<u64>>,
    live: RefCell<Option<Connection>>,
    retry: Cell<Option<TimeoutHandle>>,
    released: Cell<bool>,
}

/// One websocket and the handlers attached to it.
struct Connection {
    socket: WebSocket,
    heartbeat: Option<IntervalHandle>,
    _on_open: Closure<dyn FnMut(Event)>,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    _on_close: Closure<dyn FnMut(CloseEvent)>,
    _on_error: Closure<dyn FnMut(Event)>,
}

fn next_ref(refs: &Cell<u64>) -> String {
    let n = refs.get() + 1;
    refs.set(n);
    n.to_string()
}

fn send(socket: &WebSocket, frame: &protocol::Frame) {
    if let Err(e) = socket.send_with_str(&frame.encode()) {
        tracing::warn!(event = %frame.event, error = ?e, "realtime send failed");
    }
}

impl RealtimeSubscription {
    pub fn connect(config: &EnvConfig, table: &str, bindings: ChangeBindings) -> StoreResult<Self> {
        let channel = Rc::new(Channel {
            url: config.realtime_url(),
            token: config.supabase_anon_key.clone(),
            table: table.to_string(),
            kinds: bindings.kinds(),
            bindings: Rc::new(bindings),
            refs: Rc::new(Cell::new(0)),
            live: RefCell::new(None),
            retry: Cell::new(None),
            released: Cell::new(false),
        });

        let conn = open(&channel)?;
        *channel.live.borrow_mut() = Some(conn);
        Ok(Self { channel })
    }
}

fn open(channel: &Rc<Channel>) -> StoreResult<Connection> {
    let socket = WebSocket::new(&channel.url).map_err(|e| StoreError::Realtime(format!("{e:?}")))?;

    let on_open = {
        let socket = socket.clone();
        let refs = channel.refs.clone();
        let table = channel.table.clone();
        let kinds = channel.kinds.clone();
        let token = channel.token.clone();
        Closure::<dyn FnMut(Event)>::new(move |_ev: Event| {
            let r = next_ref(&refs);
            send(&socket, &protocol::join(&table, &kinds, &token, &r));
            tracing::debug!(%table, "realtime channel joining");
        })
    };

    let on_message = {
        let table = channel.table.clone();
        let bindings = channel.bindings.clone();
        Closure::<dyn FnMut(MessageEvent)>::new(move |ev: MessageEvent| {
            let Some(text) = ev.data().as_string() else {
                return;
            };
            match protocol::decode(&text, &table) {
                Ok(Incoming::Change(kind)) => {
                    bindings.dispatch(kind);
                }
                Ok(Incoming::JoinFailed(reason)) => {
                    tracing::warn!(%table, %reason, "realtime channel rejected");
                }
                Ok(Incoming::Ignored) => {}
                Err(e) => tracing::warn!(error = %e, "undecodable realtime frame"),
            }
        })
    };

    // The handler belongs to the connection it would replace, so the swap
    // happens in the timer callback and never inside this closure.
    let on_close = {
        let weak = Rc::downgrade(channel);
        Closure::<dyn FnMut(CloseEvent)>::new(move |ev: CloseEvent| {
            let code = ev.code();
            if !protocol::should_reconnect(code) {
                tracing::info!(code, "realtime socket closed");
                return;
            }
            tracing::error!(
                code,
                reason = %ev.reason(),
                retry_ms = RECONNECT_DELAY_MS,
                "realtime socket dropped; live refresh paused"
            );
            schedule_reconnect(&weak);
        })
    };

    let on_error = Closure::<dyn FnMut(Event)>::new(move |_ev: Event| {
        tracing::warn!("realtime socket error");
    });

    socket.set_onopen(Some(on_open.as_ref().unchecked_ref()));
    socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
    socket.set_onclose(Some(on_close.as_ref().unchecked_ref()));
    socket.set_onerror(Some(on_error.as_ref().unchecked_ref()));

    let heartbeat = {
        let socket = socket.clone();
        let refs = channel.refs.clone();
        set_interval_with_handle(
            move || {
                if socket.ready_state() == WebSocket::OPEN {
                    send(&socket, &protocol::heartbeat(&next_ref(&refs)));
                }
            },
            Duration::from_millis(HEARTBEAT_INTERVAL_MS),
        )
    };
    let heartbeat = match heartbeat {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!(error = ?e, "realtime heartbeat not scheduled");
            None
        }
    };

    Ok(Connection {
        socket,
        heartbeat,
        _on_open: on_open,
        _on_message: on_message,
        _on_close: on_close,
        _on_error: on_error,
    })
}

fn schedule_reconnect(weak: &Weak<Channel>) {
    let Some(channel) = weak.upgrade() else {
        return;
    };
    if channel.released.get() {
        return;
    }

    let weak = weak.clone();
    let scheduled = set_timeout_with_handle(
        move || {
            if let Some(channel) = weak.upgrade() {
                reconnect(&channel);
            }
        },
        Duration::from_millis(RECONNECT_DELAY_MS),
    );
    match scheduled {
        Ok(handle) => channel.retry.set(Some(handle)),
        Err(e) => tracing::error!(error = ?e, "realtime reconnect not scheduled"),
    }
}

fn reconnect(channel: &Rc<Channel>) {
    channel.retry.set(None);
    if channel.released.get() {
        return;
    }

    match open(channel) {
        Ok(conn) => {
            tracing::info!(table = %channel.table, "realtime socket reopened");
            // Drops the dead connection and its handlers.
            channel.live.replace(Some(conn));
        }
        Err(e) => {
            tracing::error!(error = %e, "realtime reconnect failed");
            schedule_reconnect(&Rc::downgrade(channel));
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if let Some(handle) = self.heartbeat.take() {
            handle.clear();
        }

        // Handlers are freed with `self`; detach them first so a late event
        // never calls into a dropped closure.
        self.socket.set_onopen(None);
        self.socket.set_onmessage(None);
        self.socket.set_onclose(None);
        self.socket.set_onerror(None);
        let _ = self.socket.close();
    }
}

impl Drop for RealtimeSubscription {
    fn drop(&mut self) {
        let channel = &self.channel;
        channel.released.set(true);
        if let Some(handle) = channel.retry.take() {
            handle.clear();
        }

        if let Some(conn) = channel.live.borrow_mut().take() {
            if conn.socket.ready_state() == WebSocket::OPEN {
                send(&conn.socket, &protocol::leave(&channel.table, &next_ref(&channel.refs)));
            }
        }

        tracing::debug!(table = %channel.table, "realtime subscription released");
    }
}

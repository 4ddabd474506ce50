//! Realtime job channel: one STOMP connection per session, many topic
//! subscriptions on top of it.
//!
//! The channel owns the protocol state (token, subscriptions, connection
//! generation). Moving bytes is delegated to a [`Connector`], which drives
//! the transport and reports back through a [`ChannelLink`]. Every
//! `activate` bumps the generation, so links of a replaced connection become
//! inert and can never deliver into the new session.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use contracts::domain::a001_maintenance_job::JobEvent;
use futures_channel::mpsc::UnboundedSender;

use super::stomp::{parse_frames, Command, Frame};
use crate::shared::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Topic(String);

impl Topic {
    /// Broadcast topic with every job change
    pub fn jobs_broadcast() -> Self {
        Topic("/topic/jobs".to_string())
    }

    /// Jobs relevant to one user
    pub fn user_jobs(user_id: i64) -> Self {
        Topic(format!("/user/{}/jobs", user_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Inactive,
    Connecting,
    Connected,
    Reconnecting,
}

impl ConnectionState {
    pub fn is_active(&self) -> bool {
        *self != ConnectionState::Inactive
    }
}

/// Starts a transport for the given link.
///
/// Implementations keep reconnecting while `link.is_current()` holds.
pub trait Connector {
    fn connect(&self, link: ChannelLink);
}

type Handler = Rc<dyn Fn(&str)>;
type Listener = Rc<dyn Fn()>;
type StateObserver = Rc<dyn Fn(ConnectionState)>;

struct Registration {
    topic: Topic,
    handler: Handler,
}

struct ChannelInner {
    state: ConnectionState,
    token: Option<String>,
    generation: u64,
    outbound: Option<UnboundedSender<Frame>>,
    subscriptions: BTreeMap<u64, Registration>,
    reconnect_listeners: BTreeMap<u64, Listener>,
    next_id: u64,
    connected_once: bool,
    state_observer: Option<StateObserver>,
}

impl ChannelInner {
    fn send(&self, frame: Frame) {
        if let Some(tx) = &self.outbound {
            if tx.unbounded_send(frame).is_err() {
                log::debug!("[realtime] outbound queue closed, frame dropped");
            }
        }
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

fn subscription_header(id: u64) -> String {
    format!("sub-{}", id)
}

fn parse_subscription_header(value: &str) -> Option<u64> {
    value.strip_prefix("sub-")?.parse().ok()
}

/// Parse a jobs-topic payload; malformed bodies never reach view code
pub fn parse_job_event(body: &str) -> Result<JobEvent, AppError> {
    serde_json::from_str(body)
        .map_err(|e| AppError::MappingError(format!("malformed job event: {}", e)))
}

#[derive(Clone)]
pub struct JobChannel {
    inner: Rc<RefCell<ChannelInner>>,
    connector: Rc<dyn Connector>,
}

impl JobChannel {
    pub fn new(connector: Rc<dyn Connector>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ChannelInner {
                state: ConnectionState::Inactive,
                token: None,
                generation: 0,
                outbound: None,
                subscriptions: BTreeMap::new(),
                reconnect_listeners: BTreeMap::new(),
                next_id: 0,
                connected_once: false,
                state_observer: None,
            })),
            connector,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.inner.borrow().state
    }

    pub fn active_token(&self) -> Option<String> {
        self.inner.borrow().token.clone()
    }

    /// Single observer for connection state changes (status indicator)
    pub fn set_state_observer(&self, observer: impl Fn(ConnectionState) + 'static) {
        self.inner.borrow_mut().state_observer = Some(Rc::new(observer));
    }

    /// Open the connection for `token`.
    ///
    /// No-op if already active with the same token. A different token closes
    /// the current connection first.
    pub fn activate(&self, token: &str) {
        {
            let inner = self.inner.borrow();
            if inner.state.is_active() && inner.token.as_deref() == Some(token) {
                return;
            }
        }
        self.deactivate();

        let link = {
            let mut inner = self.inner.borrow_mut();
            inner.generation += 1;
            inner.token = Some(token.to_string());
            inner.state = ConnectionState::Connecting;
            inner.connected_once = false;
            ChannelLink {
                inner: Rc::downgrade(&self.inner),
                generation: inner.generation,
                token: token.to_string(),
            }
        };
        log::info!("[realtime] activating connection #{}", link.generation);
        notify_state(&self.inner);
        self.connector.connect(link);
    }

    /// Close the connection and drop every subscription.
    ///
    /// Returns `false` when there was nothing to close.
    pub fn deactivate(&self) -> bool {
        {
            let mut inner = self.inner.borrow_mut();
            if !inner.state.is_active() {
                return false;
            }
            if let Some(tx) = inner.outbound.take() {
                let _ = tx.unbounded_send(Frame::disconnect());
                tx.close_channel();
            }
            log::info!("[realtime] deactivating connection #{}", inner.generation);
            inner.generation += 1;
            inner.state = ConnectionState::Inactive;
            inner.token = None;
            inner.subscriptions.clear();
        }
        notify_state(&self.inner);
        true
    }

    /// Register `handler` for raw message bodies on `topic`.
    ///
    /// Allowed while connecting; the SUBSCRIBE goes out once the broker
    /// acknowledges the connection. Delivery stops when the returned guard is
    /// dropped.
    pub fn subscribe(
        &self,
        topic: Topic,
        handler: impl Fn(&str) + 'static,
    ) -> Result<Subscription, AppError> {
        let mut inner = self.inner.borrow_mut();
        if !inner.state.is_active() {
            log::warn!("[realtime] subscribe to {} without an active connection", topic);
            return Err(AppError::NotActive);
        }

        let id = inner.allocate_id();
        if inner.state == ConnectionState::Connected {
            inner.send(Frame::subscribe(&subscription_header(id), topic.as_str()));
        }
        log::debug!("[realtime] subscribed to {} as sub-{}", topic, id);
        inner.subscriptions.insert(
            id,
            Registration {
                topic: topic.clone(),
                handler: Rc::new(handler),
            },
        );

        Ok(Subscription {
            inner: Rc::downgrade(&self.inner),
            id,
            topic,
        })
    }

    /// Typed subscription for the jobs topics
    pub fn subscribe_jobs(
        &self,
        topic: Topic,
        handler: impl Fn(JobEvent) + 'static,
    ) -> Result<Subscription, AppError> {
        let label = topic.to_string();
        self.subscribe(topic, move |body| match parse_job_event(body) {
            Ok(event) => handler(event),
            Err(e) => log::error!("[realtime] {} on {}", e, label),
        })
    }

    /// `listener` runs after every reconnection (not the first connect)
    pub fn on_reconnect(&self, listener: impl Fn() + 'static) -> ReconnectListener {
        let mut inner = self.inner.borrow_mut();
        let id = inner.allocate_id();
        inner.reconnect_listeners.insert(id, Rc::new(listener));
        ReconnectListener {
            inner: Rc::downgrade(&self.inner),
            id,
        }
    }

    #[cfg(test)]
    pub(crate) fn subscription_count(&self) -> usize {
        self.inner.borrow().subscriptions.len()
    }
}

fn notify_state(inner: &Rc<RefCell<ChannelInner>>) {
    let (observer, state) = {
        let guard = inner.borrow();
        (guard.state_observer.clone(), guard.state)
    };
    if let Some(observer) = observer {
        observer(state);
    }
}

fn on_connected(inner: &Rc<RefCell<ChannelInner>>) {
    let listeners: Vec<Listener> = {
        let mut guard = inner.borrow_mut();
        guard.state = ConnectionState::Connected;
        let frames: Vec<Frame> = guard
            .subscriptions
            .iter()
            .map(|(id, reg)| Frame::subscribe(&subscription_header(*id), reg.topic.as_str()))
            .collect();
        for frame in frames {
            guard.send(frame);
        }
        let reconnected = guard.connected_once;
        guard.connected_once = true;
        if reconnected {
            log::info!("[realtime] reconnected, {} subscription(s) restored", guard.subscriptions.len());
            guard.reconnect_listeners.values().cloned().collect()
        } else {
            log::info!("[realtime] connected");
            Vec::new()
        }
    };
    notify_state(inner);
    for listener in listeners {
        listener();
    }
}

fn deliver(inner: &Rc<RefCell<ChannelInner>>, frame: &Frame) {
    // Handler is cloned out so it may (un)subscribe while running
    let handler = {
        let guard = inner.borrow();
        frame
            .get("subscription")
            .and_then(parse_subscription_header)
            .and_then(|id| guard.subscriptions.get(&id))
            .map(|reg| reg.handler.clone())
    };
    match handler {
        Some(handler) => handler(&frame.body),
        None => log::debug!(
            "[realtime] message for unknown subscription {:?}",
            frame.get("subscription")
        ),
    }
}

/// Transport-side handle of one connection generation
#[derive(Clone)]
pub struct ChannelLink {
    inner: Weak<RefCell<ChannelInner>>,
    generation: u64,
    token: String,
}

impl ChannelLink {
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// False once the channel was deactivated or re-activated
    pub fn is_current(&self) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.borrow().generation == self.generation)
            .unwrap_or(false)
    }

    /// Socket is open: install the outbound queue and send CONNECT
    pub fn attach(&self, outbound: UnboundedSender<Frame>) -> bool {
        let Some(inner) = self.inner.upgrade() else {
            return false;
        };
        let mut guard = inner.borrow_mut();
        if guard.generation != self.generation {
            return false;
        }
        let _ = outbound.unbounded_send(Frame::connect(&self.token));
        guard.outbound = Some(outbound);
        true
    }

    /// Feed one WebSocket text payload; frames are handled in order
    pub fn receive(&self, payload: &str) {
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        for parsed in parse_frames(payload) {
            if inner.borrow().generation != self.generation {
                return;
            }
            let frame = match parsed {
                Ok(frame) => frame,
                Err(e) => {
                    log::error!("[realtime] dropping unreadable frame: {}", e);
                    continue;
                }
            };
            match frame.command {
                Command::Connected => on_connected(&inner),
                Command::Message => deliver(&inner, &frame),
                Command::Error => log::error!(
                    "[realtime] broker error: {} {}",
                    frame.get("message").unwrap_or_default(),
                    frame.body
                ),
                other => log::debug!("[realtime] ignoring {} frame", other),
            }
        }
    }

    /// Transport lost; the connector will retry
    pub fn detach(&self) {
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        {
            let mut guard = inner.borrow_mut();
            if guard.generation != self.generation {
                return;
            }
            guard.outbound = None;
            guard.state = ConnectionState::Reconnecting;
        }
        log::warn!("[realtime] connection #{} lost", self.generation);
        notify_state(&inner);
    }
}

/// Active topic subscription; dropping it stops delivery immediately
pub struct Subscription {
    inner: Weak<RefCell<ChannelInner>>,
    id: u64,
    topic: Topic,
}

impl Subscription {
    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        let Ok(mut guard) = inner.try_borrow_mut() else {
            log::error!("[realtime] channel busy, sub-{} not released", self.id);
            return;
        };
        if guard.subscriptions.remove(&self.id).is_some() {
            if guard.state == ConnectionState::Connected {
                guard.send(Frame::unsubscribe(&subscription_header(self.id)));
            }
            log::debug!("[realtime] unsubscribed sub-{} from {}", self.id, self.topic);
        }
    }
}

pub struct ReconnectListener {
    inner: Weak<RefCell<ChannelInner>>,
    id: u64,
}

impl Drop for ReconnectListener {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            if let Ok(mut guard) = inner.try_borrow_mut() {
                guard.reconnect_listeners.remove(&self.id);
            }
        }
    }
}

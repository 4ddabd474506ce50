//! WebSocket transport for [`JobChannel`](super::channel::JobChannel).

use std::time::Duration;

use futures_channel::mpsc::unbounded;
use futures_util::{select, SinkExt, StreamExt};
use gloo_net::websocket::{futures::WebSocket, Message};
use gloo_timers::future::sleep;
use wasm_bindgen_futures::spawn_local;

use super::backoff::Backoff;
use super::channel::{ChannelLink, Connector};
use super::stomp::Frame;
use crate::shared::api_utils::realtime_url;
use crate::shared::config::{load_config, RealtimeConfig};

pub struct WebSocketConnector {
    url: String,
    initial: Duration,
    max: Duration,
}

impl WebSocketConnector {
    pub fn new(url: String, config: &RealtimeConfig) -> Self {
        Self {
            url,
            initial: config.reconnect_initial(),
            max: config.reconnect_max(),
        }
    }

    pub fn from_config() -> Self {
        let config = load_config();
        Self::new(realtime_url(), &config.realtime)
    }
}

impl Connector for WebSocketConnector {
    fn connect(&self, link: ChannelLink) {
        let url = self.url.clone();
        let mut backoff = Backoff::new(self.initial, self.max);

        spawn_local(async move {
            while link.is_current() {
                match run_once(&url, &link).await {
                    Ok(true) => backoff.reset(),
                    Ok(false) => {}
                    Err(e) => log::warn!("[realtime] socket error on #{}: {}", link.generation(), e),
                }
                link.detach();
                if !link.is_current() {
                    break;
                }
                let delay = backoff.next_delay();
                log::info!("[realtime] reconnecting in {} ms", delay.as_millis());
                sleep(delay).await;
            }
            log::debug!("[realtime] driver for #{} stopped", link.generation());
        });
    }
}

/// One socket lifetime. `Ok(true)` if the broker ever answered.
async fn run_once(url: &str, link: &ChannelLink) -> Result<bool, String> {
    let socket = WebSocket::open(url).map_err(|e| e.to_string())?;
    let (mut sink, stream) = socket.split();
    let (tx, rx) = unbounded::<Frame>();
    if !link.attach(tx) {
        let _ = sink.close().await;
        return Ok(false);
    }

    let mut outbound = rx.fuse();
    let mut inbound = stream.fuse();
    let mut received = false;

    loop {
        select! {
            frame = outbound.next() => match frame {
                Some(frame) => sink
                    .send(Message::Text(frame.encode()))
                    .await
                    .map_err(|e| e.to_string())?,
                // Queue closed by deactivate, DISCONNECT already flushed
                None => {
                    let _ = sink.close().await;
                    return Ok(received);
                }
            },
            message = inbound.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    received = true;
                    link.receive(&text);
                }
                Some(Ok(Message::Bytes(bytes))) => {
                    received = true;
                    link.receive(&String::from_utf8_lossy(&bytes));
                }
                Some(Err(e)) => return Err(e.to_string()),
                None => return Ok(received),
            },
        }
    }
}

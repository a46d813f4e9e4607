//! Async WebSocket driver for the bridge connection.
//!
//! The driver task owns the socket and executes the [`LinkStateMachine`]:
//! dial, pump frames, fold failures into a `Disconnected` transition, sleep
//! the fixed retry delay, redial. Inbound topic messages are forwarded
//! through a bounded mpsc channel as [`ConnectionEvent`]s.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use futures_util::{SinkExt as _, StreamExt as _};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::error::BridgeError;
use crate::message::BridgeMessage;
use crate::protocol::{ClientOp, ServerOp, StatusLevel};
use crate::session::{LinkAction, LinkEvent, LinkState, LinkStateMachine};

/// Channel capacity for inbound events (applies backpressure when full).
const EVENT_CHANNEL_CAPACITY: usize = 4096;

/// Configuration for one bridge connection.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// WebSocket endpoint of the rosbridge server.
    pub endpoint: String,

    /// Fixed delay between reconnect attempts.
    pub retry_delay: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            endpoint: "ws://127.0.0.1:9090".to_owned(),
            retry_delay: Duration::from_millis(3000),
        }
    }
}

/// Events emitted by the connection driver.
#[derive(Debug)]
pub enum ConnectionEvent {
    /// The link changed state; carries a human-readable reason.
    Status(LinkState, String),

    /// The session (re)opened; subscriptions and publishers must be
    /// re-established by the application.
    Ready,

    /// An inbound message on a subscribed topic.
    Message(BridgeMessage),
}

/// Cheaply cloneable handle for sending operations to the driver task.
#[derive(Clone)]
pub struct ConnectionHandle {
    op_tx: mpsc::UnboundedSender<ClientOp>,
    link_rx: watch::Receiver<LinkState>,
    publishers: Arc<Mutex<HashMap<String, String>>>,
    shutdown_tx: Arc<watch::Sender<bool>>,
}

impl ConnectionHandle {
    /// The current link state.
    pub fn state(&self) -> LinkState {
        *self.link_rx.borrow()
    }

    /// Register a publisher for a topic. Publishing on an unregistered
    /// topic is a caller ordering bug and fails synchronously.
    pub fn register_publisher(&self, topic: &str, msg_type: &str) {
        if let Ok(mut publishers) = self.publishers.lock() {
            publishers.insert(topic.to_owned(), msg_type.to_owned());
        }
    }

    /// Publish a message on a registered topic. Fire-and-forget on the
    /// wire, but checked locally: the caller must have registered the
    /// publisher and the link must be up.
    pub fn publish(&self, topic: &str, msg: serde_json::Value) -> Result<(), BridgeError> {
        let msg_type = self
            .publishers
            .lock()
            .ok()
            .and_then(|publishers| publishers.get(topic).cloned())
            .ok_or_else(|| BridgeError::NotAdvertised(topic.to_owned()))?;

        if self.state() != LinkState::Connected {
            return Err(BridgeError::NotConnected);
        }

        self.op_tx
            .send(ClientOp::publish(topic, msg_type, msg))
            .map_err(|_| BridgeError::ChannelClosed)
    }

    /// Send a raw protocol operation, dropped silently when the link is
    /// down. Subscription plumbing uses this: registrations are replayed
    /// on every `Ready`, so an op lost to a dead link is re-sent then.
    pub fn send_op(&self, op: ClientOp) {
        if self.state() != LinkState::Connected {
            tracing::debug!("link down, dropping {op:?}");
            return;
        }
        if self.op_tx.send(op).is_err() {
            tracing::debug!("connection driver gone, dropping op");
        }
    }

    /// Request teardown: cancels any pending reconnect and closes the
    /// socket. Idempotent.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

/// Spawns and owns the driver task for one bridge connection.
pub struct BridgeConnection;

impl BridgeConnection {
    /// Spawn the connection driver. Returns the handle for outbound
    /// operations and the event stream the application must drain.
    pub fn spawn(config: ConnectionConfig) -> (ConnectionHandle, mpsc::Receiver<ConnectionEvent>) {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (op_tx, op_rx) = mpsc::unbounded_channel();
        let (link_tx, link_rx) = watch::channel(LinkState::Disconnected);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = ConnectionHandle {
            op_tx,
            link_rx,
            publishers: Arc::new(Mutex::new(HashMap::new())),
            shutdown_tx: Arc::new(shutdown_tx),
        };

        tokio::spawn(run_driver(config, event_tx, op_rx, link_tx, shutdown_rx));

        (handle, event_rx)
    }

    /// Create a handle that is not backed by a driver task: operations land
    /// in the returned receiver and the link state is controlled by the
    /// returned sender. Used by unit tests and harnesses.
    pub fn loopback() -> (
        ConnectionHandle,
        mpsc::UnboundedReceiver<ClientOp>,
        watch::Sender<LinkState>,
    ) {
        let (op_tx, op_rx) = mpsc::unbounded_channel();
        let (link_tx, link_rx) = watch::channel(LinkState::Disconnected);
        let (shutdown_tx, _shutdown_rx) = watch::channel(false);

        let handle = ConnectionHandle {
            op_tx,
            link_rx,
            publishers: Arc::new(Mutex::new(HashMap::new())),
            shutdown_tx: Arc::new(shutdown_tx),
        };

        (handle, op_rx, link_tx)
    }
}

/// How a live socket session ended.
enum SessionEnd {
    Failed(String),
    Shutdown,
}

/// Pending control-flow work extracted from state machine actions.
#[derive(Default)]
struct PendingWork {
    open_transport: bool,
    retry: Option<Duration>,
}

/// Execute state machine actions. Returns `false` when the event receiver
/// is gone and the driver should stop.
async fn execute(
    actions: Vec<LinkAction>,
    work: &mut PendingWork,
    event_tx: &mpsc::Sender<ConnectionEvent>,
    link_tx: &watch::Sender<LinkState>,
) -> bool {
    for action in actions {
        match action {
            LinkAction::OpenTransport => work.open_transport = true,
            LinkAction::ScheduleRetry(delay) => work.retry = Some(delay),
            LinkAction::CancelRetry => work.retry = None,
            LinkAction::NotifyStatus(state, reason) => {
                let _ = link_tx.send(state);
                tracing::info!("bridge link {state}: {reason}");
                if event_tx
                    .send(ConnectionEvent::Status(state, reason))
                    .await
                    .is_err()
                {
                    return false;
                }
            }
            LinkAction::EmitReady => {
                if event_tx.send(ConnectionEvent::Ready).await.is_err() {
                    return false;
                }
            }
        }
    }
    true
}

async fn run_driver(
    config: ConnectionConfig,
    event_tx: mpsc::Sender<ConnectionEvent>,
    mut op_rx: mpsc::UnboundedReceiver<ClientOp>,
    link_tx: watch::Sender<LinkState>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut machine = LinkStateMachine::new(config.retry_delay);
    let mut work = PendingWork::default();

    if !execute(
        machine.handle(LinkEvent::ConnectRequested),
        &mut work,
        &event_tx,
        &link_tx,
    )
    .await
    {
        return;
    }

    loop {
        if work.open_transport {
            work.open_transport = false;
            let event = match connect_async(config.endpoint.as_str()).await {
                Ok((socket, _response)) => {
                    // Ops queued while the link was down are stale: the
                    // application replays its registrations on Ready.
                    while op_rx.try_recv().is_ok() {}

                    if !execute(
                        machine.handle(LinkEvent::TransportOpen),
                        &mut work,
                        &event_tx,
                        &link_tx,
                    )
                    .await
                    {
                        return;
                    }

                    match pump_session(socket, &mut op_rx, &event_tx, &mut shutdown_rx).await {
                        SessionEnd::Failed(reason) => LinkEvent::TransportFailed(reason),
                        SessionEnd::Shutdown => LinkEvent::ShutdownRequested,
                    }
                }
                Err(e) => LinkEvent::TransportFailed(format!("connect failed: {e}")),
            };
            if !execute(machine.handle(event), &mut work, &event_tx, &link_tx).await {
                return;
            }
            continue;
        }

        if let Some(delay) = work.retry.take() {
            let event = tokio::select! {
                () = tokio::time::sleep(delay) => LinkEvent::RetryElapsed,
                _ = shutdown_rx.changed() => LinkEvent::ShutdownRequested,
            };
            if !execute(machine.handle(event), &mut work, &event_tx, &link_tx).await {
                return;
            }
            continue;
        }

        // Nothing pending: shutdown completed, or terminal idle.
        break;
    }

    tracing::debug!("connection driver stopped");
}

/// Pump one live socket session until it fails or shutdown is requested.
async fn pump_session(
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
    op_rx: &mut mpsc::UnboundedReceiver<ClientOp>,
    event_tx: &mpsc::Sender<ConnectionEvent>,
    shutdown_rx: &mut watch::Receiver<bool>,
) -> SessionEnd {
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            maybe_op = op_rx.recv() => {
                let Some(op) = maybe_op else {
                    // Every handle is gone; nobody can drive this session.
                    return SessionEnd::Shutdown;
                };
                let text = match serde_json::to_string(&op) {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::warn!("failed to encode {op:?}: {e}");
                        continue;
                    }
                };
                if let Err(e) = sink.send(WsMessage::Text(text)).await {
                    return SessionEnd::Failed(format!("send failed: {e}"));
                }
            }
            maybe_frame = stream.next() => {
                match maybe_frame {
                    Some(Ok(WsMessage::Text(text))) => {
                        if !handle_frame(&text, event_tx).await {
                            return SessionEnd::Shutdown;
                        }
                    }
                    Some(Ok(WsMessage::Close(_))) => {
                        return SessionEnd::Failed("server closed the connection".to_owned());
                    }
                    Some(Ok(_)) => {
                        // Binary and ping/pong frames carry no topic data.
                    }
                    Some(Err(e)) => {
                        return SessionEnd::Failed(format!("transport error: {e}"));
                    }
                    None => {
                        return SessionEnd::Failed("connection closed".to_owned());
                    }
                }
            }
            _ = shutdown_rx.changed() => {
                let _ = sink.send(WsMessage::Close(None)).await;
                return SessionEnd::Shutdown;
            }
        }
    }
}

/// Parse and dispatch one inbound text frame. Returns `false` when the
/// event receiver is gone.
async fn handle_frame(text: &str, event_tx: &mpsc::Sender<ConnectionEvent>) -> bool {
    match ServerOp::parse(text) {
        Ok(ServerOp::Publish { topic, msg }) => {
            let now = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos() as u64;

            let message = BridgeMessage {
                topic_name: topic,
                msg,
                receive_time_ns: now,
            };

            event_tx
                .send(ConnectionEvent::Message(message))
                .await
                .is_ok()
        }
        Ok(ServerOp::Status { level, msg }) => {
            match level {
                StatusLevel::Error => tracing::error!("bridge status: {msg}"),
                StatusLevel::Warning => tracing::warn!("bridge status: {msg}"),
                StatusLevel::Info | StatusLevel::None => tracing::info!("bridge status: {msg}"),
            }
            true
        }
        Err(e) => {
            tracing::debug!("ignoring unrecognized frame: {e}");
            true
        }
    }
}

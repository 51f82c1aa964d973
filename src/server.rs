//! WebSocket server: socket pumps around a single serial engine task.
//!
//! Each socket gets a reader and a writer task. Readers forward complete
//! frames into one channel; the engine task drains it in FIFO order, so the
//! order in which frames were received is the order in which they are
//! applied and broadcast.

use crate::broadcast::{Broadcaster, Outbox, Outgoing};
use crate::config::ServerConfig;
use crate::connection::{ConnectionEvent, ConnectionId, ConnectionIds};
use crate::engine::GameEngine;
use axum::Router;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use axum::routing::get;
use futures::{SinkExt, StreamExt};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

/// Input to the engine task.
#[derive(Debug)]
enum Inbound {
    /// A socket was accepted; its writer queue comes along.
    Open(ConnectionId, Outbox),
    /// Any later lifecycle event.
    Event(ConnectionEvent),
}

/// Shared state handed to every socket handler.
#[derive(Debug)]
struct SocketState {
    ids: ConnectionIds,
    inbound: mpsc::UnboundedSender<Inbound>,
}

/// The game server.
#[derive(Debug, Clone)]
pub struct GameServer {
    config: ServerConfig,
}

impl GameServer {
    /// Creates a server for the given configuration.
    #[instrument]
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Binds the configured address and serves until Ctrl+C.
    #[instrument(skip(self), fields(host = %self.config.host(), port = *self.config.port()))]
    pub async fn run(self) -> anyhow::Result<()> {
        let listener =
            TcpListener::bind((self.config.host().as_str(), *self.config.port())).await?;
        info!(addr = %listener.local_addr()?, "Listening for players");
        self.serve(listener, shutdown_signal()).await
    }

    /// Serves on an already bound listener until `shutdown` completes.
    #[instrument(skip_all)]
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (app, engine_task) = self.router();
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await;
        engine_task.abort();
        if let Err(e) = &result {
            error!(error = %e, "Server stopped with transport failure");
        }
        result?;
        info!("Server stopped");
        Ok(())
    }

    /// Builds the router and spawns the engine task that backs it.
    #[instrument(skip(self))]
    pub fn router(&self) -> (Router, JoinHandle<()>) {
        let (inbound, rx) = mpsc::unbounded_channel();
        let engine = GameEngine::new(*self.config.disconnect_policy());
        let engine_task = tokio::spawn(run_engine(engine, rx));

        let state = Arc::new(SocketState {
            ids: ConnectionIds::new(),
            inbound,
        });
        let app = Router::new()
            .route("/", get(ws_handler))
            .route("/ws", get(ws_handler))
            .with_state(state);
        (app, engine_task)
    }
}

/// Drains inbound events one at a time and delivers what each produced.
#[instrument(skip_all)]
async fn run_engine(mut engine: GameEngine, mut rx: mpsc::UnboundedReceiver<Inbound>) {
    let mut broadcaster = Broadcaster::new();
    info!("Engine task started");

    while let Some(inbound) = rx.recv().await {
        let event = match inbound {
            Inbound::Open(id, outbox) => {
                broadcaster.attach(id, outbox);
                ConnectionEvent::Connect(id)
            }
            Inbound::Event(event) => event,
        };
        let closed = match &event {
            ConnectionEvent::Close(id) => Some(*id),
            _ => None,
        };

        let dispatches = engine.handle(event);
        broadcaster.deliver(dispatches, engine.seats());

        if let Some(id) = closed {
            broadcaster.detach(id);
        }
        debug!(phase = %engine.phase(), peers = broadcaster.peer_count(), "Event applied");
    }

    info!("Engine task stopped");
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<SocketState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Pumps one socket until either side finishes.
#[instrument(skip_all)]
async fn handle_socket(socket: WebSocket, state: Arc<SocketState>) {
    let id = state.ids.next_id();
    let (mut sink, mut stream) = socket.split();
    let (outbox, mut queue) = mpsc::unbounded_channel::<Outgoing>();

    if state.inbound.send(Inbound::Open(id, outbox)).is_err() {
        warn!(connection_id = %id, "Engine is gone, dropping connection");
        return;
    }
    info!(connection_id = %id, "WebSocket connection established");

    let mut writer = tokio::spawn(async move {
        while let Some(item) = queue.recv().await {
            match item {
                Outgoing::Event(event) => {
                    let json = match event.to_json() {
                        Ok(json) => json,
                        Err(e) => {
                            error!(connection_id = %id, error = %e, "Failed to encode event");
                            continue;
                        }
                    };
                    if sink.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Outgoing::Close => {
                    let _ = sink.send(Message::Close(None)).await;
                    break;
                }
            }
        }
    });

    let inbound = state.inbound.clone();
    let mut reader = tokio::spawn(async move {
        while let Some(result) = stream.next().await {
            let text = match result {
                Ok(Message::Text(text)) => text.as_str().to_owned(),
                Ok(Message::Binary(bytes)) => String::from_utf8_lossy(&bytes).into_owned(),
                Ok(Message::Close(_)) => {
                    debug!(connection_id = %id, "WebSocket closed by client");
                    break;
                }
                Ok(_) => continue,
                Err(e) => {
                    warn!(connection_id = %id, error = %e, "WebSocket error");
                    break;
                }
            };
            if inbound
                .send(Inbound::Event(ConnectionEvent::Message(id, text)))
                .is_err()
            {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut reader => {}
        _ = &mut writer => reader.abort(),
    }

    let _ = state.inbound.send(Inbound::Event(ConnectionEvent::Close(id)));
    info!(connection_id = %id, "WebSocket connection terminated");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

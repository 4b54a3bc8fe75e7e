//! TCP listener for the collaborator link
//!
//! Each connection is served independently; requests are answered in order,
//! one reply line per request line.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::core::{LeaderboardStore, SharedSession};
use crate::protocol::{parse_message, ClientMessage, ErrorCode, ServerMessage};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3555;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Create from `SIMON_WEB_HOST` / `SIMON_WEB_PORT`
    pub fn from_env() -> Self {
        use std::env;

        let host = env::var("SIMON_WEB_HOST")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = env::var("SIMON_WEB_PORT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self { host, port }
    }

    /// Check if the listener is disabled via environment
    pub fn is_disabled() -> bool {
        std::env::var("SIMON_WEB_DISABLED")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

/// Handles shared with the game controller
#[derive(Clone)]
pub struct SharedState {
    pub session: SharedSession,
    pub leaderboard: Arc<LeaderboardStore>,
}

pub async fn bind(config: &ServerConfig) -> Result<TcpListener> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %listener.local_addr()?, "collaborator listener up");
    Ok(listener)
}

/// Accept connections forever.
pub async fn serve(listener: TcpListener, state: SharedState) -> Result<()> {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(error = %e, "accept failed");
                continue;
            }
        };
        debug!(%peer, "client connected");
        let state = state.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, state).await {
                debug!(%peer, error = %e, "client dropped");
            }
            debug!(%peer, "client disconnected");
        });
    }
}

/// Bind, report the bound address, then serve.
pub async fn run_server(
    config: ServerConfig,
    state: SharedState,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> Result<()> {
    let listener = bind(&config).await?;
    if let Some(tx) = ready_tx {
        let _ = tx.send(listener.local_addr()?);
    }
    serve(listener, state).await
}

async fn handle_client(socket: TcpStream, state: SharedState) -> Result<()> {
    let (reader, mut writer) = socket.into_split();
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(());
        }
        if let Some(reply) = handle_raw_line(&buf, &state) {
            write_reply(&mut writer, &reply).await?;
        }
    }
}

async fn write_reply(writer: &mut OwnedWriteHalf, reply: &ServerMessage) -> Result<()> {
    let mut bytes = serde_json::to_vec(reply)?;
    bytes.push(b'\n');
    writer.write_all(&bytes).await?;
    writer.flush().await?;
    Ok(())
}

/// Answer one raw request line; blank lines get no reply.
///
/// Bytes that are not UTF-8 get an `invalid_json` error like any other
/// malformed request, and the connection stays open.
pub fn handle_raw_line(bytes: &[u8], state: &SharedState) -> Option<ServerMessage> {
    let line = match std::str::from_utf8(bytes) {
        Ok(line) => line.trim(),
        Err(e) => {
            debug!(error = %e, "rejected non-UTF-8 request");
            return Some(ServerMessage::Error {
                code: ErrorCode::InvalidJson,
                message: "request is not valid UTF-8".to_string(),
            });
        }
    };
    (!line.is_empty()).then(|| handle_line(line, state))
}

/// Answer one request line.
pub fn handle_line(line: &str, state: &SharedState) -> ServerMessage {
    match parse_message(line) {
        Ok(ClientMessage::SetSession {
            username,
            restart,
            take_photo,
        }) => {
            state.session.set(username, restart, take_photo);
            let current = state.session.state();
            info!(
                username = current.username.as_deref().unwrap_or("-"),
                take_photo = current.take_photo,
                restart = current.restart_requested,
                "session updated"
            );
            ServerMessage::Ack
        }
        Ok(ClientMessage::GetSession) => ServerMessage::Session(state.session.state()),
        Ok(ClientMessage::GetLeaderboard) => ServerMessage::Leaderboard {
            entries: state.leaderboard.entries(),
        },
        Err((code, message)) => {
            debug!(?code, %message, "rejected request");
            ServerMessage::Error { code, message }
        }
    }
}

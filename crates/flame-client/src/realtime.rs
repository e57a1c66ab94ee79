//! Realtime push channel for a single chat room.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tokio_tungstenite::tungstenite::{self, Message as Frame};
use tracing::{debug, info, warn};
use url::Url;

use flame_types::events::{RealtimeCommand, RealtimeEvent};
use flame_types::models::Message;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::scope::ViewScope;

const CLOSE_GRACE: Duration = Duration::from_secs(1);

/// Realtime endpoint: the configured override, or `<api>/realtime` with the
/// scheme switched to `ws`/`wss`.
pub fn realtime_url(config: &ClientConfig) -> Result<String> {
    if let Some(url) = &config.realtime_url {
        return Ok(url.clone());
    }

    let mut url = Url::parse(&config.api_url)?;
    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => {
            return Err(ClientError::Config(format!(
                "Cannot derive a realtime URL from a {other}:// API URL"
            )));
        }
    };
    url.set_scheme(scheme)
        .map_err(|()| ClientError::Config(format!("Cannot switch {} to {scheme}", config.api_url)))?;
    let path = format!("{}/realtime", url.path().trim_end_matches('/'));
    url.set_path(&path);
    Ok(url.to_string())
}

/// One joined room. Dropping it stops the background tasks; `close` also
/// tells the server we left.
pub struct RealtimeConnection {
    room: String,
    commands: mpsc::UnboundedSender<RealtimeCommand>,
    incoming: Option<mpsc::UnboundedReceiver<Message>>,
    writer: Option<JoinHandle<()>>,
    scope: ViewScope,
}

impl RealtimeConnection {
    /// Connect with the session token on the upgrade request and join `room`.
    pub async fn connect(url: &str, token: &str, room: &str, parent: &ViewScope) -> Result<Self> {
        let mut request = url.into_client_request()?;
        let bearer = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| tungstenite::Error::HttpFormat(e.into()))?;
        request.headers_mut().insert(AUTHORIZATION, bearer);

        let (stream, _) = tokio_tungstenite::connect_async(request).await?;
        let (mut ws_tx, mut ws_rx) = stream.split();
        info!("Realtime connected, joining room {}", room);

        let scope = parent.child();
        let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<RealtimeCommand>();
        let (msg_tx, msg_rx) = mpsc::unbounded_channel::<Message>();

        // Writer: forwards commands until the room is left or the scope ends
        let writer_scope = scope.clone();
        let writer = tokio::spawn(async move {
            loop {
                let cmd = tokio::select! {
                    _ = writer_scope.torn_down() => break,
                    cmd = cmd_rx.recv() => cmd,
                };
                let Some(cmd) = cmd else { break };
                let leaving = matches!(cmd, RealtimeCommand::RoomLeave(_));

                let text = match serde_json::to_string(&cmd) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!("Failed to encode realtime command: {}", e);
                        continue;
                    }
                };
                if let Err(e) = ws_tx.send(Frame::Text(text.into())).await {
                    warn!("Realtime send failed: {}", e);
                    break;
                }
                if leaving {
                    break;
                }
            }
            let _ = ws_tx.send(Frame::Close(None)).await;
            debug!("Realtime writer stopped");
        });

        // Reader: pushes new messages to the view, ignores anything else
        let reader_scope = scope.clone();
        tokio::spawn(async move {
            loop {
                let frame = tokio::select! {
                    _ = reader_scope.torn_down() => break,
                    frame = ws_rx.next() => frame,
                };
                match frame {
                    Some(Ok(Frame::Text(text))) => {
                        match serde_json::from_str::<RealtimeEvent>(&text) {
                            Ok(RealtimeEvent::MessageNew(msg)) => {
                                if msg_tx.send(msg).is_err() {
                                    break;
                                }
                            }
                            Err(_) => debug!("Ignoring realtime frame: {}", text.as_str()),
                        }
                    }
                    Some(Ok(Frame::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("Realtime connection lost: {}", e);
                        break;
                    }
                }
            }
            debug!("Realtime reader stopped");
        });

        let _ = cmd_tx.send(RealtimeCommand::RoomJoin(room.to_string()));

        Ok(Self {
            room: room.to_string(),
            commands: cmd_tx,
            incoming: Some(msg_rx),
            writer: Some(writer),
            scope,
        })
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    /// Stream of `message:new` payloads. Can only be taken once.
    pub fn take_incoming(&mut self) -> Option<mpsc::UnboundedReceiver<Message>> {
        self.incoming.take()
    }

    /// Leave the room, close the socket and stop both tasks.
    pub async fn close(mut self) {
        let _ = self
            .commands
            .send(RealtimeCommand::RoomLeave(self.room.clone()));
        if let Some(writer) = self.writer.take() {
            if tokio::time::timeout(CLOSE_GRACE, writer).await.is_err() {
                warn!("Realtime writer did not stop in time");
            }
        }
        self.scope.teardown();
        info!("Left room {}", self.room);
    }
}

impl Drop for RealtimeConnection {
    fn drop(&mut self) {
        self.scope.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_ws_url_from_api_url() {
        let cfg = ClientConfig::for_api("http://localhost:4000");
        assert_eq!(realtime_url(&cfg).unwrap(), "ws://localhost:4000/realtime");

        let cfg = ClientConfig::for_api("https://api.example.com/v1/");
        assert_eq!(realtime_url(&cfg).unwrap(), "wss://api.example.com/v1/realtime");
    }

    #[test]
    fn override_wins() {
        let mut cfg = ClientConfig::for_api("http://localhost:4000");
        cfg.realtime_url = Some("ws://push.example.com/socket".into());
        assert_eq!(realtime_url(&cfg).unwrap(), "ws://push.example.com/socket");
    }

    #[test]
    fn non_http_base_is_a_config_error() {
        let cfg = ClientConfig::for_api("ftp://files.example.com");
        assert!(matches!(realtime_url(&cfg), Err(ClientError::Config(_))));
    }

    #[test]
    fn relative_base_cannot_derive() {
        let cfg = ClientConfig::for_api("");
        assert!(realtime_url(&cfg).is_err());
    }
}

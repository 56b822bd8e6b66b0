//! WebSocket transport for the activity feed.

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::debug;

use super::constants::OPEN_TIMEOUT;
use super::error::FeedError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsWriter = SplitSink<WsStream, WsMessage>;
type WsReader = SplitStream<WsStream>;

/// A single activity feed channel.
///
/// The supervisor drives this through open, a read loop, and close;
/// reconnection policy lives above this trait.
#[async_trait]
pub trait FeedConnection: Send {
    /// Opens the channel against the given URL.
    async fn open(&mut self, url: &str) -> Result<(), FeedError>;
    /// Waits for the next text frame. `Ok(None)` means a non-text frame
    /// was consumed internally; closure surfaces as [`FeedError::Closed`].
    async fn next_text(&mut self) -> Result<Option<String>, FeedError>;
    /// Closes the channel. Safe to call on a channel that never opened.
    async fn close(&mut self);
    /// Whether the channel is currently open.
    fn is_open(&self) -> bool;
}

/// Factory for feed channels, one per connection attempt.
pub trait FeedConnector: Send + Sync {
    /// Creates a fresh, unopened channel.
    fn create(&self) -> Box<dyn FeedConnection>;
}

/// The production connector backed by `tokio-tungstenite`.
#[derive(Debug, Default)]
pub struct WebSocketConnector;

impl FeedConnector for WebSocketConnector {
    fn create(&self) -> Box<dyn FeedConnection> {
        Box::new(WebSocketFeedConnection::new())
    }
}

/// A feed channel over a real WebSocket stream.
pub struct WebSocketFeedConnection {
    writer: Option<WsWriter>,
    reader: Option<WsReader>,
    open: bool,
}

impl WebSocketFeedConnection {
    /// Creates an unopened channel.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            writer: None,
            reader: None,
            open: false,
        }
    }
}

impl Default for WebSocketFeedConnection {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedConnection for WebSocketFeedConnection {
    async fn open(&mut self, url: &str) -> Result<(), FeedError> {
        let connect_future = connect_async(url);
        let (ws_stream, _) = timeout(OPEN_TIMEOUT, connect_future)
            .await
            .map_err(|_| FeedError::timeout("open"))?
            .map_err(|e| FeedError::connection_failed(e.to_string()))?;

        let (writer, reader) = ws_stream.split();
        self.writer = Some(writer);
        self.reader = Some(reader);
        self.open = true;

        Ok(())
    }

    async fn next_text(&mut self) -> Result<Option<String>, FeedError> {
        let reader = self.reader.as_mut().ok_or(FeedError::NotConnected)?;

        match reader.next().await {
            Some(Ok(WsMessage::Text(text))) => Ok(Some(text.to_string())),
            Some(Ok(WsMessage::Binary(data))) => match String::from_utf8(data.to_vec()) {
                Ok(text) => Ok(Some(text)),
                Err(_) => {
                    debug!("Dropping non-UTF-8 binary frame");
                    Ok(None)
                }
            },
            Some(Ok(WsMessage::Close(frame))) => {
                self.open = false;
                let (code, reason) = frame.map_or_else(
                    || (1000, "Normal closure".to_string()),
                    |f| (f.code.into(), f.reason.to_string()),
                );
                Err(FeedError::Closed { code, reason })
            }
            Some(Ok(WsMessage::Ping(data))) => {
                if let Some(writer) = self.writer.as_mut() {
                    let _ = writer.send(WsMessage::Pong(data)).await;
                }
                Ok(None)
            }
            Some(Ok(WsMessage::Pong(_) | WsMessage::Frame(_))) => Ok(None),
            Some(Err(e)) => {
                self.open = false;
                Err(FeedError::transport(e.to_string()))
            }
            None => {
                self.open = false;
                Err(FeedError::Closed {
                    code: 1006,
                    reason: "Stream ended".to_string(),
                })
            }
        }
    }

    async fn close(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.close().await;
        }
        self.reader = None;
        self.open = false;
        debug!("Feed channel closed");
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_channel_starts_unopened() {
        let connection = WebSocketFeedConnection::new();
        assert!(!connection.is_open());
    }

    #[tokio::test]
    async fn reading_an_unopened_channel_fails() {
        let mut connection = WebSocketFeedConnection::new();
        assert_eq!(
            connection.next_text().await.unwrap_err(),
            FeedError::NotConnected
        );
    }
}

//! Push channel from the backend.
//!
//! The listener turns every recognized push into a [`LiveSignal::Refresh`]
//! for whoever owns the workspace; it never touches view state itself.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};
use url::Url;
use whatgram_types::events::PushEvent;

use crate::error::Result;

#[derive(Debug, Clone)]
pub enum LiveSignal {
    /// Message and content views are stale
    Refresh(PushEvent),
    /// The server closed the channel or the connection failed
    Closed,
}

/// Owner's handle on a running listener.
#[derive(Debug)]
pub struct LiveHandle {
    close_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl LiveHandle {
    /// Ask the listener to send a close frame and stop. No further signals
    /// are delivered afterwards.
    pub fn close(mut self) {
        if let Some(tx) = self.close_tx.take() {
            let _ = tx.send(());
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Open the push channel at `url` and forward signals to `signals`.
pub async fn connect(url: &Url, signals: mpsc::UnboundedSender<LiveSignal>) -> Result<LiveHandle> {
    let (ws_stream, _) = tokio_tungstenite::connect_async(url.as_str()).await?;
    info!("Live channel open at {}", url);

    let (mut ws_tx, mut ws_rx) = ws_stream.split();
    let (close_tx, mut close_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = &mut close_rx => {
                    debug!("Closing live channel");
                    let _ = ws_tx.send(Message::Close(None)).await;
                    return;
                }
                frame = ws_rx.next() => match frame {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(event) = parse_push(&text) {
                            if signals.send(LiveSignal::Refresh(event)).is_err() {
                                return;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!("Live channel closed by server");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("Live channel error: {}", e);
                        break;
                    }
                },
            }
        }
        let _ = signals.send(LiveSignal::Closed);
    });

    Ok(LiveHandle { close_tx: Some(close_tx), task })
}

/// Refresh-worthy push, or `None` for anything else (plain-text echoes,
/// unknown types, malformed JSON).
pub fn parse_push(text: &str) -> Option<PushEvent> {
    match serde_json::from_str::<PushEvent>(text) {
        Ok(event) if event.is_refresh() => {
            debug!("Push {:?} for conversation {:?}", event, event.conversation_id());
            Some(event)
        }
        Ok(_) => None,
        Err(_) => {
            debug!("Ignoring non-event frame: {}", text);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_new_message_and_new_file_refresh() {
        assert!(parse_push(r#"{"type":"new_message","conversation_id":"c1"}"#).is_some());
        assert!(parse_push(r#"{"type":"new_file","conversation_id":"c1","message":{}}"#).is_some());
        assert!(parse_push(r#"{"type":"presence"}"#).is_none());
        assert!(parse_push("Message received: hello").is_none());
        assert!(parse_push(r#"{"no_type":true}"#).is_none());
    }
}

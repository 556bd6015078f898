//! HTTP polling data source.
//!
//! Bridges the async [`HealthClient`] poll loop to the synchronous TUI draw
//! loop: tick events cross a bounded channel and `poll()` drains it without
//! blocking.

use std::time::Duration;

use tokio::sync::mpsc;

use super::{DataSource, HealthSnapshot};
use crate::client::{HealthClient, PollEvent, PollHandle};

/// A data source fed by a background HTTP poll loop.
///
/// `poll()` drains the event channel to the newest snapshot
/// (last-applied-wins; a slow tick's response arriving after a newer one is
/// superseded within one interval). Once cancelled, the source delivers
/// nothing - including results that were already in flight when cancel was
/// called.
#[derive(Debug)]
pub struct HttpSource {
    receiver: mpsc::Receiver<PollEvent>,
    handle: PollHandle,
    description: String,
    last_error: Option<String>,
}

impl HttpSource {
    /// Start polling the given client and return the source.
    ///
    /// Must be called from within a tokio runtime; the poll loop runs there
    /// while the TUI consumes snapshots from its own thread.
    pub fn start(client: HealthClient, interval: Duration) -> Self {
        let description = format!("http: {}", client.url());
        let (handle, receiver) = client.start_polling(interval);
        Self {
            receiver,
            handle,
            description,
            last_error: None,
        }
    }

    /// Stop the poll loop. Idempotent.
    pub fn cancel(&self) {
        self.handle.cancel();
    }

    /// Handle of the underlying poll loop.
    pub fn handle(&self) -> &PollHandle {
        &self.handle
    }
}

impl DataSource for HttpSource {
    fn poll(&mut self) -> Option<HealthSnapshot> {
        // In-flight results must not be delivered after cancellation; the
        // guard lives here because the transport cannot be pre-empted.
        if self.handle.is_cancelled() {
            return None;
        }

        let mut latest = None;
        loop {
            match self.receiver.try_recv() {
                Ok(PollEvent::Snapshot(snapshot)) => {
                    self.last_error = None;
                    latest = Some(snapshot);
                }
                Ok(PollEvent::Failed(e)) => {
                    self.last_error = Some(e.to_string());
                }
                Err(mpsc::error::TryRecvError::Empty)
                | Err(mpsc::error::TryRecvError::Disconnected) => break,
            }
        }
        latest
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

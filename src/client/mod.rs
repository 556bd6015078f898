//! HTTP client for the fleet health endpoint.
//!
//! [`HealthClient`] issues one GET per tick against a fixed URL and parses
//! the body as a [`HealthSnapshot`]. [`HealthClient::start_polling`] runs the
//! tick loop on the tokio runtime: one immediate fetch, then a fixed interval
//! until the returned [`PollHandle`] is cancelled. Ticks are independent - a
//! failed tick is reported as a [`PollEvent::Failed`] and the loop carries on.

mod error;

pub use error::HealthError;

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::source::HealthSnapshot;

/// Default interval between polls of the health endpoint.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome of one poll tick.
#[derive(Debug, Clone)]
pub enum PollEvent {
    /// The tick succeeded; a complete snapshot replaces whatever the
    /// consumer held before.
    Snapshot(HealthSnapshot),
    /// The tick failed. The consumer keeps its last good snapshot.
    Failed(HealthError),
}

/// Client for the health endpoint.
#[derive(Debug, Clone)]
pub struct HealthClient {
    client: reqwest::Client,
    url: String,
}

impl HealthClient {
    /// Create a client for the given endpoint URL.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            url: url.into(),
        }
    }

    /// The endpoint URL this client polls.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch one health snapshot.
    ///
    /// Any status of 400 or above is [`HealthError::Server`] regardless of
    /// body content; a body that is not snapshot-shaped JSON is
    /// [`HealthError::Parse`]; a request that never completes is
    /// [`HealthError::Transport`].
    pub async fn fetch_health(&self) -> Result<HealthSnapshot, HealthError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| HealthError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        if status >= 400 {
            return Err(HealthError::Server(status));
        }

        let body = response
            .text()
            .await
            .map_err(|e| HealthError::Transport(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| HealthError::Parse(e.to_string()))
    }

    /// Start the poll loop: one immediate fetch, then one per `interval`.
    ///
    /// Returns a [`PollHandle`] for cancellation and the receiving end of the
    /// tick event channel. The loop stops when the handle is cancelled or the
    /// receiver is dropped. Must be called from within a tokio runtime.
    pub fn start_polling(self, interval: Duration) -> (PollHandle, mpsc::Receiver<PollEvent>) {
        let (tx, rx) = mpsc::channel(16);
        let token = CancellationToken::new();
        let loop_token = token.clone();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            tracing::info!(
                url = %self.url,
                interval_ms = interval.as_millis() as u64,
                "health poller started"
            );

            loop {
                tokio::select! {
                    _ = loop_token.cancelled() => {
                        tracing::info!("health poller cancelled");
                        break;
                    }
                    _ = ticker.tick() => {
                        let event = match self.fetch_health().await {
                            Ok(snapshot) => {
                                tracing::debug!(devices = snapshot.len(), "health tick ok");
                                PollEvent::Snapshot(snapshot)
                            }
                            Err(e) => {
                                tracing::warn!(error = %e, "health tick failed");
                                PollEvent::Failed(e)
                            }
                        };
                        if tx.send(event).await.is_err() {
                            // Receiver dropped
                            break;
                        }
                    }
                }
            }
        });

        (PollHandle { token, task }, rx)
    }
}

/// Handle for stopping a running poll loop.
///
/// The component that starts polling owns this handle and controls the
/// lifecycle explicitly; nothing in the loop captures shared mutable state.
/// Dropping the handle also cancels the loop.
#[derive(Debug)]
pub struct PollHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Stop future ticks. Idempotent; safe to call more than once.
    ///
    /// A fetch already in flight completes, but its result must not be acted
    /// on - the consumer checks [`PollHandle::is_cancelled`] before reading
    /// the channel, since the transport cannot be pre-empted mid-flight.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the loop has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait for the poll task to finish after cancellation.
    pub async fn stopped(mut self) {
        let _ = (&mut self.task).await;
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_body() -> &'static str {
        r#"{
            "us-east-1-sensor42": {
                "last_color": { "color": "green", "time": "2016-05-01T12:00:00Z" },
                "last_upload": { "time": 1462104000000 },
                "last_blink": "2016-05-01T12:04:30Z"
            },
            "us-west-2-sensor7": {
                "last_color": { "color": "orange", "time": null },
                "last_upload": { "time": null },
                "last_blink": null
            }
        }"#
    }

    async fn client_for(server: &MockServer) -> HealthClient {
        HealthClient::new(format!("{}/health", server.uri()), Duration::from_secs(2))
    }

    #[tokio::test]
    async fn test_fetch_health_parses_body_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(sample_body(), "application/json"))
            .mount(&server)
            .await;

        let snapshot = client_for(&server).await.fetch_health().await.unwrap();

        assert_eq!(snapshot.len(), 2);
        let east = snapshot.get("us-east-1-sensor42").unwrap();
        assert_eq!(east.last_color.color.as_deref(), Some("green"));
        // epoch millis and RFC 3339 both land on the same instant
        assert_eq!(east.last_upload.time, east.last_color.time);
        let west = snapshot.get("us-west-2-sensor7").unwrap();
        assert_eq!(west.last_color.color.as_deref(), Some("orange"));
        assert!(west.last_blink.is_none());
    }

    #[tokio::test]
    async fn test_fetch_health_status_400_and_up_is_server_error() {
        let server = MockServer::start().await;
        // Body content is irrelevant for >= 400
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503).set_body_raw(sample_body(), "application/json"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.fetch_health().await.unwrap_err();
        assert!(matches!(err, HealthError::Server(503)));
    }

    #[tokio::test]
    async fn test_fetch_health_invalid_json_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.fetch_health().await.unwrap_err();
        assert!(matches!(err, HealthError::Parse(_)));
    }

    #[tokio::test]
    async fn test_fetch_health_unreachable_is_transport_error() {
        // Port 1 is essentially guaranteed to refuse connections
        let client = HealthClient::new("http://127.0.0.1:1/health", Duration::from_millis(500));
        let err = client.fetch_health().await.unwrap_err();
        assert!(matches!(err, HealthError::Transport(_)));
    }

    #[tokio::test]
    async fn test_polling_fetches_immediately() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(sample_body(), "application/json"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let (handle, mut rx) = client.start_polling(Duration::from_secs(60));

        // The first tick fires immediately, well before the 60s interval
        let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("first tick should arrive promptly")
            .expect("channel open");
        assert!(matches!(event, PollEvent::Snapshot(_)));

        handle.cancel();
    }

    #[tokio::test]
    async fn test_polling_continues_after_failed_tick() {
        let server = MockServer::start().await;
        // First request fails, subsequent ones succeed
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(sample_body(), "application/json"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let (handle, mut rx) = client.start_polling(Duration::from_millis(50));

        let first = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(first, PollEvent::Failed(HealthError::Server(500))));

        let second = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(second, PollEvent::Snapshot(_)));

        handle.cancel();
    }

    #[tokio::test]
    async fn test_cancel_stops_future_ticks() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(sample_body(), "application/json"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let (handle, mut rx) = client.start_polling(Duration::from_millis(20));

        let _ = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await;

        handle.cancel();
        assert!(handle.is_cancelled());
        // cancel is idempotent
        handle.cancel();
        handle.stopped().await;

        // Drain whatever was in flight; after that the channel stays quiet
        while rx.try_recv().is_ok() {}
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(rx.try_recv().is_err());
    }
}

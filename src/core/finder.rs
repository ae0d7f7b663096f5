use crate::config::settings::ApiSettings;
use crate::core::query::{parse_response, QueryOutcome};
use crate::core::{Article, GeosearchTransport, LocationGate, PermissionStatus};
use crate::utils::error::NearbyError;
use std::time::Duration;

/// Runs one "find articles near me" action from permission check to parsed
/// result.
pub struct NearbyFinder<G: LocationGate, T: GeosearchTransport> {
    gate: G,
    transport: T,
    settings: ApiSettings,
    permission_timeout: Duration,
}

impl<G: LocationGate, T: GeosearchTransport> NearbyFinder<G, T> {
    pub fn new(gate: G, transport: T, settings: ApiSettings) -> Self {
        Self {
            gate,
            transport,
            settings,
            permission_timeout: Duration::from_secs(
                crate::config::settings::DEFAULT_PERMISSION_TIMEOUT_SECONDS,
            ),
        }
    }

    pub fn with_permission_timeout(mut self, timeout: Duration) -> Self {
        self.permission_timeout = timeout;
        self
    }

    pub async fn run(&self) -> QueryOutcome {
        self.ensure_permission().await?;

        let position = self
            .gate
            .last_known_position()
            .await
            .ok_or(NearbyError::PositionUnavailable)?;
        tracing::info!(
            "User location: latitude {}, longitude {}",
            position.latitude,
            position.longitude
        );

        let query = self.settings.request_params(position).encode()?;
        tracing::debug!("Geosearch query params: {:?}", query.as_map());

        let response = self.transport.send(&query).await?;
        tracing::debug!(
            "Geosearch response status: {} ({} bytes)",
            response.status,
            response.body.len()
        );

        let articles = parse_response(&response.body, response.status)?;
        tracing::info!("Found {} articles nearby", articles.len());
        for article in &articles {
            log_article(article);
        }

        Ok(articles)
    }

    async fn ensure_permission(&self) -> Result<(), NearbyError> {
        if self.gate.has_location_permission() {
            return Ok(());
        }

        tracing::debug!("Location permission missing, requesting it");
        let status = match tokio::time::timeout(
            self.permission_timeout,
            self.gate.request_location_permission(),
        )
        .await
        {
            Ok(status) => status,
            Err(_) => {
                tracing::warn!(
                    "Permission request not answered within {:?}, treating as denied",
                    self.permission_timeout
                );
                PermissionStatus::Denied
            }
        };

        if status.is_granted() {
            Ok(())
        } else {
            tracing::warn!("Location permission denied");
            Err(NearbyError::PermissionDenied)
        }
    }
}

fn log_article(article: &Article) {
    tracing::debug!(
        "Article: {}, latitude {}, longitude {}",
        article.title,
        article.latitude,
        article.longitude
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Coordinate, EncodedQuery, RawResponse};
    use crate::utils::error::Result;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct MockGate {
        granted: AtomicBool,
        answer: Option<PermissionStatus>,
        position: Option<Coordinate>,
        position_requests: Arc<AtomicUsize>,
    }

    impl MockGate {
        fn new(granted: bool, answer: Option<PermissionStatus>, position: Option<Coordinate>) -> Self {
            Self {
                granted: AtomicBool::new(granted),
                answer,
                position,
                position_requests: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl LocationGate for MockGate {
        fn has_location_permission(&self) -> bool {
            self.granted.load(Ordering::SeqCst)
        }

        async fn request_location_permission(&self) -> PermissionStatus {
            match self.answer {
                Some(status) => {
                    self.granted.store(status.is_granted(), Ordering::SeqCst);
                    status
                }
                // 使用者一直不回應
                None => std::future::pending().await,
            }
        }

        async fn last_known_position(&self) -> Option<Coordinate> {
            self.position_requests.fetch_add(1, Ordering::SeqCst);
            self.position
        }
    }

    #[derive(Clone)]
    struct MockTransport {
        response: RawResponse,
        sent: Arc<Mutex<Vec<EncodedQuery>>>,
    }

    impl MockTransport {
        fn new(status: u16, body: &str) -> Self {
            Self {
                response: RawResponse {
                    status,
                    body: body.as_bytes().to_vec(),
                },
                sent: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn sent(&self) -> Vec<EncodedQuery> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GeosearchTransport for MockTransport {
        async fn send(&self, query: &EncodedQuery) -> Result<RawResponse> {
            self.sent.lock().unwrap().push(query.clone());
            Ok(self.response.clone())
        }
    }

    const ONE_HIT: &str =
        r#"{"query":{"geosearch":[{"title":"Burgos Cathedral","lat":42.341,"lon":-3.704}]}}"#;

    fn burgos() -> Option<Coordinate> {
        Some(Coordinate::new(42.3557134, -3.6646324).unwrap())
    }

    #[tokio::test]
    async fn test_run_with_granted_permission() {
        let transport = MockTransport::new(200, ONE_HIT);
        let finder = NearbyFinder::new(
            MockGate::new(true, None, burgos()),
            transport.clone(),
            ApiSettings::default(),
        );

        let articles = finder.run().await.unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Burgos Cathedral");

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].get("gscoord"), Some("42.3557134|-3.6646324"));
        assert_eq!(sent[0].get("gsradius"), Some("10000"));
    }

    #[tokio::test]
    async fn test_run_requests_permission_when_missing() {
        let transport = MockTransport::new(200, ONE_HIT);
        let finder = NearbyFinder::new(
            MockGate::new(false, Some(PermissionStatus::Granted), burgos()),
            transport.clone(),
            ApiSettings::default(),
        );

        assert!(finder.run().await.is_ok());
        assert_eq!(transport.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_denied_permission_stops_before_location_and_network() {
        let gate = MockGate::new(false, Some(PermissionStatus::Denied), burgos());
        let position_requests = gate.position_requests.clone();
        let transport = MockTransport::new(200, ONE_HIT);
        let finder = NearbyFinder::new(gate, transport.clone(), ApiSettings::default());

        let err = finder.run().await.unwrap_err();
        assert!(matches!(err, NearbyError::PermissionDenied));
        assert_eq!(position_requests.load(Ordering::SeqCst), 0);
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_unanswered_permission_times_out_as_denied() {
        let transport = MockTransport::new(200, ONE_HIT);
        let finder = NearbyFinder::new(
            MockGate::new(false, None, burgos()),
            transport.clone(),
            ApiSettings::default(),
        )
        .with_permission_timeout(Duration::from_millis(50));

        let err = finder.run().await.unwrap_err();
        assert!(matches!(err, NearbyError::PermissionDenied));
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_missing_position_is_not_sent() {
        let transport = MockTransport::new(200, ONE_HIT);
        let finder = NearbyFinder::new(
            MockGate::new(true, None, None),
            transport.clone(),
            ApiSettings::default(),
        );

        let err = finder.run().await.unwrap_err();
        assert!(matches!(err, NearbyError::PositionUnavailable));
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_http_failure_is_surfaced() {
        let finder = NearbyFinder::new(
            MockGate::new(true, None, burgos()),
            MockTransport::new(503, "Service Unavailable"),
            ApiSettings::default(),
        );

        let err = finder.run().await.unwrap_err();
        assert!(matches!(err, NearbyError::HttpError { status: 503 }));
    }

    #[tokio::test]
    async fn test_invalid_radius_setting_fails_before_sending() {
        let transport = MockTransport::new(200, ONE_HIT);
        let settings = ApiSettings {
            radius_meters: 0,
            ..ApiSettings::default()
        };
        let finder = NearbyFinder::new(MockGate::new(true, None, burgos()), transport.clone(), settings);

        let err = finder.run().await.unwrap_err();
        assert!(matches!(err, NearbyError::InvalidArgument { .. }));
        assert!(transport.sent().is_empty());
    }
}

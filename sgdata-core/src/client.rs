use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::{
    config::Config,
    endpoint::Endpoint,
    error::{SgDataError, TransportError},
    model::{CarparkResponse, ForecastResponse, PsiResponse},
    transport::{ReqwestTransport, Transport, truncate_body},
};

/// Client for the data.gov.sg real-time endpoints.
///
/// The transport is acquired on construction and released by [`close`] or,
/// failing that, when the client is dropped. Once closed every fetch returns
/// [`SgDataError::Closed`].
///
/// [`close`]: SgDataClient::close
#[derive(Debug)]
pub struct SgDataClient<T: Transport = ReqwestTransport> {
    base_url: Url,
    config: Config,
    transport: Option<T>,
}

impl SgDataClient<ReqwestTransport> {
    /// Client with default configuration.
    pub fn new() -> Result<Self, SgDataError> {
        Self::from_config(Config::default())
    }

    pub fn from_config(config: Config) -> Result<Self, SgDataError> {
        let transport = ReqwestTransport::new(config.timeout())?;
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> SgDataClient<T> {
    pub fn with_transport(config: Config, transport: T) -> Result<Self, SgDataError> {
        let mut base_url = Url::parse(&config.base_url)?;
        // Keep any path prefix when joining endpoint paths onto it.
        if !base_url.path().ends_with('/') {
            let prefixed = format!("{}/", base_url.path());
            base_url.set_path(&prefixed);
        }
        Ok(Self { base_url, config, transport: Some(transport) })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_closed(&self) -> bool {
        self.transport.is_none()
    }

    /// Release the transport. Safe to call more than once.
    pub fn close(&mut self) {
        if self.transport.take().is_some() {
            tracing::debug!(base_url = %self.base_url, "sgdata client closed");
        }
    }

    /// GET `path` relative to the base URL and return the decoded JSON body.
    pub async fn fetch(&self, path: &str, params: &[(&str, &str)]) -> Result<Value, SgDataError> {
        self.execute(path, params, None).await
    }

    /// Like [`fetch`](Self::fetch), but abandons the request once `deadline`
    /// elapses.
    pub async fn fetch_with_deadline(
        &self,
        path: &str,
        params: &[(&str, &str)],
        deadline: Duration,
    ) -> Result<Value, SgDataError> {
        self.execute(path, params, Some(deadline)).await
    }

    pub async fn fetch_endpoint(
        &self,
        endpoint: Endpoint,
        params: &[(&str, &str)],
    ) -> Result<Value, SgDataError> {
        self.fetch(self.config.endpoint_path(endpoint), params).await
    }

    /// Pollutant Standards Index readings. Accepts `date_time` or `date`.
    pub async fn psi(&self, params: &[(&str, &str)]) -> Result<PsiResponse, SgDataError> {
        self.fetch_typed(Endpoint::Psi, params).await
    }

    /// 2-hour nowcast per area. Accepts `date_time` or `date`.
    pub async fn two_hour_forecast(
        &self,
        params: &[(&str, &str)],
    ) -> Result<ForecastResponse, SgDataError> {
        self.fetch_typed(Endpoint::TwoHourForecast, params).await
    }

    /// Carpark lot availability. Accepts `date_time`.
    pub async fn carpark_availability(
        &self,
        params: &[(&str, &str)],
    ) -> Result<CarparkResponse, SgDataError> {
        self.fetch_typed(Endpoint::CarparkAvailability, params).await
    }

    async fn fetch_typed<R: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        params: &[(&str, &str)],
    ) -> Result<R, SgDataError> {
        let value = self.fetch_endpoint(endpoint, params).await?;
        Ok(serde_json::from_value(value)?)
    }

    #[tracing::instrument(level = "debug", skip(self, params), fields(base_url = %self.base_url))]
    async fn execute(
        &self,
        path: &str,
        params: &[(&str, &str)],
        deadline: Option<Duration>,
    ) -> Result<Value, SgDataError> {
        let transport = self.transport.as_ref().ok_or(SgDataError::Closed)?;

        let url = self.base_url.join(path.trim_start_matches('/'))?;
        let params: Vec<(String, String)> =
            params.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();

        tracing::debug!(%url, ?params, "sending request");
        let request = transport.get(url.clone(), &params);
        let response = match deadline {
            Some(limit) => tokio::time::timeout(limit, request)
                .await
                .map_err(|_| TransportError::Timeout(limit))??,
            None => request.await?,
        };

        let status = response.status_code();
        if let Err(err) = response.raise_for_status() {
            tracing::warn!(%url, status, body = truncate_body(response.body()), "request failed");
            return Err(err);
        }

        tracing::debug!(%url, status, bytes = response.body().len(), "response received");
        response.json()
    }
}

impl<T: Transport> Drop for SgDataClient<T> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::HttpResponse;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[derive(Debug)]
    struct StubResponse {
        status: u16,
        body: String,
    }

    impl HttpResponse for StubResponse {
        fn status_code(&self) -> u16 {
            self.status
        }

        fn body(&self) -> &str {
            &self.body
        }
    }

    /// Replays one canned response and records the requested URLs.
    #[derive(Debug, Clone)]
    struct StubTransport {
        status: u16,
        body: String,
        delay: Option<Duration>,
        seen: Arc<Mutex<Vec<Url>>>,
    }

    impl StubTransport {
        fn new(status: u16, body: impl Into<String>) -> Self {
            Self { status, body: body.into(), delay: None, seen: Arc::default() }
        }

        fn delayed(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn get(
            &self,
            url: Url,
            params: &[(String, String)],
        ) -> Result<Box<dyn HttpResponse>, SgDataError> {
            let mut url = url;
            url.query_pairs_mut().extend_pairs(params);
            self.seen.lock().unwrap().push(url);

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            Ok(Box::new(StubResponse { status: self.status, body: self.body.clone() }))
        }
    }

    fn client(transport: StubTransport) -> SgDataClient<StubTransport> {
        SgDataClient::with_transport(Config::default(), transport).expect("default config is valid")
    }

    #[tokio::test]
    async fn fetch_returns_decoded_body() {
        let client = client(StubTransport::new(200, r#"{"data": "test"}"#));

        let value = client.fetch("/v1/anything", &[]).await.unwrap();
        assert_eq!(value, json!({ "data": "test" }));
    }

    #[tokio::test]
    async fn fetch_passes_params_and_joins_path() {
        let transport = StubTransport::new(200, "{}");
        let seen = transport.seen.clone();
        let client = client(transport);

        client
            .fetch_endpoint(Endpoint::Psi, &[("date", "2024-01-15")])
            .await
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].as_str(), "https://api.data.gov.sg/v1/environment/psi?date=2024-01-15");
    }

    #[tokio::test]
    async fn error_status_becomes_http_error() {
        let client = client(StubTransport::new(500, "Internal Server Error"));

        let err = client.fetch("/v1/anything", &[]).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn invalid_json_becomes_decode_error() {
        let client = client(StubTransport::new(200, "not json"));

        let err = client.fetch("/v1/anything", &[]).await.unwrap_err();
        assert!(matches!(err, SgDataError::Decode(_)));
    }

    #[tokio::test]
    async fn shape_mismatch_in_typed_fetch_is_decode_error() {
        let client = client(StubTransport::new(200, r#"{"data": "test"}"#));

        let err = client.psi(&[]).await.unwrap_err();
        assert!(matches!(err, SgDataError::Decode(_)));
    }

    #[tokio::test]
    async fn fetch_after_close_fails() {
        let mut client = client(StubTransport::new(200, "{}"));

        client.close();
        assert!(client.is_closed());

        let err = client.fetch("/v1/anything", &[]).await.unwrap_err();
        assert!(matches!(err, SgDataError::Closed));
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let mut client = client(StubTransport::new(200, "{}"));

        client.close();
        client.close();
        assert!(client.is_closed());
    }

    #[tokio::test]
    async fn close_after_failed_fetch_still_releases() {
        let mut client = client(StubTransport::new(404, "missing"));

        assert!(client.fetch("/v1/anything", &[]).await.is_err());
        client.close();
        assert!(client.is_closed());
    }

    #[tokio::test]
    async fn deadline_expiry_is_a_timeout() {
        let transport = StubTransport::new(200, "{}").delayed(Duration::from_secs(5));
        let client = client(transport);

        let err = client
            .fetch_with_deadline("/v1/anything", &[], Duration::from_millis(20))
            .await
            .unwrap_err();

        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn base_url_path_prefix_is_kept() {
        let transport = StubTransport::new(200, "{}");
        let seen = transport.seen.clone();
        let config = Config {
            base_url: "https://api-open.data.gov.sg/v2/real-time/api".into(),
            ..Config::default()
        };
        let client = SgDataClient::with_transport(config, transport).unwrap();

        client.fetch("/psi", &[]).await.unwrap();
        client.fetch("rainfall", &[]).await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].path(), "/v2/real-time/api/psi");
        assert_eq!(seen[1].path(), "/v2/real-time/api/rainfall");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let config = Config { base_url: "not a url".into(), ..Config::default() };

        let err = SgDataClient::with_transport(config, StubTransport::new(200, "{}")).unwrap_err();
        assert!(matches!(err, SgDataError::InvalidUrl(_)));
    }
}

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::error::{SgDataError, TransportError};

use super::{BufferedResponse, HttpResponse, Transport};

/// [`Transport`] backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
    timeout: Option<Duration>,
}

impl ReqwestTransport {
    /// `None` leaves requests without a transport-wide time limit.
    pub fn new(timeout: Option<Duration>) -> Result<Self, SgDataError> {
        let mut builder = Client::builder().user_agent(concat!("sgdata/", env!("CARGO_PKG_VERSION")));
        if let Some(limit) = timeout {
            builder = builder.timeout(limit);
        }
        let http = builder
            .build()
            .map_err(|err| TransportError::from_reqwest(err, timeout.unwrap_or_default()))?;

        Ok(Self { http, timeout })
    }

    fn classify(&self, err: reqwest::Error) -> TransportError {
        TransportError::from_reqwest(err, self.timeout.unwrap_or_default())
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(
        &self,
        url: Url,
        params: &[(String, String)],
    ) -> Result<Box<dyn HttpResponse>, SgDataError> {
        let res = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|err| self.classify(err))?;

        let status = res.status().as_u16();
        let body = res
            .text()
            .await
            .map_err(|err| self.classify(err))?;

        Ok(Box::new(BufferedResponse { status, body }))
    }
}

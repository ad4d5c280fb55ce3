use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;
use url::Url;

use crate::error::SgDataError;

pub mod http;

pub use http::ReqwestTransport;

/// A received HTTP response as seen by the client.
pub trait HttpResponse: Send + Debug {
    fn status_code(&self) -> u16;

    fn body(&self) -> &str;

    fn json(&self) -> Result<Value, SgDataError> {
        Ok(serde_json::from_str(self.body())?)
    }

    /// Fails with [`SgDataError::Http`] for any status outside `200..300`.
    fn raise_for_status(&self) -> Result<(), SgDataError> {
        let status = self.status_code();
        if (200..300).contains(&status) {
            Ok(())
        } else {
            Err(SgDataError::Http { status, body: self.body().to_string() })
        }
    }
}

/// A response whose body has already been read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferedResponse {
    pub status: u16,
    pub body: String,
}

impl BufferedResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }
}

impl HttpResponse for BufferedResponse {
    fn status_code(&self) -> u16 {
        self.status
    }

    fn body(&self) -> &str {
        &self.body
    }
}

/// Issues GET requests on behalf of [`crate::SgDataClient`].
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn get(
        &self,
        url: Url,
        params: &[(String, String)],
    ) -> Result<Box<dyn HttpResponse>, SgDataError>;
}

pub(crate) fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body;
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

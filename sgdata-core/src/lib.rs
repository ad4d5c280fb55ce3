//! Core library for the `sgdata` CLI.
//!
//! This crate defines:
//! - Configuration of base URL, timeouts and endpoint paths
//! - [`SgDataClient`], a JSON passthrough over the data.gov.sg real-time API
//! - The HTTP transport seam, so tests can swap in doubles
//! - Typed models for the PSI, 2-hour forecast and carpark payloads
//!
//! It is used by `sgdata-cli`, but can also be reused by other binaries or services.

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod model;
pub mod transport;

pub use client::SgDataClient;
pub use config::{Config, EndpointPaths};
pub use endpoint::Endpoint;
pub use error::{SgDataError, TransportError};
pub use model::{CarparkResponse, ForecastResponse, ModelError, PsiResponse};
pub use transport::{BufferedResponse, HttpResponse, ReqwestTransport, Transport};

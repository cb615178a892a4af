//! Typed HTTP client for the Schwab Trader and Market Data REST APIs.
//!
//! This crate wraps every REST endpoint used by the trading toolkit behind
//! typed async methods. Requests go through a pluggable [`Transport`] and carry
//! a bearer token from an [`AccessTokenProvider`]; non-2xx responses surface
//! as [`Error::Api`] with the status and the raw body, never retried.
//!
//! # Example
//!
//! ```no_run
//! use schwab_client::{ClientConfig, QuoteField, SchwabClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), schwab_client::Error> {
//!     let client = SchwabClient::new(ClientConfig::default(), "access-token")?;
//!
//!     let quotes = client.get_quote("AAPL", &[QuoteField::Quote]).await?;
//!     println!("{:?}", quotes.get("AAPL"));
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod transport;
mod types;

pub use client::{ClientConfig, DEFAULT_BASE_URL, SchwabClient, extract_order_id};
pub use error::Error;
pub use reqwest::Method;
pub use transport::{
    AccessTokenProvider, HttpRequest, HttpResponse, ReqwestTransport, StaticToken, Transport,
};
pub use types::*;

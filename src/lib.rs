//! # Schwab API - Trading Toolkit
//!
//! Client library for the Schwab Trader and Market Data REST APIs, built on
//! [reqwest](https://crates.io/crates/reqwest) and
//! [tokio](https://crates.io/crates/tokio).
//!
//! ## Key Features
//!
//! - **Typed Endpoints**: accounts, orders, transactions, user preferences,
//!   quotes, option chains, price history, movers, market hours and
//!   instruments through [`schwab_client::SchwabClient`].
//!
//! - **Token Management**: OAuth code exchange, automatic refresh and a token
//!   file that remembers when the login happened.
//!
//! - **Order Construction**: a fluent [`orders::OrderBuilder`], templates for
//!   common equity and option orders, and OCO / TRIGGER combinators.
//!
//! - **Option Symbols**: the 21-character OCC symbol format through
//!   [`orders::OptionSymbol`].
//!
//! - **Code Generation**: Rust source that rebuilds an existing order.
//!
//! ## Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`auth`] | OAuth URLs, callback parsing and the token endpoint |
//! | [`client`] | Clients opened from a token file or a login |
//! | [`config`] | TOML configuration |
//! | [`error`] | Crate-wide error and its classification |
//! | [`order_codegen`] | Code for an account's most recent order |
//! | [`orders`] | Order payloads, templates, strategies and option symbols |
//! | [`token`] | Token file and refreshing token holder |
//!
//! ## Example Usage
//!
//! ```no_run
//! use schwab_api::client::client_from_config;
//! use schwab_api::config::Config;
//! use schwab_api::orders::{equity_buy_limit, one_triggers_oco, equity_sell_limit};
//! use rust_decimal_macros::dec;
//!
//! # async fn run() -> Result<(), schwab_api::Error> {
//! let config = Config::load("schwab.toml")?;
//! let client = client_from_config(&config)?;
//!
//! let accounts = client.get_account_numbers().await?;
//! let hash = &accounts[0].hash_value;
//!
//! let order = one_triggers_oco(
//!     equity_buy_limit("AAPL", 10, dec!(150))?,
//!     equity_sell_limit("AAPL", 10, dec!(165))?,
//!     equity_sell_limit("AAPL", 10, dec!(170))?,
//! );
//! let order_id = client.place_order(hash, &order).await?;
//! println!("placed {order_id:?}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging In
//!
//! Tokens come from a one-time manual login:
//!
//! 1. Build the login URL with [`auth::authorization_url`] and open it.
//! 2. Approve access; the browser lands on the callback URL.
//! 3. Pass that URL to [`client::client_from_received_url`], which writes the
//!    token file.
//!
//! The refresh token lasts seven days. After that the token file has to be
//! recreated by logging in again.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod order_codegen;
pub mod orders;
pub mod token;

pub use error::{Error, ErrorKind};
pub use schwab_client;

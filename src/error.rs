//! Crate-wide error type.

use crate::config::ConfigError;
use crate::orders::OrderError;
use crate::token::AuthError;


/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad argument to a builder, codec or endpoint wrapper.
    Validation,
    /// Input string that cannot be decoded.
    MalformedInput,
    /// Order shape the operation does not handle.
    UnsupportedOperation,
    /// Non-success response or transport failure.
    Http,
    /// Token file or OAuth failure.
    Auth,
    /// Bad configuration.
    Config,
}

/// Any error raised by this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Order construction or parsing error.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// Token or OAuth error.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// API call error.
    #[error(transparent)]
    Client(#[from] schwab_client::Error),

    /// Account number not linked to the logged-in user.
    #[error("account {0} is not linked to this login")]
    AccountNotFound(String),
}

impl Error {
    /// Classifies the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Order(err) => match err {
                OrderError::MalformedOptionSymbol { .. } => ErrorKind::MalformedInput,
                OrderError::MissingOrderStrategyType
                | OrderError::CompositeStrategyType(_)
                | OrderError::UnknownLegType(_)
                | OrderError::InvalidLegInstruction { .. }
                | OrderError::UnsupportedChildStrategy => ErrorKind::UnsupportedOperation,
                _ => ErrorKind::Validation,
            },
            Error::Auth(_) => ErrorKind::Auth,
            Error::Config(_) => ErrorKind::Config,
            Error::Client(err) => match err {
                schwab_client::Error::InvalidRequest(_) => ErrorKind::Validation,
                schwab_client::Error::Auth { .. } => ErrorKind::Auth,
                _ => ErrorKind::Http,
            },
            Error::AccountNotFound(_) => ErrorKind::Validation,
        }
    }

    /// HTTP status for API errors.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Client(err) => err.status(),
            Error::Auth(err) => err.status(),
            _ => None,
        }
    }
}

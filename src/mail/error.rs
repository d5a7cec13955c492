//! Mail collaborator errors.

use std::time::Duration;

/// Errors returned while counting a mailbox.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// The address has no local part or no domain.
    #[error("invalid email address")]
    InvalidAddress(String),

    /// TCP connection error.
    #[error("failed to connect to {host}:{port}: {source}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },

    /// Network I/O error after the connection was established.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TLS setup or handshake error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// The server did not send the expected greeting.
    #[error("IMAP server sent no greeting")]
    MissingGreeting,

    /// The server rejected the credentials.
    #[error("login rejected: {0}")]
    Auth(#[source] async_imap::error::Error),

    /// IMAP protocol error.
    #[error("IMAP error: {0}")]
    Imap(#[from] async_imap::error::Error),

    /// The account did not answer in time.
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

impl MailError {
    /// Stable failure class used in log lines
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidAddress(_) => "validation",
            Self::Connect { .. } | Self::Io(_) | Self::Tls(_) => "upstream_connection",
            Self::Auth(_) => "upstream_auth",
            Self::MissingGreeting | Self::Imap(_) => "upstream_protocol",
            Self::Timeout(_) => "timeout",
        }
    }
}

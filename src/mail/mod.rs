//! Mail collaborator module
//!
//! The HTTP layer only sees the [`MailboxCounter`] trait. The shipped
//! implementation talks IMAP over implicit TLS.

mod error;
mod imap;
mod server;

use async_trait::async_trait;

pub use error::MailError;
pub use imap::ImapCounter;
pub use server::{login_name, resolve_server};

/// Counts messages in the mailbox of one account
#[async_trait]
pub trait MailboxCounter: Send + Sync {
    /// Connect as `address` with `password` and return the message count
    async fn count_inbox(&self, address: &str, password: &str) -> Result<u32, MailError>;
}

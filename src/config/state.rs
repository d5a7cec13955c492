// Application state module
// Built once at startup and shared read-only by every connection

use std::sync::Arc;

use super::types::Config;
use crate::mail::MailboxCounter;

/// Application state
pub struct AppState {
    pub config: Config,
    pub counter: Arc<dyn MailboxCounter>,
}

impl AppState {
    pub fn new(config: Config, counter: Arc<dyn MailboxCounter>) -> Self {
        Self { config, counter }
    }
}

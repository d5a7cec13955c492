// Test doubles for the mail collaborator

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::types::Credential;
use crate::config::{AppState, Config};
use crate::mail::{MailError, MailboxCounter};

/// Answers from a fixed table; `None` or an unknown address fails
pub struct ScriptedCounter {
    counts: HashMap<String, Option<u32>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedCounter {
    pub fn new(script: &[(&str, Option<u32>)]) -> Self {
        Self {
            counts: script
                .iter()
                .map(|(address, count)| ((*address).to_string(), *count))
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// `address:password` of every lookup, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailboxCounter for ScriptedCounter {
    async fn count_inbox(&self, address: &str, password: &str) -> Result<u32, MailError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{address}:{password}"));
        match self.counts.get(address) {
            Some(Some(count)) => Ok(*count),
            _ => Err(MailError::MissingGreeting),
        }
    }
}

/// Answers `count` for every address after sleeping for `delay`
pub struct SlowCounter {
    pub delay: Duration,
    pub count: u32,
}

#[async_trait]
impl MailboxCounter for SlowCounter {
    async fn count_inbox(&self, _address: &str, _password: &str) -> Result<u32, MailError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.count)
    }
}

pub fn credential(address: &str, password: &str) -> Credential {
    Credential {
        email_address: address.to_string(),
        password: password.to_string(),
    }
}

pub fn test_config() -> Config {
    let mut config = Config::load_from("definitely/not/a/config/file").unwrap();
    config.logging.access_log = false;
    config.http.max_body_size = 4096;
    config
}

pub fn test_state(counter: Arc<ScriptedCounter>) -> Arc<AppState> {
    Arc::new(AppState::new(test_config(), counter))
}

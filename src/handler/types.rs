// Request and response bodies of the public endpoints

use serde::{Deserialize, Serialize};

/// Message returned by every successful response
pub const SUCCESS_MESSAGE: &str = "flask connect";

/// Message returned when a count batch fails
pub const FAIL_MESSAGE: &str = "fail_message";

/// One account to count, as sent by the client
#[derive(Debug, Deserialize)]
pub struct Credential {
    pub email_address: String,
    pub password: String,
}

/// `POST /count` body
#[derive(Debug, Deserialize)]
pub struct CountRequest {
    #[serde(rename = "Emails")]
    pub emails: Vec<Credential>,
}

/// Message count for one account
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct CountResult {
    pub email_address: String,
    #[serde(rename = "emailCount")]
    pub email_count: u32,
}

/// `{success_message}` body of the status endpoints
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub success_message: &'static str,
}

impl Default for StatusResponse {
    fn default() -> Self {
        Self {
            success_message: SUCCESS_MESSAGE,
        }
    }
}

/// `POST /count` body: the whole batch or nothing
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CountResponse {
    Success {
        success_message: &'static str,
        #[serde(rename = "Result")]
        result: Vec<CountResult>,
    },
    Failure {
        fail_message: &'static str,
    },
}

impl CountResponse {
    pub const fn success(result: Vec<CountResult>) -> Self {
        Self::Success {
            success_message: SUCCESS_MESSAGE,
            result,
        }
    }

    pub const fn failure() -> Self {
        Self::Failure {
            fail_message: FAIL_MESSAGE,
        }
    }
}

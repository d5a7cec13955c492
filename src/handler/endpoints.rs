//! Endpoint handlers
//!
//! `/`, `/predict` and `/delete` answer with a fixed status document.
//! `/count` walks the submitted accounts in order and answers with every
//! count, or with a single failure document if any step fails.

use http_body_util::{BodyExt, Limited};
use hyper::body::{Body, Bytes};

use super::types::{CountRequest, CountResponse, CountResult, Credential, StatusResponse};
use crate::config::AppState;
use crate::logger;
use crate::mail::{MailError, MailboxCounter};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Why a count batch was discarded
#[derive(Debug, thiserror::Error)]
pub enum CountFailure {
    /// The request does not declare a JSON body.
    #[error("request is not JSON (content-type: {})", .0.as_deref().unwrap_or("none"))]
    ContentType(Option<String>),

    /// The body could not be read or exceeded `http.max_body_size`.
    #[error("unreadable request body: {0}")]
    Body(String),

    /// The body is not a `{"Emails": [...]}` document.
    #[error("malformed count request: {0}")]
    Json(#[from] serde_json::Error),

    /// The mail collaborator failed for one account.
    ///
    /// Only the position is kept; addresses stay out of warning-level logs.
    #[error("account #{index} failed ({}): {source}", .source.kind())]
    Mailbox {
        index: usize,
        #[source]
        source: MailError,
    },
}

/// `GET /`
pub fn root() -> StatusResponse {
    StatusResponse::default()
}

/// `POST /predict`
///
/// Classification is not implemented; the body is ignored.
pub fn predict() -> StatusResponse {
    StatusResponse::default()
}

/// `GET /delete`
///
/// Deletion is not implemented; nothing is removed.
pub fn delete() -> StatusResponse {
    StatusResponse::default()
}

/// Whether a `Content-Type` value declares JSON: `application/json` or
/// `application/*+json`, parameters ignored
pub fn is_json_content_type(value: Option<&str>) -> bool {
    let Some(value) = value else {
        return false;
    };
    let mime = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    mime == "application/json"
        || mime
            .strip_prefix("application/")
            .is_some_and(|subtype| subtype.ends_with("+json"))
}

/// `POST /count`
pub async fn count<B>(content_type: Option<&str>, body: B, state: &AppState) -> CountResponse
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    match run_count(content_type, body, state).await {
        Ok(result) => {
            logger::log_debug(&format!("Counted {} account(s)", result.len()));
            CountResponse::success(result)
        }
        Err(failure) => {
            logger::log_warning(&format!("Count batch discarded: {failure}"));
            CountResponse::failure()
        }
    }
}

async fn run_count<B>(
    content_type: Option<&str>,
    body: B,
    state: &AppState,
) -> Result<Vec<CountResult>, CountFailure>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    if !is_json_content_type(content_type) {
        return Err(CountFailure::ContentType(content_type.map(str::to_string)));
    }

    let limit = usize::try_from(state.config.http.max_body_size).unwrap_or(usize::MAX);
    let bytes = Limited::new(body, limit)
        .collect()
        .await
        .map_err(|e| CountFailure::Body(e.to_string()))?
        .to_bytes();

    let request: CountRequest = serde_json::from_slice(&bytes)?;
    count_accounts(state.counter.as_ref(), &request.emails).await
}

/// Count every account in order, stopping at the first failure
pub async fn count_accounts(
    counter: &dyn MailboxCounter,
    credentials: &[Credential],
) -> Result<Vec<CountResult>, CountFailure> {
    let mut results = Vec::with_capacity(credentials.len());

    for (index, credential) in credentials.iter().enumerate() {
        let email_count = counter
            .count_inbox(&credential.email_address, &credential.password)
            .await
            .map_err(|source| {
                logger::log_debug(&format!(
                    "Account #{index} ({}) failed",
                    credential.email_address
                ));
                CountFailure::Mailbox { index, source }
            })?;

        results.push(CountResult {
            email_address: credential.email_address.clone(),
            email_count,
        });
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::testing::{credential, ScriptedCounter};

    #[tokio::test]
    async fn test_counts_in_input_order() {
        let counter = ScriptedCounter::new(&[("b@x.com", Some(7)), ("a@x.com", Some(3))]);
        let credentials = vec![credential("a@x.com", "p1"), credential("b@x.com", "p2")];

        let results = count_accounts(&counter, &credentials).await.unwrap();
        assert_eq!(
            results,
            vec![
                CountResult {
                    email_address: "a@x.com".to_string(),
                    email_count: 3
                },
                CountResult {
                    email_address: "b@x.com".to_string(),
                    email_count: 7
                },
            ]
        );
        assert_eq!(counter.calls(), vec!["a@x.com:p1", "b@x.com:p2"]);
    }

    #[tokio::test]
    async fn test_stops_at_first_failure() {
        let counter = ScriptedCounter::new(&[
            ("a@x.com", Some(1)),
            ("broken@x.com", None),
            ("c@x.com", Some(5)),
        ]);
        let credentials = vec![
            credential("a@x.com", "p1"),
            credential("broken@x.com", "p2"),
            credential("c@x.com", "p3"),
        ];

        let failure = count_accounts(&counter, &credentials).await.unwrap_err();
        match failure {
            CountFailure::Mailbox { index, .. } => assert_eq!(index, 1),
            other => panic!("unexpected failure: {other}"),
        }
        assert_eq!(counter.calls(), vec!["a@x.com:p1", "broken@x.com:p2"]);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let counter = ScriptedCounter::new(&[]);
        let results = count_accounts(&counter, &[]).await.unwrap();
        assert!(results.is_empty());
        assert!(counter.calls().is_empty());
    }

    #[test]
    fn test_failure_message_hides_address() {
        let failure = CountFailure::Mailbox {
            index: 2,
            source: MailError::InvalidAddress("secret@x.com".to_string()),
        };
        let message = failure.to_string();
        assert!(message.starts_with("account #2 failed (validation)"));
        assert!(message.contains("invalid email address"));
        assert!(!message.contains("secret@x.com"));
    }

    #[test]
    fn test_json_content_type() {
        assert!(is_json_content_type(Some("application/json")));
        assert!(is_json_content_type(Some("application/json; charset=utf-8")));
        assert!(is_json_content_type(Some(" Application/JSON ")));
        assert!(is_json_content_type(Some("application/vnd.api+json")));

        assert!(!is_json_content_type(None));
        assert!(!is_json_content_type(Some("")));
        assert!(!is_json_content_type(Some("text/plain")));
        assert!(!is_json_content_type(Some("application/x-www-form-urlencoded")));
        assert!(!is_json_content_type(Some("text/json+xml")));
        assert!(!is_json_content_type(Some("application/jsonp")));
    }
}

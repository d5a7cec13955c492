//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: resolves the endpoint from method
//! and path, runs it, and writes the access log line.

use crate::config::AppState;
use crate::handler::endpoints;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::CONTENT_TYPE;
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

const READ_ONLY_METHODS: &str = "GET, HEAD, OPTIONS";
const WRITE_METHODS: &str = "POST, OPTIONS";

/// Public endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Root,
    Count,
    Predict,
    Delete,
}

impl Endpoint {
    fn from_path(path: &str) -> Option<Self> {
        match path {
            "/" => Some(Self::Root),
            "/count" => Some(Self::Count),
            "/predict" => Some(Self::Predict),
            "/delete" => Some(Self::Delete),
            _ => None,
        }
    }

    const fn accepts_body(self) -> bool {
        matches!(self, Self::Count | Self::Predict)
    }

    const fn allow(self) -> &'static str {
        if self.accepts_body() {
            WRITE_METHODS
        } else {
            READ_ONLY_METHODS
        }
    }
}

/// Outcome of matching method and path
#[derive(Debug, PartialEq, Eq)]
enum Dispatch {
    Call { endpoint: Endpoint, is_head: bool },
    Options(&'static str),
    MethodNotAllowed(&'static str),
    NotFound,
}

fn resolve(method: &Method, path: &str) -> Dispatch {
    let Some(endpoint) = Endpoint::from_path(path) else {
        return Dispatch::NotFound;
    };

    match (method, endpoint.accepts_body()) {
        (&Method::OPTIONS, _) => Dispatch::Options(endpoint.allow()),
        (&Method::POST, true) | (&Method::GET, false) => Dispatch::Call {
            endpoint,
            is_head: false,
        },
        (&Method::HEAD, false) => Dispatch::Call {
            endpoint,
            is_head: true,
        },
        _ => Dispatch::MethodNotAllowed(endpoint.allow()),
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let (parts, body) = req.into_parts();
    logger::log_headers_count(parts.headers.len());

    let response = match resolve(&parts.method, parts.uri.path()) {
        Dispatch::Call { endpoint, is_head } => {
            let http_config = &state.config.http;
            match endpoint {
                Endpoint::Root => {
                    http::build_json_response(&endpoints::root(), http_config, is_head)
                }
                Endpoint::Predict => {
                    http::build_json_response(&endpoints::predict(), http_config, is_head)
                }
                Endpoint::Delete => {
                    http::build_json_response(&endpoints::delete(), http_config, is_head)
                }
                Endpoint::Count => {
                    let content_type = parts
                        .headers
                        .get(CONTENT_TYPE)
                        .and_then(|value| value.to_str().ok());
                    let outcome = endpoints::count(content_type, body, &state).await;
                    http::build_json_response(&outcome, http_config, is_head)
                }
            }
        }
        Dispatch::Options(allow) => {
            http::build_options_response(allow, state.config.http.enable_cors)
        }
        Dispatch::MethodNotAllowed(allow) => {
            logger::log_warning(&format!(
                "Method not allowed: {} {}",
                parts.method,
                parts.uri.path()
            ));
            http::build_405_response(allow)
        }
        Dispatch::NotFound => http::build_404_response(),
    };

    if state.config.logging.access_log {
        let entry = access_entry(&parts, peer_addr, &response, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

fn access_entry(
    parts: &hyper::http::request::Parts,
    peer_addr: SocketAddr,
    response: &Response<Full<Bytes>>,
    started: Instant,
) -> AccessLogEntry {
    let header = |name: &str| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        parts.method.to_string(),
        parts.uri.path().to_string(),
    );
    entry.query = parts.uri.query().map(ToString::to_string);
    entry.http_version = version_label(parts.version).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    entry.referer = header("referer");
    entry.user_agent = header("user-agent");
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

fn version_label(version: Version) -> &'static str {
    if version == Version::HTTP_10 {
        "1.0"
    } else if version == Version::HTTP_2 {
        "2"
    } else {
        "1.1"
    }
}

//! Remote-call and turn failures.
//!
//! Both collaborators report [`ServiceError`]. The session controller wraps it in a
//! [`TurnError`] naming the stage that failed; no call is ever retried.

use std::time::Duration;

use reqwest::header::HeaderValue;
use reqwest::StatusCode;

/// Which external collaborator a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Memory,
    Completion,
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Memory => "memory store",
            Self::Completion => "completion service",
        })
    }
}

/// A failed call to the memory store or the completion service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{service} unreachable: {message}")]
    Connectivity { service: Service, message: String },

    #[error("{service} rejected credentials (HTTP {status}): {message}")]
    Authentication {
        service: Service,
        status: u16,
        message: String,
    },

    #[error("{service} rate limited{}: {message}", retry_hint(.retry_after))]
    RateLimited {
        service: Service,
        retry_after: Option<Duration>,
        message: String,
    },

    #[error("{service} returned HTTP {status}: {message}")]
    Status {
        service: Service,
        status: u16,
        message: String,
    },

    #[error("{service} returned a malformed response: {message}")]
    Malformed { service: Service, message: String },

    #[error("no API key configured for provider {provider}")]
    MissingCredentials { provider: String },
}

fn retry_hint(retry_after: &Option<Duration>) -> String {
    match retry_after {
        Some(d) => format!(" (retry after {}s)", d.as_secs()),
        None => String::new(),
    }
}

impl ServiceError {
    /// Map a transport-level reqwest error (no HTTP status received).
    pub fn from_transport(service: Service, err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Malformed {
                service,
                message: err.to_string(),
            }
        } else {
            Self::Connectivity {
                service,
                message: err.to_string(),
            }
        }
    }

    /// Map a non-success HTTP response to a typed failure.
    pub fn from_status(
        service: Service,
        status: StatusCode,
        body: String,
        retry_after: Option<Duration>,
    ) -> Self {
        let message = extract_error_message(&body);
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Authentication {
                service,
                status: status.as_u16(),
                message,
            },
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited {
                service,
                retry_after,
                message,
            },
            _ => Self::Status {
                service,
                status: status.as_u16(),
                message,
            },
        }
    }

    pub fn service(&self) -> Service {
        match self {
            Self::Connectivity { service, .. }
            | Self::Authentication { service, .. }
            | Self::RateLimited { service, .. }
            | Self::Status { service, .. }
            | Self::Malformed { service, .. } => *service,
            Self::MissingCredentials { .. } => Service::Completion,
        }
    }
}

/// Pass a successful response through, or turn its status and body into a [`ServiceError`].
pub(crate) async fn ensure_success(
    service: Service,
    response: reqwest::Response,
) -> Result<reqwest::Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let retry_after = parse_retry_after(response.headers().get("retry-after"));
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "failed to read error body".to_string());
    Err(ServiceError::from_status(service, status, body, retry_after))
}

/// Pull a human-readable message out of a JSON error body, falling back to the raw body.
///
/// Understands `{"error": {"message": ..}}`, `{"error": ".."}`, `{"detail": ".."}` and
/// `{"message": ".."}`.
fn extract_error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_string();
    };
    let candidates = [
        value.pointer("/error/message"),
        value.get("error"),
        value.get("detail"),
        value.get("message"),
    ];
    let message = candidates
        .into_iter()
        .flatten()
        .find_map(|v| v.as_str().map(str::to_string));
    message.unwrap_or_else(|| body.trim().to_string())
}

/// Parse a `Retry-After` header given in seconds. HTTP-date values are ignored.
pub fn parse_retry_after(header: Option<&HeaderValue>) -> Option<Duration> {
    let value = header?.to_str().ok()?;
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

/// The remote call that was in flight when a turn failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStage {
    SearchingMemories,
    ReadingAllMemories,
    Generating,
    Auditing,
    SavingMemories,
}

impl std::fmt::Display for TurnStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::SearchingMemories => "searching memories",
            Self::ReadingAllMemories => "reading all memories",
            Self::Generating => "generating a reply",
            Self::Auditing => "auditing memories",
            Self::SavingMemories => "saving memories",
        })
    }
}

/// A turn aborted by a remote failure. The transcript keeps the user message without a reply.
#[derive(Debug, thiserror::Error)]
#[error("turn failed while {stage}")]
pub struct TurnError {
    pub stage: TurnStage,
    #[source]
    pub source: ServiceError,
}

impl TurnError {
    pub fn new(stage: TurnStage, source: ServiceError) -> Self {
        Self { stage, source }
    }
}

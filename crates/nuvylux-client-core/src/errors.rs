use nuvylux_shared::uac::ApiErrorBody;
use reqwest::StatusCode;
use std::{fmt::Display, time::Duration};
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("failed to send request: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{0}")]
    Status(ResponseFailure),
    /// The session could not be refreshed. Local session state has been
    /// cleared and the user sent to the landing route
    #[error("session expired: {0}")]
    SessionExpired(#[source] RefreshFailed),
    /// Local session state has been cleared and the user sent to the login
    /// route
    #[error("access denied: {0}")]
    Forbidden(ResponseFailure),
    #[error("failed to serialize request arguments: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Why a call to the refresh endpoint did not renew the session. Shared with
/// every request that was waiting on the same refresh
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RefreshFailed {
    #[error("refresh rejected with status code: {0}")]
    Rejected(StatusCode),
    #[error("refresh request failed: {0}")]
    Transport(String),
    #[error("refresh timed out after {0:?}")]
    TimedOut(Duration),
    #[error("refresh was abandoned before it completed")]
    Abandoned,
}

/// A response with an error status, with the body already read
#[derive(Debug, Clone)]
pub struct ResponseFailure {
    pub status: StatusCode,
    pub body: String,
    pub parsed: Option<ApiErrorBody>,
}

impl GatewayError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            GatewayError::Status(failure) | GatewayError::Forbidden(failure) => Some(failure.status),
            GatewayError::Transport(e) => e.status(),
            GatewayError::SessionExpired(_) => Some(StatusCode::UNAUTHORIZED),
            GatewayError::Serialization(_) => None,
        }
    }

    /// Returns `true` if the session was ended because of this error
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::SessionExpired(_) | Self::Forbidden(_))
    }
}

impl ResponseFailure {
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        debug_assert!(
            !status.is_success(),
            "this is supposed to be an error, right? Status code is: {status}"
        );
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                warn!(?err, "failed to get response body");
                String::new()
            }
        };
        Self::new(status, body)
    }

    pub fn new(status: StatusCode, body: String) -> Self {
        let parsed = serde_json::from_str(&body).ok();
        Self {
            status,
            body,
            parsed,
        }
    }

    pub fn signals_auth_failure(&self) -> bool {
        self.parsed
            .as_ref()
            .is_some_and(ApiErrorBody::signals_auth_failure)
    }
}

impl Display for ResponseFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(summary) = self.parsed.as_ref().and_then(ApiErrorBody::summary) {
            write!(f, "{summary}")
        } else if self.body.is_empty() {
            write!(
                f,
                "request failed with status code: {} and no body",
                self.status
            )
        } else {
            write!(f, "{}", self.body)
        }
    }
}

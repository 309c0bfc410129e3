use super::UserSummary;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    pub user: UserSummary,
}

/// Returned by endpoints that only acknowledge the request (register,
/// password reset, ...)
#[derive(Debug, Default, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// Validation errors come back as a list, everything else as a single string
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ErrorMessage {
    One(String),
    Many(Vec<String>),
}

/// Shape of an error body sent by the backend
#[derive(Debug, Default, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<ErrorMessage>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub status_code: Option<u16>,
}

impl ApiErrorBody {
    /// The text to show the user, if the body had any
    pub fn summary(&self) -> Option<String> {
        match &self.message {
            Some(ErrorMessage::One(msg)) => Some(msg.clone()),
            Some(ErrorMessage::Many(msgs)) if !msgs.is_empty() => Some(msgs.join("; ")),
            _ => self.error.clone(),
        }
    }

    /// Returns `true` if either field names an authorization failure
    pub fn signals_auth_failure(&self) -> bool {
        let is_auth_word = |s: &str| {
            s.eq_ignore_ascii_case("forbidden") || s.eq_ignore_ascii_case("unauthorized")
        };
        let message_matches = matches!(&self.message, Some(ErrorMessage::One(msg)) if is_auth_word(msg));
        message_matches || self.error.as_deref().is_some_and(is_auth_word)
    }
}

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{message}")]
    Server { status: StatusCode, message: String },
    #[error("Authentication required")]
    AuthRequired,
    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl ApiError {
    /// Builds a server error from a non-success response, preferring the
    /// `message` field of a JSON body.
    pub(crate) fn from_response(status: StatusCode, body: &[u8], fallback: &str) -> Self {
        let message = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|body| body.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("{fallback}: {}", status.as_u16()));
        Self::Server { status, message }
    }
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Server { status, .. } => Some(*status),
            Self::Transport(e) => e.status(),
            _ => None,
        }
    }
    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Server { message, .. } => message.clone(),
            Self::AuthRequired => self.to_string(),
            Self::Transport(_) => String::from("Unable to reach the gallery server"),
            Self::Decode(_) => String::from("Unexpected response from the gallery server"),
            Self::Io(e) => e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_from_body() {
        let error = ApiError::from_response(
            StatusCode::UNAUTHORIZED,
            br#"{"message":"Invalid password"}"#,
            "API Error",
        );
        assert_eq!(error.user_message(), "Invalid password");
        assert_eq!(error.status(), Some(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn message_fallback() {
        let error = ApiError::from_response(StatusCode::BAD_GATEWAY, b"<html>", "API Error");
        assert_eq!(error.user_message(), "API Error: 502");
        let error = ApiError::from_response(
            StatusCode::NOT_FOUND,
            br#"{"message":""}"#,
            "Download failed",
        );
        assert_eq!(error.user_message(), "Download failed: 404");
    }
}

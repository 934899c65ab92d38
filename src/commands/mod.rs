//! HTTP handlers for the review flow

mod review;
mod story;

pub use review::*;
pub use story::*;

use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use uuid::Uuid;

use crate::pages;
use crate::session::SessionError;
use crate::words::{ReviewError, WordStoreError};

/// Cookie carrying the review session id
pub const SESSION_COOKIE: &str = "wortschatz_session";

/// A handler failure, shown to the reviewer as a readable page
#[derive(Debug)]
pub struct CommandError {
    pub status: StatusCode,
    pub message: String,
}

impl CommandError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Plain-text form for fragment endpoints fetched by page scripts
    pub fn into_text_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

impl IntoResponse for CommandError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            log::error!("Request failed: {}", self.message);
        } else {
            log::warn!("Request rejected: {}", self.message);
        }
        (self.status, Html(pages::error_page(&self.message))).into_response()
    }
}

impl From<WordStoreError> for CommandError {
    fn from(err: WordStoreError) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Word list error: {}", err),
        )
    }
}

impl From<SessionError> for CommandError {
    fn from(err: SessionError) -> Self {
        let status = match err {
            SessionError::Missing | SessionError::AlreadyComplete => StatusCode::CONFLICT,
            SessionError::Review(_) => StatusCode::BAD_REQUEST,
        };
        Self::new(status, err.to_string())
    }
}

impl From<ReviewError> for CommandError {
    fn from(err: ReviewError) -> Self {
        SessionError::from(err).into()
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

/// Session id from the request cookies, if present and well-formed
pub fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// Like `session_id`, but a missing cookie means there is no session
fn require_session(headers: &HeaderMap) -> Result<Uuid, SessionError> {
    session_id(headers).ok_or(SessionError::Missing)
}

/// `Set-Cookie` value for a session id
pub fn session_cookie(id: Uuid) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_session_id_from_cookie() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {}={}", SESSION_COOKIE, id)).unwrap(),
        );
        assert_eq!(session_id(&headers), Some(id));
    }

    #[test]
    fn test_session_id_missing_or_malformed() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_id(&headers), None);

        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("wortschatz_session=not-a-uuid"),
        );
        assert_eq!(session_id(&headers), None);
        assert_eq!(require_session(&headers), Err(SessionError::Missing));
    }

    #[test]
    fn test_session_error_status() {
        let err: CommandError = SessionError::Missing.into();
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert!(err.message.contains("start a new session"));
    }
}

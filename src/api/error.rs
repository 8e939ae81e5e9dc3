use reqwest::StatusCode;
use std::borrow::Cow;

/// User-facing error. Every variant carries a message that can be shown as is.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Bad Request: {0}")]
    BadRequest(Cow<'static, str>),
    #[error("Unauthorized: {0}")]
    Unauthorized(Cow<'static, str>),
    #[error("Forbidden: {0}")]
    Forbidden(Cow<'static, str>),
    #[error("Not Found: {0}")]
    NotFound(Cow<'static, str>),
    #[error("Conflict: {0}")]
    Conflict(Cow<'static, str>),
    #[error("Network Error: {0}")]
    Network(Cow<'static, str>),
    #[error("Server Error: {0}")]
    Server(Cow<'static, str>),
    #[error("Internal Error")]
    Internal,
}

impl Error {
    pub fn bad_request(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::BadRequest(msg.into())
    }

    /// The bare message without the category prefix.
    pub fn message(&self) -> Cow<'static, str> {
        match self {
            Error::BadRequest(msg)
            | Error::Unauthorized(msg)
            | Error::Forbidden(msg)
            | Error::NotFound(msg)
            | Error::Conflict(msg)
            | Error::Network(msg)
            | Error::Server(msg) => msg.clone(),
            Error::Internal => "Unexpected client error".into(),
        }
    }

    /// True when the session was evicted and the user has to sign in again.
    pub fn requires_login(&self) -> bool {
        matches!(self, Error::Unauthorized(_))
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SystemError {
    // no response at all
    #[error("Transport Error: {0}")]
    Transport(#[from] reqwest::Error),
    // non-2xx response
    #[error("HTTP {status}: {message}")]
    Http { status: StatusCode, message: Cow<'static, str> },
    // 2xx response that lacks a field the flow depends on
    #[error("Response is missing `{0}`")]
    MissingField(&'static str),
    #[error("JSON Serialization/Deserialization Error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid URL: {0}")]
    InvalidUrl(Cow<'static, str>),
    #[error("Captcha image could not be decoded")]
    Decode(#[from] base64::DecodeError),
    #[error("Session file could not be written: {0}")]
    Persist(#[from] tempfile::PersistError),
    #[error("Validation Error: {0}")]
    Validation(#[from] validator::ValidationErrors),
    #[error("Bad Request: {0}")]
    BadRequest(Cow<'static, str>),
    #[error("Unauthorized: {0}")]
    Unauthorized(Cow<'static, str>),
    #[error("Forbidden: {0}")]
    Forbidden(Cow<'static, str>),
}

impl SystemError {
    pub fn bad_request(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn unauthorized(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn http(status: StatusCode, message: impl Into<Cow<'static, str>>) -> Self {
        Self::Http { status, message: message.into() }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            SystemError::Http { status, .. } => Some(*status),
            SystemError::Unauthorized(_) => Some(StatusCode::UNAUTHORIZED),
            SystemError::Transport(e) => e.status(),
            _ => None,
        }
    }
}

fn http_message(status: StatusCode, message: Cow<'static, str>) -> Error {
    match status {
        StatusCode::UNAUTHORIZED => Error::Unauthorized(message),
        StatusCode::FORBIDDEN => Error::Forbidden("Permission denied".into()),
        StatusCode::NOT_FOUND => Error::NotFound("Resource not found".into()),
        StatusCode::CONFLICT => Error::Conflict(message),
        s if s.is_server_error() => Error::Server("Internal server error".into()),
        _ if message.is_empty() => Error::BadRequest("Request failed".into()),
        _ => Error::BadRequest(message),
    }
}

impl From<SystemError> for Error {
    fn from(value: SystemError) -> Self {
        match value {
            SystemError::Http { status, message } => http_message(status, message),
            SystemError::Unauthorized(msg) => Error::Unauthorized(msg),
            SystemError::Forbidden(msg) => Error::Forbidden(msg),
            SystemError::BadRequest(msg) => Error::BadRequest(msg),
            SystemError::Validation(errors) => Error::BadRequest(errors.to_string().into()),
            SystemError::MissingField(field) => {
                Error::BadRequest(format!("Server response did not include {field}").into())
            }
            SystemError::Io(e) => Error::BadRequest(format!("Local file error: {e}").into()),
            SystemError::Transport(e) if e.is_timeout() => {
                Error::Network("Request timed out, please try again".into())
            }
            SystemError::Transport(e) => match e.status() {
                Some(status) => http_message(status, e.to_string().into()),
                None => {
                    log::warn!("transport failure: {e}");
                    Error::Network("Network error, please check your connection".into())
                }
            },
            _ => {
                log::error!("Internal Client Error: {:?}", value);
                Error::Internal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_statuses_map_to_fixed_messages() {
        let err: Error = SystemError::http(StatusCode::FORBIDDEN, "nope").into();
        assert!(matches!(err, Error::Forbidden(ref m) if m == "Permission denied"));

        let err: Error = SystemError::http(StatusCode::NOT_FOUND, "").into();
        assert!(matches!(err, Error::NotFound(_)));

        let err: Error = SystemError::http(StatusCode::BAD_GATEWAY, "upstream").into();
        assert!(matches!(err, Error::Server(_)));
    }

    #[test]
    fn test_client_errors_keep_server_message() {
        let err: Error =
            SystemError::http(StatusCode::BAD_REQUEST, "Tag name already exists").into();
        assert_eq!(err.message(), "Tag name already exists");

        let err: Error = SystemError::http(StatusCode::UNPROCESSABLE_ENTITY, "").into();
        assert_eq!(err.message(), "Request failed");
    }

    #[test]
    fn test_unauthorized_requires_login() {
        let err: Error = SystemError::unauthorized("expired").into();
        assert!(err.requires_login());
        assert!(!Error::bad_request("x").requires_login());
    }

    #[test]
    fn test_missing_field_is_user_visible() {
        let err: Error = SystemError::MissingField("token").into();
        assert!(matches!(err, Error::BadRequest(ref m) if m.contains("token")));
    }

    #[test]
    fn test_local_file_errors_are_readable() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "clip.mp4 missing");
        let err: Error = SystemError::from(io).into();
        assert!(matches!(err, Error::BadRequest(ref m) if m.contains("clip.mp4")));
    }
}

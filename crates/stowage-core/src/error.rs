use thiserror::Error;

/// Errors surfaced to the presentation layer.
///
/// [`CoreError::Rejected`] carries the backend's message verbatim so the
/// UI can show exactly what the server said (e.g. duplicate-ID conflicts).
#[derive(Debug, Error)]
pub enum CoreError {
    /// Local input validation failed before any network call.
    #[error("{message}")]
    Validation { message: String },

    /// An operation of this kind is already in flight.
    #[error("{operation} is already in progress")]
    Busy { operation: &'static str },

    /// The backend could not be reached at all.
    #[error("Could not connect to the inventory service: {message}")]
    Connection { message: String },

    /// The backend reached a decision and said no.
    #[error("{message}")]
    Rejected {
        message: String,
        status: Option<u16>,
    },

    /// Scanner hardware or session failure.
    #[error("scanner error: {message}")]
    Scanner { message: String },

    /// Configuration is missing or invalid.
    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// True when the failure is connectivity, not a backend decision.
    /// The UI uses this to switch to the "service unreachable" view.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }
}

impl From<stowage_api::Error> for CoreError {
    fn from(err: stowage_api::Error) -> Self {
        match err {
            stowage_api::Error::Transport(e) if e.is_connect() || e.is_timeout() => {
                Self::Connection {
                    message: e.to_string(),
                }
            }
            stowage_api::Error::Transport(e) => Self::Internal(e.to_string()),
            stowage_api::Error::InvalidUrl(e) => Self::Config {
                message: e.to_string(),
            },
            stowage_api::Error::Api { message, status } => Self::Rejected {
                message,
                status: Some(status),
            },
            stowage_api::Error::Deserialization { message, .. } => Self::Internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_displays_backend_message_verbatim() {
        let err = CoreError::Rejected {
            message: "Package PKG-1 already exists".into(),
            status: Some(409),
        };
        assert_eq!(err.to_string(), "Package PKG-1 already exists");
    }

    #[test]
    fn api_error_translates_to_rejected() {
        let api = stowage_api::Error::Api {
            message: "no".into(),
            status: 400,
        };
        let core = CoreError::from(api);
        assert!(matches!(
            core,
            CoreError::Rejected {
                status: Some(400),
                ..
            }
        ));
    }
}

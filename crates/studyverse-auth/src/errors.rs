//! Auth error types.

use thiserror::Error;

/// Errors from identity and profile operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown account or wrong password.
    #[error("Invalid email or password.")]
    InvalidCredentials,

    /// An account already exists for the email.
    #[error("An account with this email already exists.")]
    EmailInUse,

    /// The operation needs a signed-in user.
    #[error("You must be signed in to do that.")]
    NotSignedIn,

    /// The profile document store failed.
    #[error("profile store error: {message}")]
    Store {
        /// Error description.
        message: String,
    },
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        Self::Store {
            message: err.to_string(),
        }
    }
}

/// Result type for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_user_facing() {
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Invalid email or password."
        );
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(AuthError::from(json_err), AuthError::Store { .. }));
    }
}

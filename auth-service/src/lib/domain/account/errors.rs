use std::fmt;

use thiserror::Error;

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username is required")]
    Empty,

    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error(
        "Username contains invalid characters (only alphanumeric, underscore, and hyphen allowed)"
    )]
    InvalidCharacters,
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Email is required")]
    Empty,

    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for plaintext password policy violations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password is required")]
    Empty,

    #[error("Password too long: maximum {max} bytes, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Malformed or missing request fields, rejected before any work is done.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Invalid username: {0}")]
    Username(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid password: {0}")]
    Password(#[from] PasswordPolicyError),
}

/// Unique attribute of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialField {
    Username,
    Email,
}

impl fmt::Display for CredentialField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialField::Username => f.write_str("Username"),
            CredentialField::Email => f.write_str("Email"),
        }
    }
}

/// Failures reported by an account repository.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Account not found: {0}")]
    NotFound(String),

    #[error("Username already exists: {0}")]
    UsernameTaken(String),

    #[error("Email already exists: {0}")]
    EmailTaken(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Top-level error for authentication operations.
///
/// `InvalidCredentials` deliberately covers both an unknown username and a
/// wrong password.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("{0}")]
    InvalidInput(#[from] InputError),

    #[error("{0} is already registered")]
    DuplicateCredential(CredentialField),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    HashingFailure(String),

    #[error("Token issuance failed: {0}")]
    TokenIssuanceFailure(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Storage failure: {0}")]
    StorageFailure(String),
}

impl From<RepositoryError> for AuthError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UsernameTaken(_) => {
                AuthError::DuplicateCredential(CredentialField::Username)
            }
            RepositoryError::EmailTaken(_) => AuthError::DuplicateCredential(CredentialField::Email),
            RepositoryError::NotFound(_) | RepositoryError::Storage(_) => {
                AuthError::StorageFailure(err.to_string())
            }
        }
    }
}

impl AuthError {
    /// Whether the failure is on the service side rather than the caller's.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AuthError::HashingFailure(_)
                | AuthError::TokenIssuanceFailure(_)
                | AuthError::StorageFailure(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_duplicates_map_to_duplicate_credential() {
        assert_eq!(
            AuthError::from(RepositoryError::UsernameTaken("alice".to_string())),
            AuthError::DuplicateCredential(CredentialField::Username)
        );
        assert_eq!(
            AuthError::from(RepositoryError::EmailTaken("a@x.com".to_string())),
            AuthError::DuplicateCredential(CredentialField::Email)
        );
    }

    #[test]
    fn test_repository_storage_maps_to_storage_failure() {
        let err = AuthError::from(RepositoryError::Storage("connection reset".to_string()));
        assert!(matches!(err, AuthError::StorageFailure(_)));
        assert!(err.is_internal());
    }

    #[test]
    fn test_duplicate_message_names_field() {
        let err = AuthError::DuplicateCredential(CredentialField::Email);
        assert_eq!(err.to_string(), "Email is already registered");
        assert!(!err.is_internal());
    }
}

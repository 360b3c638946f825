use async_trait::async_trait;
use auth::Claims;

use crate::account::errors::AuthError;
use crate::account::errors::RepositoryError;
use crate::account::models::Account;
use crate::account::models::LoginCommand;
use crate::account::models::LoginOutcome;
use crate::account::models::NewAccount;
use crate::account::models::RegisterCommand;
use crate::account::models::Username;

/// Port for authentication use cases.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new account.
    ///
    /// # Arguments
    /// * `command` - Validated command containing username, email, and password
    ///
    /// # Returns
    /// Stored account
    ///
    /// # Errors
    /// * `DuplicateCredential` - Username or email is already registered
    /// * `HashingFailure` - Password hashing failed
    /// * `StorageFailure` - Repository operation failed
    async fn register(&self, command: RegisterCommand) -> Result<Account, AuthError>;

    /// Verify credentials and issue a bearer token.
    ///
    /// # Arguments
    /// * `command` - Username and plaintext password
    ///
    /// # Returns
    /// Signed token and its expiry
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password (indistinguishable)
    /// * `HashingFailure` - Stored hash could not be verified
    /// * `TokenIssuanceFailure` - Token signing failed
    /// * `StorageFailure` - Repository operation failed
    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, AuthError>;

    /// Validate a bearer token.
    ///
    /// # Errors
    /// * `InvalidToken` - Signature mismatch, malformed token, or expired
    fn validate_token(&self, token: &str) -> Result<Claims, AuthError>;

    /// Load the account an authenticated token refers to.
    ///
    /// # Errors
    /// * `InvalidToken` - The subject no longer resolves to an account
    /// * `StorageFailure` - Repository operation failed
    async fn current_account(&self, username: &Username) -> Result<Account, AuthError>;
}

/// Persistence operations for the account aggregate.
///
/// `create` must be atomic with respect to username and email uniqueness.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Persist a new account.
    ///
    /// # Arguments
    /// * `account` - Account to create
    ///
    /// # Returns
    /// Stored account with repository-assigned timestamps
    ///
    /// # Errors
    /// * `UsernameTaken` - Username is already registered
    /// * `EmailTaken` - Email is already registered
    /// * `Storage` - Storage operation failed
    async fn create(&self, account: NewAccount) -> Result<Account, RepositoryError>;

    /// Retrieve account by username.
    ///
    /// # Errors
    /// * `NotFound` - No account with this username
    /// * `Storage` - Storage operation failed
    async fn find_by_username(&self, username: &Username) -> Result<Account, RepositoryError>;
}

use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::Claims;

use crate::account::errors::AuthError;
use crate::account::errors::RepositoryError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::LoginCommand;
use crate::account::models::LoginOutcome;
use crate::account::models::NewAccount;
use crate::account::models::Password;
use crate::account::models::RegisterCommand;
use crate::account::models::Username;
use crate::account::ports::AccountRepository;
use crate::account::ports::AuthServicePort;

/// Domain service implementation for authentication.
///
/// Stateless between calls. Argon2 work runs on tokio's blocking pool.
pub struct AuthService<R>
where
    R: AccountRepository,
{
    repository: Arc<R>,
    authenticator: Arc<Authenticator>,
}

impl<R> AuthService<R>
where
    R: AccountRepository,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Account persistence implementation
    /// * `authenticator` - Password hashing and token signing, built from configuration
    pub fn new(repository: Arc<R>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    async fn hash_password(&self, password: Password) -> Result<String, AuthError> {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || authenticator.hash_password(password.expose()))
            .await
            .map_err(|e| AuthError::HashingFailure(format!("Hashing task failed: {}", e)))?
            .map_err(|e| AuthError::HashingFailure(e.to_string()))
    }

    /// Reject a login for which no account exists, at the cost of a real check.
    async fn reject_unknown_account(&self, password: Password) -> AuthError {
        let authenticator = Arc::clone(&self.authenticator);

        if let Err(e) = tokio::task::spawn_blocking(move || {
            authenticator.simulate_verification(password.expose())
        })
        .await
        {
            tracing::error!(error = %e, "Simulated verification task failed");
        }

        AuthError::InvalidCredentials
    }
}

#[async_trait]
impl<R> AuthServicePort for AuthService<R>
where
    R: AccountRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<Account, AuthError> {
        let RegisterCommand {
            username,
            email,
            password,
        } = command;

        let password_hash = self.hash_password(password).await?;

        let account = NewAccount {
            id: AccountId::new(),
            username,
            email,
            password_hash,
        };

        let created = self.repository.create(account).await.map_err(|e| {
            let err = AuthError::from(e);
            if !err.is_internal() {
                tracing::info!(error = %err, "Registration rejected");
            }
            err
        })?;

        tracing::info!(
            account_id = %created.id,
            username = %created.username,
            "Account registered"
        );

        Ok(created)
    }

    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, AuthError> {
        let LoginCommand { username, password } = command;

        // A malformed username can never have been registered.
        let username = match Username::new(username) {
            Ok(username) => username,
            Err(_) => return Err(self.reject_unknown_account(password).await),
        };

        let account = match self.repository.find_by_username(&username).await {
            Ok(account) => account,
            Err(RepositoryError::NotFound(_)) => {
                tracing::info!(username = %username, "Login rejected: invalid credentials");
                return Err(self.reject_unknown_account(password).await);
            }
            Err(e) => return Err(e.into()),
        };

        let authenticator = Arc::clone(&self.authenticator);
        let stored_hash = account.password_hash.clone();
        let subject = account.username.as_str().to_string();

        let result = tokio::task::spawn_blocking(move || {
            authenticator.authenticate(password.expose(), &stored_hash, &subject)
        })
        .await
        .map_err(|e| AuthError::HashingFailure(format!("Verification task failed: {}", e)))?
        .map_err(|e| match e {
            AuthenticationError::InvalidCredentials => {
                tracing::info!(username = %username, "Login rejected: invalid credentials");
                AuthError::InvalidCredentials
            }
            AuthenticationError::PasswordError(err) => AuthError::HashingFailure(err.to_string()),
            AuthenticationError::JwtError(err) => AuthError::TokenIssuanceFailure(err.to_string()),
        })?;

        let expires_at = result.claims.expires_at().ok_or_else(|| {
            AuthError::TokenIssuanceFailure("Token expiry out of range".to_string())
        })?;

        tracing::info!(account_id = %account.id, username = %username, "Login succeeded");

        Ok(LoginOutcome {
            token: result.access_token,
            expires_at,
        })
    }

    fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.authenticator
            .validate_token(token)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    async fn current_account(&self, username: &Username) -> Result<Account, AuthError> {
        match self.repository.find_by_username(username).await {
            Ok(account) => Ok(account),
            Err(RepositoryError::NotFound(_)) => Err(AuthError::InvalidToken(
                "Token subject no longer exists".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }
}

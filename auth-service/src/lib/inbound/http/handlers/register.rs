use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::AccountData;
use super::ApiError;
use super::ApiSuccess;
use crate::account::errors::InputError;
use crate::account::models::EmailAddress;
use crate::account::models::Password;
use crate::account::models::RegisterCommand;
use crate::account::models::Username;
use crate::inbound::http::router::AppState;

/// Serves both `/register` and `/signup`.
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<ApiSuccess<AccountData>, ApiError> {
    let Json(body) = body?;

    state
        .auth_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref account| ApiSuccess::new(StatusCode::CREATED, account.into()))
}

/// HTTP request body for registering an account (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    #[serde(alias = "identifier")]
    username: String,
    #[serde(alias = "email_address")]
    email: String,
    password: String,
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, InputError> {
        let username = Username::new(self.username)?;
        let email = EmailAddress::new(self.email)?;
        let password = Password::new(self.password)?;
        Ok(RegisterCommand::new(username, email, password))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::errors::EmailError;
    use crate::account::errors::PasswordPolicyError;
    use crate::account::errors::UsernameError;

    fn request(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_valid_request() {
        let command = request("alice", "a@x.com", "secret123")
            .try_into_command()
            .unwrap();

        assert_eq!(command.username.as_str(), "alice");
        assert_eq!(command.email.as_str(), "a@x.com");
        assert_eq!(command.password.expose(), "secret123");
    }

    #[test]
    fn test_empty_fields_rejected() {
        assert_eq!(
            request("", "a@x.com", "secret123").try_into_command().unwrap_err(),
            InputError::Username(UsernameError::Empty)
        );
        assert_eq!(
            request("alice", "", "secret123").try_into_command().unwrap_err(),
            InputError::Email(EmailError::Empty)
        );
        assert_eq!(
            request("alice", "a@x.com", "").try_into_command().unwrap_err(),
            InputError::Password(PasswordPolicyError::Empty)
        );
    }

    #[test]
    fn test_identifier_alias() {
        let body: RegisterRequest = serde_json::from_str(
            r#"{"identifier": "alice", "email": "a@x.com", "password": "secret123"}"#,
        )
        .unwrap();

        assert_eq!(body, request("alice", "a@x.com", "secret123"));
    }
}

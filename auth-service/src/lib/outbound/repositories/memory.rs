use std::collections::HashMap;
use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::account::errors::RepositoryError;
use crate::account::models::Account;
use crate::account::models::NewAccount;
use crate::account::models::Username;
use crate::account::ports::AccountRepository;

/// Process-local account store.
///
/// Uniqueness checks and the insert happen under one write lock, which makes
/// `create` atomic. Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<Accounts>,
}

#[derive(Default)]
struct Accounts {
    by_username: HashMap<String, Account>,
    emails: HashSet<String>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    pub async fn len(&self) -> usize {
        self.accounts.read().await.by_username.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create(&self, account: NewAccount) -> Result<Account, RepositoryError> {
        let mut accounts = self.accounts.write().await;

        if accounts.by_username.contains_key(account.username.as_str()) {
            return Err(RepositoryError::UsernameTaken(account.username.to_string()));
        }
        if accounts.emails.contains(account.email.as_str()) {
            return Err(RepositoryError::EmailTaken(account.email.to_string()));
        }

        let stored = account.into_account(Utc::now());
        accounts.emails.insert(stored.email.as_str().to_string());
        accounts
            .by_username
            .insert(stored.username.as_str().to_string(), stored.clone());

        Ok(stored)
    }

    async fn find_by_username(&self, username: &Username) -> Result<Account, RepositoryError> {
        self.accounts
            .read()
            .await
            .by_username
            .get(username.as_str())
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(username.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::account::models::AccountId;
    use crate::account::models::EmailAddress;

    fn new_account(username: &str, email: &str, hash: &str) -> NewAccount {
        NewAccount {
            id: AccountId::new(),
            username: Username::new(username.to_string()).unwrap(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: hash.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repository = InMemoryAccountRepository::new();

        let created = repository
            .create(new_account("alice", "a@x.com", "$argon2id$hash-a"))
            .await
            .unwrap();
        assert_eq!(created.created_at, created.updated_at);

        let found = repository
            .find_by_username(&Username::new("alice".to_string()).unwrap())
            .await
            .unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.email.as_str(), "a@x.com");
    }

    #[tokio::test]
    async fn test_find_missing() {
        let repository = InMemoryAccountRepository::new();

        let result = repository
            .find_by_username(&Username::new("ghost".to_string()).unwrap())
            .await;
        assert_eq!(
            result.unwrap_err(),
            RepositoryError::NotFound("ghost".to_string())
        );
    }

    #[tokio::test]
    async fn test_duplicate_username_keeps_original() {
        let repository = InMemoryAccountRepository::new();

        repository
            .create(new_account("alice", "a@x.com", "$argon2id$hash-a"))
            .await
            .unwrap();
        let result = repository
            .create(new_account("alice", "other@x.com", "$argon2id$hash-b"))
            .await;

        assert!(matches!(result, Err(RepositoryError::UsernameTaken(_))));

        let found = repository
            .find_by_username(&Username::new("alice".to_string()).unwrap())
            .await
            .unwrap();
        assert_eq!(found.password_hash, "$argon2id$hash-a");
        assert_eq!(repository.len().await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let repository = InMemoryAccountRepository::new();

        repository
            .create(new_account("alice", "a@x.com", "$argon2id$hash-a"))
            .await
            .unwrap();
        let result = repository
            .create(new_account("bob", "a@x.com", "$argon2id$hash-b"))
            .await;

        assert!(matches!(result, Err(RepositoryError::EmailTaken(_))));
        assert_eq!(repository.len().await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_admit_one() {
        let repository = Arc::new(InMemoryAccountRepository::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let repository = Arc::clone(&repository);
                tokio::spawn(async move {
                    repository
                        .create(new_account(
                            "alice",
                            &format!("alice{}@x.com", i),
                            "$argon2id$hash",
                        ))
                        .await
                })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(repository.len().await, 1);
    }
}

//! User use cases

use std::sync::{Arc, OnceLock};

use common::error::RepositoryError;
use regex::Regex;
use tracing::{info, warn};

use super::{InteractorError, InteractorResult};
use crate::{
    models::{CredentialHasher, LoginCredentials, Token, User},
    repositories::UserRepository,
};

/// Validate the shape of an email address
fn validate_email(email: &str) -> InteractorResult<()> {
    if email.len() > 254 {
        return Err(InteractorError::invalid(
            "email must be at most 254 characters long",
        ));
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err(InteractorError::invalid("invalid email format"));
    }

    Ok(())
}

/// Registration, profile changes and login
#[derive(Clone)]
pub struct UserInteractor {
    repository: Arc<dyn UserRepository>,
    hasher: CredentialHasher,
    /// Hash verified against when the email is unknown, so a failed login
    /// costs the same whether or not the account exists
    decoy: Token,
}

impl UserInteractor {
    pub fn new(repository: Arc<dyn UserRepository>, hasher: CredentialHasher) -> Self {
        let mut decoy = Token::plain(uuid::Uuid::new_v4().to_string());
        if let Err(e) = decoy.encrypt(&hasher) {
            warn!("Failed to prepare login decoy hash: {}", e);
        }

        Self {
            repository,
            hasher,
            decoy,
        }
    }

    pub async fn get(&self, id: &str) -> InteractorResult<User> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Register a new user.
    ///
    /// Name, password and email are required and the id must not be
    /// supplied; the id is generated and the password hashed before insert.
    pub async fn create(&self, mut user: User) -> InteractorResult<User> {
        if !user.id.is_null() {
            return Err(InteractorError::invalid("id must not be supplied"));
        }
        let Some(email) = user.email.as_deref() else {
            return Err(InteractorError::invalid("email is required"));
        };
        validate_email(email)?;
        if user.name.is_null() || user.password.is_null() {
            return Err(InteractorError::invalid("name and password are required"));
        }

        user.assign_new_id();
        user.password.encrypt(&self.hasher)?;

        let created = self.repository.create(&user).await?;
        info!("Registered user {:?}", created.id.as_deref());
        Ok(created)
    }

    /// Change the fields present in `user`; the rest keep their stored values
    pub async fn update(&self, mut user: User) -> InteractorResult<User> {
        if user.id.is_null() {
            return Err(InteractorError::invalid("id is required"));
        }
        if !user.has_changes() {
            return Err(InteractorError::invalid("nothing to update"));
        }
        if let Some(email) = user.email.as_deref() {
            validate_email(email)?;
        }

        user.password.encrypt(&self.hasher)?;
        Ok(self.repository.update(&user).await?)
    }

    pub async fn delete(&self, id: &str) -> InteractorResult<()> {
        self.repository.delete(id).await?;
        info!("Deleted user {}", id);
        Ok(())
    }

    /// Resolve the user owning `credentials`.
    ///
    /// An unknown email and a wrong password are indistinguishable to the
    /// caller; store failures still propagate.
    pub async fn authenticate(&self, credentials: &LoginCredentials) -> InteractorResult<User> {
        let Some(email) = credentials.email.as_deref() else {
            return Err(InteractorError::Unauthenticated);
        };

        let user = match self.repository.find_by_email(email).await {
            Ok(user) => user,
            Err(RepositoryError::NotFound) => {
                warn!("Login attempt for unknown email");
                let _ = self.decoy.authenticate(&credentials.password);
                return Err(InteractorError::Unauthenticated);
            }
            Err(e) => return Err(e.into()),
        };

        user.password.authenticate(&credentials.password).map_err(|e| {
            warn!("Login rejected for user {:?}: {}", user.id.as_deref(), e);
            InteractorError::Unauthenticated
        })?;

        Ok(user)
    }
}

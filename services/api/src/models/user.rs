//! User model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{nullable::NullString, token::Token};

/// User entity
///
/// Decoded straight from request bodies, so every field may be unset.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: NullString,
    pub name: NullString,
    pub password: Token,
    pub email: NullString,
    #[serde(skip)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Build a user from plain values; empty strings count as unset
    #[cfg(test)]
    pub fn new(id: &str, name: &str, password: &str, email: &str) -> Self {
        Self {
            id: NullString::from(id),
            name: NullString::from(name),
            password: Token::plain(password),
            email: NullString::from(email),
            ..Self::default()
        }
    }

    /// Assign a freshly generated identifier
    pub fn assign_new_id(&mut self) -> &mut Self {
        self.id = NullString::new(Uuid::new_v4().to_string());
        self
    }

    /// Whether the payload carries anything a user update could change
    pub fn has_changes(&self) -> bool {
        !(self.name.is_null() && self.password.is_null() && self.email.is_null())
    }

    /// Fill every unset field from the stored record.
    pub fn fill_unset_from(&mut self, existing: &User) {
        self.name.fill_from(&existing.name);
        if self.password.is_null() {
            self.password = existing.password.clone();
        }
        self.email.fill_from(&existing.email);
        self.created_at = existing.created_at;
    }
}

/// Response for user operations; never carries the credential
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: NullString,
    pub name: NullString,
    pub email: NullString,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// User login credentials
#[derive(Debug, Clone, Deserialize)]
pub struct LoginCredentials {
    #[serde(default)]
    pub email: NullString,
    #[serde(default)]
    pub password: Token,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_partial_payload() {
        let user: User = serde_json::from_str(r#"{"name":"userA"}"#).unwrap();
        assert_eq!(user.name.as_deref(), Some("userA"));
        assert!(user.id.is_null());
        assert!(user.password.is_null());
        assert!(user.email.is_null());
        assert!(user.has_changes());
    }

    #[test]
    fn test_empty_payload_has_no_changes() {
        let user: User = serde_json::from_str(r#"{"name":"","email":null}"#).unwrap();
        assert!(!user.has_changes());
    }

    #[test]
    fn test_assign_new_id() {
        let mut user = User::new("", "userA", "pw", "a@example.com");
        user.assign_new_id();
        let id = user.id.as_deref().unwrap();
        assert!(Uuid::parse_str(id).is_ok());
    }

    #[test]
    fn test_fill_unset_from_keeps_untouched_fields() {
        let mut existing = User::new("u1", "userA", "", "a@example.com");
        existing.password = Token::hashed("$argon2id$stored");
        existing.created_at = Some(Utc::now());

        let mut incoming = User::new("u1", "renamed", "", "");
        incoming.fill_unset_from(&existing);

        assert_eq!(incoming.name.as_deref(), Some("renamed"));
        assert_eq!(incoming.email, existing.email);
        assert_eq!(incoming.password, existing.password);
        assert!(incoming.password.is_encrypted());
        assert_eq!(incoming.created_at, existing.created_at);
    }

    #[test]
    fn test_response_omits_password() {
        let user = User::new("u1", "userA", "pw", "a@example.com");
        let json = serde_json::to_value(UserResponse::from(&user)).unwrap();

        assert_eq!(json["id"], "u1");
        assert_eq!(json["email"], "a@example.com");
        assert!(json.get("password").is_none());
    }
}

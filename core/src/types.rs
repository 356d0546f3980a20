//! Domain DTOs for the user-directory API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! the integration tests catch schema drift between the two crates. Only `id`
//! and `email` are required on a `User`: list endpoints may send trimmed
//! objects, and every other field defaults to absent.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::storage::KeyValueStore;

/// Storage key the access token is read from.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// A user record returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub born_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub roles: Option<String>,
    #[serde(default)]
    pub confirmed: Option<bool>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl User {
    /// Field name / display value pairs in wire order. Absent optional
    /// fields are skipped.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("id", self.id.to_string())];
        let mut push = |name: &'static str, value: Option<String>| {
            if let Some(value) = value {
                fields.push((name, value));
            }
        };
        push("username", self.username.clone());
        push("first_name", self.first_name.clone());
        push("last_name", self.last_name.clone());
        push("email", Some(self.email.clone()));
        push("phone_number", self.phone_number.clone());
        push("born_date", self.born_date.map(|d| d.to_string()));
        push("description", self.description.clone());
        push("avatar", self.avatar.clone());
        push("roles", self.roles.clone());
        push("confirmed", self.confirmed.map(|c| c.to_string()));
        push("created_at", self.created_at.map(|t| t.to_string()));
        push("updated_at", self.updated_at.map(|t| t.to_string()));
        fields
    }
}

/// Payload posted by the signup form. Values are sent exactly as entered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub born_date: String,
    pub description: String,
}

/// The account echoed back by a successful signup. Only `username` is relied on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatedUser {
    pub username: String,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Body returned by a successful signup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignupResponse {
    pub user: CreatedUser,
    #[serde(default)]
    pub detail: Option<String>,
}

/// Bearer credential handed to `ApiClient` at construction.
///
/// An empty string is treated the same as no token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthToken(Option<String>);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        if token.is_empty() {
            Self(None)
        } else {
            Self(Some(token))
        }
    }

    pub fn none() -> Self {
        Self(None)
    }

    /// Read the token once from `store` under `accessToken`.
    pub fn load(store: &impl KeyValueStore) -> Self {
        store.get(ACCESS_TOKEN_KEY).map(Self::new).unwrap_or_default()
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Value of the `authorization` header, if a token is present.
    pub fn header_value(&self) -> Option<String> {
        self.0.as_ref().map(|t| format!("Bearer {t}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn user_accepts_trimmed_objects() {
        let user: User = serde_json::from_str(r#"{"id":1,"email":"a@x.com"}"#).unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.email, "a@x.com");
        assert!(user.born_date.is_none());
    }

    #[test]
    fn user_accepts_full_objects_and_ignores_unknown_keys() {
        let user: User = serde_json::from_str(
            r#"{"id":2,"email":"b@x.com","username":"bobbyb","first_name":"Bob",
                "last_name":null,"born_date":"1990-05-17","roles":"user",
                "confirmed":false,"created_at":"2023-10-01T12:00:00","extra":1}"#,
        )
        .unwrap();
        assert_eq!(user.born_date, NaiveDate::from_ymd_opt(1990, 5, 17));
        assert_eq!(user.last_name, None);
        assert_eq!(user.roles.as_deref(), Some("user"));
    }

    #[test]
    fn fields_are_ordered_and_skip_absent_values() {
        let user: User = serde_json::from_str(
            r#"{"id":2,"email":"b@x.com","first_name":"Bob","born_date":"1990-05-17"}"#,
        )
        .unwrap();
        assert_eq!(
            user.fields(),
            vec![
                ("id", "2".to_string()),
                ("first_name", "Bob".to_string()),
                ("email", "b@x.com".to_string()),
                ("born_date", "1990-05-17".to_string()),
            ]
        );
    }

    #[test]
    fn signup_response_needs_only_username() {
        let resp: SignupResponse = serde_json::from_str(r#"{"user":{"username":"bob"}}"#).unwrap();
        assert_eq!(resp.user.username, "bob");
        assert_eq!(resp.detail, None);
    }

    #[test]
    fn empty_token_means_no_header() {
        assert_eq!(AuthToken::new("").header_value(), None);
        assert_eq!(AuthToken::none().header_value(), None);
        assert_eq!(AuthToken::new("abc").header_value().as_deref(), Some("Bearer abc"));
    }

    #[test]
    fn token_loads_from_store_key() {
        let mut store = MemoryStore::default();
        assert_eq!(AuthToken::load(&store), AuthToken::none());
        store.set(ACCESS_TOKEN_KEY, "abc").unwrap();
        assert_eq!(AuthToken::load(&store).as_deref(), Some("abc"));
    }
}

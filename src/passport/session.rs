//! Session serialize/deserialize hooks.
//!
//! Only the identifier goes into the session. On every request it is resolved
//! back into a user; a missing user invalidates the session instead of failing.

use serde_json::Value;
use tracing::{debug, instrument};

use super::{config::SessionKey, error::AuthError, store::Query, user::User, Passport};

impl Passport {
    /// Durable identifier stored in the session for `user`.
    ///
    /// # Errors
    /// Returns [`AuthError::Session`] when the user has no usable identifier.
    pub fn serialize_user(&self, user: &User) -> Result<String, AuthError> {
        let key = self.session_field();
        match user.get(key) {
            Some(Value::String(id)) if !id.trim().is_empty() => Ok(id.clone()),
            Some(Value::Number(id)) => Ok(id.to_string()),
            _ => Err(AuthError::Session(format!("user has no {key} to serialize"))),
        }
    }

    /// Resolve a session identifier. `Ok(None)` means the session should be
    /// invalidated; lookup errors propagate unchanged.
    ///
    /// Integer identifiers are serialized as text, so an identifier that parses
    /// as an integer is looked up as a number when the text lookup misses.
    ///
    /// # Errors
    /// Returns [`AuthError::Store`] when the `Users` lookup fails.
    #[instrument(skip(self))]
    pub async fn deserialize_user(&self, identifier: &str) -> Result<Option<User>, AuthError> {
        let field = self.session_field();
        let mut user = self.users().find_one(&Query::new(field, identifier)).await?;
        if user.is_none() {
            if let Some(number) = integer(identifier) {
                user = self.users().find_one(&Query::new(field, number)).await?;
            }
        }
        if user.is_none() {
            debug!("no user for session identifier, invalidating");
        }
        Ok(user)
    }

    fn session_field(&self) -> &str {
        let fields = self.config().fields();
        match self.config().session_key() {
            SessionKey::Id => &fields.id,
            SessionKey::Email => &fields.email,
        }
    }
}

fn integer(identifier: &str) -> Option<Value> {
    let identifier = identifier.trim();
    identifier
        .parse::<u64>()
        .map(Value::from)
        .or_else(|_| identifier.parse::<i64>().map(Value::from))
        .ok()
}

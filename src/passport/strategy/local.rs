use anyhow::Result;

use crate::passport::{store::BoxFuture, user::User};

pub const LOCAL_STRATEGY_NAME: &str = "local";

/// Username/password verification supplied by the `Users` collaborator.
///
/// Password hashing and comparison live entirely in the implementation;
/// `Ok(None)` means the credentials were rejected.
pub trait LocalStrategy: Send + Sync {
    fn name(&self) -> &str {
        LOCAL_STRATEGY_NAME
    }

    fn authenticate<'a>(
        &'a self,
        username: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, Result<Option<User>>>;
}

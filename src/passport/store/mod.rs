//! The `Users` collaborator: whatever persistence layer the host application uses.

pub mod memory;

use anyhow::Result;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::{strategy::local::LocalStrategy, user::User};

pub use memory::MemoryUsers;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Single-attribute equality filter, e.g. `{ github_profile_id: "3" }`.
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    pub key: String,
    pub value: Value,
}

impl Query {
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// True when `user` stores exactly the queried value under the key.
    #[must_use]
    pub fn matches(&self, user: &User) -> bool {
        user.get(&self.key) == Some(&self.value)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}: {}}}", self.key, self.value)
    }
}

/// Data access for user records.
///
/// `save` inserts or updates and returns the stored record; implementations
/// assign an identifier to new records. Errors propagate to the caller unchanged.
pub trait Users: Send + Sync {
    fn find_one<'a>(&'a self, query: &'a Query) -> BoxFuture<'a, Result<Option<User>>>;

    fn save<'a>(&'a self, user: &'a User) -> BoxFuture<'a, Result<User>>;

    /// Local credential strategy, if this store supports password login.
    fn create_strategy(&self) -> Option<Arc<dyn LocalStrategy>> {
        None
    }
}

use anyhow::Result;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{BoxFuture, Query, Users};
use crate::passport::{strategy::local::LocalStrategy, user::User};

/// In-process user store. Records are kept in insertion order and receive a
/// UUID v4 identifier on their first save.
pub struct MemoryUsers {
    id_field: String,
    users: RwLock<Vec<User>>,
    local: Option<Arc<dyn LocalStrategy>>,
    saves: AtomicUsize,
}

impl Default for MemoryUsers {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryUsers {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id_field: "id".to_string(),
            users: RwLock::new(Vec::new()),
            local: None,
            saves: AtomicUsize::new(0),
        }
    }

    /// Use `field` instead of `id` as the record identifier.
    #[must_use]
    pub fn with_id_field(mut self, field: impl Into<String>) -> Self {
        self.id_field = field.into();
        self
    }

    #[must_use]
    pub fn with_local_strategy(mut self, strategy: Arc<dyn LocalStrategy>) -> Self {
        self.local = Some(strategy);
        self
    }

    /// Seed the store with existing records, bypassing the save counter.
    #[must_use]
    pub fn with_users(self, users: Vec<User>) -> Self {
        Self {
            users: RwLock::new(users),
            ..self
        }
    }

    /// Number of `save` calls served so far.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    pub async fn all(&self) -> Vec<User> {
        self.users.read().await.clone()
    }
}

impl Users for MemoryUsers {
    fn find_one<'a>(&'a self, query: &'a Query) -> BoxFuture<'a, Result<Option<User>>> {
        Box::pin(async move {
            let users = self.users.read().await;
            Ok(users.iter().find(|user| query.matches(user)).cloned())
        })
    }

    fn save<'a>(&'a self, user: &'a User) -> BoxFuture<'a, Result<User>> {
        Box::pin(async move {
            self.saves.fetch_add(1, Ordering::SeqCst);

            let mut record = user.clone();
            if record.is_blank(&self.id_field) {
                record.set(&self.id_field, Uuid::new_v4().to_string());
            }

            let mut users = self.users.write().await;
            let id = record.get(&self.id_field).cloned();
            match users
                .iter_mut()
                .find(|stored| stored.get(&self.id_field) == id.as_ref())
            {
                Some(stored) => *stored = record.clone(),
                None => users.push(record.clone()),
            }

            Ok(record)
        })
    }

    fn create_strategy(&self) -> Option<Arc<dyn LocalStrategy>> {
        self.local.clone()
    }
}

//! In-memory user store, used for local runs and tests.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

#[derive(Default)]
struct Store {
    users: HashMap<String, User>,
    last_id: i64,
}

/// User repository backed by a HashMap behind an async RwLock.
///
/// Uniqueness check and insert happen under one write lock.
/// Note: Data is lost on process restart.
#[derive(Default)]
pub struct InMemoryUserRepository {
    store: RwLock<Store>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.users.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let mut guard = self.store.write().await;
        let store = &mut *guard;
        let next_id = store.last_id + 1;

        match store.users.entry(user.username.as_str().to_string()) {
            Entry::Occupied(_) => Err(UserError::UsernameAlreadyExists(
                user.username.as_str().to_string(),
            )),
            Entry::Vacant(slot) => {
                let created = User {
                    id: UserId(next_id),
                    username: user.username,
                    password_hash: user.password_hash,
                    created_at: Utc::now(),
                };
                slot.insert(created.clone());
                store.last_id = next_id;
                Ok(created)
            }
        }
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        let store = self.store.read().await;
        Ok(store.users.get(username.as_str()).cloned())
    }
}

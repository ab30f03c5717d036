//! Data access facade over the `users` and `quizzes` collections.
//!
//! Every operation is one pass-through call to the document store (the
//! collection scan behind [`DbUtil::get_all_users`] may span several pages).
//! Nothing is cached, retried or validated beyond what the store itself
//! requires; store failures reach the caller unchanged.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::{Config, StoreBackend};
use crate::errors::StoreError;
use crate::models::{NewUser, QuizAttempt, Stats, User, WriteAck};
use crate::store::{DocumentStore, Fields, FirestoreStore, MemoryStore, Value};

pub const USERS_COLLECTION: &str = "users";
pub const QUIZZES_COLLECTION: &str = "quizzes";

/// Handle shared by every caller; cloning shares the same store connection.
#[derive(Clone)]
pub struct DbUtil {
    store: Arc<dyn DocumentStore>,
}

impl std::fmt::Debug for DbUtil {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbUtil")
            .field("store", &self.store.name())
            .finish()
    }
}

impl DbUtil {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Opens the configured store once and wraps it
    pub fn from_config(config: &Config) -> Result<Self, StoreError> {
        let store: Arc<dyn DocumentStore> = match config.store_backend {
            StoreBackend::Firestore => Arc::new(FirestoreStore::new(config.firebase.clone())?),
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
        };
        info!("✅ {} backend initialised", store.name());
        Ok(Self::new(store))
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Creates or merges the user document keyed by `user.email`.
    ///
    /// `createdAt` is rewritten on every call, not only on creation.
    pub async fn save_user(&self, user: NewUser) -> Result<WriteAck, StoreError> {
        let now = Utc::now();
        self.store
            .set_merge(USERS_COLLECTION, &user.email, user.to_fields(now))
            .await?;
        debug!("saved user {}", user.email);
        Ok(WriteAck::ok())
    }

    /// Replaces the stamps of an existing user and refreshes `updatedAt`
    pub async fn update_stamps(&self, email: &str, stamps: Vec<String>) -> Result<WriteAck, StoreError> {
        let mut fields = Fields::new();
        fields.insert("stamps".to_string(), Value::from(stamps));
        fields.insert("updatedAt".to_string(), Value::Timestamp(Utc::now()));

        self.store.update(USERS_COLLECTION, email, fields).await?;
        debug!("updated stamps for {}", email);
        Ok(WriteAck::ok())
    }

    /// Appends one attempt to the quiz log
    pub async fn log_quiz_answer(
        &self,
        email: &str,
        location_id: &str,
        correct: bool,
    ) -> Result<WriteAck, StoreError> {
        let attempt = QuizAttempt::new(email, location_id, correct, Utc::now());
        let id = self
            .store
            .add(QUIZZES_COLLECTION, attempt.to_fields())
            .await?;
        debug!("logged quiz attempt {} for {} at {}", id, email, location_id);
        Ok(WriteAck::ok())
    }

    /// `None` when no user is stored under `email`
    pub async fn get_user(&self, email: &str) -> Result<Option<User>, StoreError> {
        match self.store.get(USERS_COLLECTION, email).await? {
            Some(document) => document.decode(USERS_COLLECTION).map(Some),
            None => Ok(None),
        }
    }

    pub async fn get_all_users(&self) -> Result<Vec<User>, StoreError> {
        self.store
            .list(USERS_COLLECTION)
            .await?
            .iter()
            .map(|document| document.decode(USERS_COLLECTION))
            .collect()
    }

    /// Stamp totals over every user. Reads only the `users` collection.
    pub async fn get_stats(&self) -> Result<Stats, StoreError> {
        let users = self.get_all_users().await?;
        Ok(Stats::from_users(&users))
    }
}

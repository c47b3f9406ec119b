//! User repository over the `users` collection

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use crate::error::{AppError, Result};
use crate::gallery::model::{next_timestamp, User};
use crate::gallery::store::{Collection, DocumentStore};

pub const USERS_COLLECTION: &str = "users";

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get(&self, user_id: &str) -> Result<Option<User>>;

    /// Fails when the user already exists
    async fn create(&self, user_id: &str, email: Option<String>, is_paid: bool) -> Result<User>;

    /// Existing user, or a new free-tier one
    async fn get_or_create(&self, user_id: &str) -> Result<User>;

    async fn set_subscription(&self, user_id: &str, is_paid: bool) -> Result<User>;
}

pub struct DocumentUserRepository {
    users: Collection<User>,
}

impl DocumentUserRepository {
    pub async fn open(store: &DocumentStore) -> Result<Self> {
        Ok(Self {
            users: store.collection(USERS_COLLECTION).await?,
        })
    }
}

#[async_trait]
impl UserRepository for DocumentUserRepository {
    async fn get(&self, user_id: &str) -> Result<Option<User>> {
        Ok(self.users.get(user_id))
    }

    async fn create(&self, user_id: &str, email: Option<String>, is_paid: bool) -> Result<User> {
        if user_id.trim().is_empty() {
            return Err(AppError::InvalidRequest("user_id is required".to_string()));
        }

        let now = Utc::now();
        let user = User {
            user_id: user_id.to_string(),
            email,
            is_paid,
            created_at: now,
            updated_at: now,
        };

        if !self.users.insert(user_id, user.clone()).await? {
            return Err(AppError::InvalidRequest("User already exists".to_string()));
        }
        info!(user_id, is_paid, "Created user");
        Ok(user)
    }

    async fn get_or_create(&self, user_id: &str) -> Result<User> {
        if let Some(user) = self.users.get(user_id) {
            return Ok(user);
        }
        match self.create(user_id, None, false).await {
            Ok(user) => Ok(user),
            // lost a race with a concurrent create
            Err(e) => self.users.get(user_id).ok_or(e),
        }
    }

    async fn set_subscription(&self, user_id: &str, is_paid: bool) -> Result<User> {
        self.users
            .update(user_id, |user| {
                user.is_paid = is_paid;
                user.updated_at = next_timestamp(user.updated_at);
            })
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}

//! Identity-store port and the delivery-profile service built on it.

use std::sync::Arc;

use async_trait::async_trait;

use storekeep_core::{AppError, AppResult, NonEmptyString};
use storekeep_domain::{UserId, UserProfile};

/// Validated profile fields a user may change themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    /// New display name, non-empty.
    pub display_name: String,
    /// New contact phone, if any.
    pub cell_phone: Option<String>,
    /// New delivery country, if any.
    pub country: Option<String>,
}

impl ProfileUpdate {
    /// Creates a validated profile update.
    pub fn new(
        display_name: impl Into<String>,
        cell_phone: Option<String>,
        country: Option<String>,
    ) -> AppResult<Self> {
        let display_name = NonEmptyString::new(display_name)?;

        Ok(Self {
            display_name: display_name.into(),
            cell_phone,
            country,
        })
    }
}

/// Port for the external identity store.
///
/// Credentials and sessions are owned elsewhere; this port only resolves
/// users and updates the profile fields shown around orders.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Finds a user by their unique identifier.
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserProfile>>;

    /// Finds a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserProfile>>;

    /// Updates the user's profile fields.
    async fn update_profile(&self, user_id: UserId, update: &ProfileUpdate) -> AppResult<()>;
}

/// Application service for viewing and updating the delivery profile.
#[derive(Clone)]
pub struct ProfileService {
    users: Arc<dyn UserDirectory>,
}

impl ProfileService {
    /// Creates a new profile service.
    #[must_use]
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self { users }
    }

    /// Returns the profile for a user, failing when the record is gone.
    pub async fn profile(&self, user_id: UserId) -> AppResult<UserProfile> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("no user with id {user_id}")))
    }

    /// Applies a validated profile update.
    pub async fn update(&self, user_id: UserId, update: ProfileUpdate) -> AppResult<UserProfile> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(AppError::NotFound(format!("no user with id {user_id}")));
        }

        self.users.update_profile(user_id, &update).await?;
        self.profile(user_id).await
    }
}

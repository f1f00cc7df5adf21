//! User service
//!
//! Existence-checked CRUD with email uniqueness.

use tracing::{debug, info};

use crate::database::repositories::UserRepository;
use crate::models::user::{NewUserRequest, UpdateUserRequest, User};
use crate::utils::errors::{ExploreError, Result};

#[derive(Debug, Clone)]
pub struct UserService {
    user_repository: UserRepository,
}

impl UserService {
    /// Create a new UserService instance
    pub fn new(user_repository: UserRepository) -> Self {
        Self { user_repository }
    }

    /// Register a new user with a unique email
    pub async fn create_user(&self, request: &NewUserRequest) -> Result<User> {
        validate_user(&request.name, &request.email)?;

        if self.user_repository.exists_by_email(&request.email).await? {
            return Err(ExploreError::AlreadyExists(format!(
                "User with email '{}' already exists",
                request.email
            )));
        }

        let user = self.user_repository.create(&request.name, &request.email).await?;
        info!(user_id = user.id, "User created");
        Ok(user)
    }

    /// Partial update of name/email, re-checking email uniqueness
    pub async fn update_user(&self, user_id: i64, request: &UpdateUserRequest) -> Result<User> {
        let existing = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ExploreError::not_found("User", user_id))?;

        if let Some(email) = request.email.as_deref() {
            if email != existing.email && self.user_repository.exists_by_email(email).await? {
                return Err(ExploreError::AlreadyExists(format!(
                    "User with email '{email}' already exists"
                )));
            }
        }

        let user = self
            .user_repository
            .update(user_id, request.name.as_deref(), request.email.as_deref())
            .await?;
        info!(user_id = user_id, "User updated");
        Ok(user)
    }

    /// Delete a user
    pub async fn delete_user(&self, user_id: i64) -> Result<()> {
        if !self.user_repository.exists_by_id(user_id).await? {
            return Err(ExploreError::not_found("User", user_id));
        }

        self.user_repository.delete(user_id).await?;
        info!(user_id = user_id, "User deleted");
        Ok(())
    }

    /// List users: all of them paginated, or exactly the given ids
    pub async fn get_users(
        &self,
        ids: Option<&[i64]>,
        from: i64,
        size: i64,
    ) -> Result<Vec<User>> {
        debug!(from = from, size = size, "Listing users");

        match ids.filter(|ids| !ids.is_empty()) {
            Some(ids) => self.user_repository.list_by_ids(ids, size, from).await,
            None => self.user_repository.list(size, from).await,
        }
    }
}

fn validate_user(name: &str, email: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ExploreError::InvalidInput("User name must not be blank".to_string()));
    }
    if email.trim().is_empty() || !email.contains('@') {
        return Err(ExploreError::InvalidInput(format!("Invalid email: '{email}'")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_validate_user() {
        assert!(validate_user("Alice", "alice@example.com").is_ok());
        assert_matches!(
            validate_user("", "alice@example.com"),
            Err(ExploreError::InvalidInput(_))
        );
        assert_matches!(
            validate_user("Alice", "not-an-email"),
            Err(ExploreError::InvalidInput(_))
        );
    }
}

//! Category service
//!
//! Existence-checked CRUD with a case-insensitive uniqueness constraint and a
//! referential guard against deleting a category that events still use.

use tracing::{debug, info};

use crate::database::repositories::{CategoryRepository, EventRepository};
use crate::models::category::Category;
use crate::utils::errors::{ExploreError, Result};

#[derive(Debug, Clone)]
pub struct CategoryService {
    category_repository: CategoryRepository,
    event_repository: EventRepository,
}

impl CategoryService {
    /// Create a new CategoryService instance
    pub fn new(category_repository: CategoryRepository, event_repository: EventRepository) -> Self {
        Self {
            category_repository,
            event_repository,
        }
    }

    /// Create a category with a unique name
    pub async fn create_category(&self, name: &str) -> Result<Category> {
        validate_name(name)?;

        if self.category_repository.exists_by_name(name, None).await? {
            return Err(ExploreError::AlreadyExists(format!(
                "Category with name '{name}' already exists"
            )));
        }

        let category = self.category_repository.create(name).await?;
        info!(category_id = category.id, name = %category.name, "Category created");
        Ok(category)
    }

    /// Rename a category, re-checking uniqueness
    pub async fn update_category(&self, category_id: i64, name: &str) -> Result<Category> {
        validate_name(name)?;

        if self.category_repository.find_by_id(category_id).await?.is_none() {
            return Err(ExploreError::not_found("Category", category_id));
        }

        if self
            .category_repository
            .exists_by_name(name, Some(category_id))
            .await?
        {
            return Err(ExploreError::AlreadyExists(format!(
                "Category with name '{name}' already exists"
            )));
        }

        let category = self.category_repository.update(category_id, name).await?;
        info!(category_id = category_id, name = %category.name, "Category renamed");
        Ok(category)
    }

    /// Delete a category that no event references
    pub async fn delete_category(&self, category_id: i64) -> Result<()> {
        if self.category_repository.find_by_id(category_id).await?.is_none() {
            return Err(ExploreError::not_found("Category", category_id));
        }

        if self.event_repository.exists_by_category(category_id).await? {
            return Err(ExploreError::BusinessRuleViolation(
                "The category is not empty".to_string(),
            ));
        }

        self.category_repository.delete(category_id).await?;
        info!(category_id = category_id, "Category deleted");
        Ok(())
    }

    /// List categories with pagination
    pub async fn get_all_categories(&self, from: i64, size: i64) -> Result<Vec<Category>> {
        debug!(from = from, size = size, "Listing categories");
        self.category_repository.list(size, from).await
    }

    /// Fetch a single category
    pub async fn get_category_by_id(&self, category_id: i64) -> Result<Category> {
        self.category_repository
            .find_by_id(category_id)
            .await?
            .ok_or_else(|| ExploreError::not_found("Category", category_id))
    }
}

fn validate_name(name: &str) -> Result<()> {
    let len = name.trim().chars().count();
    if len == 0 || len > 50 {
        return Err(ExploreError::InvalidInput(
            "Category name must be between 1 and 50 characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_validate_name_bounds() {
        assert!(validate_name("Music").is_ok());
        assert_matches!(validate_name("  "), Err(ExploreError::InvalidInput(_)));
        let long = "x".repeat(51);
        assert_matches!(validate_name(&long), Err(ExploreError::InvalidInput(_)));
    }
}

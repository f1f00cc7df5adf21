//! Compilation service
//!
//! Compilations are created and updated as a whole; an update with an event
//! list replaces the entire set.

use tracing::{debug, info};

use crate::database::repositories::CompilationRepository;
use crate::models::compilation::{
    normalize_title, Compilation, CompilationDto, NewCompilationRequest, UpdateCompilationRequest,
};
use crate::services::event::EventService;
use crate::utils::errors::{ExploreError, Result};

#[derive(Debug, Clone)]
pub struct CompilationService {
    compilation_repository: CompilationRepository,
    event_service: EventService,
}

impl CompilationService {
    /// Create a new CompilationService instance
    pub fn new(compilation_repository: CompilationRepository, event_service: EventService) -> Self {
        Self {
            compilation_repository,
            event_service,
        }
    }

    /// Create a compilation with a unique title
    pub async fn create_compilation(
        &self,
        request: &NewCompilationRequest,
    ) -> Result<CompilationDto> {
        validate_title(&request.title)?;

        if self
            .compilation_repository
            .exists_by_normalized_title(&normalize_title(&request.title), None)
            .await?
        {
            return Err(ExploreError::AlreadyExists(format!(
                "Compilation with title '{}' already exists",
                request.title
            )));
        }

        let event_ids = request.events.clone().unwrap_or_default();
        let compilation = self
            .compilation_repository
            .create(&request.title, request.pinned.unwrap_or(false), &event_ids)
            .await?;
        info!(compilation_id = compilation.id, "Compilation created");

        self.to_dto(compilation).await
    }

    /// Partial update; a supplied event list replaces the whole set
    pub async fn update_compilation(
        &self,
        compilation_id: i64,
        request: &UpdateCompilationRequest,
    ) -> Result<CompilationDto> {
        if self
            .compilation_repository
            .find_by_id(compilation_id)
            .await?
            .is_none()
        {
            return Err(ExploreError::not_found("Compilation", compilation_id));
        }

        if let Some(title) = request.title.as_deref() {
            validate_title(title)?;
            if self
                .compilation_repository
                .exists_by_normalized_title(&normalize_title(title), Some(compilation_id))
                .await?
            {
                return Err(ExploreError::AlreadyExists(format!(
                    "Compilation with title '{title}' already exists"
                )));
            }
        }

        let compilation = self
            .compilation_repository
            .update(
                compilation_id,
                request.title.as_deref(),
                request.pinned,
                request.events.as_deref(),
            )
            .await?;
        info!(compilation_id = compilation_id, "Compilation updated");

        self.to_dto(compilation).await
    }

    /// Delete a compilation
    pub async fn delete_compilation(&self, compilation_id: i64) -> Result<()> {
        if self
            .compilation_repository
            .find_by_id(compilation_id)
            .await?
            .is_none()
        {
            return Err(ExploreError::not_found("Compilation", compilation_id));
        }

        self.compilation_repository.delete(compilation_id).await?;
        info!(compilation_id = compilation_id, "Compilation deleted");
        Ok(())
    }

    /// Fetch a single compilation with its events
    pub async fn get_compilation_by_id(&self, compilation_id: i64) -> Result<CompilationDto> {
        let compilation = self
            .compilation_repository
            .find_by_id(compilation_id)
            .await?
            .ok_or_else(|| ExploreError::not_found("Compilation", compilation_id))?;

        self.to_dto(compilation).await
    }

    /// List compilations, optionally restricted to pinned/unpinned
    pub async fn get_compilations(
        &self,
        pinned: Option<bool>,
        from: i64,
        size: i64,
    ) -> Result<Vec<CompilationDto>> {
        debug!(pinned = ?pinned, from = from, size = size, "Listing compilations");

        let compilations = self.compilation_repository.list(pinned, size, from).await?;
        futures::future::try_join_all(compilations.into_iter().map(|c| self.to_dto(c))).await
    }

    async fn to_dto(&self, compilation: Compilation) -> Result<CompilationDto> {
        let event_ids = self.compilation_repository.event_ids(compilation.id).await?;
        let events = self.event_service.shorts_by_ids(&event_ids).await?;

        Ok(CompilationDto {
            id: compilation.id,
            title: compilation.title,
            pinned: compilation.pinned,
            events,
        })
    }
}

fn validate_title(title: &str) -> Result<()> {
    let len = title.trim().chars().count();
    if len == 0 || len > 50 {
        return Err(ExploreError::InvalidInput(
            "Compilation title must be between 1 and 50 characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_validate_title_bounds() {
        assert!(validate_title("Best of June").is_ok());
        assert_matches!(validate_title(" "), Err(ExploreError::InvalidInput(_)));
        let long = "x".repeat(51);
        assert_matches!(validate_title(&long), Err(ExploreError::InvalidInput(_)));
    }
}

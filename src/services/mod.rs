//! Services module
//!
//! This module contains business logic services

pub mod category;
pub mod comment;
pub mod compilation;
pub mod event;
pub mod request;
pub mod stats;
pub mod stats_client;
pub mod user;

// Re-export commonly used services
pub use category::CategoryService;
pub use comment::CommentService;
pub use compilation::CompilationService;
pub use event::EventService;
pub use request::RequestService;
pub use stats::StatsService;
pub use stats_client::StatsClient;
pub use user::UserService;

use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::utils::errors::Result;

/// Service factory for creating and managing the main-service stack
#[derive(Clone)]
pub struct ServiceFactory {
    pub user_service: UserService,
    pub category_service: CategoryService,
    pub event_service: EventService,
    pub request_service: RequestService,
    pub comment_service: CommentService,
    pub compilation_service: CompilationService,
    pub stats_client: StatsClient,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(settings: &Settings, database: &DatabaseService) -> Result<Self> {
        let stats_client = StatsClient::new(&settings.stats)?;

        let user_service = UserService::new(database.users.clone());
        let category_service =
            CategoryService::new(database.categories.clone(), database.events.clone());
        let event_service = EventService::new(
            database.events.clone(),
            database.users.clone(),
            database.categories.clone(),
            database.requests.clone(),
            stats_client.clone(),
        );
        let request_service = RequestService::new(
            database.requests.clone(),
            database.events.clone(),
            database.users.clone(),
        );
        let comment_service = CommentService::new(
            database.comments.clone(),
            database.events.clone(),
            database.users.clone(),
        );
        let compilation_service =
            CompilationService::new(database.compilations.clone(), event_service.clone());

        Ok(Self {
            user_service,
            category_service,
            event_service,
            request_service,
            comment_service,
            compilation_service,
            stats_client,
        })
    }
}

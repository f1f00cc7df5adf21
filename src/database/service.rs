//! Database service layer
//!
//! This module bundles all repositories behind a single constructor.

use crate::database::{
    CategoryRepository, CommentRepository, CompilationRepository, DatabasePool, EventRepository,
    RequestRepository, StatsRepository, UserRepository,
};

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub users: UserRepository,
    pub categories: CategoryRepository,
    pub events: EventRepository,
    pub requests: RequestRepository,
    pub comments: CommentRepository,
    pub compilations: CompilationRepository,
    pub stats: StatsRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            categories: CategoryRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            requests: RequestRepository::new(pool.clone()),
            comments: CommentRepository::new(pool.clone()),
            compilations: CompilationRepository::new(pool.clone()),
            stats: StatsRepository::new(pool),
        }
    }
}

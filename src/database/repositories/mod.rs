//! Repository implementations

pub mod category;
pub mod comment;
pub mod compilation;
pub mod event;
pub mod request;
pub mod stats;
pub mod user;

pub use category::CategoryRepository;
pub use comment::CommentRepository;
pub use compilation::CompilationRepository;
pub use event::EventRepository;
pub use request::RequestRepository;
pub use stats::StatsRepository;
pub use user::UserRepository;

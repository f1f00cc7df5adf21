//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod category;
pub mod comment;
pub mod compilation;
pub mod event;
pub mod request;
pub mod stats;
pub mod user;

// Re-export commonly used models
pub use category::{Category, NewCategoryRequest};
pub use comment::{Comment, CommentDto, CommentSort, NewCommentRequest, UpdateCommentRequest};
pub use compilation::{Compilation, CompilationDto, NewCompilationRequest, UpdateCompilationRequest};
pub use event::{
    AdminSearchParams, AdminStateAction, Event, EventFull, EventOrder, EventSearchFilter,
    EventShort, EventState, Location, NewEventRequest, PublicSearchParams, PublicSearchSort,
    UpdateEventAdminRequest, UpdateEventUserRequest, UserStateAction,
};
pub use request::{
    EventRequestStatusUpdate, EventRequestStatusUpdateResult, ParticipationRequest,
    ParticipationRequestDto, RequestStatus,
};
pub use stats::{EndpointHit, EndpointHitDto, ViewStats};
pub use user::{NewUserRequest, UpdateUserRequest, User, UserShort};

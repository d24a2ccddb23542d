//! # Partwise Episodes
//!
//! Episodes and their ordered parts: the services that keep part positions
//! contiguous, and the HTTP handlers that expose them.

pub mod api;
pub mod db;
pub mod error;
pub mod locks;
pub mod pagination;
pub mod service;

// Re-export database state
pub use db::DbState;

// Re-export error types
pub use error::ServiceError;

// Re-export services
pub use locks::EpisodeLocks;
pub use service::{EpisodeService, PartService, PositionStatus, PositionUpdate, ReorderOutcome};

// Re-export pagination types
pub use pagination::{PaginatedResponse, PaginationMeta, PaginationParams};

// Re-export routers
pub use api::{create_api_router, create_episodes_router, create_parts_router};

// Re-export storage types used in responses
pub use partwise_storage::{Episode, EpisodeWithParts, Part, StorageError};

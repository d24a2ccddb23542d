// ABOUTME: Core constants and validation for Partwise
// ABOUTME: Foundational package shared by storage, service, and CLI crates

pub mod constants;
pub mod validation;

// Re-export constants
pub use constants::{
    database_file, partwise_dir, DEFAULT_PAGE_SIZE, MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH,
};

// Re-export validation
pub use validation::{
    group_by_field, truncate, validate_episode_input, validate_part_input,
    validate_position_input, EpisodeInput, PartInput, PositionInput, ValidationError,
};

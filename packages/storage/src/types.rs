// ABOUTME: Episode and part type definitions
// ABOUTME: Rows as stored, plus the inputs used to create and update them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub id: i64,
    pub episode_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub position: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An episode with its parts ordered by position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeWithParts {
    #[serde(flatten)]
    pub episode: Episode,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeCreateInput {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeUpdateInput {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartCreateInput {
    pub episode_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub position: i64,
}

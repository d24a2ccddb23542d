use std::env;
use std::path::PathBuf;

/// Maximum length of episode and part titles (characters)
pub const MAX_TITLE_LENGTH: usize = 255;

/// Maximum length of episode and part descriptions (characters)
pub const MAX_DESCRIPTION_LENGTH: usize = 65_535;

/// Number of parts returned per page when listing an episode's parts
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Get the path to the Partwise directory (~/.partwise)
pub fn partwise_dir() -> PathBuf {
    // First try HOME environment variable (useful for tests)
    if let Ok(home) = env::var("HOME") {
        PathBuf::from(home).join(".partwise")
    } else {
        dirs::home_dir()
            .unwrap_or_else(env::temp_dir)
            .join(".partwise")
    }
}

/// Get the path to the default SQLite database (~/.partwise/partwise.db)
pub fn database_file() -> PathBuf {
    partwise_dir().join("partwise.db")
}

// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display)
pub const APP_NAME: &str = "Clinica";

/// Crate name as it appears in tracing targets
pub const APP_CRATE_TARGET: &str = "clinica_server";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".clinica";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "clinica.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "CLINICA_CONFIG";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "CLINICA_LOG";

// =============================================================================
// Environment Variables - Database
// =============================================================================

/// Environment variable for the SQLite database path
pub const ENV_DATABASE: &str = "CLINICA_DATABASE";

/// Default SQLite database path (relative to the working directory)
pub const DEFAULT_DATABASE_PATH: &str = "clinica.db";

/// Database path that selects a private in-memory database
pub const MEMORY_DATABASE_PATH: &str = ":memory:";

/// SQLite busy timeout in seconds
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 5;

/// SQLite connection pool size
pub const SQLITE_MAX_CONNECTIONS: u32 = 8;

// =============================================================================
// Environment Variables - Filters
// =============================================================================

/// Environment variable for the SQL dialect used by `compile`
pub const ENV_DIALECT: &str = "CLINICA_DIALECT";

/// Environment variable to escape LIKE wildcards in criteria values
pub const ENV_ESCAPE_WILDCARDS: &str = "CLINICA_ESCAPE_WILDCARDS";

/// Environment variable to let falsy criteria values fire their rules
pub const ENV_EXPLICIT_PRESENCE: &str = "CLINICA_EXPLICIT_PRESENCE";

// =============================================================================
// Search Defaults
// =============================================================================

/// Default page size for searches
pub const DEFAULT_SEARCH_LIMIT: u32 = 50;

/// Upper bound for a requested page size
pub const DEFAULT_SEARCH_MAX_LIMIT: u32 = 500;

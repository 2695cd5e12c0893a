use thiserror::Error;

use crate::starmap::SystemId;

/// Convenient result alias for the starmap library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A neighbour row or system row is inconsistent with the system relation.
    #[error("data integrity violation for edge {from} -> {to}: system {missing} does not exist")]
    DataIntegrity {
        from: SystemId,
        to: SystemId,
        missing: SystemId,
    },

    /// The same system id appeared twice in the system relation.
    #[error("data integrity violation: system {id} is listed more than once")]
    DuplicateSystem { id: SystemId },

    /// Raised when the database does not expose the expected relations.
    #[error("unsupported database schema; expected systems/neighbors/systemplanets/planetary_production_data tables")]
    UnsupportedSchema,

    /// Raised when a system name could not be found in the starmap.
    #[error("unknown system name: {name}{}", format_suggestions(.suggestions))]
    UnknownSystem {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when a system identifier is not part of the starmap.
    #[error("unknown system id: {id}")]
    UnknownSystemId { id: SystemId },

    /// Raised in strict name resolution when several systems share a name.
    #[error("system name {name} is ambiguous; matches ids {candidates:?}")]
    AmbiguousSystem {
        name: String,
        candidates: Vec<SystemId>,
    },

    /// Raised when no directed route exists between two systems.
    #[error("no route found between {start} and {goal}")]
    RouteNotFound { start: String, goal: String },

    /// No suitable cache directory could be resolved for this platform.
    #[error("failed to resolve a cache directory for starmap stages")]
    CacheDirsUnavailable,

    /// Raised when a stage snapshot could not be encoded.
    #[error("failed to encode starmap stage {stage}: {message}")]
    CacheEncode { stage: String, message: String },

    /// Wrapper for SQLite errors.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

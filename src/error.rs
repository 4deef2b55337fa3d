use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while setting up a deposition run.
///
/// Everything here is a configuration problem and is reported before the first
/// event is stepped. Numerical corner cases inside an event (zero cross sections,
/// photoelectrons below the shell edge, ...) are part of the physics and are handled
/// where they occur.
#[derive(Debug, Error)]
pub enum Error {
    /// A logical table (HEPS, MACOM, EMERC) could not be located in any data path.
    #[error("data table \"{name}\" not found in any of the registered data paths")]
    TableNotFound { name: String },

    /// A data row of a table could not be parsed.
    #[error("malformed row in table {table} at line {line}: {reason}")]
    TableParse {
        table: String,
        line: usize,
        reason: String,
    },

    /// Physically invalid configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Integer particle code outside the known species.
    #[error("unknown particle type code {0}")]
    UnknownParticle(u32),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

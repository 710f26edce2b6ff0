use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// No document produced a single row.
    EmptyInput,
    /// A selected field is not part of the unified schema.
    InvalidSelection { field: String, available: Vec<String> },
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Profile validation error (no files, blank field name, etc.).
    ConfigValidation(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "no data: none of the inputs yielded any rows"),
            Self::InvalidSelection { field, available } => {
                write!(f, "unknown field '{field}'")?;
                if available.is_empty() {
                    write!(f, " (the table has no fields)")
                } else {
                    write!(f, " (available: {})", available.join(", "))
                }
            }
            Self::ConfigParse(msg) => write!(f, "profile parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "profile validation error: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}

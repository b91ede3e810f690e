use std::fmt;

/// Cell index contract violations. Both indicate a streaming bug.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexError {
    NotFound(i32),
    AlreadyPresent(i32),
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexError::NotFound(cell) => write!(f, "cell {} is not materialized", cell),
            IndexError::AlreadyPresent(cell) => {
                write!(f, "cell {} is already materialized", cell)
            }
        }
    }
}

impl std::error::Error for IndexError {}

#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    NonPositive { field: &'static str, value: f64 },
    OutOfRange { field: &'static str, reason: String },
    FrameTooNarrow { width: f32, frames: i32, block: i32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositive { field, value } => {
                write!(f, "{} must be positive (got {})", field, value)
            }
            ConfigError::OutOfRange { field, reason } => write!(f, "{}: {}", field, reason),
            ConfigError::FrameTooNarrow {
                width,
                frames,
                block,
            } => write!(
                f,
                "window width {} split into {} frames leaves no room for a {}px block",
                width, frames, block
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug)]
pub enum WorldError {
    Config(ConfigError),
    Index(IndexError),
    /// Avatar x the streaming window cannot follow.
    OutOfBounds(f32),
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldError::Config(e) => write!(f, "config error: {}", e),
            WorldError::Index(e) => write!(f, "index error: {}", e),
            WorldError::OutOfBounds(x) => write!(f, "x = {} is outside the streamable world", x),
        }
    }
}

impl std::error::Error for WorldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WorldError::Config(e) => Some(e),
            WorldError::Index(e) => Some(e),
            WorldError::OutOfBounds(_) => None,
        }
    }
}

impl From<ConfigError> for WorldError {
    fn from(e: ConfigError) -> Self {
        WorldError::Config(e)
    }
}

impl From<IndexError> for WorldError {
    fn from(e: IndexError) -> Self {
        WorldError::Index(e)
    }
}

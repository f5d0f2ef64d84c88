use std::error::Error;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Boxed result used at the caller-supplied extension points
/// (context processors, build scripts)
pub type BoxResult<T> = std::result::Result<T, Box<dyn Error + Send + Sync>>;

/// Common result type for pagemill operations
pub type Result<T> = std::result::Result<T, PagemillError>;

/// Error types for pagemill operations
#[derive(Debug)]
pub enum PagemillError {
    /// IO error wrapper
    Io(io::Error),
    /// A source file could not be read
    Read { path: PathBuf, source: io::Error },
    /// Configuration error
    Config(String),
    /// Malformed frontmatter block
    FrontMatter { path: Option<PathBuf>, message: String },
    /// Template processing error
    Template(String),
    /// Markdown processing error
    Markdown(String),
    /// Context processor failure
    Context(String),
    /// Build script registration error
    Script(String),
    /// Two template or partial files share a basename
    NameCollision {
        kind: &'static str,
        name: String,
        first: PathBuf,
        second: PathBuf,
    },
    /// Pages failed to render and the failure policy forbids a partial build
    PageFailures { failed: usize, total: usize },
    /// Generic error message
    Generic(String),
}

impl PagemillError {
    /// Attach the source file to a frontmatter error
    pub fn with_path(self, path: &Path) -> Self {
        match self {
            PagemillError::FrontMatter { message, .. } => PagemillError::FrontMatter {
                path: Some(path.to_path_buf()),
                message,
            },
            other => other,
        }
    }
}

impl fmt::Display for PagemillError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PagemillError::Io(err) => write!(f, "IO error: {}", err),
            PagemillError::Read { path, source } => {
                write!(f, "Failed to read {}: {}", path.display(), source)
            }
            PagemillError::Config(msg) => write!(f, "Configuration error: {}", msg),
            PagemillError::FrontMatter { path: Some(path), message } => {
                write!(f, "Front matter error in {}: {}", path.display(), message)
            }
            PagemillError::FrontMatter { path: None, message } => {
                write!(f, "Front matter error: {}", message)
            }
            PagemillError::Template(msg) => write!(f, "Template error: {}", msg),
            PagemillError::Markdown(msg) => write!(f, "Markdown error: {}", msg),
            PagemillError::Context(msg) => write!(f, "Context processor error: {}", msg),
            PagemillError::Script(msg) => write!(f, "Build script error: {}", msg),
            PagemillError::NameCollision { kind, name, first, second } => write!(
                f,
                "Duplicate {} name '{}': {} and {}",
                kind,
                name,
                first.display(),
                second.display()
            ),
            PagemillError::PageFailures { failed, total } => {
                write!(f, "{} of {} pages failed to build", failed, total)
            }
            PagemillError::Generic(msg) => write!(f, "{}", msg),
        }
    }
}

impl Error for PagemillError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PagemillError::Io(err) => Some(err),
            PagemillError::Read { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for PagemillError {
    fn from(err: io::Error) -> Self {
        PagemillError::Io(err)
    }
}

impl From<walkdir::Error> for PagemillError {
    fn from(err: walkdir::Error) -> Self {
        PagemillError::Io(err.into())
    }
}

impl From<tokio::task::JoinError> for PagemillError {
    fn from(err: tokio::task::JoinError) -> Self {
        PagemillError::Generic(format!("Background task failed: {}", err))
    }
}

impl From<String> for PagemillError {
    fn from(msg: String) -> Self {
        PagemillError::Generic(msg)
    }
}

impl From<&str> for PagemillError {
    fn from(msg: &str) -> Self {
        PagemillError::Generic(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_path_only_touches_front_matter_errors() {
        let err = PagemillError::FrontMatter { path: None, message: "bad".into() };
        let err = err.with_path(Path::new("/site/pages/a.md"));
        assert_eq!(err.to_string(), "Front matter error in /site/pages/a.md: bad");

        let other = PagemillError::Config("x".into()).with_path(Path::new("/a"));
        assert_eq!(other.to_string(), "Configuration error: x");
    }
}

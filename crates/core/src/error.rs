use std::path::PathBuf;
use thiserror::Error;

/// Result type for modelgen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for modelgen operations
#[derive(Error, Debug)]
pub enum Error {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Tool configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Parsing errors when processing source, project or config documents
    #[error("Parse error in {file}: {message}")]
    Parse { file: String, message: String },

    /// Nothing usable is selected (zero items, several items, or a root node)
    #[error("Selection is not a single project item: {0}")]
    SelectionInvalid(String),

    /// The owning project is absent from the solution index
    #[error("Project '{project}' is not part of the solution index")]
    ProjectNotIndexed { project: String },

    /// The source file declares no namespace, so no fully qualified name can be built
    #[error("No namespace declaration found in {}", file.display())]
    NamespaceMissing { file: PathBuf },

    /// The project's compiled type universe has no type of that name
    #[error("Type '{type_name}' was not found in the build output of project '{project}'")]
    TypeNotFound { type_name: String, project: String },

    /// Neither configuration convention file exists for the project
    #[error("No configuration file ({}) found for project '{project}'", candidates.join(" or "))]
    ConfigFileMissing {
        project: String,
        candidates: Vec<String>,
    },

    /// The resolved type could not be constructed with the loaded configuration
    #[error("Failed to instantiate '{type_name}': {message}")]
    Instantiation { type_name: String, message: String },

    /// The schema serializer rejected the instance or failed to write
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Any other error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Creates a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a parse error
    pub fn parse(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Creates a selection error
    pub fn selection_invalid(msg: impl Into<String>) -> Self {
        Self::SelectionInvalid(msg.into())
    }

    /// Creates a project-not-indexed error
    pub fn project_not_indexed(project: impl Into<String>) -> Self {
        Self::ProjectNotIndexed {
            project: project.into(),
        }
    }

    /// Creates a type-not-found error
    pub fn type_not_found(type_name: impl Into<String>, project: impl Into<String>) -> Self {
        Self::TypeNotFound {
            type_name: type_name.into(),
            project: project.into(),
        }
    }

    /// Creates an instantiation error
    pub fn instantiation(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Instantiation {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Creates a serialization error
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Creates an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Adds context to any error
    pub fn with_context<E>(context: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::WithContext {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Whether this error is an expected, silent condition rather than a failure
    /// the user needs to see.
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::SelectionInvalid(_))
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::with_context(context, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_missing_lists_candidates() {
        let err = Error::ConfigFileMissing {
            project: "App.Web".to_string(),
            candidates: vec!["Web.config".to_string(), "App.config".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "No configuration file (Web.config or App.config) found for project 'App.Web'"
        );
    }

    #[test]
    fn test_only_selection_errors_are_silent() {
        assert!(Error::selection_invalid("nothing selected").is_silent());
        assert!(!Error::type_not_found("App.Data.Orders", "App.Data").is_silent());
        assert!(!Error::project_not_indexed("App.Data").is_silent());
    }

    #[test]
    fn test_context_wraps_source() {
        let io: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "gone",
        ));
        let err = io.context("Failed to read Web.config").unwrap_err();
        assert_eq!(err.to_string(), "Failed to read Web.config: gone");
    }
}
